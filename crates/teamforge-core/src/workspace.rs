//! The loaded state of one project: tool settings plus the five libraries.
//!
//! Everything here is derived from `root`. Switching projects rebuilds it
//! from scratch; nothing from the previous project carries over.

use crate::config::TeamforgeSettings;
use crate::deploy::{self, DeployOptions, DeployReport};
use crate::error::{Result, TeamforgeError};
use crate::library::Libraries;
use crate::team::Team;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    pub settings: TeamforgeSettings,
    pub libraries: Libraries,
}

impl Workspace {
    pub fn open(root: &Path) -> Result<Self> {
        let settings = TeamforgeSettings::load(root)?;
        let libraries = Libraries::load(root, &settings);
        tracing::debug!(root = %root.display(), "opened workspace");
        Ok(Self {
            root: root.to_path_buf(),
            settings,
            libraries,
        })
    }

    /// Like [`Workspace::open`] but fails unless `teamforge init` has run.
    pub fn open_initialized(root: &Path) -> Result<Self> {
        if !TeamforgeSettings::exists(root) {
            return Err(TeamforgeError::NotInitialized);
        }
        Self::open(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Point at a different project and reload everything for it.
    pub fn switch_project(&mut self, root: &Path) -> Result<()> {
        *self = Self::open(root)?;
        Ok(())
    }

    /// Re-read libraries, e.g. after a repository sync or settings change.
    pub fn reload_libraries(&mut self) {
        self.libraries = Libraries::load(&self.root, &self.settings);
    }

    pub fn save_settings(&self) -> Result<()> {
        self.settings.save(&self.root)
    }

    /// Deploy `team` with the tool settings' agent defaults filled in.
    pub fn deploy(&self, team: &Team, mut options: DeployOptions) -> Result<DeployReport> {
        options.agent_defaults = self.settings.agent_defaults();
        deploy::deploy_team(&self.root, team, &self.libraries, &options)
    }
}
