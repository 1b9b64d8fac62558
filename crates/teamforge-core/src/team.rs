use crate::error::{Result, TeamforgeError};
use crate::paths;
use crate::selection::Selection;
use crate::types::ArtifactKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

/// A named set of selections, one per artifact kind, deployed together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Agents run in rank order and the order is written to `CLAUDE.md`.
    #[serde(default)]
    pub workflow: bool,
    #[serde(default)]
    pub agents: Selection,
    #[serde(default)]
    pub skills: Selection,
    #[serde(default)]
    pub hooks: Selection,
    #[serde(default)]
    pub mcp_servers: Selection,
    #[serde(default)]
    pub constitutions: Selection,
    /// Extra instructions appended to a deployed agent, by agent id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub instructions: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Team {
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            slug: slug.into(),
            name: name.into(),
            description: None,
            workflow: false,
            agents: Selection::new(),
            skills: Selection::new(),
            hooks: Selection::new(),
            mcp_servers: Selection::new(),
            constitutions: Selection::new(),
            instructions: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn selection(&self, kind: ArtifactKind) -> &Selection {
        match kind {
            ArtifactKind::Agent => &self.agents,
            ArtifactKind::Skill => &self.skills,
            ArtifactKind::Hook => &self.hooks,
            ArtifactKind::McpServer => &self.mcp_servers,
            ArtifactKind::Constitution => &self.constitutions,
        }
    }

    pub fn selection_mut(&mut self, kind: ArtifactKind) -> &mut Selection {
        self.updated_at = Utc::now();
        match kind {
            ArtifactKind::Agent => &mut self.agents,
            ArtifactKind::Skill => &mut self.skills,
            ArtifactKind::Hook => &mut self.hooks,
            ArtifactKind::McpServer => &mut self.mcp_servers,
            ArtifactKind::Constitution => &mut self.constitutions,
        }
    }

    pub fn set_workflow(&mut self, on: bool) {
        self.workflow = on;
        self.updated_at = Utc::now();
    }

    /// Number of selected templates across all kinds.
    pub fn member_count(&self) -> usize {
        ArtifactKind::all()
            .iter()
            .map(|k| self.selection(*k).len())
            .sum()
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    pub fn create(root: &Path, slug: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let slug = slug.into();
        paths::validate_id(&slug)?;

        if paths::team_path(root, &slug).exists() {
            return Err(TeamforgeError::TeamExists(slug));
        }

        let team = Self::new(slug, name);
        team.save(root)?;
        Ok(team)
    }

    pub fn load(root: &Path, slug: &str) -> Result<Self> {
        paths::validate_id(slug)?;
        let path = paths::team_path(root, slug);
        if !path.exists() {
            return Err(TeamforgeError::TeamNotFound(slug.to_string()));
        }
        let data = std::fs::read_to_string(&path)?;
        let team: Team = serde_yaml::from_str(&data)?;
        Ok(team)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        paths::validate_id(&self.slug)?;
        let path = paths::team_path(root, &self.slug);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn delete(root: &Path, slug: &str) -> Result<()> {
        paths::validate_id(slug)?;
        let path = paths::team_path(root, slug);
        if !path.exists() {
            return Err(TeamforgeError::TeamNotFound(slug.to_string()));
        }
        std::fs::remove_file(&path)?;
        Ok(())
    }

    /// All teams, oldest first.
    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let dir = paths::teams_dir(root);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut teams = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|e| e == "yaml") {
                let Some(slug) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                    continue;
                };
                if paths::validate_id(&slug).is_err() {
                    tracing::warn!(path = %path.display(), "skipping team file with invalid slug");
                    continue;
                }
                teams.push(Self::load(root, &slug)?);
            }
        }
        teams.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.slug.cmp(&b.slug)));
        Ok(teams)
    }
}
