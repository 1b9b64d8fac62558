pub mod agent;
pub mod analyze;
pub mod config;
pub mod git;
pub mod init;
pub mod library;
pub mod settings;
pub mod team;

use anyhow::Context;
use std::path::Path;
use teamforge_core::workspace::Workspace;

/// Open the project at `root`, failing with a hint when it is not initialized.
pub(crate) fn open_workspace(root: &Path) -> anyhow::Result<Workspace> {
    Workspace::open_initialized(root)
        .with_context(|| format!("cannot open project at {}", root.display()))
}
