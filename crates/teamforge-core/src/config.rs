use crate::agent::AgentDefaults;
use crate::analyzer::{ProjectAnalysis, ProjectType};
use crate::error::Result;
use crate::io;
use crate::paths;
use crate::types::ArtifactKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const SETTINGS_VERSION: u32 = 1;

/// Tool names the assistant ships with. MCP tools (`mcp__*`) are always accepted.
pub const KNOWN_TOOLS: &[&str] = &[
    "Bash",
    "Edit",
    "Glob",
    "Grep",
    "LS",
    "MultiEdit",
    "NotebookEdit",
    "NotebookRead",
    "Read",
    "Task",
    "TodoWrite",
    "WebFetch",
    "WebSearch",
    "Write",
];

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

impl ConfigWarning {
    fn warning(message: impl Into<String>) -> Self {
        Self {
            level: WarnLevel::Warning,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: WarnLevel::Error,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Repositories
// ---------------------------------------------------------------------------

/// Git repository a kind's library is cloned from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSource {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Subdirectory of the clone holding the templates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repositories {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agents: Option<RepoSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<RepoSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hooks: Option<RepoSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcp: Option<RepoSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constitutions: Option<RepoSource>,
}

impl Repositories {
    fn slot_mut(&mut self, kind: ArtifactKind) -> &mut Option<RepoSource> {
        match kind {
            ArtifactKind::Agent => &mut self.agents,
            ArtifactKind::Skill => &mut self.skills,
            ArtifactKind::Hook => &mut self.hooks,
            ArtifactKind::McpServer => &mut self.mcp,
            ArtifactKind::Constitution => &mut self.constitutions,
        }
    }

    pub fn get(&self, kind: ArtifactKind) -> Option<&RepoSource> {
        match kind {
            ArtifactKind::Agent => self.agents.as_ref(),
            ArtifactKind::Skill => self.skills.as_ref(),
            ArtifactKind::Hook => self.hooks.as_ref(),
            ArtifactKind::McpServer => self.mcp.as_ref(),
            ArtifactKind::Constitution => self.constitutions.as_ref(),
        }
    }

    pub fn set(&mut self, kind: ArtifactKind, source: Option<RepoSource>) {
        *self.slot_mut(kind) = source;
    }
}

// ---------------------------------------------------------------------------
// Theme / ProjectInfo
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        })
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            other => Err(format!("unknown theme '{other}' (light, dark, system)")),
        }
    }
}

/// Result of the last `analyze`, cached for agent suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    pub name: String,
    pub project_type: ProjectType,
    #[serde(default)]
    pub detected_technologies: Vec<String>,
    pub last_analyzed: DateTime<Utc>,
}

impl ProjectInfo {
    pub fn from_analysis(name: impl Into<String>, analysis: &ProjectAnalysis) -> Self {
        Self {
            name: name.into(),
            project_type: analysis.project_type,
            detected_technologies: analysis.detected_technologies.clone(),
            last_analyzed: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// TeamforgeSettings
// ---------------------------------------------------------------------------

/// `.teamforge/settings.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamforgeSettings {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub repositories: Repositories,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub developer_mode: bool,
    /// Overrides `.teamforge/templates` as the user template root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_template_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub default_tools: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_team: Option<String>,
}

fn default_version() -> u32 {
    SETTINGS_VERSION
}

impl Default for TeamforgeSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            repositories: Repositories::default(),
            theme: Theme::default(),
            developer_mode: false,
            dev_template_path: None,
            default_model: None,
            default_tools: Vec::new(),
            project: None,
            active_team: None,
        }
    }
}

impl TeamforgeSettings {
    /// Absent file → defaults.
    pub fn load(root: &Path) -> Result<Self> {
        io::read_json_or_default(&paths::settings_path(root))
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        io::write_json_pretty(&paths::settings_path(root), self)
    }

    pub fn exists(root: &Path) -> bool {
        paths::settings_path(root).exists()
    }

    /// Create the `.teamforge/` layout and default settings. Existing
    /// settings are left untouched and returned.
    pub fn initialize(root: &Path) -> Result<Self> {
        for dir in [
            paths::teamforge_dir(root),
            paths::teams_dir(root),
            root.join(paths::TEMPLATES_DIR),
            root.join(paths::REPOS_DIR),
            paths::claude_agents_dir(root),
        ] {
            io::ensure_dir(&dir)?;
        }
        let settings = if Self::exists(root) {
            Self::load(root)?
        } else {
            let settings = Self::default();
            settings.save(root)?;
            settings
        };
        io::ensure_gitignore_entry(root, &format!("{}/", paths::REPOS_DIR))?;
        tracing::debug!(root = %root.display(), "initialized teamforge");
        Ok(settings)
    }

    /// Directory user templates of `kind` are read from and written to.
    /// A relative `devTemplatePath` is resolved against `root`.
    pub fn template_dir(&self, root: &Path, kind: ArtifactKind) -> PathBuf {
        match self.dev_template_path.as_deref().filter(|p| !p.is_empty()) {
            Some(p) => {
                let base = Path::new(p);
                let base = if base.is_absolute() {
                    base.to_path_buf()
                } else {
                    root.join(base)
                };
                base.join(kind.dir_name())
            }
            None => paths::templates_dir(root, kind),
        }
    }

    pub fn agent_defaults(&self) -> AgentDefaults {
        AgentDefaults {
            model: self
                .default_model
                .clone()
                .filter(|m| !m.trim().is_empty()),
            tools: self.default_tools.clone(),
        }
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.version > SETTINGS_VERSION {
            warnings.push(ConfigWarning::warning(format!(
                "settings version {} is newer than supported version {SETTINGS_VERSION}",
                self.version
            )));
        }

        for kind in ArtifactKind::all() {
            let Some(repo) = self.repositories.get(*kind) else {
                continue;
            };
            if repo.url.trim().is_empty() {
                let msg = if repo.branch.is_some() || repo.path.is_some() {
                    format!("repositories.{}: branch/path set without a url", kind.dir_name())
                } else {
                    format!("repositories.{}: url is empty", kind.dir_name())
                };
                warnings.push(ConfigWarning::error(msg));
            }
        }

        let has_template_path = self
            .dev_template_path
            .as_deref()
            .is_some_and(|p| !p.trim().is_empty());
        if self.developer_mode && !has_template_path {
            warnings.push(ConfigWarning::warning(
                "developer mode is on but devTemplatePath is not set",
            ));
        }

        for tool in &self.default_tools {
            if !tool.starts_with("mcp__") && !KNOWN_TOOLS.contains(&tool.as_str()) {
                warnings.push(ConfigWarning::warning(format!(
                    "unknown tool '{tool}' in defaultTools"
                )));
            }
        }

        if self
            .default_model
            .as_deref()
            .is_some_and(|m| m.trim().is_empty())
        {
            warnings.push(ConfigWarning::warning("defaultModel is an empty string"));
        }

        warnings
    }
}
