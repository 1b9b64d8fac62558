use thiserror::Error;

#[derive(Debug, Error)]
pub enum TeamforgeError {
    #[error("not initialized: run 'teamforge init'")]
    NotInitialized,

    #[error("invalid id '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidId(String),

    #[error("invalid {kind} category '{value}'")]
    InvalidCategory { kind: String, value: String },

    #[error("unknown artifact kind: {0}")]
    InvalidKind(String),

    #[error("unknown settings scope '{0}' (expected project, local or user)")]
    InvalidScope(String),

    #[error("unknown hook event: {0}")]
    InvalidHookEvent(String),

    #[error("{kind} template not found: {id}")]
    TemplateNotFound { kind: String, id: String },

    #[error("{kind} template already exists: {id}")]
    TemplateExists { kind: String, id: String },

    #[error("{kind} template '{id}' is read-only ({source_label} library)")]
    ReadOnlyTemplate {
        kind: String,
        id: String,
        source_label: String,
    },

    #[error("team not found: {0}")]
    TeamNotFound(String),

    #[error("team already exists: {0}")]
    TeamExists(String),

    #[error("invalid front matter: {0}")]
    Frontmatter(String),

    #[error("invalid MCP server entry: {0}")]
    InvalidMcpServer(String),

    #[error("git is not installed or not on PATH")]
    GitNotInstalled,

    #[error("git failed: {0}")]
    Git(String),

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, TeamforgeError>;
