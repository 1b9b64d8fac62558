use crate::error::TeamforgeError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ArtifactKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Agent,
    Skill,
    Hook,
    #[serde(rename = "mcp")]
    McpServer,
    Constitution,
}

impl ArtifactKind {
    pub fn all() -> &'static [ArtifactKind] {
        &[
            ArtifactKind::Agent,
            ArtifactKind::Skill,
            ArtifactKind::Hook,
            ArtifactKind::McpServer,
            ArtifactKind::Constitution,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactKind::Agent => "agent",
            ArtifactKind::Skill => "skill",
            ArtifactKind::Hook => "hook",
            ArtifactKind::McpServer => "mcp",
            ArtifactKind::Constitution => "constitution",
        }
    }

    /// Directory name used for this kind in libraries, repos and template dirs.
    pub fn dir_name(self) -> &'static str {
        match self {
            ArtifactKind::Agent => "agents",
            ArtifactKind::Skill => "skills",
            ArtifactKind::Hook => "hooks",
            ArtifactKind::McpServer => "mcp",
            ArtifactKind::Constitution => "constitutions",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ArtifactKind {
    type Err = TeamforgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "agent" | "agents" => Ok(ArtifactKind::Agent),
            "skill" | "skills" => Ok(ArtifactKind::Skill),
            "hook" | "hooks" => Ok(ArtifactKind::Hook),
            "mcp" | "mcps" | "mcp-server" | "mcp-servers" => Ok(ArtifactKind::McpServer),
            "constitution" | "constitutions" => Ok(ArtifactKind::Constitution),
            _ => Err(TeamforgeError::InvalidKind(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// A closed per-kind category set.
pub trait Category:
    Copy
    + Eq
    + fmt::Display
    + std::str::FromStr<Err = TeamforgeError>
    + Serialize
    + DeserializeOwned
    + 'static
{
    fn as_str(self) -> &'static str;
    fn all() -> &'static [Self];
}

macro_rules! category_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal { $($variant:ident => $s:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $s)]
                $variant,
            )+
        }

        impl Category for $name {
            fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $s,)+
                }
            }

            fn all() -> &'static [Self] {
                &[$($name::$variant),+]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(Category::as_str(*self))
            }
        }

        impl std::str::FromStr for $name {
            type Err = TeamforgeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok($name::$variant),)+
                    _ => Err(TeamforgeError::InvalidCategory {
                        kind: $kind.to_string(),
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

category_enum!(AgentCategory, "agent" {
    Development => "development",
    Testing => "testing",
    Architecture => "architecture",
    Documentation => "documentation",
    Devops => "devops",
    Security => "security",
    Data => "data",
    Design => "design",
});

category_enum!(SkillCategory, "skill" {
    Development => "development",
    Testing => "testing",
    Documentation => "documentation",
    Automation => "automation",
    Analysis => "analysis",
});

category_enum!(HookCategory, "hook" {
    Formatting => "formatting",
    Validation => "validation",
    Notification => "notification",
    Security => "security",
    Logging => "logging",
});

category_enum!(McpCategory, "mcp" {
    Filesystem => "filesystem",
    Database => "database",
    Web => "web",
    Development => "development",
    Productivity => "productivity",
});

category_enum!(ConstitutionCategory, "constitution" {
    CodingStandards => "coding-standards",
    Security => "security",
    Testing => "testing",
    Workflow => "workflow",
    Communication => "communication",
});

/// Category names valid for `kind`, for help text and validation messages.
pub fn categories_for(kind: ArtifactKind) -> Vec<&'static str> {
    fn names<C: Category>() -> Vec<&'static str> {
        C::all().iter().map(|c| c.as_str()).collect()
    }
    match kind {
        ArtifactKind::Agent => names::<AgentCategory>(),
        ArtifactKind::Skill => names::<SkillCategory>(),
        ArtifactKind::Hook => names::<HookCategory>(),
        ArtifactKind::McpServer => names::<McpCategory>(),
        ArtifactKind::Constitution => names::<ConstitutionCategory>(),
    }
}

// ---------------------------------------------------------------------------
// HookEvent
// ---------------------------------------------------------------------------

/// Assistant lifecycle events a hook can bind to. Serialized verbatim, since
/// the names are keys of the `hooks` object in the assistant's settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HookEvent {
    PreToolUse,
    PostToolUse,
    UserPromptSubmit,
    Notification,
    Stop,
    SubagentStop,
    PreCompact,
    SessionStart,
    SessionEnd,
}

impl HookEvent {
    pub fn all() -> &'static [HookEvent] {
        &[
            HookEvent::PreToolUse,
            HookEvent::PostToolUse,
            HookEvent::UserPromptSubmit,
            HookEvent::Notification,
            HookEvent::Stop,
            HookEvent::SubagentStop,
            HookEvent::PreCompact,
            HookEvent::SessionStart,
            HookEvent::SessionEnd,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HookEvent::PreToolUse => "PreToolUse",
            HookEvent::PostToolUse => "PostToolUse",
            HookEvent::UserPromptSubmit => "UserPromptSubmit",
            HookEvent::Notification => "Notification",
            HookEvent::Stop => "Stop",
            HookEvent::SubagentStop => "SubagentStop",
            HookEvent::PreCompact => "PreCompact",
            HookEvent::SessionStart => "SessionStart",
            HookEvent::SessionEnd => "SessionEnd",
        }
    }

    /// Only tool events consult the matcher; the others fire unconditionally.
    pub fn uses_matcher(self) -> bool {
        matches!(self, HookEvent::PreToolUse | HookEvent::PostToolUse)
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HookEvent {
    type Err = TeamforgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HookEvent::all()
            .iter()
            .copied()
            .find(|e| e.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| TeamforgeError::InvalidHookEvent(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
