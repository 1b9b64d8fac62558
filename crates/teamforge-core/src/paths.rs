use crate::error::{Result, TeamforgeError};
use crate::types::ArtifactKind;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const TEAMFORGE_DIR: &str = ".teamforge";
pub const TEAMS_DIR: &str = ".teamforge/teams";
pub const TEMPLATES_DIR: &str = ".teamforge/templates";
pub const REPOS_DIR: &str = ".teamforge/repos";
pub const SETTINGS_FILE: &str = ".teamforge/settings.json";

pub const CLAUDE_DIR: &str = ".claude";
pub const CLAUDE_AGENTS_DIR: &str = ".claude/agents";
pub const CLAUDE_SKILLS_DIR: &str = ".claude/skills";
pub const CLAUDE_CONSTITUTIONS_DIR: &str = ".claude/constitutions";
pub const CLAUDE_SETTINGS_FILE: &str = ".claude/settings.json";
pub const CLAUDE_LOCAL_SETTINGS_FILE: &str = ".claude/settings.local.json";
pub const CLAUDE_MD: &str = "CLAUDE.md";
pub const MCP_FILE: &str = ".mcp.json";

pub const SKILL_FILE: &str = "SKILL.md";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn teamforge_dir(root: &Path) -> PathBuf {
    root.join(TEAMFORGE_DIR)
}

pub fn settings_path(root: &Path) -> PathBuf {
    root.join(SETTINGS_FILE)
}

pub fn teams_dir(root: &Path) -> PathBuf {
    root.join(TEAMS_DIR)
}

pub fn team_path(root: &Path, slug: &str) -> PathBuf {
    teams_dir(root).join(format!("{slug}.yaml"))
}

/// Default location for user-created templates of `kind`.
pub fn templates_dir(root: &Path, kind: ArtifactKind) -> PathBuf {
    root.join(TEMPLATES_DIR).join(kind.dir_name())
}

/// Clone target for the library repository of `kind`.
pub fn repo_dir(root: &Path, kind: ArtifactKind) -> PathBuf {
    root.join(REPOS_DIR).join(kind.dir_name())
}

pub fn claude_agents_dir(root: &Path) -> PathBuf {
    root.join(CLAUDE_AGENTS_DIR)
}

pub fn agent_file(root: &Path, id: &str) -> PathBuf {
    claude_agents_dir(root).join(format!("{id}.md"))
}

pub fn claude_skills_dir(root: &Path) -> PathBuf {
    root.join(CLAUDE_SKILLS_DIR)
}

pub fn constitution_file(root: &Path, id: &str) -> PathBuf {
    root.join(CLAUDE_CONSTITUTIONS_DIR).join(format!("{id}.md"))
}

pub fn claude_settings_path(root: &Path) -> PathBuf {
    root.join(CLAUDE_SETTINGS_FILE)
}

pub fn claude_local_settings_path(root: &Path) -> PathBuf {
    root.join(CLAUDE_LOCAL_SETTINGS_FILE)
}

/// `~/.claude/settings.json`
pub fn user_settings_path() -> Result<PathBuf> {
    let home = home::home_dir().ok_or(TeamforgeError::HomeNotFound)?;
    Ok(home.join(CLAUDE_SETTINGS_FILE))
}

pub fn claude_md_path(root: &Path) -> PathBuf {
    root.join(CLAUDE_MD)
}

pub fn mcp_path(root: &Path) -> PathBuf {
    root.join(MCP_FILE)
}

// ---------------------------------------------------------------------------
// Id validation
// ---------------------------------------------------------------------------

static ID_RE: OnceLock<Regex> = OnceLock::new();

fn id_re() -> &'static Regex {
    ID_RE.get_or_init(|| {
        Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").expect("static regex")
    })
}

/// Template ids and team slugs are kebab-case: lowercase alphanumerics and
/// single hyphens, 1-64 chars, no leading or trailing hyphen.
pub fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() || id.len() > 64 || !id_re().is_match(id) || id.contains("--") {
        return Err(TeamforgeError::InvalidId(id.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_ids() {
        for id in ["code-reviewer", "a", "api-designer-2", "x1"] {
            validate_id(id).unwrap_or_else(|_| panic!("expected valid: {id}"));
        }
    }

    #[test]
    fn invalid_ids() {
        for id in [
            "",
            "-reviewer",
            "reviewer-",
            "code reviewer",
            "CodeReviewer",
            "code_reviewer",
            "double--hyphen",
        ] {
            assert!(validate_id(id).is_err(), "expected invalid: {id}");
        }
    }

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/proj");
        assert_eq!(
            settings_path(root),
            PathBuf::from("/tmp/proj/.teamforge/settings.json")
        );
        assert_eq!(
            team_path(root, "backend"),
            PathBuf::from("/tmp/proj/.teamforge/teams/backend.yaml")
        );
        assert_eq!(
            agent_file(root, "code-reviewer"),
            PathBuf::from("/tmp/proj/.claude/agents/code-reviewer.md")
        );
        assert_eq!(
            repo_dir(root, ArtifactKind::McpServer),
            PathBuf::from("/tmp/proj/.teamforge/repos/mcp")
        );
    }
}
