use crate::cmd::open_workspace;
use crate::output::print_json;
use anyhow::{bail, Context};
use clap::Subcommand;
use std::path::Path;
use teamforge_core::{
    config::{ConfigWarning, RepoSource, TeamforgeSettings, Theme, WarnLevel},
    paths,
    team::Team,
    types::ArtifactKind,
};

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print .teamforge/settings.json
    Show,

    /// Validate the settings for common mistakes
    Validate,

    /// Set one setting
    Set {
        /// theme, developer-mode, dev-template-path, default-model, default-tools or active-team
        key: String,
        /// New value; an empty string clears optional settings
        value: String,
    },

    /// Point a kind's library at a git repository
    Repo {
        /// agent, skill, hook, mcp or constitution
        kind: String,
        #[arg(long, required_unless_present = "clear")]
        url: Option<String>,
        #[arg(long)]
        branch: Option<String>,
        /// Subdirectory of the repository holding the templates
        #[arg(long)]
        path: Option<String>,
        /// Remove the repository entry
        #[arg(long, conflicts_with_all = ["url", "branch", "path"])]
        clear: bool,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::Validate => validate(root, json),
        ConfigSubcommand::Set { key, value } => set(root, &key, &value, json),
        ConfigSubcommand::Repo {
            kind,
            url,
            branch,
            path,
            clear,
        } => repo(root, &kind, url, branch, path, clear, json),
    }
}

fn load(root: &Path) -> anyhow::Result<TeamforgeSettings> {
    let ws = open_workspace(root)?;
    Ok(ws.settings)
}

fn save(root: &Path, settings: &TeamforgeSettings, json: bool) -> anyhow::Result<()> {
    settings.save(root).context("failed to save settings")?;
    if json {
        print_json(settings)
    } else {
        println!("Updated {}", paths::SETTINGS_FILE);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// show / validate
// ---------------------------------------------------------------------------

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let settings = load(root)?;
    if json {
        return print_json(&settings);
    }
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let settings = load(root)?;
    let mut warnings = settings.validate();

    if let Some(slug) = &settings.active_team {
        if Team::load(root, slug).is_err() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!("activeTeam '{slug}' does not exist"),
            });
        }
    }

    if json {
        print_json(&serde_json::json!({ "warnings": warnings }))?;
    } else if warnings.is_empty() {
        println!("Settings are valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        bail!("settings validation found errors");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// set / repo
// ---------------------------------------------------------------------------

/// `None` for an empty value.
fn optional(value: &str) -> Option<String> {
    let v = value.trim();
    (!v.is_empty()).then(|| v.to_string())
}

fn parse_bool(value: &str) -> anyhow::Result<bool> {
    match value {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        other => bail!("expected true or false, got '{other}'"),
    }
}

fn set(root: &Path, key: &str, value: &str, json: bool) -> anyhow::Result<()> {
    let mut settings = load(root)?;
    match key {
        "theme" => settings.theme = value.parse::<Theme>().map_err(anyhow::Error::msg)?,
        "developer-mode" => settings.developer_mode = parse_bool(value)?,
        "dev-template-path" => settings.dev_template_path = optional(value),
        "default-model" => settings.default_model = optional(value),
        "default-tools" => {
            settings.default_tools = value
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
        }
        "active-team" => {
            let slug = optional(value);
            if let Some(s) = &slug {
                Team::load(root, s).with_context(|| format!("cannot activate team '{s}'"))?;
            }
            settings.active_team = slug;
        }
        other => bail!(
            "unknown key '{other}' (theme, developer-mode, dev-template-path, \
             default-model, default-tools, active-team)"
        ),
    }
    save(root, &settings, json)
}

fn repo(
    root: &Path,
    kind: &str,
    url: Option<String>,
    branch: Option<String>,
    path: Option<String>,
    clear: bool,
    json: bool,
) -> anyhow::Result<()> {
    let kind: ArtifactKind = kind.parse()?;
    let mut settings = load(root)?;
    let source = match url {
        Some(url) if !clear => Some(RepoSource {
            url,
            branch: branch.and_then(|b| optional(&b)),
            path: path.and_then(|p| optional(&p)),
        }),
        _ => None,
    };
    settings.repositories.set(kind, source);
    save(root, &settings, json)
}
