use crate::output::print_json;
use anyhow::Context;
use clap::{Args, Subcommand, ValueEnum};
use std::path::Path;
use teamforge_core::settings::{
    self, AssistantSettings, Patch, Permissions, RuleList, SettingsPatch, SettingsScope,
};

#[derive(Args)]
pub struct ScopeArg {
    /// project (.claude/settings.json), local (settings.local.json) or user (~/.claude)
    #[arg(long, default_value = "project")]
    scope: String,
}

impl ScopeArg {
    fn parse(&self) -> anyhow::Result<SettingsScope> {
        Ok(self.scope.parse()?)
    }
}

#[derive(Subcommand)]
pub enum SettingsSubcommand {
    /// Print the settings file for a scope
    Show {
        #[command(flatten)]
        scope: ScopeArg,
    },
    /// Add (or with --remove, drop) an allow rule, e.g. "Bash(npm run test:*)"
    Allow {
        rule: String,
        #[arg(long)]
        remove: bool,
        #[command(flatten)]
        scope: ScopeArg,
    },
    /// Add or drop a deny rule
    Deny {
        rule: String,
        #[arg(long)]
        remove: bool,
        #[command(flatten)]
        scope: ScopeArg,
    },
    /// Add or drop an ask rule
    Ask {
        rule: String,
        #[arg(long)]
        remove: bool,
        #[command(flatten)]
        scope: ScopeArg,
    },
    /// Set or unset environment variables
    Env {
        #[command(subcommand)]
        subcommand: EnvSubcommand,
    },
    /// Set the model, or clear it with --reset
    Model {
        #[arg(required_unless_present = "reset")]
        model: Option<String>,
        #[arg(long, conflicts_with = "model")]
        reset: bool,
        #[command(flatten)]
        scope: ScopeArg,
    },
    /// Enable, disable or clear the sandbox block
    Sandbox {
        state: SandboxState,
        #[command(flatten)]
        scope: ScopeArg,
    },
    /// Enable or disable a server from .mcp.json
    Mcp {
        action: McpAction,
        name: String,
        #[command(flatten)]
        scope: ScopeArg,
    },
    /// Turn all hooks on or off
    Hooks {
        state: HooksState,
        #[command(flatten)]
        scope: ScopeArg,
    },
}

#[derive(Subcommand)]
pub enum EnvSubcommand {
    /// Set a variable
    Set {
        key: String,
        value: String,
        #[command(flatten)]
        scope: ScopeArg,
    },
    /// Remove a variable
    Unset {
        key: String,
        #[command(flatten)]
        scope: ScopeArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SandboxState {
    On,
    Off,
    Reset,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum McpAction {
    Enable,
    Disable,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum HooksState {
    On,
    Off,
}

pub fn run(root: &Path, subcmd: SettingsSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        SettingsSubcommand::Show { scope } => show(root, scope.parse()?, json),
        SettingsSubcommand::Allow {
            rule,
            remove,
            scope,
        } => rule_edit(root, scope.parse()?, RuleList::Allow, &rule, remove, json),
        SettingsSubcommand::Deny {
            rule,
            remove,
            scope,
        } => rule_edit(root, scope.parse()?, RuleList::Deny, &rule, remove, json),
        SettingsSubcommand::Ask {
            rule,
            remove,
            scope,
        } => rule_edit(root, scope.parse()?, RuleList::Ask, &rule, remove, json),
        SettingsSubcommand::Env { subcommand } => match subcommand {
            EnvSubcommand::Set { key, value, scope } => {
                env_edit(root, scope.parse()?, &key, Some(value), json)
            }
            EnvSubcommand::Unset { key, scope } => env_edit(root, scope.parse()?, &key, None, json),
        },
        SettingsSubcommand::Model {
            model,
            reset,
            scope,
        } => {
            let patch = SettingsPatch {
                model: match model {
                    Some(m) if !reset => Patch::Set(m),
                    _ => Patch::Clear,
                },
                ..Default::default()
            };
            apply(root, scope.parse()?, patch, json)
        }
        SettingsSubcommand::Sandbox { state, scope } => {
            let scope = scope.parse()?;
            let patch = match state {
                SandboxState::Reset => Patch::Clear,
                on_off => {
                    let mut sandbox = load(root, scope)?.sandbox.unwrap_or_default();
                    sandbox.enabled = Some(matches!(on_off, SandboxState::On));
                    Patch::Set(sandbox)
                }
            };
            apply(
                root,
                scope,
                SettingsPatch {
                    sandbox: patch,
                    ..Default::default()
                },
                json,
            )
        }
        SettingsSubcommand::Mcp {
            action,
            name,
            scope,
        } => {
            let scope = scope.parse()?;
            let current = load(root, scope)?;
            let patch = match action {
                McpAction::Enable => current.enable_mcp_patch(&name),
                McpAction::Disable => current.disable_mcp_patch(&name),
            };
            apply(root, scope, patch, json)
        }
        SettingsSubcommand::Hooks { state, scope } => {
            let patch = SettingsPatch {
                disable_all_hooks: match state {
                    HooksState::On => Patch::Clear,
                    HooksState::Off => Patch::Set(true),
                },
                ..Default::default()
            };
            apply(root, scope.parse()?, patch, json)
        }
    }
}

fn load(root: &Path, scope: SettingsScope) -> anyhow::Result<AssistantSettings> {
    settings::load(root, scope).with_context(|| format!("failed to read {scope} settings"))
}

fn apply(
    root: &Path,
    scope: SettingsScope,
    patch: SettingsPatch,
    json: bool,
) -> anyhow::Result<()> {
    let saved = settings::update(root, scope, patch)
        .with_context(|| format!("failed to update {scope} settings"))?;
    if json {
        print_json(&saved)
    } else {
        println!("Updated {}", scope.path(root)?.display());
        Ok(())
    }
}

fn show(root: &Path, scope: SettingsScope, json: bool) -> anyhow::Result<()> {
    let current = load(root, scope)?;
    if json {
        return print_json(&current);
    }
    println!("# {} ({scope})", scope.path(root)?.display());
    println!("{}", serde_json::to_string_pretty(&current)?);
    Ok(())
}

fn rule_edit(
    root: &Path,
    scope: SettingsScope,
    list: RuleList,
    rule: &str,
    remove: bool,
    json: bool,
) -> anyhow::Result<()> {
    let mut permissions: Permissions = load(root, scope)?.permissions.unwrap_or_default();
    let rules = permissions.list_mut(list);
    if remove {
        rules.retain(|r| r != rule);
    } else if !rules.iter().any(|r| r == rule) {
        rules.push(rule.to_string());
    }
    let patch = SettingsPatch {
        permissions: Patch::Set(permissions),
        ..Default::default()
    };
    apply(root, scope, patch, json)
}

fn env_edit(
    root: &Path,
    scope: SettingsScope,
    key: &str,
    value: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let mut env = load(root, scope)?.env.unwrap_or_default();
    match value {
        Some(v) => {
            env.insert(key.to_string(), v);
        }
        None => {
            env.remove(key);
        }
    }
    let patch = SettingsPatch {
        env: Patch::Set(env),
        ..Default::default()
    };
    apply(root, scope, patch, json)
}

