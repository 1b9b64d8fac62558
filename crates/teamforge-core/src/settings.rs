//! The assistant's own `settings.json`, in its three scopes.
//!
//! Every field is optional so a file written by hand or by another tool
//! survives a load/save cycle; keys this crate does not model are kept in
//! `extra` and written back verbatim. Edits go through [`SettingsPatch`]:
//! the previous object is loaded, patched field by field, and saved.

use crate::error::{Result, TeamforgeError};
use crate::io;
use crate::paths;
use crate::types::HookEvent;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// AssistantSettings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Permissions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sandbox: Option<Sandbox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_all_project_mcp_servers: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_mcpjson_servers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled_mcpjson_servers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hooks: Option<BTreeMap<String, Vec<HookMatcher>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_all_hooks: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allow: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deny: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ask: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_directories: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Which permission list a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleList {
    Allow,
    Deny,
    Ask,
}

impl Permissions {
    pub fn list_mut(&mut self, list: RuleList) -> &mut Vec<String> {
        match list {
            RuleList::Allow => &mut self.allow,
            RuleList::Deny => &mut self.deny,
            RuleList::Ask => &mut self.ask,
        }
    }

    /// Drop `defaultMode: "default"`; `None` when nothing is left.
    fn normalized(mut self) -> Option<Self> {
        if self.default_mode.as_deref().is_some_and(|m| m.is_empty() || m == "default") {
            self.default_mode = None;
        }
        let empty = self.allow.is_empty()
            && self.deny.is_empty()
            && self.ask.is_empty()
            && self.default_mode.is_none()
            && self.additional_directories.is_empty()
            && self.extra.is_empty();
        (!empty).then_some(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sandbox {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_allow_bash_if_sandboxed: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_commands: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_unsandboxed_commands: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Sandbox {
    /// Drop `enabled: false` (the default); `None` when nothing is left.
    fn normalized(mut self) -> Option<Self> {
        if self.enabled == Some(false) {
            self.enabled = None;
        }
        let empty = self.enabled.is_none()
            && self.auto_allow_bash_if_sandboxed.is_none()
            && self.excluded_commands.is_empty()
            && self.allow_unsandboxed_commands.is_none()
            && self.extra.is_empty();
        (!empty).then_some(self)
    }
}

// ---------------------------------------------------------------------------
// Hooks
// ---------------------------------------------------------------------------

/// One entry of `hooks.<Event>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookMatcher {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub matcher: String,
    #[serde(default)]
    pub hooks: Vec<HookCommand>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HookMatcher {
    pub fn new(matcher: impl Into<String>, hooks: Vec<HookCommand>) -> Self {
        Self {
            matcher: matcher.into(),
            hooks,
            extra: Map::new(),
        }
    }
}

/// A single hook action. Only `type: "command"` hooks carry a `command`;
/// other types (`prompt`, ...) keep their fields in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookCommand {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HookCommand {
    pub fn command(command: &str, timeout: Option<u32>) -> Self {
        Self {
            kind: "command".to_string(),
            command: Some(command.to_string()),
            timeout,
            extra: Map::new(),
        }
    }
}

/// Add `entry` under `event`. Commands already registered for the same
/// matcher are skipped, so redeploying a hook leaves the map unchanged.
/// Returns `true` if anything was added.
pub fn insert_hook(
    hooks: &mut BTreeMap<String, Vec<HookMatcher>>,
    event: HookEvent,
    entry: HookMatcher,
) -> bool {
    let matchers = hooks.entry(event.as_str().to_string()).or_default();
    match matchers.iter_mut().find(|m| m.matcher == entry.matcher) {
        Some(existing) => {
            let mut added = false;
            for cmd in entry.hooks {
                let duplicate = cmd.command.is_some()
                    && existing.hooks.iter().any(|h| h.command == cmd.command);
                if !duplicate {
                    existing.hooks.push(cmd);
                    added = true;
                }
            }
            added
        }
        None => {
            matchers.push(entry);
            true
        }
    }
}

// ---------------------------------------------------------------------------
// Patch / merge
// ---------------------------------------------------------------------------

/// Edit to one top-level field.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Patch<T> {
    #[default]
    Keep,
    Set(T),
    Clear,
}

impl<T> Patch<T> {
    /// Apply to `slot`. A `Set` of a value for which `is_default` holds
    /// clears the field instead.
    fn apply(self, slot: &mut Option<T>, is_default: impl Fn(&T) -> bool) {
        match self {
            Patch::Keep => {}
            Patch::Clear => *slot = None,
            Patch::Set(v) if is_default(&v) => *slot = None,
            Patch::Set(v) => *slot = Some(v),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPatch {
    pub permissions: Patch<Permissions>,
    pub env: Patch<BTreeMap<String, String>>,
    pub model: Patch<String>,
    pub sandbox: Patch<Sandbox>,
    pub enable_all_project_mcp_servers: Patch<bool>,
    pub enabled_mcpjson_servers: Patch<Vec<String>>,
    pub disabled_mcpjson_servers: Patch<Vec<String>>,
    pub hooks: Patch<BTreeMap<String, Vec<HookMatcher>>>,
    pub disable_all_hooks: Patch<bool>,
}

impl AssistantSettings {
    /// Shallow merge: untouched fields and unknown keys carry over.
    pub fn merge(&mut self, patch: SettingsPatch) {
        match patch.permissions {
            Patch::Set(p) => self.permissions = p.normalized(),
            other => other.apply(&mut self.permissions, |_| false),
        }
        patch.env.apply(&mut self.env, BTreeMap::is_empty);
        patch.model.apply(&mut self.model, |m| m.trim().is_empty());
        match patch.sandbox {
            Patch::Set(s) => self.sandbox = s.normalized(),
            other => other.apply(&mut self.sandbox, |_| false),
        }
        patch
            .enable_all_project_mcp_servers
            .apply(&mut self.enable_all_project_mcp_servers, |enabled| !enabled);
        patch
            .enabled_mcpjson_servers
            .apply(&mut self.enabled_mcpjson_servers, Vec::is_empty);
        patch
            .disabled_mcpjson_servers
            .apply(&mut self.disabled_mcpjson_servers, Vec::is_empty);
        patch.hooks.apply(&mut self.hooks, BTreeMap::is_empty);
        patch
            .disable_all_hooks
            .apply(&mut self.disable_all_hooks, |_| false);
    }

    /// Patch that adds `name` to `enabledMcpjsonServers` and drops it from
    /// `disabledMcpjsonServers`. `Keep` on lists that would not change.
    pub fn enable_mcp_patch(&self, name: &str) -> SettingsPatch {
        let mut patch = SettingsPatch::default();
        let mut enabled = self.enabled_mcpjson_servers.clone().unwrap_or_default();
        if !enabled.iter().any(|n| n == name) {
            enabled.push(name.to_string());
            patch.enabled_mcpjson_servers = Patch::Set(enabled);
        }
        if let Some(disabled) = &self.disabled_mcpjson_servers {
            if disabled.iter().any(|n| n == name) {
                patch.disabled_mcpjson_servers =
                    Patch::Set(disabled.iter().filter(|n| *n != name).cloned().collect());
            }
        }
        patch
    }

    /// Mirror of [`AssistantSettings::enable_mcp_patch`].
    pub fn disable_mcp_patch(&self, name: &str) -> SettingsPatch {
        let mut patch = SettingsPatch::default();
        let mut disabled = self.disabled_mcpjson_servers.clone().unwrap_or_default();
        if !disabled.iter().any(|n| n == name) {
            disabled.push(name.to_string());
            patch.disabled_mcpjson_servers = Patch::Set(disabled);
        }
        if let Some(enabled) = &self.enabled_mcpjson_servers {
            if enabled.iter().any(|n| n == name) {
                patch.enabled_mcpjson_servers =
                    Patch::Set(enabled.iter().filter(|n| *n != name).cloned().collect());
            }
        }
        patch
    }
}

// ---------------------------------------------------------------------------
// Scopes and persistence
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SettingsScope {
    /// `.claude/settings.json`, checked in.
    #[default]
    Project,
    /// `.claude/settings.local.json`, per developer.
    Local,
    /// `~/.claude/settings.json`
    User,
}

impl SettingsScope {
    pub fn path(self, root: &Path) -> Result<PathBuf> {
        match self {
            SettingsScope::Project => Ok(paths::claude_settings_path(root)),
            SettingsScope::Local => Ok(paths::claude_local_settings_path(root)),
            SettingsScope::User => paths::user_settings_path(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SettingsScope::Project => "project",
            SettingsScope::Local => "local",
            SettingsScope::User => "user",
        }
    }
}

impl fmt::Display for SettingsScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SettingsScope {
    type Err = TeamforgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "project" => Ok(SettingsScope::Project),
            "local" => Ok(SettingsScope::Local),
            "user" => Ok(SettingsScope::User),
            other => Err(TeamforgeError::InvalidScope(other.to_string())),
        }
    }
}

/// Read the scope's file; absent or blank → all fields unset.
pub fn load(root: &Path, scope: SettingsScope) -> Result<AssistantSettings> {
    io::read_json_or_default(&scope.path(root)?)
}

pub fn save(root: &Path, scope: SettingsScope, settings: &AssistantSettings) -> Result<()> {
    io::write_json_pretty(&scope.path(root)?, settings)
}

/// Load, merge `patch`, save. Returns what was written. Last save wins.
pub fn update(
    root: &Path,
    scope: SettingsScope,
    patch: SettingsPatch,
) -> Result<AssistantSettings> {
    let mut settings = load(root, scope)?;
    settings.merge(patch);
    save(root, scope, &settings)?;
    Ok(settings)
}
