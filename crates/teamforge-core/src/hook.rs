use crate::error::Result;
use crate::settings::{HookCommand, HookMatcher};
use crate::template::{Template, TemplateMeta, TemplateSource};
use crate::types::{ArtifactKind, HookCategory, HookEvent};
use serde::{Deserialize, Serialize};

/// A shell command bound to an assistant lifecycle event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookTemplate {
    #[serde(flatten)]
    pub meta: TemplateMeta,
    pub category: HookCategory,
    pub event: HookEvent,
    /// Tool-name pattern (`Edit|Write`); empty matches everything.
    #[serde(default)]
    pub matcher: String,
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct LibraryFile {
    name: String,
    description: String,
    category: HookCategory,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
    event: HookEvent,
    #[serde(default)]
    matcher: String,
    command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeout: Option<u32>,
}

impl Template for HookTemplate {
    type Category = HookCategory;
    const KIND: ArtifactKind = ArtifactKind::Hook;
    const EXTENSION: &'static str = "json";

    fn meta(&self) -> &TemplateMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut TemplateMeta {
        &mut self.meta
    }

    fn category(&self) -> HookCategory {
        self.category
    }

    fn parse(id: &str, content: &str) -> Result<Self> {
        let f: LibraryFile = serde_json::from_str(content)?;
        Ok(Self {
            meta: TemplateMeta {
                id: id.to_string(),
                name: f.name,
                description: f.description,
                tags: f.tags,
                source: TemplateSource::default(),
            },
            category: f.category,
            event: f.event,
            matcher: f.matcher,
            command: f.command,
            timeout: f.timeout,
        })
    }

    fn render(&self) -> Result<String> {
        let f = LibraryFile {
            name: self.meta.name.clone(),
            description: self.meta.description.clone(),
            category: self.category,
            tags: self.meta.tags.clone(),
            event: self.event,
            matcher: self.matcher.clone(),
            command: self.command.clone(),
            timeout: self.timeout,
        };
        let mut out = serde_json::to_string_pretty(&f)?;
        out.push('\n');
        Ok(out)
    }
}

impl HookTemplate {
    /// The `{matcher, hooks: [{type: "command", command}]}` entry appended
    /// under `hooks.<event>` in the assistant settings.
    pub fn to_matcher_entry(&self) -> HookMatcher {
        HookMatcher::new(
            self.matcher.clone(),
            vec![HookCommand::command(&self.command, self.timeout)],
        )
    }
}
