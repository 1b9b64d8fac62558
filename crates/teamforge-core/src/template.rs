use crate::error::Result;
use crate::types::{ArtifactKind, Category};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// TemplateSource
// ---------------------------------------------------------------------------

/// Where a template was loaded from. Later sources override earlier ones
/// with the same id, in declaration order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateSource {
    #[default]
    Builtin,
    Repository,
    User,
}

impl TemplateSource {
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateSource::Builtin => "builtin",
            TemplateSource::Repository => "repository",
            TemplateSource::User => "user",
        }
    }

    pub fn is_editable(self) -> bool {
        self == TemplateSource::User
    }
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TemplateMeta
// ---------------------------------------------------------------------------

/// Fields every template carries regardless of kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateMeta {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub source: TemplateSource,
}

impl TemplateMeta {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            tags: Vec::new(),
            source: TemplateSource::User,
        }
    }

    /// Case-insensitive substring match on name, description or any tag.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

/// One artifact kind's template type. Each kind is a closed struct; this
/// trait is the seam the library, selection and deployment code share.
pub trait Template: Clone + fmt::Debug + Serialize {
    type Category: Category;

    const KIND: ArtifactKind;
    /// Extension of library files for this kind, without the dot.
    const EXTENSION: &'static str;

    fn meta(&self) -> &TemplateMeta;
    fn meta_mut(&mut self) -> &mut TemplateMeta;
    fn category(&self) -> Self::Category;

    /// Parse a library file. `id` comes from the file or folder name.
    fn parse(id: &str, content: &str) -> Result<Self>
    where
        Self: Sized;

    /// Render back to the library file format accepted by [`Template::parse`].
    fn render(&self) -> Result<String>;

    fn id(&self) -> &str {
        &self.meta().id
    }

    fn category_str(&self) -> &'static str {
        self.category().as_str()
    }

    /// Kind-specific one-liner for listings, such as an MCP server's endpoint.
    fn detail(&self) -> Option<String> {
        None
    }

    fn file_name(id: &str) -> String
    where
        Self: Sized,
    {
        format!("{id}.{}", Self::EXTENSION)
    }
}

// ---------------------------------------------------------------------------
// Serde helpers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrList {
    One(String),
    Many(Vec<String>),
}

/// Accept either a YAML/JSON list or a comma-separated string (`Read, Grep`).
pub(crate) fn string_or_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<StringOrList>::deserialize(deserializer)?;
    Ok(match value {
        None => Vec::new(),
        Some(StringOrList::One(s)) => split_list(&s),
        Some(StringOrList::Many(v)) => v
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    })
}

pub(crate) fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// `["Read", "Grep"]` → `Some("Read, Grep")`; empty → `None`.
pub(crate) fn join_list(items: &[String]) -> Option<String> {
    if items.is_empty() {
        None
    } else {
        Some(items.join(", "))
    }
}
