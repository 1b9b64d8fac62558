use crate::error::Result;
use crate::frontmatter;
use crate::template::{join_list, string_or_list, Template, TemplateMeta, TemplateSource};
use crate::types::{ArtifactKind, SkillCategory};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillTemplate {
    #[serde(flatten)]
    pub meta: TemplateMeta,
    pub category: SkillCategory,
    #[serde(default)]
    pub allowed_tools: Vec<String>,
    pub instructions: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct LibraryFrontmatter {
    name: String,
    description: String,
    category: SkillCategory,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
    #[serde(
        rename = "allowed-tools",
        default,
        deserialize_with = "string_or_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    allowed_tools: Vec<String>,
}

impl Template for SkillTemplate {
    type Category = SkillCategory;
    const KIND: ArtifactKind = ArtifactKind::Skill;
    const EXTENSION: &'static str = "md";

    fn meta(&self) -> &TemplateMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut TemplateMeta {
        &mut self.meta
    }

    fn category(&self) -> SkillCategory {
        self.category
    }

    fn parse(id: &str, content: &str) -> Result<Self> {
        let (fm, body): (LibraryFrontmatter, String) = frontmatter::parse(content)?;
        Ok(Self {
            meta: TemplateMeta {
                id: id.to_string(),
                name: fm.name,
                description: fm.description,
                tags: fm.tags,
                source: TemplateSource::default(),
            },
            category: fm.category,
            allowed_tools: fm.allowed_tools,
            instructions: body,
        })
    }

    fn render(&self) -> Result<String> {
        let fm = LibraryFrontmatter {
            name: self.meta.name.clone(),
            description: self.meta.description.clone(),
            category: self.category,
            tags: self.meta.tags.clone(),
            allowed_tools: self.allowed_tools.clone(),
        };
        frontmatter::render(&fm, &self.instructions)
    }
}

// ---------------------------------------------------------------------------
// Deployed skill file
// ---------------------------------------------------------------------------

/// How skills are laid out under `.claude/skills/`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SkillLayout {
    /// `.claude/skills/<id>/SKILL.md`
    #[default]
    Folder,
    /// `.claude/skills/<id>.md`
    Flat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillFileFrontmatter {
    pub name: String,
    pub description: String,
    #[serde(
        rename = "allowed-tools",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub allowed_tools: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl SkillTemplate {
    pub fn to_skill_file(&self) -> Result<String> {
        let fm = SkillFileFrontmatter {
            name: self.meta.id.clone(),
            description: self.meta.description.clone(),
            allowed_tools: join_list(&self.allowed_tools),
            category: Some(self.category.to_string()),
            tags: if self.meta.tags.is_empty() {
                None
            } else {
                Some(self.meta.tags.clone())
            },
        };
        frontmatter::render(&fm, &self.instructions)
    }
}
