use crate::error::Result;
use crate::frontmatter;
use crate::template::{Template, TemplateMeta, TemplateSource};
use crate::types::{ArtifactKind, ConstitutionCategory};
use serde::{Deserialize, Serialize};

/// Project-wide policy text imported into the assistant's memory file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstitutionTemplate {
    #[serde(flatten)]
    pub meta: TemplateMeta,
    pub category: ConstitutionCategory,
    /// Kind of system the policy was written for (`web`, `cli`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_system: Option<String>,
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct LibraryFrontmatter {
    name: String,
    description: String,
    category: ConstitutionCategory,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target_system: Option<String>,
}

impl Template for ConstitutionTemplate {
    type Category = ConstitutionCategory;
    const KIND: ArtifactKind = ArtifactKind::Constitution;
    const EXTENSION: &'static str = "md";

    fn meta(&self) -> &TemplateMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut TemplateMeta {
        &mut self.meta
    }

    fn category(&self) -> ConstitutionCategory {
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
            target_system: fm.target_system,
            body,
        })
    }

    fn render(&self) -> Result<String> {
        let fm = LibraryFrontmatter {
            name: self.meta.name.clone(),
            description: self.meta.description.clone(),
            category: self.category,
            tags: self.meta.tags.clone(),
            target_system: self.target_system.clone(),
        };
        frontmatter::render(&fm, &self.body)
    }
}

impl ConstitutionTemplate {
    /// Deployed form: a heading followed by the policy text, no front matter.
    pub fn to_deployed_file(&self) -> String {
        format!("# {}\n\n{}\n", self.meta.name, self.body.trim())
    }

    /// Import line for the managed section of `CLAUDE.md`.
    pub fn import_line(&self) -> String {
        format!("@.claude/constitutions/{}.md", self.meta.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECURE: &str = "---
name: Secure Defaults
description: Baseline security rules
category: security
target_system: web
---

Never log secrets.
";

    #[test]
    fn parse_with_target_system() {
        let c = ConstitutionTemplate::parse("secure-defaults", SECURE).unwrap();
        assert_eq!(c.category, ConstitutionCategory::Security);
        assert_eq!(c.target_system.as_deref(), Some("web"));
        assert_eq!(c.body, "Never log secrets.\n");
    }

    #[test]
    fn deployed_file_and_import() {
        let c = ConstitutionTemplate::parse("secure-defaults", SECURE).unwrap();
        assert_eq!(
            c.to_deployed_file(),
            "# Secure Defaults\n\nNever log secrets.\n"
        );
        assert_eq!(c.import_line(), "@.claude/constitutions/secure-defaults.md");
    }

    #[test]
    fn category_outside_kind_is_rejected() {
        let bad = SECURE.replace("category: security", "category: devops");
        assert!(ConstitutionTemplate::parse("x", &bad).is_err());
    }
}
