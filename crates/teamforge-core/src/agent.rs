use crate::error::Result;
use crate::frontmatter;
use crate::template::{join_list, string_or_list, Template, TemplateMeta, TemplateSource};
use crate::types::{AgentCategory, ArtifactKind};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// AgentTemplate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentTemplate {
    #[serde(flatten)]
    pub meta: TemplateMeta,
    pub category: AgentCategory,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Technology hints used to suggest this agent for an analyzed project.
    #[serde(default)]
    pub suggested_for: Vec<String>,
    pub system_prompt: String,
}

/// Front matter of an agent file in a template library.
#[derive(Debug, Serialize, Deserialize)]
struct LibraryFrontmatter {
    name: String,
    description: String,
    category: AgentCategory,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
    #[serde(
        default,
        deserialize_with = "string_or_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    tools: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    suggested_for: Vec<String>,
}

impl Template for AgentTemplate {
    type Category = AgentCategory;
    const KIND: ArtifactKind = ArtifactKind::Agent;
    const EXTENSION: &'static str = "md";

    fn meta(&self) -> &TemplateMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut TemplateMeta {
        &mut self.meta
    }

    fn category(&self) -> AgentCategory {
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
            tools: fm.tools,
            model: fm.model,
            suggested_for: fm.suggested_for,
            system_prompt: body,
        })
    }

    fn render(&self) -> Result<String> {
        let fm = LibraryFrontmatter {
            name: self.meta.name.clone(),
            description: self.meta.description.clone(),
            category: self.category,
            tags: self.meta.tags.clone(),
            tools: self.tools.clone(),
            model: self.model.clone(),
            suggested_for: self.suggested_for.clone(),
        };
        frontmatter::render(&fm, &self.system_prompt)
    }
}

// ---------------------------------------------------------------------------
// Deployed agent file
// ---------------------------------------------------------------------------

/// Values filled in when a template leaves `model` or `tools` unset.
#[derive(Debug, Clone, Default)]
pub struct AgentDefaults {
    pub model: Option<String>,
    pub tools: Vec<String>,
}

/// Front matter of `.claude/agents/<id>.md` as the assistant reads it.
/// `tools` is a comma-separated list; omitting it grants every tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentFileFrontmatter {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl AgentTemplate {
    /// Render the assistant-facing agent file. `name` is the template id,
    /// since the assistant addresses agents by that kebab-case name.
    pub fn to_agent_file(
        &self,
        custom_instructions: Option<&str>,
        defaults: &AgentDefaults,
    ) -> Result<String> {
        let tools = if self.tools.is_empty() {
            &defaults.tools
        } else {
            &self.tools
        };
        let fm = AgentFileFrontmatter {
            name: self.meta.id.clone(),
            description: self.meta.description.clone(),
            tools: join_list(tools),
            model: self.model.clone().or_else(|| defaults.model.clone()),
        };

        let mut body = self.system_prompt.trim_end().to_string();
        if let Some(instructions) = custom_instructions.map(str::trim).filter(|s| !s.is_empty()) {
            body.push_str("\n\n## Custom Instructions\n\n");
            body.push_str(instructions);
        }
        frontmatter::render(&fm, &body)
    }

    /// Case-insensitive containment either way between any hint and any
    /// detected technology (`react` matches `react-native` and vice versa).
    pub fn is_suggested_for(&self, technologies: &[String]) -> bool {
        self.suggested_for.iter().any(|hint| {
            let hint = hint.to_lowercase();
            technologies.iter().any(|t| {
                let t = t.to_lowercase();
                t.contains(&hint) || hint.contains(&t)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REVIEWER: &str = "---
name: Code Reviewer
description: Reviews changes for correctness
category: testing
tags: [review, quality]
tools: Read, Grep
model: sonnet
suggested_for: [typescript, rust]
---

You are a meticulous code reviewer.
";

    #[test]
    fn parse_library_file() {
        let agent = AgentTemplate::parse("code-reviewer", REVIEWER).unwrap();
        assert_eq!(agent.meta.id, "code-reviewer");
        assert_eq!(agent.meta.name, "Code Reviewer");
        assert_eq!(agent.category, AgentCategory::Testing);
        assert_eq!(agent.tools, vec!["Read", "Grep"]);
        assert_eq!(agent.model.as_deref(), Some("sonnet"));
        assert_eq!(agent.system_prompt, "You are a meticulous code reviewer.\n");
    }

    #[test]
    fn render_then_parse_preserves_fields() {
        let agent = AgentTemplate::parse("code-reviewer", REVIEWER).unwrap();
        let again = AgentTemplate::parse("code-reviewer", &agent.render().unwrap()).unwrap();
        assert_eq!(again, agent);
    }

    #[test]
    fn agent_file_shape() {
        let agent = AgentTemplate::parse("code-reviewer", REVIEWER).unwrap();
        let out = agent
            .to_agent_file(None, &AgentDefaults::default())
            .unwrap();
        assert_eq!(
            out,
            "---\nname: code-reviewer\ndescription: Reviews changes for correctness\n\
             tools: Read, Grep\nmodel: sonnet\n---\n\nYou are a meticulous code reviewer.\n"
        );
    }

    #[test]
    fn agent_file_custom_instructions_and_defaults() {
        let mut agent = AgentTemplate::parse("code-reviewer", REVIEWER).unwrap();
        agent.tools.clear();
        agent.model = None;
        let defaults = AgentDefaults {
            model: Some("opus".to_string()),
            tools: vec!["Read".to_string()],
        };
        let out = agent
            .to_agent_file(Some("Focus on SQL injection."), &defaults)
            .unwrap();
        let (fm, body): (AgentFileFrontmatter, String) = frontmatter::parse(&out).unwrap();
        assert_eq!(fm.model.as_deref(), Some("opus"));
        assert_eq!(fm.tools.as_deref(), Some("Read"));
        assert!(body.ends_with("## Custom Instructions\n\nFocus on SQL injection.\n"));
    }

    #[test]
    fn agent_file_omits_unset_tools_and_model() {
        let mut agent = AgentTemplate::parse("code-reviewer", REVIEWER).unwrap();
        agent.tools.clear();
        agent.model = None;
        let out = agent
            .to_agent_file(Some("   "), &AgentDefaults::default())
            .unwrap();
        assert!(!out.contains("tools:"));
        assert!(!out.contains("model:"));
        assert!(!out.contains("Custom Instructions"));
    }

    #[test]
    fn suggestion_matches_either_direction() {
        let agent = AgentTemplate::parse("code-reviewer", REVIEWER).unwrap();
        assert!(agent.is_suggested_for(&["TypeScript".to_string()]));
        assert!(agent.is_suggested_for(&["rust-analyzer".to_string()]));
        assert!(!agent.is_suggested_for(&["python".to_string()]));
    }
}
