//! Write a team's selected templates into the project's `.claude/` tree.

use crate::agent::{AgentDefaults, AgentTemplate};
use crate::constitution::ConstitutionTemplate;
use crate::error::Result;
use crate::io;
use crate::library::{Libraries, Library};
use crate::mcp::McpFile;
use crate::paths;
use crate::settings::{self, insert_hook, Patch, SettingsPatch, SettingsScope};
use crate::skill::SkillLayout;
use crate::team::Team;
use crate::template::Template;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const MANAGED_START: &str = "<!-- teamforge:start -->";
pub const MANAGED_END: &str = "<!-- teamforge:end -->";

#[derive(Debug, Clone, Default)]
pub struct DeployOptions {
    /// Settings file that receives hooks and MCP enablement.
    pub scope: SettingsScope,
    pub skill_layout: SkillLayout,
    pub agent_defaults: AgentDefaults,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeployReport {
    /// Files written, relative to the project root where possible.
    pub files: Vec<PathBuf>,
    pub hooks_added: usize,
    pub mcp_servers: Vec<String>,
}

/// Render one agent file for the assistant.
pub fn generate_agent_file(
    agent: &AgentTemplate,
    custom_instructions: Option<&str>,
    defaults: &AgentDefaults,
) -> Result<String> {
    agent.to_agent_file(custom_instructions, defaults)
}

fn resolve<'a, T: Template>(library: &'a Library<T>, ids: &[String]) -> Result<Vec<&'a T>> {
    ids.iter().map(|id| library.require(id)).collect()
}

fn relative(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}

pub fn deploy_team(
    root: &Path,
    team: &Team,
    libraries: &Libraries,
    options: &DeployOptions,
) -> Result<DeployReport> {
    let workflow = team.workflow;
    let agents = resolve(&libraries.agents, &team.agents.ids(workflow))?;
    let skills = resolve(&libraries.skills, &team.skills.ids(workflow))?;
    let hooks = resolve(&libraries.hooks, &team.hooks.ids(workflow))?;
    let servers = resolve(&libraries.mcp_servers, &team.mcp_servers.ids(workflow))?;
    let constitutions = resolve(&libraries.constitutions, &team.constitutions.ids(workflow))?;

    let mut report = DeployReport::default();
    let mut write = |path: PathBuf, content: &str| -> Result<()> {
        io::atomic_write(&path, content.as_bytes())?;
        report.files.push(relative(root, &path));
        Ok(())
    };

    for agent in &agents {
        let instructions = team.instructions.get(agent.id()).map(String::as_str);
        let content = generate_agent_file(agent, instructions, &options.agent_defaults)?;
        write(paths::agent_file(root, agent.id()), &content)?;
    }

    for skill in &skills {
        let dir = paths::claude_skills_dir(root);
        let path = match options.skill_layout {
            SkillLayout::Folder => dir.join(skill.id()).join(paths::SKILL_FILE),
            SkillLayout::Flat => dir.join(format!("{}.md", skill.id())),
        };
        write(path, &skill.to_skill_file()?)?;
    }

    for constitution in &constitutions {
        write(
            paths::constitution_file(root, constitution.id()),
            &constitution.to_deployed_file(),
        )?;
    }

    if !servers.is_empty() {
        let mut mcp = McpFile::load(root)?;
        let mut changed = false;
        for server in &servers {
            changed |= mcp.upsert(server.id(), server.server.clone());
        }
        if changed {
            mcp.save(root)?;
            report.files.push(relative(root, &paths::mcp_path(root)));
        }
        report.mcp_servers = servers.iter().map(|s| s.id().to_string()).collect();
    }

    if !hooks.is_empty() || !servers.is_empty() {
        let before = settings::load(root, options.scope)?;
        let mut after = before.clone();

        let mut hook_map = after.hooks.clone().unwrap_or_default();
        for hook in &hooks {
            if insert_hook(&mut hook_map, hook.event, hook.to_matcher_entry()) {
                report.hooks_added += 1;
            }
        }
        if report.hooks_added > 0 {
            after.merge(SettingsPatch {
                hooks: Patch::Set(hook_map),
                ..Default::default()
            });
        }
        for server in &servers {
            let patch = after.enable_mcp_patch(server.id());
            after.merge(patch);
        }

        if after != before {
            let path = options.scope.path(root)?;
            settings::save(root, options.scope, &after)?;
            report.files.push(relative(root, &path));
        }
    }

    let claude_md = paths::claude_md_path(root);
    match managed_section(team, &agents, &constitutions) {
        Some(section) => {
            io::upsert_managed_section(&claude_md, MANAGED_START, MANAGED_END, &section)?;
            report.files.push(relative(root, &claude_md));
        }
        None => {
            if io::replace_between_markers(&claude_md, MANAGED_START, MANAGED_END, "")? {
                report.files.push(relative(root, &claude_md));
            }
        }
    }

    tracing::debug!(
        team = %team.slug,
        files = report.files.len(),
        hooks_added = report.hooks_added,
        "deployed team"
    );
    Ok(report)
}

/// `CLAUDE.md` block: constitution imports and, in workflow mode, the
/// numbered agent order. `None` when the team has neither.
fn managed_section(
    team: &Team,
    agents: &[&AgentTemplate],
    constitutions: &[&ConstitutionTemplate],
) -> Option<String> {
    let show_workflow = team.workflow && !agents.is_empty();
    if constitutions.is_empty() && !show_workflow {
        return None;
    }

    let mut out = format!("{MANAGED_START}\n## Team: {}\n", team.name);
    if !constitutions.is_empty() {
        out.push_str("\n### Constitutions\n\n");
        for c in constitutions {
            out.push_str(&c.import_line());
            out.push('\n');
        }
    }
    if show_workflow {
        out.push_str("\n### Agent workflow\n\nRun these agents in order:\n\n");
        for (i, a) in agents.iter().enumerate() {
            out.push_str(&format!("{}. `{}`: {}\n", i + 1, a.id(), a.meta.description));
        }
    }
    out.push_str(MANAGED_END);
    Some(out)
}
