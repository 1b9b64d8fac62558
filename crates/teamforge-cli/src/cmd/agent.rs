use crate::cmd::open_workspace;
use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use teamforge_core::{analyzer, deploy, io, template::Template};

#[derive(Subcommand)]
pub enum AgentSubcommand {
    /// Render the assistant-facing file for an agent template
    Generate {
        id: String,
        /// Extra instructions appended under "Custom Instructions"
        #[arg(long)]
        instructions: Option<String>,
        /// Write to this path instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Suggest agents for the project from its detected technologies
    Suggest,
}

pub fn run(root: &Path, subcmd: AgentSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        AgentSubcommand::Generate {
            id,
            instructions,
            out,
        } => generate(root, &id, instructions.as_deref(), out.as_deref(), json),
        AgentSubcommand::Suggest => suggest(root, json),
    }
}

fn generate(
    root: &Path,
    id: &str,
    instructions: Option<&str>,
    out: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let ws = open_workspace(root)?;
    let agent = ws.libraries.agents.require(id)?;
    let content = deploy::generate_agent_file(agent, instructions, &ws.settings.agent_defaults())?;

    match out {
        Some(path) => {
            io::atomic_write(path, content.as_bytes())
                .with_context(|| format!("failed to write {}", path.display()))?;
            if json {
                print_json(&serde_json::json!({ "id": id, "path": path.display().to_string() }))?;
            } else {
                println!("Wrote {}", path.display());
            }
        }
        None if json => print_json(&serde_json::json!({ "id": id, "content": content }))?,
        None => print!("{content}"),
    }
    Ok(())
}

/// Union of the analyzer's type-based ids and the library's technology hints.
fn suggest(root: &Path, json: bool) -> anyhow::Result<()> {
    let ws = open_workspace(root)?;
    let (project_type, technologies) = match &ws.settings.project {
        Some(p) => (p.project_type, p.detected_technologies.clone()),
        None => {
            let analysis =
                analyzer::analyze_project(root).context("failed to analyze project")?;
            (analysis.project_type, analysis.detected_technologies)
        }
    };

    let mut ids: BTreeSet<String> = analyzer::suggest_agents(project_type, &technologies)
        .into_iter()
        .collect();
    ids.extend(
        ws.libraries
            .agents
            .suggested_for(&technologies)
            .into_iter()
            .map(|a| a.id().to_string()),
    );

    let rows: Vec<(String, Option<String>)> = ids
        .into_iter()
        .map(|id| {
            let name = ws.libraries.agents.get(&id).map(|a| a.meta.name.clone());
            (id, name)
        })
        .collect();

    if json {
        let agents: Vec<_> = rows
            .iter()
            .map(|(id, name)| {
                serde_json::json!({ "id": id, "name": name, "available": name.is_some() })
            })
            .collect();
        return print_json(&serde_json::json!({
            "project_type": project_type,
            "technologies": technologies,
            "agents": agents,
        }));
    }

    println!("Project type: {project_type}");
    print_table(
        &["ID", "NAME"],
        rows.into_iter()
            .map(|(id, name)| vec![id, name.unwrap_or_else(|| "(not in library)".to_string())])
            .collect(),
    );
    Ok(())
}
