use crate::cmd::open_workspace;
use crate::output::{print_json, print_table};
use anyhow::{bail, Context};
use clap::Subcommand;
use std::path::Path;
use teamforge_core::{
    git::{self, CloneOutcome},
    paths,
    types::ArtifactKind,
};

#[derive(Subcommand)]
pub enum GitSubcommand {
    /// Clone (or pull) the configured repository for a template kind
    Clone {
        /// agent, skill, hook, mcp or constitution
        kind: String,
    },
    /// Show uncommitted changes in the project
    Status,
    /// Commit deployed files
    Commit {
        #[arg(short, long)]
        message: String,
        /// Files to stage (default: everything)
        files: Vec<String>,
    },
}

pub fn run(root: &Path, subcmd: GitSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        GitSubcommand::Clone { kind } => clone(root, &kind, json),
        GitSubcommand::Status => status(root, json),
        GitSubcommand::Commit { message, files } => commit(root, &message, &files, json),
    }
}

fn clone(root: &Path, kind: &str, json: bool) -> anyhow::Result<()> {
    let kind: ArtifactKind = kind.parse()?;
    let mut ws = open_workspace(root)?;
    let Some(repo) = ws.settings.repositories.get(kind).cloned() else {
        bail!(
            "no repository configured for {kind}; run: teamforge config repo {kind} --url <url>"
        );
    };

    let outcome = git::sync_repository(root, kind, &repo)
        .with_context(|| format!("failed to sync {}", repo.url))?;
    ws.reload_libraries();
    let count = match kind {
        ArtifactKind::Agent => ws.libraries.agents.len(),
        ArtifactKind::Skill => ws.libraries.skills.len(),
        ArtifactKind::Hook => ws.libraries.hooks.len(),
        ArtifactKind::McpServer => ws.libraries.mcp_servers.len(),
        ArtifactKind::Constitution => ws.libraries.constitutions.len(),
    };

    if json {
        print_json(&serde_json::json!({
            "kind": kind,
            "url": repo.url,
            "outcome": outcome,
            "templates": count,
        }))?;
    } else {
        let verb = match outcome {
            CloneOutcome::Cloned => "Cloned",
            CloneOutcome::Pulled => "Updated",
        };
        println!(
            "{verb} {} into {}",
            repo.url,
            paths::repo_dir(root, kind).display()
        );
        println!("  {kind} templates available: {count}");
    }
    Ok(())
}

fn status(root: &Path, json: bool) -> anyhow::Result<()> {
    let entries = git::status(root).context("failed to read git status")?;
    if json {
        return print_json(&entries);
    }
    if entries.is_empty() {
        println!("Nothing to commit.");
        return Ok(());
    }
    let rows = entries
        .into_iter()
        .map(|e| vec![e.code, e.path])
        .collect();
    print_table(&["STATUS", "PATH"], rows);
    Ok(())
}

fn commit(root: &Path, message: &str, files: &[String], json: bool) -> anyhow::Result<()> {
    let sha = git::commit(root, message, files).context("failed to commit")?;
    if json {
        print_json(&serde_json::json!({ "sha": sha }))?;
    } else {
        let short = sha.get(..7).unwrap_or(&sha);
        println!("Committed {short}: {message}");
    }
    Ok(())
}
