use crate::cmd::open_workspace;
use crate::output::{print_json, print_table};
use anyhow::{bail, Context};
use clap::{Subcommand, ValueEnum};
use std::path::Path;
use teamforge_core::{
    deploy::DeployOptions,
    settings::SettingsScope,
    skill::SkillLayout,
    team::Team,
    types::ArtifactKind,
    workspace::Workspace,
};

#[derive(Subcommand)]
pub enum TeamSubcommand {
    /// Create an empty team
    Create {
        slug: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Order agents by rank and write the order to CLAUDE.md
        #[arg(long)]
        workflow: bool,
    },
    /// List teams
    List,
    /// Show a team's selections in deploy order
    Show { slug: String },
    /// Delete a team (deployed files are left in place)
    Delete { slug: String },
    /// Select a template for a team
    Add {
        slug: String,
        kind: String,
        id: String,
        /// Extra instructions appended to the deployed agent file (agents only)
        #[arg(long)]
        instructions: Option<String>,
    },
    /// Deselect a template
    Remove { slug: String, kind: String, id: String },
    /// Move a template one rank earlier
    Up { slug: String, kind: String, id: String },
    /// Move a template one rank later
    Down { slug: String, kind: String, id: String },
    /// Turn workflow ordering on or off
    Workflow { slug: String, state: Toggle },
    /// Write the team's files into .claude/, .mcp.json and CLAUDE.md
    Deploy {
        slug: String,
        /// Write hooks and MCP enablement to settings.local.json
        #[arg(long)]
        local: bool,
        /// Write skills as .claude/skills/<id>.md instead of <id>/SKILL.md
        #[arg(long)]
        flat_skills: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

pub fn run(root: &Path, subcmd: TeamSubcommand, json: bool) -> anyhow::Result<()> {
    let ws = open_workspace(root)?;
    match subcmd {
        TeamSubcommand::Create {
            slug,
            name,
            description,
            workflow,
        } => create(&ws, &slug, &name, description, workflow, json),
        TeamSubcommand::List => list(&ws, json),
        TeamSubcommand::Show { slug } => show(&ws, &slug, json),
        TeamSubcommand::Delete { slug } => delete(ws, &slug, json),
        TeamSubcommand::Add {
            slug,
            kind,
            id,
            instructions,
        } => add(&ws, &slug, &kind, &id, instructions, json),
        TeamSubcommand::Remove { slug, kind, id } => {
            edit(&ws, &slug, &kind, &id, Edit::Remove, json)
        }
        TeamSubcommand::Up { slug, kind, id } => edit(&ws, &slug, &kind, &id, Edit::Up, json),
        TeamSubcommand::Down { slug, kind, id } => edit(&ws, &slug, &kind, &id, Edit::Down, json),
        TeamSubcommand::Workflow { slug, state } => workflow(&ws, &slug, state, json),
        TeamSubcommand::Deploy {
            slug,
            local,
            flat_skills,
        } => deploy(ws, &slug, local, flat_skills, json),
    }
}

fn load(ws: &Workspace, slug: &str) -> anyhow::Result<Team> {
    Team::load(ws.root(), slug).with_context(|| format!("cannot load team '{slug}'"))
}

fn save(ws: &Workspace, team: &Team) -> anyhow::Result<()> {
    team.save(ws.root()).context("failed to save team")
}

// ---------------------------------------------------------------------------
// create / list / show / delete
// ---------------------------------------------------------------------------

fn create(
    ws: &Workspace,
    slug: &str,
    name: &str,
    description: Option<String>,
    workflow: bool,
    json: bool,
) -> anyhow::Result<()> {
    let mut team = Team::create(ws.root(), slug, name)
        .with_context(|| format!("failed to create team '{slug}'"))?;
    if description.is_some() || workflow {
        team.description = description;
        team.set_workflow(workflow);
        save(ws, &team)?;
    }

    if json {
        print_json(&team)?;
    } else {
        println!("Created team '{slug}' ({name})");
    }
    Ok(())
}

fn list(ws: &Workspace, json: bool) -> anyhow::Result<()> {
    let teams = Team::list(ws.root()).context("failed to list teams")?;
    if json {
        return print_json(&teams);
    }
    if teams.is_empty() {
        println!("No teams. Create one with: teamforge team create <slug> --name <name>");
        return Ok(());
    }

    let active = ws.settings.active_team.as_deref();
    let rows = teams
        .iter()
        .map(|t| {
            let marker = if active == Some(t.slug.as_str()) { "*" } else { "" };
            vec![
                format!("{}{marker}", t.slug),
                t.name.clone(),
                t.member_count().to_string(),
                if t.workflow { "on" } else { "off" }.to_string(),
                t.updated_at.format("%Y-%m-%d %H:%M").to_string(),
            ]
        })
        .collect();
    print_table(&["SLUG", "NAME", "MEMBERS", "WORKFLOW", "UPDATED"], rows);
    Ok(())
}

fn show(ws: &Workspace, slug: &str, json: bool) -> anyhow::Result<()> {
    let team = load(ws, slug)?;
    if json {
        return print_json(&team);
    }

    println!("{} ({})", team.name, team.slug);
    if let Some(d) = &team.description {
        println!("{d}");
    }
    println!("Workflow: {}", if team.workflow { "on" } else { "off" });

    for kind in ArtifactKind::all() {
        let ids = team.selection(*kind).ids(team.workflow);
        println!();
        println!("{} ({}):", kind.dir_name(), ids.len());
        for (i, id) in ids.iter().enumerate() {
            let missing = if ws.libraries.contains(*kind, id) {
                ""
            } else {
                "  (missing from library)"
            };
            let note = if *kind == ArtifactKind::Agent && team.instructions.contains_key(id) {
                "  +instructions"
            } else {
                ""
            };
            println!("  {}. {id}{note}{missing}", i + 1);
        }
    }
    Ok(())
}

fn delete(mut ws: Workspace, slug: &str, json: bool) -> anyhow::Result<()> {
    Team::delete(ws.root(), slug).with_context(|| format!("failed to delete team '{slug}'"))?;
    if ws.settings.active_team.as_deref() == Some(slug) {
        ws.settings.active_team = None;
        ws.save_settings().context("failed to save settings")?;
    }

    if json {
        print_json(&serde_json::json!({ "slug": slug, "deleted": true }))?;
    } else {
        println!("Deleted team '{slug}'");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Selection edits
// ---------------------------------------------------------------------------

fn add(
    ws: &Workspace,
    slug: &str,
    kind: &str,
    id: &str,
    instructions: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let kind: ArtifactKind = kind.parse()?;
    if !ws.libraries.contains(kind, id) {
        bail!("{kind} template not found: {id}");
    }
    if instructions.is_some() && kind != ArtifactKind::Agent {
        bail!("--instructions applies to agents only");
    }

    let mut team = load(ws, slug)?;
    let added = team.selection_mut(kind).select(id);
    if let Some(text) = instructions {
        if text.trim().is_empty() {
            team.instructions.remove(id);
        } else {
            team.instructions.insert(id.to_string(), text);
        }
    }
    save(ws, &team)?;

    let rank = team.selection(kind).rank(id);
    if json {
        print_json(&serde_json::json!({
            "slug": slug, "kind": kind, "id": id, "added": added, "rank": rank,
        }))?;
    } else if added {
        println!("Added {kind} '{id}' to '{slug}'");
    } else {
        println!("{kind} '{id}' is already in '{slug}'");
    }
    Ok(())
}

#[derive(Clone, Copy)]
enum Edit {
    Remove,
    Up,
    Down,
}

fn edit(
    ws: &Workspace,
    slug: &str,
    kind: &str,
    id: &str,
    op: Edit,
    json: bool,
) -> anyhow::Result<()> {
    let kind: ArtifactKind = kind.parse()?;
    let mut team = load(ws, slug)?;
    if !team.selection(kind).contains(id) {
        bail!("{kind} '{id}' is not in team '{slug}'");
    }

    let changed = match op {
        Edit::Remove => {
            if kind == ArtifactKind::Agent {
                team.instructions.remove(id);
            }
            team.selection_mut(kind).deselect(id)
        }
        Edit::Up => team.selection_mut(kind).move_up(id),
        Edit::Down => team.selection_mut(kind).move_down(id),
    };
    if changed {
        save(ws, &team)?;
    }

    let order = team.selection(kind).ids(true);
    if json {
        print_json(&serde_json::json!({
            "slug": slug, "kind": kind, "id": id, "changed": changed, "order": order,
        }))?;
    } else if !changed {
        println!("No change");
    } else if matches!(op, Edit::Remove) {
        println!("Removed {kind} '{id}' from '{slug}'");
    } else {
        println!("{} order: {}", kind.dir_name(), order.join(" > "));
    }
    Ok(())
}

fn workflow(ws: &Workspace, slug: &str, state: Toggle, json: bool) -> anyhow::Result<()> {
    let mut team = load(ws, slug)?;
    team.set_workflow(matches!(state, Toggle::On));
    save(ws, &team)?;

    if json {
        print_json(&serde_json::json!({ "slug": slug, "workflow": team.workflow }))?;
    } else {
        println!(
            "Workflow {} for '{slug}'",
            if team.workflow { "on" } else { "off" }
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// deploy
// ---------------------------------------------------------------------------

fn deploy(
    mut ws: Workspace,
    slug: &str,
    local: bool,
    flat_skills: bool,
    json: bool,
) -> anyhow::Result<()> {
    let team = load(&ws, slug)?;
    let options = DeployOptions {
        scope: if local {
            SettingsScope::Local
        } else {
            SettingsScope::Project
        },
        skill_layout: if flat_skills {
            SkillLayout::Flat
        } else {
            SkillLayout::Folder
        },
        ..Default::default()
    };
    let report = ws
        .deploy(&team, options)
        .with_context(|| format!("failed to deploy team '{slug}'"))?;

    ws.settings.active_team = Some(slug.to_string());
    ws.save_settings().context("failed to save settings")?;

    if json {
        return print_json(&report);
    }

    println!("Deployed '{slug}' ({} files)", report.files.len());
    for file in &report.files {
        println!("  wrote: {}", file.display());
    }
    if report.hooks_added > 0 {
        println!("  hooks added: {}", report.hooks_added);
    }
    if !report.mcp_servers.is_empty() {
        println!("  mcp servers enabled: {}", report.mcp_servers.join(", "));
    }
    Ok(())
}
