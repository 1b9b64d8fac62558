use crate::output::print_json;
use anyhow::Context;
use std::path::Path;
use teamforge_core::{config::TeamforgeSettings, paths};

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let existed = TeamforgeSettings::exists(root);
    TeamforgeSettings::initialize(root)
        .with_context(|| format!("failed to initialize {}", root.display()))?;

    if json {
        print_json(&serde_json::json!({
            "root": root.display().to_string(),
            "created": !existed,
        }))?;
        return Ok(());
    }

    println!("Initializing teamforge in: {}", root.display());
    let status = if existed { "exists: " } else { "created:" };
    println!("  {status} {}", paths::SETTINGS_FILE);
    println!("  ready:   {}/", paths::TEAMS_DIR);
    println!("  ready:   {}/", paths::TEMPLATES_DIR);
    println!("  ready:   {}/", paths::CLAUDE_AGENTS_DIR);
    println!();
    println!("Next: teamforge analyze, then teamforge team create <slug> --name <name>");
    Ok(())
}
