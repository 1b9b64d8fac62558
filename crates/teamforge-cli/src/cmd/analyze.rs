use crate::cmd::open_workspace;
use crate::output::{join_or_dash, print_json, print_table};
use anyhow::Context;
use std::path::Path;
use teamforge_core::{analyzer, config::ProjectInfo};

/// Analyze the project and cache the result in the tool settings.
pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let mut ws = open_workspace(root)?;
    let analysis = analyzer::analyze_project(root).context("failed to analyze project")?;

    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string());
    ws.settings.project = Some(ProjectInfo::from_analysis(name, &analysis));
    ws.save_settings().context("failed to save settings")?;

    if json {
        return print_json(&analysis);
    }

    println!("Project type:  {}", analysis.project_type);
    println!(
        "Technologies:  {}",
        join_or_dash(&analysis.detected_technologies)
    );
    println!("Files:         {}", analysis.total_files);

    if !analysis.file_counts.is_empty() {
        println!();
        let mut counts: Vec<(&String, &usize)> = analysis.file_counts.iter().collect();
        counts.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
        let rows = counts
            .into_iter()
            .take(10)
            .map(|(ext, n)| vec![ext.clone(), n.to_string()])
            .collect();
        print_table(&["EXTENSION", "FILES"], rows);
    }

    println!();
    println!("Suggested agents:");
    for id in &analysis.suggested_agents {
        let marker = if ws.libraries.agents.get(id).is_some() {
            ""
        } else {
            "  (not in library)"
        };
        println!("  {id}{marker}");
    }
    Ok(())
}
