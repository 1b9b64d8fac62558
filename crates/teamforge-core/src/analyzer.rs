//! Detect a project's technologies from its manifests and suggest agents.

use crate::error::{Result, TeamforgeError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use walkdir::WalkDir;

const MAX_WALK_DEPTH: usize = 5;
const SKIP_DIRS: &[&str] = &[".git", "node_modules", "target"];

/// Below this many counted files a project with no recognizable
/// application framework is treated as a library.
const LIBRARY_FILE_THRESHOLD: usize = 10;

// ---------------------------------------------------------------------------
// ProjectType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectType {
    WebFullstack,
    BackendApi,
    Frontend,
    Mobile,
    Desktop,
    Library,
    #[default]
    Unknown,
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProjectType::WebFullstack => "web-fullstack",
            ProjectType::BackendApi => "backend-api",
            ProjectType::Frontend => "frontend",
            ProjectType::Mobile => "mobile",
            ProjectType::Desktop => "desktop",
            ProjectType::Library => "library",
            ProjectType::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectAnalysis {
    pub project_type: ProjectType,
    pub detected_technologies: Vec<String>,
    /// File count per extension, without the dot.
    pub file_counts: BTreeMap<String, usize>,
    pub total_files: usize,
    pub suggested_agents: Vec<String>,
}

// ---------------------------------------------------------------------------
// Manifest parsers
// ---------------------------------------------------------------------------

/// npm package name → technology.
const NPM_TECHNOLOGIES: &[(&str, &str)] = &[
    ("react", "react"),
    ("react-native", "react-native"),
    ("vue", "vue"),
    ("@angular/core", "angular"),
    ("angular", "angular"),
    ("svelte", "svelte"),
    ("next", "next"),
    ("nuxt", "nuxt"),
    ("express", "express"),
    ("fastify", "fastify"),
    ("koa", "koa"),
    ("nest", "nestjs"),
    ("@nestjs/core", "nestjs"),
    ("electron", "electron"),
    ("@tauri-apps/api", "tauri"),
    ("typescript", "typescript"),
    ("vite", "vite"),
    ("webpack", "webpack"),
    ("jest", "jest"),
    ("vitest", "vitest"),
    ("cypress", "cypress"),
    ("playwright", "playwright"),
    ("@playwright/test", "playwright"),
    ("pg", "postgres"),
    ("mysql2", "mysql"),
    ("mongodb", "mongodb"),
    ("mongoose", "mongodb"),
];

/// Substring of a requirements line → technology.
const PYTHON_TECHNOLOGIES: &[(&str, &str)] = &[
    ("django", "django"),
    ("flask", "flask"),
    ("fastapi", "fastapi"),
    ("tornado", "tornado"),
    ("pyramid", "pyramid"),
    ("pandas", "pandas"),
    ("numpy", "numpy"),
    ("tensorflow", "tensorflow"),
    ("torch", "pytorch"),
    ("scikit-learn", "sklearn"),
    ("pytest", "pytest"),
    ("psycopg", "postgres"),
    ("pymongo", "mongodb"),
];

/// Cargo dependency key → technology.
const CARGO_TECHNOLOGIES: &[(&str, &str)] = &[
    ("actix-web", "actix"),
    ("rocket", "rocket"),
    ("axum", "axum"),
    ("warp", "warp"),
    ("tokio", "tokio"),
    ("async-std", "async-std"),
    ("tauri", "tauri"),
    ("sqlx", "sqlx"),
    ("diesel", "diesel"),
];

/// go.mod module path fragment → technology.
const GO_TECHNOLOGIES: &[(&str, &str)] = &[
    ("gin-gonic/gin", "gin"),
    ("gofiber/fiber", "fiber"),
    ("labstack/echo", "echo"),
    ("gorilla/mux", "gorilla"),
];

fn parse_package_json(content: &str) -> Result<Vec<String>> {
    let package: Value = serde_json::from_str(content)?;
    let mut technologies = Vec::new();
    for section in ["dependencies", "devDependencies"] {
        if let Some(deps) = package.get(section).and_then(Value::as_object) {
            for name in deps.keys() {
                let known = NPM_TECHNOLOGIES
                    .iter()
                    .find(|(dep, _)| *dep == name.as_str());
                if let Some((_, tech)) = known {
                    technologies.push(tech.to_string());
                }
            }
        }
    }
    if let Some(scripts) = package.get("scripts").and_then(Value::as_object) {
        if scripts.contains_key("dev") || scripts.contains_key("start") {
            technologies.push("node".to_string());
        }
    }
    Ok(technologies)
}

fn parse_requirements_txt(content: &str) -> Vec<String> {
    let mut technologies = vec!["python".to_string()];
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let package = line
            .split(|c: char| matches!(c, '=' | '<' | '>' | '~' | '!' | '[' | ';' | ' '))
            .next()
            .unwrap_or_default()
            .to_lowercase();
        for (keyword, tech) in PYTHON_TECHNOLOGIES {
            if package.contains(keyword) {
                technologies.push(tech.to_string());
            }
        }
    }
    technologies
}

fn parse_cargo_toml(content: &str) -> Result<Vec<String>> {
    let manifest: toml::Value = toml::from_str(content)?;
    let mut technologies = vec!["rust".to_string()];
    let tables = ["dependencies", "dev-dependencies"]
        .into_iter()
        .filter_map(|k| manifest.get(k))
        .chain(
            manifest
                .get("workspace")
                .and_then(|w| w.get("dependencies")),
        )
        .filter_map(toml::Value::as_table);
    for deps in tables {
        for (key, tech) in CARGO_TECHNOLOGIES {
            if deps.contains_key(*key) {
                technologies.push(tech.to_string());
            }
        }
    }
    Ok(technologies)
}

fn parse_go_mod(content: &str) -> Vec<String> {
    let mut technologies = vec!["go".to_string()];
    for line in content.lines() {
        for (fragment, tech) in GO_TECHNOLOGIES {
            if line.contains(fragment) {
                technologies.push(tech.to_string());
            }
        }
    }
    technologies
}

/// Read `name` under `root` and run `parse` on it. Missing files yield
/// nothing; unreadable or unparseable ones are logged and skipped.
fn detect(root: &Path, name: &str, parse: impl Fn(&str) -> Result<Vec<String>>) -> Vec<String> {
    let path = root.join(name);
    if !path.is_file() {
        return Vec::new();
    }
    let parsed = std::fs::read_to_string(&path)
        .map_err(TeamforgeError::from)
        .and_then(|content| parse(&content));
    match parsed {
        Ok(techs) => techs,
        Err(e) => {
            tracing::warn!(manifest = %path.display(), error = %e, "skipping unparseable manifest");
            Vec::new()
        }
    }
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

pub fn analyze_project(root: &Path) -> Result<ProjectAnalysis> {
    if !root.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("project directory not found: {}", root.display()),
        )
        .into());
    }

    let mut technologies = Vec::new();
    technologies.extend(detect(root, "package.json", parse_package_json));
    technologies.extend(detect(root, "requirements.txt", |c| {
        Ok(parse_requirements_txt(c))
    }));
    technologies.extend(detect(root, "Cargo.toml", parse_cargo_toml));
    technologies.extend(detect(root, "go.mod", |c| Ok(parse_go_mod(c))));
    if ["Dockerfile", "docker-compose.yml", "compose.yaml"]
        .iter()
        .any(|f| root.join(f).is_file())
    {
        technologies.push("docker".to_string());
    }
    technologies.sort();
    technologies.dedup();

    let (file_counts, total_files) = count_files(root);
    let project_type = classify(&technologies, &file_counts);
    let suggested_agents = suggest_agents(project_type, &technologies);
    tracing::debug!(
        %project_type,
        technologies = technologies.len(),
        total_files,
        "analyzed project"
    );

    Ok(ProjectAnalysis {
        project_type,
        detected_technologies: technologies,
        file_counts,
        total_files,
        suggested_agents,
    })
}

fn count_files(root: &Path) -> (BTreeMap<String, usize>, usize) {
    let mut counts = BTreeMap::new();
    let mut total = 0;
    let walker = WalkDir::new(root)
        .max_depth(MAX_WALK_DEPTH)
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !(e.file_type().is_dir()
                    && SKIP_DIRS.contains(&e.file_name().to_string_lossy().as_ref()))
        });
    for entry in walker.filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
        total += 1;
        if let Some(ext) = entry.path().extension() {
            *counts.entry(ext.to_string_lossy().into_owned()).or_insert(0) += 1;
        }
    }
    (counts, total)
}

fn has_any(technologies: &[String], names: &[&str]) -> bool {
    technologies.iter().any(|t| names.contains(&t.as_str()))
}

pub fn classify(technologies: &[String], file_counts: &BTreeMap<String, usize>) -> ProjectType {
    let frontend = has_any(
        technologies,
        &["react", "vue", "angular", "svelte", "next", "nuxt"],
    );
    let backend = has_any(
        technologies,
        &[
            "express", "fastify", "koa", "nestjs", "django", "flask", "fastapi", "actix",
            "rocket", "axum", "warp", "gin", "fiber", "echo",
        ],
    );
    let mobile = has_any(technologies, &["react-native", "flutter"])
        || file_counts.contains_key("swift")
        || file_counts.contains_key("kt");
    let desktop = has_any(technologies, &["tauri", "electron"]);

    match (frontend, backend, mobile, desktop) {
        (true, true, _, _) => ProjectType::WebFullstack,
        (_, true, false, false) => ProjectType::BackendApi,
        (true, false, false, false) => ProjectType::Frontend,
        (_, _, true, _) => ProjectType::Mobile,
        (_, _, _, true) => ProjectType::Desktop,
        _ if file_counts.values().sum::<usize>() < LIBRARY_FILE_THRESHOLD => {
            ProjectType::Library
        }
        _ => ProjectType::Unknown,
    }
}

/// Agent ids worth adding for this kind of project, sorted and unique.
pub fn suggest_agents(project_type: ProjectType, technologies: &[String]) -> Vec<String> {
    let mut agents = vec!["code-reviewer", "test-engineer"];
    agents.extend_from_slice(match project_type {
        ProjectType::WebFullstack => &[
            "fullstack-developer",
            "api-designer",
            "frontend-developer",
            "backend-developer",
        ][..],
        ProjectType::BackendApi => &["backend-developer", "api-designer", "database-designer"],
        ProjectType::Frontend => &["frontend-developer", "ux-designer"],
        ProjectType::Mobile => &["mobile-developer", "ux-designer"],
        ProjectType::Desktop => &["frontend-developer", "backend-developer"],
        ProjectType::Library => &["tech-writer", "api-documenter"],
        ProjectType::Unknown => &["fullstack-developer"],
    });
    if technologies.iter().any(|t| t.contains("docker")) {
        agents.push("docker-specialist");
    }
    if has_any(technologies, &["postgres", "mysql", "mongodb"]) {
        agents.push("database-designer");
    }
    if has_any(
        technologies,
        &["jest", "vitest", "pytest", "cypress", "playwright"],
    ) {
        agents.push("e2e-tester");
    }
    agents.sort_unstable();
    agents.dedup();
    agents.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn techs(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn package_json_frameworks_and_node() {
        let mut t = parse_package_json(
            r#"{"dependencies": {"react": "18", "express": "4"},
                "devDependencies": {"vitest": "1"},
                "scripts": {"dev": "vite"}}"#,
        )
        .unwrap();
        t.sort();
        assert_eq!(t, techs(&["express", "node", "react", "vitest"]));
    }

    #[test]
    fn requirements_strip_version_specifiers() {
        let t = parse_requirements_txt(
            "# deps\nDjango>=4.2\nfastapi[all]==0.110\n\npsycopg2-binary\n",
        );
        assert_eq!(t, techs(&["python", "django", "fastapi", "postgres"]));
    }

    #[test]
    fn cargo_workspace_dependencies_count() {
        let t = parse_cargo_toml(
            "[workspace]\nmembers = []\n[workspace.dependencies]\naxum = \"0.7\"\ntokio = \"1\"\n",
        )
        .unwrap();
        assert_eq!(t, techs(&["rust", "axum", "tokio"]));
    }

    #[test]
    fn classify_table() {
        let none = BTreeMap::new();
        assert_eq!(
            classify(&techs(&["react", "express"]), &none),
            ProjectType::WebFullstack
        );
        assert_eq!(classify(&techs(&["django"]), &none), ProjectType::BackendApi);
        assert_eq!(classify(&techs(&["vue"]), &none), ProjectType::Frontend);
        assert_eq!(
            classify(&techs(&["react", "react-native"]), &none),
            ProjectType::Mobile
        );
        assert_eq!(classify(&techs(&["tauri"]), &none), ProjectType::Desktop);
        assert_eq!(classify(&techs(&["rust"]), &none), ProjectType::Library);

        let mut many = BTreeMap::new();
        many.insert("rs".to_string(), 40);
        assert_eq!(classify(&techs(&["rust"]), &many), ProjectType::Unknown);
    }

    #[test]
    fn suggestions_are_sorted_and_unique() {
        let s = suggest_agents(ProjectType::BackendApi, &techs(&["postgres", "jest"]));
        assert_eq!(
            s,
            techs(&[
                "api-designer",
                "backend-developer",
                "code-reviewer",
                "database-designer",
                "e2e-tester",
                "test-engineer",
            ])
        );
    }

    #[test]
    fn analyze_skips_vendor_dirs_and_bad_manifests() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("package.json"), "{ broken").unwrap();
        std::fs::write(
            dir.path().join("go.mod"),
            "module x\nrequire github.com/gin-gonic/gin v1.9.1\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("main.go"), "package main").unwrap();
        std::fs::create_dir_all(dir.path().join("node_modules/left-pad")).unwrap();
        std::fs::write(dir.path().join("node_modules/left-pad/index.js"), "").unwrap();

        let a = analyze_project(dir.path()).unwrap();
        assert_eq!(a.detected_technologies, techs(&["gin", "go"]));
        assert_eq!(a.project_type, ProjectType::BackendApi);
        assert_eq!(a.total_files, 3);
        assert_eq!(a.file_counts.get("js"), None);
        assert_eq!(a.file_counts.get("go"), Some(&1));
        assert!(a.suggested_agents.contains(&"code-reviewer".to_string()));
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(analyze_project(&dir.path().join("nope")).is_err());
    }
}
