#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn teamforge(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("teamforge").unwrap();
    cmd.current_dir(dir.path())
        .env("TEAMFORGE_ROOT", dir.path())
        .env_remove("RUST_LOG");
    cmd
}

fn init_project(dir: &TempDir) {
    teamforge(dir).arg("init").assert().success();
}

fn json_output(dir: &TempDir, args: &[&str]) -> Value {
    let out = teamforge(dir)
        .args(args)
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&out).unwrap()
}

fn read_json(dir: &TempDir, rel: &str) -> Value {
    let data = std::fs::read_to_string(dir.path().join(rel)).unwrap();
    serde_json::from_str(&data).unwrap()
}

// ---------------------------------------------------------------------------
// teamforge init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_directory_tree() {
    let dir = TempDir::new().unwrap();
    teamforge(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("created: .teamforge/settings.json"));

    assert!(dir.path().join(".teamforge/settings.json").exists());
    assert!(dir.path().join(".teamforge/teams").is_dir());
    assert!(dir.path().join(".teamforge/templates").is_dir());
    assert!(dir.path().join(".claude/agents").is_dir());
    let gitignore = std::fs::read_to_string(dir.path().join(".gitignore")).unwrap();
    assert!(gitignore.contains(".teamforge/repos/"));
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    teamforge(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("exists:"));

    let gitignore = std::fs::read_to_string(dir.path().join(".gitignore")).unwrap();
    assert_eq!(gitignore.matches(".teamforge/repos/").count(), 1);
}

#[test]
fn commands_require_init() {
    let dir = TempDir::new().unwrap();
    teamforge(&dir)
        .args(["team", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

// ---------------------------------------------------------------------------
// teamforge library
// ---------------------------------------------------------------------------

#[test]
fn library_lists_builtin_agents() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    teamforge(&dir)
        .args(["library", "agent", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("code-reviewer"))
        .stdout(predicate::str::contains("builtin"));

    let items = json_output(&dir, &["library", "agents", "list", "--category", "testing"]);
    let ids: Vec<&str> = items
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"code-reviewer"));
    assert!(ids.contains(&"test-engineer"));
    assert!(!ids.contains(&"frontend-developer"));
}

#[test]
fn library_lists_mcp_endpoints() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    teamforge(&dir)
        .args(["library", "mcp", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DETAIL"))
        .stdout(predicate::str::contains("stdio: npx"));
}

#[test]
fn library_search_needs_three_characters() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let all = json_output(&dir, &["library", "mcp", "list"]);
    let short = json_output(&dir, &["library", "mcp", "list", "--search", "gi"]);
    assert_eq!(all.as_array().unwrap().len(), short.as_array().unwrap().len());

    let hits = json_output(&dir, &["library", "mcp", "list", "--search", "GITHUB"]);
    let ids: Vec<&str> = hits
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["github"]);
}

#[test]
fn library_rejects_unknown_kind_and_category() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    teamforge(&dir)
        .args(["library", "widget", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown artifact kind"));

    teamforge(&dir)
        .args(["library", "hook", "list", "--category", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid hook category 'nope'"));
}

#[test]
fn library_show_prints_template() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    teamforge(&dir)
        .args(["library", "agent", "show", "code-reviewer"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Code Reviewer (code-reviewer)"))
        .stdout(predicate::str::contains("Source:      builtin"));

    teamforge(&dir)
        .args(["library", "agent", "show", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("agent template not found: ghost"));
}

#[test]
fn library_create_update_delete_user_agent() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    std::fs::write(dir.path().join("prompt.md"), "You migrate schemas.\n").unwrap();

    teamforge(&dir)
        .args([
            "library",
            "agent",
            "create",
            "migrator",
            "--name",
            "Migrator",
            "--description",
            "Writes migrations",
            "--category",
            "data",
            "--tag",
            "sql",
            "--tools",
            "Read, Edit",
            "--body-file",
            "prompt.md",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created agent 'migrator'"));

    let path = dir.path().join(".teamforge/templates/agents/migrator.md");
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("name: Migrator"));
    assert!(content.contains("You migrate schemas."));

    let shown = json_output(&dir, &["library", "agent", "show", "migrator"]);
    assert_eq!(shown["source"], "user");
    assert_eq!(shown["tools"], serde_json::json!(["Read", "Edit"]));
    assert_eq!(shown["tags"], serde_json::json!(["sql"]));

    teamforge(&dir)
        .args(["library", "agent", "update", "migrator", "--description", "Plans migrations"])
        .assert()
        .success();
    let shown = json_output(&dir, &["library", "agent", "show", "migrator"]);
    assert_eq!(shown["description"], "Plans migrations");
    assert_eq!(shown["name"], "Migrator");
    assert_eq!(shown["system_prompt"], "You migrate schemas.\n");

    teamforge(&dir)
        .args(["library", "agent", "delete", "migrator"])
        .assert()
        .success();
    assert!(!path.exists());
}

#[test]
fn library_create_requires_core_fields() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    teamforge(&dir)
        .args(["library", "skill", "create", "lint", "--name", "Lint"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--description, --category"));
}

#[test]
fn library_create_hook_from_json_fields() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    std::fs::write(
        dir.path().join("hook.json"),
        r#"{"event": "Stop", "command": "echo done", "timeout": 5}"#,
    )
    .unwrap();

    teamforge(&dir)
        .args([
            "library",
            "hook",
            "create",
            "say-done",
            "--name",
            "Say done",
            "--description",
            "Echo on stop",
            "--category",
            "notification",
            "--body-file",
            "hook.json",
        ])
        .assert()
        .success();

    let saved = read_json(&dir, ".teamforge/templates/hooks/say-done.json");
    assert_eq!(saved["event"], "Stop");
    assert_eq!(saved["command"], "echo done");
    assert_eq!(saved["timeout"], 5);
}

#[test]
fn builtin_templates_are_read_only_but_copyable() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    teamforge(&dir)
        .args(["library", "agent", "delete", "code-reviewer"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("read-only"));

    teamforge(&dir)
        .args(["library", "agent", "copy", "code-reviewer", "my-reviewer"])
        .assert()
        .success();
    assert!(dir
        .path()
        .join(".teamforge/templates/agents/my-reviewer.md")
        .exists());

    let shown = json_output(&dir, &["library", "agent", "show", "my-reviewer"]);
    assert_eq!(shown["source"], "user");
    assert_eq!(shown["name"], "Code Reviewer");
}

// ---------------------------------------------------------------------------
// teamforge team
// ---------------------------------------------------------------------------

#[test]
fn team_create_list_delete() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    teamforge(&dir)
        .args(["team", "create", "web", "--name", "Web Team", "--workflow"])
        .assert()
        .success();
    assert!(dir.path().join(".teamforge/teams/web.yaml").exists());

    teamforge(&dir)
        .args(["team", "create", "web", "--name", "Again"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("team already exists: web"));

    let teams = json_output(&dir, &["team", "list"]);
    assert_eq!(teams.as_array().unwrap().len(), 1);
    assert_eq!(teams[0]["workflow"], true);

    teamforge(&dir).args(["team", "delete", "web"]).assert().success();
    teamforge(&dir)
        .args(["team", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No teams"));
}

#[test]
fn team_delete_rejects_path_slugs() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    std::fs::write(dir.path().join("foo.yaml"), "slug: foo\n").unwrap();

    teamforge(&dir)
        .args(["team", "delete", "../../foo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid id"));
    assert!(dir.path().join("foo.yaml").exists());
}

#[test]
fn team_add_validates_template() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    teamforge(&dir)
        .args(["team", "create", "web", "--name", "Web"])
        .assert()
        .success();

    teamforge(&dir)
        .args(["team", "add", "web", "agent", "nonexistent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("agent template not found: nonexistent"));

    teamforge(&dir)
        .args(["team", "add", "web", "skill", "tdd", "--instructions", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("agents only"));
}

#[test]
fn team_ordering_moves_by_rank() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    teamforge(&dir)
        .args(["team", "create", "web", "--name", "Web"])
        .assert()
        .success();
    for id in ["code-reviewer", "test-engineer", "tech-writer"] {
        teamforge(&dir)
            .args(["team", "add", "web", "agent", id])
            .assert()
            .success();
    }

    let moved = json_output(&dir, &["team", "down", "web", "agent", "code-reviewer"]);
    assert_eq!(moved["changed"], true);
    assert_eq!(
        moved["order"],
        serde_json::json!(["test-engineer", "code-reviewer", "tech-writer"])
    );

    let noop = json_output(&dir, &["team", "up", "web", "agent", "test-engineer"]);
    assert_eq!(noop["changed"], false);

    let removed = json_output(&dir, &["team", "remove", "web", "agent", "code-reviewer"]);
    assert_eq!(removed["order"], serde_json::json!(["test-engineer", "tech-writer"]));

    teamforge(&dir)
        .args(["team", "up", "web", "agent", "code-reviewer"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not in team"));
}

fn deployable_team(dir: &TempDir) {
    teamforge(dir)
        .args(["team", "create", "web", "--name", "Web Team"])
        .assert()
        .success();
    for (kind, id) in [
        ("agent", "code-reviewer"),
        ("skill", "tdd"),
        ("hook", "prettier-on-write"),
        ("mcp", "filesystem"),
        ("constitution", "clean-code"),
    ] {
        teamforge(dir)
            .args(["team", "add", "web", kind, id])
            .assert()
            .success();
    }
}

#[test]
fn team_deploy_writes_assistant_files() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    deployable_team(&dir);
    std::fs::create_dir_all(dir.path().join(".claude")).unwrap();
    std::fs::write(
        dir.path().join(".claude/settings.json"),
        r#"{"customKey": 1}"#,
    )
    .unwrap();

    teamforge(&dir)
        .args(["team", "deploy", "web"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deployed 'web'"));

    let agent =
        std::fs::read_to_string(dir.path().join(".claude/agents/code-reviewer.md")).unwrap();
    assert!(agent.starts_with("---\n"));
    assert!(agent.contains("name: code-reviewer"));
    assert!(dir.path().join(".claude/skills/tdd/SKILL.md").exists());
    assert!(dir.path().join(".claude/constitutions/clean-code.md").exists());

    let mcp = read_json(&dir, ".mcp.json");
    assert_eq!(mcp["mcpServers"]["filesystem"]["type"], "stdio");
    assert_eq!(mcp["mcpServers"]["filesystem"]["command"], "npx");

    let settings = read_json(&dir, ".claude/settings.json");
    assert_eq!(settings["customKey"], 1);
    assert_eq!(settings["enabledMcpjsonServers"], serde_json::json!(["filesystem"]));
    let post = settings["hooks"]["PostToolUse"].as_array().unwrap();
    assert_eq!(post.len(), 1);
    assert_eq!(post[0]["matcher"], "Edit|MultiEdit|Write");

    let claude_md = std::fs::read_to_string(dir.path().join("CLAUDE.md")).unwrap();
    assert!(claude_md.contains("<!-- teamforge:start -->"));
    assert!(claude_md.contains("@.claude/constitutions/clean-code.md"));

    let config = json_output(&dir, &["config", "show"]);
    assert_eq!(config["activeTeam"], "web");
}

#[test]
fn team_redeploy_is_idempotent() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    deployable_team(&dir);

    teamforge(&dir).args(["team", "deploy", "web"]).assert().success();
    teamforge(&dir).args(["team", "deploy", "web"]).assert().success();

    let report = json_output(&dir, &["team", "deploy", "web"]);
    let files: Vec<&str> = report["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f.as_str().unwrap())
        .collect();
    assert!(!files.contains(&".mcp.json"));
    assert!(!files.contains(&".claude/settings.json"));

    let settings = read_json(&dir, ".claude/settings.json");
    assert_eq!(settings["hooks"]["PostToolUse"].as_array().unwrap().len(), 1);
    let claude_md = std::fs::read_to_string(dir.path().join("CLAUDE.md")).unwrap();
    assert_eq!(claude_md.matches("<!-- teamforge:start -->").count(), 1);
}

#[test]
fn team_deploy_local_with_flat_skills() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    deployable_team(&dir);

    teamforge(&dir)
        .args(["team", "deploy", "web", "--local", "--flat-skills"])
        .assert()
        .success();

    assert!(dir.path().join(".claude/skills/tdd.md").exists());
    assert!(!dir.path().join(".claude/skills/tdd").exists());
    assert!(dir.path().join(".claude/settings.local.json").exists());
    assert!(!dir.path().join(".claude/settings.json").exists());
}

#[test]
fn team_deploy_applies_agent_instructions() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    teamforge(&dir)
        .args(["team", "create", "api", "--name", "API"])
        .assert()
        .success();
    teamforge(&dir)
        .args([
            "team",
            "add",
            "api",
            "agent",
            "code-reviewer",
            "--instructions",
            "Check every SQL query.",
        ])
        .assert()
        .success();
    teamforge(&dir).args(["team", "deploy", "api"]).assert().success();

    let agent =
        std::fs::read_to_string(dir.path().join(".claude/agents/code-reviewer.md")).unwrap();
    assert!(agent.contains("## Custom Instructions"));
    assert!(agent.contains("Check every SQL query."));
}

// ---------------------------------------------------------------------------
// teamforge agent / analyze
// ---------------------------------------------------------------------------

#[test]
fn agent_generate_prints_and_writes() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    teamforge(&dir)
        .args(["agent", "generate", "test-engineer"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("---\n"))
        .stdout(predicate::str::contains("name: test-engineer"));

    teamforge(&dir)
        .args(["agent", "generate", "test-engineer", "--out", "out/te.md"])
        .assert()
        .success();
    assert!(dir.path().join("out/te.md").exists());
}

#[test]
fn analyze_detects_stack_and_suggests_agents() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    std::fs::write(
        dir.path().join("package.json"),
        r#"{"dependencies": {"react": "18", "express": "4"}, "scripts": {"dev": "vite"}}"#,
    )
    .unwrap();

    let analysis = json_output(&dir, &["analyze"]);
    assert_eq!(analysis["project_type"], "web-fullstack");
    let techs = analysis["detected_technologies"].as_array().unwrap();
    assert!(techs.contains(&Value::from("react")));
    assert!(techs.contains(&Value::from("express")));
    let suggested = analysis["suggested_agents"].as_array().unwrap();
    assert!(suggested.contains(&Value::from("fullstack-developer")));
    assert!(suggested.contains(&Value::from("code-reviewer")));

    let config = json_output(&dir, &["config", "show"]);
    assert_eq!(config["project"]["projectType"], "web-fullstack");

    teamforge(&dir)
        .args(["agent", "suggest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fullstack-developer"))
        .stdout(predicate::str::contains("frontend-developer"));
}

// ---------------------------------------------------------------------------
// teamforge settings
// ---------------------------------------------------------------------------

#[test]
fn settings_rules_merge_and_normalize() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".claude")).unwrap();
    std::fs::write(
        dir.path().join(".claude/settings.json"),
        r#"{"statusLine": {"type": "command"}}"#,
    )
    .unwrap();

    teamforge(&dir)
        .args(["settings", "allow", "Bash(npm test)"])
        .assert()
        .success();
    let s = read_json(&dir, ".claude/settings.json");
    assert_eq!(s["permissions"]["allow"], serde_json::json!(["Bash(npm test)"]));
    assert_eq!(s["statusLine"]["type"], "command");

    teamforge(&dir)
        .args(["settings", "allow", "Bash(npm test)", "--remove"])
        .assert()
        .success();
    let s = read_json(&dir, ".claude/settings.json");
    assert!(s.get("permissions").is_none());
    assert_eq!(s["statusLine"]["type"], "command");
}

#[test]
fn settings_model_env_sandbox_hooks() {
    let dir = TempDir::new().unwrap();

    teamforge(&dir).args(["settings", "model", "opus"]).assert().success();
    teamforge(&dir)
        .args(["settings", "env", "set", "DEBUG", "1"])
        .assert()
        .success();
    teamforge(&dir).args(["settings", "sandbox", "on"]).assert().success();
    teamforge(&dir).args(["settings", "hooks", "off"]).assert().success();
    let s = read_json(&dir, ".claude/settings.json");
    assert_eq!(s["model"], "opus");
    assert_eq!(s["env"]["DEBUG"], "1");
    assert_eq!(s["sandbox"]["enabled"], true);
    assert_eq!(s["disableAllHooks"], true);

    teamforge(&dir).args(["settings", "model", "--reset"]).assert().success();
    teamforge(&dir)
        .args(["settings", "env", "unset", "DEBUG"])
        .assert()
        .success();
    teamforge(&dir).args(["settings", "sandbox", "reset"]).assert().success();
    teamforge(&dir).args(["settings", "hooks", "on"]).assert().success();
    let s = read_json(&dir, ".claude/settings.json");
    assert_eq!(s, serde_json::json!({}));
}

#[test]
fn settings_sandbox_off_is_omitted() {
    let dir = TempDir::new().unwrap();

    teamforge(&dir).args(["settings", "sandbox", "on"]).assert().success();
    assert_eq!(
        read_json(&dir, ".claude/settings.json"),
        serde_json::json!({"sandbox": {"enabled": true}})
    );

    teamforge(&dir).args(["settings", "sandbox", "off"]).assert().success();
    assert_eq!(read_json(&dir, ".claude/settings.json"), serde_json::json!({}));
}

#[test]
fn settings_mcp_enable_disable_local_scope() {
    let dir = TempDir::new().unwrap();

    teamforge(&dir)
        .args(["settings", "mcp", "enable", "github", "--scope", "local"])
        .assert()
        .success();
    let s = read_json(&dir, ".claude/settings.local.json");
    assert_eq!(s["enabledMcpjsonServers"], serde_json::json!(["github"]));

    teamforge(&dir)
        .args(["settings", "mcp", "disable", "github", "--scope", "local"])
        .assert()
        .success();
    let s = read_json(&dir, ".claude/settings.local.json");
    assert!(s.get("enabledMcpjsonServers").is_none());
    assert_eq!(s["disabledMcpjsonServers"], serde_json::json!(["github"]));

    teamforge(&dir)
        .args(["settings", "show", "--scope", "galaxy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown settings scope 'galaxy'"));
}

// ---------------------------------------------------------------------------
// teamforge config
// ---------------------------------------------------------------------------

#[test]
fn config_set_and_validate() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    teamforge(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No warnings"));

    teamforge(&dir)
        .args(["config", "set", "theme", "dark"])
        .assert()
        .success();
    teamforge(&dir)
        .args(["config", "set", "default-tools", "Read, Grep"])
        .assert()
        .success();
    let config = json_output(&dir, &["config", "show"]);
    assert_eq!(config["theme"], "dark");
    assert_eq!(config["defaultTools"], serde_json::json!(["Read", "Grep"]));

    teamforge(&dir)
        .args(["config", "set", "theme", "neon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown theme"));
    teamforge(&dir)
        .args(["config", "set", "active-team", "ghost"])
        .assert()
        .failure();

    teamforge(&dir)
        .args(["config", "set", "developer-mode", "true"])
        .assert()
        .success();
    teamforge(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[warning] developer mode is on"));
}

#[test]
fn config_repo_set_and_clear() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    teamforge(&dir)
        .args([
            "config",
            "repo",
            "skills",
            "--url",
            "https://github.com/acme/skills.git",
            "--branch",
            "main",
        ])
        .assert()
        .success();
    let config = json_output(&dir, &["config", "show"]);
    assert_eq!(
        config["repositories"]["skills"],
        serde_json::json!({"url": "https://github.com/acme/skills.git", "branch": "main"})
    );

    teamforge(&dir)
        .args(["config", "repo", "skills", "--clear"])
        .assert()
        .success();
    let config = json_output(&dir, &["config", "show"]);
    assert!(config["repositories"].get("skills").is_none());

    teamforge(&dir)
        .args(["git", "clone", "skills"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no repository configured"));
}

// ---------------------------------------------------------------------------
// teamforge git
// ---------------------------------------------------------------------------

fn git_available() -> bool {
    std::process::Command::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|o| o.status.success())
}

#[test]
fn git_status_lists_deployed_files() {
    if !git_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let ok = std::process::Command::new("git")
        .args(["init", "--quiet"])
        .current_dir(dir.path())
        .status()
        .unwrap();
    assert!(ok.success());
    init_project(&dir);

    let entries = json_output(&dir, &["git", "status"]);
    let paths: Vec<&str> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["path"].as_str().unwrap())
        .collect();
    assert!(paths.contains(&".gitignore"));
}
