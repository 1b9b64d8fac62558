//! Thin wrapper over the `git` binary for template repositories and for
//! committing deployed files.

use crate::config::RepoSource;
use crate::error::{Result, TeamforgeError};
use crate::paths;
use crate::types::ArtifactKind;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Command;

fn git_bin() -> Result<PathBuf> {
    which::which("git").map_err(|_| TeamforgeError::GitNotInstalled)
}

/// Run git with `args` in `dir`; stdout on success, stderr as the error.
fn run(dir: Option<&Path>, args: &[&str]) -> Result<String> {
    let mut cmd = Command::new(git_bin()?);
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }
    let output = cmd
        .args(args)
        .output()
        .map_err(|e| TeamforgeError::Git(e.to_string()))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(TeamforgeError::Git(stderr.trim().to_string()));
    }
    tracing::debug!(args = ?args, "git ok");
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

pub fn is_repo(path: &Path) -> bool {
    path.join(".git").exists()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CloneOutcome {
    Cloned,
    Pulled,
}

/// Shallow-clone `url` into `dest`, or fast-forward it if `dest` is
/// already a checkout.
pub fn clone(url: &str, dest: &Path, branch: Option<&str>) -> Result<CloneOutcome> {
    if is_repo(dest) {
        pull(dest)?;
        return Ok(CloneOutcome::Pulled);
    }
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dest_str = dest.to_string_lossy();
    let mut args = vec!["clone", "--depth", "1"];
    if let Some(b) = branch.filter(|b| !b.is_empty()) {
        args.extend(["--branch", b]);
    }
    args.extend(["--", url, &*dest_str]);
    run(None, &args)?;
    Ok(CloneOutcome::Cloned)
}

pub fn pull(path: &Path) -> Result<()> {
    run(Some(path), &["pull", "--ff-only"])?;
    Ok(())
}

/// Clone or update the library repository for `kind` under `.teamforge/repos/`.
pub fn sync_repository(root: &Path, kind: ArtifactKind, repo: &RepoSource) -> Result<CloneOutcome> {
    clone(&repo.url, &paths::repo_dir(root, kind), repo.branch.as_deref())
}

pub fn init(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    run(Some(path), &["init", "--quiet"])?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusEntry {
    /// Porcelain status code, e.g. `M`, `A`, `??`.
    pub code: String,
    pub path: String,
}

fn parse_porcelain(out: &str) -> Vec<StatusEntry> {
    out.lines()
        .filter(|l| l.len() > 3)
        .map(|l| {
            let rest = &l[3..];
            let path = rest.rsplit_once(" -> ").map_or(rest, |(_, to)| to);
            StatusEntry {
                code: l[..2].trim().to_string(),
                path: path.to_string(),
            }
        })
        .collect()
}

pub fn status(path: &Path) -> Result<Vec<StatusEntry>> {
    let out = run(Some(path), &["status", "--porcelain=v1"])?;
    Ok(parse_porcelain(&out))
}

/// Stage `files` (everything when empty), commit, and return the new sha.
pub fn commit(path: &Path, message: &str, files: &[String]) -> Result<String> {
    if files.is_empty() {
        run(Some(path), &["add", "--all"])?;
    } else {
        let mut args = vec!["add", "--"];
        args.extend(files.iter().map(String::as_str));
        run(Some(path), &args)?;
    }
    run(Some(path), &["commit", "--quiet", "-m", message])?;
    let sha = run(Some(path), &["rev-parse", "HEAD"])?;
    Ok(sha.trim().to_string())
}
