use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically write `data` to `path` using a tempfile in the same directory.
/// Prevents partial writes from corrupting settings and template files.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    tracing::debug!(path = %path.display(), bytes = data.len(), "wrote file");
    Ok(())
}

/// Create a directory and all parents, idempotent.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Read a JSON file, treating a missing file as `T::default()`.
pub fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let data = std::fs::read_to_string(path)?;
    if data.trim().is_empty() {
        return Ok(T::default());
    }
    Ok(serde_json::from_str(&data)?)
}

/// Pretty-print `value` as JSON (two-space indent, trailing newline) and write atomically.
pub fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut data = serde_json::to_string_pretty(value)?;
    data.push('\n');
    atomic_write(path, data.as_bytes())
}

/// Replace content between `start_marker` and `end_marker` (inclusive) in a file.
///
/// Returns `true` if both markers were found and the file was updated, `false`
/// if the file or either marker is missing (file unchanged).
pub fn replace_between_markers(
    path: &Path,
    start_marker: &str,
    end_marker: &str,
    replacement: &str,
) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    let content = std::fs::read_to_string(path)?;
    let Some(start_pos) = content.find(start_marker) else {
        return Ok(false);
    };
    let search_from = start_pos + start_marker.len();
    let Some(end_offset) = content[search_from..].find(end_marker) else {
        return Ok(false);
    };
    let end_pos = search_from + end_offset + end_marker.len();

    let mut updated = String::with_capacity(content.len());
    updated.push_str(&content[..start_pos]);
    updated.push_str(replacement);
    updated.push_str(&content[end_pos..]);

    atomic_write(path, updated.as_bytes())?;
    Ok(true)
}

/// Write `section` (which must itself start with `start_marker` and end with
/// `end_marker`) into `path`: replaced in place when the markers exist,
/// appended after a blank line otherwise.
pub fn upsert_managed_section(
    path: &Path,
    start_marker: &str,
    end_marker: &str,
    section: &str,
) -> Result<()> {
    if replace_between_markers(path, start_marker, end_marker, section)? {
        return Ok(());
    }
    let existing = if path.exists() {
        std::fs::read_to_string(path)?
    } else {
        String::new()
    };
    let sep = if existing.is_empty() {
        ""
    } else if existing.ends_with("\n\n") {
        ""
    } else if existing.ends_with('\n') {
        "\n"
    } else {
        "\n\n"
    };
    let updated = format!("{existing}{sep}{section}\n");
    atomic_write(path, updated.as_bytes())
}

/// Add `entry` to `root/.gitignore` if it isn't already present.
///
/// Checks for an exact line match. Appends with a leading newline separator
/// if the file doesn't already end with one.
pub fn ensure_gitignore_entry(root: &Path, entry: &str) -> Result<()> {
    let gitignore = root.join(".gitignore");
    let existing = if gitignore.exists() {
        std::fs::read_to_string(&gitignore)?
    } else {
        String::new()
    };
    if existing.lines().any(|l| l == entry) {
        return Ok(());
    }
    let sep = if existing.is_empty() || existing.ends_with('\n') {
        ""
    } else {
        "\n"
    };
    let mut f = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&gitignore)?;
    writeln!(f, "{sep}{entry}")?;
    Ok(())
}
