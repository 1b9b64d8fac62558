//! Markdown files with a leading YAML front-matter block.
//!
//! ```text
//! ---
//! name: code-reviewer
//! description: Reviews diffs
//! ---
//!
//! Body text
//! ```

use crate::error::{Result, TeamforgeError};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Split `content` into its front-matter YAML (if any) and the body.
///
/// Content that does not start with a `---` line has no front matter and is
/// returned whole as the body. An opening delimiter without a matching
/// closing `---` line is an error. Blank lines between the closing delimiter
/// and the body are dropped.
pub fn split(content: &str) -> Result<(Option<&str>, &str)> {
    let rest = if let Some(r) = content.strip_prefix("---\n") {
        r
    } else if let Some(r) = content.strip_prefix("---\r\n") {
        r
    } else {
        return Ok((None, content));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &rest[..offset];
            let body = rest[offset + line.len()..].trim_start_matches(['\n', '\r']);
            return Ok((Some(yaml), body));
        }
        offset += line.len();
    }

    Err(TeamforgeError::Frontmatter(
        "front matter not closed with ---".to_string(),
    ))
}

/// Parse the front matter into `T` and return it with the body.
pub fn parse<T: DeserializeOwned>(content: &str) -> Result<(T, String)> {
    let (yaml, body) = split(content)?;
    let yaml =
        yaml.ok_or_else(|| TeamforgeError::Frontmatter("missing --- delimiter".to_string()))?;
    let meta: T = serde_yaml::from_str(yaml)
        .map_err(|e| TeamforgeError::Frontmatter(e.to_string()))?;
    Ok((meta, body.to_string()))
}

/// Render `meta` as front matter followed by a blank line and `body`.
/// The output always ends with a single trailing newline.
pub fn render<T: Serialize>(meta: &T, body: &str) -> Result<String> {
    let yaml = serde_yaml::to_string(meta)?;
    let body = body.trim_end();
    let mut out = String::with_capacity(yaml.len() + body.len() + 16);
    out.push_str("---\n");
    out.push_str(&yaml);
    if !yaml.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("---\n");
    if !body.is_empty() {
        out.push('\n');
        out.push_str(body);
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Meta {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
    }

    #[test]
    fn split_without_front_matter_returns_body() {
        let (yaml, body) = split("# Just markdown\n").unwrap();
        assert!(yaml.is_none());
        assert_eq!(body, "# Just markdown\n");
    }

    #[test]
    fn split_unclosed_is_error() {
        let err = split("---\nname: x\nbody").unwrap_err();
        assert!(err.to_string().contains("not closed"));
    }

    #[test]
    fn split_ignores_indented_dashes_in_yaml() {
        let content = "---\nname: x\nnotes: |\n  ---\n  kept\n---\nBody\n";
        let (yaml, body) = split(content).unwrap();
        assert!(yaml.unwrap().contains("kept"));
        assert_eq!(body, "Body\n");
    }

    #[test]
    fn split_handles_crlf() {
        let (yaml, body) = split("---\r\nname: x\r\n---\r\n\r\nBody").unwrap();
        assert_eq!(yaml.unwrap(), "name: x\r\n");
        assert_eq!(body, "Body");
    }

    #[test]
    fn parse_reports_bad_yaml() {
        let err = parse::<Meta>("---\nname: [unclosed\n---\n").unwrap_err();
        assert!(matches!(err, TeamforgeError::Frontmatter(_)));
    }

    #[test]
    fn parse_requires_front_matter() {
        assert!(parse::<Meta>("plain body").is_err());
    }

    #[test]
    fn render_layout() {
        let meta = Meta {
            name: "code-reviewer".to_string(),
            model: None,
        };
        let out = render(&meta, "You review code.\n\n").unwrap();
        assert_eq!(out, "---\nname: code-reviewer\n---\n\nYou review code.\n");

        let (parsed, body): (Meta, String) = parse(&out).unwrap();
        assert_eq!(parsed, meta);
        assert_eq!(body, "You review code.\n");
    }
}
