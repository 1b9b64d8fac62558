use crate::error::{Result, TeamforgeError};
use crate::io;
use crate::paths;
use crate::template::{Template, TemplateMeta, TemplateSource};
use crate::types::{ArtifactKind, McpCategory};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// McpServerConfig
// ---------------------------------------------------------------------------

/// Connection descriptor for one MCP server, in `.mcp.json` entry shape.
///
/// On disk this is a flat object with an optional `type` discriminator;
/// entries without `type` are stdio when they carry a `command` and http
/// when they carry a `url`. Keys outside the transport's fields (`cwd`,
/// `timeout`, `oauth`, ...) are kept in `extra` and written back as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMcpServer", into = "RawMcpServer")]
pub enum McpServerConfig {
    Stdio {
        command: String,
        args: Vec<String>,
        env: BTreeMap<String, String>,
        extra: Map<String, Value>,
    },
    Http {
        url: String,
        headers: BTreeMap<String, String>,
        env: BTreeMap<String, String>,
        extra: Map<String, Value>,
    },
    Sse {
        url: String,
        headers: BTreeMap<String, String>,
        env: BTreeMap<String, String>,
        extra: Map<String, Value>,
    },
}

impl McpServerConfig {
    /// Stdio server with no env and no extra keys.
    pub fn stdio(command: impl Into<String>, args: Vec<String>) -> Self {
        McpServerConfig::Stdio {
            command: command.into(),
            args,
            env: BTreeMap::new(),
            extra: Map::new(),
        }
    }

    pub fn transport(&self) -> &'static str {
        match self {
            McpServerConfig::Stdio { .. } => "stdio",
            McpServerConfig::Http { .. } => "http",
            McpServerConfig::Sse { .. } => "sse",
        }
    }

    /// One-line description for listings: the command line or the URL.
    pub fn endpoint(&self) -> String {
        match self {
            McpServerConfig::Stdio { command, args, .. } => {
                if args.is_empty() {
                    command.clone()
                } else {
                    format!("{command} {}", args.join(" "))
                }
            }
            McpServerConfig::Http { url, .. } | McpServerConfig::Sse { url, .. } => url.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawMcpServer {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    transport: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    command: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    env: BTreeMap<String, String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

fn string_map(map: BTreeMap<String, String>) -> Value {
    Value::Object(map.into_iter().map(|(k, v)| (k, Value::String(v))).collect())
}

impl TryFrom<RawMcpServer> for McpServerConfig {
    type Error = TeamforgeError;

    fn try_from(raw: RawMcpServer) -> Result<Self> {
        let transport = match raw.transport.as_deref() {
            Some(t) => t,
            None if raw.command.is_some() => "stdio",
            None if raw.url.is_some() => "http",
            None => {
                return Err(TeamforgeError::InvalidMcpServer(
                    "entry has neither command nor url".to_string(),
                ))
            }
        };
        let missing = |field: &str| {
            TeamforgeError::InvalidMcpServer(format!("{transport} server requires '{field}'"))
        };
        // Fields that belong to the other transport family stay in `extra`.
        let mut extra = raw.extra;
        match transport {
            "stdio" => {
                let command = raw.command.ok_or_else(|| missing("command"))?;
                if let Some(url) = raw.url {
                    extra.insert("url".to_string(), Value::String(url));
                }
                if !raw.headers.is_empty() {
                    extra.insert("headers".to_string(), string_map(raw.headers));
                }
                Ok(McpServerConfig::Stdio {
                    command,
                    args: raw.args,
                    env: raw.env,
                    extra,
                })
            }
            "http" | "sse" => {
                let url = raw.url.ok_or_else(|| missing("url"))?;
                if let Some(command) = raw.command {
                    extra.insert("command".to_string(), Value::String(command));
                }
                if !raw.args.is_empty() {
                    extra.insert(
                        "args".to_string(),
                        Value::Array(raw.args.into_iter().map(Value::String).collect()),
                    );
                }
                let headers = raw.headers;
                let env = raw.env;
                Ok(if transport == "http" {
                    McpServerConfig::Http {
                        url,
                        headers,
                        env,
                        extra,
                    }
                } else {
                    McpServerConfig::Sse {
                        url,
                        headers,
                        env,
                        extra,
                    }
                })
            }
            other => Err(TeamforgeError::InvalidMcpServer(format!(
                "unknown transport '{other}'"
            ))),
        }
    }
}

impl From<McpServerConfig> for RawMcpServer {
    fn from(cfg: McpServerConfig) -> Self {
        match cfg {
            McpServerConfig::Stdio {
                command,
                args,
                env,
                extra,
            } => RawMcpServer {
                transport: Some("stdio".to_string()),
                command: Some(command),
                args,
                env,
                extra,
                ..Default::default()
            },
            McpServerConfig::Http {
                url,
                headers,
                env,
                extra,
            } => RawMcpServer {
                transport: Some("http".to_string()),
                url: Some(url),
                headers,
                env,
                extra,
                ..Default::default()
            },
            McpServerConfig::Sse {
                url,
                headers,
                env,
                extra,
            } => RawMcpServer {
                transport: Some("sse".to_string()),
                url: Some(url),
                headers,
                env,
                extra,
                ..Default::default()
            },
        }
    }
}

// ---------------------------------------------------------------------------
// McpFile (.mcp.json)
// ---------------------------------------------------------------------------

/// One `mcpServers` entry. Entries that do not parse as a known transport
/// (a newer `type`, a malformed hand edit) are carried as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum McpEntry {
    Server(McpServerConfig),
    Unrecognized(Value),
}

/// Project-level `.mcp.json`. Keys other than `mcpServers` are preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct McpFile {
    #[serde(rename = "mcpServers", default)]
    pub mcp_servers: BTreeMap<String, McpEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl McpFile {
    pub fn load(root: &Path) -> Result<Self> {
        io::read_json_or_default(&paths::mcp_path(root))
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        io::write_json_pretty(&paths::mcp_path(root), self)
    }

    /// Insert or replace a server. Returns `true` if the file content changed.
    pub fn upsert(&mut self, name: &str, server: McpServerConfig) -> bool {
        let entry = McpEntry::Server(server);
        if self.mcp_servers.get(name) == Some(&entry) {
            return false;
        }
        self.mcp_servers.insert(name.to_string(), entry);
        true
    }
}

// ---------------------------------------------------------------------------
// McpServerTemplate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpServerTemplate {
    #[serde(flatten)]
    pub meta: TemplateMeta,
    pub category: McpCategory,
    pub server: McpServerConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct LibraryFile {
    name: String,
    description: String,
    category: McpCategory,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
    server: McpServerConfig,
}

impl Template for McpServerTemplate {
    type Category = McpCategory;
    const KIND: ArtifactKind = ArtifactKind::McpServer;
    const EXTENSION: &'static str = "json";

    fn meta(&self) -> &TemplateMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut TemplateMeta {
        &mut self.meta
    }

    fn category(&self) -> McpCategory {
        self.category
    }

    fn detail(&self) -> Option<String> {
        Some(format!("{}: {}", self.server.transport(), self.server.endpoint()))
    }

    fn parse(id: &str, content: &str) -> Result<Self> {
        let f: LibraryFile = serde_json::from_str(content)?;
        Ok(Self {
            meta: TemplateMeta {
                id: id.to_string(),
                name: f.name,
                description: f.description,
                tags: f.tags,
                source: TemplateSource::default(),
            },
            category: f.category,
            server: f.server,
        })
    }

    fn render(&self) -> Result<String> {
        let f = LibraryFile {
            name: self.meta.name.clone(),
            description: self.meta.description.clone(),
            category: self.category,
            tags: self.meta.tags.clone(),
            server: self.server.clone(),
        };
        let mut out = serde_json::to_string_pretty(&f)?;
        out.push('\n');
        Ok(out)
    }
}
