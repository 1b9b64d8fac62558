use crate::cmd::open_workspace;
use crate::output::{join_or_dash, print_json, print_table};
use anyhow::{bail, Context};
use clap::{Args, Subcommand};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use teamforge_core::{
    frontmatter,
    library::{Filter, Library},
    template::Template,
    types::{categories_for, ArtifactKind},
};

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum LibrarySubcommand {
    /// List templates, optionally narrowed by category and search text
    List {
        #[arg(long)]
        category: Option<String>,
        /// Matches name, description or tags (at least 3 characters)
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one template in its library file format
    Show { id: String },
    /// Create a user template
    Create {
        id: String,
        #[command(flatten)]
        fields: TemplateFields,
    },
    /// Edit a user template; omitted fields keep their values
    Update {
        id: String,
        #[command(flatten)]
        fields: TemplateFields,
    },
    /// Copy any template into the user library under a new id
    Copy { id: String, new_id: String },
    /// Delete a user template
    Delete { id: String },
}

#[derive(Args)]
pub struct TemplateFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    category: Option<String>,
    /// Tag (repeatable); replaces the existing tags
    #[arg(long = "tag")]
    tags: Vec<String>,
    /// Comma-separated tools (agents) or allowed tools (skills)
    #[arg(long)]
    tools: Option<String>,
    /// Model override (agents only)
    #[arg(long)]
    model: Option<String>,
    /// Markdown body, or a JSON object of fields for hooks and MCP servers
    #[arg(long)]
    body_file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, kind: &str, subcmd: LibrarySubcommand, json: bool) -> anyhow::Result<()> {
    let kind: ArtifactKind = kind.parse()?;
    let mut ws = open_workspace(root)?;
    let libs = &mut ws.libraries;
    match kind {
        ArtifactKind::Agent => run_kind(&mut libs.agents, subcmd, json),
        ArtifactKind::Skill => run_kind(&mut libs.skills, subcmd, json),
        ArtifactKind::Hook => run_kind(&mut libs.hooks, subcmd, json),
        ArtifactKind::McpServer => run_kind(&mut libs.mcp_servers, subcmd, json),
        ArtifactKind::Constitution => run_kind(&mut libs.constitutions, subcmd, json),
    }
}

fn run_kind<T: Template>(
    lib: &mut Library<T>,
    subcmd: LibrarySubcommand,
    json: bool,
) -> anyhow::Result<()> {
    match subcmd {
        LibrarySubcommand::List { category, search } => list(lib, category, search, json),
        LibrarySubcommand::Show { id } => show(lib, &id, json),
        LibrarySubcommand::Create { id, fields } => create(lib, &id, &fields, json),
        LibrarySubcommand::Update { id, fields } => update(lib, &id, &fields, json),
        LibrarySubcommand::Copy { id, new_id } => copy(lib, &id, &new_id, json),
        LibrarySubcommand::Delete { id } => delete(lib, &id, json),
    }
}

// ---------------------------------------------------------------------------
// list / show
// ---------------------------------------------------------------------------

fn list<T: Template>(
    lib: &Library<T>,
    category: Option<String>,
    search: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let filter = Filter {
        category,
        query: search.unwrap_or_default(),
    };
    let items = lib.filter(&filter).with_context(|| {
        format!(
            "valid {} categories: {}",
            T::KIND,
            categories_for(T::KIND).join(", ")
        )
    })?;

    if json {
        return print_json(&items);
    }
    if items.is_empty() {
        println!("No {} templates match.", T::KIND);
        return Ok(());
    }

    let with_detail = items.iter().any(|t| t.detail().is_some());
    let rows = items
        .iter()
        .map(|t| {
            let mut row = vec![
                t.id().to_string(),
                t.meta().name.clone(),
                t.category_str().to_string(),
                t.meta().source.to_string(),
            ];
            if with_detail {
                row.push(t.detail().unwrap_or_else(|| "-".to_string()));
            }
            row
        })
        .collect();
    let mut headers = vec!["ID", "NAME", "CATEGORY", "SOURCE"];
    if with_detail {
        headers.push("DETAIL");
    }
    print_table(&headers, rows);
    Ok(())
}

fn show<T: Template>(lib: &Library<T>, id: &str, json: bool) -> anyhow::Result<()> {
    let template = lib.require(id)?;
    if json {
        return print_json(template);
    }

    let meta = template.meta();
    println!("{} ({})", meta.name, meta.id);
    println!("Category:    {}", template.category_str());
    println!("Source:      {}", meta.source);
    println!("Tags:        {}", join_or_dash(&meta.tags));
    println!("Description: {}", meta.description);
    if let Some(detail) = template.detail() {
        println!("Detail:      {detail}");
    }
    println!();
    print!("{}", template.render()?);
    Ok(())
}

// ---------------------------------------------------------------------------
// create / update / copy / delete
// ---------------------------------------------------------------------------

fn create<T: Template>(
    lib: &mut Library<T>,
    id: &str,
    fields: &TemplateFields,
    json: bool,
) -> anyhow::Result<()> {
    let missing: Vec<&str> = [
        ("--name", fields.name.is_none()),
        ("--description", fields.description.is_none()),
        ("--category", fields.category.is_none()),
    ]
    .into_iter()
    .filter_map(|(flag, absent)| absent.then_some(flag))
    .collect();
    if !missing.is_empty() {
        bail!("create requires {}", missing.join(", "));
    }

    let template: T = build(id, None, fields)?;
    lib.create_user(template)
        .with_context(|| format!("failed to create {} '{id}'", T::KIND))?;
    report(lib, id, "Created", json)
}

fn update<T: Template>(
    lib: &mut Library<T>,
    id: &str,
    fields: &TemplateFields,
    json: bool,
) -> anyhow::Result<()> {
    let base = lib.require(id)?.clone();
    let template = build(id, Some(&base), fields)?;
    lib.update_user(template)
        .with_context(|| format!("failed to update {} '{id}'", T::KIND))?;
    report(lib, id, "Updated", json)
}

fn copy<T: Template>(
    lib: &mut Library<T>,
    id: &str,
    new_id: &str,
    json: bool,
) -> anyhow::Result<()> {
    lib.copy_to_user(id, new_id)
        .with_context(|| format!("failed to copy {} '{id}'", T::KIND))?;
    report(lib, new_id, "Copied to", json)
}

fn delete<T: Template>(lib: &mut Library<T>, id: &str, json: bool) -> anyhow::Result<()> {
    lib.delete_user(id)
        .with_context(|| format!("failed to delete {} '{id}'", T::KIND))?;

    if json {
        print_json(&serde_json::json!({
            "kind": T::KIND,
            "id": id,
            "deleted": true,
            "shadowed": lib.get(id).map(|t| t.meta().source),
        }))?;
    } else {
        println!("Deleted {} '{id}'", T::KIND);
        if let Some(t) = lib.get(id) {
            println!("  the {} template '{id}' is visible again", t.meta().source);
        }
    }
    Ok(())
}

fn report<T: Template>(lib: &Library<T>, id: &str, verb: &str, json: bool) -> anyhow::Result<()> {
    let template = lib.require(id)?;
    if json {
        print_json(template)
    } else {
        println!("{verb} {} '{id}' ({})", T::KIND, template.meta().name);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Building templates from flags
// ---------------------------------------------------------------------------

/// Apply `fields` to the library-file form of `base` (or an empty one) and
/// parse the result, so every kind goes through its own parser.
fn build<T: Template>(id: &str, base: Option<&T>, fields: &TemplateFields) -> anyhow::Result<T> {
    let markdown = T::EXTENSION == "md";

    let (mut doc, mut body) = match base {
        Some(t) => library_form(t, markdown)?,
        None => (Map::new(), String::new()),
    };

    if let Some(path) = &fields.body_file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        if markdown {
            body = text;
        } else {
            merge_json_fields(T::KIND, &mut doc, &text)
                .with_context(|| format!("invalid JSON in {}", path.display()))?;
        }
    }

    let mut set = |key: &str, value: &Option<String>| {
        if let Some(v) = value {
            doc.insert(key.to_string(), Value::String(v.clone()));
        }
    };
    set("name", &fields.name);
    set("description", &fields.description);
    set("category", &fields.category);

    if let Some(tools) = &fields.tools {
        let key = match T::KIND {
            ArtifactKind::Agent => "tools",
            ArtifactKind::Skill => "allowed-tools",
            other => bail!("--tools does not apply to {other} templates"),
        };
        doc.insert(key.to_string(), Value::String(tools.clone()));
    }
    if let Some(model) = &fields.model {
        if T::KIND != ArtifactKind::Agent {
            bail!("--model applies to agent templates only");
        }
        doc.insert("model".to_string(), Value::String(model.clone()));
    }
    if !fields.tags.is_empty() {
        let tags = fields.tags.iter().cloned().map(Value::String).collect();
        doc.insert("tags".to_string(), Value::Array(tags));
    }

    let content = if markdown {
        frontmatter::render(&doc, &body)?
    } else {
        serde_json::to_string_pretty(&doc)?
    };
    T::parse(id, &content).with_context(|| {
        format!(
            "invalid {} template (categories: {})",
            T::KIND,
            categories_for(T::KIND).join(", ")
        )
    })
}

/// Split a rendered template into its field map and markdown body.
fn library_form<T: Template>(
    template: &T,
    markdown: bool,
) -> anyhow::Result<(Map<String, Value>, String)> {
    let rendered = template.render()?;
    if !markdown {
        return Ok((serde_json::from_str(&rendered)?, String::new()));
    }
    let (yaml, body) = frontmatter::split(&rendered)?;
    let doc = match yaml {
        Some(y) if !y.trim().is_empty() => serde_yaml::from_str(y)?,
        _ => Map::new(),
    };
    Ok((doc, body.to_string()))
}

/// Merge a JSON object into `doc`. For MCP servers a bare server entry
/// (with `command` or `url` but no `server` key) is accepted too.
fn merge_json_fields(
    kind: ArtifactKind,
    doc: &mut Map<String, Value>,
    text: &str,
) -> anyhow::Result<()> {
    let value: Map<String, Value> = serde_json::from_str(text)?;
    let bare_server = kind == ArtifactKind::McpServer
        && !value.contains_key("server")
        && (value.contains_key("command") || value.contains_key("url"));
    if bare_server {
        doc.insert("server".to_string(), Value::Object(value));
    } else {
        doc.extend(value);
    }
    Ok(())
}
