//! Template libraries: one [`Library`] per artifact kind, merged from the
//! embedded builtin set, a cloned repository and the user's template dir.

use crate::agent::AgentTemplate;
use crate::config::TeamforgeSettings;
use crate::constitution::ConstitutionTemplate;
use crate::error::{Result, TeamforgeError};
use crate::hook::HookTemplate;
use crate::io;
use crate::mcp::McpServerTemplate;
use crate::paths;
use crate::skill::SkillTemplate;
use crate::template::{Template, TemplateSource};
use crate::types::ArtifactKind;
use rust_embed::Embed;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Embed)]
#[folder = "library/"]
struct BuiltinLibrary;

/// Queries shorter than this match everything.
pub const MIN_QUERY_LEN: usize = 3;

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Where one kind's templates are read from, lowest precedence first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibrarySources {
    pub builtin: bool,
    pub repository: Option<PathBuf>,
    /// Also the write target for user templates.
    pub user: Option<PathBuf>,
}

impl LibrarySources {
    pub fn for_project(root: &Path, kind: ArtifactKind, settings: &TeamforgeSettings) -> Self {
        let mut repository = paths::repo_dir(root, kind);
        if let Some(sub) = settings
            .repositories
            .get(kind)
            .and_then(|r| r.path.as_deref())
            .filter(|p| !p.is_empty())
        {
            repository = repository.join(sub);
        }
        Self {
            builtin: true,
            repository: Some(repository),
            user: Some(settings.template_dir(root, kind)),
        }
    }
}

/// `<id>.<ext>` at the top of a kind directory, or `<id>/SKILL.md` for skills.
fn entry_id<T: Template>(rel: &str) -> Option<String> {
    let rel = rel.replace('\\', "/");
    match rel.split_once('/') {
        None => rel
            .strip_suffix(&format!(".{}", T::EXTENSION))
            .map(str::to_string),
        Some((dir, file)) if T::KIND == ArtifactKind::Skill && file == paths::SKILL_FILE => {
            Some(dir.to_string())
        }
        Some(_) => None,
    }
}

fn insert_parsed<T: Template>(
    items: &mut BTreeMap<String, T>,
    id: &str,
    content: &str,
    source: TemplateSource,
    origin: &str,
) {
    if paths::validate_id(id).is_err() {
        tracing::warn!(kind = %T::KIND, origin, "skipping template with invalid id '{id}'");
        return;
    }
    match T::parse(id, content) {
        Ok(mut t) => {
            t.meta_mut().source = source;
            items.insert(id.to_string(), t);
        }
        Err(e) => {
            tracing::warn!(kind = %T::KIND, origin, error = %e, "skipping unparseable template");
        }
    }
}

fn load_builtin<T: Template>(items: &mut BTreeMap<String, T>) {
    let prefix = format!("{}/", T::KIND.dir_name());
    for path in BuiltinLibrary::iter() {
        let Some(rel) = path.strip_prefix(&prefix) else {
            continue;
        };
        let Some(id) = entry_id::<T>(rel) else {
            continue;
        };
        let Some(file) = BuiltinLibrary::get(&path) else {
            continue;
        };
        match std::str::from_utf8(&file.data) {
            Ok(content) => insert_parsed(items, &id, content, TemplateSource::Builtin, &path),
            Err(_) => tracing::warn!(origin = %path, "skipping non-UTF-8 builtin template"),
        }
    }
}

fn load_dir<T: Template>(items: &mut BTreeMap<String, T>, dir: &Path, source: TemplateSource) {
    if !dir.is_dir() {
        return;
    }
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(2)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let Ok(rel) = entry.path().strip_prefix(dir) else {
            continue;
        };
        let Some(id) = entry_id::<T>(&rel.to_string_lossy()) else {
            continue;
        };
        let origin = entry.path().display().to_string();
        match std::fs::read_to_string(entry.path()) {
            Ok(content) => insert_parsed(items, &id, &content, source, &origin),
            Err(e) => tracing::warn!(origin, error = %e, "skipping unreadable template"),
        }
    }
    tracing::debug!(kind = %T::KIND, dir = %dir.display(), "loaded template dir");
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub category: Option<String>,
    pub query: String,
}

/// Lowercased needle, or `None` when the query is too short to narrow.
fn needle(query: &str) -> Option<String> {
    let q = query.trim();
    (q.chars().count() >= MIN_QUERY_LEN).then(|| q.to_lowercase())
}

// ---------------------------------------------------------------------------
// Library
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Library<T: Template> {
    sources: LibrarySources,
    items: Vec<T>,
}

impl<T: Template> Library<T> {
    pub fn load(sources: LibrarySources) -> Self {
        let mut items = BTreeMap::new();
        if sources.builtin {
            load_builtin::<T>(&mut items);
        }
        if let Some(dir) = &sources.repository {
            load_dir::<T>(&mut items, dir, TemplateSource::Repository);
        }
        if let Some(dir) = &sources.user {
            load_dir::<T>(&mut items, dir, TemplateSource::User);
        }
        Self {
            sources,
            items: items.into_values().collect(),
        }
    }

    /// In-memory library with no backing directories.
    pub fn from_templates(templates: Vec<T>) -> Self {
        let mut items: Vec<T> = templates;
        items.sort_by(|a, b| a.id().cmp(b.id()));
        items.dedup_by(|a, b| a.id() == b.id());
        Self {
            sources: LibrarySources::default(),
            items,
        }
    }

    pub fn reload(&mut self) {
        *self = Self::load(self.sources.clone());
    }

    pub fn sources(&self) -> &LibrarySources {
        &self.sources
    }

    /// Every template, sorted by id.
    pub fn all(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|t| t.id() == id)
    }

    pub fn require(&self, id: &str) -> Result<&T> {
        self.get(id).ok_or_else(|| TeamforgeError::TemplateNotFound {
            kind: T::KIND.to_string(),
            id: id.to_string(),
        })
    }

    pub fn by_category(&self, category: T::Category) -> Vec<&T> {
        self.items
            .iter()
            .filter(|t| t.category() == category)
            .collect()
    }

    pub fn search(&self, query: &str) -> Vec<&T> {
        match needle(query) {
            Some(n) => self.items.iter().filter(|t| t.meta().matches(&n)).collect(),
            None => self.items.iter().collect(),
        }
    }

    /// Category (exact) then query. An unknown category name is an error.
    pub fn filter(&self, filter: &Filter) -> Result<Vec<&T>> {
        let category = filter
            .category
            .as_deref()
            .map(str::parse::<T::Category>)
            .transpose()?;
        let n = needle(&filter.query);
        Ok(self
            .items
            .iter()
            .filter(|t| category.map_or(true, |c| t.category() == c))
            .filter(|t| n.as_deref().map_or(true, |n| t.meta().matches(n)))
            .collect())
    }

    fn user_dir(&self) -> Result<&Path> {
        self.sources
            .user
            .as_deref()
            .ok_or(TeamforgeError::NotInitialized)
    }

    /// Existing file of a user template, in either skill layout.
    fn user_file(dir: &Path, id: &str) -> PathBuf {
        if T::KIND == ArtifactKind::Skill {
            let folder = dir.join(id).join(paths::SKILL_FILE);
            if folder.exists() {
                return folder;
            }
        }
        dir.join(T::file_name(id))
    }

    /// Write a new user template. Shadows a builtin or repository template
    /// with the same id; fails if a user template already has it.
    pub fn create_user(&mut self, mut template: T) -> Result<()> {
        let id = template.id().to_string();
        paths::validate_id(&id)?;
        if self
            .get(&id)
            .is_some_and(|t| t.meta().source == TemplateSource::User)
        {
            return Err(TeamforgeError::TemplateExists {
                kind: T::KIND.to_string(),
                id,
            });
        }
        template.meta_mut().source = TemplateSource::User;
        let path = Self::user_file(self.user_dir()?, &id);
        io::atomic_write(&path, template.render()?.as_bytes())?;
        self.upsert(template);
        Ok(())
    }

    pub fn update_user(&mut self, mut template: T) -> Result<()> {
        let id = template.id().to_string();
        self.check_editable(&id)?;
        template.meta_mut().source = TemplateSource::User;
        let path = Self::user_file(self.user_dir()?, &id);
        io::atomic_write(&path, template.render()?.as_bytes())?;
        self.upsert(template);
        Ok(())
    }

    /// Remove a user template. A shadowed builtin or repository template
    /// with the same id becomes visible again.
    pub fn delete_user(&mut self, id: &str) -> Result<()> {
        self.check_editable(id)?;
        let dir = self.user_dir()?.to_path_buf();
        let path = Self::user_file(&dir, id);
        if path.file_name().is_some_and(|n| n == paths::SKILL_FILE) {
            if let Some(folder) = path.parent() {
                std::fs::remove_dir_all(folder)?;
            }
        } else if path.exists() {
            std::fs::remove_file(&path)?;
        }
        tracing::debug!(kind = %T::KIND, id, "deleted user template");
        self.reload();
        Ok(())
    }

    /// Copy any template into the user library under `new_id`.
    pub fn copy_to_user(&mut self, id: &str, new_id: &str) -> Result<&T> {
        let mut copy = self.require(id)?.clone();
        copy.meta_mut().id = new_id.to_string();
        self.create_user(copy)?;
        self.require(new_id)
    }

    fn check_editable(&self, id: &str) -> Result<()> {
        let t = self.require(id)?;
        let source = t.meta().source;
        if !source.is_editable() {
            return Err(TeamforgeError::ReadOnlyTemplate {
                kind: T::KIND.to_string(),
                id: id.to_string(),
                source_label: source.to_string(),
            });
        }
        Ok(())
    }

    fn upsert(&mut self, template: T) {
        match self.items.binary_search_by(|t| t.id().cmp(template.id())) {
            Ok(i) => self.items[i] = template,
            Err(i) => self.items.insert(i, template),
        }
    }
}

impl Library<AgentTemplate> {
    /// Agents whose technology hints overlap `technologies`.
    pub fn suggested_for(&self, technologies: &[String]) -> Vec<&AgentTemplate> {
        self.items
            .iter()
            .filter(|a| a.is_suggested_for(technologies))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Libraries
// ---------------------------------------------------------------------------

/// All five libraries of a project.
#[derive(Debug, Clone)]
pub struct Libraries {
    pub agents: Library<AgentTemplate>,
    pub skills: Library<SkillTemplate>,
    pub hooks: Library<HookTemplate>,
    pub mcp_servers: Library<McpServerTemplate>,
    pub constitutions: Library<ConstitutionTemplate>,
}

impl Libraries {
    pub fn load(root: &Path, settings: &TeamforgeSettings) -> Self {
        let sources = |kind| LibrarySources::for_project(root, kind, settings);
        Self {
            agents: Library::load(sources(ArtifactKind::Agent)),
            skills: Library::load(sources(ArtifactKind::Skill)),
            hooks: Library::load(sources(ArtifactKind::Hook)),
            mcp_servers: Library::load(sources(ArtifactKind::McpServer)),
            constitutions: Library::load(sources(ArtifactKind::Constitution)),
        }
    }

    /// Whether `id` names a template of `kind`.
    pub fn contains(&self, kind: ArtifactKind, id: &str) -> bool {
        match kind {
            ArtifactKind::Agent => self.agents.get(id).is_some(),
            ArtifactKind::Skill => self.skills.get(id).is_some(),
            ArtifactKind::Hook => self.hooks.get(id).is_some(),
            ArtifactKind::McpServer => self.mcp_servers.get(id).is_some(),
            ArtifactKind::Constitution => self.constitutions.get(id).is_some(),
        }
    }
}
