use crate::ranking::Ranking;
use crate::template::Template;
use serde::{Deserialize, Serialize};

/// The ids chosen from one library, with their execution ranking.
///
/// Both structures are kept in step: every selected id is ranked, so
/// switching a team's workflow mode on later keeps a valid order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Ranking::is_empty")]
    ranking: Ranking,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if `id` was already selected.
    pub fn select(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id.to_string());
        self.ranking.add(id);
        true
    }

    pub fn deselect(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|i| i != id);
        self.ranking.remove(id);
        self.ids.len() != before
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|i| i == id)
    }

    pub fn move_up(&mut self, id: &str) -> bool {
        self.ranking.move_up(id)
    }

    pub fn move_down(&mut self, id: &str) -> bool {
        self.ranking.move_down(id)
    }

    pub fn rank(&self, id: &str) -> Option<u32> {
        self.ranking.rank(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.ranking.clear();
    }

    /// Rank order when `workflow` is on, insertion order otherwise.
    pub fn ids(&self, workflow: bool) -> Vec<String> {
        if workflow {
            self.ranking.ordered_ids()
        } else {
            self.ids.clone()
        }
    }

    /// Selected templates in [`Selection::ids`] order. Ids with no
    /// template in `items` are skipped.
    pub fn view<'a, T: Template>(&self, items: &'a [T], workflow: bool) -> Vec<&'a T> {
        if workflow {
            return self.ranking.ordered_view(items);
        }
        self.ids
            .iter()
            .filter_map(|id| items.iter().find(|t| t.id() == id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentTemplate;
    use crate::template::TemplateMeta;
    use crate::types::AgentCategory;

    fn agent(id: &str) -> AgentTemplate {
        AgentTemplate {
            meta: TemplateMeta::new(id, id, ""),
            category: AgentCategory::Development,
            tools: vec![],
            model: None,
            suggested_for: vec![],
            system_prompt: String::new(),
        }
    }

    #[test]
    fn insertion_vs_workflow_order() {
        let mut s = Selection::new();
        s.select("planner");
        s.select("coder");
        s.select("reviewer");
        s.move_up("reviewer");

        assert_eq!(s.ids(false), vec!["planner", "coder", "reviewer"]);
        assert_eq!(s.ids(true), vec!["planner", "reviewer", "coder"]);
    }

    #[test]
    fn deselect_removes_from_both() {
        let mut s = Selection::new();
        s.select("a");
        s.select("b");
        assert!(!s.select("a"));
        assert!(s.deselect("a"));
        assert!(!s.deselect("a"));
        assert_eq!(s.rank("a"), None);
        assert_eq!(s.ids(true), vec!["b"]);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn view_skips_unknown_ids() {
        let library = vec![agent("a"), agent("b")];
        let mut s = Selection::new();
        s.select("b");
        s.select("ghost");
        s.select("a");
        let ids: Vec<&str> = s.view(&library, false).iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        let ids: Vec<&str> = s.view(&library, true).iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn clear_resets_ranks() {
        let mut s = Selection::new();
        s.select("a");
        s.select("b");
        s.clear();
        assert!(s.is_empty());
        s.select("c");
        assert_eq!(s.rank("c"), Some(1));
    }
}
