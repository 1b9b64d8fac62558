use crate::template::Template;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Execution order of selected ids.
///
/// Ranks are assigned at insertion as `max + 1` and never compacted, so a
/// removal can leave a gap. Moves swap with the holder of the adjacent rank
/// and do nothing when that rank is unoccupied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ranking(BTreeMap<String, u32>);

impl Ranking {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if `id` was already ranked.
    pub fn add(&mut self, id: &str) -> bool {
        if self.0.contains_key(id) {
            return false;
        }
        let next = self.0.values().copied().max().unwrap_or(0) + 1;
        self.0.insert(id.to_string(), next);
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.0.remove(id).is_some()
    }

    pub fn rank(&self, id: &str) -> Option<u32> {
        self.0.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn move_up(&mut self, id: &str) -> bool {
        match self.rank(id) {
            Some(rank) if rank > 1 => self.swap_with_rank(id, rank, rank - 1),
            _ => false,
        }
    }

    pub fn move_down(&mut self, id: &str) -> bool {
        match self.rank(id) {
            Some(rank) => self.swap_with_rank(id, rank, rank + 1),
            None => false,
        }
    }

    fn swap_with_rank(&mut self, id: &str, rank: u32, target: u32) -> bool {
        let Some(other) = self
            .0
            .iter()
            .find(|(_, r)| **r == target)
            .map(|(k, _)| k.clone())
        else {
            return false;
        };
        self.0.insert(other, rank);
        self.0.insert(id.to_string(), target);
        true
    }

    /// Ranked ids, lowest rank first.
    pub fn ordered_ids(&self) -> Vec<String> {
        let mut pairs: Vec<(&String, &u32)> = self.0.iter().collect();
        pairs.sort_by_key(|(_, r)| **r);
        pairs.into_iter().map(|(id, _)| id.clone()).collect()
    }

    /// `items` narrowed to ranked ids, in rank order.
    pub fn ordered_view<'a, T: Template>(&self, items: &'a [T]) -> Vec<&'a T> {
        let mut view: Vec<(&'a T, u32)> = items
            .iter()
            .filter_map(|t| self.rank(t.id()).map(|r| (t, r)))
            .collect();
        view.sort_by_key(|(_, r)| *r);
        view.into_iter().map(|(t, _)| t).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skill::SkillTemplate;
    use crate::template::TemplateMeta;
    use crate::types::SkillCategory;

    fn ranking(ids: &[&str]) -> Ranking {
        let mut r = Ranking::new();
        for id in ids {
            r.add(id);
        }
        r
    }

    fn skill(id: &str) -> SkillTemplate {
        SkillTemplate {
            meta: TemplateMeta::new(id, id, ""),
            category: SkillCategory::Development,
            allowed_tools: vec![],
            instructions: String::new(),
        }
    }

    #[test]
    fn add_assigns_next_rank() {
        let mut r = ranking(&["a", "b"]);
        assert_eq!(r.rank("a"), Some(1));
        assert_eq!(r.rank("b"), Some(2));
        assert!(!r.add("a"));
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn move_down_first_swaps_with_second() {
        let mut r = ranking(&["a", "b", "c"]);
        assert!(r.move_down("a"));
        assert_eq!(r.rank("a"), Some(2));
        assert_eq!(r.rank("b"), Some(1));
        assert_eq!(r.rank("c"), Some(3));

        let library = vec![skill("a"), skill("b"), skill("c")];
        let view: Vec<&str> = r.ordered_view(&library).iter().map(|t| t.id()).collect();
        assert_eq!(view, vec!["b", "a", "c"]);
    }

    #[test]
    fn boundary_moves_are_noops() {
        let mut r = ranking(&["a", "b", "c"]);
        assert!(!r.move_up("a"));
        assert!(!r.move_down("c"));
        assert!(!r.move_up("missing"));
        assert_eq!(r.ordered_ids(), vec!["a", "b", "c"]);
    }

    #[test]
    fn gap_after_remove_blocks_move() {
        let mut r = ranking(&["a", "b", "c"]);
        r.remove("b");
        assert!(!r.move_down("a"));
        assert!(!r.move_up("c"));
        assert_eq!(r.rank("c"), Some(3));
        r.add("d");
        assert_eq!(r.rank("d"), Some(4));
    }

    #[test]
    fn add_after_clear_restarts_at_one() {
        let mut r = ranking(&["a"]);
        r.clear();
        r.add("z");
        assert_eq!(r.rank("z"), Some(1));
    }

    #[test]
    fn view_contains_each_selected_id_once() {
        let library: Vec<SkillTemplate> =
            ["a", "b", "c", "d", "e"].into_iter().map(skill).collect();
        let mut r = Ranking::new();
        let ops: &[(&str, &str)] = &[
            ("add", "c"),
            ("add", "a"),
            ("add", "e"),
            ("down", "c"),
            ("remove", "a"),
            ("add", "b"),
            ("up", "b"),
            ("add", "a"),
            ("down", "e"),
            ("remove", "c"),
            ("up", "a"),
        ];
        for (op, id) in ops {
            match *op {
                "add" => {
                    r.add(id);
                }
                "remove" => {
                    r.remove(id);
                }
                "up" => {
                    r.move_up(id);
                }
                _ => {
                    r.move_down(id);
                }
            }
            let mut seen: Vec<&str> = r.ordered_view(&library).iter().map(|t| t.id()).collect();
            assert_eq!(seen.len(), r.len());
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), r.len());
        }
    }

    #[test]
    fn serializes_as_plain_map() {
        let r = ranking(&["a", "b"]);
        assert_eq!(serde_yaml::to_string(&r).unwrap(), "a: 1\nb: 2\n");
    }
}
