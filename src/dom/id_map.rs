use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Prefix of every agent-assigned element ID
pub const ID_PREFIX: &str = "agent-";

/// Pairing of a minted ID with the page runtime's candidate slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAssignment {
    pub candidate: usize,
    pub id: String,
}

/// Ordered map of agent IDs to candidate slots for one scrape epoch.
///
/// IDs are minted sequentially from zero, so a fresh map yields `agent-0`,
/// `agent-1`, ... in registration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdMap {
    map: IndexMap<String, usize>,
}

impl IdMap {
    /// Create a new empty IdMap
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint the next ID for a candidate slot
    pub fn register(&mut self, candidate: usize) -> String {
        let id = format!("{}{}", ID_PREFIX, self.map.len());
        self.map.insert(id.clone(), candidate);
        id
    }

    /// Candidate slot for an ID
    pub fn get(&self, id: &str) -> Option<usize> {
        self.map.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.map.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Forget every ID, restarting the counter
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// IDs in registration order
    pub fn ids(&self) -> impl Iterator<Item = &String> {
        self.map.keys()
    }

    /// Assignments to write back into the page
    pub fn assignments(&self) -> Vec<IdAssignment> {
        self.map
            .iter()
            .map(|(id, candidate)| IdAssignment {
                candidate: *candidate,
                id: id.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_sequential() {
        let mut map = IdMap::new();

        assert_eq!(map.register(4), "agent-0");
        assert_eq!(map.register(9), "agent-1");
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("agent-1"), Some(9));
        assert!(map.get("agent-2").is_none());
    }

    #[test]
    fn test_clear_resets_counter() {
        let mut map = IdMap::new();
        map.register(0);
        map.register(1);

        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.register(7), "agent-0");
    }

    #[test]
    fn test_assignments_keep_order() {
        let mut map = IdMap::new();
        map.register(3);
        map.register(1);

        let assignments = map.assignments();
        assert_eq!(
            assignments,
            vec![
                IdAssignment { candidate: 3, id: "agent-0".to_string() },
                IdAssignment { candidate: 1, id: "agent-1".to_string() },
            ]
        );
        let ids: Vec<_> = map.ids().cloned().collect();
        assert_eq!(ids, vec!["agent-0", "agent-1"]);
    }
}
