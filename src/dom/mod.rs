//! DOM indexing
//!
//! This module turns a live page into a small, labeled element list that a
//! planner can reference by ID. It includes:
//! - ElementRecord: one visible interactive element
//! - PageSnapshot: the ordered element list plus page metadata
//! - IdMap: mapping of ephemeral `agent-<n>` IDs to page candidates
//! - Indexer: filtering, labelling, classification and ID assignment

pub mod element;
pub mod id_map;
pub mod indexer;
pub mod snapshot;

pub use element::{BoundingBox, ComputedStyle, ElementRecord, ElementType, Position, RawElement};
pub use id_map::{IdAssignment, IdMap};
pub use indexer::{IndexedPage, Indexer};
pub use snapshot::{PageSnapshot, RawPage, Viewport};

use crate::error::Result;
use crate::page::PageDriver;

/// Scan a page into a fresh snapshot
pub fn scan(driver: &dyn PageDriver) -> Result<PageSnapshot> {
    Indexer::new().scan(driver)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_record_export() {
        let record = ElementRecord::new("agent-0", ElementType::Button, "OK");
        assert_eq!(record.label, "OK");
    }

    #[test]
    fn test_id_map_export() {
        let map = IdMap::new();
        assert!(map.is_empty());
    }
}
