//! Name search over a flat index.
//!
//! A search never produces a separate result list: it yields two id sets that the projector
//! uses as a filter over the normal tree walk.

use crate::tree::FlatIndex;
use std::collections::HashSet;

/// Outcome of filtering a flat index by a query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    /// Ids whose name contains the query
    pub matches: HashSet<String>,
    /// Matches plus every ancestor of every match
    pub visible: HashSet<String>,
}

impl SearchResult {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// A query is active unless it is blank after trimming
pub fn is_query_active(query: &str) -> bool {
    !query.trim().is_empty()
}

/// Case-insensitive substring match on display names, with ancestor closure.
///
/// A blank query returns two empty sets. The query itself is not trimmed for matching.
pub fn filter_tree(index: &FlatIndex, query: &str) -> SearchResult {
    let mut result = SearchResult::default();

    if !is_query_active(query) {
        return result;
    }

    let start = std::time::Instant::now();
    let query_lower = query.to_lowercase();

    for node in index.nodes() {
        if !node.name.to_lowercase().contains(&query_lower) {
            continue;
        }

        result.matches.insert(node.id.clone());
        result.visible.insert(node.id.clone());

        // Stop climbing once we reach an ancestor another match already added
        let mut parent = node.parent_id.as_deref();
        let mut steps = 0;
        while let Some(parent_id) = parent {
            if !result.visible.insert(parent_id.to_string()) || steps >= index.len() {
                break;
            }
            steps += 1;
            parent = index.get(parent_id).and_then(|p| p.parent_id.as_deref());
        }
    }

    log::debug!(
        "Search: query {:?} -> {} matches, {} visible in {:?}",
        query,
        result.matches.len(),
        result.visible.len(),
        start.elapsed()
    );

    result
}
