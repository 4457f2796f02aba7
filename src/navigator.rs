//! Navigator state machine
//!
//! `NavigatorState` owns expansion, selection, the search query, pins and the focus index.
//! Every mutator finishes by recomputing the derived state (search sets, effective expansion,
//! projection, snapshot) so readers always see one consistent picture. Search is a filter over
//! the normal tree walk, never a separate mode with its own list.

use crate::persistence::PinPersistence;
use crate::projection::project;
use crate::search::{filter_tree, is_query_active, SearchResult};
use crate::tree::{FlatIndex, FlatNode, RawNode};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// Events that can be sent to the navigator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigatorEvent {
    MoveNext,
    MovePrev,
    Expand,
    Collapse,
    Activate,
    Reveal(String),
    Select(String),
    SelectAndReveal(String),
    ToggleFolder(String),
    TogglePin(String),
    SetQuery(String),
    ClearQuery,
}

/// A row of the projection, in projection order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleItem {
    pub id: String,
    pub name: String,
    pub depth: usize,
    pub is_folder: bool,
    pub is_expanded: bool,
    pub is_selected: bool,
    pub is_focused: bool,
    pub is_match: bool,
    pub is_pinned: bool,
}

/// Read-only view handed to presentation after every operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavigatorSnapshot {
    pub projection: Vec<String>,
    pub items: Vec<VisibleItem>,
    pub effective_expanded: BTreeSet<String>,
    pub selection: Option<String>,
    pub focus_index: Option<usize>,
    pub focused_id: Option<String>,
    pub matches: BTreeSet<String>,
    pub visible: BTreeSet<String>,
    pub pinned: Vec<String>,
    pub query: String,
    pub search_active: bool,
}

pub struct NavigatorState {
    index: FlatIndex,
    expanded: HashSet<String>,
    selection: Option<String>,
    query: String,
    pinned: Vec<String>,
    // Raw focus offset; exposed only after clamping to the current projection
    focus: usize,
    // Manual expansion captured when the query became active
    expansion_before_search: Option<HashSet<String>>,
    persistence: Box<dyn PinPersistence>,

    search: SearchResult,
    effective_expanded: HashSet<String>,
    projection: Vec<String>,
    snapshot: NavigatorSnapshot,
}

impl fmt::Debug for NavigatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigatorState")
            .field("nodes", &self.index.len())
            .field("expanded", &self.expanded)
            .field("selection", &self.selection)
            .field("query", &self.query)
            .field("pinned", &self.pinned)
            .field("focus", &self.focus)
            .finish_non_exhaustive()
    }
}

impl NavigatorState {
    /// Build the navigator over `forest`, loading pins once from `persistence`
    pub fn new(forest: &[RawNode], persistence: Box<dyn PinPersistence>) -> Self {
        let loaded = persistence.load();
        let loaded_len = loaded.len();
        let mut pinned = Vec::new();
        for id in loaded {
            if !pinned.contains(&id) {
                pinned.push(id);
            }
        }
        let deduplicated = pinned.len() != loaded_len;

        let mut state = Self {
            index: FlatIndex::from_forest(forest),
            expanded: HashSet::new(),
            selection: None,
            query: String::new(),
            pinned,
            focus: 0,
            expansion_before_search: None,
            persistence,
            search: SearchResult::default(),
            effective_expanded: HashSet::new(),
            projection: Vec::new(),
            snapshot: NavigatorSnapshot::default(),
        };
        if !state.prune_pins() && deduplicated {
            log::info!("Navigator: dropped duplicate pins from storage");
            state.persistence.save(&state.pinned);
        }
        state.refresh();
        state
    }

    /// Replace the tree. The index is rebuilt from scratch and pins no longer present are
    /// dropped (and the reduced set persisted). Selection is left alone.
    pub fn set_tree(&mut self, forest: &[RawNode]) {
        self.index = FlatIndex::from_forest(forest);
        self.prune_pins();
        self.refresh();
    }

    // Returns whether the reduced set was saved
    fn prune_pins(&mut self) -> bool {
        let before = self.pinned.len();
        let index = &self.index;
        self.pinned.retain(|id| index.contains(id));

        if self.pinned.len() == before {
            return false;
        }
        log::info!(
            "Navigator: dropped {} stale pins",
            before - self.pinned.len()
        );
        self.persistence.save(&self.pinned);
        true
    }

    /// Handle an event and return whether the state changed
    pub fn handle_event(&mut self, event: NavigatorEvent) -> bool {
        let state_before = (self.snapshot.clone(), self.expanded.clone());

        match event {
            NavigatorEvent::MoveNext => self.move_next(),
            NavigatorEvent::MovePrev => self.move_prev(),
            NavigatorEvent::Expand => self.expand_focused(),
            NavigatorEvent::Collapse => self.collapse_focused(),
            NavigatorEvent::Activate => self.activate(),
            NavigatorEvent::Reveal(id) => self.reveal(&id),
            NavigatorEvent::Select(id) => self.select(&id),
            NavigatorEvent::SelectAndReveal(id) => self.select_and_reveal(&id),
            NavigatorEvent::ToggleFolder(id) => self.toggle_folder(&id),
            NavigatorEvent::TogglePin(id) => self.toggle_pin(&id),
            NavigatorEvent::SetQuery(query) => self.set_query(&query),
            NavigatorEvent::ClearQuery => self.set_query(""),
        }

        let state_after = (self.snapshot.clone(), self.expanded.clone());
        state_before != state_after
    }

    // ---- mutators ----

    /// Select any id, known or not. Unknown ids simply have no details.
    pub fn select(&mut self, id: &str) {
        self.selection = Some(id.to_string());
        self.refresh();
    }

    /// Open every ancestor of `id`, select it and move focus onto it
    pub fn select_and_reveal(&mut self, id: &str) {
        for ancestor in self.index.ancestor_chain(id) {
            self.set_manual_expansion(&ancestor, true);
        }
        self.selection = Some(id.to_string());
        self.refresh();
        self.reveal(id);
    }

    /// Flip a folder's manual expansion. Files and unknown ids are ignored.
    pub fn toggle_folder(&mut self, id: &str) {
        if !self.index.get(id).is_some_and(FlatNode::is_folder) {
            return;
        }
        let open = !self.expanded.contains(id);
        self.set_manual_expansion(id, open);
        self.refresh();
    }

    /// Pin or unpin a known id and persist the whole set
    pub fn toggle_pin(&mut self, id: &str) {
        if !self.index.contains(id) {
            log::debug!("Navigator: ignoring pin toggle for unknown id {:?}", id);
            return;
        }

        if let Some(position) = self.pinned.iter().position(|p| p == id) {
            self.pinned.remove(position);
        } else {
            self.pinned.push(id.to_string());
        }
        self.persistence.save(&self.pinned);
        self.refresh();
    }

    /// Update the query. Going active captures the manual expansion; going inactive restores it.
    pub fn set_query(&mut self, query: &str) {
        let was_active = is_query_active(&self.query);
        let now_active = is_query_active(query);

        if !was_active && now_active {
            self.expansion_before_search = Some(self.expanded.clone());
        } else if was_active && !now_active {
            if let Some(restored) = self.expansion_before_search.take() {
                self.expanded = restored;
            }
        }

        self.query = query.to_string();
        self.refresh();
    }

    pub fn move_next(&mut self) {
        if let Some(current) = self.focus_index() {
            self.focus = (current + 1) % self.projection.len();
            self.refresh_snapshot();
        }
    }

    pub fn move_prev(&mut self) {
        if let Some(current) = self.focus_index() {
            let len = self.projection.len();
            self.focus = (current + len - 1) % len;
            self.refresh_snapshot();
        }
    }

    /// Open the focused folder if it is closed; focus index is unchanged
    pub fn expand_focused(&mut self) {
        if let Some(node) = self.focused_node() {
            if node.is_folder() && !self.effective_expanded.contains(&node.id) {
                let id = node.id.clone();
                self.set_manual_expansion(&id, true);
                self.refresh();
            }
        }
    }

    /// Close the focused folder if it is open; focus index is unchanged
    pub fn collapse_focused(&mut self) {
        if let Some(node) = self.focused_node() {
            if node.is_folder() && self.effective_expanded.contains(&node.id) {
                let id = node.id.clone();
                self.set_manual_expansion(&id, false);
                self.refresh();
            }
        }
    }

    /// Select the focused id
    pub fn activate(&mut self) {
        if let Some(id) = self.focused_id().map(str::to_string) {
            self.select(&id);
        }
    }

    /// Jump focus to `id` when it is in the current projection
    pub fn reveal(&mut self, id: &str) {
        if let Some(position) = self.projection.iter().position(|p| p == id) {
            self.focus = position;
            self.refresh_snapshot();
        }
    }

    // Manual edits made while searching are folded into the restore point as well
    fn set_manual_expansion(&mut self, id: &str, open: bool) {
        let targets = std::iter::once(&mut self.expanded).chain(self.expansion_before_search.as_mut());
        for set in targets {
            if open {
                set.insert(id.to_string());
            } else {
                set.remove(id);
            }
        }
    }

    // ---- derived state ----

    fn refresh(&mut self) {
        let start = std::time::Instant::now();
        let active = is_query_active(&self.query);

        self.search = filter_tree(&self.index, &self.query);

        self.effective_expanded = self.expanded.clone();
        if active {
            let index = &self.index;
            self.effective_expanded.extend(
                self.search
                    .visible
                    .iter()
                    .filter(|id| index.get(id).is_some_and(FlatNode::is_folder))
                    .cloned(),
            );
        }

        let restriction = if active { Some(&self.search.visible) } else { None };
        self.projection = project(
            &self.index,
            self.index.root_ids(),
            &self.effective_expanded,
            restriction,
        );

        self.refresh_snapshot();

        log::debug!(
            "Navigator: projection of {} items recomputed in {:?}",
            self.projection.len(),
            start.elapsed()
        );
    }

    fn refresh_snapshot(&mut self) {
        let focus_index = self.focus_index();
        let focused_id = focus_index.map(|i| self.projection[i].clone());

        let items = self
            .projection
            .iter()
            .enumerate()
            .filter_map(|(position, id)| {
                let node = self.index.get(id)?;
                Some(VisibleItem {
                    id: node.id.clone(),
                    name: node.name.clone(),
                    depth: node.depth,
                    is_folder: node.is_folder(),
                    is_expanded: self.effective_expanded.contains(id),
                    is_selected: self.selection.as_ref() == Some(id),
                    is_focused: focus_index == Some(position),
                    is_match: self.search.matches.contains(id),
                    is_pinned: self.pinned.contains(id),
                })
            })
            .collect();

        self.snapshot = NavigatorSnapshot {
            projection: self.projection.clone(),
            items,
            effective_expanded: self.effective_expanded.iter().cloned().collect(),
            selection: self.selection.clone(),
            focus_index,
            focused_id,
            matches: self.search.matches.iter().cloned().collect(),
            visible: self.search.visible.iter().cloned().collect(),
            pinned: self.pinned.clone(),
            query: self.query.clone(),
            search_active: is_query_active(&self.query),
        };
    }

    // ---- queries ----

    pub fn snapshot(&self) -> &NavigatorSnapshot {
        &self.snapshot
    }

    pub fn projection(&self) -> &[String] {
        &self.projection
    }

    /// Stored focus clamped to the projection; `None` when nothing is displayable
    pub fn focus_index(&self) -> Option<usize> {
        if self.projection.is_empty() {
            None
        } else {
            Some(self.focus.min(self.projection.len() - 1))
        }
    }

    pub fn focused_id(&self) -> Option<&str> {
        self.focus_index().map(|i| self.projection[i].as_str())
    }

    fn focused_node(&self) -> Option<&FlatNode> {
        self.focused_id().and_then(|id| self.index.get(id))
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    /// Details for the selection; `None` means nothing selected or an unknown id
    pub fn selected_node(&self) -> Option<&FlatNode> {
        self.selection.as_deref().and_then(|id| self.node(id))
    }

    pub fn node(&self, id: &str) -> Option<&FlatNode> {
        self.index.get(id)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_search_active(&self) -> bool {
        is_query_active(&self.query)
    }

    pub fn manual_expanded(&self) -> &HashSet<String> {
        &self.expanded
    }

    /// Whether `id` is open in the effective (search-aware) expansion
    pub fn is_expanded(&self, id: &str) -> bool {
        self.effective_expanded.contains(id)
    }

    pub fn pinned_ids(&self) -> &[String] {
        &self.pinned
    }

    pub fn is_pinned(&self, id: &str) -> bool {
        self.pinned.iter().any(|p| p == id)
    }

    /// Pinned nodes in pin order
    pub fn quick_access(&self) -> Vec<&FlatNode> {
        self.pinned.iter().filter_map(|id| self.node(id)).collect()
    }
}
