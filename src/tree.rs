use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Instant;

/// Whether a node is a leaf or a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::File => write!(f, "file"),
            NodeKind::Folder => write!(f, "folder"),
        }
    }
}

/// Size as supplied by the payload: a byte count, any other number, or a display label
/// like "2.4 MB"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SizeLabel {
    Bytes(u64),
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for SizeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeLabel::Bytes(bytes) => write!(f, "{} B", bytes),
            SizeLabel::Number(number) => write!(f, "{} B", number),
            SizeLabel::Text(label) => write!(f, "{}", label),
        }
    }
}

/// A node of the nested input tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<SizeLabel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RawNode>,
}

impl RawNode {
    /// Create a new file node
    pub fn file(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: NodeKind::File,
            size: None,
            modified: None,
            children: Vec::new(),
        }
    }

    /// Create a new folder node with the given children, kept in order
    pub fn folder(id: impl Into<String>, name: impl Into<String>, children: Vec<RawNode>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: NodeKind::Folder,
            size: None,
            modified: None,
            children,
        }
    }

    pub fn with_size(mut self, size: SizeLabel) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_modified(mut self, modified: impl Into<String>) -> Self {
        self.modified = Some(modified.into());
        self
    }
}

/// A node of the flattened index. `parent_id` and `children_ids` are lookup keys into the
/// owning `FlatIndex`, never ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatNode {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub size: Option<SizeLabel>,
    pub modified: Option<String>,
    pub parent_id: Option<String>,
    pub depth: usize,
    pub children_ids: Vec<String>,
    pub has_children: bool,
}

impl FlatNode {
    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    /// Lowercase extension without the dot. Empty for dotfiles and names without one.
    pub fn extension(&self) -> String {
        match self.name.rfind('.') {
            Some(0) | None => String::new(),
            Some(dot) => self.name[dot + 1..].to_lowercase(),
        }
    }

    /// Modification time, when the payload carries a valid RFC 3339 timestamp
    pub fn modified_at(&self) -> Option<chrono::DateTime<chrono::FixedOffset>> {
        self.modified
            .as_deref()
            .and_then(|raw| chrono::DateTime::parse_from_rfc3339(raw).ok())
    }
}

/// Flat id -> node mapping plus the top-level order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatIndex {
    nodes: HashMap<String, FlatNode>,
    root_ids: Vec<String>,
}

impl FlatIndex {
    /// Flatten a forest in pre-order. Duplicate ids are not rejected: the last occurrence wins.
    pub fn from_forest(forest: &[RawNode]) -> Self {
        let start_time = Instant::now();
        let mut index = Self::default();

        for node in forest {
            index.root_ids.push(node.id.clone());
            index.walk(node, None, 0);
        }

        log::info!(
            "FlatIndex::from_forest: indexed {} nodes ({} roots) in {:?}",
            index.nodes.len(),
            index.root_ids.len(),
            start_time.elapsed()
        );

        index
    }

    fn walk(&mut self, node: &RawNode, parent_id: Option<&str>, depth: usize) {
        let children_ids: Vec<String> = node.children.iter().map(|c| c.id.clone()).collect();
        let has_children = node.kind == NodeKind::Folder && !children_ids.is_empty();

        let flat = FlatNode {
            id: node.id.clone(),
            name: node.name.clone(),
            kind: node.kind,
            size: node.size.clone(),
            modified: node.modified.clone(),
            parent_id: parent_id.map(str::to_string),
            depth,
            children_ids,
            has_children,
        };

        if self.nodes.insert(node.id.clone(), flat).is_some() {
            log::warn!("FlatIndex: duplicate id {:?}, keeping the last occurrence", node.id);
        }

        for child in &node.children {
            self.walk(child, Some(&node.id), depth + 1);
        }
    }

    pub fn get(&self, id: &str) -> Option<&FlatNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn root_ids(&self) -> &[String] {
        &self.root_ids
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &FlatNode> {
        self.nodes.values()
    }

    /// Parent ids from the root down to, but excluding, `id`. Empty for roots and unknown ids.
    pub fn ancestor_chain(&self, id: &str) -> Vec<String> {
        let mut chain = Vec::new();
        let mut current = self.nodes.get(id);

        // Bounded by the node count so a malformed (cyclic) input cannot loop forever
        while let Some(parent_id) = current.and_then(|node| node.parent_id.as_ref()) {
            if chain.len() >= self.nodes.len() {
                break;
            }
            chain.push(parent_id.clone());
            current = self.nodes.get(parent_id);
        }

        chain.reverse();
        chain
    }
}

/// Read a JSON forest (array of nodes) from disk
pub fn load_forest_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<RawNode>> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let forest: Vec<RawNode> = serde_json::from_str(&content)?;
    log::debug!(
        "load_forest_from_file: {} top-level nodes from {:?}",
        forest.len(),
        path.as_ref()
    );
    Ok(forest)
}
