//! Prefix tree over command names.
//!
//! Children are kept in a `BTreeMap` so prefix queries come back in
//! lexicographic order without a separate sort.

use std::collections::BTreeMap;

/// A set of names supporting O(k) membership and ordered prefix queries.
///
/// # Examples
///
/// ```
/// use debug_console::core::NameIndex;
///
/// let mut index = NameIndex::new();
/// index.insert("help");
/// index.insert("clear");
/// index.insert("collapse");
///
/// assert!(index.contains("clear"));
/// assert_eq!(index.with_prefix("c"), vec!["clear", "collapse"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    root: Node,
    len: usize,
}

#[derive(Debug, Clone, Default)]
struct Node {
    children: BTreeMap<char, Node>,
    // Full name stored on terminal nodes
    name: Option<Box<str>>,
}

impl NameIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of names.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the index holds no names.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a name. Returns `false` if it was already present.
    pub fn insert(&mut self, name: &str) -> bool {
        let mut node = &mut self.root;
        for c in name.chars() {
            node = node.children.entry(c).or_default();
        }

        if node.name.is_some() {
            return false;
        }

        node.name = Some(name.into());
        self.len += 1;
        true
    }

    /// Exact membership test.
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some_and(|node| node.name.is_some())
    }

    /// All names starting with `prefix` (case-sensitive), sorted.
    ///
    /// An empty prefix yields every name.
    pub fn with_prefix(&self, prefix: &str) -> Vec<&str> {
        let mut out = Vec::new();
        if let Some(start) = self.find(prefix) {
            collect(start, &mut out);
        }
        out
    }

    /// All names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.with_prefix("")
    }

    fn find(&self, key: &str) -> Option<&Node> {
        let mut node = &self.root;
        for c in key.chars() {
            node = node.children.get(&c)?;
        }
        Some(node)
    }
}

// Pre-order walk: a node's own name sorts before any of its extensions.
fn collect<'a>(node: &'a Node, out: &mut Vec<&'a str>) {
    if let Some(name) = &node.name {
        out.push(name);
    }
    for child in node.children.values() {
        collect(child, out);
    }
}
