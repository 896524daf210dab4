//! Path-addressed trees
//!
//! Every structure the compiler works on (input schemas, setup payloads,
//! value pools, name and type pools) is a tree of string-keyed nodes with
//! values at the leaves. A [`Path`] is the sequence of keys leading from the
//! root to one position in such a tree.
//!
//! Nodes keep their children in a [`BTreeMap`], so every traversal visits
//! keys in sorted order regardless of how the tree was built.

use crate::error::{Result, RuntimeError};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Ordered sequence of keys addressing one position in a [`Tree`]
pub type Path = Vec<String>;

/// Renders a path the way placeholders and error messages spell it: `a.b.c`
pub fn display_path(path: &[String]) -> String {
    path.join(".")
}

/// Builds a [`Path`] from string slices
pub fn path_of(keys: &[&str]) -> Path {
    keys.iter().map(|key| key.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Tree<T> {
    Leaf(T),
    Node(BTreeMap<String, Tree<T>>),
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Tree::Node(BTreeMap::new())
    }
}

impl<T> Tree<T> {
    /// Empty root node
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Tree::Leaf(_))
    }

    pub fn as_leaf(&self) -> Option<&T> {
        match self {
            Tree::Leaf(value) => Some(value),
            Tree::Node(_) => None,
        }
    }

    pub fn children(&self) -> Option<&BTreeMap<String, Tree<T>>> {
        match self {
            Tree::Node(children) => Some(children),
            Tree::Leaf(_) => None,
        }
    }

    /// Subtree at `path`. The empty path addresses the tree itself.
    pub fn get(&self, path: &[String]) -> Option<&Tree<T>> {
        let mut current = self;
        for key in path {
            current = match current {
                Tree::Node(children) => children.get(key)?,
                Tree::Leaf(_) => return None,
            };
        }
        Some(current)
    }

    /// Leaf value at `path`, `None` when the path is missing or ends on a node
    pub fn get_leaf(&self, path: &[String]) -> Option<&T> {
        self.get(path).and_then(Tree::as_leaf)
    }

    /// Stores `value` at `path`, creating intermediate nodes as needed.
    ///
    /// An existing leaf at `path` is replaced. Walking through a leaf, or
    /// replacing a whole subtree with a leaf, is a [`RuntimeError::PathConflict`].
    pub fn put(&mut self, path: &[String], value: T) -> Result<()> {
        let (last, parents) = path.split_last().ok_or(RuntimeError::EmptyPath)?;

        let mut current = self;
        for (depth, key) in parents.iter().enumerate() {
            current = match current {
                Tree::Node(children) => children.entry(key.clone()).or_default(),
                Tree::Leaf(_) => {
                    return Err(RuntimeError::path_conflict(display_path(&path[..depth])))
                }
            };
        }

        match current {
            Tree::Node(children) => {
                if matches!(children.get(last), Some(Tree::Node(_))) {
                    return Err(RuntimeError::path_conflict(display_path(path)));
                }
                children.insert(last.clone(), Tree::Leaf(value));
                Ok(())
            }
            Tree::Leaf(_) => Err(RuntimeError::path_conflict(display_path(parents))),
        }
    }

    /// Every leaf with its path, in sorted key order
    pub fn leaves(&self) -> Vec<(Path, &T)> {
        let mut out = Vec::new();
        self.collect_leaves(&mut Vec::new(), &mut out);
        out
    }

    /// Paths of the leaves accepted by `predicate`, in sorted key order
    pub fn paths_where(&self, predicate: impl Fn(&T) -> bool) -> Vec<Path> {
        self.leaves()
            .into_iter()
            .filter(|(_, value)| predicate(value))
            .map(|(path, _)| path)
            .collect()
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Tree::Leaf(_) => 1,
            Tree::Node(children) => children.values().map(Tree::leaf_count).sum(),
        }
    }

    fn collect_leaves<'a>(&'a self, prefix: &mut Path, out: &mut Vec<(Path, &'a T)>) {
        match self {
            Tree::Leaf(value) => out.push((prefix.clone(), value)),
            Tree::Node(children) => {
                for (key, child) in children {
                    prefix.push(key.clone());
                    child.collect_leaves(prefix, out);
                    prefix.pop();
                }
            }
        }
    }
}

impl Tree<Value> {
    /// Imports arbitrary JSON: objects become nodes, everything else a leaf
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Object(map) => Tree::Node(
                map.iter().map(|(key, child)| (key.clone(), Tree::from_json(child))).collect(),
            ),
            other => Tree::Leaf(other.clone()),
        }
    }
}
