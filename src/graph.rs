//! Work-list traversal over a dependency graph.
//!
//! A graph document lists each node with its successors:
//!
//! ```toml
//! [nodes]
//! app = ["http", "json"]
//! http = ["json", "tls"]
//! json = []
//! ```
//!
//! [`walk`] visits every node reachable from a set of roots exactly once,
//! in discovery order. Successors that have no entry of their own are
//! visited as leaves and reported as missing.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::queue::DedupQueue;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Graph {
    #[serde(default)]
    nodes: BTreeMap<String, Vec<String>>,
}

impl Graph {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let graph: Graph = toml::from_str(s).map_err(|e| Error::Graph(e.to_string()))?;

        for (name, successors) in &graph.nodes {
            if name.is_empty() {
                return Err(Error::Graph("node with empty name".to_string()));
            }
            if successors.iter().any(String::is_empty) {
                return Err(Error::Graph(format!("node {name:?} has an empty successor")));
            }
        }

        Ok(graph)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            Error::Graph(msg) => Error::Graph(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Successors of `node`, or `None` if the graph has no entry for it.
    pub fn successors(&self, node: &str) -> Option<&[String]> {
        self.nodes.get(node).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Result of a traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Walk {
    /// Every reached node, in visit order.
    pub visited: Vec<String>,
    /// Reached nodes with no entry in the graph.
    pub missing: Vec<String>,
}

/// Visit every node reachable from `roots`, breadth-first.
///
/// Repeated roots and cycles are visited once.
pub fn walk<I, S>(graph: &Graph, roots: I) -> Walk
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut queue = DedupQueue::empty(|node: &String| node.clone()).with_name("graph.walk");
    queue.extend(roots.into_iter().map(Into::into));

    let mut walk = Walk::default();
    queue.process(|queue, node| {
        match graph.successors(&node) {
            Some(successors) => queue.extend(successors.iter().cloned()),
            None => walk.missing.push(node.clone()),
        }
        walk.visited.push(node);
    });

    walk
}
