//! Atlas graph shapes.
//!
//! # Invariants
//! - Node and edge ids are unique within one graph.
//! - Node ids are prefixed by kind: `repo:`, `team:`, `language:`.
//! - Edge ids are `<source>-><target>`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Repo,
    Team,
    Language,
}

impl NodeKind {
    /// Prefix used in node ids.
    pub fn id_prefix(self) -> &'static str {
        match self {
            Self::Repo => "repo",
            Self::Team => "team",
            Self::Language => "language",
        }
    }

    /// Builds the stable node id for a name of this kind.
    pub fn node_id(self, name: &str) -> String {
        format!("{}:{name}", self.id_prefix())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// team -> repo
    Owns,
    /// language -> repo
    Uses,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
}

/// Derived graph, rebuilt from the full profile collection on every projection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AtlasGraph {
    pub nodes: Vec<AtlasNode>,
    pub edges: Vec<AtlasEdge>,
}

impl AtlasGraph {
    pub fn node(&self, id: &str) -> Option<&AtlasNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &AtlasNode> {
        self.nodes.iter().filter(move |node| node.kind == kind)
    }

    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &AtlasEdge> {
        self.edges.iter().filter(move |edge| edge.kind == kind)
    }

    /// Returns `active_id` plus every node sharing an edge with it.
    pub fn connected_node_ids(&self, active_id: &str) -> BTreeSet<String> {
        let mut connected = BTreeSet::from([active_id.to_string()]);
        for edge in &self.edges {
            if edge.source == active_id {
                connected.insert(edge.target.clone());
            }
            if edge.target == active_id {
                connected.insert(edge.source.clone());
            }
        }
        connected
    }
}
