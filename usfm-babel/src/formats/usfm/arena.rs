//! Flat node store used while a document is being built
//!
//! The parser never holds references into the tree it is building. Every
//! node lives in [`NodeStore`] and is addressed by a [`NodeId`]; open scopes
//! (a verse, the children of a milestone or of a display-text span) are plain
//! `Vec<NodeId>`s. Once input is exhausted the ids are materialized into
//! owned [`VerseObject`]s.

use crate::ast::{Marker, Milestone, VerseObject};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId(usize);

#[derive(Debug)]
pub(crate) enum Node {
    Leaf(VerseObject),
    Milestone {
        milestone: Milestone,
        children: Vec<NodeId>,
    },
    Marker {
        marker: Marker,
        children: Vec<NodeId>,
    },
}

#[derive(Debug, Default)]
pub(crate) struct NodeStore {
    nodes: Vec<Node>,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, object: VerseObject) -> NodeId {
        let node = match object {
            VerseObject::Milestone(milestone) => Node::Milestone {
                milestone,
                children: Vec::new(),
            },
            VerseObject::Marker(marker) => Node::Marker {
                marker,
                children: Vec::new(),
            },
            other => Node::Leaf(other),
        };
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Children of a milestone or marker node; `None` for leaves.
    pub fn children_mut(&mut self, id: NodeId) -> Option<&mut Vec<NodeId>> {
        match self.get_mut(id) {
            Node::Milestone { children, .. } | Node::Marker { children, .. } => Some(children),
            Node::Leaf(_) => None,
        }
    }

    /// Appends `text` to a scope, merging into a trailing text node.
    pub fn push_text(&mut self, scope: &mut Vec<NodeId>, text: &str) {
        if let Some(&last) = scope.last() {
            if let Node::Leaf(VerseObject::Text { text: existing }) = self.get_mut(last) {
                existing.push_str(text);
                return;
            }
        }
        let id = self.alloc(VerseObject::text(text));
        scope.push(id);
    }

    /// Moves a node (and its subtree) out of the store.
    pub fn take(&mut self, id: NodeId) -> VerseObject {
        let node = std::mem::replace(&mut self.nodes[id.0], Node::Leaf(VerseObject::text("")));
        match node {
            Node::Leaf(object) => object,
            Node::Milestone {
                mut milestone,
                children,
            } => {
                milestone.children = self.take_all(&children);
                VerseObject::Milestone(milestone)
            }
            Node::Marker {
                mut marker,
                children,
            } => {
                marker.children = self.take_all(&children);
                VerseObject::Marker(marker)
            }
        }
    }

    pub fn take_all(&mut self, ids: &[NodeId]) -> Vec<VerseObject> {
        ids.iter().map(|id| self.take(*id)).collect()
    }
}
