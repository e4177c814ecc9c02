//! Owned template tree.

use crate::ast::{ElementNode, NodeId, TemplateNode};

/// A parsed `<template>` block.
///
/// Nodes are stored in document order; `roots` lists the top-level nodes.
#[derive(Debug, Clone, Default)]
pub struct TemplateTree {
    nodes: Vec<TemplateNode>,
    roots: Vec<NodeId>,
}

impl TemplateTree {
    pub fn new(nodes: Vec<TemplateNode>, roots: Vec<NodeId>) -> Self {
        Self { nodes, roots }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&TemplateNode> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub fn element(&self, id: NodeId) -> Option<&ElementNode> {
        self.get(id).and_then(TemplateNode::as_element)
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(TemplateNode::parent)
    }

    /// Child ids of a node. Non-element nodes have no children.
    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.element(id).map(|el| el.children.as_slice()).unwrap_or(&[])
    }

    /// Every node id in document order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId::new)
    }

    /// Every element in document order.
    pub fn elements(&self) -> impl Iterator<Item = (NodeId, &ElementNode)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.as_element().map(|el| (NodeId::new(i as u32), el)))
    }
}
