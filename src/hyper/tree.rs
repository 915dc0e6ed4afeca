//! The fitted transformer tree.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Creation order is the transform
//! sequence: a node is always created after the nodes producing its input columns, so replaying
//! nodes by id transforms and replaying them backwards reverses.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::TransformResult;
use crate::field::Field;
use crate::transformers::{ColumnBinding, Transformer};

/// Index of a node in a [`TransformerTree`].
pub type NodeId = usize;

/// A fitted transformer and the columns it is bound to.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub field: Field,
    pub transformer: Box<dyn Transformer>,
    pub binding: ColumnBinding,
    /// Nodes consuming this node's outputs.
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct TransformerTree {
    nodes: Vec<TreeNode>,
    roots: Vec<NodeId>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct YamlNode {
    outputs: Vec<String>,
    transformer: String,
}

impl TransformerTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, linking it under the nodes that produced its input columns.
    pub fn push(&mut self, field: Field, transformer: Box<dyn Transformer>, binding: ColumnBinding) -> NodeId {
        let id = self.nodes.len();
        let mut parents: Vec<NodeId> = field
            .names()
            .iter()
            .filter_map(|c| self.producer_of(c))
            .collect();
        parents.dedup();
        if parents.is_empty() {
            self.roots.push(id);
        }
        for parent in parents {
            if !self.nodes[parent].children.contains(&id) {
                self.nodes[parent].children.push(id);
            }
        }
        self.nodes.push(TreeNode {
            field,
            transformer,
            binding,
            children: Vec::new(),
        });
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    /// Nodes fitted directly on input fields.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Nodes in transform order.
    pub fn sequence(&self) -> impl DoubleEndedIterator<Item = &TreeNode> {
        self.nodes.iter()
    }

    pub fn find(&self, field: &Field) -> Option<NodeId> {
        self.nodes.iter().position(|n| &n.field == field)
    }

    /// The node whose outputs include `column`.
    pub fn producer_of(&self, column: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.binding.output_columns().iter().any(|c| c == column))
    }

    /// The node that reads `column` as an input.
    pub fn consumer_of(&self, column: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.field.names().iter().any(|c| c == column))
    }

    /// Each output of `id` paired with the node that consumes it, if any.
    pub fn output_consumers(&self, id: NodeId) -> Vec<(String, Option<NodeId>)> {
        self.nodes.get(id).map_or_else(Vec::new, |node| {
            node.binding
                .output_columns()
                .iter()
                .map(|c| (c.clone(), self.consumer_of(c)))
                .collect()
        })
    }

    /// The ML-ready columns descending from `id`, depth first in recorded output order.
    pub fn final_output_columns(&self, id: NodeId) -> Vec<String> {
        let mut columns = Vec::new();
        let mut seen = HashSet::new();
        self.collect_final(id, &mut columns, &mut seen);
        columns
    }

    fn collect_final(&self, id: NodeId, columns: &mut Vec<String>, seen: &mut HashSet<NodeId>) {
        if !seen.insert(id) {
            return;
        }
        for (column, consumer) in self.output_consumers(id) {
            match consumer {
                Some(child) => self.collect_final(child, columns, seen),
                None => columns.push(column),
            }
        }
    }

    /// YAML mapping each field to its outputs and transformer name, in sequence order.
    pub fn to_yaml(&self) -> TransformResult<String> {
        let tree: IndexMap<String, YamlNode> = self
            .nodes
            .iter()
            .map(|n| {
                let node = YamlNode {
                    outputs: n.binding.output_columns().to_vec(),
                    transformer: n.transformer.name().to_string(),
                };
                (n.field.to_string(), node)
            })
            .collect();
        Ok(serde_yaml::to_string(&tree)?)
    }
}
