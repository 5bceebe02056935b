use serde::Serialize;
use std::collections::HashMap;

use super::link::Link;
use super::node::{NetworkId, Node, NodeId};

/// The built graph: deduplicated nodes and links, both sorted by earliest
/// date (dateless items first) so a time slider can render prefixes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

impl Graph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Index nodes by their globally unique key.
    pub fn node_indices_by_key(&self) -> HashMap<String, usize> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.key(), index))
            .collect()
    }

    /// Find the output node standing for a record-level id, looking through
    /// cluster membership.
    pub fn node_for_id(&self, id: &NodeId) -> Option<&Node> {
        self.nodes
            .iter()
            .find(|node| node.member_ids().contains(id))
    }

    /// Distinct assigned network ids, in first-appearance order.
    pub fn network_ids(&self) -> Vec<NetworkId> {
        let mut seen = Vec::new();
        for node in &self.nodes {
            if node.network != super::node::UNASSIGNED_NETWORK && !seen.contains(&node.network) {
                seen.push(node.network);
            }
        }
        seen
    }
}
