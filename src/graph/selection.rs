//! Hover and click selection over the built graph.
//!
//! Click selection is limited to one active network at a time: selecting
//! a node from a different network clears the previous selection first.
//! Cluster expansion happens before these calls; every operation works on
//! record-level node ids.

use crate::model::{NetworkId, NodeId};

use super::network::NetworkMaps;

#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    /// Currently selected date bucket, if any.
    pub date_bucket: Option<usize>,
    /// Click-selected node ids (record-level, clusters expanded).
    pub graph_node_ids: Vec<NodeId>,
    /// Network of the click selection; `None` exactly when the selection
    /// is empty.
    pub graph_network_id: Option<NetworkId>,
    /// Hovered node ids (record-level, clusters expanded).
    pub mouseover_node_ids: Vec<NodeId>,
    pub mouseover_network_id: Option<NetworkId>,
}

impl SelectionState {
    pub fn has_selection(&self) -> bool {
        !self.graph_node_ids.is_empty()
    }

    pub fn is_selected(&self, id: &NodeId) -> bool {
        self.graph_node_ids.contains(id)
    }

    pub fn is_hovered(&self, id: &NodeId) -> bool {
        self.mouseover_node_ids.contains(id)
    }

    /// The network styling should highlight: the click selection wins over
    /// a transient hover.
    pub fn active_network(&self) -> Option<NetworkId> {
        self.graph_network_id.or(self.mouseover_network_id)
    }

    /// Style-only hover selection; never touches the click selection.
    pub fn select_on_hover(&mut self, ids: Vec<NodeId>, network: NetworkId) {
        self.mouseover_node_ids = ids;
        self.mouseover_network_id = Some(network);
    }

    pub fn deselect_on_hover_end(&mut self) {
        self.mouseover_node_ids.clear();
        self.mouseover_network_id = None;
    }

    /// Click on a node: toggles the ids out when every one of them is
    /// already selected, otherwise adds them under the single-network
    /// rule.
    pub fn click_node(&mut self, ids: Vec<NodeId>, network: NetworkId) {
        let all_selected = !ids.is_empty() && ids.iter().all(|id| self.is_selected(id));
        if all_selected {
            self.graph_node_ids.retain(|id| !ids.contains(id));
            if self.graph_node_ids.is_empty() {
                self.graph_network_id = None;
            }
            return;
        }
        self.add_ids(ids, network);
    }

    /// Click on a link endpoint: always adds, never toggles off.
    pub fn click_link_endpoints(&mut self, ids: Vec<NodeId>, network: NetworkId) {
        self.add_ids(ids, network);
    }

    /// Select a node by its external (record-level) id, resolving its
    /// network through the persisted maps. Already-selected ids and
    /// unknown ids are left alone.
    pub fn select_by_external_id(&mut self, id: &NodeId, maps: &NetworkMaps) -> bool {
        if self.is_selected(id) {
            return false;
        }
        let Some(network) = maps.network_of(id) else {
            return false;
        };
        self.add_ids(vec![id.clone()], network);
        true
    }

    pub fn deselect_all(&mut self) {
        self.graph_node_ids.clear();
        self.graph_network_id = None;
    }

    fn add_ids(&mut self, ids: Vec<NodeId>, network: NetworkId) {
        if self.graph_network_id != Some(network) {
            self.graph_node_ids.clear();
            self.graph_network_id = Some(network);
        }
        for id in ids {
            if !self.graph_node_ids.contains(&id) {
                self.graph_node_ids.push(id);
            }
        }
    }
}
