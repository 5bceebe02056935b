//! Graph construction and interaction state.
//!
//! [`GraphMediator`] owns the full pipeline: record ingestion, clustering,
//! network assignment, date bucketing, and the hover/click selection that
//! feeds back into the next evaluation. Rendering layers only read from
//! it, through [`StyleResolver`] and the visible prefix accessors.

pub mod builder;
pub mod buckets;
mod cluster;
pub mod network;
pub mod selection;
pub mod style;

use thiserror::Error;

use crate::config::GraphOptions;
use crate::model::{Graph, Link, Node, NodeId};
use crate::record::Record;

pub use buckets::{Bucketizer, DateBucketIndex, IntervalBucketizer, count_dates_through};
pub use network::NetworkMaps;
pub use selection::SelectionState;
pub use style::{NodeColorClass, StyleResolver, TooltipField, calculate_size_log_value};

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("No node field configured; set node_field before evaluating")]
    MissingNodeField,
}

/// Coordinates graph evaluation and interaction state across renders.
///
/// Selection and the persisted network maps survive re-evaluation, so a
/// node selected in one evaluation keeps influencing hiding decisions in
/// the next one.
pub struct GraphMediator {
    options: GraphOptions,
    graph: Graph,
    maps: NetworkMaps,
    selection: SelectionState,
    bucketizer: Option<Box<dyn Bucketizer>>,
    bucket_index: DateBucketIndex,
    visible_nodes: usize,
    visible_links: usize,
}

impl GraphMediator {
    pub fn new(options: GraphOptions) -> Self {
        Self {
            options,
            graph: Graph::default(),
            maps: NetworkMaps::default(),
            selection: SelectionState::default(),
            bucketizer: None,
            bucket_index: DateBucketIndex::default(),
            visible_nodes: 0,
            visible_links: 0,
        }
    }

    /// Rebuild the graph from a fresh record set. Fails before touching
    /// any state when no node field is configured, so the previous graph
    /// stays usable.
    pub fn evaluate(&mut self, records: &[Record]) -> Result<(), GraphError> {
        if !self.options.has_node_field() {
            return Err(GraphError::MissingNodeField);
        }

        let has_selected = self.selection.has_selection();
        self.graph = builder::build(records, &self.options, has_selected, &mut self.maps);
        self.reindex();
        Ok(())
    }

    /// Install (or remove) the time-slider bucketizer. Bucket indices are
    /// rebuilt from the existing sorted lists; clustering and node
    /// identity are untouched.
    pub fn set_bucketizer(&mut self, bucketizer: Option<Box<dyn Bucketizer>>) {
        self.bucketizer = bucketizer;
        self.reindex();
    }

    /// Move the time slider to a bucket, or clear it with `None` to restore
    /// the full graph. No-ops on an empty graph, without a bounded
    /// bucketizer, or when the bucket is unchanged.
    pub fn select_date(&mut self, bucket: Option<usize>) {
        if self.graph.is_empty() {
            return;
        }
        let Some(bucketizer) = &self.bucketizer else {
            return;
        };
        if !bucketizer.is_bounded() {
            return;
        }
        let bucket = bucket.map(|b| b.min(bucketizer.num_buckets() - 1));
        if self.selection.date_bucket == bucket {
            return;
        }

        self.selection.date_bucket = bucket;
        match bucket {
            Some(bucket) => {
                self.visible_nodes = self.bucket_index.node_counts[bucket];
                self.visible_links = self.bucket_index.link_counts[bucket];
                for node in &mut self.graph.nodes {
                    if let Some(data) = node.cluster_data_mut() {
                        data.visible_members = data.member_counts_by_bucket[bucket];
                    }
                }
            }
            None => {
                self.visible_nodes = self.graph.nodes.len();
                self.visible_links = self.graph.links.len();
                for node in &mut self.graph.nodes {
                    if let Some(data) = node.cluster_data_mut() {
                        data.visible_members = data.members.len();
                    }
                }
            }
        }
    }

    /// Hover a node by its index into the visible node list.
    pub fn hover_node(&mut self, index: usize) {
        let Some(node) = self.graph.nodes.get(index) else {
            return;
        };
        let (ids, network) = (node.member_ids(), node.network);
        self.selection.select_on_hover(ids, network);
    }

    /// Hover a link: both endpoints light up.
    pub fn hover_link(&mut self, index: usize) {
        let Some((ids, network)) = self.link_endpoint_ids(index) else {
            return;
        };
        self.selection.select_on_hover(ids, network);
    }

    pub fn end_hover(&mut self) {
        self.selection.deselect_on_hover_end();
    }

    /// Click a node: toggles its (expanded) ids in the selection.
    pub fn click_node(&mut self, index: usize) {
        let Some(node) = self.graph.nodes.get(index) else {
            return;
        };
        let (ids, network) = (node.member_ids(), node.network);
        self.selection.click_node(ids, network);
    }

    /// Click a link: selects both endpoints, never toggling off.
    pub fn click_link(&mut self, index: usize) {
        let Some((ids, network)) = self.link_endpoint_ids(index) else {
            return;
        };
        self.selection.click_link_endpoints(ids, network);
    }

    /// Select a node by record-level id, using the persisted maps to find
    /// its network. Returns false for unknown or already-selected ids.
    pub fn select_node_id(&mut self, id: &NodeId) -> bool {
        self.selection.select_by_external_id(id, &self.maps)
    }

    pub fn deselect_all(&mut self) {
        self.selection.deselect_all();
    }

    pub fn style(&self) -> StyleResolver<'_> {
        StyleResolver::new(
            &self.graph,
            &self.selection,
            self.bucketizer.as_deref(),
            &self.options.tooltip,
        )
    }

    /// Nodes visible for the selected date bucket (all of them when no
    /// bucket is selected).
    pub fn visible_nodes(&self) -> &[Node] {
        &self.graph.nodes[..self.visible_nodes]
    }

    pub fn visible_links(&self) -> &[Link] {
        &self.graph.links[..self.visible_links]
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn network_maps(&self) -> &NetworkMaps {
        &self.maps
    }

    pub fn bucket_index(&self) -> &DateBucketIndex {
        &self.bucket_index
    }

    pub fn options(&self) -> &GraphOptions {
        &self.options
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }

    fn link_endpoint_ids(&self, index: usize) -> Option<(Vec<NodeId>, crate::model::NetworkId)> {
        let link = self.graph.links.get(index)?;
        let mut ids = self.graph.nodes[link.source].member_ids();
        for id in self.graph.nodes[link.target].member_ids() {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Some((ids, link.network))
    }

    fn reindex(&mut self) {
        // Indices are position-based, so any previous bucket selection is
        // meaningless against the rebuilt lists.
        self.selection.date_bucket = None;
        match &self.bucketizer {
            Some(bucketizer) if bucketizer.is_bounded() => {
                self.bucket_index = buckets::initialize_date_buckets(
                    &mut self.graph.nodes,
                    &self.graph.links,
                    bucketizer.as_ref(),
                );
            }
            _ => {
                self.bucket_index = DateBucketIndex::default();
                for node in &mut self.graph.nodes {
                    if let Some(data) = node.cluster_data_mut() {
                        data.member_counts_by_bucket.clear();
                        data.visible_members = data.members.len();
                    }
                }
            }
        }
        self.visible_nodes = self.graph.nodes.len();
        self.visible_links = self.graph.links.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Granularity;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn records(value: serde_json::Value) -> Vec<Record> {
        serde_json::from_value(value).unwrap()
    }

    fn options() -> GraphOptions {
        GraphOptions {
            node_field: "id".to_string(),
            linked_node_field: Some("linked".to_string()),
            date_field: Some("date".to_string()),
            ..GraphOptions::default()
        }
    }

    fn dated_records() -> Vec<Record> {
        records(json!([
            {"id": "a", "linked": ["b"], "date": "2024-01-01T00:00:00Z"},
            {"id": "c", "linked": ["d"], "date": "2024-01-05T00:00:00Z"},
            {"id": "e", "linked": ["f"], "date": "2024-01-09T00:00:00Z"},
        ]))
    }

    fn day_bucketizer() -> Box<dyn Bucketizer> {
        Box::new(IntervalBucketizer::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 9, 0, 0, 0).unwrap(),
            Granularity::Day,
        ))
    }

    #[test]
    fn test_missing_node_field_leaves_graph_untouched() {
        let mut mediator = GraphMediator::new(options());
        mediator.evaluate(&dated_records()).unwrap();
        let nodes_before = mediator.graph().nodes.len();

        let mut broken = GraphMediator::new(GraphOptions::default());
        assert!(matches!(
            broken.evaluate(&dated_records()),
            Err(GraphError::MissingNodeField)
        ));
        assert!(broken.graph().is_empty());

        // A populated mediator keeps its graph when a later evaluation
        // fails the same way.
        mediator.options.node_field.clear();
        assert!(mediator.evaluate(&records(json!([{"id": "z"}]))).is_err());
        assert_eq!(mediator.graph().nodes.len(), nodes_before);
    }

    #[test]
    fn test_select_date_slices_prefixes() {
        let mut mediator = GraphMediator::new(options());
        mediator.evaluate(&dated_records()).unwrap();
        mediator.set_bucketizer(Some(day_bucketizer()));

        assert_eq!(mediator.visible_nodes().len(), 6);
        assert_eq!(mediator.visible_links().len(), 3);

        // Dateless linked nodes sort first and are always visible, so the
        // bucket-0 prefix is them plus the first dated node.
        mediator.select_date(Some(0));
        assert_eq!(mediator.visible_nodes().len(), 4);
        assert_eq!(mediator.visible_links().len(), 1);

        mediator.select_date(Some(4));
        assert_eq!(mediator.visible_nodes().len(), 5);
        assert_eq!(mediator.visible_links().len(), 2);

        // Out-of-range buckets clamp to the last one.
        mediator.select_date(Some(1000));
        assert_eq!(mediator.visible_nodes().len(), 6);

        // Clearing the bucket restores the full graph.
        mediator.select_date(Some(0));
        mediator.select_date(None);
        assert_eq!(mediator.selection().date_bucket, None);
        assert_eq!(mediator.visible_nodes().len(), 6);
        assert_eq!(mediator.visible_links().len(), 3);
    }

    #[test]
    fn test_reevaluation_resets_date_bucket() {
        let data = dated_records();
        let mut mediator = GraphMediator::new(options());
        mediator.evaluate(&data).unwrap();
        mediator.set_bucketizer(Some(day_bucketizer()));
        mediator.select_date(Some(0));
        assert_eq!(mediator.visible_nodes().len(), 4);

        // Rebuilding restores full visibility and must drop the old bucket
        // so re-selecting it is not treated as a no-op.
        mediator.evaluate(&data).unwrap();
        assert_eq!(mediator.selection().date_bucket, None);
        assert_eq!(mediator.visible_nodes().len(), 6);

        mediator.select_date(Some(0));
        assert_eq!(mediator.visible_nodes().len(), 4);
        assert_eq!(mediator.visible_links().len(), 1);
    }

    #[test]
    fn test_select_date_without_bucketizer_is_noop() {
        let mut mediator = GraphMediator::new(options());
        mediator.evaluate(&dated_records()).unwrap();

        mediator.select_date(Some(0));
        assert_eq!(mediator.selection().date_bucket, None);
        assert_eq!(mediator.visible_nodes().len(), 6);
    }

    #[test]
    fn test_set_bucketizer_resets_date_selection() {
        let mut mediator = GraphMediator::new(options());
        mediator.evaluate(&dated_records()).unwrap();
        mediator.set_bucketizer(Some(day_bucketizer()));
        mediator.select_date(Some(0));
        assert_eq!(mediator.visible_nodes().len(), 4);

        let keys_before: Vec<String> =
            mediator.graph().nodes.iter().map(Node::key).collect();
        mediator.set_bucketizer(Some(day_bucketizer()));

        // Full visibility restored, node identity untouched.
        assert_eq!(mediator.selection().date_bucket, None);
        assert_eq!(mediator.visible_nodes().len(), 6);
        let keys_after: Vec<String> =
            mediator.graph().nodes.iter().map(Node::key).collect();
        assert_eq!(keys_before, keys_after);
    }

    #[test]
    fn test_click_and_hover_through_indices() {
        let mut mediator = GraphMediator::new(options());
        mediator.evaluate(&dated_records()).unwrap();

        mediator.click_node(0);
        assert!(mediator.selection().has_selection());
        let network = mediator.selection().graph_network_id;
        assert_eq!(network, Some(mediator.graph().nodes[0].network));

        mediator.hover_link(2);
        assert_eq!(mediator.selection().mouseover_node_ids.len(), 2);
        mediator.end_hover();
        assert!(mediator.selection().mouseover_node_ids.is_empty());

        // Clicking the same node again toggles the selection off.
        mediator.click_node(0);
        assert!(!mediator.selection().has_selection());

        // Out-of-range indices are ignored.
        mediator.click_node(99);
        assert!(!mediator.selection().has_selection());
    }

    #[test]
    fn test_selection_disables_hiding_on_reevaluation() {
        let mut opts = options();
        opts.hide_simple_networks = true;
        let mut mediator = GraphMediator::new(opts);

        let data = records(json!([
            {"id": "b", "linked": ["a"]},
            {"id": "c", "linked": ["b"]},
            {"id": "x", "linked": ["y"]},
        ]));
        mediator.evaluate(&data).unwrap();
        // The single-edge x-y component is suppressed while nothing is
        // selected; the a -> b -> c chain is not trivial and stays.
        assert_eq!(mediator.graph().nodes.len(), 3);

        assert!(mediator.select_node_id(&NodeId::new("a")));
        mediator.evaluate(&data).unwrap();
        assert_eq!(mediator.graph().nodes.len(), 5);

        // Unknown ids are rejected without touching the selection.
        assert!(!mediator.select_node_id(&NodeId::new("zz")));
        assert!(mediator.selection().has_selection());
    }
}
