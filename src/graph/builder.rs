//! Record ingestion and graph assembly.
//!
//! `build` runs the whole pipeline for one dataset: extract nodes and
//! deduplicated directed edges from the records, apply clustering and
//! simple-network hiding, sort everything by earliest date, then assign
//! network ids and materialize index-based links.

use std::collections::HashMap;

use crate::config::GraphOptions;
use crate::model::{ClusterId, Graph, Node, NodeId, OccurrenceDate, sort_dates};
use crate::record::{self, Record};

use super::cluster;
use super::network::{self, NetworkMaps};

/// A deduplicated directed edge, accumulating every occurrence date for
/// its ordered (source, target) pair.
#[derive(Debug)]
pub(crate) struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub dates: Vec<OccurrenceDate>,
}

/// Scratch adjacency and bookkeeping, rebuilt for every evaluation and
/// discarded once the build completes.
#[derive(Debug, Default)]
pub(crate) struct BuildMaps {
    sources_to_targets: HashMap<NodeId, Vec<NodeId>>,
    targets_to_sources: HashMap<NodeId, Vec<NodeId>>,
    edges: Vec<Edge>,
    edge_index: HashMap<(NodeId, NodeId), usize>,
    pub node_ids_to_cluster_ids: HashMap<NodeId, ClusterId>,
    pub node_ids_to_flags: HashMap<NodeId, bool>,
}

impl BuildMaps {
    /// Record a directed edge, deduplicating by ordered pair. The
    /// occurrence date is accumulated either way.
    fn add_edge(&mut self, source: NodeId, target: NodeId, date: OccurrenceDate) {
        let pair = (source.clone(), target.clone());
        match self.edge_index.get(&pair) {
            Some(&index) => self.edges[index].dates.push(date),
            None => {
                self.sources_to_targets
                    .entry(source.clone())
                    .or_default()
                    .push(target.clone());
                self.targets_to_sources
                    .entry(target.clone())
                    .or_default()
                    .push(source.clone());
                self.edge_index.insert(pair, self.edges.len());
                self.edges.push(Edge {
                    source,
                    target,
                    dates: vec![date],
                });
            }
        }
    }

    /// Nodes this id points at. Each target appears once.
    pub fn targets_of(&self, id: &NodeId) -> &[NodeId] {
        self.sources_to_targets.get(id).map_or(&[], Vec::as_slice)
    }

    /// Nodes pointing at this id. Each source appears once.
    pub fn sources_of(&self, id: &NodeId) -> &[NodeId] {
        self.targets_to_sources.get(id).map_or(&[], Vec::as_slice)
    }

    /// Total edge count touching this id, in either direction.
    pub fn degree(&self, id: &NodeId) -> usize {
        self.targets_of(id).len() + self.sources_of(id).len()
    }

    pub fn flagged(&self, id: &NodeId) -> bool {
        self.node_ids_to_flags.get(id).copied().unwrap_or(false)
    }

    pub fn cluster_of(&self, id: &NodeId) -> Option<ClusterId> {
        self.node_ids_to_cluster_ids.get(id).copied()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge_dates(&self, source: &NodeId, target: &NodeId) -> Option<&[OccurrenceDate]> {
        self.edge_index
            .get(&(source.clone(), target.clone()))
            .map(|&index| self.edges[index].dates.as_slice())
    }
}

/// Extraction state: nodes found so far, id-keyed, in first-seen order.
pub(crate) struct GraphBuilder<'a> {
    options: &'a GraphOptions,
    maps: BuildMaps,
    nodes: Vec<Node>,
    node_index: HashMap<NodeId, usize>,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(options: &'a GraphOptions) -> Self {
        Self {
            options,
            maps: BuildMaps::default(),
            nodes: Vec::new(),
            node_index: HashMap::new(),
        }
    }

    pub fn into_parts(self) -> (Vec<Node>, BuildMaps) {
        (self.nodes, self.maps)
    }

    fn find_or_create(&mut self, id: NodeId) -> usize {
        match self.node_index.get(&id) {
            Some(&index) => index,
            None => {
                let index = self.nodes.len();
                self.nodes.push(Node::new(id.clone()));
                self.node_index.insert(id, index);
                index
            }
        }
    }

    /// Extract the primary node, linked nodes, and directed edges from one
    /// record. Records without a usable primary id are skipped.
    pub fn ingest(&mut self, record: &Record) {
        let options = self.options;
        let Some(primary_id) = record::id_value(record.get(&options.node_field)) else {
            return;
        };

        // One occurrence per record; a missing or unparseable date is still
        // an occurrence so counts survive.
        let date = record::date_value(record::field(record, options.date_field.as_deref()));
        let flag_value = record::bool_value(record::field(record, options.flag_field.as_deref()));

        let name = record::text_value(record::field(record, options.name_field.as_deref()));
        let size = record::number_value(record::field(record, options.size_field.as_deref()));
        let result_flag = options.flag_mode.applies_to_result() && flag_value;

        let index = self.find_or_create(primary_id.clone());
        let node = &mut self.nodes[index];
        node.in_data = true;
        if name.is_some() {
            node.name = name;
        }
        if let Some(size) = size {
            node.size = Some(node.size.map_or(size, |existing| existing.max(size)));
        }
        node.dates.push(date);
        node.flag |= result_flag;
        *self
            .maps
            .node_ids_to_flags
            .entry(primary_id.clone())
            .or_insert(false) |= result_flag;

        let linked_ids =
            record::array_values(record::field(record, options.linked_node_field.as_deref()));
        if linked_ids.is_empty() {
            return;
        }
        let linked_names =
            record::array_values(record::field(record, options.linked_name_field.as_deref()));
        let linked_sizes =
            record::array_values(record::field(record, options.linked_size_field.as_deref()));
        let linked_flag = options.flag_mode.applies_to_linked() && flag_value;

        for (position, raw_id) in linked_ids.iter().enumerate() {
            let Some(linked_id) = record::id_value(Some(raw_id)) else {
                continue;
            };
            if linked_id == primary_id {
                continue;
            }

            let linked_name = record::text_value(linked_names.get(position));
            let linked_size = record::number_value(linked_sizes.get(position));

            let index = self.find_or_create(linked_id.clone());
            let node = &mut self.nodes[index];
            if linked_name.is_some() {
                node.name = linked_name;
            }
            if let Some(size) = linked_size {
                node.size = Some(node.size.map_or(size, |existing| existing.max(size)));
            }
            node.flag |= linked_flag;
            *self
                .maps
                .node_ids_to_flags
                .entry(linked_id.clone())
                .or_insert(false) |= linked_flag;

            // Directed edge: linked node -> primary node.
            self.maps.add_edge(linked_id, primary_id.clone(), date);
        }
    }
}

/// Run the full build for one dataset, replacing the persisted maps.
pub(crate) fn build(
    records: &[Record],
    options: &GraphOptions,
    has_selected: bool,
    persisted: &mut NetworkMaps,
) -> Graph {
    let mut builder = GraphBuilder::new(options);
    for record in records {
        builder.ingest(record);
    }
    let (nodes, mut maps) = builder.into_parts();

    let mut nodes = cluster::assign_clusters(nodes, &mut maps, options, has_selected);
    finalize_date_order(&mut nodes);

    *persisted = NetworkMaps::default();
    persisted.node_ids_to_flags = maps.node_ids_to_flags.clone();

    let mut links = network::finalize_networks_and_create_links(&mut nodes, &maps, persisted);
    links.sort_by_key(|link| link.first_date());

    Graph { nodes, links }
}

/// Sort every date list ascending (dateless last), sort cluster members by
/// earliest date, then sort the node list the same way. The date-bucket
/// indexer relies on this ordering.
fn finalize_date_order(nodes: &mut Vec<Node>) {
    for node in nodes.iter_mut() {
        sort_dates(&mut node.dates);
        if let Some(data) = node.cluster_data_mut() {
            for member in &mut data.members {
                sort_dates(&mut member.dates);
            }
            data.members.sort_by_key(Node::first_date);
            data.visible_members = data.members.len();
        }
    }
    nodes.sort_by_key(Node::first_date);
}
