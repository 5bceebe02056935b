//! Network (connected-component) assignment and link materialization.
//!
//! Links stay directed, but component membership treats them as
//! undirected: walking the deduplicated edges in input order, the two
//! endpoints' network ids are unioned with first-wins semantics. On a
//! merge the losing id is relabeled everywhere (nodes, already-built
//! links, persisted maps) so the `network` field is always current.

use std::collections::{HashMap, HashSet};

use crate::model::{Link, NetworkId, Node, NodeId, UNASSIGNED_NETWORK, sort_dates};

use super::builder::BuildMaps;

/// Maps that outlive the build and back the selection/query API.
#[derive(Debug, Clone, Default)]
pub struct NetworkMaps {
    pub node_ids_to_flags: HashMap<NodeId, bool>,
    pub node_ids_to_network_ids: HashMap<NodeId, NetworkId>,
    pub network_ids_to_node_ids: HashMap<NetworkId, Vec<NodeId>>,
}

impl NetworkMaps {
    pub fn network_of(&self, id: &NodeId) -> Option<NetworkId> {
        self.node_ids_to_network_ids.get(id).copied()
    }
}

/// Resolve edges to (possibly clustered) node indices, union networks, and
/// emit deduplicated index-based links.
pub(crate) fn finalize_networks_and_create_links(
    nodes: &mut [Node],
    maps: &BuildMaps,
    persisted: &mut NetworkMaps,
) -> Vec<Link> {
    let key_to_index: HashMap<String, usize> = nodes
        .iter()
        .enumerate()
        .map(|(index, node)| (node.key(), index))
        .collect();

    let resolve = |id: &NodeId| -> Option<usize> {
        let key = match maps.cluster_of(id) {
            Some(cluster_id) => format!("cluster.{}", cluster_id),
            None => format!("node.{}", id),
        };
        key_to_index.get(&key).copied()
    };

    let mut links: Vec<Link> = Vec::new();
    let mut seen_pairs: HashSet<(usize, usize)> = HashSet::new();
    let mut next_network: NetworkId = 1;

    for edge in maps.edges() {
        // Either endpoint may have been hidden; the edge goes with it.
        let (Some(source_index), Some(target_index)) =
            (resolve(&edge.source), resolve(&edge.target))
        else {
            continue;
        };

        let network = match (nodes[source_index].network, nodes[target_index].network) {
            (UNASSIGNED_NETWORK, UNASSIGNED_NETWORK) => {
                let network = next_network;
                next_network += 1;
                assign_network(nodes, persisted, source_index, network);
                assign_network(nodes, persisted, target_index, network);
                network
            }
            (network, UNASSIGNED_NETWORK) => {
                assign_network(nodes, persisted, target_index, network);
                network
            }
            (UNASSIGNED_NETWORK, network) => {
                assign_network(nodes, persisted, source_index, network);
                network
            }
            (source_network, target_network) if source_network == target_network => source_network,
            (source_network, target_network) => {
                relabel_network(nodes, &mut links, persisted, target_network, source_network);
                source_network
            }
        };

        if seen_pairs.insert((source_index, target_index)) {
            let mut link = Link::new(
                source_index,
                target_index,
                &nodes[source_index].key(),
                &nodes[target_index].key(),
            );
            link.dates = merged_edge_dates(&nodes[source_index], &nodes[target_index], maps);
            sort_dates(&mut link.dates);
            link.network = network;
            links.push(link);
        }
    }

    links
}

fn assign_network(
    nodes: &mut [Node],
    persisted: &mut NetworkMaps,
    index: usize,
    network: NetworkId,
) {
    nodes[index].network = network;

    let members = persisted.network_ids_to_node_ids.entry(network).or_default();
    for id in nodes[index].member_ids() {
        persisted.node_ids_to_network_ids.insert(id.clone(), network);
        if !members.contains(&id) {
            members.push(id);
        }
    }
}

/// Move every carrier of `old` over to `new`: node fields, link fields,
/// and both persisted maps.
fn relabel_network(
    nodes: &mut [Node],
    links: &mut [Link],
    persisted: &mut NetworkMaps,
    old: NetworkId,
    new: NetworkId,
) {
    for node in nodes.iter_mut() {
        if node.network == old {
            node.network = new;
        }
    }
    for link in links.iter_mut() {
        if link.network == old {
            link.network = new;
        }
    }

    if let Some(moved) = persisted.network_ids_to_node_ids.remove(&old) {
        for id in &moved {
            persisted.node_ids_to_network_ids.insert(id.clone(), new);
        }
        let members = persisted.network_ids_to_node_ids.entry(new).or_default();
        for id in moved {
            if !members.contains(&id) {
                members.push(id);
            }
        }
    }
}

/// All occurrence dates behind one output link. When an endpoint is a
/// cluster this is the concatenation over every member pair's recorded
/// edge dates.
fn merged_edge_dates(
    source: &Node,
    target: &Node,
    maps: &BuildMaps,
) -> Vec<crate::model::OccurrenceDate> {
    let mut dates = Vec::new();
    for source_id in source.member_ids() {
        for target_id in target.member_ids() {
            if let Some(edge_dates) = maps.edge_dates(&source_id, &target_id) {
                dates.extend_from_slice(edge_dates);
            }
        }
    }
    dates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GraphOptions;
    use crate::graph::builder;
    use crate::model::Graph;
    use crate::record::Record;
    use serde_json::{Value, json};
    use std::collections::HashMap;

    fn build(value: Value, options: &GraphOptions) -> (Graph, NetworkMaps) {
        let records: Vec<Record> = serde_json::from_value(value).unwrap();
        let mut persisted = NetworkMaps::default();
        let graph = builder::build(&records, options, false, &mut persisted);
        (graph, persisted)
    }

    fn options() -> GraphOptions {
        GraphOptions {
            node_field: "id".to_string(),
            linked_node_field: Some("linked".to_string()),
            ..GraphOptions::default()
        }
    }

    #[test]
    fn test_networks_match_undirected_reachability() {
        let (graph, _) = build(
            json!([
                {"id": "a", "linked": ["b"]},
                {"id": "c", "linked": ["b"]},
                {"id": "x", "linked": ["y"]},
                {"id": "lone"},
            ]),
            &options(),
        );

        // Union-find over the undirected link graph must agree with the
        // assigned network ids.
        let mut components: HashMap<NetworkId, Vec<&str>> = HashMap::new();
        for node in &graph.nodes {
            components
                .entry(node.network)
                .or_default()
                .push(node.id.as_str());
        }

        let abc = graph.node_for_id(&"a".into()).unwrap().network;
        let mut first = components.remove(&abc).unwrap();
        first.sort();
        assert_eq!(first, vec!["a", "b", "c"]);

        let xy = graph.node_for_id(&"x".into()).unwrap().network;
        let mut second = components.remove(&xy).unwrap();
        second.sort();
        assert_eq!(second, vec!["x", "y"]);

        // Unlinked nodes stay unassigned.
        assert_eq!(graph.node_for_id(&"lone".into()).unwrap().network, 0);
    }

    #[test]
    fn test_persisted_maps_cover_cluster_members() {
        let mut opts = options();
        opts.use_node_clusters = true;
        let (graph, persisted) = build(
            json!([
                {"id": "hub", "linked": ["p1", "p2", "p3"]},
                {"id": "out", "linked": ["hub"]},
            ]),
            &opts,
        );

        let network = graph.node_for_id(&"hub".into()).unwrap().network;
        for id in ["hub", "out", "p1", "p2", "p3"] {
            assert_eq!(persisted.network_of(&id.into()), Some(network), "{}", id);
        }
        let mut members = persisted.network_ids_to_node_ids[&network].clone();
        members.sort();
        assert_eq!(members.len(), 5);
    }

    #[test]
    fn test_cluster_link_merges_member_pair_dates() {
        let mut opts = options();
        opts.use_node_clusters = true;
        opts.date_field = Some("date".to_string());
        let (graph, _) = build(
            json!([
                {"id": "hub", "linked": ["p1", "p2"], "date": "2024-01-01T00:00:00Z"},
                {"id": "hub", "linked": ["p1"], "date": "2024-01-03T00:00:00Z"},
                {"id": "out", "linked": ["hub"], "date": "2024-01-05T00:00:00Z"},
            ]),
            &opts,
        );

        // One link from the pendant cluster to hub carrying all three
        // pendant edge dates, one link hub -> out.
        assert_eq!(graph.links.len(), 2);
        let cluster_index = graph
            .nodes
            .iter()
            .position(|n| n.is_cluster())
            .unwrap();
        let cluster_link = graph
            .links
            .iter()
            .find(|l| l.source == cluster_index)
            .unwrap();
        assert_eq!(cluster_link.dates.len(), 3);
    }

    #[test]
    fn test_directed_pairs_stay_distinct() {
        // a->b and b->a are two ordered pairs, so two links, one network.
        let (graph, _) = build(
            json!([
                {"id": "a", "linked": ["b"]},
                {"id": "b", "linked": ["a"]},
            ]),
            &options(),
        );

        assert_eq!(graph.links.len(), 2);
        assert_eq!(graph.network_ids().len(), 1);
    }

    #[test]
    fn test_links_sorted_by_earliest_date() {
        let mut opts = options();
        opts.date_field = Some("date".to_string());
        let (graph, _) = build(
            json!([
                {"id": "a", "linked": ["b"], "date": "2024-02-01T00:00:00Z"},
                {"id": "c", "linked": ["d"], "date": "2024-01-01T00:00:00Z"},
                {"id": "e", "linked": ["f"]},
            ]),
            &opts,
        );

        let firsts: Vec<_> = graph.links.iter().map(Link::first_date).collect();
        assert_eq!(firsts[0], None);
        assert!(firsts[1].unwrap() < firsts[2].unwrap());
    }
}
