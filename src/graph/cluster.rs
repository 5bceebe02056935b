//! Clustering and simple-network hiding.
//!
//! Nodes whose linking pattern makes them interchangeable are collapsed
//! into cluster nodes; trivial components can be suppressed entirely.
//! A current click-selection disables hiding so a selected network never
//! disappears out from under the user.

use std::collections::HashMap;

use crate::config::GraphOptions;
use crate::model::{ClusterId, Node, NodeId, UNLINKED_CLUSTER_ID};

use super::builder::BuildMaps;

/// Apply the per-node keep/cluster/hide policy, consuming the extracted
/// nodes and returning the surviving node list (standalone nodes and
/// cluster nodes, in first-touch order).
pub(crate) fn assign_clusters(
    nodes: Vec<Node>,
    maps: &mut BuildMaps,
    options: &GraphOptions,
    has_selected: bool,
) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::new();
    let mut cluster_positions: HashMap<ClusterId, usize> = HashMap::new();
    // Cluster id 0 is reserved for the shared unlinked cluster.
    let mut next_cluster_id: ClusterId = UNLINKED_CLUSTER_ID + 1;

    for node in nodes {
        let id = node.id.clone();

        // A node already pulled into a cluster by an earlier member just
        // joins it.
        if let Some(cluster_id) = maps.cluster_of(&id) {
            push_member(&mut out, &mut cluster_positions, cluster_id, node);
            continue;
        }

        // Flagged nodes are always kept as individual nodes.
        if node.flag {
            out.push(node);
            continue;
        }

        let target_count = maps.targets_of(&id).len();
        let source_count = maps.sources_of(&id).len();

        if target_count > 1 || source_count > 1 || (target_count == 1 && source_count == 1) {
            if options.use_node_clusters {
                let matching = find_node_ids_for_multiple_link_cluster(&id, maps);
                if matching.len() > 1 {
                    let cluster_id =
                        cluster_id_for(&matching, maps, &mut next_cluster_id);
                    for member in &matching {
                        maps.node_ids_to_cluster_ids
                            .entry(member.clone())
                            .or_insert(cluster_id);
                    }
                    push_member(&mut out, &mut cluster_positions, cluster_id, node);
                    continue;
                }
            }
            let keep = (target_count >= 1 && source_count >= 1)
                || should_add_multiple_link_node(&id, maps, options, has_selected);
            if keep {
                out.push(node);
            }
            continue;
        }

        if target_count + source_count == 1 {
            // A pendant: exactly one edge, in exactly one direction.
            let points_at_hub = target_count == 1;
            let hub = if points_at_hub {
                maps.targets_of(&id)[0].clone()
            } else {
                maps.sources_of(&id)[0].clone()
            };

            let siblings = find_pendant_siblings(&hub, points_at_hub, maps);
            if options.use_node_clusters && siblings.len() >= 2 {
                if should_add_cluster_node(
                    &hub,
                    &siblings,
                    node.flag,
                    points_at_hub,
                    maps,
                    options,
                    has_selected,
                ) {
                    let cluster_id = cluster_id_for(&siblings, maps, &mut next_cluster_id);
                    for member in &siblings {
                        maps.node_ids_to_cluster_ids
                            .entry(member.clone())
                            .or_insert(cluster_id);
                    }
                    push_member(&mut out, &mut cluster_positions, cluster_id, node);
                }
                continue;
            }

            if should_add_single_link_node(&hub, &id, node.flag, points_at_hub, maps, options, has_selected) {
                out.push(node);
            }
            continue;
        }

        // No edges at all.
        if has_selected || !options.hide_simple_networks {
            if options.use_node_clusters {
                push_member(&mut out, &mut cluster_positions, UNLINKED_CLUSTER_ID, node);
            } else {
                out.push(node);
            }
        }
    }

    out
}

/// Append a member to its cluster node, creating the cluster at the
/// current output position on first touch.
fn push_member(
    out: &mut Vec<Node>,
    cluster_positions: &mut HashMap<ClusterId, usize>,
    cluster_id: ClusterId,
    member: Node,
) {
    let position = match cluster_positions.get(&cluster_id) {
        Some(&position) => position,
        None => {
            out.push(Node::cluster(cluster_id));
            cluster_positions.insert(cluster_id, out.len() - 1);
            out.len() - 1
        }
    };

    let cluster = &mut out[position];
    cluster.in_data |= member.in_data;
    cluster.dates.extend(member.dates.iter().copied());
    if let Some(data) = cluster.cluster_data_mut() {
        data.members.push(member);
    }
}

/// Reuse the cluster id any member already carries, otherwise allocate a
/// fresh one.
fn cluster_id_for(
    members: &[NodeId],
    maps: &BuildMaps,
    next_cluster_id: &mut ClusterId,
) -> ClusterId {
    match members.iter().find_map(|member| maps.cluster_of(member)) {
        Some(existing) => existing,
        None => {
            let allocated = *next_cluster_id;
            *next_cluster_id += 1;
            allocated
        }
    }
}

/// Find the maximal set of nodes interchangeable with this one: every
/// candidate must show up in the neighborhood of each of this node's
/// neighbors with the same total multiplicity, and carry exactly the same
/// target and source sets. The returned set always contains the node
/// itself; flagged nodes never qualify.
pub(crate) fn find_node_ids_for_multiple_link_cluster(
    id: &NodeId,
    maps: &BuildMaps,
) -> Vec<NodeId> {
    let targets = maps.targets_of(id);
    let sources = maps.sources_of(id);
    if targets.is_empty() && sources.is_empty() {
        return vec![id.clone()];
    }

    // How often each node is seen from this node's own neighbors.
    let mut appearances: HashMap<&NodeId, usize> = HashMap::new();
    for neighbor in targets.iter().chain(sources.iter()) {
        for seen in maps
            .targets_of(neighbor)
            .iter()
            .chain(maps.sources_of(neighbor).iter())
        {
            *appearances.entry(seen).or_insert(0) += 1;
        }
    }

    let own_count = appearances.get(id).copied().unwrap_or(0);
    let mut members: Vec<NodeId> = appearances
        .into_iter()
        .filter(|&(candidate, count)| {
            count == own_count
                && !maps.flagged(candidate)
                && same_members(maps.targets_of(candidate), targets)
                && same_members(maps.sources_of(candidate), sources)
        })
        .map(|(candidate, _)| candidate.clone())
        .collect();
    members.sort();
    members
}

/// Unflagged pendants sharing this hub as their one and only edge, on the
/// same side as the originating node.
fn find_pendant_siblings(hub: &NodeId, points_at_hub: bool, maps: &BuildMaps) -> Vec<NodeId> {
    let candidates = if points_at_hub {
        maps.sources_of(hub)
    } else {
        maps.targets_of(hub)
    };

    candidates
        .iter()
        .filter(|candidate| maps.degree(candidate) == 1 && !maps.flagged(candidate))
        .cloned()
        .collect()
}

/// Keep a node with multiple edges on one side only, unless hiding is on,
/// nothing is selected, and every neighbor is an unflagged pendant (which
/// makes the whole component trivial).
fn should_add_multiple_link_node(
    id: &NodeId,
    maps: &BuildMaps,
    options: &GraphOptions,
    has_selected: bool,
) -> bool {
    if has_selected || !options.hide_simple_networks {
        return true;
    }

    let all_pendants = maps
        .targets_of(id)
        .iter()
        .chain(maps.sources_of(id).iter())
        .all(|neighbor| maps.degree(neighbor) == 1 && !maps.flagged(neighbor));
    !all_pendants
}

/// Keep a pendant-sibling cluster unless hiding is on, nothing is
/// selected, and the siblings are the hub's entire neighborhood with no
/// edges back out (so hub plus cluster is the whole component).
fn should_add_cluster_node(
    hub: &NodeId,
    siblings: &[NodeId],
    flag: bool,
    points_at_hub: bool,
    maps: &BuildMaps,
    options: &GraphOptions,
    has_selected: bool,
) -> bool {
    if !options.hide_simple_networks || has_selected || flag {
        return true;
    }

    let (hub_near, hub_far) = if points_at_hub {
        (maps.sources_of(hub), maps.targets_of(hub))
    } else {
        (maps.targets_of(hub), maps.sources_of(hub))
    };
    !(hub_far.is_empty() && same_members(hub_near, siblings))
}

/// Keep a standalone pendant unless hiding is on, nothing is selected, and
/// the hub has no other neighbor (a two-node component).
fn should_add_single_link_node(
    hub: &NodeId,
    id: &NodeId,
    flag: bool,
    points_at_hub: bool,
    maps: &BuildMaps,
    options: &GraphOptions,
    has_selected: bool,
) -> bool {
    if !options.hide_simple_networks || has_selected || flag {
        return true;
    }

    let (hub_near, hub_far) = if points_at_hub {
        (maps.sources_of(hub), maps.targets_of(hub))
    } else {
        (maps.targets_of(hub), maps.sources_of(hub))
    };
    !(hub_far.is_empty() && hub_near.len() == 1 && hub_near[0] == *id)
}

fn same_members(a: &[NodeId], b: &[NodeId]) -> bool {
    a.len() == b.len() && a.iter().all(|id| b.contains(id))
}
