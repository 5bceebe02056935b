mod graph;
mod link;
mod node;

pub use graph::Graph;
pub use link::Link;
pub use node::{
    ClusterData, ClusterId, NetworkId, Node, NodeId, NodeKind, OccurrenceDate,
    UNASSIGNED_NETWORK, UNLINKED_CLUSTER_ID, first_date, sort_dates,
};
