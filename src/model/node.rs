use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Identifier for a node, normalized from the raw record value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Connected-component identifier. Zero means unassigned.
pub type NetworkId = u32;

pub const UNASSIGNED_NETWORK: NetworkId = 0;

/// Cluster identifier. Zero is reserved for the shared cluster of nodes
/// with no edges.
pub type ClusterId = u32;

pub const UNLINKED_CLUSTER_ID: ClusterId = 0;

/// An occurrence date. `None` marks a record that carried no usable date;
/// dateless occurrences still count toward sizing.
pub type OccurrenceDate = Option<DateTime<Utc>>;

/// A graph node: either an individual record node or a cluster of
/// interchangeable nodes collapsed into one.
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub name: Option<String>,
    pub size: Option<f64>,
    #[serde(flatten)]
    pub kind: NodeKind,
    /// Occurrence dates, sorted ascending with dateless entries last.
    pub dates: Vec<OccurrenceDate>,
    pub network: NetworkId,
    pub flag: bool,
    /// True when the node appeared as a primary (result) node, not only
    /// as a linked one. Used by the styling layer.
    pub in_data: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    Node,
    Cluster(ClusterData),
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ClusterData {
    /// Member nodes, sorted by earliest date like the top-level node list.
    pub members: Vec<Node>,
    /// Cumulative member counts per date bucket; rebuilt by the indexer.
    #[serde(skip)]
    pub member_counts_by_bucket: Vec<usize>,
    /// How many leading members are visible for the selected date bucket.
    pub visible_members: usize,
}

impl Node {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            name: None,
            size: None,
            kind: NodeKind::Node,
            dates: Vec::new(),
            network: UNASSIGNED_NETWORK,
            flag: false,
            in_data: false,
        }
    }

    pub fn cluster(cluster_id: ClusterId) -> Self {
        Self {
            id: NodeId::new(cluster_id.to_string()),
            name: None,
            size: None,
            kind: NodeKind::Cluster(ClusterData::default()),
            dates: Vec::new(),
            network: UNASSIGNED_NETWORK,
            flag: false,
            in_data: false,
        }
    }

    pub fn is_cluster(&self) -> bool {
        matches!(self.kind, NodeKind::Cluster(_))
    }

    pub fn type_name(&self) -> &'static str {
        match self.kind {
            NodeKind::Node => "node",
            NodeKind::Cluster(_) => "cluster",
        }
    }

    /// Globally unique identity used for keyed data binding: `type.id`.
    /// Plain ids are only unique within nodes of the same type.
    pub fn key(&self) -> String {
        format!("{}.{}", self.type_name(), self.id)
    }

    /// The underlying record-level ids this node stands for: the member ids
    /// of a cluster, or the node's own id.
    pub fn member_ids(&self) -> Vec<NodeId> {
        match &self.kind {
            NodeKind::Node => vec![self.id.clone()],
            NodeKind::Cluster(data) => data.members.iter().map(|m| m.id.clone()).collect(),
        }
    }

    pub fn member_count(&self) -> usize {
        match &self.kind {
            NodeKind::Node => 1,
            NodeKind::Cluster(data) => data.members.len(),
        }
    }

    pub fn cluster_data(&self) -> Option<&ClusterData> {
        match &self.kind {
            NodeKind::Node => None,
            NodeKind::Cluster(data) => Some(data),
        }
    }

    pub fn cluster_data_mut(&mut self) -> Option<&mut ClusterData> {
        match &mut self.kind {
            NodeKind::Node => None,
            NodeKind::Cluster(data) => Some(data),
        }
    }

    /// Earliest real date of any occurrence, if one exists.
    pub fn first_date(&self) -> Option<DateTime<Utc>> {
        first_date(&self.dates)
    }
}

/// Earliest real date in an occurrence list.
pub fn first_date(dates: &[OccurrenceDate]) -> Option<DateTime<Utc>> {
    dates.iter().flatten().min().copied()
}

/// Sort occurrence dates ascending, dateless entries last.
pub fn sort_dates(dates: &mut [OccurrenceDate]) {
    dates.sort_by(compare_dates);
}

fn compare_dates(a: &OccurrenceDate, b: &OccurrenceDate) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
