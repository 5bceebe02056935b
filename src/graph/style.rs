//! Pure styling resolution for the rendering collaborator.
//!
//! Every function here is a read-only projection of node/link attributes,
//! the selection state, and the selected date bucket. Nothing in this
//! module mutates graph state.

use crate::config::TooltipLabels;
use crate::model::{Graph, Link, Node};

use super::buckets::{Bucketizer, count_dates_through};
use super::selection::SelectionState;

/// Rendering-agnostic color category for a node. The rendering layer maps
/// these onto its theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeColorClass {
    /// Part of the current click or hover selection.
    Selected,
    Flagged,
    Cluster,
    /// Appeared as a primary (result) node.
    Data,
    /// Only ever seen as a linked node.
    Linked,
}

/// One label/value pair of structured tooltip data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipField {
    pub label: String,
    pub value: String,
}

impl TooltipField {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

pub struct StyleResolver<'a> {
    graph: &'a Graph,
    selection: &'a SelectionState,
    bucketizer: Option<&'a dyn Bucketizer>,
    labels: &'a TooltipLabels,
}

impl<'a> StyleResolver<'a> {
    pub(crate) fn new(
        graph: &'a Graph,
        selection: &'a SelectionState,
        bucketizer: Option<&'a dyn Bucketizer>,
        labels: &'a TooltipLabels,
    ) -> Self {
        Self {
            graph,
            selection,
            bucketizer,
            labels,
        }
    }

    /// Node radius: 10 plus a log-stepped bump capped at 20.
    pub fn node_size(&self, node: &Node) -> f64 {
        10.0 + calculate_size_log_value(self.node_count(node), 2.0).min(20.0)
    }

    /// Link width: 2 plus a log-stepped bump capped at 10.
    pub fn link_size(&self, link: &Link) -> f64 {
        let count = count_dates_through(&link.dates, self.bucketizer, self.selection.date_bucket);
        2.0 + calculate_size_log_value(count as f64, 1.0).min(10.0)
    }

    pub fn node_opacity(&self, node: &Node) -> f64 {
        self.network_opacity(node.network)
    }

    pub fn link_opacity(&self, link: &Link) -> f64 {
        self.network_opacity(link.network)
    }

    pub fn node_color_class(&self, node: &Node) -> NodeColorClass {
        let selected = node
            .member_ids()
            .iter()
            .any(|id| self.selection.is_selected(id) || self.selection.is_hovered(id));
        if selected {
            NodeColorClass::Selected
        } else if node.flag {
            NodeColorClass::Flagged
        } else if node.is_cluster() {
            NodeColorClass::Cluster
        } else if node.in_data {
            NodeColorClass::Data
        } else {
            NodeColorClass::Linked
        }
    }

    /// Display text: member count for clusters (respecting the selected
    /// bucket), otherwise name falling back to id.
    pub fn node_text(&self, node: &Node) -> String {
        match node.cluster_data() {
            Some(data) => data.visible_members.to_string(),
            None => node
                .name
                .clone()
                .unwrap_or_else(|| node.id.to_string()),
        }
    }

    pub fn node_tooltip(&self, node: &Node) -> Vec<TooltipField> {
        let mut fields = Vec::new();
        match node.cluster_data() {
            Some(data) => {
                fields.push(TooltipField::new(
                    &self.labels.data_label,
                    data.visible_members.to_string(),
                ));
            }
            None => {
                fields.push(TooltipField::new(&self.labels.id_label, node.id.to_string()));
                if let Some(name) = &node.name {
                    fields.push(TooltipField::new(&self.labels.name_label, name.clone()));
                }
            }
        }
        fields.push(TooltipField::new(
            &self.labels.size_label,
            format_count(self.node_count(node)),
        ));
        if node.flag {
            fields.push(TooltipField::new(&self.labels.flag_label, "true"));
        }
        fields
    }

    pub fn link_tooltip(&self, link: &Link) -> Vec<TooltipField> {
        let source = &self.graph.nodes[link.source];
        let target = &self.graph.nodes[link.target];
        vec![
            TooltipField::new(&self.labels.source_name_label, self.node_text(source)),
            TooltipField::new(&self.labels.target_name_label, self.node_text(target)),
            TooltipField::new(
                &self.labels.source_size_label,
                format_count(self.node_count(source)),
            ),
            TooltipField::new(
                &self.labels.target_size_label,
                format_count(self.node_count(target)),
            ),
        ]
    }

    /// Stored size wins; otherwise occurrences up to the selected bucket.
    fn node_count(&self, node: &Node) -> f64 {
        match node.size {
            Some(size) => size,
            None => {
                count_dates_through(&node.dates, self.bucketizer, self.selection.date_bucket)
                    as f64
            }
        }
    }

    fn network_opacity(&self, network: crate::model::NetworkId) -> f64 {
        match self.selection.active_network() {
            Some(active) if active != network => 0.4,
            _ => 1.0,
        }
    }
}

/// Log-stepped size bump: `m * floor(log10(n))`, plus `floor(m/2)` past
/// the midpoint between successive powers of ten. Counts below one
/// contribute nothing.
pub fn calculate_size_log_value(count: f64, multiplier: f64) -> f64 {
    if count < 1.0 {
        return 0.0;
    }
    let magnitude = count.log10();
    let mut value = multiplier * magnitude.floor();
    if magnitude.round() != magnitude.floor() {
        value += (multiplier / 2.0).floor();
    }
    value
}

fn format_count(count: f64) -> String {
    if count.fract() == 0.0 {
        format!("{}", count as i64)
    } else {
        format!("{}", count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeId;

    #[test]
    fn test_size_log_steps() {
        // Below the midpoint of a decade: no bump.
        assert_eq!(calculate_size_log_value(1.0, 2.0), 0.0);
        assert_eq!(calculate_size_log_value(2.0, 2.0), 0.0);
        // Past the midpoint the half-step applies: log10(5) ~ 0.699 rounds
        // to 1 while flooring to 0.
        assert_eq!(calculate_size_log_value(5.0, 2.0), 1.0);
        assert_eq!(calculate_size_log_value(10.0, 2.0), 2.0);
        assert_eq!(calculate_size_log_value(50.0, 2.0), 3.0);
        assert_eq!(calculate_size_log_value(100.0, 2.0), 4.0);
        // With multiplier 1 the half step floors to zero.
        assert_eq!(calculate_size_log_value(5.0, 1.0), 0.0);
        assert_eq!(calculate_size_log_value(10.0, 1.0), 1.0);
        // Degenerate counts.
        assert_eq!(calculate_size_log_value(0.0, 2.0), 0.0);
    }

    #[test]
    fn test_node_size_uses_date_count_when_sizeless() {
        let graph = Graph::default();
        let selection = SelectionState::default();
        let labels = TooltipLabels::default();
        let resolver = StyleResolver::new(&graph, &selection, None, &labels);

        let mut node = Node::new(NodeId::new("a"));
        node.dates = vec![None, None];
        assert_eq!(resolver.node_size(&node), 10.0);

        node.size = Some(100.0);
        assert_eq!(resolver.node_size(&node), 14.0);
    }

    #[test]
    fn test_opacity_dims_other_networks() {
        let graph = Graph::default();
        let mut selection = SelectionState::default();
        selection.click_node(vec![NodeId::new("a")], 1);
        let labels = TooltipLabels::default();
        let resolver = StyleResolver::new(&graph, &selection, None, &labels);

        let mut inside = Node::new(NodeId::new("a"));
        inside.network = 1;
        let mut outside = Node::new(NodeId::new("b"));
        outside.network = 2;

        assert_eq!(resolver.node_opacity(&inside), 1.0);
        assert_eq!(resolver.node_opacity(&outside), 0.4);
    }

    #[test]
    fn test_tooltip_fields() {
        let graph = Graph::default();
        let selection = SelectionState::default();
        let labels = TooltipLabels::default();
        let resolver = StyleResolver::new(&graph, &selection, None, &labels);

        let mut node = Node::new(NodeId::new("a"));
        node.name = Some("Alice".to_string());
        node.flag = true;
        node.dates = vec![None];

        let fields = resolver.node_tooltip(&node);
        let labels: Vec<_> = fields.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, vec!["ID", "Name", "Size", "Flagged"]);
        assert_eq!(fields[2].value, "1");
    }
}
