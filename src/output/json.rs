use crate::model::{Graph, Link, Node};
use crate::output::OutputFormatter;
use serde::Serialize;
use std::io::Write;

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonGraph<'a> {
    node_count: usize,
    link_count: usize,
    network_count: usize,
    nodes: Vec<JsonNode<'a>>,
    links: Vec<JsonLink<'a>>,
}

#[derive(Serialize)]
struct JsonNode<'a> {
    key: String,
    kind: &'static str,
    name: Option<&'a str>,
    size: Option<f64>,
    occurrences: usize,
    members: Option<Vec<String>>,
    network: u32,
    flag: bool,
    first_date: Option<String>,
}

#[derive(Serialize)]
struct JsonLink<'a> {
    key: &'a str,
    source: String,
    target: String,
    occurrences: usize,
    network: u32,
    first_date: Option<String>,
}

impl OutputFormatter for JsonOutput {
    fn format<W: Write>(&self, graph: &Graph, writer: &mut W) -> std::io::Result<()> {
        let json_graph = JsonGraph {
            node_count: graph.nodes.len(),
            link_count: graph.links.len(),
            network_count: graph.network_ids().len(),
            nodes: graph.nodes.iter().map(json_node).collect(),
            links: graph
                .links
                .iter()
                .map(|link| json_link(graph, link))
                .collect(),
        };

        let json = serde_json::to_string_pretty(&json_graph)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

        writeln!(writer, "{}", json)
    }
}

fn json_node(node: &Node) -> JsonNode<'_> {
    JsonNode {
        key: node.key(),
        kind: node.type_name(),
        name: node.name.as_deref(),
        size: node.size,
        occurrences: node.dates.len(),
        members: node
            .cluster_data()
            .map(|data| data.members.iter().map(|m| m.id.to_string()).collect()),
        network: node.network,
        flag: node.flag,
        first_date: node.first_date().map(|d| d.to_rfc3339()),
    }
}

fn json_link<'a>(graph: &'a Graph, link: &'a Link) -> JsonLink<'a> {
    JsonLink {
        key: &link.key,
        source: graph.nodes[link.source].key(),
        target: graph.nodes[link.target].key(),
        occurrences: link.dates.len(),
        network: link.network,
        first_date: link.first_date().map(|d| d.to_rfc3339()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GraphOptions;
    use crate::record::Record;
    use serde_json::{Value, json};

    #[test]
    fn test_json_output_structure() {
        let records: Vec<Record> = serde_json::from_value(json!([
            {"id": "a", "linked": ["b"]},
        ]))
        .unwrap();
        let options = GraphOptions {
            node_field: "id".to_string(),
            linked_node_field: Some("linked".to_string()),
            ..GraphOptions::default()
        };
        let graph = crate::api::build_graph(&records, options).unwrap();

        let mut buffer = Vec::new();
        JsonOutput::new().format(&graph, &mut buffer).unwrap();
        let parsed: Value = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(parsed["node_count"], 2);
        assert_eq!(parsed["link_count"], 1);
        assert_eq!(parsed["network_count"], 1);
        assert_eq!(parsed["links"][0]["source"], "node.b");
        assert_eq!(parsed["links"][0]["target"], "node.a");
    }
}
