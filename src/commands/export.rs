use crate::api;
use crate::cli::ExportArgs;
use crate::model::Graph;
use crate::style;
use petgraph::dot::Dot;
use petgraph::graph::DiGraph;
use std::fs::File;
use std::io::{self, Write};

pub fn cmd_export(args: ExportArgs) -> i32 {
    let ctx = match super::CommandContext::new(&args.records, &args.fields) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let graph = match api::build_graph(&ctx.records, ctx.options) {
        Ok(graph) => graph,
        Err(e) => {
            style::error(&format!("Failed to build graph: {}", e));
            return 1;
        }
    };

    let dot = render_dot(&graph);
    let result = match &args.output {
        Some(path) => File::create(path).and_then(|mut file| file.write_all(dot.as_bytes())),
        None => io::stdout().lock().write_all(dot.as_bytes()),
    };

    if let Err(e) = result {
        style::error(&format!("Failed to write output: {}", e));
        return 1;
    }
    if let Some(path) = &args.output {
        style::success(&format!("Wrote DOT graph to {}", style::path(path)));
    }
    0
}

/// Mirror the index-based link list into a petgraph graph and render it.
/// Node labels carry the display text, edge labels the occurrence count.
fn render_dot(graph: &Graph) -> String {
    let mut dot_graph: DiGraph<String, usize> = DiGraph::new();

    let indices: Vec<_> = graph
        .nodes
        .iter()
        .map(|node| {
            let label = match node.cluster_data() {
                Some(data) => format!("cluster ({} members)", data.members.len()),
                None => node
                    .name
                    .clone()
                    .unwrap_or_else(|| node.id.to_string()),
            };
            dot_graph.add_node(label)
        })
        .collect();

    for link in &graph.links {
        dot_graph.add_edge(indices[link.source], indices[link.target], link.dates.len());
    }

    // Display formatting keeps the String labels unescaped.
    format!("{}", Dot::new(&dot_graph))
}
