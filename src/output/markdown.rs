use crate::model::Graph;
use crate::output::OutputFormatter;
use std::io::Write;

pub struct MarkdownOutput;

impl MarkdownOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MarkdownOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for MarkdownOutput {
    fn format<W: Write>(&self, graph: &Graph, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "# Relationship Graph")?;
        writeln!(writer)?;
        writeln!(writer, "- Nodes: {}", graph.nodes.len())?;
        writeln!(writer, "- Links: {}", graph.links.len())?;
        writeln!(writer, "- Networks: {}", graph.network_ids().len())?;
        writeln!(writer)?;

        if graph.nodes.is_empty() {
            writeln!(writer, "_Empty graph._")?;
            return Ok(());
        }

        writeln!(writer, "## Nodes")?;
        writeln!(writer)?;
        writeln!(writer, "| Key | Name | Occurrences | Network | Flag |")?;
        writeln!(writer, "|-----|------|-------------|---------|------|")?;
        for node in &graph.nodes {
            let name = match node.cluster_data() {
                Some(data) => format!("({} members)", data.members.len()),
                None => node.name.clone().unwrap_or_default(),
            };
            writeln!(
                writer,
                "| {} | {} | {} | {} | {} |",
                node.key(),
                name,
                node.dates.len(),
                node.network,
                if node.flag { "yes" } else { "" },
            )?;
        }
        writeln!(writer)?;

        writeln!(writer, "## Links")?;
        writeln!(writer)?;
        writeln!(writer, "| Source | Target | Occurrences | Network |")?;
        writeln!(writer, "|--------|--------|-------------|---------|")?;
        for link in &graph.links {
            writeln!(
                writer,
                "| {} | {} | {} | {} |",
                graph.nodes[link.source].key(),
                graph.nodes[link.target].key(),
                link.dates.len(),
                link.network,
            )?;
        }

        Ok(())
    }
}
