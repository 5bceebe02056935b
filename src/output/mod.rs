mod json;
mod markdown;

pub use json::JsonOutput;
pub use markdown::MarkdownOutput;

use crate::model::Graph;
use std::io::Write;

pub trait OutputFormatter {
    fn format<W: Write>(&self, graph: &Graph, writer: &mut W) -> std::io::Result<()>;
}
