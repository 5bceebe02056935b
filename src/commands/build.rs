use crate::api;
use crate::cli::{BuildArgs, OutputFormat};
use crate::output::{JsonOutput, MarkdownOutput, OutputFormatter};
use crate::style;
use std::fs::File;
use std::io::{self, Write};

use super::CommandContext;

pub fn cmd_build(args: BuildArgs) -> i32 {
    let ctx = match CommandContext::new(&args.records, &args.fields) {
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

    let result = match &args.output {
        Some(path) => {
            let file = match File::create(path) {
                Ok(file) => file,
                Err(e) => {
                    style::error(&format!(
                        "Could not create {}: {}",
                        style::path(path),
                        e
                    ));
                    return 1;
                }
            };
            write_graph(&graph, args.format, file)
        }
        None => write_graph(&graph, args.format, io::stdout().lock()),
    };

    if let Err(e) = result {
        style::error(&format!("Failed to write output: {}", e));
        return 1;
    }

    if let Some(path) = &args.output {
        style::success(&format!("Wrote graph to {}", style::path(path)));
    }
    0
}

fn write_graph<W: Write>(
    graph: &crate::model::Graph,
    format: OutputFormat,
    mut writer: W,
) -> io::Result<()> {
    match format {
        OutputFormat::Markdown => MarkdownOutput::new().format(graph, &mut writer),
        OutputFormat::Json => JsonOutput::new().format(graph, &mut writer),
    }
}
