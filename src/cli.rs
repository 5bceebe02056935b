use crate::config::{FlagMode, Granularity};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "relgraph")]
#[command(about = "Build relationship graphs from flat record data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Records file to build a graph from
    /// Used when no subcommand is specified for backward compatibility
    pub records: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build the graph and print it (default behavior)
    Build(BuildArgs),

    /// Show cumulative node/link counts per date bucket
    Timeline(TimelineArgs),

    /// Export the graph in Graphviz DOT format
    Export(ExportArgs),

    /// Generate a starter .relgraph.toml configuration file
    Init(InitArgs),
}

/// Field-mapping overrides shared by the graph-building commands. Anything
/// left unset falls back to `.relgraph.toml` next to the records file.
#[derive(Parser, Debug, Clone, Default)]
pub struct FieldArgs {
    /// Record field giving the primary node identifier
    #[arg(long)]
    pub node_field: Option<String>,

    /// Record field giving the display name
    #[arg(long)]
    pub name_field: Option<String>,

    /// Record field giving the numeric weight
    #[arg(long)]
    pub size_field: Option<String>,

    /// Record field giving the boolean flag
    #[arg(long)]
    pub flag_field: Option<String>,

    /// Record field giving the event date
    #[arg(long)]
    pub date_field: Option<String>,

    /// Record field giving linked node ids (scalar or array)
    #[arg(long)]
    pub linked_field: Option<String>,

    /// Whether the flag applies to result nodes, linked nodes, or both
    #[arg(long)]
    pub flag_mode: Option<FlagMode>,

    /// Suppress components with at most one edge
    #[arg(long)]
    pub hide_simple: bool,

    /// Collapse interchangeable nodes into cluster nodes
    #[arg(long)]
    pub clusters: bool,

    /// Timeline bucket granularity
    #[arg(long)]
    pub granularity: Option<Granularity>,
}

#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    /// Records file (JSON array of flat objects)
    pub records: PathBuf,

    #[command(flatten)]
    pub fields: FieldArgs,

    /// Output format
    #[arg(short, long, default_value = "markdown")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl Default for BuildArgs {
    fn default() -> Self {
        Self {
            records: PathBuf::new(),
            fields: FieldArgs::default(),
            format: OutputFormat::Markdown,
            output: None,
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct TimelineArgs {
    /// Records file (JSON array of flat objects)
    pub records: PathBuf,

    #[command(flatten)]
    pub fields: FieldArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct ExportArgs {
    /// Records file (JSON array of flat objects)
    pub records: PathBuf,

    #[command(flatten)]
    pub fields: FieldArgs,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Path where to create .relgraph.toml (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}
