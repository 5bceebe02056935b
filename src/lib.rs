pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod graph;
pub mod model;
pub mod output;
pub mod record;
pub mod style;

pub use api::{RelgraphError, build_graph, load_records};
pub use cli::Cli;
pub use commands::{cmd_build, cmd_export, cmd_init, cmd_timeline};
pub use config::{FlagMode, GraphOptions, Granularity, TooltipLabels};
pub use graph::{
    Bucketizer, GraphMediator, IntervalBucketizer, NetworkMaps, SelectionState, StyleResolver,
};
pub use model::{Graph, Link, Node, NodeId, NodeKind};
pub use record::Record;
