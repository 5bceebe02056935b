mod build;
mod export;
mod init;
mod timeline;

pub use build::cmd_build;
pub use export::cmd_export;
pub use init::cmd_init;
pub use timeline::cmd_timeline;

use crate::cli::FieldArgs;
use crate::config::GraphOptions;
use crate::record::{self, Record};
use crate::style;
use std::path::Path;

/// Shared context for command execution, reducing boilerplate across commands.
pub struct CommandContext {
    pub records: Vec<Record>,
    pub options: GraphOptions,
}

impl CommandContext {
    /// Load records and options for one command run. Options come from
    /// `.relgraph.toml` next to the records file, with CLI overrides on
    /// top. Returns Err(exit_code) if setup fails.
    pub fn new(records_path: &Path, fields: &FieldArgs) -> Result<Self, i32> {
        let config_dir = records_path.parent().unwrap_or(Path::new("."));
        let mut options = GraphOptions::load(config_dir).unwrap_or_else(|e| {
            style::warning(&format!("Failed to load config: {}. Using defaults.", e));
            GraphOptions::default()
        });
        apply_overrides(&mut options, fields);

        if !options.has_node_field() {
            style::error("No node field configured; pass --node-field or set node_field in .relgraph.toml");
            return Err(1);
        }

        let records = match record::load_records(records_path) {
            Ok(records) => records,
            Err(e) => {
                style::error(&format!(
                    "Could not load records from {}: {}",
                    style::path(records_path),
                    e
                ));
                return Err(1);
            }
        };

        Ok(Self { records, options })
    }
}

fn apply_overrides(options: &mut GraphOptions, fields: &FieldArgs) {
    if let Some(node_field) = &fields.node_field {
        options.node_field = node_field.clone();
    }
    if fields.name_field.is_some() {
        options.name_field = fields.name_field.clone();
    }
    if fields.size_field.is_some() {
        options.size_field = fields.size_field.clone();
    }
    if fields.flag_field.is_some() {
        options.flag_field = fields.flag_field.clone();
    }
    if fields.date_field.is_some() {
        options.date_field = fields.date_field.clone();
    }
    if fields.linked_field.is_some() {
        options.linked_node_field = fields.linked_field.clone();
    }
    if let Some(flag_mode) = fields.flag_mode {
        options.flag_mode = flag_mode;
    }
    if fields.hide_simple {
        options.hide_simple_networks = true;
    }
    if fields.clusters {
        options.use_node_clusters = true;
    }
    if let Some(granularity) = fields.granularity {
        options.granularity = granularity;
    }
}
