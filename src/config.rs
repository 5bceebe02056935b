use clap::ValueEnum;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Field mapping and build behavior for one graph evaluation.
///
/// `node_field` is the only required entry; every other field name is
/// optional, and a record missing a configured field is tolerated by
/// treating the value as absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphOptions {
    /// Record field giving the primary node identifier.
    pub node_field: String,
    /// Record field giving the primary node's display name.
    pub name_field: Option<String>,
    /// Record field giving the primary node's numeric weight.
    pub size_field: Option<String>,
    /// Record field giving the boolean flag.
    pub flag_field: Option<String>,
    /// Record field giving the event date.
    pub date_field: Option<String>,
    /// Record field giving zero or more linked node ids (scalar or array).
    pub linked_node_field: Option<String>,
    /// Display names for the linked nodes, parallel to `linked_node_field`.
    pub linked_name_field: Option<String>,
    /// Numeric weights for the linked nodes, parallel to `linked_node_field`.
    pub linked_size_field: Option<String>,
    /// Whether the flag applies to result nodes, linked nodes, or both.
    pub flag_mode: FlagMode,
    /// Suppress nodes and links in components with at most one edge,
    /// unless flagged or selected.
    pub hide_simple_networks: bool,
    /// Collapse interchangeable nodes into cluster nodes.
    pub use_node_clusters: bool,
    /// Bucket granularity for the timeline.
    pub granularity: Granularity,
    pub tooltip: TooltipLabels,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            node_field: String::new(),
            name_field: None,
            size_field: None,
            flag_field: None,
            date_field: None,
            linked_node_field: None,
            linked_name_field: None,
            linked_size_field: None,
            flag_mode: FlagMode::default(),
            hide_simple_networks: false,
            use_node_clusters: false,
            granularity: Granularity::default(),
            tooltip: TooltipLabels::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FlagMode {
    /// Flag only primary (result) nodes.
    Result,
    /// Flag only linked nodes.
    #[default]
    Linked,
    /// Flag both.
    All,
}

impl FlagMode {
    pub fn applies_to_result(self) -> bool {
        matches!(self, FlagMode::Result | FlagMode::All)
    }

    pub fn applies_to_linked(self) -> bool {
        matches!(self, FlagMode::Linked | FlagMode::All)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Hour,
    #[default]
    Day,
    Month,
}

/// Labels substituted into tooltip data for the rendering layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TooltipLabels {
    pub id_label: String,
    pub data_label: String,
    pub name_label: String,
    pub size_label: String,
    pub flag_label: String,
    pub source_name_label: String,
    pub target_name_label: String,
    pub source_size_label: String,
    pub target_size_label: String,
}

impl Default for TooltipLabels {
    fn default() -> Self {
        Self {
            id_label: "ID".to_string(),
            data_label: "Items".to_string(),
            name_label: "Name".to_string(),
            size_label: "Size".to_string(),
            flag_label: "Flagged".to_string(),
            source_name_label: "Source Name".to_string(),
            target_name_label: "Target Name".to_string(),
            source_size_label: "Source Size".to_string(),
            target_size_label: "Target Size".to_string(),
        }
    }
}

impl GraphOptions {
    /// Load options from `.relgraph.toml` under the given directory,
    /// falling back to defaults when no file exists.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join(".relgraph.toml");

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        let options: GraphOptions = toml::from_str(&content)?;
        Ok(options)
    }

    pub fn has_node_field(&self) -> bool {
        !self.node_field.is_empty()
    }
}

/// Starter configuration written by `relgraph init`.
pub fn generate_config_template() -> String {
    r#"# relgraph configuration
# Field names refer to keys in the input record objects.

# Required: the field giving the primary node identifier.
node_field = "id"

# Optional display/weight/flag/date fields for the primary node.
# name_field = "name"
# size_field = "count"
# flag_field = "flagged"
# date_field = "date"

# Optional linked-node fields (scalar or array values).
# linked_node_field = "linked"
# linked_name_field = "linked_names"
# linked_size_field = "linked_counts"

# Whether the flag applies to "result" nodes, "linked" nodes, or "all".
flag_mode = "linked"

# Suppress components with at most one edge.
hide_simple_networks = false

# Collapse interchangeable nodes into cluster nodes.
use_node_clusters = false

# Timeline bucket granularity: "hour", "day", or "month".
granularity = "day"
"#
    .to_string()
}
