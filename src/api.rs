//! Clean library API for relgraph.
//!
//! This module provides a programmatic interface for using relgraph as a
//! Rust library. Unlike the CLI commands which print output and return
//! exit codes, these functions return proper Result types that can be
//! handled by calling code.
//!
//! # Example
//!
//! ```no_run
//! use relgraph::{build_graph, load_records, GraphOptions};
//! use std::path::Path;
//!
//! let records = load_records(Path::new("records.json"))?;
//! let options = GraphOptions {
//!     node_field: "id".to_string(),
//!     linked_node_field: Some("linked".to_string()),
//!     ..GraphOptions::default()
//! };
//! let graph = build_graph(&records, options)?;
//! println!("{} nodes, {} links", graph.nodes.len(), graph.links.len());
//! # Ok::<(), relgraph::RelgraphError>(())
//! ```

use std::path::Path;
use thiserror::Error;

use crate::config::{ConfigError, GraphOptions};
use crate::graph::{GraphError, GraphMediator};
use crate::model::Graph;
use crate::record::{self, Record, RecordError};

/// Errors that can occur during relgraph operations.
#[derive(Debug, Error)]
pub enum RelgraphError {
    /// Graph evaluation error.
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Record loading or parsing error.
    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Load records from a JSON file containing an array of flat objects.
///
/// # Example
///
/// ```no_run
/// use relgraph::load_records;
/// use std::path::Path;
///
/// let records = load_records(Path::new("records.json"))?;
/// println!("{} records", records.len());
/// # Ok::<(), relgraph::RelgraphError>(())
/// ```
pub fn load_records(path: &Path) -> Result<Vec<Record>, RelgraphError> {
    Ok(record::load_records(path)?)
}

/// Build a relationship graph from a set of records.
///
/// Runs the full pipeline once: node extraction, edge deduplication,
/// clustering, network assignment, and date sorting. For interactive use
/// (time slider, selection) construct a [`GraphMediator`] instead and
/// keep it alive across evaluations.
///
/// # Arguments
///
/// * `records` - The flat input records.
/// * `options` - Field mapping and build behavior; `node_field` is required.
///
/// # Example
///
/// ```
/// use relgraph::{build_graph, GraphOptions, Record};
///
/// let records: Vec<Record> = serde_json::from_str(
///     r#"[{"id": "a", "linked": ["b"]}, {"id": "c", "linked": ["b"]}]"#,
/// ).unwrap();
/// let options = GraphOptions {
///     node_field: "id".to_string(),
///     linked_node_field: Some("linked".to_string()),
///     ..GraphOptions::default()
/// };
/// let graph = build_graph(&records, options)?;
/// assert_eq!(graph.nodes.len(), 3);
/// assert_eq!(graph.links.len(), 2);
/// # Ok::<(), relgraph::RelgraphError>(())
/// ```
pub fn build_graph(records: &[Record], options: GraphOptions) -> Result<Graph, RelgraphError> {
    let mut mediator = GraphMediator::new(options);
    mediator.evaluate(records)?;
    Ok(mediator.into_graph())
}
