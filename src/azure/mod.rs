//! Azure CLI and Graph API interaction.
//!
//! - [`cli`] - command execution for Azure CLI
//! - [`cache`] - snapshot files and the dated query cache
//! - [`graph`] - Azure Resource Graph queries for VNets and virtual hubs

mod cache;
mod cli;
mod graph;

// Re-export public types and functions
pub use cache::{cache_file_name, read_snapshot_file, read_topology_cache, write_snapshot_file};
pub use cli::run;
pub use graph::{parse_graph_block, run_az_cli_graph, GraphResponse, GraphVnetRow};
