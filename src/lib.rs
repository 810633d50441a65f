//! Azure VNet hub/spoke topology to diagram layout engine.
//!
//! Reads a VNet snapshot (a file, or an `az graph query` result cached per day),
//! groups VNets into hub zones and gives every VNet a stable diagram id.

pub mod azure;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod processing;

use config::LayoutConfig;
use models::{Topology, Vnet, VnetIdentifier};
use std::collections::HashSet;
use std::error::Error;

pub use error::TopologyError;

/// Load a snapshot and resolve it into a laid out topology.
///
/// # Arguments
/// * `topology_file` - snapshot path; `None` uses (or builds) today's az graph cache
/// * `vnets` - hubs to keep with their peers; empty keeps every VNet
pub async fn get_topology(
    topology_file: Option<&str>,
    vnets: &[VnetIdentifier],
    config: &LayoutConfig,
) -> Result<Topology, Box<dyn Error>> {
    let snapshot = azure::read_topology_cache(topology_file).await?;
    Ok(processing::build_filtered_topology(snapshot, vnets, config)?)
}

/// Names used by more than one VNet, in first-seen order.
///
/// VNets in different subscriptions may share a name; only the last one keeps
/// its diagram id.
pub fn find_duplicate_names(vnets: &[Vnet]) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for vnet in vnets {
        if !seen.insert(vnet.name.as_str()) && !duplicates.contains(&vnet.name.as_str()) {
            duplicates.push(vnet.name.as_str());
        }
    }
    duplicates
}
