//! Topology to layout processing.
//!
//! The pipeline runs once per snapshot:
//! - [`normalize`] - snapshot shapes to one canonical VNet list
//! - [`filter`] - optional selection of hubs and their peers
//! - [`hub`] - hub detection
//! - [`zone`] - spoke to zone assignment, unattached VNets
//! - [`layout`] - diagram id assignment
//! - [`edges`] - renderer edges from the resolved topology

mod edges;
mod filter;
mod hub;
mod layout;
mod normalize;
mod zone;

use crate::config::LayoutConfig;
use crate::error::TopologyError;
use crate::models::{Topology, TopologySnapshot, Vnet, VnetIdentifier};

// Re-export public functions
pub use edges::{build_edges, Edge, EdgeKind};
pub use filter::{filter_vnets, matches_identifier};
pub use hub::detect_hubs;
pub use layout::{
    assign_layout, hub_id, nonpeered_id, split_columns, spoke_id, uses_dual_column, Column,
};
pub use normalize::normalize_snapshot;
pub use zone::{
    determine_hub_for_spoke, find_first_hub_zone, hub_connections_for_spoke, is_linked,
    resolve_zones, ZoneAssignment,
};

/// Run the full pipeline over one snapshot.
///
/// A snapshot without VNets gives an empty topology, never an error.
pub fn build_topology(snapshot: TopologySnapshot, config: &LayoutConfig) -> Topology {
    lay_out(normalize_snapshot(snapshot), config)
}

/// Run the pipeline over the selected hubs and their peers only.
///
/// An empty selection is the same as [`build_topology`].
pub fn build_filtered_topology(
    snapshot: TopologySnapshot,
    selection: &[VnetIdentifier],
    config: &LayoutConfig,
) -> Result<Topology, TopologyError> {
    let vnets = filter_vnets(normalize_snapshot(snapshot), selection)?;
    Ok(lay_out(vnets, config))
}

fn lay_out(vnets: Vec<Vnet>, config: &LayoutConfig) -> Topology {
    let hub_indices = detect_hubs(&vnets, config);
    let ZoneAssignment { zones, unattached } = resolve_zones(&vnets, &hub_indices);
    let mapping = assign_layout(&vnets, &zones, &unattached, config);
    Topology::new(vnets, zones, unattached, mapping)
}
