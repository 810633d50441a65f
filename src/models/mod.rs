//! Domain models for the VNet topology engine.
//!
//! This module contains the core data structures used throughout the application:
//! - [`resource_id`] - Azure resource id parsing
//! - [`Vnet`] and [`Subnet`] - network entities
//! - [`TopologySnapshot`], [`Zone`] and [`Topology`] - input and resolved topology
//! - [`IdMapping`] - VNet name to diagram id mapping

mod mapping;
pub mod resource_id;
mod topology;
mod vnet;

// Re-export public types
pub use mapping::IdMapping;
pub use resource_id::{
    parse_vnet_identifier, resource_group_from_resource_id, vnet_name_from_resource_id,
    vnet_resource_id, ResourceId, VnetIdentifier,
};
pub use topology::{SnapshotPeering, Topology, TopologySnapshot, VnetRole, Zone};
pub use vnet::{Subnet, Vnet, VnetKind, NOT_AVAILABLE};
