//! JSON intermediate representation of a resolved topology.
//!
//! Consumed by diagram renderers and by tooling that diffs topology against
//! rendered output, so identical input must give byte-identical files.

use crate::config::RenderMode;
use crate::models::{IdMapping, Subnet, Topology, Vnet, VnetRole};
use crate::processing::Edge;
use serde::Serialize;
use std::error::Error;
use std::path::Path;

/// File name written into the output directory.
pub const TOPOLOGY_JSON_FILE: &str = "topology_layout.json";

#[derive(Serialize)]
struct TopologyView<'a> {
    mode: String,
    vnets: Vec<VnetView<'a>>,
    zones: Vec<ZoneView<'a>>,
    unattached: Vec<&'a str>,
    mapping: &'a IdMapping,
    edges: &'a [Edge],
}

#[derive(Serialize)]
struct VnetView<'a> {
    name: &'a str,
    diagram_id: Option<&'a str>,
    role: Option<VnetRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    resource_id: Option<&'a str>,
    address_space: &'a str,
    subscription_name: &'a str,
    peerings_count: usize,
    expressroute: bool,
    vpn_gateway: bool,
    firewall: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    subnets: Option<&'a [Subnet]>,
}

#[derive(Serialize)]
struct ZoneView<'a> {
    hub: &'a str,
    hub_index: usize,
    dual_column: bool,
    spokes: Vec<&'a str>,
}

fn vnet_view<'a>(vnet: &'a Vnet, topology: &'a Topology, mode: RenderMode) -> VnetView<'a> {
    VnetView {
        name: &vnet.name,
        diagram_id: topology.mapping().get(&vnet.name),
        role: topology.role_of(&vnet.name),
        resource_id: vnet.resource_id.as_deref(),
        address_space: vnet.address_label(),
        subscription_name: vnet.subscription_label(),
        peerings_count: vnet.peerings_count(),
        expressroute: vnet.expressroute,
        vpn_gateway: vnet.vpn_gateway,
        firewall: vnet.firewall,
        subnets: mode.show_subnets().then_some(vnet.subnets.as_slice()),
    }
}

fn topology_view<'a>(topology: &'a Topology, edges: &'a [Edge], mode: RenderMode) -> TopologyView<'a> {
    let mapping = topology.mapping();
    TopologyView {
        mode: mode.to_string(),
        vnets: topology
            .vnets()
            .iter()
            .map(|v| vnet_view(v, topology, mode))
            .collect(),
        zones: topology
            .zones()
            .iter()
            .enumerate()
            .map(|(zone_index, zone)| ZoneView {
                hub: &zone.hub.name,
                hub_index: zone_index,
                dual_column: zone.spokes.iter().any(|s| {
                    mapping
                        .get(&s.name)
                        .is_some_and(|id| id.starts_with("left_"))
                }),
                spokes: zone.spokes.iter().map(|s| s.name.as_str()).collect(),
            })
            .collect(),
        unattached: topology
            .unattached()
            .iter()
            .map(|v| v.name.as_str())
            .collect(),
        mapping,
        edges,
    }
}

/// Serialize the topology, its edges and the id mapping as pretty JSON.
pub fn to_json_string(
    topology: &Topology,
    edges: &[Edge],
    mode: RenderMode,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&topology_view(topology, edges, mode))
}

/// Write the JSON representation to `path`.
pub fn write_topology_json(
    path: &Path,
    topology: &Topology,
    edges: &[Edge],
    mode: RenderMode,
) -> Result<(), Box<dyn Error>> {
    let json = to_json_string(topology, edges, mode)
        .map_err(|e| format!("Error serializing topology JSON: {e}"))?;
    log::info!("Writing topology layout to {}", path.display());
    std::fs::write(path, json)
        .map_err(|e| format!("Error writing topology file {}: {e}", path.display()))?;
    Ok(())
}
