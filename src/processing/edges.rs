//! Edges between diagram ids, for the renderer.

use super::zone::hub_connections_for_spoke;
use crate::models::{IdMapping, Topology, Vnet};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Zone hub to one of its own spokes.
    HubToSpoke,
    /// Spoke to a hub of another zone it is also linked to.
    CrossZone,
    SpokeToSpoke,
    HubToHub,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::HubToSpoke => write!(f, "hub_to_spoke"),
            EdgeKind::CrossZone => write!(f, "cross_zone"),
            EdgeKind::SpokeToSpoke => write!(f, "spoke_to_spoke"),
            EdgeKind::HubToHub => write!(f, "hub_to_hub"),
        }
    }
}

/// A connection between two diagram ids.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
}

/// All edges of a resolved topology, in a stable order: per zone the hub and
/// cross-zone edges of each spoke, then hub to hub, then spoke to spoke.
pub fn build_edges(topology: &Topology) -> Vec<Edge> {
    let mapping = topology.mapping();
    let hubs: Vec<Vnet> = topology.hubs().cloned().collect();
    let mut edges = Vec::new();

    for (zone_index, zone) in topology.zones().iter().enumerate() {
        for spoke in &zone.spokes {
            let Some(spoke_id) = mapping.get(&spoke.name) else {
                log::debug!("Spoke '{}' has no diagram id, no edges", spoke.name);
                continue;
            };
            for hub_index in hub_connections_for_spoke(spoke, &hubs) {
                let Some(hub_id) = mapping.get(&hubs[hub_index].name) else {
                    continue;
                };
                let edge = if hub_index == zone_index {
                    Edge {
                        source: hub_id.to_string(),
                        target: spoke_id.to_string(),
                        kind: EdgeKind::HubToSpoke,
                    }
                } else {
                    Edge {
                        source: spoke_id.to_string(),
                        target: hub_id.to_string(),
                        kind: EdgeKind::CrossZone,
                    }
                };
                edges.push(edge);
            }
        }
    }

    let hub_refs: Vec<&Vnet> = hubs.iter().collect();
    edges.extend(peer_edges(&hub_refs, mapping, EdgeKind::HubToHub));

    let spoke_refs: Vec<&Vnet> = topology
        .zones()
        .iter()
        .flat_map(|zone| zone.spokes.iter())
        .collect();
    edges.extend(peer_edges(&spoke_refs, mapping, EdgeKind::SpokeToSpoke));

    log::info!("Built {} edge(s)", edges.len());
    edges
}

/// Edges between members of one role that reference each other, one per
/// unordered name pair.
fn peer_edges(group: &[&Vnet], mapping: &IdMapping, kind: EdgeKind) -> Vec<Edge> {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut edges = Vec::new();

    for (i, a) in group.iter().enumerate() {
        for b in &group[i + 1..] {
            if a.name == b.name {
                continue;
            }
            let forward = a.references(b);
            let backward = b.references(a);
            if !forward && !backward {
                continue;
            }
            if forward != backward {
                log::debug!("One-sided peering between '{}' and '{}'", a.name, b.name);
            }
            let pair = if a.name <= b.name {
                (a.name.as_str(), b.name.as_str())
            } else {
                (b.name.as_str(), a.name.as_str())
            };
            if !seen.insert(pair) {
                continue;
            }
            if let (Some(source), Some(target)) = (mapping.get(&a.name), mapping.get(&b.name)) {
                edges.push(Edge {
                    source: source.to_string(),
                    target: target.to_string(),
                    kind,
                });
            }
        }
    }
    edges
}
