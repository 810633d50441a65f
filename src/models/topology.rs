//! Topology snapshot shapes and the resolved topology container.

use super::{IdMapping, Vnet};
use crate::error::TopologyError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A top-level peering record of the multi-hub shape.
///
/// Links spokes listing `name` in their `peerings` to the hub whose
/// `address_space` equals `remote_address_space`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SnapshotPeering {
    pub name: String,
    #[serde(default)]
    pub remote_address_space: Option<String>,
}

/// One run's input, in any of the accepted shapes.
///
/// Decoded with [`TopologySnapshot::from_json_str`], which picks the shape
/// from the top-level keys. Serialises without a tag, as the shape it holds.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum TopologySnapshot {
    /// `{"vnets": [...]}` with resource-id peerings.
    Flat { vnets: Vec<Vnet> },
    /// `{"hub": {...}, "spokes": [...]}`.
    HubAndSpokes {
        hub: Vnet,
        #[serde(default)]
        spokes: Vec<Vnet>,
    },
    /// `{"hubs": [...], "spokes": [...], "peerings": [...]}`.
    MultiHub {
        hubs: Vec<Vnet>,
        #[serde(default)]
        spokes: Vec<Vnet>,
        #[serde(default)]
        peerings: Vec<SnapshotPeering>,
    },
}

#[derive(Deserialize)]
struct FlatShape {
    #[serde(default)]
    vnets: Vec<Vnet>,
}

#[derive(Deserialize)]
struct HubAndSpokesShape {
    hub: Vnet,
    #[serde(default)]
    spokes: Vec<Vnet>,
}

#[derive(Deserialize)]
struct MultiHubShape {
    hubs: Vec<Vnet>,
    #[serde(default)]
    spokes: Vec<Vnet>,
    #[serde(default)]
    peerings: Vec<SnapshotPeering>,
}

impl TopologySnapshot {
    /// Decode a snapshot, picking the shape from its top-level keys.
    ///
    /// Errors report the JSON path of the offending field.
    pub fn from_json_str(json: &str) -> Result<TopologySnapshot, TopologyError> {
        let value: Value = serde_json::from_str(json).map_err(|e| TopologyError::Parse {
            path: ".".to_string(),
            source: e,
        })?;

        let snapshot = if value.get("hub").is_some() {
            let shape: HubAndSpokesShape = deserialize_with_path(value)?;
            TopologySnapshot::HubAndSpokes {
                hub: shape.hub,
                spokes: shape.spokes,
            }
        } else if value.get("hubs").is_some() {
            let shape: MultiHubShape = deserialize_with_path(value)?;
            TopologySnapshot::MultiHub {
                hubs: shape.hubs,
                spokes: shape.spokes,
                peerings: shape.peerings,
            }
        } else {
            if value.get("vnets").is_none() {
                log::warn!("Topology has no 'vnets', 'hub' or 'hubs' key, treating as empty");
            }
            let shape: FlatShape = deserialize_with_path(value)?;
            TopologySnapshot::Flat { vnets: shape.vnets }
        };
        Ok(snapshot)
    }

    /// Number of entity records in the snapshot.
    pub fn len(&self) -> usize {
        match self {
            TopologySnapshot::Flat { vnets } => vnets.len(),
            TopologySnapshot::HubAndSpokes { spokes, .. } => spokes.len() + 1,
            TopologySnapshot::MultiHub { hubs, spokes, .. } => hubs.len() + spokes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn deserialize_with_path<T>(value: Value) -> Result<T, TopologyError>
where
    T: for<'de> Deserialize<'de>,
{
    serde_path_to_error::deserialize(value).map_err(|e| TopologyError::Parse {
        path: e.path().to_string(),
        source: e.into_inner(),
    })
}

/// One hub and the spokes drawn around it.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    pub hub: Vnet,
    /// Position among all detected hubs, in discovery order.
    pub hub_index: usize,
    pub spokes: Vec<Vnet>,
}

impl Zone {
    pub fn new(hub: Vnet, hub_index: usize) -> Zone {
        Zone {
            hub,
            hub_index,
            spokes: Vec::new(),
        }
    }
}

/// Where a VNet ends up in the diagram.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VnetRole {
    Hub,
    Spoke,
    Unattached,
}

impl std::fmt::Display for VnetRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VnetRole::Hub => write!(f, "hub"),
            VnetRole::Spoke => write!(f, "spoke"),
            VnetRole::Unattached => write!(f, "unattached"),
        }
    }
}

/// Resolved topology handed to renderers. Built once per run and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    vnets: Vec<Vnet>,
    zones: Vec<Zone>,
    unattached: Vec<Vnet>,
    mapping: IdMapping,
}

impl Topology {
    pub fn new(
        vnets: Vec<Vnet>,
        zones: Vec<Zone>,
        unattached: Vec<Vnet>,
        mapping: IdMapping,
    ) -> Topology {
        Topology {
            vnets,
            zones,
            unattached,
            mapping,
        }
    }

    /// Every VNet in the snapshot, after normalisation, in input order.
    pub fn vnets(&self) -> &[Vnet] {
        &self.vnets
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn unattached(&self) -> &[Vnet] {
        &self.unattached
    }

    pub fn mapping(&self) -> &IdMapping {
        &self.mapping
    }

    /// Hubs in zone order.
    pub fn hubs(&self) -> impl Iterator<Item = &Vnet> {
        self.zones.iter().map(|zone| &zone.hub)
    }

    pub fn has_hub(&self) -> bool {
        !self.zones.is_empty()
    }

    /// Role of the first VNet with this name, `None` if it was not laid out.
    pub fn role_of(&self, name: &str) -> Option<VnetRole> {
        if self.zones.iter().any(|z| z.hub.name == name) {
            Some(VnetRole::Hub)
        } else if self
            .zones
            .iter()
            .any(|z| z.spokes.iter().any(|s| s.name == name))
        {
            Some(VnetRole::Spoke)
        } else if self.unattached.iter().any(|v| v.name == name) {
            Some(VnetRole::Unattached)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_flat_shape() {
        let snapshot = TopologySnapshot::from_json_str(
            r#"{"vnets": [{"name": "a", "peering_resource_ids": ["x"]}, {"name": "b"}]}"#,
        )
        .unwrap();
        match &snapshot {
            TopologySnapshot::Flat { vnets } => {
                assert_eq!(vnets.len(), 2);
                assert_eq!(vnets[0].peering_resource_ids, vec!["x".to_string()]);
            }
            other => panic!("unexpected shape {other:?}"),
        }
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_snapshot_hub_and_spokes_shape() {
        let snapshot = TopologySnapshot::from_json_str(
            r#"{"hub": {"name": "hub", "peerings": ["hub_to_s1"]},
                "spokes": [{"name": "s1", "peerings": ["s1_to_hub"]}]}"#,
        )
        .unwrap();
        assert!(matches!(snapshot, TopologySnapshot::HubAndSpokes { .. }));
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_snapshot_multi_hub_shape() {
        let snapshot = TopologySnapshot::from_json_str(
            r#"{"hubs": [{"name": "h1", "address_space": "10.0.0.0/16"}],
                "spokes": [],
                "peerings": [{"name": "p1", "remote_address_space": "10.0.0.0/16"}]}"#,
        )
        .unwrap();
        match snapshot {
            TopologySnapshot::MultiHub { hubs, peerings, .. } => {
                assert_eq!(hubs[0].name, "h1");
                assert_eq!(peerings[0].name, "p1");
            }
            other => panic!("unexpected shape {other:?}"),
        }
    }

    #[test]
    fn test_snapshot_empty_object_is_empty_flat() {
        let snapshot = TopologySnapshot::from_json_str("{}").unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_snapshot_parse_error_has_path() {
        let err = TopologySnapshot::from_json_str(r#"{"vnets": [{"name": "a"}, {"name": 7}]}"#)
            .unwrap_err();
        match err {
            TopologyError::Parse { path, .. } => assert_eq!(path, "vnets[1].name"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_snapshot_serializes_as_its_shape() {
        let snapshot = TopologySnapshot::Flat {
            vnets: vec![Vnet::new("a")],
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["vnets"][0]["name"], "a");
        assert_eq!(TopologySnapshot::from_json_str(&json).unwrap(), snapshot);
    }

    #[test]
    fn test_role_of() {
        let mut zone = Zone::new(Vnet::new("hub"), 0);
        zone.spokes.push(Vnet::new("spoke"));
        let topology = Topology::new(
            vec![],
            vec![zone],
            vec![Vnet::new("alone")],
            IdMapping::default(),
        );
        assert_eq!(topology.role_of("hub"), Some(VnetRole::Hub));
        assert_eq!(topology.role_of("spoke"), Some(VnetRole::Spoke));
        assert_eq!(topology.role_of("alone"), Some(VnetRole::Unattached));
        assert_eq!(topology.role_of("ghost"), None);
        assert!(topology.has_hub());
    }
}
