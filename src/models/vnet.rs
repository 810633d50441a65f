//! Azure Virtual Network (VNet) data model.
//!
//! The JSON field names follow the topology files written by the query side
//! (`resourcegroup_name`, `"nsg": "Yes"`, `"type": "virtual_hub"`, ...). Every
//! optional attribute has a serde default so partial records still load.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

/// Placeholder used for missing address prefixes.
pub const NOT_AVAILABLE: &str = "N/A";

/// What kind of network resource a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VnetKind {
    #[default]
    VirtualNetwork,
    /// A Virtual WAN hub. Always treated as an explicitly designated hub.
    VirtualHub,
}

impl Serialize for VnetKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            VnetKind::VirtualNetwork => serializer.serialize_str("virtual_network"),
            VnetKind::VirtualHub => serializer.serialize_str("virtual_hub"),
        }
    }
}

impl<'de> Deserialize<'de> for VnetKind {
    fn deserialize<D>(deserializer: D) -> Result<VnetKind, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Anything that is not a virtual hub is drawn as a plain VNet.
        let s = Option::<String>::deserialize(deserializer)?;
        Ok(match s {
            Some(kind) if kind.eq_ignore_ascii_case("virtual_hub") => VnetKind::VirtualHub,
            _ => VnetKind::VirtualNetwork,
        })
    }
}

/// `"Yes"` / `"No"` flags as written by the query side. Booleans are accepted too.
mod yes_no {
    use serde::de;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    pub fn serialize<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(if *value { "Yes" } else { "No" })
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Flag>::deserialize(deserializer)? {
            None => Ok(false),
            Some(Flag::Bool(b)) => Ok(b),
            Some(Flag::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "yes" | "true" => Ok(true),
                "no" | "false" | "" => Ok(false),
                _ => Err(de::Error::custom(format!("invalid Yes/No flag: {s}"))),
            },
        }
    }
}

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

/// A subnet inside a VNet. Descriptive only; layout never looks at it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Subnet {
    pub name: String,
    /// Address prefix, `"N/A"` when unknown.
    #[serde(default = "not_available")]
    pub address: String,
    /// A network security group is attached.
    #[serde(rename = "nsg", with = "yes_no", default)]
    pub has_security_group: bool,
    /// A route table (UDR) is attached.
    #[serde(rename = "udr", with = "yes_no", default)]
    pub has_route_table: bool,
}

/// A networked entity: a VNet or a virtual WAN hub.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Vnet {
    /// Display name. Unique within one run in practice, but not guaranteed.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_space: Option<String>,
    #[serde(default)]
    pub subnets: Vec<Subnet>,
    /// Remote VNet resource ids this VNet peers with.
    #[serde(default)]
    pub peering_resource_ids: Vec<String>,
    /// Peering names (pre-shaped hub/spokes input).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub peerings: Vec<String>,
    /// Declared peering count. `None` means "count the references".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peerings_count: Option<usize>,
    #[serde(rename = "type", default)]
    pub kind: VnetKind,
    /// Source data designates this VNet as a hub.
    #[serde(default)]
    pub is_explicit_hub: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,
    #[serde(
        default,
        alias = "resource_group",
        skip_serializing_if = "Option::is_none"
    )]
    pub resourcegroup_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(with = "yes_no", default)]
    pub expressroute: bool,
    #[serde(with = "yes_no", default)]
    pub vpn_gateway: bool,
    #[serde(with = "yes_no", default)]
    pub firewall: bool,
}

impl Vnet {
    /// Create a VNet with only a name; all other attributes take their defaults.
    pub fn new(name: &str) -> Vnet {
        Vnet {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// All peering references: resource ids first, then peering names.
    pub fn peer_refs(&self) -> impl Iterator<Item = &str> {
        self.peering_resource_ids
            .iter()
            .chain(self.peerings.iter())
            .map(String::as_str)
    }

    pub fn has_peerings(&self) -> bool {
        !self.peering_resource_ids.is_empty() || !self.peerings.is_empty()
    }

    /// Declared peering count, or the number of references when none was declared.
    pub fn peerings_count(&self) -> usize {
        self.peerings_count
            .unwrap_or_else(|| self.peering_resource_ids.len() + self.peerings.len())
    }

    /// Source data marks this VNet as a hub.
    pub fn is_flagged_hub(&self) -> bool {
        self.is_explicit_hub || self.kind == VnetKind::VirtualHub
    }

    /// `reference` points at this VNet, by resource id (case-insensitive) or by name.
    pub fn matches_reference(&self, reference: &str) -> bool {
        self.resource_id
            .as_deref()
            .is_some_and(|id| id.eq_ignore_ascii_case(reference))
            || reference == self.name
    }

    /// `self` lists `other` (by resource id or by name) among its peerings.
    pub fn references(&self, other: &Vnet) -> bool {
        self.peer_refs().any(|r| other.matches_reference(r))
    }

    /// The two VNets list a common peering name.
    ///
    /// Only `peerings` names count. A peering name is one link seen from both
    /// ends, while a shared resource id just means both peer the same third VNet.
    pub fn shares_peering_name_with(&self, other: &Vnet) -> bool {
        let mine: HashSet<&str> = self.peerings.iter().map(String::as_str).collect();
        other.peerings.iter().any(|name| mine.contains(name.as_str()))
    }

    pub fn subscription_label(&self) -> &str {
        self.subscription_name.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn address_label(&self) -> &str {
        self.address_space.as_deref().unwrap_or(NOT_AVAILABLE)
    }
}

impl fmt::Display for Vnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] ({} subnets, {} peerings, {})",
            self.name,
            self.address_label(),
            self.subnets.len(),
            self.peerings_count(),
            self.subscription_label()
        )
    }
}
