//! Azure resource identifier parsing.
//!
//! A VNet resource id looks like
//! `/subscriptions/{sub}/resourceGroups/{rg}/providers/Microsoft.Network/virtualNetworks/{name}`.
//! Literal segments are compared case-insensitively, as Azure does.

use crate::error::TopologyError;
use std::fmt;

pub const NETWORK_PROVIDER: &str = "Microsoft.Network";
pub const VNET_RESOURCE_TYPE: &str = "virtualNetworks";
pub const VHUB_RESOURCE_TYPE: &str = "virtualHubs";

/// Number of `/`-separated parts in a full id, counting the empty part before the leading `/`.
const RESOURCE_ID_PARTS: usize = 9;

/// A parsed ARM resource id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId {
    pub subscription_id: String,
    pub resource_group: String,
    pub provider: String,
    pub resource_type: String,
    pub name: String,
}

impl ResourceId {
    /// Parse any `/subscriptions/../resourceGroups/../providers/{ns}/{type}/{name}` id.
    pub fn parse(resource_id: &str) -> Result<ResourceId, TopologyError> {
        let parts = split_resource_id(resource_id)?;
        let literals = [(1, "subscriptions"), (3, "resourceGroups"), (5, "providers")];
        for (index, expected) in literals {
            if !parts[index].eq_ignore_ascii_case(expected) {
                return Err(TopologyError::invalid_identifier(
                    resource_id,
                    format!(
                        "expected '{expected}' at segment {index}, found '{}'",
                        parts[index]
                    ),
                ));
            }
        }
        Ok(ResourceId {
            subscription_id: parts[2].to_string(),
            resource_group: parts[4].to_string(),
            provider: parts[6].to_string(),
            resource_type: parts[7].to_string(),
            name: parts[8].to_string(),
        })
    }

    /// Build the id of a VNet.
    pub fn vnet(subscription_id: &str, resource_group: &str, name: &str) -> ResourceId {
        ResourceId {
            subscription_id: subscription_id.to_string(),
            resource_group: resource_group.to_string(),
            provider: NETWORK_PROVIDER.to_string(),
            resource_type: VNET_RESOURCE_TYPE.to_string(),
            name: name.to_string(),
        }
    }

    pub fn is_vnet(&self) -> bool {
        self.is_network_type(VNET_RESOURCE_TYPE)
    }

    pub fn is_virtual_hub(&self) -> bool {
        self.is_network_type(VHUB_RESOURCE_TYPE)
    }

    fn is_network_type(&self, resource_type: &str) -> bool {
        self.provider.eq_ignore_ascii_case(NETWORK_PROVIDER)
            && self.resource_type.eq_ignore_ascii_case(resource_type)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/subscriptions/{}/resourceGroups/{}/providers/{}/{}/{}",
            self.subscription_id, self.resource_group, self.provider, self.resource_type, self.name
        )
    }
}

fn split_resource_id(resource_id: &str) -> Result<Vec<&str>, TopologyError> {
    let parts: Vec<&str> = resource_id.split('/').collect();
    if parts.len() < RESOURCE_ID_PARTS {
        return Err(TopologyError::invalid_identifier(
            resource_id,
            format!(
                "expected at least {RESOURCE_ID_PARTS} '/'-separated segments, found {}",
                parts.len()
            ),
        ));
    }
    Ok(parts)
}

/// Canonical VNet resource id for `{sub, rg, name}`.
pub fn vnet_resource_id(subscription_id: &str, resource_group: &str, name: &str) -> String {
    ResourceId::vnet(subscription_id, resource_group, name).to_string()
}

/// Extract the VNet short name from a full resource id.
///
/// Only the segment count and the resource type are checked. An id ending in
/// `/` yields an empty name rather than an error.
pub fn vnet_name_from_resource_id(resource_id: &str) -> Result<String, TopologyError> {
    let parts = split_resource_id(resource_id)?;
    if !parts[7].eq_ignore_ascii_case(VNET_RESOURCE_TYPE) {
        return Err(TopologyError::invalid_identifier(
            resource_id,
            format!(
                "resource type '{}' is not '{VNET_RESOURCE_TYPE}'",
                parts[7]
            ),
        ));
    }
    Ok(parts[8].to_string())
}

/// Extract the resource group segment of a resource id.
pub fn resource_group_from_resource_id(resource_id: &str) -> Result<String, TopologyError> {
    let parts = split_resource_id(resource_id)?;
    Ok(parts[4].to_string())
}

/// A user-supplied VNet reference, as accepted on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VnetIdentifier {
    pub subscription_id: Option<String>,
    pub resource_group: Option<String>,
    pub name: String,
}

impl fmt::Display for VnetIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(subscription_id) = &self.subscription_id {
            write!(f, "{subscription_id}/")?;
        }
        if let Some(resource_group) = &self.resource_group {
            write!(f, "{resource_group}/")?;
        }
        write!(f, "{}", self.name)
    }
}

/// Parse a VNet reference in one of these forms:
///
/// * full resource id (every literal segment is checked)
/// * `{subscription}/{resource_group}/{name}`
/// * `{resource_group}/{name}`
/// * `{name}`
///
/// A bare name cannot be told apart from a one-segment id, so subscription and
/// resource group are left unresolved.
pub fn parse_vnet_identifier(identifier: &str) -> Result<VnetIdentifier, TopologyError> {
    if identifier.starts_with('/') {
        let id = ResourceId::parse(identifier)?;
        if !id.is_vnet() {
            return Err(TopologyError::invalid_identifier(
                identifier,
                format!(
                    "expected '{NETWORK_PROVIDER}/{VNET_RESOURCE_TYPE}', found '{}/{}'",
                    id.provider, id.resource_type
                ),
            ));
        }
        return Ok(VnetIdentifier {
            subscription_id: Some(id.subscription_id),
            resource_group: Some(id.resource_group),
            name: id.name,
        });
    }

    let parts: Vec<&str> = identifier.split('/').collect();
    match parts.as_slice() {
        [name] => Ok(VnetIdentifier {
            subscription_id: None,
            resource_group: None,
            name: name.to_string(),
        }),
        [resource_group, name] => Ok(VnetIdentifier {
            subscription_id: None,
            resource_group: Some(resource_group.to_string()),
            name: name.to_string(),
        }),
        [subscription_id, resource_group, name] => Ok(VnetIdentifier {
            subscription_id: Some(subscription_id.to_string()),
            resource_group: Some(resource_group.to_string()),
            name: name.to_string(),
        }),
        _ => Err(TopologyError::invalid_identifier(
            identifier,
            "expected 'subscription/resource_group/vnet_name' or a full resource id",
        )),
    }
}
