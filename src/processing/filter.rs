//! VNet selection.
//!
//! Narrows a topology down to the hubs a user asked for and the VNets they
//! peer with directly. Each selected hub keeps only the resource-id peerings
//! that still resolve inside the selection.

use crate::error::TopologyError;
use crate::models::{ResourceId, Vnet, VnetIdentifier};

/// True when `vnet` is the VNet the identifier names.
///
/// Name, resource group and subscription compare case-insensitively. Parts the
/// identifier leaves out match anything. The VNet's own resource id wins over
/// its descriptive `resourcegroup_name` / `subscription_id` fields.
pub fn matches_identifier(vnet: &Vnet, identifier: &VnetIdentifier) -> bool {
    if !vnet.name.eq_ignore_ascii_case(&identifier.name) {
        return false;
    }
    let parsed = vnet
        .resource_id
        .as_deref()
        .and_then(|id| ResourceId::parse(id).ok());
    let resource_group = parsed
        .as_ref()
        .map(|id| id.resource_group.as_str())
        .or(vnet.resourcegroup_name.as_deref());
    let subscription_id = parsed
        .as_ref()
        .map(|id| id.subscription_id.as_str())
        .or(vnet.subscription_id.as_deref());

    part_matches(identifier.resource_group.as_deref(), resource_group)
        && part_matches(identifier.subscription_id.as_deref(), subscription_id)
}

fn part_matches(wanted: Option<&str>, actual: Option<&str>) -> bool {
    match (wanted, actual) {
        (None, _) => true,
        (Some(wanted), Some(actual)) => wanted.eq_ignore_ascii_case(actual),
        (Some(_), None) => false,
    }
}

/// Keep the selected hubs and the VNets each of them lists.
///
/// An empty selection returns `vnets` untouched. Otherwise the result holds
/// every selected hub followed by its directly peered VNets (input order),
/// without repeats. Selected hubs are flagged as explicit hubs and their
/// resource-id peerings are trimmed to VNets that are present, with the
/// peering count recounted.
///
/// # Errors
/// [`TopologyError::VnetNotFound`] when an identifier matches no VNet.
pub fn filter_vnets(
    vnets: Vec<Vnet>,
    selection: &[VnetIdentifier],
) -> Result<Vec<Vnet>, TopologyError> {
    if selection.is_empty() {
        return Ok(vnets);
    }

    let mut kept: Vec<usize> = Vec::new();
    let mut hubs: Vec<usize> = Vec::new();
    for identifier in selection {
        let mut candidates = vnets
            .iter()
            .enumerate()
            .filter(|(_, vnet)| matches_identifier(vnet, identifier))
            .map(|(index, _)| index);
        let Some(hub_index) = candidates.next() else {
            log::error!("Hub VNet '{identifier}' not found in the topology");
            return Err(TopologyError::VnetNotFound {
                identifier: identifier.to_string(),
            });
        };
        if candidates.next().is_some() {
            log::warn!("'{identifier}' matches more than one VNet, using the first");
        }

        let hub = &vnets[hub_index];
        log::info!(
            "Found hub VNet: {} in subscription {}",
            hub.name,
            hub.subscription_label()
        );
        if !hubs.contains(&hub_index) {
            hubs.push(hub_index);
        }
        if !kept.contains(&hub_index) {
            kept.push(hub_index);
        }
        for (index, peer) in vnets.iter().enumerate() {
            if index != hub_index && hub.references(peer) && !kept.contains(&index) {
                kept.push(index);
            }
        }
    }

    let mut filtered: Vec<Vnet> = kept.iter().map(|&index| vnets[index].clone()).collect();
    for (position, index) in kept.iter().enumerate() {
        if !hubs.contains(index) {
            continue;
        }
        let present: Vec<String> = filtered[position]
            .peering_resource_ids
            .iter()
            .filter(|reference| filtered.iter().any(|v| v.matches_reference(reference)))
            .cloned()
            .collect();
        let hub = &mut filtered[position];
        log::info!(
            "Hub VNet {} has {} accessible peerings out of {} total",
            hub.name,
            present.len(),
            hub.peering_resource_ids.len()
        );
        hub.peering_resource_ids = present;
        hub.peerings_count = None;
        hub.is_explicit_hub = true;
    }

    log::info!(
        "Filtered topology contains {} of {} VNets: {:?}",
        filtered.len(),
        vnets.len(),
        filtered.iter().map(|v| v.name.as_str()).collect::<Vec<_>>()
    );
    Ok(filtered)
}
