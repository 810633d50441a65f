//! Snapshot normalisation.
//!
//! Turns any accepted [`TopologySnapshot`] shape into one flat list of VNets,
//! in input order, with hub flags set and peering references cleaned up:
//! - hidden `HV_*` virtual WAN VNet ids are rewritten to their virtual hub id
//! - virtual hub and spoke references are mirrored on both sides
//! - duplicate references are dropped (first occurrence kept)

use crate::models::{SnapshotPeering, TopologySnapshot, Vnet, VnetKind};
use itertools::Itertools;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// Hidden VNet that Azure creates inside a virtual WAN hub.
static HIDDEN_HUB_VNET_REGEX: OnceLock<Regex> = OnceLock::new();
/// Trailing GUID-like blob of a hidden hub resource group name.
static GUID_TAIL_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_hidden_hub_vnet_regex() -> &'static Regex {
    HIDDEN_HUB_VNET_REGEX.get_or_init(|| {
        Regex::new(
            r"(?i)^/subscriptions/[^/]+/resourceGroups/(?P<rg>RG_[^/]+)/providers/Microsoft\.Network/virtualNetworks/HV_[^/]+$",
        )
        .expect("Invalid Regex")
    })
}

fn get_guid_tail_regex() -> &'static Regex {
    GUID_TAIL_REGEX.get_or_init(|| Regex::new(r"^[0-9a-fA-F-]{6,}$").expect("Invalid Regex"))
}

/// Flatten a snapshot into the canonical VNet list.
pub fn normalize_snapshot(snapshot: TopologySnapshot) -> Vec<Vnet> {
    let mut vnets = match snapshot {
        TopologySnapshot::Flat { vnets } => vnets,
        TopologySnapshot::HubAndSpokes { mut hub, spokes } => {
            hub.is_explicit_hub = true;
            std::iter::once(hub).chain(spokes).collect()
        }
        TopologySnapshot::MultiHub {
            mut hubs,
            spokes,
            peerings,
        } => {
            for hub in hubs.iter_mut() {
                hub.is_explicit_hub = true;
            }
            link_snapshot_peerings(&mut hubs, &peerings);
            hubs.into_iter().chain(spokes).collect()
        }
    };

    let mut touched = HashSet::new();
    rewrite_hidden_hub_peerings(&mut vnets, &mut touched);
    mirror_virtual_hub_peerings(&mut vnets, &mut touched);
    dedup_peerings(&mut vnets, &touched);

    log::debug!("normalize_snapshot: {} VNets", vnets.len());
    vnets
}

/// Attach top-level peering names to the hub owning the remote address space,
/// so spokes listing the same peering name share it with the hub.
fn link_snapshot_peerings(hubs: &mut [Vnet], peerings: &[SnapshotPeering]) {
    for peering in peerings {
        let Some(remote) = peering.remote_address_space.as_deref() else {
            continue;
        };
        match hubs
            .iter_mut()
            .find(|hub| hub.address_space.as_deref() == Some(remote))
        {
            Some(hub) => {
                if !hub.peerings.contains(&peering.name) {
                    hub.peerings.push(peering.name.clone());
                }
            }
            None => log::debug!(
                "Peering '{}' targets {remote} which matches no hub, ignored",
                peering.name
            ),
        }
    }
}

/// `RG_p-virtualwan-norwayeast-vhub_88fdc9ad-...` -> `p-virtualwan-norwayeast-vhub`
fn virtual_hub_name_from_hidden_rg(rg_name: &str) -> Option<String> {
    let base = match rg_name.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("RG_") => &rg_name[3..],
        _ => rg_name,
    };
    let base = match base.rsplit_once('_') {
        Some((head, tail)) if get_guid_tail_regex().is_match(tail) => head,
        _ => base,
    };
    let base = base.trim();
    (!base.is_empty()).then(|| base.to_string())
}

fn rewrite_hidden_hub_peerings(vnets: &mut [Vnet], touched: &mut HashSet<usize>) {
    let hub_id_by_name: HashMap<String, String> = vnets
        .iter()
        .filter(|v| v.kind == VnetKind::VirtualHub)
        .filter_map(|v| {
            v.resource_id
                .as_ref()
                .map(|id| (v.name.trim().to_lowercase(), id.clone()))
        })
        .collect();
    if hub_id_by_name.is_empty() {
        return;
    }

    let mut rewrites = 0;
    for (index, vnet) in vnets.iter_mut().enumerate() {
        if vnet.kind == VnetKind::VirtualHub {
            continue;
        }
        for peer in vnet.peering_resource_ids.iter_mut() {
            let Some(captures) = get_hidden_hub_vnet_regex().captures(peer) else {
                continue;
            };
            let hub_id = virtual_hub_name_from_hidden_rg(&captures["rg"])
                .and_then(|name| hub_id_by_name.get(&name.to_lowercase()));
            match hub_id {
                Some(hub_id) => {
                    log::debug!("{}: rewrote {peer} -> {hub_id}", vnet.name);
                    *peer = hub_id.clone();
                    touched.insert(index);
                    rewrites += 1;
                }
                // Keep the unresolved id so the information is not lost.
                None => log::debug!("{}: no virtual hub found for {peer}", vnet.name),
            }
        }
    }
    log::info!("normalize: rewrote {rewrites} hidden HV_* peerings to virtual hub ids");
}

fn mirror_virtual_hub_peerings(vnets: &mut [Vnet], touched: &mut HashSet<usize>) {
    let hub_index_by_id: HashMap<String, usize> = vnets
        .iter()
        .enumerate()
        .filter(|(_, v)| v.kind == VnetKind::VirtualHub)
        .filter_map(|(i, v)| v.resource_id.as_ref().map(|id| (id.to_lowercase(), i)))
        .collect();
    if hub_index_by_id.is_empty() {
        return;
    }
    let index_by_id: HashMap<String, usize> = vnets
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.resource_id.as_ref().map(|id| (id.to_lowercase(), i)))
        .collect();

    // (vnet index, resource id to add to its peerings)
    let mut additions: Vec<(usize, String)> = Vec::new();
    for (index, vnet) in vnets.iter().enumerate() {
        let Some(own_id) = vnet.resource_id.as_ref() else {
            continue;
        };
        if vnet.kind == VnetKind::VirtualHub {
            // hub -> spoke: make sure the spoke lists the hub
            for peer in &vnet.peering_resource_ids {
                if let Some(&spoke_index) = index_by_id.get(&peer.to_lowercase()) {
                    additions.push((spoke_index, own_id.clone()));
                }
            }
        } else {
            // spoke -> hub: make sure the hub lists the spoke
            for peer in &vnet.peering_resource_ids {
                if let Some(&hub_index) = hub_index_by_id.get(&peer.to_lowercase()) {
                    additions.push((hub_index, own_id.clone()));
                }
            }
        }
        log::trace!("mirror scan {index}: {}", vnet.name);
    }

    let mut mirrored = 0;
    for (index, id) in additions {
        let peers = &mut vnets[index].peering_resource_ids;
        if !peers.iter().any(|p| p.eq_ignore_ascii_case(&id)) {
            peers.push(id);
            touched.insert(index);
            mirrored += 1;
        }
    }
    log::info!("normalize: mirrored {mirrored} virtual hub peerings");
}

fn dedup_peerings(vnets: &mut [Vnet], touched: &HashSet<usize>) {
    for (index, vnet) in vnets.iter_mut().enumerate() {
        vnet.peering_resource_ids = std::mem::take(&mut vnet.peering_resource_ids)
            .into_iter()
            .filter(|p| !p.is_empty())
            .unique()
            .collect();
        vnet.peerings = std::mem::take(&mut vnet.peerings)
            .into_iter()
            .filter(|p| !p.is_empty())
            .unique()
            .collect();
        // A declared count is kept unless normalisation changed the references.
        if touched.contains(&index) {
            vnet.peerings_count = Some(vnet.peering_resource_ids.len() + vnet.peerings.len());
        }
    }
}
