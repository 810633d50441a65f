//! Hub detection.
//!
//! Policy, first match wins:
//! 1. VNets the source data flags as hubs (`is_explicit_hub`, virtual WAN hubs)
//! 2. with a configured threshold, VNets with at least that many peerings
//! 3. the single VNet with the most peerings, earliest in input order on ties
//!
//! Step 3 is a heuristic: the busiest VNet is not necessarily the real hub.

use crate::config::LayoutConfig;
use crate::models::Vnet;

/// Indices into `vnets` of the detected hubs, in input order.
///
/// Empty input gives no hubs.
pub fn detect_hubs(vnets: &[Vnet], config: &LayoutConfig) -> Vec<usize> {
    let flagged: Vec<usize> = vnets
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_flagged_hub())
        .map(|(i, _)| i)
        .collect();
    if !flagged.is_empty() {
        log::info!("Hub detection: {} explicitly flagged hub(s)", flagged.len());
        return flagged;
    }

    if let Some(threshold) = config.hub_peering_threshold {
        let above: Vec<usize> = vnets
            .iter()
            .enumerate()
            .filter(|(_, v)| v.peerings_count() >= threshold)
            .map(|(i, _)| i)
            .collect();
        if !above.is_empty() {
            log::info!(
                "Hub detection: {} hub(s) with >= {threshold} peerings",
                above.len()
            );
            return above;
        }
    }

    match most_peered(vnets) {
        Some(index) => {
            log::info!(
                "Hub detection: using most peered VNet '{}' ({} peerings) as hub",
                vnets[index].name,
                vnets[index].peerings_count()
            );
            vec![index]
        }
        None => {
            log::warn!("Hub detection: no VNets, no hub");
            Vec::new()
        }
    }
}

/// Index of the VNet with the highest peering count; the first one wins ties.
fn most_peered(vnets: &[Vnet]) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (index, vnet) in vnets.iter().enumerate() {
        let count = vnet.peerings_count();
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((index, count)),
        }
    }
    best.map(|(index, _)| index)
}
