//! Spoke to hub zone assignment.

use super::layout::hub_id;
use crate::models::{Vnet, Zone};
use std::collections::HashSet;

/// A spoke and a hub are linked when either one lists the other, by resource
/// id or name, or when both list the same peering name. Input peerings may be
/// one-sided.
pub fn is_linked(spoke: &Vnet, hub: &Vnet) -> bool {
    spoke.references(hub) || hub.references(spoke) || spoke.shares_peering_name_with(hub)
}

/// Every hub index the spoke is linked to, in hub order.
pub fn hub_connections_for_spoke(spoke: &Vnet, hubs: &[Vnet]) -> Vec<usize> {
    hubs.iter()
        .enumerate()
        .filter(|(_, hub)| is_linked(spoke, hub))
        .map(|(index, _)| index)
        .collect()
}

/// Zone index owning the spoke: the first linked hub, or hub 0 when none is.
///
/// `None` only when there are no hubs. The hub 0 fallback keeps every spoke
/// on the diagram but can misattribute a spoke whose real hub is not listed.
pub fn find_first_hub_zone(spoke: &Vnet, hubs: &[Vnet]) -> Option<usize> {
    if hubs.is_empty() {
        return None;
    }
    match hubs.iter().position(|hub| is_linked(spoke, hub)) {
        Some(index) => Some(index),
        None => {
            log::debug!(
                "Spoke '{}' is not linked to any hub, falling back to hub_0",
                spoke.name
            );
            Some(0)
        }
    }
}

/// Diagram id (`hub_<index>`) of the hub owning the spoke, `None` without hubs.
pub fn determine_hub_for_spoke(spoke: &Vnet, hubs: &[Vnet]) -> Option<String> {
    find_first_hub_zone(spoke, hubs).map(hub_id)
}

/// Zones plus the VNets that belong to none of them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ZoneAssignment {
    pub zones: Vec<Zone>,
    pub unattached: Vec<Vnet>,
}

/// Group VNets into one zone per hub.
///
/// `hub_indices` point into `vnets`; zone order follows it. A non-hub VNet is
/// unattached when it lists no peering and no hub lists it, the rest go to
/// [`find_first_hub_zone`]. Both lists keep input order.
pub fn resolve_zones(vnets: &[Vnet], hub_indices: &[usize]) -> ZoneAssignment {
    let hubs: Vec<Vnet> = hub_indices
        .iter()
        .filter_map(|&index| vnets.get(index).cloned())
        .collect();
    let hub_set: HashSet<usize> = hub_indices.iter().copied().collect();

    let mut assignment = ZoneAssignment {
        zones: hubs
            .iter()
            .enumerate()
            .map(|(index, hub)| Zone::new(hub.clone(), index))
            .collect(),
        unattached: Vec::new(),
    };

    for (index, vnet) in vnets.iter().enumerate() {
        if hub_set.contains(&index) {
            continue;
        }
        if !vnet.has_peerings() && hub_connections_for_spoke(vnet, &hubs).is_empty() {
            assignment.unattached.push(vnet.clone());
            continue;
        }
        match find_first_hub_zone(vnet, &hubs) {
            Some(zone_index) => assignment.zones[zone_index].spokes.push(vnet.clone()),
            None => assignment.unattached.push(vnet.clone()),
        }
    }

    log::info!(
        "Resolved {} zone(s) with {} spoke(s), {} unattached VNet(s)",
        assignment.zones.len(),
        assignment
            .zones
            .iter()
            .map(|z| z.spokes.len())
            .sum::<usize>(),
        assignment.unattached.len()
    );
    assignment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::vnet_resource_id;

    fn named(name: &str, peerings: &[&str]) -> Vnet {
        let mut v = Vnet::new(name);
        v.peerings = peerings.iter().map(|p| p.to_string()).collect();
        v
    }

    fn with_id(name: &str, peers: &[&str]) -> Vnet {
        let mut v = Vnet::new(name);
        v.resource_id = Some(vnet_resource_id("sub", "rg", name));
        v.peering_resource_ids = peers
            .iter()
            .map(|p| vnet_resource_id("sub", "rg", p))
            .collect();
        v
    }

    #[test]
    fn test_determine_hub_for_spoke_single_hub() {
        let spoke = named("spoke1", &["spoke1_to_hub1"]);
        let hubs = vec![named("hub1", &["hub1_to_spoke1", "hub1_to_spoke2"])];
        assert_eq!(determine_hub_for_spoke(&spoke, &hubs).as_deref(), Some("hub_0"));
    }

    #[test]
    fn test_determine_hub_for_spoke_empty_hubs_is_none() {
        let spoke = named("spoke1", &["spoke1_to_hub1"]);
        assert_eq!(determine_hub_for_spoke(&spoke, &[]), None);
        assert_eq!(find_first_hub_zone(&spoke, &[]), None);
    }

    #[test]
    fn test_determine_hub_for_spoke_no_match_falls_back() {
        let hubs = vec![
            named("hub1", &["hub1_to_spoke1"]),
            named("hub2", &["hub2_to_spoke2", "hub2_to_spoke3"]),
        ];
        let spoke = named("spoke2", &["spoke2_to_hub2"]);
        assert_eq!(determine_hub_for_spoke(&spoke, &hubs).as_deref(), Some("hub_0"));

        let no_peerings = named("isolated", &[]);
        assert_eq!(determine_hub_for_spoke(&no_peerings, &hubs).as_deref(), Some("hub_0"));
    }

    #[test]
    fn test_determine_hub_for_spoke_shared_peering_name() {
        let hubs = vec![
            named("hub1", &["link-a"]),
            named("hub2", &["link-b", "link-c"]),
        ];
        let spoke = named("spoke", &["link-c"]);
        assert_eq!(determine_hub_for_spoke(&spoke, &hubs).as_deref(), Some("hub_1"));
    }

    #[test]
    fn test_spoke_references_second_hub_by_resource_id() {
        let hubs = vec![with_id("hub1", &[]), with_id("hub2", &[])];
        let spoke = with_id("spoke", &["hub2"]);
        assert_eq!(find_first_hub_zone(&spoke, &hubs), Some(1));
    }

    #[test]
    fn test_one_sided_peering_from_hub() {
        let hubs = vec![with_id("hub1", &[]), with_id("hub2", &["spoke"])];
        let spoke = with_id("spoke", &[]);
        assert_eq!(find_first_hub_zone(&spoke, &hubs), Some(1));
    }

    #[test]
    fn test_hub_connections_for_multi_homed_spoke() {
        let hubs = vec![with_id("hub1", &[]), with_id("hub2", &[]), with_id("hub3", &[])];
        let spoke = with_id("spoke", &["hub3", "hub1"]);
        assert_eq!(hub_connections_for_spoke(&spoke, &hubs), vec![0, 2]);
        assert_eq!(find_first_hub_zone(&spoke, &hubs), Some(0));
    }

    #[test]
    fn test_resolve_zones() {
        let vnets = vec![
            with_id("hub1", &["a", "b"]),
            with_id("a", &["hub1"]),
            with_id("lonely", &[]),
            with_id("hub2", &["c"]),
            with_id("c", &["hub2"]),
            with_id("b", &["hub1"]),
            with_id("dangling", &["does-not-exist"]),
        ];
        let assignment = resolve_zones(&vnets, &[0, 3]);
        assert_eq!(assignment.zones.len(), 2);
        assert_eq!(assignment.zones[0].hub.name, "hub1");
        assert_eq!(assignment.zones[0].hub_index, 0);
        assert_eq!(
            assignment.zones[0]
                .spokes
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>(),
            vec!["a", "b", "dangling"]
        );
        assert_eq!(assignment.zones[1].hub_index, 1);
        assert_eq!(assignment.zones[1].spokes[0].name, "c");
        assert_eq!(assignment.unattached.len(), 1);
        assert_eq!(assignment.unattached[0].name, "lonely");
    }

    #[test]
    fn test_hubs_peered_to_each_other_keep_their_spokes() {
        let mut hub1 = with_id("hub1", &["hub2", "a"]);
        hub1.is_explicit_hub = true;
        let mut hub2 = with_id("hub2", &["hub1", "b"]);
        hub2.is_explicit_hub = true;
        let vnets = vec![hub1, hub2, with_id("a", &["hub1"]), with_id("b", &["hub2"])];

        let hubs = vec![vnets[0].clone(), vnets[1].clone()];
        assert_eq!(hub_connections_for_spoke(&vnets[3], &hubs), vec![1]);

        let assignment = resolve_zones(&vnets, &[0, 1]);
        assert_eq!(assignment.zones[0].spokes.len(), 1);
        assert_eq!(assignment.zones[0].spokes[0].name, "a");
        assert_eq!(assignment.zones[1].spokes.len(), 1);
        assert_eq!(assignment.zones[1].spokes[0].name, "b");
    }

    #[test]
    fn test_resolve_zones_vnet_listed_only_by_hub() {
        let vnets = vec![
            with_id("hub", &["a", "b"]),
            with_id("a", &["hub"]),
            with_id("b", &[]),
            with_id("lonely", &[]),
        ];
        let assignment = resolve_zones(&vnets, &[0]);
        assert_eq!(
            assignment.zones[0]
                .spokes
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>(),
            vec!["a", "b"]
        );
        assert_eq!(assignment.unattached.len(), 1);
        assert_eq!(assignment.unattached[0].name, "lonely");
    }

    #[test]
    fn test_resolve_zones_without_hubs() {
        let vnets = vec![with_id("a", &["b"]), with_id("b", &[])];
        let assignment = resolve_zones(&vnets, &[]);
        assert!(assignment.zones.is_empty());
        assert_eq!(assignment.unattached.len(), 2);
    }
}
