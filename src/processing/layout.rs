//! Diagram id assignment.
//!
//! Id scheme, with `z` the zone position and `i` a 0-based counter:
//! - hub: `hub_<z>`
//! - spoke, single column: `right_spoke<z>_<i>`
//! - spoke, dual column: `left_spoke<z>_<i>` for the first half, `right_spoke<z>_<i>` for the rest
//! - unattached VNet: `nonpeered_spoke<i>`, counted across the whole run
//!
//! Ids embed the zone position and a per-column counter, so they never collide.

use crate::config::LayoutConfig;
use crate::models::{IdMapping, Vnet, Zone};
use std::collections::HashSet;
use std::fmt;

/// Spoke column relative to the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Left,
    Right,
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Left => write!(f, "left"),
            Column::Right => write!(f, "right"),
        }
    }
}

pub fn hub_id(zone_index: usize) -> String {
    format!("hub_{zone_index}")
}

pub fn spoke_id(column: Column, zone_index: usize, position: usize) -> String {
    format!("{column}_spoke{zone_index}_{position}")
}

pub fn nonpeered_id(position: usize) -> String {
    format!("nonpeered_spoke{position}")
}

/// True when a zone with `spoke_count` spokes is drawn in two columns.
pub fn uses_dual_column(spoke_count: usize, config: &LayoutConfig) -> bool {
    spoke_count > config.dual_column_threshold
}

/// Split a zone's spokes into `(left, right)` columns.
///
/// Up to the threshold everything goes right. Above it the left column takes
/// the first `ceil(n / 2)` spokes and the right column the rest.
pub fn split_columns<'a>(spokes: &'a [Vnet], config: &LayoutConfig) -> (&'a [Vnet], &'a [Vnet]) {
    if uses_dual_column(spokes.len(), config) {
        spokes.split_at(spokes.len().div_ceil(2))
    } else {
        (&spokes[..0], spokes)
    }
}

/// Assign every hub, spoke and unattached VNet a diagram id.
///
/// Zone ids come from the zone's position in `zones`. Spokes are keyed by the
/// name the zone carries even when `all_vnets` has no such VNet. A name seen
/// twice keeps the id assigned last.
pub fn assign_layout(
    all_vnets: &[Vnet],
    zones: &[Zone],
    unattached: &[Vnet],
    config: &LayoutConfig,
) -> IdMapping {
    let known: HashSet<&str> = all_vnets.iter().map(|v| v.name.as_str()).collect();
    let mut mapping = IdMapping::default();

    for (zone_index, zone) in zones.iter().enumerate() {
        if zone.hub_index != zone_index {
            log::debug!(
                "Zone at position {zone_index} carries hub_index {}, using position",
                zone.hub_index
            );
        }
        insert(&mut mapping, &known, &zone.hub.name, hub_id(zone_index));
    }

    for (zone_index, zone) in zones.iter().enumerate() {
        let (left, right) = split_columns(&zone.spokes, config);
        for (column, spokes) in [(Column::Right, right), (Column::Left, left)] {
            for (position, spoke) in spokes.iter().enumerate() {
                insert(
                    &mut mapping,
                    &known,
                    &spoke.name,
                    spoke_id(column, zone_index, position),
                );
            }
        }
    }

    for (position, vnet) in unattached.iter().enumerate() {
        insert(&mut mapping, &known, &vnet.name, nonpeered_id(position));
    }

    log::info!("Assigned {} diagram ids over {} zone(s)", mapping.len(), zones.len());
    mapping
}

fn insert(mapping: &mut IdMapping, known: &HashSet<&str>, name: &str, id: String) {
    if !known.contains(name) {
        log::debug!("'{name}' is not in the VNet list, assigning {id} anyway");
    }
    if let Some(previous) = mapping.insert(name, id.clone()) {
        log::warn!("Duplicate VNet name '{name}': {previous} replaced by {id}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(index: usize, hub: &str, spokes: &[String]) -> Zone {
        let mut zone = Zone::new(Vnet::new(hub), index);
        zone.spokes = spokes.iter().map(|s| Vnet::new(s)).collect();
        zone
    }

    fn names(prefix: &str, count: usize) -> Vec<String> {
        (1..=count).map(|i| format!("{prefix}{i}")).collect()
    }

    fn all_of(zones: &[Zone], unattached: &[Vnet]) -> Vec<Vnet> {
        zones
            .iter()
            .flat_map(|z| std::iter::once(z.hub.clone()).chain(z.spokes.iter().cloned()))
            .chain(unattached.iter().cloned())
            .collect()
    }

    fn assert_unique(mapping: &IdMapping) {
        let ids: HashSet<&str> = mapping.ids().collect();
        assert_eq!(ids.len(), mapping.len(), "ids not unique: {mapping:?}");
    }

    #[test]
    fn test_split_columns() {
        let config = LayoutConfig::default();
        let spokes: Vec<Vnet> = names("s", 7).iter().map(|n| Vnet::new(n)).collect();
        let (left, right) = split_columns(&spokes, &config);
        assert_eq!(left.len(), 4);
        assert_eq!(right.len(), 3);
        assert_eq!(left[0].name, "s1");
        assert_eq!(right[0].name, "s5");

        let (left, right) = split_columns(&spokes[..6], &config);
        assert!(left.is_empty());
        assert_eq!(right.len(), 6);

        let (left, right) = split_columns(&[], &config);
        assert!(left.is_empty() && right.is_empty());
    }

    #[test]
    fn test_six_spokes_single_column() {
        let zones = vec![zone(0, "hub", &names("s", 6))];
        let mapping = assign_layout(&all_of(&zones, &[]), &zones, &[], &LayoutConfig::default());
        assert_eq!(mapping.len(), 7);
        for (i, name) in names("s", 6).iter().enumerate() {
            assert_eq!(mapping.get(name), Some(format!("right_spoke0_{i}").as_str()));
        }
        assert!(mapping.ids().all(|id| !id.starts_with("left_")));
    }

    #[test]
    fn test_seven_spokes_dual_column() {
        let zones = vec![zone(0, "hub", &names("s", 7))];
        let mapping = assign_layout(&all_of(&zones, &[]), &zones, &[], &LayoutConfig::default());
        assert_eq!(mapping.get("s1"), Some("left_spoke0_0"));
        assert_eq!(mapping.get("s4"), Some("left_spoke0_3"));
        assert_eq!(mapping.get("s5"), Some("right_spoke0_0"));
        assert_eq!(mapping.get("s7"), Some("right_spoke0_2"));
        assert_unique(&mapping);
    }

    #[test]
    fn test_one_hub_eight_spokes() {
        let zones = vec![zone(0, "hub", &names("spoke", 8))];
        let mapping = assign_layout(&all_of(&zones, &[]), &zones, &[], &LayoutConfig::default());
        assert_eq!(mapping.get("hub"), Some("hub_0"));
        for i in 0..4 {
            assert_eq!(
                mapping.get(&format!("spoke{}", i + 1)),
                Some(format!("left_spoke0_{i}").as_str())
            );
            assert_eq!(
                mapping.get(&format!("spoke{}", i + 5)),
                Some(format!("right_spoke0_{i}").as_str())
            );
        }
    }

    #[test]
    fn test_two_zones_two_spokes_each() {
        let zones = vec![
            zone(0, "hub1", &names("a", 2)),
            zone(1, "hub2", &names("b", 2)),
        ];
        let mapping = assign_layout(&all_of(&zones, &[]), &zones, &[], &LayoutConfig::default());
        let ids: Vec<&str> = ["hub1", "hub2", "a1", "a2", "b1", "b2"]
            .iter()
            .map(|n| mapping.get(n).unwrap())
            .collect();
        assert_eq!(
            ids,
            vec![
                "hub_0",
                "hub_1",
                "right_spoke0_0",
                "right_spoke0_1",
                "right_spoke1_0",
                "right_spoke1_1"
            ]
        );
        assert_unique(&mapping);
    }

    #[test]
    fn test_unattached_counter_is_global() {
        let zones = vec![zone(0, "hub1", &names("a", 1)), zone(1, "hub2", &[])];
        let unattached: Vec<Vnet> = names("n", 3).iter().map(|n| Vnet::new(n)).collect();
        let mapping = assign_layout(
            &all_of(&zones, &unattached),
            &zones,
            &unattached,
            &LayoutConfig::default(),
        );
        assert_eq!(mapping.get("n1"), Some("nonpeered_spoke0"));
        assert_eq!(mapping.get("n3"), Some("nonpeered_spoke2"));
        assert_unique(&mapping);
    }

    #[test]
    fn test_unknown_spoke_still_gets_id() {
        let zones = vec![zone(0, "hub", &["ghost".to_string()])];
        let mapping = assign_layout(&[Vnet::new("hub")], &zones, &[], &LayoutConfig::default());
        assert_eq!(mapping.get("ghost"), Some("right_spoke0_0"));
    }

    #[test]
    fn test_no_zones_only_unattached() {
        let unattached = vec![Vnet::new("x")];
        let mapping = assign_layout(&unattached, &[], &unattached, &LayoutConfig::default());
        assert_eq!(mapping.get("x"), Some("nonpeered_spoke0"));
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn test_duplicate_names_keep_ids_unique() {
        let zones = vec![zone(0, "dup", &["dup".to_string(), "other".to_string()])];
        let unattached = vec![Vnet::new("dup")];
        let mapping = assign_layout(
            &all_of(&zones, &unattached),
            &zones,
            &unattached,
            &LayoutConfig::default(),
        );
        assert_eq!(mapping.get("dup"), Some("nonpeered_spoke0"));
        assert_unique(&mapping);
    }

    #[test]
    fn test_threshold_override() {
        let config = LayoutConfig {
            dual_column_threshold: 2,
            ..Default::default()
        };
        let zones = vec![zone(0, "hub", &names("s", 3))];
        let mapping = assign_layout(&all_of(&zones, &[]), &zones, &[], &config);
        assert_eq!(mapping.get("s1"), Some("left_spoke0_0"));
        assert_eq!(mapping.get("s2"), Some("left_spoke0_1"));
        assert_eq!(mapping.get("s3"), Some("right_spoke0_0"));
    }

    #[test]
    fn test_uniqueness_over_many_shapes() {
        let config = LayoutConfig::default();
        for zone_count in 0..4 {
            for spoke_count in 0..15 {
                let zones: Vec<Zone> = (0..zone_count)
                    .map(|z| zone(z, &format!("hub{z}"), &names(&format!("z{z}s"), spoke_count)))
                    .collect();
                let unattached: Vec<Vnet> =
                    names("u", spoke_count % 4).iter().map(|n| Vnet::new(n)).collect();
                let all = all_of(&zones, &unattached);
                let mapping = assign_layout(&all, &zones, &unattached, &config);
                assert_eq!(mapping.len(), all.len());
                assert_unique(&mapping);
            }
        }
    }
}
