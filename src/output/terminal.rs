//! Terminal output utilities.
//!
//! Field formatting for the tabular report and a colored zone summary.

use crate::config::LayoutConfig;
use crate::models::Topology;
use crate::processing::uses_dual_column;
use colored::Colorize;

/// Format a value as a quoted, right-aligned field.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let quoted = format!("\"{}\"", value.to_string());
    if quoted.len() >= width {
        quoted
    } else {
        format!("{quoted:>width$}")
    }
}

/// One line per zone, then the unattached VNets.
pub fn zone_summary_lines(topology: &Topology, config: &LayoutConfig) -> Vec<String> {
    let mapping = topology.mapping();
    let mut lines = Vec::new();

    for (zone_index, zone) in topology.zones().iter().enumerate() {
        let arrangement = if uses_dual_column(zone.spokes.len(), config) {
            "dual column"
        } else {
            "single column"
        };
        lines.push(format!(
            "ZONE {zone_index}: {hub} '{name}' [{address}] - {count} spoke(s), {arrangement}",
            hub = mapping.get(&zone.hub.name).unwrap_or("?").green(),
            name = zone.hub.name,
            address = zone.hub.address_label(),
            count = zone.spokes.len(),
        ));
    }

    if !topology.unattached().is_empty() {
        lines.push(format!(
            "{}: {}",
            "UNATTACHED".yellow(),
            topology
                .unattached()
                .iter()
                .map(|v| v.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    if !topology.has_hub() {
        lines.push(format!("{} no hub found", "NOTE".on_red()));
    }
    lines
}

/// Print the zone summary to stdout.
pub fn print_zone_summary(topology: &Topology, config: &LayoutConfig) {
    log::info!(
        "VNETs: {} total, {} zone(s), {} unattached",
        topology.vnets().len(),
        topology.zones().len(),
        topology.unattached().len()
    );
    for line in zone_summary_lines(topology, config) {
        println!("{line}");
    }
}
