//! Output of the resolved topology.
//!
//! - [`json`] - JSON intermediate representation for diagram renderers
//! - [`csv`] - CSV layout report
//! - [`terminal`] - field formatting and the colored zone summary

mod csv;
mod json;
mod terminal;

pub use csv::{layout_print, layout_rows, LayoutRow};
pub use json::{to_json_string, write_topology_json, TOPOLOGY_JSON_FILE};
pub use terminal::{format_field, print_zone_summary, zone_summary_lines};
