//! CSV layout report.

use crate::config::RenderMode;
use crate::models::{Topology, Vnet, VnetRole};
use colored::Colorize;
use std::error::Error;

use super::terminal::format_field;

/// One report row: a mapped VNet, or in MLD mode one of its subnets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutRow {
    pub diagram_id: String,
    pub role: VnetRole,
    pub vnet_name: String,
    pub address_space: String,
    pub subscription_name: String,
    pub peerings_count: usize,
    pub subnet_name: String,
    pub subnet_address: String,
    pub nsg: String,
    pub udr: String,
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

fn vnet_row(vnet: &Vnet, diagram_id: &str, role: VnetRole) -> LayoutRow {
    LayoutRow {
        diagram_id: diagram_id.to_string(),
        role,
        vnet_name: vnet.name.clone(),
        address_space: vnet.address_label().to_string(),
        subscription_name: vnet.subscription_label().to_string(),
        peerings_count: vnet.peerings_count(),
        subnet_name: String::new(),
        subnet_address: String::new(),
        nsg: String::new(),
        udr: String::new(),
    }
}

/// Report rows in diagram order: zones (hub, then spokes), then unattached.
pub fn layout_rows(topology: &Topology, mode: RenderMode) -> Vec<LayoutRow> {
    let mapping = topology.mapping();
    let mut ordered: Vec<(&Vnet, VnetRole)> = Vec::new();
    for zone in topology.zones() {
        ordered.push((&zone.hub, VnetRole::Hub));
        ordered.extend(zone.spokes.iter().map(|s| (s, VnetRole::Spoke)));
    }
    ordered.extend(topology.unattached().iter().map(|v| (v, VnetRole::Unattached)));

    let mut rows = Vec::new();
    for (vnet, role) in ordered {
        let Some(diagram_id) = mapping.get(&vnet.name) else {
            log::debug!("'{}' has no diagram id, not reported", vnet.name);
            continue;
        };
        let row = vnet_row(vnet, diagram_id, role);
        if mode.show_subnets() {
            rows.extend(vnet.subnets.iter().map(|subnet| LayoutRow {
                subnet_name: subnet.name.clone(),
                subnet_address: subnet.address.clone(),
                nsg: yes_no(subnet.has_security_group).to_string(),
                udr: yes_no(subnet.has_route_table).to_string(),
                ..row.clone()
            }));
        }
        rows.push(row);
    }
    rows
}

/// Print the layout report as CSV to stdout.
pub fn layout_print(topology: &Topology, mode: RenderMode) -> Result<(), Box<dyn Error>> {
    let rows = layout_rows(topology, mode);
    log::info!("#Start layout_print() mode={mode} rows={}", rows.len());

    println!(
        r#"         "diagram_id",       "role",                     "vnet_name",      "address_space",   "subscription_name", "peerings",              "subnet_name",     "subnet_address",  "nsg",  "udr""#
    );
    for row in &rows {
        println!("{}", csv_line(row));
    }

    if !topology.has_hub() {
        println!("#{}# No hub found, every VNet is unattached", "NOTE".on_red());
    }
    Ok(())
}

fn csv_line(row: &LayoutRow) -> String {
    format!(
        "{diagram_id},{role},{vnet_name},{address_space},{subscription_name},{peerings},{subnet_name},{subnet_address},{nsg},{udr}",
        diagram_id = format_field(&row.diagram_id, 21),
        role = format_field(row.role, 12),
        vnet_name = format_field(&row.vnet_name, 30),
        address_space = format_field(&row.address_space, 20),
        subscription_name = format_field(&row.subscription_name, 21),
        peerings = format_field(row.peerings_count, 11),
        subnet_name = format_field(&row.subnet_name, 26),
        subnet_address = format_field(&row.subnet_address, 19),
        nsg = format_field(&row.nsg, 6),
        udr = format_field(&row.udr, 6),
    )
}
