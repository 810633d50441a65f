//! Azure Resource Graph query execution.
//!
//! Fetches virtual networks and virtual WAN hubs and converts them to [`Vnet`] records.

use super::cli;
use crate::config;
use crate::models::{resource_group_from_resource_id, Subnet, Vnet, VnetKind, NOT_AVAILABLE};
use serde::Deserialize;
use std::error::Error;
use std::time::Duration;

/// Azure Graph query for VNets, virtual hubs and their peerings.
const VNET_QUERY: &str = r#"resources
        | where type =~ "microsoft.network/virtualnetworks" or type =~ "microsoft.network/virtualhubs"
        | project id, name, type
                ,resource_group=resourceGroup
                ,subscription_id=subscriptionId
                ,tenant_id=tenantId
                ,address_prefixes=properties.addressSpace.addressPrefixes
                ,hub_address_prefix=properties.addressPrefix
                ,subnets=properties.subnets
                ,peerings=properties.virtualNetworkPeerings
                ,express_route_gateway=properties.expressRouteGateway.id
                ,vpn_gateway=properties.vpnGateway.id
                ,azure_firewall=properties.azureFirewall.id
        | join kind=leftouter (
            resourcecontainers
                | where type == "microsoft.resources/subscriptions"
                | project subscription_id=subscriptionId, subscription_name=name
            ) on subscription_id
        | project-away subscription_id1
        | sort by name asc"#;

const GATEWAY_SUBNET: &str = "GatewaySubnet";
const FIREWALL_SUBNET: &str = "AzureFirewallSubnet";

/// One page of the az graph query response.
#[derive(Deserialize, Debug, Default)]
pub struct GraphResponse {
    pub data: Vec<GraphVnetRow>,
    /// Token for pagination (if more results available).
    pub skip_token: Option<String>,
    pub total_records: Option<u32>,
    pub count: i32,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct GraphVnetRow {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub resource_group: Option<String>,
    pub subscription_id: Option<String>,
    pub subscription_name: Option<String>,
    pub tenant_id: Option<String>,
    pub address_prefixes: Option<Vec<String>>,
    pub hub_address_prefix: Option<String>,
    pub subnets: Option<Vec<GraphSubnet>>,
    pub peerings: Option<Vec<GraphPeering>>,
    pub express_route_gateway: Option<String>,
    pub vpn_gateway: Option<String>,
    pub azure_firewall: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct GraphSubnet {
    pub name: String,
    #[serde(default)]
    pub properties: GraphSubnetProperties,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GraphSubnetProperties {
    pub address_prefix: Option<String>,
    pub address_prefixes: Option<Vec<String>>,
    pub network_security_group: Option<IdRef>,
    pub route_table: Option<IdRef>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct IdRef {
    pub id: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct GraphPeering {
    #[serde(default)]
    pub properties: GraphPeeringProperties,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GraphPeeringProperties {
    pub remote_virtual_network: Option<IdRef>,
}

impl GraphVnetRow {
    pub fn is_virtual_hub(&self) -> bool {
        self.resource_type
            .eq_ignore_ascii_case("microsoft.network/virtualhubs")
    }

    /// Convert the query row to the topology record.
    pub fn into_vnet(self) -> Vnet {
        let kind = if self.is_virtual_hub() {
            VnetKind::VirtualHub
        } else {
            VnetKind::VirtualNetwork
        };
        let subnets: Vec<Subnet> = self
            .subnets
            .unwrap_or_default()
            .into_iter()
            .map(|s| Subnet {
                address: s
                    .properties
                    .address_prefixes
                    .and_then(|prefixes| prefixes.into_iter().next())
                    .or(s.properties.address_prefix)
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                has_security_group: s.properties.network_security_group.is_some(),
                has_route_table: s.properties.route_table.is_some(),
                name: s.name,
            })
            .collect();
        let peering_resource_ids: Vec<String> = self
            .peerings
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| p.properties.remote_virtual_network.and_then(|r| r.id))
            .collect();
        let has_subnet = |name: &str| subnets.iter().any(|s| s.name == name);

        let (expressroute, vpn_gateway, firewall) = match kind {
            VnetKind::VirtualHub => (
                self.express_route_gateway.is_some(),
                self.vpn_gateway.is_some(),
                self.azure_firewall.is_some(),
            ),
            VnetKind::VirtualNetwork => (
                has_subnet(GATEWAY_SUBNET),
                has_subnet(GATEWAY_SUBNET),
                has_subnet(FIREWALL_SUBNET),
            ),
        };

        let address_space = self
            .address_prefixes
            .and_then(|prefixes| prefixes.into_iter().next())
            .or(self.hub_address_prefix);
        let resourcegroup_name = self
            .resource_group
            .or_else(|| resource_group_from_resource_id(&self.id).ok());

        Vnet {
            peerings_count: Some(peering_resource_ids.len()),
            name: self.name,
            resource_id: Some(self.id),
            address_space,
            subnets,
            peering_resource_ids,
            peerings: Vec::new(),
            kind,
            is_explicit_hub: false,
            subscription_name: self.subscription_name,
            subscription_id: self.subscription_id,
            resourcegroup_name,
            tenant_id: self.tenant_id,
            expressroute,
            vpn_gateway,
            firewall,
        }
    }
}

/// Parse one page of `az graph query` output.
pub fn parse_graph_block(output: &str, block: usize) -> Result<GraphResponse, Box<dyn Error>> {
    let mut json_block_deserializer = serde_json::Deserializer::from_str(output);
    let parsed: GraphResponse = serde_path_to_error::deserialize(&mut json_block_deserializer)
        .map_err(|e| {
            log::error!("OUTPUT START:\n\n{output}\n\nOUTPUT END\n");
            format!(
                "Error parsing JSON block {block}: path={} error={e}",
                e.path()
            )
        })?;
    Ok(parsed)
}

/// Execute the Azure Resource Graph query for every VNet and virtual hub.
///
/// Handles pagination using skip tokens, pausing between pages.
pub async fn run_az_cli_graph() -> Result<Vec<Vnet>, Box<dyn Error>> {
    let mut vnets: Vec<Vnet> = Vec::new();
    let mut skip_token_param = String::new();
    let mut count_blocks_returned = 0;
    let mut count: i32 = 0;

    while skip_token_param != "--skip-token null" {
        let cmd = format!(
            "az graph query --first 100 {skip_token_param} -q '{VNET_QUERY}' --output json"
        );
        let output = cli::run(&cmd).await?;
        let parsed = parse_graph_block(&output, count_blocks_returned)?;

        let skip_token_new = format!(
            "--skip-token {}",
            parsed.skip_token.as_deref().unwrap_or("null")
        );
        if skip_token_new == skip_token_param {
            return Err("Skip token not unique - possible infinite loop".into());
        }
        skip_token_param = skip_token_new;

        count += parsed.count;
        vnets.extend(parsed.data.into_iter().map(GraphVnetRow::into_vnet));

        log::info!(
            "got block#{count_blocks_returned:2} record_count=+{block_count:3} => {count:3} total_records={total:?}",
            block_count = parsed.count,
            total = parsed.total_records,
        );

        tokio::time::sleep(Duration::from_millis(config::SLEEP_MSEC * 5)).await;
        count_blocks_returned += 1;
    }

    if usize::try_from(count).ok() != Some(vnets.len()) {
        return Err(format!(
            "Record count mismatch: count={count} != vnets.len()={}",
            vnets.len()
        )
        .into());
    }
    log::info!(
        "Got {} VNets ({} virtual hubs) from az graph query",
        vnets.len(),
        vnets.iter().filter(|v| v.kind == VnetKind::VirtualHub).count()
    );
    Ok(vnets)
}
