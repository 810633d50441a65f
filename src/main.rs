use azure_vnet_topology::config::RunConfig;
use azure_vnet_topology::output::{
    layout_print, print_zone_summary, write_topology_json, TOPOLOGY_JSON_FILE,
};
use azure_vnet_topology::processing::build_edges;
use azure_vnet_topology::{find_duplicate_names, get_topology};
use std::error::Error;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    log4rs::init_file("log4rs.yml", Default::default()).expect("Error initializing log4rs");
    dotenv::dotenv().ok();
    log::info!("#Start main()");

    let config = RunConfig::from_env()?;
    let topology = get_topology(
        config.topology_file.as_deref(),
        &config.vnets,
        &config.layout,
    )
    .await?;

    for name in find_duplicate_names(topology.vnets()) {
        log::warn!("Duplicate VNet name '{name}', only the last one keeps its diagram id");
    }

    let edges = build_edges(&topology);
    print_zone_summary(&topology, &config.layout);
    layout_print(&topology, config.mode)?;

    let output_file = Path::new(&config.output_dir).join(TOPOLOGY_JSON_FILE);
    write_topology_json(&output_file, &topology, &edges, config.mode)?;

    log::info!("#End main() wrote {}", output_file.display());
    Ok(())
}
