//! Snapshot files and the dated az graph cache.
//!
//! Avoids repeated Azure Graph API calls on the same day.

use super::graph::run_az_cli_graph;
use crate::config::CACHE_TIMEZONE;
use crate::models::TopologySnapshot;
use chrono::{DateTime, TimeZone};
use std::error::Error;
use std::path::Path;

/// `vnet_topology_<YYYY-MM-DD>.json`
pub fn cache_file_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("vnet_topology_{}.json", now.format("%Y-%m-%d"))
}

/// Read a snapshot file in any accepted shape.
pub fn read_snapshot_file(file: &str) -> Result<TopologySnapshot, Box<dyn Error>> {
    if !Path::new(file).exists() {
        return Err(format!("Topology file does not exist: {file}").into());
    }
    log::info!("Reading topology file: {file}");
    let json = std::fs::read_to_string(file)
        .map_err(|e| format!("Error reading topology file {file}: {e}"))?;
    let snapshot = TopologySnapshot::from_json_str(&json)?;
    log::info!("Loaded {} VNet record(s) from {file}", snapshot.len());
    Ok(snapshot)
}

/// Read the given snapshot file, or today's cache, querying Azure when the
/// cache does not exist yet.
///
/// # Arguments
/// * `topology_file` - explicit snapshot path; `None` uses the dated cache
pub async fn read_topology_cache(
    topology_file: Option<&str>,
) -> Result<TopologySnapshot, Box<dyn Error>> {
    if let Some(file) = topology_file {
        return read_snapshot_file(file);
    }

    let now = chrono::Utc::now().with_timezone(&CACHE_TIMEZONE);
    let cache_file = cache_file_name(&now);
    if Path::new(&cache_file).exists() {
        log::info!("Reading from cache file: {cache_file}");
        return read_snapshot_file(&cache_file);
    }

    log::warn!("Cache file not found: {cache_file}");
    let snapshot = TopologySnapshot::Flat {
        vnets: run_az_cli_graph().await?,
    };
    write_snapshot_file(&cache_file, &snapshot)?;
    Ok(snapshot)
}

/// Write a snapshot as JSON, e.g. a freshly queried cache.
pub fn write_snapshot_file(file: &str, snapshot: &TopologySnapshot) -> Result<(), Box<dyn Error>> {
    let json =
        serde_json::to_string_pretty(snapshot).map_err(|e| format!("Error serializing JSON: {e}"))?;
    log::warn!("Writing data to cache file: {file}");
    std::fs::write(file, json).map_err(|e| format!("Error writing cache file {file}: {e}"))?;
    Ok(())
}
