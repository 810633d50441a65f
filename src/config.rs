//! Run configuration and layout tuning constants.
//!
//! Layout heuristics are plain values on [`LayoutConfig`] so tests can override
//! them. [`RunConfig`] is read from the environment (after `.env` is loaded by
//! the binary).

use crate::models::{parse_vnet_identifier, VnetIdentifier};
use std::error::Error;
use std::fmt;
use std::str::FromStr;

/// Base pause between paginated `az graph query` calls.
pub const SLEEP_MSEC: u64 = 100;

/// Zones with more spokes than this switch to the dual-column arrangement.
pub const DUAL_COLUMN_THRESHOLD: usize = 6;

/// Largest stdout accepted from a single CLI call.
pub const MAX_CLI_OUTPUT_BYTES: usize = 500_000;

/// Timezone used to date cache file names.
pub const CACHE_TIMEZONE: chrono_tz::Tz = chrono_tz::Pacific::Auckland;

pub const DEFAULT_TOPOLOGY_FILE: &str = "network_topology.json";
pub const DEFAULT_OUTPUT_DIR: &str = ".";

/// Tunables for hub detection and column arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    /// A zone is drawn in two columns when its spoke count is strictly greater.
    pub dual_column_threshold: usize,
    /// When set, every VNet with at least this many peerings is a hub.
    /// Checked after explicit hub flags and before the max-peerings fallback.
    pub hub_peering_threshold: Option<usize>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            dual_column_threshold: DUAL_COLUMN_THRESHOLD,
            hub_peering_threshold: None,
        }
    }
}

/// Which diagram flavour the run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// High-level design: VNets only.
    #[default]
    Hld,
    /// Mid-level design: VNets with their subnets.
    Mld,
}

impl RenderMode {
    pub fn show_subnets(&self) -> bool {
        matches!(self, RenderMode::Mld)
    }
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hld" => Ok(RenderMode::Hld),
            "mld" => Ok(RenderMode::Mld),
            other => Err(format!(
                "Invalid render mode '{other}'. Must be 'hld' or 'mld'."
            )),
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Hld => write!(f, "hld"),
            RenderMode::Mld => write!(f, "mld"),
        }
    }
}

/// Settings for one run of the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Snapshot to read. `None` means use (or build) today's az graph cache.
    pub topology_file: Option<String>,
    pub output_dir: String,
    pub mode: RenderMode,
    pub layout: LayoutConfig,
    /// Hubs to keep, with their directly peered VNets. Empty keeps everything.
    pub vnets: Vec<VnetIdentifier>,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            topology_file: Some(DEFAULT_TOPOLOGY_FILE.to_string()),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            mode: RenderMode::default(),
            layout: LayoutConfig::default(),
            vnets: Vec::new(),
        }
    }
}

impl RunConfig {
    /// Build from process environment variables.
    ///
    /// * `TOPOLOGY_FILE` - snapshot path, `az` to query Azure (default `network_topology.json`)
    /// * `OUTPUT_DIR` - where the JSON layout is written (default `.`)
    /// * `RENDER_MODE` - `hld` or `mld` (default `hld`)
    /// * `DUAL_COLUMN_THRESHOLD` - default 6
    /// * `HUB_PEERING_THRESHOLD` - unset by default
    /// * `VNETS` - comma separated hub VNets to keep, as resource ids,
    ///   `subscription/resource_group/name`, `resource_group/name` or `name`
    pub fn from_env() -> Result<RunConfig, Box<dyn Error>> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`RunConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<RunConfig, Box<dyn Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = RunConfig::default();

        if let Some(file) = lookup("TOPOLOGY_FILE") {
            config.topology_file = match file.trim() {
                "az" => None,
                path => Some(path.to_string()),
            };
        }
        if let Some(dir) = lookup("OUTPUT_DIR") {
            config.output_dir = dir;
        }
        if let Some(mode) = lookup("RENDER_MODE") {
            config.mode = mode.parse()?;
        }
        if let Some(value) = lookup("DUAL_COLUMN_THRESHOLD") {
            config.layout.dual_column_threshold = parse_count("DUAL_COLUMN_THRESHOLD", &value)?;
        }
        if let Some(value) = lookup("HUB_PEERING_THRESHOLD") {
            config.layout.hub_peering_threshold =
                Some(parse_count("HUB_PEERING_THRESHOLD", &value)?);
        }
        if let Some(value) = lookup("VNETS") {
            config.vnets = value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(parse_vnet_identifier)
                .collect::<Result<Vec<_>, _>>()?;
        }

        log::debug!("RunConfig: {config:?}");
        Ok(config)
    }
}

fn parse_count(key: &str, value: &str) -> Result<usize, Box<dyn Error>> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("Invalid {key}='{value}': {e}").into())
}
