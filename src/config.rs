use anyhow::{Context, Result, bail};
use std::path::PathBuf;

pub const REGISTER_BASE: u32 = 0x1000_0000; // Omega2 (MT7688) register block
pub const MAX_ARGS: usize = 255; // including the program name
pub const DEFAULT_DEVICE: &str = "/dev/mem";

const DEVICE_VAR: &str = "DEVMEM_DEVICE";
const SYNC_VAR: &str = "DEVMEM_SYNC";

/// Runtime settings for the physical memory backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Physical memory pseudo-file to map pages from.
    pub device: PathBuf,
    /// Open the device with `O_SYNC` (uncached register access).
    pub sync: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device: PathBuf::from(DEFAULT_DEVICE),
            sync: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(device) = lookup(DEVICE_VAR).filter(|d| !d.is_empty()) {
            config.device = PathBuf::from(device);
        }

        if let Some(sync) = lookup(SYNC_VAR) {
            config.sync = parse_bool(&sync)
                .with_context(|| format!("invalid value for {SYNC_VAR}"))?;
        }

        log::debug!("Using {config:?}");
        Ok(config)
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("expected a boolean, got '{other}'"),
    }
}
