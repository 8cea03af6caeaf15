//! Config command: show the effective settings or write them out.

use anyhow::Context;
use std::path::Path;

use crate::config::{self, Config};

/// Print `config` as TOML. With `init`, also save it to `path`, or to the
/// default location when no path is given.
pub fn cmd_config(config: &Config, path: Option<&Path>, init: bool) -> anyhow::Result<()> {
    let contents = toml::to_string_pretty(config).context("Failed to encode config as TOML")?;
    print!("{contents}");

    if init {
        match path {
            Some(path) => config::save_to(config, path),
            None => config::save(config),
        }
        .context("Failed to save config")?;

        let location = path
            .map(Path::to_path_buf)
            .or_else(config::config_path)
            .unwrap_or_default();
        println!("✓ Config written to {:?}", location);
    }
    Ok(())
}
