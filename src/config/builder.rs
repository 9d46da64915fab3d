//! Default configuration file creation.
//!
//! Generates a commented `daylight.toml` with aligned comments, using a small
//! builder so sections and settings stay in a consistent layout.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::common::constants::*;

/// Create a default config file with optional coordinate override.
///
/// # Arguments
/// * `path` - Path where the config file should be created
/// * `coords` - Optional (latitude, longitude); defaults to London when absent
pub fn create_default_config(path: &Path, coords: Option<(f64, f64)>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    let (lat, lon) = coords.unwrap_or((DEFAULT_LATITUDE, DEFAULT_LONGITUDE));

    let config_content = ConfigBuilder::new()
        .add_section("Sensor")
        .add_setting(
            "name",
            &format!("\"{DEFAULT_NAME}\""),
            "Name reported with every reading",
        )
        .add_section("Location")
        .add_setting(
            "latitude",
            &format!("{lat:.6}"),
            "Geographic latitude (-90 to 90)",
        )
        .add_setting(
            "longitude",
            &format!("{lon:.6}"),
            "Geographic longitude (-180 to 180)",
        )
        .build();

    fs::write(path, config_content)
        .with_context(|| format!("Failed to write default config to {}", path.display()))?;

    log_block_start!("Created default configuration");
    log_indented!("{}", path.display());

    Ok(())
}

struct ConfigBuilder {
    entries: Vec<ConfigEntry>,
}

enum ConfigEntry {
    Section(String),
    Setting { line: String, comment: String },
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(ConfigEntry::Section(format!("#[{title}]")));
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(ConfigEntry::Setting {
            line: format!("{key} = {value}"),
            comment: format!("# {comment}"),
        });
        self
    }

    fn build(self) -> String {
        // Align all comments one space after the longest setting line
        let max_width = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                ConfigEntry::Setting { line, .. } => Some(line.len()),
                ConfigEntry::Section(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        let mut result = Vec::new();

        for entry in self.entries {
            match entry {
                ConfigEntry::Section(title) => {
                    if !result.is_empty() {
                        result.push(String::new());
                    }
                    result.push(title);
                }
                ConfigEntry::Setting { line, comment } => {
                    let padding = " ".repeat(max_width - line.len());
                    result.push(format!("{line}{padding}{comment}"));
                }
            }
        }

        result.push(String::new());
        result.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_aligns_comments() {
        let content = ConfigBuilder::new()
            .add_section("Location")
            .add_setting("latitude", "1.0", "lat")
            .add_setting("lon", "2.0", "lon")
            .build();

        assert_eq!(
            content,
            "#[Location]\nlatitude = 1.0 # lat\nlon = 2.0      # lon\n"
        );
    }
}
