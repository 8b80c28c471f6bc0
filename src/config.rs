//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/ipplan/ipplan.toml`
//! 3. Local config: `<dir>/.ipplan.toml`
//! 4. Environment variables: `IPPLAN_*` prefix
//!
//! Command-line flags are applied on top by the CLI layer.

use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::ValueEnum;
use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};

use crate::application::{ApplicationError, SearchStrategy};
use crate::domain::{Ipv4Range, RESERVED_ADDRESSES_PER_SUBNET};

/// How a plan is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Bicep parameter lines
    #[default]
    Bicep,
    /// Pretty-printed JSON object
    Json,
}

/// Unified configuration for ipplan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Search base (base strategy) or start /16 (octet strategy)
    pub base_range: Ipv4Range,
    pub search_strategy: SearchStrategy,
    /// VNet prefix length when no host-count sizing is requested
    pub vnet_prefix_length: u8,
    /// Application-facing subnet prefix length
    pub primary_subnet_prefix_length: u8,
    /// Private-connectivity subnet prefix length
    pub secondary_subnet_prefix_length: u8,
    /// First third octet tried by the octet strategy
    pub start_third_octet: u8,
    /// Addresses reserved by the platform in every subnet
    pub reserved_addresses_per_subnet: u64,
    /// Azure subscription id or name (default: az CLI context)
    pub subscription: Option<String>,
    /// JSON file of used CIDRs; when set, az is not called
    pub inventory_file: Option<PathBuf>,
    pub output_format: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_range: Ipv4Range::truncating(Ipv4Net::new_assert(
                Ipv4Addr::new(172, 16, 0, 0),
                16,
            )),
            search_strategy: SearchStrategy::OctetRollover,
            vnet_prefix_length: 24,
            primary_subnet_prefix_length: 27,
            secondary_subnet_prefix_length: 27,
            start_third_octet: 1,
            reserved_addresses_per_subnet: RESERVED_ADDRESSES_PER_SUBNET,
            subscription: None,
            inventory_file: None,
            output_format: OutputFormat::Bicep,
        }
    }
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub base_range: Option<Ipv4Range>,
    pub search_strategy: Option<SearchStrategy>,
    pub vnet_prefix_length: Option<u8>,
    pub primary_subnet_prefix_length: Option<u8>,
    pub secondary_subnet_prefix_length: Option<u8>,
    pub start_third_octet: Option<u8>,
    pub reserved_addresses_per_subnet: Option<u64>,
    pub subscription: Option<String>,
    pub inventory_file: Option<PathBuf>,
    pub output_format: Option<OutputFormat>,
}

/// Get the XDG config directory for ipplan.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "ipplan").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("ipplan.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".ipplan.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            base_range: overlay.base_range.unwrap_or(self.base_range),
            search_strategy: overlay.search_strategy.unwrap_or(self.search_strategy),
            vnet_prefix_length: overlay
                .vnet_prefix_length
                .unwrap_or(self.vnet_prefix_length),
            primary_subnet_prefix_length: overlay
                .primary_subnet_prefix_length
                .unwrap_or(self.primary_subnet_prefix_length),
            secondary_subnet_prefix_length: overlay
                .secondary_subnet_prefix_length
                .unwrap_or(self.secondary_subnet_prefix_length),
            start_third_octet: overlay.start_third_octet.unwrap_or(self.start_third_octet),
            reserved_addresses_per_subnet: overlay
                .reserved_addresses_per_subnet
                .unwrap_or(self.reserved_addresses_per_subnet),
            subscription: overlay
                .subscription
                .clone()
                .or_else(|| self.subscription.clone()),
            inventory_file: overlay
                .inventory_file
                .clone()
                .or_else(|| self.inventory_file.clone()),
            output_format: overlay.output_format.unwrap_or(self.output_format),
        }
    }

    /// Expand `~`, `$VAR` and `${VAR}` in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(path) = &self.inventory_file {
            let raw = path.to_string_lossy();
            let expanded = shellexpand::full(raw.as_ref())
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| raw.to_string());
            self.inventory_file = Some(PathBuf::from(expanded));
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.ipplan.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_layers(global_config_path().as_deref(), local_dir)
    }

    /// Load settings from an explicit global config path.
    ///
    /// Missing files are skipped; unreadable or malformed files are errors.
    pub fn load_layers(
        global_path: Option<&Path>,
        local_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_path {
            if global_path.exists() {
                let raw = load_raw_settings(global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply IPPLAN_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("IPPLAN")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = env_value::<Ipv4Range>(&config, "base_range")? {
            settings.base_range = val;
        }
        if let Ok(val) = config.get_string("search_strategy") {
            settings.search_strategy = SearchStrategy::from_str(&val, true)
                .map_err(|e| invalid_env("search_strategy", &val, &e))?;
        }
        if let Some(val) = env_value::<u8>(&config, "vnet_prefix_length")? {
            settings.vnet_prefix_length = val;
        }
        if let Some(val) = env_value::<u8>(&config, "primary_subnet_prefix_length")? {
            settings.primary_subnet_prefix_length = val;
        }
        if let Some(val) = env_value::<u8>(&config, "secondary_subnet_prefix_length")? {
            settings.secondary_subnet_prefix_length = val;
        }
        if let Some(val) = env_value::<u8>(&config, "start_third_octet")? {
            settings.start_third_octet = val;
        }
        if let Some(val) = env_value::<u64>(&config, "reserved_addresses_per_subnet")? {
            settings.reserved_addresses_per_subnet = val;
        }
        if let Ok(val) = config.get_string("subscription") {
            settings.subscription = Some(val);
        }
        if let Ok(val) = config.get_string("inventory_file") {
            settings.inventory_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("output_format") {
            settings.output_format = OutputFormat::from_str(&val, true)
                .map_err(|e| invalid_env("output_format", &val, &e))?;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# ipplan configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/ipplan/ipplan.toml
#   Local:  <dir>/.ipplan.toml
#   Env:    IPPLAN_* environment variables (e.g. IPPLAN_BASE_RANGE)
#   Flags:  command-line options win over everything

# Search base. The octets strategy needs a /16 inside 10.0.0.0/8 or 172.16.0.0/12.
# base_range = "172.16.0.0/16"

# "octets": walk <a>.<second>.<third>.0/24 blocks, third octet first
# "base":   search only inside base_range, growing the VNet if needed
# search_strategy = "octets"

# vnet_prefix_length = 24
# primary_subnet_prefix_length = 27
# secondary_subnet_prefix_length = 27

# First third octet tried by the octets strategy
# start_third_octet = 1

# Addresses the platform reserves in every subnet (Azure: 5)
# reserved_addresses_per_subnet = 5

# Azure subscription id or name (default: az CLI context)
# subscription = "my-subscription"

# JSON array of used CIDRs; when set, az is not called
# inventory_file = "~/inventory/vnets.json"

# "bicep" or "json"
# output_format = "bicep"
"#
        .to_string()
    }
}

fn env_value<T>(config: &Config, key: &str) -> Result<Option<T>, ApplicationError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match config.get_string(key) {
        Ok(val) => val
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| invalid_env(key, &val, &e)),
        Err(_) => Ok(None),
    }
}

fn invalid_env(key: &str, value: &str, err: &dyn std::fmt::Display) -> ApplicationError {
    ApplicationError::Config {
        message: format!("IPPLAN_{}={value}: {err}", key.to_uppercase()),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_then_match_documented_values() {
        let settings = Settings::default();
        assert_eq!(settings.base_range.to_string(), "172.16.0.0/16");
        assert_eq!(settings.search_strategy, SearchStrategy::OctetRollover);
        assert_eq!(settings.vnet_prefix_length, 24);
        assert_eq!(settings.primary_subnet_prefix_length, 27);
        assert_eq!(settings.secondary_subnet_prefix_length, 27);
        assert_eq!(settings.start_third_octet, 1);
        assert_eq!(settings.reserved_addresses_per_subnet, 5);
        assert_eq!(settings.output_format, OutputFormat::Bicep);
    }

    #[test]
    fn given_overlay_when_merging_then_specified_fields_win() {
        let base = Settings {
            subscription: Some("base-sub".into()),
            ..Settings::default()
        };
        let overlay = RawSettings {
            search_strategy: Some(SearchStrategy::BoundedBase),
            vnet_prefix_length: Some(22),
            ..RawSettings::default()
        };

        let result = base.merge_with(&overlay);

        assert_eq!(result.search_strategy, SearchStrategy::BoundedBase);
        assert_eq!(result.vnet_prefix_length, 22);
        // not specified: inherited
        assert_eq!(result.subscription.as_deref(), Some("base-sub"));
        assert_eq!(result.primary_subnet_prefix_length, 27);
    }

    #[test]
    fn given_tilde_in_inventory_file_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            inventory_file: Some(PathBuf::from("~/vnets.json")),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let path = settings.inventory_file.unwrap();
        assert!(path.to_string_lossy().starts_with(&home), "{}", path.display());
    }

    #[test]
    fn given_settings_when_to_toml_then_parses_back() {
        let settings = Settings {
            base_range: "10.5.0.0/16".parse().unwrap(),
            search_strategy: SearchStrategy::BoundedBase,
            ..Settings::default()
        };

        let text = settings.to_toml().unwrap();
        assert!(text.contains("base_range = \"10.5.0.0/16\""), "{text}");
        assert!(text.contains("search_strategy = \"base\""), "{text}");

        let raw: RawSettings = toml::from_str(&text).unwrap();
        assert_eq!(Settings::default().merge_with(&raw), settings);
    }

    #[test]
    fn given_template_when_parsing_then_all_commented_out() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert_eq!(Settings::default().merge_with(&raw), Settings::default());
    }
}
