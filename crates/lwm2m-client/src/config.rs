//! Configuration loading and validation

use anyhow::{Context, Result};
use lwm2m_core::{BatteryStatus, DeviceConfig, PowerSource, PowerSourceType, PowerState};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub power: PowerConfig,
}

/// Initial power readings until the power-management driver reports real ones
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerConfig {
    #[serde(default = "default_battery_mv")]
    pub battery_mv: i32,
    #[serde(default = "default_battery_ma")]
    pub battery_ma: i32,
    #[serde(default = "default_usb_mv")]
    pub usb_mv: i32,
    #[serde(default = "default_usb_ma")]
    pub usb_ma: i32,
    #[serde(default = "default_battery_status")]
    pub battery_status: BatteryStatus,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            battery_mv: default_battery_mv(),
            battery_ma: default_battery_ma(),
            usb_mv: default_usb_mv(),
            usb_ma: default_usb_ma(),
            battery_status: default_battery_status(),
        }
    }
}

fn default_battery_mv() -> i32 {
    3800
}

fn default_battery_ma() -> i32 {
    125
}

fn default_usb_mv() -> i32 {
    5000
}

fn default_usb_ma() -> i32 {
    900
}

fn default_battery_status() -> BatteryStatus {
    BatteryStatus::Charging
}

impl PowerConfig {
    /// Build the power state the registry will reference
    pub fn to_power_state(&self) -> PowerState {
        PowerState::new(
            PowerSource::new(PowerSourceType::InternalBattery, self.battery_mv, self.battery_ma),
            PowerSource::new(PowerSourceType::Usb, self.usb_mv, self.usb_ma),
            self.battery_status,
        )
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(Config::default())
    }
}

/// Save default configuration to file
pub fn save_default_config(path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(&Config::default())?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_config(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_default_config_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lwm2m.toml");

        save_default_config(&path).unwrap();
        assert_eq!(load_config(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_partial_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lwm2m.toml");
        std::fs::write(
            &path,
            r#"
[device]
model_number = "thingy91_nrf9160_ns"
flash_size = 1048576

[power]
battery_status = "low"
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.device.model_number, "thingy91_nrf9160_ns");
        assert_eq!(config.device.memory_total_kib(), 1024);
        assert_eq!(config.device.manufacturer, "Nordic Semiconductor ASA");
        assert_eq!(config.power.battery_status, BatteryStatus::Low);
        assert_eq!(config.power.usb_mv, 5000);

        let power = config.power.to_power_state();
        assert_eq!(power.battery_status(), BatteryStatus::Low as u8);
        assert_eq!(power.usb.kind(), Some(PowerSourceType::Usb));
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lwm2m.toml");
        std::fs::write(&path, "[device]\nflash_size = \"big\"\n").unwrap();

        assert!(load_config(&path).is_err());
    }
}
