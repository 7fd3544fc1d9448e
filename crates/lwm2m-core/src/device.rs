//! Device object bring-up
//!
//! Builds the Device object's registry entries from board configuration, the
//! caller-supplied serial number and the power-management readings. The
//! registry only borrows these values, so `DeviceIdentity` and `PowerState`
//! must outlive it.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI32, AtomicU8, Ordering};
use tracing::info;

use crate::access::AccessFlags;
use crate::action::ResourceAction;
use crate::error::RegistryError;
use crate::registry::ResourceRegistry;
use crate::schema::{
    device_resource, BATTERY_STATUS_RID, DEVICE_TYPE_RID, FACTORY_RESET_RID,
    HARDWARE_VERSION_RID, MANUFACTURER_RID, MEMORY_TOTAL_RID, MODEL_NUMBER_RID,
    POWER_SOURCE_CURRENT_RID, POWER_SOURCE_RID, POWER_SOURCE_VOLTAGE_RID, SERIAL_NUMBER_RID,
};
use crate::value::ResourceValue;

/// Board and build configuration consumed at bring-up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    #[serde(default = "default_manufacturer")]
    pub manufacturer: String,
    #[serde(default = "default_device_type")]
    pub device_type: String,
    /// Board identifier, reported as the model number
    #[serde(default = "default_model_number")]
    pub model_number: String,
    /// SoC identifier, reported as the hardware version
    #[serde(default = "default_hardware_version")]
    pub hardware_version: String,
    /// Size of the firmware image partition in bytes
    #[serde(default = "default_flash_size")]
    pub flash_size: u32,
}

fn default_manufacturer() -> String {
    "Nordic Semiconductor ASA".to_string()
}

fn default_device_type() -> String {
    "OMA-LWM2M Client".to_string()
}

fn default_model_number() -> String {
    "nrf9160dk_nrf9160_ns".to_string()
}

fn default_hardware_version() -> String {
    "nRF9160".to_string()
}

fn default_flash_size() -> u32 {
    0x70000
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            manufacturer: default_manufacturer(),
            device_type: default_device_type(),
            model_number: default_model_number(),
            hardware_version: default_hardware_version(),
            flash_size: default_flash_size(),
        }
    }
}

impl DeviceConfig {
    /// Total memory in KiB, as reported by the Memory Total resource
    pub fn memory_total_kib(&self) -> i32 {
        // u32::MAX / 1024 always fits
        (self.flash_size / 1024) as i32
    }
}

/// Owned backing storage for the Device object's identity resources
#[derive(Debug)]
pub struct DeviceIdentity {
    pub manufacturer: String,
    pub model_number: String,
    pub serial_number: String,
    pub device_type: String,
    pub hardware_version: String,
    pub memory_total: AtomicI32,
}

impl DeviceIdentity {
    pub fn new(config: &DeviceConfig, serial_number: impl Into<String>) -> Self {
        Self {
            manufacturer: config.manufacturer.clone(),
            model_number: config.model_number.clone(),
            serial_number: serial_number.into(),
            device_type: config.device_type.clone(),
            hardware_version: config.hardware_version.clone(),
            memory_total: AtomicI32::new(config.memory_total_kib()),
        }
    }
}

/// Power source type codes of the Available Power Sources resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PowerSourceType {
    DcPower = 0,
    InternalBattery = 1,
    ExternalBattery = 2,
    FuelCell = 3,
    PowerOverEthernet = 4,
    Usb = 5,
    AcPower = 6,
    Solar = 7,
}

impl PowerSourceType {
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Self::DcPower,
            1 => Self::InternalBattery,
            2 => Self::ExternalBattery,
            3 => Self::FuelCell,
            4 => Self::PowerOverEthernet,
            5 => Self::Usb,
            6 => Self::AcPower,
            7 => Self::Solar,
            _ => return None,
        })
    }
}

/// Battery status codes of the Battery Status resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BatteryStatus {
    Normal = 0,
    Charging = 1,
    ChargeComplete = 2,
    Damaged = 3,
    Low = 4,
    NotInstalled = 5,
    Unknown = 6,
}

/// Live readings of one power source
///
/// Type, voltage and current share one resource instance id in the registry.
#[derive(Debug)]
pub struct PowerSource {
    kind: AtomicU8,
    voltage_mv: AtomicI32,
    current_ma: AtomicI32,
}

impl PowerSource {
    pub fn new(kind: PowerSourceType, voltage_mv: i32, current_ma: i32) -> Self {
        Self {
            kind: AtomicU8::new(kind as u8),
            voltage_mv: AtomicI32::new(voltage_mv),
            current_ma: AtomicI32::new(current_ma),
        }
    }

    pub fn kind(&self) -> Option<PowerSourceType> {
        PowerSourceType::from_code(self.kind.load(Ordering::Relaxed))
    }

    pub fn voltage_mv(&self) -> i32 {
        self.voltage_mv.load(Ordering::Relaxed)
    }

    pub fn current_ma(&self) -> i32 {
        self.current_ma.load(Ordering::Relaxed)
    }

    pub fn set_voltage_mv(&self, mv: i32) {
        self.voltage_mv.store(mv, Ordering::Relaxed);
    }

    pub fn set_current_ma(&self, ma: i32) {
        self.current_ma.store(ma, Ordering::Relaxed);
    }
}

/// Readings owned by the power-management collaborator
#[derive(Debug)]
pub struct PowerState {
    pub battery: PowerSource,
    pub usb: PowerSource,
    battery_status: AtomicU8,
}

impl Default for PowerState {
    fn default() -> Self {
        Self::new(
            PowerSource::new(PowerSourceType::InternalBattery, 3800, 125),
            PowerSource::new(PowerSourceType::Usb, 5000, 900),
            BatteryStatus::Charging,
        )
    }
}

impl PowerState {
    pub fn new(battery: PowerSource, usb: PowerSource, status: BatteryStatus) -> Self {
        Self {
            battery,
            usb,
            battery_status: AtomicU8::new(status as u8),
        }
    }

    /// Power sources in resource instance order: battery, then USB
    pub fn sources(&self) -> [&PowerSource; 2] {
        [&self.battery, &self.usb]
    }

    pub fn battery_status(&self) -> u8 {
        self.battery_status.load(Ordering::Relaxed)
    }

    pub fn set_battery_status(&self, status: BatteryStatus) {
        self.battery_status.store(status as u8, Ordering::Relaxed);
    }
}

/// Register every Device object resource this client exposes
///
/// Identity strings are registered read-only. Each power source gets its
/// type, voltage and current at the same resource instance id, with the
/// instance created before its value is attached. A failure leaves the
/// registry partially populated; callers should abort bring-up.
pub fn initialize_device_object<'a>(
    registry: &mut ResourceRegistry<'a>,
    identity: &'a DeviceIdentity,
    power: &'a PowerState,
    factory_reset: impl ResourceAction + 'a,
) -> Result<(), RegistryError> {
    let identity_strings = [
        (MANUFACTURER_RID, identity.manufacturer.as_str()),
        (MODEL_NUMBER_RID, identity.model_number.as_str()),
        (SERIAL_NUMBER_RID, identity.serial_number.as_str()),
        (DEVICE_TYPE_RID, identity.device_type.as_str()),
        (HARDWARE_VERSION_RID, identity.hardware_version.as_str()),
    ];
    for (rid, text) in identity_strings {
        registry.register_value(
            device_resource(rid),
            ResourceValue::text(text),
            AccessFlags::READ_ONLY,
        )?;
    }

    registry.register_action(device_resource(FACTORY_RESET_RID), factory_reset)?;

    registry.register_value(
        device_resource(BATTERY_STATUS_RID),
        ResourceValue::integer(&power.battery_status),
        AccessFlags::empty(),
    )?;
    registry.register_value(
        device_resource(MEMORY_TOTAL_RID),
        ResourceValue::integer(&identity.memory_total),
        AccessFlags::empty(),
    )?;

    for (riid, source) in (0u16..).zip(power.sources()) {
        let facets = [
            (POWER_SOURCE_RID, ResourceValue::integer(&source.kind)),
            (POWER_SOURCE_VOLTAGE_RID, ResourceValue::integer(&source.voltage_mv)),
            (POWER_SOURCE_CURRENT_RID, ResourceValue::integer(&source.current_ma)),
        ];
        for (rid, value) in facets {
            let path = device_resource(rid).with_resource_instance(riid);
            registry.create_instance(path)?;
            registry.register_value(path, value, AccessFlags::empty())?;
        }
    }

    info!(
        serial = %identity.serial_number,
        slots = registry.len(),
        "Device object initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::FactoryReset;
    use crate::value::ValueSnapshot;

    #[test]
    fn test_memory_total_is_kib_floor() {
        for (flash_size, kib) in [(0, 0), (1023, 0), (1024, 1), (0x70000, 448), (u32::MAX, 4_194_303)] {
            let config = DeviceConfig {
                flash_size,
                ..DeviceConfig::default()
            };
            assert_eq!(config.memory_total_kib(), kib);
        }
    }

    #[test]
    fn test_config_defaults_from_partial_input() {
        let config: DeviceConfig =
            serde_json::from_str(r#"{"model_number": "thingy91_nrf9160_ns"}"#).unwrap();
        assert_eq!(config.model_number, "thingy91_nrf9160_ns");
        assert_eq!(config.manufacturer, "Nordic Semiconductor ASA");
        assert_eq!(config.flash_size, 0x70000);
    }

    #[test]
    fn test_power_source_codes() {
        assert_eq!(PowerSourceType::from_code(1), Some(PowerSourceType::InternalBattery));
        assert_eq!(PowerSourceType::from_code(5), Some(PowerSourceType::Usb));
        assert_eq!(PowerSourceType::from_code(8), None);
    }

    #[test]
    fn test_initialize_registers_catalog() {
        let identity = DeviceIdentity::new(&DeviceConfig::default(), "352656100000000");
        let power = PowerState::default();
        let mut registry = ResourceRegistry::new();

        initialize_device_object(&mut registry, &identity, &power, FactoryReset).unwrap();

        // 5 identity strings, factory reset, battery status, memory total,
        // and 3 facets for each of 2 power sources
        assert_eq!(registry.len(), 14);
        assert_eq!(
            registry.read(&device_resource(SERIAL_NUMBER_RID)).unwrap(),
            ValueSnapshot::Text("352656100000000".to_string())
        );
        assert_eq!(
            registry.read(&device_resource(MEMORY_TOTAL_RID)).unwrap(),
            ValueSnapshot::Integer(448)
        );
        assert_eq!(
            registry.read(&device_resource(BATTERY_STATUS_RID)).unwrap(),
            ValueSnapshot::Integer(BatteryStatus::Charging as i64)
        );
    }

    #[test]
    fn test_serial_length_excludes_terminator() {
        let identity = DeviceIdentity::new(&DeviceConfig::default(), "1234");
        let power = PowerState::default();
        let mut registry = ResourceRegistry::new();
        initialize_device_object(&mut registry, &identity, &power, FactoryReset).unwrap();

        let slot = registry.slot(&device_resource(SERIAL_NUMBER_RID)).unwrap();
        match slot {
            crate::registry::ResourceSlot::Value { value, flags } => {
                assert_eq!(value.len(), 4);
                assert!(flags.is_read_only());
            }
            other => panic!("unexpected slot {:?}", other),
        }
    }

    #[test]
    fn test_live_power_readings() {
        let identity = DeviceIdentity::new(&DeviceConfig::default(), "1");
        let power = PowerState::default();
        let mut registry = ResourceRegistry::new();
        initialize_device_object(&mut registry, &identity, &power, FactoryReset).unwrap();

        let battery_voltage = device_resource(POWER_SOURCE_VOLTAGE_RID).with_resource_instance(0);
        power.battery.set_voltage_mv(3650);
        power.set_battery_status(BatteryStatus::Low);

        assert_eq!(
            registry.read(&battery_voltage).unwrap(),
            ValueSnapshot::Integer(3650)
        );
        assert_eq!(
            registry.read(&device_resource(BATTERY_STATUS_RID)).unwrap(),
            ValueSnapshot::Integer(4)
        );
    }
}
