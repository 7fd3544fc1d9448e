//! Static schema of the LwM2M Device object (object id 3)
//!
//! The registry only accepts paths that resolve to a resource declared here.
//! Each entry fixes the resource's operations, data kind and, for
//! multi-instance resources, how many resource instances may be created.

use serde::Serialize;

use crate::path::ResourcePath;

/// Object id of the Device object
pub const DEVICE_OBJECT_ID: u16 = 3;

/// The Device object is single-instance
pub const DEVICE_OBJECT_INSTANCE: u16 = 0;

/// Maximum number of power sources a device may report
pub const POWER_SOURCE_MAX: u16 = 5;

/// Maximum number of error codes a device may report
pub const ERROR_CODE_MAX: u16 = 5;

pub const MANUFACTURER_RID: u16 = 0;
pub const MODEL_NUMBER_RID: u16 = 1;
pub const SERIAL_NUMBER_RID: u16 = 2;
pub const FIRMWARE_VERSION_RID: u16 = 3;
pub const REBOOT_RID: u16 = 4;
pub const FACTORY_RESET_RID: u16 = 5;
pub const POWER_SOURCE_RID: u16 = 6;
pub const POWER_SOURCE_VOLTAGE_RID: u16 = 7;
pub const POWER_SOURCE_CURRENT_RID: u16 = 8;
pub const BATTERY_LEVEL_RID: u16 = 9;
pub const MEMORY_FREE_RID: u16 = 10;
pub const ERROR_CODE_RID: u16 = 11;
pub const RESET_ERROR_CODE_RID: u16 = 12;
pub const CURRENT_TIME_RID: u16 = 13;
pub const UTC_OFFSET_RID: u16 = 14;
pub const TIMEZONE_RID: u16 = 15;
pub const SUPPORTED_BINDING_RID: u16 = 16;
pub const DEVICE_TYPE_RID: u16 = 17;
pub const HARDWARE_VERSION_RID: u16 = 18;
pub const SOFTWARE_VERSION_RID: u16 = 19;
pub const BATTERY_STATUS_RID: u16 = 20;
pub const MEMORY_TOTAL_RID: u16 = 21;
pub const EXT_DEV_INFO_RID: u16 = 22;

/// Operations a resource supports towards the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operations {
    /// Read only
    R,
    /// Read and write
    Rw,
    /// Execute
    E,
}

/// Data kind a resource carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    String,
    Integer,
    Time,
    Opaque,
    /// Object link, rendered as an opaque reference
    ObjLink,
    /// Executable resources carry no value
    None,
}

impl DataKind {
    /// Whether a text or bytes backing is acceptable for this kind
    pub fn accepts_bytes(self) -> bool {
        matches!(self, Self::String | Self::Opaque | Self::ObjLink)
    }

    /// Whether an integer cell backing is acceptable for this kind
    pub fn accepts_integer(self) -> bool {
        matches!(self, Self::Integer | Self::Time)
    }
}

/// Schema entry for a single resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResourceDef {
    pub id: u16,
    pub name: &'static str,
    pub operations: Operations,
    pub kind: DataKind,
    /// Declared maximum resource instances; `None` for singular resources
    pub max_instances: Option<u16>,
}

impl ResourceDef {
    const fn single(id: u16, name: &'static str, operations: Operations, kind: DataKind) -> Self {
        Self {
            id,
            name,
            operations,
            kind,
            max_instances: None,
        }
    }

    const fn multi(
        id: u16,
        name: &'static str,
        operations: Operations,
        kind: DataKind,
        max: u16,
    ) -> Self {
        Self {
            id,
            name,
            operations,
            kind,
            max_instances: Some(max),
        }
    }

    pub fn is_multi_instance(&self) -> bool {
        self.max_instances.is_some()
    }

    pub fn is_executable(&self) -> bool {
        self.operations == Operations::E
    }
}

use DataKind as K;
use Operations as O;

/// Resource catalog of the Device object, indexed by resource id
pub static DEVICE_RESOURCES: [ResourceDef; 23] = [
    ResourceDef::single(MANUFACTURER_RID, "Manufacturer", O::R, K::String),
    ResourceDef::single(MODEL_NUMBER_RID, "Model Number", O::R, K::String),
    ResourceDef::single(SERIAL_NUMBER_RID, "Serial Number", O::R, K::String),
    ResourceDef::single(FIRMWARE_VERSION_RID, "Firmware Version", O::R, K::String),
    ResourceDef::single(REBOOT_RID, "Reboot", O::E, K::None),
    ResourceDef::single(FACTORY_RESET_RID, "Factory Reset", O::E, K::None),
    ResourceDef::multi(POWER_SOURCE_RID, "Available Power Sources", O::R, K::Integer, POWER_SOURCE_MAX),
    ResourceDef::multi(POWER_SOURCE_VOLTAGE_RID, "Power Source Voltage", O::R, K::Integer, POWER_SOURCE_MAX),
    ResourceDef::multi(POWER_SOURCE_CURRENT_RID, "Power Source Current", O::R, K::Integer, POWER_SOURCE_MAX),
    ResourceDef::single(BATTERY_LEVEL_RID, "Battery Level", O::R, K::Integer),
    ResourceDef::single(MEMORY_FREE_RID, "Memory Free", O::R, K::Integer),
    ResourceDef::multi(ERROR_CODE_RID, "Error Code", O::R, K::Integer, ERROR_CODE_MAX),
    ResourceDef::single(RESET_ERROR_CODE_RID, "Reset Error Code", O::E, K::None),
    ResourceDef::single(CURRENT_TIME_RID, "Current Time", O::Rw, K::Time),
    ResourceDef::single(UTC_OFFSET_RID, "UTC Offset", O::Rw, K::String),
    ResourceDef::single(TIMEZONE_RID, "Timezone", O::Rw, K::String),
    ResourceDef::single(SUPPORTED_BINDING_RID, "Supported Binding and Modes", O::R, K::String),
    ResourceDef::single(DEVICE_TYPE_RID, "Device Type", O::R, K::String),
    ResourceDef::single(HARDWARE_VERSION_RID, "Hardware Version", O::R, K::String),
    ResourceDef::single(SOFTWARE_VERSION_RID, "Software Version", O::R, K::String),
    ResourceDef::single(BATTERY_STATUS_RID, "Battery Status", O::R, K::Integer),
    ResourceDef::single(MEMORY_TOTAL_RID, "Memory Total", O::R, K::Integer),
    ResourceDef::multi(EXT_DEV_INFO_RID, "ExtDevInfo", O::R, K::ObjLink, 1),
];

/// Resolve a path to its schema entry
///
/// Only the object id, object instance and resource id are considered; the
/// resource instance rules are checked by the registry.
pub fn lookup(path: &ResourcePath) -> Option<&'static ResourceDef> {
    if path.object_id != DEVICE_OBJECT_ID || path.instance_id != DEVICE_OBJECT_INSTANCE {
        return None;
    }
    DEVICE_RESOURCES.get(usize::from(path.resource_id))
}

/// Path to a singular resource of the Device object
pub const fn device_resource(resource_id: u16) -> ResourcePath {
    ResourcePath::new(DEVICE_OBJECT_ID, DEVICE_OBJECT_INSTANCE, resource_id)
}
