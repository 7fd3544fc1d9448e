//! LwM2M Core - Device object resource registry
//!
//! This crate provides the in-memory resource model the LwM2M protocol engine
//! pulls from:
//! - Resource addressing (object/instance/resource/resource-instance paths)
//! - The static Device object schema with access and multi-instance rules
//! - A registry of non-owning value bindings and executable actions
//! - Device object bring-up from board configuration and power readings

pub mod access;
pub mod action;
pub mod device;
pub mod error;
pub mod path;
pub mod registry;
pub mod schema;
pub mod value;

pub use access::AccessFlags;
pub use action::{FactoryReset, ResourceAction};
pub use device::{
    initialize_device_object, BatteryStatus, DeviceConfig, DeviceIdentity, PowerSource,
    PowerSourceType, PowerState,
};
pub use error::RegistryError;
pub use path::ResourcePath;
pub use registry::{RegistrySnapshot, ResourceRegistry, ResourceSlot, SlotSnapshot};
pub use schema::{DataKind, Operations, ResourceDef, DEVICE_OBJECT_ID};
pub use value::{IntegerCell, ResourceValue, ValueSnapshot};
