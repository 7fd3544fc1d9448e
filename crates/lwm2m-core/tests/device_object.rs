use lwm2m_core::schema::{
    device_resource, DEVICE_TYPE_RID, FACTORY_RESET_RID, HARDWARE_VERSION_RID, MANUFACTURER_RID,
    MODEL_NUMBER_RID, POWER_SOURCE_CURRENT_RID, POWER_SOURCE_RID, POWER_SOURCE_VOLTAGE_RID,
    SERIAL_NUMBER_RID,
};
use lwm2m_core::{
    initialize_device_object, AccessFlags, BatteryStatus, DeviceConfig, DeviceIdentity,
    FactoryReset, PowerSource, PowerSourceType, PowerState, RegistryError, ResourcePath,
    ResourceRegistry, ValueSnapshot,
};
use std::cell::Cell;

fn test_config() -> DeviceConfig {
    DeviceConfig {
        manufacturer: "Acme".to_string(),
        device_type: "tracker".to_string(),
        model_number: "board_x".to_string(),
        hardware_version: "soc_y".to_string(),
        flash_size: 0x7_0000,
    }
}

#[test]
fn test_power_source_groups() {
    let identity = DeviceIdentity::new(&test_config(), "SN-001");
    let power = PowerState::new(
        PowerSource::new(PowerSourceType::InternalBattery, 3800, 125),
        PowerSource::new(PowerSourceType::Usb, 5000, 900),
        BatteryStatus::Normal,
    );
    let mut registry = ResourceRegistry::new();
    initialize_device_object(&mut registry, &identity, &power, FactoryReset).unwrap();

    let expected = [
        (POWER_SOURCE_RID, [1, 5]),
        (POWER_SOURCE_VOLTAGE_RID, [3800, 5000]),
        (POWER_SOURCE_CURRENT_RID, [125, 900]),
    ];
    for (rid, values) in expected {
        for (riid, value) in (0u16..).zip(values) {
            let path = ResourcePath::instance(3, 0, rid, riid);
            assert!(registry.is_instance_created(&path));
            assert_eq!(registry.read(&path).unwrap(), ValueSnapshot::Integer(value));
        }
        assert_eq!(registry.instances_of(&device_resource(rid)), vec![0, 1]);
    }
}

#[test]
fn test_identity_resources_are_read_only() {
    let identity = DeviceIdentity::new(&test_config(), "SN-001");
    let power = PowerState::default();
    let mut registry = ResourceRegistry::new();
    initialize_device_object(&mut registry, &identity, &power, FactoryReset).unwrap();

    let identity_resources = [
        (MANUFACTURER_RID, "Acme"),
        (MODEL_NUMBER_RID, "board_x"),
        (SERIAL_NUMBER_RID, "SN-001"),
        (DEVICE_TYPE_RID, "tracker"),
        (HARDWARE_VERSION_RID, "soc_y"),
    ];
    for (rid, text) in identity_resources {
        let path = device_resource(rid);
        assert_eq!(
            registry.slot(&path).map(|slot| slot.flags()),
            Some(AccessFlags::READ_ONLY)
        );
        assert_eq!(
            registry.read(&path).unwrap(),
            ValueSnapshot::Text(text.to_string())
        );
        assert_eq!(registry.write(&path, 0), Err(RegistryError::ReadOnly(path)));
    }

    // power readings stay writable through the engine path
    let battery_current = ResourcePath::instance(3, 0, POWER_SOURCE_CURRENT_RID, 0);
    registry.write(&battery_current, 80).unwrap();
    assert_eq!(power.battery.current_ma(), 80);
}

#[test]
fn test_reinitialize_overwrites() {
    let identity = DeviceIdentity::new(&test_config(), "SN-001");
    let power = PowerState::default();
    let mut registry = ResourceRegistry::new();

    initialize_device_object(&mut registry, &identity, &power, FactoryReset).unwrap();
    let first: Vec<ResourcePath> = registry.paths().copied().collect();

    initialize_device_object(&mut registry, &identity, &power, FactoryReset).unwrap();
    let second: Vec<ResourcePath> = registry.paths().copied().collect();

    assert_eq!(first, second);
    assert_eq!(registry.len(), 14);
}

#[test]
fn test_factory_reset_execute() {
    let identity = DeviceIdentity::new(&test_config(), "SN-001");
    let power = PowerState::default();
    let mut registry = ResourceRegistry::new();
    initialize_device_object(&mut registry, &identity, &power, FactoryReset).unwrap();

    let before = registry.snapshot();
    assert_eq!(registry.execute(&device_resource(FACTORY_RESET_RID), &[]), Ok(()));
    assert_eq!(registry.snapshot(), before);
}

#[test]
fn test_injected_reset_action() {
    let calls = Cell::new(0);
    let identity = DeviceIdentity::new(&test_config(), "SN-001");
    let power = PowerState::default();
    let mut registry = ResourceRegistry::new();

    let reset = |args: &[u8]| {
        calls.set(calls.get() + 1);
        if args == b"refuse" {
            -1
        } else {
            0
        }
    };
    initialize_device_object(&mut registry, &identity, &power, reset).unwrap();

    let path = device_resource(FACTORY_RESET_RID);
    assert_eq!(registry.execute(&path, &[]), Ok(()));
    assert_eq!(
        registry.execute(&path, b"refuse"),
        Err(RegistryError::ActionFailure { path, status: -1 })
    );
    assert_eq!(calls.get(), 2);
}
