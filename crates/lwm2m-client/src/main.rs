//! LwM2M client bring-up
//!
//! Loads the board configuration, registers the Device object and reports the
//! resulting registry. Any registration failure aborts bring-up.

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use lwm2m_core::{initialize_device_object, DeviceIdentity, FactoryReset, ResourceRegistry};
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "lwm2m-client")]
#[command(about = "LwM2M client device object bring-up")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "lwm2m.toml")]
    config: PathBuf,

    /// Device serial number
    #[arg(short, long, default_value = "0")]
    serial: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Print the registry as JSON
    #[arg(long)]
    json: bool,

    /// Write a default configuration file and exit
    #[arg(long)]
    write_default_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("lwm2m-client v{}", env!("CARGO_PKG_VERSION"));

    if args.write_default_config {
        config::save_default_config(&args.config)?;
        info!(path = %args.config.display(), "Wrote default configuration");
        return Ok(());
    }

    let config = config::load_config(&args.config)?;

    info!(
        model = %config.device.model_number,
        hardware = %config.device.hardware_version,
        "Configuration loaded"
    );

    let identity = DeviceIdentity::new(&config.device, args.serial);
    let power = config.power.to_power_state();
    let mut registry = ResourceRegistry::new();

    if let Err(e) = initialize_device_object(&mut registry, &identity, &power, FactoryReset) {
        error!(error = %e, "Device object registration failed, halting bring-up");
        return Err(e).context("device object initialization");
    }

    let snapshot = registry.snapshot();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("Registered {} resources:", snapshot.slots.len());
        for slot in &snapshot.slots {
            let access = if slot.executable {
                "E"
            } else if slot.read_only {
                "R"
            } else {
                "RW"
            };
            match &slot.value {
                Some(value) => println!("  {:<10} {:<3} {:<24} {:?}", slot.path, access, slot.name, value),
                None => println!("  {:<10} {:<3} {}", slot.path, access, slot.name),
            }
        }
    }

    Ok(())
}
