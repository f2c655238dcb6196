//! CLI application for controlling a Key Light.
//!
//! Feeds a single announcement for the given address through the discovery
//! bridge, then drives the resulting accessory's control handlers, so a
//! failed request shows the eviction path as well.
//!
//! Run with: cargo run --example keylight_cli -- --help

use std::net::IpAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use keylight_rs::{
    Accessory, Brightness, ChannelDiscovery, DiscoveryBridge, DiscoveryHandle, Host,
    PlatformConfig, Registry, Temperature,
};

#[derive(Parser)]
#[command(name = "keylight-cli")]
#[command(about = "Control an Elgato Key Light from the command line", long_about = None)]
struct Cli {
    /// IP address of the Key Light
    #[arg(short, long)]
    ip: IpAddr,

    /// HTTP port of the Key Light
    #[arg(short, long, default_value = "9123")]
    port: u16,

    /// Request timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get the current status of the light
    Status,

    /// Turn the light on
    On,

    /// Turn the light off
    Off,

    /// Set brightness (0-100)
    Brightness {
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        level: u8,
    },

    /// Set color temperature in mireds (143-344)
    Temperature {
        #[arg(value_parser = clap::value_parser!(u16).range(143..=344))]
        mireds: u16,
    },
}

/// Host that just reports what it is asked to do.
struct ConsoleHost;

impl Host for ConsoleHost {
    fn register(&self, accessory: &Accessory) {
        println!("registered {} ({})", accessory.name(), accessory.identity());
    }

    fn unregister(&self, accessory: &Accessory) {
        println!("unregistered {} ({})", accessory.name(), accessory.identity());
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = PlatformConfig::default();
    config.request_timeout = cli.timeout_ms.map(std::time::Duration::from_millis);

    let registry = Registry::from_config(Arc::new(ConsoleHost), &config)?;
    let (discovery, sender, _removals) = ChannelDiscovery::new();
    let bridge = DiscoveryBridge::new(registry.clone(), Arc::new(discovery), &config);

    sender.up("Key Light", cli.ip, cli.port, DiscoveryHandle::default());
    sender.close();
    bridge.run().await?;

    let Some(accessory) = registry.accessories().into_iter().next() else {
        return Err("light was not registered".into());
    };
    let controls = accessory.controls();

    let result = match cli.command {
        Commands::Status => {
            let on = controls.read_power().await?;
            let brightness = controls.read_brightness().await?;
            let temperature = controls.read_temperature().await?;
            println!("Endpoint:    {}", accessory.endpoint());
            println!("Power:       {}", if on { "on" } else { "off" });
            println!("Brightness:  {}%", brightness.value());
            println!(
                "Temperature: {} mireds (~{}K)",
                temperature.mireds(),
                temperature.kelvin()
            );
            Ok(())
        }
        Commands::On => controls.write_power(true).await,
        Commands::Off => controls.write_power(false).await,
        Commands::Brightness { level } => {
            let brightness = Brightness::create(level).ok_or("brightness must be 0-100")?;
            controls.write_brightness(brightness).await
        }
        Commands::Temperature { mireds } => {
            controls
                .write_temperature(Temperature::clamped(mireds))
                .await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        println!("{} accessories remain registered", registry.len());
        std::process::exit(1);
    }
    Ok(())
}
