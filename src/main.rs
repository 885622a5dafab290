use clap::Parser;
use elm327::config::{Config, ConfigLoader, LogFormat, LoggingConfig};
use elm327::port::{find_adapter, list_ports};
use elm327::Elm327;
use serialport::SerialPortType;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::EnvFilter;

// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    name = "elm327",
    version,
    about = "Talk to an ELM327 OBD adapter over its AT command shell.",
    long_about = "Resets the adapter, prints its firmware identity, optionally switches the link to a faster baud rate, then sends each COMMAND and prints the answer. Commands without the AT prefix get one, so `I` sends `AT I`."
)]
struct Args {
    /// Serial port or alias. Discovered by USB id when omitted.
    #[arg(short, long)]
    port: Option<String>,

    /// Link speed used to open the port.
    #[arg(short, long)]
    baud: Option<u32>,

    /// Configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Switch the adapter to this baud rate after connecting (not permanent).
    #[arg(long)]
    switch_baud: Option<u32>,

    /// List serial ports and exit.
    #[arg(long)]
    list: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// AT commands to send, e.g. `I` `RV` `AT DP`.
    commands: Vec<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let loader = match &args.config {
        Some(path) => ConfigLoader::load_from(path)?,
        None => ConfigLoader::load()?,
    };
    let mut config = loader.into_config();
    if let Some(port) = &args.port {
        config.serial.port = Some(port.clone());
    }
    if let Some(baud) = args.baud {
        config.serial.baud_rate = baud;
    }
    if let Some(baud) = args.switch_baud {
        config.driver.target_baud = Some(baud);
    }
    config.validate()?;

    init_logging(&config.logging, args.verbose)?;

    if args.list {
        print_ports(&config)?;
        return Ok(());
    }

    let port_name = match &config.serial.port {
        Some(name) => config.serial.resolve_port(name),
        None => find_adapter(config.serial.vid, config.serial.pid)?,
    };
    info!(port = %port_name, baud_rate = config.serial.baud_rate, "connecting");

    let mut elm = Elm327::open(&port_name, config.serial.port_configuration())?;
    if let (Some(banner), Some(version)) = (elm.banner(), elm.version()) {
        println!("{port_name}: {banner} (firmware {version})");
    }

    if let Some(rate) = config.driver.target_baud {
        if let Err(e) = elm.set_baud_rate(rate) {
            if e.may_be_desynchronized() {
                warn!("link speed may be out of sync; power-cycle the adapter before retrying");
            }
            return Err(e.into());
        }
        println!("Baud rate set to {rate} (not permanent)");
    }

    for command in &args.commands {
        let answer = elm.send_command(command)?;
        println!("{command}: {}", String::from_utf8_lossy(&answer));
    }

    Ok(())
}

fn init_logging(config: &LoggingConfig, verbose: u8) -> Result<(), Box<dyn std::error::Error>> {
    let level = match verbose {
        0 => config.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let writer = match &config.file {
        Some(path) => {
            let file = File::create(path)?;
            BoxMakeWriter::new(std::io::stderr.and(Mutex::new(file)))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(config.file.is_none());

    match config.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Compact => builder.compact().init(),
    }
    Ok(())
}

fn print_ports(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let ports = list_ports()?;
    if ports.is_empty() {
        println!("No serial ports detected");
        return Ok(());
    }

    for port in &ports {
        match &port.port_type {
            SerialPortType::UsbPort(usb) => {
                let marker = if usb.vid == config.serial.vid && usb.pid == config.serial.pid {
                    "  <- adapter"
                } else {
                    ""
                };
                println!(
                    "{}  USB {:04X}:{:04X} {}{marker}",
                    port.port_name,
                    usb.vid,
                    usb.pid,
                    usb.product.as_deref().unwrap_or("")
                );
            }
            other => println!("{}  {:?}", port.port_name, other),
        }
    }
    Ok(())
}
