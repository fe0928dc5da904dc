//! usbip-discover
//!
//! Lists USB devices exportable from a remote USB/IP host, or the USB devices
//! present on the local system, in human or parsable form.

use anyhow::{Context, Result};
use clap::{ArgGroup, CommandFactory, Parser, Subcommand};
use common::{NameDb, setup_logging};
use discover::config::Config;
use discover::output::{OutputMode, Presenter};
use discover::sysfs::UsbBus;
use discover::{local, remote};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "usbip-discover")]
#[command(author, version, about = "USB/IP discovery - list exportable USB devices")]
#[command(long_about = "
List USB devices exported by a remote USB/IP host, or the USB devices present
on the local system, in human-readable or parsable form.

EXAMPLES:
    # List devices exported by a remote host
    usbip-discover list --remote fileserver

    # List local devices in parsable form
    usbip-discover list --local --parsable

    # Run with custom config
    usbip-discover --config /path/to/config.toml list --local

CONFIGURATION:
    The tool looks for configuration files in the following order:
    1. Path specified with --config
    2. ~/.config/usbip-discover/config.toml
    3. /etc/usbip-discover/config.toml
    4. Built-in defaults
")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<std::path::PathBuf>,

    /// Save default configuration to default location and exit
    #[arg(long)]
    save_config: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List exportable or local USB devices
    List(ListArgs),
}

#[derive(clap::Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["remote", "local"])))]
struct ListArgs {
    /// Parsable list format
    #[arg(short, long)]
    parsable: bool,

    /// List the exported USB devices on <host>
    #[arg(short, long, value_name = "HOST")]
    remote: Option<String>,

    /// List the local USB devices
    #[arg(short, long)]
    local: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Handle --save-config flag early (before loading config)
    if args.save_config {
        let config = Config::default();
        let path = Config::default_path();
        config.save(&path).context("Failed to save configuration")?;
        println!("Configuration saved to: {}", path.display());
        return Ok(());
    }

    // Load configuration first (to get log level from config if not specified)
    let config = if let Some(ref path) = args.config {
        Config::load(Some(path.clone())).context("Failed to load configuration")?
    } else {
        Config::load_or_default()
    };

    // Use CLI log level if specified, otherwise use config value
    let log_level = args
        .log_level
        .as_deref()
        .unwrap_or(&config.discover.log_level);

    setup_logging(log_level).context("Failed to setup logging")?;
    debug!("usbip-discover v{}", env!("CARGO_PKG_VERSION"));

    let Some(command) = args.command else {
        Args::command().print_help()?;
        std::process::exit(2);
    };

    match command {
        Command::List(list) => run_list(&list, &config),
    }
}

fn run_list(args: &ListArgs, config: &Config) -> Result<()> {
    let mode = if args.parsable {
        OutputMode::Parsable
    } else {
        OutputMode::Human
    };

    // The resolver lives for the duration of the listing only.
    let names = NameDb::load_or_empty(&config.discover.usb_ids_path);

    let stdout = std::io::stdout();
    let mut presenter = Presenter::new(mode, stdout.lock());

    let emitted = if let Some(host) = &args.remote {
        remote::list_exported_devices(host, config.discover.port, &names, &mut presenter)?
    } else {
        let bus = UsbBus::open()?;
        local::list_local_devices(&bus, &mut presenter)?
    };
    debug!("listed {emitted} device(s)");

    Ok(())
}
