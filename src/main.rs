//! lifx - control individual LIFX bulbs on the local network.
//!
//! No scenes, no groups: each invocation discovers the bulbs once and
//! performs one action. Compose richer behavior by chaining calls.
//!
//! Environment variables:
//!   LIFX_NUM_LIGHTS          - Expected number of lights (speeds up discovery)
//!   LIFX_DISCOVERY_TIMEOUT   - Discovery timeout in milliseconds
//!   RUST_LOG                 - Log filter, overrides -v

use std::io;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use env_logger::Env;
use lifx_lights_rs::{
    ColorOverrides, Config, Error, Hsbk, LanDiscovery, LightController, Selector, commands,
};
use log::debug;

const CLI_EPILOG: &str = "\
Examples:
  lifx list                                         # List all lights
  lifx on --label \"Office\"                          # Turn on by name
  lifx off --ip 192.168.1.100                       # Turn off by IP
  lifx set --label \"Desk\" --brightness 32768        # Set brightness to 50% (32768/65535)
  lifx set --label \"Desk\" --hue 21845               # Change hue, keep other properties
  lifx set --mac d0:73:xx --hue 43690 --saturation 65535 --brightness 52428 --kelvin 4000
  lifx rename --label \"Old Name\" \"New Name\"         # Rename a light

Compose complex behaviors by chaining calls:
  lifx on --label \"Room1\" && lifx set --label \"Room1\" --hue 21845 --saturation 65535 --brightness 45875";

#[derive(Parser)]
#[command(name = "lifx", version)]
#[command(about = "LIFX - Control individual LIFX smart bulbs", long_about = None)]
#[command(after_help = CLI_EPILOG)]
struct Cli {
    /// Number of lights (speeds up discovery)
    #[arg(short, long, global = true, env = "LIFX_NUM_LIGHTS")]
    num_lights: Option<usize>,

    /// Discovery timeout in ms
    #[arg(
        long,
        global = true,
        default_value_t = Config::DEFAULT_DISCOVERY_TIMEOUT_MS,
        env = "LIFX_DISCOVERY_TIMEOUT"
    )]
    timeout: u64,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all lights
    List {
        /// Print the lights as JSON
        #[arg(long)]
        json: bool,
    },

    /// Turn on a light
    On {
        #[command(flatten)]
        selector: SelectorArgs,

        /// Transition duration in ms
        #[arg(short, long, default_value_t = 0)]
        duration: u64,
    },

    /// Turn off a light
    Off {
        #[command(flatten)]
        selector: SelectorArgs,

        /// Transition duration in ms
        #[arg(short, long, default_value_t = 0)]
        duration: u64,
    },

    /// Set light color/brightness (HSBK)
    Set {
        #[command(flatten)]
        selector: SelectorArgs,

        /// Hue (0-65535)
        #[arg(long)]
        hue: Option<u16>,

        /// Saturation (0-65535)
        #[arg(short, long)]
        saturation: Option<u16>,

        /// Brightness (0-65535)
        #[arg(short, long)]
        brightness: Option<u16>,

        /// Kelvin (2500-9000)
        #[arg(
            short,
            long,
            value_parser = clap::value_parser!(u16)
                .range(i64::from(Hsbk::KELVIN_MIN)..=i64::from(Hsbk::KELVIN_MAX))
        )]
        kelvin: Option<u16>,

        /// Transition duration in ms
        #[arg(short, long, default_value_t = 0)]
        duration: u64,
    },

    /// Rename a light
    Rename {
        #[command(flatten)]
        selector: SelectorArgs,

        /// New name for the light (max 32 chars)
        name: String,
    },
}

/// Which light to act on. At least one is required; they are tried in order.
#[derive(Args)]
#[group(required = true, multiple = true)]
struct SelectorArgs {
    /// MAC address of light
    #[arg(short, long)]
    mac: Option<String>,

    /// IP address of light
    #[arg(short, long)]
    ip: Option<String>,

    /// Label/name of light
    #[arg(short, long)]
    label: Option<String>,
}

impl From<SelectorArgs> for Selector {
    fn from(args: SelectorArgs) -> Self {
        Selector {
            mac: args.mac,
            ip: args.ip,
            label: args.label,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too and are not failures
            e.print().ok();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let log_level = match cli.verbose {
        0 => "error",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_target(cli.verbose >= 2)
        .format_timestamp(if cli.verbose >= 2 {
            Some(env_logger::TimestampPrecision::Millis)
        } else {
            None
        })
        .init();

    let Some(command) = cli.command else {
        Cli::command().print_help().ok();
        return ExitCode::FAILURE;
    };

    let config = Config::new()
        .with_num_lights(cli.num_lights)
        .with_discovery_timeout(Duration::from_millis(cli.timeout));
    debug!("lifx v{} ({:?})", env!("CARGO_PKG_VERSION"), config);
    let mut controller = LightController::new(LanDiscovery::new(config));

    match run(&mut controller, command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(controller: &mut LightController<LanDiscovery>, command: Commands) -> Result<()> {
    let mut out = io::stdout().lock();

    match command {
        Commands::List { json } => commands::list(controller, json, &mut out).await?,
        Commands::On { selector, duration } => {
            commands::power(
                controller,
                &selector.into(),
                true,
                Duration::from_millis(duration),
                &mut out,
            )
            .await?
        }
        Commands::Off { selector, duration } => {
            commands::power(
                controller,
                &selector.into(),
                false,
                Duration::from_millis(duration),
                &mut out,
            )
            .await?
        }
        Commands::Set {
            selector,
            hue,
            saturation,
            brightness,
            kelvin,
            duration,
        } => {
            let overrides = ColorOverrides {
                hue,
                saturation,
                brightness,
                kelvin,
            };
            commands::set(
                controller,
                &selector.into(),
                &overrides,
                Duration::from_millis(duration),
            )
            .await?
        }
        Commands::Rename { selector, name } => {
            commands::rename(controller, &selector.into(), &name, &mut out).await?
        }
    }
    Ok(())
}

/// Lookup, usage and `set` failures go to stdout as plain messages; anything
/// else is an error on stderr.
fn report(err: &anyhow::Error) {
    match err.downcast_ref::<Error>() {
        Some(e) if e.is_user_facing() => println!("{e}"),
        _ => eprintln!("Error: {err:#}"),
    }
}
