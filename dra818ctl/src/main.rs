// dra818ctl -- command-line tool for a DRA818 transceiver module on a UART.
//
// Usage:
//   dra818ctl init                          handshake + configure on 144.3900 MHz
//   dra818ctl init 1445000                  simplex on 144.5000 MHz
//   dra818ctl init 1455000 1448000 -s 2 -v 6
//   dra818ctl --port /dev/ttyAMA0 -V init
//   dra818ctl init --mock                   dry run against a scripted module
//   dra818ctl scan --freq 1443900 --period 500
//
// Frequencies are digits in units of 100 Hz. Short input is right-padded,
// so `1445` means 144.5000 MHz.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use dra818_at::commands::{self, ScanResult};
use dra818_at::protocol::encode_command;
use dra818_at::{Configuration, HandshakeSession, SessionBuilder};
use dra818_core::{FilterSetting, FrequencyValue, GroupSetting, normalize};
use dra818_test_harness::MockTransport;

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// Configure and poll a DRA818 module over its serial port.
#[derive(Parser)]
#[command(name = "dra818ctl", about)]
struct Cli {
    /// Serial device the module is attached to.
    #[arg(long, default_value = "/dev/ttyS0")]
    port: String,

    /// Print every command and response.
    #[arg(short = 'V', long, global = true)]
    verbose: bool,

    /// Seconds to wait for each response.
    #[arg(long, default_value_t = 5)]
    timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Handshake with the module, then set group, filter, and volume.
    Init {
        /// Transmit frequency, digits only (default 1443900).
        #[arg(value_parser = parse_freq)]
        tx_freq: Option<FrequencyValue>,

        /// Receive frequency, digits only (defaults to the transmit frequency).
        #[arg(value_parser = parse_freq)]
        rx_freq: Option<FrequencyValue>,

        /// Speaker volume.
        #[arg(short = 'v', long, default_value_t = 3,
              value_parser = clap::value_parser!(u8).range(1..=8))]
        volume: u8,

        /// Squelch level.
        #[arg(short = 's', long, default_value_t = 4,
              value_parser = clap::value_parser!(u8).range(0..=8))]
        squelch: u8,

        /// Use 25 kHz channel spacing instead of 12.5 kHz.
        #[arg(long)]
        wide: bool,

        /// Run against a scripted module instead of the serial port.
        #[arg(long)]
        mock: bool,
    },

    /// Repeatedly ask the module whether a carrier is present.
    Scan {
        /// Frequency to watch, digits only.
        #[arg(long, default_value = "1443900", value_parser = parse_freq)]
        freq: FrequencyValue,

        /// Pause between scans in milliseconds.
        #[arg(short = 'p', long, default_value_t = 1)]
        period: u64,

        /// Stop after this many scans (default: run forever).
        #[arg(long)]
        count: Option<u64>,
    },
}

/// Parse a digits-only frequency such as "1443900" or "1445".
fn parse_freq(s: &str) -> std::result::Result<FrequencyValue, String> {
    normalize(s).map(|(value, _)| value).map_err(|e| e.to_string())
}

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

fn build_configuration(
    tx_freq: Option<FrequencyValue>,
    rx_freq: Option<FrequencyValue>,
    squelch: u8,
    wide: bool,
    volume: u8,
) -> Result<Configuration> {
    let tx = tx_freq.unwrap_or_default();
    let rx = rx_freq.unwrap_or(tx);

    let group = GroupSetting::new(tx, rx)
        .with_channel_spacing(u8::from(wide))?
        .with_squelch(squelch)?;

    Ok(Configuration {
        group,
        filter: FilterSetting::default(),
        volume,
    })
}

/// A mock module that acknowledges the whole init sequence.
fn scripted_module(configuration: &Configuration) -> MockTransport {
    let mut mock = MockTransport::new();
    let script = [
        (commands::cmd_handshake(), commands::HANDSHAKE_ACK),
        (
            commands::cmd_set_group(&configuration.group),
            commands::SET_GROUP_ACK,
        ),
        (
            commands::cmd_set_filter(&configuration.filter),
            commands::SET_FILTER_ACK,
        ),
        (
            commands::cmd_set_volume(configuration.volume),
            commands::SET_VOLUME_ACK,
        ),
    ];
    for (command, ack) in script {
        mock.expect(&encode_command(&command), format!("+{ack}:0\r\n").as_bytes());
    }
    mock
}

fn session_builder(cli: &Cli) -> SessionBuilder {
    SessionBuilder::new()
        .serial_port(&cli.port)
        .response_timeout(Duration::from_secs(cli.timeout))
        .verbose(cli.verbose)
}

async fn open_session(cli: &Cli) -> Result<HandshakeSession> {
    let session = session_builder(cli)
        .build()
        .await
        .with_context(|| format!("failed to open serial port {}", cli.port))?;
    info!(port = %cli.port, "serial port open");
    Ok(session)
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

async fn cmd_init(mut session: HandshakeSession, configuration: &Configuration) -> Result<()> {
    info!(
        tx = %configuration.group.tx_freq(),
        rx = %configuration.group.rx_freq(),
        squelch = configuration.group.squelch(),
        volume = configuration.volume,
        "initialising module"
    );

    let exchanges = match session.initialize(configuration).await {
        Ok(exchanges) => exchanges,
        Err(e) => {
            error!(error = %e, "initialisation failed");
            session.close().await.ok();
            return Err(e).context("module initialisation failed");
        }
    };

    for exchange in &exchanges {
        if exchange.answered() {
            println!("{:<48} -> {}", exchange.command, exchange.response_text());
        } else {
            println!("{:<48} -> (no response)", exchange.command);
        }
    }
    session.close().await.ok();
    println!("Module configured.");
    Ok(())
}

async fn cmd_scan(
    mut session: HandshakeSession,
    freq: FrequencyValue,
    period: Duration,
    count: Option<u64>,
) -> Result<()> {
    info!(freq = %freq, period = ?period, "scan started");

    let mut scans = 0u64;
    while count.is_none_or(|limit| scans < limit) {
        match session.scan(freq).await {
            Ok(Some(ScanResult::Busy)) => println!("carrier on {freq}"),
            Ok(Some(ScanResult::Clear)) => {}
            Ok(None) => warn!(freq = %freq, "no scan response"),
            Err(e @ dra818_core::Error::Protocol(_)) => warn!(error = %e, "bad scan response"),
            Err(e) => return Err(e).context("scan failed"),
        }
        scans += 1;
        tokio::time::sleep(period).await;
    }
    session.close().await.ok();
    Ok(())
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    if cli.timeout == 0 {
        bail!("--timeout must be at least 1 second");
    }

    match &cli.command {
        Command::Init {
            tx_freq,
            rx_freq,
            volume,
            squelch,
            wide,
            mock,
        } => {
            let configuration = build_configuration(*tx_freq, *rx_freq, *squelch, *wide, *volume)?;
            let session = if *mock {
                println!("Using mock transport");
                session_builder(&cli)
                    .build_with_transport(Box::new(scripted_module(&configuration)))
                    .context("failed to build session with mock transport")?
            } else {
                open_session(&cli).await?
            };
            cmd_init(session, &configuration).await
        }
        Command::Scan {
            freq,
            period,
            count,
        } => {
            let session = open_session(&cli).await?;
            cmd_scan(session, *freq, Duration::from_millis(*period), *count).await
        }
    }
}
