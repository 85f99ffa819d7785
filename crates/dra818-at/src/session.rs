//! Handshake and configuration sequencing.
//!
//! [`HandshakeSession`] owns the transport and drives the module through
//!
//! ```text
//! Idle -> Probing -> Connected
//!             \----> Failed
//! ```
//!
//! Probing sends `AT+DMOCONNECT` up to `handshake_attempts` times and moves
//! to `Connected` on the first non-empty response. Once connected, the
//! group, filter, and volume commands are sent in order, each followed by
//! one framed read. Acknowledgements are logged but never fail the
//! sequence.

use std::time::Duration;

use tracing::{debug, info, warn};

use dra818_core::error::{Error, Result};
use dra818_core::transport::Transport;
use dra818_core::{FilterSetting, FrequencyValue, GroupSetting};

use crate::commands::{self, ScanResult};
use crate::io::{self, DEFAULT_RESPONSE_TIMEOUT};
use crate::protocol::FRAME_CAPACITY;

/// Probes sent before giving up on the module.
pub const DEFAULT_HANDSHAKE_ATTEMPTS: u32 = 3;

/// Where the session is in the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    /// Nothing sent yet.
    Idle,
    /// Handshake probe `attempt` (1-based) is in flight.
    Probing { attempt: u32 },
    /// The module answered a probe.
    Connected,
    /// Every probe went unanswered.
    Failed,
}

impl HandshakeState {
    /// Whether the handshake has finished, successfully or not.
    pub fn is_terminal(self) -> bool {
        matches!(self, HandshakeState::Connected | HandshakeState::Failed)
    }
}

/// Per-session settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Timeout for each framed read.
    pub response_timeout: Duration,
    /// Number of handshake probes before giving up.
    pub handshake_attempts: u32,
    /// Capacity of the response frame buffer.
    pub frame_capacity: usize,
    /// Log every exchange at `info` instead of `debug`.
    pub verbose: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
            handshake_attempts: DEFAULT_HANDSHAKE_ATTEMPTS,
            frame_capacity: FRAME_CAPACITY,
            verbose: false,
        }
    }
}

/// One command and whatever came back for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    /// Command text without the terminator.
    pub command: String,
    /// Raw response frame including CR LF; empty if the module stayed silent.
    pub response: Vec<u8>,
}

impl Exchange {
    /// Whether the module answered.
    pub fn answered(&self) -> bool {
        !self.response.is_empty()
    }

    /// The response as text with the terminator stripped.
    pub fn response_text(&self) -> String {
        String::from_utf8_lossy(&self.response)
            .trim_end_matches(['\r', '\n'])
            .to_string()
    }
}

/// Radio parameters sent after the handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub group: GroupSetting,
    pub filter: FilterSetting,
    pub volume: u8,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            group: GroupSetting::default(),
            filter: FilterSetting::default(),
            volume: 3,
        }
    }
}

/// Sequenced command/response session with the module.
///
/// Exactly one exchange is in flight at a time; the session owns the
/// transport for its whole life.
pub struct HandshakeSession {
    transport: Box<dyn Transport>,
    config: SessionConfig,
    state: HandshakeState,
    probes_sent: u32,
}

impl HandshakeSession {
    /// A session in [`HandshakeState::Idle`] that owns `transport`.
    pub fn new(transport: Box<dyn Transport>, config: SessionConfig) -> Self {
        HandshakeSession {
            transport,
            config,
            state: HandshakeState::Idle,
            probes_sent: 0,
        }
    }

    /// Current handshake state.
    pub fn state(&self) -> HandshakeState {
        self.state
    }

    /// Settings the session was built with.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Number of handshake probes written so far.
    pub fn probes_sent(&self) -> u32 {
        self.probes_sent
    }

    /// Send one command and read one framed response.
    pub async fn exchange(&mut self, command: &str) -> Result<Exchange> {
        io::write_command(&mut *self.transport, command).await?;
        let response = io::read_framed_with_capacity(
            &mut *self.transport,
            self.config.response_timeout,
            self.config.frame_capacity,
        )
        .await?;

        let exchange = Exchange {
            command: command.to_string(),
            response,
        };
        self.log_exchange(&exchange);
        Ok(exchange)
    }

    /// Run the handshake.
    ///
    /// Returns the exchange that got an answer. After
    /// `handshake_attempts` silent probes the state becomes
    /// [`HandshakeState::Failed`] and [`Error::HandshakeFailed`] is
    /// returned. A write or I/O error also leaves the session `Failed`.
    pub async fn connect(&mut self) -> Result<Exchange> {
        if self.state != HandshakeState::Idle {
            return Err(Error::Protocol(format!(
                "handshake already run (state {:?})",
                self.state
            )));
        }

        let probe = commands::cmd_handshake();
        for attempt in 1..=self.config.handshake_attempts {
            self.state = HandshakeState::Probing { attempt };
            self.probes_sent += 1;

            let exchange = match self.exchange(&probe).await {
                Ok(exchange) => exchange,
                Err(e) => {
                    self.state = HandshakeState::Failed;
                    return Err(e);
                }
            };

            if exchange.answered() {
                info!(
                    attempt,
                    bytes = exchange.response.len(),
                    "handshake successful"
                );
                self.state = HandshakeState::Connected;
                return Ok(exchange);
            }
            debug!(attempt, "no answer to handshake probe");
        }

        warn!(
            attempts = self.config.handshake_attempts,
            "module did not answer the handshake"
        );
        self.state = HandshakeState::Failed;
        Err(Error::HandshakeFailed {
            attempts: self.config.handshake_attempts,
        })
    }

    /// Send the group, filter, and volume commands.
    ///
    /// Requires a completed handshake. Each response is consumed and its
    /// acknowledgement logged; a negative or missing acknowledgement does
    /// not stop the sequence.
    pub async fn configure(&mut self, configuration: &Configuration) -> Result<Vec<Exchange>> {
        if self.state != HandshakeState::Connected {
            return Err(Error::NotConnected);
        }

        let steps = [
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

        let mut exchanges = Vec::with_capacity(steps.len());
        for (command, ack_prefix) in steps {
            let exchange = self.exchange(&command).await?;
            check_ack(&exchange, ack_prefix);
            exchanges.push(exchange);
        }
        Ok(exchanges)
    }

    /// Handshake, then configure. The returned exchanges start with the
    /// answered probe.
    pub async fn initialize(&mut self, configuration: &Configuration) -> Result<Vec<Exchange>> {
        let handshake = self.connect().await?;
        let mut exchanges = vec![handshake];
        exchanges.extend(self.configure(configuration).await?);
        Ok(exchanges)
    }

    /// Ask the module whether a carrier is present on `freq`.
    ///
    /// Does not require a handshake. Returns `None` if the module did not
    /// answer in time.
    pub async fn scan(&mut self, freq: FrequencyValue) -> Result<Option<ScanResult>> {
        let exchange = self.exchange(&commands::cmd_scan(freq)).await?;
        if !exchange.answered() {
            return Ok(None);
        }
        commands::parse_scan_response(&exchange.response).map(Some)
    }

    /// Close the underlying transport.
    pub async fn close(mut self) -> Result<()> {
        self.transport.close().await
    }

    /// Give up the session and recover the transport.
    pub fn into_transport(self) -> Box<dyn Transport> {
        self.transport
    }

    fn log_exchange(&self, exchange: &Exchange) {
        let response = exchange.response_text();
        if self.config.verbose {
            info!(command = %exchange.command, response = %response, "exchange");
        } else {
            debug!(command = %exchange.command, response = %response, "exchange");
        }
    }
}

fn check_ack(exchange: &Exchange, ack_prefix: &str) {
    if !exchange.answered() {
        warn!(command = %exchange.command, "no acknowledgement from module");
        return;
    }
    match commands::parse_ack(&exchange.response, ack_prefix) {
        Ok(true) => {}
        Ok(false) => warn!(
            command = %exchange.command,
            response = %exchange.response_text(),
            "module rejected command"
        ),
        Err(e) => debug!(
            command = %exchange.command,
            error = %e,
            "unrecognised acknowledgement"
        ),
    }
}
