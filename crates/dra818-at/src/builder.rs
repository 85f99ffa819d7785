//! SessionBuilder -- fluent builder for [`HandshakeSession`].
//!
//! Separates configuration from construction so callers can set the
//! device, timeouts, and attempt count before the port is opened.
//!
//! # Example
//!
//! ```no_run
//! use dra818_at::builder::SessionBuilder;
//! use std::time::Duration;
//!
//! # async fn example() -> dra818_core::Result<()> {
//! let mut session = SessionBuilder::new()
//!     .serial_port("/dev/ttyS0")
//!     .response_timeout(Duration::from_secs(2))
//!     .build()
//!     .await?;
//! session.connect().await?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use dra818_core::error::{Error, Result};
use dra818_core::transport::Transport;
use dra818_transport::SerialTransport;

use crate::session::{HandshakeSession, SessionConfig};

/// Fluent builder for [`HandshakeSession`].
pub struct SessionBuilder {
    serial_port: Option<String>,
    config: SessionConfig,
}

impl SessionBuilder {
    pub fn new() -> Self {
        SessionBuilder {
            serial_port: None,
            config: SessionConfig::default(),
        }
    }

    /// Set the serial device path (e.g. `/dev/ttyS0`).
    pub fn serial_port(mut self, port: &str) -> Self {
        self.serial_port = Some(port.to_string());
        self
    }

    /// Timeout for each framed read (default: 5s).
    pub fn response_timeout(mut self, timeout: Duration) -> Self {
        self.config.response_timeout = timeout;
        self
    }

    /// Handshake probes before giving up (default: 3).
    pub fn handshake_attempts(mut self, attempts: u32) -> Self {
        self.config.handshake_attempts = attempts;
        self
    }

    /// Response frame capacity in bytes (default: 128).
    pub fn frame_capacity(mut self, capacity: usize) -> Self {
        self.config.frame_capacity = capacity;
        self
    }

    /// Log exchanges at `info` rather than `debug`.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    /// Build a session over a caller-provided transport.
    ///
    /// Used by tests (with `MockTransport`) and by callers that manage
    /// the transport themselves.
    pub fn build_with_transport(self, transport: Box<dyn Transport>) -> Result<HandshakeSession> {
        if self.config.handshake_attempts == 0 {
            return Err(Error::InvalidParameter(
                "handshake_attempts must be at least 1".into(),
            ));
        }
        if self.config.frame_capacity == 0 {
            return Err(Error::InvalidParameter(
                "frame_capacity must be at least 1".into(),
            ));
        }
        Ok(HandshakeSession::new(transport, self.config))
    }

    /// Open the serial device at 9600-8N1 and build a session over it.
    ///
    /// Requires that [`serial_port()`](Self::serial_port) has been called.
    pub async fn build(self) -> Result<HandshakeSession> {
        let port = self
            .serial_port
            .as_deref()
            .ok_or_else(|| Error::InvalidParameter("serial_port is required for build()".into()))?;

        let transport = SerialTransport::open(port).await?;
        self.build_with_transport(Box::new(transport))
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::HandshakeState;
    use dra818_test_harness::MockTransport;

    #[test]
    fn builder_defaults() {
        let session = SessionBuilder::new()
            .build_with_transport(Box::new(MockTransport::new()))
            .unwrap();

        assert_eq!(session.state(), HandshakeState::Idle);
        assert_eq!(session.config().response_timeout, Duration::from_secs(5));
        assert_eq!(session.config().handshake_attempts, 3);
        assert_eq!(session.config().frame_capacity, 128);
    }

    #[test]
    fn builder_fluent_chain() {
        let session = SessionBuilder::new()
            .serial_port("/dev/ttyUSB0")
            .response_timeout(Duration::from_millis(300))
            .handshake_attempts(5)
            .frame_capacity(64)
            .verbose(true)
            .build_with_transport(Box::new(MockTransport::new()))
            .unwrap();

        let config = session.config();
        assert_eq!(config.response_timeout, Duration::from_millis(300));
        assert_eq!(config.handshake_attempts, 5);
        assert_eq!(config.frame_capacity, 64);
        assert!(config.verbose);
    }

    #[test]
    fn builder_rejects_zero_attempts() {
        let result = SessionBuilder::new()
            .handshake_attempts(0)
            .build_with_transport(Box::new(MockTransport::new()));
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn builder_rejects_zero_capacity() {
        let result = SessionBuilder::new()
            .frame_capacity(0)
            .build_with_transport(Box::new(MockTransport::new()));
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[tokio::test]
    async fn builder_serial_port_required_for_build() {
        let result = SessionBuilder::new().build().await;
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[tokio::test]
    async fn builder_missing_device_fails_to_open() {
        let result = SessionBuilder::new()
            .serial_port("/dev/nonexistent-dra818-port")
            .build()
            .await;
        assert!(matches!(result, Err(Error::Open(_))));
    }
}
