//! Transport trait for the module's serial link.
//!
//! The [`Transport`] trait abstracts over the physical link to the module.
//! `dra818-transport` implements it for a real UART, and
//! `dra818-test-harness` provides a mock for deterministic tests of the
//! framing and handshake logic.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;

/// Asynchronous byte-level transport to the module.
///
/// Framing (CR LF terminators, frame capacity) is handled by the protocol
/// layer that consumes this trait, not by implementations.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send raw bytes to the module.
    ///
    /// Implementations must write every byte or fail with
    /// [`Error::Write`](crate::error::Error::Write); short writes are
    /// retried internally.
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receive whatever bytes are currently available into `buf`.
    ///
    /// Waits up to `timeout` for data to arrive; returns
    /// [`Error::Timeout`](crate::error::Error::Timeout) if nothing arrives.
    /// An interrupted wait is reported as an `Io` error of kind
    /// `Interrupted` so the caller can retry against its own deadline.
    async fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize>;

    /// Close the transport.
    ///
    /// After calling `close()`, `send()` and `receive()` return
    /// [`Error::NotConnected`](crate::error::Error::NotConnected).
    async fn close(&mut self) -> Result<()>;

    /// Check whether the transport is currently open.
    fn is_connected(&self) -> bool;
}
