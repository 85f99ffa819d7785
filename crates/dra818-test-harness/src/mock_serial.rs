//! Mock transport for deterministic testing of framing and handshakes.
//!
//! [`MockTransport`] implements the [`Transport`] trait with pre-loaded
//! request/response pairs. Each response is a list of fragments, and each
//! `receive()` call hands out at most one fragment, which reproduces a UART
//! delivering a line in pieces.
//!
//! # Example
//!
//! ```
//! use dra818_test_harness::MockTransport;
//!
//! let mut mock = MockTransport::new();
//! // The module answers the probe in three pieces.
//! mock.expect_fragments(
//!     b"AT+DMOCONNECT\r\n",
//!     &[b"+DMO", b"CONNECT:0\r", b"\n"],
//! );
//! // The next probe goes unanswered.
//! mock.expect_silence(b"AT+DMOCONNECT\r\n");
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use dra818_core::error::{Error, Result};
use dra818_core::transport::Transport;

/// One event a `receive()` call can observe.
#[derive(Debug, Clone)]
enum Incoming {
    Data(Vec<u8>),
    Failure(io::ErrorKind),
}

#[derive(Debug, Clone)]
struct Expectation {
    /// The exact bytes we expect to be sent.
    request: Vec<u8>,
    /// Events queued for reading once the request is seen.
    response: Vec<Incoming>,
}

/// A mock [`Transport`] for testing without hardware.
///
/// Expectations are consumed in order. When `send()` matches the next
/// expectation, its response fragments are queued for `receive()`. When
/// nothing is queued, `receive()` waits out the full timeout (on tokio's
/// clock, so paused-time tests run instantly) and returns
/// [`Error::Timeout`].
#[derive(Debug)]
pub struct MockTransport {
    expectations: VecDeque<Expectation>,
    incoming: VecDeque<Incoming>,
    connected: bool,
    fail_writes: bool,
    /// Log of all bytes sent through this transport.
    sent_log: Vec<Vec<u8>>,
}

impl MockTransport {
    /// Create a new mock transport in the connected state.
    pub fn new() -> Self {
        MockTransport {
            expectations: VecDeque::new(),
            incoming: VecDeque::new(),
            connected: true,
            fail_writes: false,
            sent_log: Vec::new(),
        }
    }

    /// Expect `request`, answered by `response` in a single read.
    ///
    /// An empty `response` means the module stays silent.
    pub fn expect(&mut self, request: &[u8], response: &[u8]) {
        if response.is_empty() {
            self.expect_silence(request);
        } else {
            self.expect_fragments(request, &[response]);
        }
    }

    /// Expect `request`, answered by `fragments`, one per read.
    pub fn expect_fragments(&mut self, request: &[u8], fragments: &[&[u8]]) {
        self.expectations.push_back(Expectation {
            request: request.to_vec(),
            response: fragments
                .iter()
                .map(|f| Incoming::Data(f.to_vec()))
                .collect(),
        });
    }

    /// Expect `request` and never answer it.
    pub fn expect_silence(&mut self, request: &[u8]) {
        self.expectations.push_back(Expectation {
            request: request.to_vec(),
            response: Vec::new(),
        });
    }

    /// Queue bytes that arrive without a preceding request.
    pub fn push_incoming(&mut self, data: &[u8]) {
        self.incoming.push_back(Incoming::Data(data.to_vec()));
    }

    /// Queue a zero-length read, as from a port whose device has gone away.
    pub fn push_eof(&mut self) {
        self.incoming.push_back(Incoming::Data(Vec::new()));
    }

    /// Queue a wait that is interrupted by a signal.
    pub fn push_interrupt(&mut self) {
        self.incoming
            .push_back(Incoming::Failure(io::ErrorKind::Interrupted));
    }

    /// Queue a failed wait with the given error kind.
    pub fn push_failure(&mut self, kind: io::ErrorKind) {
        self.incoming.push_back(Incoming::Failure(kind));
    }

    /// Make every subsequent `send()` fail with [`Error::Write`].
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// All data sent through this transport, one element per `send()`.
    pub fn sent_data(&self) -> &[Vec<u8>] {
        &self.sent_log
    }

    /// Number of expectations not yet consumed.
    pub fn remaining_expectations(&self) -> usize {
        self.expectations.len()
    }

    /// Set the connected state of the mock transport.
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&mut self, data: &[u8]) -> Result<()> {
        if !self.connected {
            return Err(Error::NotConnected);
        }
        if self.fail_writes {
            return Err(Error::Write("mock write failure".into()));
        }

        self.sent_log.push(data.to_vec());

        let expectation = self
            .expectations
            .pop_front()
            .ok_or_else(|| Error::Protocol("no more expectations in mock transport".into()))?;

        if data != expectation.request.as_slice() {
            return Err(Error::Protocol(format!(
                "unexpected send data: expected {:?}, got {:?}",
                String::from_utf8_lossy(&expectation.request),
                String::from_utf8_lossy(data)
            )));
        }
        self.incoming.extend(expectation.response);
        Ok(())
    }

    async fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize> {
        if !self.connected {
            return Err(Error::NotConnected);
        }

        match self.incoming.pop_front() {
            Some(Incoming::Data(data)) => {
                let n = data.len().min(buf.len());
                buf[..n].copy_from_slice(&data[..n]);
                if n < data.len() {
                    self.incoming.push_front(Incoming::Data(data[n..].to_vec()));
                }
                Ok(n)
            }
            Some(Incoming::Failure(kind)) => Err(Error::Io(io::Error::from(kind))),
            None => {
                tokio::time::sleep(timeout).await;
                Err(Error::Timeout)
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.connected = false;
        self.incoming.clear();
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
