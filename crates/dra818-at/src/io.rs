//! Command/response exchange primitives.
//!
//! [`write_command`] sends one CR LF-terminated command; [`read_framed`]
//! collects one CR LF-terminated response from a link that may deliver it
//! in arbitrary pieces.
//!
//! # Deadline
//!
//! `read_framed` computes a single deadline when it starts and every wait
//! uses the time remaining until it. However many fragments arrive, a call
//! never blocks longer than its timeout. An interrupted wait is retried
//! against the same deadline.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, trace, warn};

use dra818_core::error::{Error, Result};
use dra818_core::transport::Transport;

use crate::protocol::{self, FRAME_CAPACITY, ResponseFrame};

/// How long the module gets to answer one command.
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Append CR LF to `text` and write it in full.
///
/// Returns the number of bytes written, terminator included.
pub async fn write_command(transport: &mut dyn Transport, text: &str) -> Result<usize> {
    let bytes = protocol::encode_command(text);
    transport.send(&bytes).await?;
    trace!(command = text, bytes = bytes.len(), "command written");
    Ok(bytes.len())
}

/// Read one CR LF-terminated response with the default 128-byte frame.
///
/// Returns the frame including its terminator, or an empty vector if the
/// timeout expires first. An empty result means "no response" and is not
/// an error.
pub async fn read_framed(transport: &mut dyn Transport, timeout: Duration) -> Result<Vec<u8>> {
    read_framed_with_capacity(transport, timeout, FRAME_CAPACITY).await
}

/// [`read_framed`] with an explicit frame capacity.
///
/// Fails with [`Error::FrameOverflow`] if more than `capacity` bytes arrive
/// without completing a frame, with an `UnexpectedEof` [`Error::Io`] if the
/// transport reports a zero-length read, and with the transport's error if
/// a wait fails for any reason other than interruption.
pub async fn read_framed_with_capacity(
    transport: &mut dyn Transport,
    timeout: Duration,
    capacity: usize,
) -> Result<Vec<u8>> {
    let deadline = Instant::now() + timeout;
    let mut frame = ResponseFrame::new(capacity);
    let mut recv_buf = vec![0u8; capacity.max(1)];

    loop {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        let remaining = deadline - now;

        match transport.receive(&mut recv_buf, remaining).await {
            Ok(0) => {
                // Readable but empty: the device has gone away.
                warn!(buffered = frame.len(), "end of stream while reading response");
                return Err(Error::Io(std::io::Error::from(
                    std::io::ErrorKind::UnexpectedEof,
                )));
            }
            Ok(n) => {
                frame.extend(&recv_buf[..n]).inspect_err(|_| {
                    warn!(
                        capacity,
                        buffered = frame.len(),
                        incoming = n,
                        "response frame overflow"
                    );
                })?;
                if frame.is_complete() {
                    debug!(
                        bytes = frame.len(),
                        response = ?String::from_utf8_lossy(frame.as_bytes()),
                        "framed response"
                    );
                    return Ok(frame.into_bytes());
                }
            }
            Err(Error::Timeout) => break,
            Err(e) if e.is_interrupted() => {
                debug!("wait interrupted, retrying");
            }
            Err(e) => return Err(e),
        }
    }

    if frame.is_empty() {
        debug!(timeout_ms = timeout.as_millis(), "timeout with no response");
    } else {
        warn!(
            bytes = frame.len(),
            partial = ?String::from_utf8_lossy(frame.as_bytes()),
            "timeout with unterminated response, discarding"
        );
    }
    Ok(Vec::new())
}
