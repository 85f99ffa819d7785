//! AT-command line framing for the DRA818.
//!
//! Every command and every response is a line of ASCII terminated by CR LF.
//!
//! # Command format
//!
//! ```text
//! AT+<COMMAND>[=<param>,<param>...]\r\n
//! ```
//!
//! # Response format
//!
//! ```text
//! +<COMMAND>:<status>\r\n      e.g. +DMOSETGROUP:0
//! <KEY>=<value>\r\n             e.g. S=1
//! ```
//!
//! A status of `0` means the module accepted the command.

use bytes::{BufMut, BytesMut};

use dra818_core::error::{Error, Result};

/// Line terminator for commands and responses.
pub const TERMINATOR: &[u8] = b"\r\n";

/// Capacity of the response accumulation buffer.
pub const FRAME_CAPACITY: usize = 128;

/// Encode command text into bytes ready for transmission by appending the
/// CR LF terminator.
///
/// # Example
///
/// ```
/// use dra818_at::protocol::encode_command;
///
/// assert_eq!(encode_command("AT+DMOCONNECT"), b"AT+DMOCONNECT\r\n");
/// ```
pub fn encode_command(text: &str) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(text.len() + TERMINATOR.len());
    buf.put_slice(text.as_bytes());
    buf.put_slice(TERMINATOR);
    buf.to_vec()
}

/// Bounded accumulation buffer for one response line.
///
/// A frame is complete when its last two bytes are CR LF. Appending past
/// the capacity is an error; the buffer never grows beyond it.
#[derive(Debug, Clone)]
pub struct ResponseFrame {
    buf: Vec<u8>,
    capacity: usize,
}

impl ResponseFrame {
    /// An empty frame that can hold at most `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        ResponseFrame {
            buf: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append received bytes.
    ///
    /// Fails with [`Error::FrameOverflow`] and leaves the frame unchanged if
    /// `data` does not fit.
    pub fn extend(&mut self, data: &[u8]) -> Result<()> {
        if self.buf.len() + data.len() > self.capacity {
            return Err(Error::FrameOverflow {
                capacity: self.capacity,
            });
        }
        self.buf.extend_from_slice(data);
        Ok(())
    }

    /// Whether the accumulated bytes end with the CR LF terminator.
    pub fn is_complete(&self) -> bool {
        self.buf.ends_with(TERMINATOR)
    }

    /// Bytes accumulated so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been received.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Maximum number of bytes the frame accepts.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The accumulated bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the frame, returning the bytes including the terminator.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for ResponseFrame {
    fn default() -> Self {
        Self::new(FRAME_CAPACITY)
    }
}

/// Result of decoding one response line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeResult {
    /// A complete line was decoded.
    Response {
        /// Command name without the leading `+` (e.g. `"DMOCONNECT"`, `"S"`).
        prefix: String,
        /// Everything after the `:` or `=` separator, before the terminator.
        data: String,
        /// Number of bytes consumed from the input buffer.
        consumed: usize,
    },

    /// A terminated line that is not valid ASCII text. The `usize` is the
    /// number of bytes consumed.
    Malformed(usize),

    /// No terminator yet. More data is needed.
    Incomplete,
}

/// Decode the first CR LF-terminated line in `buf`.
pub fn decode_response(buf: &[u8]) -> DecodeResult {
    let term_pos = match buf.windows(TERMINATOR.len()).position(|w| w == TERMINATOR) {
        Some(pos) => pos,
        None => return DecodeResult::Incomplete,
    };

    let consumed = term_pos + TERMINATOR.len();
    let body = match std::str::from_utf8(&buf[..term_pos]) {
        Ok(s) if s.is_ascii() => s,
        _ => return DecodeResult::Malformed(consumed),
    };

    let body = body.strip_prefix('+').unwrap_or(body);
    let (prefix, data) = match body.find([':', '=']) {
        Some(sep) => (&body[..sep], &body[sep + 1..]),
        None => (body, ""),
    };

    DecodeResult::Response {
        prefix: prefix.to_string(),
        data: data.to_string(),
        consumed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_appends_crlf() {
        assert_eq!(encode_command("AT+SETFILTER=1,1,1"), b"AT+SETFILTER=1,1,1\r\n");
        assert_eq!(encode_command(""), b"\r\n");
    }

    // -----------------------------------------------------------------------
    // ResponseFrame
    // -----------------------------------------------------------------------

    #[test]
    fn frame_completes_on_crlf() {
        let mut frame = ResponseFrame::default();
        frame.extend(b"+DMOCONNECT:0\r").unwrap();
        assert!(!frame.is_complete());
        frame.extend(b"\n").unwrap();
        assert!(frame.is_complete());
        assert_eq!(frame.into_bytes(), b"+DMOCONNECT:0\r\n");
    }

    #[test]
    fn frame_lone_lf_is_not_complete() {
        let mut frame = ResponseFrame::default();
        frame.extend(b"S=0\n").unwrap();
        assert!(!frame.is_complete());
    }

    #[test]
    fn frame_fills_to_capacity() {
        let mut frame = ResponseFrame::new(4);
        frame.extend(b"ab").unwrap();
        frame.extend(b"\r\n").unwrap();
        assert_eq!(frame.len(), 4);
        assert!(frame.is_complete());
    }

    #[test]
    fn frame_rejects_overflow() {
        let mut frame = ResponseFrame::new(4);
        frame.extend(b"abc").unwrap();
        let err = frame.extend(b"de").unwrap_err();
        assert!(matches!(err, Error::FrameOverflow { capacity: 4 }));
        // Unchanged after the failed append.
        assert_eq!(frame.as_bytes(), b"abc");
    }

    #[test]
    fn frame_default_capacity() {
        let frame = ResponseFrame::default();
        assert_eq!(frame.capacity(), FRAME_CAPACITY);
        assert!(frame.is_empty());
    }

    // -----------------------------------------------------------------------
    // decode_response
    // -----------------------------------------------------------------------

    #[test]
    fn decode_incomplete() {
        assert_eq!(decode_response(b""), DecodeResult::Incomplete);
        assert_eq!(decode_response(b"+DMOCONNECT:0\r"), DecodeResult::Incomplete);
    }

    #[test]
    fn decode_ack() {
        assert_eq!(
            decode_response(b"+DMOSETGROUP:0\r\n"),
            DecodeResult::Response {
                prefix: "DMOSETGROUP".into(),
                data: "0".into(),
                consumed: 16,
            }
        );
    }

    #[test]
    fn decode_scan_result() {
        assert_eq!(
            decode_response(b"S=1\r\n"),
            DecodeResult::Response {
                prefix: "S".into(),
                data: "1".into(),
                consumed: 5,
            }
        );
    }

    #[test]
    fn decode_line_without_separator() {
        assert_eq!(
            decode_response(b"AT+DMOCONNECT\r\n"),
            DecodeResult::Response {
                prefix: "AT+DMOCONNECT".into(),
                data: "".into(),
                consumed: 15,
            }
        );
    }

    #[test]
    fn decode_only_first_line() {
        assert_eq!(
            decode_response(b"S=0\r\nS=1\r\n"),
            DecodeResult::Response {
                prefix: "S".into(),
                data: "0".into(),
                consumed: 5,
            }
        );
    }

    #[test]
    fn decode_non_ascii_is_malformed() {
        assert_eq!(
            decode_response(&[0xFF, 0xFE, b'\r', b'\n']),
            DecodeResult::Malformed(4)
        );
    }
}
