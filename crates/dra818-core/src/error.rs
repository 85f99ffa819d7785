//! Error types for DRA818 module control.
//!
//! All fallible operations across the workspace return [`Result<T>`], which
//! uses [`Error`] as the error type. Device, framing, and user-input
//! failures are all captured here.

/// The error type for all DRA818 operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The serial device could not be opened or configured.
    ///
    /// Fatal to the calling program; no retry is attempted.
    #[error("failed to open serial device: {0}")]
    Open(String),

    /// Writing a command to the device failed.
    #[error("write error: {0}")]
    Write(String),

    /// No bytes arrived within the receive window.
    ///
    /// Only surfaces from [`Transport::receive`](crate::Transport::receive);
    /// framed reads turn it into an empty response.
    #[error("timeout waiting for response")]
    Timeout,

    /// The response accumulated more bytes than the frame buffer can hold
    /// without seeing a CR LF terminator.
    #[error("response frame exceeded {capacity} bytes without a terminator")]
    FrameOverflow {
        /// Capacity of the frame buffer in bytes.
        capacity: usize,
    },

    /// The module produced bytes that do not fit the AT response format.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// A user-supplied value was rejected (decimal point in a frequency,
    /// frequency out of range, malformed argument).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Every handshake probe went unanswered.
    #[error("module did not answer the handshake after {attempts} attempts")]
    HandshakeFailed {
        /// Number of probes sent.
        attempts: u32,
    },

    /// The transport has been closed.
    #[error("not connected")]
    NotConnected,

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error is an interrupted wait that may be retried at the
    /// same call site.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::Interrupted)
    }
}

/// A convenience `Result` alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;
