//! Serial transport for the DRA818 module.
//!
//! Provides [`SerialTransport`], the [`Transport`](dra818_core::Transport)
//! implementation for the UART the module hangs off (a Raspberry Pi's
//! `/dev/ttyS0` or `/dev/ttyAMA0`, or a USB serial adapter).
//!
//! # Example
//!
//! ```no_run
//! use dra818_transport::SerialTransport;
//! use dra818_core::Transport;
//! use std::time::Duration;
//!
//! # async fn example() -> dra818_core::Result<()> {
//! let mut transport = SerialTransport::open("/dev/ttyS0").await?;
//! transport.send(b"AT+DMOCONNECT\r\n").await?;
//!
//! let mut buf = [0u8; 128];
//! let n = transport.receive(&mut buf, Duration::from_secs(5)).await?;
//! # Ok(())
//! # }
//! ```

pub mod serial;

pub use serial::{MODULE_BAUD_RATE, SerialTransport};
