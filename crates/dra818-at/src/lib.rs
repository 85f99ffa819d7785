//! AT command protocol for the DRA818 VHF/UHF transceiver module.
//!
//! The module speaks a line-oriented protocol over a 9600-8N1 UART. Every
//! command and every response ends with CR LF. This crate provides:
//!
//! - **Protocol codec** ([`protocol`]) -- command encoding, the bounded
//!   response frame, and prefix/data splitting of response lines.
//! - **Command builders** ([`commands`]) -- handshake, group, filter,
//!   volume, and scan commands plus acknowledgement parsing.
//! - **Framed I/O** ([`io`]) -- terminator-aware writes and deadline-bounded
//!   framed reads over any [`Transport`](dra818_core::Transport).
//! - **Session** ([`session`]) -- the handshake state machine and the
//!   post-handshake configuration sequence.
//! - **Builder** ([`builder`]) -- fluent construction of a
//!   [`HandshakeSession`] over a serial port or a caller-provided transport.
//!
//! # Example
//!
//! ```
//! use dra818_at::commands::{cmd_set_group, parse_ack, SET_GROUP_ACK};
//! use dra818_at::protocol::encode_command;
//! use dra818_core::GroupSetting;
//!
//! let cmd = cmd_set_group(&GroupSetting::default());
//! assert_eq!(cmd, "AT+DMOSETGROUP=0,144.3900,144.3900,0000,4,0000");
//! assert!(encode_command(&cmd).ends_with(b"\r\n"));
//!
//! assert!(parse_ack(b"+DMOSETGROUP:0\r\n", SET_GROUP_ACK).unwrap());
//! ```

pub mod builder;
pub mod commands;
pub mod io;
pub mod protocol;
pub mod session;

pub use builder::SessionBuilder;
pub use commands::ScanResult;
pub use io::{read_framed, write_command};
pub use session::{Configuration, Exchange, HandshakeSession, HandshakeState, SessionConfig};
