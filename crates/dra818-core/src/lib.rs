//! dra818-core: Core types, error definitions, and the frequency codec for
//! controlling a DRA818 narrowband FM transceiver module.
//!
//! This crate has no I/O of its own. It defines the abstractions the
//! transport and protocol crates build on, so a caller can validate user
//! input and assemble a configuration without opening a serial port.
//!
//! # Key types
//!
//! - [`FrequencyValue`] -- a validated frequency in units of 100 Hz
//! - [`GroupSetting`] -- the bundled channel configuration sent with `AT+DMOSETGROUP`
//! - [`Transport`] -- byte-level communication channel
//! - [`Error`] / [`Result`] -- error handling

pub mod error;
pub mod frequency;
pub mod transport;
pub mod types;

pub use error::{Error, Result};
pub use frequency::{
    FREQ_DIGITS, FrequencyValue, MAX_FREQ, MIN_FREQ, insert_decimal_point, normalize,
    pad_to_width, reject_decimal_input, validate_range,
};
pub use transport::Transport;
pub use types::{FilterSetting, GroupSetting, MAX_SQUELCH, VOLUME_RANGE};
