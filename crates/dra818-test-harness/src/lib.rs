//! dra818-test-harness: Mock transport for testing the DRA818 protocol
//! engine without a module attached.
//!
//! [`MockTransport`] replays scripted responses, including responses split
//! across several reads, silence, and interrupted waits.

pub mod mock_serial;

pub use mock_serial::MockTransport;
