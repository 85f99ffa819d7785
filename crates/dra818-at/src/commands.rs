//! DRA818 AT command builders and response parsers.
//!
//! All functions are pure: builders return the command text without the
//! CR LF terminator (which [`crate::io::write_command`] appends), and parsers
//! take a received frame.
//!
//! # Command reference
//!
//! | Command                                              | Purpose                   |
//! |------------------------------------------------------|---------------------------|
//! | `AT+DMOCONNECT`                                      | handshake probe           |
//! | `AT+DMOSETGROUP=GBW,TFV,RFV,Tx_CTCSS,SQ,Rx_CTCSS`    | channel configuration     |
//! | `AT+SETFILTER=PRE/DE-EMPH,HIGHPASS,LOWPASS`          | audio filters             |
//! | `AT+DMOSETVOLUME=N`                                  | audio volume (1-8)        |
//! | `S+FFF.FFFF`                                         | carrier detect on a frequency |

use dra818_core::{Error, FilterSetting, FrequencyValue, GroupSetting, Result};

use crate::protocol::{DecodeResult, decode_response};

/// Handshake probe.
pub const HANDSHAKE: &str = "AT+DMOCONNECT";

/// Response prefix of the handshake acknowledgement.
pub const HANDSHAKE_ACK: &str = "DMOCONNECT";

/// Response prefix of the group-setting acknowledgement.
pub const SET_GROUP_ACK: &str = "DMOSETGROUP";

/// Response prefix of the filter acknowledgement.
pub const SET_FILTER_ACK: &str = "DMOSETFILTER";

/// Response prefix of the volume acknowledgement.
pub const SET_VOLUME_ACK: &str = "DMOSETVOLUME";

/// Build the handshake probe (`AT+DMOCONNECT`).
pub fn cmd_handshake() -> String {
    HANDSHAKE.to_string()
}

/// Build the group-setting command.
///
/// CTCSS codes are zero-padded to four digits.
///
/// ```
/// use dra818_at::commands::cmd_set_group;
/// use dra818_core::GroupSetting;
///
/// assert_eq!(
///     cmd_set_group(&GroupSetting::default()),
///     "AT+DMOSETGROUP=0,144.3900,144.3900,0000,4,0000"
/// );
/// ```
pub fn cmd_set_group(group: &GroupSetting) -> String {
    format!(
        "AT+DMOSETGROUP={},{},{},{:04},{},{:04}",
        group.channel_spacing(),
        group.tx_wire(),
        group.rx_wire(),
        group.tx_ctcss(),
        group.squelch(),
        group.rx_ctcss()
    )
}

/// Build the filter command (`AT+SETFILTER=1,1,1` for the default setting).
pub fn cmd_set_filter(filter: &FilterSetting) -> String {
    format!(
        "AT+SETFILTER={},{},{}",
        u8::from(filter.emphasis_bypass),
        u8::from(filter.high_pass_bypass),
        u8::from(filter.low_pass_bypass)
    )
}

/// Build the volume command (`AT+DMOSETVOLUME={level}`).
///
/// The level is not range-checked here; see
/// [`VOLUME_RANGE`](dra818_core::VOLUME_RANGE).
pub fn cmd_set_volume(level: u8) -> String {
    format!("AT+DMOSETVOLUME={level}")
}

/// Build the scan command (`S+144.3900`).
pub fn cmd_scan(freq: FrequencyValue) -> String {
    format!("S+{}", freq.to_wire())
}

/// Outcome of a scan command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanResult {
    /// A carrier is present on the frequency (`S=0`).
    Busy,
    /// No carrier (`S=1`).
    Clear,
}

/// Parse a scan response frame (`S=0\r\n` or `S=1\r\n`).
pub fn parse_scan_response(frame: &[u8]) -> Result<ScanResult> {
    match decode_response(frame) {
        DecodeResult::Response { prefix, data, .. } if prefix == "S" => match data.trim() {
            "0" => Ok(ScanResult::Busy),
            "1" => Ok(ScanResult::Clear),
            other => Err(Error::Protocol(format!("unexpected scan status: {other:?}"))),
        },
        DecodeResult::Response { prefix, .. } => Err(Error::Protocol(format!(
            "expected scan response, got {prefix:?}"
        ))),
        DecodeResult::Malformed(_) => Err(Error::Protocol("malformed scan response".into())),
        DecodeResult::Incomplete => Err(Error::Protocol("incomplete scan response".into())),
    }
}

/// Parse an acknowledgement such as `+DMOSETGROUP:0\r\n`.
///
/// Returns `Ok(true)` for status `0`, `Ok(false)` for any other status.
/// Fails if the frame is not an acknowledgement for `expected_prefix`.
pub fn parse_ack(frame: &[u8], expected_prefix: &str) -> Result<bool> {
    match decode_response(frame) {
        DecodeResult::Response { prefix, data, .. } if prefix == expected_prefix => {
            Ok(data.trim() == "0")
        }
        DecodeResult::Response { prefix, .. } => Err(Error::Protocol(format!(
            "expected {expected_prefix} acknowledgement, got {prefix:?}"
        ))),
        DecodeResult::Malformed(_) => Err(Error::Protocol("malformed acknowledgement".into())),
        DecodeResult::Incomplete => Err(Error::Protocol("incomplete acknowledgement".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handshake_command() {
        assert_eq!(cmd_handshake(), "AT+DMOCONNECT");
    }

    #[test]
    fn group_command_default() {
        let tx = FrequencyValue::new(1_443_900).unwrap();
        let group = GroupSetting::simplex(tx).with_squelch(4).unwrap();
        assert_eq!(
            cmd_set_group(&group),
            "AT+DMOSETGROUP=0,144.3900,144.3900,0000,4,0000"
        );
    }

    #[test]
    fn group_command_split_with_tones() {
        let tx = FrequencyValue::new(1_465_200).unwrap();
        let rx = FrequencyValue::new(1_460_000).unwrap();
        let group = GroupSetting::new(tx, rx)
            .with_channel_spacing(1)
            .unwrap()
            .with_ctcss(12, 8)
            .unwrap()
            .with_squelch(1)
            .unwrap();
        assert_eq!(
            cmd_set_group(&group),
            "AT+DMOSETGROUP=1,146.5200,146.0000,0012,1,0008"
        );
    }

    #[test]
    fn filter_command() {
        assert_eq!(
            cmd_set_filter(&FilterSetting::default()),
            "AT+SETFILTER=1,1,1"
        );
        let filter = FilterSetting {
            emphasis_bypass: false,
            high_pass_bypass: true,
            low_pass_bypass: false,
        };
        assert_eq!(cmd_set_filter(&filter), "AT+SETFILTER=0,1,0");
    }

    #[test]
    fn volume_command() {
        assert_eq!(cmd_set_volume(3), "AT+DMOSETVOLUME=3");
        // Not range-checked at this layer.
        assert_eq!(cmd_set_volume(0), "AT+DMOSETVOLUME=0");
    }

    #[test]
    fn scan_command() {
        assert_eq!(cmd_scan(FrequencyValue::APRS_2M), "S+144.3900");
    }

    #[test]
    fn scan_response_parsing() {
        assert_eq!(parse_scan_response(b"S=0\r\n").unwrap(), ScanResult::Busy);
        assert_eq!(parse_scan_response(b"S=1\r\n").unwrap(), ScanResult::Clear);
        assert!(parse_scan_response(b"S=7\r\n").is_err());
        assert!(parse_scan_response(b"+DMOCONNECT:0\r\n").is_err());
        assert!(parse_scan_response(b"S=1").is_err());
    }

    #[test]
    fn ack_parsing() {
        assert!(parse_ack(b"+DMOCONNECT:0\r\n", HANDSHAKE_ACK).unwrap());
        assert!(!parse_ack(b"+DMOSETGROUP:1\r\n", SET_GROUP_ACK).unwrap());
        assert!(matches!(
            parse_ack(b"+DMOSETGROUP:0\r\n", SET_VOLUME_ACK),
            Err(Error::Protocol(_))
        ));
    }
}
