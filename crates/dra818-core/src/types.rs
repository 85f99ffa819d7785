//! Configuration records sent to the module.

use std::ops::RangeInclusive;

use crate::error::{Error, Result};
use crate::frequency::FrequencyValue;

/// Highest squelch level the module accepts (0 = open).
pub const MAX_SQUELCH: u8 = 8;

/// Usable audio volume levels.
///
/// The command builder does not enforce this; callers that take volume from
/// users should.
pub const VOLUME_RANGE: RangeInclusive<u8> = 1..=8;

/// Highest CTCSS tone code (`0000` disables the tone).
const MAX_CTCSS: u16 = 38;

/// Default squelch level.
const DEFAULT_SQUELCH: u8 = 4;

/// The bundled channel configuration applied with `AT+DMOSETGROUP`.
///
/// Frequencies are held as [`FrequencyValue`], so the rendered wire strings
/// are always exactly eight characters of the form `DDD.DDDD`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSetting {
    channel_spacing: u8,
    tx_freq: FrequencyValue,
    rx_freq: FrequencyValue,
    tx_ctcss: u16,
    squelch: u8,
    rx_ctcss: u16,
}

impl GroupSetting {
    /// A setting with the given transmit and receive frequencies, 12.5 kHz
    /// spacing, no tones, and squelch level 4.
    pub fn new(tx_freq: FrequencyValue, rx_freq: FrequencyValue) -> Self {
        GroupSetting {
            channel_spacing: 0,
            tx_freq,
            rx_freq,
            tx_ctcss: 0,
            squelch: DEFAULT_SQUELCH,
            rx_ctcss: 0,
        }
    }

    /// A setting that transmits and receives on the same frequency.
    pub fn simplex(freq: FrequencyValue) -> Self {
        Self::new(freq, freq)
    }

    /// Set the channel spacing code: `0` for 12.5 kHz, `1` for 25 kHz.
    pub fn with_channel_spacing(mut self, code: u8) -> Result<Self> {
        if code > 1 {
            return Err(Error::InvalidParameter(format!(
                "channel spacing code must be 0 or 1, got {code}"
            )));
        }
        self.channel_spacing = code;
        Ok(self)
    }

    /// Set the squelch level (0-8).
    pub fn with_squelch(mut self, level: u8) -> Result<Self> {
        if level > MAX_SQUELCH {
            return Err(Error::InvalidParameter(format!(
                "squelch level must be 0-{MAX_SQUELCH}, got {level}"
            )));
        }
        self.squelch = level;
        Ok(self)
    }

    /// Set the transmit and receive CTCSS tone codes (0 disables).
    pub fn with_ctcss(mut self, tx: u16, rx: u16) -> Result<Self> {
        for code in [tx, rx] {
            if code > MAX_CTCSS {
                return Err(Error::InvalidParameter(format!(
                    "CTCSS code must be 0-{MAX_CTCSS}, got {code}"
                )));
            }
        }
        self.tx_ctcss = tx;
        self.rx_ctcss = rx;
        Ok(self)
    }

    /// Channel spacing code: `0` for 12.5 kHz, `1` for 25 kHz.
    pub fn channel_spacing(&self) -> u8 {
        self.channel_spacing
    }

    /// Transmit frequency.
    pub fn tx_freq(&self) -> FrequencyValue {
        self.tx_freq
    }

    /// Receive frequency.
    pub fn rx_freq(&self) -> FrequencyValue {
        self.rx_freq
    }

    /// Transmit frequency in wire form, e.g. `"144.3900"`.
    pub fn tx_wire(&self) -> String {
        self.tx_freq.to_wire()
    }

    /// Receive frequency in wire form.
    pub fn rx_wire(&self) -> String {
        self.rx_freq.to_wire()
    }

    /// Transmit CTCSS code, `0` for none.
    pub fn tx_ctcss(&self) -> u16 {
        self.tx_ctcss
    }

    /// Squelch level, 0 to 8.
    pub fn squelch(&self) -> u8 {
        self.squelch
    }

    /// Receive CTCSS code, `0` for none.
    pub fn rx_ctcss(&self) -> u16 {
        self.rx_ctcss
    }
}

impl Default for GroupSetting {
    fn default() -> Self {
        Self::simplex(FrequencyValue::default())
    }
}

/// Audio filter switches applied with `AT+SETFILTER`.
///
/// Each flag is sent as `1` when the filter is bypassed and `0` when it is
/// in circuit. Bypassing all three suits packet/APRS audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSetting {
    /// Bypass pre-emphasis / de-emphasis.
    pub emphasis_bypass: bool,
    /// Bypass the high-pass filter.
    pub high_pass_bypass: bool,
    /// Bypass the low-pass filter.
    pub low_pass_bypass: bool,
}

impl Default for FilterSetting {
    fn default() -> Self {
        FilterSetting {
            emphasis_bypass: true,
            high_pass_bypass: true,
            low_pass_bypass: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_group_setting() {
        let g = GroupSetting::default();
        assert_eq!(g.channel_spacing(), 0);
        assert_eq!(g.tx_wire(), "144.3900");
        assert_eq!(g.rx_wire(), "144.3900");
        assert_eq!(g.tx_ctcss(), 0);
        assert_eq!(g.squelch(), 4);
        assert_eq!(g.rx_ctcss(), 0);
    }

    #[test]
    fn wire_strings_are_eight_chars() {
        let tx = FrequencyValue::new(1_340_000).unwrap();
        let rx = FrequencyValue::new(1_740_000).unwrap();
        let g = GroupSetting::new(tx, rx);
        assert_eq!(g.tx_wire(), "134.0000");
        assert_eq!(g.rx_wire(), "174.0000");
        assert_eq!(g.tx_wire().len(), 8);
        assert_eq!(g.rx_wire().len(), 8);
    }

    #[test]
    fn squelch_limits() {
        assert_eq!(GroupSetting::default().with_squelch(0).unwrap().squelch(), 0);
        assert_eq!(GroupSetting::default().with_squelch(8).unwrap().squelch(), 8);
        assert!(matches!(
            GroupSetting::default().with_squelch(9),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn channel_spacing_limits() {
        let g = GroupSetting::default().with_channel_spacing(1).unwrap();
        assert_eq!(g.channel_spacing(), 1);
        assert!(GroupSetting::default().with_channel_spacing(2).is_err());
    }

    #[test]
    fn ctcss_limits() {
        let g = GroupSetting::default().with_ctcss(12, 38).unwrap();
        assert_eq!(g.tx_ctcss(), 12);
        assert_eq!(g.rx_ctcss(), 38);
        assert!(GroupSetting::default().with_ctcss(39, 0).is_err());
        assert!(GroupSetting::default().with_ctcss(0, 100).is_err());
    }

    #[test]
    fn filter_default_bypasses_all() {
        let f = FilterSetting::default();
        assert!(f.emphasis_bypass && f.high_pass_bypass && f.low_pass_bypass);
    }

    #[test]
    fn volume_range() {
        assert!(VOLUME_RANGE.contains(&1));
        assert!(VOLUME_RANGE.contains(&8));
        assert!(!VOLUME_RANGE.contains(&0));
        assert!(!VOLUME_RANGE.contains(&9));
    }
}
