//! Frequency codec for the module's fixed-width `DDD.DDDD` wire format.
//!
//! Users type frequencies as bare digit strings in units of 100 Hz
//! (`1443900` is 144.3900 MHz). Short input is taken to be the leading
//! digits of a frequency and is right-padded with zeros, so `"1443"` means
//! 144.3000 MHz. The module expects exactly eight characters: three digits,
//! a decimal point, and four digits.
//!
//! # Example
//!
//! ```
//! use dra818_core::frequency::normalize;
//!
//! let (freq, wire) = normalize("14439").unwrap();
//! assert_eq!(freq.get(), 1_443_900);
//! assert_eq!(wire, "144.3900");
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Number of significant digits in a frequency (before the decimal point is
/// inserted).
pub const FREQ_DIGITS: usize = 7;

/// Lowest frequency the module tunes, 134.0000 MHz.
pub const MIN_FREQ: u32 = 1_340_000;

/// Highest frequency the module tunes, 174.0000 MHz.
pub const MAX_FREQ: u32 = 1_740_000;

/// Longest digit string [`insert_decimal_point`] accepts.
const MAX_DECIMAL_INPUT: usize = 16;

/// Digits before the decimal point in the wire format.
const MHZ_DIGITS: usize = 3;

/// Digits after the decimal point in the wire format.
const FRACTION_DIGITS: usize = 4;

/// Pad or truncate `input` to exactly `width` characters.
///
/// Input at least `width` long is truncated to its first `width`
/// characters: a nine-digit string silently loses its last two digits.
/// Shorter input is right-padded with ASCII `'0'`. Padding happens on the
/// least-significant side, so the result is only meaningful when `input`
/// already holds the most-significant digits of a frequency.
pub fn pad_to_width(input: &str, width: usize) -> String {
    let mut out: String = input.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat_n('0', width - len));
    out
}

/// Insert the decimal point after the third digit: `"1443900"` becomes
/// `"144.3900"`.
///
/// At most four digits are kept after the point. Input longer than 16
/// characters, shorter than three, or containing non-ASCII characters is
/// rejected.
pub fn insert_decimal_point(s: &str) -> Result<String> {
    if s.len() > MAX_DECIMAL_INPUT {
        return Err(Error::InvalidParameter(format!(
            "frequency string too long ({} > {MAX_DECIMAL_INPUT}): {s}",
            s.len()
        )));
    }
    if !s.is_ascii() || s.len() < MHZ_DIGITS {
        return Err(Error::InvalidParameter(format!(
            "cannot place decimal point in {s:?}"
        )));
    }

    Ok(place_point(s))
}

/// `s` must be ASCII and at least [`MHZ_DIGITS`] long.
fn place_point(s: &str) -> String {
    let frac_end = s.len().min(MHZ_DIGITS + FRACTION_DIGITS);
    format!("{}.{}", &s[..MHZ_DIGITS], &s[MHZ_DIGITS..frac_end])
}

/// Whether `freq` (in units of 100 Hz) is inside the module's tuning range.
pub fn validate_range(freq: u32) -> bool {
    (MIN_FREQ..=MAX_FREQ).contains(&freq)
}

/// Whether a user-supplied frequency must be rejected for containing a
/// decimal point.
///
/// Frequencies are entered as bare digits; `"144.39"` is a usage error
/// rather than something to parse leniently.
pub fn reject_decimal_input(raw: &str) -> bool {
    raw.contains('.')
}

/// Turn raw user digits into a validated frequency and its 8-character wire
/// string.
///
/// Steps: reject decimal points and non-digits, pad/truncate to
/// [`FREQ_DIGITS`], parse, check the tuning range, insert the decimal point.
pub fn normalize(raw: &str) -> Result<(FrequencyValue, String)> {
    if reject_decimal_input(raw) {
        return Err(Error::InvalidParameter(format!(
            "no decimal point allowed in frequency: {raw}"
        )));
    }
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidParameter(format!(
            "frequency must be digits only: {raw:?}"
        )));
    }

    let padded = pad_to_width(raw, FREQ_DIGITS);
    let value: u32 = padded
        .parse()
        .map_err(|e| Error::InvalidParameter(format!("bad frequency {padded}: {e}")))?;
    let freq = FrequencyValue::new(value)?;
    let wire = insert_decimal_point(&padded)?;

    Ok((freq, wire))
}

/// A frequency in units of 100 Hz, guaranteed to be within
/// [`MIN_FREQ`]..=[`MAX_FREQ`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrequencyValue(u32);

impl FrequencyValue {
    /// APRS on 2 m, 144.3900 MHz.
    pub const APRS_2M: FrequencyValue = FrequencyValue(1_443_900);

    /// Validate and wrap a raw frequency.
    pub fn new(value: u32) -> Result<Self> {
        if !validate_range(value) {
            return Err(Error::InvalidParameter(format!(
                "frequency out of range: {value} (allowed {MIN_FREQ} to {MAX_FREQ})"
            )));
        }
        Ok(FrequencyValue(value))
    }

    /// The raw value in units of 100 Hz.
    pub fn get(self) -> u32 {
        self.0
    }

    /// The 8-character `DDD.DDDD` form the module expects.
    pub fn to_wire(self) -> String {
        // In range means exactly FREQ_DIGITS decimal digits.
        place_point(&pad_to_width(&self.0.to_string(), FREQ_DIGITS))
    }
}

impl Default for FrequencyValue {
    fn default() -> Self {
        FrequencyValue::APRS_2M
    }
}

impl fmt::Display for FrequencyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} MHz", self.to_wire())
    }
}

impl FromStr for FrequencyValue {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        normalize(s).map(|(freq, _)| freq)
    }
}
