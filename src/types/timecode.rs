use std::{fmt::Display, str::FromStr};

use crate::result::{Error, Result};

/// A clip offset, stored as non-negative fractional seconds.
///
/// Parsed from `SS[.ms]`, `MM:SS[.ms]` or `HH:MM:SS[.ms]`. A single
/// component is a raw seconds count; in the longer forms the minutes and
/// seconds components must stay below 60. Only the smallest unit may carry
/// a fractional part.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Timecode(f64);

impl Timecode {
    pub const ZERO: Timecode = Timecode(0.0);

    /// Wrap a raw seconds value. Returns `None` for negative or non-finite
    /// values.
    pub fn from_secs_f64(secs: f64) -> Option<Self> {
        (secs.is_finite() && secs >= 0.0).then_some(Self(secs))
    }

    pub fn as_secs_f64(self) -> f64 {
        self.0
    }

    /// Integer-truncated seconds, as used in derived filenames.
    pub fn floor_secs(self) -> u64 {
        self.0 as u64
    }
}

impl FromStr for Timecode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidTimeFormat(s.to_owned());

        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.len() > 3 || parts.iter().any(|p| p.is_empty()) {
            return Err(invalid());
        }

        let last = parts.len() - 1;
        let mut total = 0.0;
        for (i, part) in parts.iter().enumerate() {
            // Only digits and a dot, so no sign, exponent or whitespace
            if !part.chars().all(|c| c.is_ascii_digit() || c == '.') {
                return Err(invalid());
            }

            // The fractional part is only allowed on the smallest unit
            if i < last && part.contains('.') {
                return Err(invalid());
            }

            let value: f64 = part.parse().map_err(|_| invalid())?;

            // Minutes and seconds are bounded in the multi-part forms.
            // A lone `SS` is a raw seconds count and stays unbounded.
            let bounded = match parts.len() {
                1 => false,
                2 => true,
                _ => i > 0,
            };
            if bounded && value >= 60.0 {
                return Err(invalid());
            }

            total = total * 60.0 + value;
        }

        Ok(Self(total))
    }
}

impl Display for Timecode {
    /// `HH:MM:SS.mmm`, rounded to the millisecond
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let total_ms = (self.0 * 1000.0).round() as u64;
        let ms = total_ms % 1000;
        let secs = total_ms / 1000;
        write!(
            f,
            "{:02}:{:02}:{:02}.{ms:03}",
            secs / 3600,
            (secs / 60) % 60,
            secs % 60
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> f64 {
        s.parse::<Timecode>().unwrap().as_secs_f64()
    }

    #[test]
    fn accepts_the_three_shapes() {
        assert_eq!(parse("0"), 0.0);
        assert_eq!(parse("42"), 42.0);
        assert_eq!(parse("1:30"), 90.0);
        assert_eq!(parse("01:23"), 83.0);
        assert_eq!(parse("1:02:03"), 3723.0);
        assert_eq!(parse("00:00:00"), 0.0);
    }

    #[test]
    fn accepts_a_fractional_suffix_on_the_seconds() {
        assert_eq!(parse("10.25"), 10.25);
        assert_eq!(parse("0:01:30.500"), 90.5);
        assert_eq!(parse("1:30.5"), 90.5);
    }

    #[test]
    fn a_lone_component_is_a_raw_seconds_count() {
        assert_eq!(parse("90"), 90.0);
        assert_eq!(parse("3600"), 3600.0);
    }

    #[test]
    fn rejects_out_of_range_components() {
        for s in ["1:75", "60:00", "1:60:00", "0:99:10"] {
            assert!(
                matches!(s.parse::<Timecode>(), Err(Error::InvalidTimeFormat(_))),
                "'{s}' should be rejected"
            );
        }
    }

    #[test]
    fn rejects_malformed_strings() {
        for s in ["", ":", "1:", ":30", "1:2:3:4", "abc", "-5", "1:-5", "1.5:20", "1..5"] {
            assert!(
                matches!(s.parse::<Timecode>(), Err(Error::InvalidTimeFormat(_))),
                "'{s}' should be rejected"
            );
        }
    }

    #[test]
    fn display_round_trips_within_a_millisecond() {
        for s in ["0", "90", "1:30.5", "0:01:30.500", "12:34:56.789", "59.999"] {
            let t: Timecode = s.parse().unwrap();
            let reparsed: Timecode = t.to_string().parse().unwrap();
            assert!(
                (t.as_secs_f64() - reparsed.as_secs_f64()).abs() <= 1e-3,
                "'{s}' -> '{t}' drifted"
            );
        }
    }

    #[test]
    fn floor_secs_truncates() {
        assert_eq!("90.9".parse::<Timecode>().unwrap().floor_secs(), 90);
        assert_eq!("01:53".parse::<Timecode>().unwrap().floor_secs(), 113);
    }
}
