use std::{fmt::Display, str::FromStr};

use thiserror::Error;

use crate::my_regex::{get_clock_re, get_time_unit_re_list};

/// Largest hour count a [`CanonicalTime`] can hold
pub const MAX_HOURS: u64 = 99;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseTimeError {
    #[error("the time is empty")]
    Empty,

    #[error("'{0}' is not a duration")]
    Unrecognized(String),

    #[error("the number is too large")]
    Overflow,

    #[error("{0} hours is more than the 99 allowed")]
    TooManyHours(u64),
}

/// A point in a video, normalized to `HH:MM:SS`.
///
/// Can only be obtained by parsing, see the [`FromStr`] implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalTime {
    hours: u8,
    minutes: u8,
    seconds: u8,
}

impl CanonicalTime {
    fn from_seconds(total: u64) -> Result<Self, ParseTimeError> {
        let hours = total / 3600;
        if hours > MAX_HOURS {
            return Err(ParseTimeError::TooManyHours(hours));
        }

        Ok(Self {
            hours: hours as u8,
            minutes: (total / 60 % 60) as u8,
            seconds: (total % 60) as u8,
        })
    }

    /// Parse `[[H:]M:]S[.frac]`, the fraction being dropped.
    /// Return `None` if the text is not in clock notation.
    fn parse_clock(text: &str) -> Option<Result<Self, ParseTimeError>> {
        let cap = get_clock_re().captures(text)?;

        let total = ["h", "m", "s"]
            .into_iter()
            .map(|name| cap.name(name).map_or("0", |m| m.as_str()))
            .try_fold(0u64, |acc, n| {
                acc.checked_mul(60)
                    .and_then(|acc| acc.checked_add(parse_number(n).ok()?))
                    .ok_or(ParseTimeError::Overflow)
            });

        Some(total.and_then(Self::from_seconds))
    }
}

fn parse_number(digits: &str) -> Result<u64, ParseTimeError> {
    digits.parse().map_err(|_| ParseTimeError::Overflow)
}

/// Parse a free-form duration such as "1h2m3s", "90s", "10m", "1h30" or "00:01:30".
///
/// Each `<n>h`, `<n>m` and `<n>s` component is extracted then removed from the text.
/// A purely numeric leftover counts as seconds, unless an explicit `<n>s` was found,
/// in which case it is ignored. Any other leftover is an error.
///
/// The components are summed before normalization, so "90s" gives "00:01:30".
impl FromStr for CanonicalTime {
    type Err = ParseTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(ParseTimeError::Empty);
        }

        if let Some(res) = Self::parse_clock(text) {
            return res;
        }

        // [hours, minutes, seconds]
        let mut rest = text.to_owned();
        let mut values = [None; 3];
        for (value, re) in values.iter_mut().zip(get_time_unit_re_list()) {
            if let Some(m) = re.find(&rest) {
                // The matched text is the digits followed by a one-letter unit
                let digits = &m.as_str()[..m.len() - 1];
                *value = Some(parse_number(digits)?);
                rest.replace_range(m.range(), "");
            }
        }

        let rest = rest.trim();
        if !rest.is_empty() {
            if !rest.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ParseTimeError::Unrecognized(text.to_owned()));
            }
            if values[2].is_none() {
                values[2] = Some(parse_number(rest)?);
            }
        }

        if values.iter().all(Option::is_none) {
            return Err(ParseTimeError::Unrecognized(text.to_owned()));
        }

        let [hours, minutes, seconds] = values.map(|v| v.unwrap_or(0));
        let total = hours
            .checked_mul(3600)
            .zip(minutes.checked_mul(60))
            .and_then(|(h, m)| h.checked_add(m)?.checked_add(seconds))
            .ok_or(ParseTimeError::Overflow)?;

        Self::from_seconds(total)
    }
}

impl Display for CanonicalTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<String, ParseTimeError> {
        s.parse::<CanonicalTime>().map(|t| t.to_string())
    }

    #[test]
    fn labeled_components() {
        assert_eq!(parse("1h2m3s").unwrap(), "01:02:03");
        assert_eq!(parse("10m").unwrap(), "00:10:00");
        assert_eq!(parse("2h").unwrap(), "02:00:00");
        assert_eq!(parse("3s1h").unwrap(), "01:00:03");
        assert_eq!(parse("1H2M3S").unwrap(), "01:02:03");
    }

    #[test]
    fn overflow_is_carried() {
        assert_eq!(parse("90s").unwrap(), "00:01:30");
        assert_eq!(parse("75m").unwrap(), "01:15:00");
        assert_eq!(parse("125m").unwrap(), "02:05:00");
        assert_eq!(parse("59m61s").unwrap(), "01:00:01");
    }

    #[test]
    fn bare_number_is_seconds() {
        assert_eq!(parse("45").unwrap(), "00:00:45");
        assert_eq!(parse("3600").unwrap(), "01:00:00");
        assert_eq!(parse("1h30").unwrap(), "01:00:30");
        assert_eq!(parse("10m5").unwrap(), "00:10:05");
    }

    #[test]
    fn leftover_never_overwrites_explicit_seconds() {
        assert_eq!(parse("5s1m").unwrap(), "00:01:05");
        assert_eq!(parse("1m5s").unwrap(), "00:01:05");
        assert_eq!(parse("5s30").unwrap(), "00:00:05");
    }

    #[test]
    fn clock_notation() {
        assert_eq!(parse("00:01:00").unwrap(), "00:01:00");
        assert_eq!(parse("1:30").unwrap(), "00:01:30");
        assert_eq!(parse("00:00:10.500").unwrap(), "00:00:10");
        assert_eq!(parse("0:90:00").unwrap(), "01:30:00");
    }

    #[test]
    fn invalid_inputs() {
        assert_eq!(parse(""), Err(ParseTimeError::Empty));
        assert_eq!(parse("   "), Err(ParseTimeError::Empty));
        assert!(matches!(parse("abc"), Err(ParseTimeError::Unrecognized(_))));
        assert!(matches!(parse("h"), Err(ParseTimeError::Unrecognized(_))));
        assert!(matches!(parse("1h2x"), Err(ParseTimeError::Unrecognized(_))));
        assert!(matches!(parse("1m2m"), Err(ParseTimeError::Unrecognized(_))));
        assert_eq!(
            parse("99999999999999999999999s"),
            Err(ParseTimeError::Overflow)
        );
    }

    #[test]
    fn hours_are_capped() {
        assert_eq!(parse("99h59m59s").unwrap(), "99:59:59");
        assert_eq!(parse("100h"), Err(ParseTimeError::TooManyHours(100)));
        assert_eq!(parse("99h60m"), Err(ParseTimeError::TooManyHours(100)));
    }

    #[test]
    fn ordering_follows_time() {
        let a: CanonicalTime = "59s".parse().unwrap();
        let b: CanonicalTime = "1m".parse().unwrap();
        assert!(a < b);
    }
}
