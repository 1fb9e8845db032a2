use crate::error::{Result, VttError};

const MS_PER_SECOND: u64 = 1000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

fn invalid(s: &str) -> VttError {
    VttError::Parser(format!("invalid timestamp: {:?}", s))
}

/// Parses a WebVTT timestamp, `[hh:]mm:ss.ttt`, into milliseconds.
///
/// Hours take two or more digits; minutes and seconds exactly two digits
/// below 60; the fraction exactly three digits.
///
/// ```
/// use vttio::utils::parse_timestamp;
///
/// assert_eq!(parse_timestamp("01:02.500").unwrap(), 62_500);
/// assert_eq!(parse_timestamp("100:00:00.001").unwrap(), 360_000_001);
/// assert!(parse_timestamp("1:02.500").is_err());
/// ```
pub fn parse_timestamp(s: &str) -> Result<u64> {
    let parts: Vec<&str> = s.split(':').collect();
    let (hours, minutes, rest) = match parts.as_slice() {
        [m, rest] => ("0", *m, *rest),
        [h, m, rest] => {
            if h.len() < 2 || !h.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid(s));
            }
            (*h, *m, *rest)
        }
        _ => return Err(invalid(s)),
    };

    let (seconds, millis) = rest.split_once('.').ok_or_else(|| invalid(s))?;
    if !is_digits(minutes, 2) || !is_digits(seconds, 2) || !is_digits(millis, 3) {
        return Err(invalid(s));
    }

    let hours: u64 = hours.parse()?;
    let minutes: u64 = minutes.parse()?;
    let seconds: u64 = seconds.parse()?;
    let millis: u64 = millis.parse()?;
    if minutes >= 60 || seconds >= 60 {
        return Err(invalid(s));
    }

    hours
        .checked_mul(MS_PER_HOUR)
        .and_then(|h| h.checked_add(minutes * MS_PER_MINUTE + seconds * MS_PER_SECOND + millis))
        .ok_or_else(|| invalid(s))
}

/// Formats milliseconds as `hh:mm:ss.ttt`.
pub fn format_timestamp(ms: u64) -> String {
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        ms / MS_PER_HOUR,
        (ms % MS_PER_HOUR) / MS_PER_MINUTE,
        (ms % MS_PER_MINUTE) / MS_PER_SECOND,
        ms % MS_PER_SECOND
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_parse_timestamp() {
        let cases = [
            ("00:00.000", 0),
            ("00:01.000", 1000),
            ("59:59.999", 3_599_999),
            ("00:00:02.500", 2500),
            ("01:00:00.000", 3_600_000),
            ("123:00:00.000", 442_800_000),
        ];
        for (input, expected) in cases {
            assert_eq!(parse_timestamp(input).unwrap(), expected, "{}", input);
        }
    }

    #[test]
    fn test_parse_timestamp_rejects_malformed() {
        for input in [
            "",
            "00:00",
            "0:00.000",
            "00:0.000",
            "00:60.000",
            "60:00.000",
            "00:00.00",
            "00:00.0000",
            "00:00,000",
            "1:00:00.000",
            "aa:00.000",
            "00:00:00:00.000",
            "-1:00.000",
        ] {
            assert!(parse_timestamp(input).is_err(), "{:?} should fail", input);
        }
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "00:00:00.000");
        assert_eq!(format_timestamp(3_723_004), "01:02:03.004");
        assert_eq!(format_timestamp(442_800_000), "123:00:00.000");
    }

    #[quickcheck]
    fn prop_format_then_parse(ms: u32) -> bool {
        parse_timestamp(&format_timestamp(ms as u64)).ok() == Some(ms as u64)
    }
}
