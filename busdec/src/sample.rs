use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{ParseError, ParseErrorKind};

/// Mask applied to every raw sample. All three buses are captured on 16
/// channels.
pub const SAMPLE_MASK: u64 = 0xFFFF;

/// One row of a logic analyser capture: the time in seconds at which the bus
/// changed, and the state of all 16 channels after the change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub timestamp: Decimal,
    pub raw: u16,
}

impl Sample {
    pub fn new(timestamp: Decimal, raw: u16) -> Self {
        Self { timestamp, raw }
    }

    /// Build a sample from the two text fields of a capture row.
    pub fn from_fields(timestamp: &str, value: &str) -> Result<Self, ParseError> {
        Ok(Self {
            timestamp: parse_timestamp(timestamp)?,
            raw: parse_value(value)?,
        })
    }

    /// Read a single channel.
    pub fn bit(&self, bit: u8) -> u8 {
        ((self.raw >> bit) & 1) as u8
    }
}

/// Parse a decimal timestamp without going through floating point. Both
/// `0.0012` and `1.2E-3` are accepted; the scale of the text is kept so it
/// prints the same way it was read. Text that needs more than the 28
/// significant digits a `Decimal` holds is rejected rather than rounded.
pub fn parse_timestamp(text: &str) -> Result<Decimal, ParseError> {
    let text = text.trim();
    let err = || ParseError::new(ParseErrorKind::Timestamp, text);
    let parsed = if text.contains(['e', 'E']) {
        Decimal::from_scientific(text)
    } else {
        Decimal::from_str(text)
    };
    let parsed = parsed.map_err(|_| err())?;
    match significand(text) {
        Some(expected) if expected == decimal_significand(parsed) => Ok(parsed),
        _ => Err(err()),
    }
}

/// Significant digits and power of ten of a decimal number in text form,
/// with leading and trailing zeros removed. Zero is `("0", 0)`.
fn significand(text: &str) -> Option<(String, i64)> {
    let (mantissa, exponent) = match text.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i64>().ok()?),
        None => (text, 0),
    };
    let mantissa = mantissa.trim_start_matches(['+', '-']);
    let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits = format!("{int}{frac}");
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let exponent = exponent.checked_sub(i64::try_from(frac.len()).ok()?)?;
    Some(strip_zeros(&digits, exponent))
}

fn decimal_significand(value: Decimal) -> (String, i64) {
    let mantissa = value.mantissa().unsigned_abs().to_string();
    strip_zeros(&mantissa, -i64::from(value.scale()))
}

fn strip_zeros(digits: &str, exponent: i64) -> (String, i64) {
    let digits = digits.trim_start_matches('0');
    let trimmed = digits.trim_end_matches('0');
    if trimmed.is_empty() {
        return ("0".to_owned(), 0);
    }
    let exponent = exponent.saturating_add((digits.len() - trimmed.len()) as i64);
    (trimmed.to_owned(), exponent)
}

/// Parse a hex bus value, e.g. `0x0F3A` or `0f3a`, and mask it to the bus
/// width.
pub fn parse_value(text: &str) -> Result<u16, ParseError> {
    let text = text.trim();
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ParseError::new(ParseErrorKind::Value, text));
    }
    let value = u64::from_str_radix(digits, 16)
        .map_err(|_| ParseError::new(ParseErrorKind::Value, text))?;
    Ok((value & SAMPLE_MASK) as u16)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_timestamp_keeps_precision() {
        let ts = parse_timestamp("1.250000000000000001").unwrap();
        assert_eq!(ts.to_string(), "1.250000000000000001");
        assert_eq!(parse_timestamp(" 1.250 ").unwrap().to_string(), "1.250");
        assert_eq!(
            parse_timestamp("1.5E-3").unwrap(),
            Decimal::from_str("0.0015").unwrap()
        );
    }

    #[test]
    fn test_timestamp_too_precise() {
        // 29 and more significant digits don't fit a Decimal and must not be
        // rounded.
        for text in [
            "12345.678901234567890123456789012",
            "0.00000000000000000000000000001",
            "1.0000000000000000000000000001",
            "1.0000000000000000000000000001E-3",
        ] {
            let err = parse_timestamp(text).unwrap_err();
            assert_eq!(err.kind, ParseErrorKind::Timestamp, "{text:?}");
        }
        assert_eq!(
            parse_timestamp("0.1234567890123456789012345678")
                .unwrap()
                .to_string(),
            "0.1234567890123456789012345678"
        );
    }

    #[test]
    fn test_bad_timestamp() {
        let err = parse_timestamp("Time [s]").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Timestamp);
        assert_eq!(err.text, "Time [s]");
        assert!(parse_timestamp("").is_err());
    }

    #[test]
    fn test_values() {
        assert_eq!(parse_value("0x0F3A").unwrap(), 0x0F3A);
        assert_eq!(parse_value("0X0f3a").unwrap(), 0x0F3A);
        assert_eq!(parse_value("00ff").unwrap(), 0xFF);
        // Wider captures are cut down to the 16 bus channels.
        assert_eq!(parse_value("12345").unwrap(), 0x2345);
    }

    #[test]
    fn test_bad_values() {
        for text in ["", "0x", "xyz", "-1", "+1", "0x1_0", "11112222333344445555"] {
            let err = parse_value(text).unwrap_err();
            assert_eq!(err.kind, ParseErrorKind::Value, "{text:?}");
        }
    }

    #[test]
    fn test_bit() {
        let sample = Sample::from_fields("0", "8001").unwrap();
        assert_eq!(sample.bit(0), 1);
        assert_eq!(sample.bit(1), 0);
        assert_eq!(sample.bit(15), 1);
    }
}
