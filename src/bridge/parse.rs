//! Inbound request value parsing.
//!
//! Every client frame carries the next threshold as plain decimal text.
//! Anything that does not decode to a finite `f32` is rejected; the caller
//! logs and drops the frame, the connection stays up.

use thiserror::Error;

/// Reasons an inbound payload was rejected.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Payload bytes are not UTF-8 text.
    #[error("Payload is not valid UTF-8")]
    NotText,

    /// Payload text does not parse as a number.
    #[error("Not a number: {0:?}")]
    NotANumber(String),

    /// Payload parsed but the result is NaN or infinite.
    #[error("Not a finite value: {0}")]
    NotFinite(f32),
}

/// Decode one inbound payload into a finite request value.
///
/// No trimming is applied: surrounding whitespace is a client error.
/// Overflowing magnitudes saturate to infinity during parsing and are
/// rejected by the finiteness check.
pub fn parse_request_value(payload: &[u8]) -> Result<f32, ParseError> {
    let text = std::str::from_utf8(payload).map_err(|_| ParseError::NotText)?;
    let value: f32 = text
        .parse()
        .map_err(|_| ParseError::NotANumber(text.to_string()))?;

    if !value.is_finite() {
        return Err(ParseError::NotFinite(value));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_decimals() {
        assert_eq!(parse_request_value(b"10.5").unwrap(), 10.5);
        assert_eq!(parse_request_value(b"20").unwrap(), 20.0);
        assert_eq!(parse_request_value(b"-3.25").unwrap(), -3.25);
        assert_eq!(parse_request_value(b"0").unwrap(), 0.0);
    }

    #[test]
    fn parses_exponent_notation() {
        assert_eq!(parse_request_value(b"1e3").unwrap(), 1000.0);
    }

    #[test]
    fn rejects_non_numeric_text() {
        assert!(matches!(
            parse_request_value(b"abc"),
            Err(ParseError::NotANumber(_))
        ));
        assert!(matches!(
            parse_request_value(b""),
            Err(ParseError::NotANumber(_))
        ));
    }

    #[test]
    fn rejects_surrounding_whitespace() {
        assert!(matches!(
            parse_request_value(b" 10.5 "),
            Err(ParseError::NotANumber(_))
        ));
        assert!(matches!(
            parse_request_value(b"10.5\n"),
            Err(ParseError::NotANumber(_))
        ));
    }

    #[test]
    fn rejects_non_utf8_bytes() {
        assert!(matches!(
            parse_request_value(&[0xff, 0xfe]),
            Err(ParseError::NotText)
        ));
    }

    #[test]
    fn rejects_nan_and_infinity() {
        assert!(matches!(
            parse_request_value(b"NaN"),
            Err(ParseError::NotFinite(_))
        ));
        assert!(matches!(
            parse_request_value(b"inf"),
            Err(ParseError::NotFinite(_))
        ));
        assert!(matches!(
            parse_request_value(b"-inf"),
            Err(ParseError::NotFinite(_))
        ));
    }

    #[test]
    fn overflow_saturates_and_is_rejected() {
        // 1e39 exceeds f32 range, str::parse saturates it to infinity.
        assert!(matches!(
            parse_request_value(b"1e39"),
            Err(ParseError::NotFinite(v)) if v.is_infinite()
        ));
    }
}
