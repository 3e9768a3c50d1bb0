//! Bounded unsigned number parsing with C-style base detection.

use crate::error::ParseError;

/// Parse `s` as an unsigned number in `[min, max]`.
///
/// `0x`/`0X` selects hex, a leading `0` octal, anything else decimal.
/// Leading whitespace and a single `+` are accepted, trailing characters are not.
/// `max == None` means the natural maximum of `u64`.
pub fn parse_number(s: &str, min: u64, max: Option<u64>) -> Result<u64, ParseError> {
    let upper = max.unwrap_or(u64::MAX);
    let out_of_range = || ParseError::OutOfRange {
        value: s.to_string(),
        min,
        max: upper,
    };
    let body = s.trim_start();
    let body = body.strip_prefix('+').unwrap_or(body);

    let (digits, radix) = if let Some(hex) = body
        .strip_prefix("0x")
        .or_else(|| body.strip_prefix("0X"))
    {
        (hex, 16)
    } else if body.len() > 1 && body.starts_with('0') {
        (&body[1..], 8)
    } else {
        (body, 10)
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(ParseError::NotANumber(s.to_string()));
    }

    let mut number: u64 = 0;
    for c in digits.chars() {
        // is_digit(radix) was checked above
        let d = c.to_digit(radix).unwrap_or(0) as u64;
        number = number
            .checked_mul(radix as u64)
            .and_then(|n| n.checked_add(d))
            .ok_or_else(out_of_range)?;
    }

    if number < min || number > upper {
        return Err(out_of_range());
    }
    Ok(number)
}

pub fn parse_u8(s: &str) -> Result<u8, ParseError> {
    parse_number(s, 0, Some(u8::MAX as u64)).map(|n| n as u8)
}

pub fn parse_u16(s: &str) -> Result<u16, ParseError> {
    parse_number(s, 0, Some(u16::MAX as u64)).map(|n| n as u16)
}

pub fn parse_u32(s: &str) -> Result<u32, ParseError> {
    parse_number(s, 0, Some(u32::MAX as u64)).map(|n| n as u32)
}

/// Prefix length in `[min, max]`.
pub fn parse_cidr(s: &str, min: u8, max: u8) -> Result<u8, ParseError> {
    let n = parse_u8(s)?;
    if n < min || n > max {
        return Err(ParseError::OutOfRange {
            value: s.to_string(),
            min: min as u64,
            max: max as u64,
        });
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn decimal_hex_octal() {
        assert_eq!(parse_number("42", 0, None).unwrap(), 42);
        assert_eq!(parse_number("0x2a", 0, None).unwrap(), 42);
        assert_eq!(parse_number("0X2A", 0, None).unwrap(), 42);
        assert_eq!(parse_number("052", 0, None).unwrap(), 42);
        assert_eq!(parse_number("0", 0, None).unwrap(), 0);
    }

    #[test]
    fn leading_whitespace_and_plus() {
        assert_eq!(parse_number("  7", 0, None).unwrap(), 7);
        assert_eq!(parse_number("+7", 0, None).unwrap(), 7);
    }

    #[test]
    fn trailing_garbage_is_syntax_error() {
        for s in ["12a", "0x", "08", "", " ", "1 ", "-1", "0xg", "1.5"] {
            let err = parse_number(s, 0, None).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Syntax, "{:?}", s);
        }
    }

    #[test]
    fn bounds_are_inclusive() {
        assert_eq!(parse_number("10", 10, Some(20)).unwrap(), 10);
        assert_eq!(parse_number("20", 10, Some(20)).unwrap(), 20);
        for s in ["9", "21", "0x15"] {
            let err = parse_number(s, 10, Some(20)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Range, "{:?}", s);
        }
    }

    #[test]
    fn overflow_is_range_error() {
        let err = parse_number("18446744073709551616", 0, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
        assert_eq!(parse_number("18446744073709551615", 0, None).unwrap(), u64::MAX);
    }

    #[test]
    fn width_helpers() {
        assert_eq!(parse_u8("255").unwrap(), 255);
        assert!(parse_u8("256").is_err());
        assert_eq!(parse_u16("0xffff").unwrap(), 65535);
        assert!(parse_u16("65536").is_err());
        assert_eq!(parse_u32("4294967295").unwrap(), u32::MAX);
        assert!(parse_u32("4294967296").is_err());
    }

    #[test]
    fn cidr_bounds() {
        assert_eq!(parse_cidr("24", 0, 32).unwrap(), 24);
        let err = parse_cidr("33", 0, 32).unwrap_err();
        assert!(matches!(err, ParseError::OutOfRange { min: 0, max: 32, .. }));
        assert!(parse_cidr("0", 1, 31).is_err());
    }
}
