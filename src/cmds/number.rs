//! Numeric operand parsing.
//!
//! Literals follow C `strtoul` with automatic base detection, plus a `0b`
//! prefix for binary:
//!
//! ```text
//! 0b1010   binary
//! 0x1F     hex (0X also accepted)
//! 017      octal
//! 42       decimal
//! ```
//!
//! The grammar is stricter than `strtoul`: leading whitespace, a `+` sign and
//! a bare `0b` are all rejected, where `strtoul` would accept them.
//!
//! Values wider than 32 bits are not rejected; they saturate at 64 bits and
//! are then truncated to the low 32 bits, as `strtoul` on a 64-bit host
//! followed by a `uint32_t` store would do.

use crate::err::ParseError;

/// Parse an unsigned 32-bit operand.
pub fn parse_u32(text: &str) -> Result<u32, ParseError> {
    if text.starts_with('-') {
        return Err(ParseError::Negative);
    }

    let (radix, digits) = split_radix(text);
    if digits.is_empty() {
        return Err(ParseError::Malformed);
    }

    let mut value: u64 = 0;
    let mut saturated = false;
    for c in digits.chars() {
        let digit = c.to_digit(radix).ok_or(ParseError::Malformed)?;
        if saturated {
            continue;
        }
        match value
            .checked_mul(u64::from(radix))
            .and_then(|v| v.checked_add(u64::from(digit)))
        {
            Some(v) => value = v,
            None => {
                value = u64::MAX;
                saturated = true;
            }
        }
    }

    Ok(value as u32)
}

fn split_radix(text: &str) -> (u32, &str) {
    if let Some(rest) = text.strip_prefix("0b") {
        (2, rest)
    } else if let Some(rest) = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        (16, rest)
    } else if text.len() > 1 && text.starts_with('0') {
        (8, &text[1..])
    } else {
        (10, text)
    }
}
