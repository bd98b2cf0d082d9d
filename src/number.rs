// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Decoding of numeric literal text into values.

use num::{BigInt, ToPrimitive};
use thiserror::Error;

/// The spelling an integer literal was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntFormat {
    Decimal,
    Hex,
    Octal,
    Binary,
    /// `'ABCD'`: characters packed big-endian, one byte each.
    Char,
}

impl IntFormat {
    /// `None` for `Char`, which is not decoded arithmetically.
    pub fn radix(self) -> Option<u32> {
        match self {
            IntFormat::Decimal => Some(10),
            IntFormat::Hex => Some(16),
            IntFormat::Octal => Some(8),
            IntFormat::Binary => Some(2),
            IntFormat::Char => None,
        }
    }

    /// The name used in error messages, e.g. "invalid hex literal".
    pub fn literal_name(self) -> &'static str {
        match self {
            IntFormat::Decimal => "decimal",
            IntFormat::Hex => "hex",
            IntFormat::Octal => "octal",
            IntFormat::Binary => "binary",
            IntFormat::Char => "character",
        }
    }

    /// Accepts '0'..'9', 'a'..'f', 'A'..'F' up to the radix; `_` is
    /// handled by the caller.
    pub fn is_digit(self, c: char) -> bool {
        match self.radix() {
            Some(radix) => c.is_digit(radix),
            None => false,
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralDefect {
    #[error("missing digits")]
    MissingDigits,
    #[error("unexpected character '{}' after literal", .0.escape_debug())]
    BadTerminator(char),
    #[error("value out of range")]
    OutOfRange,
    #[error("character literal must hold 1 to 8 characters, got {0}")]
    CharCount(usize),
    #[error("malformed number")]
    Malformed,
}

fn fits_64_bits(n: &BigInt) -> Option<i64> {
    // unsigned_int64 values above i64::MAX keep their bit pattern
    n.to_i64().or_else(|| n.to_u64().map(|v| v as i64))
}

/// `digits` must hold only digits valid for `format` (separators
/// already removed).
pub fn decode_int(
    is_neg: bool,
    digits: &str,
    format: IntFormat,
) -> Result<i64, LiteralDefect> {
    let radix = format.radix().ok_or(LiteralDefect::Malformed)?;
    if digits.is_empty() {
        return Err(LiteralDefect::MissingDigits)
    }
    let mut n: BigInt = 0.into();
    for c in digits.chars() {
        let d = c.to_digit(radix).ok_or(LiteralDefect::Malformed)?;
        n = n * radix + d;
    }
    let n = if is_neg { -n } else { n };
    fits_64_bits(&n).ok_or(LiteralDefect::OutOfRange)
}

/// Packs the low byte of each character, first character in the
/// most significant position.
pub fn decode_char_literal(
    is_neg: bool,
    chars: &[char],
) -> Result<i64, LiteralDefect> {
    if chars.is_empty() || chars.len() > 8 {
        return Err(LiteralDefect::CharCount(chars.len()))
    }
    let mut v: u64 = 0;
    for c in chars {
        v = (v << 8) | (u32::from(*c) & 0xff) as u64;
    }
    let v = v as i64;
    Ok(if is_neg { v.wrapping_neg() } else { v })
}

/// `s` is the literal without `_` separators, sign included.
pub fn decode_float(s: &str) -> Result<f64, LiteralDefect> {
    s.parse::<f64>().map_err(|_| LiteralDefect::Malformed)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radix_digits() {
        assert_eq!(decode_int(false, "41424344", IntFormat::Hex), Ok(1094861636));
        assert_eq!(decode_int(true, "10120441504", IntFormat::Octal), Ok(-1094861636));
        assert_eq!(decode_int(false, "", IntFormat::Binary),
                   Err(LiteralDefect::MissingDigits));
    }

    #[test]
    fn unsigned_64_bit_range() {
        assert_eq!(decode_int(false, "ffffffffffffffff", IntFormat::Hex), Ok(-1));
        assert_eq!(decode_int(false, "10000000000000000", IntFormat::Hex),
                   Err(LiteralDefect::OutOfRange));
    }

    #[test]
    fn char_packing() {
        assert_eq!(decode_char_literal(false, &['A', 'B', 'C', 'D']), Ok(0x41424344));
        assert_eq!(decode_char_literal(true, &['A']), Ok(-65));
        assert_eq!(decode_char_literal(false, &[]), Err(LiteralDefect::CharCount(0)));
    }
}
