// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Translating a character stream to a token stream. Literals are
//! fully decoded here (numbers in all five spellings, strings with
//! their escapes), so the only structure left for
//! [read](../read/index.html) is the nesting of delimiters. Comments
//! and whitespace never make it into tokens.

//! The tokenizer can look ahead any number of tokens (`peek`), which
//! the structure reader uses to decide between grammar alternatives.

use crate::char_source::CharSource;
use crate::number::{self, IntFormat, LiteralDefect};
use crate::pos::Pos;
use crate::settings::Settings;
use crate::token::{Delimiter, Token, TokenWithPos, is_delimiter_char};
use crate::value::{DataType, Name, IntLiteral, FloatLiteral, StringLiteral};
use kstring::KString;
use thiserror::Error;
use log::trace;
use std::collections::VecDeque;
use std::io;

fn show_char(c: &char) -> String {
    format!("'{}' (U+{:04X})", c.escape_debug(), u32::from(*c))
}

fn in_context(context: &Option<&'static str>) -> String {
    match context {
        Some(c) => format!(" in {}", c),
        None => String::new(),
    }
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error ({0}) after")]
    IOError(io::Error),
    #[error("unexpected character {}{}", show_char(.found), in_context(.context))]
    UnexpectedCharacter { found: char, context: Option<&'static str> },
    #[error("unexpected EOF{}", in_context(.0))]
    UnexpectedEof(Option<&'static str>),
    #[error("unexpected {actual}; expected {expected}")]
    UnexpectedToken { actual: String, expected: String },
    #[error("invalid escape character {}", show_char(.0))]
    InvalidEscape(char),
    #[error("invalid {literal} literal: {defect}")]
    InvalidLiteral { literal: &'static str, defect: LiteralDefect },
    #[error("invalid code point {0:#X}")]
    InvalidCodePoint(u32),
    #[error("list element {actual} does not match data type {expected}; expected {}",
            .expected.element_description())]
    ElementTypeMismatch { actual: String, expected: DataType },
    #[error("expected {expected} elements in subarray but found {actual}")]
    SubarraySizeMismatch { expected: usize, actual: usize },
    #[error("invalid subarray size {0}")]
    InvalidSubarraySize(i64),
    #[error("nesting too deep")]
    NestingTooDeep,
    /// Raised by a [Listener](../listener/trait.Listener.html).
    #[error("{0}")]
    Format(anyhow::Error),
}

#[derive(Error, Debug)]
#[error("{err} {pos}")]
pub struct ParseErrorWithPos {
    pub err: ParseError,
    pub pos: Pos
}

impl ParseError {
    pub fn at(self, p: Pos) -> ParseErrorWithPos {
        ParseErrorWithPos {
            err: self,
            pos: p
        }
    }
}

pub(crate) trait At<T> {
    fn at(self, p: Pos) -> Result<T, ParseErrorWithPos>;
}

impl<T> At<T> for Result<T, ParseError> {
    fn at(self, p: Pos) -> Result<T, ParseErrorWithPos> {
        match self {
            Err(e) => Err(e.at(p)),
            Ok(v) => Ok(v)
        }
    }
}

/// Code points 1 to 32.
pub fn is_whitespace_char(c: char) -> bool {
    ('\u{1}'..=' ').contains(&c)
}

fn is_leading_identifier_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_char_literal_char(c: char) -> bool {
    matches!(u32::from(c), 0x20..=0x26 | 0x28..=0x5b | 0x5d..=0x7e)
}

fn is_string_literal_char(c: char) -> bool {
    matches!(u32::from(c),
             0x20..=0x21 | 0x23..=0x5b | 0x5d..=0x7e |
             0xa0..=0xd7ff | 0xe000..=0xfffd | 0x10000..=0x10ffff)
}

fn literal_error(literal: &'static str, defect: LiteralDefect) -> ParseError {
    ParseError::InvalidLiteral { literal, defect }
}

pub struct Tokenizer<I> {
    cs: CharSource<I>,
    queue: VecDeque<TokenWithPos>,
    last_pos: Pos,
    failed: bool,
}

impl<I> Tokenizer<I>
    where I: Iterator<Item = io::Result<char>>
{
    pub fn new(chars: I, settings: &Settings) -> Self {
        Tokenizer {
            cs: CharSource::new(chars),
            queue: VecDeque::with_capacity(settings.token_lookahead),
            last_pos: Pos::START,
            failed: false,
        }
    }

    /// The token `ahead` tokens after the read position without
    /// consuming it; the EOF token past the end of input.
    pub fn peek(&mut self, ahead: usize) -> Result<&Token, ParseErrorWithPos> {
        self.fill(ahead)?;
        Ok(&self.queue[ahead].0)
    }

    /// Where the token at `peek(ahead)` starts.
    pub fn pos(&mut self, ahead: usize) -> Result<Pos, ParseErrorWithPos> {
        self.fill(ahead)?;
        Ok(self.queue[ahead].1)
    }

    /// Where the most recently consumed token started.
    pub fn last_pos(&self) -> Pos {
        self.last_pos
    }

    pub fn read(&mut self) -> Result<Token, ParseErrorWithPos> {
        let TokenWithPos(token, _) = self.read_with_pos()?;
        Ok(token)
    }

    pub fn read_with_pos(&mut self) -> Result<TokenWithPos, ParseErrorWithPos> {
        let tp = match self.queue.pop_front() {
            Some(tp) => tp,
            None => self.scan()?,
        };
        self.last_pos = tp.1;
        Ok(tp)
    }

    /// Consumes the next token if it is the delimiter `d`.
    pub fn consume_if(&mut self, d: Delimiter) -> Result<bool, ParseErrorWithPos> {
        if self.peek(0)?.is_delimiter(d) {
            self.read()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn fill(&mut self, ahead: usize) -> Result<(), ParseErrorWithPos> {
        while self.queue.len() <= ahead {
            let tp = self.scan()?;
            self.queue.push_back(tp);
        }
        Ok(())
    }

    fn scan(&mut self) -> Result<TokenWithPos, ParseErrorWithPos> {
        self.skip_whitespace_and_comments()?;
        let pos = self.cs.next_pos();
        let token = self.read_token()?;
        trace!("token {} {}", pos, token.describe());
        Ok(TokenWithPos(token, pos))
    }

    // ---- character level ------------------------------------------------

    fn peek_char(&mut self, ahead: usize) -> Result<Option<char>, ParseErrorWithPos> {
        let lastpos = self.cs.last_pos();
        self.cs.peek(ahead).map_err(|e| ParseError::IOError(e).at(lastpos))
    }

    fn read_char(&mut self) -> Result<Option<char>, ParseErrorWithPos> {
        let lastpos = self.cs.last_pos();
        self.cs.read().map_err(|e| ParseError::IOError(e).at(lastpos))
    }

    /// Reads a character and appends it to the token text.
    fn take_char(&mut self, text: &mut String) -> Result<Option<char>, ParseErrorWithPos> {
        let c = self.read_char()?;
        if let Some(c) = c {
            text.push(c);
        }
        Ok(c)
    }

    fn expect_char(
        &mut self,
        expected: char,
        text: &mut String,
        context: &'static str,
    ) -> Result<(), ParseErrorWithPos> {
        let pos = self.cs.next_pos();
        match self.peek_char(0)? {
            Some(c) if c == expected => {
                self.take_char(text)?;
                Ok(())
            }
            Some(c) => Err(ParseError::UnexpectedCharacter {
                found: c, context: Some(context)
            }.at(pos)),
            None => Err(ParseError::UnexpectedEof(Some(context)).at(pos)),
        }
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), ParseErrorWithPos> {
        loop {
            while let Some(c) = self.peek_char(0)? {
                if is_whitespace_char(c) {
                    self.read_char()?;
                } else {
                    break
                }
            }
            if self.peek_char(0)? != Some('/') {
                return Ok(())
            }
            match self.peek_char(1)? {
                Some('/') => {
                    // up to and including the newline
                    loop {
                        match self.read_char()? {
                            None | Some('\n') => break,
                            _ => {}
                        }
                    }
                }
                Some('*') => {
                    let startpos = self.cs.next_pos();
                    self.read_char()?;
                    self.read_char()?;
                    loop {
                        match self.read_char()? {
                            None => return Err(ParseError::UnexpectedEof(
                                Some("block comment")).at(startpos)),
                            Some('*') => {
                                if self.peek_char(0)? == Some('/') {
                                    self.read_char()?;
                                    break
                                }
                            }
                            _ => {}
                        }
                    }
                }
                // a lone '/' is reported by read_token
                _ => return Ok(())
            }
        }
    }

    // ---- tokens --------------------------------------------------------

    fn read_token(&mut self) -> Result<Token, ParseErrorWithPos> {
        let c = match self.peek_char(0)? {
            None => return Ok(Token::EOF),
            Some(c) => c,
        };
        if is_leading_identifier_char(c) {
            return self.read_identifier_or_keyword()
        }
        if c == '$' || c == '%' {
            return self.read_name()
        }
        if c == '+' || c == '-' || c == '.' || c.is_ascii_digit() {
            return self.read_number_literal()
        }
        match c {
            '\'' => return self.read_char_literal(String::new(), false),
            '"' => return self.read_string_literal(),
            _ => {}
        }
        if let Some(d) = Delimiter::from_char(c) {
            self.read_char()?;
            return Ok(Token::Delimiter(d))
        }
        Err(ParseError::UnexpectedCharacter { found: c, context: None }
            .at(self.cs.next_pos()))
    }

    fn read_identifier_text(&mut self, text: &mut String) -> Result<(), ParseErrorWithPos> {
        while let Some(c) = self.peek_char(0)? {
            if !is_identifier_char(c) {
                break
            }
            self.take_char(text)?;
        }
        Ok(())
    }

    fn read_identifier_or_keyword(&mut self) -> Result<Token, ParseErrorWithPos> {
        let mut text = String::new();
        self.read_identifier_text(&mut text)?;
        Ok(match text.as_str() {
            "null" => Token::Name(Name::Null),
            "true" => Token::Bool(true),
            "false" => Token::Bool(false),
            _ => match DataType::from_keyword(&text) {
                Some(t) => Token::DataType(t),
                None => Token::Identifier(KString::from_string(text)),
            }
        })
    }

    fn read_name(&mut self) -> Result<Token, ParseErrorWithPos> {
        let is_global = self.read_char()? == Some('$');
        let pos = self.cs.next_pos();
        match self.peek_char(0)? {
            Some(c) if is_leading_identifier_char(c) => {}
            Some(c) => return Err(ParseError::UnexpectedCharacter {
                found: c, context: Some("name")
            }.at(pos)),
            None => return Err(ParseError::UnexpectedEof(Some("name")).at(pos)),
        }
        let mut ident = String::new();
        self.read_identifier_text(&mut ident)?;
        let ident = KString::from_string(ident);
        Ok(Token::Name(if is_global { Name::Global(ident) } else { Name::Local(ident) }))
    }

    fn read_number_literal(&mut self) -> Result<Token, ParseErrorWithPos> {
        let mut text = String::new();
        let mut is_neg = false;
        if let Some(c @ ('+' | '-')) = self.peek_char(0)? {
            is_neg = c == '-';
            self.take_char(&mut text)?;
        }
        match self.peek_char(0)? {
            None => return Err(ParseError::UnexpectedEof(Some("number literal"))
                               .at(self.cs.next_pos())),
            Some('0') => {
                let format = match self.peek_char(1)? {
                    Some('x' | 'X') => Some(IntFormat::Hex),
                    Some('o' | 'O') => Some(IntFormat::Octal),
                    Some('b' | 'B') => Some(IntFormat::Binary),
                    _ => None
                };
                if let Some(format) = format {
                    return self.read_radix_literal(text, is_neg, format)
                }
            }
            Some('\'') => return self.read_char_literal(text, is_neg),
            _ => {}
        }
        self.read_decimal_literal(text, is_neg)
    }

    /// Whitespace, a delimiter or the end of input must follow a
    /// number.
    fn require_terminator(&mut self, literal: &'static str) -> Result<(), ParseErrorWithPos> {
        let pos = self.cs.next_pos();
        match self.peek_char(0)? {
            Some(c) if !is_whitespace_char(c) && !is_delimiter_char(Some(c)) =>
                Err(literal_error(literal, LiteralDefect::BadTerminator(c)).at(pos)),
            _ => Ok(())
        }
    }

    fn read_radix_literal(
        &mut self,
        mut text: String,
        is_neg: bool,
        format: IntFormat,
    ) -> Result<Token, ParseErrorWithPos> {
        let literal = format.literal_name();
        // 0x, 0o, 0b
        self.take_char(&mut text)?;
        self.take_char(&mut text)?;
        let mut digits = String::new();
        while let Some(c) = self.peek_char(0)? {
            if format.is_digit(c) {
                digits.push(c);
            } else if c != '_' {
                break
            }
            self.take_char(&mut text)?;
        }
        self.require_terminator(literal)?;
        let value = number::decode_int(is_neg, &digits, format)
            .map_err(|d| literal_error(literal, d))
            .at(self.cs.last_pos())?;
        Ok(Token::Int(IntLiteral { text: KString::from_string(text), value, format }))
    }

    /// Digits and `_` separators; returns the number of digits.
    fn read_digits(
        &mut self,
        text: &mut String,
        value: &mut String,
    ) -> Result<usize, ParseErrorWithPos> {
        let mut n = 0;
        while let Some(c) = self.peek_char(0)? {
            if c.is_ascii_digit() {
                value.push(c);
                n += 1;
            } else if c != '_' {
                break
            }
            self.take_char(text)?;
        }
        Ok(n)
    }

    fn read_decimal_literal(
        &mut self,
        mut text: String,
        is_neg: bool,
    ) -> Result<Token, ParseErrorWithPos> {
        let mut value = String::new();
        let mut is_float = false;
        let mut ndigits = self.read_digits(&mut text, &mut value)?;
        if self.peek_char(0)? == Some('.') {
            is_float = true;
            self.take_char(&mut text)?;
            value.push('.');
            ndigits += self.read_digits(&mut text, &mut value)?;
        }
        if ndigits == 0 {
            return Err(literal_error("decimal", LiteralDefect::MissingDigits)
                       .at(self.cs.next_pos()))
        }
        if let Some('e' | 'E') = self.peek_char(0)? {
            is_float = true;
            self.take_char(&mut text)?;
            value.push('e');
            if let Some(c @ ('+' | '-')) = self.peek_char(0)? {
                self.take_char(&mut text)?;
                value.push(c);
            }
            if self.read_digits(&mut text, &mut value)? == 0 {
                return Err(literal_error("float", LiteralDefect::MissingDigits)
                           .at(self.cs.next_pos()))
            }
        }
        let literal = if is_float { "float" } else { "decimal" };
        self.require_terminator(literal)?;
        let lastpos = self.cs.last_pos();
        let text = KString::from_string(text);
        if is_float {
            if is_neg {
                value.insert(0, '-');
            }
            let value = number::decode_float(&value)
                .map_err(|d| literal_error(literal, d))
                .at(lastpos)?;
            Ok(Token::Float(FloatLiteral { text, value }))
        } else {
            let value = number::decode_int(is_neg, &value, IntFormat::Decimal)
                .map_err(|d| literal_error(literal, d))
                .at(lastpos)?;
            Ok(Token::Int(IntLiteral { text, value, format: IntFormat::Decimal }))
        }
    }

    fn read_char_literal(
        &mut self,
        mut text: String,
        is_neg: bool,
    ) -> Result<Token, ParseErrorWithPos> {
        let startpos = self.cs.next_pos();
        self.expect_char('\'', &mut text, "character literal")?;
        let mut chars = Vec::new();
        loop {
            match self.peek_char(0)? {
                Some('\\') => chars.push(self.read_escape(&mut text)?),
                Some(c) if is_char_literal_char(c) => {
                    self.take_char(&mut text)?;
                    chars.push(c);
                }
                _ => break
            }
        }
        self.expect_char('\'', &mut text, "character literal")?;
        let value = number::decode_char_literal(is_neg, &chars)
            .map_err(|d| literal_error("character", d))
            .at(startpos)?;
        Ok(Token::Int(IntLiteral {
            text: KString::from_string(text),
            value,
            format: IntFormat::Char,
        }))
    }

    fn read_hex_digits(
        &mut self,
        n: usize,
        text: &mut String,
    ) -> Result<u32, ParseErrorWithPos> {
        let mut res = 0;
        for _ in 0..n {
            let pos = self.cs.next_pos();
            let c = match self.take_char(text)? {
                Some(c) => c,
                None => return Err(ParseError::UnexpectedEof(
                    Some("escape sequence")).at(pos)),
            };
            match c.to_digit(16) {
                Some(d) => res = (res << 4) | d,
                None => return Err(ParseError::UnexpectedCharacter {
                    found: c, context: Some("escape sequence")
                }.at(pos)),
            }
        }
        Ok(res)
    }

    /// The escapes shared by character and string literals; the
    /// next character is the backslash.
    fn read_escape(&mut self, text: &mut String) -> Result<char, ParseErrorWithPos> {
        self.take_char(text)?;
        let pos = self.cs.next_pos();
        let c = match self.take_char(text)? {
            Some(c) => c,
            None => return Err(ParseError::UnexpectedEof(
                Some("escape sequence")).at(pos)),
        };
        Ok(match c {
            '"' | '\'' | '?' | '\\' => c,
            'a' => '\x07',
            'b' => '\x08',
            'f' => '\x0C',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\x0B',
            'x' => {
                let n = self.read_hex_digits(2, text)?;
                char::from(n as u8)
            }
            _ => return Err(ParseError::InvalidEscape(c).at(pos))
        })
    }

    fn read_string_literal(&mut self) -> Result<Token, ParseErrorWithPos> {
        let mut text = String::new();
        let mut value = String::new();
        // A \u high surrogate waiting for its low half.
        let mut high_surrogate: Option<(u16, Pos)> = None;
        self.take_char(&mut text)?;
        loop {
            let pos = self.cs.next_pos();
            let c = match self.peek_char(0)? {
                Some(c) => c,
                None => return Err(ParseError::UnexpectedEof(
                    Some("string literal")).at(pos)),
            };
            let is_utf16_escape = c == '\\' && self.peek_char(1)? == Some('u');
            if let Some((hi, hipos)) = high_surrogate {
                if !is_utf16_escape {
                    return Err(ParseError::InvalidCodePoint(u32::from(hi)).at(hipos))
                }
            }
            if c == '"' {
                self.take_char(&mut text)?;
                break
            }
            if is_utf16_escape {
                self.take_char(&mut text)?;
                self.take_char(&mut text)?;
                let unit = self.read_hex_digits(4, &mut text)? as u16;
                if let Some((hi, hipos)) = high_surrogate.take() {
                    match char::decode_utf16([hi, unit]).next() {
                        Some(Ok(c)) => value.push(c),
                        _ => return Err(ParseError::InvalidCodePoint(u32::from(hi))
                                        .at(hipos)),
                    }
                } else if (0xd800..=0xdbff).contains(&unit) {
                    high_surrogate = Some((unit, pos));
                } else {
                    match char::from_u32(u32::from(unit)) {
                        Some(c) => value.push(c),
                        None => return Err(ParseError::InvalidCodePoint(u32::from(unit))
                                           .at(pos)),
                    }
                }
            } else if c == '\\' && self.peek_char(1)? == Some('U') {
                self.take_char(&mut text)?;
                self.take_char(&mut text)?;
                let code = self.read_hex_digits(6, &mut text)?;
                match char::from_u32(code) {
                    Some(c) => value.push(c),
                    None => return Err(ParseError::InvalidCodePoint(code).at(pos)),
                }
            } else if c == '\\' {
                let c = self.read_escape(&mut text)?;
                value.push(c);
            } else if is_string_literal_char(c) {
                self.take_char(&mut text)?;
                value.push(c);
            } else {
                return Err(ParseError::UnexpectedCharacter {
                    found: c, context: Some("string literal")
                }.at(pos))
            }
        }
        Ok(Token::String(StringLiteral {
            text: KString::from_string(text),
            value: KString::from_string(value),
        }))
    }
}

/// Yields the tokens up to (excluding) EOF; stops after the first
/// error.
impl<I> Iterator for Tokenizer<I>
    where I: Iterator<Item = io::Result<char>>
{
    type Item = Result<TokenWithPos, ParseErrorWithPos>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None
        }
        match self.read_with_pos() {
            Ok(TokenWithPos(t, _)) if t.is_eof() => None,
            Ok(tp) => Some(Ok(tp)),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Tokenize a string; mostly useful for tests and tools.
pub fn tokenize_str<'s>(
    s: &'s str,
    settings: &Settings,
) -> Tokenizer<impl Iterator<Item = io::Result<char>> + 's> {
    Tokenizer::new(s.chars().map(Ok), settings)
}
