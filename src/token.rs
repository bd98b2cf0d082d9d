// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The tokens produced by [parse](../parse/index.html).

use crate::pos::Pos;
use crate::value::{DataType, Name, IntLiteral, FloatLiteral, StringLiteral};
use kstring::KString;
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Comma,
    Equals,
    Eof,
}

impl Delimiter {
    pub fn from_char(c: char) -> Option<Delimiter> {
        match c {
            '{' => Some(Delimiter::LBrace),
            '}' => Some(Delimiter::RBrace),
            '[' => Some(Delimiter::LBracket),
            ']' => Some(Delimiter::RBracket),
            '(' => Some(Delimiter::LParen),
            ')' => Some(Delimiter::RParen),
            ',' => Some(Delimiter::Comma),
            '=' => Some(Delimiter::Equals),
            _ => None
        }
    }

    /// `None` for `Eof`.
    pub fn as_char(self) -> Option<char> {
        match self {
            Delimiter::LBrace => Some('{'),
            Delimiter::RBrace => Some('}'),
            Delimiter::LBracket => Some('['),
            Delimiter::RBracket => Some(']'),
            Delimiter::LParen => Some('('),
            Delimiter::RParen => Some(')'),
            Delimiter::Comma => Some(','),
            Delimiter::Equals => Some('='),
            Delimiter::Eof => None,
        }
    }
}

/// Whether `c` may end a numeric literal. `None` is the end of input.
pub fn is_delimiter_char(c: Option<char>) -> bool {
    match c {
        None => true,
        Some(c) => Delimiter::from_char(c).is_some(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Delimiter(Delimiter),
    /// Custom structure type or property name.
    Identifier(KString),
    DataType(DataType),
    Name(Name),
    Bool(bool),
    Int(IntLiteral),
    Float(FloatLiteral),
    String(StringLiteral),
}

impl Token {
    pub const EOF: Token = Token::Delimiter(Delimiter::Eof);

    pub fn is_eof(&self) -> bool {
        matches!(self, Token::Delimiter(Delimiter::Eof))
    }

    pub fn is_delimiter(&self, d: Delimiter) -> bool {
        matches!(self, Token::Delimiter(x) if *x == d)
    }

    /// Source text that lexes back to this token. Empty for EOF;
    /// data types give their long spelling.
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Token::Delimiter(d) => match d.as_char() {
                Some(c) => Cow::Owned(c.to_string()),
                None => Cow::Borrowed(""),
            },
            Token::Identifier(s) => Cow::Borrowed(s.as_str()),
            Token::DataType(t) => Cow::Borrowed(t.name()),
            Token::Name(n) => Cow::Owned(n.to_string()),
            Token::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            Token::Int(i) => Cow::Borrowed(i.text.as_str()),
            Token::Float(x) => Cow::Borrowed(x.text.as_str()),
            Token::String(s) => Cow::Borrowed(s.text.as_str()),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Token::Delimiter(Delimiter::Eof) => "end of input",
            Token::Delimiter(_) => "delimiter",
            Token::Identifier(_) => "identifier",
            Token::DataType(_) => "data type",
            Token::Name(_) => "name",
            Token::Bool(_) => "bool literal",
            Token::Int(_) => "integer literal",
            Token::Float(_) => "float literal",
            Token::String(_) => "string literal",
        }
    }

    /// For error messages, e.g. `identifier 'Foo'`.
    pub fn describe(&self) -> String {
        if self.is_eof() {
            self.kind_name().to_string()
        } else {
            format!("{} '{}'", self.kind_name(), self.text())
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        f.write_str(&self.text())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenWithPos(pub Token, pub Pos);
