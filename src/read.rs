// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The structure level: recursive descent over the token stream,
//! reporting structures and values to a
//! [Listener](../listener/trait.Listener.html). Nothing is retained
//! beyond the current nesting path.

use crate::buffered_chars::buffered_chars;
use crate::context::{self, Context};
use crate::listener::Listener;
use crate::parse::{Tokenizer, ParseError, ParseErrorWithPos};
use crate::pos::Pos;
use crate::properties::PropertyMap;
use crate::settings::{Settings, DEFAULT_SETTINGS};
use crate::token::{Delimiter, Token};
use crate::value::{DataType, ValueKind, Name, Ref, FloatLiteral, StringLiteral, Value};
use kstring::KString;
use log::{debug, trace};
use std::fmt::{Formatter, Display};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use thiserror::Error;

/// `actual` where `expected` should have been; the end of input gets
/// its own error naming the construct being read.
fn unexpected(actual: &Token, expected: &str, context: &'static str) -> ParseError {
    if actual.is_eof() {
        ParseError::UnexpectedEof(Some(context))
    } else {
        ParseError::UnexpectedToken {
            actual: actual.describe(),
            expected: expected.to_string(),
        }
    }
}

pub struct Reader<I> {
    tokenizer: Tokenizer<I>,
    max_nesting: u32,
}

impl<I> Reader<I>
    where I: Iterator<Item = io::Result<char>>
{
    pub fn new(chars: I, settings: &Settings) -> Self {
        Reader {
            tokenizer: Tokenizer::new(chars, settings),
            max_nesting: settings.max_nesting,
        }
    }

    /// Read the whole input, then return what `listener.end()`
    /// returns. Stops at the first error.
    pub fn read<L: Listener>(mut self, listener: &mut L)
                             -> Result<L::Output, ParseErrorWithPos> {
        debug!("begin document");
        self.notify(listener.begin())?;
        let depth_fuel = self.max_nesting;
        while !self.tokenizer.peek(0)?.is_eof() {
            self.read_structure(listener, depth_fuel)?;
        }
        let out = self.notify(listener.end())?;
        debug!("end document {}", self.tokenizer.last_pos());
        Ok(out)
    }

    /// Listener errors are positioned at the last consumed token.
    fn notify<T>(&self, r: anyhow::Result<T>) -> Result<T, ParseErrorWithPos> {
        r.map_err(|e| ParseError::Format(e).at(self.tokenizer.last_pos()))
    }

    fn expect(&mut self, d: Delimiter, context: &'static str)
              -> Result<(), ParseErrorWithPos> {
        let pos = self.tokenizer.pos(0)?;
        let t = self.tokenizer.read()?;
        if t.is_delimiter(d) {
            Ok(())
        } else {
            Err(unexpected(&t, &Token::Delimiter(d).describe(), context).at(pos))
        }
    }

    fn read_structure<L: Listener>(&mut self, listener: &mut L, depth_fuel: u32)
                                   -> Result<(), ParseErrorWithPos> {
        let pos = self.tokenizer.pos(0)?;
        match self.tokenizer.peek(0)? {
            Token::DataType(t) => {
                let t = *t;
                self.read_list_structure(listener, t, pos)
            }
            Token::Identifier(id) => {
                if depth_fuel == 0 {
                    return Err(ParseError::NestingTooDeep.at(pos))
                }
                let id = id.clone();
                self.read_custom_structure(listener, id, pos, depth_fuel - 1)
            }
            t => Err(unexpected(t, "identifier or data type", "custom structure").at(pos))
        }
    }

    fn read_optional_name(&mut self) -> Result<Option<Name>, ParseErrorWithPos> {
        match self.tokenizer.peek(0)? {
            Token::Name(n) => {
                let n = n.clone();
                self.tokenizer.read()?;
                Ok(Some(n))
            }
            _ => Ok(None)
        }
    }

    fn read_subarray_size(&mut self) -> Result<usize, ParseErrorWithPos> {
        let pos = self.tokenizer.pos(0)?;
        match self.tokenizer.read()? {
            Token::Int(i) => usize::try_from(i.value)
                .map_err(|_| ParseError::InvalidSubarraySize(i.value).at(pos)),
            t => Err(unexpected(&t, "integer literal", "subarray size").at(pos))
        }
    }

    fn read_list_structure<L: Listener>(
        &mut self,
        listener: &mut L,
        data_type: DataType,
        pos: Pos,
    ) -> Result<(), ParseErrorWithPos> {
        self.tokenizer.read()?;
        let subarray_size =
            if self.tokenizer.consume_if(Delimiter::LBracket)? {
                let size = self.read_subarray_size()?;
                self.expect(Delimiter::RBracket, "subarray size")?;
                Some(size)
            } else {
                None
            };
        let name = self.read_optional_name()?;
        self.expect(Delimiter::LBrace, "list structure")?;
        match subarray_size {
            Some(size) => {
                trace!("begin {}[{}] {}", data_type, size, pos);
                self.notify(listener.begin_array_list_structure(
                    data_type, size, name.as_ref()))?;
                if !self.tokenizer.peek(0)?.is_delimiter(Delimiter::RBrace) {
                    loop {
                        self.read_sub_array(listener, data_type, size)?;
                        if !self.tokenizer.consume_if(Delimiter::Comma)? {
                            break
                        }
                    }
                }
                self.expect(Delimiter::RBrace, "list structure")?;
                self.notify(listener.end_array_list_structure(
                    data_type, size, name.as_ref()))?;
            }
            None => {
                trace!("begin {} {}", data_type, pos);
                self.notify(listener.begin_list_structure(data_type, name.as_ref()))?;
                self.read_elements(listener, data_type)?;
                self.expect(Delimiter::RBrace, "list structure")?;
                self.notify(listener.end_list_structure(data_type, name.as_ref()))?;
            }
        }
        trace!("end {} {}", data_type, self.tokenizer.last_pos());
        Ok(())
    }

    fn read_sub_array<L: Listener>(
        &mut self,
        listener: &mut L,
        data_type: DataType,
        size: usize,
    ) -> Result<(), ParseErrorWithPos> {
        let pos = self.tokenizer.pos(0)?;
        self.expect(Delimiter::LBrace, "subarray")?;
        trace!("subarray {}", pos);
        self.notify(listener.begin_sub_array(data_type, size))?;
        let count = self.read_elements(listener, data_type)?;
        if count != size {
            return Err(ParseError::SubarraySizeMismatch {
                expected: size, actual: count
            }.at(pos))
        }
        self.expect(Delimiter::RBrace, "subarray")?;
        self.notify(listener.end_sub_array(data_type, size))
    }

    /// Comma separated values up to (excluding) the closing brace;
    /// returns how many.
    fn read_elements<L: Listener>(&mut self, listener: &mut L, data_type: DataType)
                                  -> Result<usize, ParseErrorWithPos> {
        if self.tokenizer.peek(0)?.is_delimiter(Delimiter::RBrace) {
            return Ok(0)
        }
        let mut count = 0;
        loop {
            let value = self.read_element(data_type)?;
            self.notify(listener.value(value))?;
            count += 1;
            if !self.tokenizer.consume_if(Delimiter::Comma)? {
                return Ok(count)
            }
        }
    }

    fn read_element(&mut self, data_type: DataType) -> Result<Value, ParseErrorWithPos> {
        let pos = self.tokenizer.pos(0)?;
        let token = self.tokenizer.read()?;
        match (data_type.kind(), token) {
            (ValueKind::Bool, Token::Bool(b)) => Ok(Value::Bool(b)),
            (ValueKind::Int, Token::Int(i)) => Ok(Value::Int(i)),
            (ValueKind::Float, Token::Int(i)) => Ok(Value::Float(FloatLiteral::from(&i))),
            (ValueKind::Float, Token::Float(x)) => Ok(Value::Float(x)),
            (ValueKind::String, Token::String(s)) => Ok(Value::String(self.read_string_rest(s)?)),
            (ValueKind::Ref, Token::Name(n)) => Ok(Value::Ref(self.read_ref_rest(n)?)),
            (ValueKind::Type, Token::DataType(t)) => Ok(Value::Type(t)),
            (_, t @ Token::Delimiter(_)) =>
                Err(unexpected(&t, data_type.element_description(), "list structure").at(pos)),
            (_, t) => Err(ParseError::ElementTypeMismatch {
                actual: t.describe(),
                expected: data_type,
            }.at(pos)),
        }
    }

    /// Appends the string literals directly following `first`.
    fn read_string_rest(&mut self, first: StringLiteral)
                        -> Result<StringLiteral, ParseErrorWithPos> {
        let mut s = first;
        loop {
            match self.tokenizer.peek(0)? {
                Token::String(next) => s = s.concat(next),
                _ => return Ok(s)
            }
            self.tokenizer.read()?;
        }
    }

    /// Collects the local names directly following `first`.
    fn read_ref_rest(&mut self, first: Name) -> Result<Ref, ParseErrorWithPos> {
        if first.is_null() {
            return Ok(Ref::null())
        }
        let mut names = vec![first];
        loop {
            let pos = self.tokenizer.pos(0)?;
            match self.tokenizer.peek(0)? {
                Token::Name(n @ Name::Local(_)) => {
                    let n = n.clone();
                    self.tokenizer.read()?;
                    names.push(n);
                }
                t @ Token::Name(_) =>
                    return Err(unexpected(t, "local name", "reference").at(pos)),
                _ => return Ok(Ref::new(names))
            }
        }
    }

    fn read_property_value(&mut self) -> Result<Value, ParseErrorWithPos> {
        let pos = self.tokenizer.pos(0)?;
        match self.tokenizer.read()? {
            Token::Bool(b) => Ok(Value::Bool(b)),
            Token::Int(i) => Ok(Value::Int(i)),
            Token::Float(x) => Ok(Value::Float(x)),
            Token::DataType(t) => Ok(Value::Type(t)),
            Token::String(s) => Ok(Value::String(self.read_string_rest(s)?)),
            Token::Name(n) => Ok(Value::Ref(self.read_ref_rest(n)?)),
            t => Err(unexpected(&t, "property value", "property list").at(pos))
        }
    }

    fn read_properties(&mut self) -> Result<PropertyMap, ParseErrorWithPos> {
        let mut properties = PropertyMap::new();
        if !self.tokenizer.consume_if(Delimiter::LParen)? {
            return Ok(properties)
        }
        if self.tokenizer.consume_if(Delimiter::RParen)? {
            return Ok(properties)
        }
        loop {
            let pos = self.tokenizer.pos(0)?;
            let key = match self.tokenizer.read()? {
                Token::Identifier(key) => key,
                t => return Err(unexpected(&t, "property identifier", "property list")
                                .at(pos))
            };
            self.expect(Delimiter::Equals, "property list")?;
            let value = self.read_property_value()?;
            properties.insert(key, value);
            if !self.tokenizer.consume_if(Delimiter::Comma)? {
                break
            }
        }
        self.expect(Delimiter::RParen, "property list")?;
        Ok(properties)
    }

    fn read_custom_structure<L: Listener>(
        &mut self,
        listener: &mut L,
        identifier: KString,
        pos: Pos,
        depth_fuel: u32,
    ) -> Result<(), ParseErrorWithPos> {
        self.tokenizer.read()?;
        let name = self.read_optional_name()?;
        let properties = self.read_properties()?;
        self.expect(Delimiter::LBrace, "custom structure")?;
        trace!("begin {} {}", identifier, pos);
        self.notify(listener.begin_custom_structure(
            &identifier, name.as_ref(), &properties))?;
        while !self.tokenizer.peek(0)?.is_delimiter(Delimiter::RBrace) {
            self.read_structure(listener, depth_fuel)?;
        }
        self.tokenizer.read()?;
        self.notify(listener.end_custom_structure(
            &identifier, name.as_ref(), &properties))?;
        trace!("end {} {}", identifier, self.tokenizer.last_pos());
        Ok(())
    }
}


#[derive(Error, Debug)]
pub struct ParseErrorWithContext {
    err_with_pos: ParseErrorWithPos,
    container: Box<dyn Context>
}

impl ParseErrorWithContext {
    pub fn err_with_pos(&self) -> &ParseErrorWithPos {
        &self.err_with_pos
    }

    pub fn container(&self) -> &dyn Context {
        &*self.container
    }
}

impl Display for ParseErrorWithContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.write_fmt(format_args!("{} ",
                                 self.err_with_pos.err))?;
        self.container.format_with_pos(self.err_with_pos.pos, f)?;
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ReadFileError {
    /// Opening failed; there is no position yet.
    #[error("{}: {0}", .1.to_string_without_pos())]
    IO(std::io::Error, Box<dyn Context>),
    #[error("{0}")]
    Parse(Box<ParseErrorWithContext>),
}

impl ReadFileError {
    fn io(e: std::io::Error, path: &Path) -> ReadFileError {
        ReadFileError::IO(
            e,
            Box::new(context::FileContext { path: path.to_path_buf() }))
    }

    fn parse(e: ParseErrorWithPos, path: &Path) -> ReadFileError {
        ReadFileError::Parse(Box::new(ParseErrorWithContext {
            err_with_pos: e,
            container: Box::new(context::FileContext { path: path.to_path_buf() })
        }))
    }
}


/// Read UTF-8 encoded input with the default settings.
pub fn read_all<L: Listener>(
    fh: impl Read,
    listener: &mut L,
) -> Result<L::Output, ParseErrorWithPos>
{
    Reader::new(buffered_chars(fh), &DEFAULT_SETTINGS).read(listener)
}

pub fn read_str<L: Listener>(
    s: &str,
    listener: &mut L,
) -> Result<L::Output, ParseErrorWithPos>
{
    Reader::new(s.chars().map(Ok), &DEFAULT_SETTINGS).read(listener)
}

pub fn read_file<L: Listener>(
    path: &Path,
    listener: &mut L,
) -> Result<L::Output, ReadFileError>
{
    let fh = File::open(path).map_err(|e| ReadFileError::io(e, path))?;
    read_all(fh, listener)
        .map_err(|e| ReadFileError::parse(e, path))
}
