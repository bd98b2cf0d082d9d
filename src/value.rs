// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Data types, names, references and literal values as they are
//! handed to a [Listener](../listener/trait.Listener.html).

//! Literals keep both their decoded value and their source text
//! (`text`); the text re-lexes to the same value, although not
//! necessarily in the same spelling after string concatenation.

use crate::number::IntFormat;
use std::fmt::{Display, Write};
use kstring::KString;

/// Which kind of literal a list of a given data type holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    String,
    Ref,
    Type,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Half,
    Float,
    Double,
    String,
    Ref,
    Type,
}

impl DataType {
    pub const ALL: [DataType; 15] = [
        DataType::Bool,
        DataType::Int8, DataType::Int16, DataType::Int32, DataType::Int64,
        DataType::UInt8, DataType::UInt16, DataType::UInt32, DataType::UInt64,
        DataType::Half, DataType::Float, DataType::Double,
        DataType::String, DataType::Ref, DataType::Type,
    ];

    /// Resolve a keyword in either its long or short spelling.
    pub fn from_keyword(s: &str) -> Option<DataType> {
        match s {
            "bool" | "b" => Some(DataType::Bool),
            "int8" | "i8" => Some(DataType::Int8),
            "int16" | "i16" => Some(DataType::Int16),
            "int32" | "i32" => Some(DataType::Int32),
            "int64" | "i64" => Some(DataType::Int64),
            "unsigned_int8" | "u8" => Some(DataType::UInt8),
            "unsigned_int16" | "u16" => Some(DataType::UInt16),
            "unsigned_int32" | "u32" => Some(DataType::UInt32),
            "unsigned_int64" | "u64" => Some(DataType::UInt64),
            "half" | "float16" | "h" | "f16" => Some(DataType::Half),
            "float" | "float32" | "f" | "f32" => Some(DataType::Float),
            "double" | "float64" | "d" | "f64" => Some(DataType::Double),
            "string" | "s" => Some(DataType::String),
            "ref" | "r" => Some(DataType::Ref),
            "type" | "t" => Some(DataType::Type),
            _ => None
        }
    }

    /// The long spelling.
    pub fn name(self) -> &'static str {
        match self {
            DataType::Bool => "bool",
            DataType::Int8 => "int8",
            DataType::Int16 => "int16",
            DataType::Int32 => "int32",
            DataType::Int64 => "int64",
            DataType::UInt8 => "unsigned_int8",
            DataType::UInt16 => "unsigned_int16",
            DataType::UInt32 => "unsigned_int32",
            DataType::UInt64 => "unsigned_int64",
            DataType::Half => "half",
            DataType::Float => "float",
            DataType::Double => "double",
            DataType::String => "string",
            DataType::Ref => "ref",
            DataType::Type => "type",
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            DataType::Bool => "b",
            DataType::Int8 => "i8",
            DataType::Int16 => "i16",
            DataType::Int32 => "i32",
            DataType::Int64 => "i64",
            DataType::UInt8 => "u8",
            DataType::UInt16 => "u16",
            DataType::UInt32 => "u32",
            DataType::UInt64 => "u64",
            DataType::Half => "h",
            DataType::Float => "f",
            DataType::Double => "d",
            DataType::String => "s",
            DataType::Ref => "r",
            DataType::Type => "t",
        }
    }

    /// Width of numeric types, `None` for the others.
    pub fn bits(self) -> Option<u32> {
        match self {
            DataType::Int8 | DataType::UInt8 => Some(8),
            DataType::Int16 | DataType::UInt16 | DataType::Half => Some(16),
            DataType::Int32 | DataType::UInt32 | DataType::Float => Some(32),
            DataType::Int64 | DataType::UInt64 | DataType::Double => Some(64),
            _ => None
        }
    }

    pub fn is_unsigned(self) -> bool {
        matches!(self,
                 DataType::UInt8 | DataType::UInt16 |
                 DataType::UInt32 | DataType::UInt64)
    }

    pub fn kind(self) -> ValueKind {
        match self {
            DataType::Bool => ValueKind::Bool,
            DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 |
            DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64
                => ValueKind::Int,
            DataType::Half | DataType::Float | DataType::Double => ValueKind::Float,
            DataType::String => ValueKind::String,
            DataType::Ref => ValueKind::Ref,
            DataType::Type => ValueKind::Type,
        }
    }

    /// What a list of this type accepts, for error messages.
    pub fn element_description(self) -> &'static str {
        match self.kind() {
            ValueKind::Bool => "bool literal",
            ValueKind::Int => "integer literal",
            ValueKind::Float => "float or integer literal",
            ValueKind::String => "string literal",
            ValueKind::Ref => "reference",
            ValueKind::Type => "data type",
        }
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        f.write_str(self.name())
    }
}

/// `$foo` (global), `%foo` (local), or `null`. The payload excludes
/// the sigil.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Name {
    Global(KString),
    Local(KString),
    Null,
}

impl Name {
    pub fn is_global(&self) -> bool {
        matches!(self, Name::Global(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Name::Null)
    }

    /// The identifier without sigil; `None` for `null`.
    pub fn ident(&self) -> Option<&str> {
        match self {
            Name::Global(s) | Name::Local(s) => Some(s.as_str()),
            Name::Null => None,
        }
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        match self {
            Name::Global(s) => f.write_fmt(format_args!("${}", s)),
            Name::Local(s) => f.write_fmt(format_args!("%{}", s)),
            Name::Null => f.write_str("null"),
        }
    }
}

/// A chain of names: the first may be global, the rest are
/// local. Empty for the `null` reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Ref {
    names: Vec<Name>,
}

impl Ref {
    pub fn null() -> Ref {
        Ref { names: Vec::new() }
    }

    pub fn new(names: Vec<Name>) -> Ref {
        Ref { names }
    }

    pub fn names(&self) -> &[Name] {
        &self.names
    }

    pub fn is_null(&self) -> bool {
        self.names.is_empty()
    }
}

impl Display for Ref {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        if self.names.is_empty() {
            return f.write_str("null")
        }
        for n in &self.names {
            n.fmt(f)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IntLiteral {
    pub text: KString,
    pub value: i64,
    pub format: IntFormat,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloatLiteral {
    pub text: KString,
    pub value: f64,
}

impl From<&IntLiteral> for FloatLiteral {
    fn from(i: &IntLiteral) -> FloatLiteral {
        FloatLiteral {
            text: i.text.clone(),
            value: i.value as f64,
        }
    }
}

/// `text` is the raw source including quotes and escapes.
///
/// `value` is always valid Unicode: a `\u` high surrogate escape
/// must be directly followed by a `\u` low surrogate escape, the two
/// decoding to one character. A lone surrogate is rejected with
/// `ParseError::InvalidCodePoint`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StringLiteral {
    pub text: KString,
    pub value: KString,
}

impl StringLiteral {
    /// Appends another literal (adjacent literals form one string).
    pub fn concat(&self, other: &StringLiteral) -> StringLiteral {
        let mut text = String::with_capacity(self.text.len() + other.text.len());
        text.push_str(&self.text);
        text.push_str(&other.text);
        let mut value = String::with_capacity(self.value.len() + other.value.len());
        value.push_str(&self.value);
        value.push_str(&other.value);
        StringLiteral {
            text: KString::from_string(text),
            value: KString::from_string(value),
        }
    }
}

/// A scalar inside a list, or a property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(IntLiteral),
    Float(FloatLiteral),
    String(StringLiteral),
    Ref(Ref),
    Type(DataType),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Ref(_) => ValueKind::Ref,
            Value::Type(_) => ValueKind::Type,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Bool(b) = self { Some(*b) } else { None }
    }

    pub fn as_int(&self) -> Option<i64> {
        if let Value::Int(i) = self { Some(i.value) } else { None }
    }

    /// Integers are converted.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(x.value),
            Value::Int(i) => Some(i.value as f64),
            _ => None
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        if let Value::String(s) = self { Some(s.value.as_str()) } else { None }
    }

    pub fn as_reference(&self) -> Option<&Ref> {
        if let Value::Ref(r) = self { Some(r) } else { None }
    }

    pub fn as_data_type(&self) -> Option<DataType> {
        if let Value::Type(t) = self { Some(*t) } else { None }
    }
}

/// Writes decoded values: strings quoted with Rust escaping, floats
/// always with a fractional part.
impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        match self {
            Value::Bool(b) => f.write_str(if *b { "true" } else { "false" }),
            Value::Int(i) => f.write_fmt(format_args!("{}", i.value)),
            Value::Float(x) => f.write_fmt(format_args!("{:?}", x.value)),
            Value::String(s) => {
                f.write_char('"')?;
                for c in s.value.chars() {
                    f.write_fmt(format_args!("{}", c.escape_debug()))?;
                }
                f.write_char('"')
            }
            Value::Ref(r) => r.fmt(f),
            Value::Type(t) => t.fmt(f),
        }
    }
}
