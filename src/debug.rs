// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Utilities for debugging the oddl library: a listener that records
//! every call, with a one-line-per-event textual form.

use crate::listener::Listener;
use crate::properties::PropertyMap;
use crate::value::{DataType, Name, Value};
use anyhow::Result;
use kstring::KString;
use std::fmt::{Display, Formatter};
use std::io::Write;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Begin,
    End,
    Value(Value),
    BeginListStructure(DataType, Option<Name>),
    EndListStructure(DataType, Option<Name>),
    BeginArrayListStructure(DataType, usize, Option<Name>),
    EndArrayListStructure(DataType, usize, Option<Name>),
    BeginSubArray(DataType, usize),
    EndSubArray(DataType, usize),
    BeginCustomStructure(KString, Option<Name>, PropertyMap),
    EndCustomStructure(KString, Option<Name>),
}

fn write_name(name: &Option<Name>, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
    match name {
        Some(n) => f.write_fmt(format_args!(" {}", n)),
        None => Ok(())
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Event::Begin => f.write_str("begin"),
            Event::End => f.write_str("end"),
            Event::Value(v) => f.write_fmt(format_args!("value {}", v)),
            Event::BeginListStructure(t, n) => {
                f.write_fmt(format_args!("begin list {}", t))?;
                write_name(n, f)
            }
            Event::EndListStructure(t, n) => {
                f.write_fmt(format_args!("end list {}", t))?;
                write_name(n, f)
            }
            Event::BeginArrayListStructure(t, size, n) => {
                f.write_fmt(format_args!("begin array list {}[{}]", t, size))?;
                write_name(n, f)
            }
            Event::EndArrayListStructure(t, size, n) => {
                f.write_fmt(format_args!("end array list {}[{}]", t, size))?;
                write_name(n, f)
            }
            Event::BeginSubArray(t, size) =>
                f.write_fmt(format_args!("begin subarray {}[{}]", t, size)),
            Event::EndSubArray(t, size) =>
                f.write_fmt(format_args!("end subarray {}[{}]", t, size)),
            Event::BeginCustomStructure(id, n, props) => {
                f.write_fmt(format_args!("begin {}", id))?;
                write_name(n, f)?;
                if !props.is_empty() {
                    f.write_fmt(format_args!(" {}", props))?;
                }
                Ok(())
            }
            Event::EndCustomStructure(id, n) => {
                f.write_fmt(format_args!("end {}", id))?;
                write_name(n, f)
            }
        }
    }
}

/// Records events; `end` hands them over.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> EventLog {
        EventLog::default()
    }
}

impl Listener for EventLog {
    type Output = Vec<Event>;

    fn begin(&mut self) -> Result<()> {
        self.events.push(Event::Begin);
        Ok(())
    }

    fn end(&mut self) -> Result<Vec<Event>> {
        self.events.push(Event::End);
        Ok(std::mem::take(&mut self.events))
    }

    fn value(&mut self, value: Value) -> Result<()> {
        self.events.push(Event::Value(value));
        Ok(())
    }

    fn begin_list_structure(&mut self, data_type: DataType, name: Option<&Name>) -> Result<()> {
        self.events.push(Event::BeginListStructure(data_type, name.cloned()));
        Ok(())
    }

    fn end_list_structure(&mut self, data_type: DataType, name: Option<&Name>) -> Result<()> {
        self.events.push(Event::EndListStructure(data_type, name.cloned()));
        Ok(())
    }

    fn begin_array_list_structure(
        &mut self, data_type: DataType, subarray_size: usize, name: Option<&Name>
    ) -> Result<()> {
        self.events.push(Event::BeginArrayListStructure(data_type, subarray_size, name.cloned()));
        Ok(())
    }

    fn end_array_list_structure(
        &mut self, data_type: DataType, subarray_size: usize, name: Option<&Name>
    ) -> Result<()> {
        self.events.push(Event::EndArrayListStructure(data_type, subarray_size, name.cloned()));
        Ok(())
    }

    fn begin_sub_array(&mut self, data_type: DataType, subarray_size: usize) -> Result<()> {
        self.events.push(Event::BeginSubArray(data_type, subarray_size));
        Ok(())
    }

    fn end_sub_array(&mut self, data_type: DataType, subarray_size: usize) -> Result<()> {
        self.events.push(Event::EndSubArray(data_type, subarray_size));
        Ok(())
    }

    fn begin_custom_structure(
        &mut self, identifier: &str, name: Option<&Name>, properties: &PropertyMap
    ) -> Result<()> {
        self.events.push(Event::BeginCustomStructure(
            KString::from_ref(identifier), name.cloned(), properties.clone()));
        Ok(())
    }

    fn end_custom_structure(
        &mut self, identifier: &str, name: Option<&Name>, _properties: &PropertyMap
    ) -> Result<()> {
        self.events.push(Event::EndCustomStructure(
            KString::from_ref(identifier), name.cloned()));
        Ok(())
    }
}

/// One event per line.
pub fn write_events<'t>(
    out: impl Write,
    events: impl IntoIterator<Item = &'t Event>
) -> Result<(), std::io::Error> {
    let mut out = out; // for `File`
    for e in events.into_iter() {
        writeln!(out, "{}", e)?;
    }
    Ok(())
}
