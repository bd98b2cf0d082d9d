// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The receiving end of [Reader::read](../read/struct.Reader.html#method.read).

//! Events arrive in document order. `begin_*`/`end_*` calls are
//! properly nested; for list structures `value` is called once per
//! element between the two. Any method may reject the input by
//! returning an error, which aborts reading and is handed to the
//! caller as `ParseError::Format`.

use crate::properties::PropertyMap;
use crate::value::{DataType, Name, Value};
use anyhow::Result;

pub trait Listener {
    /// What a successful read returns.
    type Output;

    fn begin(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called after the last structure; its result becomes the
    /// result of the read.
    fn end(&mut self) -> Result<Self::Output>;

    fn value(&mut self, _value: Value) -> Result<()> {
        Ok(())
    }

    fn begin_list_structure(
        &mut self, _data_type: DataType, _name: Option<&Name>
    ) -> Result<()> {
        Ok(())
    }

    fn end_list_structure(
        &mut self, _data_type: DataType, _name: Option<&Name>
    ) -> Result<()> {
        Ok(())
    }

    fn begin_array_list_structure(
        &mut self, _data_type: DataType, _subarray_size: usize, _name: Option<&Name>
    ) -> Result<()> {
        Ok(())
    }

    fn end_array_list_structure(
        &mut self, _data_type: DataType, _subarray_size: usize, _name: Option<&Name>
    ) -> Result<()> {
        Ok(())
    }

    fn begin_sub_array(
        &mut self, _data_type: DataType, _subarray_size: usize
    ) -> Result<()> {
        Ok(())
    }

    fn end_sub_array(
        &mut self, _data_type: DataType, _subarray_size: usize
    ) -> Result<()> {
        Ok(())
    }

    fn begin_custom_structure(
        &mut self, _identifier: &str, _name: Option<&Name>, _properties: &PropertyMap
    ) -> Result<()> {
        Ok(())
    }

    fn end_custom_structure(
        &mut self, _identifier: &str, _name: Option<&Name>, _properties: &PropertyMap
    ) -> Result<()> {
        Ok(())
    }
}
