// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Where a document came from, for error messages that need more
//! than a position.

use crate::pos::Pos;
use std::{path::PathBuf, fmt::{Formatter, Debug, Display}};

pub trait Context : Debug + Send + Sync {
    /// Location to be put *after* the error reason and a space,
    /// including the leading "in".
    fn format_with_pos(&self, p: Pos, f: &mut Formatter<'_>)
                       -> Result<(), std::fmt::Error>;
    /// Location to be put *before* a colon and the error reason.
    fn format_without_pos(&self, f: &mut Formatter<'_>)
                          -> Result<(), std::fmt::Error>;
    fn to_string_without_pos(&self) -> String {
        format!("{}", &WithoutPos(self))
    }
}

// Formatter::new is not public, so go through Display.
struct WithoutPos<'t, T: Context + ?Sized>(&'t T);

impl<'t, T: Context + ?Sized> Display for WithoutPos<'t, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        self.0.format_without_pos(f)
    }
}

/// Renders as `in "path"@line.col`.
#[derive(Debug)]
pub struct FileContext {
    pub path: PathBuf
}

impl Context for FileContext {
    fn format_with_pos(&self, pos: Pos, f: &mut Formatter<'_>)
                       -> Result<(), std::fmt::Error> {
        f.write_fmt(format_args!("in {:?}{}", &self.path, pos))
    }

    fn format_without_pos(&self, f: &mut Formatter<'_>)
                          -> Result<(), std::fmt::Error> {
        f.write_fmt(format_args!("{:?}", &self.path))
    }
}
