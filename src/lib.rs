// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! This is a streaming reader for OpenDDL (Open Data Description
//! Language) with the following goals:
//!
//! * Offering direct access to the tokenizer, `oddl::parse`, as well
//!   as the structure level, `oddl::read`, which reports what it
//!   finds to a `oddl::listener::Listener` instead of building a
//!   tree. Collecting a tree, a lookup table or application objects
//!   is up to the listener.
//!
//! * Good error reporting (precise location information and
//!   messages).
//!
//! * Streaming: input is consumed lazily from any `Read` (or any
//!   iterator of characters), with only a few characters and tokens
//!   of lookahead held in memory.
//!
//! All literal forms of the format are decoded: decimal, hex, octal,
//! binary and character integer literals (with `_` separators),
//! floats, and strings with their escapes. Name references are not
//! resolved, and integers are not checked against the width of the
//! data type they appear under.
//!
//! Reading a file into a list of events:
//!
//! ```no_run
//! use oddl::debug::EventLog;
//! use oddl::read::read_file;
//! # fn main() -> anyhow::Result<()> {
//! let events = read_file("scene.oddl".as_ref(), &mut EventLog::new())?;
//! for e in &events {
//!     println!("{}", e);
//! }
//! # Ok(())
//! # }
//! ```

pub mod buffered_chars;
pub mod char_source;
pub mod context;
pub mod debug;
pub mod listener;
pub mod number;
pub mod parse;
pub mod pos;
pub mod properties;
pub mod read;
pub mod settings;
pub mod token;
pub mod value;
