// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Decode characters from anything implementing `Read`.

//! Position tracking and line ending normalization are not done here,
//! see [char_source](../char_source/index.html).

/// TODO: This uses genawaiter, find out if that is a performance
/// bottleneck.

use std::io::{self, Read};
use utf8::{BufReadDecoder, BufReadDecoderError};
use genawaiter::rc::Gen;


/// Invalid UTF-8 is reported as an `io::ErrorKind::InvalidData`
/// error. The iterator ends after the first error.
pub fn buffered_chars<R>(
    fh: R
) -> impl Iterator<Item=io::Result<char>>
    where R: Read
{
    Gen::new(|co| async move {
        let mut inp = BufReadDecoder::new(io::BufReader::new(fh));
        loop {
            if let Some(r) = inp.next_strict() {
                match r {
                    Ok(x) => {
                        for c in x.chars() {
                            co.yield_(Ok(c)).await;
                        }
                    },
                    Err(e) => {
                        let e = match e {
                            BufReadDecoderError::Io(e) => e,
                            e => io::Error::new(io::ErrorKind::InvalidData,
                                                e.to_string()),
                        };
                        co.yield_(Err(e)).await;
                        return;
                    }
                }
            } else {
                return;
            }
        }
    }).into_iter()
}
