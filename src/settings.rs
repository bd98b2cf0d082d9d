// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Settings for reading.

#[derive(Debug, Clone)]
pub struct Settings {
    /// Initial size of the token lookahead queue; it grows when
    /// deeper lookahead is requested.
    pub token_lookahead: usize,
    /// How many custom structures may be nested inside each other.
    pub max_nesting: u32,
}

pub const DEFAULT_SETTINGS : Settings = Settings {
    token_lookahead: 3,
    max_nesting: 500, // the limit with default settings on Linux is around 1200
};

impl Default for Settings {
    fn default() -> Self {
        DEFAULT_SETTINGS
    }
}
