// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The character level of the reader: wraps a character iterator,
//! collapses `\r\n` and lone `\r` into `\n`, keeps track of the
//! line/column, and offers a small lookahead window.

use crate::pos::Pos;
use std::collections::VecDeque;
use std::io;

/// How many characters `peek` can look ahead (`peek(0)` to
/// `peek(CHAR_LOOKAHEAD - 1)`). Enough for `0x`-style prefixes and
/// `//`, `/*` comment starts; deeper lookahead is done on the token
/// level.
pub const CHAR_LOOKAHEAD: usize = 3;

pub struct CharSource<I> {
    chars: I,
    /// Already normalized characters; `None` marks the end of input.
    queue: VecDeque<Option<char>>,
    /// One raw character read past a `\r` that wasn't `\n`.
    pushback: Option<char>,
    exhausted: bool,
    line: u32,
    /// Characters consumed on the current line.
    col: u32,
    /// Set after reading `\n`, applied by the next `read`.
    pending_newline: bool,
    last: Pos,
}

impl<I> CharSource<I>
    where I: Iterator<Item = io::Result<char>>
{
    pub fn new(chars: I) -> Self {
        CharSource {
            chars,
            queue: VecDeque::with_capacity(CHAR_LOOKAHEAD),
            pushback: None,
            exhausted: false,
            line: 1,
            col: 0,
            pending_newline: false,
            last: Pos { line: 1, col: 1 },
        }
    }

    fn next_raw(&mut self) -> io::Result<Option<char>> {
        if let Some(c) = self.pushback.take() {
            return Ok(Some(c))
        }
        if self.exhausted {
            // The underlying iterator may not be fused.
            return Ok(None)
        }
        match self.chars.next() {
            Some(Ok(c)) => Ok(Some(c)),
            Some(Err(e)) => {
                self.exhausted = true;
                Err(e)
            }
            None => {
                self.exhausted = true;
                Ok(None)
            }
        }
    }

    fn next_normalized(&mut self) -> io::Result<Option<char>> {
        match self.next_raw()? {
            Some('\r') => {
                match self.next_raw()? {
                    Some('\n') | None => {}
                    Some(c) => self.pushback = Some(c),
                }
                Ok(Some('\n'))
            }
            c => Ok(c)
        }
    }

    /// The character `ahead` positions after the read position
    /// (0 is the next character), `None` past the end of input.
    pub fn peek(&mut self, ahead: usize) -> io::Result<Option<char>> {
        debug_assert!(ahead < CHAR_LOOKAHEAD,
                      "character lookahead {} exceeds window", ahead);
        while self.queue.len() <= ahead {
            let c = self.next_normalized()?;
            self.queue.push_back(c);
        }
        Ok(self.queue[ahead])
    }

    /// Consume the next character. Returns `None` at the end of input
    /// (repeatedly).
    pub fn read(&mut self) -> io::Result<Option<char>> {
        if self.pending_newline {
            self.pending_newline = false;
            self.line += 1;
            self.col = 0;
        }
        let c = match self.queue.pop_front() {
            Some(c) => c,
            None => self.next_normalized()?,
        };
        match c {
            Some('\n') => {
                self.pending_newline = true;
                self.last = Pos { line: self.line, col: self.col + 1 };
            }
            Some(_) => {
                self.col += 1;
                self.last = Pos { line: self.line, col: self.col };
            }
            None => {}
        }
        Ok(c)
    }

    /// Line of the most recently consumed character. A consumed
    /// newline still counts to the line it ends.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Number of characters consumed on the current line.
    pub fn col(&self) -> u32 {
        self.col
    }

    /// Position of the next character (the one `peek(0)` returns).
    pub fn next_pos(&self) -> Pos {
        if self.pending_newline {
            Pos { line: self.line + 1, col: 1 }
        } else {
            Pos { line: self.line, col: self.col + 1 }
        }
    }

    /// Position of the most recently consumed character.
    pub fn last_pos(&self) -> Pos {
        self.last
    }
}
