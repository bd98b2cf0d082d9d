// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use oddl::pos::Pos;
use oddl::buffered_chars::buffered_chars;
use oddl::debug::{EventLog, write_events};
use oddl::parse::Tokenizer;
use oddl::read::read_file;
use oddl::settings::DEFAULT_SETTINGS;
use oddl::token::{Delimiter, Token, TokenWithPos};
use clap::Parser as ClapParser;
use std::io::{stdout, BufWriter};
use std::path::PathBuf;
use anyhow::{Result, bail};


fn indentstr(i: usize) -> Option<&'static str> {
    "                                                                  ".get(0..i)
}

#[derive(clap::Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Run the structure reader and print its events (default:
    /// stream tokens)
    #[clap(short, long, value_parser)]
    events: bool,
    /// Print the tokens (without --events)
    #[clap(long, value_parser)]
    print: bool,
    /// Show the token position (only with --print)
    #[clap(long, value_parser)]
    pos: bool,
    /// Path to the input file
    #[clap(value_parser, required(true))]
    input_path: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.events {

        let events = read_file(&args.input_path, &mut EventLog::new())?;
        write_events(BufWriter::new(stdout()), &events)?;

    } else {

        // Only check that braces balance; everything else is left
        // to the structure reader.

        let fh = std::fs::File::open(&args.input_path)?;
        let ts = Tokenizer::new(buffered_chars(fh), &DEFAULT_SETTINGS);
        let mut count_tokens = 0;
        let mut count_toplevel = 0;
        let mut bracestack: Vec<Pos> = Vec::new();
        for te in ts {
            let TokenWithPos(token, pos) = te?;
            count_tokens += 1;
            let indentlevel;
            match token {
                Token::Delimiter(Delimiter::LBrace) => {
                    if bracestack.is_empty() {
                        count_toplevel += 1;
                    }
                    indentlevel = bracestack.len();
                    bracestack.push(pos);
                }
                Token::Delimiter(Delimiter::RBrace) => {
                    if bracestack.pop().is_none() {
                        bail!("unexpected '}}' at {:?}{}", args.input_path, pos)
                    }
                    indentlevel = bracestack.len();
                }
                _ => {
                    indentlevel = bracestack.len();
                }
            }
            if args.print {
                if let Some(indent) = indentstr(indentlevel) {
                    if args.pos {
                        println!("{indent}{pos} {token}");
                    } else {
                        println!("{indent}{token}");
                    }
                } else {
                    bail!("structures nested too deeply at {:?}{}", args.input_path, pos)
                }
            }
        }
        if let Some(pos) = bracestack.last() {
            bail!("'{{' at {:?}{} is never closed", args.input_path, pos)
        }
        println!("// count_tokens = {count_tokens}, count_toplevel = {count_toplevel}");

    }
    Ok(())
}
