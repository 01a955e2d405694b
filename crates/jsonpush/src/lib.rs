//! An incremental, byte-level JSON parser in push mode: callers feed input in
//! arbitrary-sized chunks through [`Parser::write_some`] and a [`Handler`]
//! receives the resulting event stream. Parsing suspends at any byte boundary
//! and resumes on the next call, so chunks may be sliced anywhere, including
//! mid-escape, mid-number, or mid-UTF-8-sequence.

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod parser;

pub use parser::{Error, Handler, ParseOptions, Parser};
