//! Typed field codec and byte-layout grammar engine
//!
//! This crate provides the wire-level building blocks of the HART
//! interface object:
//!
//! - [`scalar`]: fixed-width CIP scalar encoding/decoding (USINT, REAL)
//! - [`source`]: a resumable byte source that remembers what it consumed,
//!   for parse diagnostics
//! - [`grammar`]: a state-graph interpreter that decodes a byte stream
//!   into a structured record, with conditional branching on
//!   previously-decoded fields

pub mod grammar;
pub mod scalar;
pub mod source;

pub use grammar::{Grammar, Next, Op, State};
pub use scalar::{CipEncoder, ScalarKind};
pub use source::Source;
