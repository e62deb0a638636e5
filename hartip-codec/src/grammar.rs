//! Byte-layout grammar engine
//!
//! A [`Grammar`] is a directed graph of byte-consuming states, built once
//! per service shape and executed against a [`Source`]. Each state either
//! consumes one typed field into a dotted record path, marks a context
//! sub-record, or does nothing; its successor is a fixed state, a
//! terminal, or a branch on a previously-decoded one-byte field. The
//! branch is what lets a reply grammar stop after the status byte on
//! failure replies without over-reading.

use crate::scalar::ScalarKind;
use crate::source::Source;
use hartip_core::{HartError, HartResult, Record, Value};

/// What a state does when entered
#[derive(Debug, Clone)]
pub enum Op {
    /// Consume one scalar field and store it at the dotted path
    Consume { kind: ScalarKind, path: String },
    /// Ensure an empty sub-record exists at the path, marking the
    /// record with a service context tag; never overwrites
    Mark { path: String },
    /// Consume nothing
    Nop,
}

/// Where execution goes after a state's op
#[derive(Debug, Clone)]
pub enum Next {
    /// Unconditional transition
    To(usize),
    /// Branch on a previously-decoded one-byte field
    Branch {
        field: String,
        equals: u8,
        then: usize,
        otherwise: usize,
    },
    /// Grammar complete
    Terminal,
}

/// One node of the state graph
#[derive(Debug, Clone)]
pub struct State {
    pub op: Op,
    pub next: Next,
}

/// A compiled byte-layout grammar
#[derive(Debug, Clone)]
pub struct Grammar {
    name: &'static str,
    states: Vec<State>,
}

impl Grammar {
    /// Build a grammar, validating that every transition target exists
    pub fn new(name: &'static str, states: Vec<State>) -> HartResult<Self> {
        if states.is_empty() {
            return Err(HartError::Internal(format!("grammar {name} has no states")));
        }
        for (index, state) in states.iter().enumerate() {
            let dangling = match &state.next {
                Next::To(n) if *n >= states.len() => Some(*n),
                Next::Branch { then, .. } if *then >= states.len() => Some(*then),
                Next::Branch { otherwise, .. } if *otherwise >= states.len() => Some(*otherwise),
                _ => None,
            };
            if let Some(target) = dangling {
                return Err(HartError::Internal(format!(
                    "grammar {name} state {index} targets missing state {target}"
                )));
            }
        }
        Ok(Self { name, states })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Run the grammar against a byte source, populating the record
    ///
    /// Decoded fields are written at their dotted paths as they are
    /// consumed; on error the record keeps everything decoded so far and
    /// the error carries the source's diagnostic context.
    pub fn run(&self, source: &mut Source<'_>, record: &mut Record) -> HartResult<()> {
        let mut index = 0;
        // The graphs built here are acyclic; a step budget turns any
        // accidental cycle into an error instead of a hang.
        let mut budget = self.states.len() + 1;
        loop {
            if budget == 0 {
                return Err(HartError::Internal(format!(
                    "grammar {} did not terminate",
                    self.name
                )));
            }
            budget -= 1;

            let state = &self.states[index];
            match &state.op {
                Op::Consume { kind, path } => {
                    let value = kind.decode(source).map_err(|err| {
                        HartError::Decode(format!(
                            "{}: {} while decoding {}\n{}",
                            self.name,
                            err,
                            path,
                            source.context()
                        ))
                    })?;
                    record.insert_path(path, value);
                }
                Op::Mark { path } => {
                    if record.get_path(path).is_none() {
                        record.insert_path(path, Value::Record(Record::new()));
                    }
                }
                Op::Nop => {}
            }

            match &state.next {
                Next::To(n) => index = *n,
                Next::Terminal => return Ok(()),
                Next::Branch {
                    field,
                    equals,
                    then,
                    otherwise,
                } => {
                    let value = record
                        .get_path(field)
                        .and_then(Value::as_usint)
                        .ok_or_else(|| {
                            HartError::FieldMissing(format!(
                                "{}: branch field {} not decoded",
                                self.name, field
                            ))
                        })?;
                    index = if value == *equals { *then } else { *otherwise };
                }
            }
        }
    }
}
