//! Structural validation for graphs.
//!
//! Checks the invariants a rewrite must leave behind:
//!
//! 1. **No dangling references**: every operand of an attached operation
//!    refers to a value whose producer is attached (not detached, not erased).
//! 2. **Use-chain consistency**: the use-chains stored in the graph exactly
//!    match the operand lists of all live operations.
//! 3. **Unique attachment**: no operation appears twice in the iteration order.

use std::collections::HashSet;
use std::fmt;

use derive_more::{Display, Error};

use crate::graph::{Graph, Use};
use crate::refs::{OpRef, ValueRef};

/// A single structural violation.
#[derive(Clone, Debug, PartialEq, Eq, Display, Error)]
pub enum ValidationError {
    #[display("operand #{index} of {user} references {value} of erased {producer}")]
    ErasedProducer {
        user: OpRef,
        index: u32,
        value: ValueRef,
        producer: OpRef,
    },

    #[display("operand #{index} of {user} references {value} of detached {producer}")]
    DetachedProducer {
        user: OpRef,
        index: u32,
        value: ValueRef,
        producer: OpRef,
    },

    #[display("use-chain of {value} is missing operand #{index} of {user}")]
    MissingUse {
        user: OpRef,
        index: u32,
        value: ValueRef,
    },

    #[display("use-chain of {value} lists operand #{index} of {user}, which does not reference it")]
    StaleUse {
        user: OpRef,
        index: u32,
        value: ValueRef,
    },

    #[display("{op} appears more than once in the iteration order")]
    DuplicateOp { op: OpRef },
}

/// All violations found by [`verify`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} structural error(s) found:", self.errors.len())?;
        for err in &self.errors {
            writeln!(f, "  - {err}")?;
        }
        Ok(())
    }
}

/// Verify the structural invariants of `graph`.
pub fn verify(graph: &Graph) -> Result<(), ValidationReport> {
    let mut errors = Vec::new();

    let mut seen = HashSet::new();
    for &op in graph.ops() {
        if !seen.insert(op) {
            errors.push(ValidationError::DuplicateOp { op });
            continue;
        }
        check_operands(graph, op, &mut errors);
    }

    check_use_chains(graph, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationReport { errors })
    }
}

fn check_operands(graph: &Graph, user: OpRef, errors: &mut Vec<ValidationError>) {
    for (idx, &value) in graph.op_operands(user).iter().enumerate() {
        let index = idx as u32;
        let producer = graph.value_def(value).op;
        if !graph.is_live(producer) {
            errors.push(ValidationError::ErasedProducer {
                user,
                index,
                value,
                producer,
            });
        } else if !graph.is_attached(producer) {
            errors.push(ValidationError::DetachedProducer {
                user,
                index,
                value,
                producer,
            });
        }

        let expected = Use {
            user,
            operand_index: index,
        };
        if !graph.uses(value).contains(&expected) {
            errors.push(ValidationError::MissingUse { user, index, value });
        }
    }
}

fn check_use_chains(graph: &Graph, errors: &mut Vec<ValidationError>) {
    for value in graph.all_values() {
        for u in graph.uses(value) {
            let operands = graph.op_operands(u.user);
            let references = graph.is_live(u.user)
                && operands.get(u.operand_index as usize) == Some(&value);
            if !references {
                errors.push(ValidationError::StaleUse {
                    user: u.user,
                    index: u.operand_index,
                    value,
                });
            }
        }
    }
}
