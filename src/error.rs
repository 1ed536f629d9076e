//! Error types for the conversion pass.
//!
//! Policy contract violations are bugs and panic inside the converter. The
//! types here cover what a calling pipeline can report: bad configuration and
//! a graph that fails verification after conversion.

use derive_more::{Display, Error, From};
use legalize_ir::{OpRef, ValidationReport};

#[derive(Debug, Display, Error, From)]
pub enum ConvertError {
    #[display("graph is structurally invalid after conversion: {_0}")]
    Invalid(ValidationReport),

    #[display("{_0}")]
    Illegal(#[error(not(source))] IllegalSlot),
}

/// A slot left at a type other than the one the policy requires.
#[derive(Clone, Debug, PartialEq, Eq, Display)]
pub enum IllegalSlot {
    #[display("operand #{index} of {op} is {actual}, policy requires {expected}")]
    Input {
        op: OpRef,
        index: u32,
        actual: String,
        expected: String,
    },

    #[display("result #{index} of {op} is {actual}, policy requires {expected}")]
    Output {
        op: OpRef,
        index: u32,
        actual: String,
        expected: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Display, Error)]
pub enum ConfigError {
    #[display("invalid type name `{_0}`: expected `dialect.name`")]
    InvalidTypeName(#[error(not(source))] String),

    #[display("source and target precision are both `{_0}`")]
    SameType(#[error(not(source))] String),
}
