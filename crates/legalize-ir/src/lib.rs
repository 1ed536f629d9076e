//! Arena-based dataflow graph for type legalization.
//!
//! Operations, values and types live in `cranelift-entity` arenas owned by a
//! [`Graph`]. Values are referenced by `ValueRef` handles; the graph keeps a
//! use-chain per value so that "replace all uses" is an explicit operation
//! over the consumer list rather than a pointer-chasing side effect.

pub mod graph;
pub mod printer;
pub mod refs;
pub mod symbol;
pub mod types;
pub mod validation;

pub use graph::{Graph, OperationData, OperationDataBuilder, Use, ValueData};
pub use printer::{print_graph, print_op, print_type};
pub use refs::{OpRef, TypeRef, ValueDef, ValueRef};
pub use symbol::Symbol;
pub use types::{Attribute, TypeData, TypeDataBuilder, TypeInterner};
pub use validation::{ValidationError, ValidationReport, verify};
