//! Type legalization over a dataflow graph.
//!
//! A [`FunctionConverter`] walks a [`Graph`](legalize_ir::Graph) once and, for
//! each node its [`ConversionPolicy`] accepts, casts inputs to the types the
//! policy asks for, retypes outputs and inserts conversions back for their
//! existing consumers. The policy then gets to morph and post-process the node,
//! and finally to clean up every conversion the run inserted.
//!
//! ```
//! use legalize::{FunctionConverter, PrecisionConfig, PrecisionPolicy};
//! use legalize_ir::{Graph, OperationDataBuilder, print_graph};
//!
//! let mut graph = Graph::new();
//! let f32_ty = graph.types.scalar("core", "f32");
//! let input = OperationDataBuilder::new("test", "input")
//!     .result(f32_ty)
//!     .push(&mut graph);
//! let x = graph.op_result(input, 0);
//! let relu = OperationDataBuilder::new("test", "relu")
//!     .operand(x)
//!     .result(f32_ty)
//!     .push(&mut graph);
//! let y = graph.op_result(relu, 0);
//! OperationDataBuilder::new("test", "output")
//!     .operand(y)
//!     .push(&mut graph);
//!
//! let config = PrecisionConfig {
//!     skip_ops: vec!["test.input".into(), "test.output".into()],
//!     ..PrecisionConfig::default()
//! };
//! let policy = PrecisionPolicy::new(&mut graph, &config).unwrap();
//! FunctionConverter::new(&mut graph, policy).convert();
//!
//! assert_eq!(
//!     print_graph(&graph),
//!     "%0 = test.input : core.f32\n\
//!      %1 = core.convert %0 : core.f16\n\
//!      %2 = test.relu %1 : core.f16\n\
//!      %3 = core.convert %2 : core.f32\n\
//!      test.output %3\n"
//! );
//! ```

pub mod cleanup;
pub mod converter;
pub mod error;
pub mod ledger;
pub mod policy;
pub mod precision;

pub use cleanup::CleanupStats;
pub use converter::{ConvertOutcome, ConvertStats, FunctionConverter};
pub use error::{ConfigError, ConvertError, IllegalSlot};
pub use ledger::{ConversionSite, Ledger, LedgerEntry};
pub use policy::{ConversionPolicy, ConversionTypes};
pub use precision::{PrecisionConfig, PrecisionPolicy};
