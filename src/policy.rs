//! Conversion policy: the hooks a [`FunctionConverter`](crate::FunctionConverter)
//! consults while legalizing a graph.
//!
//! Only [`ConversionPolicy::create_conversion`] is required. Every other hook
//! has a default suitable for policies that change a small subset of the
//! behavior, e.g. a policy that only ever retypes outputs.

use legalize_ir::{Graph, OpRef, TypeRef, ValueRef};

use crate::ledger::Ledger;

/// Destination and source type of a conversion: `dst = convert(src)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConversionTypes {
    pub dst: TypeRef,
    pub src: TypeRef,
}

/// Hooks deciding what a [`FunctionConverter`](crate::FunctionConverter) changes.
pub trait ConversionPolicy {
    /// The type `output` must have once conversion is done.
    ///
    /// The converter retypes `output` in place and inserts a conversion from
    /// this type back to the current one for the existing consumers.
    /// `None`, or the current type, means no change.
    ///
    /// May intern new types in `graph`; must not otherwise mutate it.
    fn target_type_for_output(&self, _graph: &mut Graph, _output: ValueRef) -> Option<TypeRef> {
        None
    }

    /// The type operand `index` of `node` must be cast to.
    ///
    /// `None`, or the type the operand currently has, means no change.
    ///
    /// May intern new types in `graph`; must not otherwise mutate it.
    fn target_type_for_input(
        &self,
        _graph: &mut Graph,
        _node: OpRef,
        _index: u32,
    ) -> Option<TypeRef> {
        None
    }

    /// Destination and source type of `conversion`.
    ///
    /// Defaults to the types of [`conversion_output`](Self::conversion_output)
    /// and [`conversion_input`](Self::conversion_input).
    fn conversion_types(&self, graph: &Graph, conversion: OpRef) -> ConversionTypes {
        ConversionTypes {
            dst: graph.value_ty(self.conversion_output(graph, conversion)),
            src: graph.value_ty(self.conversion_input(graph, conversion)),
        }
    }

    /// Whether `node` takes part in legalization at all.
    fn can_convert(&self, _graph: &Graph, _node: OpRef) -> bool {
        true
    }

    /// Create a conversion of `value` to `dst`.
    ///
    /// The conversion must read `value` through
    /// [`conversion_input`](Self::conversion_input). The returned operation
    /// may be left detached, in which case the converter attaches it next to
    /// the node being legalized.
    fn create_conversion(&mut self, graph: &mut Graph, value: ValueRef, dst: TypeRef) -> OpRef;

    /// The value a conversion reads its source from. Defaults to operand 0.
    fn conversion_input(&self, graph: &Graph, conversion: OpRef) -> ValueRef {
        let operands = graph.op_operands(conversion);
        assert!(
            !operands.is_empty(),
            "conversion {conversion} ({}) has no operands; override conversion_input",
            graph.op_full_name(conversion)
        );
        operands[0]
    }

    /// The value representing the result of a conversion. Defaults to result 0.
    fn conversion_output(&self, graph: &Graph, conversion: OpRef) -> ValueRef {
        let results = graph.op_results(conversion);
        assert!(
            !results.is_empty(),
            "conversion {conversion} ({}) has no results; override conversion_output",
            graph.op_full_name(conversion)
        );
        results[0]
    }

    /// Morph `node` into its final form, e.g. change its opcode.
    ///
    /// Called once all inputs and outputs of `node` have their target types,
    /// which the morph must keep. `node` is changed in place: it must stay
    /// attached and be returned as is.
    fn morph_node(&mut self, _graph: &mut Graph, node: OpRef) -> OpRef {
        node
    }

    /// Post-process `node` once it has been morphed.
    fn post_processing(&mut self, _graph: &mut Graph, _node: OpRef) {}

    /// Final pass-wide fixups over every conversion inserted during the walk.
    fn clean_up(&mut self, _graph: &mut Graph, _ledger: &Ledger) {}
}
