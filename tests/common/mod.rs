//! Shared fixtures for conversion tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use legalize::cleanup::{fold_identity_conversions, remove_dead_conversions};
use legalize::{ConversionPolicy, Ledger};
use legalize_ir::{Graph, OpRef, OperationDataBuilder, Symbol, TypeRef, ValueRef};

/// A policy driven by explicit per-slot tables. Conversions are `test.convert`.
#[derive(Default)]
pub struct TablePolicy {
    pub inputs: HashMap<(OpRef, u32), TypeRef>,
    pub outputs: HashMap<ValueRef, TypeRef>,
    pub skip: HashSet<OpRef>,
    /// Rename every morphed node to `test.<name>`.
    pub morph_to: Option<&'static str>,
    /// Erase identity `test.convert` ops found anywhere in the graph.
    pub drop_identities: bool,

    pub morphed: Vec<OpRef>,
    pub post_processed: Vec<OpRef>,
    pub created: Vec<OpRef>,
    /// Ledger contents seen by `clean_up`, once it ran.
    pub cleaned: Option<Vec<OpRef>>,
}

impl ConversionPolicy for TablePolicy {
    fn target_type_for_output(&self, _graph: &mut Graph, output: ValueRef) -> Option<TypeRef> {
        self.outputs.get(&output).copied()
    }

    fn target_type_for_input(
        &self,
        _graph: &mut Graph,
        node: OpRef,
        index: u32,
    ) -> Option<TypeRef> {
        self.inputs.get(&(node, index)).copied()
    }

    fn can_convert(&self, _graph: &Graph, node: OpRef) -> bool {
        !self.skip.contains(&node)
    }

    fn create_conversion(&mut self, graph: &mut Graph, value: ValueRef, dst: TypeRef) -> OpRef {
        let op = OperationDataBuilder::new("test", "convert")
            .operand(value)
            .result(dst)
            .build(graph);
        self.created.push(op);
        op
    }

    fn morph_node(&mut self, graph: &mut Graph, node: OpRef) -> OpRef {
        self.morphed.push(node);
        if let Some(name) = self.morph_to {
            graph.op_mut(node).name = Symbol::new(name);
        }
        node
    }

    fn post_processing(&mut self, _graph: &mut Graph, node: OpRef) {
        self.post_processed.push(node);
    }

    fn clean_up(&mut self, graph: &mut Graph, ledger: &Ledger) {
        self.cleaned = Some(ledger.conversions());
        if self.drop_identities {
            let conversions: Vec<OpRef> = graph
                .ops()
                .iter()
                .copied()
                .filter(|&op| graph.is_op(op, Symbol::new("test"), Symbol::new("convert")))
                .collect();
            fold_identity_conversions(graph, &conversions, &*self);
            remove_dead_conversions(graph, &conversions);
        }
    }
}

/// Builds small graphs out of `test.*` ops.
pub struct Builder {
    pub graph: Graph,
}

impl Builder {
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
        }
    }

    pub fn ty(&mut self, name: &'static str) -> TypeRef {
        self.graph.types.scalar("test", name)
    }

    /// Append `test.<name>` and return it with its first result, if any.
    pub fn op(
        &mut self,
        name: &'static str,
        operands: &[ValueRef],
        results: &[TypeRef],
    ) -> (OpRef, Option<ValueRef>) {
        let op = OperationDataBuilder::new("test", name)
            .operands(operands.iter().copied())
            .results(results.iter().copied())
            .push(&mut self.graph);
        (op, self.graph.op_results(op).first().copied())
    }
}
