//! The conversion driver.
//!
//! Walks a graph once, in its iteration order at the start of the walk, and
//! legalizes each node the policy accepts:
//!
//! ```text
//! for each node in graph:
//!   insert conversions for the inputs of node
//!   update the inputs of node to use the results of the conversions
//!   mutate the type of the outputs of node
//!   insert conversions for the outputs of node
//!   morph node
//!   post-process node
//! clean up
//! ```
//!
//! Conversions inserted during the walk are not visited by it.

use legalize_ir::{Graph, OpRef, TypeRef, ValueRef, print_type, verify};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::error::{ConvertError, IllegalSlot};
use crate::ledger::{ConversionSite, Ledger};
use crate::policy::{ConversionPolicy, ConversionTypes};

/// Counters collected during one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConvertStats {
    /// Nodes the policy accepted.
    pub visited: usize,
    /// Nodes the policy rejected through `can_convert`.
    pub skipped: usize,
    pub input_conversions: usize,
    pub output_conversions: usize,
}

/// What is left once a run is done: the policy, the ledger handed to
/// `clean_up`, and the run's counters. The graph itself carries the result.
pub struct ConvertOutcome<P> {
    pub policy: P,
    pub ledger: Ledger,
    pub stats: ConvertStats,
}

/// Converts one graph according to a [`ConversionPolicy`].
///
/// The converter mutates the graph in place. To keep the original around,
/// clone it before creating the converter.
pub struct FunctionConverter<'g, P> {
    graph: &'g mut Graph,
    policy: P,
    /// Every conversion inserted during the walk.
    conversions: Ledger,
    stats: ConvertStats,
}

impl<'g, P: ConversionPolicy> FunctionConverter<'g, P> {
    pub fn new(graph: &'g mut Graph, policy: P) -> Self {
        Self {
            graph,
            policy,
            conversions: Ledger::new(),
            stats: ConvertStats::default(),
        }
    }

    pub fn graph(&self) -> &Graph {
        &*self.graph
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Run the conversion.
    ///
    /// # Panics
    ///
    /// Panics if the policy breaks its contract: a created conversion that
    /// does not read the requested value or whose `conversion_types` differ
    /// from what was requested, or a `morph_node` that returns another
    /// operation or detaches or erases the node.
    pub fn convert(mut self) -> ConvertOutcome<P> {
        self.run();
        ConvertOutcome {
            policy: self.policy,
            ledger: self.conversions,
            stats: self.stats,
        }
    }

    /// Run the conversion, then verify the graph is structurally valid and
    /// that every converted node has the types the policy requires.
    pub fn convert_verified(mut self) -> Result<ConvertOutcome<P>, ConvertError> {
        self.run();
        verify(self.graph)?;
        self.check_legal()?;
        Ok(ConvertOutcome {
            policy: self.policy,
            ledger: self.conversions,
            stats: self.stats,
        })
    }

    fn run(&mut self) {
        let nodes: Vec<OpRef> = self.graph.ops().to_vec();
        debug!("convert: walking {} node(s)", nodes.len());

        for node in nodes {
            // An earlier morph or post-processing hook may have taken it out.
            if !self.graph.is_attached(node) {
                continue;
            }
            if !self.policy.can_convert(self.graph, node) {
                trace!("convert: skipping {node} ({})", self.graph.op_full_name(node));
                self.stats.skipped += 1;
                continue;
            }
            self.stats.visited += 1;

            self.convert_inputs(node);
            self.convert_outputs(node);

            let morphed = self.policy.morph_node(self.graph, node);
            self.check_morphed(node, morphed);
            self.policy.post_processing(self.graph, node);
        }

        debug!(
            "convert: visited {}, skipped {}, inserted {} input and {} output conversion(s)",
            self.stats.visited,
            self.stats.skipped,
            self.stats.input_conversions,
            self.stats.output_conversions
        );

        self.policy.clean_up(self.graph, &self.conversions);
    }

    fn convert_inputs(&mut self, node: OpRef) {
        let num_inputs = self.graph.op_operands(node).len() as u32;
        for index in 0..num_inputs {
            let value = self.graph.op_operands(node)[index as usize];
            let current = self.graph.value_ty(value);
            let Some(target) = self.policy.target_type_for_input(self.graph, node, index) else {
                continue;
            };
            if target == current {
                continue;
            }

            let conversion = self.create_conversion(value, target);
            if !self.graph.is_attached(conversion) {
                self.graph.insert_op_before(node, conversion);
            }
            let converted = self.policy.conversion_output(self.graph, conversion);
            self.graph.set_operand(node, index, converted);

            trace!("convert: operand #{index} of {node} via {conversion}");
            self.conversions.record(conversion, ConversionSite::Input { user: node, index });
            self.stats.input_conversions += 1;
        }
    }

    fn convert_outputs(&mut self, node: OpRef) {
        let results: SmallVec<[ValueRef; 4]> = self.graph.op_results(node).into();
        // Output conversions follow the node in result order.
        let mut anchor = node;
        for (index, &output) in results.iter().enumerate() {
            let original = self.graph.value_ty(output);
            let Some(target) = self.policy.target_type_for_output(self.graph, output) else {
                continue;
            };
            if target == original {
                continue;
            }

            self.graph.set_value_type(output, target);
            let conversion = self.create_conversion(output, original);
            if !self.graph.is_attached(conversion) {
                self.graph.insert_op_after(anchor, conversion);
                anchor = conversion;
            }
            let restored = self.policy.conversion_output(self.graph, conversion);
            self.graph.replace_all_uses_except(output, restored, conversion);

            trace!("convert: result #{index} of {node} via {conversion}");
            self.conversions.record(
                conversion,
                ConversionSite::Output {
                    producer: node,
                    index: index as u32,
                },
            );
            self.stats.output_conversions += 1;
        }
    }

    /// Ask the policy for a conversion and check it converts what was asked.
    fn create_conversion(&mut self, value: ValueRef, dst: TypeRef) -> OpRef {
        let src = self.graph.value_ty(value);
        let conversion = self.policy.create_conversion(self.graph, value, dst);

        let requested = ConversionTypes { dst, src };
        let reported = self.policy.conversion_types(self.graph, conversion);
        assert!(
            reported == requested,
            "create_conversion: {conversion} converts {} to {}, but {} to {} was requested",
            print_type(self.graph, reported.src),
            print_type(self.graph, reported.dst),
            print_type(self.graph, src),
            print_type(self.graph, dst),
        );
        let input = self.policy.conversion_input(self.graph, conversion);
        assert!(
            input == value,
            "create_conversion: {conversion} reads {input}, expected {value}",
        );
        let output = self.policy.conversion_output(self.graph, conversion);
        assert!(
            self.graph.value_ty(output) == dst,
            "create_conversion: output {output} of {conversion} is {}, expected {}",
            print_type(self.graph, self.graph.value_ty(output)),
            print_type(self.graph, dst),
        );
        conversion
    }

    fn check_morphed(&self, node: OpRef, morphed: OpRef) {
        assert!(
            self.graph.is_attached(node),
            "morph_node: {node} was detached or erased while being morphed",
        );
        assert!(
            morphed == node,
            "morph_node: {node} was morphed into a different operation {morphed}",
        );
    }

    /// Every accepted, non-conversion node has its slots at the policy's
    /// target types.
    fn check_legal(&mut self) -> Result<(), IllegalSlot> {
        let nodes: Vec<OpRef> = self.graph.ops().to_vec();
        for node in nodes {
            if self.conversions.contains(node) || !self.policy.can_convert(self.graph, node) {
                continue;
            }

            let num_inputs = self.graph.op_operands(node).len() as u32;
            for index in 0..num_inputs {
                let actual = self.graph.value_ty(self.graph.op_operands(node)[index as usize]);
                if let Some(expected) = self.policy.target_type_for_input(self.graph, node, index)
                    && expected != actual
                {
                    return Err(IllegalSlot::Input {
                        op: node,
                        index,
                        actual: print_type(self.graph, actual),
                        expected: print_type(self.graph, expected),
                    });
                }
            }

            let results: SmallVec<[ValueRef; 4]> = self.graph.op_results(node).into();
            for (index, &output) in results.iter().enumerate() {
                let actual = self.graph.value_ty(output);
                if let Some(expected) = self.policy.target_type_for_output(self.graph, output)
                    && expected != actual
                {
                    return Err(IllegalSlot::Output {
                        op: node,
                        index: index as u32,
                        actual: print_type(self.graph, actual),
                        expected: print_type(self.graph, expected),
                    });
                }
            }
        }
        Ok(())
    }
}
