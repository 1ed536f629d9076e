//! Bookkeeping of conversions inserted during one conversion run.

use std::collections::HashMap;

use legalize_ir::{Graph, OpRef};
use smallvec::SmallVec;

/// Where a conversion was inserted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConversionSite {
    /// In front of operand `index` of `user`.
    Input { user: OpRef, index: u32 },
    /// Behind result `index` of `producer`, serving its prior consumers.
    Output { producer: OpRef, index: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LedgerEntry {
    pub conversion: OpRef,
    pub site: ConversionSite,
}

/// Ordered, non-owning list of the conversions a run inserted.
///
/// Entries are handles into the graph, which keeps ownership of the
/// operations. A cleanup hook may erase some of them; use
/// [`Ledger::live_conversions`] to skip those.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    entries: SmallVec<[LedgerEntry; 16]>,
    /// Entry index by conversion.
    index: HashMap<OpRef, usize>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, conversion: OpRef, site: ConversionSite) {
        self.index.insert(conversion, self.entries.len());
        self.entries.push(LedgerEntry { conversion, site });
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Conversion handles in insertion order.
    pub fn conversions(&self) -> Vec<OpRef> {
        self.entries.iter().map(|e| e.conversion).collect()
    }

    /// Conversion handles that have not been erased from `graph`.
    pub fn live_conversions(&self, graph: &Graph) -> Vec<OpRef> {
        self.entries
            .iter()
            .map(|e| e.conversion)
            .filter(|&op| graph.is_live(op))
            .collect()
    }

    pub fn contains(&self, op: OpRef) -> bool {
        self.index.contains_key(&op)
    }

    /// The site recorded for `conversion`, if any.
    pub fn site(&self, conversion: OpRef) -> Option<ConversionSite> {
        self.index.get(&conversion).map(|&i| self.entries[i].site)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use legalize_ir::OperationDataBuilder;

    #[test]
    fn records_in_order_and_filters_erased() {
        let mut graph = Graph::new();
        let f16_ty = graph.types.scalar("core", "f16");
        let node = OperationDataBuilder::new("test", "node")
            .result(f16_ty)
            .push(&mut graph);
        let a = OperationDataBuilder::new("core", "convert")
            .operand(graph.op_result(node, 0))
            .result(f16_ty)
            .push(&mut graph);
        let b = OperationDataBuilder::new("core", "convert")
            .operand(graph.op_result(node, 0))
            .result(f16_ty)
            .push(&mut graph);

        let mut ledger = Ledger::new();
        ledger.record(
            a,
            ConversionSite::Output {
                producer: node,
                index: 0,
            },
        );
        ledger.record(b, ConversionSite::Input { user: node, index: 0 });

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.conversions(), vec![a, b]);
        assert_eq!(
            ledger.site(b),
            Some(ConversionSite::Input { user: node, index: 0 })
        );
        assert!(ledger.contains(a));
        assert!(!ledger.contains(node));

        graph.detach_op(a);
        graph.remove_op(a);
        assert_eq!(ledger.live_conversions(&graph), vec![b]);
    }

    #[test]
    fn looks_up_sites_by_conversion() {
        let mut graph = Graph::new();
        let f32_ty = graph.types.scalar("core", "f32");
        let node = OperationDataBuilder::new("test", "node")
            .result(f32_ty)
            .push(&mut graph);
        let value = graph.op_result(node, 0);

        let mut ledger = Ledger::new();
        let conversions: Vec<OpRef> = (0..32)
            .map(|index| {
                let op = OperationDataBuilder::new("core", "convert")
                    .operand(value)
                    .result(f32_ty)
                    .push(&mut graph);
                ledger.record(op, ConversionSite::Input { user: node, index });
                op
            })
            .collect();

        assert_eq!(ledger.conversions(), conversions);
        for (index, &op) in conversions.iter().enumerate() {
            assert!(ledger.contains(op));
            assert_eq!(
                ledger.site(op),
                Some(ConversionSite::Input {
                    user: node,
                    index: index as u32
                })
            );
        }
        assert_eq!(ledger.site(node), None);
    }
}
