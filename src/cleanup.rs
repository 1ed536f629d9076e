//! Pass-wide conversion cleanups.
//!
//! Building blocks for [`ConversionPolicy::clean_up`]. Each one works on a
//! list of conversion operations (usually the run's ledger) and reads their
//! shape through the policy's `conversion_input`, `conversion_output` and
//! `conversion_types` hooks, so they apply to any conversion op layout.
//!
//! Folds only redirect uses; the folded conversions are left in place until
//! [`remove_dead_conversions`] erases them.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::ops::AddAssign;

use legalize_ir::{Graph, OpRef, TypeRef, ValueRef};
use tracing::debug;

use crate::policy::ConversionPolicy;

/// Counters for [`fold_conversions`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CleanupStats {
    /// Conversions whose source and destination types were equal.
    pub identities: usize,
    /// `convert(convert(x))` chains folded back to `x`.
    pub inverse_pairs: usize,
    /// Conversions merged into an earlier conversion of the same value.
    pub duplicates: usize,
    /// Conversions erased because nothing used them any more.
    pub removed: usize,
}

impl CleanupStats {
    pub fn total(&self) -> usize {
        self.identities + self.inverse_pairs + self.duplicates + self.removed
    }
}

impl AddAssign for CleanupStats {
    fn add_assign(&mut self, rhs: Self) {
        self.identities += rhs.identities;
        self.inverse_pairs += rhs.inverse_pairs;
        self.duplicates += rhs.duplicates;
        self.removed += rhs.removed;
    }
}

/// Run all cleanups until none of them changes the graph.
pub fn fold_conversions<P: ConversionPolicy + ?Sized>(
    graph: &mut Graph,
    conversions: &[OpRef],
    policy: &P,
) -> CleanupStats {
    let mut stats = CleanupStats::default();
    // Every round either redirects uses upstream or erases an op, so the
    // bound is never hit on a well-formed graph.
    for _ in 0..=conversions.len() {
        let round = CleanupStats {
            inverse_pairs: fold_inverse_conversions(graph, conversions, policy),
            identities: fold_identity_conversions(graph, conversions, policy),
            duplicates: merge_duplicate_conversions(graph, conversions, policy),
            removed: remove_dead_conversions(graph, conversions),
        };
        stats += round;
        if round.total() == 0 {
            break;
        }
    }
    debug!(
        "fold_conversions: {} identity, {} inverse pair(s), {} duplicate(s), {} removed",
        stats.identities, stats.inverse_pairs, stats.duplicates, stats.removed
    );
    stats
}

/// Redirect uses of conversions whose destination equals their source type
/// to the conversion's input.
pub fn fold_identity_conversions<P: ConversionPolicy + ?Sized>(
    graph: &mut Graph,
    conversions: &[OpRef],
    policy: &P,
) -> usize {
    let mut folded = 0;
    for &conversion in conversions {
        if !graph.is_live(conversion) {
            continue;
        }
        let output = policy.conversion_output(graph, conversion);
        if !graph.has_uses(output) {
            continue;
        }
        let types = policy.conversion_types(graph, conversion);
        if types.dst != types.src {
            continue;
        }
        let input = policy.conversion_input(graph, conversion);
        graph.replace_all_uses(output, input);
        folded += 1;
    }
    folded
}

/// Fold `outer(inner(x))` to `x` when both are in `conversions` and `outer`
/// converts back to `inner`'s source type.
///
/// The pair is assumed to round-trip exactly. That holds for a widening
/// followed by a narrowing, as precision lowering inserts them, but not for a
/// narrowing followed by a widening, which this fold would silently drop.
/// Leave such pairs out of `conversions`.
pub fn fold_inverse_conversions<P: ConversionPolicy + ?Sized>(
    graph: &mut Graph,
    conversions: &[OpRef],
    policy: &P,
) -> usize {
    let known: HashSet<OpRef> = conversions.iter().copied().collect();
    let mut folded = 0;
    for &outer in conversions {
        if !graph.is_live(outer) {
            continue;
        }
        let output = policy.conversion_output(graph, outer);
        if !graph.has_uses(output) {
            continue;
        }
        let input = policy.conversion_input(graph, outer);
        let inner = graph.value_def(input).op;
        if inner == outer || !known.contains(&inner) || !graph.is_live(inner) {
            continue;
        }
        if policy.conversion_output(graph, inner) != input {
            continue;
        }
        let outer_types = policy.conversion_types(graph, outer);
        let inner_types = policy.conversion_types(graph, inner);
        if outer_types.dst != inner_types.src {
            continue;
        }
        let source = policy.conversion_input(graph, inner);
        graph.replace_all_uses(output, source);
        folded += 1;
    }
    folded
}

/// Merge conversions of the same value to the same type into the one that
/// comes first in the graph's iteration order.
///
/// Detached conversions are ignored.
pub fn merge_duplicate_conversions<P: ConversionPolicy + ?Sized>(
    graph: &mut Graph,
    conversions: &[OpRef],
    policy: &P,
) -> usize {
    let positions: HashMap<OpRef, usize> = graph
        .ops()
        .iter()
        .enumerate()
        .map(|(pos, &op)| (op, pos))
        .collect();
    let mut ordered: Vec<(usize, OpRef)> = conversions
        .iter()
        .filter_map(|&c| positions.get(&c).map(|&pos| (pos, c)))
        .collect();
    ordered.sort_unstable();
    ordered.dedup();

    let mut first: HashMap<(ValueRef, TypeRef), OpRef> = HashMap::new();
    let mut merged = 0;
    for (_, conversion) in ordered {
        let output = policy.conversion_output(graph, conversion);
        if !graph.has_uses(output) {
            continue;
        }
        let key = (
            policy.conversion_input(graph, conversion),
            graph.value_ty(output),
        );
        match first.entry(key) {
            Entry::Occupied(keeper) => {
                let kept = policy.conversion_output(graph, *keeper.get());
                graph.replace_all_uses(output, kept);
                merged += 1;
            }
            Entry::Vacant(slot) => {
                slot.insert(conversion);
            }
        }
    }
    merged
}

/// Detach and erase conversions none of whose results are used.
///
/// Sweeps in reverse so that erasing a conversion can free the conversion
/// feeding it within the same sweep.
pub fn remove_dead_conversions(graph: &mut Graph, conversions: &[OpRef]) -> usize {
    let mut removed = 0;
    for &conversion in conversions.iter().rev() {
        if !graph.is_live(conversion) || graph.op_has_uses(conversion) {
            continue;
        }
        graph.detach_op(conversion);
        graph.remove_op(conversion);
        removed += 1;
    }
    removed
}
