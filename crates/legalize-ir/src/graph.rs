//! Graph: arena-based mutable dataflow graph storage.
//!
//! Operations and values are stored in `PrimaryMap`s owned by `Graph`.
//! Operand lists use `EntityList + ListPool` for compact storage, and every
//! mutating method keeps the use-chains in sync with the operand lists.
//!
//! An operation is in one of three states:
//!
//! - **detached**: created but not part of the graph's iteration order;
//! - **attached**: listed in [`Graph::ops`];
//! - **erased**: removed with [`Graph::remove_op`]; its handle stays valid as a
//!   lookup key but it must no longer be referenced.

use std::collections::BTreeMap;

use cranelift_entity::{EntityList, ListPool, PrimaryMap, SecondaryMap};
use smallvec::SmallVec;

use crate::refs::{OpRef, TypeRef, ValueDef, ValueRef};
use crate::symbol::Symbol;
use crate::types::{Attribute, TypeInterner};

// ============================================================================
// Use-chain
// ============================================================================

/// A single use of a value: which operation uses it, at which operand index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Use {
    pub user: OpRef,
    pub operand_index: u32,
}

// ============================================================================
// Entity data types
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
enum OpState {
    #[default]
    Detached,
    Attached,
    Erased,
}

/// Data for a single operation.
#[derive(Clone)]
pub struct OperationData {
    pub dialect: Symbol,
    pub name: Symbol,
    pub operands: EntityList<ValueRef>,
    pub attributes: BTreeMap<Symbol, Attribute>,
    state: OpState,
}

impl OperationData {
    /// Create operation data with no operands or attributes.
    pub fn new(dialect: Symbol, name: Symbol) -> Self {
        Self {
            dialect,
            name,
            operands: EntityList::new(),
            attributes: BTreeMap::new(),
            state: OpState::Detached,
        }
    }
}

/// Data for a single value.
#[derive(Clone)]
pub struct ValueData {
    pub def: ValueDef,
    pub ty: TypeRef,
}

// ============================================================================
// Graph
// ============================================================================

/// Arena-based mutable dataflow graph.
///
/// Owns all operations, values and types. The graph's iteration order is the
/// order of attached operations as returned by [`Graph::ops`].
#[derive(Clone)]
pub struct Graph {
    ops: PrimaryMap<OpRef, OperationData>,
    values: PrimaryMap<ValueRef, ValueData>,

    /// Use-chain: for each value, the list of operand slots that reference it.
    uses: SecondaryMap<ValueRef, SmallVec<[Use; 2]>>,

    /// Mapping from operation to its result values.
    result_values: SecondaryMap<OpRef, EntityList<ValueRef>>,

    /// Attached operations in iteration order.
    order: Vec<OpRef>,

    /// Type interner.
    pub types: TypeInterner,

    /// Backing pool for operand and result lists.
    value_pool: ListPool<ValueRef>,
}

impl Graph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            ops: PrimaryMap::new(),
            values: PrimaryMap::new(),
            uses: SecondaryMap::new(),
            result_values: SecondaryMap::new(),
            order: Vec::new(),
            types: TypeInterner::new(),
            value_pool: ListPool::new(),
        }
    }

    // ========================================================================
    // Operation
    // ========================================================================

    /// Create a new, detached operation and allocate its result values.
    ///
    /// The operation's operands are registered in the use-chain right away.
    /// Use `push_op`, `insert_op_before` or `insert_op_after` to attach it.
    ///
    /// # Panics
    ///
    /// Panics if any operand refers to a value whose producer has been erased.
    pub fn create_op(&mut self, data: OperationData, result_types: &[TypeRef]) -> OpRef {
        let operands: SmallVec<[ValueRef; 8]> = data.operands.as_slice(&self.value_pool).into();
        for &val in &operands {
            let producer = self.values[val].def.op;
            assert!(
                self.ops[producer].state != OpState::Erased,
                "create_op: operand {val} is defined by erased operation {producer}",
            );
        }

        let op = self.ops.push(data);

        for (idx, &val) in operands.iter().enumerate() {
            self.uses[val].push(Use {
                user: op,
                operand_index: idx as u32,
            });
        }

        let mut result_value_list = EntityList::new();
        for (idx, &ty) in result_types.iter().enumerate() {
            let v = self.values.push(ValueData {
                def: ValueDef {
                    op,
                    index: idx as u32,
                },
                ty,
            });
            result_value_list.push(v, &mut self.value_pool);
        }
        self.result_values[op] = result_value_list;

        op
    }

    /// Get immutable reference to operation data.
    pub fn op(&self, op: OpRef) -> &OperationData {
        &self.ops[op]
    }

    /// Get mutable reference to operation data.
    ///
    /// **Warning**: modifying `operands` directly desyncs the use-chain.
    /// Use `set_operand` or the RAUW helpers instead.
    pub fn op_mut(&mut self, op: OpRef) -> &mut OperationData {
        &mut self.ops[op]
    }

    /// Full `dialect.name` of an operation.
    pub fn op_full_name(&self, op: OpRef) -> String {
        let data = &self.ops[op];
        format!("{}.{}", data.dialect, data.name)
    }

    /// Check whether an operation has the given dialect and name.
    pub fn is_op(&self, op: OpRef, dialect: Symbol, name: Symbol) -> bool {
        let data = &self.ops[op];
        data.dialect == dialect && data.name == name
    }

    /// Get the operands of an operation as a slice.
    pub fn op_operands(&self, op: OpRef) -> &[ValueRef] {
        self.ops[op].operands.as_slice(&self.value_pool)
    }

    /// Get the i-th result value of an operation.
    pub fn op_result(&self, op: OpRef, index: u32) -> ValueRef {
        self.result_values[op].as_slice(&self.value_pool)[index as usize]
    }

    /// Get all result values of an operation.
    pub fn op_results(&self, op: OpRef) -> &[ValueRef] {
        self.result_values[op].as_slice(&self.value_pool)
    }

    /// Get the current result types of an operation.
    pub fn op_result_types(&self, op: OpRef) -> SmallVec<[TypeRef; 4]> {
        self.op_results(op)
            .iter()
            .map(|&v| self.values[v].ty)
            .collect()
    }

    /// Whether the operation is part of the graph's iteration order.
    pub fn is_attached(&self, op: OpRef) -> bool {
        self.ops[op].state == OpState::Attached
    }

    /// Whether the operation has not been erased.
    pub fn is_live(&self, op: OpRef) -> bool {
        self.ops[op].state != OpState::Erased
    }

    /// Erase a detached operation, clearing its use-chain entries.
    ///
    /// # Panics
    ///
    /// Panics if the operation is still attached, already erased, or if any of
    /// its results still has uses, as that would leave dangling references.
    pub fn remove_op(&mut self, op: OpRef) {
        match self.ops[op].state {
            OpState::Attached => panic!(
                "remove_op: operation {op} is still attached to the graph; call detach_op first"
            ),
            OpState::Erased => panic!("remove_op: operation {op} was already erased"),
            OpState::Detached => {}
        }

        let results: SmallVec<[ValueRef; 4]> =
            self.result_values[op].as_slice(&self.value_pool).into();
        for &val in &results {
            assert!(
                self.uses[val].is_empty(),
                "remove_op: result value {val} still has {} use(s); \
                 replace all uses before removing the operation",
                self.uses[val].len()
            );
        }

        let operands: SmallVec<[ValueRef; 8]> =
            self.ops[op].operands.as_slice(&self.value_pool).into();
        for (idx, &val) in operands.iter().enumerate() {
            self.uses[val].retain(|u| !(u.user == op && u.operand_index == idx as u32));
        }
        self.ops[op].state = OpState::Erased;
    }

    // ========================================================================
    // Iteration order
    // ========================================================================

    /// Attached operations in iteration order.
    pub fn ops(&self) -> &[OpRef] {
        &self.order
    }

    /// Position of an attached operation in the iteration order.
    pub fn position(&self, op: OpRef) -> Option<usize> {
        self.order.iter().position(|&o| o == op)
    }

    /// Append an operation to the end of the iteration order.
    ///
    /// # Panics
    ///
    /// Panics if the operation is already attached or erased.
    pub fn push_op(&mut self, op: OpRef) {
        self.assert_detached("push_op", op);
        self.ops[op].state = OpState::Attached;
        self.order.push(op);
    }

    /// Attach an operation immediately before `before`.
    ///
    /// # Panics
    ///
    /// Panics if the operation is not detached, or if `before` is not attached.
    pub fn insert_op_before(&mut self, before: OpRef, op: OpRef) {
        self.assert_detached("insert_op_before", op);
        let pos = self
            .position(before)
            .unwrap_or_else(|| panic!("insert_op_before: {before} is not attached"));
        self.order.insert(pos, op);
        self.ops[op].state = OpState::Attached;
    }

    /// Attach an operation immediately after `after`.
    ///
    /// # Panics
    ///
    /// Panics if the operation is not detached, or if `after` is not attached.
    pub fn insert_op_after(&mut self, after: OpRef, op: OpRef) {
        self.assert_detached("insert_op_after", op);
        let pos = self
            .position(after)
            .unwrap_or_else(|| panic!("insert_op_after: {after} is not attached"));
        self.order.insert(pos + 1, op);
        self.ops[op].state = OpState::Attached;
    }

    /// Remove an operation from the iteration order without destroying it.
    ///
    /// Does nothing if the operation is not attached.
    pub fn detach_op(&mut self, op: OpRef) {
        if self.ops[op].state == OpState::Attached {
            self.order.retain(|&o| o != op);
            self.ops[op].state = OpState::Detached;
        }
    }

    fn assert_detached(&self, caller: &str, op: OpRef) {
        match self.ops[op].state {
            OpState::Detached => {}
            OpState::Attached => {
                panic!("{caller}: operation {op} is already attached; detach it first")
            }
            OpState::Erased => panic!("{caller}: operation {op} was erased"),
        }
    }

    // ========================================================================
    // Value
    // ========================================================================

    /// Get immutable reference to value data.
    pub fn value(&self, v: ValueRef) -> &ValueData {
        &self.values[v]
    }

    /// Get the type of a value.
    pub fn value_ty(&self, v: ValueRef) -> TypeRef {
        self.values[v].ty
    }

    /// Get the definition of a value.
    pub fn value_def(&self, v: ValueRef) -> ValueDef {
        self.values[v].def
    }

    /// Change the type of a value in place.
    ///
    /// Existing consumers observe the new type; callers are responsible for
    /// redirecting them if they expect the old one.
    pub fn set_value_type(&mut self, v: ValueRef, ty: TypeRef) {
        self.values[v].ty = ty;
    }

    /// Iterate over all values ever created, including results of erased ops.
    pub fn all_values(&self) -> impl Iterator<Item = ValueRef> + '_ {
        self.values.keys()
    }

    // ========================================================================
    // Use-chain
    // ========================================================================

    /// Get all uses of a value.
    pub fn uses(&self, v: ValueRef) -> &[Use] {
        &self.uses[v]
    }

    /// Check if a value has any uses.
    pub fn has_uses(&self, v: ValueRef) -> bool {
        !self.uses[v].is_empty()
    }

    /// Check if any result of an operation has uses.
    pub fn op_has_uses(&self, op: OpRef) -> bool {
        self.op_results(op).iter().any(|&v| self.has_uses(v))
    }

    // ========================================================================
    // Rewiring
    // ========================================================================

    /// Point operand `index` of `op` at `value`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range for `op`.
    pub fn set_operand(&mut self, op: OpRef, index: u32, value: ValueRef) {
        let slice = self.ops[op].operands.as_mut_slice(&mut self.value_pool);
        assert!(
            (index as usize) < slice.len(),
            "set_operand: {op} has {} operand(s), index {index} is out of range",
            slice.len()
        );
        let old = std::mem::replace(&mut slice[index as usize], value);
        if old == value {
            return;
        }
        self.uses[old].retain(|u| !(u.user == op && u.operand_index == index));
        self.uses[value].push(Use {
            user: op,
            operand_index: index,
        });
    }

    /// Replace all uses of `old` with `new` in all operations.
    pub fn replace_all_uses(&mut self, old: ValueRef, new: ValueRef) {
        if old == new {
            return;
        }
        let old_uses = std::mem::take(&mut self.uses[old]);
        for u in old_uses {
            self.rewire_use(u, old, new);
        }
    }

    /// Replace all uses of `old` with `new`, except those inside `except`.
    ///
    /// This is how a conversion reading `old` is spliced in front of `old`'s
    /// other consumers without rewiring the conversion onto its own result.
    pub fn replace_all_uses_except(&mut self, old: ValueRef, new: ValueRef, except: OpRef) {
        if old == new {
            return;
        }
        let old_uses = std::mem::take(&mut self.uses[old]);
        let mut kept = SmallVec::new();
        for u in old_uses {
            if u.user == except {
                kept.push(u);
            } else {
                self.rewire_use(u, old, new);
            }
        }
        self.uses[old] = kept;
    }

    fn rewire_use(&mut self, u: Use, old: ValueRef, new: ValueRef) {
        let slice = self.ops[u.user].operands.as_mut_slice(&mut self.value_pool);
        debug_assert_eq!(slice[u.operand_index as usize], old);
        slice[u.operand_index as usize] = new;
        self.uses[new].push(u);
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// OperationDataBuilder
// ============================================================================

/// Builder for creating operations with pool-backed operand lists.
///
/// Collects operands and result types into `Vec`s, then packs them into the
/// graph's pools on `build()`. The created operation is detached.
pub struct OperationDataBuilder {
    dialect: Symbol,
    name: Symbol,
    operands: Vec<ValueRef>,
    results: Vec<TypeRef>,
    attributes: BTreeMap<Symbol, Attribute>,
}

impl OperationDataBuilder {
    pub fn new(dialect: impl Into<Symbol>, name: impl Into<Symbol>) -> Self {
        Self {
            dialect: dialect.into(),
            name: name.into(),
            operands: Vec::new(),
            results: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn operand(mut self, v: ValueRef) -> Self {
        self.operands.push(v);
        self
    }

    pub fn operands(mut self, vs: impl IntoIterator<Item = ValueRef>) -> Self {
        self.operands.extend(vs);
        self
    }

    pub fn result(mut self, ty: TypeRef) -> Self {
        self.results.push(ty);
        self
    }

    pub fn results(mut self, tys: impl IntoIterator<Item = TypeRef>) -> Self {
        self.results.extend(tys);
        self
    }

    pub fn attr(mut self, key: impl Into<Symbol>, val: impl Into<Attribute>) -> Self {
        self.attributes.insert(key.into(), val.into());
        self
    }

    /// Create the (detached) operation in `graph`.
    pub fn build(self, graph: &mut Graph) -> OpRef {
        let mut data = OperationData::new(self.dialect, self.name);
        data.operands = EntityList::from_slice(&self.operands, &mut graph.value_pool);
        data.attributes = self.attributes;
        graph.create_op(data, &self.results)
    }

    /// Create the operation and append it to `graph`'s iteration order.
    pub fn push(self, graph: &mut Graph) -> OpRef {
        let op = self.build(graph);
        graph.push_op(op);
        op
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f32_type(graph: &mut Graph) -> TypeRef {
        graph.types.scalar("core", "f32")
    }

    #[test]
    fn create_op_and_read_back() {
        let mut graph = Graph::new();
        let f32_ty = f32_type(&mut graph);

        let op = OperationDataBuilder::new("test", "const")
            .result(f32_ty)
            .attr("value", Attribute::IntBits(42))
            .build(&mut graph);

        assert_eq!(graph.op(op).dialect, Symbol::new("test"));
        assert_eq!(graph.op(op).name, Symbol::new("const"));
        assert_eq!(graph.op_full_name(op), "test.const");
        assert_eq!(graph.op_result_types(op).as_slice(), &[f32_ty]);
        assert_eq!(
            graph.op(op).attributes.get(&Symbol::new("value")),
            Some(&Attribute::IntBits(42))
        );
        assert!(!graph.is_attached(op));
        assert!(graph.is_live(op));
    }

    #[test]
    fn op_result_values() {
        let mut graph = Graph::new();
        let f32_ty = f32_type(&mut graph);

        let op = OperationDataBuilder::new("test", "split")
            .result(f32_ty)
            .result(f32_ty)
            .push(&mut graph);

        let r0 = graph.op_result(op, 0);
        let r1 = graph.op_result(op, 1);
        assert_eq!(graph.op_results(op), &[r0, r1]);
        assert_ne!(r0, r1);
        assert_eq!(graph.value_def(r0), ValueDef { op, index: 0 });
        assert_eq!(graph.value_def(r1), ValueDef { op, index: 1 });
    }

    #[test]
    fn use_chain_tracking() {
        let mut graph = Graph::new();
        let f32_ty = f32_type(&mut graph);

        let op1 = OperationDataBuilder::new("test", "const")
            .result(f32_ty)
            .push(&mut graph);
        let v1 = graph.op_result(op1, 0);
        assert!(!graph.has_uses(v1));

        let op2 = OperationDataBuilder::new("test", "neg")
            .operand(v1)
            .result(f32_ty)
            .push(&mut graph);

        assert_eq!(
            graph.uses(v1),
            &[Use {
                user: op2,
                operand_index: 0
            }]
        );
        assert!(graph.op_has_uses(op1));
        assert!(!graph.op_has_uses(op2));
    }

    #[test]
    fn set_operand_moves_single_use() {
        let mut graph = Graph::new();
        let f32_ty = f32_type(&mut graph);

        let a = OperationDataBuilder::new("test", "a")
            .result(f32_ty)
            .push(&mut graph);
        let b = OperationDataBuilder::new("test", "b")
            .result(f32_ty)
            .push(&mut graph);
        let va = graph.op_result(a, 0);
        let vb = graph.op_result(b, 0);

        let add = OperationDataBuilder::new("test", "add")
            .operands([va, va])
            .result(f32_ty)
            .push(&mut graph);

        graph.set_operand(add, 1, vb);

        assert_eq!(graph.op_operands(add), &[va, vb]);
        assert_eq!(
            graph.uses(va),
            &[Use {
                user: add,
                operand_index: 0
            }]
        );
        assert_eq!(
            graph.uses(vb),
            &[Use {
                user: add,
                operand_index: 1
            }]
        );
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn set_operand_rejects_bad_index() {
        let mut graph = Graph::new();
        let f32_ty = f32_type(&mut graph);
        let a = OperationDataBuilder::new("test", "a")
            .result(f32_ty)
            .push(&mut graph);
        let va = graph.op_result(a, 0);
        let user = OperationDataBuilder::new("test", "use")
            .operand(va)
            .push(&mut graph);

        graph.set_operand(user, 1, va);
    }

    #[test]
    fn rauw() {
        let mut graph = Graph::new();
        let f32_ty = f32_type(&mut graph);

        let op1 = OperationDataBuilder::new("test", "const")
            .result(f32_ty)
            .push(&mut graph);
        let v_old = graph.op_result(op1, 0);
        let op2 = OperationDataBuilder::new("test", "const")
            .result(f32_ty)
            .push(&mut graph);
        let v_new = graph.op_result(op2, 0);

        let op3 = OperationDataBuilder::new("test", "add")
            .operands([v_old, v_old])
            .result(f32_ty)
            .push(&mut graph);

        graph.replace_all_uses(v_old, v_new);

        assert!(!graph.has_uses(v_old));
        assert_eq!(graph.uses(v_new).len(), 2);
        assert_eq!(graph.op_operands(op3), &[v_new, v_new]);
    }

    #[test]
    fn rauw_except_keeps_excluded_user() {
        let mut graph = Graph::new();
        let f32_ty = f32_type(&mut graph);
        let f16_ty = graph.types.scalar("core", "f16");

        let producer = OperationDataBuilder::new("test", "producer")
            .result(f32_ty)
            .push(&mut graph);
        let out = graph.op_result(producer, 0);
        let user_a = OperationDataBuilder::new("test", "use")
            .operand(out)
            .push(&mut graph);
        let user_b = OperationDataBuilder::new("test", "use")
            .operand(out)
            .push(&mut graph);

        let cast = OperationDataBuilder::new("test", "cast")
            .operand(out)
            .result(f16_ty)
            .build(&mut graph);
        graph.insert_op_after(producer, cast);
        let cast_out = graph.op_result(cast, 0);

        graph.replace_all_uses_except(out, cast_out, cast);

        assert_eq!(graph.op_operands(cast), &[out]);
        assert_eq!(graph.op_operands(user_a), &[cast_out]);
        assert_eq!(graph.op_operands(user_b), &[cast_out]);
        assert_eq!(
            graph.uses(out),
            &[Use {
                user: cast,
                operand_index: 0
            }]
        );
        assert_eq!(graph.uses(cast_out).len(), 2);
    }

    #[test]
    fn set_value_type_is_seen_by_consumers() {
        let mut graph = Graph::new();
        let f32_ty = f32_type(&mut graph);
        let f16_ty = graph.types.scalar("core", "f16");

        let op = OperationDataBuilder::new("test", "const")
            .result(f32_ty)
            .push(&mut graph);
        let v = graph.op_result(op, 0);
        let user = OperationDataBuilder::new("test", "use")
            .operand(v)
            .push(&mut graph);

        graph.set_value_type(v, f16_ty);

        assert_eq!(graph.op_result_types(op).as_slice(), &[f16_ty]);
        assert_eq!(graph.value_ty(graph.op_operands(user)[0]), f16_ty);
    }

    #[test]
    fn insertion_order() {
        let mut graph = Graph::new();
        let f32_ty = f32_type(&mut graph);
        let mk_op = |graph: &mut Graph, name: &'static str| {
            OperationDataBuilder::new("test", name)
                .result(f32_ty)
                .build(graph)
        };

        let op_a = mk_op(&mut graph, "a");
        let op_d = mk_op(&mut graph, "d");
        graph.push_op(op_a);
        graph.push_op(op_d);

        let op_c = mk_op(&mut graph, "c");
        graph.insert_op_before(op_d, op_c);
        let op_b = mk_op(&mut graph, "b");
        graph.insert_op_after(op_a, op_b);

        assert_eq!(graph.ops(), &[op_a, op_b, op_c, op_d]);
        assert_eq!(graph.position(op_c), Some(2));
        assert!(graph.is_attached(op_b));
    }

    #[test]
    fn detach_and_remove() {
        let mut graph = Graph::new();
        let f32_ty = f32_type(&mut graph);

        let a = OperationDataBuilder::new("test", "a")
            .result(f32_ty)
            .push(&mut graph);
        let va = graph.op_result(a, 0);
        let b = OperationDataBuilder::new("test", "b")
            .operand(va)
            .result(f32_ty)
            .push(&mut graph);

        graph.detach_op(b);
        assert_eq!(graph.ops(), &[a]);
        assert!(!graph.is_attached(b));
        assert!(graph.is_live(b));

        graph.remove_op(b);
        assert!(!graph.is_live(b));
        assert!(!graph.has_uses(va));
    }

    #[test]
    #[should_panic(expected = "still has")]
    fn remove_op_panics_when_result_has_uses() {
        let mut graph = Graph::new();
        let f32_ty = f32_type(&mut graph);

        let op1 = OperationDataBuilder::new("test", "a")
            .result(f32_ty)
            .push(&mut graph);
        let v1 = graph.op_result(op1, 0);
        let _op2 = OperationDataBuilder::new("test", "b")
            .operand(v1)
            .push(&mut graph);

        graph.detach_op(op1);
        graph.remove_op(op1);
    }

    #[test]
    #[should_panic(expected = "still attached")]
    fn remove_op_panics_when_attached() {
        let mut graph = Graph::new();
        let op = OperationDataBuilder::new("test", "nop").push(&mut graph);
        graph.remove_op(op);
    }

    #[test]
    #[should_panic(expected = "already attached")]
    fn push_op_panics_when_attached_twice() {
        let mut graph = Graph::new();
        let op = OperationDataBuilder::new("test", "nop").push(&mut graph);
        graph.push_op(op);
    }

    #[test]
    fn entity_ref_display() {
        use cranelift_entity::EntityRef;

        assert_eq!(format!("{}", OpRef::new(0)), "op0");
        assert_eq!(format!("{}", ValueRef::new(5)), "v5");
        assert_eq!(format!("{}", TypeRef::new(3)), "ty3");
        assert_eq!(
            ValueDef {
                op: OpRef::new(2),
                index: 1
            }
            .to_string(),
            "op2#1"
        );
    }
}
