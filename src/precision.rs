//! Precision lowering: retype every value of one element type to another.
//!
//! The usual instance lowers `core.f32` to `core.f16`. Types that carry the
//! source type as a parameter, like `tensor.tensor(core.f32){shape = [2, 3]}`,
//! are rebuilt around the target type with their attributes kept. Values
//! crossing into skipped operations are converted back with `core.convert`.

use std::collections::HashSet;

use legalize_ir::{
    Graph, OpRef, OperationDataBuilder, Symbol, TypeInterner, TypeRef, ValueRef, symbols,
};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::cleanup::{CleanupStats, fold_conversions};
use crate::error::ConfigError;
use crate::ledger::Ledger;
use crate::policy::ConversionPolicy;

symbols! {
    DIALECT_CORE => "core",
    OP_CONVERT => "convert",
}

/// Configuration for [`PrecisionPolicy`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrecisionConfig {
    /// Type to lower, as `dialect.name`.
    pub from: String,
    /// Type to lower to, as `dialect.name`.
    pub to: String,
    /// Full names of operations left at their original types, e.g.
    /// `func.return`.
    pub skip_ops: Vec<String>,
    /// Fold redundant conversions once the walk is done.
    pub fold_conversions: bool,
}

impl Default for PrecisionConfig {
    fn default() -> Self {
        Self {
            from: "core.f32".to_owned(),
            to: "core.f16".to_owned(),
            skip_ops: Vec::new(),
            fold_conversions: true,
        }
    }
}

/// Lowers every value of one type, alone or as a type parameter, to another.
pub struct PrecisionPolicy {
    from: TypeRef,
    to: TypeRef,
    skip_ops: HashSet<String>,
    fold: bool,
    cleanup: Option<CleanupStats>,
}

impl PrecisionPolicy {
    pub fn new(graph: &mut Graph, config: &PrecisionConfig) -> Result<Self, ConfigError> {
        let from = intern_type_name(&mut graph.types, &config.from)?;
        let to = intern_type_name(&mut graph.types, &config.to)?;
        if from == to {
            return Err(ConfigError::SameType(config.from.clone()));
        }
        Ok(Self {
            from,
            to,
            skip_ops: config.skip_ops.iter().cloned().collect(),
            fold: config.fold_conversions,
            cleanup: None,
        })
    }

    pub fn from_type(&self) -> TypeRef {
        self.from
    }

    pub fn to_type(&self) -> TypeRef {
        self.to
    }

    /// What the cleanup did, once the conversion ran with folding enabled.
    pub fn cleanup_stats(&self) -> Option<CleanupStats> {
        self.cleanup
    }

    /// `ty` with every occurrence of the source type replaced.
    pub fn retarget(&self, types: &mut TypeInterner, ty: TypeRef) -> TypeRef {
        if ty == self.from {
            return self.to;
        }
        let params = types.get(ty).params.clone();
        if params.is_empty() {
            return ty;
        }

        let mut retargeted: SmallVec<[TypeRef; 4]> = SmallVec::with_capacity(params.len());
        let mut changed = false;
        for &param in &params {
            let new = self.retarget(types, param);
            changed |= new != param;
            retargeted.push(new);
        }
        if !changed {
            return ty;
        }

        let mut data = types.get(ty).clone();
        data.params = retargeted;
        types.intern(data)
    }

    fn target_for(&self, graph: &mut Graph, current: TypeRef) -> Option<TypeRef> {
        let target = self.retarget(&mut graph.types, current);
        (target != current).then_some(target)
    }
}

impl ConversionPolicy for PrecisionPolicy {
    fn target_type_for_output(&self, graph: &mut Graph, output: ValueRef) -> Option<TypeRef> {
        let current = graph.value_ty(output);
        self.target_for(graph, current)
    }

    fn target_type_for_input(
        &self,
        graph: &mut Graph,
        node: OpRef,
        index: u32,
    ) -> Option<TypeRef> {
        let current = graph.value_ty(graph.op_operands(node)[index as usize]);
        self.target_for(graph, current)
    }

    fn can_convert(&self, graph: &Graph, node: OpRef) -> bool {
        if graph.is_op(node, DIALECT_CORE(), OP_CONVERT()) {
            return false;
        }
        !self.skip_ops.contains(&graph.op_full_name(node))
    }

    fn create_conversion(&mut self, graph: &mut Graph, value: ValueRef, dst: TypeRef) -> OpRef {
        OperationDataBuilder::new(DIALECT_CORE(), OP_CONVERT())
            .operand(value)
            .result(dst)
            .build(graph)
    }

    fn clean_up(&mut self, graph: &mut Graph, ledger: &Ledger) {
        if !self.fold {
            return;
        }
        let conversions = ledger.live_conversions(graph);
        let stats = fold_conversions(graph, &conversions, &*self);
        debug!(
            "precision: {} of {} conversion(s) remain",
            ledger.live_conversions(graph).len(),
            ledger.len()
        );
        self.cleanup = Some(stats);
    }
}

fn intern_type_name(types: &mut TypeInterner, text: &str) -> Result<TypeRef, ConfigError> {
    match text.split_once('.') {
        Some((dialect, name)) if !dialect.is_empty() && !name.is_empty() => {
            Ok(types.scalar(Symbol::from_dynamic(dialect), Symbol::from_dynamic(name)))
        }
        _ => Err(ConfigError::InvalidTypeName(text.to_owned())),
    }
}
