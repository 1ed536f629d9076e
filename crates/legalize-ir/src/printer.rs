//! Text format printer for graphs.
//!
//! One line per attached operation, in iteration order:
//!
//! ```text
//! %0 = test.input : core.f32
//! %1 = core.convert %0 : core.f16
//! %2 = test.relu %1 {alpha = 0} : core.f16
//! test.output %2
//! ```
//!
//! Values are numbered in order of definition. An operand whose producer has
//! not been printed yet (detached, erased, or later in the order) prints as `%?`.

use std::collections::HashMap;
use std::fmt::Write;

use crate::graph::Graph;
use crate::refs::{OpRef, TypeRef, ValueRef};
use crate::types::Attribute;

struct PrintState<'a> {
    graph: &'a Graph,
    value_names: HashMap<ValueRef, String>,
    next_value_num: usize,
}

impl<'a> PrintState<'a> {
    fn new(graph: &'a Graph) -> Self {
        Self {
            graph,
            value_names: HashMap::new(),
            next_value_num: 0,
        }
    }

    fn assign_value_name(&mut self, v: ValueRef) -> String {
        let name = format!("%{}", self.next_value_num);
        self.next_value_num += 1;
        self.value_names.insert(v, name.clone());
        name
    }

    fn value_name(&self, v: ValueRef) -> &str {
        self.value_names.get(&v).map(|s| s.as_str()).unwrap_or("%?")
    }

    fn print_op(&mut self, out: &mut String, op: OpRef) {
        let graph = self.graph;
        let results = graph.op_results(op);
        if !results.is_empty() {
            let names: Vec<String> = results
                .iter()
                .map(|&v| self.assign_value_name(v))
                .collect();
            let _ = write!(out, "{} = ", names.join(", "));
        }

        out.push_str(&graph.op_full_name(op));

        let operands = graph.op_operands(op);
        if !operands.is_empty() {
            let names: Vec<&str> = operands.iter().map(|&v| self.value_name(v)).collect();
            let _ = write!(out, " {}", names.join(", "));
        }

        let attrs = &graph.op(op).attributes;
        if !attrs.is_empty() {
            let mut entries: Vec<(String, String)> = attrs
                .iter()
                .map(|(k, v)| (k.to_string(), print_attribute(graph, v)))
                .collect();
            entries.sort();
            let body: Vec<String> = entries
                .into_iter()
                .map(|(k, v)| format!("{k} = {v}"))
                .collect();
            let _ = write!(out, " {{{}}}", body.join(", "));
        }

        if !results.is_empty() {
            let types: Vec<String> = results
                .iter()
                .map(|&v| print_type(graph, graph.value_ty(v)))
                .collect();
            let _ = write!(out, " : {}", types.join(", "));
        }
        out.push('\n');
    }
}

/// Print every attached operation of the graph.
pub fn print_graph(graph: &Graph) -> String {
    let mut state = PrintState::new(graph);
    let mut out = String::new();
    for &op in graph.ops() {
        state.print_op(&mut out, op);
    }
    out
}

/// Print a single operation. Operand names are local to this call and print
/// as `%?`.
pub fn print_op(graph: &Graph, op: OpRef) -> String {
    let mut state = PrintState::new(graph);
    let mut out = String::new();
    state.print_op(&mut out, op);
    out.truncate(out.trim_end().len());
    out
}

/// Print a type, e.g. `core.f32` or `tensor.tensor(core.f16){shape = [2, 3]}`.
pub fn print_type(graph: &Graph, ty: TypeRef) -> String {
    let data = graph.types.get(ty);
    let mut out = format!("{}.{}", data.dialect, data.name);
    if !data.params.is_empty() {
        let params: Vec<String> = data.params.iter().map(|&p| print_type(graph, p)).collect();
        let _ = write!(out, "({})", params.join(", "));
    }
    if !data.attrs.is_empty() {
        let mut entries: Vec<String> = data
            .attrs
            .iter()
            .map(|(k, v)| format!("{k} = {}", print_attribute(graph, v)))
            .collect();
        entries.sort();
        let _ = write!(out, "{{{}}}", entries.join(", "));
    }
    out
}

fn print_attribute(graph: &Graph, attr: &Attribute) -> String {
    match attr {
        Attribute::Unit => "unit".to_string(),
        Attribute::Bool(b) => b.to_string(),
        Attribute::IntBits(bits) => (*bits as i64).to_string(),
        Attribute::FloatBits(bits) => format!("{:?}", f64::from_bits(*bits)),
        Attribute::String(s) => format!("{s:?}"),
        Attribute::Symbol(s) => format!("@{s}"),
        Attribute::Type(ty) => print_type(graph, *ty),
        Attribute::List(items) => {
            let items: Vec<String> = items.iter().map(|a| print_attribute(graph, a)).collect();
            format!("[{}]", items.join(", "))
        }
    }
}
