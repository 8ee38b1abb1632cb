//! Human-readable graph dumps.
//!
//! Renders a method subroutine and everything it references, one
//! (subroutine, context) pair at a time in first-encounter order, each pair
//! printed once. Blocks appear in display-index order with their
//! predecessor edges, the instruction slots (rendered by a caller-supplied
//! printer), and their successor edges annotated with attachment chains and
//! back-edge markers. Without a context lookup every referenced subroutine
//! prints once under the empty context; with one, it prints once per
//! context the lookup reports for its entry block. The output is
//! deterministic for a given pool, which makes it usable in snapshot tests.

use std::fmt::{self, Write};

use rustc_hash::FxHashSet;

use argus_il::Metadata;

use crate::block::{BlockId, SubId};
use crate::context::ContextStack;
use crate::point::Apc;
use crate::subroutine::{EdgeFilter, SubroutinePool};

/// Contexts under which a subroutine (named by its entry block) should be
/// printed.
pub type ContextLookup<'a> = &'a dyn Fn(BlockId) -> Vec<ContextStack>;

pub(crate) fn print_graph(
    w: &mut dyn Write,
    pool: &SubroutinePool,
    metadata: &dyn Metadata,
    root: SubId,
    il: &dyn Fn(&mut dyn Write, &Apc) -> fmt::Result,
    context_lookup: Option<ContextLookup<'_>>,
    context: &ContextStack,
) -> fmt::Result {
    let mut order: Vec<(SubId, ContextStack)> = vec![(root, context.clone())];
    let mut printed: FxHashSet<(SubId, ContextStack)> = FxHashSet::default();
    let mut next = 0;
    while next < order.len() {
        let (id, ctx) = order[next].clone();
        next += 1;
        if !printed.insert((id, ctx.clone())) {
            continue;
        }
        print_subroutine(w, pool, metadata, id, &ctx, il, &mut |child| {
            match context_lookup {
                None => order.push((child, ContextStack::empty())),
                Some(lookup) => {
                    for child_ctx in lookup(pool[child].entry()) {
                        order.push((child, child_ctx));
                    }
                }
            }
        })?;
    }
    Ok(())
}

fn print_subroutine(
    w: &mut dyn Write,
    pool: &SubroutinePool,
    metadata: &dyn Metadata,
    id: SubId,
    ctx: &ContextStack,
    il: &dyn Fn(&mut dyn Write, &Apc) -> fmt::Result,
    referenced: &mut dyn FnMut(SubId),
) -> fmt::Result {
    let sub = &pool[id];
    write!(w, "subroutine {id} ({})", sub.kind().name())?;
    if let Some(method) = sub.kind().method_info() {
        write!(w, " ({})", metadata.method_name(method))?;
    }
    if !ctx.is_empty() {
        write!(w, " {}", Apc::new(sub.entry(), 0, ctx.clone()))?;
    }
    writeln!(w)?;
    for block in sub.blocks() {
        write!(w, "  block {} [idx {}", block.id(), block.index())?;
        if sub.is_subroutine_start(block.id()) {
            write!(w, ", entry")?;
        }
        if block.id() == sub.exit() {
            write!(w, ", exit")?;
        }
        if block.id() == sub.exception_exit() {
            write!(w, ", exc-exit")?;
        }
        writeln!(w, "]")?;

        let preds = sub.predecessor_edges(block.id());
        if !preds.is_empty() {
            write!(w, "    preds:")?;
            for (tag, pred) in &preds {
                write!(w, " {pred}({tag})")?;
            }
            writeln!(w)?;
        }

        for point in block.points(ctx) {
            write!(w, "    ")?;
            il(w, &point)?;
            writeln!(w)?;
        }

        for (tag, succ) in sub.successor_edges(block.id()) {
            write!(w, "    -> {succ} ({tag})")?;
            if sub.is_back_edge(block.id(), succ) {
                write!(w, " BE")?;
            }
            let subs = sub.ordinary_edge_subroutines(pool, block.id(), succ, ctx, EdgeFilter::All);
            for &(attach_tag, child) in &subs {
                write!(w, " [{child}({attach_tag})]")?;
                referenced(child);
            }
            writeln!(w)?;
        }
    }
    writeln!(w)
}
