use pretty_assertions::assert_eq;

use argus_il::Label;

use crate::builder::GraphBuilder;
use crate::context::{ContextStack, Frame};
use crate::edge_tag::EdgeTag;
use crate::point::Apc;
use crate::subroutine::{SubKind, SubroutinePool};
use crate::test_helpers::{method, requires, TestMeta};

use super::*;

struct LoopFixture {
    pool: SubroutinePool,
    m: SubId,
    req: SubId,
    fin: SubId,
    header: BlockId,
    body: BlockId,
    done: BlockId,
}

/// Method whose entry edge carries a requires and whose loop back edge
/// carries a finally:
///
/// ```text
/// entry -[req]-> header -T-> body -[fin]-> header
///                       -F-> done -> exit
/// ```
fn loop_fixture() -> LoopFixture {
    let mut b = GraphBuilder::new();
    let m = b.add_subroutine(method(0));
    let req = b.add_subroutine(requires(0));
    let fin = b.add_subroutine(SubKind::FaultFinally);
    let entry = b.pool()[m].entry();
    let exit = b.pool()[m].exit();
    let header = b.add_block(m, vec![Label::new(0)]);
    let body = b.add_block(m, vec![Label::new(1)]);
    let done = b.add_block(m, vec![Label::new(2)]);
    b.add_edge(entry, EdgeTag::ENTRY, header).unwrap();
    b.add_edge(header, EdgeTag::TRUE_EDGE, body).unwrap();
    b.add_edge(header, EdgeTag::FALSE_EDGE, done).unwrap();
    b.add_edge(body, EdgeTag::BRANCH, header).unwrap();
    b.add_edge(done, EdgeTag::RETURN, exit).unwrap();
    b.attach_subroutine(entry, header, EdgeTag::ENTRY, req).unwrap();
    b.attach_subroutine(body, header, EdgeTag::FINALLY, fin).unwrap();
    b.set_entry_after_requires(m, header).unwrap();
    for s in [req, fin] {
        let e = b.pool()[s].entry();
        let x = b.pool()[s].exit();
        b.add_edge(e, EdgeTag::FALL_THROUGH, x).unwrap();
    }
    LoopFixture {
        pool: b.finish(),
        m,
        req,
        fin,
        header,
        body,
        done,
    }
}

#[test]
fn distinguished_points_use_the_empty_context() {
    let f = loop_fixture();
    let cfg = Cfg::new(&f.pool, f.m);
    let sub = &f.pool[f.m];
    assert_eq!(cfg.entry(), Apc::new(sub.entry(), 0, ContextStack::empty()));
    assert_eq!(
        cfg.entry_after_requires(),
        Apc::new(f.header, 0, ContextStack::empty())
    );
    assert_eq!(
        cfg.normal_exit(),
        Apc::new(sub.exit(), 0, ContextStack::empty())
    );
    assert_eq!(
        cfg.exception_exit(),
        Apc::new(sub.exception_exit(), 0, ContextStack::empty())
    );
}

#[test]
fn next_walks_through_the_entry_requires() {
    let f = loop_fixture();
    let cfg = Cfg::new(&f.pool, f.m);
    let mut point = cfg.entry();
    let mut trail = vec![point.block];
    loop {
        let step = cfg.next(&point);
        if step == point {
            break;
        }
        trail.push(step.block);
        point = step;
    }
    // Entry descends into the requires, surfaces at the loop header, and
    // stops there (the header end is a split point).
    assert_eq!(
        trail,
        vec![
            f.pool[f.m].entry(),
            f.pool[f.req].entry(),
            f.pool[f.req].exit(),
            f.header,
            f.header,
        ]
    );
    assert!(cfg.is_split_point(&point));
    assert_eq!(cfg.has_single_successor(&point), None);
    assert_eq!(cfg.successors(&point).len(), 2);
}

#[test]
fn join_and_split_points_are_block_level_facts() {
    let f = loop_fixture();
    let cfg = Cfg::new(&f.pool, f.m);
    // The header is entered from the method entry and the loop body.
    assert!(cfg.is_join_point(&Apc::new(f.header, 0, ContextStack::empty())));
    // Only block starts are join points.
    assert!(!cfg.is_join_point(&Apc::new(f.header, 1, ContextStack::empty())));
    assert!(!cfg.is_split_point(&Apc::new(f.header, 0, ContextStack::empty())));
    assert!(!cfg.is_join_point(&Apc::new(f.body, 0, ContextStack::empty())));
}

#[test]
fn back_edge_is_recognized_in_the_same_context() {
    let f = loop_fixture();
    let cfg = Cfg::new(&f.pool, f.m);
    let from = f.pool.end_of(f.body, ContextStack::empty());
    let to = Apc::new(f.header, 0, ContextStack::empty());
    assert!(cfg.is_forward_back_edge(&from, &to));
    assert!(cfg.is_target_of_back_edge(&to));

    let forward = f.pool.end_of(f.done, ContextStack::empty());
    let exit = Apc::new(f.pool[f.m].exit(), 0, ContextStack::empty());
    assert!(!cfg.is_forward_back_edge(&forward, &exit));
}

#[test]
fn back_edge_is_recognized_through_the_attached_finally() {
    let f = loop_fixture();
    let cfg = Cfg::new(&f.pool, f.m);
    // Stepping out of the finally pops the frame for the body -> header
    // edge; the step must still read as the loop's back edge.
    let ctx = ContextStack::empty().push(Frame {
        source: f.body,
        target: f.header,
        tag: EdgeTag::FINALLY,
    });
    let from = Apc::new(f.pool[f.fin].exit(), 0, ctx);
    let to = Apc::new(f.header, 0, ContextStack::empty());
    assert_eq!(cfg.successors(&from).as_slice(), &[to.clone()]);
    assert!(cfg.is_forward_back_edge(&from, &to));

    // A frame that does not pop down to the target's context is not one.
    let deeper = Apc::new(
        f.pool[f.fin].exit(),
        0,
        ContextStack::empty()
            .push(Frame {
                source: f.body,
                target: f.header,
                tag: EdgeTag::FINALLY,
            })
            .push(Frame {
                source: f.body,
                target: f.header,
                tag: EdgeTag::FAULT,
            }),
    );
    assert!(!cfg.is_forward_back_edge(&deeper, &to));
}

#[test]
fn subroutines_lists_the_method_and_every_attachment() {
    let f = loop_fixture();
    let cfg = Cfg::new(&f.pool, f.m);
    assert_eq!(cfg.subroutines(), vec![f.m, f.req, f.fin]);
}

#[test]
fn block_graph_collapses_parallel_edges() {
    let mut b = GraphBuilder::new();
    let m = b.add_subroutine(method(0));
    let entry = b.pool()[m].entry();
    let exit = b.pool()[m].exit();
    let cond = b.add_block(m, vec![Label::new(0)]);
    b.add_edge(entry, EdgeTag::ENTRY, cond).unwrap();
    // Both branch arms reach the exit.
    b.add_edge(cond, EdgeTag::TRUE_EDGE, exit).unwrap();
    b.add_edge(cond, EdgeTag::FALSE_EDGE, exit).unwrap();
    let pool = b.finish();
    let cfg = Cfg::new(&pool, m);
    let graph = cfg.block_graph(m);
    assert_eq!(graph.successors(cond).as_slice(), &[exit]);
    assert_eq!(graph.predecessors(exit).as_slice(), &[cond]);
    assert_eq!(graph.entry(), entry);
    assert_eq!(graph.exit(), exit);
    let blocks: Vec<BlockId> = graph.blocks().map(|blk| blk.id()).collect();
    assert_eq!(blocks[0], entry);
}

#[test]
fn print_renders_every_used_subroutine_once() {
    let f = loop_fixture();
    let cfg = Cfg::new(&f.pool, f.m);
    let mut out = String::new();
    cfg.print(
        &mut out,
        &TestMeta::default(),
        &|w, point| write!(w, "{point}"),
        None,
        &ContextStack::empty(),
    )
    .unwrap();

    assert!(out.contains("subroutine SR0 (method) (M0)"));
    assert!(out.contains("subroutine SR1 (requires) (M0)"));
    assert!(out.contains("subroutine SR2 (fault-finally)"));
    // Without a context lookup each subroutine is printed exactly once.
    assert_eq!(out.matches("subroutine SR1").count(), 1);
    // The loop back edge is marked.
    assert!(out.contains("BE"));
    // Attachments are listed on their edges.
    assert!(out.contains(&format!("[{}(", f.req)));
}

#[test]
fn print_renders_each_subroutine_per_reported_context() {
    let f = loop_fixture();
    let cfg = Cfg::new(&f.pool, f.m);
    let entry_ctx = ContextStack::empty().push(Frame {
        source: f.pool[f.m].entry(),
        target: f.header,
        tag: EdgeTag::ENTRY,
    });
    let req_entry = f.pool[f.req].entry();
    let lookup_ctx = entry_ctx.clone();
    let lookup = move |block: BlockId| {
        if block == req_entry {
            // The same context twice, plus the empty one.
            vec![lookup_ctx.clone(), lookup_ctx.clone(), ContextStack::empty()]
        } else {
            vec![ContextStack::empty()]
        }
    };
    let mut out = String::new();
    cfg.print(
        &mut out,
        &TestMeta::default(),
        &|w, point| write!(w, "{point}"),
        Some(&lookup),
        &ContextStack::empty(),
    )
    .unwrap();

    // Once per distinct (subroutine, context) pair; the duplicate
    // context is collapsed by the printed set.
    assert_eq!(out.matches("subroutine SR1").count(), 2);
    assert_eq!(out.matches("subroutine SR2").count(), 1);
    // The contextual rendering names the entry point under its stack.
    assert!(out.contains(&Apc::new(req_entry, 0, entry_ctx).to_string()));
}

#[test]
#[should_panic(expected = "not a method body")]
fn facade_rejects_non_method_subroutines() {
    let mut b = GraphBuilder::new();
    let r = b.add_subroutine(requires(0));
    let pool = b.finish();
    let _ = Cfg::new(&pool, r);
}
