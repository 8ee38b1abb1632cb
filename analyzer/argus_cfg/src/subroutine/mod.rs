//! Subroutines: reusable block-graph regions and boundary-crossing
//! traversal.
//!
//! A subroutine owns a local block graph (entry, normal exit, exception
//! exit, tagged adjacency maps, a spanning tree for back-edge tests) plus a
//! table of *attachments*: child subroutines bound to specific local edges.
//! When traversal walks off the end of a block whose outgoing edge carries
//! attachments, it descends into the first child — pushing an inlining
//! frame — instead of stepping to the raw destination; reaching a child's
//! exit pops the frame and resumes either the next attachment in the chain
//! or the destination block. This is what lets one precondition or finally
//! body be shared by many call sites without duplicating its blocks.
//!
//! All cross-subroutine queries take the owning [`SubroutinePool`] (the
//! arena every subroutine lives in) and an explicit [`EdgeFilter`]
//! controlling attachment resolution; there is no ambient override state.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;
use smallvec::{smallvec, SmallVec};

use argus_il::{MethodId, TypeId};

use crate::block::{Block, BlockId, CallSite, SubId};
use crate::context::{ContextStack, Frame};
use crate::dfs::SpanningTree;
use crate::edge_map::EdgeMap;
use crate::edge_tag::EdgeTag;
use crate::point::Apc;

/// What a subroutine *is*. One discriminant with kind-specific payload;
/// classification predicates pattern-match on it.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SubKind {
    /// The user method body itself.
    Method {
        method: MethodId,
        is_constructor: bool,
    },
    /// Precondition check region of `method`.
    Requires { method: MethodId },
    /// Postcondition check region of `method`.
    Ensures { method: MethodId },
    /// Old-value capture region belonging to `method`'s postcondition.
    OldValue { method: MethodId },
    /// Object invariant check region of `ty`.
    Invariant { ty: TypeId },
    /// Fault/finally handler region.
    FaultFinally,
    /// Free-standing helper region with no contract role.
    Simple,
}

impl SubKind {
    /// Contract kinds: requires, ensures, invariant, old-value.
    pub const fn is_contract(self) -> bool {
        matches!(
            self,
            SubKind::Requires { .. }
                | SubKind::Ensures { .. }
                | SubKind::OldValue { .. }
                | SubKind::Invariant { .. }
        )
    }

    pub const fn is_method(self) -> bool {
        matches!(self, SubKind::Method { .. })
    }

    pub const fn is_requires(self) -> bool {
        matches!(self, SubKind::Requires { .. })
    }

    pub const fn is_ensures_or_old(self) -> bool {
        matches!(self, SubKind::Ensures { .. } | SubKind::OldValue { .. })
    }

    pub const fn is_invariant(self) -> bool {
        matches!(self, SubKind::Invariant { .. })
    }

    pub const fn is_fault_finally(self) -> bool {
        matches!(self, SubKind::FaultFinally)
    }

    /// The user method this region belongs to, for the kinds that carry
    /// one. This is the "enclosing method" capability the context walk
    /// looks for.
    pub const fn method_info(self) -> Option<MethodId> {
        match self {
            SubKind::Method { method, .. }
            | SubKind::Requires { method }
            | SubKind::Ensures { method }
            | SubKind::OldValue { method } => Some(method),
            SubKind::Invariant { .. } | SubKind::FaultFinally | SubKind::Simple => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            SubKind::Method {
                is_constructor: true,
                ..
            } => "constructor",
            SubKind::Method { .. } => "method",
            SubKind::Requires { .. } => "requires",
            SubKind::Ensures { .. } => "ensures",
            SubKind::OldValue { .. } => "old",
            SubKind::Invariant { .. } => "invariant",
            SubKind::FaultFinally => "fault-finally",
            SubKind::Simple => "simple",
        }
    }
}

/// Attachment-resolution capability, threaded explicitly through every
/// query that resolves edge attachments.
///
/// [`EdgeFilter::NoContracts`] is what the contract-filtering CFG view
/// supplies: traversal under it never observes contract-kind children as
/// control flow.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub enum EdgeFilter {
    #[default]
    All,
    NoContracts,
}

impl EdgeFilter {
    fn admits(self, kind: SubKind) -> bool {
        match self {
            EdgeFilter::All => true,
            EdgeFilter::NoContracts => !kind.is_contract(),
        }
    }
}

/// Ordered attachment list for one edge.
pub type EdgeSubroutines = SmallVec<[(EdgeTag, SubId); 2]>;

/// A reusable block-graph region.
#[derive(Clone, Debug)]
pub struct Subroutine {
    id: SubId,
    kind: SubKind,
    entry: BlockId,
    exit: BlockId,
    exception_exit: BlockId,
    entry_after_requires: Option<BlockId>,
    blocks: Vec<Block>,
    succ_edges: EdgeMap,
    pred_edges: EdgeMap,
    /// Edge -> ordered attachments, in insertion (= execution) order.
    /// BTreeMap so that iteration (dump, `used_subroutines`) is
    /// deterministic.
    edge_subs: BTreeMap<(u32, u32), Vec<(EdgeTag, SubId)>>,
    spanning_tree: Option<SpanningTree>,
}

impl Subroutine {
    /// New subroutine with fresh empty entry (slot 0), exit (slot 1) and
    /// exception-exit (slot 2) blocks.
    pub(crate) fn new(id: SubId, kind: SubKind) -> Self {
        let entry = BlockId::new(id, 0);
        let exit = BlockId::new(id, 1);
        let exception_exit = BlockId::new(id, 2);
        Self {
            id,
            kind,
            entry,
            exit,
            exception_exit,
            entry_after_requires: None,
            blocks: vec![
                Block::new(entry, Vec::new(), None),
                Block::new(exit, Vec::new(), None),
                Block::new(exception_exit, Vec::new(), None),
            ],
            succ_edges: EdgeMap::default(),
            pred_edges: EdgeMap::default(),
            edge_subs: BTreeMap::new(),
            spanning_tree: None,
        }
    }

    pub fn id(&self) -> SubId {
        self.id
    }

    pub fn kind(&self) -> SubKind {
        self.kind
    }

    pub fn entry(&self) -> BlockId {
        self.entry
    }

    pub fn exit(&self) -> BlockId {
        self.exit
    }

    pub fn exception_exit(&self) -> BlockId {
        self.exception_exit
    }

    /// First block past the precondition checks; falls back to the plain
    /// entry when none was recorded.
    pub fn entry_after_requires(&self) -> BlockId {
        self.entry_after_requires.unwrap_or(self.entry)
    }

    /// The user method this subroutine is the body of.
    ///
    /// Asking a non-method subroutine is a programmer error and fails
    /// loudly: it indicates a malformed graph, not a missing value.
    pub fn method(&self) -> MethodId {
        match self.kind {
            SubKind::Method { method, .. } => method,
            other => panic!(
                "{} is a {} subroutine, not a method subroutine",
                self.id,
                other.name()
            ),
        }
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Blocks that survived finalization, in display-index order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        let mut used: Vec<&Block> = self.blocks.iter().filter(|b| b.is_used()).collect();
        used.sort_by_key(|b| b.index());
        used.into_iter()
    }

    pub fn block(&self, id: BlockId) -> &Block {
        assert!(
            id.sub() == self.id,
            "block {id} does not belong to subroutine {}",
            self.id
        );
        &self.blocks[id.slot() as usize]
    }

    pub(crate) fn add_block(&mut self, labels: Vec<argus_il::Label>, call: Option<CallSite>) -> BlockId {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "block slot counts stay far below u32::MAX"
        )]
        let id = BlockId::new(self.id, self.blocks.len() as u32);
        self.blocks.push(Block::new(id, labels, call));
        id
    }

    pub(crate) fn set_entry_after_requires(&mut self, block: BlockId) {
        self.entry_after_requires = Some(block);
    }

    pub(crate) fn add_edge(&mut self, from: BlockId, tag: EdgeTag, to: BlockId) {
        self.succ_edges.push(from.slot(), tag, to.slot());
    }

    /// Record that edge `(from, to)` runs `child` before reaching `to`.
    /// Multiple attachments on one edge preserve insertion order, which is
    /// execution order (outermost first).
    pub(crate) fn attach(&mut self, from: BlockId, to: BlockId, tag: EdgeTag, child: SubId) {
        self.edge_subs
            .entry((from.slot(), to.slot()))
            .or_default()
            .push((tag, child));
    }

    pub fn is_subroutine_start(&self, block: BlockId) -> bool {
        block == self.entry
    }

    pub fn is_subroutine_end(&self, block: BlockId) -> bool {
        block == self.exit || block == self.exception_exit
    }

    /// Does `block` head an exception-handler region? The exception exit
    /// doubles as the catch-filter header of this subroutine.
    pub fn is_handler_header(&self, block: BlockId) -> bool {
        block == self.exception_exit
    }

    /// More than one distinct local predecessor, via the adjacency map and
    /// without crossing subroutine boundaries.
    pub fn is_join_point(&self, block: BlockId) -> bool {
        self.pred_edges.distinct_targets_from(block.slot()) > 1
    }

    /// More than one distinct local successor.
    pub fn is_split_point(&self, block: BlockId) -> bool {
        self.succ_edges.distinct_targets_from(block.slot()) > 1
    }

    /// Local successor blocks (one entry per edge, crossing nothing).
    pub fn successor_blocks(&self, block: BlockId) -> SmallVec<[BlockId; 4]> {
        self.succ_edges
            .edges_from(block.slot())
            .iter()
            .map(|e| BlockId::new(self.id, e.to))
            .collect()
    }

    /// Local predecessor blocks (one entry per edge).
    pub fn predecessor_blocks(&self, block: BlockId) -> SmallVec<[BlockId; 4]> {
        self.pred_edges
            .edges_from(block.slot())
            .iter()
            .map(|e| BlockId::new(self.id, e.to))
            .collect()
    }

    /// Local successor edges of `block` with their tags.
    pub fn successor_edges(&self, block: BlockId) -> SmallVec<[(EdgeTag, BlockId); 4]> {
        self.succ_edges
            .edges_from(block.slot())
            .iter()
            .map(|e| (e.tag, BlockId::new(self.id, e.to)))
            .collect()
    }

    /// Local predecessor edges of `block` with their tags.
    pub fn predecessor_edges(&self, block: BlockId) -> SmallVec<[(EdgeTag, BlockId); 4]> {
        self.pred_edges
            .edges_from(block.slot())
            .iter()
            .map(|e| (e.tag, BlockId::new(self.id, e.to)))
            .collect()
    }

    /// Is `from -> to` a back edge in this subroutine's spanning tree?
    pub fn is_back_edge(&self, from: BlockId, to: BlockId) -> bool {
        self.tree().is_back_edge(from.slot(), to.slot())
    }

    /// Is `block` the target of some back edge (a loop header)?
    pub fn is_target_of_back_edge(&self, block: BlockId) -> bool {
        self.tree().is_target_of_back_edge(block.slot())
    }

    fn tree(&self) -> &SpanningTree {
        match &self.spanning_tree {
            Some(tree) => tree,
            None => panic!("subroutine {} queried before finalization", self.id),
        }
    }

    /// The ordered attachment list for local edge `(from, to)` under
    /// `context`, after recursive-contract suppression and `filter`.
    ///
    /// Under a non-empty context, a contract child is dropped when it is
    /// the destination's own subroutine or already the owning subroutine of
    /// a frame on the stack: a self-recursive contract must not expand
    /// inside itself.
    pub fn ordinary_edge_subroutines(
        &self,
        pool: &SubroutinePool,
        from: BlockId,
        to: BlockId,
        context: &ContextStack,
        filter: EdgeFilter,
    ) -> EdgeSubroutines {
        debug_assert!(from.sub() == self.id, "edge source owned elsewhere");
        let mut out = EdgeSubroutines::new();
        let Some(list) = self.edge_subs.get(&(from.slot(), to.slot())) else {
            return out;
        };
        for &(tag, child) in list {
            let kind = pool[child].kind;
            if !context.is_empty()
                && kind.is_contract()
                && (child == to.sub() || context.iter().any(|f| f.source.sub() == child))
            {
                continue;
            }
            if !filter.admits(kind) {
                continue;
            }
            out.push((tag, child));
        }
        out
    }

    /// Attachment list plus a flag marking exception-handler edges.
    ///
    /// Handler regions are entered deepest-first while ordinary contract
    /// chains are entered outermost-first; callers use the flag to preserve
    /// that distinction. Delegates to the edge's owning subroutine when
    /// `from` is foreign.
    pub fn edge_subroutines_outer_to_inner(
        &self,
        pool: &SubroutinePool,
        from: BlockId,
        to: BlockId,
        context: &ContextStack,
        filter: EdgeFilter,
    ) -> (EdgeSubroutines, bool) {
        if from.sub() != self.id {
            return pool[from.sub()].edge_subroutines_outer_to_inner(pool, from, to, context, filter);
        }
        let is_handler_edge = self.is_handler_header(to);
        (
            self.ordinary_edge_subroutines(pool, from, to, context, filter),
            is_handler_edge,
        )
    }

    /// The point at which traversal continues when control moves from
    /// `point` (at block end) toward local successor `succ`: the raw
    /// destination if the edge carries no attachments, otherwise the first
    /// attachment's entry under a grown context.
    pub fn compute_target_finally_context(
        &self,
        pool: &SubroutinePool,
        point: &Apc,
        succ: BlockId,
        filter: EdgeFilter,
    ) -> Apc {
        let (subs, _) =
            self.edge_subroutines_outer_to_inner(pool, point.block, succ, &point.context, filter);
        match subs.first() {
            None => Apc::new(succ, 0, point.context.clone()),
            Some(&(tag, first)) => Apc::new(
                pool[first].entry,
                0,
                point.context.push(Frame {
                    source: point.block,
                    target: succ,
                    tag,
                }),
            ),
        }
    }

    /// Successor points of `point`, transparently crossing subroutine
    /// boundaries. Empty exactly when `point` is an outermost exit with an
    /// empty context.
    pub fn successors(
        &self,
        pool: &SubroutinePool,
        point: &Apc,
        filter: EdgeFilter,
    ) -> SmallVec<[Apc; 4]> {
        debug_assert!(point.block.sub() == self.id, "point owned elsewhere");
        if point.index < self.block(point.block).count() {
            return smallvec![Apc::new(point.block, point.index + 1, point.context.clone())];
        }
        if self.is_subroutine_end(point.block) {
            return match point.context.pop() {
                None => SmallVec::new(),
                Some((frame, tail)) => {
                    smallvec![self.continuation_after_exit(pool, frame, &tail, filter)]
                }
            };
        }
        self.successor_blocks(point.block)
            .into_iter()
            .map(|succ| self.compute_target_finally_context(pool, point, succ, filter))
            .collect()
    }

    /// Predecessor points of `point`, transparently crossing subroutine
    /// boundaries.
    pub fn predecessors(
        &self,
        pool: &SubroutinePool,
        point: &Apc,
        filter: EdgeFilter,
    ) -> SmallVec<[Apc; 4]> {
        debug_assert!(point.block.sub() == self.id, "point owned elsewhere");
        if point.index > 0 {
            return smallvec![Apc::new(point.block, point.index - 1, point.context.clone())];
        }
        if self.is_subroutine_start(point.block) {
            return match point.context.pop() {
                None => SmallVec::new(),
                Some((frame, tail)) => self.continuation_before_entry(pool, frame, &tail, filter),
            };
        }
        let mut out = SmallVec::new();
        for pred in self.predecessor_blocks(point.block) {
            let (subs, _) = self.edge_subroutines_outer_to_inner(
                pool,
                pred,
                point.block,
                &point.context,
                filter,
            );
            match subs.last() {
                None => out.push(pool.end_of(pred, point.context.clone())),
                Some(&(tag, last)) => {
                    let child = &pool[last];
                    out.push(Apc::new(
                        child.exit,
                        0,
                        point.context.push(Frame {
                            source: pred,
                            target: point.block,
                            tag,
                        }),
                    ));
                }
            }
        }
        out
    }

    /// The single successor of `point`, when there is exactly one. Cheap
    /// fast path: never materializes the full successor set.
    pub fn has_single_successor(
        &self,
        pool: &SubroutinePool,
        point: &Apc,
        filter: EdgeFilter,
    ) -> Option<Apc> {
        if point.index < self.block(point.block).count() {
            return Some(Apc::new(
                point.block,
                point.index + 1,
                point.context.clone(),
            ));
        }
        if self.is_subroutine_end(point.block) {
            let (frame, tail) = point.context.pop()?;
            return Some(self.continuation_after_exit(pool, frame, &tail, filter));
        }
        let succs = self.successor_blocks(point.block);
        match succs.as_slice() {
            [only] => Some(self.compute_target_finally_context(pool, point, *only, filter)),
            _ => None,
        }
    }

    /// The single predecessor of `point`, when there is exactly one.
    pub fn has_single_predecessor(
        &self,
        pool: &SubroutinePool,
        point: &Apc,
        filter: EdgeFilter,
    ) -> Option<Apc> {
        if point.index > 0 {
            return Some(Apc::new(
                point.block,
                point.index - 1,
                point.context.clone(),
            ));
        }
        if self.is_subroutine_start(point.block) {
            let (frame, tail) = point.context.pop()?;
            let (subs, is_handler_edge) =
                self.resolve_descended_edge(pool, frame, &tail, filter);
            let pos = Self::position_of(self.id, &subs, frame);
            if pos == 0 {
                if is_handler_edge && pool.block(frame.source).count() > 1 {
                    // Every slot of the protected block is a predecessor.
                    return None;
                }
                return Some(pool.end_of(frame.source, tail));
            }
            let (tag, prev) = subs[pos - 1];
            return Some(Apc::new(
                pool[prev].exit,
                0,
                tail.push(Frame {
                    source: frame.source,
                    target: frame.target,
                    tag,
                }),
            ));
        }
        let preds = self.predecessor_blocks(point.block);
        let [only] = preds.as_slice() else {
            return None;
        };
        let (subs, _) =
            self.edge_subroutines_outer_to_inner(pool, *only, point.block, &point.context, filter);
        match subs.last() {
            None => Some(pool.end_of(*only, point.context.clone())),
            Some(&(tag, last)) => Some(Apc::new(
                pool[last].exit,
                0,
                point.context.push(Frame {
                    source: *only,
                    target: point.block,
                    tag,
                }),
            )),
        }
    }

    /// Where traversal resumes after this subroutine's exit under `frame`:
    /// the next attachment in the edge's chain, or the frame's destination
    /// once the chain is exhausted.
    fn continuation_after_exit(
        &self,
        pool: &SubroutinePool,
        frame: Frame,
        tail: &ContextStack,
        filter: EdgeFilter,
    ) -> Apc {
        let (subs, _) = self.resolve_descended_edge(pool, frame, tail, filter);
        let pos = Self::position_of(self.id, &subs, frame);
        match subs.get(pos + 1) {
            None => Apc::new(frame.target, 0, tail.clone()),
            Some(&(tag, next)) => Apc::new(
                pool[next].entry,
                0,
                tail.push(Frame {
                    source: frame.source,
                    target: frame.target,
                    tag,
                }),
            ),
        }
    }

    /// Predecessors of this subroutine's entry under `frame`: the previous
    /// attachment's exit, or — when this is the first attachment — the
    /// source block itself. On an exception-handler edge the handler can be
    /// entered from *any* slot of the protected block, so every one of its
    /// points is a predecessor.
    fn continuation_before_entry(
        &self,
        pool: &SubroutinePool,
        frame: Frame,
        tail: &ContextStack,
        filter: EdgeFilter,
    ) -> SmallVec<[Apc; 4]> {
        let (subs, is_handler_edge) = self.resolve_descended_edge(pool, frame, tail, filter);
        let pos = Self::position_of(self.id, &subs, frame);
        if pos > 0 {
            let (tag, prev) = subs[pos - 1];
            return smallvec![Apc::new(
                pool[prev].exit,
                0,
                tail.push(Frame {
                    source: frame.source,
                    target: frame.target,
                    tag,
                }),
            )];
        }
        if is_handler_edge {
            let count = pool.block(frame.source).count().max(1);
            return (0..count)
                .map(|offset| Apc::new(frame.source, offset, tail.clone()))
                .collect();
        }
        smallvec![pool.end_of(frame.source, tail.clone())]
    }

    fn resolve_descended_edge(
        &self,
        pool: &SubroutinePool,
        frame: Frame,
        tail: &ContextStack,
        filter: EdgeFilter,
    ) -> (EdgeSubroutines, bool) {
        pool[frame.source.sub()].edge_subroutines_outer_to_inner(
            pool,
            frame.source,
            frame.target,
            tail,
            filter,
        )
    }

    fn position_of(id: SubId, subs: &EdgeSubroutines, frame: Frame) -> usize {
        match subs.iter().position(|&(_, s)| s == id) {
            Some(pos) => pos,
            None => panic!(
                "subroutine {id} is not attached to the descended edge {}->{}",
                frame.source, frame.target
            ),
        }
    }

    /// Every subroutine reachable from this one via attachments,
    /// depth-first, each id reported once. Handler and finally regions are
    /// legitimately shared by several protected regions, so the id guard is
    /// what keeps the walk finite.
    pub fn used_subroutines(&self, pool: &SubroutinePool) -> Vec<SubId> {
        let mut seen = FxHashSet::default();
        let mut out = Vec::new();
        self.collect_used(pool, &mut seen, &mut out);
        out
    }

    fn collect_used(
        &self,
        pool: &SubroutinePool,
        seen: &mut FxHashSet<SubId>,
        out: &mut Vec<SubId>,
    ) {
        for list in self.edge_subs.values() {
            for &(_, child) in list {
                if seen.insert(child) {
                    out.push(child);
                    pool[child].collect_used(pool, seen, out);
                }
            }
        }
    }

    /// Finalize internal caches once all blocks, edges and attachments are
    /// known: prune unreachable blocks, assign dense display indices from
    /// the threaded `counter`, build the reversed adjacency map, assign
    /// reverse-post-order indices and keep the spanning tree as the
    /// back-edge oracle.
    #[tracing::instrument(level = "debug", skip(self, counter), fields(subroutine = %self.id))]
    pub(crate) fn initialize(&mut self, counter: &mut u32) {
        self.succ_edges.sort();
        let exc = self.exception_exit.slot();
        let roots = [exc, self.exit.slot(), self.entry.slot()];
        let tree = SpanningTree::build(self.blocks.len(), &roots, &self.succ_edges, Some(exc));

        for block in &mut self.blocks {
            block.mark_unused();
        }
        for &slot in tree.finish_order().iter().rev() {
            self.blocks[slot as usize].renumber(counter);
        }
        tracing::debug!(
            reachable = tree.finish_order().len(),
            total = self.blocks.len(),
            "renumbered blocks"
        );

        self.succ_edges
            .retain(|e| tree.is_reached(e.from) && tree.is_reached(e.to));
        self.succ_edges.sort();
        self.pred_edges = self.succ_edges.reversed();

        // Reverse-post-order indices come from a traversal of the reversed
        // graph rooted at the exit, so backward analyses see the exit
        // first. Blocks the backward walk cannot reach (infinite loops)
        // are seeded as extra roots in reverse finish order.
        let mut rpo_roots: Vec<u32> = vec![self.exit.slot()];
        rpo_roots.extend(tree.finish_order().iter().rev().copied());
        let rpo_tree = SpanningTree::build(self.blocks.len(), &rpo_roots, &self.pred_edges, None);
        for (time, &slot) in rpo_tree.finish_order().iter().enumerate() {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "block counts stay far below u32::MAX"
            )]
            self.blocks[slot as usize].set_rpo_index(time as u32);
        }

        self.spanning_tree = Some(tree);
    }
}

/// Arena owning every subroutine of one graph-construction session.
#[derive(Default, Debug)]
pub struct SubroutinePool {
    subs: Vec<Subroutine>,
}

impl SubroutinePool {
    pub(crate) fn push(&mut self, sub: Subroutine) {
        self.subs.push(sub);
    }

    pub(crate) fn get_mut(&mut self, id: SubId) -> &mut Subroutine {
        &mut self.subs[id.index()]
    }

    pub fn len(&self) -> usize {
        self.subs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Subroutine> {
        self.subs.iter()
    }

    pub fn block(&self, id: BlockId) -> &Block {
        self[id.sub()].block(id)
    }

    /// Point at offset 0 of `block` under `context`.
    pub fn start_of(&self, block: BlockId, context: ContextStack) -> Apc {
        Apc::new(block, 0, context)
    }

    /// Point at the end of `block` under `context`.
    pub fn end_of(&self, block: BlockId, context: ContextStack) -> Apc {
        Apc::new(block, self.block(block).count(), context)
    }
}

impl std::ops::Index<SubId> for SubroutinePool {
    type Output = Subroutine;

    fn index(&self, id: SubId) -> &Subroutine {
        &self.subs[id.index()]
    }
}
