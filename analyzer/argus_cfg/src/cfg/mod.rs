//! The per-method control-flow-graph facade.
//!
//! A [`Cfg`] is a cheap, copyable view over one method subroutine inside a
//! finalized [`SubroutinePool`]. It exposes the distinguished program
//! points, point-level traversal that transparently crosses subroutine
//! boundaries, loop queries, and a block-level projection for algorithms
//! (dominance, SCCs) that want plain graphs instead of program points.

use smallvec::SmallVec;

use crate::block::{Block, BlockId, SubId};
use crate::context::ContextStack;
use crate::dump;
use crate::point::Apc;
use crate::subroutine::{EdgeFilter, Subroutine, SubroutinePool};

/// View over one method subroutine.
#[derive(Copy, Clone)]
pub struct Cfg<'p> {
    pool: &'p SubroutinePool,
    method: SubId,
    filter: EdgeFilter,
}

impl<'p> Cfg<'p> {
    /// Facade over `method`'s subroutine. The subroutine must be a method
    /// body; anything else is a construction bug and fails loudly.
    pub fn new(pool: &'p SubroutinePool, method: SubId) -> Self {
        assert!(
            pool[method].kind().is_method(),
            "{method} is a {} subroutine, not a method body",
            pool[method].kind().name()
        );
        Self {
            pool,
            method,
            filter: EdgeFilter::All,
        }
    }

    pub(crate) fn with_filter(self, filter: EdgeFilter) -> Self {
        Self { filter, ..self }
    }

    pub fn pool(&self) -> &'p SubroutinePool {
        self.pool
    }

    pub fn subroutine(&self) -> &'p Subroutine {
        &self.pool[self.method]
    }

    /// Method entry under the empty context.
    pub fn entry(&self) -> Apc {
        self.pool
            .start_of(self.subroutine().entry(), ContextStack::empty())
    }

    /// First point past the precondition checks; coincides with
    /// [`Cfg::entry`] when the method has none.
    pub fn entry_after_requires(&self) -> Apc {
        self.pool
            .start_of(self.subroutine().entry_after_requires(), ContextStack::empty())
    }

    /// Normal (fall-off or return) exit under the empty context.
    pub fn normal_exit(&self) -> Apc {
        self.pool
            .start_of(self.subroutine().exit(), ContextStack::empty())
    }

    /// Exceptional exit under the empty context.
    pub fn exception_exit(&self) -> Apc {
        self.pool
            .start_of(self.subroutine().exception_exit(), ContextStack::empty())
    }

    /// Successor points of `point`, crossing subroutine boundaries.
    pub fn successors(&self, point: &Apc) -> SmallVec<[Apc; 4]> {
        self.pool[point.block.sub()].successors(self.pool, point, self.filter)
    }

    /// Predecessor points of `point`, crossing subroutine boundaries.
    pub fn predecessors(&self, point: &Apc) -> SmallVec<[Apc; 4]> {
        self.pool[point.block.sub()].predecessors(self.pool, point, self.filter)
    }

    /// The unique successor, when there is exactly one.
    pub fn has_single_successor(&self, point: &Apc) -> Option<Apc> {
        self.pool[point.block.sub()].has_single_successor(self.pool, point, self.filter)
    }

    /// The unique predecessor, when there is exactly one.
    pub fn has_single_predecessor(&self, point: &Apc) -> Option<Apc> {
        self.pool[point.block.sub()].has_single_predecessor(self.pool, point, self.filter)
    }

    /// Step forward: the unique successor if there is one, otherwise the
    /// point itself.
    pub fn next(&self, point: &Apc) -> Apc {
        self.has_single_successor(point)
            .unwrap_or_else(|| point.clone())
    }

    /// Block-start point whose block has more than one distinct local
    /// predecessor.
    pub fn is_join_point(&self, point: &Apc) -> bool {
        point.index == 0 && self.pool[point.block.sub()].is_join_point(point.block)
    }

    /// Block-end point whose block has more than one distinct local
    /// successor.
    pub fn is_split_point(&self, point: &Apc) -> bool {
        point.is_block_end(self.pool) && self.pool[point.block.sub()].is_split_point(point.block)
    }

    /// Is the step `from -> to` a back edge of some loop, accounting for
    /// the inlining context? A step that pops a frame is tested against the
    /// descended edge in the parent subroutine, so loops whose bodies end
    /// in an attached finally are still recognized.
    pub fn is_forward_back_edge(&self, from: &Apc, to: &Apc) -> bool {
        if to.index != 0 {
            debug_assert!(false, "back-edge target {to} is not a block start");
            return false;
        }
        if from.block.sub() == to.block.sub() && from.context == to.context {
            return self.pool[from.block.sub()].is_back_edge(from.block, to.block);
        }
        if let Some((frame, tail)) = from.context.pop() {
            if tail == to.context {
                return self.pool[frame.source.sub()].is_back_edge(frame.source, frame.target);
            }
        }
        false
    }

    /// Is `point`'s block a loop header in its own subroutine?
    pub fn is_target_of_back_edge(&self, point: &Apc) -> bool {
        point.index == 0 && self.pool[point.block.sub()].is_target_of_back_edge(point.block)
    }

    /// The method subroutine followed by every subroutine reachable from
    /// it through attachments, each listed once.
    pub fn subroutines(&self) -> Vec<SubId> {
        let mut out = vec![self.method];
        out.extend(self.subroutine().used_subroutines(self.pool));
        out
    }

    /// Block-level projection of one subroutine's local graph.
    pub fn block_graph(&self, sub: SubId) -> BlockGraph<'p> {
        BlockGraph {
            sub: &self.pool[sub],
        }
    }

    /// Render the whole graph (method subroutine plus everything it uses)
    /// into `w`, starting under `context`. `il` prints one instruction-slot
    /// point per line; `metadata` supplies method names for the headers.
    /// Each referenced subroutine is printed once per context:
    /// `context_lookup` reports the contexts for a subroutine's entry
    /// block, `None` meaning "the empty context only".
    pub fn print(
        &self,
        w: &mut dyn std::fmt::Write,
        metadata: &dyn argus_il::Metadata,
        il: &dyn Fn(&mut dyn std::fmt::Write, &Apc) -> std::fmt::Result,
        context_lookup: Option<dump::ContextLookup<'_>>,
        context: &ContextStack,
    ) -> std::fmt::Result {
        dump::print_graph(w, self.pool, metadata, self.method, il, context_lookup, context)
    }
}

/// Plain block graph of one subroutine: distinct local neighbors, no
/// program points, no boundary crossing. Suited to dominator and SCC
/// computations.
#[derive(Copy, Clone)]
pub struct BlockGraph<'p> {
    sub: &'p Subroutine,
}

impl<'p> BlockGraph<'p> {
    pub fn entry(&self) -> BlockId {
        self.sub.entry()
    }

    pub fn exit(&self) -> BlockId {
        self.sub.exit()
    }

    /// Surviving blocks in display-index order.
    pub fn blocks(&self) -> impl Iterator<Item = &'p Block> {
        self.sub.blocks()
    }

    /// Distinct local successors of `block`.
    pub fn successors(&self, block: BlockId) -> SmallVec<[BlockId; 4]> {
        let mut out = self.sub.successor_blocks(block);
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Distinct local predecessors of `block`.
    pub fn predecessors(&self, block: BlockId) -> SmallVec<[BlockId; 4]> {
        let mut out = self.sub.predecessor_blocks(block);
        out.sort_unstable();
        out.dedup();
        out
    }
}

#[cfg(test)]
mod tests;
