//! Graph construction.
//!
//! A [`GraphBuilder`] owns one construction session: it allocates
//! subroutines and blocks, records edges and attachments, and finally
//! freezes everything into a [`SubroutinePool`]. All ids it hands out are
//! scoped to the session; display indices are assigned during
//! [`GraphBuilder::finish`] from a single counter threaded through every
//! subroutine, so indices are unique across the whole pool.

use thiserror::Error;

use argus_il::Label;

use crate::block::{BlockId, CallSite, SubId};
use crate::edge_tag::EdgeTag;
use crate::subroutine::{SubKind, Subroutine, SubroutinePool};

/// Structural errors raised while assembling a graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// Local edges may not cross subroutines; cross-subroutine flow is
    /// expressed with attachments.
    #[error("edge {from} -> {to} crosses subroutines; use an attachment instead")]
    CrossSubroutineEdge { from: BlockId, to: BlockId },

    /// A block was used with a subroutine that does not own it.
    #[error("block {block} does not belong to subroutine {sub}")]
    ForeignBlock { block: BlockId, sub: SubId },
}

/// Builder for one pool of subroutines.
#[derive(Default, Debug)]
pub struct GraphBuilder {
    pool: SubroutinePool,
    next_sub: u32,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a subroutine. Its entry, normal exit and exception exit
    /// blocks exist immediately and are empty.
    pub fn add_subroutine(&mut self, kind: SubKind) -> SubId {
        let id = SubId::new(self.next_sub);
        self.next_sub += 1;
        self.pool.push(Subroutine::new(id, kind));
        id
    }

    /// Allocate a block holding `labels` in `sub`.
    pub fn add_block(&mut self, sub: SubId, labels: Vec<Label>) -> BlockId {
        self.pool.get_mut(sub).add_block(labels, None)
    }

    /// Allocate a block whose instruction run ends in a call site.
    pub fn add_call_block(&mut self, sub: SubId, labels: Vec<Label>, call: CallSite) -> BlockId {
        self.pool.get_mut(sub).add_block(labels, Some(call))
    }

    /// Record where the method body resumes once precondition checks are
    /// done.
    pub fn set_entry_after_requires(
        &mut self,
        sub: SubId,
        block: BlockId,
    ) -> Result<(), GraphError> {
        if block.sub() != sub {
            return Err(GraphError::ForeignBlock { block, sub });
        }
        self.pool.get_mut(sub).set_entry_after_requires(block);
        Ok(())
    }

    /// Record a local edge. Both endpoints must belong to the same
    /// subroutine.
    pub fn add_edge(&mut self, from: BlockId, tag: EdgeTag, to: BlockId) -> Result<(), GraphError> {
        if from.sub() != to.sub() {
            return Err(GraphError::CrossSubroutineEdge { from, to });
        }
        self.pool.get_mut(from.sub()).add_edge(from, tag, to);
        Ok(())
    }

    /// Attach `child` to the local edge `(from, to)` with `tag`. Repeated
    /// attachments on one edge run in the order they were added.
    pub fn attach_subroutine(
        &mut self,
        from: BlockId,
        to: BlockId,
        tag: EdgeTag,
        child: SubId,
    ) -> Result<(), GraphError> {
        if from.sub() != to.sub() {
            return Err(GraphError::CrossSubroutineEdge { from, to });
        }
        self.pool.get_mut(from.sub()).attach(from, to, tag, child);
        Ok(())
    }

    /// Read access to the pool under construction.
    pub fn pool(&self) -> &SubroutinePool {
        &self.pool
    }

    /// Freeze the pool: finalize every subroutine (pruning, renumbering,
    /// predecessor maps, spanning trees) with one display-index counter
    /// threaded through all of them.
    #[tracing::instrument(level = "debug", skip(self), fields(subroutines = self.pool.len()))]
    pub fn finish(mut self) -> SubroutinePool {
        let mut counter: u32 = 0;
        for raw in 0..self.next_sub {
            self.pool.get_mut(SubId::new(raw)).initialize(&mut counter);
        }
        self.pool
    }
}
