//! Contract-free view of a graph.
//!
//! [`ContractFreeCfg`] wraps a [`Cfg`] with the no-contracts edge filter
//! permanently applied: traversal through it never descends into requires,
//! ensures, old-value or invariant subroutines, while fault/finally
//! handlers and the underlying block structure stay visible. Analyses that
//! must see user code only (for instance when inferring the very contracts
//! those subroutines would hold) run against this view.

use smallvec::SmallVec;

use crate::block::SubId;
use crate::cfg::{BlockGraph, Cfg};
use crate::point::Apc;
use crate::subroutine::EdgeFilter;

/// A [`Cfg`] that never traverses contract subroutines.
#[derive(Copy, Clone)]
pub struct ContractFreeCfg<'p> {
    inner: Cfg<'p>,
}

impl<'p> ContractFreeCfg<'p> {
    pub fn new(cfg: Cfg<'p>) -> Self {
        Self {
            inner: cfg.with_filter(EdgeFilter::NoContracts),
        }
    }

    /// The filtered view itself, for callers that want the full facade
    /// surface with the filter kept in force.
    pub fn inner(&self) -> &Cfg<'p> {
        &self.inner
    }

    pub fn entry(&self) -> Apc {
        self.inner.entry()
    }

    pub fn entry_after_requires(&self) -> Apc {
        self.inner.entry_after_requires()
    }

    pub fn normal_exit(&self) -> Apc {
        self.inner.normal_exit()
    }

    pub fn exception_exit(&self) -> Apc {
        self.inner.exception_exit()
    }

    pub fn successors(&self, point: &Apc) -> SmallVec<[Apc; 4]> {
        self.inner.successors(point)
    }

    pub fn predecessors(&self, point: &Apc) -> SmallVec<[Apc; 4]> {
        self.inner.predecessors(point)
    }

    pub fn has_single_successor(&self, point: &Apc) -> Option<Apc> {
        self.inner.has_single_successor(point)
    }

    pub fn has_single_predecessor(&self, point: &Apc) -> Option<Apc> {
        self.inner.has_single_predecessor(point)
    }

    pub fn next(&self, point: &Apc) -> Apc {
        self.inner.next(point)
    }

    pub fn is_join_point(&self, point: &Apc) -> bool {
        self.inner.is_join_point(point)
    }

    pub fn is_split_point(&self, point: &Apc) -> bool {
        self.inner.is_split_point(point)
    }

    pub fn is_forward_back_edge(&self, from: &Apc, to: &Apc) -> bool {
        self.inner.is_forward_back_edge(from, to)
    }

    pub fn block_graph(&self, sub: SubId) -> BlockGraph<'p> {
        self.inner.block_graph(sub)
    }
}
