//! Tagged adjacency maps.
//!
//! An [`EdgeMap`] holds the local (single-subroutine) control-flow edges as
//! a flat vector sorted by source slot, so the edges leaving a block are one
//! `partition_point` binary search away. Edges are appended freely during
//! construction; [`EdgeMap::sort`] must run before any lookup. The sort is
//! stable, so parallel edges out of one block keep their insertion order.

use rustc_hash::FxHashSet;

use crate::edge_tag::EdgeTag;

/// One local edge between two block slots of the same subroutine.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) struct Edge {
    pub from: u32,
    pub tag: EdgeTag,
    pub to: u32,
}

/// Sorted, binary-searchable successor (or predecessor) list.
#[derive(Clone, Debug, Default)]
pub(crate) struct EdgeMap {
    edges: Vec<Edge>,
}

impl EdgeMap {
    pub(crate) fn push(&mut self, from: u32, tag: EdgeTag, to: u32) {
        self.edges.push(Edge { from, tag, to });
    }

    /// Sort by source slot. Stable, so edge order per block is preserved.
    pub(crate) fn sort(&mut self) {
        self.edges.sort_by_key(|e| e.from);
    }

    /// Edges leaving `from`, in insertion order. Requires a prior sort.
    pub(crate) fn edges_from(&self, from: u32) -> &[Edge] {
        debug_assert!(
            self.edges.windows(2).all(|w| w[0].from <= w[1].from),
            "edge map queried before sort"
        );
        let lo = self.edges.partition_point(|e| e.from < from);
        let hi = self.edges.partition_point(|e| e.from <= from);
        &self.edges[lo..hi]
    }

    /// Number of *distinct* targets reachable from `from`.
    pub(crate) fn distinct_targets_from(&self, from: u32) -> usize {
        let mut seen = FxHashSet::default();
        self.edges_from(from)
            .iter()
            .filter(|e| seen.insert(e.to))
            .count()
    }

    /// The reversed map: an edge `from -[t]-> to` becomes `to -[t]-> from`.
    pub(crate) fn reversed(&self) -> EdgeMap {
        let mut rev = EdgeMap {
            edges: self
                .edges
                .iter()
                .map(|e| Edge {
                    from: e.to,
                    tag: e.tag,
                    to: e.from,
                })
                .collect(),
        };
        rev.sort();
        rev
    }

    pub(crate) fn retain(&mut self, keep: impl FnMut(&Edge) -> bool) {
        self.edges.retain(keep);
    }
}
