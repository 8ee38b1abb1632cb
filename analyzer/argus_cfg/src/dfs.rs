//! Depth-first spanning tree over one subroutine's local block graph.
//!
//! Finalization builds one [`SpanningTree`] per subroutine and keeps it as
//! the back-edge oracle: an edge `u -> v` is a back edge iff `v` is an
//! ancestor of `u` in the tree, which the pre/post interval test answers in
//! O(1). The traversal also records each block's finish position, which
//! finalization reuses for dense renumbering and reverse-post-order
//! assignment.
//!
//! The walked graph is the local successor edges plus an implicit edge from
//! every block to the subroutine's exception exit (any instruction may
//! throw), matching how the protected-region machinery sees the graph.

use smallvec::SmallVec;

use crate::edge_map::EdgeMap;

#[derive(Copy, Clone, Debug, Default)]
struct DfsInfo {
    visited: bool,
    pre: u32,
    post: u32,
    target_of_back_edge: bool,
}

/// Depth-first spanning forest with ancestor queries.
#[derive(Clone, Debug)]
pub(crate) struct SpanningTree {
    info: Vec<DfsInfo>,
    finish_order: Vec<u32>,
}

impl SpanningTree {
    /// Build the forest over `block_count` blocks, visiting `roots` in
    /// order. `implicit_target` (the exception exit, when present) is
    /// treated as a successor of every other block.
    pub(crate) fn build(
        block_count: usize,
        roots: &[u32],
        edges: &EdgeMap,
        implicit_target: Option<u32>,
    ) -> Self {
        let mut tree = SpanningTree {
            info: vec![DfsInfo::default(); block_count],
            finish_order: Vec::with_capacity(block_count),
        };
        let mut clock: u32 = 0;
        for &root in roots {
            tree.visit_subgraph(root, edges, implicit_target, &mut clock);
        }
        tree
    }

    /// Iterative DFS from `root`, skipping anything already visited.
    fn visit_subgraph(
        &mut self,
        root: u32,
        edges: &EdgeMap,
        implicit_target: Option<u32>,
        clock: &mut u32,
    ) {
        if self.info[root as usize].visited {
            return;
        }
        let successors = |slot: u32| -> SmallVec<[u32; 4]> {
            let mut out: SmallVec<[u32; 4]> = edges.edges_from(slot).iter().map(|e| e.to).collect();
            if let Some(exc) = implicit_target {
                if slot != exc {
                    out.push(exc);
                }
            }
            out
        };

        // Stack entries: (slot, next successor position to examine).
        let mut stack: Vec<(u32, usize)> = vec![(root, 0)];
        self.info[root as usize].visited = true;
        self.info[root as usize].pre = *clock;
        *clock += 1;

        while let Some((slot, next)) = stack.last().copied() {
            let succs = successors(slot);
            if next < succs.len() {
                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }
                let succ = succs[next];
                if !self.info[succ as usize].visited {
                    self.info[succ as usize].visited = true;
                    self.info[succ as usize].pre = *clock;
                    *clock += 1;
                    stack.push((succ, 0));
                } else if stack.iter().any(|&(s, _)| s == succ) {
                    // Target is still on the stack (gray): the edge closes
                    // a cycle.
                    self.info[succ as usize].target_of_back_edge = true;
                }
            } else {
                self.info[slot as usize].post = *clock;
                *clock += 1;
                self.finish_order.push(slot);
                stack.pop();
            }
        }
    }

    /// Blocks in finish order (first finished first).
    pub(crate) fn finish_order(&self) -> &[u32] {
        &self.finish_order
    }

    pub(crate) fn is_reached(&self, slot: u32) -> bool {
        self.info[slot as usize].visited
    }

    /// Is `from -> to` a back edge (does `to` lie on the tree path to
    /// `from`)? Panics if either block was never reached by the traversal:
    /// asking about an untracked block indicates a malformed graph.
    pub(crate) fn is_back_edge(&self, from: u32, to: u32) -> bool {
        let f = self.info[from as usize];
        let t = self.info[to as usize];
        assert!(
            f.visited && t.visited,
            "back-edge query on a block the spanning tree never reached \
             (from slot {from}, to slot {to})"
        );
        t.pre <= f.pre && f.post <= t.post
    }

    /// Was some back edge observed pointing at `slot` (is it a loop
    /// header)?
    pub(crate) fn is_target_of_back_edge(&self, slot: u32) -> bool {
        let info = self.info[slot as usize];
        assert!(
            info.visited,
            "back-edge query on a block the spanning tree never reached (slot {slot})"
        );
        info.target_of_back_edge
    }
}
