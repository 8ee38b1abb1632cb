//! Blocks and block identity.
//!
//! A block is a straight-line run of instruction slots owned by exactly one
//! subroutine — no branch exists strictly inside a block. Identity is a
//! [`BlockId`]: the owning subroutine plus a stable allocation slot. The
//! *display* index is separate: it is reassigned densely (from a counter
//! threaded by the construction session) when the subroutine is finalized,
//! so that unreachable blocks can be pruned without disturbing identity.

use std::fmt;

use argus_il::{Label, MethodId};

use crate::context::ContextStack;
use crate::point::Apc;

/// Globally unique subroutine identity. Equality is by id only, never
/// structural.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct SubId(u32);

impl SubId {
    pub(crate) const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SubId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SR{}", self.0)
    }
}

/// Block identity: owning subroutine plus allocation slot.
///
/// The slot is stable for the lifetime of the graph; renumbering only
/// changes the block's display [`Block::index`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct BlockId {
    sub: SubId,
    slot: u32,
}

impl BlockId {
    pub(crate) const fn new(sub: SubId, slot: u32) -> Self {
        Self { sub, slot }
    }

    pub const fn sub(self) -> SubId {
        self.sub
    }

    pub(crate) const fn slot(self) -> u32 {
        self.slot
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.B{}", self.sub, self.slot)
    }
}

/// Call/new-object capability of a block.
///
/// Present on blocks whose instruction run ends in a call site; the
/// contract machinery uses it to decide which edges receive requires and
/// ensures attachments.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct CallSite {
    pub method: MethodId,
    pub is_virtual: bool,
    pub is_new_obj: bool,
}

/// Display index of a block that finalization found unreachable.
pub(crate) const UNUSED_INDEX: u32 = u32::MAX;

/// A straight-line run of instruction slots.
#[derive(Clone, Debug)]
pub struct Block {
    id: BlockId,
    index: u32,
    rpo_index: u32,
    labels: Vec<Label>,
    call: Option<CallSite>,
}

impl Block {
    pub(crate) fn new(id: BlockId, labels: Vec<Label>, call: Option<CallSite>) -> Self {
        Self {
            id,
            index: UNUSED_INDEX,
            rpo_index: 0,
            labels,
            call,
        }
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    /// Number of instruction slots. Program-point offsets range over
    /// `0..=count`: offset 0 is the block start, offset `count` the block
    /// end.
    pub fn count(&self) -> usize {
        self.labels.len()
    }

    /// Dense display index, assigned at finalization in reverse finish
    /// order. [`UNUSED_INDEX`] if the block was unreachable.
    pub fn index(&self) -> u32 {
        self.index
    }

    pub(crate) fn is_used(&self) -> bool {
        self.index != UNUSED_INDEX
    }

    /// Reverse-post-order position, used by fixpoint scheduling.
    pub fn rpo_index(&self) -> u32 {
        self.rpo_index
    }

    /// Program point at offset 0 with the empty context.
    pub fn first(&self) -> Apc {
        Apc::new(self.id, 0, ContextStack::empty())
    }

    /// Program point at the block end with the empty context.
    pub fn last(&self) -> Apc {
        Apc::new(self.id, self.count(), ContextStack::empty())
    }

    /// All instruction-slot points (offsets `0..count`) under `context`.
    ///
    /// The sequence is lazy and restartable; abandoning it early has no
    /// cleanup obligation.
    pub fn points<'a>(&self, context: &'a ContextStack) -> impl Iterator<Item = Apc> + 'a {
        let id = self.id;
        (0..self.count()).map(move |offset| Apc::new(id, offset, context.clone()))
    }

    /// All instruction-slot points with the empty context.
    pub fn slots(&self) -> impl Iterator<Item = Apc> {
        let id = self.id;
        (0..self.count()).map(move |offset| Apc::new(id, offset, ContextStack::empty()))
    }

    /// The original instruction location for the slot at `offset`, if the
    /// offset names an instruction (block-end offsets do not).
    pub fn source_label(&self, offset: usize) -> Option<Label> {
        self.labels.get(offset).copied()
    }

    /// Call/new-object capability. `None` means "not a call site".
    pub fn call_site(&self) -> Option<&CallSite> {
        self.call.as_ref()
    }

    /// Reassign the display index from an externally threaded counter.
    pub(crate) fn renumber(&mut self, counter: &mut u32) {
        self.index = *counter;
        *counter += 1;
    }

    pub(crate) fn mark_unused(&mut self) {
        self.index = UNUSED_INDEX;
    }

    pub(crate) fn set_rpo_index(&mut self, rpo: u32) {
        self.rpo_index = rpo;
    }
}
