//! Canonical instruction model for the Argus analyzer.
//!
//! This crate defines the vocabulary shared between the control-flow core
//! (`argus_cfg`) and its collaborators:
//!
//! - **Opaque identities** ([`Label`], [`Operand`], [`MethodId`], [`TypeId`]) —
//!   dense integer handles minted by whoever decodes the method body. The
//!   analyzer never inspects their contents, only compares them.
//!
//! - **Instructions** ([`Instr`], [`BinaryOp`], [`Relation`],
//!   [`ConditionSource`]) — the straight-line instruction forms a block slot
//!   can hold. Branch forms exist only as *raw* input; the CFG decode layer
//!   canonicalizes them away before any visitor sees them.
//!
//! - **Visitor** ([`InstrVisitor`]) — single synchronous dispatch target for
//!   decoded instructions, generic over the program-point type so this crate
//!   stays independent of the graph representation.
//!
//! - **Collaborator traits** ([`CodeProvider`], [`Metadata`]) — the read-only
//!   oracles that supply instruction content and method identity facts. The
//!   CFG core treats both as opaque and never mutates through them.

mod instr;
mod provider;
mod span;
mod visitor;

pub use instr::{BinaryOp, ConditionSource, Instr, Relation};
pub use provider::{CodeProvider, Metadata};
pub use span::Span;
pub use visitor::InstrVisitor;

use std::fmt;

/// Opaque handle for one instruction slot in the original method body.
///
/// Minted by the upstream decoder; the CFG core only stores and compares
/// labels, and hands them back to the [`CodeProvider`] for content.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct Label(u32);

impl Label {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Opaque handle for an instruction operand (a value slot).
///
/// The core never evaluates operands; it only threads them from raw
/// instructions into canonicalized visitor calls.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Operand(u32);

impl Operand {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Opaque method identity supplied by the metadata collaborator.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct MethodId(u32);

impl MethodId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{}", self.0)
    }
}

/// Opaque type identity supplied by the metadata collaborator.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct TypeId(u32);

impl TypeId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}
