//! Collaborator traits at the boundary of the CFG core.
//!
//! Both traits are read-only oracles. The CFG core never mutates
//! instruction content or metadata; it only queries.

use crate::{Instr, Label, MethodId, Span};

/// Supplies instruction content for the labels stored in blocks.
///
/// Implemented by the upstream bytecode decoder. Repeated queries for the
/// same label must return the same instruction (the core assumes
/// deterministic, side-effect-free answers).
pub trait CodeProvider {
    /// The instruction physically at `label`.
    fn instr(&self, label: Label) -> &Instr;

    /// Original source location of `label`, if known.
    fn span(&self, label: Label) -> Option<Span>;
}

/// Supplies method identity facts.
///
/// Identity comparison itself is plain `==` on the opaque ids; this trait
/// answers the few semantic questions the core needs.
pub trait Metadata {
    /// Is `method` the well-known two-argument static reference-equality
    /// library call? Decode rewrites such calls into a boolean-equal
    /// binary operation.
    fn is_reference_equality(&self, method: MethodId) -> bool;

    /// Human-readable name, used only by the textual dump.
    fn method_name(&self, method: MethodId) -> String;
}
