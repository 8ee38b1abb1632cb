//! Context-sensitive instruction decode.
//!
//! One program point in, one canonicalized visitor call out. Decode does
//! two jobs on top of the raw instruction lookup:
//!
//! * **Shape canonicalization.** Raw branches and switches degrade to
//!   no-ops (edge tags already carry the branch direction), except that a
//!   relational conditional branch surfaces as a destination-less
//!   comparison so the condition's operands stay visible. A direct
//!   two-argument call to a reference-equality method surfaces as an
//!   equality comparison.
//! * **Obligation flipping.** The same contract condition is an obligation
//!   at one kind of point and a hypothesis at another. A requires condition
//!   reached through a call edge is the *caller's* obligation, so its
//!   `Assume` dispatches as `assert`; an ensures condition reached through
//!   a call edge is a fact the caller may rely on, so its `Assert`
//!   dispatches as `assume`; an invariant checked on method exit is an
//!   obligation of the method. The flip is decided per point from the
//!   inlining context, never stored.

use argus_il::{BinaryOp, CodeProvider, ConditionSource, Instr, InstrVisitor, Metadata, Relation};

use crate::point::Apc;
use crate::subroutine::SubroutinePool;

/// Decode the instruction slot at `pc` and dispatch it into `visitor`.
///
/// Block-end points and slots with no recorded instruction dispatch as
/// no-ops.
pub fn forward_decode<P, M, V>(
    pool: &SubroutinePool,
    pc: &Apc,
    provider: &P,
    metadata: &M,
    visitor: &mut V,
) -> V::Output
where
    P: CodeProvider,
    M: Metadata,
    V: InstrVisitor<Apc>,
{
    let Some(label) = pool.block(pc.block).source_label(pc.index) else {
        return visitor.nop(pc);
    };
    let instr = provider.instr(label);
    tracing::trace!(%pc, ?instr, "decode");
    match instr {
        Instr::Nop
        | Instr::Branch { .. }
        | Instr::BranchTrue { .. }
        | Instr::BranchFalse { .. }
        | Instr::Switch { .. } => visitor.nop(pc),

        Instr::BranchCond {
            rel, unsigned, a, b, ..
        } => visitor.binary(pc, BinaryOp::from_relation(*rel, *unsigned), None, *a, *b),

        Instr::Binary { op, dest, a, b } => visitor.binary(pc, *op, Some(*dest), *a, *b),

        Instr::Assume { source, cond } => match source {
            ConditionSource::Requires if pc.inside_requires_at_call(pool) => {
                visitor.assert(pc, *source, *cond)
            }
            ConditionSource::Invariant if pc.inside_invariant_on_exit(pool) => {
                visitor.assert(pc, *source, *cond)
            }
            _ => visitor.assume(pc, *source, *cond),
        },

        Instr::Assert { source, cond } => match source {
            ConditionSource::Ensures if pc.inside_ensures_at_call(pool) => {
                visitor.assume(pc, *source, *cond)
            }
            _ => visitor.assert(pc, *source, *cond),
        },

        Instr::Call {
            method,
            is_virtual,
            dest,
            args,
        } => {
            if !is_virtual && args.len() == 2 && metadata.is_reference_equality(*method) {
                visitor.binary(
                    pc,
                    BinaryOp::from_relation(Relation::Eq, false),
                    Some(*dest),
                    args[0],
                    args[1],
                )
            } else {
                visitor.call(pc, *method, *is_virtual, *dest, args)
            }
        }

        Instr::NewObj { ctor, dest, args } => visitor.new_obj(pc, *ctor, *dest, args),

        Instr::Return { value } => visitor.ret(pc, *value),

        Instr::BeginOld => visitor.begin_old(pc),

        Instr::EndOld { ty } => visitor.end_old(pc, *ty),
    }
}

#[cfg(test)]
mod tests;
