//! Instruction visitor.
//!
//! Single synchronous dispatch target for decoded instructions: one program
//! point in, one visitor call out. The trait is generic over the
//! program-point type `Pc` so that the graph crate can instantiate it with
//! its context-sensitive point without a dependency cycle.
//!
//! Every method defaults to [`InstrVisitor::unhandled`], so a consumer only
//! overrides the forms it cares about. No method exists for raw branches or
//! switches — decode canonicalizes those away before dispatch.

use crate::{BinaryOp, ConditionSource, MethodId, Operand, TypeId};

/// Visitor over canonicalized instructions.
pub trait InstrVisitor<Pc> {
    type Output;

    /// Fallback for every form the visitor does not override.
    fn unhandled(&mut self, pc: &Pc) -> Self::Output;

    fn nop(&mut self, pc: &Pc) -> Self::Output {
        self.unhandled(pc)
    }

    /// `dest = a <op> b`. `dest` is `None` when the comparison was
    /// synthesized from a conditional branch: its value is consumed by the
    /// assumption on the True/False edge, not stored anywhere.
    fn binary(
        &mut self,
        pc: &Pc,
        op: BinaryOp,
        dest: Option<Operand>,
        a: Operand,
        b: Operand,
    ) -> Self::Output {
        let _ = (op, dest, a, b);
        self.unhandled(pc)
    }

    fn assume(&mut self, pc: &Pc, source: ConditionSource, cond: Operand) -> Self::Output {
        let _ = (source, cond);
        self.unhandled(pc)
    }

    fn assert(&mut self, pc: &Pc, source: ConditionSource, cond: Operand) -> Self::Output {
        let _ = (source, cond);
        self.unhandled(pc)
    }

    fn call(
        &mut self,
        pc: &Pc,
        method: MethodId,
        is_virtual: bool,
        dest: Operand,
        args: &[Operand],
    ) -> Self::Output {
        let _ = (method, is_virtual, dest, args);
        self.unhandled(pc)
    }

    fn new_obj(&mut self, pc: &Pc, ctor: MethodId, dest: Operand, args: &[Operand]) -> Self::Output {
        let _ = (ctor, dest, args);
        self.unhandled(pc)
    }

    fn ret(&mut self, pc: &Pc, value: Option<Operand>) -> Self::Output {
        let _ = value;
        self.unhandled(pc)
    }

    fn begin_old(&mut self, pc: &Pc) -> Self::Output {
        self.unhandled(pc)
    }

    fn end_old(&mut self, pc: &Pc, ty: TypeId) -> Self::Output {
        let _ = ty;
        self.unhandled(pc)
    }
}
