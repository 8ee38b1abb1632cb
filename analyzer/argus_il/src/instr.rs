//! Instruction forms and operators.

use std::fmt;

use crate::{Label, MethodId, Operand, TypeId};

/// Relational comparison operator.
///
/// Used both by raw conditional branches and by the boolean-producing
/// binary comparisons they canonicalize into.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Relation {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Relation {
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Relation::Eq => "eq",
            Relation::Ne => "ne",
            Relation::Lt => "lt",
            Relation::Le => "le",
            Relation::Gt => "gt",
            Relation::Ge => "ge",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Binary operator.
///
/// Comparisons carry a signedness flag so every relation exists in a signed
/// and an unsigned variant, mirroring the raw branch forms they replace.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    /// Boolean-producing comparison: `dest = a <rel> b`.
    Cmp { rel: Relation, unsigned: bool },
}

impl BinaryOp {
    /// The comparison operator matching a relational conditional branch.
    pub const fn from_relation(rel: Relation, unsigned: bool) -> Self {
        BinaryOp::Cmp { rel, unsigned }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOp::Add => f.write_str("add"),
            BinaryOp::Sub => f.write_str("sub"),
            BinaryOp::Mul => f.write_str("mul"),
            BinaryOp::Div => f.write_str("div"),
            BinaryOp::Rem => f.write_str("rem"),
            BinaryOp::And => f.write_str("and"),
            BinaryOp::Or => f.write_str("or"),
            BinaryOp::Xor => f.write_str("xor"),
            BinaryOp::Shl => f.write_str("shl"),
            BinaryOp::Shr => f.write_str("shr"),
            BinaryOp::Cmp { rel, unsigned } => {
                write!(f, "c{}{}", rel.mnemonic(), if *unsigned { ".un" } else { "" })
            }
        }
    }
}

/// Which contract (if any) an assume/assert condition came from.
///
/// The decode layer uses this together with the program point's inlining
/// context to decide whether the condition is an obligation or a hypothesis
/// at that point.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ConditionSource {
    /// A precondition of some method.
    Requires,
    /// A postcondition of some method.
    Ensures,
    /// An object invariant of some type.
    Invariant,
    /// An explicit assume/assert written in the method body.
    Explicit,
}

impl ConditionSource {
    pub const fn mnemonic(self) -> &'static str {
        match self {
            ConditionSource::Requires => "requires",
            ConditionSource::Ensures => "ensures",
            ConditionSource::Invariant => "invariant",
            ConditionSource::Explicit => "explicit",
        }
    }
}

impl fmt::Display for ConditionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// One instruction slot, as supplied by the [`CodeProvider`](crate::CodeProvider).
///
/// Branch and switch forms are *raw*: they survive only until decode, which
/// rewrites them (relational branches become [`Instr::Binary`] comparisons,
/// everything else degrades to a no-op — branch direction is carried by the
/// True/False tags on the corresponding graph edges instead).
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Instr {
    Nop,
    /// Raw unconditional branch.
    Branch { target: Label },
    /// Raw conditional relational branch: taken when `a <rel> b` holds.
    BranchCond {
        rel: Relation,
        unsigned: bool,
        a: Operand,
        b: Operand,
        target: Label,
    },
    /// Raw single-operand truthiness branch (taken when `cond` is non-zero).
    BranchTrue { cond: Operand, target: Label },
    /// Raw single-operand truthiness branch (taken when `cond` is zero).
    BranchFalse { cond: Operand, target: Label },
    /// Raw multi-way switch.
    Switch { value: Operand, targets: Vec<Label> },
    /// `dest = a <op> b`.
    Binary {
        op: BinaryOp,
        dest: Operand,
        a: Operand,
        b: Operand,
    },
    /// Hypothesis: `cond` may be taken as true past this point.
    Assume {
        source: ConditionSource,
        cond: Operand,
    },
    /// Obligation: `cond` must be proven at this point.
    Assert {
        source: ConditionSource,
        cond: Operand,
    },
    /// Method call. `is_virtual` distinguishes virtual dispatch from a
    /// static (direct) call.
    Call {
        method: MethodId,
        is_virtual: bool,
        dest: Operand,
        args: Vec<Operand>,
    },
    /// Constructor call allocating a fresh object into `dest`.
    NewObj {
        ctor: MethodId,
        dest: Operand,
        args: Vec<Operand>,
    },
    Return { value: Option<Operand> },
    /// Start of an old-value capture region inside a postcondition.
    BeginOld,
    /// End of an old-value capture region; the captured value has type `ty`.
    EndOld { ty: TypeId },
}
