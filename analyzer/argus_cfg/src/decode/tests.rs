use pretty_assertions::assert_eq;

use argus_il::{
    BinaryOp, ConditionSource, Instr, InstrVisitor, Label, MethodId, Operand, Relation, TypeId,
};

use crate::block::BlockId;
use crate::builder::GraphBuilder;
use crate::context::{ContextStack, Frame};
use crate::edge_tag::EdgeTag;
use crate::subroutine::SubroutinePool;
use crate::test_helpers::{ensures, invariant, method, requires, TestCode, TestMeta};

use super::*;

/// Renders every dispatch as a line, so tests compare plain strings.
struct Recorder;

impl InstrVisitor<Apc> for Recorder {
    type Output = String;

    fn unhandled(&mut self, _pc: &Apc) -> String {
        "unhandled".to_owned()
    }

    fn nop(&mut self, _pc: &Apc) -> String {
        "nop".to_owned()
    }

    fn binary(
        &mut self,
        _pc: &Apc,
        op: BinaryOp,
        dest: Option<Operand>,
        a: Operand,
        b: Operand,
    ) -> String {
        let dest = dest.map_or_else(|| "_".to_owned(), |d| d.to_string());
        format!("binary {op} {dest} {a} {b}")
    }

    fn assume(&mut self, _pc: &Apc, source: ConditionSource, cond: Operand) -> String {
        format!("assume {source} {cond}")
    }

    fn assert(&mut self, _pc: &Apc, source: ConditionSource, cond: Operand) -> String {
        format!("assert {source} {cond}")
    }

    fn call(
        &mut self,
        _pc: &Apc,
        method: MethodId,
        is_virtual: bool,
        dest: Operand,
        args: &[Operand],
    ) -> String {
        format!("call {method} virt={is_virtual} {dest} argc={}", args.len())
    }

    fn new_obj(&mut self, _pc: &Apc, ctor: MethodId, dest: Operand, _args: &[Operand]) -> String {
        format!("newobj {ctor} {dest}")
    }

    fn ret(&mut self, _pc: &Apc, value: Option<Operand>) -> String {
        match value {
            Some(v) => format!("ret {v}"),
            None => "ret".to_owned(),
        }
    }

    fn begin_old(&mut self, _pc: &Apc) -> String {
        "begin_old".to_owned()
    }

    fn end_old(&mut self, _pc: &Apc, ty: TypeId) -> String {
        format!("end_old {ty}")
    }
}

struct Fixture {
    pool: SubroutinePool,
    code: TestCode,
    meta: TestMeta,
    body: BlockId,
    in_requires: BlockId,
    in_ensures: BlockId,
    in_invariant: BlockId,
    caller: BlockId,
}

const REF_EQ: MethodId = MethodId::new(99);

fn v(raw: u32) -> Operand {
    Operand::new(raw)
}

fn fixture(body_instrs: Vec<Instr>) -> Fixture {
    let mut code = TestCode::new();
    let body_labels: Vec<Label> = body_instrs.into_iter().map(|i| code.label(i)).collect();
    let req_label = code.label(Instr::Assume {
        source: ConditionSource::Requires,
        cond: v(1),
    });
    let ens_label = code.label(Instr::Assert {
        source: ConditionSource::Ensures,
        cond: v(2),
    });
    let inv_label = code.label(Instr::Assume {
        source: ConditionSource::Invariant,
        cond: v(3),
    });

    let mut b = GraphBuilder::new();
    let m = b.add_subroutine(method(0));
    let r = b.add_subroutine(requires(1));
    let e = b.add_subroutine(ensures(1));
    let i = b.add_subroutine(invariant(4));
    let body = b.add_block(m, body_labels);
    let caller = b.add_block(m, vec![]);
    let in_requires = b.add_block(r, vec![req_label]);
    let in_ensures = b.add_block(e, vec![ens_label]);
    let in_invariant = b.add_block(i, vec![inv_label]);
    Fixture {
        pool: b.finish(),
        code,
        meta: TestMeta {
            ref_eq: Some(REF_EQ),
        },
        body,
        in_requires,
        in_ensures,
        in_invariant,
        caller,
    }
}

fn decode_at(f: &Fixture, block: BlockId, index: usize, frames: &[(BlockId, EdgeTag)]) -> String {
    let mut context = ContextStack::empty();
    for &(source, tag) in frames {
        context = context.push(Frame {
            source,
            target: source,
            tag,
        });
    }
    let pc = Apc::new(block, index, context);
    forward_decode(&f.pool, &pc, &f.code, &f.meta, &mut Recorder)
}

#[test]
fn raw_branches_decode_as_nops() {
    let f = fixture(vec![
        Instr::Nop,
        Instr::Branch {
            target: Label::new(0),
        },
        Instr::BranchTrue {
            cond: v(0),
            target: Label::new(0),
        },
        Instr::BranchFalse {
            cond: v(0),
            target: Label::new(0),
        },
        Instr::Switch {
            value: v(0),
            targets: vec![Label::new(0), Label::new(1)],
        },
    ]);
    for index in 0..5 {
        assert_eq!(decode_at(&f, f.body, index, &[]), "nop");
    }
}

#[test]
fn relational_branch_surfaces_as_a_destinationless_comparison() {
    let f = fixture(vec![Instr::BranchCond {
        rel: Relation::Lt,
        unsigned: true,
        a: v(4),
        b: v(5),
        target: Label::new(0),
    }]);
    assert_eq!(decode_at(&f, f.body, 0, &[]), "binary clt.un _ v4 v5");
}

#[test]
fn binary_keeps_its_destination() {
    let f = fixture(vec![Instr::Binary {
        op: BinaryOp::Add,
        dest: v(6),
        a: v(4),
        b: v(5),
    }]);
    assert_eq!(decode_at(&f, f.body, 0, &[]), "binary add v6 v4 v5");
}

#[test]
fn reference_equality_call_becomes_an_equality() {
    let f = fixture(vec![
        Instr::Call {
            method: REF_EQ,
            is_virtual: false,
            dest: v(0),
            args: vec![v(1), v(2)],
        },
        Instr::Call {
            method: REF_EQ,
            is_virtual: true,
            dest: v(0),
            args: vec![v(1), v(2)],
        },
        Instr::Call {
            method: REF_EQ,
            is_virtual: false,
            dest: v(0),
            args: vec![v(1), v(2), v(3)],
        },
        Instr::Call {
            method: MethodId::new(7),
            is_virtual: false,
            dest: v(0),
            args: vec![v(1), v(2)],
        },
    ]);
    assert_eq!(decode_at(&f, f.body, 0, &[]), "binary ceq v0 v1 v2");
    // Virtual dispatch, wrong arity, or an unrelated method stay calls.
    assert_eq!(decode_at(&f, f.body, 1, &[]), "call M99 virt=true v0 argc=2");
    assert_eq!(decode_at(&f, f.body, 2, &[]), "call M99 virt=false v0 argc=3");
    assert_eq!(decode_at(&f, f.body, 3, &[]), "call M7 virt=false v0 argc=2");
}

#[test]
fn requires_condition_flips_to_an_obligation_at_calls() {
    let f = fixture(vec![]);
    // Reached through a call edge: the caller must establish it.
    assert_eq!(
        decode_at(&f, f.in_requires, 0, &[(f.caller, EdgeTag::BEFORE_CALL)]),
        "assert requires v1"
    );
    // Inlined at the method's own entry: a given.
    assert_eq!(
        decode_at(&f, f.in_requires, 0, &[(f.caller, EdgeTag::ENTRY)]),
        "assume requires v1"
    );
}

#[test]
fn ensures_condition_flips_to_a_hypothesis_at_calls() {
    let f = fixture(vec![]);
    // After a call: the callee guarantees it.
    assert_eq!(
        decode_at(&f, f.in_ensures, 0, &[(f.caller, EdgeTag::AFTER_CALL)]),
        "assume ensures v2"
    );
    // At the method's own exit: an obligation to prove.
    assert_eq!(
        decode_at(&f, f.in_ensures, 0, &[(f.caller, EdgeTag::EXIT)]),
        "assert ensures v2"
    );
}

#[test]
fn invariant_condition_is_an_obligation_on_exit_only() {
    let f = fixture(vec![]);
    assert_eq!(
        decode_at(&f, f.in_invariant, 0, &[(f.caller, EdgeTag::EXIT)]),
        "assert invariant v3"
    );
    assert_eq!(
        decode_at(&f, f.in_invariant, 0, &[(f.caller, EdgeTag::AFTER_CALL)]),
        "assume invariant v3"
    );
}

#[test]
fn remaining_forms_pass_through() {
    let f = fixture(vec![
        Instr::NewObj {
            ctor: MethodId::new(3),
            dest: v(8),
            args: vec![v(1)],
        },
        Instr::Return { value: Some(v(9)) },
        Instr::Return { value: None },
        Instr::BeginOld,
        Instr::EndOld {
            ty: TypeId::new(2),
        },
        Instr::Assert {
            source: ConditionSource::Explicit,
            cond: v(5),
        },
    ]);
    assert_eq!(decode_at(&f, f.body, 0, &[]), "newobj M3 v8");
    assert_eq!(decode_at(&f, f.body, 1, &[]), "ret v9");
    assert_eq!(decode_at(&f, f.body, 2, &[]), "ret");
    assert_eq!(decode_at(&f, f.body, 3, &[]), "begin_old");
    assert_eq!(decode_at(&f, f.body, 4, &[]), "end_old T2");
    assert_eq!(decode_at(&f, f.body, 5, &[]), "assert explicit v5");
}

#[test]
fn block_end_decodes_as_a_nop() {
    let f = fixture(vec![Instr::Nop]);
    assert_eq!(decode_at(&f, f.body, 1, &[]), "nop");
    // Empty blocks only have the end point.
    assert_eq!(decode_at(&f, f.caller, 0, &[]), "nop");
}
