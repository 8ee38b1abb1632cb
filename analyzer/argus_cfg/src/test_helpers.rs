//! Shared fixtures for unit tests.

use argus_il::{CodeProvider, Instr, Label, Metadata, MethodId, Span, TypeId};

use crate::subroutine::SubKind;

/// In-memory instruction store; labels are indices into it.
#[derive(Default)]
pub(crate) struct TestCode {
    instrs: Vec<Instr>,
}

impl TestCode {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append `instr` and return its label.
    pub(crate) fn label(&mut self, instr: Instr) -> Label {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "test fixtures hold a handful of instructions"
        )]
        let label = Label::new(self.instrs.len() as u32);
        self.instrs.push(instr);
        label
    }
}

impl CodeProvider for TestCode {
    fn instr(&self, label: Label) -> &Instr {
        &self.instrs[label.index()]
    }

    fn span(&self, _label: Label) -> Option<Span> {
        None
    }
}

/// Metadata oracle with a configurable reference-equality method.
#[derive(Default)]
pub(crate) struct TestMeta {
    pub(crate) ref_eq: Option<MethodId>,
}

impl Metadata for TestMeta {
    fn is_reference_equality(&self, method: MethodId) -> bool {
        self.ref_eq == Some(method)
    }

    fn method_name(&self, method: MethodId) -> String {
        format!("{method}")
    }
}

pub(crate) fn method(raw: u32) -> SubKind {
    SubKind::Method {
        method: MethodId::new(raw),
        is_constructor: false,
    }
}

pub(crate) fn constructor(raw: u32) -> SubKind {
    SubKind::Method {
        method: MethodId::new(raw),
        is_constructor: true,
    }
}

pub(crate) fn requires(raw: u32) -> SubKind {
    SubKind::Requires {
        method: MethodId::new(raw),
    }
}

pub(crate) fn ensures(raw: u32) -> SubKind {
    SubKind::Ensures {
        method: MethodId::new(raw),
    }
}

pub(crate) fn old_value(raw: u32) -> SubKind {
    SubKind::OldValue {
        method: MethodId::new(raw),
    }
}

pub(crate) fn invariant(raw: u32) -> SubKind {
    SubKind::Invariant {
        ty: TypeId::new(raw),
    }
}
