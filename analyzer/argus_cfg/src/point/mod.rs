//! Program points.
//!
//! An [`Apc`] names one instruction-slot position inside one block *under a
//! specific inlining context*: the same block slot reached through two
//! different attachment chains yields two distinct points. Offsets range
//! over `0..=count` for a block with `count` slots; offset `count` is the
//! block end, which carries no instruction of its own.
//!
//! The contract predicates answer "what contract region am I in, and how
//! was it reached" questions by combining the current subroutine's kind
//! with a scan of the context frames from innermost to outermost. Each
//! predicate names its trigger and stopper tags; any other tag continues
//! the scan, and an exhausted stack answers `false`.

use std::fmt;

use argus_il::MethodId;

use crate::block::BlockId;
use crate::context::ContextStack;
use crate::edge_tag::EdgeTag;
use crate::subroutine::SubroutinePool;

/// Abstract program counter: block, slot offset, inlining context.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Apc {
    pub block: BlockId,
    pub index: usize,
    pub context: ContextStack,
}

impl Apc {
    pub fn new(block: BlockId, index: usize, context: ContextStack) -> Self {
        Self {
            block,
            index,
            context,
        }
    }

    /// The next slot in the same block, or `self` unchanged at the block
    /// end. Successor queries handle the block-to-block step.
    pub fn next(&self, pool: &SubroutinePool) -> Apc {
        if self.index < pool.block(self.block).count() {
            Apc::new(self.block, self.index + 1, self.context.clone())
        } else {
            self.clone()
        }
    }

    /// Is this the block-end point (no instruction slot of its own)?
    pub fn is_block_end(&self, pool: &SubroutinePool) -> bool {
        self.index == pool.block(self.block).count()
    }

    /// Innermost-out frame scan: `hit` classifies each frame's tag as a
    /// definite answer or a continue; an exhausted stack answers `false`.
    fn scan(&self, hit: impl Fn(EdgeTag) -> Option<bool>) -> bool {
        for frame in self.context.iter() {
            if let Some(answer) = hit(frame.tag) {
                return answer;
            }
        }
        false
    }

    /// In a requires subroutine reached through a call edge. Trigger:
    /// before-category frame. Stopper: ENTRY (the requires was inlined at
    /// the method's own entry, not a call).
    pub fn inside_requires_at_call(&self, pool: &SubroutinePool) -> bool {
        if !pool[self.block.sub()].kind().is_requires() {
            return false;
        }
        self.scan(|tag| {
            if tag.in_category(EdgeTag::BEFORE_MASK) {
                Some(true)
            } else if tag.contains(EdgeTag::ENTRY) {
                Some(false)
            } else {
                None
            }
        })
    }

    /// In an ensures or old-value subroutine reached through a call edge.
    /// Trigger: after-category frame. Stoppers: EXIT and ENTRY.
    pub fn inside_ensures_at_call(&self, pool: &SubroutinePool) -> bool {
        if !pool[self.block.sub()].kind().is_ensures_or_old() {
            return false;
        }
        self.scan(|tag| {
            if tag.in_category(EdgeTag::AFTER_MASK) {
                Some(true)
            } else if tag.contains(EdgeTag::EXIT) || tag.contains(EdgeTag::ENTRY) {
                Some(false)
            } else {
                None
            }
        })
    }

    /// In an invariant subroutine reached through a call edge. Trigger:
    /// after-category frame. Stoppers: EXIT and ENTRY.
    pub fn inside_invariant_at_call(&self, pool: &SubroutinePool) -> bool {
        if !pool[self.block.sub()].kind().is_invariant() {
            return false;
        }
        self.scan(|tag| {
            if tag.in_category(EdgeTag::AFTER_MASK) {
                Some(true)
            } else if tag.contains(EdgeTag::EXIT) || tag.contains(EdgeTag::ENTRY) {
                Some(false)
            } else {
                None
            }
        })
    }

    /// In an invariant subroutine inlined at a method exit. Trigger: EXIT.
    /// Stoppers: ENTRY and after-category frames.
    pub fn inside_invariant_on_exit(&self, pool: &SubroutinePool) -> bool {
        if !pool[self.block.sub()].kind().is_invariant() {
            return false;
        }
        self.scan(|tag| {
            if tag.contains(EdgeTag::EXIT) {
                Some(true)
            } else if tag.contains(EdgeTag::ENTRY) || tag.in_category(EdgeTag::AFTER_MASK) {
                Some(false)
            } else {
                None
            }
        })
    }

    /// In a requires subroutine as part of the analyzed method's own
    /// checks (entry inlining or a call made by the method), as opposed to
    /// a requires expanded inside some unrelated region.
    pub fn inside_requires_in_method(&self, pool: &SubroutinePool) -> bool {
        if !pool[self.block.sub()].kind().is_requires() {
            return false;
        }
        self.in_method_scan()
    }

    /// Ensures/old-value counterpart of
    /// [`Apc::inside_requires_in_method`].
    pub fn inside_ensures_in_method(&self, pool: &SubroutinePool) -> bool {
        if !pool[self.block.sub()].kind().is_ensures_or_old() {
            return false;
        }
        self.in_method_scan()
    }

    /// Invariant counterpart of [`Apc::inside_requires_in_method`].
    pub fn inside_invariant_in_method(&self, pool: &SubroutinePool) -> bool {
        if !pool[self.block.sub()].kind().is_invariant() {
            return false;
        }
        self.in_method_scan()
    }

    fn in_method_scan(&self) -> bool {
        self.scan(|tag| {
            if tag.contains(EdgeTag::ENTRY)
                || tag.contains(EdgeTag::EXIT)
                || tag.in_category(EdgeTag::AFTER_MASK)
            {
                Some(true)
            } else {
                None
            }
        })
    }

    /// Anywhere inside contract code: the current subroutine or any
    /// subroutine on the descent path is a contract kind.
    pub fn inside_contract(&self, pool: &SubroutinePool) -> bool {
        if pool[self.block.sub()].kind().is_contract() {
            return true;
        }
        self.context
            .iter()
            .any(|frame| pool[frame.source.sub()].kind().is_contract())
    }

    /// Walk outward through the owning subroutines until a method body is
    /// found; answer whether that method is a constructor. `false` when no
    /// method body encloses this point.
    pub fn inside_constructor(&self, pool: &SubroutinePool) -> bool {
        let mut sub = self.block.sub();
        let mut frames = self.context.iter();
        loop {
            if let crate::subroutine::SubKind::Method { is_constructor, .. } = pool[sub].kind() {
                return is_constructor;
            }
            match frames.next() {
                Some(frame) => sub = frame.source.sub(),
                None => return false,
            }
        }
    }

    /// Old-state manifestation is not modeled; reaching this query is a
    /// construction bug.
    pub fn inside_old_manifestation(&self, _pool: &SubroutinePool) -> bool {
        panic!("old-state manifestation is not modeled at {self}");
    }

    /// The nearest enclosing subroutine that knows its user method:
    /// the current subroutine first, then outward along the descent path.
    pub fn try_get_enclosing_method(&self, pool: &SubroutinePool) -> Option<MethodId> {
        if let Some(method) = pool[self.block.sub()].kind().method_info() {
            return Some(method);
        }
        self.context
            .iter()
            .find_map(|frame| pool[frame.source.sub()].kind().method_info())
    }
}

impl fmt::Display for Apc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.block, self.index)?;
        if !self.context.is_empty() {
            write!(f, " {}", self.context)?;
        }
        Ok(())
    }
}
