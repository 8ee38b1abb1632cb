//! Inlining-frame context stacks.
//!
//! A [`ContextStack`] records which edges traversal descended into to reach
//! the currently active subroutine: one [`Frame`] per pending resumption,
//! innermost first. The empty stack means "in the outermost subroutine with
//! nothing to resume", which is true at the method's own entry and exit.
//!
//! The stack is a persistent, structurally shared singly linked list:
//! pushing allocates one node and shares the tail, so the thousands of
//! program points created during a fixpoint run share their common context
//! suffixes instead of copying them. Equality has a reference fast path
//! (shared tails compare in O(1)) and falls back to a structural walk.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::block::BlockId;
use crate::edge_tag::EdgeTag;

/// One inlining frame: the edge that was descended into.
///
/// `source -> target` is the edge in the *parent* subroutine; `tag` is the
/// attachment tag of the child subroutine currently being executed. When
/// that child's exit is reached, traversal resumes at `target` with this
/// frame popped.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Frame {
    pub source: BlockId,
    pub target: BlockId,
    pub tag: EdgeTag,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}->{}:{})", self.source, self.target, self.tag)
    }
}

struct Node {
    frame: Frame,
    tail: ContextStack,
}

/// Persistent stack of inlining frames, innermost frame on top.
#[derive(Clone, Default)]
pub struct ContextStack {
    head: Option<Rc<Node>>,
}

impl ContextStack {
    /// The empty context: outermost subroutine, no pending resumption.
    pub const fn empty() -> Self {
        Self { head: None }
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Number of frames. Walks the list.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// New stack with `frame` on top; `self` is shared as the tail.
    pub fn push(&self, frame: Frame) -> Self {
        Self {
            head: Some(Rc::new(Node {
                frame,
                tail: self.clone(),
            })),
        }
    }

    /// The innermost frame, if any.
    pub fn top(&self) -> Option<&Frame> {
        self.head.as_ref().map(|n| &n.frame)
    }

    /// Split into innermost frame and remaining stack.
    pub fn pop(&self) -> Option<(Frame, ContextStack)> {
        self.head.as_ref().map(|n| (n.frame, n.tail.clone()))
    }

    /// Frames from innermost to outermost.
    pub fn iter(&self) -> Frames<'_> {
        Frames {
            node: self.head.as_deref(),
        }
    }
}

/// Iterator over frames, innermost first.
pub struct Frames<'a> {
    node: Option<&'a Node>,
}

impl<'a> Iterator for Frames<'a> {
    type Item = &'a Frame;

    fn next(&mut self) -> Option<&'a Frame> {
        let node = self.node?;
        self.node = node.tail.head.as_deref();
        Some(&node.frame)
    }
}

impl PartialEq for ContextStack {
    fn eq(&self, other: &Self) -> bool {
        let mut a = &self.head;
        let mut b = &other.head;
        loop {
            match (a, b) {
                (None, None) => return true,
                (Some(x), Some(y)) => {
                    // Shared tails compare in O(1).
                    if Rc::ptr_eq(x, y) {
                        return true;
                    }
                    if x.frame != y.frame {
                        return false;
                    }
                    a = &x.tail.head;
                    b = &y.tail.head;
                }
                _ => return false,
            }
        }
    }
}

impl Eq for ContextStack {}

impl Hash for ContextStack {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for frame in self.iter() {
            frame.hash(state);
        }
    }
}

impl fmt::Debug for ContextStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl fmt::Display for ContextStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("[]");
        }
        f.write_str("[")?;
        for (i, frame) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{frame}")?;
        }
        f.write_str("]")
    }
}
