//! Context-sensitive control-flow graphs for the Argus analyzer.
//!
//! This crate provides:
//!
//! - **Block graphs** ([`Block`], [`BlockId`], [`Subroutine`],
//!   [`SubroutinePool`]) — straight-line instruction runs organized into
//!   reusable subroutine regions (method bodies, contract checks,
//!   fault/finally handlers), owned by one arena per construction session.
//!
//! - **Program points** ([`Apc`], [`ContextStack`], [`Frame`]) — positions
//!   that pair a block slot with a persistent stack of inlining frames, so
//!   the same shared contract or handler body yields distinct points per
//!   path it was reached through.
//!
//! - **Traversal** ([`Cfg`], [`ContractFreeCfg`]) — successor and
//!   predecessor queries that transparently cross subroutine boundaries by
//!   pushing and popping frames, plus loop detection that survives the
//!   crossings.
//!
//! - **Decode** ([`forward_decode`]) — context-sensitive instruction
//!   dispatch into an [`argus_il::InstrVisitor`], canonicalizing raw
//!   branches and flipping contract conditions between obligation and
//!   hypothesis depending on how the point was reached.
//!
//! # Design
//!
//! Graphs are built once through a [`GraphBuilder`] and then frozen:
//! finalization prunes unreachable blocks, assigns dense display indices
//! from one counter shared by the whole pool, and caches the spanning
//! trees that answer back-edge queries. All traversal state lives in the
//! program points themselves; the graph is immutable and the facades are
//! `Copy`.

mod block;
mod builder;
mod cfg;
mod context;
mod decode;
mod dfs;
mod dump;
mod edge_map;
mod edge_tag;
mod filtered;
mod point;
mod subroutine;

pub use block::{Block, BlockId, CallSite, SubId};
pub use builder::{GraphBuilder, GraphError};
pub use cfg::{BlockGraph, Cfg};
pub use context::{ContextStack, Frame, Frames};
pub use decode::forward_decode;
pub use dump::ContextLookup;
pub use edge_tag::EdgeTag;
pub use filtered::ContractFreeCfg;
pub use point::Apc;
pub use subroutine::{EdgeFilter, EdgeSubroutines, SubKind, Subroutine, SubroutinePool};

#[cfg(test)]
mod test_helpers;
