// SPDX-FileCopyrightText: 2024 Rot127 <unisono@quyllur.org>
// SPDX-License-Identifier: LGPL-3.0-only

//! Opaque basic-block identity.
//!
//! The core never inspects a block's contents. It only needs identity
//! (for equality, hashing and deterministic ordering of its own arena)
//! and a display name, used exclusively to recognize the synthetic
//! fake-exit marker in debug dumps and assertions.

use std::fmt;

/// The literal prefix `AuxGraph::init` uses when synthesizing the fake
/// exit block, and the marker `Encoder` asserts on for the single block
/// with no successors.
pub const FAKE_EXIT_MARKER: &str = "fake.exit";

/// Identity of a [`Block`]. Wraps a caller-chosen `u64`; two blocks with
/// the same id are the same block. `Ord` is derived only so blocks can be
/// used as keys of an insertion-ordered, non-hash-based adjacency map
/// (see [`crate::edge_list::EdgeList`]); it carries no semantic meaning
/// about control flow.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct BlockId(u64);

impl BlockId {
    pub const fn new(id: u64) -> BlockId {
        BlockId(id)
    }

    pub const fn raw(&self) -> u64 {
        self.0
    }
}

impl From<u64> for BlockId {
    fn from(value: u64) -> BlockId {
        BlockId::new(value)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b{:#x}", self.0)
    }
}

/// A basic block as the core sees it: an identity plus a display name.
/// Equality and hashing are by [`BlockId`] alone, never by name.
#[derive(Clone, Debug)]
pub struct Block {
    id: BlockId,
    name: String,
}

impl Block {
    pub fn new(id: BlockId, name: impl Into<String>) -> Block {
        Block {
            id,
            name: name.into(),
        }
    }

    /// Builds the block the way a caller normally does: identity and
    /// name derived from the same `u64`.
    pub fn from_address(addr: u64) -> Block {
        Block::new(BlockId::new(addr), format!("bb_{:#x}", addr))
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True if this block is (or could pass for) the synthetic fake
    /// exit: its name begins with [`FAKE_EXIT_MARKER`].
    pub fn is_fake_exit(&self) -> bool {
        self.name.starts_with(FAKE_EXIT_MARKER)
    }
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Block {}

impl std::hash::Hash for Block {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The procedure representation the core consumes (spec §6, "Consumed").
/// A caller supplies an entry block and a successor relation; the core
/// never iterates the full block set itself, since unreachable blocks
/// are implicitly dropped by the post-order traversal from `entry()`.
pub trait Procedure {
    /// The distinguished entry block.
    fn entry(&self) -> Block;

    /// Outgoing successors of `block`, in caller-stable order. The order
    /// is preserved verbatim into `AuxGraph::EdgeList` and therefore
    /// affects weight assignment (spec §4.3).
    fn successors(&self, block: &Block) -> Vec<Block>;
}
