// SPDX-FileCopyrightText: 2024 Rot127 <unisono@quyllur.org>
// SPDX-License-Identifier: LGPL-3.0-only

//! Arena-owned edges.
//!
//! Spec §9 calls for edges to be modeled as values owned by the
//! AuxGraph's arena and referenced elsewhere by stable handles, to avoid
//! the cyclic-ownership trap of an edge owning (or being owned by) the
//! blocks it connects. `EdgeId` is that handle: a plain arena index, the
//! same shape as `bda::weight::WeightID` indexing into `WeightMap`.

use crate::block::BlockId;

/// Stable handle to an [`EdgeData`] inside an [`crate::auxgraph::AuxGraph`]'s
/// arena. Two distinct `EdgeId`s are never equal even if the edges they
/// name have identical `(src, tgt, real)` tuples (spec §3: "two distinct
/// edges may share the same tuple if explicitly created").
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct EdgeId(usize);

impl EdgeId {
    pub(crate) fn new(index: usize) -> EdgeId {
        EdgeId(index)
    }

    pub(crate) fn index(&self) -> usize {
        self.0
    }
}

/// The data behind an [`EdgeId`]: a directed pair of block identities and
/// whether the edge corresponds to an edge of the original CFG.
#[derive(Clone, Copy, Debug)]
pub struct EdgeData {
    pub src: BlockId,
    pub tgt: BlockId,
    pub real: bool,
}

impl EdgeData {
    pub fn new(src: BlockId, tgt: BlockId, real: bool) -> EdgeData {
        EdgeData { src, tgt, real }
    }
}
