// SPDX-FileCopyrightText: 2024 Rot127 <unisono@quyllur.org>
// SPDX-License-Identifier: LGPL-3.0-only

//! Insertion-ordered `Block -> [Edge]` adjacency map.
//!
//! Adapted from `helper::vec_map::VecMap` (a generic `BTreeMap<K, Vec<V>>`
//! used throughout the teacher crate for "key -> bag of values" tables).
//! Here it is specialized to the one shape the AuxGraph needs: successor
//! edges per block, in caller/segmentation insertion order. A `BTreeMap`
//! keyed by [`BlockId`] is used instead of a `HashMap` so iteration order
//! never depends on a hasher, per spec §9 ("Hash-based iteration is
//! forbidden on any path that influences weights") — though the only
//! iteration that matters for weights is the per-bucket `Vec`, insertion
//! order is kept consistent end to end regardless.

use std::collections::BTreeMap;

use crate::block::BlockId;
use crate::edge::EdgeId;

#[derive(Default)]
pub struct EdgeList {
    map: BTreeMap<BlockId, Vec<EdgeId>>,
}

impl EdgeList {
    pub fn new() -> EdgeList {
        EdgeList {
            map: BTreeMap::new(),
        }
    }

    /// Appends `edge` to the successor list of `block`, preserving
    /// insertion order.
    pub fn push(&mut self, block: BlockId, edge: EdgeId) {
        self.map.entry(block).or_default().push(edge);
    }

    /// Successor edges of `block`, in insertion order. Empty if `block`
    /// is unknown to this map.
    pub fn get(&self, block: BlockId) -> &[EdgeId] {
        self.map.get(&block).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Removes and returns the first edge of `block` for which `pred`
    /// returns true, preserving the order of the remaining edges. `None`
    /// if no such edge exists.
    pub fn remove_first(
        &mut self,
        block: BlockId,
        pred: impl Fn(EdgeId) -> bool,
    ) -> Option<EdgeId> {
        let edges = self.map.get_mut(&block)?;
        let idx = edges.iter().position(|&e| pred(e))?;
        Some(edges.remove(idx))
    }

    pub fn blocks(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.map.keys().copied()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}
