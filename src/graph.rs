// SPDX-FileCopyrightText: 2024 Rot127 <unisono@quyllur.org>
// SPDX-License-Identifier: LGPL-3.0-only

//! A minimal, directly-buildable [`Procedure`] implementation.
//!
//! Spec §6 treats the procedure representation as something the core
//! merely consumes; it never mandates a concrete graph type. `bda::cfg`
//! builds its own CFG the same way — `add_edge((addr, data), (addr,
//! data))` registering both endpoints and the edge between them in one
//! call — backed there by `petgraph::graphmap::DiGraphMap`. This crate
//! follows that shape but keeps the adjacency itself as the plain
//! insertion-ordered `BTreeMap<BlockId, Vec<BlockId>>` the core already
//! needs to be deterministic about, since nothing here requires
//! `petgraph`'s edge-weight or removal machinery.

use std::collections::BTreeMap;

use crate::block::{Block, BlockId, Procedure};

/// A directly-buildable control-flow graph: add edges, pick an entry,
/// hand it to [`crate::encoder::Encoder::encode`].
#[derive(Default)]
pub struct ControlFlowGraph {
    entry: Option<BlockId>,
    names: BTreeMap<BlockId, String>,
    successors: BTreeMap<BlockId, Vec<BlockId>>,
}

impl ControlFlowGraph {
    pub fn new() -> ControlFlowGraph {
        ControlFlowGraph::default()
    }

    /// Registers `id` (creating it if unseen) under `name`, without
    /// adding any edge. Useful for leaf blocks that only ever appear as
    /// a successor.
    pub fn add_block(&mut self, id: impl Into<BlockId>, name: impl Into<String>) -> BlockId {
        let id = id.into();
        self.names.entry(id).or_insert_with(|| name.into());
        self.successors.entry(id).or_default();
        id
    }

    /// The first block ever added becomes the entry unless overridden.
    pub fn set_entry(&mut self, id: BlockId) {
        self.entry = Some(id);
    }

    /// Adds a real CFG edge `src -> tgt`, registering both endpoints by
    /// name if not already known. Edges are kept in call order, which
    /// becomes the successor order `AuxGraph::init` preserves.
    pub fn add_edge(&mut self, src: (impl Into<BlockId>, &str), tgt: (impl Into<BlockId>, &str)) {
        let src_id = self.add_block(src.0, src.1);
        let tgt_id = self.add_block(tgt.0, tgt.1);
        if self.entry.is_none() {
            self.entry = Some(src_id);
        }
        self.successors.entry(src_id).or_default().push(tgt_id);
    }

    fn block(&self, id: BlockId) -> Block {
        Block::new(
            id,
            self.names
                .get(&id)
                .cloned()
                .unwrap_or_else(|| id.to_string()),
        )
    }
}

impl Procedure for ControlFlowGraph {
    fn entry(&self) -> Block {
        let id = self
            .entry
            .expect("ControlFlowGraph::entry: no entry block set");
        self.block(id)
    }

    fn successors(&self, block: &Block) -> Vec<Block> {
        self.successors
            .get(&block.id())
            .map(|succs| succs.iter().map(|&id| self.block(id)).collect())
            .unwrap_or_default()
    }
}
