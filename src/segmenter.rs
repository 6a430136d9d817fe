// SPDX-FileCopyrightText: 2024 Rot127 <unisono@quyllur.org>
// SPDX-License-Identifier: LGPL-3.0-only

//! Chooses which CFG edges to cut so the auxiliary graph becomes
//! acyclic with independently-numbered loop bodies (spec §4.2).
//!
//! This module only decides *which* edges to segment; the actual graph
//! surgery is `AuxGraph::segment`'s job (spec §4.1). A back-edge set and
//! a `loop_of` map are taken as plain data, consumed exactly as spec §6
//! describes the external "loop analysis" and "back-edge set"
//! collaborators — see [`crate::loop_analysis`] for a ready-made
//! implementation of both, grounded on `petgraph`'s dominator tree the
//! way `bda::flow_graphs` uses `petgraph::algo` for its own cycle work.

use std::collections::HashSet;

use crate::auxgraph::AuxGraph;
use crate::block::{BlockId, Procedure};

/// Identifier of a loop an edge analysis has detected. Equality is by
/// identity; the numbering scheme is the caller's choice.
pub type LoopId = u32;

/// Decides which real `(src, tgt)` edges of `procedure` must be
/// segmented, in `AuxGraph::Nodes` / successor order (spec §4.2
/// "Iteration order"), so the result is deterministic across runs.
///
/// An edge is segmented when it is a back edge, or when it crosses a
/// loop boundary in either direction (`loop_of(src) != loop_of(tgt)`,
/// including `None != Some(_)` either way). The result is an
/// insertion-ordered set, not a plain sequence: a block with two
/// parallel real edges to the same target that both satisfy the rule
/// names the same `(src, tgt)` pair twice, and it must only be
/// segmented once, the same way `EPPEncode.cpp` collects segmentation
/// candidates into a `SetVector<pair<BB*, BB*>>`.
pub fn select_segmentation_edges(
    graph: &AuxGraph,
    procedure: &impl Procedure,
    back_edges: &HashSet<(BlockId, BlockId)>,
    loop_of: &dyn Fn(BlockId) -> Option<LoopId>,
) -> Vec<(BlockId, BlockId)> {
    let mut seen = HashSet::new();
    let mut selected = Vec::new();

    for node in graph.nodes() {
        if graph.fake_exit() == Some(node.id()) {
            continue;
        }
        for succ in procedure.successors(node) {
            let pair = (node.id(), succ.id());
            let is_back_edge = back_edges.contains(&pair);
            let crosses_loop = loop_of(node.id()) != loop_of(succ.id());
            if (is_back_edge || crosses_loop) && seen.insert(pair) {
                selected.push(pair);
            }
        }
    }

    log::debug!("Segmenter: selected {} edge(s) for segmentation", selected.len());
    selected
}
