// SPDX-FileCopyrightText: 2024 Rot127 <unisono@quyllur.org>
// SPDX-License-Identifier: LGPL-3.0-only

//! The auxiliary graph: an acyclic, single-sink transform of a
//! procedure's CFG, built by synthesizing a fake exit and later cut into
//! independent acyclic regions by [`crate::segmenter`] (spec §3, §4.1).

use std::collections::HashMap;
use std::io::{self, Write};

use crate::block::{Block, BlockId, FAKE_EXIT_MARKER};
use crate::edge::{EdgeData, EdgeId};
use crate::edge_list::EdgeList;
use crate::weight::PathWeight;

/// Reserved identity for the synthetic fake-exit block. Callers must not
/// use `u64::MAX` as a real block id; `AuxGraph::init` asserts this.
pub const FAKE_EXIT_ID: BlockId = BlockId::new(u64::MAX);

/// Owns a procedure's nodes, edges, segmentation table and weights.
/// Created fresh per procedure, mutated only through `init`, `add` and
/// `segment`, and released with `clear` (spec §3 Lifecycle).
#[derive(Default)]
pub struct AuxGraph {
    /// Reverse post-order: `nodes[0]` is the fake exit, `nodes.last()`
    /// is the original entry (spec invariant 6).
    nodes: Vec<Block>,
    edges: Vec<EdgeData>,
    edge_list: EdgeList,
    segment_map: HashMap<EdgeId, (EdgeId, EdgeId)>,
    weights: HashMap<EdgeId, PathWeight>,
    entry: Option<BlockId>,
    fake_exit: Option<BlockId>,
}

impl AuxGraph {
    pub fn new() -> AuxGraph {
        AuxGraph::default()
    }

    /// Builds the initial auxiliary graph from `procedure`: a post-order
    /// traversal from entry becomes `Nodes`, one real edge per CFG
    /// successor is recorded, and a synthetic fake exit is wired to
    /// every leaf (spec §4.1 `init`).
    pub fn init(&mut self, procedure: &impl crate::block::Procedure) {
        self.clear();
        let entry = procedure.entry();
        assert_ne!(
            entry.id(),
            FAKE_EXIT_ID,
            "entry block must not use the reserved fake-exit id"
        );

        let mut order = post_order(procedure, &entry);

        let mut leaves = Vec::new();
        for block in &order {
            let succs = procedure.successors(block);
            if succs.is_empty() {
                leaves.push(block.id());
            } else {
                for succ in &succs {
                    self.add(block.id(), succ.id(), true);
                }
            }
        }

        let fake_exit = Block::new(FAKE_EXIT_ID, FAKE_EXIT_MARKER);
        for leaf in leaves {
            self.add(leaf, fake_exit.id(), false);
        }

        self.entry = Some(entry.id());
        self.fake_exit = Some(fake_exit.id());
        order.insert(0, fake_exit);
        self.nodes = order;

        log::debug!(
            "AuxGraph::init: {} nodes, {} edges",
            self.nodes.len(),
            self.edges.len()
        );
    }

    /// Appends a new edge and returns a stable handle to it.
    pub fn add(&mut self, src: BlockId, tgt: BlockId, real: bool) -> EdgeId {
        let id = EdgeId::new(self.edges.len());
        self.edges.push(EdgeData::new(src, tgt, real));
        self.edge_list.push(src, id);
        id
    }

    /// First successor edge of `src` matching `(tgt, real)`, if any.
    pub fn exists(&self, src: BlockId, tgt: BlockId, real: bool) -> Option<EdgeId> {
        self.edge_list
            .get(src)
            .iter()
            .copied()
            .find(|&e| self.edge_data(e).tgt == tgt && self.edge_data(e).real == real)
    }

    pub fn get_or_insert_edge(&mut self, src: BlockId, tgt: BlockId, real: bool) -> EdgeId {
        self.exists(src, tgt, real)
            .unwrap_or_else(|| self.add(src, tgt, real))
    }

    /// Successor edges of `block`, in insertion order. Empty for an
    /// unknown block.
    pub fn succs(&self, block: BlockId) -> &[EdgeId] {
        self.edge_list.get(block)
    }

    /// Replaces each named real edge `A -> B` with the pair
    /// `A -> FakeExit`, `Entry -> B`, recording the mapping (spec §4.1
    /// `segment`). `pairs` must name real edges currently in the graph,
    /// each at most once; violations panic, a programmer/Segmenter error
    /// per spec §7.
    pub fn segment(&mut self, pairs: &[(BlockId, BlockId)]) {
        let entry = self
            .entry
            .expect("AuxGraph::segment called before AuxGraph::init");
        let fake_exit = self
            .fake_exit
            .expect("AuxGraph::segment called before AuxGraph::init");

        for &(src, tgt) in pairs {
            let edges = &self.edges;
            let original = self
                .edge_list
                .remove_first(src, |e| edges[e.index()].tgt == tgt && edges[e.index()].real)
                .unwrap_or_else(|| {
                    panic!(
                        "segment: no unsegmented real edge {src} -> {tgt} in the graph \
                         (missing, or already segmented)"
                    )
                });
            let first_half = self.add(src, fake_exit, false);
            let second_half = self.add(entry, tgt, false);
            self.segment_map.insert(original, (first_half, second_half));
        }

        log::debug!("AuxGraph::segment: segmented {} edges", pairs.len());
    }

    /// Real edges with a nonzero assigned weight — the edges the
    /// instrumentation collaborator places counter increments on (spec
    /// §4.1 `getWeights`).
    pub fn weights(&self) -> Vec<(EdgeId, PathWeight)> {
        self.weights
            .iter()
            .filter(|&(&id, &w)| self.edge_data(id).real && w != PathWeight::ZERO)
            .map(|(&id, &w)| (id, w))
            .collect()
    }

    pub fn segment_map(&self) -> &HashMap<EdgeId, (EdgeId, EdgeId)> {
        &self.segment_map
    }

    pub fn edge_weight(&self, edge: EdgeId) -> Option<PathWeight> {
        self.weights.get(&edge).copied()
    }

    pub(crate) fn set_weight(&mut self, edge: EdgeId, weight: PathWeight) {
        self.weights.insert(edge, weight);
    }

    pub fn edge_data(&self, edge: EdgeId) -> EdgeData {
        self.edges[edge.index()]
    }

    /// Nodes in reverse-topological order: `nodes()[0]` is the fake
    /// exit, `nodes().last()` is the original entry.
    pub fn nodes(&self) -> &[Block] {
        &self.nodes
    }

    pub fn entry(&self) -> Option<BlockId> {
        self.entry
    }

    pub fn fake_exit(&self) -> Option<BlockId> {
        self.fake_exit
    }

    /// Resets all internal tables; releases this procedure's arena.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.edge_list.clear();
        self.segment_map.clear();
        self.weights.clear();
        self.entry = None;
        self.fake_exit = None;
    }

    /// Graphviz dump without weight labels (the `auxgraph-1.dot` /
    /// `auxgraph-2.dot` snapshots of spec §6).
    pub fn dot(&self, sink: &mut dyn Write) -> io::Result<()> {
        self.write_dot(sink, false)
    }

    /// Graphviz dump with weight labels (`auxgraph-3.dot`).
    pub fn dot_weighted(&self, sink: &mut dyn Write) -> io::Result<()> {
        self.write_dot(sink, true)
    }

    fn write_dot(&self, sink: &mut dyn Write, with_weights: bool) -> io::Result<()> {
        writeln!(sink, "digraph \"AuxGraph\" {{")?;
        writeln!(sink, "  label=\"AuxGraph\";")?;
        for node in &self.nodes {
            writeln!(
                sink,
                "  \"{}\" [shape=record, label=\"{}\"];",
                node.id(),
                node
            )?;
        }
        for block in self.edge_list.blocks() {
            for &edge in self.edge_list.get(block) {
                let data = self.edge_data(edge);
                let color = if data.real { "" } else { ",color=\"red\"" };
                let label = if with_weights {
                    self.edge_weight(edge)
                        .map(|w| w.to_string())
                        .unwrap_or_default()
                } else {
                    String::new()
                };
                writeln!(
                    sink,
                    "  \"{}\" -> \"{}\" [style=solid{}, label=\"{}\"];",
                    data.src, data.tgt, color, label
                )?;
            }
        }
        writeln!(sink, "}}")
    }
}

/// Post-order DFS over `procedure` starting at `entry`. Back edges
/// (to an ancestor still on the stack) and forward re-visits are both
/// dropped by the `visited` check, so the traversal terminates and
/// treats the cyclic CFG as its own DFS spanning forest's post-order
/// (spec §9, "Cyclic control flow").
fn post_order(procedure: &impl crate::block::Procedure, entry: &Block) -> Vec<Block> {
    let mut visited = std::collections::HashSet::new();
    let mut order = Vec::new();
    let mut stack: Vec<(Block, Vec<Block>, usize)> = Vec::new();

    visited.insert(entry.id());
    let succs = procedure.successors(entry);
    stack.push((entry.clone(), succs, 0));

    while let Some((_, succs, idx)) = stack.last_mut() {
        if *idx < succs.len() {
            let next = succs[*idx].clone();
            *idx += 1;
            if visited.insert(next.id()) {
                let next_succs = procedure.successors(&next);
                stack.push((next, next_succs, 0));
            }
        } else {
            let (block, _, _) = stack.pop().unwrap();
            order.push(block);
        }
    }
    order
}
