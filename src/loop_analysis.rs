// SPDX-FileCopyrightText: 2024 Rot127 <unisono@quyllur.org>
// SPDX-License-Identifier: LGPL-3.0-only

//! Default implementation of the "loop analysis" and "back-edge set"
//! collaborators spec §6 describes as external inputs.
//!
//! `Segmenter` only ever sees a back-edge set and a `loop_of` map as
//! plain data (spec §4.2); this module is one way to produce them, not
//! part of the core's contract. It is built on `petgraph`'s dominator
//! tree (`petgraph::algo::dominators::simple_fast`), the same algorithm
//! family the teacher crate reaches for elsewhere in its own cycle
//! handling (`bda::flow_graphs::make_acyclic` uses `kosaraju_scc` and
//! `toposort` from the same `petgraph::algo` module).

use std::collections::{HashMap, HashSet};

use petgraph::algo::dominators::{self, Dominators};
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction::Incoming;

use crate::block::{BlockId, Procedure};
use crate::segmenter::LoopId;

/// Back edges and innermost-loop membership for one procedure.
pub struct LoopAnalysis {
    back_edges: HashSet<(BlockId, BlockId)>,
    loop_of: HashMap<BlockId, LoopId>,
}

impl LoopAnalysis {
    pub fn back_edges(&self) -> &HashSet<(BlockId, BlockId)> {
        &self.back_edges
    }

    /// Innermost loop containing `block`, or `None` outside any loop.
    pub fn loop_of(&self, block: BlockId) -> Option<LoopId> {
        self.loop_of.get(&block).copied()
    }
}

/// Computes back edges (`(u, v)` where `v` dominates `u`) and innermost
/// natural-loop membership for `procedure`, using a dominator tree
/// rooted at `procedure.entry()`.
pub fn analyze(procedure: &impl Procedure) -> LoopAnalysis {
    let entry = procedure.entry();
    let mut graph = DiGraphMap::<BlockId, ()>::new();
    let mut visited = HashSet::new();
    let mut stack = vec![entry.clone()];
    graph.add_node(entry.id());
    visited.insert(entry.id());

    while let Some(block) = stack.pop() {
        for succ in procedure.successors(&block) {
            graph.add_edge(block.id(), succ.id(), ());
            if visited.insert(succ.id()) {
                stack.push(succ);
            }
        }
    }

    let dominators = dominators::simple_fast(&graph, entry.id());

    let mut back_edges = HashSet::new();
    for (u, v, ()) in graph.all_edges() {
        if dominates(&dominators, v, u) {
            back_edges.insert((u, v));
        }
    }

    let loop_of = innermost_loop_membership(&graph, &back_edges);
    log::debug!(
        "loop_analysis: {} back edge(s), {} block(s) in a loop",
        back_edges.len(),
        loop_of.len()
    );
    LoopAnalysis {
        back_edges,
        loop_of,
    }
}

fn dominates(doms: &Dominators<BlockId>, v: BlockId, u: BlockId) -> bool {
    if v == u {
        return true;
    }
    doms.strict_dominators(u)
        .map(|mut strict| strict.any(|d| d == v))
        .unwrap_or(false)
}

/// Builds the natural loop of each back edge `(tail, header)` — the
/// header plus every block that can reach `tail` without passing back
/// through `header` — then assigns each block to the smallest (most
/// deeply nested) body that contains it.
fn innermost_loop_membership(
    graph: &DiGraphMap<BlockId, ()>,
    back_edges: &HashSet<(BlockId, BlockId)>,
) -> HashMap<BlockId, LoopId> {
    let mut next_id: LoopId = 0;
    let mut header_loop: HashMap<BlockId, LoopId> = HashMap::new();
    let mut bodies: HashMap<LoopId, HashSet<BlockId>> = HashMap::new();

    for &(tail, header) in back_edges {
        let id = *header_loop.entry(header).or_insert_with(|| {
            let id = next_id;
            next_id += 1;
            id
        });
        let body = bodies.entry(id).or_default();
        body.insert(header);
        let mut stack = vec![tail];
        body.insert(tail);
        while let Some(node) = stack.pop() {
            for pred in graph.neighbors_directed(node, Incoming) {
                if pred != header && body.insert(pred) {
                    stack.push(pred);
                }
            }
        }
    }

    let mut loop_of: HashMap<BlockId, LoopId> = HashMap::new();
    for (&id, body) in &bodies {
        for &block in body {
            match loop_of.get(&block) {
                Some(&current) if bodies[&current].len() <= body.len() => {}
                _ => {
                    loop_of.insert(block, id);
                }
            }
        }
    }
    loop_of
}
