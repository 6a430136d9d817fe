// SPDX-FileCopyrightText: 2024 Rot127 <unisono@quyllur.org>
// SPDX-License-Identifier: LGPL-3.0-only

//! Drives the per-procedure pipeline: build the auxiliary graph, run the
//! segmenter, assign Ball-Larus weights in reverse topological order and
//! report the total path count (spec §4.3).

use std::collections::{HashMap, HashSet};
use std::fs::File;

use crate::auxgraph::AuxGraph;
use crate::block::{BlockId, Procedure};
use crate::edge::EdgeId;
use crate::segmenter::{select_segmentation_edges, LoopId};
use crate::weight::PathWeight;

/// Debug-dump configuration (spec §9, "Global flags": configuration, not
/// global state). Mirrors `bda::flow_graphs::FlowGraphOperations`'s
/// `dot_graph_to_stdout`, generalized to a file sink behind a flag
/// instead of an always-on `println!`.
#[derive(Clone, Default)]
pub struct EncoderConfig {
    /// When set, writes `auxgraph-1.dot` (post-init), `auxgraph-2.dot`
    /// (post-segment) and `auxgraph-3.dot` (post-weighting) into this
    /// directory.
    pub dump_graphs: Option<std::path::PathBuf>,
}

/// Lifecycle of a single procedure's encoding (spec §4.3 "State
/// machine"). `Fresh` has no data to show, so it isn't represented as a
/// distinct variant here; `Encoder::encode` goes straight from nothing
/// to `Encoded`/`Overflowed`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EncodeState {
    Encoded,
    Overflowed,
}

/// The triple a procedure's encoding produces (spec §6 "Exposed").
pub struct EncodeResult {
    pub state: EncodeState,
    /// Number of distinct entry-to-exit paths. Zero means "do not
    /// instrument" (overflow sentinel).
    pub total_paths: PathWeight,
    /// Real edges with a nonzero weight.
    pub edge_weights: Vec<(EdgeId, PathWeight)>,
}

/// Drives the AuxGraph/Segmenter pipeline for one procedure.
#[derive(Default)]
pub struct Encoder {
    graph: AuxGraph,
    config: EncoderConfig,
}

impl Encoder {
    pub fn new(config: EncoderConfig) -> Encoder {
        Encoder {
            graph: AuxGraph::new(),
            config,
        }
    }

    /// The auxiliary graph built by the most recent `encode` call.
    pub fn graph(&self) -> &AuxGraph {
        &self.graph
    }

    /// Runs the full pipeline for `procedure` and returns the resulting
    /// triple. `back_edges` and `loop_of` are the external loop-analysis
    /// collaborators of spec §6; see [`crate::loop_analysis`] for a
    /// default implementation.
    pub fn encode(
        &mut self,
        procedure: &impl Procedure,
        back_edges: &HashSet<(BlockId, BlockId)>,
        loop_of: &dyn Fn(BlockId) -> Option<LoopId>,
    ) -> EncodeResult {
        self.graph.init(procedure);
        self.dump("auxgraph-1.dot", false);

        let segment_edges =
            select_segmentation_edges(&self.graph, procedure, back_edges, loop_of);
        self.graph.segment(&segment_edges);
        self.dump("auxgraph-2.dot", false);

        let result = self.assign_weights();
        self.dump("auxgraph-3.dot", true);
        result
    }

    /// Ball-Larus greedy numbering in reverse topological order (spec
    /// §4.3). Overflow during the running sum aborts weighting for this
    /// procedure and reports the zero-path sentinel instead of
    /// propagating an error (spec §7).
    fn assign_weights(&mut self) -> EncodeResult {
        let mut num_paths: HashMap<BlockId, PathWeight> = HashMap::new();
        let fake_exit = self
            .graph
            .fake_exit()
            .expect("Encoder::assign_weights called before init");
        let entry = self
            .graph
            .entry()
            .expect("Encoder::assign_weights called before init");

        for node in self.graph.nodes().to_vec() {
            let succs = self.graph.succs(node.id()).to_vec();
            let path_count = if succs.is_empty() {
                assert!(
                    node.id() == fake_exit,
                    "block {node} has no successors but is not the fake exit"
                );
                PathWeight::ONE
            } else {
                let mut running = PathWeight::ZERO;
                let mut overflowed = false;
                for edge in succs {
                    self.graph.set_weight(edge, running);
                    let target = self.graph.edge_data(edge).tgt;
                    let target_paths = num_paths.get(&target).copied().unwrap_or(PathWeight::ZERO);
                    match running.checked_add(target_paths) {
                        Some(sum) => running = sum,
                        None => {
                            overflowed = true;
                            break;
                        }
                    }
                }
                if overflowed {
                    log::warn!("Encoder: path count overflowed 64 bits, skipping instrumentation");
                    return EncodeResult {
                        state: EncodeState::Overflowed,
                        total_paths: PathWeight::ZERO,
                        edge_weights: Vec::new(),
                    };
                }
                running
            };
            num_paths.insert(node.id(), path_count);
        }

        let total_paths = num_paths
            .get(&entry)
            .copied()
            .expect("entry must have been visited during weight assignment");
        log::debug!("Encoder: total paths = {total_paths}");
        EncodeResult {
            state: EncodeState::Encoded,
            total_paths,
            edge_weights: self.graph.weights(),
        }
    }

    fn dump(&self, filename: &str, weighted: bool) {
        let Some(dir) = &self.config.dump_graphs else {
            return;
        };
        let path = dir.join(filename);
        let result = File::create(&path).and_then(|mut file| {
            if weighted {
                self.graph.dot_weighted(&mut file)
            } else {
                self.graph.dot(&mut file)
            }
        });
        if let Err(err) = result {
            log::warn!("Encoder: failed to write {}: {err}", path.display());
        }
    }
}
