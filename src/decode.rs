// SPDX-FileCopyrightText: 2024 Rot127 <unisono@quyllur.org>
// SPDX-License-Identifier: LGPL-3.0-only

//! Canonical decoder: turns a path number back into the sequence of
//! edges it names (spec §8, "Round-trip").
//!
//! This is a verification utility, not the "decoding tool" spec §7
//! puts out of scope — nothing here reads a counter out of a running
//! binary or drives instrumentation. It exists so tests can confirm the
//! encoder assigned a genuinely unique, reconstructible number to every
//! path, the same property `EPPEncode.cpp`'s own `decodePath` is used to
//! check in the original implementation.

use crate::auxgraph::AuxGraph;
use crate::edge::EdgeId;
use crate::weight::PathWeight;

/// Reconstructs the edge sequence of path number `path_id` by walking
/// the weighted auxiliary graph from its entry to its fake exit.
///
/// At each block, edge weights along its outgoing [`AuxGraph::succs`]
/// are non-decreasing (`Encoder::assign_weights` assigns them as a
/// running sum in that order), so the edge to take is the last one
/// whose weight does not exceed the remaining value. Panics if
/// `path_id` is not in `[0, total_paths)` for this graph, or if called
/// before the graph has been weighted — both are caller errors, not
/// data the decoder can recover from (spec §7).
pub fn decode_path(graph: &AuxGraph, path_id: PathWeight) -> Vec<EdgeId> {
    let fake_exit = graph
        .fake_exit()
        .expect("decode_path called before AuxGraph::init");
    let mut current = graph
        .entry()
        .expect("decode_path called before AuxGraph::init");
    let mut remaining = path_id;
    let mut path = Vec::new();

    while current != fake_exit {
        let succs = graph.succs(current);
        assert!(
            !succs.is_empty(),
            "decode_path: block {current} has no successors before reaching the fake exit"
        );

        let mut chosen = None;
        for &edge in succs {
            let weight = graph
                .edge_weight(edge)
                .expect("decode_path: graph has not been weighted");
            if weight <= remaining {
                chosen = Some((edge, weight));
            } else {
                break;
            }
        }
        let (edge, weight) = chosen
            .unwrap_or_else(|| panic!("decode_path: {path_id} is not a valid path number"));

        remaining = PathWeight::new(
            remaining
                .get()
                .checked_sub(weight.get())
                .expect("decode_path: remaining value underflowed, not a valid path number"),
        );
        path.push(edge);
        current = graph.edge_data(edge).tgt;
    }

    assert_eq!(
        remaining,
        PathWeight::ZERO,
        "decode_path: {path_id} left a nonzero remainder, not a valid path number"
    );
    path
}
