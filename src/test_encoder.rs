// SPDX-FileCopyrightText: 2024 Rot127 <unisono@quyllur.org>
// SPDX-License-Identifier: LGPL-3.0-only

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::block::BlockId;
    use crate::encoder::{EncodeState, Encoder, EncoderConfig};
    use crate::graph::ControlFlowGraph;
    use crate::weight::PathWeight;

    fn no_loops() -> (HashSet<(BlockId, BlockId)>, impl Fn(BlockId) -> Option<u32>) {
        (HashSet::new(), |_: BlockId| None)
    }

    #[test]
    fn test_straight_line_has_one_path_and_no_nonzero_weights() {
        let mut cfg = ControlFlowGraph::new();
        cfg.add_edge((1u64, "entry"), (2u64, "middle"));
        cfg.add_edge((2u64, "middle"), (3u64, "leaf"));

        let (back_edges, loop_of) = no_loops();
        let mut encoder = Encoder::new(EncoderConfig::default());
        let result = encoder.encode(&cfg, &back_edges, &loop_of);

        assert_eq!(result.state, EncodeState::Encoded);
        assert_eq!(result.total_paths, PathWeight::ONE);
        assert!(result.edge_weights.is_empty());
    }

    #[test]
    fn test_diamond_has_two_paths_and_one_nonzero_edge() {
        let mut cfg = ControlFlowGraph::new();
        cfg.add_edge((1u64, "entry"), (2u64, "left"));
        cfg.add_edge((1u64, "entry"), (3u64, "right"));
        cfg.add_edge((2u64, "left"), (4u64, "join"));
        cfg.add_edge((3u64, "right"), (4u64, "join"));

        let (back_edges, loop_of) = no_loops();
        let mut encoder = Encoder::new(EncoderConfig::default());
        let result = encoder.encode(&cfg, &back_edges, &loop_of);

        assert_eq!(result.state, EncodeState::Encoded);
        assert_eq!(result.total_paths, PathWeight::new(2));
        assert_eq!(result.edge_weights.len(), 1);
        assert_eq!(result.edge_weights[0].1, PathWeight::ONE);
    }

    #[test]
    fn test_simple_loop_is_segmented_and_encodes() {
        // entry -> header -> body -> header (back edge), header -> exit
        let mut cfg = ControlFlowGraph::new();
        cfg.add_edge((1u64, "entry"), (2u64, "header"));
        cfg.add_edge((2u64, "header"), (3u64, "body"));
        cfg.add_edge((3u64, "body"), (2u64, "header"));
        cfg.add_edge((2u64, "header"), (4u64, "exit"));

        let mut back_edges = HashSet::new();
        back_edges.insert((BlockId::new(3), BlockId::new(2)));
        let loop_of = |b: BlockId| {
            if b == BlockId::new(2) || b == BlockId::new(3) {
                Some(0)
            } else {
                None
            }
        };

        let mut encoder = Encoder::new(EncoderConfig::default());
        let result = encoder.encode(&cfg, &back_edges, &loop_of);

        assert_eq!(result.state, EncodeState::Encoded);
        // Two independently-numbered regions: the loop body (0 or 1 extra
        // iterations encoded per visit) and the path to exit.
        assert!(result.total_paths > PathWeight::ZERO);
        assert!(!encoder.graph().segment_map().is_empty());
    }

    #[test]
    fn test_long_diamond_chain_overflows_and_reports_sentinel() {
        // 64 chained diamonds double the path count at each stage, so the
        // running sum must exceed `i64::MAX` well before the last one.
        let mut cfg = ControlFlowGraph::new();
        let mut base = 0u64;
        for _ in 0..64 {
            let left = base + 1;
            let right = base + 2;
            let next = base + 3;
            cfg.add_edge((base, "stage"), (left, "left"));
            cfg.add_edge((base, "stage"), (right, "right"));
            cfg.add_edge((left, "left"), (next, "stage"));
            cfg.add_edge((right, "right"), (next, "stage"));
            base = next;
        }

        let (back_edges, loop_of) = no_loops();
        let mut encoder = Encoder::new(EncoderConfig::default());
        let result = encoder.encode(&cfg, &back_edges, &loop_of);

        assert_eq!(result.state, EncodeState::Overflowed);
        assert_eq!(result.total_paths, PathWeight::ZERO);
        assert!(result.edge_weights.is_empty());
    }

    #[test]
    fn test_unreachable_block_does_not_affect_path_count() {
        let mut cfg = ControlFlowGraph::new();
        cfg.add_edge((1u64, "entry"), (2u64, "leaf"));
        cfg.add_block(99u64, "island");

        let (back_edges, loop_of) = no_loops();
        let mut encoder = Encoder::new(EncoderConfig::default());
        let result = encoder.encode(&cfg, &back_edges, &loop_of);

        assert_eq!(result.total_paths, PathWeight::ONE);
    }
}
