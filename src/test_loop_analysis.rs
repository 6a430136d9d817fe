// SPDX-FileCopyrightText: 2024 Rot127 <unisono@quyllur.org>
// SPDX-License-Identifier: LGPL-3.0-only

#[cfg(test)]
mod tests {
    use crate::block::BlockId;
    use crate::graph::ControlFlowGraph;
    use crate::loop_analysis;

    #[test]
    fn test_straight_line_has_no_back_edges_or_loops() {
        let mut cfg = ControlFlowGraph::new();
        cfg.add_edge((1u64, "entry"), (2u64, "leaf"));
        let analysis = loop_analysis::analyze(&cfg);
        assert!(analysis.back_edges().is_empty());
        assert_eq!(analysis.loop_of(BlockId::new(1)), None);
        assert_eq!(analysis.loop_of(BlockId::new(2)), None);
    }

    #[test]
    fn test_simple_loop_detects_back_edge_and_body() {
        // entry -> header -> body -> header (back edge), header -> exit
        let mut cfg = ControlFlowGraph::new();
        cfg.add_edge((1u64, "entry"), (2u64, "header"));
        cfg.add_edge((2u64, "header"), (3u64, "body"));
        cfg.add_edge((3u64, "body"), (2u64, "header"));
        cfg.add_edge((2u64, "header"), (4u64, "exit"));

        let analysis = loop_analysis::analyze(&cfg);
        assert!(analysis
            .back_edges()
            .contains(&(BlockId::new(3), BlockId::new(2))));
        assert!(analysis.loop_of(BlockId::new(2)).is_some());
        assert!(analysis.loop_of(BlockId::new(3)).is_some());
        assert_eq!(analysis.loop_of(BlockId::new(2)), analysis.loop_of(BlockId::new(3)));
        assert_eq!(analysis.loop_of(BlockId::new(1)), None);
        assert_eq!(analysis.loop_of(BlockId::new(4)), None);
    }

    #[test]
    fn test_nested_loops_assign_innermost_membership() {
        // entry -> outer_header -> inner_header -> inner_body -> inner_header (back edge)
        // inner_header -> outer_header (back edge), outer_header -> exit
        let mut cfg = ControlFlowGraph::new();
        cfg.add_edge((1u64, "entry"), (2u64, "outer_header"));
        cfg.add_edge((2u64, "outer_header"), (3u64, "inner_header"));
        cfg.add_edge((3u64, "inner_header"), (4u64, "inner_body"));
        cfg.add_edge((4u64, "inner_body"), (3u64, "inner_header"));
        cfg.add_edge((3u64, "inner_header"), (2u64, "outer_header"));
        cfg.add_edge((2u64, "outer_header"), (5u64, "exit"));

        let analysis = loop_analysis::analyze(&cfg);
        assert_eq!(analysis.back_edges().len(), 2);

        let inner_header_loop = analysis.loop_of(BlockId::new(3)).unwrap();
        let inner_body_loop = analysis.loop_of(BlockId::new(4)).unwrap();
        let outer_header_loop = analysis.loop_of(BlockId::new(2)).unwrap();

        assert_eq!(inner_header_loop, inner_body_loop);
        assert_ne!(inner_header_loop, outer_header_loop);
        assert_eq!(analysis.loop_of(BlockId::new(1)), None);
        assert_eq!(analysis.loop_of(BlockId::new(5)), None);
    }
}
