//! Back-edge detection for the loop-cutting hook (spec §4.5/§9).
//!
//! The traverser is a DFS over the CFG with no visited-once marking (the
//! same block can be legitimately reached by more than one path condition),
//! so an unbroken cycle would recurse forever. This module finds, ahead of
//! time, which blocks are loop headers reached by a back-edge, so the
//! traverser can refuse to recurse into one and cut it instead.

use std::collections::HashSet;

use z0_ir::ControlFlowGraph;

/// Labels that are the target of at least one back-edge: an edge from a
/// block to one of its own DFS ancestors.
pub fn find_loop_headers(cfg: &ControlFlowGraph) -> HashSet<String> {
    let mut headers = HashSet::new();
    let Some(entry) = cfg.entry.clone() else {
        return headers;
    };
    let mut on_stack = HashSet::new();
    let mut visited = HashSet::new();
    walk(cfg, &entry, &mut on_stack, &mut visited, &mut headers);
    headers
}

fn walk(
    cfg: &ControlFlowGraph,
    label: &str,
    on_stack: &mut HashSet<String>,
    visited: &mut HashSet<String>,
    headers: &mut HashSet<String>,
) {
    on_stack.insert(label.to_string());
    visited.insert(label.to_string());

    if let Some(block) = cfg.get(label) {
        for succ in block.successors() {
            if on_stack.contains(&succ.0) {
                headers.insert(succ.0.clone());
            } else if !visited.contains(&succ.0) {
                walk(cfg, &succ.0, on_stack, visited, headers);
            }
        }
    }

    on_stack.remove(label);
}

#[cfg(test)]
mod tests {
    use super::*;
    use z0_ir::cfg_builder::{build_cfg, Step};
    use z0_ir::{Label, Terminator, Value, Width};

    #[test]
    fn straight_line_graph_has_no_loop_headers() {
        let cfg = build_cfg([
            Step::Label(Label::new("entry")),
            Step::Terminate(Terminator::Return(Some(Value::const_int(Width::W32, 0)))),
        ]);
        assert!(find_loop_headers(&cfg).is_empty());
    }

    #[test]
    fn a_block_that_branches_back_to_its_own_header_is_found() {
        let cfg = build_cfg([
            Step::Label(Label::new("header")),
            Step::Terminate(Terminator::Branch {
                cond: Value::argument(Width::W1, 0),
                then_block: Label::new("body"),
                else_block: Label::new("exit"),
            }),
            Step::Label(Label::new("body")),
            Step::Terminate(Terminator::Jump(Label::new("header"))),
            Step::Label(Label::new("exit")),
            Step::Terminate(Terminator::Return(None)),
        ]);

        let headers = find_loop_headers(&cfg);
        assert!(headers.contains("header"));
        assert_eq!(headers.len(), 1);
    }
}
