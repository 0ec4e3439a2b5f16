//! Build a control-flow graph from a linear, label-delimited instruction
//! stream.
//!
//! Mirrors the teacher's `build_cfg_from_instructions`: a `Label` starts a
//! new block, and a terminator-shaped step ends the current one. The closed
//! `Terminator` type here already rules out the "two jumps in a row" case
//! the teacher had to special-case (there's no `Instruction` variant that
//! can impersonate a terminator), so the only seam this builder has to
//! handle is a body instruction arriving after a terminator was already set
//! for the current block without an intervening label — which it resolves
//! the same way, by starting an implicit fresh block.

use crate::instruction::{BasicBlock, ControlFlowGraph, Label, Terminator};

/// One step of a linear instruction stream handed to [`build_cfg`].
pub enum Step {
    Label(Label),
    Body(crate::instruction::Instruction),
    Phi(crate::instruction::PhiNode),
    Terminate(Terminator),
}

/// Assemble a [`ControlFlowGraph`] from a linear stream of [`Step`]s.
///
/// Panics only on construction bugs that indicate the caller built a
/// malformed stream (a `Phi` after the block already has body
/// instructions); this is a builder used by tests and trusted callers, not
/// a validator of untrusted input — `ControlFlowGraph::validate` is the
/// entry point for that.
pub fn build_cfg(steps: impl IntoIterator<Item = Step>) -> ControlFlowGraph {
    let mut cfg = ControlFlowGraph::new();
    let mut current: Option<BasicBlock> = None;
    let mut anon_count = 0usize;

    let mut fresh_label = || {
        let l = Label::new(format!("block{anon_count}"));
        anon_count += 1;
        l
    };

    for step in steps {
        match step {
            Step::Label(label) => {
                if let Some(block) = current.take() {
                    cfg.add_block(block);
                }
                current = Some(BasicBlock::new(label, Terminator::Unreachable));
            }
            Step::Phi(phi) => {
                let block = current.get_or_insert_with(|| BasicBlock::new(fresh_label(), Terminator::Unreachable));
                assert!(block.body.is_empty(), "phi nodes must precede body instructions");
                block.phis.push(phi);
            }
            Step::Body(inst) => {
                let block = current.get_or_insert_with(|| BasicBlock::new(fresh_label(), Terminator::Unreachable));
                block.body.push(inst);
            }
            Step::Terminate(term) => {
                let mut block = current.take().unwrap_or_else(|| BasicBlock::new(fresh_label(), Terminator::Unreachable));
                block.terminator = term;
                cfg.add_block(block);
            }
        }
    }
    if let Some(block) = current {
        cfg.add_block(block);
    }
    cfg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::{BinOp, Instruction};
    use crate::value::{InstId, Value, Width};

    #[test]
    fn builds_a_straight_line_function() {
        let cfg = build_cfg([
            Step::Label(Label::new("entry")),
            Step::Body(Instruction::Binop {
                id: InstId(0),
                op: BinOp::Add,
                result_width: Width::W32,
                lhs: Value::argument(Width::W32, 0),
                rhs: Value::const_int(Width::W32, 1),
            }),
            Step::Terminate(Terminator::Return(Some(Value::from_inst(Width::W32, InstId(0))))),
        ]);

        assert_eq!(cfg.blocks.len(), 1);
        let entry = cfg.get("entry").unwrap();
        assert_eq!(entry.body.len(), 1);
        assert!(matches!(entry.terminator, Terminator::Return(_)));
        assert_eq!(cfg.entry, Some("entry".to_string()));
    }

    #[test]
    fn builds_a_diamond_with_two_blocks_joined_by_branch() {
        let cfg = build_cfg([
            Step::Label(Label::new("entry")),
            Step::Terminate(Terminator::Branch {
                cond: Value::argument(Width::W1, 0),
                then_block: Label::new("then"),
                else_block: Label::new("else"),
            }),
            Step::Label(Label::new("then")),
            Step::Terminate(Terminator::Return(Some(Value::const_int(Width::W32, 1)))),
            Step::Label(Label::new("else")),
            Step::Terminate(Terminator::Return(Some(Value::const_int(Width::W32, 0)))),
        ]);

        assert_eq!(cfg.blocks.len(), 3);
        assert!(cfg.validate().is_ok());
    }
}
