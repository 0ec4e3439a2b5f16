//! The closed instruction sum type and the control-flow graph built from it.
//!
//! This follows the redesign note in the specification: rather than
//! dispatching on an open opcode enum via RTTI (as the LLVM-based original
//! does), every instruction shape the checker needs to understand is a
//! variant of one closed enum.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::{InstId, Value, Width};

/// A basic block label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label(pub String);

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Label(name.into())
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    And,
    Or,
    Xor,
    Shl,
    AShr,
    SDiv,
    SRem,
    /// Rejected at translation time: the source language has no unsigned
    /// arithmetic, so these only exist to be reported as unsupported.
    UDiv,
    URem,
    LShr,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinOp::Add => "add",
            BinOp::Sub => "sub",
            BinOp::Mul => "mul",
            BinOp::And => "and",
            BinOp::Or => "or",
            BinOp::Xor => "xor",
            BinOp::Shl => "shl",
            BinOp::AShr => "ashr",
            BinOp::SDiv => "sdiv",
            BinOp::SRem => "srem",
            BinOp::UDiv => "udiv",
            BinOp::URem => "urem",
            BinOp::LShr => "lshr",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pred {
    Eq,
    Ne,
    Sgt,
    Sge,
    Slt,
    Sle,
    /// Rejected: no unsigned comparisons in the source language.
    Ugt,
    Uge,
    Ult,
    Ule,
}

impl fmt::Display for Pred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Pred::Eq => "eq",
            Pred::Ne => "ne",
            Pred::Sgt => "sgt",
            Pred::Sge => "sge",
            Pred::Slt => "slt",
            Pred::Sle => "sle",
            Pred::Ugt => "ugt",
            Pred::Uge => "uge",
            Pred::Ult => "ult",
            Pred::Ule => "ule",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CastKind {
    ZeroExtend,
    SignExtend,
    Truncate,
}

/// A non-terminator, non-phi instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    Binop {
        id: InstId,
        op: BinOp,
        result_width: Width,
        lhs: Value,
        rhs: Value,
    },
    Cmp {
        id: InstId,
        pred: Pred,
        lhs: Value,
        rhs: Value,
    },
    Cast {
        id: InstId,
        kind: CastKind,
        dst_width: Width,
        value: Value,
    },
    /// A call to a named function. `id` is `Some` only for calls that
    /// produce a result the rest of the function can reference (the
    /// `c0_idiv`/`c0_imod` runtime intrinsics); contract-marker calls are
    /// void.
    Call {
        id: Option<InstId>,
        callee: String,
        args: Vec<Value>,
    },
    /// Records that `value` is now the realisation of source variable
    /// `name`, the analogue of an `llvm.dbg.value` intrinsic call. Not a
    /// generic `Call` because its variable-name operand is compile-time
    /// metadata, not a bit-vector value.
    DebugValue { name: String, value: Value },
    /// The analogue of `llvm.dbg.declare`; carried through the IR but
    /// ignored by the checker.
    DebugDeclare { name: String },
}

impl Instruction {
    /// The `InstId` this instruction binds, if any.
    pub fn result_id(&self) -> Option<InstId> {
        match self {
            Instruction::Binop { id, .. } | Instruction::Cmp { id, .. } | Instruction::Cast { id, .. } => {
                Some(*id)
            }
            Instruction::Call { id, .. } => *id,
            Instruction::DebugValue { .. } | Instruction::DebugDeclare { .. } => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Binop { id, op, lhs, rhs, .. } => write!(f, "{id} = {op} {lhs}, {rhs}"),
            Instruction::Cmp { id, pred, lhs, rhs } => write!(f, "{id} = icmp.{pred} {lhs}, {rhs}"),
            Instruction::Cast { id, kind, dst_width, value } => {
                write!(f, "{id} = {kind:?} {value} to {dst_width}")
            }
            Instruction::Call { id, callee, args } => {
                if let Some(id) = id {
                    write!(f, "{id} = ")?;
                }
                write!(f, "call {callee}(")?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{a}")?;
                }
                write!(f, ")")
            }
            Instruction::DebugValue { name, value } => write!(f, "dbg.value {name} = {value}"),
            Instruction::DebugDeclare { name } => write!(f, "dbg.declare {name}"),
        }
    }
}

/// A phi node, resolved on block entry rather than dispatched alongside
/// ordinary instructions (see the CFG traverser).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhiNode {
    pub id: InstId,
    pub width: Width,
    pub incomings: Vec<(Label, Value)>,
}

/// A basic block terminator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Terminator {
    Return(Option<Value>),
    Jump(Label),
    Branch {
        cond: Value,
        then_block: Label,
        else_block: Label,
    },
    /// The producing compiler has already proven this point dead; the
    /// checker trusts that and does not re-derive it.
    Unreachable,
}

impl Terminator {
    pub fn successors(&self) -> Vec<&Label> {
        match self {
            Terminator::Jump(l) => vec![l],
            Terminator::Branch { then_block, else_block, .. } => vec![then_block, else_block],
            Terminator::Return(_) | Terminator::Unreachable => vec![],
        }
    }
}

/// A basic block: phis first, then body instructions, then exactly one
/// terminator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicBlock {
    pub label: Label,
    pub phis: Vec<PhiNode>,
    pub body: Vec<Instruction>,
    pub terminator: Terminator,
}

impl BasicBlock {
    pub fn new(label: Label, terminator: Terminator) -> Self {
        BasicBlock {
            label,
            phis: Vec::new(),
            body: Vec::new(),
            terminator,
        }
    }

    pub fn successors(&self) -> Vec<&Label> {
        self.terminator.successors()
    }
}

impl fmt::Display for BasicBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.label)?;
        for phi in &self.phis {
            writeln!(f, "  {} = phi {:?}", phi.id, phi.incomings)?;
        }
        for inst in &self.body {
            writeln!(f, "  {inst}")?;
        }
        writeln!(f, "  {:?}", self.terminator)
    }
}

/// The control-flow graph of a single function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlFlowGraph {
    pub blocks: HashMap<String, BasicBlock>,
    pub entry: Option<String>,
}

impl ControlFlowGraph {
    pub fn new() -> Self {
        ControlFlowGraph {
            blocks: HashMap::new(),
            entry: None,
        }
    }

    pub fn add_block(&mut self, block: BasicBlock) {
        let name = block.label.0.clone();
        if self.entry.is_none() {
            self.entry = Some(name.clone());
        }
        self.blocks.insert(name, block);
    }

    pub fn get(&self, label: &str) -> Option<&BasicBlock> {
        self.blocks.get(label)
    }

    pub fn entry_block(&self) -> Option<&BasicBlock> {
        self.entry.as_deref().and_then(|e| self.blocks.get(e))
    }

    /// Structural validation: every jump target exists and the entry block
    /// (if any) exists.
    pub fn validate(&self) -> Result<(), String> {
        for block in self.blocks.values() {
            for succ in block.successors() {
                if !self.blocks.contains_key(&succ.0) {
                    return Err(format!(
                        "block {} jumps to non-existent block {}",
                        block.label, succ
                    ));
                }
            }
            for phi in &block.phis {
                for (pred, _) in &phi.incomings {
                    if !self.blocks.contains_key(&pred.0) {
                        return Err(format!(
                            "phi {} in block {} names non-existent predecessor {}",
                            phi.id, block.label, pred
                        ));
                    }
                }
            }
        }
        if let Some(entry) = &self.entry {
            if !self.blocks.contains_key(entry) {
                return Err(format!("entry block {entry} does not exist"));
            }
        }
        Ok(())
    }
}

impl Default for ControlFlowGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_reports_its_jump_successors() {
        let block = BasicBlock::new(Label::new("entry"), Terminator::Jump(Label::new("exit")));
        assert_eq!(block.successors(), vec![&Label::new("exit")]);
    }

    #[test]
    fn cfg_validate_rejects_dangling_jump() {
        let mut cfg = ControlFlowGraph::new();
        cfg.add_block(BasicBlock::new(
            Label::new("entry"),
            Terminator::Jump(Label::new("nowhere")),
        ));
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn cfg_validate_accepts_well_formed_graph() {
        let mut cfg = ControlFlowGraph::new();
        cfg.add_block(BasicBlock::new(Label::new("entry"), Terminator::Jump(Label::new("exit"))));
        cfg.add_block(BasicBlock::new(Label::new("exit"), Terminator::Return(None)));
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.entry, Some("entry".to_string()));
    }
}
