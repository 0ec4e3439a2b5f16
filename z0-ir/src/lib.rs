//! The compiled-IR data model consumed by the z0 contract checker.
//!
//! This crate has no knowledge of SMT solving; it only models the shape of
//! the input the checker walks: values, instructions, basic blocks,
//! functions, and modules, plus a small builder for assembling them from a
//! linear instruction stream.

pub mod cfg_builder;
pub mod function;
pub mod instruction;
pub mod module;
pub mod value;

pub use function::{Function, Parameter};
pub use instruction::{BasicBlock, BinOp, CastKind, ControlFlowGraph, Instruction, Label, PhiNode, Pred, Terminator};
pub use module::Module;
pub use value::{InstId, Value, ValueKind, Width};
