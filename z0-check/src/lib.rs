//! The symbolic contract-checking engine: given a [`z0_ir::Module`], proves
//! (or refutes, with a counterexample) that every contract assertion and
//! implicit safety obligation holds on every feasible path of every
//! analysed function.

pub mod config;
pub mod driver;
pub mod engine;
pub mod expr_builder;
pub mod loops;
pub mod path_state;
pub mod report;
pub mod symbol_table;

pub use config::CheckConfig;
pub use driver::check_module;
pub use engine::FunctionChecker;
pub use report::{CheckReport, Diagnostic, DiagnosticKind, FunctionVerdict};
