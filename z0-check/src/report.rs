//! The per-function outcome record the driver and CLI consume.

use std::fmt;

use z0_common::Counterexample;

#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    DivisionUnsafe { counterexample: Counterexample },
    VerificationUnknown { obligation: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub function: String,
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::DivisionUnsafe { counterexample } => {
                write!(f, "{}: division may be unsafe", self.function)?;
                for (name, value) in counterexample {
                    write!(f, ", {name} = {value}")?;
                }
                Ok(())
            }
            DiagnosticKind::VerificationUnknown { obligation } => {
                write!(f, "{}: solver returned unknown while checking {obligation}", self.function)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FunctionVerdict {
    Ok,
    AssertionViolated { counterexample: Counterexample },
    PreconditionUnsatisfiable,
    Unsupported { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    pub function: String,
    pub verdict: FunctionVerdict,
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckReport {
    /// A report counts as failed when the CLI should report a non-zero exit
    /// code: a falsifiable assertion or an unsatisfiable precondition.
    /// `Unsupported` is reported but does not, on its own, fail the run —
    /// it means the checker declined to analyse the function, not that it
    /// found a bug.
    pub fn is_failure(&self) -> bool {
        matches!(
            self.verdict,
            FunctionVerdict::AssertionViolated { .. } | FunctionVerdict::PreconditionUnsatisfiable
        )
    }
}
