//! Error taxonomy for the z0 contract checker.
//!
//! These are analyser-internal kinds, not user-language errors: the source
//! program is assumed to have already passed the producing compiler's own
//! checks. A variant here means the analyser either found a genuine contract
//! violation, or ran into an IR construct outside the supported subset.

use thiserror::Error;

/// A rendered counterexample: `(source_name, displayed_value)` pairs in the
/// order the Debug-Name Map was populated.
pub type Counterexample = Vec<(String, String)>;

/// The main error type for the z0 contract checker.
#[derive(Debug, Clone, Error)]
pub enum Z0Error {
    #[error("assertion violated in {function}")]
    AssertionViolated {
        function: String,
        counterexample: Counterexample,
    },

    #[error("precondition unsatisfiable in {function}")]
    PreconditionUnsatisfiable { function: String },

    #[error("division by zero or overflow possible in {function}")]
    DivisionUnsafe {
        function: String,
        counterexample: Counterexample,
    },

    #[error("solver returned unknown while checking {obligation} in {function}")]
    VerificationUnknown { function: String, obligation: String },

    #[error("unsupported bit-width: {0} (only 1 and 32 are legal)")]
    UnsupportedWidth(u32),

    #[error("unsupported cast")]
    UnsupportedCast,

    #[error("unsigned arithmetic is not supported: {0}")]
    UnsignedArithmeticUnsupported(&'static str),

    #[error("unknown function called: {0}")]
    UnknownCall(String),

    #[error("unknown block terminator encountered")]
    UnknownTerminator,

    #[error("loop header {header} has a back-edge but no loop_invariant")]
    UnsupportedLoop { header: String },

    #[error("solver raised an internal error: {0}")]
    SolverInternal(String),

    #[error("malformed IR: {0}")]
    MalformedIr(String),
}

/// Result type alias for z0 operations.
pub type Z0Result<T> = std::result::Result<T, Z0Error>;
