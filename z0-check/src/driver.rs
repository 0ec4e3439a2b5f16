//! Iterates a module's analysis-marked functions and produces one
//! [`CheckReport`] per function (spec §2 "Control flow", §5).

use log::{debug, error};
use z3::{Config, Context};

use z0_ir::{Function, Module};

use crate::config::CheckConfig;
use crate::engine::FunctionChecker;
use crate::report::{CheckReport, FunctionVerdict};

/// Checks every function in `module` whose name starts with
/// `config.function_prefix`, in module order (spec §5: "functions are
/// analysed in the order the IR module lists them").
pub fn check_module(module: &Module, config: &CheckConfig) -> Vec<CheckReport> {
    module
        .functions_with_prefix(&config.function_prefix)
        .map(|func| check_function(func, config))
        .collect()
}

/// Checks a single function in a fresh solver context — Z3 contexts are
/// cheap enough to create per function that there's no need to pool them,
/// and a fresh context gives each function's symbol table and path state a
/// clean slate (spec §3 lifecycle: "reset at the start of each function").
pub fn check_function(func: &Function, config: &CheckConfig) -> CheckReport {
    let mut z3_config = Config::new();
    if let Some(timeout_ms) = config.solver_timeout_ms {
        z3_config.set_timeout_msec(timeout_ms.into());
    }
    let ctx = Context::new(&z3_config);

    let mut checker = FunctionChecker::new(&ctx, config.clone(), func.name.clone());
    debug!("analyzing function {}", func.name);

    let verdict = match checker.run(func) {
        Ok(_reaches_return) => FunctionVerdict::Ok,
        Err(err) => {
            let verdict = verdict_for_error(&func.name, err);
            if let FunctionVerdict::Unsupported { reason } = &verdict {
                error!("{}: aborted: {reason}", func.name);
            }
            verdict
        }
    };

    CheckReport {
        function: func.name.clone(),
        verdict,
        diagnostics: checker.into_diagnostics(),
    }
}

fn verdict_for_error(function: &str, err: z0_common::Z0Error) -> FunctionVerdict {
    use z0_common::Z0Error;
    match err {
        Z0Error::AssertionViolated { counterexample, .. } => FunctionVerdict::AssertionViolated { counterexample },
        Z0Error::PreconditionUnsatisfiable { .. } => FunctionVerdict::PreconditionUnsatisfiable,
        other => {
            error!("{function}: {other}");
            FunctionVerdict::Unsupported { reason: other.to_string() }
        }
    }
}
