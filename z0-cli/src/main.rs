//! Command-line driver for the z0 contract checker.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use z0_check::{CheckConfig, DiagnosticKind};
use z0_ir::Module;

/// z0: a symbolic contract checker for a safe C subset
#[derive(Parser)]
#[command(name = "z0")]
#[command(about = "Symbolic contract checker for a safe C subset", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prove (or refute) every contract and safety obligation in a module
    Check {
        /// Path to a JSON-encoded IR module
        module: PathBuf,
        /// Override the analysis-marker function-name prefix (default "_c0_")
        #[arg(long)]
        prefix: Option<String>,
        /// Forward a timeout, in milliseconds, to the solver for each query
        #[arg(long)]
        solver_timeout_ms: Option<u32>,
        /// Raise the log level (-v for debug, -vv for trace)
        #[arg(short, long, action = clap::ArgAction::Count)]
        verbose: u8,
        /// Stop at the first function that fails to verify
        #[arg(long)]
        fail_fast: bool,
    },
    /// Parse a module and check its CFG invariants, without running the solver
    Validate {
        /// Path to a JSON-encoded IR module
        module: PathBuf,
    },
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { module, prefix, solver_timeout_ms, verbose, fail_fast } => {
            if verbose > 0 {
                log::set_max_level(if verbose == 1 { log::LevelFilter::Debug } else { log::LevelFilter::Trace });
            }
            let mut config = CheckConfig::default();
            if let Some(prefix) = prefix {
                config.function_prefix = prefix;
            }
            config.solver_timeout_ms = solver_timeout_ms;
            run_check(&module, &config, fail_fast)
        }
        Commands::Validate { module } => run_validate(&module),
    }
}

fn load_module(path: &PathBuf) -> Result<Module> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading module {}", path.display()))?;
    Module::from_json(&text).with_context(|| format!("parsing module {}", path.display()))
}

fn run_check(path: &PathBuf, config: &CheckConfig, fail_fast: bool) -> Result<ExitCode> {
    let module = load_module(path)?;
    let reports = z0_check::check_module(&module, config);

    if reports.is_empty() {
        log::warn!("no function in {} starts with prefix {:?}", path.display(), config.function_prefix);
    }

    let mut saw_failure = false;
    for report in &reports {
        println!("Analyzing function {}...", report.function);
        match &report.verdict {
            z0_check::FunctionVerdict::Ok => println!("OK!"),
            z0_check::FunctionVerdict::AssertionViolated { counterexample } => {
                println!("FAILED: assertion violated");
                println!("=== Counterexample: ===");
                render_counterexample(counterexample);
            }
            z0_check::FunctionVerdict::PreconditionUnsatisfiable => {
                println!("FAILED: precondition is unsatisfiable");
            }
            z0_check::FunctionVerdict::Unsupported { reason } => {
                println!("SKIPPED: {reason}");
            }
        }
        for diagnostic in &report.diagnostics {
            log::warn!("{diagnostic}");
            if let DiagnosticKind::DivisionUnsafe { counterexample } = &diagnostic.kind {
                println!("  warning: division may be unsafe");
                render_counterexample(counterexample);
            }
        }

        if report.is_failure() {
            saw_failure = true;
            if fail_fast {
                break;
            }
        }
    }

    Ok(if saw_failure { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

fn render_counterexample(counterexample: &[(String, String)]) {
    for (name, value) in counterexample {
        println!("  {name} = {value}");
    }
}

fn run_validate(path: &PathBuf) -> Result<ExitCode> {
    let module = load_module(path)?;
    let mut all_valid = true;
    for function in &module.functions {
        match function.validate() {
            Ok(()) => println!("{}: structurally valid", function.name),
            Err(reason) => {
                println!("{}: invalid: {reason}", function.name);
                all_valid = false;
            }
        }
    }
    Ok(if all_valid { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
