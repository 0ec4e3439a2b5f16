//! Sample programs built with `z0_ir`'s builder API, collected into one
//! module and printed as JSON — the format `z0-cli check`/`z0-cli validate`
//! read. Each sample mirrors one of the worked examples: a contract that
//! verifies, one that doesn't, a guarded and an unguarded division, a
//! contradictory precondition, and an if/else where both arms verify
//! independently.
//!
//! Run with no arguments to print the whole module, or pass a sample name
//! (e.g. `cargo run --bin z0-demos -- violated_assertion`) to print just one
//! function wrapped in its own module.

use anyhow::{bail, Result};

use z0_ir::cfg_builder::{build_cfg, Step};
use z0_ir::{BinOp, Function, InstId, Instruction, Label, Module, Parameter, Pred, Terminator, Value, Width};

fn call(callee: &str, args: Vec<Value>) -> Instruction {
    Instruction::Call { id: None, callee: callee.to_string(), args }
}

fn cmp(id: u32, pred: Pred, lhs: Value, rhs: Value) -> Instruction {
    Instruction::Cmp { id: InstId(id), pred, lhs, rhs }
}

/// `int verified_by_precondition(int x) { requires(x > 0); assert(x + 1 > 1); return 0; }`
fn verified_by_precondition() -> Function {
    let x = Value::argument(Width::W32, 0);
    let mut func = Function::new("_c0_verified_by_precondition").with_parameter(Parameter::new("x", Width::W32));
    func.cfg = build_cfg([
        Step::Label(Label::new("entry")),
        Step::Body(cmp(0, Pred::Sgt, x.clone(), Value::const_int(Width::W32, 0))),
        Step::Body(call("requires", vec![Value::from_inst(Width::W1, InstId(0))])),
        Step::Body(Instruction::Binop {
            id: InstId(1),
            op: BinOp::Add,
            result_width: Width::W32,
            lhs: x,
            rhs: Value::const_int(Width::W32, 1),
        }),
        Step::Body(cmp(2, Pred::Sgt, Value::from_inst(Width::W32, InstId(1)), Value::const_int(Width::W32, 1))),
        Step::Body(call("assert", vec![Value::from_inst(Width::W1, InstId(2))])),
        Step::Terminate(Terminator::Return(Some(Value::const_int(Width::W32, 0)))),
    ]);
    func
}

/// `int violated_assertion(int x) { requires(x >= 0); assert(x > 0); return 0; }`
fn violated_assertion() -> Function {
    let x = Value::argument(Width::W32, 0);
    let mut func = Function::new("_c0_violated_assertion").with_parameter(Parameter::new("x", Width::W32));
    func.cfg = build_cfg([
        Step::Label(Label::new("entry")),
        Step::Body(Instruction::DebugValue { name: "_c0v_x".to_string(), value: x.clone() }),
        Step::Body(cmp(0, Pred::Sge, x.clone(), Value::const_int(Width::W32, 0))),
        Step::Body(call("requires", vec![Value::from_inst(Width::W1, InstId(0))])),
        Step::Body(cmp(1, Pred::Sgt, x, Value::const_int(Width::W32, 0))),
        Step::Body(call("assert", vec![Value::from_inst(Width::W1, InstId(1))])),
        Step::Terminate(Terminator::Return(Some(Value::const_int(Width::W32, 0)))),
    ]);
    func
}

/// `int guarded_division(int a, int b) { requires(b != 0); return a / b; }`
fn guarded_division() -> Function {
    let a = Value::argument(Width::W32, 0);
    let b = Value::argument(Width::W32, 1);
    let mut func = Function::new("_c0_guarded_division")
        .with_parameter(Parameter::new("a", Width::W32))
        .with_parameter(Parameter::new("b", Width::W32))
        .with_return_width(Width::W32);
    func.cfg = build_cfg([
        Step::Label(Label::new("entry")),
        Step::Body(cmp(0, Pred::Ne, b.clone(), Value::const_int(Width::W32, 0))),
        Step::Body(call("requires", vec![Value::from_inst(Width::W1, InstId(0))])),
        Step::Body(Instruction::Call { id: Some(InstId(1)), callee: "c0_idiv".to_string(), args: vec![a, b] }),
        Step::Terminate(Terminator::Return(Some(Value::from_inst(Width::W32, InstId(1))))),
    ]);
    func
}

/// `int unguarded_division(int a, int b) { return a / b; }`
fn unguarded_division() -> Function {
    let a = Value::argument(Width::W32, 0);
    let b = Value::argument(Width::W32, 1);
    let mut func = Function::new("_c0_unguarded_division")
        .with_parameter(Parameter::new("a", Width::W32))
        .with_parameter(Parameter::new("b", Width::W32))
        .with_return_width(Width::W32);
    func.cfg = build_cfg([
        Step::Label(Label::new("entry")),
        Step::Body(Instruction::DebugValue { name: "_c0v_a".to_string(), value: a.clone() }),
        Step::Body(Instruction::DebugValue { name: "_c0v_b".to_string(), value: b.clone() }),
        Step::Body(Instruction::Call { id: Some(InstId(0)), callee: "c0_idiv".to_string(), args: vec![a, b] }),
        Step::Terminate(Terminator::Return(Some(Value::from_inst(Width::W32, InstId(0))))),
    ]);
    func
}

/// `int contradictory_preconditions(int a) { requires(a == 1); requires(a == 2); return 0; }`
fn contradictory_preconditions() -> Function {
    let a = Value::argument(Width::W32, 0);
    let mut func = Function::new("_c0_contradictory_preconditions").with_parameter(Parameter::new("a", Width::W32));
    func.cfg = build_cfg([
        Step::Label(Label::new("entry")),
        Step::Body(cmp(0, Pred::Eq, a.clone(), Value::const_int(Width::W32, 1))),
        Step::Body(call("requires", vec![Value::from_inst(Width::W1, InstId(0))])),
        Step::Body(cmp(1, Pred::Eq, a, Value::const_int(Width::W32, 2))),
        Step::Body(call("requires", vec![Value::from_inst(Width::W1, InstId(1))])),
        Step::Terminate(Terminator::Return(Some(Value::const_int(Width::W32, 0)))),
    ]);
    func
}

/// `int independent_branches(int x) { if (x > 0) assert(x > 0); else assert(x <= 0); return 0; }`
fn independent_branches() -> Function {
    let x = Value::argument(Width::W32, 0);
    let mut func = Function::new("_c0_independent_branches").with_parameter(Parameter::new("x", Width::W32));
    func.cfg = build_cfg([
        Step::Label(Label::new("entry")),
        Step::Body(cmp(0, Pred::Sgt, x.clone(), Value::const_int(Width::W32, 0))),
        Step::Terminate(Terminator::Branch {
            cond: Value::from_inst(Width::W1, InstId(0)),
            then_block: Label::new("then"),
            else_block: Label::new("els"),
        }),
        Step::Label(Label::new("then")),
        Step::Body(cmp(1, Pred::Sgt, x.clone(), Value::const_int(Width::W32, 0))),
        Step::Body(call("assert", vec![Value::from_inst(Width::W1, InstId(1))])),
        Step::Terminate(Terminator::Jump(Label::new("join"))),
        Step::Label(Label::new("els")),
        Step::Body(cmp(2, Pred::Sle, x, Value::const_int(Width::W32, 0))),
        Step::Body(call("assert", vec![Value::from_inst(Width::W1, InstId(2))])),
        Step::Terminate(Terminator::Jump(Label::new("join"))),
        Step::Label(Label::new("join")),
        Step::Terminate(Terminator::Return(Some(Value::const_int(Width::W32, 0)))),
    ]);
    func
}

fn samples() -> Vec<(&'static str, fn() -> Function)> {
    vec![
        ("verified_by_precondition", verified_by_precondition),
        ("violated_assertion", violated_assertion),
        ("guarded_division", guarded_division),
        ("unguarded_division", unguarded_division),
        ("contradictory_preconditions", contradictory_preconditions),
        ("independent_branches", independent_branches),
    ]
}

fn main() -> Result<()> {
    let requested = std::env::args().nth(1);
    let mut module = Module::new("samples");

    match requested {
        None => {
            for (_, build) in samples() {
                module.add_function(build());
            }
        }
        Some(name) => match samples().into_iter().find(|(n, _)| *n == name) {
            Some((_, build)) => module.add_function(build()),
            None => {
                let known: Vec<_> = samples().into_iter().map(|(n, _)| n).collect();
                bail!("unknown sample {name:?}; known samples: {}", known.join(", "));
            }
        },
    }

    println!("{}", module.to_json()?);
    Ok(())
}
