//! End-to-end scenarios, one per function, mirroring the six literal
//! examples worked through by hand: each builds a `Function` via the
//! builder API (standing in for what a real front-end would emit) and
//! asserts on the `CheckReport` the engine produces.

use pretty_assertions::assert_eq;
use z0_check::{check_module, CheckConfig, DiagnosticKind, FunctionVerdict};
use z0_ir::cfg_builder::{build_cfg, Step};
use z0_ir::{BinOp, Function, InstId, Instruction, Label, Module, Parameter, Pred, Terminator, Value, Width};

fn module_of(func: Function) -> Module {
    let mut module = Module::new("t");
    module.add_function(func);
    module
}

fn call(callee: &str, args: Vec<Value>) -> Instruction {
    Instruction::Call {
        id: None,
        callee: callee.to_string(),
        args,
    }
}

fn cmp(id: u32, pred: Pred, lhs: Value, rhs: Value) -> Instruction {
    Instruction::Cmp { id: InstId(id), pred, lhs, rhs }
}

fn binop(id: u32, op: BinOp, lhs: Value, rhs: Value) -> Instruction {
    Instruction::Binop { id: InstId(id), op, result_width: Width::W32, lhs, rhs }
}

/// `int f(int x) { requires(x > 0); assert(x + 1 > 1); return 0; }` → `OK!`.
#[test]
fn requires_then_an_implied_assertion_verifies() {
    let x = Value::argument(Width::W32, 0);
    let mut func = Function::new("_c0_scenario1").with_parameter(Parameter::new("x", Width::W32));
    func.cfg = build_cfg([
        Step::Label(Label::new("entry")),
        Step::Body(cmp(0, Pred::Sgt, x.clone(), Value::const_int(Width::W32, 0))),
        Step::Body(call("requires", vec![Value::from_inst(Width::W1, InstId(0))])),
        Step::Body(binop(1, BinOp::Add, x.clone(), Value::const_int(Width::W32, 1))),
        Step::Body(cmp(2, Pred::Sgt, Value::from_inst(Width::W32, InstId(1)), Value::const_int(Width::W32, 1))),
        Step::Body(call("assert", vec![Value::from_inst(Width::W1, InstId(2))])),
        Step::Terminate(Terminator::Return(Some(Value::const_int(Width::W32, 0)))),
    ]);

    let module = module_of(func);
    let reports = check_module(&module, &CheckConfig::default());
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].verdict, FunctionVerdict::Ok);
    assert!(reports[0].diagnostics.is_empty());
}

/// `int f(int x) { requires(x >= 0); assert(x > 0); return 0; }` →
/// `AssertionViolated`, counterexample `x = 0`.
#[test]
fn an_assertion_not_implied_by_its_precondition_is_falsified() {
    let x = Value::argument(Width::W32, 0);
    let mut func = Function::new("_c0_scenario2").with_parameter(Parameter::new("x", Width::W32));
    func.cfg = build_cfg([
        Step::Label(Label::new("entry")),
        Step::Body(Instruction::DebugValue { name: "_c0v_x".to_string(), value: x.clone() }),
        Step::Body(cmp(0, Pred::Sge, x.clone(), Value::const_int(Width::W32, 0))),
        Step::Body(call("requires", vec![Value::from_inst(Width::W1, InstId(0))])),
        Step::Body(cmp(1, Pred::Sgt, x.clone(), Value::const_int(Width::W32, 0))),
        Step::Body(call("assert", vec![Value::from_inst(Width::W1, InstId(1))])),
        Step::Terminate(Terminator::Return(Some(Value::const_int(Width::W32, 0)))),
    ]);

    let module = module_of(func);
    let reports = check_module(&module, &CheckConfig::default());
    match &reports[0].verdict {
        FunctionVerdict::AssertionViolated { counterexample } => {
            assert_eq!(counterexample, &vec![("x".to_string(), "0".to_string())]);
        }
        other => panic!("expected AssertionViolated, got {other:?}"),
    }
}

/// `int f(int a, int b) { requires(b != 0); return a / b; }` → `OK!`, no
/// division warning.
#[test]
fn a_guarded_division_raises_no_warning() {
    let a = Value::argument(Width::W32, 0);
    let b = Value::argument(Width::W32, 1);
    let mut func = Function::new("_c0_scenario3")
        .with_parameter(Parameter::new("a", Width::W32))
        .with_parameter(Parameter::new("b", Width::W32))
        .with_return_width(Width::W32);
    func.cfg = build_cfg([
        Step::Label(Label::new("entry")),
        Step::Body(cmp(0, Pred::Ne, b.clone(), Value::const_int(Width::W32, 0))),
        Step::Body(call("requires", vec![Value::from_inst(Width::W1, InstId(0))])),
        Step::Body(Instruction::Call {
            id: Some(InstId(1)),
            callee: "c0_idiv".to_string(),
            args: vec![a, b],
        }),
        Step::Terminate(Terminator::Return(Some(Value::from_inst(Width::W32, InstId(1))))),
    ]);

    let module = module_of(func);
    let reports = check_module(&module, &CheckConfig::default());
    assert_eq!(reports[0].verdict, FunctionVerdict::Ok);
    assert!(reports[0].diagnostics.is_empty());
}

/// `int f(int a, int b) { return a / b; }` → division-safety warning.
#[test]
fn an_unguarded_division_raises_a_warning_but_does_not_abort() {
    let a = Value::argument(Width::W32, 0);
    let b = Value::argument(Width::W32, 1);
    let mut func = Function::new("_c0_scenario4")
        .with_parameter(Parameter::new("a", Width::W32))
        .with_parameter(Parameter::new("b", Width::W32))
        .with_return_width(Width::W32);
    func.cfg = build_cfg([
        Step::Label(Label::new("entry")),
        Step::Body(Instruction::Call {
            id: Some(InstId(0)),
            callee: "c0_idiv".to_string(),
            args: vec![a, b],
        }),
        Step::Terminate(Terminator::Return(Some(Value::from_inst(Width::W32, InstId(0))))),
    ]);

    let module = module_of(func);
    let reports = check_module(&module, &CheckConfig::default());
    assert_eq!(reports[0].verdict, FunctionVerdict::Ok);
    assert_eq!(reports[0].diagnostics.len(), 1);
    assert!(matches!(reports[0].diagnostics[0].kind, DiagnosticKind::DivisionUnsafe { .. }));
}

/// `int f(int a) { requires(a == 1); requires(a == 2); return 0; }` →
/// `PreconditionUnsatisfiable`.
#[test]
fn contradictory_preconditions_are_rejected() {
    let a = Value::argument(Width::W32, 0);
    let mut func = Function::new("_c0_scenario5").with_parameter(Parameter::new("a", Width::W32));
    func.cfg = build_cfg([
        Step::Label(Label::new("entry")),
        Step::Body(cmp(0, Pred::Eq, a.clone(), Value::const_int(Width::W32, 1))),
        Step::Body(call("requires", vec![Value::from_inst(Width::W1, InstId(0))])),
        Step::Body(cmp(1, Pred::Eq, a.clone(), Value::const_int(Width::W32, 2))),
        Step::Body(call("requires", vec![Value::from_inst(Width::W1, InstId(1))])),
        Step::Terminate(Terminator::Return(Some(Value::const_int(Width::W32, 0)))),
    ]);

    let module = module_of(func);
    let reports = check_module(&module, &CheckConfig::default());
    assert_eq!(reports[0].verdict, FunctionVerdict::PreconditionUnsatisfiable);
}

/// `int f(int x) { if (x > 0) assert(x > 0); else assert(x <= 0); return 0; }`
/// → `OK!` (both branches verify independently).
#[test]
fn both_sides_of_a_branch_verify_independently() {
    let x = Value::argument(Width::W32, 0);
    let mut func = Function::new("_c0_scenario6").with_parameter(Parameter::new("x", Width::W32));
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
        Step::Body(cmp(2, Pred::Sle, x.clone(), Value::const_int(Width::W32, 0))),
        Step::Body(call("assert", vec![Value::from_inst(Width::W1, InstId(2))])),
        Step::Terminate(Terminator::Jump(Label::new("join"))),
        Step::Label(Label::new("join")),
        Step::Terminate(Terminator::Return(Some(Value::const_int(Width::W32, 0)))),
    ]);

    let module = module_of(func);
    let reports = check_module(&module, &CheckConfig::default());
    assert_eq!(reports[0].verdict, FunctionVerdict::Ok);
}

/// A function whose back-edge has no `loop_invariant` is rejected outright
/// rather than silently unsound (spec §9, resolved in DESIGN.md).
#[test]
fn an_unguarded_loop_is_rejected() {
    let mut func = Function::new("_c0_loopy");
    func.cfg = build_cfg([
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

    let module = module_of(func);
    let reports = check_module(&module, &CheckConfig::default());
    assert!(matches!(&reports[0].verdict, FunctionVerdict::Unsupported { reason } if reason.contains("back-edge")));
}
