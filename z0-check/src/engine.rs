//! The function checker: ties the symbol table, expression builder, path
//! state and obligation rules together into the CFG traversal (spec §4.5,
//! §4.6, §4.7). Grounded on `examples/original_source/src/z0.cpp`'s
//! `analyze_z0_assert`/`check_div`/`binop_expr` dispatch and on
//! `seen_ir/src/generator.rs`'s per-function `GenerationContext` idiom.

use indexmap::IndexMap;
use log::{debug, warn};
use z3::ast::{Ast, Bool, BV};
use z3::Context;

use z0_common::{Counterexample, Z0Error, Z0Result};
use z0_ir::{BasicBlock, Function, Instruction, InstId, Terminator, Value, ValueKind, Width};

use crate::config::CheckConfig;
use crate::expr_builder::ExprBuilder;
use crate::loops;
use crate::path_state::{PathState, Verdict};
use crate::report::{Diagnostic, DiagnosticKind};
use crate::symbol_table::{SymbolTable, ValueKey};

pub struct FunctionChecker<'ctx> {
    ctx: &'ctx Context,
    builder: ExprBuilder<'ctx>,
    symbols: SymbolTable,
    debug_map: IndexMap<String, Value>,
    path: PathState<'ctx>,
    diagnostics: Vec<Diagnostic>,
    config: CheckConfig,
    function_name: String,
}

impl<'ctx> FunctionChecker<'ctx> {
    pub fn new(ctx: &'ctx Context, config: CheckConfig, function_name: impl Into<String>) -> Self {
        FunctionChecker {
            ctx,
            builder: ExprBuilder::new(ctx),
            symbols: SymbolTable::new(),
            debug_map: IndexMap::new(),
            path: PathState::new(ctx),
            diagnostics: Vec::new(),
            config,
            function_name: function_name.into(),
        }
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Runs the traversal from the function's entry block. Returns whether
    /// at least one path reached a return terminator while still feasible.
    pub fn run(&mut self, func: &Function) -> Z0Result<bool> {
        let entry = func
            .cfg
            .entry
            .clone()
            .ok_or_else(|| Z0Error::MalformedIr(format!("function {} has no entry block", func.name)))?;
        self.validate_loops(func)?;
        let mut stack = Vec::new();
        debug!("{}: analyzing from entry block {entry}", self.function_name);
        self.traverse_block(func, &entry, None, &mut stack)
    }

    /// Rejects functions with an unguarded back-edge: every loop header
    /// found by `loops::find_loop_headers` must carry a `loop_invariant`
    /// call in its body, or the function's analysis is refused outright
    /// (spec §9's option (a), chosen as the fallback when (b)'s
    /// precondition — an invariant is present — doesn't hold).
    fn validate_loops(&self, func: &Function) -> Z0Result<()> {
        for header in loops::find_loop_headers(&func.cfg) {
            let block = func
                .cfg
                .get(&header)
                .ok_or_else(|| Z0Error::MalformedIr(format!("loop header {header} vanished")))?;
            if find_invariant_call(block, &self.config).is_none() {
                return Err(Z0Error::UnsupportedLoop { header });
            }
        }
        Ok(())
    }

    fn translate(&mut self, value: &Value) -> Z0Result<BV<'ctx>> {
        self.builder.translate(value, &mut self.symbols)
    }

    /// Runs `body` inside a freshly pushed path-state scope, guaranteeing
    /// the matching pop happens whether `body` returns `Ok` or `Err` —
    /// the deferred-release primitive spec §9 calls for, applied at the
    /// checker level rather than the raw solver level since `body` here
    /// needs the rest of the checker's state, not just the solver.
    fn with_scope<T>(&mut self, tag: impl Into<String>, body: impl FnOnce(&mut Self) -> Z0Result<T>) -> Z0Result<T> {
        self.path.push(tag);
        let result = body(self);
        self.path.pop();
        result
    }

    fn traverse_block(&mut self, func: &Function, label: &str, from: Option<&str>, stack: &mut Vec<String>) -> Z0Result<bool> {
        if stack.iter().any(|on_stack| on_stack == label) {
            return self.cut_loop(func, label);
        }
        stack.push(label.to_string());
        let result = self.traverse_block_inner(func, label, from, stack);
        stack.pop();
        result
    }

    fn traverse_block_inner(&mut self, func: &Function, label: &str, from: Option<&str>, stack: &mut Vec<String>) -> Z0Result<bool> {
        let block = func
            .cfg
            .get(label)
            .ok_or_else(|| Z0Error::MalformedIr(format!("block {label} not found in {}", func.name)))?
            .clone();

        if let Some(from_label) = from {
            self.resolve_phis(&block, from_label)?;
        }

        for inst in &block.body {
            self.handle_instruction(inst)?;
        }

        match &block.terminator {
            Terminator::Return(_) => Ok(self.is_reachable()),
            Terminator::Jump(target) => self.with_scope(format!("jump:{label}->{target}"), |checker| {
                checker.traverse_block(func, &target.0, Some(label), stack)
            }),
            Terminator::Branch { cond, then_block, else_block } => {
                let cond_bv = self.translate(cond)?;
                let true_bv = self.builder.true_bv1();
                let false_bv = self.builder.false_bv1();

                let then_reaches = self.with_scope(format!("then:{then_block}"), |checker| {
                    checker.path.assert_eq(&cond_bv, &true_bv);
                    if checker.is_reachable() {
                        checker.traverse_block(func, &then_block.0, Some(label), stack)
                    } else {
                        Ok(false)
                    }
                })?;

                let else_reaches = self.with_scope(format!("else:{else_block}"), |checker| {
                    checker.path.assert_eq(&cond_bv, &false_bv);
                    if checker.is_reachable() {
                        checker.traverse_block(func, &else_block.0, Some(label), stack)
                    } else {
                        Ok(false)
                    }
                })?;

                Ok(then_reaches || else_reaches)
            }
            Terminator::Unreachable => Ok(true),
        }
    }

    fn resolve_phis(&mut self, block: &BasicBlock, from_label: &str) -> Z0Result<()> {
        for phi in &block.phis {
            let (_, incoming) = phi
                .incomings
                .iter()
                .find(|(pred, _)| pred.0 == from_label)
                .ok_or_else(|| Z0Error::MalformedIr(format!("phi {} has no incoming value from {from_label}", phi.id)))?;
            let incoming_bv = self.translate(incoming)?;
            let result_bv = self.translate(&Value::from_inst(phi.width, phi.id))?;
            self.path.assert_eq(&result_bv, &incoming_bv);
        }
        Ok(())
    }

    fn is_reachable(&mut self) -> bool {
        !matches!(self.path.check(), Verdict::Unsat)
    }

    fn handle_instruction(&mut self, inst: &Instruction) -> Z0Result<()> {
        match inst {
            Instruction::Binop { id, op, result_width, lhs, rhs } => {
                let a = self.translate(lhs)?;
                let b = self.translate(rhs)?;
                let result = self.builder.binop(*op, a, b)?;
                let me = self.translate(&Value::from_inst(*result_width, *id))?;
                self.path.assert_eq(&me, &result);
                Ok(())
            }
            Instruction::Cmp { id, pred, lhs, rhs } => {
                let a = self.translate(lhs)?;
                let b = self.translate(rhs)?;
                let result = self.builder.cmp(*pred, a, b)?;
                let me = self.translate(&Value::from_inst(Width::W1, *id))?;
                self.path.assert_eq(&me, &result);
                Ok(())
            }
            Instruction::Cast { id, kind, dst_width, value } => {
                let src_width = value.width;
                let v = self.translate(value)?;
                let result = self.builder.cast(*kind, src_width, *dst_width, v)?;
                let me = self.translate(&Value::from_inst(*dst_width, *id))?;
                self.path.assert_eq(&me, &result);
                Ok(())
            }
            Instruction::Call { id, callee, args } => self.handle_call(*id, callee, args),
            Instruction::DebugValue { name, value } => {
                if self.config.is_recorded_debug_name(name) {
                    self.debug_map.insert(name.clone(), value.clone());
                }
                Ok(())
            }
            Instruction::DebugDeclare { .. } => Ok(()),
        }
    }

    fn handle_call(&mut self, id: Option<InstId>, callee: &str, args: &[Value]) -> Z0Result<()> {
        let cond_operand = || args.get(0).cloned().ok_or_else(|| Z0Error::MalformedIr(format!("{callee} called with no condition operand")));

        if callee == self.config.requires_marker {
            self.check_precondition(&cond_operand()?)
        } else if callee == self.config.ensures_marker || callee == self.config.assert_marker || callee == self.config.loop_invariant_marker {
            self.check_assertion(&cond_operand()?, callee)
        } else if callee == self.config.div_intrinsic {
            self.handle_div_or_mod(id, args, z0_ir::BinOp::SDiv)
        } else if callee == self.config.mod_intrinsic {
            self.handle_div_or_mod(id, args, z0_ir::BinOp::SRem)
        } else if callee == self.config.debug_value_callee || callee == self.config.debug_declare_callee {
            // Debug annotations normally arrive as the dedicated
            // `Instruction::DebugValue`/`DebugDeclare` variants, which carry
            // the source name as IR metadata rather than a `Value` operand.
            // A call-form debug intrinsic has no recoverable source name to
            // key the Debug-Name Map on, so there's nothing to record.
            Ok(())
        } else {
            Err(Z0Error::UnknownCall(callee.to_string()))
        }
    }

    fn handle_div_or_mod(&mut self, id: Option<InstId>, args: &[Value], op: z0_ir::BinOp) -> Z0Result<()> {
        let id = id.ok_or_else(|| Z0Error::MalformedIr("division/modulo intrinsic with no result id".to_string()))?;
        let a_val = args.get(0).cloned().ok_or_else(|| Z0Error::MalformedIr("division intrinsic missing dividend".to_string()))?;
        let b_val = args.get(1).cloned().ok_or_else(|| Z0Error::MalformedIr("division intrinsic missing divisor".to_string()))?;
        let a = self.translate(&a_val)?;
        let b = self.translate(&b_val)?;
        self.check_division_safety(&a, &b)?;
        let result = self.builder.binop(op, a, b)?;
        let me = self.translate(&Value::from_inst(Width::W32, id))?;
        self.path.assert_eq(&me, &result);
        Ok(())
    }

    fn check_precondition(&mut self, cond: &Value) -> Z0Result<()> {
        let c = self.translate(cond)?;
        let true_bv = self.builder.true_bv1();
        self.path.assert_eq(&c, &true_bv);
        match self.path.check() {
            Verdict::Unsat => Err(Z0Error::PreconditionUnsatisfiable {
                function: self.function_name.clone(),
            }),
            Verdict::Sat | Verdict::Unknown => Ok(()),
        }
    }

    fn check_assertion(&mut self, cond: &Value, obligation: &str) -> Z0Result<()> {
        let c = self.translate(cond)?;
        let true_bv = self.builder.true_bv1();
        let ne = c._eq(&true_bv).not();

        let (verdict, counterexample) = self.with_scope("assert", |checker| {
            checker.path.assert(&ne);
            let verdict = checker.path.check();
            let counterexample = if verdict == Verdict::Sat {
                Some(checker.render_counterexample()?)
            } else {
                None
            };
            Ok((verdict, counterexample))
        })?;

        match verdict {
            Verdict::Sat => Err(Z0Error::AssertionViolated {
                function: self.function_name.clone(),
                counterexample: counterexample.expect("sat verdict always renders a counterexample"),
            }),
            Verdict::Unsat => {
                self.path.assert_eq(&c, &true_bv);
                Ok(())
            }
            Verdict::Unknown => {
                warn!("{}: solver returned unknown while checking {obligation}", self.function_name);
                self.diagnostics.push(Diagnostic {
                    function: self.function_name.clone(),
                    kind: DiagnosticKind::VerificationUnknown {
                        obligation: obligation.to_string(),
                    },
                });
                self.path.assert_eq(&c, &true_bv);
                Ok(())
            }
        }
    }

    fn check_division_safety(&mut self, a: &BV<'ctx>, b: &BV<'ctx>) -> Z0Result<()> {
        let zero = BV::from_i64(self.ctx, 0, 32);
        let int_min = BV::from_i64(self.ctx, i32::MIN as i64, 32);
        let minus_one = BV::from_i64(self.ctx, -1, 32);
        let divides_by_zero = b._eq(&zero);
        let overflows = Bool::and(self.ctx, &[&a._eq(&int_min), &b._eq(&minus_one)]);
        let unsafe_cond = Bool::or(self.ctx, &[&divides_by_zero, &overflows]);

        let (verdict, counterexample) = self.with_scope("div-safety", |checker| {
            checker.path.assert(&unsafe_cond);
            let verdict = checker.path.check();
            let counterexample = if verdict == Verdict::Sat {
                Some(checker.render_counterexample()?)
            } else {
                None
            };
            Ok((verdict, counterexample))
        })?;

        match verdict {
            Verdict::Sat => self.diagnostics.push(Diagnostic {
                function: self.function_name.clone(),
                kind: DiagnosticKind::DivisionUnsafe {
                    counterexample: counterexample.expect("sat verdict always renders a counterexample"),
                },
            }),
            Verdict::Unknown => {
                warn!("{}: solver returned unknown while checking division safety", self.function_name);
                self.diagnostics.push(Diagnostic {
                    function: self.function_name.clone(),
                    kind: DiagnosticKind::VerificationUnknown {
                        obligation: "division-safety".to_string(),
                    },
                });
            }
            Verdict::Unsat => {}
        }
        self.path.assert(&unsafe_cond.not());
        Ok(())
    }

    fn render_counterexample(&self) -> Z0Result<Counterexample> {
        let model = self
            .path
            .get_model()
            .ok_or_else(|| Z0Error::SolverInternal("sat result carried no model".to_string()))?;

        let mut out = Vec::new();
        for (name, value) in &self.debug_map {
            let display_name = self.config.display_name(name).to_string();
            let rendered = match &value.kind {
                ValueKind::ConstInt(v) => v.to_string(),
                ValueKind::Argument(index) => self.render_symbol_value(&ValueKey::Argument(*index), &model),
                ValueKind::Instr(id) => self.render_symbol_value(&ValueKey::Instr(*id), &model),
            };
            out.push((display_name, rendered));
        }
        Ok(out)
    }

    fn render_symbol_value(&self, key: &ValueKey, model: &z3::Model<'ctx>) -> String {
        let Some(symbol) = self.symbols.lookup(key) else {
            return "*".to_string();
        };
        for decl in model.iter() {
            if decl.name() != symbol.0 {
                continue;
            }
            let decl_const = decl.apply(&[]);
            if let Some(value) = model.get_const_interp(&decl_const) {
                if let Some(bv) = value.as_bv() {
                    if let Some(i) = bv.as_i64() {
                        return i.to_string();
                    }
                }
            }
        }
        format!("{symbol}?")
    }

    /// The loop-cutting summary (spec §4.5/§9 option (b)): havoc the
    /// header's phi results (the loop-carried values), then assume the
    /// invariant — already known to exist on the header by
    /// `validate_loops` — in its post-havoc form. The path beyond the cut
    /// is not explored further; like `Unreachable`, it contributes `true`
    /// to `reaches_return` since the loop's continued iteration is out of
    /// scope for this traversal.
    fn cut_loop(&mut self, func: &Function, header_label: &str) -> Z0Result<bool> {
        let block = func
            .cfg
            .get(header_label)
            .ok_or_else(|| Z0Error::MalformedIr(format!("loop header {header_label} vanished")))?
            .clone();

        for phi in &block.phis {
            self.symbols.forget(ValueKey::Instr(phi.id));
        }

        let invariant = find_invariant_call(&block, &self.config)
            .ok_or_else(|| Z0Error::UnsupportedLoop { header: header_label.to_string() })?;
        let cond = self.translate(&invariant)?;
        let true_bv = self.builder.true_bv1();
        self.path.assert_eq(&cond, &true_bv);
        Ok(true)
    }
}

fn find_invariant_call(block: &BasicBlock, config: &CheckConfig) -> Option<Value> {
    block.body.iter().find_map(|inst| match inst {
        Instruction::Call { callee, args, .. } if callee == &config.loop_invariant_marker => args.first().cloned(),
        _ => None,
    })
}
