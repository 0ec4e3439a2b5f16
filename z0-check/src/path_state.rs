//! The solver session plus its push/pop scope stack (spec §4.3).

use z3::ast::{Ast, Bool, BV};
use z3::{Context, Model, SatResult, Solver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Sat,
    Unsat,
    Unknown,
}

/// A solver instance holding the conjunction of constraints along the
/// current path, plus a stack of named scopes. Scopes are strictly nested:
/// every `push` must be matched by exactly one `pop` before the function's
/// analysis is done, regardless of whether the branch they guard finished
/// normally or aborted with a diagnostic error.
pub struct PathState<'ctx> {
    solver: Solver<'ctx>,
    tags: Vec<String>,
}

impl<'ctx> PathState<'ctx> {
    pub fn new(ctx: &'ctx Context) -> Self {
        PathState {
            solver: Solver::new(ctx),
            tags: Vec::new(),
        }
    }

    pub fn push(&mut self, tag: impl Into<String>) {
        self.solver.push();
        self.tags.push(tag.into());
    }

    pub fn pop(&mut self) {
        self.solver.pop(1);
        self.tags.pop();
    }

    pub fn assert(&mut self, expr: &Bool<'ctx>) {
        self.solver.assert(expr);
    }

    pub fn assert_eq(&mut self, a: &BV<'ctx>, b: &BV<'ctx>) {
        self.solver.assert(&a._eq(b));
    }

    pub fn check(&mut self) -> Verdict {
        match self.solver.check() {
            SatResult::Sat => Verdict::Sat,
            SatResult::Unsat => Verdict::Unsat,
            SatResult::Unknown => Verdict::Unknown,
        }
    }

    pub fn get_model(&self) -> Option<Model<'ctx>> {
        self.solver.get_model()
    }

    pub fn depth(&self) -> usize {
        self.tags.len()
    }
}
