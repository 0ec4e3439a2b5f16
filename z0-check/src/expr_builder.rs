//! Pure translation from IR values and operators to bit-vector expressions
//! (spec §4.1). Nothing here touches the solver session's assertion stack;
//! it only builds terms.

use z3::ast::{Ast, Bool, BV};
use z3::Context;
use z0_common::{Z0Error, Z0Result};
use z0_ir::{BinOp, CastKind, Pred, Value, ValueKind, Width};

use crate::symbol_table::{SymbolTable, ValueKey};

pub struct ExprBuilder<'ctx> {
    ctx: &'ctx Context,
}

impl<'ctx> ExprBuilder<'ctx> {
    pub fn new(ctx: &'ctx Context) -> Self {
        ExprBuilder { ctx }
    }

    /// Translate a value reference to a bit-vector term of its own width.
    /// Constants become literals; arguments and instruction results become
    /// named constants keyed by their symbol-table entry (created on first
    /// use).
    pub fn translate(&self, value: &Value, symbols: &mut SymbolTable) -> Z0Result<BV<'ctx>> {
        let bits = value.width.bits();
        match &value.kind {
            ValueKind::ConstInt(v) => Ok(BV::from_i64(self.ctx, *v, bits)),
            ValueKind::Argument(index) => {
                let symbol = symbols.symbol_for(ValueKey::Argument(*index));
                Ok(BV::new_const(self.ctx, symbol.0.as_str(), bits))
            }
            ValueKind::Instr(id) => {
                let symbol = symbols.symbol_for(ValueKey::Instr(*id));
                Ok(BV::new_const(self.ctx, symbol.0.as_str(), bits))
            }
        }
    }

    pub fn true_bv1(&self) -> BV<'ctx> {
        BV::from_i64(self.ctx, 1, 1)
    }

    pub fn false_bv1(&self) -> BV<'ctx> {
        BV::from_i64(self.ctx, 0, 1)
    }

    pub fn binop(&self, op: BinOp, a: BV<'ctx>, b: BV<'ctx>) -> Z0Result<BV<'ctx>> {
        match op {
            BinOp::Add => Ok(a.bvadd(&b)),
            BinOp::Sub => Ok(a.bvsub(&b)),
            BinOp::Mul => Ok(a.bvmul(&b)),
            BinOp::And => Ok(a.bvand(&b)),
            BinOp::Or => Ok(a.bvor(&b)),
            BinOp::Xor => Ok(a.bvxor(&b)),
            BinOp::Shl => Ok(a.bvshl(&b)),
            BinOp::AShr => Ok(a.bvashr(&b)),
            BinOp::SDiv => Ok(a.bvsdiv(&b)),
            BinOp::SRem => Ok(a.bvsrem(&b)),
            BinOp::UDiv => Err(Z0Error::UnsignedArithmeticUnsupported("udiv")),
            BinOp::URem => Err(Z0Error::UnsignedArithmeticUnsupported("urem")),
            BinOp::LShr => Err(Z0Error::UnsignedArithmeticUnsupported("lshr")),
        }
    }

    /// Comparisons produce a `Bool` internally but the IR (and the rest of
    /// the checker) treats comparison results as 1-bit bit-vectors, matching
    /// the source compiler's convention (0 = false, 1 = true).
    pub fn cmp(&self, pred: Pred, a: BV<'ctx>, b: BV<'ctx>) -> Z0Result<BV<'ctx>> {
        let cond: Bool<'ctx> = match pred {
            Pred::Eq => a._eq(&b),
            Pred::Ne => a._eq(&b).not(),
            Pred::Sgt => a.bvsgt(&b),
            Pred::Sge => a.bvsge(&b),
            Pred::Slt => a.bvslt(&b),
            Pred::Sle => a.bvsle(&b),
            Pred::Ugt | Pred::Uge | Pred::Ult | Pred::Ule => {
                return Err(Z0Error::UnsignedArithmeticUnsupported("unsigned comparison"))
            }
        };
        Ok(cond.ite(&self.true_bv1(), &self.false_bv1()))
    }

    pub fn cast(&self, kind: CastKind, src_width: Width, dst_width: Width, value: BV<'ctx>) -> Z0Result<BV<'ctx>> {
        let src = src_width.bits();
        let dst = dst_width.bits();
        match kind {
            CastKind::ZeroExtend => {
                if dst <= src {
                    return Err(Z0Error::UnsupportedCast);
                }
                Ok(value.zero_ext(dst - src))
            }
            CastKind::SignExtend => {
                if dst <= src {
                    return Err(Z0Error::UnsupportedCast);
                }
                Ok(value.sign_ext(dst - src))
            }
            CastKind::Truncate => {
                if dst >= src {
                    return Err(Z0Error::UnsupportedCast);
                }
                Ok(value.extract(dst - 1, 0))
            }
        }
    }
}
