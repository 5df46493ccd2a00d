//! Expression code generation.
//!
//! Every expression leaves exactly one value on the WASM operand stack: an
//! `i64` for numbers, an `i32` for booleans.

use simple_types::Expr;
use wasm_encoder::{Function, Instruction};

use crate::compiler::FuncContext;
use crate::error::CodegenResult;

/// Emit instructions for an expression.
pub fn emit_expr(expr: &Expr, ctx: &FuncContext, f: &mut Function) -> CodegenResult<()> {
    match expr {
        Expr::Number(n) => {
            f.instruction(&Instruction::I64Const(*n));
        }
        Expr::Boolean(b) => {
            f.instruction(&Instruction::I32Const(i32::from(*b)));
        }
        Expr::Variable(name) => {
            f.instruction(&Instruction::GlobalGet(ctx.global_index(name)?));
        }
        Expr::Add(l, r) => emit_binary(l, r, Instruction::I64Add, ctx, f)?,
        Expr::Multiply(l, r) => emit_binary(l, r, Instruction::I64Mul, ctx, f)?,
        Expr::LessThan(l, r) => emit_binary(l, r, Instruction::I64LtS, ctx, f)?,
    }
    Ok(())
}

/// Left operand first, matching the engines' evaluation order.
fn emit_binary(
    left: &Expr,
    right: &Expr,
    op: Instruction<'static>,
    ctx: &FuncContext,
    f: &mut Function,
) -> CodegenResult<()> {
    emit_expr(left, ctx, f)?;
    emit_expr(right, ctx, f)?;
    f.instruction(&op);
    Ok(())
}
