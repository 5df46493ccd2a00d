//! Statement code generation.
//!
//! Statements leave nothing on the operand stack; their only effect is on
//! the variable globals.

use simple_types::{Expr, Stmt};
use wasm_encoder::{BlockType, Function, Instruction};

use crate::compiler::FuncContext;
use crate::error::CodegenResult;
use crate::expr::emit_expr;
use crate::gas;

/// Emit a single statement.
pub fn emit_stmt(stmt: &Stmt, ctx: &FuncContext, f: &mut Function) -> CodegenResult<()> {
    match stmt {
        Stmt::DoNothing => Ok(()),
        Stmt::Assign(name, value) => emit_assign(name, value, ctx, f),
        Stmt::If(cond, cons, alt) => emit_if(cond, cons, alt, ctx, f),
        Stmt::Sequence(..) => {
            let mut rest = stmt;
            while let Stmt::Sequence(first, second) = rest {
                emit_stmt(first, ctx, f)?;
                rest = &**second;
            }
            emit_stmt(rest, ctx, f)
        }
        Stmt::While(cond, body) => emit_while(cond, body, ctx, f),
    }
}

fn emit_assign(name: &str, value: &Expr, ctx: &FuncContext, f: &mut Function) -> CodegenResult<()> {
    emit_expr(value, ctx, f)?;
    f.instruction(&Instruction::GlobalSet(ctx.global_index(name)?));
    Ok(())
}

fn emit_if(
    cond: &Expr,
    cons: &Stmt,
    alt: &Stmt,
    ctx: &FuncContext,
    f: &mut Function,
) -> CodegenResult<()> {
    emit_expr(cond, ctx, f)?;
    f.instruction(&Instruction::If(BlockType::Empty));
    emit_stmt(cons, ctx, f)?;
    if !matches!(alt, Stmt::DoNothing) {
        f.instruction(&Instruction::Else);
        emit_stmt(alt, ctx, f)?;
    }
    f.instruction(&Instruction::End);
    Ok(())
}

// ══════════════════════════════════════════════════════════════════════════════
// While loop
// ══════════════════════════════════════════════════════════════════════════════

/// ```text
/// block
///   loop
///     br_if 1 (i32.eqz cond)
///     gas_tick
///     body
///     br 0
///   end
/// end
/// ```
fn emit_while(cond: &Expr, body: &Stmt, ctx: &FuncContext, f: &mut Function) -> CodegenResult<()> {
    f.instruction(&Instruction::Block(BlockType::Empty));
    f.instruction(&Instruction::Loop(BlockType::Empty));

    emit_expr(cond, ctx, f)?;
    f.instruction(&Instruction::I32Eqz);
    f.instruction(&Instruction::BrIf(1));

    gas::emit_gas_tick(f);
    emit_stmt(body, ctx, f)?;
    f.instruction(&Instruction::Br(0));

    f.instruction(&Instruction::End); // loop
    f.instruction(&Instruction::End); // block
    Ok(())
}
