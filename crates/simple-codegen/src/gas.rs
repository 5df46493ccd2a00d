//! Gas-metering instrumentation.
//!
//! A `gas_tick` is injected at the head of every `while` iteration, after
//! the condition has been found true. When the counter exceeds the limit the
//! module traps.

use wasm_encoder::{BlockType, Function, Instruction};

use crate::types::{GLOBAL_GAS, GLOBAL_GAS_LIMIT};

/// Emit instructions that increment the gas counter and trap if exhausted.
///
/// Equivalent pseudo-code:
/// ```text
/// gas += 1
/// if gas > gas_limit { unreachable }
/// ```
pub fn emit_gas_tick(f: &mut Function) {
    // gas += 1
    f.instruction(&Instruction::GlobalGet(GLOBAL_GAS));
    f.instruction(&Instruction::I64Const(1));
    f.instruction(&Instruction::I64Add);
    f.instruction(&Instruction::GlobalSet(GLOBAL_GAS));

    // if gas > gas_limit → trap
    f.instruction(&Instruction::GlobalGet(GLOBAL_GAS));
    f.instruction(&Instruction::GlobalGet(GLOBAL_GAS_LIMIT));
    f.instruction(&Instruction::I64GtU);
    f.instruction(&Instruction::If(BlockType::Empty));
    f.instruction(&Instruction::Unreachable);
    f.instruction(&Instruction::End);
}
