//! Main WASM module assembler.
//!
//! Orchestrates the code generation pipeline:
//! 1. Infer a static type for every variable
//! 2. Lay out one global per variable, seeded from the initial bindings
//! 3. Emit the `run` function
//! 4. Assemble all WASM sections into a valid module
//! 5. Validate with `wasmparser`

use std::collections::BTreeMap;

use simple_types::{Expr, Stmt, Type, Value};
use wasm_encoder::{
    CodeSection, ConstExpr, ExportKind, ExportSection, Function, FunctionSection,
    GlobalSection, GlobalType, Instruction, Module, TypeSection, ValType,
};

use crate::error::{CodegenError, CodegenResult};
use crate::types::*;

/// Default iteration budget for compiled loops.
pub const DEFAULT_GAS_LIMIT: u64 = 1_000_000;

// ══════════════════════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════════════════════

/// Code generation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Total `while` iterations allowed per instance before `run` traps.
    pub gas_limit: u64,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            gas_limit: DEFAULT_GAS_LIMIT,
        }
    }
}

impl CompileOptions {
    pub fn with_gas_limit(gas_limit: u64) -> Self {
        Self { gas_limit }
    }
}

/// A validated WASM module plus what a host needs to read it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledProgram {
    wasm: Vec<u8>,
    variables: BTreeMap<String, Type>,
    result: Option<Type>,
}

impl CompiledProgram {
    /// The raw module bytes.
    pub fn wasm(&self) -> &[u8] {
        &self.wasm
    }

    pub fn into_wasm(self) -> Vec<u8> {
        self.wasm
    }

    /// Every variable global and its type, in name order.
    pub fn variables(&self) -> &BTreeMap<String, Type> {
        &self.variables
    }

    /// What `run` returns: `None` for statements.
    pub fn result_type(&self) -> Option<Type> {
        self.result
    }

    /// The export name of the global holding `variable`.
    pub fn export_name(variable: &str) -> String {
        format!("{VARIABLE_EXPORT_PREFIX}{variable}")
    }
}

/// Compile a statement. `run` executes it against the variable globals.
#[tracing::instrument(level = "debug", skip_all, fields(stmt = %stmt))]
pub fn compile_stmt<'a>(
    stmt: &Stmt,
    bindings: impl IntoIterator<Item = (&'a str, Value)>,
    options: &CompileOptions,
) -> CodegenResult<CompiledProgram> {
    let initial: BTreeMap<&str, Value> = bindings.into_iter().collect();
    let mut types = TypeEnv::from_bindings(initial.iter().map(|(k, v)| (*k, *v)));
    infer_stmt(stmt, &mut types)?;

    let compiler = Compiler::new(&initial, types.into_variables(), options);
    compiler.compile(None, |ctx, f| crate::stmt::emit_stmt(stmt, ctx, f))
}

/// Compile an expression. `run` returns its value.
#[tracing::instrument(level = "debug", skip_all, fields(expr = %expr))]
pub fn compile_expr<'a>(
    expr: &Expr,
    bindings: impl IntoIterator<Item = (&'a str, Value)>,
    options: &CompileOptions,
) -> CodegenResult<CompiledProgram> {
    let initial: BTreeMap<&str, Value> = bindings.into_iter().collect();
    let types = TypeEnv::from_bindings(initial.iter().map(|(k, v)| (*k, *v)));
    let result = infer_expr(expr, &types)?;

    let compiler = Compiler::new(&initial, types.into_variables(), options);
    compiler.compile(Some(result), |ctx, f| crate::expr::emit_expr(expr, ctx, f))
}

// ══════════════════════════════════════════════════════════════════════════════
// Function context
// ══════════════════════════════════════════════════════════════════════════════

/// What emitters need to know while writing the body of `run`.
#[derive(Debug, Clone, Default)]
pub struct FuncContext {
    /// Variable name → absolute global index.
    globals: BTreeMap<String, u32>,
}

impl FuncContext {
    fn new(variables: &BTreeMap<String, Type>) -> Self {
        let globals = variables
            .keys()
            .zip(VARIABLE_GLOBAL_BASE..)
            .map(|(name, index)| (name.clone(), index))
            .collect();
        Self { globals }
    }

    /// The global holding `name`.
    pub fn global_index(&self, name: &str) -> CodegenResult<u32> {
        self.globals
            .get(name)
            .copied()
            .ok_or_else(|| CodegenError::UnresolvedSymbol(name.to_string()))
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Compiler
// ══════════════════════════════════════════════════════════════════════════════

struct Compiler<'a> {
    initial: &'a BTreeMap<&'a str, Value>,
    variables: BTreeMap<String, Type>,
    options: &'a CompileOptions,
}

impl<'a> Compiler<'a> {
    fn new(
        initial: &'a BTreeMap<&'a str, Value>,
        variables: BTreeMap<String, Type>,
        options: &'a CompileOptions,
    ) -> Self {
        Self {
            initial,
            variables,
            options,
        }
    }

    /// Assemble the module around a `run` body written by `emit_body`.
    fn compile<F>(self, result: Option<Type>, emit_body: F) -> CodegenResult<CompiledProgram>
    where
        F: FnOnce(&FuncContext, &mut Function) -> CodegenResult<()>,
    {
        let ctx = FuncContext::new(&self.variables);
        let mut module = Module::new();

        // 1. Type section
        module.section(&self.emit_types());

        // 2. Function section + Code section (built together)
        let (func_section, code_section) = self.emit_functions(result, &ctx, emit_body)?;
        module.section(&func_section);

        // 3. Global section
        module.section(&self.emit_globals());

        // 4. Export section
        module.section(&self.emit_exports());

        // 5. Code section (must come after function/global/export)
        module.section(&code_section);

        let wasm = module.finish();

        // 6. Validate
        wasmparser::validate(&wasm).map_err(|e| CodegenError::ValidationFailed(format!("{e}")))?;

        tracing::debug!(
            bytes = wasm.len(),
            variables = self.variables.len(),
            "module emitted"
        );

        Ok(CompiledProgram {
            wasm,
            variables: self.variables,
            result,
        })
    }

    // ── Type section ─────────────────────────────────────────────────────

    fn emit_types(&self) -> TypeSection {
        let mut types = TypeSection::new();

        // TYPE_VOID_VOID: () -> ()
        types.ty().function(vec![], vec![]);
        // TYPE_VOID_I64: () -> i64
        types.ty().function(vec![], vec![ValType::I64]);
        // TYPE_VOID_I32: () -> i32
        types.ty().function(vec![], vec![ValType::I32]);

        types
    }

    // ── Function + Code sections ─────────────────────────────────────────

    fn emit_functions<F>(
        &self,
        result: Option<Type>,
        ctx: &FuncContext,
        emit_body: F,
    ) -> CodegenResult<(FunctionSection, CodeSection)>
    where
        F: FnOnce(&FuncContext, &mut Function) -> CodegenResult<()>,
    {
        let mut func_section = FunctionSection::new();
        let mut code_section = CodeSection::new();

        // FUNC_RUN
        func_section.function(run_type_index(result));
        let mut run = Function::new(vec![]);
        emit_body(ctx, &mut run)?;
        run.instruction(&Instruction::End);
        code_section.function(&run);

        Ok((func_section, code_section))
    }

    // ── Global section ───────────────────────────────────────────────────

    fn emit_globals(&self) -> GlobalSection {
        let mut globals = GlobalSection::new();

        // GLOBAL_GAS
        globals.global(
            GlobalType {
                val_type: ValType::I64,
                mutable: true,
                shared: false,
            },
            &ConstExpr::i64_const(0),
        );

        // GLOBAL_GAS_LIMIT; the bit pattern is compared unsigned.
        globals.global(
            GlobalType {
                val_type: ValType::I64,
                mutable: false,
                shared: false,
            },
            &ConstExpr::i64_const(self.options.gas_limit as i64),
        );

        // Variables, from VARIABLE_GLOBAL_BASE in name order.
        for (name, ty) in &self.variables {
            let init = match self.initial.get(name.as_str()) {
                Some(Value::Number(n)) => ConstExpr::i64_const(*n),
                Some(Value::Boolean(b)) => ConstExpr::i32_const(i32::from(*b)),
                None => match ty {
                    Type::Number => ConstExpr::i64_const(0),
                    Type::Boolean => ConstExpr::i32_const(0),
                },
            };
            globals.global(
                GlobalType {
                    val_type: val_type(*ty),
                    mutable: true,
                    shared: false,
                },
                &init,
            );
        }

        globals
    }

    // ── Export section ───────────────────────────────────────────────────

    fn emit_exports(&self) -> ExportSection {
        let mut exports = ExportSection::new();
        exports.export(RUN_EXPORT, ExportKind::Func, FUNC_RUN);
        exports.export(GAS_EXPORT, ExportKind::Global, GLOBAL_GAS);
        for (name, index) in self.variables.keys().zip(VARIABLE_GLOBAL_BASE..) {
            exports.export(&CompiledProgram::export_name(name), ExportKind::Global, index);
        }
        exports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wasmparser::{ExternalKind, Parser as WasmParser, Payload};

    /// Extract exports from WASM bytes.
    fn get_exports(wasm: &[u8]) -> Vec<(String, ExternalKind)> {
        let mut exports = Vec::new();
        for payload in WasmParser::new(0).parse_all(wasm) {
            if let Ok(Payload::ExportSection(reader)) = payload {
                for export in reader {
                    let exp = export.expect("valid export");
                    exports.push((exp.name.to_string(), exp.kind));
                }
            }
        }
        exports
    }

    #[test]
    fn test_exports_run_gas_and_variables() {
        let stmt = Stmt::assign("y", Expr::add(Expr::variable("x"), 1.into()));
        let program =
            compile_stmt(&stmt, [("x", Value::Number(1))], &CompileOptions::default()).unwrap();
        assert_eq!(
            get_exports(program.wasm()),
            vec![
                ("run".to_string(), ExternalKind::Func),
                ("gas".to_string(), ExternalKind::Global),
                ("var.x".to_string(), ExternalKind::Global),
                ("var.y".to_string(), ExternalKind::Global),
            ]
        );
        assert_eq!(program.result_type(), None);
        assert_eq!(program.variables().get("y"), Some(&Type::Number));
    }

    #[test]
    fn test_expression_result_type() {
        let program = compile_expr(
            &Expr::less_than(1.into(), 2.into()),
            std::iter::empty::<(&str, Value)>(),
            &CompileOptions::default(),
        )
        .unwrap();
        assert_eq!(program.result_type(), Some(Type::Boolean));
        assert!(program.variables().is_empty());
    }

    #[test]
    fn test_deterministic_output() {
        let stmt = Stmt::while_loop(
            Expr::less_than(Expr::variable("x"), 5.into()),
            Stmt::assign("x", Expr::multiply(Expr::variable("x"), 3.into())),
        );
        let bindings = [("x", Value::Number(1))];
        let a = compile_stmt(&stmt, bindings, &CompileOptions::default()).unwrap();
        let b = compile_stmt(&stmt, bindings, &CompileOptions::default()).unwrap();
        assert_eq!(a.wasm(), b.wasm());
    }

    #[test]
    fn test_inference_errors_stop_compilation() {
        let err = compile_stmt(
            &Stmt::assign("x", Expr::variable("nope")),
            std::iter::empty::<(&str, Value)>(),
            &CompileOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err, CodegenError::UnresolvedSymbol("nope".into()));
    }
}
