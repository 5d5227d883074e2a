use crate::backends::mips::registers::Register;
use crate::backends::mips::{CODEGEN_STAGE, FunctionFrame, MipsGenerator, kind_mismatch};
use crate::compiler_frontend::ast::ast_nodes::{AstNode, ValueType};
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::symbol_table::SymbolKind;
use crate::compiler_frontend::symbol_table::symbols::{MAX_PARAMETERS, WORD_SIZE};
use crate::{
    codegen_log, return_arity_error, return_compiler_error, return_rule_error,
    return_undeclared_error,
};

// Scratch space every caller reserves for the callee's incoming arguments
const ARGUMENT_HOME_AREA: i32 = MAX_PARAMETERS as i32 * WORD_SIZE;

impl<'a> MipsGenerator<'a> {
    /// A program without functions: its statements become the body of `main`
    pub(crate) fn emit_implicit_entry(&mut self, items: &[&AstNode]) -> Result<(), CompilerError> {
        let slots = items
            .iter()
            .fold(0u32, |total, item| total.saturating_add(item.storage_slots()));

        self.text.push('\n');
        self.emit_label("main");
        self.emit_prologue();

        self.scopes.enter_scope();
        self.reserve_locals(slots, "main")?;

        self.frame = Some(FunctionFrame {
            name: String::from("main"),
            return_type: ValueType::Int,
            is_entry: true,
        });

        for item in items {
            self.emit_statements(item)?;
        }

        self.emit_epilogue(true);
        self.log_scopes();
        self.scopes.exit_scope();
        self.frame = None;

        Ok(())
    }

    pub(crate) fn emit_function(
        &mut self,
        return_type: ValueType,
        name: &str,
        params: Option<&AstNode>,
        body: Option<&AstNode>,
    ) -> Result<(), CompilerError> {
        codegen_log!("Generating function ", Green name);

        let label = self.function_label(name);
        let is_entry = name == self.config.entry_point;

        self.text.push('\n');
        self.emit_label(&label);
        self.emit_prologue();

        self.scopes.enter_scope();

        // Incoming arguments are stored into the caller's home area right away,
        // so the argument registers are free for calls made by the body.
        if let Some(params) = params {
            for (position, param) in params.list_in_source_order().into_iter().enumerate() {
                let AstNode::Parameter {
                    param_type,
                    name: param_name,
                } = param
                else {
                    return_compiler_error!(format!(
                        "Parameter list of '{label}' contains something other than a parameter"
                    ));
                };

                let offset = self.scopes.declare_parameter(param_name, *param_type)?;
                self.emit_line(&format!("sw $a{position}, {offset}($fp)"));
            }
        }

        let slots = body.map_or(0, AstNode::storage_slots);
        self.reserve_locals(slots, name)?;

        self.inside_function = true;
        self.frame = Some(FunctionFrame {
            name: name.to_owned(),
            return_type,
            is_entry,
        });

        if let Some(body) = body {
            self.emit_statements(body)?;
        }

        // Falling off the end returns too
        self.emit_epilogue(is_entry);

        self.log_scopes();
        self.scopes.exit_scope();
        self.inside_function = false;
        self.frame = None;

        Ok(())
    }

    // Scope stack as it stands at the end of a function body
    fn log_scopes(&self) {
        #[cfg(feature = "show_symbols")]
        {
            let scopes = self.scopes.display_scopes();
            saying::say!(scopes);
        }
    }

    fn reserve_locals(&mut self, slots: u32, function_name: &str) -> Result<(), CompilerError> {
        if slots == 0 {
            return Ok(());
        }

        let Some(bytes) = i32::try_from(slots)
            .ok()
            .and_then(|slots| slots.checked_mul(WORD_SIZE))
        else {
            return_rule_error!(
                format!("The locals of '{function_name}' are too large for one stack frame"),
                {
                    VariableName => function_name,
                    CompilationStage => CODEGEN_STAGE,
                }
            );
        };

        self.emit_line(&format!("addi $sp, $sp, -{bytes}"));
        Ok(())
    }

    /// Saves the return address and caller's frame pointer, then starts the new frame
    pub(crate) fn emit_prologue(&mut self) {
        self.emit_line("addi $sp, $sp, -8");
        self.emit_line("sw $ra, 4($sp)");
        self.emit_line("sw $fp, 0($sp)");
        self.emit_line("move $fp, $sp");
    }

    /// Tears the frame down. The entry point exits the program instead of returning.
    pub(crate) fn emit_epilogue(&mut self, is_entry: bool) {
        self.emit_line("move $sp, $fp");
        self.emit_line("lw $fp, 0($sp)");
        self.emit_line("lw $ra, 4($sp)");
        self.emit_line("addi $sp, $sp, 8");

        if is_entry {
            self.emit_line("li $v0, 10");
            self.emit_line("syscall");
        } else {
            self.emit_line("jr $ra");
        }
    }

    /// Emits a call and returns the temporary holding its result
    pub(crate) fn emit_call(
        &mut self,
        name: &str,
        args: Option<&AstNode>,
    ) -> Result<Register, CompilerError> {
        let Some(symbol) = self.scopes.resolve(name) else {
            return_undeclared_error!(
                format!("Function '{name}' is called but never declared"),
                {
                    VariableName => name,
                    CompilationStage => CODEGEN_STAGE,
                }
            );
        };

        let SymbolKind::Function { param_types, .. } = &symbol.kind else {
            return Err(kind_mismatch(name, &symbol.kind, "a function"));
        };
        let expected = param_types.len();

        let args = args.map_or_else(Vec::new, AstNode::list_in_source_order);

        if args.len() > MAX_PARAMETERS {
            return_arity_error!(
                format!(
                    "Call to '{name}' passes {} arguments, only {MAX_PARAMETERS} fit in argument registers",
                    args.len()
                ),
                {
                    VariableName => name,
                    ExpectedCount => MAX_PARAMETERS,
                    FoundCount => args.len(),
                }
            );
        }

        if args.len() != expected {
            return_rule_error!(
                format!(
                    "Function '{name}' takes {expected} arguments but is called with {}",
                    args.len()
                ),
                {
                    VariableName => name,
                    CompilationStage => CODEGEN_STAGE,
                    ExpectedCount => expected,
                    FoundCount => args.len(),
                }
            );
        }

        // Every argument is computed before any of them is moved into place,
        // a nested call would overwrite the argument registers otherwise.
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.emit_expression(arg)?);
        }

        for (position, value) in values.iter().enumerate() {
            self.emit_line(&format!("move $a{position}, {value}"));
        }

        // The entry point of a program without functions never calls anything,
        // only declared functions have a return address worth keeping.
        if self.inside_function {
            self.emit_line("addi $sp, $sp, -4");
            self.emit_line("sw $ra, 0($sp)");
        }

        // Temporaries are caller-saved but nothing saves them: a value still live in `$tN`
        // across this `jal` is clobbered when the callee uses the same register.
        // `print(a + f())` loses `a`, routing the call result through a local avoids it.
        let label = self.function_label(name);
        self.emit_line(&format!("addi $sp, $sp, -{ARGUMENT_HOME_AREA}"));
        self.emit_line(&format!("jal {label}"));
        self.emit_line(&format!("addi $sp, $sp, {ARGUMENT_HOME_AREA}"));

        if self.inside_function {
            self.emit_line("lw $ra, 0($sp)");
            self.emit_line("addi $sp, $sp, 4");
        }

        let result = self.registers.next();
        self.emit_line(&format!("move {result}, $v0"));
        Ok(result)
    }
}
