use crate::backends::mips::registers::Register;
use crate::backends::mips::{CODEGEN_STAGE, MipsGenerator, kind_mismatch, statement_label};
use crate::compiler_frontend::ast::ast_nodes::{AstNode, ValueType};
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::compiler_warnings::{CompilerWarning, WarningKind};
use crate::compiler_frontend::symbol_table::{StorageBase, SymbolKind};
use crate::{return_compiler_error, return_rule_error, return_undeclared_error};

impl<'a> MipsGenerator<'a> {
    /// Emits a statement or a statement list.
    /// Every statement starts with all temporaries free.
    pub(crate) fn emit_statements(&mut self, node: &AstNode) -> Result<(), CompilerError> {
        for statement in node.list_in_source_order() {
            self.registers.reset();
            self.emit_statement(statement)?;
        }

        self.registers.reset();
        Ok(())
    }

    pub(crate) fn emit_statement(&mut self, statement: &AstNode) -> Result<(), CompilerError> {
        match statement {
            AstNode::Declaration { .. }
            | AstNode::ArrayDeclaration { .. }
            | AstNode::Array2dDeclaration { .. } => self.emit_declaration(statement),

            AstNode::Assign { target, value } => self.emit_assign(target, value),

            AstNode::ArrayAssign { name, index, value } => {
                let address = self.emit_element_address(name, index, None)?;
                let value = self.emit_expression(value)?;
                self.emit_line(&format!("sw {value}, 0({address})"));
                Ok(())
            }

            AstNode::Array2dAssign {
                name,
                row,
                col,
                value,
            } => {
                let address = self.emit_element_address(name, row, Some(col))?;
                let value = self.emit_expression(value)?;
                self.emit_line(&format!("sw {value}, 0({address})"));
                Ok(())
            }

            AstNode::Print { expr } => {
                let value = self.emit_expression(expr)?;
                self.emit_line(&format!("move $a0, {value}"));
                self.emit_line("li $v0, 1");
                self.emit_line("syscall");

                // Newline after every printed value
                self.emit_line("li $v0, 11");
                self.emit_line("li $a0, 10");
                self.emit_line("syscall");
                Ok(())
            }

            AstNode::Return { expr } => self.emit_return(expr.as_deref()),

            AstNode::Block { body } => {
                self.scopes.enter_block_scope();
                if let Some(body) = body {
                    self.emit_statements(body)?;
                }
                self.scopes.exit_scope();
                Ok(())
            }

            AstNode::StatementList { .. } => self.emit_statements(statement),

            AstNode::FunctionCall { name, args } => {
                self.emit_call(name, args.as_deref())?;
                Ok(())
            }

            // The value of a bare expression is computed and dropped
            AstNode::Number { .. }
            | AstNode::Variable { .. }
            | AstNode::BinaryOp { .. }
            | AstNode::ArrayAccess { .. }
            | AstNode::Array2dAccess { .. } => {
                self.emit_expression(statement)?;
                Ok(())
            }

            AstNode::FunctionDeclaration { name, .. } => {
                return_rule_error!(
                    format!("Function '{name}' can only be declared at the top level of the program"),
                    {
                        VariableName => name,
                        CompilationStage => CODEGEN_STAGE,
                    }
                )
            }

            AstNode::Parameter { .. }
            | AstNode::ParameterList { .. }
            | AstNode::ArgumentList { .. }
            | AstNode::FunctionList { .. } => {
                return_compiler_error!(format!(
                    "Found a {} where a statement should be",
                    statement_label(statement)
                ))
            }
        }
    }

    /// Reserves storage for a declaration in the current scope
    pub(crate) fn emit_declaration(&mut self, declaration: &AstNode) -> Result<(), CompilerError> {
        let comment = match declaration {
            AstNode::Declaration { name } => {
                let offset = self.scopes.declare(name, SymbolKind::Scalar)?;
                format!("Declared {name} at offset {offset}")
            }
            AstNode::ArrayDeclaration { name, size } => {
                let offset = self.scopes.declare(name, SymbolKind::Array { size: *size })?;
                format!("Declared array {name}[{size}] at offset {offset}")
            }
            AstNode::Array2dDeclaration { name, rows, cols } => {
                let offset = self.scopes.declare(
                    name,
                    SymbolKind::Array2d {
                        rows: *rows,
                        cols: *cols,
                    },
                )?;
                format!("Declared 2D array {name}[{rows}][{cols}] at offset {offset}")
            }
            other => {
                return_compiler_error!(format!(
                    "Expected a declaration, found a {}",
                    statement_label(other)
                ))
            }
        };

        self.emit_comment(&comment);
        Ok(())
    }

    fn emit_assign(&mut self, target: &str, value: &AstNode) -> Result<(), CompilerError> {
        let Some(symbol) = self.scopes.resolve(target) else {
            return_undeclared_error!(
                format!("Variable '{target}' is assigned before it is declared"),
                {
                    VariableName => target,
                    CompilationStage => CODEGEN_STAGE,
                    PrimarySuggestion => format!("Declare it first with 'int {target};'"),
                }
            );
        };

        if !symbol.kind.is_scalar_value() {
            return Err(kind_mismatch(target, &symbol.kind, "a variable"));
        }

        let (base, offset) = (symbol.base, symbol.offset);

        // Global address first, the value last
        let address: Option<Register> = match base {
            StorageBase::GlobalData => {
                let register = self.registers.next();
                let globals = self.config.globals_label.clone();
                self.emit_line(&format!("la {register}, {globals}"));
                Some(register)
            }
            _ => None,
        };

        let value = self.emit_expression(value)?;

        match address {
            Some(address) => self.emit_line(&format!("sw {value}, {offset}({address})")),
            None => self.emit_line(&format!("sw {value}, {offset}($fp)")),
        }

        Ok(())
    }

    fn emit_return(&mut self, value: Option<&AstNode>) -> Result<(), CompilerError> {
        let Some(frame) = self.frame.clone().filter(|_| self.inside_function) else {
            return_rule_error!("'return' can only be used inside a function", {
                CompilationStage => CODEGEN_STAGE,
            });
        };

        if let Some(value) = value {
            let register = self.emit_expression(value)?;
            self.emit_line(&format!("move $v0, {register}"));

            if frame.return_type == ValueType::Void {
                self.warnings.push(CompilerWarning::new(
                    &frame.name,
                    WarningKind::ReturnValueInVoidFunction,
                ));
            }
        }

        self.emit_epilogue(frame.is_entry);
        Ok(())
    }
}
