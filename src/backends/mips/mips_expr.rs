use crate::backends::mips::registers::Register;
use crate::backends::mips::{CODEGEN_STAGE, MipsGenerator, kind_mismatch, statement_label};
use crate::compiler_frontend::ast::ast_nodes::{AstNode, Operator};
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::symbol_table::{StorageBase, SymbolKind};
use crate::{return_compiler_error, return_rule_error, return_undeclared_error};

impl<'a> MipsGenerator<'a> {
    /// Emits the code for an expression and returns the temporary holding its value
    pub(crate) fn emit_expression(&mut self, expression: &AstNode) -> Result<Register, CompilerError> {
        match expression {
            AstNode::Number { value } => {
                let register = self.registers.next();
                self.emit_line(&format!("li {register}, {value}"));
                Ok(register)
            }

            AstNode::Variable { name } => self.emit_variable_read(name),

            AstNode::BinaryOp { op, left, right } => {
                let left = self.emit_expression(left)?;
                let right = self.emit_expression(right)?;

                let instruction = match op {
                    Operator::Add => "add",
                    Operator::Subtract => "sub",
                    Operator::Multiply => "mul",
                };
                self.emit_line(&format!("{instruction} {left}, {left}, {right}"));

                // The right operand is dead now
                self.registers.rewind_to(left);
                Ok(left)
            }

            AstNode::ArrayAccess { name, index } => {
                let address = self.emit_element_address(name, index, None)?;
                self.emit_line(&format!("lw {address}, 0({address})"));
                self.registers.rewind_to(address);
                Ok(address)
            }

            AstNode::Array2dAccess { name, row, col } => {
                let address = self.emit_element_address(name, row, Some(col))?;
                self.emit_line(&format!("lw {address}, 0({address})"));
                self.registers.rewind_to(address);
                Ok(address)
            }

            AstNode::FunctionCall { name, args } => self.emit_call(name, args.as_deref()),

            other => {
                return_compiler_error!(format!(
                    "Found a {} where an expression should be",
                    statement_label(other)
                ))
            }
        }
    }

    fn emit_variable_read(&mut self, name: &str) -> Result<Register, CompilerError> {
        let Some(symbol) = self.scopes.resolve(name) else {
            return_undeclared_error!(
                format!("Variable '{name}' is used before it is declared"),
                {
                    VariableName => name,
                    CompilationStage => CODEGEN_STAGE,
                    PrimarySuggestion => format!("Declare it first with 'int {name};'"),
                }
            );
        };

        if !symbol.kind.is_scalar_value() {
            return Err(kind_mismatch(name, &symbol.kind, "a value"));
        }

        let (base, offset) = (symbol.base, symbol.offset);
        let register = self.registers.next();

        match base {
            StorageBase::GlobalData => {
                let globals = self.config.globals_label.clone();
                self.emit_line(&format!("la {register}, {globals}"));
                self.emit_line(&format!("lw {register}, {offset}({register})"));
            }
            _ => {
                self.emit_line(&format!("lw {register}, {offset}($fp)"));
            }
        }

        Ok(register)
    }

    /// Computes the address of an array element into a temporary.
    ///
    /// One dimensional arrays are addressed as `base + index * 4`.
    /// Two dimensional arrays are row major: `base + (row * cols + col) * 4`.
    /// Pass `col` for a 2D access, `None` for a 1D one.
    pub(crate) fn emit_element_address(
        &mut self,
        name: &str,
        index: &AstNode,
        col: Option<&AstNode>,
    ) -> Result<Register, CompilerError> {
        let Some(symbol) = self.scopes.resolve(name) else {
            return_undeclared_error!(
                format!("Array '{name}' is used before it is declared"),
                {
                    VariableName => name,
                    CompilationStage => CODEGEN_STAGE,
                }
            );
        };

        let cols = match (&symbol.kind, col) {
            (SymbolKind::Array { .. }, None) => None,
            (SymbolKind::Array2d { cols, .. }, Some(_)) => Some(*cols),
            (SymbolKind::Array2d { .. }, None) => {
                return_rule_error!(
                    format!("2D array '{name}' needs both a row and a column index"),
                    {
                        VariableName => name,
                        CompilationStage => CODEGEN_STAGE,
                    }
                );
            }
            (SymbolKind::Array { .. }, Some(_)) => {
                return_rule_error!(
                    format!("Array '{name}' has one dimension but is indexed with two"),
                    {
                        VariableName => name,
                        CompilationStage => CODEGEN_STAGE,
                    }
                );
            }
            (kind, _) => return Err(kind_mismatch(name, kind, "an array")),
        };

        let (base, offset) = (symbol.base, symbol.offset);

        let element = self.emit_expression(index)?;
        if let (Some(cols), Some(col)) = (cols, col) {
            let col = self.emit_expression(col)?;
            let width = self.registers.next();
            self.emit_line(&format!("li {width}, {cols}"));
            self.emit_line(&format!("mul {element}, {element}, {width}"));
            self.emit_line(&format!("add {element}, {element}, {col}"));
        }

        // Element index to byte offset
        self.emit_line(&format!("sll {element}, {element}, 2"));

        let address = self.registers.next();
        match base {
            StorageBase::GlobalData => {
                let globals = self.config.globals_label.clone();
                self.emit_line(&format!("la {address}, {globals}"));
                self.emit_line(&format!("addi {address}, {address}, {offset}"));
            }
            _ => {
                self.emit_line(&format!("addi {address}, $fp, {offset}"));
            }
        }

        self.emit_line(&format!("add {element}, {element}, {address}"));
        self.registers.rewind_to(element);
        Ok(element)
    }
}
