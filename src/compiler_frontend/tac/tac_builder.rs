//! Lowers the program tree to three-address code.
//!
//! Expressions lower to the instructions that compute them plus the operand naming the result:
//! a literal's value, a variable's name or a fresh temporary. Statements are emitted in program
//! order. The output is a straight-line sequence with only function begin/end and labels as
//! structure.

use crate::compiler_frontend::ast::ast_nodes::AstNode;
use crate::compiler_frontend::tac::tac_nodes::{Operand, TacInstruction, TacProgram};
use crate::tac_log;

/// Lowers a whole program with a fresh temporary counter
pub fn lower_program(root: &AstNode) -> TacProgram {
    let mut builder = TacBuilder::new();
    builder.lower_statement(root);
    builder.finish()
}

/// Lowering context: the instructions emitted so far and the temporary counter.
///
/// Temporaries are numbered `t0`, `t1`, ... across everything lowered by one builder
/// and are never reused.
#[derive(Debug, Default)]
pub struct TacBuilder {
    instructions: Vec<TacInstruction>,
    temp_counter: usize,
}

impl TacBuilder {
    pub fn new() -> Self {
        TacBuilder {
            instructions: Vec::new(),
            temp_counter: 0,
        }
    }

    pub fn finish(self) -> TacProgram {
        TacProgram::new(self.instructions)
    }

    fn new_temp(&mut self) -> String {
        let temp = format!("t{}", self.temp_counter);
        self.temp_counter += 1;
        temp
    }

    fn emit(&mut self, instruction: TacInstruction) {
        tac_log!(Bright Black "TAC ", #instruction);
        self.instructions.push(instruction);
    }

    pub fn lower_statement(&mut self, node: &AstNode) {
        match node {
            AstNode::Declaration { name } => {
                self.emit(TacInstruction::Declare { name: name.clone() });
            }

            AstNode::ArrayDeclaration { name, size } => {
                self.emit(TacInstruction::DeclareArray {
                    name: name.clone(),
                    size: *size,
                });
            }

            AstNode::Array2dDeclaration { name, rows, cols } => {
                self.emit(TacInstruction::DeclareArray2d {
                    name: name.clone(),
                    rows: *rows,
                    cols: *cols,
                });
            }

            AstNode::Assign { target, value } => {
                let value = self.lower_expression(value);
                self.emit(TacInstruction::Assign {
                    target: target.clone(),
                    value,
                });
            }

            AstNode::ArrayAssign { name, index, value } => {
                let index = self.lower_expression(index);
                let value = self.lower_expression(value);
                self.emit(TacInstruction::Store {
                    array: name.clone(),
                    index,
                    value,
                });
            }

            AstNode::Array2dAssign {
                name,
                row,
                col,
                value,
            } => {
                let row = self.lower_expression(row);
                let col = self.lower_expression(col);
                let value = self.lower_expression(value);
                self.emit(TacInstruction::Store2d {
                    array: name.clone(),
                    row,
                    col,
                    value,
                });
            }

            AstNode::Print { expr } => {
                let value = self.lower_expression(expr);
                self.emit(TacInstruction::Print { value });
            }

            AstNode::StatementList { .. } | AstNode::FunctionList { .. } => {
                for item in node.list_in_source_order() {
                    self.lower_statement(item);
                }
            }

            AstNode::FunctionDeclaration { name, body, .. } => {
                self.emit(TacInstruction::FunctionBegin { name: name.clone() });
                self.emit(TacInstruction::Label { name: name.clone() });
                if let Some(body) = body {
                    self.lower_statement(body);
                }
                self.emit(TacInstruction::FunctionEnd { name: name.clone() });
            }

            AstNode::Return { expr } => {
                let value = expr.as_ref().map(|expr| self.lower_expression(expr));
                self.emit(TacInstruction::Return { value });
            }

            AstNode::Block { body } => {
                self.emit(TacInstruction::BlockBegin);
                if let Some(body) = body {
                    self.lower_statement(body);
                }
                self.emit(TacInstruction::BlockEnd);
            }

            // Parameters only matter to the code generator's frame layout
            AstNode::Parameter { .. }
            | AstNode::ParameterList { .. }
            | AstNode::ArgumentList { .. } => {}

            // A call or any other expression used as a statement, its value is dropped
            AstNode::FunctionCall { .. }
            | AstNode::Number { .. }
            | AstNode::Variable { .. }
            | AstNode::BinaryOp { .. }
            | AstNode::ArrayAccess { .. }
            | AstNode::Array2dAccess { .. } => {
                self.lower_expression(node);
            }
        }
    }

    pub fn lower_expression(&mut self, node: &AstNode) -> Operand {
        match node {
            AstNode::Number { value } => Operand::Literal(*value),

            AstNode::Variable { name } => Operand::Name(name.clone()),

            AstNode::BinaryOp { op, left, right } => {
                // Left first, then right
                let left = self.lower_expression(left);
                let right = self.lower_expression(right);
                let result = self.new_temp();
                self.emit(TacInstruction::Binary {
                    op: *op,
                    left,
                    right,
                    result: result.clone(),
                });
                Operand::Name(result)
            }

            AstNode::ArrayAccess { name, index } => {
                let index = self.lower_expression(index);
                let result = self.new_temp();
                self.emit(TacInstruction::Load {
                    array: name.clone(),
                    index,
                    result: result.clone(),
                });
                Operand::Name(result)
            }

            AstNode::Array2dAccess { name, row, col } => {
                let row = self.lower_expression(row);
                let col = self.lower_expression(col);
                let result = self.new_temp();
                self.emit(TacInstruction::Load2d {
                    array: name.clone(),
                    row,
                    col,
                    result: result.clone(),
                });
                Operand::Name(result)
            }

            AstNode::FunctionCall { name, args } => {
                // All arguments are computed before any PARAM is pushed,
                // so a call nested inside an argument can't interleave its own PARAMs.
                let arguments: Vec<Operand> = match args {
                    Some(args) => args
                        .list_in_source_order()
                        .into_iter()
                        .map(|arg| self.lower_expression(arg))
                        .collect(),
                    None => Vec::new(),
                };

                let arg_count = arguments.len();
                for value in arguments {
                    self.emit(TacInstruction::Param { value });
                }

                let result = self.new_temp();
                self.emit(TacInstruction::Call {
                    function: name.clone(),
                    arg_count,
                    result: result.clone(),
                });
                Operand::Name(result)
            }

            // Statements have no value. The parser never puts one in expression position.
            other => {
                self.lower_statement(other);
                Operand::Literal(0)
            }
        }
    }
}
