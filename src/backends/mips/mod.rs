//! MIPS backend.
//!
//! Walks the program tree directly (TAC is only an analysis artifact) and emits assembly text
//! for a SPIM / MARS style simulator. Storage is assigned through the [`ScopeTable`] as
//! declarations are reached, expression values go through the round-robin temporaries in
//! [`registers`], and every function gets a frame-pointer based stack frame.

mod mips_expr;
mod mips_function;
mod mips_statement;
pub mod registers;

#[cfg(test)]
mod tests;

use crate::backends::mips::registers::RoundRobinRegisters;
use crate::compiler_frontend::ast::ast_nodes::{AstNode, ValueType};
use crate::compiler_frontend::compiler_errors::{CompilerError, ErrorMetaDataKey, ErrorType};
use crate::compiler_frontend::compiler_warnings::{CompilerWarning, WarningKind};
use crate::compiler_frontend::symbol_table::{ScopeTable, SymbolKind};
use crate::{codegen_log, return_rule_error};

pub(crate) const CODEGEN_STAGE: &str = "MIPS Code Generation";

/// Names the generated assembly uses for things the program itself doesn't name.
#[derive(Debug, Clone)]
pub struct MipsCodegenConfig {
    /// The function that becomes `main`, and so where the simulator starts.
    pub entry_point: String,

    /// Prepended to every other function's name to build its label.
    pub function_label_prefix: String,

    /// Label of the `.data` block that holds global variables.
    pub globals_label: String,
}

impl Default for MipsCodegenConfig {
    fn default() -> Self {
        MipsCodegenConfig {
            entry_point: String::from("main"),
            function_label_prefix: String::from("func_"),
            globals_label: String::from("_globals"),
        }
    }
}

/// Result of generating assembly for one program.
#[derive(Debug, Clone)]
pub struct MipsModule {
    /// Complete assembly source.
    pub source: String,
    pub warnings: Vec<CompilerWarning>,
}

pub fn generate_mips(
    tree: &AstNode,
    config: &MipsCodegenConfig,
) -> Result<MipsModule, CompilerError> {
    let mut generator = MipsGenerator::new(config);
    generator.generate_module(tree)?;

    Ok(MipsModule {
        source: generator.assemble(),
        warnings: generator.warnings,
    })
}

/// The function whose body is being emitted
#[derive(Debug, Clone)]
pub(crate) struct FunctionFrame {
    pub(crate) name: String,
    pub(crate) return_type: ValueType,
    pub(crate) is_entry: bool,
}

pub(crate) struct MipsGenerator<'a> {
    pub(crate) config: &'a MipsCodegenConfig,
    pub(crate) scopes: ScopeTable,
    pub(crate) registers: RoundRobinRegisters,

    // True only inside a declared function.
    // The implicit entry function of a program without functions doesn't count.
    pub(crate) inside_function: bool,
    pub(crate) frame: Option<FunctionFrame>,

    // Comments for globals, written under the globals block
    data_comments: Vec<String>,
    pub(crate) text: String,
    pub(crate) warnings: Vec<CompilerWarning>,
}

impl<'a> MipsGenerator<'a> {
    pub(crate) fn new(config: &'a MipsCodegenConfig) -> Self {
        MipsGenerator {
            config,
            scopes: ScopeTable::new(),
            registers: RoundRobinRegisters::new(),
            inside_function: false,
            frame: None,
            data_comments: Vec::new(),
            text: String::new(),
            warnings: Vec::new(),
        }
    }

    fn generate_module(&mut self, tree: &AstNode) -> Result<(), CompilerError> {
        let items = tree.top_level_items();

        let has_functions = items
            .iter()
            .any(|item| matches!(item, AstNode::FunctionDeclaration { .. }));

        if !has_functions {
            codegen_log!(Bright Black "No functions declared, wrapping the program in an implicit entry point");
            return self.emit_implicit_entry(&items);
        }

        // Every function is known before any body is emitted,
        // so calls can appear before the callee's declaration.
        for item in &items {
            if let AstNode::FunctionDeclaration {
                return_type,
                name,
                params,
                ..
            } = item
            {
                let param_types = match params {
                    Some(params) => params
                        .list_in_source_order()
                        .into_iter()
                        .map(|param| match param {
                            AstNode::Parameter { param_type, .. } => *param_type,
                            _ => ValueType::Int,
                        })
                        .collect(),
                    None => Vec::new(),
                };

                self.scopes
                    .declare_function(name, *return_type, param_types)?;
            }
        }

        let mut found_entry = false;

        for item in items {
            match item {
                AstNode::FunctionDeclaration {
                    return_type,
                    name,
                    params,
                    body,
                } => {
                    found_entry |= *name == self.config.entry_point;
                    self.emit_function(
                        *return_type,
                        name,
                        params.as_deref(),
                        body.as_deref(),
                    )?;
                }

                AstNode::Declaration { .. }
                | AstNode::ArrayDeclaration { .. }
                | AstNode::Array2dDeclaration { .. } => {
                    self.emit_declaration(item)?;
                }

                other => {
                    return_rule_error!(
                        format!(
                            "Executable statement '{}' outside of a function",
                            statement_label(other)
                        ),
                        {
                            CompilationStage => CODEGEN_STAGE,
                            PrimarySuggestion => format!("Move this statement into '{}'", self.config.entry_point),
                        }
                    );
                }
            }
        }

        if !found_entry {
            self.warnings.push(CompilerWarning::new(
                &self.config.entry_point,
                WarningKind::MissingEntryPoint,
            ));
        }

        Ok(())
    }

    /// Label a call to this function jumps to
    pub(crate) fn function_label(&self, name: &str) -> String {
        if name == self.config.entry_point {
            String::from("main")
        } else {
            format!("{}{}", self.config.function_label_prefix, name)
        }
    }

    pub(crate) fn emit_label(&mut self, label: &str) {
        self.text.push_str(label);
        self.text.push_str(":\n");
    }

    /// One indented instruction line
    pub(crate) fn emit_line(&mut self, line: &str) {
        self.text.push_str("    ");
        self.text.push_str(line);
        self.text.push('\n');
    }

    pub(crate) fn emit_comment(&mut self, comment: &str) {
        if self.scopes.is_global() {
            self.data_comments.push(comment.to_owned());
            return;
        }

        self.text.push_str("    # ");
        self.text.push_str(comment);
        self.text.push('\n');
    }

    /// Puts the data and text sections together
    fn assemble(&self) -> String {
        let mut out = String::with_capacity(self.text.len() + 128);
        out.push_str(".data\n");

        let globals_size = self.scopes.current_frame_size();
        if globals_size > 0 {
            out.push_str(&format!(
                "{}: .space {}\n",
                self.config.globals_label, globals_size
            ));
            for comment in &self.data_comments {
                out.push_str("    # ");
                out.push_str(comment);
                out.push('\n');
            }
        }

        out.push_str("\n.text\n.globl main\n");
        out.push_str(&self.text);
        out
    }

}

/// A name was found but it's the wrong kind of thing for how it's used
pub(crate) fn kind_mismatch(name: &str, kind: &SymbolKind, wanted: &str) -> CompilerError {
    CompilerError::new(
        format!("'{name}' is a {} but is used as {wanted}", kind.describe()),
        ErrorType::Rule,
    )
    .with_metadata(ErrorMetaDataKey::VariableName, name)
    .with_metadata(ErrorMetaDataKey::CompilationStage, CODEGEN_STAGE)
}

/// Short name of a statement for error messages
pub(crate) fn statement_label(node: &AstNode) -> &'static str {
    match node {
        AstNode::Number { .. } => "number",
        AstNode::Variable { .. } => "variable",
        AstNode::BinaryOp { .. } => "arithmetic",
        AstNode::Declaration { .. } => "declaration",
        AstNode::Assign { .. } => "assignment",
        AstNode::Print { .. } => "print",
        AstNode::StatementList { .. } => "statement list",
        AstNode::ArrayDeclaration { .. } => "array declaration",
        AstNode::ArrayAccess { .. } | AstNode::Array2dAccess { .. } => "array access",
        AstNode::ArrayAssign { .. } | AstNode::Array2dAssign { .. } => "array assignment",
        AstNode::Array2dDeclaration { .. } => "2D array declaration",
        AstNode::FunctionDeclaration { .. } => "function declaration",
        AstNode::FunctionCall { .. } => "call",
        AstNode::Parameter { .. } | AstNode::ParameterList { .. } => "parameter",
        AstNode::ArgumentList { .. } => "argument list",
        AstNode::Return { .. } => "return",
        AstNode::FunctionList { .. } => "function list",
        AstNode::Block { .. } => "block",
    }
}
