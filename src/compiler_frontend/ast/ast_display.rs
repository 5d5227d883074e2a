//! AST Display
//!
//! Renders the program tree as an indented block of labeled lines for diagnostics.
//! Each node prints one line, its children follow one level deeper.
//! List nodes never print a line of their own: their items are rendered at the list's
//! own level so a statement sequence or parameter list shows up as one flat block.

use crate::compiler_frontend::ast::ast_nodes::AstNode;
use std::fmt::{Display, Formatter, Result as FmtResult, Write as _};

const INDENT: &str = "  ";

impl AstNode {
    pub fn display_tree(&self) -> String {
        let mut out = String::new();
        write_node(&mut out, self, 0);
        out
    }
}

impl Display for AstNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.display_tree())
    }
}

fn write_node(out: &mut String, node: &AstNode, level: usize) {
    // Lists are flattened, they never get a line or an extra level
    if let Some((item, next)) = node.list_link() {
        write_node(out, item, level);
        if let Some(next) = next {
            write_node(out, next, level);
        }
        return;
    }

    let line = match node {
        AstNode::Number { value } => format!("NUM: {value}"),
        AstNode::Variable { name } => format!("VAR: {name}"),
        AstNode::BinaryOp { op, .. } => format!("BINOP: {op}"),
        AstNode::Declaration { name } => format!("DECL: {name}"),
        AstNode::Assign { target, .. } => format!("ASSIGN TO: {target}"),
        AstNode::Print { .. } => String::from("PRINT"),
        AstNode::ArrayDeclaration { name, size } => format!("ARRAY_DECL: {name}[{size}]"),
        AstNode::ArrayAccess { name, .. } => format!("ARRAY_ACCESS: {name}"),
        AstNode::ArrayAssign { name, .. } => format!("ARRAY_ASSIGN TO: {name}"),
        AstNode::Array2dDeclaration { name, rows, cols } => {
            format!("ARRAY_2D_DECL: {name}[{rows}][{cols}]")
        }
        AstNode::Array2dAccess { name, .. } => format!("ARRAY_2D_ACCESS: {name}"),
        AstNode::Array2dAssign { name, .. } => format!("ARRAY_2D_ASSIGN TO: {name}"),
        AstNode::FunctionDeclaration {
            return_type, name, ..
        } => format!("FUNC_DECL: {return_type} {name}"),
        AstNode::FunctionCall { name, .. } => format!("FUNC_CALL: {name}"),
        AstNode::Parameter { param_type, name } => format!("PARAM: {param_type} {name}"),
        AstNode::Return { .. } => String::from("RETURN"),
        AstNode::Block { .. } => String::from("BLOCK"),

        // Handled by list_link above
        AstNode::StatementList { .. }
        | AstNode::ParameterList { .. }
        | AstNode::ArgumentList { .. }
        | AstNode::FunctionList { .. } => return,
    };

    write_line(out, level, &line);

    match node {
        AstNode::BinaryOp { left, right, .. } => {
            write_node(out, left, level + 1);
            write_node(out, right, level + 1);
        }
        AstNode::Assign { value, .. } => write_node(out, value, level + 1),
        AstNode::Print { expr } => write_node(out, expr, level + 1),
        AstNode::ArrayAccess { index, .. } => {
            write_group(out, level, "Index:", index);
        }
        AstNode::ArrayAssign { index, value, .. } => {
            write_group(out, level, "Index:", index);
            write_group(out, level, "Value:", value);
        }
        AstNode::Array2dAccess { row, col, .. } => {
            write_group(out, level, "Row:", row);
            write_group(out, level, "Col:", col);
        }
        AstNode::Array2dAssign { row, col, value, .. } => {
            write_group(out, level, "Row:", row);
            write_group(out, level, "Col:", col);
            write_group(out, level, "Value:", value);
        }
        AstNode::FunctionDeclaration { params, body, .. } => {
            if let Some(params) = params {
                write_group(out, level, "Parameters:", params);
            }
            write_line(out, level + 1, "Body:");
            if let Some(body) = body {
                write_node(out, body, level + 2);
            }
        }
        AstNode::FunctionCall { args, .. } => {
            if let Some(args) = args {
                write_group(out, level, "Arguments:", args);
            }
        }
        AstNode::Return { expr } => {
            if let Some(expr) = expr {
                write_node(out, expr, level + 1);
            }
        }
        AstNode::Block { body } => {
            if let Some(body) = body {
                write_node(out, body, level + 1);
            }
        }
        _ => {}
    }
}

// A labeled group of children, "Index:" one level in and the child one further
fn write_group(out: &mut String, level: usize, label: &str, child: &AstNode) {
    write_line(out, level + 1, label);
    write_node(out, child, level + 2);
}

fn write_line(out: &mut String, level: usize, text: &str) {
    for _ in 0..level {
        out.push_str(INDENT);
    }
    let _ = writeln!(out, "{text}");
}
