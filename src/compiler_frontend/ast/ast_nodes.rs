use serde::{Deserialize, Serialize};
use std::fmt;

/// One node of the program tree handed over by the parser.
///
/// Every child is owned by its parent, so the tree is a strict forest: no sharing and no cycles.
/// The compiler core only ever reads it, the tree dump, TAC lowering and code generation all
/// walk the same tree independently.
///
/// List ordering is not uniform:
/// - `StatementList` is in source order (`statement` is the first statement).
/// - `ParameterList`, `ArgumentList` and `FunctionList` are built by the parser in reverse,
///   so `item` is the *last* declared element. Use [`AstNode::list_in_source_order`]
///   wherever position matters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "node")]
pub enum AstNode {
    Number {
        value: i32,
    },
    Variable {
        name: String,
    },
    BinaryOp {
        op: Operator,
        left: Box<AstNode>,
        right: Box<AstNode>,
    },
    Declaration {
        name: String,
    },
    Assign {
        target: String,
        value: Box<AstNode>,
    },
    Print {
        expr: Box<AstNode>,
    },
    StatementList {
        statement: Box<AstNode>,
        #[serde(default)]
        next: Option<Box<AstNode>>,
    },

    // Arrays
    ArrayDeclaration {
        name: String,
        size: u32,
    },
    ArrayAccess {
        name: String,
        index: Box<AstNode>,
    },
    ArrayAssign {
        name: String,
        index: Box<AstNode>,
        value: Box<AstNode>,
    },
    Array2dDeclaration {
        name: String,
        rows: u32,
        cols: u32,
    },
    Array2dAccess {
        name: String,
        row: Box<AstNode>,
        col: Box<AstNode>,
    },
    Array2dAssign {
        name: String,
        row: Box<AstNode>,
        col: Box<AstNode>,
        value: Box<AstNode>,
    },

    // Functions
    FunctionDeclaration {
        return_type: ValueType,
        name: String,
        #[serde(default)]
        params: Option<Box<AstNode>>,
        #[serde(default)]
        body: Option<Box<AstNode>>,
    },
    FunctionCall {
        name: String,
        #[serde(default)]
        args: Option<Box<AstNode>>,
    },
    Parameter {
        param_type: ValueType,
        name: String,
    },
    ParameterList {
        item: Box<AstNode>,
        #[serde(default)]
        next: Option<Box<AstNode>>,
    },
    ArgumentList {
        item: Box<AstNode>,
        #[serde(default)]
        next: Option<Box<AstNode>>,
    },
    Return {
        #[serde(default)]
        expr: Option<Box<AstNode>>,
    },
    FunctionList {
        item: Box<AstNode>,
        #[serde(default)]
        next: Option<Box<AstNode>>,
    },

    // Compound statement, opens a nested scope
    Block {
        #[serde(default)]
        body: Option<Box<AstNode>>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
}

impl Operator {
    pub fn to_str(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
        }
    }

    /// Evaluates the operator the way the target machine does: 32 bit, wrapping on overflow.
    pub fn apply(&self, lhs: i32, rhs: i32) -> i32 {
        match self {
            Operator::Add => lhs.wrapping_add(rhs),
            Operator::Subtract => lhs.wrapping_sub(rhs),
            Operator::Multiply => lhs.wrapping_mul(rhs),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Int,
    Void,
}

impl ValueType {
    pub fn to_str(&self) -> &'static str {
        match self {
            ValueType::Int => "int",
            ValueType::Void => "void",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl AstNode {
    pub fn is_list(&self) -> bool {
        matches!(
            self,
            AstNode::StatementList { .. }
                | AstNode::ParameterList { .. }
                | AstNode::ArgumentList { .. }
                | AstNode::FunctionList { .. }
        )
    }

    /// Walks a linked list node and returns its items in source order.
    ///
    /// Statement lists are already in source order. Parameter, argument and function lists
    /// come out of the parser reversed, so those are flipped here.
    /// A node that isn't a list is treated as a list of one.
    pub fn list_in_source_order(&self) -> Vec<&AstNode> {
        let mut items = Vec::new();
        let mut current = Some(self);

        // Only links of the same list kind belong to this chain,
        // anything else hanging off the end is an item in its own right.
        while let Some(node) = current {
            match node.list_link() {
                Some((item, next))
                    if std::mem::discriminant(node) == std::mem::discriminant(self) =>
                {
                    items.push(item);
                    current = next;
                }
                _ => {
                    items.push(node);
                    current = None;
                }
            }
        }

        if !matches!(self, AstNode::StatementList { .. }) {
            items.reverse();
        }

        items
    }

    /// The (item, next) pair of a list node.
    pub fn list_link(&self) -> Option<(&AstNode, Option<&AstNode>)> {
        match self {
            AstNode::StatementList { statement, next } => Some((&**statement, next.as_deref())),
            AstNode::ParameterList { item, next }
            | AstNode::ArgumentList { item, next }
            | AstNode::FunctionList { item, next } => Some((&**item, next.as_deref())),
            _ => None,
        }
    }

    /// Flattens nested statement and function lists into the program's top level items.
    pub fn top_level_items(&self) -> Vec<&AstNode> {
        let mut items = Vec::new();
        collect_top_level(self, &mut items);
        items
    }

    /// How many storage slots (one per scalar) the declarations in this subtree need.
    ///
    /// Nested blocks are included, nested function declarations are not,
    /// they get their own frame.
    pub fn storage_slots(&self) -> u32 {
        match self {
            AstNode::Declaration { .. } => 1,
            AstNode::ArrayDeclaration { size, .. } => *size,
            AstNode::Array2dDeclaration { rows, cols, .. } => rows.saturating_mul(*cols),
            AstNode::StatementList { statement, next } => {
                statement
                    .storage_slots()
                    .saturating_add(next.as_ref().map_or(0, |n| n.storage_slots()))
            }
            AstNode::Block { body } => body.as_ref().map_or(0, |b| b.storage_slots()),
            _ => 0,
        }
    }
}

fn collect_top_level<'a>(node: &'a AstNode, items: &mut Vec<&'a AstNode>) {
    match node {
        AstNode::StatementList { .. } | AstNode::FunctionList { .. } => {
            for item in node.list_in_source_order() {
                collect_top_level(item, items);
            }
        }
        other => items.push(other),
    }
}
