use crate::compiler_frontend::ast::ast_nodes::Operator;

/// Where a value lives: a compile-time integer, or a named variable / temporary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operand {
    Literal(i32),
    Name(String),
}

impl Operand {
    pub fn as_literal(&self) -> Option<i32> {
        match self {
            Operand::Literal(value) => Some(*value),
            Operand::Name(_) => None,
        }
    }
}

impl From<i32> for Operand {
    fn from(value: i32) -> Self {
        Operand::Literal(value)
    }
}

impl From<&str> for Operand {
    fn from(name: &str) -> Self {
        Operand::Name(name.to_owned())
    }
}

/// A single three-address instruction.
/// At most three operands plus one result, all straight-line: this language has no branches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TacInstruction {
    /// result = left op right
    Binary {
        op: Operator,
        left: Operand,
        right: Operand,
        result: String,
    },

    /// target = value
    Assign {
        target: String,
        value: Operand,
    },

    Declare {
        name: String,
    },
    DeclareArray {
        name: String,
        size: u32,
    },
    DeclareArray2d {
        name: String,
        rows: u32,
        cols: u32,
    },

    /// result = array[index]
    Load {
        array: String,
        index: Operand,
        result: String,
    },

    /// result = array[row][col]
    Load2d {
        array: String,
        row: Operand,
        col: Operand,
        result: String,
    },

    /// array[index] = value
    Store {
        array: String,
        index: Operand,
        value: Operand,
    },

    /// array[row][col] = value
    Store2d {
        array: String,
        row: Operand,
        col: Operand,
        value: Operand,
    },

    Print {
        value: Operand,
    },

    Label {
        name: String,
    },
    FunctionBegin {
        name: String,
    },
    FunctionEnd {
        name: String,
    },

    /// Opens a nested scope, names declared until the matching `BlockEnd` shadow outer ones
    BlockBegin,
    BlockEnd,

    /// Pushes one argument for the next call
    Param {
        value: Operand,
    },

    /// result = CALL function, arg_count
    Call {
        function: String,
        arg_count: usize,
        result: String,
    },

    Return {
        value: Option<Operand>,
    },
}

/// An instruction sequence in emission order.
/// Once built it is never modified, optimization passes build a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TacProgram {
    instructions: Vec<TacInstruction>,
}

impl TacProgram {
    pub fn new(instructions: Vec<TacInstruction>) -> Self {
        TacProgram { instructions }
    }

    pub fn instructions(&self) -> &[TacInstruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TacInstruction> {
        self.instructions.iter()
    }
}

impl<'a> IntoIterator for &'a TacProgram {
    type Item = &'a TacInstruction;
    type IntoIter = std::slice::Iter<'a, TacInstruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}
