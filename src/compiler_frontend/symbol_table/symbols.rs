use crate::compiler_frontend::ast::ast_nodes::ValueType;
use std::fmt;

/// Size of one storage slot (a scalar, or one array element) in bytes.
pub const WORD_SIZE: i32 = 4;

/// First parameter sits above the saved frame pointer and return address.
pub const FIRST_PARAMETER_OFFSET: i32 = 8;

/// Parameters travel in $a0 - $a3, there is no stack passing for the rest.
pub const MAX_PARAMETERS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,

    // Byte offset from `base`.
    // Negative for locals (below the frame pointer), positive for parameters
    // and for globals inside the global data block.
    pub offset: i32,
    pub base: StorageBase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolKind {
    Scalar,
    Array {
        size: u32,
    },
    Array2d {
        rows: u32,
        cols: u32,
    },
    Function {
        return_type: ValueType,
        param_types: Vec<ValueType>,
    },
    Parameter {
        param_type: ValueType,
    },
}

/// What a symbol's offset is measured from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBase {
    FramePointer,
    GlobalData,

    // Functions live in the text section, their offset means nothing
    Code,
}

impl SymbolKind {
    /// Storage slots a declaration of this kind takes up
    pub fn slots(&self) -> u32 {
        match self {
            SymbolKind::Scalar | SymbolKind::Parameter { .. } => 1,
            SymbolKind::Array { size } => *size,
            SymbolKind::Array2d { rows, cols } => rows.saturating_mul(*cols),
            SymbolKind::Function { .. } => 0,
        }
    }

    /// Scalars and parameters can be read and assigned by name
    pub fn is_scalar_value(&self) -> bool {
        matches!(self, SymbolKind::Scalar | SymbolKind::Parameter { .. })
    }

    pub fn describe(&self) -> &'static str {
        match self {
            SymbolKind::Scalar => "variable",
            SymbolKind::Array { .. } => "array",
            SymbolKind::Array2d { .. } => "2D array",
            SymbolKind::Function { .. } => "function",
            SymbolKind::Parameter { .. } => "parameter",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SymbolKind::Function {
                return_type,
                param_types,
            } => write!(
                f,
                "FUNCTION {} -> returns {}, {} params",
                self.name,
                return_type,
                param_types.len()
            ),
            SymbolKind::Array2d { rows, cols } => write!(
                f,
                "{}[{}][{}] -> offset {}",
                self.name, rows, cols, self.offset
            ),
            SymbolKind::Array { size } => {
                write!(f, "{}[{}] -> offset {}", self.name, size, self.offset)
            }
            SymbolKind::Parameter { .. } => {
                write!(f, "{} -> offset {} (parameter)", self.name, self.offset)
            }
            SymbolKind::Scalar => write!(f, "{} -> offset {}", self.name, self.offset),
        }
    }
}
