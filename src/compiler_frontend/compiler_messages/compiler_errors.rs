use crate::compiler_frontend::compiler_warnings::CompilerWarning;
use std::collections::HashMap;
use std::fmt;

// The final set of errors and warnings emitted from the compiler
#[derive(Debug, Default)]
pub struct CompilerMessages {
    pub errors: Vec<CompilerError>,
    pub warnings: Vec<CompilerWarning>,
}

impl CompilerMessages {
    pub fn from_error(error: CompilerError, warnings: Vec<CompilerWarning>) -> Self {
        CompilerMessages {
            errors: vec![error],
            warnings,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum ErrorMetaDataKey {
    VariableName,
    CompilationStage,

    // Optional suggestion on how to fix it
    PrimarySuggestion,

    // Arity information
    ExpectedCount,
    FoundCount,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompilerError {
    pub msg: String,
    pub error_type: ErrorType,

    // Structured details so the message printer can show the offending name and where
    // in the pipeline things went wrong, without parsing the message text.
    pub metadata: HashMap<ErrorMetaDataKey, String>,
}

impl CompilerError {
    pub fn new(msg: impl Into<String>, error_type: ErrorType) -> CompilerError {
        CompilerError {
            msg: msg.into(),
            error_type,
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: ErrorMetaDataKey, value: impl Into<String>) -> Self {
        self.metadata.insert(key, value.into());
        self
    }

    /// The name this error is about, if one was recorded
    pub fn variable_name(&self) -> Option<&str> {
        self.metadata
            .get(&ErrorMetaDataKey::VariableName)
            .map(String::as_str)
    }

    /// Create a compiler error (internal bug, not user's fault)
    pub fn compiler_error(msg: impl Into<String>) -> Self {
        CompilerError::new(msg, ErrorType::Compiler)
    }

    /// Create a file system error for a path that couldn't be read or written
    pub fn file_error(path: &std::path::Path, msg: impl Into<String>) -> Self {
        CompilerError::new(msg, ErrorType::File)
            .with_metadata(ErrorMetaDataKey::VariableName, path.display().to_string())
    }
}

impl fmt::Display for CompilerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", error_type_to_str(&self.error_type), self.msg)
    }
}

impl std::error::Error for CompilerError {}

// Every category aborts the whole compilation.
// The first one detected is the one that gets reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    Redeclaration,
    UndeclaredReference,
    UnsupportedArity,
    Rule,
    File,
    Input,
    Config,
    Compiler,
}

pub fn error_type_to_str(e_type: &ErrorType) -> &'static str {
    match e_type {
        ErrorType::Redeclaration => "Redeclaration",
        ErrorType::UndeclaredReference => "Undeclared Reference",
        ErrorType::UnsupportedArity => "Unsupported Arity",
        ErrorType::Rule => "Language Rule Violation",
        ErrorType::File => "File Error",
        ErrorType::Input => "Malformed Program Tree",
        ErrorType::Config => "Malformed Config",
        ErrorType::Compiler => "Compiler Bug",
    }
}

/// Returns a new CompilerError for a name that is already bound in the current scope.
///
/// Usage:
/// `return_redeclaration_error!("Variable 'x' already declared", { VariableName => name })`;
#[macro_export]
macro_rules! return_redeclaration_error {
    ($msg:expr, { $( $key:ident => $value:expr ),* $(,)? }) => {
        return Err($crate::compiler_frontend::compiler_errors::CompilerError {
            msg: $msg.into(),
            error_type: $crate::compiler_frontend::compiler_errors::ErrorType::Redeclaration,
            metadata: {
                let mut map = std::collections::HashMap::new();
                $( map.insert($crate::compiler_frontend::compiler_errors::ErrorMetaDataKey::$key, $value.to_string()); )*
                map
            },
        })
    };
    ($msg:expr) => {
        return Err($crate::compiler_frontend::compiler_errors::CompilerError::new(
            $msg,
            $crate::compiler_frontend::compiler_errors::ErrorType::Redeclaration,
        ))
    };
}

/// Returns a new CompilerError for a name with no binding anywhere in the scope chain.
///
/// Usage:
/// `return_undeclared_error!("Variable 'x' not declared", { VariableName => name })`;
#[macro_export]
macro_rules! return_undeclared_error {
    ($msg:expr, { $( $key:ident => $value:expr ),* $(,)? }) => {
        return Err($crate::compiler_frontend::compiler_errors::CompilerError {
            msg: $msg.into(),
            error_type: $crate::compiler_frontend::compiler_errors::ErrorType::UndeclaredReference,
            metadata: {
                let mut map = std::collections::HashMap::new();
                $( map.insert($crate::compiler_frontend::compiler_errors::ErrorMetaDataKey::$key, $value.to_string()); )*
                map
            },
        })
    };
    ($msg:expr) => {
        return Err($crate::compiler_frontend::compiler_errors::CompilerError::new(
            $msg,
            $crate::compiler_frontend::compiler_errors::ErrorType::UndeclaredReference,
        ))
    };
}

/// Returns a new CompilerError when a function declares or receives
/// more values than there are argument registers.
///
/// Usage:
/// `return_arity_error!("Too many arguments", { VariableName => name, FoundCount => 5 })`;
#[macro_export]
macro_rules! return_arity_error {
    ($msg:expr, { $( $key:ident => $value:expr ),* $(,)? }) => {
        return Err($crate::compiler_frontend::compiler_errors::CompilerError {
            msg: $msg.into(),
            error_type: $crate::compiler_frontend::compiler_errors::ErrorType::UnsupportedArity,
            metadata: {
                let mut map = std::collections::HashMap::new();
                $( map.insert($crate::compiler_frontend::compiler_errors::ErrorMetaDataKey::$key, $value.to_string()); )*
                map
            },
        })
    };
}

/// Returns a new CompilerError for semantic rule violations.
///
/// Rule errors cover names used as the wrong kind of thing (indexing a scalar, calling an array),
/// calls with the wrong number of arguments and statements placed where they can't run.
///
/// Usage:
/// - `return_rule_error!("message")`;
/// - `return_rule_error!("message", { VariableName => name, PrimarySuggestion => "..." })`;
#[macro_export]
macro_rules! return_rule_error {
    ($msg:expr, { $( $key:ident => $value:expr ),* $(,)? }) => {
        return Err($crate::compiler_frontend::compiler_errors::CompilerError {
            msg: $msg.into(),
            error_type: $crate::compiler_frontend::compiler_errors::ErrorType::Rule,
            metadata: {
                let mut map = std::collections::HashMap::new();
                $( map.insert($crate::compiler_frontend::compiler_errors::ErrorMetaDataKey::$key, $value.to_string()); )*
                map
            },
        })
    };
    ($msg:expr) => {
        return Err($crate::compiler_frontend::compiler_errors::CompilerError::new(
            $msg,
            $crate::compiler_frontend::compiler_errors::ErrorType::Rule,
        ))
    };
}

/// Returns a new CompilerError
///
/// Usage: `return_file_error!(path, "message")`;
#[macro_export]
macro_rules! return_file_error {
    ($path:expr, $msg:expr) => {{
        return Err($crate::compiler_frontend::compiler_errors::CompilerError::file_error(
            $path, $msg,
        ));
    }};
}

/// Returns a new CompilerError for internal compiler bugs.
///
/// Usage: `return_compiler_error!("message")`;
#[macro_export]
macro_rules! return_compiler_error {
    ($msg:expr) => {
        return Err($crate::compiler_frontend::compiler_errors::CompilerError::compiler_error($msg))
    };
}
