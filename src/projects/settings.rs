//! Project settings.
//!
//! Read from an optional `minic.toml`. Every field has a default, so an empty or missing
//! file gives the same result as the command line with no flags.

use crate::backends::mips::MipsCodegenConfig;
use crate::compiler_frontend::compiler_errors::{CompilerError, ErrorMetaDataKey, ErrorType};
use crate::return_file_error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "minic.toml";
pub const ASSEMBLY_FILE_EXTENSION: &str = "s";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Print the program tree before lowering
    pub show_ast: bool,

    /// Print the TAC before and after optimization
    pub show_tac: bool,

    pub optimize_tac: bool,

    // Assembly naming
    pub entry_point: String,
    pub function_label_prefix: String,
    pub globals_label: String,
}

impl Default for Config {
    fn default() -> Self {
        let labels = MipsCodegenConfig::default();

        Config {
            show_ast: false,
            show_tac: true,
            optimize_tac: true,
            entry_point: labels.entry_point,
            function_label_prefix: labels.function_label_prefix,
            globals_label: labels.globals_label,
        }
    }
}

impl Config {
    pub fn from_toml_str(source: &str) -> Result<Self, CompilerError> {
        toml::from_str(source).map_err(|e| {
            CompilerError::new(e.to_string(), ErrorType::Config)
                .with_metadata(ErrorMetaDataKey::CompilationStage, "Reading Config")
        })
    }

    /// Loads a config file. A missing file is an error here,
    /// callers that treat the file as optional check for it first.
    pub fn load(path: &Path) -> Result<Self, CompilerError> {
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => return_file_error!(path, format!("Could not read config file: {e}")),
        };

        Self::from_toml_str(&source).map_err(|e| e.with_metadata(ErrorMetaDataKey::VariableName, path.display().to_string()))
    }

    /// The default config file in `dir`, or the defaults if there isn't one
    pub fn load_from_dir(dir: &Path) -> Result<Self, CompilerError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Config::default())
        }
    }

    pub fn codegen_config(&self) -> MipsCodegenConfig {
        MipsCodegenConfig {
            entry_point: self.entry_point.clone(),
            function_label_prefix: self.function_label_prefix.clone(),
            globals_label: self.globals_label.clone(),
        }
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
