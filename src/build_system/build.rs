//! Build entry points.
//!
//! [`compile_tree`] runs the in-memory pipeline on a program tree:
//! optional tree dump, TAC lowering, constant folding, then MIPS generation.
//! [`build`] wraps it with the file plumbing: read a serialized tree, write the assembly.

use crate::backends::mips::generate_mips;
use crate::compiler_frontend::ast::ast_nodes::AstNode;
use crate::compiler_frontend::compiler_errors::{
    CompilerError, CompilerMessages, ErrorMetaDataKey, ErrorType,
};
use crate::compiler_frontend::compiler_warnings::CompilerWarning;
use crate::compiler_frontend::optimizers::constant_folding;
use crate::compiler_frontend::tac::tac_builder::lower_program;
use crate::compiler_frontend::tac::tac_display::TacStage;
use crate::compiler_frontend::tac::tac_nodes::TacProgram;
use crate::projects::settings::{ASSEMBLY_FILE_EXTENSION, Config};
use crate::{return_file_error, timer_log};
use saying::say;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Everything one compilation produces
#[derive(Debug, Clone)]
pub struct CompilationOutput {
    pub assembly: String,
    pub tac: TacProgram,

    /// Same as `tac` when optimization is turned off
    pub optimized_tac: TacProgram,
    pub warnings: Vec<CompilerWarning>,
}

pub fn compile_tree(tree: &AstNode, config: &Config) -> Result<CompilationOutput, CompilerMessages> {
    if config.show_ast {
        say!(Green Bold "\nProgram Tree:");
        let dump = tree.display_tree();
        say!(dump);
    }

    // ----------------------------
    //        TAC LOWERING
    // ----------------------------
    let time = Instant::now();
    let tac = lower_program(tree);
    timer_log!(time, "TAC lowered in: ");

    if config.show_tac {
        let dump = tac.display(TacStage::Unoptimized);
        say!(dump);
    }

    // ----------------------------
    //        OPTIMIZATION
    // ----------------------------
    let optimized_tac = if config.optimize_tac {
        let time = Instant::now();
        let optimized = constant_folding::optimize(&tac);
        timer_log!(time, "TAC optimized in: ");

        if config.show_tac {
            let dump = optimized.display(TacStage::Optimized);
            say!(dump);
        }

        optimized
    } else {
        tac.clone()
    };

    // ----------------------------
    //      MIPS CODE GENERATION
    // ----------------------------
    let time = Instant::now();
    let module = match generate_mips(tree, &config.codegen_config()) {
        Ok(module) => module,
        Err(e) => return Err(CompilerMessages::from_error(e, Vec::new())),
    };
    timer_log!(time, "MIPS generated in: ");

    Ok(CompilationOutput {
        assembly: module.source,
        tac,
        optimized_tac,
        warnings: module.warnings,
    })
}

/// Reads a program tree serialized as JSON
pub fn read_tree(path: &Path) -> Result<AstNode, CompilerError> {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => return_file_error!(path, format!("Could not read the program tree: {e}")),
    };

    serde_json::from_str(&source).map_err(|e| {
        CompilerError::new(
            format!(
                "Invalid program tree at line {}, column {}: {e}",
                e.line(),
                e.column()
            ),
            ErrorType::Input,
        )
        .with_metadata(ErrorMetaDataKey::VariableName, path.display().to_string())
        .with_metadata(ErrorMetaDataKey::CompilationStage, "Reading Program Tree")
    })
}

/// Where the assembly goes when no output path is given: next to the input
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension(ASSEMBLY_FILE_EXTENSION)
}

/// Compiles the tree in `input` and writes the assembly to `output`
/// (or next to the input when `output` is `None`).
///
/// Returns the warnings on success. On failure `errors` holds the first error found,
/// nothing is written.
pub fn build(input: &Path, output: Option<&Path>, config: &Config) -> CompilerMessages {
    let start = Instant::now();

    let tree = match read_tree(input) {
        Ok(tree) => tree,
        Err(e) => return CompilerMessages::from_error(e, Vec::new()),
    };

    let compiled = match compile_tree(&tree, config) {
        Ok(compiled) => compiled,
        Err(messages) => return messages,
    };

    let output_path = match output {
        Some(path) => path.to_path_buf(),
        None => default_output_path(input),
    };

    if let Err(e) = fs::write(&output_path, &compiled.assembly) {
        let err = CompilerError::file_error(
            &output_path,
            format!("Could not write the assembly: {e}"),
        );
        return CompilerMessages::from_error(err, compiled.warnings);
    }

    let duration = start.elapsed();
    let written = output_path.display().to_string();
    say!("\nWrote ", Blue written, Reset " in: ", Green Bold #duration);

    CompilerMessages {
        errors: Vec::new(),
        warnings: compiled.warnings,
    }
}

#[cfg(test)]
#[path = "tests/build_tests.rs"]
mod tests;
