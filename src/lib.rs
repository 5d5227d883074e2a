//! minic: the middle and back end of a compiler for a small imperative language.
//!
//! A parsed program tree goes in ([`compiler_frontend::ast`]), MIPS assembly comes out
//! ([`backends::mips`]). Along the way the tree is lowered to three address code and
//! constant folded, as an analysis artifact the assembly is not generated from.

pub mod compiler_frontend;

pub mod backends {
    pub mod mips;
}

pub mod build_system {
    pub mod build;
}

pub mod projects {
    // The command-line driver
    pub mod cli;
    pub mod settings;
}

pub use build_system::build::{CompilationOutput, build, compile_tree};
pub use projects::settings::Config;
