pub(crate) mod mips_simulator;

mod mips_codegen_tests;
