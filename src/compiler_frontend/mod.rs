//! Everything between a parsed program tree and a backend:
//! the tree itself, the scope table, TAC lowering and the TAC optimizer.

pub mod ast;
pub mod symbol_table;
pub mod tac;

pub mod optimizers {
    pub mod constant_folding;

    #[cfg(test)]
    mod tests;
}

pub mod compiler_messages {
    pub mod compiler_dev_logging;
    pub mod compiler_errors;
    pub mod compiler_warnings;
    pub mod display_messages;
}
pub use compiler_messages::compiler_errors;
pub use compiler_messages::compiler_warnings;
pub use compiler_messages::display_messages;
