pub mod ast_display;
pub mod ast_nodes;
