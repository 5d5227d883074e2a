pub mod tac_builder;
pub mod tac_display;
pub mod tac_nodes;

#[cfg(test)]
pub(crate) mod tests;
