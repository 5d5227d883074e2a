pub mod scope_table;
pub mod symbols;

pub use scope_table::{Scope, ScopeKind, ScopeTable};
pub use symbols::{StorageBase, Symbol, SymbolKind};
