use crate::compiler_frontend::ast::ast_nodes::ValueType;
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::symbol_table::symbols::{
    FIRST_PARAMETER_OFFSET, MAX_PARAMETERS, StorageBase, Symbol, SymbolKind, WORD_SIZE,
};
use crate::{
    return_arity_error, return_compiler_error, return_redeclaration_error, return_rule_error,
    symbol_log,
};
use rustc_hash::FxHashMap;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,

    // A fresh stack frame: locals start right below the frame pointer
    Function,

    // A nested lexical level inside the current frame
    Block,
}

/// One lexical level: its symbols in declaration order plus the storage cursors.
#[derive(Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    symbols: Vec<Symbol>,
    index: FxHashMap<String, usize>,
    base: StorageBase,
    next_local_offset: i32,
    next_param_offset: i32,
    param_count: usize,
}

impl Scope {
    fn new(
        kind: ScopeKind,
        base: StorageBase,
        next_local_offset: i32,
        next_param_offset: i32,
    ) -> Scope {
        Scope {
            kind,
            symbols: Vec::new(),
            index: FxHashMap::default(),
            base,
            next_local_offset,
            next_param_offset,
            param_count: 0,
        }
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.index.get(name).map(|&i| &self.symbols[i])
    }

    pub fn next_local_offset(&self) -> i32 {
        self.next_local_offset
    }

    fn push(&mut self, symbol: Symbol) {
        self.index.insert(symbol.name.clone(), self.symbols.len());
        self.symbols.push(symbol);
    }
}

/// The chain of lexical scopes active during code generation.
///
/// Scopes live on a stack, the bottom entry is the global scope and is never popped.
/// Names may be shadowed by a deeper scope but never declared twice in the same one.
#[derive(Debug)]
pub struct ScopeTable {
    scopes: Vec<Scope>,
}

impl Default for ScopeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTable {
    pub fn new() -> Self {
        ScopeTable {
            scopes: vec![Scope::new(
                ScopeKind::Global,
                StorageBase::GlobalData,
                0,
                FIRST_PARAMETER_OFFSET,
            )],
        }
    }

    /// Opens the scope for a new function frame
    pub fn enter_scope(&mut self) {
        symbol_log!("Entering function scope at depth ", #self.scopes.len());
        self.scopes.push(Scope::new(
            ScopeKind::Function,
            StorageBase::FramePointer,
            0,
            FIRST_PARAMETER_OFFSET,
        ));
    }

    /// Opens a nested scope that keeps allocating in the enclosing frame
    pub fn enter_block_scope(&mut self) {
        let parent = self.current_scope();
        let block = Scope::new(
            ScopeKind::Block,
            parent.base,
            parent.next_local_offset,
            parent.next_param_offset,
        );
        self.scopes.push(block);
    }

    /// Drops the current scope and all of its symbols.
    /// Exiting the global scope does nothing.
    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        } else {
            symbol_log!(Yellow "Ignoring exit_scope on the global scope");
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Bytes of local storage handed out so far in the current frame (or global block)
    pub fn current_frame_size(&self) -> i32 {
        let scope = self.current_scope();
        match scope.base {
            StorageBase::GlobalData => scope.next_local_offset,
            _ => scope.next_local_offset.saturating_neg(),
        }
    }

    pub fn is_global(&self) -> bool {
        self.scopes.len() == 1
    }

    pub fn current_scope(&self) -> &Scope {
        // The global scope is never popped
        &self.scopes[self.scopes.len() - 1]
    }

    fn current_scope_mut(&mut self) -> &mut Scope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    pub fn is_in_current_scope(&self, name: &str) -> bool {
        self.current_scope().get(name).is_some()
    }

    /// Declares a scalar or array in the current scope and returns its offset.
    pub fn declare(&mut self, name: &str, kind: SymbolKind) -> Result<i32, CompilerError> {
        if !matches!(
            kind,
            SymbolKind::Scalar | SymbolKind::Array { .. } | SymbolKind::Array2d { .. }
        ) {
            return_compiler_error!(format!(
                "Tried to declare the {} '{name}' as storage",
                kind.describe()
            ));
        }

        self.check_redeclaration(name, &kind)?;

        let bytes = match i32::try_from(kind.slots())
            .ok()
            .and_then(|slots| slots.checked_mul(WORD_SIZE))
        {
            Some(bytes) => bytes,
            None => return_rule_error!(
                format!("The {} '{name}' is too large to fit in a stack frame", kind.describe()),
                { VariableName => name }
            ),
        };

        let scope = self.current_scope_mut();

        // Globals grow upward through the data block,
        // frame storage grows downward away from the frame pointer.
        let offset = match scope.base {
            StorageBase::GlobalData => {
                let offset = scope.next_local_offset;
                scope.next_local_offset = offset.saturating_add(bytes);
                offset
            }
            _ => {
                scope.next_local_offset = scope.next_local_offset.saturating_sub(bytes);
                scope.next_local_offset
            }
        };

        let base = scope.base;
        symbol_log!("Declared ", Green name, " at offset ", #offset);
        scope.push(Symbol {
            name: name.to_owned(),
            kind,
            offset,
            base,
        });

        Ok(offset)
    }

    /// Declares a parameter of the current function and returns its offset above the frame pointer.
    pub fn declare_parameter(
        &mut self,
        name: &str,
        param_type: ValueType,
    ) -> Result<i32, CompilerError> {
        let kind = SymbolKind::Parameter { param_type };
        self.check_redeclaration(name, &kind)?;

        let scope = self.current_scope_mut();
        if scope.param_count >= MAX_PARAMETERS {
            return_arity_error!(
                format!("Parameter '{name}' exceeds the limit of {MAX_PARAMETERS} parameters"),
                {
                    VariableName => name,
                    ExpectedCount => MAX_PARAMETERS,
                    FoundCount => scope.param_count + 1,
                }
            );
        }

        let offset = scope.next_param_offset;
        scope.next_param_offset += WORD_SIZE;
        scope.param_count += 1;

        symbol_log!("Declared parameter ", Green name, " at offset ", #offset);
        scope.push(Symbol {
            name: name.to_owned(),
            kind,
            offset,
            base: StorageBase::FramePointer,
        });

        Ok(offset)
    }

    pub fn declare_function(
        &mut self,
        name: &str,
        return_type: ValueType,
        param_types: Vec<ValueType>,
    ) -> Result<(), CompilerError> {
        let kind = SymbolKind::Function {
            return_type,
            param_types,
        };
        self.check_redeclaration(name, &kind)?;

        symbol_log!("Declared function ", Green name);
        self.current_scope_mut().push(Symbol {
            name: name.to_owned(),
            kind,
            offset: 0,
            base: StorageBase::Code,
        });

        Ok(())
    }

    /// Finds the innermost symbol with this name
    pub fn resolve(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    fn check_redeclaration(&self, name: &str, kind: &SymbolKind) -> Result<(), CompilerError> {
        if self.is_in_current_scope(name) {
            return_redeclaration_error!(
                format!("{} '{name}' already declared in this scope", capitalise(kind.describe())),
                {
                    VariableName => name,
                    PrimarySuggestion => "Rename it, or declare it in a nested scope to shadow the existing one",
                }
            );
        }

        Ok(())
    }

    /// Renders every live scope, innermost first
    pub fn display_scopes(&self) -> String {
        let mut out = String::from("\n=== SYMBOL TABLE STATE ===\n");

        for (level, scope) in self.scopes.iter().rev().enumerate() {
            let _ = writeln!(
                out,
                "Scope Level {level}: Count={}, NextOffset={}",
                scope.symbols.len(),
                scope.next_local_offset
            );

            if scope.symbols.is_empty() {
                out.push_str("  (empty)\n");
                continue;
            }

            out.push_str("  Variables:\n");
            for (i, symbol) in scope.symbols.iter().enumerate() {
                let _ = writeln!(out, "    [{i}] {symbol}");
            }
        }

        out.push_str("==========================\n");
        out
    }
}

fn capitalise(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
