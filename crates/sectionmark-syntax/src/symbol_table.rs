//! Interned strings shared between documents.
//!
//! Tag names and type labels repeat across every section of a notebook, so the
//! parser stores them as [`Symbol`]s: interning the same text twice hands back
//! the same allocation. `Arc` rather than `Rc` so parsed documents can be moved
//! to other threads.

use std::collections::HashSet;
use std::sync::Arc;

/// An interned string; cloning only bumps a reference count.
pub type Symbol = Arc<str>;

#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    symbols: HashSet<Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `s`, returning the shared copy.
    pub fn intern(&mut self, s: &str) -> Symbol {
        if let Some(existing) = self.symbols.get(s) {
            return Arc::clone(existing);
        }
        let symbol: Symbol = Arc::from(s);
        self.symbols.insert(Arc::clone(&symbol));
        symbol
    }

    /// Look up `s` without interning it.
    pub fn get(&self, s: &str) -> Option<Symbol> {
        self.symbols.get(s).cloned()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn clear(&mut self) {
        self.symbols.clear();
    }
}
