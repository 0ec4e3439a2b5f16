//! Bijection between IR values and solver symbols (spec §4.2).

use std::collections::HashMap;
use std::fmt;

use z0_ir::InstId;

/// Identifies the "source" an IR value's symbol is keyed on. Constants are
/// never symbolized — the expression builder renders them as literals
/// directly — so only arguments and instruction results pass through here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Argument(usize),
    Instr(InstId),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol(pub String);

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-function symbol table. `symbol_for` is idempotent; `lookup` never
/// creates an entry. A fresh table is constructed per function (the driver
/// gives each function its own `FunctionChecker`), so there is no
/// in-place-reset lifecycle to support.
#[derive(Debug, Default)]
pub struct SymbolTable {
    counter: u32,
    symbols: HashMap<ValueKey, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    pub fn symbol_for(&mut self, key: ValueKey) -> Symbol {
        if let Some(existing) = self.symbols.get(&key) {
            return existing.clone();
        }
        self.counter += 1;
        let symbol = Symbol(format!("s{}", self.counter));
        self.symbols.insert(key, symbol.clone());
        symbol
    }

    pub fn lookup(&self, key: &ValueKey) -> Option<Symbol> {
        self.symbols.get(key).cloned()
    }

    /// Drops a value's symbol mapping so the next `symbol_for` call for the
    /// same key mints a fresh one. Used by loop-cutting to havoc
    /// loop-carried values: the old symbol keeps meaning whatever it meant
    /// on entry to the loop, and uses after the cut get an unconstrained
    /// successor symbol instead.
    pub fn forget(&mut self, key: ValueKey) {
        self.symbols.remove(&key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_for_is_idempotent_and_distinct_across_keys() {
        let mut table = SymbolTable::new();
        let a = table.symbol_for(ValueKey::Argument(0));
        let a_again = table.symbol_for(ValueKey::Argument(0));
        let b = table.symbol_for(ValueKey::Instr(InstId(0)));

        assert_eq!(a, a_again);
        assert_ne!(a, b);
    }

    #[test]
    fn lookup_does_not_create_an_entry() {
        let table = SymbolTable::new();
        assert_eq!(table.lookup(&ValueKey::Argument(0)), None);
    }
}
