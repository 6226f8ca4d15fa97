//! Lexically scoped symbol resolution.
//!
//! Scopes form a chain via `outer`. Resolving a name defined in an
//! enclosing function (not global, not builtin) rewrites it into a free
//! variable of the current scope — that rewriting is what turns nested
//! functions into closures.

use std::collections::HashMap;

/// Where a symbol lives at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolScope {
    Global,
    Local,
    Builtin,
    Free,
    /// The name of the function currently being compiled; loads as
    /// `OpCurrentClosure` so recursion works without a binding.
    Function,
}

/// A resolved name: where it lives and at which index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub scope: SymbolScope,
    pub index: usize,
}

/// One scope's definitions plus the link to its enclosing scope.
#[derive(Debug, Default)]
pub struct SymbolTable {
    pub outer: Option<Box<SymbolTable>>,
    store: HashMap<String, Symbol>,
    pub num_definitions: usize,
    /// Symbols captured from enclosing scopes, in capture order.
    pub free_symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_enclosed(outer: SymbolTable) -> Self {
        Self {
            outer: Some(Box::new(outer)),
            ..Self::default()
        }
    }

    /// Define a name in this scope, assigning it the next index.
    pub fn define(&mut self, name: &str) -> Symbol {
        let scope = if self.outer.is_none() {
            SymbolScope::Global
        } else {
            SymbolScope::Local
        };
        let symbol = Symbol {
            name: name.to_string(),
            scope,
            index: self.num_definitions,
        };
        self.store.insert(name.to_string(), symbol.clone());
        self.num_definitions += 1;
        symbol
    }

    /// Register a builtin at a fixed index. Only sensible on the
    /// outermost table.
    pub fn define_builtin(&mut self, index: usize, name: &str) -> Symbol {
        let symbol = Symbol {
            name: name.to_string(),
            scope: SymbolScope::Builtin,
            index,
        };
        self.store.insert(name.to_string(), symbol.clone());
        symbol
    }

    /// Register the enclosing function's own name so its body can refer to
    /// itself.
    pub fn define_function_name(&mut self, name: &str) -> Symbol {
        let symbol = Symbol {
            name: name.to_string(),
            scope: SymbolScope::Function,
            index: 0,
        };
        self.store.insert(name.to_string(), symbol.clone());
        symbol
    }

    fn define_free(&mut self, original: Symbol) -> Symbol {
        self.free_symbols.push(original.clone());
        let symbol = Symbol {
            name: original.name,
            scope: SymbolScope::Free,
            index: self.free_symbols.len() - 1,
        };
        self.store.insert(symbol.name.clone(), symbol.clone());
        symbol
    }

    /// Look a name up, searching outward. A hit in an enclosing function
    /// scope is captured as a free variable of this scope.
    pub fn resolve(&mut self, name: &str) -> Option<Symbol> {
        if let Some(symbol) = self.store.get(name) {
            return Some(symbol.clone());
        }

        let symbol = self.outer.as_mut()?.resolve(name)?;
        match symbol.scope {
            SymbolScope::Global | SymbolScope::Builtin => Some(symbol),
            _ => Some(self.define_free(symbol)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(name: &str, index: usize) -> Symbol {
        Symbol {
            name: name.to_string(),
            scope: SymbolScope::Global,
            index,
        }
    }

    fn local(name: &str, index: usize) -> Symbol {
        Symbol {
            name: name.to_string(),
            scope: SymbolScope::Local,
            index,
        }
    }

    fn free(name: &str, index: usize) -> Symbol {
        Symbol {
            name: name.to_string(),
            scope: SymbolScope::Free,
            index,
        }
    }

    #[test]
    fn define_and_resolve_global() {
        let mut table = SymbolTable::new();
        assert_eq!(table.define("a"), global("a", 0));
        assert_eq!(table.define("b"), global("b", 1));
        assert_eq!(table.resolve("a"), Some(global("a", 0)));
        assert_eq!(table.resolve("b"), Some(global("b", 1)));
        assert_eq!(table.resolve("c"), None);
    }

    #[test]
    fn resolve_local_and_global() {
        let mut outer = SymbolTable::new();
        outer.define("a");
        outer.define("b");

        let mut inner = SymbolTable::new_enclosed(outer);
        inner.define("c");
        inner.define("d");

        assert_eq!(inner.resolve("a"), Some(global("a", 0)));
        assert_eq!(inner.resolve("b"), Some(global("b", 1)));
        assert_eq!(inner.resolve("c"), Some(local("c", 0)));
        assert_eq!(inner.resolve("d"), Some(local("d", 1)));
    }

    #[test]
    fn resolve_nested_locals() {
        let mut outer = SymbolTable::new();
        outer.define("a");

        let mut first = SymbolTable::new_enclosed(outer);
        first.define("c");

        let mut second = SymbolTable::new_enclosed(first);
        second.define("e");
        second.define("f");

        assert_eq!(second.resolve("a"), Some(global("a", 0)));
        assert_eq!(second.resolve("e"), Some(local("e", 0)));
        assert_eq!(second.resolve("f"), Some(local("f", 1)));
    }

    #[test]
    fn resolve_builtins_from_any_depth() {
        let mut outer = SymbolTable::new();
        outer.define_builtin(0, "len");
        outer.define_builtin(1, "puts");

        let mut inner = SymbolTable::new_enclosed(SymbolTable::new_enclosed(outer));

        let expected = Symbol {
            name: "len".to_string(),
            scope: SymbolScope::Builtin,
            index: 0,
        };
        assert_eq!(inner.resolve("len"), Some(expected));
    }

    #[test]
    fn resolve_free_variables() {
        let mut outer = SymbolTable::new();
        outer.define("a");
        outer.define("b");

        let mut first = SymbolTable::new_enclosed(outer);
        first.define("c");
        first.define("d");

        let mut second = SymbolTable::new_enclosed(first);
        second.define("e");
        second.define("f");

        // Locals of the directly enclosing function become free here.
        assert_eq!(second.resolve("c"), Some(free("c", 0)));
        assert_eq!(second.resolve("d"), Some(free("d", 1)));
        // Globals stay global.
        assert_eq!(second.resolve("a"), Some(global("a", 0)));
        assert_eq!(second.resolve("b"), Some(global("b", 1)));
        // And the capture order is recorded.
        assert_eq!(second.free_symbols, vec![local("c", 0), local("d", 1)]);
    }

    #[test]
    fn unresolvable_free_variable() {
        let mut outer = SymbolTable::new();
        outer.define("a");

        let mut first = SymbolTable::new_enclosed(outer);
        first.define("c");

        let mut second = SymbolTable::new_enclosed(first);
        second.define("e");

        assert_eq!(second.resolve("b"), None);
        assert!(second.free_symbols.is_empty());
    }

    #[test]
    fn define_and_resolve_function_name() {
        let mut table = SymbolTable::new();
        table.define_function_name("a");

        let expected = Symbol {
            name: "a".to_string(),
            scope: SymbolScope::Function,
            index: 0,
        };
        assert_eq!(table.resolve("a"), Some(expected));
    }

    #[test]
    fn shadowing_function_name() {
        let mut table = SymbolTable::new();
        table.define_function_name("a");
        table.define("a");

        assert_eq!(table.resolve("a"), Some(global("a", 0)));
    }
}
