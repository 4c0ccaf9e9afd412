//! Symbol table for preprocessor defines

use std::collections::HashMap;

/// Value of a preprocessor symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolValue {
    /// Symbol is undefined
    Undefined,
    /// Symbol is defined as false (0)
    False,
    /// Symbol is defined as true (non-zero or empty)
    True,
}

impl SymbolValue {
    /// Convert to boolean (undefined = false for evaluation)
    pub fn as_bool(self) -> bool {
        matches!(self, SymbolValue::True)
    }

    /// Check if symbol is defined (regardless of value)
    pub fn is_defined(self) -> bool {
        !matches!(self, SymbolValue::Undefined)
    }

    /// Value of `#define NAME <text>`: `0` is false, anything else
    /// (including nothing) is true
    pub fn from_definition(text: &str) -> Self {
        match text.trim().parse::<i64>() {
            Ok(0) => SymbolValue::False,
            _ => SymbolValue::True,
        }
    }
}

impl From<bool> for SymbolValue {
    fn from(value: bool) -> Self {
        if value {
            SymbolValue::True
        } else {
            SymbolValue::False
        }
    }
}

/// Symbol table mapping symbol names to values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: HashMap<String, SymbolValue>,
}

impl SymbolTable {
    /// Create a new empty symbol table
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a symbol with a value
    pub fn define(&mut self, name: &str, value: SymbolValue) {
        if value.is_defined() {
            self.symbols.insert(name.to_string(), value);
        } else {
            self.undefine(name);
        }
    }

    /// Undefine a symbol
    pub fn undefine(&mut self, name: &str) {
        self.symbols.remove(name);
    }

    /// Get the value of a symbol
    pub fn get(&self, name: &str) -> SymbolValue {
        self.symbols
            .get(name)
            .copied()
            .unwrap_or(SymbolValue::Undefined)
    }

    /// Check if a symbol is defined
    pub fn is_defined(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// All defined symbols, sorted
    pub fn defined_symbols(&self) -> Vec<String> {
        let mut names: Vec<String> = self.symbols.keys().cloned().collect();
        names.sort();
        names
    }
}

impl<S: AsRef<str>> FromIterator<S> for SymbolTable {
    /// Every name is defined as true
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut table = SymbolTable::new();
        for name in iter {
            table.define(name.as_ref(), SymbolValue::True);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_table() {
        let mut table = SymbolTable::new();

        assert_eq!(table.get("FOO"), SymbolValue::Undefined);
        assert!(!table.is_defined("FOO"));

        table.define("FOO", SymbolValue::True);
        assert_eq!(table.get("FOO"), SymbolValue::True);
        assert!(table.is_defined("FOO"));

        table.define("BAR", SymbolValue::False);
        assert_eq!(table.get("BAR"), SymbolValue::False);
        assert!(table.is_defined("BAR"));

        table.undefine("FOO");
        assert_eq!(table.get("FOO"), SymbolValue::Undefined);
        assert!(!table.is_defined("FOO"));

        table.define("BAR", SymbolValue::Undefined);
        assert!(!table.is_defined("BAR"));
    }

    #[test]
    fn test_from_flags() {
        let table: SymbolTable = ["B", "A"].into_iter().collect();
        assert_eq!(table.defined_symbols(), vec!["A", "B"]);
        assert!(table.get("A").as_bool());
    }

    #[test]
    fn test_from_definition() {
        assert_eq!(SymbolValue::from_definition(""), SymbolValue::True);
        assert_eq!(SymbolValue::from_definition(" 0 "), SymbolValue::False);
        assert_eq!(SymbolValue::from_definition("2"), SymbolValue::True);
        assert_eq!(SymbolValue::from_definition("something"), SymbolValue::True);
    }

    #[test]
    fn test_symbol_value_is_defined() {
        assert!(!SymbolValue::Undefined.is_defined());
        assert!(SymbolValue::False.is_defined());
        assert!(SymbolValue::True.is_defined());
        assert!(!SymbolValue::False.as_bool());
    }
}
