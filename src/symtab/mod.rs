use std::collections::HashMap;


/// A chain of scopes that lookups and updates can walk outward through.
pub trait Scope<T> {
    fn lookup(&self, name: &str) -> Option<&T>;
    fn lookup_mut(&mut self, name: &str) -> Option<&mut T>;
}

/// One lexical scope. The parent is borrowed, never owned, so a child can
/// only live while the scope that created it is not otherwise in use.
pub struct SymTab<'a, T> {
    symbols: HashMap<String, T>,
    parent: Option<&'a mut dyn Scope<T>>,
}

impl<T> SymTab<'static, T> {
    pub fn new() -> Self {
        SymTab {
            symbols: HashMap::new(),
            parent: None,
        }
    }
}

impl<T> Default for SymTab<'static, T> {
    fn default() -> Self {
        SymTab::new()
    }
}

impl<T> FromIterator<(String, T)> for SymTab<'static, T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        SymTab {
            symbols: iter.into_iter().collect(),
            parent: None,
        }
    }
}

impl<'a, T> SymTab<'a, T> {
    pub fn create_child(&mut self) -> SymTab<'_, T> {
        SymTab {
            symbols: HashMap::new(),
            parent: Some(self),
        }
    }

    /// Binds `name` in this scope only, shadowing any outer binding.
    /// Returns the payload it replaced in this same scope, if any.
    pub fn define(&mut self, name: impl Into<String>, value: T) -> Option<T> {
        self.symbols.insert(name.into(), value)
    }

    /// Overwrites the nearest existing binding. Hands the value back when
    /// no enclosing scope knows the name.
    pub fn set(&mut self, name: &str, value: T) -> Result<(), T> {
        match self.lookup_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(value),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn defined_here(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }
}

impl<T> Scope<T> for SymTab<'_, T> {
    fn lookup(&self, name: &str) -> Option<&T> {
        match self.symbols.get(name) {
            Some(value) => Some(value),
            None => self.parent.as_deref().and_then(|parent| parent.lookup(name)),
        }
    }

    fn lookup_mut(&mut self, name: &str) -> Option<&mut T> {
        match self.symbols.get_mut(name) {
            Some(value) => Some(value),
            None => self
                .parent
                .as_deref_mut()
                .and_then(|parent| parent.lookup_mut(name)),
        }
    }
}
