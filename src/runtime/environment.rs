use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::runtime::Value;

/// Lexical scope handle
///
/// Cloning the handle aliases the same scope: a binding changed through one
/// clone is visible through every other clone, and through every closure that
/// captured it.
#[derive(Clone)]
pub struct Environment {
    scope: Rc<Scope>,
}

/// Single scope in the chain
struct Scope {
    /// Variables defined in this scope
    variables: RefCell<BTreeMap<String, Value>>,
    /// Enclosing scope (None for the global scope)
    parent: Option<Environment>,
}

impl Environment {
    /// Creates a new root scope
    pub fn new() -> Self {
        Environment {
            scope: Rc::new(Scope {
                variables: RefCell::new(BTreeMap::new()),
                parent: None,
            }),
        }
    }

    /// Creates an empty scope nested in `parent`
    pub fn with_parent(parent: &Environment) -> Self {
        Environment {
            scope: Rc::new(Scope {
                variables: RefCell::new(BTreeMap::new()),
                parent: Some(parent.clone()),
            }),
        }
    }

    /// Enclosing scope, if any
    pub fn parent(&self) -> Option<&Environment> {
        self.scope.parent.as_ref()
    }

    /// Outermost scope of the chain
    pub fn root(&self) -> Environment {
        let mut env = self;
        while let Some(parent) = env.parent() {
            env = parent;
        }
        env.clone()
    }

    /// Gets the value bound to `name` here or in the nearest enclosing scope
    pub fn lookup(&self, name: &str) -> Result<Value> {
        let mut env = self;
        loop {
            if let Some(val) = env.scope.variables.borrow().get(name) {
                return Ok(val.clone());
            }
            match env.parent() {
                Some(parent) => env = parent,
                None => return Err(Error::unbound(name)),
            }
        }
    }

    /// Binds a new name in this scope
    ///
    /// Fails if the name is already bound in this scope; shadowing a binding
    /// of an enclosing scope is fine.
    pub fn define(&self, name: &str, value: Value) -> Result<()> {
        let mut variables = self.scope.variables.borrow_mut();
        if variables.contains_key(name) {
            return Err(Error::DuplicateDefinition {
                name: name.to_string(),
            });
        }
        variables.insert(name.to_string(), value);
        Ok(())
    }

    /// Rebinds a name that already exists in this scope (parents are not searched)
    pub fn assign(&self, name: &str, value: Value) -> Result<()> {
        match self.scope.variables.borrow_mut().get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Error::NameError {
                name: name.to_string(),
                reason: " in the current scope".to_string(),
            }),
        }
    }

    /// Rebinds the nearest existing binding of `name`, searching outward
    pub fn assign_non_local(&self, name: &str, value: Value) -> Result<()> {
        let mut env = self;
        loop {
            if let Some(slot) = env.scope.variables.borrow_mut().get_mut(name) {
                *slot = value;
                return Ok(());
            }
            match env.parent() {
                Some(parent) => env = parent,
                None => return Err(Error::unbound(name)),
            }
        }
    }

    /// Inserts or replaces a binding in this scope without the duplicate check
    ///
    /// Only used to seed the global scope with builtins.
    pub(crate) fn bind(&self, name: &str, value: Value) {
        self.scope
            .variables
            .borrow_mut()
            .insert(name.to_string(), value);
    }

    /// Checks whether `name` is bound in this scope itself
    pub fn contains_local(&self, name: &str) -> bool {
        self.scope.variables.borrow().contains_key(name)
    }

    /// Checks whether `name` is bound anywhere in the chain
    pub fn exists(&self, name: &str) -> bool {
        self.lookup(name).is_ok()
    }

    /// This scope's own bindings, sorted by name
    pub fn local_bindings(&self) -> Vec<(String, Value)> {
        self.scope
            .variables
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Returns the scope depth (1 for a root scope)
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut env = self;
        while let Some(parent) = env.parent() {
            depth += 1;
            env = parent;
        }
        depth
    }

    /// True when both handles refer to the same scope
    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.scope, &other.scope)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let names: Vec<String> = self.scope.variables.borrow().keys().cloned().collect();
        f.debug_struct("Environment")
            .field("depth", &self.depth())
            .field("names", &names)
            .finish()
    }
}
