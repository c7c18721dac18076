use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::value::Value;

/// One lexical scope: name→value bindings plus a link to the enclosing
/// scope. Cloning is cheap and shares the underlying scope.
#[derive(Debug, Clone)]
pub struct Environment {
    inner: Rc<RefCell<EnvironmentData>>,
}

#[derive(Debug)]
struct EnvironmentData {
    bindings: HashMap<String, Value>,
    parent: Option<Environment>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            inner: Rc::new(RefCell::new(EnvironmentData {
                bindings: HashMap::new(),
                parent: None,
            })),
        }
    }

    pub fn new_enclosed(parent: Environment) -> Self {
        Environment {
            inner: Rc::new(RefCell::new(EnvironmentData {
                bindings: HashMap::new(),
                parent: Some(parent),
            })),
        }
    }

    /// Walks outward through the scope chain; `None` means unbound.
    pub fn get(&self, name: &str) -> Option<Value> {
        let parent = {
            let borrowed = self.inner.borrow();
            if let Some(value) = borrowed.bindings.get(name) {
                return Some(value.clone());
            }
            borrowed.parent.clone()
        };

        parent.and_then(|scope| scope.get(name))
    }

    /// Binds in the current (innermost) scope, shadowing any outer
    /// binding of the same name.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.inner.borrow_mut().bindings.insert(name.into(), value);
    }

    /// Mutates the binding at the scope where `name` was declared.
    /// Returns false if the name is not visible anywhere in the chain.
    pub fn assign(&self, name: &str, value: &Value) -> bool {
        let parent = {
            let mut borrowed = self.inner.borrow_mut();
            if borrowed.bindings.contains_key(name) {
                borrowed.bindings.insert(name.to_string(), value.clone());
                return true;
            }
            borrowed.parent.clone()
        };

        parent.is_some_and(|scope| scope.assign(name, value))
    }

    /// The single write primitive the interpreter routes both declarations
    /// and assignments through: an already-visible name is mutated at its
    /// declaring scope, an unknown name is declared in the current scope.
    pub fn set(&self, name: &str, value: Value) {
        if !self.assign(name, &value) {
            self.define(name, value);
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
