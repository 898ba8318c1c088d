//! The scope chain used for identifier resolution.
//!
//! Scopes live in an arena and point at their parent by index. The analyzer
//! walks the chain with [`ScopeChain::enter_child_scope`] and
//! [`ScopeChain::exit_scope`]; lookups go from the current scope outwards.

use std::{collections::HashMap, rc::Rc};

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::typed_ast::{Entity, EntityKind, Function, Variable};

pub type ScopeId = usize;

#[derive(Debug)]
pub struct Scope {
    pub parent: Option<ScopeId>,
    pub entities: HashMap<String, Entity>,
    /// The job whose body this scope belongs to, inherited from the parent
    pub function: Option<Rc<Function>>,
}

impl Scope {
    pub fn new(parent: Option<ScopeId>, function: Option<Rc<Function>>) -> Self {
        Scope {
            parent,
            entities: HashMap::new(),
            function,
        }
    }

    pub fn declare(&mut self, name: &str, entity: Entity, position: Option<Position>) -> Result<(), Error> {
        if self.entities.contains_key(name) {
            Err(Error::new(ErrorImpl::DuplicateDeclaration { name: name.to_string() }, position))
        } else {
            self.entities.insert(name.to_string(), entity);
            Ok(())
        }
    }

    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }
}

#[derive(Debug)]
pub struct ScopeChain {
    scopes: Vec<Scope>,
    current: ScopeId,
}

impl ScopeChain {
    /// Creates a chain holding only the root scope.
    pub fn new() -> Self {
        ScopeChain {
            scopes: vec![Scope::new(None, None)],
            current: 0,
        }
    }

    pub fn current(&self) -> ScopeId {
        self.current
    }

    pub fn get_scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id)
    }

    /// Registers a new scope below `parent`. A child of a job body stays in
    /// that job unless `function` starts a new one.
    pub fn child_scope(&mut self, parent: ScopeId, function: Option<Rc<Function>>) -> ScopeId {
        let function = function.or_else(|| self.scopes.get(parent).and_then(|scope| scope.function.clone()));
        self.scopes.push(Scope::new(Some(parent), function));
        self.scopes.len() - 1
    }

    pub fn enter_child_scope(&mut self, function: Option<Rc<Function>>) -> ScopeId {
        let id = self.child_scope(self.current, function);
        tracing::trace!(scope = id, parent = self.current, "enter scope");
        self.current = id;
        id
    }

    /// Moves back to the parent of the current scope. The root scope is never left.
    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current].parent {
            tracing::trace!(scope = self.current, parent, "exit scope");
            self.current = parent;
        }
    }

    pub fn enclosing_function(&self) -> Option<Rc<Function>> {
        self.scopes[self.current].function.clone()
    }

    /// Binds `name` in the current scope.
    pub fn declare(&mut self, name: &str, entity: Entity, position: Option<Position>) -> Result<(), Error> {
        tracing::debug!(name, kind = %entity.kind(), scope = self.current, "declare");
        self.scopes[self.current].declare(name, entity, position)
    }

    /// Finds the innermost binding of `name` visible from the current scope.
    pub fn resolve(&self, name: &str, position: Option<Position>) -> Result<Entity, Error> {
        let mut scope_id = Some(self.current);

        while let Some(id) = scope_id {
            let scope = &self.scopes[id];
            if let Some(entity) = scope.get(name) {
                tracing::trace!(name, scope = id, "resolved");
                return Ok(entity.clone());
            }
            scope_id = scope.parent;
        }

        Err(Error::new(ErrorImpl::UndeclaredIdentifier { name: name.to_string() }, position))
    }

    pub fn resolve_as(&self, name: &str, expected: EntityKind, position: Option<Position>) -> Result<Entity, Error> {
        let entity = self.resolve(name, position.clone())?;

        if entity.kind() != expected {
            return Err(Error::new(
                ErrorImpl::TypeMismatch {
                    expected: expected.to_string(),
                    received: entity.kind().to_string(),
                },
                position,
            ));
        }

        Ok(entity)
    }

    /// Resolves `name` and requires it to be bound to a variable.
    pub fn resolve_variable(&self, name: &str, position: Option<Position>) -> Result<Rc<Variable>, Error> {
        match self.resolve(name, position.clone())? {
            Entity::Variable(variable) => Ok(variable),
            entity => Err(Error::new(
                ErrorImpl::TypeMismatch {
                    expected: EntityKind::Variable.to_string(),
                    received: entity.kind().to_string(),
                },
                position,
            )),
        }
    }
}

impl Default for ScopeChain {
    fn default() -> Self {
        Self::new()
    }
}
