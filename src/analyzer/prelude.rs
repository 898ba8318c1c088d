//! Entities visible to every program before its first statement.

use crate::ast::types::Type;

#[derive(Debug, Clone, PartialEq)]
pub struct PreludeFunction {
    pub name: String,
    pub param_types: Vec<Type>,
    pub return_type: Type,
}

/// The set of predeclared entities the analyzer installs in the root scope.
///
/// Prelude variables are always read-only. Programs may shadow any prelude
/// entity, since their top-level scope is a child of the root scope.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Prelude {
    variables: Vec<(String, Type)>,
    functions: Vec<PreludeFunction>,
}

impl Prelude {
    pub fn empty() -> Self {
        Prelude::default()
    }

    /// The Kobe standard library.
    pub fn standard() -> Self {
        Prelude::empty()
            .with_variable("π", Type::Num)
            .with_function("sqrt", vec![Type::Num], Type::Num)
            .with_function("sin", vec![Type::Num], Type::Num)
            .with_function("cos", vec![Type::Num], Type::Num)
            .with_function("exp", vec![Type::Num], Type::Num)
            .with_function("ln", vec![Type::Num], Type::Num)
            .with_function("hypot", vec![Type::Num, Type::Num], Type::Num)
    }

    pub fn with_variable(mut self, name: &str, ty: Type) -> Self {
        self.variables.push((name.to_string(), ty));
        self
    }

    pub fn with_function(mut self, name: &str, param_types: Vec<Type>, return_type: Type) -> Self {
        self.functions.push(PreludeFunction {
            name: name.to_string(),
            param_types,
            return_type,
        });
        self
    }

    pub fn variables(&self) -> &[(String, Type)] {
        &self.variables
    }

    pub fn functions(&self) -> &[PreludeFunction] {
        &self.functions
    }
}
