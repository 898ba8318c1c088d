//! Typed Abstract Syntax Tree definitions.
//!
//! This module contains the analyzed form of the syntax tree produced by
//! the analyzer and rewritten by the optimizer. Compared to the input tree:
//!
//! - Every expression carries its resolved type
//! - Literal leaves hold native values instead of lexemes
//! - Identifier leaves hold the entity they resolved to
//! - Operators are decoded into their enum form
//!
//! Entities are shared through `Rc`, so a declaration and every reference to
//! it point at the same `Variable` or `Function`.

use std::{fmt::Display, rc::Rc};

use crate::{
    ast::{
        ast::{BinaryOperator, UnaryOperator},
        types::{FunctionType, Type},
    },
    pretty_print, Position,
};

/// A variable binding. Parameters, coil induction variables and prelude
/// constants are read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Unique within one analysis run
    pub id: usize,
    pub name: String,
    pub ty: Type,
    pub read_only: bool,
}

/// A job (function) binding.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Unique within one analysis run
    pub id: usize,
    pub name: String,
    pub param_types: Vec<Type>,
    pub return_type: Type,
}

impl Function {
    pub fn function_type(&self) -> FunctionType {
        FunctionType::new(self.param_types.clone(), self.return_type.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Variable,
    Function,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Variable => write!(f, "Variable"),
            EntityKind::Function => write!(f, "Function"),
        }
    }
}

/// Anything a name can be bound to in a scope.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Variable(Rc<Variable>),
    Function(Rc<Function>),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Variable(_) => EntityKind::Variable,
            Entity::Function(_) => EntityKind::Function,
        }
    }

    pub fn ty(&self) -> Type {
        match self {
            Entity::Variable(variable) => variable.ty.clone(),
            Entity::Function(function) => Type::Function(function.function_type()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedProgram {
    pub statements: Vec<TypedStmt>,
}

impl TypedProgram {
    /// Indented dump of the tree, for debugging.
    pub fn pretty(&self) -> String {
        pretty_print(format!("{:?}", self))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedCall {
    pub callee: Rc<Function>,
    pub arguments: Vec<TypedExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedStmt {
    VariableDeclaration {
        variable: Rc<Variable>,
        initializer: TypedExpr,
    },
    FunctionDeclaration {
        function: Rc<Function>,
        parameters: Vec<Rc<Variable>>,
        body: Vec<TypedStmt>,
    },
    Reassignment {
        target: Rc<Variable>,
        source: TypedExpr,
    },
    Print {
        argument: TypedExpr,
    },
    Output {
        expression: TypedExpr,
    },
    If {
        test: TypedExpr,
        consequent: Vec<TypedStmt>,
        alternate: Option<Vec<TypedStmt>>,
    },
    While {
        test: TypedExpr,
        body: Vec<TypedStmt>,
    },
    Repeat {
        count: TypedExpr,
        body: Vec<TypedStmt>,
    },
    Coil {
        induction: Rc<Variable>,
        low: TypedExpr,
        high: TypedExpr,
        body: Vec<TypedStmt>,
    },
    Increment {
        target: Rc<Variable>,
    },
    Decrement {
        target: Rc<Variable>,
    },
    Call(TypedCall),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedExpr {
    pub kind: TypedExprKind,
    pub ty: Type,
    pub position: Option<Position>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedExprKind {
    Num(f64),
    Baal(bool),
    Quote(String),
    Variable(Rc<Variable>),
    Binary {
        operator: BinaryOperator,
        left: Box<TypedExpr>,
        right: Box<TypedExpr>,
    },
    Unary {
        operator: UnaryOperator,
        operand: Box<TypedExpr>,
    },
    Call(TypedCall),
}

impl TypedExpr {
    pub fn num(value: f64, position: Option<Position>) -> Self {
        TypedExpr {
            kind: TypedExprKind::Num(value),
            ty: Type::Num,
            position,
        }
    }

    pub fn baal(value: bool, position: Option<Position>) -> Self {
        TypedExpr {
            kind: TypedExprKind::Baal(value),
            ty: Type::Baal,
            position,
        }
    }

    pub fn quote(value: String, position: Option<Position>) -> Self {
        TypedExpr {
            kind: TypedExprKind::Quote(value),
            ty: Type::Quote,
            position,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.kind {
            TypedExprKind::Num(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_baal(&self) -> Option<bool> {
        match self.kind {
            TypedExprKind::Baal(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self.kind,
            TypedExprKind::Num(_) | TypedExprKind::Baal(_) | TypedExprKind::Quote(_)
        )
    }

    /// Whether evaluating this expression calls a job anywhere inside it.
    pub fn contains_call(&self) -> bool {
        match &self.kind {
            TypedExprKind::Call(_) => true,
            TypedExprKind::Binary { left, right, .. } => {
                left.contains_call() || right.contains_call()
            }
            TypedExprKind::Unary { operand, .. } => operand.contains_call(),
            TypedExprKind::Num(_)
            | TypedExprKind::Baal(_)
            | TypedExprKind::Quote(_)
            | TypedExprKind::Variable(_) => false,
        }
    }
}
