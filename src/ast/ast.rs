use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Position;

use super::tokens::{Token, TokenCategory};

lazy_static! {
    pub static ref BINARY_OPERATOR_LOOKUP: HashMap<&'static str, BinaryOperator> = {
        let mut map = HashMap::new();
        map.insert("add", BinaryOperator::Add);
        map.insert("minus", BinaryOperator::Minus);
        map.insert("multiply", BinaryOperator::Multiply);
        map.insert("divide", BinaryOperator::Divide);
        map.insert("mod", BinaryOperator::Mod);
        map.insert("to the", BinaryOperator::Power);
        map.insert("<", BinaryOperator::Less);
        map.insert(">", BinaryOperator::Greater);
        map.insert("==", BinaryOperator::Equals);
        map.insert("!=", BinaryOperator::NotEquals);
        map.insert("and", BinaryOperator::And);
        map.insert("or", BinaryOperator::Or);

        // Symbolic spellings
        map.insert("+", BinaryOperator::Add);
        map.insert("-", BinaryOperator::Minus);
        map.insert("*", BinaryOperator::Multiply);
        map.insert("/", BinaryOperator::Divide);
        map.insert("%", BinaryOperator::Mod);
        map.insert("^", BinaryOperator::Power);
        map.insert("&&", BinaryOperator::And);
        map.insert("||", BinaryOperator::Or);
        map
    };
    pub static ref UNARY_OPERATOR_LOOKUP: HashMap<&'static str, UnaryOperator> = {
        let mut map = HashMap::new();
        map.insert("!", UnaryOperator::Not);
        map.insert("-", UnaryOperator::Negate);
        map
    };
}

/// Binary operators, grouped by the rule the analyzer applies to them.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum BinaryOperator {
    // Arithmetic
    Add,
    Minus,
    Multiply,
    Divide,
    Mod,
    Power,

    // Comparison
    Less,
    Greater,

    // Equality
    Equals,
    NotEquals,

    // Logical
    And,
    Or,
}

impl BinaryOperator {
    pub fn from_lexeme(lexeme: &str) -> Option<BinaryOperator> {
        BINARY_OPERATOR_LOOKUP.get(lexeme).copied()
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Add
                | BinaryOperator::Minus
                | BinaryOperator::Multiply
                | BinaryOperator::Divide
                | BinaryOperator::Mod
                | BinaryOperator::Power
        )
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BinaryOperator::Add => "add",
            BinaryOperator::Minus => "minus",
            BinaryOperator::Multiply => "multiply",
            BinaryOperator::Divide => "divide",
            BinaryOperator::Mod => "mod",
            BinaryOperator::Power => "to the",
            BinaryOperator::Less => "<",
            BinaryOperator::Greater => ">",
            BinaryOperator::Equals => "==",
            BinaryOperator::NotEquals => "!=",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum UnaryOperator {
    Not,
    Negate,
}

impl UnaryOperator {
    pub fn from_lexeme(lexeme: &str) -> Option<UnaryOperator> {
        UNARY_OPERATOR_LOOKUP.get(lexeme).copied()
    }
}

impl Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOperator::Not => write!(f, "!"),
            UnaryOperator::Negate => write!(f, "-"),
        }
    }
}

/// A whole program: the top-level chunk of statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Program { statements }
    }
}

/// A typed name, used for function parameters and coil induction variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub type_name: Token,
    pub name: Token,
}

/// The header of a function declaration: `num job add(num a, num b)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub return_type: Token,
    pub name: Token,
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Token,
    pub arguments: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    VariableDeclaration {
        type_name: Token,
        name: Token,
        initializer: Expr,
    },
    FunctionDeclaration {
        function: FunctionSignature,
        body: Vec<Stmt>,
    },
    Reassignment {
        target: Token,
        source: Expr,
    },
    Print {
        argument: Expr,
    },
    Output {
        expression: Expr,
    },
    If {
        test: Expr,
        consequent: Vec<Stmt>,
        alternate: Option<Vec<Stmt>>,
    },
    While {
        test: Expr,
        body: Vec<Stmt>,
    },
    Repeat {
        count: Expr,
        body: Vec<Stmt>,
    },
    Coil {
        induction: Parameter,
        low: Expr,
        high: Expr,
        body: Vec<Stmt>,
    },
    Increment {
        target: Token,
    },
    Decrement {
        target: Token,
    },
    Call(CallExpr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Binary {
        operator: Token,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        operator: Token,
        operand: Box<Expr>,
    },
    Call(CallExpr),
    Leaf(Token),
}

impl Expr {
    /// Best known source position of the expression.
    pub fn position(&self) -> Option<&Position> {
        match self {
            Expr::Binary { operator, left, .. } => operator.position.as_ref().or_else(|| left.position()),
            Expr::Unary { operator, operand } => operator.position.as_ref().or_else(|| operand.position()),
            Expr::Call(call) => call.callee.position.as_ref(),
            Expr::Leaf(token) => token.position.as_ref(),
        }
    }
}

// Constructors used by front ends and tests to assemble trees.

impl Expr {
    pub fn id(name: &str) -> Expr {
        Expr::Leaf(Token::new(TokenCategory::Id, name))
    }

    pub fn num(lexeme: &str) -> Expr {
        Expr::Leaf(Token::new(TokenCategory::Num, lexeme))
    }

    pub fn baal(value: bool) -> Expr {
        Expr::Leaf(Token::new(TokenCategory::Baal, value.to_string()))
    }

    /// Builds a quote leaf; `text` is wrapped in double quotes as a front end
    /// would hand it over.
    pub fn quote(text: &str) -> Expr {
        Expr::Leaf(Token::new(TokenCategory::Quote, format!("\"{}\"", text)))
    }

    pub fn binary(operator: &str, left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            operator: Token::new(TokenCategory::Sym, operator),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(operator: &str, operand: Expr) -> Expr {
        Expr::Unary {
            operator: Token::new(TokenCategory::Sym, operator),
            operand: Box::new(operand),
        }
    }

    pub fn call(callee: &str, arguments: Vec<Expr>) -> Expr {
        Expr::Call(CallExpr {
            callee: Token::new(TokenCategory::Id, callee),
            arguments,
        })
    }
}

impl Parameter {
    pub fn new(type_name: &str, name: &str) -> Self {
        Parameter {
            type_name: Token::new(TokenCategory::Id, type_name),
            name: Token::new(TokenCategory::Id, name),
        }
    }
}

impl Stmt {
    pub fn var_decl(type_name: &str, name: &str, initializer: Expr) -> Stmt {
        Stmt::VariableDeclaration {
            type_name: Token::new(TokenCategory::Id, type_name),
            name: Token::new(TokenCategory::Id, name),
            initializer,
        }
    }

    pub fn function(return_type: &str, name: &str, parameters: Vec<Parameter>, body: Vec<Stmt>) -> Stmt {
        Stmt::FunctionDeclaration {
            function: FunctionSignature {
                return_type: Token::new(TokenCategory::Id, return_type),
                name: Token::new(TokenCategory::Id, name),
                parameters,
            },
            body,
        }
    }

    pub fn assign(target: &str, source: Expr) -> Stmt {
        Stmt::Reassignment {
            target: Token::new(TokenCategory::Id, target),
            source,
        }
    }

    pub fn print(argument: Expr) -> Stmt {
        Stmt::Print { argument }
    }

    pub fn output(expression: Expr) -> Stmt {
        Stmt::Output { expression }
    }

    pub fn if_else(test: Expr, consequent: Vec<Stmt>, alternate: Option<Vec<Stmt>>) -> Stmt {
        Stmt::If {
            test,
            consequent,
            alternate,
        }
    }

    pub fn while_loop(test: Expr, body: Vec<Stmt>) -> Stmt {
        Stmt::While { test, body }
    }

    pub fn repeat(count: Expr, body: Vec<Stmt>) -> Stmt {
        Stmt::Repeat { count, body }
    }

    pub fn coil(induction: Parameter, low: Expr, high: Expr, body: Vec<Stmt>) -> Stmt {
        Stmt::Coil {
            induction,
            low,
            high,
            body,
        }
    }

    pub fn increment(target: &str) -> Stmt {
        Stmt::Increment {
            target: Token::new(TokenCategory::Id, target),
        }
    }

    pub fn decrement(target: &str) -> Stmt {
        Stmt::Decrement {
            target: Token::new(TokenCategory::Id, target),
        }
    }

    pub fn call(callee: &str, arguments: Vec<Expr>) -> Stmt {
        Stmt::Call(CallExpr {
            callee: Token::new(TokenCategory::Id, callee),
            arguments,
        })
    }
}
