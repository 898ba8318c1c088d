use std::rc::Rc;

use crate::{
    ast::{
        ast::{BinaryOperator, CallExpr, Expr, Parameter, Program, Stmt, UnaryOperator},
        tokens::{Token, TokenCategory},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
};

use super::{
    prelude::Prelude,
    scope::ScopeChain,
    typed_ast::{
        Entity, Function, TypedCall, TypedExpr, TypedExprKind, TypedProgram, TypedStmt,
        Variable,
    },
};

#[derive(Debug)]
pub struct Analyzer {
    pub scopes: ScopeChain,
    next_entity_id: usize,
    /// One counter per job body being analyzed, innermost last
    output_counts: Vec<usize>,
}

impl Analyzer {
    /// Creates an analyzer whose root scope holds `prelude`, positioned in a
    /// fresh child scope for the program's top level.
    pub fn new(prelude: &Prelude) -> Result<Self, Error> {
        let mut analyzer = Analyzer {
            scopes: ScopeChain::new(),
            next_entity_id: 0,
            output_counts: vec![],
        };

        for (name, ty) in prelude.variables() {
            let variable = analyzer.new_variable(name, ty.clone(), true);
            analyzer.scopes.declare(name, Entity::Variable(variable), None)?;
        }
        for builtin in prelude.functions() {
            let function = analyzer.new_function(
                &builtin.name,
                builtin.param_types.clone(),
                builtin.return_type.clone(),
            );
            analyzer.scopes.declare(&builtin.name, Entity::Function(function), None)?;
        }

        analyzer.scopes.enter_child_scope(None);
        Ok(analyzer)
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_entity_id;
        self.next_entity_id += 1;
        id
    }

    pub fn new_variable(&mut self, name: &str, ty: Type, read_only: bool) -> Rc<Variable> {
        Rc::new(Variable {
            id: self.next_id(),
            name: name.to_string(),
            ty,
            read_only,
        })
    }

    pub fn new_function(&mut self, name: &str, param_types: Vec<Type>, return_type: Type) -> Rc<Function> {
        Rc::new(Function {
            id: self.next_id(),
            name: name.to_string(),
            param_types,
            return_type,
        })
    }

    pub fn analyze_program(&mut self, program: &Program) -> Result<TypedProgram, Error> {
        let statements = analyze_stmts(self, &program.statements)?;
        Ok(TypedProgram { statements })
    }
}

/// Resolves a type name. `void` is accepted, callers decide whether it is legal.
fn resolve_type(type_name: &Token) -> Result<Type, Error> {
    Type::from_name(&type_name.lexeme).ok_or_else(|| {
        Error::new(
            ErrorImpl::UnknownType {
                name: type_name.lexeme.clone(),
            },
            type_name.position.clone(),
        )
    })
}

/// Resolves the type name of something that stores a value.
fn resolve_value_type(type_name: &Token) -> Result<Type, Error> {
    let ty = resolve_type(type_name)?;
    if !ty.is_storable() {
        return Err(Error::new(
            ErrorImpl::TypeMismatch {
                expected: String::from("num, baal or quote"),
                received: ty.to_string(),
            },
            type_name.position.clone(),
        ));
    }
    Ok(ty)
}

fn check_identifier(name: &Token) -> Result<(), Error> {
    if name.is_well_formed_identifier() {
        Ok(())
    } else {
        Err(Error::new(
            ErrorImpl::MalformedLiteral {
                category: name.category.to_string(),
                lexeme: name.lexeme.clone(),
            },
            name.position.clone(),
        ))
    }
}

fn malformed(token: &Token) -> Error {
    Error::new(
        ErrorImpl::MalformedLiteral {
            category: token.category.to_string(),
            lexeme: token.lexeme.clone(),
        },
        token.position.clone(),
    )
}

/// Resolves `target` to a variable that may be written to.
fn resolve_writable(analyzer: &Analyzer, target: &Token) -> Result<Rc<Variable>, Error> {
    check_identifier(target)?;
    let variable = analyzer
        .scopes
        .resolve_variable(&target.lexeme, target.position.clone())?;

    if variable.read_only {
        return Err(Error::new(
            ErrorImpl::ReadOnlyAssignment {
                name: variable.name.clone(),
            },
            target.position.clone(),
        ));
    }
    Ok(variable)
}

fn expect_condition(construct: &str, expected: Type, expr: &TypedExpr) -> Result<(), Error> {
    if expr.ty == expected {
        Ok(())
    } else {
        Err(Error::new(
            ErrorImpl::ConditionTypeError {
                construct: construct.to_string(),
                expected: expected.to_string(),
                received: expr.ty.to_string(),
            },
            expr.position.clone(),
        ))
    }
}

/// The operator rule table. Returns `None` when the operands are rejected.
pub fn binary_result_type(operator: BinaryOperator, left: &Type, right: &Type) -> Option<Type> {
    match operator {
        op if op.is_arithmetic() => (left.is_numeric() && left == right).then(|| left.clone()),
        BinaryOperator::Less | BinaryOperator::Greater => {
            (left.is_numeric() && right.is_numeric()).then_some(Type::Baal)
        }
        BinaryOperator::Equals | BinaryOperator::NotEquals => {
            (left.is_storable() && left == right).then_some(Type::Baal)
        }
        BinaryOperator::And | BinaryOperator::Or => {
            (*left == Type::Baal && *right == Type::Baal).then_some(Type::Baal)
        }
        _ => None,
    }
}

pub fn unary_result_type(operator: UnaryOperator, operand: &Type) -> Option<Type> {
    match operator {
        UnaryOperator::Not => (*operand == Type::Baal).then_some(Type::Baal),
        UnaryOperator::Negate => (*operand == Type::Num).then_some(Type::Num),
    }
}

pub fn analyze_call(analyzer: &mut Analyzer, call: &CallExpr) -> Result<TypedCall, Error> {
    let callee = &call.callee;
    check_identifier(callee)?;

    let function = match analyzer.scopes.resolve(&callee.lexeme, callee.position.clone())? {
        Entity::Function(function) => function,
        Entity::Variable(variable) => {
            return Err(Error::new(
                ErrorImpl::NotCallable {
                    name: variable.name.clone(),
                },
                callee.position.clone(),
            ))
        }
    };

    let mut arguments = vec![];
    for argument in call.arguments.iter() {
        arguments.push(analyze_expr(analyzer, argument)?);
    }

    if arguments.len() != function.param_types.len() {
        return Err(Error::new(
            ErrorImpl::ArityMismatch {
                function: function.name.clone(),
                expected: function.param_types.len(),
                received: arguments.len(),
            },
            callee.position.clone(),
        ));
    }

    for (index, (argument, param_type)) in arguments.iter().zip(function.param_types.iter()).enumerate() {
        if !argument.ty.is_assignable_to(param_type) {
            return Err(Error::new(
                ErrorImpl::ArgumentTypeMismatch {
                    function: function.name.clone(),
                    index,
                    expected: param_type.to_string(),
                    received: argument.ty.to_string(),
                },
                argument.position.clone().or_else(|| callee.position.clone()),
            ));
        }
    }

    Ok(TypedCall { callee: function, arguments })
}

fn analyze_leaf(analyzer: &mut Analyzer, token: &Token) -> Result<TypedExpr, Error> {
    let position = token.position.clone();

    match token.category {
        TokenCategory::Id => {
            check_identifier(token)?;
            let variable = analyzer.scopes.resolve_variable(&token.lexeme, position.clone())?;
            Ok(TypedExpr {
                ty: variable.ty.clone(),
                kind: TypedExprKind::Variable(variable),
                position,
            })
        }
        TokenCategory::Num => {
            let value = token.number_value().ok_or_else(|| malformed(token))?;
            Ok(TypedExpr::num(value, position))
        }
        TokenCategory::Baal => {
            let value = token.baal_value().ok_or_else(|| malformed(token))?;
            Ok(TypedExpr::baal(value, position))
        }
        TokenCategory::Quote => {
            let value = token.quote_value().ok_or_else(|| malformed(token))?;
            Ok(TypedExpr::quote(value, position))
        }
        TokenCategory::Sym => Err(Error::new(
            ErrorImpl::UnexpectedToken {
                lexeme: token.lexeme.clone(),
            },
            position,
        )),
    }
}

pub fn analyze_expr(analyzer: &mut Analyzer, expr: &Expr) -> Result<TypedExpr, Error> {
    match expr {
        Expr::Leaf(token) => analyze_leaf(analyzer, token),
        Expr::Binary { operator, left, right } => {
            let op = BinaryOperator::from_lexeme(&operator.lexeme).ok_or_else(|| {
                Error::new(
                    ErrorImpl::UnknownOperator {
                        lexeme: operator.lexeme.clone(),
                    },
                    operator.position.clone(),
                )
            })?;
            let left = analyze_expr(analyzer, left)?;
            let right = analyze_expr(analyzer, right)?;
            let position = expr.position().cloned();

            let ty = binary_result_type(op, &left.ty, &right.ty).ok_or_else(|| {
                Error::new(
                    ErrorImpl::OperandTypeError {
                        operator: op.to_string(),
                        left: left.ty.to_string(),
                        right: right.ty.to_string(),
                    },
                    position.clone(),
                )
            })?;

            Ok(TypedExpr {
                kind: TypedExprKind::Binary {
                    operator: op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                ty,
                position,
            })
        }
        Expr::Unary { operator, operand } => {
            let op = UnaryOperator::from_lexeme(&operator.lexeme).ok_or_else(|| {
                Error::new(
                    ErrorImpl::UnknownOperator {
                        lexeme: operator.lexeme.clone(),
                    },
                    operator.position.clone(),
                )
            })?;
            let operand = analyze_expr(analyzer, operand)?;
            let position = expr.position().cloned();

            let ty = unary_result_type(op, &operand.ty).ok_or_else(|| {
                Error::new(
                    ErrorImpl::OperandTypeError {
                        operator: op.to_string(),
                        left: operand.ty.to_string(),
                        right: String::from("nothing"),
                    },
                    position.clone(),
                )
            })?;

            Ok(TypedExpr {
                kind: TypedExprKind::Unary {
                    operator: op,
                    operand: Box::new(operand),
                },
                ty,
                position,
            })
        }
        Expr::Call(call) => {
            let typed_call = analyze_call(analyzer, call)?;
            let ty = typed_call.callee.return_type.clone();
            Ok(TypedExpr {
                kind: TypedExprKind::Call(typed_call),
                ty,
                position: call.callee.position.clone(),
            })
        }
    }
}

pub fn analyze_stmt(analyzer: &mut Analyzer, stmt: &Stmt) -> Result<TypedStmt, Error> {
    match stmt {
        Stmt::VariableDeclaration {
            type_name,
            name,
            initializer,
        } => {
            // The initializer is analyzed before the name comes into scope, so
            // `num x = x` only works when an outer `x` exists.
            let initializer = analyze_expr(analyzer, initializer)?;
            let ty = resolve_value_type(type_name)?;
            check_identifier(name)?;

            if !initializer.ty.is_assignable_to(&ty) {
                return Err(Error::new(
                    ErrorImpl::TypeMismatch {
                        expected: ty.to_string(),
                        received: initializer.ty.to_string(),
                    },
                    initializer.position.clone().or_else(|| name.position.clone()),
                ));
            }

            let variable = analyzer.new_variable(&name.lexeme, ty, false);
            analyzer
                .scopes
                .declare(&name.lexeme, Entity::Variable(Rc::clone(&variable)), name.position.clone())?;

            Ok(TypedStmt::VariableDeclaration { variable, initializer })
        }
        Stmt::FunctionDeclaration { function, body } => {
            check_identifier(&function.name)?;
            let return_type = resolve_type(&function.return_type)?;
            let mut param_types = vec![];
            for parameter in function.parameters.iter() {
                param_types.push(resolve_value_type(&parameter.type_name)?);
            }

            // Declared before the body is analyzed so jobs can call themselves
            let job = analyzer.new_function(&function.name.lexeme, param_types.clone(), return_type.clone());
            analyzer.scopes.declare(
                &function.name.lexeme,
                Entity::Function(Rc::clone(&job)),
                function.name.position.clone(),
            )?;

            analyzer.scopes.enter_child_scope(Some(Rc::clone(&job)));

            let mut parameters = vec![];
            for (parameter, ty) in function.parameters.iter().zip(param_types.into_iter()) {
                check_identifier(&parameter.name)?;
                let variable = analyzer.new_variable(&parameter.name.lexeme, ty, true);
                analyzer.scopes.declare(
                    &parameter.name.lexeme,
                    Entity::Variable(Rc::clone(&variable)),
                    parameter.name.position.clone(),
                )?;
                parameters.push(variable);
            }

            analyzer.output_counts.push(0);
            let typed_body = analyze_stmts(analyzer, body)?;
            let outputs = analyzer.output_counts.pop().unwrap_or(0);
            analyzer.scopes.exit_scope();

            if return_type != Type::Void && outputs == 0 {
                return Err(Error::new(
                    ErrorImpl::ReturnTypeMismatch {
                        function: job.name.clone(),
                        expected: return_type.to_string(),
                        received: String::from("nothing"),
                    },
                    function.name.position.clone(),
                ));
            }

            Ok(TypedStmt::FunctionDeclaration {
                function: job,
                parameters,
                body: typed_body,
            })
        }
        Stmt::Reassignment { target, source } => {
            let variable = resolve_writable(analyzer, target)?;
            let source = analyze_expr(analyzer, source)?;

            if !source.ty.is_assignable_to(&variable.ty) {
                return Err(Error::new(
                    ErrorImpl::TypeMismatch {
                        expected: variable.ty.to_string(),
                        received: source.ty.to_string(),
                    },
                    source.position.clone().or_else(|| target.position.clone()),
                ));
            }

            Ok(TypedStmt::Reassignment {
                target: variable,
                source,
            })
        }
        Stmt::Print { argument } => {
            let argument = analyze_expr(analyzer, argument)?;
            if argument.ty == Type::Void {
                return Err(Error::new(
                    ErrorImpl::TypeMismatch {
                        expected: String::from("a printable value"),
                        received: argument.ty.to_string(),
                    },
                    argument.position.clone(),
                ));
            }
            Ok(TypedStmt::Print { argument })
        }
        Stmt::Output { expression } => {
            let function = analyzer
                .scopes
                .enclosing_function()
                .ok_or_else(|| Error::new(ErrorImpl::OutputOutsideFunction, expression.position().cloned()))?;

            let expression = analyze_expr(analyzer, expression)?;
            if !expression.ty.is_assignable_to(&function.return_type) {
                return Err(Error::new(
                    ErrorImpl::ReturnTypeMismatch {
                        function: function.name.clone(),
                        expected: function.return_type.to_string(),
                        received: expression.ty.to_string(),
                    },
                    expression.position.clone(),
                ));
            }

            if let Some(count) = analyzer.output_counts.last_mut() {
                *count += 1;
            }
            Ok(TypedStmt::Output { expression })
        }
        Stmt::If {
            test,
            consequent,
            alternate,
        } => {
            let test = analyze_expr(analyzer, test)?;
            expect_condition("if statement", Type::Baal, &test)?;

            let consequent = analyze_block(analyzer, consequent)?;
            let alternate = match alternate {
                Some(alternate) => Some(analyze_block(analyzer, alternate)?),
                None => None,
            };

            Ok(TypedStmt::If {
                test,
                consequent,
                alternate,
            })
        }
        Stmt::While { test, body } => {
            let test = analyze_expr(analyzer, test)?;
            expect_condition("while statement", Type::Baal, &test)?;
            let body = analyze_block(analyzer, body)?;
            Ok(TypedStmt::While { test, body })
        }
        Stmt::Repeat { count, body } => {
            let count = analyze_expr(analyzer, count)?;
            expect_condition("repeat statement", Type::Num, &count)?;
            let body = analyze_block(analyzer, body)?;
            Ok(TypedStmt::Repeat { count, body })
        }
        Stmt::Coil {
            induction,
            low,
            high,
            body,
        } => {
            let low = analyze_expr(analyzer, low)?;
            expect_condition("coil range", Type::Num, &low)?;
            let high = analyze_expr(analyzer, high)?;
            expect_condition("coil range", Type::Num, &high)?;

            let (induction, body) = analyze_coil_body(analyzer, induction, body)?;
            Ok(TypedStmt::Coil {
                induction,
                low,
                high,
                body,
            })
        }
        Stmt::Increment { target } => {
            let variable = resolve_counter(analyzer, target)?;
            Ok(TypedStmt::Increment { target: variable })
        }
        Stmt::Decrement { target } => {
            let variable = resolve_counter(analyzer, target)?;
            Ok(TypedStmt::Decrement { target: variable })
        }
        Stmt::Call(call) => Ok(TypedStmt::Call(analyze_call(analyzer, call)?)),
    }
}

fn resolve_counter(analyzer: &Analyzer, target: &Token) -> Result<Rc<Variable>, Error> {
    let variable = resolve_writable(analyzer, target)?;
    if variable.ty != Type::Num {
        return Err(Error::new(
            ErrorImpl::TypeMismatch {
                expected: Type::Num.to_string(),
                received: variable.ty.to_string(),
            },
            target.position.clone(),
        ));
    }
    Ok(variable)
}

fn analyze_coil_body(
    analyzer: &mut Analyzer,
    induction: &Parameter,
    body: &[Stmt],
) -> Result<(Rc<Variable>, Vec<TypedStmt>), Error> {
    let ty = resolve_value_type(&induction.type_name)?;
    if ty != Type::Num {
        return Err(Error::new(
            ErrorImpl::TypeMismatch {
                expected: Type::Num.to_string(),
                received: ty.to_string(),
            },
            induction.type_name.position.clone(),
        ));
    }
    check_identifier(&induction.name)?;

    analyzer.scopes.enter_child_scope(None);
    let variable = analyzer.new_variable(&induction.name.lexeme, ty, true);
    analyzer.scopes.declare(
        &induction.name.lexeme,
        Entity::Variable(Rc::clone(&variable)),
        induction.name.position.clone(),
    )?;
    let body = analyze_stmts(analyzer, body)?;
    analyzer.scopes.exit_scope();

    Ok((variable, body))
}

/// Analyzes a chunk in a fresh child scope.
pub fn analyze_block(analyzer: &mut Analyzer, body: &[Stmt]) -> Result<Vec<TypedStmt>, Error> {
    analyzer.scopes.enter_child_scope(None);
    let typed_body = analyze_stmts(analyzer, body)?;
    analyzer.scopes.exit_scope();
    Ok(typed_body)
}

/// Analyzes a chunk in the current scope.
pub fn analyze_stmts(analyzer: &mut Analyzer, body: &[Stmt]) -> Result<Vec<TypedStmt>, Error> {
    let mut typed_body = Vec::with_capacity(body.len());
    for stmt in body.iter() {
        typed_body.push(analyze_stmt(analyzer, stmt)?);
    }
    Ok(typed_body)
}

/// Analyzes `program` against the standard prelude.
pub fn analyze(program: &Program) -> Result<TypedProgram, Error> {
    analyze_with(program, &Prelude::standard())
}

#[tracing::instrument(skip_all, fields(statements = program.statements.len()))]
pub fn analyze_with(program: &Program, prelude: &Prelude) -> Result<TypedProgram, Error> {
    let mut analyzer = Analyzer::new(prelude)?;
    let result = analyzer.analyze_program(program);

    match &result {
        Ok(_) => tracing::debug!("analysis succeeded"),
        Err(error) => tracing::debug!(error = %error, "analysis failed"),
    }

    result
}
