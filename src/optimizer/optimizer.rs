use crate::{
    analyzer::typed_ast::{TypedCall, TypedExpr, TypedExprKind, TypedProgram, TypedStmt},
    ast::{
        ast::{BinaryOperator, UnaryOperator},
        types::Type,
    },
    Position,
};

/// Evaluates `left op right` for two literal operands. Returns `None` when the
/// pair is not foldable.
pub fn fold_binary(operator: BinaryOperator, left: &TypedExprKind, right: &TypedExprKind) -> Option<TypedExprKind> {
    match (left, right, operator) {
        (TypedExprKind::Num(a), TypedExprKind::Num(b), _) => Some(match operator {
            BinaryOperator::Add => TypedExprKind::Num(a + b),
            BinaryOperator::Minus => TypedExprKind::Num(a - b),
            BinaryOperator::Multiply => TypedExprKind::Num(a * b),
            BinaryOperator::Divide => TypedExprKind::Num(a / b),
            BinaryOperator::Mod => TypedExprKind::Num(a % b),
            BinaryOperator::Power => TypedExprKind::Num(a.powf(*b)),
            BinaryOperator::Less => TypedExprKind::Baal(a < b),
            BinaryOperator::Greater => TypedExprKind::Baal(a > b),
            BinaryOperator::Equals => TypedExprKind::Baal(a == b),
            BinaryOperator::NotEquals => TypedExprKind::Baal(a != b),
            BinaryOperator::And | BinaryOperator::Or => return None,
        }),
        (TypedExprKind::Baal(a), TypedExprKind::Baal(b), BinaryOperator::And) => Some(TypedExprKind::Baal(*a && *b)),
        (TypedExprKind::Baal(a), TypedExprKind::Baal(b), BinaryOperator::Or) => Some(TypedExprKind::Baal(*a || *b)),
        (TypedExprKind::Baal(a), TypedExprKind::Baal(b), BinaryOperator::Equals) => Some(TypedExprKind::Baal(a == b)),
        (TypedExprKind::Baal(a), TypedExprKind::Baal(b), BinaryOperator::NotEquals) => Some(TypedExprKind::Baal(a != b)),
        (TypedExprKind::Quote(a), TypedExprKind::Quote(b), BinaryOperator::Equals) => Some(TypedExprKind::Baal(a == b)),
        (TypedExprKind::Quote(a), TypedExprKind::Quote(b), BinaryOperator::NotEquals) => Some(TypedExprKind::Baal(a != b)),
        _ => None,
    }
}

pub fn fold_unary(operator: UnaryOperator, operand: &TypedExprKind) -> Option<TypedExprKind> {
    match (operand, operator) {
        (TypedExprKind::Num(value), UnaryOperator::Negate) => Some(TypedExprKind::Num(-value)),
        (TypedExprKind::Baal(value), UnaryOperator::Not) => Some(TypedExprKind::Baal(!value)),
        _ => None,
    }
}

fn is_num(expr: &TypedExpr, value: f64) -> bool {
    expr.as_number() == Some(value)
}

fn is_baal(expr: &TypedExpr, value: bool) -> bool {
    expr.as_baal() == Some(value)
}

/// Replaces a node with a literal, keeping the node's type and position.
fn literal(kind: TypedExprKind, ty: Type, position: Option<Position>) -> TypedExpr {
    TypedExpr { kind, ty, position }
}

/// Algebraic identities on a binary node whose operands are already
/// optimized. Hands the node back untouched when no identity applies.
fn simplify_binary(operator: BinaryOperator, left: TypedExpr, right: TypedExpr, ty: Type, position: Option<Position>) -> TypedExpr {
    match operator {
        BinaryOperator::Add if is_num(&right, 0.0) => {
            tracing::debug!(rule = "x add 0");
            return left;
        }
        BinaryOperator::Add if is_num(&left, 0.0) => {
            tracing::debug!(rule = "0 add x");
            return right;
        }
        BinaryOperator::Minus if is_num(&right, 0.0) => {
            tracing::debug!(rule = "x minus 0");
            return left;
        }
        BinaryOperator::Minus if is_num(&left, 0.0) => {
            tracing::debug!(rule = "0 minus x");
            return TypedExpr {
                kind: TypedExprKind::Unary {
                    operator: UnaryOperator::Negate,
                    operand: Box::new(right),
                },
                ty,
                position,
            };
        }
        BinaryOperator::Multiply if is_num(&right, 1.0) => {
            tracing::debug!(rule = "x multiply 1");
            return left;
        }
        BinaryOperator::Multiply if is_num(&left, 1.0) => {
            tracing::debug!(rule = "1 multiply x");
            return right;
        }
        BinaryOperator::Multiply if is_num(&right, 0.0) && !left.contains_call() => {
            tracing::debug!(rule = "x multiply 0");
            return literal(TypedExprKind::Num(0.0), ty, position);
        }
        BinaryOperator::Multiply if is_num(&left, 0.0) && !right.contains_call() => {
            tracing::debug!(rule = "0 multiply x");
            return literal(TypedExprKind::Num(0.0), ty, position);
        }
        BinaryOperator::Divide if is_num(&right, 1.0) => {
            tracing::debug!(rule = "x divide 1");
            return left;
        }
        BinaryOperator::Power if is_num(&right, 0.0) && !left.contains_call() => {
            tracing::debug!(rule = "x to the 0");
            return literal(TypedExprKind::Num(1.0), ty, position);
        }
        BinaryOperator::Power if is_num(&left, 1.0) && !right.contains_call() => {
            tracing::debug!(rule = "1 to the x");
            return literal(TypedExprKind::Num(1.0), ty, position);
        }
        BinaryOperator::And if is_baal(&left, true) => {
            tracing::debug!(rule = "true and x");
            return right;
        }
        BinaryOperator::And if is_baal(&right, true) => {
            tracing::debug!(rule = "x and true");
            return left;
        }
        BinaryOperator::Or if is_baal(&left, false) => {
            tracing::debug!(rule = "false or x");
            return right;
        }
        BinaryOperator::Or if is_baal(&right, false) => {
            tracing::debug!(rule = "x or false");
            return left;
        }
        _ => {}
    }

    TypedExpr {
        kind: TypedExprKind::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        },
        ty,
        position,
    }
}

fn optimize_call(call: TypedCall) -> TypedCall {
    TypedCall {
        callee: call.callee,
        arguments: call.arguments.into_iter().map(optimize_expr).collect(),
    }
}

pub fn optimize_expr(expr: TypedExpr) -> TypedExpr {
    let TypedExpr { kind, ty, position } = expr;

    match kind {
        TypedExprKind::Binary { operator, left, right } => {
            let left = optimize_expr(*left);
            let right = optimize_expr(*right);

            if left.is_literal() && right.is_literal() {
                if let Some(folded) = fold_binary(operator, &left.kind, &right.kind) {
                    tracing::debug!(rule = "constant folding", %operator);
                    return literal(folded, ty, position);
                }
            }

            simplify_binary(operator, left, right, ty, position)
        }
        TypedExprKind::Unary { operator, operand } => {
            let operand = optimize_expr(*operand);

            if let Some(folded) = fold_unary(operator, &operand.kind) {
                tracing::debug!(rule = "unary folding", %operator);
                return literal(folded, ty, position);
            }

            TypedExpr {
                kind: TypedExprKind::Unary {
                    operator,
                    operand: Box::new(operand),
                },
                ty,
                position,
            }
        }
        TypedExprKind::Call(call) => TypedExpr {
            kind: TypedExprKind::Call(optimize_call(call)),
            ty,
            position,
        },
        leaf @ (TypedExprKind::Num(_) | TypedExprKind::Baal(_) | TypedExprKind::Quote(_) | TypedExprKind::Variable(_)) => {
            TypedExpr { kind: leaf, ty, position }
        }
    }
}

/// Optimizes one statement into the sequence that replaces it in its chunk.
/// The sequence is empty when the statement has no effect.
pub fn optimize_stmt(stmt: TypedStmt) -> Vec<TypedStmt> {
    match stmt {
        TypedStmt::VariableDeclaration { variable, initializer } => vec![TypedStmt::VariableDeclaration {
            variable,
            initializer: optimize_expr(initializer),
        }],
        TypedStmt::FunctionDeclaration {
            function,
            parameters,
            body,
        } => vec![TypedStmt::FunctionDeclaration {
            function,
            parameters,
            body: optimize_stmts(body),
        }],
        TypedStmt::Reassignment { target, source } => {
            let source = optimize_expr(source);
            if let TypedExprKind::Variable(variable) = &source.kind {
                if variable.id == target.id {
                    tracing::debug!(rule = "self assignment", name = %target.name);
                    return vec![];
                }
            }
            vec![TypedStmt::Reassignment { target, source }]
        }
        TypedStmt::Print { argument } => vec![TypedStmt::Print {
            argument: optimize_expr(argument),
        }],
        TypedStmt::Output { expression } => vec![TypedStmt::Output {
            expression: optimize_expr(expression),
        }],
        TypedStmt::If {
            test,
            consequent,
            alternate,
        } => {
            let test = optimize_expr(test);
            match test.as_baal() {
                Some(true) => {
                    tracing::debug!(rule = "dead branch", taken = true);
                    optimize_stmts(consequent)
                }
                Some(false) => {
                    tracing::debug!(rule = "dead branch", taken = false);
                    alternate.map(optimize_stmts).unwrap_or_default()
                }
                None => vec![TypedStmt::If {
                    test,
                    consequent: optimize_stmts(consequent),
                    alternate: alternate.map(optimize_stmts),
                }],
            }
        }
        TypedStmt::While { test, body } => {
            let test = optimize_expr(test);
            if is_baal(&test, false) {
                tracing::debug!(rule = "while false");
                return vec![];
            }
            vec![TypedStmt::While {
                test,
                body: optimize_stmts(body),
            }]
        }
        TypedStmt::Repeat { count, body } => {
            let count = optimize_expr(count);
            if is_num(&count, 0.0) {
                tracing::debug!(rule = "repeat 0");
                return vec![];
            }
            vec![TypedStmt::Repeat {
                count,
                body: optimize_stmts(body),
            }]
        }
        TypedStmt::Coil {
            induction,
            low,
            high,
            body,
        } => {
            let low = optimize_expr(low);
            let high = optimize_expr(high);
            if let (Some(low), Some(high)) = (low.as_number(), high.as_number()) {
                if low > high {
                    tracing::debug!(rule = "empty coil", low, high);
                    return vec![];
                }
            }
            vec![TypedStmt::Coil {
                induction,
                low,
                high,
                body: optimize_stmts(body),
            }]
        }
        stmt @ (TypedStmt::Increment { .. } | TypedStmt::Decrement { .. }) => vec![stmt],
        TypedStmt::Call(call) => vec![TypedStmt::Call(optimize_call(call))],
    }
}

/// Optimizes a chunk, splicing each statement's replacement in place.
pub fn optimize_stmts(body: Vec<TypedStmt>) -> Vec<TypedStmt> {
    body.into_iter().flat_map(optimize_stmt).collect()
}

#[tracing::instrument(skip_all, fields(statements = program.statements.len()))]
pub fn optimize(program: TypedProgram) -> TypedProgram {
    TypedProgram {
        statements: optimize_stmts(program.statements),
    }
}
