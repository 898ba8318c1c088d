//! Unit tests for the optimizer.
//!
//! Programs are analyzed first, so every input is a well-typed tree.

use crate::{
    analyzer::{
        analyzer::analyze,
        typed_ast::{TypedExpr, TypedExprKind, TypedProgram, TypedStmt},
    },
    ast::{
        ast::{BinaryOperator, Expr, Parameter, Program, Stmt, UnaryOperator},
        tokens::TokenCategory,
    },
    MK_POSITION, MK_TOKEN,
};

use super::optimizer::{fold_binary, optimize, optimize_expr};

fn analyzed(statements: Vec<Stmt>) -> TypedProgram {
    analyze(&Program::new(statements)).unwrap()
}

fn optimized(statements: Vec<Stmt>) -> Vec<TypedStmt> {
    optimize(analyzed(statements)).statements
}

/// Declares `x`, `y` and `b`, then prints `expr`. Returns the optimized
/// print argument.
fn optimized_print(expr: Expr) -> TypedExpr {
    let mut statements = optimized(vec![
        Stmt::var_decl("num", "x", Expr::num("5")),
        Stmt::var_decl("num", "y", Expr::num("6")),
        Stmt::var_decl("baal", "b", Expr::baal(true)),
        Stmt::function("num", "f", vec![], vec![Stmt::output(Expr::num("2"))]),
        Stmt::print(expr),
    ]);
    match statements.pop() {
        Some(TypedStmt::Print { argument }) => argument,
        other => panic!("unexpected statement {:?}", other),
    }
}

fn variable_name(expr: &TypedExpr) -> &str {
    match &expr.kind {
        TypedExprKind::Variable(variable) => &variable.name,
        other => panic!("expected a variable, found {:?}", other),
    }
}

#[test]
fn test_constant_folding() {
    let cases = [
        ("add", 7.0),
        ("minus", -1.0),
        ("multiply", 12.0),
        ("divide", 0.75),
        ("mod", 3.0),
        ("to the", 81.0),
    ];
    for (operator, expected) in cases {
        let folded = optimized_print(Expr::binary(operator, Expr::num("3"), Expr::num("4")));
        assert_eq!(folded.kind, TypedExprKind::Num(expected), "folding {}", operator);
    }
}

#[test]
fn test_folding_comparisons_and_logic() {
    assert_eq!(
        optimized_print(Expr::binary("<", Expr::num("3"), Expr::num("4"))).kind,
        TypedExprKind::Baal(true)
    );
    assert_eq!(
        optimized_print(Expr::binary("==", Expr::quote("kobe"), Expr::quote("kobe"))).kind,
        TypedExprKind::Baal(true)
    );
    assert_eq!(
        optimized_print(Expr::binary("!=", Expr::baal(true), Expr::baal(true))).kind,
        TypedExprKind::Baal(false)
    );
    assert_eq!(
        optimized_print(Expr::binary("or", Expr::baal(false), Expr::baal(true))).kind,
        TypedExprKind::Baal(true)
    );
}

#[test]
fn test_folding_is_bottom_up() {
    let folded = optimized_print(Expr::binary(
        "multiply",
        Expr::binary("add", Expr::num("1"), Expr::num("2")),
        Expr::binary("minus", Expr::num("10"), Expr::num("6")),
    ));
    assert_eq!(folded.kind, TypedExprKind::Num(12.0));

    let partial = optimized_print(Expr::binary(
        "multiply",
        Expr::binary("add", Expr::num("1"), Expr::num("2")),
        Expr::id("x"),
    ));
    match partial.kind {
        TypedExprKind::Binary { operator, left, right } => {
            assert_eq!(operator, BinaryOperator::Multiply);
            assert_eq!(left.kind, TypedExprKind::Num(3.0));
            assert_eq!(variable_name(&right), "x");
        }
        other => panic!("unexpected expression {:?}", other),
    }
}

#[test]
fn test_fold_binary_rejects_mixed_operands() {
    assert_eq!(
        fold_binary(BinaryOperator::Add, &TypedExprKind::Num(1.0), &TypedExprKind::Baal(true)),
        None
    );
    assert_eq!(
        fold_binary(BinaryOperator::And, &TypedExprKind::Num(1.0), &TypedExprKind::Num(1.0)),
        None
    );
}

#[test]
fn test_identity_rewrites() {
    for expr in [
        Expr::binary("add", Expr::id("x"), Expr::num("0")),
        Expr::binary("add", Expr::num("0"), Expr::id("x")),
        Expr::binary("minus", Expr::id("x"), Expr::num("0")),
        Expr::binary("multiply", Expr::id("x"), Expr::num("1")),
        Expr::binary("multiply", Expr::num("1"), Expr::id("x")),
        Expr::binary("divide", Expr::id("x"), Expr::num("1")),
    ] {
        assert_eq!(variable_name(&optimized_print(expr)), "x");
    }
}

#[test]
fn test_absorbing_rewrites() {
    assert_eq!(
        optimized_print(Expr::binary("multiply", Expr::id("x"), Expr::num("0"))).kind,
        TypedExprKind::Num(0.0)
    );
    assert_eq!(
        optimized_print(Expr::binary("multiply", Expr::num("0"), Expr::id("x"))).kind,
        TypedExprKind::Num(0.0)
    );
    assert_eq!(
        optimized_print(Expr::binary("to the", Expr::id("x"), Expr::num("0"))).kind,
        TypedExprKind::Num(1.0)
    );
    assert_eq!(
        optimized_print(Expr::binary("to the", Expr::num("1"), Expr::id("x"))).kind,
        TypedExprKind::Num(1.0)
    );
}

#[test]
fn test_zero_base_power_needs_known_exponent() {
    let kept = optimized_print(Expr::binary("to the", Expr::num("0"), Expr::id("x")));
    assert!(matches!(kept.kind, TypedExprKind::Binary { operator: BinaryOperator::Power, .. }));

    let folded = optimized_print(Expr::binary("to the", Expr::num("0"), Expr::num("3")));
    assert_eq!(folded.kind, TypedExprKind::Num(0.0));
}

#[test]
fn test_zero_minus_becomes_negation() {
    let negated = optimized_print(Expr::binary("minus", Expr::num("0"), Expr::id("y")));
    match negated.kind {
        TypedExprKind::Unary { operator, operand } => {
            assert_eq!(operator, UnaryOperator::Negate);
            assert_eq!(variable_name(&operand), "y");
        }
        other => panic!("unexpected expression {:?}", other),
    }
}

#[test]
fn test_calls_are_never_dropped() {
    for expr in [
        Expr::binary("multiply", Expr::call("f", vec![]), Expr::num("0")),
        Expr::binary("multiply", Expr::num("0"), Expr::call("f", vec![])),
        Expr::binary("to the", Expr::call("f", vec![]), Expr::num("0")),
        Expr::binary("to the", Expr::num("1"), Expr::call("f", vec![])),
    ] {
        let kept = optimized_print(expr);
        assert!(kept.contains_call(), "call dropped from {:?}", kept);
    }
}

#[test]
fn test_boolean_simplification() {
    assert_eq!(
        variable_name(&optimized_print(Expr::binary("and", Expr::id("b"), Expr::baal(true)))),
        "b"
    );
    assert_eq!(
        variable_name(&optimized_print(Expr::binary("and", Expr::baal(true), Expr::id("b")))),
        "b"
    );
    assert_eq!(
        variable_name(&optimized_print(Expr::binary("or", Expr::baal(false), Expr::id("b")))),
        "b"
    );
    assert_eq!(
        variable_name(&optimized_print(Expr::binary("or", Expr::id("b"), Expr::baal(false)))),
        "b"
    );

    let kept = optimized_print(Expr::binary("or", Expr::id("b"), Expr::baal(true)));
    assert!(matches!(kept.kind, TypedExprKind::Binary { operator: BinaryOperator::Or, .. }));
}

#[test]
fn test_unary_folding() {
    assert_eq!(
        optimized_print(Expr::unary("-", Expr::num("4"))).kind,
        TypedExprKind::Num(-4.0)
    );
    assert_eq!(
        optimized_print(Expr::unary("!", Expr::binary("<", Expr::num("1"), Expr::num("2")))).kind,
        TypedExprKind::Baal(false)
    );
}

#[test]
fn test_folded_literal_keeps_position() {
    let expr = Expr::Binary {
        operator: MK_TOKEN!(TokenCategory::Sym, "add", MK_POSITION!(14, "main.kobe")),
        left: Box::new(Expr::num("3")),
        right: Box::new(Expr::num("4")),
    };
    let folded = optimized_print(expr);
    assert_eq!(folded.kind, TypedExprKind::Num(7.0));
    assert_eq!(folded.position, Some(MK_POSITION!(14, "main.kobe")));
}

#[test]
fn test_self_assignment_is_removed() {
    let statements = optimized(vec![
        Stmt::var_decl("num", "x", Expr::num("1")),
        Stmt::var_decl("num", "y", Expr::num("2")),
        Stmt::assign("x", Expr::id("x")),
        Stmt::assign("x", Expr::id("y")),
    ]);
    assert_eq!(statements.len(), 3);
    assert!(matches!(statements[2], TypedStmt::Reassignment { .. }));
}

#[test]
fn test_self_assignment_inside_job_body() {
    let statements = optimized(vec![
        Stmt::var_decl("num", "x", Expr::num("1")),
        Stmt::function(
            "void",
            "g",
            vec![],
            vec![Stmt::var_decl("num", "z", Expr::id("x")), Stmt::assign("z", Expr::id("z"))],
        ),
    ]);
    match &statements[1] {
        TypedStmt::FunctionDeclaration { body, .. } => assert_eq!(body.len(), 1),
        other => panic!("unexpected statement {:?}", other),
    }
}

#[test]
fn test_if_with_known_test() {
    let consequent = vec![Stmt::print(Expr::quote("taken"))];
    let alternate = vec![Stmt::print(Expr::quote("skipped"))];

    let taken = optimized(vec![Stmt::if_else(
        Expr::baal(true),
        consequent.clone(),
        Some(alternate.clone()),
    )]);
    assert_eq!(taken, optimized(consequent.clone()));

    let otherwise = optimized(vec![Stmt::if_else(
        Expr::binary("<", Expr::num("2"), Expr::num("1")),
        consequent.clone(),
        Some(alternate.clone()),
    )]);
    assert_eq!(otherwise, optimized(alternate));

    let nothing = optimized(vec![Stmt::if_else(Expr::baal(false), consequent, None)]);
    assert!(nothing.is_empty());
}

#[test]
fn test_if_with_unknown_test_is_kept() {
    let statements = optimized(vec![
        Stmt::var_decl("baal", "b", Expr::baal(true)),
        Stmt::if_else(
            Expr::id("b"),
            vec![Stmt::print(Expr::binary("add", Expr::num("1"), Expr::num("1")))],
            None,
        ),
    ]);
    match &statements[1] {
        TypedStmt::If { consequent, alternate, .. } => {
            assert!(alternate.is_none());
            match &consequent[0] {
                TypedStmt::Print { argument } => assert_eq!(argument.kind, TypedExprKind::Num(2.0)),
                other => panic!("unexpected statement {:?}", other),
            }
        }
        other => panic!("unexpected statement {:?}", other),
    }
}

#[test]
fn test_dead_loops() {
    assert!(optimized(vec![Stmt::while_loop(Expr::baal(false), vec![Stmt::print(Expr::num("1"))])]).is_empty());
    assert!(optimized(vec![Stmt::repeat(
        Expr::binary("minus", Expr::num("2"), Expr::num("2")),
        vec![Stmt::print(Expr::num("1"))],
    )])
    .is_empty());
    assert!(optimized(vec![Stmt::coil(
        Parameter::new("num", "i"),
        Expr::num("5"),
        Expr::num("1"),
        vec![Stmt::print(Expr::id("i"))],
    )])
    .is_empty());

    assert_eq!(
        optimized(vec![Stmt::coil(
            Parameter::new("num", "i"),
            Expr::num("1"),
            Expr::num("5"),
            vec![Stmt::print(Expr::id("i"))],
        )])
        .len(),
        1
    );
    assert_eq!(optimized(vec![Stmt::while_loop(Expr::baal(true), vec![])]).len(), 1);
}

#[test]
fn test_call_arguments_are_folded_but_call_kept() {
    let expr = optimized_print(Expr::call(
        "hypot",
        vec![
            Expr::binary("add", Expr::num("1"), Expr::num("2")),
            Expr::num("4"),
        ],
    ));
    match expr.kind {
        TypedExprKind::Call(call) => {
            assert_eq!(call.callee.name, "hypot");
            assert_eq!(call.arguments[0].kind, TypedExprKind::Num(3.0));
        }
        other => panic!("unexpected expression {:?}", other),
    }
}

#[test]
fn test_unfoldable_program_is_unchanged() {
    let program = analyzed(vec![
        Stmt::var_decl("num", "x", Expr::num("1")),
        Stmt::print(Expr::id("x")),
    ]);
    assert_eq!(optimize(program.clone()), program);
}

#[test]
fn test_optimization_is_idempotent() {
    let program = analyzed(vec![
        Stmt::var_decl("num", "x", Expr::binary("add", Expr::num("2"), Expr::num("3"))),
        Stmt::var_decl("baal", "b", Expr::binary("and", Expr::baal(true), Expr::binary("<", Expr::id("x"), Expr::num("9")))),
        Stmt::function(
            "num",
            "scale",
            vec![Parameter::new("num", "n")],
            vec![
                Stmt::if_else(
                    Expr::id("b"),
                    vec![Stmt::output(Expr::binary("multiply", Expr::id("n"), Expr::num("1")))],
                    Some(vec![Stmt::output(Expr::binary("minus", Expr::num("0"), Expr::id("n")))]),
                ),
            ],
        ),
        Stmt::while_loop(
            Expr::binary("or", Expr::id("b"), Expr::baal(false)),
            vec![Stmt::assign("x", Expr::id("x")), Stmt::decrement("x")],
        ),
        Stmt::print(Expr::binary(
            "multiply",
            Expr::call("scale", vec![Expr::binary("to the", Expr::num("2"), Expr::num("3"))]),
            Expr::num("0"),
        )),
    ]);

    let once = optimize(program);
    let twice = optimize(once.clone());
    assert_eq!(once, twice);
}

#[test]
fn test_optimize_expr_leaves_are_untouched() {
    let leaf = TypedExpr::quote("kobe".to_string(), None);
    assert_eq!(optimize_expr(leaf.clone()), leaf);
}
