//! Unit tests for error handling.
//!
//! This module contains tests for error types and error reporting.

use crate::errors::errors::{Error, ErrorImpl, ErrorTip};
use crate::Position;
use std::rc::Rc;

fn position(offset: u32) -> Option<Position> {
    Some(Position(offset, Rc::new("test.kobe".to_string())))
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UndeclaredIdentifier {
            name: "x".to_string(),
        },
        position(10),
    );

    assert_eq!(error.get_error_name(), "UndeclaredIdentifier");
}

#[test]
fn test_error_position() {
    let error = Error::new(
        ErrorImpl::DuplicateDeclaration {
            name: "x".to_string(),
        },
        position(42),
    );

    assert_eq!(error.get_position().map(|p| p.0), Some(42));

    let error = Error::new(ErrorImpl::OutputOutsideFunction, None);
    assert!(error.get_position().is_none());
}

#[test]
fn test_type_mismatch_family() {
    let operand = Error::new(
        ErrorImpl::OperandTypeError {
            operator: "add".to_string(),
            left: "num".to_string(),
            right: "quote".to_string(),
        },
        None,
    );
    let condition = Error::new(
        ErrorImpl::ConditionTypeError {
            construct: "if statement".to_string(),
            expected: "baal".to_string(),
            received: "num".to_string(),
        },
        None,
    );
    let not_callable = Error::new(
        ErrorImpl::NotCallable {
            name: "x".to_string(),
        },
        None,
    );

    assert!(operand.is_type_mismatch());
    assert!(condition.is_type_mismatch());
    assert!(!not_callable.is_type_mismatch());
}

#[test]
fn test_operand_error_names_operator() {
    let error = Error::new(
        ErrorImpl::OperandTypeError {
            operator: "to the".to_string(),
            left: "baal".to_string(),
            right: "num".to_string(),
        },
        None,
    );

    assert_eq!(error.get_error_name(), "OperandTypeError");
    assert!(error.to_string().contains("\"to the\""));
}

#[test]
fn test_error_display_includes_position() {
    let error = Error::new(
        ErrorImpl::NotCallable {
            name: "x".to_string(),
        },
        position(9),
    );

    assert_eq!(error.to_string(), "call of non-function \"x\" at test.kobe:9");
}

#[test]
fn test_arity_mismatch_tip() {
    let error = Error::new(
        ErrorImpl::ArityMismatch {
            function: "add".to_string(),
            expected: 2,
            received: 3,
        },
        None,
    );

    assert_eq!(error.get_error_name(), "ArityMismatch");
    assert_eq!(
        error.get_tip().to_string(),
        "2 argument(s) required but 3 passed"
    );
}

#[test]
fn test_argument_mismatch_tip() {
    let error = Error::new(
        ErrorImpl::ArgumentTypeMismatch {
            function: "add".to_string(),
            index: 1,
            expected: "num".to_string(),
            received: "quote".to_string(),
        },
        position(3),
    );

    assert!(error.is_type_mismatch());
    assert_eq!(
        error.get_tip().to_string(),
        "Argument 2 should be `num`, received `quote`"
    );
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(
        ErrorImpl::UnknownOperator {
            lexeme: "<=".to_string(),
        },
        None,
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::new(
        ErrorImpl::ReadOnlyAssignment {
            name: "a".to_string(),
        },
        None,
    );

    match error.get_tip() {
        ErrorTip::Suggestion(_) => (),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}
