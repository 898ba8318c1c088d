use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Option<Position>,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Option<Position>) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    /// Whether this error belongs to the type mismatch family (operand,
    /// argument, return and condition mismatches included).
    pub fn is_type_mismatch(&self) -> bool {
        matches!(
            self.internal_error,
            ErrorImpl::TypeMismatch { .. }
                | ErrorImpl::OperandTypeError { .. }
                | ErrorImpl::ArgumentTypeMismatch { .. }
                | ErrorImpl::ReturnTypeMismatch { .. }
                | ErrorImpl::ConditionTypeError { .. }
        )
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::DuplicateDeclaration { .. } => "DuplicateDeclaration",
            ErrorImpl::UndeclaredIdentifier { .. } => "UndeclaredIdentifier",
            ErrorImpl::TypeMismatch { .. } => "TypeMismatch",
            ErrorImpl::OperandTypeError { .. } => "OperandTypeError",
            ErrorImpl::ArgumentTypeMismatch { .. } => "ArgumentTypeMismatch",
            ErrorImpl::ReturnTypeMismatch { .. } => "ReturnTypeMismatch",
            ErrorImpl::ConditionTypeError { .. } => "ConditionTypeError",
            ErrorImpl::ReadOnlyAssignment { .. } => "ReadOnlyAssignment",
            ErrorImpl::NotCallable { .. } => "NotCallable",
            ErrorImpl::ArityMismatch { .. } => "ArityMismatch",
            ErrorImpl::OutputOutsideFunction => "OutputOutsideFunction",
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::UnknownOperator { .. } => "UnknownOperator",
            ErrorImpl::MalformedLiteral { .. } => "MalformedLiteral",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::DuplicateDeclaration { name } => ErrorTip::Suggestion(format!(
                "`{}` is already declared in this scope, pick another name or move it into a nested block",
                name
            )),
            ErrorImpl::UndeclaredIdentifier { name } => ErrorTip::Suggestion(format!(
                "Identifier `{}` not declared, declare it before using it",
                name
            )),
            ErrorImpl::TypeMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::OperandTypeError { operator, .. } => ErrorTip::Suggestion(format!(
                "Check the operand types accepted by `{}`",
                operator
            )),
            ErrorImpl::ArgumentTypeMismatch {
                index,
                expected,
                received,
                ..
            } => ErrorTip::Suggestion(format!(
                "Argument {} should be `{}`, received `{}`",
                index + 1,
                expected,
                received
            )),
            ErrorImpl::ReturnTypeMismatch { function, expected, .. } => {
                ErrorTip::Suggestion(format!(
                    "Job `{}` must output a `{}` value",
                    function, expected
                ))
            }
            ErrorImpl::ConditionTypeError { construct, expected, .. } => {
                ErrorTip::Suggestion(format!(
                    "The {} needs a `{}` expression here",
                    construct, expected
                ))
            }
            ErrorImpl::ReadOnlyAssignment { name } => ErrorTip::Suggestion(format!(
                "`{}` is read-only, parameters and loop variables cannot be changed",
                name
            )),
            ErrorImpl::NotCallable { name } => ErrorTip::Suggestion(format!(
                "`{}` is a variable, not a job",
                name
            )),
            ErrorImpl::ArityMismatch { expected, received, .. } => ErrorTip::Suggestion(format!(
                "{} argument(s) required but {} passed",
                expected, received
            )),
            ErrorImpl::OutputOutsideFunction => ErrorTip::Suggestion(String::from(
                "Output can only appear in a job body",
            )),
            ErrorImpl::UnknownType { .. } => ErrorTip::None,
            ErrorImpl::UnknownOperator { .. } => ErrorTip::None,
            ErrorImpl::MalformedLiteral { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { .. } => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.position {
            Some(position) => write!(f, "{} at {}", self.internal_error, position),
            None => write!(f, "{}", self.internal_error),
        }
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("identifier {name:?} already declared")]
    DuplicateDeclaration { name: String },
    #[error("identifier {name:?} not declared")]
    UndeclaredIdentifier { name: String },
    #[error("types do not match: expected {expected}, received {received}")]
    TypeMismatch { expected: String, received: String },
    #[error("operator {operator:?} cannot be applied to {left} and {right}")]
    OperandTypeError {
        operator: String,
        left: String,
        right: String,
    },
    #[error("argument {index} of {function:?} has type {received}, expected {expected}")]
    ArgumentTypeMismatch {
        function: String,
        index: usize,
        expected: String,
        received: String,
    },
    #[error("job {function:?} outputs {received}, expected {expected}")]
    ReturnTypeMismatch {
        function: String,
        expected: String,
        received: String,
    },
    #[error("{construct} expects {expected}, received {received}")]
    ConditionTypeError {
        construct: String,
        expected: String,
        received: String,
    },
    #[error("cannot assign to read-only {name:?}")]
    ReadOnlyAssignment { name: String },
    #[error("call of non-function {name:?}")]
    NotCallable { name: String },
    #[error("{function:?} expects {expected} argument(s), received {received}")]
    ArityMismatch {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("output can only appear in a function")]
    OutputOutsideFunction,
    #[error("unknown type {name:?} found")]
    UnknownType { name: String },
    #[error("unknown operator {lexeme:?}")]
    UnknownOperator { lexeme: String },
    #[error("malformed {category} literal {lexeme:?}")]
    MalformedLiteral { category: String, lexeme: String },
    #[error("unexpected token {lexeme:?}")]
    UnexpectedToken { lexeme: String },
}
