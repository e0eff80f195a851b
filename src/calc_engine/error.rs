use std::fmt;

use thiserror::Error;

pub type EvalResult<T> = Result<T, EvalError>;

/// Which of the two evaluator stacks ran out of room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackKind {
    Value,
    Operator,
}

impl fmt::Display for StackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackKind::Value => f.write_str("value"),
            StackKind::Operator => f.write_str("operator"),
        }
    }
}

/// Errors raised by the evaluator. Once raised they stay in place until the
/// evaluator is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("Syntax Error")]
    Syntax,

    #[error("Divided By Zero")]
    DivideByZero,

    #[error("Stack Full ({stack} stack holds {capacity})")]
    Overflow { stack: StackKind, capacity: usize },
}
