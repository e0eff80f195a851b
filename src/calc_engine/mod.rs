//! The calculator engine: an incremental lexer, an operator-precedence
//! evaluator and a fixed-precision formatter, tied together by a keypad
//! session.

pub mod error;
pub mod evaluator;
pub mod formatter;
pub mod lexer;
pub mod session;
pub mod token;

pub use error::{EvalError, EvalResult, StackKind};
pub use evaluator::{Evaluator, Step, STACK_CAPACITY};
pub use formatter::{format_number, PRECISION};
pub use lexer::{Lexer, LexerState};
pub use session::{Calculator, Key, Outcome, Readout, FORMULA_CAPACITY};
pub use token::{Category, Operator, Token};

/// Evaluate a complete expression typed as keys, e.g. `"(1+2)*3"`. A
/// trailing `=` is added when missing.
pub fn evaluate(input: &str) -> EvalResult<f64> {
    let mut calculator = Calculator::new();
    let outcome = calculator
        .feed_str(input)
        .or_else(|| calculator.press(Key::Char('=')));
    outcome.map_or(Ok(calculator.evaluator().result()), |o| o.result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluate_appends_missing_equals() {
        assert_eq!(evaluate("(1+2)*3"), Ok(9.0));
        assert_eq!(evaluate("(1+2)*3="), Ok(9.0));
        assert_eq!(evaluate(""), Ok(0.0));
        assert_eq!(evaluate("7/0"), Err(EvalError::DivideByZero));
    }
}
