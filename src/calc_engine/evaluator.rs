//! Operator-precedence evaluator.
//!
//! Values and operators live on two bounded stacks. Each incoming operator is
//! compared with the operator on top of the stack through a fixed relation
//! table, which decides between shifting it, reducing what is pending, closing
//! a parenthesis, finishing, or rejecting the input. A closing parenthesis is
//! never stored; it only reduces or pops its matching `(`.

use tracing::{debug, warn};

use super::error::{EvalError, EvalResult, StackKind};
use super::token::{Category, Operator};

pub const STACK_CAPACITY: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    Less,
    Greater,
    Equal,
    Invalid,
}

use self::Relation::{Equal as E, Greater as G, Invalid as X, Less as L};

// rows: operator on the stack, columns: incoming operator
//  +- */  (  )  =
const PRIORITY: [[Relation; 5]; 5] = [
    [G, L, L, G, G], // +-
    [G, G, L, G, G], // */
    [L, L, L, E, X], // (
    [G, G, X, G, G], // )
    [L, L, L, X, E], // =
];

fn relation(top: Category, incoming: Category) -> Relation {
    PRIORITY[top.index()][incoming.index()]
}

/// What a successful `push_operator` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The operator was stored, possibly after reducing pending work.
    Shifted,
    /// A `)` met its `(` and both are gone.
    ParenClosed,
    /// `=` met the bottom sentinel; the result is on top of the value stack.
    Finished,
}

#[derive(Debug, Clone)]
pub struct Evaluator {
    values: Vec<f64>,
    operators: Vec<Operator>,
    capacity: usize,
    error: Option<EvalError>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Self::with_capacity(STACK_CAPACITY)
    }

    /// `capacity` bounds each stack; the operator stack counts its sentinel.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(2);
        let mut evaluator = Evaluator {
            values: Vec::with_capacity(capacity),
            operators: Vec::with_capacity(capacity),
            capacity,
            error: None,
        };
        evaluator.reset();
        evaluator
    }

    pub fn reset(&mut self) {
        self.values.clear();
        self.operators.clear();
        self.operators.push(Operator::End);
        self.error = None;
    }

    pub fn push_number(&mut self, value: f64) -> EvalResult<()> {
        if self.values.len() >= self.capacity {
            return Err(self.fail(EvalError::Overflow {
                stack: StackKind::Value,
                capacity: self.capacity,
            }));
        }
        self.values.push(value);
        Ok(())
    }

    pub fn push_operator(&mut self, op: Operator) -> EvalResult<Step> {
        if let Some(err) = self.error {
            return Err(err);
        }

        loop {
            let top = self.top();
            match relation(top.category(), op.category()) {
                Relation::Less => {
                    if self.operators.len() >= self.capacity {
                        return Err(self.fail(EvalError::Overflow {
                            stack: StackKind::Operator,
                            capacity: self.capacity,
                        }));
                    }
                    debug!(op = %op.symbol(), "shift");
                    self.operators.push(op);
                    return Ok(Step::Shifted);
                }
                Relation::Greater => self.reduce()?,
                Relation::Equal => match (top, op) {
                    (Operator::LParen, _) => {
                        self.operators.pop();
                        debug!("parenthesis closed");
                        return Ok(Step::ParenClosed);
                    }
                    (Operator::End, Operator::End) => {
                        debug!(result = self.result(), "finished");
                        return Ok(Step::Finished);
                    }
                    _ => return Err(self.fail(EvalError::Syntax)),
                },
                Relation::Invalid => return Err(self.fail(EvalError::Syntax)),
            }
        }
    }

    /// Top of the value stack, or 0.0 when it is empty.
    pub fn result(&self) -> f64 {
        self.values.last().copied().unwrap_or(0.0)
    }

    pub fn error(&self) -> Option<EvalError> {
        self.error
    }

    pub fn error_message(&self) -> String {
        match self.error {
            Some(err) => err.to_string(),
            None => "OK".to_string(),
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Operator stack from the bottom sentinel up.
    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    fn top(&self) -> Operator {
        self.operators.last().copied().unwrap_or(Operator::End)
    }

    fn reduce(&mut self) -> EvalResult<()> {
        if self.values.len() < 2 || self.operators.len() < 2 {
            return Err(self.fail(EvalError::Syntax));
        }
        let (Some(b), Some(a), Some(op)) =
            (self.values.pop(), self.values.pop(), self.operators.pop())
        else {
            return Err(self.fail(EvalError::Syntax));
        };

        let value = match op {
            Operator::Add => a + b,
            Operator::Sub => a - b,
            Operator::Mul => a * b,
            Operator::Div if b == 0.0 => return Err(self.fail(EvalError::DivideByZero)),
            Operator::Div => a / b,
            Operator::LParen | Operator::RParen | Operator::End => {
                return Err(self.fail(EvalError::Syntax))
            }
        };
        debug!(a, op = %op.symbol(), b, value, "reduce");
        self.values.push(value);
        Ok(())
    }

    fn fail(&mut self, err: EvalError) -> EvalError {
        warn!(%err, "evaluation failed");
        self.error = Some(err);
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(evaluator: &mut Evaluator, items: &[Item]) -> EvalResult<Step> {
        let mut last = Ok(Step::Shifted);
        for item in items {
            last = match *item {
                Item::Num(v) => evaluator.push_number(v).map(|_| Step::Shifted),
                Item::Op(op) => evaluator.push_operator(op),
            };
            if last.is_err() {
                break;
            }
        }
        last
    }

    #[derive(Clone, Copy)]
    enum Item {
        Num(f64),
        Op(Operator),
    }

    use self::Item::{Num, Op};
    use crate::calc_engine::token::Operator::*;

    #[test]
    fn fresh_evaluator_is_empty() {
        let evaluator = Evaluator::new();
        assert_eq!(evaluator.result(), 0.0);
        assert_eq!(evaluator.error(), None);
        assert_eq!(evaluator.error_message(), "OK");
        assert_eq!(evaluator.operators(), &[End]);
    }

    #[test]
    fn multiplication_binds_tighter() {
        let mut ev = Evaluator::new();
        let step = run(
            &mut ev,
            &[Num(1.0), Op(Add), Num(2.0), Op(Mul), Num(3.0), Op(End)],
        );
        assert_eq!(step, Ok(Step::Finished));
        assert_eq!(ev.result(), 7.0);
    }

    #[test]
    fn chained_reductions_before_lower_operator() {
        let mut ev = Evaluator::new();
        run(
            &mut ev,
            &[Num(1.0), Op(Mul), Num(2.0), Op(Mul), Num(3.0), Op(Add)],
        )
        .unwrap();
        assert_eq!(ev.values(), &[6.0]);
        assert_eq!(ev.operators(), &[End, Add]);
    }

    #[test]
    fn subtraction_is_left_associative() {
        let mut ev = Evaluator::new();
        run(
            &mut ev,
            &[Num(10.0), Op(Sub), Num(4.0), Op(Sub), Num(3.0), Op(End)],
        )
        .unwrap();
        assert_eq!(ev.result(), 3.0);
    }

    #[test]
    fn parentheses_override_precedence() {
        let mut ev = Evaluator::new();
        let step = run(
            &mut ev,
            &[
                Op(LParen),
                Num(1.0),
                Op(Add),
                Num(2.0),
                Op(RParen),
                Op(Mul),
                Num(3.0),
                Op(End),
            ],
        );
        assert_eq!(step, Ok(Step::Finished));
        assert_eq!(ev.result(), 9.0);
    }

    #[test]
    fn closing_paren_is_never_stored() {
        let mut ev = Evaluator::new();
        run(&mut ev, &[Op(LParen), Num(4.0)]).unwrap();
        assert_eq!(ev.push_operator(RParen), Ok(Step::ParenClosed));
        assert!(!ev.operators().contains(&RParen));
        assert!(!ev.operators().contains(&LParen));
    }

    #[test]
    fn division_by_zero_is_reported() {
        let mut ev = Evaluator::new();
        let step = run(&mut ev, &[Num(5.0), Op(Div), Num(0.0), Op(End)]);
        assert_eq!(step, Err(EvalError::DivideByZero));
        assert_eq!(ev.error_message(), "Divided By Zero");
    }

    #[test]
    fn missing_operand_is_a_syntax_error() {
        let mut ev = Evaluator::new();
        let step = run(
            &mut ev,
            &[Num(2.0), Op(Add), Op(Mul), Num(3.0), Op(End)],
        );
        assert_eq!(step, Err(EvalError::Syntax));
    }

    #[test]
    fn unbalanced_open_paren_fails_at_end() {
        let mut ev = Evaluator::new();
        let step = run(
            &mut ev,
            &[
                Op(LParen),
                Op(LParen),
                Num(1.0),
                Op(Add),
                Num(2.0),
                Op(RParen),
                Op(Mul),
                Num(3.0),
            ],
        );
        assert!(step.is_ok());
        assert_eq!(ev.push_operator(End), Err(EvalError::Syntax));
    }

    #[test]
    fn stray_closing_paren_is_rejected() {
        let mut ev = Evaluator::new();
        ev.push_number(1.0).unwrap();
        assert_eq!(ev.push_operator(RParen), Err(EvalError::Syntax));
    }

    #[test]
    fn errors_are_sticky_until_reset() {
        let mut ev = Evaluator::new();
        ev.push_operator(RParen).unwrap_err();
        assert_eq!(ev.push_operator(LParen), Err(EvalError::Syntax));

        ev.reset();
        assert_eq!(ev.error(), None);
        assert_eq!(ev.push_operator(LParen), Ok(Step::Shifted));
    }

    #[test]
    fn result_chains_into_next_calculation() {
        let mut ev = Evaluator::new();
        run(&mut ev, &[Num(3.0), Op(Add), Num(4.0), Op(End)]).unwrap();
        assert_eq!(ev.result(), 7.0);

        run(&mut ev, &[Op(Mul), Num(2.0), Op(End)]).unwrap();
        assert_eq!(ev.result(), 14.0);
    }

    #[test]
    fn value_stack_overflow_is_an_error() {
        let mut ev = Evaluator::with_capacity(3);
        for v in 0..3 {
            ev.push_number(v as f64).unwrap();
        }
        assert_eq!(
            ev.push_number(9.0),
            Err(EvalError::Overflow {
                stack: StackKind::Value,
                capacity: 3
            })
        );
        assert_eq!(ev.values(), &[0.0, 1.0, 2.0]);
        assert!(ev.push_operator(End).is_err());
    }

    #[test]
    fn operator_stack_overflow_is_an_error() {
        let mut ev = Evaluator::new();
        for _ in 0..STACK_CAPACITY - 1 {
            ev.push_operator(LParen).unwrap();
        }
        assert_eq!(
            ev.push_operator(LParen),
            Err(EvalError::Overflow {
                stack: StackKind::Operator,
                capacity: STACK_CAPACITY
            })
        );
    }
}
