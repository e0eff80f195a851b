//! Keypad session: the caller loop that drives one lexer and one evaluator
//! from key presses and keeps the two display lines up to date.

use tracing::{debug, trace};
use unicode_segmentation::UnicodeSegmentation;

use super::error::EvalError;
use super::evaluator::{Evaluator, STACK_CAPACITY};
use super::formatter::format_number;
use super::lexer::{Lexer, LexerState};
use super::token::{Operator, Token};

pub const FORMULA_CAPACITY: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// One character of the core alphabet. Anything else is ignored.
    Char(char),
    /// Two zeros in a row.
    DoubleZero,
    /// Divide by one hundred, entered as `/100`.
    Percent,
    AllClear,
    ClearEntry,
    Backspace,
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        match c {
            '%' => Key::Percent,
            _ => Key::Char(c),
        }
    }
}

/// Contents of the second display line.
#[derive(Debug, Clone, PartialEq)]
pub enum Readout {
    Input(String),
    Operator(char),
    Result(String),
    Error(EvalError),
}

impl Readout {
    pub fn text(&self) -> String {
        match self {
            Readout::Input(text) => text.clone(),
            Readout::Operator(c) => format!("OP: {c}"),
            Readout::Result(text) => format!("={text}"),
            Readout::Error(err) => err.to_string(),
        }
    }

    /// Results are shown flush right, everything else flush left.
    pub fn is_right_aligned(&self) -> bool {
        matches!(self, Readout::Result(_))
    }
}

/// A calculation that ended with `=` or with an error.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Everything typed, including the final key.
    pub formula: String,
    pub result: Result<f64, EvalError>,
}

#[derive(Debug, Clone)]
pub struct Calculator {
    lexer: Lexer,
    evaluator: Evaluator,
    formula: String,
    formula_capacity: usize,
    // start of the literal being typed, for clear-entry and backspace
    last_op_index: usize,
    calculated: bool,
    operand_expected: bool,
    // a literal character fell past the formula capacity
    clipped: bool,
    readout: Readout,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator {
    pub fn new() -> Self {
        Self::with_limits(FORMULA_CAPACITY, STACK_CAPACITY)
    }

    pub fn with_limits(formula_capacity: usize, stack_capacity: usize) -> Self {
        Calculator {
            lexer: Lexer::new(),
            evaluator: Evaluator::with_capacity(stack_capacity),
            formula: String::with_capacity(formula_capacity),
            formula_capacity,
            last_op_index: 0,
            calculated: false,
            operand_expected: true,
            clipped: false,
            readout: Readout::Input("0".to_string()),
        }
    }

    pub fn reset(&mut self) {
        self.evaluator.reset();
        self.lexer.reset_all();
        self.formula.clear();
        self.last_op_index = 0;
        self.calculated = false;
        self.operand_expected = true;
        self.clipped = false;
        self.readout = Readout::Input("0".to_string());
    }

    /// Handle one key. Returns the outcome when the key ends a calculation.
    pub fn press(&mut self, key: Key) -> Option<Outcome> {
        debug!(?key, "key pressed");
        match key {
            Key::AllClear => {
                self.reset();
                None
            }
            Key::DoubleZero => self.on_chars("00"),
            Key::Percent => self.on_chars("/100"),
            _ => self.on_key(key),
        }
    }

    /// Keys that expand to several characters stop at the first outcome.
    fn on_chars(&mut self, chars: &str) -> Option<Outcome> {
        for c in chars.chars() {
            if let Some(outcome) = self.on_key(Key::Char(c)) {
                return Some(outcome);
            }
        }
        None
    }

    /// Feed a string one grapheme at a time until a calculation ends.
    /// Whitespace is skipped and clusters that are not a single character
    /// count as unrecognized keys. Input after the ending key is not read.
    pub fn feed_str(&mut self, input: &str) -> Option<Outcome> {
        for grapheme in input.graphemes(true) {
            let mut chars = grapheme.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_whitespace() => {}
                (Some(c), None) => {
                    if let Some(outcome) = self.press(Key::from(c)) {
                        return Some(outcome);
                    }
                }
                _ => trace!(grapheme, "skipping multi-character cluster"),
            }
        }
        None
    }

    fn on_key(&mut self, key: Key) -> Option<Outcome> {
        if self.calculated {
            match key {
                // a new number starts a new calculation
                Key::Char(c) if c.is_ascii_digit() || c == '.' => self.reset(),
                // an operator carries on from the result
                Key::Char(c) if is_operator_char(c) => {
                    self.last_op_index = self.formula.len();
                    self.calculated = false;
                    self.clipped = false;
                }
                _ => return None,
            }
        }

        match key {
            Key::ClearEntry => {
                if self.lexer.is_composing() {
                    self.lexer.clear_current();
                    self.clipped = false;
                    self.formula.truncate(self.last_op_index);
                    self.readout = Readout::Input(self.preview());
                }
                None
            }
            // a clipped literal cannot be replayed from the formula
            Key::Backspace => {
                if self.lexer.is_composing()
                    && !self.clipped
                    && self.formula.len() > self.last_op_index
                {
                    self.formula.pop();
                    self.replay_literal();
                    self.readout = Readout::Input(self.preview());
                }
                None
            }
            Key::Char(c) => self.on_char(c),
            Key::DoubleZero | Key::Percent | Key::AllClear => None,
        }
    }

    fn on_char(&mut self, c: char) -> Option<Outcome> {
        let composing = self.lexer.is_composing();

        // After `)` or a result the lexer sits idle and would read a minus as
        // a sign; here it can only mean subtraction. After an error it has to
        // reach the evaluator to report that error again.
        let subtracts = !composing && !self.operand_expected;
        if c == '-' && (subtracts || self.evaluator.error().is_some()) {
            return self.apply_operator(Operator::Sub, c, false);
        }

        match self.lexer.process_char(c) {
            Token::Number(_) => {
                if !self.append(c) {
                    self.clipped = true;
                }
                self.readout = Readout::Input(self.preview());
                None
            }
            Token::Error => None,
            Token::End => self.finish(composing),
            token => token
                .operator()
                .and_then(|op| self.apply_operator(op, c, composing)),
        }
    }

    fn apply_operator(&mut self, op: Operator, c: char, composing: bool) -> Option<Outcome> {
        if composing {
            if let Err(err) = self.evaluator.push_number(self.lexer.current_value()) {
                return Some(self.fail(c, err));
            }
        }
        match self.evaluator.push_operator(op) {
            Ok(_) => {
                self.append(c);
                self.last_op_index = self.formula.len();
                self.clipped = false;
                self.operand_expected = op != Operator::RParen;
                self.readout = Readout::Operator(c);
                None
            }
            Err(err) => Some(self.fail(c, err)),
        }
    }

    fn finish(&mut self, composing: bool) -> Option<Outcome> {
        if composing {
            if let Err(err) = self.evaluator.push_number(self.lexer.current_value()) {
                return Some(self.fail('=', err));
            }
        }
        if let Err(err) = self.evaluator.push_operator(Operator::End) {
            return Some(self.fail('=', err));
        }

        let value = self.evaluator.result();
        self.append('=');
        let formula = std::mem::take(&mut self.formula);
        let text = format_number(value);
        debug!(%formula, result = %text, "calculation finished");

        // the result becomes the start of the next formula
        self.formula.push_str(&text);
        self.readout = Readout::Result(text);
        self.calculated = true;
        self.operand_expected = false;
        self.lexer.reset_all();

        Some(Outcome {
            formula,
            result: Ok(value),
        })
    }

    fn fail(&mut self, c: char, err: EvalError) -> Outcome {
        self.append(c);
        self.readout = Readout::Error(err);
        self.calculated = true;
        Outcome {
            formula: self.formula.clone(),
            result: Err(err),
        }
    }

    /// Returns false when the formula is full and `c` was not stored.
    fn append(&mut self, c: char) -> bool {
        if self.formula.len() < self.formula_capacity {
            self.formula.push(c);
            true
        } else {
            false
        }
    }

    fn replay_literal(&mut self) {
        self.lexer.clear_current();
        let literal = self.formula[self.last_op_index..].to_string();
        for c in literal.chars() {
            self.lexer.process_char(c);
        }
    }

    fn preview(&self) -> String {
        let value = self.lexer.current_value();
        let mut text = if value == 0.0 && value.is_sign_negative() {
            "-0".to_string()
        } else {
            format_number(value)
        };
        if self.lexer.current_state() == LexerState::Dot {
            text.push('.');
        }
        text
    }

    /// Everything typed so far, or the last result.
    pub fn formula(&self) -> &str {
        &self.formula
    }

    /// The rightmost `width` characters of the formula.
    pub fn formula_line(&self, width: usize) -> &str {
        let len = self.formula.len();
        &self.formula[len.saturating_sub(width)..]
    }

    pub fn readout(&self) -> &Readout {
        &self.readout
    }

    /// True after `=` or an error until the next calculation starts.
    pub fn is_calculated(&self) -> bool {
        self.calculated
    }

    pub fn lexer(&self) -> &Lexer {
        &self.lexer
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }
}

fn is_operator_char(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/' | '(' | ')' | '=')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calc(input: &str) -> (Calculator, Option<Outcome>) {
        let mut calculator = Calculator::new();
        let outcome = calculator.feed_str(input);
        (calculator, outcome)
    }

    fn result_of(input: &str) -> Result<f64, EvalError> {
        calc(input).1.expect("calculation should finish").result
    }

    #[test]
    fn evaluates_with_precedence() {
        assert_eq!(result_of("1+2*3="), Ok(7.0));
        assert_eq!(result_of("(1+2)*3="), Ok(9.0));
        assert_eq!(result_of("10-4-3="), Ok(3.0));
        assert_eq!(result_of("2*3+4*5="), Ok(26.0));
    }

    #[test]
    fn reports_errors() {
        assert_eq!(result_of("5/0="), Err(EvalError::DivideByZero));
        assert_eq!(result_of("2+*3="), Err(EvalError::Syntax));
        assert_eq!(result_of("((1+2)*3="), Err(EvalError::Syntax));
    }

    #[test]
    fn error_shows_on_second_line() {
        let (calculator, _) = calc("5/0=");
        assert_eq!(calculator.readout().text(), "Divided By Zero");
        assert_eq!(calculator.formula(), "5/0=");
        assert!(calculator.is_calculated());
    }

    #[test]
    fn unary_minus_inside_parentheses() {
        assert_eq!(result_of("(-5)*2="), Ok(-10.0));
        assert_eq!(result_of("-5+3="), Ok(-2.0));
        assert_eq!(result_of("3*-2="), Ok(-6.0));
    }

    #[test]
    fn minus_after_closing_paren_subtracts() {
        assert_eq!(result_of("(2+3)-1="), Ok(4.0));
    }

    #[test]
    fn result_line_shows_formatted_value() {
        let (calculator, outcome) = calc("1/3=");
        assert_eq!(calculator.readout().text(), "=0.333333");
        assert!(calculator.readout().is_right_aligned());
        assert_eq!(calculator.formula(), "0.333333");
        assert_eq!(outcome.unwrap().formula, "1/3=");
    }

    #[test]
    fn operator_continues_from_result() {
        let mut calculator = Calculator::new();
        calculator.feed_str("3+4=");
        let outcome = calculator.feed_str("*2=").unwrap();
        assert_eq!(outcome.result, Ok(14.0));
        assert_eq!(outcome.formula, "7*2=");

        let outcome = calculator.feed_str("-20=").unwrap();
        assert_eq!(outcome.result, Ok(-6.0));
    }

    #[test]
    fn digit_after_result_starts_over() {
        let mut calculator = Calculator::new();
        calculator.feed_str("3+4=");
        calculator.press(Key::Char('5'));
        assert!(!calculator.is_calculated());
        assert_eq!(calculator.formula(), "5");
        assert_eq!(calculator.feed_str("+1=").unwrap().result, Ok(6.0));
    }

    #[test]
    fn live_preview_follows_the_literal() {
        let mut calculator = Calculator::new();
        assert_eq!(calculator.readout().text(), "0");
        calculator.feed_str("12.");
        assert_eq!(calculator.readout().text(), "12.");
        calculator.press(Key::Char('5'));
        assert_eq!(calculator.readout().text(), "12.5");
        calculator.press(Key::Char('+'));
        assert_eq!(calculator.readout().text(), "OP: +");
        calculator.press(Key::Char('-'));
        assert_eq!(calculator.readout().text(), "-0");
    }

    #[test]
    fn clear_entry_drops_only_the_literal() {
        let mut calculator = Calculator::new();
        calculator.feed_str("12+345");
        calculator.press(Key::ClearEntry);
        assert_eq!(calculator.formula(), "12+");
        assert_eq!(calculator.readout().text(), "0");
        calculator.press(Key::ClearEntry);
        assert_eq!(calculator.formula(), "12+");
        assert_eq!(calculator.feed_str("8=").unwrap().result, Ok(20.0));
    }

    #[test]
    fn backspace_replays_the_literal() {
        let mut calculator = Calculator::new();
        calculator.feed_str("7*12.5");
        calculator.press(Key::Backspace);
        assert_eq!(calculator.formula(), "7*12.");
        assert_eq!(calculator.readout().text(), "12.");
        calculator.press(Key::Backspace);
        calculator.press(Key::Backspace);
        assert_eq!(calculator.formula(), "7*1");
        assert_eq!(calculator.feed_str("=").unwrap().result, Ok(7.0));
    }

    #[test]
    fn backspace_does_not_cross_an_operator() {
        let mut calculator = Calculator::new();
        calculator.feed_str("9+");
        calculator.press(Key::Backspace);
        assert_eq!(calculator.formula(), "9+");
    }

    #[test]
    fn double_zero_and_percent_expand() {
        let mut calculator = Calculator::new();
        calculator.press(Key::Char('5'));
        calculator.press(Key::DoubleZero);
        assert_eq!(calculator.formula(), "500");
        calculator.press(Key::Percent);
        assert_eq!(calculator.formula(), "500/100");
        assert_eq!(calculator.feed_str("=").unwrap().result, Ok(5.0));

        assert_eq!(result_of("50%="), Ok(0.5));
    }

    #[test]
    fn percent_reports_an_error_it_triggers() {
        let mut calculator = Calculator::new();
        assert_eq!(calculator.feed_str("5/0"), None);
        let outcome = calculator.press(Key::Percent);
        assert_eq!(outcome.map(|o| o.result), Some(Err(EvalError::DivideByZero)));
        assert_eq!(calculator.readout(), &Readout::Error(EvalError::DivideByZero));
        assert_eq!(calculator.formula(), "5/0/");
    }

    #[test]
    fn minus_after_an_error_repeats_it() {
        let (mut calculator, outcome) = calc("2+*3=");
        assert_eq!(outcome.unwrap().result, Err(EvalError::Syntax));
        let outcome = calculator.press(Key::Char('-'));
        assert_eq!(outcome.map(|o| o.result), Some(Err(EvalError::Syntax)));
        assert_eq!(calculator.readout().text(), "Syntax Error");
    }

    #[test]
    fn all_clear_resets_everything() {
        let mut calculator = Calculator::new();
        calculator.feed_str("5/0=");
        calculator.press(Key::AllClear);
        assert_eq!(calculator.formula(), "");
        assert_eq!(calculator.evaluator().error(), None);
        assert_eq!(calculator.evaluator().result(), 0.0);
        assert_eq!(calculator.feed_str("2*2=").unwrap().result, Ok(4.0));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let (calculator, outcome) = calc("1 x+ 2 é=");
        assert_eq!(outcome.unwrap().result, Ok(3.0));
        assert_eq!(calculator.formula(), "3");
    }

    #[test]
    fn formula_is_bounded() {
        let mut calculator = Calculator::with_limits(4, STACK_CAPACITY);
        calculator.feed_str("1+2+3");
        assert_eq!(calculator.formula(), "1+2+");
        assert_eq!(calculator.formula_line(2), "2+");
        assert_eq!(calculator.feed_str("=").unwrap().result, Ok(6.0));
    }

    #[test]
    fn backspace_is_ignored_once_digits_were_clipped() {
        let mut calculator = Calculator::with_limits(4, STACK_CAPACITY);
        calculator.feed_str("1+234");
        assert_eq!(calculator.formula(), "1+23");
        assert_eq!(calculator.readout().text(), "234");

        calculator.press(Key::Backspace);
        assert_eq!(calculator.readout().text(), "234");
        assert_eq!(calculator.feed_str("=").unwrap().result, Ok(235.0));
    }

    #[test]
    fn backspace_works_again_after_clear_entry() {
        let mut calculator = Calculator::with_limits(4, STACK_CAPACITY);
        calculator.feed_str("1+234");
        calculator.press(Key::ClearEntry);
        assert_eq!(calculator.formula(), "1+");
        calculator.feed_str("56");
        calculator.press(Key::Backspace);
        assert_eq!(calculator.readout().text(), "5");
        assert_eq!(calculator.feed_str("=").unwrap().result, Ok(6.0));
    }

    #[test]
    fn deep_nesting_overflows_the_stack() {
        let (calculator, outcome) = calc(&"(".repeat(STACK_CAPACITY));
        assert!(matches!(
            outcome.unwrap().result,
            Err(EvalError::Overflow { .. })
        ));
        assert!(calculator.is_calculated());
    }

    #[test]
    fn feeding_stops_at_the_first_outcome() {
        let (calculator, outcome) = calc("(1))+2=");
        assert_eq!(outcome.unwrap().result, Err(EvalError::Syntax));
        assert_eq!(calculator.formula(), "(1))");
    }

    #[test]
    fn empty_calculation_yields_zero() {
        assert_eq!(result_of("="), Ok(0.0));
    }
}
