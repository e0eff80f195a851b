//! Incremental lexer: composes one numeric literal at a time from single key
//! characters and classifies everything else as an operator token.
//!
//! Transitions live in a static table keyed by (state, event). A minus seen
//! while idle is taken as the sign of a new literal; in any other state it
//! ends the literal and comes back as subtraction.

use tracing::trace;

use super::token::Token;

/// Where the lexer is in composing the current literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexerState {
    /// No literal in progress.
    Idle,
    /// Composing integer digits.
    Int,
    /// Decimal point just consumed.
    Dot,
    /// Composing fractional digits.
    Frac,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Digit,
    Dot,
    Minus,
    Plus,
    Mul,
    Div,
    LParen,
    RParen,
    End,
    Other,
}

impl Event {
    fn classify(c: char) -> Self {
        if c.is_ascii_digit() {
            return Event::Digit;
        }
        match c {
            '.' => Event::Dot,
            '-' => Event::Minus,
            '+' => Event::Plus,
            '*' => Event::Mul,
            '/' => Event::Div,
            '(' => Event::LParen,
            ')' => Event::RParen,
            '=' => Event::End,
            _ => Event::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Action {
    StartInt,
    StartNegative,
    StartFraction,
    AppendInt,
    EnterDot,
    AppendFrac,
    Ignore,
    Emit(Token),
}

#[derive(Debug, Clone, Copy)]
struct Rule {
    from: LexerState,
    event: Event,
    to: LexerState,
    action: Action,
}

const fn rule(from: LexerState, event: Event, to: LexerState, action: Action) -> Rule {
    Rule {
        from,
        event,
        to,
        action,
    }
}

use self::Action::*;
use self::LexerState::{Dot as DotS, Frac, Idle, Int};

static RULES: [Rule; 36] = [
    // idle: digits, '.' and '-' open a literal, operators pass straight through
    rule(Idle, Event::Digit, Int, StartInt),
    rule(Idle, Event::Dot, DotS, StartFraction),
    rule(Idle, Event::Minus, Int, StartNegative),
    rule(Idle, Event::Plus, Idle, Emit(Token::Add)),
    rule(Idle, Event::Mul, Idle, Emit(Token::Mul)),
    rule(Idle, Event::Div, Idle, Emit(Token::Div)),
    rule(Idle, Event::LParen, Idle, Emit(Token::LParen)),
    rule(Idle, Event::RParen, Idle, Emit(Token::RParen)),
    rule(Idle, Event::End, Idle, Emit(Token::End)),
    // integer part
    rule(Int, Event::Digit, Int, AppendInt),
    rule(Int, Event::Dot, DotS, EnterDot),
    rule(Int, Event::Minus, Idle, Emit(Token::Sub)),
    rule(Int, Event::Plus, Idle, Emit(Token::Add)),
    rule(Int, Event::Mul, Idle, Emit(Token::Mul)),
    rule(Int, Event::Div, Idle, Emit(Token::Div)),
    rule(Int, Event::LParen, Idle, Emit(Token::LParen)),
    rule(Int, Event::RParen, Idle, Emit(Token::RParen)),
    rule(Int, Event::End, Idle, Emit(Token::End)),
    // right after the point: "12." reads as 12.0
    rule(DotS, Event::Digit, Frac, AppendFrac),
    rule(DotS, Event::Dot, DotS, Ignore),
    rule(DotS, Event::Minus, Idle, Emit(Token::Sub)),
    rule(DotS, Event::Plus, Idle, Emit(Token::Add)),
    rule(DotS, Event::Mul, Idle, Emit(Token::Mul)),
    rule(DotS, Event::Div, Idle, Emit(Token::Div)),
    rule(DotS, Event::LParen, Idle, Emit(Token::LParen)),
    rule(DotS, Event::RParen, Idle, Emit(Token::RParen)),
    rule(DotS, Event::End, Idle, Emit(Token::End)),
    // fractional part
    rule(Frac, Event::Digit, Frac, AppendFrac),
    rule(Frac, Event::Dot, Frac, Ignore),
    rule(Frac, Event::Minus, Idle, Emit(Token::Sub)),
    rule(Frac, Event::Plus, Idle, Emit(Token::Add)),
    rule(Frac, Event::Mul, Idle, Emit(Token::Mul)),
    rule(Frac, Event::Div, Idle, Emit(Token::Div)),
    rule(Frac, Event::LParen, Idle, Emit(Token::LParen)),
    rule(Frac, Event::RParen, Idle, Emit(Token::RParen)),
    rule(Frac, Event::End, Idle, Emit(Token::End)),
];

#[derive(Debug, Clone, Copy, PartialEq)]
struct Accumulator {
    value: f64,
    // +1.0 or -1.0
    sign: f64,
    scale: f64,
}

impl Default for Accumulator {
    fn default() -> Self {
        Accumulator {
            value: 0.0,
            sign: 1.0,
            scale: 0.1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Lexer {
    state: LexerState,
    acc: Accumulator,
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexer {
    pub fn new() -> Self {
        Lexer {
            state: LexerState::Idle,
            acc: Accumulator::default(),
        }
    }

    /// Feed one character. While a literal is being composed the result is
    /// `Token::Number` carrying the value so far; operators and `=` come back
    /// as their own tokens. Unrecognized characters yield `Token::Error` and
    /// leave the lexer untouched.
    ///
    /// The finished literal stays readable through [`Lexer::current_value`]
    /// after an operator token ends it, until the next literal starts.
    pub fn process_char(&mut self, c: char) -> Token {
        let event = Event::classify(c);
        let Some(rule) = RULES
            .iter()
            .find(|r| r.from == self.state && r.event == event)
        else {
            trace!(?c, state = ?self.state, "unrecognized key");
            return Token::Error;
        };

        let token = self.apply(rule.action, c);
        trace!(?c, from = ?rule.from, to = ?rule.to, ?token, "lexer transition");
        self.state = rule.to;
        token
    }

    fn apply(&mut self, action: Action, c: char) -> Token {
        let digit = c.to_digit(10).map_or(0.0, f64::from);
        match action {
            StartInt => {
                self.acc.sign = 1.0;
                self.acc.value = digit;
            }
            StartNegative => {
                self.acc.sign = -1.0;
                self.acc.value = 0.0;
            }
            StartFraction => {
                self.acc.sign = 1.0;
                self.acc.value = 0.0;
                self.acc.scale = 0.1;
            }
            AppendInt => self.acc.value = self.acc.value * 10.0 + digit,
            EnterDot => self.acc.scale = 0.1,
            AppendFrac => {
                self.acc.value += digit * self.acc.scale;
                self.acc.scale *= 0.1;
            }
            Ignore => {}
            Emit(token) => return token,
        }
        Token::Number(self.current_value())
    }

    pub fn current_value(&self) -> f64 {
        self.acc.value * self.acc.sign
    }

    pub fn current_state(&self) -> LexerState {
        self.state
    }

    /// True while a literal is in progress.
    pub fn is_composing(&self) -> bool {
        self.state != LexerState::Idle
    }

    pub fn reset_all(&mut self) {
        self.acc = Accumulator::default();
        self.state = LexerState::Idle;
    }

    /// Drop the literal in progress. Nothing in the accumulator is worth
    /// keeping, so this is a full reset.
    pub fn clear_current(&mut self) {
        self.reset_all();
    }
}
