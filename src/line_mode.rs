use anyhow::{Context, Result};
use pocketcalc::calc_engine::{format_number, Key as CalcKey};
use pocketcalc::Config;
use std::io::{stdin, stdout, Write};
use termion::{
    clear::CurrentLine as ClearLine,
    cursor::Up,
    event::Key,
    input::TermRead,
    raw::IntoRawMode,
};
use unicode_width::UnicodeWidthStr;

/// Map a terminal key to a keypad key. `None` means the key has no keypad
/// counterpart.
fn keypad_key(key: Key) -> Option<CalcKey> {
    match key {
        Key::Char('\n') => Some(CalcKey::Char('=')),
        Key::Char('d') | Key::Char('D') => Some(CalcKey::DoubleZero),
        Key::Char(c) => Some(CalcKey::from(c)),
        Key::Backspace => Some(CalcKey::Backspace),
        Key::Delete => Some(CalcKey::ClearEntry),
        Key::Esc => Some(CalcKey::AllClear),
        _ => None,
    }
}

pub fn run_line(config: &Config) -> Result<()> {
    println!("pocketcalc");
    println!("Keys: 0-9 . + - * / ( ) % =, d for 00");
    println!("Enter evaluates, Backspace deletes a digit, Delete is CE, Esc is AC");
    println!("q or Ctrl+C quits\n");

    let mut stdout = stdout()
        .into_raw_mode()
        .context("cannot switch the terminal to raw mode")?;
    let mut calculator = config.calculator();
    let width = config.display_width;

    // the cursor rests on the second display line
    write!(stdout, "\r\n")?;

    let stdin = stdin();
    for key in stdin.keys() {
        let key = key?;
        if matches!(key, Key::Char('q') | Key::Char('Q') | Key::Ctrl('c')) {
            break;
        }
        let Some(key) = keypad_key(key) else {
            continue;
        };

        if let Some(outcome) = calculator.press(key) {
            let summary = match outcome.result {
                Ok(value) => format!("{} {}", outcome.formula, format_number(value)),
                Err(e) => format!("{} {}", outcome.formula, e),
            };
            write!(stdout, "\r{}{}\r{}{}\r\n\r\n", ClearLine, Up(1), ClearLine, summary)?;
        }

        let readout = calculator.readout();
        let text = readout.text();
        let second = if readout.is_right_aligned() {
            format!("{}{}", " ".repeat(width.saturating_sub(text.width())), text)
        } else {
            text
        };
        write!(
            stdout,
            "\r{}{}\r{}{}\r\n{}{}",
            ClearLine,
            Up(1),
            ClearLine,
            calculator.formula_line(width),
            ClearLine,
            second,
        )?;
        stdout.flush()?;
    }

    write!(stdout, "\r\n\r\nGoodbye!\r\n")?;
    stdout.flush()?;
    Ok(())
}
