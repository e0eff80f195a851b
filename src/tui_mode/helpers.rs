use pocketcalc::calc_engine::Key;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use unicode_width::UnicodeWidthStr;

/// Keypad legend, laid out like the physical calculator.
pub const KEYPAD: [[Option<(&str, Key)>; 4]; 6] = [
    [
        Some(("7", Key::Char('7'))),
        Some(("8", Key::Char('8'))),
        Some(("9", Key::Char('9'))),
        Some(("/", Key::Char('/'))),
    ],
    [
        Some(("4", Key::Char('4'))),
        Some(("5", Key::Char('5'))),
        Some(("6", Key::Char('6'))),
        Some(("*", Key::Char('*'))),
    ],
    [
        Some(("1", Key::Char('1'))),
        Some(("2", Key::Char('2'))),
        Some(("3", Key::Char('3'))),
        Some(("-", Key::Char('-'))),
    ],
    [
        Some(("00", Key::DoubleZero)),
        Some(("0", Key::Char('0'))),
        Some((".", Key::Char('.'))),
        Some(("+", Key::Char('+'))),
    ],
    [
        Some(("(", Key::Char('('))),
        Some((")", Key::Char(')'))),
        Some(("%", Key::Percent)),
        Some(("=", Key::Char('='))),
    ],
    [
        Some(("AC", Key::AllClear)),
        Some(("CE", Key::ClearEntry)),
        None,
        Some(("BS", Key::Backspace)),
    ],
];

/// Pad `text` on the left so it ends at column `width`.
pub fn align_right(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(text.width());
    format!("{}{}", " ".repeat(pad), text)
}

/// Pad `text` on the right to exactly `width` columns.
pub fn pad_right(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(pad))
}

/// Space out binary operators for the history list. A minus that opens a
/// number stays attached to it.
pub fn format_with_spaces(formula: &str) -> String {
    let mut result = String::new();
    let mut prev: Option<char> = None;

    for c in formula.chars() {
        let binary = match c {
            '+' | '*' | '/' | '=' => true,
            '-' => matches!(prev, Some(p) if p.is_ascii_digit() || p == '.' || p == ')'),
            _ => false,
        };
        if binary {
            result.push(' ');
            result.push(c);
            result.push(' ');
        } else {
            result.push(c);
        }
        prev = Some(c);
    }

    result.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn highlight_formula(formula: &str, base_style: Style) -> Vec<Span<'static>> {
    let operator_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let number_style = Style::default().fg(Color::LightGreen);

    let mut spans = Vec::new();
    let mut number = String::new();
    let mut prev: Option<char> = None;

    for c in formula.chars() {
        let signs_number =
            c == '-' && number.is_empty() && !matches!(prev, Some(p) if p == ')' || p == ' ');
        if c.is_ascii_digit() || c == '.' || signs_number {
            number.push(c);
        } else {
            if !number.is_empty() {
                spans.push(Span::styled(std::mem::take(&mut number), number_style));
            }
            match c {
                '+' | '-' | '*' | '/' | '=' => {
                    spans.push(Span::styled(c.to_string(), operator_style));
                }
                ' ' => spans.push(Span::raw(" ")),
                _ => spans.push(Span::styled(c.to_string(), base_style)),
            }
        }
        prev = Some(c);
    }

    if !number.is_empty() {
        spans.push(Span::styled(number, number_style));
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_binary_operators_only() {
        assert_eq!(format_with_spaces("1+2*3="), "1 + 2 * 3 =");
        assert_eq!(format_with_spaces("-5*(-2)-1="), "-5 * (-2) - 1 =");
        assert_eq!(format_with_spaces("3*-2="), "3 * -2 =");
    }

    #[test]
    fn alignment_pads_to_width() {
        assert_eq!(align_right("=7", 5), "   =7");
        assert_eq!(pad_right("12", 4), "12  ");
        assert_eq!(align_right("too long", 3), "too long");
    }

    #[test]
    fn highlight_keeps_every_character() {
        let text = "-5 * (-2) - 1 =";
        let spans = highlight_formula(text, Style::default());
        let joined: String = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(joined, text);
    }
}
