use crate::tui_mode::app::App;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

fn heading(text: &str) -> Line<'_> {
    Line::from(Span::styled(
        text,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::UNDERLINED),
    ))
}

pub fn render_help(frame: &mut Frame, app: &mut App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" pocketcalc Help ")
        .title_alignment(Alignment::Center)
        .style(Style::default().bg(Color::Black));

    let help_text = vec![
        Line::from(Span::styled(
            "pocketcalc - Four-Function Keypad Calculator",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        heading("Keys:"),
        Line::from("  0-9 .     : Type a number"),
        Line::from("  d         : Double zero (00)"),
        Line::from("  + - * /   : Operators, * and / bind tighter"),
        Line::from("  ( )       : Group a sub-expression"),
        Line::from("  %         : Divide the current value by 100"),
        Line::from("  = Enter   : Evaluate"),
        Line::from(""),
        heading("Editing:"),
        Line::from("  Backspace : Delete the last digit of the current number"),
        Line::from("  Delete    : CE, clear the current number"),
        Line::from("  Esc       : AC, clear everything"),
        Line::from(""),
        heading("Display:"),
        Line::from("  Line 1 shows the tail of the formula."),
        Line::from("  Line 2 shows the number being typed, the last operator"),
        Line::from("  as OP: x, or the result as =value."),
        Line::from("  Results keep six significant digits."),
        Line::from(""),
        heading("After a result:"),
        Line::from("  A digit starts a new calculation."),
        Line::from("  An operator continues from the result (3+4= then *2=)."),
        Line::from(""),
        heading("Errors:"),
        Line::from("  Syntax Error    : Misplaced operator or parenthesis"),
        Line::from("  Divided By Zero : Division by zero"),
        Line::from("  Stack Full      : Nesting too deep"),
        Line::from("  Press any digit or Esc to start over."),
        Line::from(""),
        heading("History:"),
        Line::from("  ↑ ↓       : Select a calculation"),
        Line::from("  PgUp/PgDn : Page through history"),
        Line::from("  r         : Recall the selected result"),
        Line::from("  Ctrl+L    : Clear history"),
        Line::from("  Mouse wheel : Scroll through history"),
        Line::from(""),
        heading("Other:"),
        Line::from("  ? F1      : Toggle this screen"),
        Line::from("  q Ctrl+C  : Quit"),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll as u16, 0));

    frame.render_widget(Clear, frame.size());
    frame.render_widget(paragraph, frame.size());
}
