use super::app::App;
use super::helpers::{align_right, format_with_spaces, highlight_formula, pad_right, KEYPAD};
use crate::render_help::render_help;
use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use pocketcalc::calc_engine::{format_number, Key, Readout};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::time::Duration;

const MIN_TERMINAL_WIDTH: u16 = 40;
const MIN_TERMINAL_HEIGHT: u16 = 20;
const KEY_CELL_WIDTH: usize = 6;

pub fn run_ui_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| {
            if app.show_help {
                render_help(f, app);
            } else {
                ui(f, app);
            }
        })?;

        if app.should_quit {
            break;
        }

        if crossterm::event::poll(Duration::from_millis(50))? {
            match crossterm::event::read()? {
                Event::Key(KeyEvent { code, modifiers, kind, .. }) if kind == KeyEventKind::Press => {
                    handle_key_event(app, code, modifiers);
                }
                Event::Mouse(event) => {
                    handle_mouse_event(app, event);
                }
                _ => {}
            }
        }
    }
    Ok(())
}

fn handle_key_event(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    if modifiers.contains(KeyModifiers::CONTROL) {
        match code {
            KeyCode::Char('c') | KeyCode::Char('C') => app.should_quit = true,
            KeyCode::Char('l') | KeyCode::Char('L') => app.clear_history(),
            _ => {}
        }
        return;
    }

    if app.show_help {
        match code {
            KeyCode::Down => app.help_scroll = app.help_scroll.saturating_add(1),
            KeyCode::Up => app.help_scroll = app.help_scroll.saturating_sub(1),
            KeyCode::PageDown => app.help_scroll = app.help_scroll.saturating_add(10),
            KeyCode::PageUp => app.help_scroll = app.help_scroll.saturating_sub(10),
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') => {
                app.show_help = false;
                app.help_scroll = 0;
            }
            _ => {}
        }
        return;
    }

    match code {
        KeyCode::Char(c) if c.is_ascii_digit() || "+-*/().=".contains(c) => {
            app.press(Key::Char(c))
        }
        KeyCode::Char('%') => app.press(Key::Percent),
        KeyCode::Char('d') | KeyCode::Char('D') => app.press(Key::DoubleZero),
        KeyCode::Char('r') | KeyCode::Char('R') => app.recall_selected(),
        KeyCode::Char('q') | KeyCode::Char('Q') => app.should_quit = true,
        KeyCode::Char('?') | KeyCode::F(1) => {
            app.show_help = true;
            app.help_scroll = 0;
        }
        KeyCode::Enter => app.press(Key::Char('=')),
        KeyCode::Backspace => app.press(Key::Backspace),
        KeyCode::Delete => app.press(Key::ClearEntry),
        KeyCode::Esc => app.press(Key::AllClear),
        KeyCode::Up => app.navigate_history(-1),
        KeyCode::Down => app.navigate_history(1),
        KeyCode::PageUp => app.scroll_history(-1),
        KeyCode::PageDown => app.scroll_history(1),
        _ => {}
    }
}

fn handle_mouse_event(app: &mut App, event: crossterm::event::MouseEvent) {
    if app.show_help {
        match event.kind {
            MouseEventKind::ScrollDown => app.help_scroll = app.help_scroll.saturating_add(3),
            MouseEventKind::ScrollUp => app.help_scroll = app.help_scroll.saturating_sub(3),
            _ => {}
        }
    } else {
        match event.kind {
            MouseEventKind::ScrollDown => app.navigate_history(1),
            MouseEventKind::ScrollUp => app.navigate_history(-1),
            _ => {}
        }
    }
}

fn ui(frame: &mut Frame, app: &mut App) {
    let terminal_size = frame.size();

    app.terminal_too_small =
        terminal_size.width < MIN_TERMINAL_WIDTH || terminal_size.height < MIN_TERMINAL_HEIGHT;

    if app.terminal_too_small {
        render_resize_message(frame, terminal_size);
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(4),
            Constraint::Length(KEYPAD.len() as u16 + 2),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .split(terminal_size);

    render_display(frame, app, layout[0]);
    render_keypad(frame, app, layout[1]);
    render_status(frame, layout[2]);
    render_history(frame, app, layout[3]);
    app.list_height = layout[3].height as usize;
}

/// A `width` x `height` box centered horizontally in `area`.
fn centered(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(area.x + (area.width - width) / 2, area.y, width, height)
}

fn render_resize_message(frame: &mut Frame, area: Rect) {
    let message = format!(
        "Terminal too small! Min size: {}x{}. Current: {}x{}",
        MIN_TERMINAL_WIDTH, MIN_TERMINAL_HEIGHT, area.width, area.height
    );

    let text = vec![
        Line::from(Span::styled(
            message,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Please resize your terminal window",
            Style::default().fg(Color::Yellow),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Resize Required ")
        .title_alignment(Alignment::Center);

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn render_display(frame: &mut Frame, app: &App, area: Rect) {
    let width = app.display_width;
    let lcd = centered(width as u16 + 2, area.height, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Thick)
        .border_style(Style::default().fg(Color::Green))
        .title(" pocketcalc ")
        .title_alignment(Alignment::Center);

    let readout = app.calculator.readout();
    let text = readout.text();
    let second = if readout.is_right_aligned() {
        align_right(&text, width)
    } else {
        pad_right(&text, width)
    };
    let second_style = match readout {
        Readout::Error(_) => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        Readout::Result(_) => Style::default()
            .fg(Color::LightMagenta)
            .add_modifier(Modifier::BOLD),
        Readout::Operator(_) => Style::default().fg(Color::Yellow),
        Readout::Input(_) => Style::default().fg(Color::White),
    };

    let lines = vec![
        Line::from(Span::styled(
            pad_right(app.calculator.formula_line(width), width),
            Style::default().fg(Color::Cyan),
        )),
        Line::from(Span::styled(second, second_style)),
    ];

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, lcd);
}

fn render_keypad(frame: &mut Frame, app: &App, area: Rect) {
    let width = (KEY_CELL_WIDTH * 4) as u16 + 2;
    let pad = centered(width, area.height, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let lines: Vec<Line> = KEYPAD
        .iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|cell| match cell {
                    Some((label, key)) => {
                        let style = if app.last_key == Some(*key) {
                            Style::default()
                                .fg(Color::Black)
                                .bg(Color::Yellow)
                                .add_modifier(Modifier::BOLD)
                        } else {
                            Style::default().fg(Color::Gray)
                        };
                        Span::styled(format!("{:^width$}", label, width = KEY_CELL_WIDTH), style)
                    }
                    None => Span::raw(" ".repeat(KEY_CELL_WIDTH)),
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), pad);
}

fn render_history(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" History ")
        .title_alignment(Alignment::Center);

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    if app.history.is_empty() {
        let empty_msg = Paragraph::new("No calculations yet. Finish one with = or Enter.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(empty_msg, inner_area);
        return;
    }

    let items: Vec<ListItem> = app
        .history
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let is_selected = i == app.cursor_history;
            let base_style = Style::default().fg(if is_selected {
                Color::Yellow
            } else {
                Color::Cyan
            });

            let mut spans = vec![Span::styled("> ", Style::default().fg(Color::Green))];
            spans.extend(highlight_formula(
                &format_with_spaces(&entry.formula),
                base_style,
            ));
            spans.push(Span::raw(" "));
            match &entry.result {
                Ok(value) => spans.push(Span::styled(
                    format_number(*value),
                    Style::default()
                        .fg(Color::LightMagenta)
                        .add_modifier(Modifier::BOLD),
                )),
                Err(e) => spans.push(Span::styled(
                    format!("Error: {}", e),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let visible = inner_area.height as usize;
    if app.scroll_to_bottom {
        app.history_scroll = items.len().saturating_sub(visible);
        app.scroll_to_bottom = false;
    }
    // keep the selection on screen
    if app.cursor_history < app.history_scroll {
        app.history_scroll = app.cursor_history;
    } else if visible > 0 && app.cursor_history >= app.history_scroll + visible {
        app.history_scroll = app.cursor_history + 1 - visible;
    }

    let list = List::new(items)
        .block(Block::default())
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    let mut state = ListState::default()
        .with_selected(Some(app.cursor_history))
        .with_offset(app.history_scroll);

    frame.render_stateful_widget(list, inner_area, &mut state);
}

fn render_status(frame: &mut Frame, area: Rect) {
    let keys = [
        ("Enter", "="),
        ("Bksp", "BS"),
        ("Del", "CE"),
        ("Esc", "AC"),
        ("d", "00"),
        ("r", "Recall"),
        ("?", "Help"),
        ("q", "Quit"),
    ];

    let spans: Vec<Span> = keys
        .iter()
        .flat_map(|(key, desc)| {
            vec![
                Span::styled(
                    *key,
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!(" {} ", desc), Style::default().fg(Color::DarkGray)),
            ]
        })
        .collect();

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
