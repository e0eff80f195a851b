use pocketcalc::calc_engine::{format_number, Calculator, EvalError, Key};
use pocketcalc::Config;

pub struct HistoryEntry {
    pub formula: String,
    pub result: Result<f64, EvalError>,
}

pub struct App {
    pub calculator: Calculator,
    pub display_width: usize,
    pub history: Vec<HistoryEntry>,
    pub cursor_history: usize,
    pub should_quit: bool,
    pub show_help: bool,
    pub help_scroll: usize,
    pub list_height: usize,
    pub history_scroll: usize,
    pub scroll_to_bottom: bool,
    pub terminal_too_small: bool,
    pub last_key: Option<Key>,
}

impl App {
    pub fn new(config: &Config) -> Self {
        App {
            calculator: config.calculator(),
            display_width: config.display_width,
            history: Vec::new(),
            cursor_history: 0,
            should_quit: false,
            show_help: false,
            help_scroll: 0,
            list_height: 5,
            history_scroll: 0,
            scroll_to_bottom: false,
            terminal_too_small: false,
            last_key: None,
        }
    }

    pub fn press(&mut self, key: Key) {
        self.last_key = Some(key);
        if let Some(outcome) = self.calculator.press(key) {
            self.history.push(HistoryEntry {
                formula: outcome.formula,
                result: outcome.result,
            });
            self.cursor_history = self.history.len() - 1;
            self.scroll_to_bottom = true;
        }
    }

    /// Start a new calculation from the selected history result.
    pub fn recall_selected(&mut self) {
        let Some(HistoryEntry { result: Ok(value), .. }) = self.history.get(self.cursor_history)
        else {
            return;
        };
        let text = format_number(*value);
        // scientific and non-finite results cannot be typed back in
        if !text.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-') {
            return;
        }
        self.calculator.reset();
        self.calculator.feed_str(&text);
        self.last_key = None;
    }

    pub fn navigate_history(&mut self, direction: i32) {
        if direction < 0 && self.cursor_history > 0 {
            self.cursor_history -= 1;
        } else if direction > 0 && self.cursor_history < self.history.len().saturating_sub(1) {
            self.cursor_history += 1;
        }
        self.scroll_to_bottom = false;
    }

    pub fn scroll_history(&mut self, direction: i32) {
        let step = self.list_height.saturating_sub(1);
        if direction < 0 {
            self.cursor_history = self.cursor_history.saturating_sub(step);
        } else {
            self.cursor_history = self
                .cursor_history
                .saturating_add(step)
                .min(self.history.len().saturating_sub(1));
        }
        self.scroll_to_bottom = false;
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.cursor_history = 0;
        self.history_scroll = 0;
    }
}
