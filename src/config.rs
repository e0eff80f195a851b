//! Runtime configuration loaded from environment variables.
//!
//! | Variable                      | Default | Description                         |
//! |-------------------------------|---------|-------------------------------------|
//! | `POCKETCALC_LOG_LEVEL`        | `warn`  | tracing filter, e.g. `pocketcalc=debug` |
//! | `POCKETCALC_LOG_FILE`         | unset   | write logs here instead of stderr   |
//! | `POCKETCALC_DISPLAY_WIDTH`    | `16`    | characters per display line         |
//! | `POCKETCALC_FORMULA_CAPACITY` | `30`    | characters kept of the typed formula |
//! | `POCKETCALC_STACK_CAPACITY`   | `20`    | depth of each evaluator stack       |

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::calc_engine::{Calculator, FORMULA_CAPACITY, STACK_CAPACITY};

pub const DISPLAY_WIDTH: usize = 16;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Tracing filter string.
    pub log_level: String,

    /// Log destination; stderr when unset.
    pub log_file: Option<PathBuf>,

    pub display_width: usize,

    pub formula_capacity: usize,

    pub stack_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: "warn".to_string(),
            log_file: None,
            display_width: DISPLAY_WIDTH,
            formula_capacity: FORMULA_CAPACITY,
            stack_capacity: STACK_CAPACITY,
        }
    }
}

impl Config {
    /// Load configuration from the environment, applying defaults where a
    /// variable is absent or unparseable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Config::default();
        Config {
            log_level: lookup("POCKETCALC_LOG_LEVEL").unwrap_or(defaults.log_level),
            log_file: lookup("POCKETCALC_LOG_FILE")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            display_width: parse_or(&lookup, "POCKETCALC_DISPLAY_WIDTH", defaults.display_width),
            formula_capacity: parse_or(
                &lookup,
                "POCKETCALC_FORMULA_CAPACITY",
                defaults.formula_capacity,
            ),
            stack_capacity: parse_or(&lookup, "POCKETCALC_STACK_CAPACITY", defaults.stack_capacity),
        }
    }

    /// A fresh keypad session sized by this configuration.
    pub fn calculator(&self) -> Calculator {
        Calculator::with_limits(self.formula_capacity, self.stack_capacity)
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key)
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
