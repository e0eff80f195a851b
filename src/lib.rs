pub mod calc_engine;
pub mod config;
pub mod logging;

pub use calc_engine::{evaluate, format_number, Calculator, EvalError, Key, Readout};
pub use config::Config;
