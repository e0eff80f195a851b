#[cfg(feature = "tui")]
mod render_help;
#[cfg(feature = "tui")]
mod tui_mode;
#[cfg(feature = "line")]
mod line_mode;

use anyhow::Result;
use clap::Parser;
use pocketcalc::calc_engine::{format_number, Key};
use pocketcalc::logging::{self, LogTarget};
use pocketcalc::Config;
use std::process::ExitCode;
use tracing::info;

/// Four-function keypad calculator.
///
/// With expressions, evaluates each one and prints the result. Without,
/// starts the interactive keypad.
#[derive(Parser, Debug)]
#[command(name = "pocketcalc", version)]
struct Cli {
    /// Expressions to evaluate, e.g. "(1+2)*3". A missing `=` is implied.
    expressions: Vec<String>,

    /// Print only the result, or only the error message.
    #[arg(long)]
    raw: bool,

    /// Use the plain line front end instead of the full-screen one. Needs the
    /// `line` feature.
    #[arg(long)]
    line: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Config::from_env();

    let outcome = if cli.expressions.is_empty() {
        run_interactive(&config, cli.line).map(|()| true)
    } else {
        run_once(&config, &cli)
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("pocketcalc: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Evaluate every expression on the command line. Returns false when any of
/// them failed.
fn run_once(config: &Config, cli: &Cli) -> Result<bool> {
    logging::init(config, LogTarget::Stderr)?;

    let mut all_ok = true;
    for expression in &cli.expressions {
        let mut calculator = config.calculator();
        let outcome = calculator
            .feed_str(expression)
            .or_else(|| calculator.press(Key::Char('=')));
        let Some(outcome) = outcome else {
            continue;
        };

        info!(formula = %outcome.formula, "evaluated");
        match (outcome.result, cli.raw) {
            (Ok(value), true) => println!("{}", format_number(value)),
            (Ok(value), false) => println!("{} {}", outcome.formula, format_number(value)),
            (Err(e), true) => {
                all_ok = false;
                println!("{e}");
            }
            (Err(e), false) => {
                all_ok = false;
                println!("{} {}", outcome.formula, e);
            }
        }
    }
    Ok(all_ok)
}

fn run_interactive(
    config: &Config,
    #[cfg_attr(not(feature = "line"), allow(unused_variables))] line: bool,
) -> Result<()> {
    logging::init(config, LogTarget::FileOnly)?;

    #[cfg(feature = "line")]
    if line || cfg!(not(feature = "tui")) {
        return line_mode::run_line(config);
    }

    #[cfg(feature = "tui")]
    return tui_mode::run_tui(config);

    #[cfg(not(feature = "tui"))]
    anyhow::bail!("built without the full-screen front end; pass an expression or build with `tui`")
}
