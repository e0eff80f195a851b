//! Fixed-precision rendering of results for a narrow display.
//!
//! Numbers keep `PRECISION` significant digits: values of one or more lose
//! decimal places as their integer part grows, pure fractions gain one
//! decimal place per leading zero after the point. The number of decimal
//! places is settled before rounding, so a carry such as 9.9999995 -> 10 is
//! not re-normalized.

use std::fmt::Write;

pub const PRECISION: i32 = 6;

// keeps the scaling multiplier at or below 10^8
const MAX_DECIMAL_PLACES: i32 = 8;
const MAX_LEADING_ZEROS: i32 = 8;
// integer parts from here on need more than 14 columns; a sign takes one more
const MAX_INTEGER: f64 = 1e14;

pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-Inf" } else { "Inf" }.to_string();
    }

    let mut out = String::with_capacity(16);
    let magnitude = value.abs();
    if value < 0.0 {
        out.push('-');
    }

    let limit = if value < 0.0 {
        MAX_INTEGER / 10.0
    } else {
        MAX_INTEGER
    };
    let int_part = magnitude.trunc();
    if int_part >= limit {
        out.push_str(&scientific(magnitude));
        return out;
    }

    let decimal_places = if int_part == 0.0 {
        PRECISION + leading_zeros(magnitude)
    } else {
        PRECISION - digit_count(int_part as u64)
    }
    .clamp(0, MAX_DECIMAL_PLACES) as u32;

    let multiplier = 10u64.pow(decimal_places);
    let scaled = (magnitude * multiplier as f64).round() as u64;
    let (whole, frac) = (scaled / multiplier, scaled % multiplier);
    // rounding can carry into one more digit
    if whole as f64 >= limit {
        out.push_str(&scientific(magnitude));
        return out;
    }

    let _ = write!(out, "{whole}");
    if decimal_places > 0 {
        let _ = write!(out, ".{frac:0width$}", width = decimal_places as usize);
        trim_fraction(&mut out);
    }

    // tiny negatives round away to nothing
    if out == "-0" {
        out.remove(0);
    }
    out
}

fn digit_count(n: u64) -> i32 {
    n.checked_ilog10().map_or(1, |d| d as i32 + 1)
}

/// Zeros between the point and the first significant digit of a pure
/// fraction, capped at `MAX_LEADING_ZEROS`.
fn leading_zeros(fraction: f64) -> i32 {
    let mut probe = fraction;
    let mut zeros = 0;
    while probe < 0.1 && zeros < MAX_LEADING_ZEROS {
        probe *= 10.0;
        zeros += 1;
    }
    zeros
}

fn trim_fraction(out: &mut String) {
    while out.ends_with('0') {
        out.pop();
    }
    if out.ends_with('.') {
        out.pop();
    }
}

fn scientific(magnitude: f64) -> String {
    let text = format!("{:.*e}", (PRECISION - 1) as usize, magnitude);
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let mut mantissa = mantissa.to_string();
            if mantissa.contains('.') {
                trim_fraction(&mut mantissa);
            }
            format!("{mantissa}e{exponent}")
        }
        None => text,
    }
}
