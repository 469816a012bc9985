//! Currency inputs (salary, job budget) typed as grouped integers, e.g.
//! `5.000`, and read back as numbers at submission time.

use super::validation::digits_only;

/// Regroups whatever the user typed as an integer amount with `.` thousands
/// separators. Empty (or digit-free) input stays empty.
pub fn format_currency_input(raw: &str) -> String {
    let digits = digits_only(raw);
    if digits.is_empty() {
        return String::new();
    }
    let significant = digits.trim_start_matches('0');
    let significant = if significant.is_empty() { "0" } else { significant };

    let len = significant.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in significant.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

/// Strips separators and currency symbols, reads `,` as the decimal mark and
/// defaults to `0` when nothing parses.
pub fn parse_currency_input(display: &str) -> f64 {
    let normalized: String = display
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    normalized.parse::<f64>().unwrap_or(0.0)
}
