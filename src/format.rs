//! Polish-locale number formatting for displayed figures
//!
//! Decimal comma, no-break space between thousands, and no grouping for
//! four-digit integer parts (`1234,50` but `12 345,00`).

const GROUP_SEPARATOR: char = '\u{a0}';

/// Format with exactly `fraction_digits` decimals
pub fn format_number(value: f64, fraction_digits: usize) -> String {
    if !value.is_finite() {
        return String::new();
    }

    let fixed = format!("{:.*}", fraction_digits, value.abs());
    let (integer, fraction) = match fixed.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + 4);
    // -0,00 prints as 0,00
    if value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        out.push('-');
    }

    if integer.len() > 4 {
        for (idx, digit) in integer.chars().enumerate() {
            if idx > 0 && (integer.len() - idx) % 3 == 0 {
                out.push(GROUP_SEPARATOR);
            }
            out.push(digit);
        }
    } else {
        out.push_str(integer);
    }

    if let Some(fraction) = fraction {
        out.push(',');
        out.push_str(fraction);
    }
    out
}

/// Amount with two decimals
pub fn format_currency(value: f64) -> String {
    format_number(value, 2)
}

/// Amount with two decimals and the złoty sign
pub fn format_pln(value: f64) -> String {
    let formatted = format_currency(value);
    if formatted.is_empty() {
        return formatted;
    }
    format!("{} zł", formatted)
}
