//! Number formatting shared by the table and terminal views

/// Inserts `,` between groups of three digits.
fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// en-US style grouping with at most three fraction digits, e.g. `1,234.5`.
pub fn thousands(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }
    let formatted = format!("{:.3}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::new();
    if value < 0.0 && (int_part != "0" || !frac_part.is_empty()) {
        out.push('-');
    }
    out.push_str(&group_digits(int_part));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

pub fn thousands_u64(value: u64) -> String {
    group_digits(&value.to_string())
}

/// Dollar amount with two decimals, e.g. `$1,234.50`.
pub fn currency(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));
    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{sign}${}.{frac_part}", group_digits(int_part))
}

/// Renders a fraction as a percentage, `0.0402` becomes `4.02%`.
pub fn percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

pub fn optional<T>(value: Option<T>, format_fn: impl Fn(T) -> String) -> String {
    value.map_or_else(|| "N/A".to_string(), format_fn)
}
