//! Text helpers for rendering prices and fixed-width card text.

/// Format a price with no fractional digits, in the style of the given
/// currency code (`"VND"` → `"18.990.000 ₫"`). Unknown codes fall back to a
/// plain `"<amount> <code>"` string.
pub fn format_price(amount: f64, currency: &str) -> String {
    let rounded = amount.round();
    let (sign, magnitude) = if rounded < 0.0 { ("-", -rounded) } else { ("", rounded) };
    match currency {
        "VND" => format!("{sign}{} ₫", group_thousands(magnitude as u64, '.')),
        "EUR" => format!("{sign}{} €", group_thousands(magnitude as u64, '.')),
        "USD" => format!("{sign}${}", group_thousands(magnitude as u64, ',')),
        _ => format!("{amount} {currency}"),
    }
}

/// Group an integer's decimal digits in threes: 18990000 → "18.990.000".
fn group_thousands(n: u64, sep: char) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(c);
    }
    out
}

/// Truncate `s` to at most `max_chars` characters, appending "…" when cut.
/// Counts characters, not columns; good enough for card and tray labels.
pub fn truncate_ellipsis(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}
