/// Render with comma thousands grouping and at most `max_fraction` decimals,
/// trailing zeros dropped (`3181.15` -> `"3,181.15"`, `1000.0` -> `"1,000"`).
pub fn format_grouped(value: f64, max_fraction: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.*}", max_fraction, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let is_zero = int_part.bytes().all(|b| b == b'0') && frac_part.is_empty();
    let sign = if value.is_sign_negative() && !is_zero { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

/// Locale-style default: up to three fraction digits
pub fn format_locale(value: f64) -> String {
    format_grouped(value, 3)
}

/// Signed whole percent as shown on cards: `+151`, `-60`
pub fn format_signed_percent(value: f64) -> String {
    let rounded = format_grouped(value, 0);
    if value >= 0.0 || rounded == "0" {
        format!("+{}", rounded)
    } else {
        rounded
    }
}
