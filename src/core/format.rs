const MISSING: &str = "—";

/// Rounds half-way cases toward positive infinity, the way slider and axis
/// labels have always been rounded.
pub fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

pub fn group_thousands(value: i64) -> String {
    let grouped = group_digits(&value.unsigned_abs().to_string());
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Inserts a comma every three digits of an unsigned digit string.
fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn infinity(v: f64, symbol: &str) -> String {
    if v < 0.0 {
        format!("-{symbol}")
    } else {
        symbol.to_string()
    }
}

pub fn format_whole(v: f64) -> String {
    if !v.is_finite() {
        return MISSING.to_string();
    }
    group_thousands(round_half_up(v) as i64)
}

/// Grouped thousands with at most two fraction digits, trailing zeros dropped.
pub fn format_money(v: f64) -> String {
    if v.is_nan() {
        return MISSING.to_string();
    }
    if v.is_infinite() {
        return infinity(v, "∞");
    }
    let fixed = format!("{:.2}", v.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac.trim_end_matches('0');

    let mut out = String::new();
    if v < 0.0 && (whole != "0" || !frac.is_empty()) {
        out.push('-');
    }
    out.push_str(&group_digits(whole));
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

pub fn format_pct(v: f64) -> String {
    if v.is_nan() {
        return MISSING.to_string();
    }
    let scaled = v * 100.0;
    if scaled.is_infinite() {
        return format!("{}%", infinity(scaled, "Infinity"));
    }
    format!("{:.1}%", scaled)
}
