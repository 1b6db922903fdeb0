/// Format a number with thousands separators and a fixed number of decimals.
///
/// # Examples
///
/// ```
/// use oscar_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5, 1), "1,234.5");
/// assert_eq!(format_number(10000.0, 0), "10,000");
/// assert_eq!(format_number(-0.25, 2), "-0.25");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let text = format!("{:.prec$}", value.abs(), prec = decimals as usize);
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut out = String::with_capacity(text.len() + text.len() / 3 + 1);
    let negative = value < 0.0 && text.chars().any(|c| c.is_ascii_digit() && c != '0');
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Format an event weight.  Block weights in dilepton output are often
/// many orders of magnitude below one, so anything outside `[1e-3, 1e4)`
/// is rendered in scientific notation.
///
/// # Examples
///
/// ```
/// use oscar_core::formatting::format_weight;
///
/// assert_eq!(format_weight(0.0), "0");
/// assert_eq!(format_weight(0.5), "0.5000");
/// assert_eq!(format_weight(1.25e-7), "1.250e-7");
/// ```
pub fn format_weight(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude == 0.0 {
        "0".to_string()
    } else if (1e-3..1e4).contains(&magnitude) {
        format!("{:.4}", value)
    } else {
        format!("{:.3e}", value)
    }
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero.
///
/// ```
/// use oscar_core::formatting::percentage;
///
/// assert!((percentage(1.0, 4.0, 1) - 25.0).abs() < 1e-9);
/// assert_eq!(percentage(3.0, 0.0, 2), 0.0);
/// ```
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let factor = 10_f64.powi(decimal_places as i32);
    ((part / whole) * 100.0 * factor).round() / factor
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of a digit string.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut result = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
