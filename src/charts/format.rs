//! Number and date formatting shared by the chart layer.

use chrono::NaiveDate;

/// Compact magnitude formatting: three significant digits and a K/M/B/T
/// suffix. `human_format(1500.0) == "1.5K"`.
pub fn human_format(num: f64) -> String {
    let mut num = round_significant(num, 3);
    let mut magnitude = 0usize;
    const SUFFIXES: [&str; 5] = ["", "K", "M", "B", "T"];
    while num.abs() >= 1000.0 && magnitude < SUFFIXES.len() - 1 {
        magnitude += 1;
        num /= 1000.0;
    }
    format!("{}{}", trim_trailing(num), SUFFIXES[magnitude])
}

fn round_significant(num: f64, digits: i32) -> f64 {
    if num == 0.0 || !num.is_finite() {
        return 0.0;
    }
    let magnitude = num.abs().log10().floor() as i32;
    // Scale by a power of ten so large counts round exactly; 10^k is exact
    // for the magnitudes this dashboard displays.
    let scale = 10f64.powi(magnitude - digits + 1);
    (num / scale).round() * scale
}

fn trim_trailing(num: f64) -> String {
    let formatted = format!("{:.3}", num);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Group an (already aggregated) count with thousands separators.
pub fn thousands(num: f64) -> String {
    let rounded = num.round() as i64;
    let digits = rounded.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Date-slider label: `MM-DD-YYYY` with non-breaking hyphens so the label
/// never wraps inside the slider.
pub fn slider_label(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => parsed.format("%m\u{2011}%d\u{2011}%Y").to_string(),
        Err(_) => date.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_format_matches_reference_values() {
        assert_eq!(human_format(1500.0), "1.5K");
        assert_eq!(human_format(0.0), "0");
        assert_eq!(human_format(999.0), "999");
        assert_eq!(human_format(1_000_000.0), "1M");
        assert_eq!(human_format(1_234_567.0), "1.23M");
        assert_eq!(human_format(2_500_000_000.0), "2.5B");
        assert_eq!(human_format(1_500_000_000_000.0), "1.5T");
        // Rounds up across a magnitude boundary.
        assert_eq!(human_format(999_999.0), "1M");
    }

    #[test]
    fn human_format_keeps_sign() {
        assert_eq!(human_format(-1500.0), "-1.5K");
    }

    #[test]
    fn thousands_groups_digits() {
        assert_eq!(thousands(0.0), "0");
        assert_eq!(thousands(999.0), "999");
        assert_eq!(thousands(1500.0), "1,500");
        assert_eq!(thousands(1_234_567.0), "1,234,567");
        assert_eq!(thousands(-42_000.0), "-42,000");
    }

    #[test]
    fn slider_labels_use_non_breaking_hyphens() {
        assert_eq!(slider_label("2020-04-15"), "04\u{2011}15\u{2011}2020");
        // Unparseable input falls through untouched.
        assert_eq!(slider_label("garbage"), "garbage");
    }
}
