//! Value formatting shared by every front-end.
//!
//! Prices follow the Costa Rican convention used by the data source: colón
//! sign, space-grouped thousands, comma decimals. Dates use short Spanish
//! month names.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Currency symbol prefixed to every price.
pub const CURRENCY: &str = "₡";

/// Shown when a price is missing or not a number.
pub const PRICE_PLACEHOLDER: &str = "₡ -";

/// Shown when a date is missing or unparseable.
pub const DATE_PLACEHOLDER: &str = "-";

const THOUSANDS_SEPARATOR: char = ' ';
const DECIMAL_SEPARATOR: char = ',';

const MONTHS_ES: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

/// Format a price as a rounded, grouped integer: `₡ 1 234`.
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(v) if v.is_finite() => format!("{CURRENCY} {}", format_number(v.round(), 0)),
        _ => PRICE_PLACEHOLDER.to_string(),
    }
}

/// Format an amount with up to three fraction digits: `₡ 1 234,5`.
///
/// Used for chart axis ticks and the chart cursor.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return PRICE_PLACEHOLDER.to_string();
    }
    format!("{CURRENCY} {}", format_number(value, 3))
}

/// Format a signed trend percentage with one decimal: `+2.5%`.
///
/// Missing or non-finite input yields an empty string.
pub fn format_trend(pct: Option<f64>) -> String {
    let Some(pct) = pct.filter(|v| v.is_finite()) else {
        return String::new();
    };
    // `-0.0` would otherwise print as "-0.0%".
    let pct = if pct == 0.0 { 0.0 } else { pct };
    let sign = if pct > 0.0 { "+" } else { "" };
    format!("{sign}{pct:.1}%")
}

/// Format a date string as `14 mar 2025`.
pub fn format_date(raw: Option<&str>) -> String {
    match raw.and_then(parse_date) {
        Some(d) => format!("{} {}", short_day_month(d), d.format("%Y")),
        None => DATE_PLACEHOLDER.to_string(),
    }
}

/// Format a date string as `14 mar` (chart labels).
pub fn format_short_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(d) => short_day_month(d),
        None => DATE_PLACEHOLDER.to_string(),
    }
}

/// Parse the date shapes found in the data files.
///
/// Accepts plain dates, RFC 3339 timestamps and naive ISO date-times.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Truncate to `max` characters, marking the cut with a trailing `.`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

fn short_day_month(d: NaiveDate) -> String {
    use chrono::Datelike;
    let month = MONTHS_ES[d.month0() as usize];
    format!("{} {month}", d.day())
}

/// Group the integer part and keep up to `max_fraction` trimmed fraction digits.
fn format_number(value: f64, max_fraction: usize) -> String {
    let fixed = format!("{:.*}", max_fraction, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };

    let is_zero = int_part.bytes().all(|b| b == b'0') && frac_part.is_empty();
    let mut out = String::new();
    if value < 0.0 && !is_zero {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac_part.is_empty() {
        out.push(DECIMAL_SEPARATOR);
        out.push_str(frac_part);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(THOUSANDS_SEPARATOR);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_is_grouped_without_decimals() {
        assert_eq!(format_price(Some(1234.0)), "₡ 1 234");
        assert_eq!(format_price(Some(1234567.0)), "₡ 1 234 567");
        assert_eq!(format_price(Some(999.0)), "₡ 999");
        assert_eq!(format_price(Some(1234.6)), "₡ 1 235");
        assert_eq!(format_price(Some(0.0)), "₡ 0");
        assert_eq!(format_price(Some(-1500.0)), "₡ -1 500");
    }

    #[test]
    fn non_numeric_price_is_placeholder() {
        assert_eq!(format_price(None), "₡ -");
        assert_eq!(format_price(Some(f64::NAN)), "₡ -");
        assert_eq!(format_price(Some(f64::INFINITY)), "₡ -");
    }

    #[test]
    fn amount_keeps_up_to_three_decimals() {
        assert_eq!(format_amount(1234.5), "₡ 1 234,5");
        assert_eq!(format_amount(1000.0), "₡ 1 000");
        assert_eq!(format_amount(2.12345), "₡ 2,123");
        assert_eq!(format_amount(-0.0001), "₡ 0");
    }

    #[test]
    fn trend_has_sign_and_one_decimal() {
        assert_eq!(format_trend(Some(2.54)), "+2.5%");
        assert_eq!(format_trend(Some(-1.0)), "-1.0%");
        assert_eq!(format_trend(Some(0.0)), "0.0%");
        assert_eq!(format_trend(Some(f64::NAN)), "");
        assert_eq!(format_trend(None), "");
    }

    #[test]
    fn negative_zero_trend_has_no_sign() {
        assert_eq!(format_trend(Some(-0.0)), "0.0%");
    }

    #[test]
    fn dates_use_spanish_short_months() {
        assert_eq!(format_date(Some("2025-03-14")), "14 mar 2025");
        assert_eq!(format_date(Some("2024-09-01T10:30:00")), "1 sept 2024");
        assert_eq!(format_date(Some("2024-12-31T23:00:00Z")), "31 dic 2024");
        assert_eq!(format_date(Some("not a date")), "-");
        assert_eq!(format_date(None), "-");
        assert_eq!(format_short_date("2025-01-05"), "5 ene");
    }

    #[test]
    fn html_is_escaped() {
        assert_eq!(
            escape_html(r#"Café <b>"Premium"</b> & Co's"#),
            "Café &lt;b&gt;&quot;Premium&quot;&lt;/b&gt; &amp; Co&#39;s"
        );
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("Frijoles", 20), "Frijoles");
        assert_eq!(truncate("Frijoles negros", 6), "Frijo.");
    }
}
