use once_cell::sync::Lazy;
use regex::Regex;

static PRICE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^0-9]*([0-9]+)[.,]([0-9]+)[^0-9]*").expect("price pattern is valid")
});

/// Converts price text such as `£1.35`, `$22.76  AUD` or `13,69 €` to a number.
///
/// Only the first `digits separator digits` run of ASCII digits is used, with
/// `.` or `,` taken as the decimal separator. Thousands separators are not understood: `1,234.56`
/// reads as `1.234`. Returns `None` when the text holds no such run, which
/// includes bare integers like `12`.
pub fn price_to_float(data: &str) -> Option<f64> {
    let caps = PRICE_PATTERN.captures(data)?;
    let units = caps.get(1)?.as_str();
    let decimals = caps.get(2)?.as_str();

    format!("{}.{}", units, decimals).parse::<f64>().ok()
}
