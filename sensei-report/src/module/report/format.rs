///! Text formatting for money, percentages and dates

use chrono::NaiveDate;

/// Range separator used between a minimum and maximum value
pub const RANGE_SEPARATOR: &str = " – ";

/// Group an unsigned digit string with thousands separators
/// (e.g. "29140" → "29,140")
fn group_thousands(digits: &str) -> String {
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a monetary amount with a leading `$`, thousands separators
/// and no decimals (15000 → "$15,000").
///
/// Negative amounts keep their sign after the currency symbol ("$-1,500").
pub fn format_currency(value: f64) -> String {
    let rounded = format!("{:.0}", value);
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };
    format!("${}{}", sign, group_thousands(digits))
}

/// Format a percentage with exactly one decimal place (5.8 → "5.8%")
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Single amount when both ends match, otherwise `min – max`
pub fn format_amount_range(min: f64, max: f64) -> String {
    if min == max {
        format_currency(min)
    } else {
        format!("{}{}{}", format_currency(min), RANGE_SEPARATOR, format_currency(max))
    }
}

/// `$min – $max`, always both ends
pub fn format_currency_span(min: f64, max: f64) -> String {
    format!("{}{}{}", format_currency(min), RANGE_SEPARATOR, format_currency(max))
}

/// `min% – max%`, always both ends
pub fn format_percent_span(min: f64, max: f64) -> String {
    format!("{}{}{}", format_percent(min), RANGE_SEPARATOR, format_percent(max))
}

/// `M/D/YYYY` without zero padding
pub fn format_prepared_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

/// Caller-supplied date, or today's local date
pub fn prepared_date_or_today(prepared: Option<&str>) -> String {
    match prepared {
        Some(date) => date.to_string(),
        None => format_prepared_date(chrono::Local::now().date_naive()),
    }
}
