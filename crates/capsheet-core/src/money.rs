// Cap amount formatting.

/// Cap units per million dollars (one unit = $10,000).
pub const UNITS_PER_MILLION: i64 = 100;

/// Render a cap amount as `$<millions>M`, e.g. 27920 -> "$279.2M".
///
/// Up to two decimals are kept, trailing zeros are trimmed, and negative
/// amounts get a leading minus sign ("-$3.5M").
pub fn format_money(amount: i64) -> String {
    if amount == 0 {
        return "$0M".to_string();
    }
    let sign = if amount < 0 { "-" } else { "" };
    let millions = amount.unsigned_abs() as f64 / UNITS_PER_MILLION as f64;
    let formatted = format!("{millions:.2}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{sign}${trimmed}M")
}
