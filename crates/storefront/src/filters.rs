//! Custom Askama template filters.

use std::fmt::Display;

use rust_decimal::Decimal;

/// Format a minor-unit amount as lek, e.g. `25000` -> `"250.00 L"`.
///
/// Usage in templates: `{{ item.unit_amount|lek }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn lek(amount: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_lek(amount.to_string().parse().unwrap_or(0)))
}

fn format_lek(minor: i64) -> String {
    format!("{} L", Decimal::new(minor, 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lek_formats_minor_units() {
        assert_eq!(format_lek(25_000), "250.00 L");
        assert_eq!(format_lek(750), "7.50 L");
        assert_eq!(format_lek(0), "0.00 L");
    }

    #[test]
    fn test_lek_single_minor_unit() {
        assert_eq!(format_lek(5), "0.05 L");
    }
}
