/// Group the digits of an integer in threes: 1234567 -> "1,234,567"
pub fn format_grouped_int(value: i64) -> String {
    let negative = value < 0;
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    let mut grouped: String = out.chars().rev().collect();
    if negative {
        grouped.insert(0, '-');
    }
    grouped
}

/// Format a money amount with two decimal places and thousands separators
pub fn format_money(value: f64, currency_symbol: &str) -> String {
    let cents = (value * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let whole = format_grouped_int((cents / 100) as i64);
    format!("{sign}{currency_symbol}{whole}.{:02}", cents % 100)
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_digits() {
        assert_eq!(format_grouped_int(0), "0");
        assert_eq!(format_grouped_int(999), "999");
        assert_eq!(format_grouped_int(1000), "1,000");
        assert_eq!(format_grouped_int(-1234567), "-1,234,567");
    }

    #[test]
    fn formats_money_with_symbol() {
        assert_eq!(format_money(1234.5, "₺"), "₺1,234.50");
        assert_eq!(format_money(0.0, "$"), "$0.00");
        assert_eq!(format_money(-42.126, "₺"), "-₺42.13");
        assert_eq!(format_money(999999.999, "₺"), "₺1,000,000.00");
    }

    #[test]
    fn formats_percentages() {
        assert_eq!(format_percent(50.0), "50.0%");
        assert_eq!(format_percent(12.345), "12.3%");
    }
}
