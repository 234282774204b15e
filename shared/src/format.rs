//! String and number formatting helpers shared by forms and listings.

use crate::types::Product;

pub const CURRENCY_SYMBOL: &str = "£";

/// Format an amount as `£1,234.50`. Negative amounts get a leading `-`.
pub fn format_currency(amount: f64) -> String {
    let pennies = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && pennies > 0 { "-" } else { "" };
    format!(
        "{}{}{}.{:02}",
        sign,
        CURRENCY_SYMBOL,
        group_thousands(pennies / 100),
        pennies % 100
    )
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Capitalize every whitespace-separated word.
pub fn title_case(s: &str) -> String {
    s.split_whitespace().map(capitalize).collect::<Vec<_>>().join(" ")
}

/// `"<name> [<code>]"`, or just the name when there is no code.
pub fn format_product_with_code(product: &Product) -> String {
    if product.code.is_empty() {
        product.name.clone()
    } else {
        format!("{} [{}]", product.name, product.code)
    }
}

/// Reverse of [`format_product_with_code`]. A trailing `[code]` suffix is
/// split off; without one the whole trimmed string is the name.
pub fn parse_product_string(s: &str) -> Product {
    let trimmed = s.trim();

    if let Some(without_close) = trimmed.strip_suffix(']') {
        if let Some(open) = without_close.rfind('[') {
            let name = without_close[..open].trim_end();
            let code = &without_close[open + 1..];
            if !name.is_empty() && !code.is_empty() && !code.contains('[') {
                return Product::new(name, code);
            }
        }
    }

    Product::new(trimmed, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "£0.00");
        assert_eq!(format_currency(5.5), "£5.50");
        assert_eq!(format_currency(1234.5), "£1,234.50");
        assert_eq!(format_currency(1_000_000.0), "£1,000,000.00");
        assert_eq!(format_currency(-42.125), "-£42.13");
        assert_eq!(format_currency(-0.001), "£0.00");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("hello"), "Hello");
        assert_eq!(capitalize("hELLO"), "Hello");
        assert_eq!(capitalize(""), "");
        assert_eq!(title_case("acme  trading ltd"), "Acme Trading Ltd");
    }

    #[test]
    fn test_product_string_with_code() {
        let product = Product::new("Widget", "W1");
        let formatted = format_product_with_code(&product);
        assert_eq!(formatted, "Widget [W1]");
        assert_eq!(parse_product_string(&formatted), product);
    }

    #[test]
    fn test_product_string_without_code() {
        let product = Product::new("Widget", "");
        assert_eq!(format_product_with_code(&product), "Widget");
        assert_eq!(parse_product_string("Widget"), Product::new("Widget", ""));
    }

    #[test]
    fn test_parse_product_string_edge_cases() {
        // Only the trailing bracket is the code
        assert_eq!(
            parse_product_string("Plates [large] [CAT001]"),
            Product::new("Plates [large]", "CAT001")
        );
        assert_eq!(parse_product_string("[CAT001]"), Product::new("[CAT001]", ""));
        assert_eq!(parse_product_string("Cups []"), Product::new("Cups []", ""));
        assert_eq!(
            parse_product_string("  Toilet Rolls (12 pack) [HYG001]  "),
            Product::new("Toilet Rolls (12 pack)", "HYG001")
        );
    }
}
