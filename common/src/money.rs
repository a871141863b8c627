/// Symbol prefixed to every displayed amount.
pub const RUPEE: &str = "₹";

/// Format an amount as rupees with exactly two decimals, e.g. "₹1299.50".
pub fn format_inr(amount: f64) -> String {
    format!("{RUPEE}{amount:.2}")
}

/// Format a unit price the way it is listed in the catalog: no forced decimals,
/// so 499 shows as "₹499" and 12.5 as "₹12.5".
pub fn format_unit_price(price: f64) -> String {
    format!("{RUPEE}{price}")
}

/// Round an amount to two decimal places (paise).
pub fn round_to_paise(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
