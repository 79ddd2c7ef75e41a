/// Decimal units, smallest first.
const UNITS: [(&str, u64); 6] = [
    ("K", 1_000),
    ("M", 1_000_000),
    ("G", 1_000_000_000),
    ("T", 1_000_000_000_000),
    ("P", 1_000_000_000_000_000),
    ("E", 1_000_000_000_000_000_000),
];

/// Formats a byte count with a decimal magnitude suffix, e.g. `"3.4K"` or `"27M"`.
///
/// Counts below 1000 are returned as plain integers. Values under ten of the
/// selected unit keep one decimal digit, larger ones are rounded half-to-even
/// to an integer.
pub fn human_size(bytes: u64) -> String {
    let Some(&(unit, order)) = UNITS.iter().rev().find(|(_, order)| bytes >= *order) else {
        return bytes.to_string();
    };

    let value = bytes as f64 / order as f64;
    if bytes < order.saturating_mul(10) {
        format!("{value:.1}{unit}")
    } else {
        format!("{}{unit}", value.round_ties_even())
    }
}
