//! Byte size parsing and formatting in `tc` notation.

/// Parses a size such as `1500`, `64k`, `2mb` or `1mbit` into bytes.
///
/// Units are case-insensitive; bit units are converted to bytes.
#[must_use]
pub fn parse_size(text: &str) -> Option<u32> {
    let split = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    let (digits, unit) = text.split_at_checked(split)?;
    let value: u32 = digits.parse().ok()?;
    let multiplier: u32 = match unit.to_ascii_lowercase().as_str() {
        "" | "b" => 1,
        "k" | "kb" => 1 << 10,
        "m" | "mb" => 1 << 20,
        "g" | "gb" => 1 << 30,
        "kbit" => 1 << 7,
        "mbit" => 1 << 17,
        "gbit" => 1 << 27,
        _ => return None,
    };
    value.checked_mul(multiplier)
}

/// Formats a byte count the way `tc` prints sizes.
#[must_use]
pub fn format_size(bytes: u32) -> String {
    const MIB_MASK: u32 = (1 << 20) - 1;
    const KIB_MASK: u32 = (1 << 10) - 1;
    if bytes >= 1 << 20 && bytes & MIB_MASK == 0 {
        format!("{}Mb", bytes >> 20)
    } else if bytes >= 1 << 10 && bytes & KIB_MASK == 0 {
        format!("{}Kb", bytes >> 10)
    } else {
        format!("{bytes}b")
    }
}
