//! Address-list parsing and IPv4 dotted-quad syntax checks.

/// Split a comma-separated form value into trimmed, non-empty tokens,
/// preserving order.
pub fn split_address_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// `true` iff `s` is exactly four `.`-separated base-10 components, each
/// made only of ASCII digits and in `0..=255`.
///
/// No signs, whitespace, empty components or trailing dots are accepted.
/// Leading zeros are tolerated (`"010.0.0.1"`), matching how the inventory
/// consumer treats them as plain decimal.
pub fn is_valid_ipv4(s: &str) -> bool {
    let mut count = 0;
    for part in s.split('.') {
        count += 1;
        if count > 4 || !is_octet(part) {
            return false;
        }
    }
    count == 4
}

fn is_octet(part: &str) -> bool {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    // Strip leading zeros before parsing so long zero-padded tokens can't
    // overflow.
    let digits = part.trim_start_matches('0');
    if digits.len() > 3 {
        return false;
    }
    digits.is_empty() || digits.parse::<u16>().map(|v| v <= 255).unwrap_or(false)
}
