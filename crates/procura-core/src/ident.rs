//! # Identifier Formats
//!
//! Formatting and parsing for the two human-facing identifier schemes.
//!
//! ## Formats
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Display Identifier Formats                           │
//! │                                                                         │
//! │  Purchase orders:  PO- + 4-digit zero-padded sequence                  │
//! │                    PO-0001, PO-0002, ... PO-0042, ...                  │
//! │                    Monotonic across the whole store, never reused.     │
//! │                    Next = max(existing) + 1, scanned once per          │
//! │                    generate call so multi-vendor calls allocate a      │
//! │                    contiguous block.                                   │
//! │                                                                         │
//! │  Vendors:          V + 3-digit zero-padded sequence                    │
//! │                    V001, V002, ...                                     │
//! │                    Allocated at creation from a persistent counter,    │
//! │                    never reused even after deletion.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sequences above the pad width keep growing (`PO-10000`, `V1000`); the
//! padding is a display minimum, not a ceiling.

/// Prefix for purchase order numbers.
pub const PO_NUMBER_PREFIX: &str = "PO-";

/// Prefix for vendor display ids.
pub const VENDOR_DISPLAY_PREFIX: &str = "V";

// =============================================================================
// Purchase Order Numbers
// =============================================================================

/// Formats a PO sequence number: `format_po_number(7)` → `"PO-0007"`.
pub fn format_po_number(seq: i64) -> String {
    format!("{}{:04}", PO_NUMBER_PREFIX, seq)
}

/// Parses the numeric suffix out of a PO number.
///
/// Returns `None` for anything that is not `PO-` followed by digits, so
/// callers can use it both to rank existing numbers and to recognize
/// whether a reference looks like a PO number at all.
pub fn parse_po_number(number: &str) -> Option<i64> {
    let digits = number.strip_prefix(PO_NUMBER_PREFIX)?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Scans a set of existing PO numbers for the highest sequence.
///
/// Unparseable numbers are ignored rather than treated as errors; the
/// store never writes them, but the scan must not choke on foreign data.
pub fn max_po_sequence<'a, I>(numbers: I) -> i64
where
    I: IntoIterator<Item = &'a str>,
{
    numbers
        .into_iter()
        .filter_map(parse_po_number)
        .max()
        .unwrap_or(0)
}

// =============================================================================
// Vendor Display Ids
// =============================================================================

/// Formats a vendor sequence number: `format_vendor_display_id(3)` → `"V003"`.
pub fn format_vendor_display_id(seq: i64) -> String {
    format!("{}{:03}", VENDOR_DISPLAY_PREFIX, seq)
}

/// Parses the numeric suffix out of a vendor display id.
pub fn parse_vendor_display_id(display_id: &str) -> Option<i64> {
    let digits = display_id.strip_prefix(VENDOR_DISPLAY_PREFIX)?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_po_number() {
        assert_eq!(format_po_number(1), "PO-0001");
        assert_eq!(format_po_number(42), "PO-0042");
        assert_eq!(format_po_number(9999), "PO-9999");
        // Pad width is a minimum, not a ceiling
        assert_eq!(format_po_number(10000), "PO-10000");
    }

    #[test]
    fn test_parse_po_number() {
        assert_eq!(parse_po_number("PO-0001"), Some(1));
        assert_eq!(parse_po_number("PO-0420"), Some(420));
        assert_eq!(parse_po_number("PO-10000"), Some(10000));

        assert_eq!(parse_po_number("PO-"), None);
        assert_eq!(parse_po_number("PO-12a"), None);
        assert_eq!(parse_po_number("V001"), None);
        assert_eq!(parse_po_number("0001"), None);
    }

    #[test]
    fn test_max_po_sequence() {
        assert_eq!(max_po_sequence([]), 0);
        assert_eq!(max_po_sequence(["PO-0001", "PO-0005", "PO-0003"]), 5);
        // Garbage is skipped, not counted
        assert_eq!(max_po_sequence(["PO-0002", "not-a-number"]), 2);
    }

    #[test]
    fn test_vendor_display_id_round_trip() {
        assert_eq!(format_vendor_display_id(1), "V001");
        assert_eq!(format_vendor_display_id(12), "V012");
        assert_eq!(format_vendor_display_id(1000), "V1000");

        assert_eq!(parse_vendor_display_id("V001"), Some(1));
        assert_eq!(parse_vendor_display_id("V1000"), Some(1000));
        assert_eq!(parse_vendor_display_id("V"), None);
        assert_eq!(parse_vendor_display_id("PO-0001"), None);
    }
}
