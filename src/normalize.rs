//! # Pointer Normalization
//!
//! Dumps of live values carry memory addresses that change on every run.
//! This module rewrites them into stable, position-indexed placeholders so that
//! two dumps differing only in addresses compare equal.
//!
//! Two address shapes are recognized:
//! - **Bare**: `0xdeadbeef` becomes `0p1`.
//! - **Parenthesized**: `(0xdeadbeef)` becomes `(0p1)`.
//!
//! Every literal occurrence of the same address maps to the same placeholder;
//! distinct addresses are numbered from 1 in order of first appearance.

use once_cell::sync::Lazy;
use regex::Regex;

static BARE_ADDRESS: Lazy<Regex> = Lazy::new(|| Regex::new(r"0x[a-f0-9]+").unwrap());

static WRAPPED_ADDRESS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(0x[a-f0-9]+\)").unwrap());

/// The address shape a normalization pass looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressStyle {
    /// Matches `{:p}` and raw-pointer `Debug` output, parenthesized or not.
    #[default]
    Bare,
    /// Matches only addresses wrapped in parentheses, as error messages print them.
    Parenthesized,
}

impl AddressStyle {
    fn pattern(&self) -> &'static Regex {
        match self {
            AddressStyle::Bare => &BARE_ADDRESS,
            AddressStyle::Parenthesized => &WRAPPED_ADDRESS,
        }
    }

    fn placeholder(&self, index: usize) -> String {
        match self {
            AddressStyle::Bare => format!("0p{}", index),
            AddressStyle::Parenthesized => format!("(0p{})", index),
        }
    }
}

/// Replaces every address of the given shape with an indexed placeholder.
///
/// Each round takes the first remaining match and substitutes all of its
/// literal occurrences at once. Every round removes at least one `x` and
/// placeholders introduce none, so the loop terminates.
pub fn normalize(text: &str, style: AddressStyle) -> String {
    let pattern = style.pattern();
    let mut text = text.to_string();
    let mut index = 1;

    while let Some(found) = pattern.find(&text) {
        let literal = found.as_str().to_string();
        text = text.replace(&literal, &style.placeholder(index));
        index += 1;
    }

    text
}

/// Normalizes bare `0x..` addresses into `0p<N>` placeholders.
pub fn normalize_pointers(text: &str) -> String {
    normalize(text, AddressStyle::Bare)
}

/// Normalizes parenthesized `(0x..)` addresses into `(0p<N>)` placeholders.
pub fn normalize_wrapped_pointers(text: &str) -> String {
    normalize(text, AddressStyle::Parenthesized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_address_shares_placeholder() {
        let text = "addr=0xdeadbeef val=0xdeadbeef next=0xfeedface";
        assert_eq!(normalize_pointers(text), "addr=0p1 val=0p1 next=0p2");
    }

    #[test]
    fn test_wrapped_style_ignores_bare_addresses() {
        let text = "ptr (0xc000010000) raw 0xc000010000";
        assert_eq!(normalize_wrapped_pointers(text), "ptr (0p1) raw 0xc000010000");
    }

    #[test]
    fn test_text_without_addresses_is_unchanged() {
        assert_eq!(normalize_pointers("no pointers here"), "no pointers here");
        assert_eq!(normalize_wrapped_pointers(""), "");
    }

    #[test]
    fn test_uppercase_hex_is_not_an_address() {
        assert_eq!(normalize_pointers("0xDEAD"), "0xDEAD");
    }

    #[test]
    fn test_placeholder_adjacent_to_trailing_x_terminates() {
        let text: String = (0..12).map(|i| format!("0x{:x}x", i + 0xa0)).collect();
        let normalized = normalize_pointers(&text);
        assert!(!BARE_ADDRESS.is_match(&normalized));
    }
}
