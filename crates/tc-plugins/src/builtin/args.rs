//! Option word scanning shared by the bundled handlers.

use std::slice;

use crate::error::OptionError;

/// Cursor over a handler's option words.
pub(crate) struct Words<'a> {
    inner: slice::Iter<'a, String>,
}

impl<'a> Words<'a> {
    pub(crate) fn new(args: &'a [String]) -> Self {
        Self { inner: args.iter() }
    }

    /// Takes the value following `option`.
    pub(crate) fn value(&mut self, option: &str) -> Result<&'a str, OptionError> {
        self.inner
            .next()
            .map(String::as_str)
            .ok_or_else(|| OptionError::missing(option))
    }

    /// Peeks at the next word without consuming it.
    pub(crate) fn peek(&self) -> Option<&'a str> {
        self.inner.as_slice().first().map(String::as_str)
    }
}

impl<'a> Iterator for Words<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(String::as_str)
    }
}

/// Parses an unsigned integer the way `strtoul(.., 0)` does: `0x` selects
/// hexadecimal, a leading `0` octal, anything else decimal.
pub(crate) fn parse_u32(text: &str) -> Option<u32> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return u32::from_str_radix(hex, 16).ok();
    }
    match text.strip_prefix('0') {
        Some("") => Some(0),
        Some(octal) => u32::from_str_radix(octal, 8).ok(),
        None => text.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::builtin::test_support::words;

    #[rstest]
    #[case("10", Some(10))]
    #[case("0x1f", Some(31))]
    #[case("017", Some(15))]
    #[case("0", Some(0))]
    #[case("09", None)]
    #[case("-1", None)]
    #[case("4294967296", None)]
    fn parses_like_strtoul(#[case] text: &str, #[case] expected: Option<u32>) {
        assert_eq!(parse_u32(text), expected);
    }

    #[test]
    fn value_reports_missing_argument() {
        let args = words(&["limit"]);
        let mut cursor = Words::new(&args);
        assert_eq!(cursor.next(), Some("limit"));
        assert_eq!(cursor.peek(), None);
        assert_eq!(cursor.value("limit"), Err(OptionError::missing("limit")));
    }
}
