//! Keyword abbreviation.
//!
//! Two policies are in use. Global options and subcommands take the first
//! keyword in table order that the typed word abbreviates, so `-n` means
//! `-netns` and `l` means `link`. Object keywords must be unambiguous: an
//! exact match wins, otherwise exactly one keyword may start with the word.

/// True when `word` is a non-empty prefix of `keyword`.
pub(crate) fn matches(word: &str, keyword: &str) -> bool {
    !word.is_empty() && keyword.starts_with(word)
}

/// The first entry of `table` whose keyword `word` abbreviates.
pub(crate) fn first_match<T: Copy>(word: &str, table: &[(&str, T)]) -> Option<T> {
    table
        .iter()
        .find(|(keyword, _)| matches(word, keyword))
        .map(|&(_, value)| value)
}

/// The entry of `table` that `word` names exactly or abbreviates uniquely.
pub(crate) fn unambiguous<T: Copy>(word: &str, table: &[(&str, T)]) -> Option<T> {
    if let Some(&(_, value)) = table.iter().find(|(keyword, _)| *keyword == word) {
        return Some(value);
    }
    let mut candidates = table.iter().filter(|(keyword, _)| matches(word, keyword));
    match (candidates.next(), candidates.next()) {
        (Some(&(_, value)), None) => Some(value),
        _ => None,
    }
}
