//! Splitting batch lines into argument words.
//!
//! Words are separated by blanks. Single or double quotes group a word that
//! contains blanks; the quotes themselves are dropped. An unquoted `#` at the
//! start of a word begins a comment running to the end of the line.

use thiserror::Error;

/// A line that could not be split.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    /// A quoted word was still open at the end of the line.
    #[error("Unterminated {quote} quote")]
    UnterminatedQuote {
        /// The opening quote character.
        quote: char,
    },
}

/// Splits `line` into words.
pub(crate) fn tokenize(line: &str) -> Result<Vec<String>, TokenizeError> {
    let mut words = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        match chars.peek() {
            None | Some('#') => break,
            Some(_) => {}
        }

        let mut word = String::new();
        while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
            if c == '"' || c == '\'' {
                let mut closed = false;
                for inner in chars.by_ref() {
                    if inner == c {
                        closed = true;
                        break;
                    }
                    word.push(inner);
                }
                if !closed {
                    return Err(TokenizeError::UnterminatedQuote { quote: c });
                }
            } else {
                word.push(c);
            }
        }
        words.push(word);
    }

    Ok(words)
}
