use super::{Parsed, TreeParser};
use crate::format::DatasetFormat;
use crate::loader::DatasetError;
use std::borrow::Cow;
use std::path::Path;

// Bare tokens that Python's json module writes for non-finite floats
const NON_FINITE: [&[u8]; 3] = [b"-Infinity", b"Infinity", b"NaN"];

/// JSON datasets; object key order is preserved
///
/// Files written by Python tools may hold bare `NaN`, `Infinity` or
/// `-Infinity` where a score is missing. Those tokens are read as `null`,
/// the same value non-finite floats get from the YAML and legacy paths.
pub struct JsonParser;

impl TreeParser for JsonParser {
    fn format(&self) -> DatasetFormat {
        DatasetFormat::Json
    }

    fn parse(&self, path: &Path, bytes: &[u8]) -> Result<Parsed, DatasetError> {
        tracing::debug!(path = %path.display(), size = bytes.len(), "parsing json dataset");
        let bytes = null_non_finite(bytes);
        if let Cow::Owned(_) = bytes {
            tracing::debug!(path = %path.display(), "non-finite numbers read as null");
        }
        Ok(Parsed::Tree(serde_json::from_slice(&bytes)?))
    }
}

/// Rewrite bare non-finite tokens outside string literals to `null`.
///
/// Borrows the input unless a token is found.
fn null_non_finite(bytes: &[u8]) -> Cow<'_, [u8]> {
    let mut out: Option<Vec<u8>> = None;
    let mut in_string = false;
    let mut escaped = false;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
        } else if b == b'"' {
            in_string = true;
        } else if let Some(token) = NON_FINITE.iter().find(|t| at_token(bytes, i, t)) {
            let buf = out.get_or_insert_with(|| bytes[..i].to_vec());
            buf.extend_from_slice(b"null");
            i += token.len();
            continue;
        }

        if let Some(buf) = out.as_mut() {
            buf.push(b);
        }
        i += 1;
    }

    match out {
        Some(buf) => Cow::Owned(buf),
        None => Cow::Borrowed(bytes),
    }
}

fn at_token(bytes: &[u8], at: usize, token: &[u8]) -> bool {
    let is_word = |b: &u8| b.is_ascii_alphanumeric() || *b == b'_';
    bytes[at..].starts_with(token)
        && !bytes[at + token.len()..].first().is_some_and(is_word)
        && !at.checked_sub(1).and_then(|p| bytes.get(p)).is_some_and(is_word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_input_is_borrowed() {
        let input = br#"{"os": [4, 5], "note": "NaN"}"#;
        assert!(matches!(null_non_finite(input), Cow::Borrowed(_)));
    }

    #[test]
    fn test_tokens_outside_strings_become_null() {
        let input = br#"{"os":[4, NaN, -Infinity, Infinity]}"#;
        assert_eq!(
            null_non_finite(input).as_ref(),
            br#"{"os":[4, null, null, null]}"#
        );
    }

    #[test]
    fn test_escaped_quotes_keep_string_state() {
        let input = br#"{"a": "say \"NaN\" Infinity", "b": NaN}"#;
        assert_eq!(
            null_non_finite(input).as_ref(),
            br#"{"a": "say \"NaN\" Infinity", "b": null}"#
        );
    }
}
