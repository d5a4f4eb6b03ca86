//! Hand-written byte scanner for one statement line.
//!
//! The scanner walks the line byte-by-byte, splitting on spaces and tabs,
//! and uses `memchr` to jump to the closing delimiter of a quoted literal.
//! There is no lexer-generator layer: the grammar of a statement line is a
//! flat token stream with exactly two non-trivial constructs (quoted
//! literals and comments).

use memchr::memchr;
use smallvec::SmallVec;

/// Token list for one statement.
///
/// Most statements have well under eight tokens, so the list lives inline
/// on the stack in the common case.
pub type Tokens = SmallVec<[String; 8]>;

/// Tokenization failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LexError {
    /// A `"` literal was opened but never closed before end of line.
    UnterminatedString {
        /// Byte offset of the opening quote.
        at: usize,
    },
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexError::UnterminatedString { at } => {
                write!(f, "unterminated string literal starting at byte {at}")
            }
        }
    }
}

impl std::error::Error for LexError {}

/// Tokenize one statement line.
///
/// Returns the ordered token list. Comment-only and blank lines produce an
/// empty list. See the crate docs for the full rule set.
pub fn tokenize(line: &str) -> Result<Tokens, LexError> {
    let bytes = line.as_bytes();
    let mut tokens = Tokens::new();
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b' ' | b'\t' | b'\r' | b'\n' => pos += 1,
            b'#' | b'/' => break,
            b'"' if tokens.is_empty() => {
                tokens.push(leading_literal(line, pos)?);
                return Ok(tokens);
            }
            b'"' => {
                let (token, next) = quoted(line, pos)?;
                tokens.push(token);
                pos = next;
            }
            _ => {
                let (token, next) = bare(line, pos);
                tokens.push(token);
                pos = next;
            }
        }
    }

    Ok(tokens)
}

/// Scan a quoted literal in non-leading position.
///
/// Returns the interior verbatim and the position just past the closing
/// quote. The interior is not subject to lowercasing, comments, or escapes.
fn quoted(line: &str, open: usize) -> Result<(String, usize), LexError> {
    let start = open + 1;
    let rest = &line.as_bytes()[start..];
    match memchr(b'"', rest) {
        Some(close) => Ok((line[start..start + close].to_string(), start + close + 1)),
        None => Err(LexError::UnterminatedString { at: open }),
    }
}

/// Scan a statement-leading quoted literal.
///
/// Single-string-literal statements consume the whole remainder of the
/// line: everything between the opening quote and the *last* quote on the
/// line is the token, interior quotes included. Anything after the final
/// quote is discarded.
fn leading_literal(line: &str, open: usize) -> Result<String, LexError> {
    let start = open + 1;
    match line.rfind('"') {
        Some(close) if close > open => Ok(line[start..close].to_string()),
        _ => Err(LexError::UnterminatedString { at: open }),
    }
}

/// Scan a bare token, lower-casing ASCII as it goes.
///
/// Stops at whitespace, a quote, or an unescaped comment delimiter.
/// Multibyte characters pass through verbatim. Returns the token and the
/// position of the stopping byte.
fn bare(line: &str, start: usize) -> (String, usize) {
    let bytes = line.as_bytes();
    let mut token = String::new();
    let mut pos = start;

    while pos < bytes.len() {
        match bytes[pos] {
            b' ' | b'\t' | b'\r' | b'\n' | b'"' | b'#' | b'/' => break,
            b'\\' if pos + 1 < bytes.len() && matches!(bytes[pos + 1], b'#' | b'/' | b'"' | b'\\') =>
            {
                token.push(bytes[pos + 1] as char);
                pos += 2;
            }
            b if b.is_ascii() => {
                token.push(b.to_ascii_lowercase() as char);
                pos += 1;
            }
            _ => {
                let Some(ch) = line[pos..].chars().next() else {
                    break;
                };
                token.push(ch);
                pos += ch.len_utf8();
            }
        }
    }

    (token, pos)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn toks(line: &str) -> Vec<String> {
        tokenize(line).unwrap().into_vec()
    }

    #[test]
    fn splits_on_whitespace_and_lowercases() {
        assert_eq!(toks("Set $i.X 42"), vec!["set", "$i.x", "42"]);
    }

    #[test]
    fn tabs_are_separators() {
        assert_eq!(toks("add\t$i.a\t1\t$i.a"), vec!["add", "$i.a", "1", "$i.a"]);
    }

    #[test]
    fn blank_line_is_empty() {
        assert!(toks("").is_empty());
        assert!(toks("   \t ").is_empty());
    }

    #[test]
    fn hash_comment_discards_rest() {
        assert_eq!(toks("set $i.x 1 # the answer"), vec!["set", "$i.x", "1"]);
    }

    #[test]
    fn slash_comment_discards_rest() {
        assert_eq!(toks("set $i.x 1 / old value was 2"), vec!["set", "$i.x", "1"]);
    }

    #[test]
    fn comment_only_line_is_empty() {
        assert!(toks("# nothing to see").is_empty());
        assert!(toks("/ nor here").is_empty());
    }

    #[test]
    fn comment_glued_to_token_discards_rest() {
        assert_eq!(toks("set $i.x 1#tail"), vec!["set", "$i.x", "1"]);
    }

    #[test]
    fn quoted_literal_preserves_case_and_spaces() {
        assert_eq!(
            toks("set $s.msg \"Hello, World\""),
            vec!["set", "$s.msg", "Hello, World"]
        );
    }

    #[test]
    fn quoted_literal_shields_comment_delimiters() {
        assert_eq!(
            toks("set $s.path \"/tmp/Notes #3\""),
            vec!["set", "$s.path", "/tmp/Notes #3"]
        );
    }

    #[test]
    fn escaped_delimiters_stay_literal() {
        assert_eq!(toks("set $s.x a\\#b"), vec!["set", "$s.x", "a#b"]);
        assert_eq!(toks("set $s.x a\\/b"), vec!["set", "$s.x", "a/b"]);
    }

    #[test]
    fn unterminated_quote_fails() {
        assert_eq!(
            tokenize("set $s.x \"oops"),
            Err(LexError::UnterminatedString { at: 9 })
        );
    }

    #[test]
    fn leading_literal_takes_whole_remainder() {
        // Single-string-literal statement: interior quotes survive.
        assert_eq!(
            toks("\"He said \"stop\" twice\""),
            vec!["He said \"stop\" twice"]
        );
    }

    #[test]
    fn leading_literal_without_close_fails() {
        assert_eq!(
            tokenize("\"dangling"),
            Err(LexError::UnterminatedString { at: 0 })
        );
    }

    #[test]
    fn tokens_after_quoted_literal_continue() {
        assert_eq!(
            toks("concatstr \"a b\" $s.y $s.z"),
            vec!["concatstr", "a b", "$s.y", "$s.z"]
        );
    }

    #[test]
    fn multibyte_bare_tokens_pass_through() {
        assert_eq!(toks("message Caf\u{e9}"), vec!["message", "caf\u{e9}"]);
    }

    #[test]
    fn retokenizing_is_stable() {
        let line = "repeat 5 $i.counter";
        assert_eq!(tokenize(line).unwrap(), tokenize(line).unwrap());
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // Re-tokenizing the joined token list of a quote/comment-free line
        // reproduces the token list: lowercasing and whitespace splitting
        // are idempotent.
        #[test]
        fn idempotent_on_plain_lines(line in "[a-z0-9$. \t]{0,60}") {
            let first = tokenize(&line).unwrap();
            let joined = first.join(" ");
            let second = tokenize(&joined).unwrap();
            prop_assert_eq!(first, second);
        }

        // Tokenization never panics on arbitrary input.
        #[test]
        fn total_on_arbitrary_input(line in "\\PC{0,80}") {
            let _ = tokenize(&line);
        }
    }
}
