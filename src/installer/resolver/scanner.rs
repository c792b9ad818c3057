//! Tokenizer for the reference grammar.
//!
//! Recognised left to right, never overlapping:
//!
//! | Input        | Token                     |
//! |--------------|---------------------------|
//! | `$$`         | [`Token::Escape`]         |
//! | `${path}`    | [`Token::Reference`]      |
//! | `$NAME`      | [`Token::Builtin`]        |
//! | anything else| [`Token::Text`]           |
//!
//! `NAME` is `[A-Z_][A-Z0-9_]*`. A `${` without a closing brace, an empty
//! `${}` and a `$` followed by anything else are plain text.

/// One lexical element of a string that may contain references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token<'t> {
    /// Literal text, never containing a recognised reference
    Text(&'t str),
    /// `$$`
    Escape,
    /// `${path}` with `raw` the full spelling
    Reference { path: &'t str, raw: &'t str },
    /// `$NAME` with `raw` the full spelling
    Builtin { name: &'t str, raw: &'t str },
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_uppercase() || b == b'_'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_'
}

/// Splits `input` into tokens.
///
/// Every delimiter is ASCII, so slicing at the scanned byte offsets always
/// lands on character boundaries.
pub(crate) fn tokenize(input: &str) -> Vec<Token<'_>> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'$' {
            i += 1;
            continue;
        }

        let matched = match bytes.get(i + 1) {
            Some(b'$') => Some((Token::Escape, 2)),
            Some(b'{') => input[i + 2..]
                .find('}')
                .filter(|&end| end > 0)
                .map(|end| {
                    let len = end + 3;
                    let token = Token::Reference {
                        path: &input[i + 2..i + 2 + end],
                        raw: &input[i..i + len],
                    };
                    (token, len)
                }),
            Some(&c) if is_ident_start(c) => {
                let name_len = bytes[i + 1..]
                    .iter()
                    .take_while(|&&b| is_ident_continue(b))
                    .count();
                let raw = &input[i..i + 1 + name_len];
                Some((Token::Builtin { name: &raw[1..], raw }, name_len + 1))
            }
            _ => None,
        };

        match matched {
            Some((token, len)) => {
                if text_start < i {
                    tokens.push(Token::Text(&input[text_start..i]));
                }
                tokens.push(token);
                i += len;
                text_start = i;
            }
            None => i += 1,
        }
    }

    if text_start < bytes.len() {
        tokens.push(Token::Text(&input[text_start..]));
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        assert_eq!(tokenize("hello world"), vec![Token::Text("hello world")]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_mixed_tokens() {
        let tokens = tokenize("$INSTDIR\\${app.name}-$$v");
        assert_eq!(
            tokens,
            vec![
                Token::Builtin { name: "INSTDIR", raw: "$INSTDIR" },
                Token::Text("\\"),
                Token::Reference { path: "app.name", raw: "${app.name}" },
                Token::Text("-"),
                Token::Escape,
                Token::Text("v"),
            ]
        );
    }

    #[test]
    fn test_escape_wins_over_reference() {
        assert_eq!(
            tokenize("$${app.name}"),
            vec![Token::Escape, Token::Text("{app.name}")]
        );
    }

    #[test]
    fn test_malformed_forms_are_text() {
        assert_eq!(tokenize("${unterminated"), vec![Token::Text("${unterminated")]);
        assert_eq!(tokenize("${}"), vec![Token::Text("${}")]);
        assert_eq!(tokenize("cost: $5"), vec![Token::Text("cost: $5")]);
        assert_eq!(tokenize("$lower"), vec![Token::Text("$lower")]);
        assert_eq!(tokenize("trailing $"), vec![Token::Text("trailing $")]);
    }

    #[test]
    fn test_builtin_stops_at_non_identifier() {
        assert_eq!(
            tokenize("$R0x"),
            vec![Token::Builtin { name: "R0", raw: "$R0" }, Token::Text("x")]
        );
    }

    #[test]
    fn test_non_ascii_text_is_preserved() {
        assert_eq!(
            tokenize("Grüße ${app.name} ✓"),
            vec![
                Token::Text("Grüße "),
                Token::Reference { path: "app.name", raw: "${app.name}" },
                Token::Text(" ✓"),
            ]
        );
    }
}
