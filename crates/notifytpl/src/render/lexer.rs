//! Lexer splitting a template body into text and `{{ ... }}` directives

use logos::Logos;

/// Byte range in the template body
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A complete `{{ ... }}` marker with no braces inside
    #[regex(r"\{\{[^{}]*\}\}")]
    Directive,

    /// A run of text without opening braces
    #[regex(r"[^{]+")]
    Text,

    /// An opening brace that does not start a directive
    #[token("{")]
    Brace,
}

/// Lex a template body into tokens with spans
///
/// Every byte of the input belongs to exactly one token, so the spans
/// concatenate back to the original body. When a `{{` run fails to close
/// as a directive, only its first character is emitted and lexing restarts
/// right after it, so a directive opening one brace later is still found.
pub fn lex(input: &str) -> Vec<(Token, Span)> {
    let mut tokens = Vec::new();
    let mut offset = 0;

    'restart: while offset < input.len() {
        let mut lexer = Token::lexer(&input[offset..]);
        while let Some(result) = lexer.next() {
            let span = offset + lexer.span().start..offset + lexer.span().end;
            match result {
                Ok(token) => tokens.push((token, span)),
                Err(()) => {
                    let rest = &input[span.start..];
                    let width = rest.chars().next().map_or(1, char::len_utf8);
                    let token = if rest.starts_with('{') {
                        Token::Brace
                    } else {
                        Token::Text
                    };
                    tokens.push((token, span.start..span.start + width));
                    offset = span.start + width;
                    continue 'restart;
                }
            }
        }
        break;
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<Token> {
        lex(input).into_iter().map(|(t, _)| t).collect()
    }

    fn pieces(input: &str) -> Vec<&str> {
        lex(input).into_iter().map(|(_, span)| &input[span]).collect()
    }

    #[test]
    fn test_text_and_directives() {
        assert_eq!(
            kinds("Hi {{ .name }}!"),
            vec![Token::Text, Token::Directive, Token::Text]
        );
    }

    #[test]
    fn test_single_braces_are_not_directives() {
        assert!(!kinds("{ .name }").contains(&Token::Directive));
    }

    #[test]
    fn test_spans_cover_input() {
        for input in ["a{b{{ .c }}}{{d", "{{ .name }", "{{{{ .a }}", "}}{{"] {
            assert_eq!(pieces(input).concat(), input);
        }
    }

    #[test]
    fn test_directive_after_extra_brace() {
        assert_eq!(lex("{{{ .a }}"), vec![(Token::Brace, 0..1), (Token::Directive, 1..9)]);
        assert_eq!(pieces(r#"{"k":{{{ .a }}}"#), vec!["{", "\"k\":", "{", "{{ .a }}", "}"]);
    }

    #[test]
    fn test_unclosed_directive_is_split_into_braces() {
        assert_eq!(kinds("{{ .title }"), vec![Token::Brace, Token::Brace, Token::Text]);
    }

    #[test]
    fn test_multibyte_text() {
        let input = "告警：{{ .title }}";
        assert_eq!(pieces(input), vec!["告警：", "{{ .title }}"]);
    }
}
