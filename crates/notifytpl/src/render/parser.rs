//! Parser turning lexed template pieces into a flat node sequence
//!
//! Grammar, whitespace tolerant inside the braces:
//!
//! - `{{ .key }}` substitution
//! - `{{ .key | filter }}` filtered substitution
//! - `{{if .key}} body {{end}}` conditional block
//!
//! Anything else between double braces stays literal text. Conditional
//! bodies cannot contain another conditional: an `if` that meets a second
//! `if` before its `end` is kept as literal text and the inner block is
//! parsed on its own.

use super::lexer::{Span, Token, lex};

/// A parsed template element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<'src> {
    /// Text copied to the output as-is
    Literal(&'src str),

    /// `{{ .key }}`
    Var { key: &'src str, source: &'src str },

    /// `{{ .key | name }}`
    Filter {
        key: &'src str,
        name: &'src str,
        source: &'src str,
    },

    /// `{{if .key}}body{{end}}`
    Conditional {
        key: &'src str,
        body: Vec<Node<'src>>,
        source: &'src str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive<'src> {
    Var(&'src str),
    Filter { key: &'src str, name: &'src str },
    If(&'src str),
    End,
    Unknown,
}

#[derive(Debug)]
struct Piece<'src> {
    directive: Option<Directive<'src>>,
    span: Span,
}

/// Parse a template body into nodes
pub fn parse(input: &str) -> Vec<Node<'_>> {
    let pieces: Vec<Piece<'_>> = lex(input)
        .into_iter()
        .map(|(token, span)| {
            let directive = match token {
                Token::Directive => Some(classify(&input[span.start + 2..span.end - 2])),
                Token::Text | Token::Brace => None,
            };
            Piece { directive, span }
        })
        .collect();

    let mut out = NodeBuilder::new(input);
    let mut i = 0;
    while i < pieces.len() {
        let piece = &pieces[i];
        if let Some(Directive::If(key)) = piece.directive {
            if let Some(offset) = find_end(&pieces[i + 1..]) {
                let end = i + 1 + offset;
                let mut body = NodeBuilder::new(input);
                for inner in &pieces[i + 1..end] {
                    body.inline(inner);
                }
                out.push(Node::Conditional {
                    key,
                    body: body.finish(),
                    source: &input[piece.span.start..pieces[end].span.end],
                });
                i = end + 1;
                continue;
            }
        }
        out.inline(piece);
        i += 1;
    }
    out.finish()
}

/// Index of the `end` closing a conditional, if no other `if` comes first
fn find_end(pieces: &[Piece<'_>]) -> Option<usize> {
    for (idx, piece) in pieces.iter().enumerate() {
        match piece.directive {
            Some(Directive::End) => return Some(idx),
            Some(Directive::If(_)) => return None,
            _ => {}
        }
    }
    None
}

fn classify(inner: &str) -> Directive<'_> {
    let inner = inner.trim();

    if inner == "end" {
        return Directive::End;
    }

    if let Some(rest) = inner.strip_prefix("if") {
        if rest.starts_with(char::is_whitespace) {
            return match parse_key(rest.trim_start()) {
                Some(key) => Directive::If(key),
                None => Directive::Unknown,
            };
        }
    }

    if let Some((lhs, rhs)) = inner.split_once('|') {
        let name = rhs.trim();
        return match parse_key(lhs.trim_end()) {
            Some(key) if is_word(name) => Directive::Filter { key, name },
            _ => Directive::Unknown,
        };
    }

    match parse_key(inner) {
        Some(key) => Directive::Var(key),
        None => Directive::Unknown,
    }
}

/// `.name` with no whitespace or pipes in the name
fn parse_key(s: &str) -> Option<&str> {
    let key = s.strip_prefix('.')?;
    let valid = !key.is_empty() && !key.contains(|c: char| c.is_whitespace() || c == '|');
    valid.then_some(key)
}

fn is_word(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// Accumulates nodes, merging adjacent literal pieces into one slice
struct NodeBuilder<'src> {
    input: &'src str,
    nodes: Vec<Node<'src>>,
    pending: Option<Span>,
}

impl<'src> NodeBuilder<'src> {
    fn new(input: &'src str) -> Self {
        Self {
            input,
            nodes: Vec::new(),
            pending: None,
        }
    }

    fn literal(&mut self, span: Span) {
        match &mut self.pending {
            Some(pending) => pending.end = span.end,
            None => self.pending = Some(span),
        }
    }

    fn push(&mut self, node: Node<'src>) {
        self.flush();
        self.nodes.push(node);
    }

    /// Handle a piece outside conditional processing
    fn inline(&mut self, piece: &Piece<'src>) {
        let source = &self.input[piece.span.clone()];
        match piece.directive {
            Some(Directive::Var(key)) => self.push(Node::Var { key, source }),
            Some(Directive::Filter { key, name }) => self.push(Node::Filter { key, name, source }),
            Some(Directive::If(_) | Directive::End | Directive::Unknown) | None => {
                self.literal(piece.span.clone())
            }
        }
    }

    fn flush(&mut self) {
        if let Some(span) = self.pending.take() {
            self.nodes.push(Node::Literal(&self.input[span]));
        }
    }

    fn finish(mut self) -> Vec<Node<'src>> {
        self.flush();
        self.nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_var_whitespace_tolerant() {
        assert_eq!(
            parse("{{.title}}|{{  .title  }}"),
            vec![
                Node::Var {
                    key: "title",
                    source: "{{.title}}",
                },
                Node::Literal("|"),
                Node::Var {
                    key: "title",
                    source: "{{  .title  }}",
                },
            ]
        );
    }

    #[test]
    fn test_filter() {
        assert_eq!(
            parse("{{ .level|upper }}"),
            vec![Node::Filter {
                key: "level",
                name: "upper",
                source: "{{ .level|upper }}",
            }]
        );
    }

    #[test]
    fn test_conditional_with_var_body() {
        assert_eq!(
            parse("{{if .image}}img:{{.image}}{{end}}"),
            vec![Node::Conditional {
                key: "image",
                body: vec![
                    Node::Literal("img:"),
                    Node::Var {
                        key: "image",
                        source: "{{.image}}",
                    },
                ],
                source: "{{if .image}}img:{{.image}}{{end}}",
            }]
        );
    }

    #[test]
    fn test_unknown_directives_are_literal() {
        assert_eq!(
            parse("{{ title }} {{ .a b }} {{if.a}} {{ .a | }}"),
            vec![Node::Literal("{{ title }} {{ .a b }} {{if.a}} {{ .a | }}")]
        );
    }

    #[test]
    fn test_unterminated_conditional_is_literal() {
        assert_eq!(parse("{{if .a}}x"), vec![Node::Literal("{{if .a}}x")]);
    }

    #[test]
    fn test_nested_conditional_keeps_outer_opener_literal() {
        assert_eq!(
            parse("{{if .a}}x{{if .b}}y{{end}}z{{end}}"),
            vec![
                Node::Literal("{{if .a}}x"),
                Node::Conditional {
                    key: "b",
                    body: vec![Node::Literal("y")],
                    source: "{{if .b}}y{{end}}",
                },
                Node::Literal("z{{end}}"),
            ]
        );
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(" .a "), Directive::Var("a"));
        assert_eq!(classify("if  .a"), Directive::If("a"));
        assert_eq!(classify(" end "), Directive::End);
        assert_eq!(
            classify(".a | lower"),
            Directive::Filter {
                key: "a",
                name: "lower",
            }
        );
        assert_eq!(classify(". a"), Directive::Unknown);
        assert_eq!(classify("ifx .a"), Directive::Unknown);
    }
}
