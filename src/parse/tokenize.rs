//! Lexical tokenizer: input line → flat token stream.
//!
//! Spaces separate tokens; `|`, `<`, `>` and `>>` are operators outside quotes.
//! A word may be built from several quoted and unquoted segments. Tabs are
//! rejected outright rather than treated as whitespace.

use super::types::{SourceSpan, Token, TokenKind};
use crate::error::ParseError;

/// Tokenize a command line.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    if let Some(position) = input.find('\t') {
        return Err(ParseError::TabCharacter { position });
    }
    Tokenizer::new(input, false).run()
}

/// Tokenize a possibly incomplete line for completion.
///
/// Unterminated quotes run to the end of input, a trailing escape is dropped
/// and tabs are kept as word characters. Never fails.
pub(crate) fn tokenize_lenient(input: &str) -> Vec<Token> {
    Tokenizer::new(input, true).run().unwrap_or_default()
}

fn is_word_terminator(c: char) -> bool {
    matches!(c, ' ' | '|' | '<' | '>')
}

/// Characters that end or alter a word when typed unquoted.
const SPECIAL: &[char] = &[' ', '\t', '|', '<', '>', '\'', '"', '\\'];

/// True when `text` would not survive as a single unquoted word.
pub(crate) fn needs_quotes(text: &str) -> bool {
    text.contains(SPECIAL)
}

/// Render `text` so that [`tokenize`] reads it back as exactly one word.
///
/// Text without special characters is returned as is; an empty word and a
/// bare `--` are single-quoted.
pub fn quote_word(text: &str) -> String {
    if text.is_empty() || text == "--" {
        return format!("'{text}'");
    }
    if !needs_quotes(text) {
        return text.to_string();
    }
    if !text.contains('\'') {
        return format!("'{text}'");
    }
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

struct Tokenizer<'a> {
    input: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
    lenient: bool,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str, lenient: bool) -> Self {
        Self {
            input,
            chars: input.char_indices().collect(),
            pos: 0,
            lenient,
        }
    }

    /// Byte offset of the char at `index`, or the input length past the end.
    fn offset(&self, index: usize) -> usize {
        self.chars
            .get(index)
            .map(|&(o, _)| o)
            .unwrap_or(self.input.len())
    }

    fn peek_at(&self, index: usize) -> Option<char> {
        self.chars.get(index).map(|&(_, c)| c)
    }

    fn run(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();

        while let Some(c) = self.peek_at(self.pos) {
            let start = self.offset(self.pos);
            let operator = match c {
                ' ' => {
                    self.pos += 1;
                    continue;
                }
                '|' => Some((TokenKind::Pipe, 1)),
                '<' => Some((TokenKind::RedirectIn, 1)),
                '>' if self.peek_at(self.pos + 1) == Some('>') => {
                    Some((TokenKind::RedirectAppend, 2))
                }
                '>' => Some((TokenKind::RedirectOut, 1)),
                _ => None,
            };

            if let Some((kind, width)) = operator {
                self.pos += width;
                tokens.push(Token {
                    kind,
                    value: kind.as_str().to_string(),
                    span: SourceSpan::new(start, start + width),
                    was_quoted: false,
                });
                continue;
            }

            tokens.push(self.word()?);
        }

        Ok(tokens)
    }

    /// Scan one word starting at the current position.
    fn word(&mut self) -> Result<Token, ParseError> {
        let start = self.offset(self.pos);
        let mut value = String::new();
        let mut was_quoted = false;
        // No quotes and no escapes anywhere in the word
        let mut plain = true;

        while let Some(c) = self.peek_at(self.pos) {
            match c {
                c if is_word_terminator(c) => break,
                '\\' => {
                    plain = false;
                    match self.peek_at(self.pos + 1) {
                        Some(next) => {
                            value.push(next);
                            self.pos += 2;
                        }
                        None if self.lenient => self.pos += 1,
                        None => return Err(ParseError::TrailingEscape),
                    }
                }
                '\'' => {
                    plain = false;
                    was_quoted = true;
                    self.single_quoted(&mut value)?;
                }
                '"' => {
                    plain = false;
                    was_quoted = true;
                    self.double_quoted(&mut value)?;
                }
                _ => {
                    value.push(c);
                    self.pos += 1;
                }
            }
        }

        let end = self.offset(self.pos);
        let kind = if plain && value == "--" {
            TokenKind::EndOfOptions
        } else {
            TokenKind::Word
        };

        Ok(Token {
            kind,
            value,
            span: SourceSpan::new(start, end),
            was_quoted,
        })
    }

    /// Everything up to the closing `'` is literal.
    fn single_quoted(&mut self, value: &mut String) -> Result<(), ParseError> {
        let open = self.offset(self.pos);
        self.pos += 1;
        while let Some(c) = self.peek_at(self.pos) {
            self.pos += 1;
            if c == '\'' {
                return Ok(());
            }
            value.push(c);
        }
        if self.lenient {
            return Ok(());
        }
        Err(ParseError::UnterminatedQuote {
            quote: '\'',
            position: open,
        })
    }

    /// Backslash escapes only `"` and `\`; any other backslash is kept.
    fn double_quoted(&mut self, value: &mut String) -> Result<(), ParseError> {
        let open = self.offset(self.pos);
        self.pos += 1;
        while let Some(c) = self.peek_at(self.pos) {
            match c {
                '"' => {
                    self.pos += 1;
                    return Ok(());
                }
                '\\' if matches!(self.peek_at(self.pos + 1), Some('"' | '\\')) => {
                    if let Some(next) = self.peek_at(self.pos + 1) {
                        value.push(next);
                    }
                    self.pos += 2;
                }
                _ => {
                    value.push(c);
                    self.pos += 1;
                }
            }
        }
        if self.lenient {
            return Ok(());
        }
        Err(ParseError::UnterminatedQuote {
            quote: '"',
            position: open,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(input: &str) -> Vec<String> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.value)
            .collect()
    }

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn simple_words() {
        assert_eq!(words("ls -la /tmp"), vec!["ls", "-la", "/tmp"]);
    }

    #[test]
    fn double_quotes_keep_spaces() {
        assert_eq!(words("echo \"a b\" c"), vec!["echo", "a b", "c"]);
    }

    #[test]
    fn escaped_space_joins_word() {
        assert_eq!(words("echo a\\ b"), vec!["echo", "a b"]);
    }

    #[test]
    fn escape_any_character() {
        assert_eq!(words("echo \\q\\|"), vec!["echo", "q|"]);
    }

    #[test]
    fn single_quotes_are_literal() {
        assert_eq!(words(r#"echo 'a\"b'"#), vec!["echo", r#"a\"b"#]);
    }

    #[test]
    fn double_quote_escapes_only_quote_and_backslash() {
        assert_eq!(words(r#"echo "a\"b\\c\n""#), vec!["echo", r#"a"b\c\n"#]);
    }

    #[test]
    fn concatenated_segments() {
        let tokens = tokenize("a\"b\"c").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].value, "abc");
        assert!(tokens[0].was_quoted);
    }

    #[test]
    fn unquoted_word_not_marked_quoted() {
        let tokens = tokenize("plain").unwrap();
        assert!(!tokens[0].was_quoted);
    }

    #[test]
    fn operators() {
        assert_eq!(
            kinds("a | b < c > d >> e"),
            vec![
                TokenKind::Word,
                TokenKind::Pipe,
                TokenKind::Word,
                TokenKind::RedirectIn,
                TokenKind::Word,
                TokenKind::RedirectOut,
                TokenKind::Word,
                TokenKind::RedirectAppend,
                TokenKind::Word,
            ]
        );
    }

    #[test]
    fn operators_without_spaces() {
        assert_eq!(words("a|b>>c"), vec!["a", "|", "b", ">>", "c"]);
    }

    #[test]
    fn quoted_operators_are_words() {
        let tokens = tokenize("echo '|' \">\"").unwrap();
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Word));
    }

    #[test]
    fn bare_double_dash_ends_options() {
        assert_eq!(kinds("cmd -- -x")[1], TokenKind::EndOfOptions);
    }

    #[test]
    fn quoted_double_dash_is_word() {
        assert_eq!(kinds("cmd \"--\"")[1], TokenKind::Word);
        assert_eq!(kinds("cmd \\--")[1], TokenKind::Word);
    }

    #[test]
    fn empty_quotes_make_empty_word() {
        let tokens = tokenize("echo ''").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].value, "");
    }

    #[test]
    fn spans_cover_raw_text() {
        let tokens = tokenize("ls \"my dir\"").unwrap();
        assert_eq!(tokens[1].span, SourceSpan::new(3, 11));
    }

    #[test]
    fn tab_rejected_everywhere() {
        for input in ["a\tb", "'a\tb'", "\"a\tb\"", "a\\\tb"] {
            assert!(matches!(
                tokenize(input),
                Err(ParseError::TabCharacter { .. })
            ));
        }
    }

    #[test]
    fn trailing_escape_rejected() {
        assert_eq!(tokenize("echo a\\"), Err(ParseError::TrailingEscape));
    }

    #[test]
    fn unterminated_quotes_rejected() {
        assert_eq!(
            tokenize("echo 'abc"),
            Err(ParseError::UnterminatedQuote {
                quote: '\'',
                position: 5
            })
        );
        assert!(matches!(
            tokenize("echo \"abc"),
            Err(ParseError::UnterminatedQuote { quote: '"', .. })
        ));
    }

    #[test]
    fn lenient_accepts_open_quote() {
        let tokens = tokenize_lenient("cat \"my fi");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].value, "my fi");
        assert_eq!(tokens[1].span.end, 10);
    }

    #[test]
    fn empty_input() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("   ").unwrap().is_empty());
    }

    #[test]
    fn quote_word_reads_back_as_one_word() {
        assert_eq!(quote_word("plain"), "plain");
        assert_eq!(quote_word("~/x"), "~/x");
        for text in ["", "--", "a b", "it's", "a|b", "back\\slash"] {
            let tokens = tokenize(&quote_word(text)).unwrap();
            assert_eq!(tokens.len(), 1, "{text:?}");
            assert_eq!(tokens[0].kind, TokenKind::Word);
            assert_eq!(tokens[0].value, text);
        }
    }
}
