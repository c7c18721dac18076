use crate::error::{ClairError, Diagnostic, Stage};
use crate::span::Span;
use crate::token::{keyword_kind, Token, TokenKind};

/// Pull-based lexer. Tokens are produced one at a time; after the end of
/// input every further call keeps returning an EOF token.
///
/// Unterminated string and character literals are fatal (`Err`); an
/// unrecognized character is recorded as a recoverable diagnostic and
/// skipped.
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            position: 0,
            line: 1,
            column: 1,
            diagnostics: Vec::new(),
        }
    }

    pub fn next_token(&mut self) -> Result<Token, ClairError> {
        loop {
            self.skip_whitespace();

            let Some(ch) = self.peek_char() else {
                let span = Span::new(self.position, 0, self.line, self.column);
                return Ok(Token::new(TokenKind::Eof, span));
            };

            let start = self.mark();

            if ch.is_ascii_alphabetic() || ch == '_' {
                return Ok(self.read_identifier(start));
            }
            if ch.is_ascii_digit() {
                return Ok(self.read_number(start));
            }
            if ch == '"' {
                return self.read_string(start);
            }
            if ch == '\'' {
                return self.read_character(start);
            }

            self.bump_char();
            let kind = match ch {
                '<' => match self.peek_char() {
                    Some('=') => {
                        self.bump_char();
                        TokenKind::LessEqual
                    }
                    Some('-') => {
                        self.bump_char();
                        TokenKind::Assign
                    }
                    _ => TokenKind::Less,
                },
                '>' => {
                    if self.peek_char() == Some('=') {
                        self.bump_char();
                        TokenKind::GreaterEqual
                    } else {
                        TokenKind::Greater
                    }
                }
                '!' => {
                    if self.peek_char() == Some('=') {
                        self.bump_char();
                        TokenKind::BangEqual
                    } else {
                        TokenKind::Bang
                    }
                }
                '-' => {
                    if self.peek_char() == Some('>') {
                        self.bump_char();
                        TokenKind::Arrow
                    } else {
                        TokenKind::Minus
                    }
                }
                '+' => TokenKind::Plus,
                '*' => TokenKind::Star,
                '/' => TokenKind::Slash,
                '=' => TokenKind::Equal,
                '.' => TokenKind::Dot,
                ',' => TokenKind::Comma,
                ';' => TokenKind::Semicolon,
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                '[' => TokenKind::LBracket,
                ']' => TokenKind::RBracket,
                other => {
                    self.diagnostics.push(Diagnostic::new(
                        Stage::Lex,
                        format!("unexpected character '{}'", other),
                        self.span_from(start),
                    ));
                    continue;
                }
            };

            return Ok(Token::new(kind, self.span_from(start)));
        }
    }

    /// Recoverable diagnostics accumulated so far (unrecognized
    /// characters, out-of-range integer literals).
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    fn read_identifier(&mut self, start: Mark) -> Token {
        while self
            .peek_char()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.bump_char();
        }

        let span = self.span_from(start);
        let ident = &self.input[start.position..self.position];
        let kind = keyword_kind(ident).unwrap_or_else(|| TokenKind::Identifier(ident.to_owned()));
        Token::new(kind, span)
    }

    fn read_number(&mut self, start: Mark) -> Token {
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.bump_char();
        }

        let span = self.span_from(start);
        let raw = &self.input[start.position..self.position];
        // Signs and decimal points are the parser's business; a number
        // token is a bare digit run.
        let value = match raw.parse::<i64>() {
            Ok(value) => value,
            Err(_) => {
                self.diagnostics.push(Diagnostic::new(
                    Stage::Lex,
                    format!("integer literal '{}' is out of range", raw),
                    span,
                ));
                0
            }
        };
        Token::new(TokenKind::Number(value), span)
    }

    fn read_string(&mut self, start: Mark) -> Result<Token, ClairError> {
        self.bump_char(); // opening quote

        let content_start = self.position;
        while let Some(c) = self.peek_char() {
            if c == '"' {
                let value = self.input[content_start..self.position].to_owned();
                self.bump_char(); // closing quote
                return Ok(Token::new(TokenKind::Str(value), self.span_from(start)));
            }
            self.bump_char();
        }

        Err(ClairError::new_lex(
            "unterminated string literal".to_string(),
            self.span_from(start),
        ))
    }

    fn read_character(&mut self, start: Mark) -> Result<Token, ClairError> {
        self.bump_char(); // opening quote

        let value = match self.peek_char() {
            Some(c) if c != '\'' => c,
            _ => {
                return Err(ClairError::new_lex(
                    "malformed character literal".to_string(),
                    self.span_from(start),
                ));
            }
        };
        self.bump_char();

        if self.peek_char() != Some('\'') {
            return Err(ClairError::new_lex(
                "unterminated character literal".to_string(),
                self.span_from(start),
            ));
        }
        self.bump_char(); // closing quote

        Ok(Token::new(TokenKind::Char(value), self.span_from(start)))
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.bump_char();
        }
    }

    fn mark(&self) -> Mark {
        Mark {
            position: self.position,
            line: self.line,
            column: self.column,
        }
    }

    fn span_from(&self, start: Mark) -> Span {
        Span::new(
            start.position,
            self.position - start.position,
            start.line,
            start.column,
        )
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn bump_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }
}

/// Saved cursor position, used to build the span of a lexeme from its
/// first character.
#[derive(Clone, Copy)]
struct Mark {
    position: usize,
    line: usize,
    column: usize,
}
