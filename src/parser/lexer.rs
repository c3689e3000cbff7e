//! Lexer for Horn-clause source text.

use thiserror::Error;

/// Token types.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Identifier(String), // lowercase: atoms, functors, `is`
    Variable(String),   // uppercase or `_`
    Number(f64),
    StringLit(String),

    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    Comma,    // ,
    Dot,      // .
    Pipe,     // |

    Neck,   // :-
    Query,  // ?-
    Colon,  // :
    Equals, // =

    Plus,  // +
    Minus, // -
    Star,  // *
    Slash, // /

    Eof,
}

/// Lexer state.
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
    /// Location of the most recently returned token.
    pub token_line: usize,
    pub token_column: usize,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{line}:{column}: {message}")]
pub struct LexError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            position: 0,
            line: 1,
            column: 1,
            token_line: 1,
            token_column: 1,
        }
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments();
        self.token_line = self.line;
        self.token_column = self.column;

        let remaining = &self.input[self.position..];
        let Some(ch) = remaining.chars().next() else {
            return Ok(Token::Eof);
        };

        let two_char = [(":-", Token::Neck), ("?-", Token::Query)];
        for (text, token) in two_char {
            if remaining.starts_with(text) {
                self.advance(2);
                return Ok(token);
            }
        }

        let single = match ch {
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            '[' => Some(Token::LBracket),
            ']' => Some(Token::RBracket),
            ',' => Some(Token::Comma),
            '.' => Some(Token::Dot),
            '|' => Some(Token::Pipe),
            ':' => Some(Token::Colon),
            '=' => Some(Token::Equals),
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            _ => None,
        };
        if let Some(token) = single {
            self.advance(1);
            return Ok(token);
        }

        if ch == '"' {
            return self.lex_string();
        }
        if ch.is_ascii_digit() {
            return self.lex_number();
        }
        if ch.is_ascii_lowercase() {
            return Ok(Token::Identifier(self.lex_word()));
        }
        if ch.is_ascii_uppercase() || ch == '_' {
            return Ok(Token::Variable(self.lex_word()));
        }

        Err(self.error(format!("unexpected character: '{}'", ch)))
    }

    fn error(&self, message: String) -> LexError {
        LexError {
            message,
            line: self.line,
            column: self.column,
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn advance(&mut self, bytes: usize) {
        let consumed = &self.input[self.position..self.position + bytes];
        for ch in consumed.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.position += bytes;
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(ch) = self.peek_char() {
            let remaining = &self.input[self.position..];
            if ch.is_whitespace() {
                self.advance(ch.len_utf8());
            } else if ch == '%' || remaining.starts_with("//") {
                let line_len = remaining.find('\n').unwrap_or(remaining.len());
                self.advance(line_len);
            } else {
                break;
            }
        }
    }

    fn lex_word(&mut self) -> String {
        let start = self.position;
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.advance(1);
            } else {
                break;
            }
        }
        self.input[start..self.position].to_string()
    }

    fn lex_number(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        self.skip_digits();
        // A dot is a decimal point only when a digit follows; otherwise it ends
        // the clause.
        let rest = &self.input[self.position..];
        if rest.starts_with('.') && rest[1..].starts_with(|c: char| c.is_ascii_digit()) {
            self.advance(1);
            self.skip_digits();
        }
        let text = &self.input[start..self.position];
        text.parse::<f64>()
            .map(Token::Number)
            .map_err(|_| self.error(format!("invalid number: {}", text)))
    }

    fn skip_digits(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_digit() {
                self.advance(1);
            } else {
                break;
            }
        }
    }

    fn lex_string(&mut self) -> Result<Token, LexError> {
        self.advance(1);
        let start = self.position;

        while let Some(ch) = self.peek_char() {
            if ch == '"' {
                let content = self.input[start..self.position].to_string();
                self.advance(1);
                return Ok(Token::StringLit(content));
            } else if ch == '\n' {
                break;
            }
            self.advance(ch.len_utf8());
        }

        Err(self.error("unterminated string literal".to_string()))
    }
}
