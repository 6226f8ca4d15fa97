//! Scanner for Monkey source code.
//!
//! Single-pass over the raw bytes with one byte of lookahead. Monkey source
//! is ASCII; anything the scanner does not recognize becomes an `Illegal`
//! token rather than an error, so lexing itself can never fail.

use crate::lexer::token::{Token, TokenKind};
use crate::span::Span;

/// The scanner transforms source code into a stream of tokens.
pub struct Scanner<'a> {
    source: &'a [u8],
    position: usize,
    line: usize,
    column: usize,
    start_pos: usize,
    start_line: usize,
    start_column: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source: source.as_bytes(),
            position: 0,
            line: 1,
            column: 1,
            start_pos: 0,
            start_line: 1,
            start_column: 1,
        }
    }

    /// Scan all tokens from the source, ending with a single `Eof` token.
    pub fn scan_tokens(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        tokens
    }

    /// Scan the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        self.mark_start();

        let Some(c) = self.advance() else {
            return Token::eof(self.position, self.line, self.column);
        };

        match c {
            b'=' => {
                if self.match_byte(b'=') {
                    self.make_token(TokenKind::Eq)
                } else {
                    self.make_token(TokenKind::Assign)
                }
            }
            b'!' => {
                if self.match_byte(b'=') {
                    self.make_token(TokenKind::NotEq)
                } else {
                    self.make_token(TokenKind::Bang)
                }
            }
            b'+' => self.make_token(TokenKind::Plus),
            b'-' => self.make_token(TokenKind::Minus),
            b'*' => self.make_token(TokenKind::Asterisk),
            b'/' => self.make_token(TokenKind::Slash),
            b'<' => self.make_token(TokenKind::Lt),
            b'>' => self.make_token(TokenKind::Gt),
            b',' => self.make_token(TokenKind::Comma),
            b';' => self.make_token(TokenKind::Semicolon),
            b':' => self.make_token(TokenKind::Colon),
            b'(' => self.make_token(TokenKind::LParen),
            b')' => self.make_token(TokenKind::RParen),
            b'{' => self.make_token(TokenKind::LBrace),
            b'}' => self.make_token(TokenKind::RBrace),
            b'[' => self.make_token(TokenKind::LBracket),
            b']' => self.make_token(TokenKind::RBracket),
            b'"' => self.scan_string(),
            c if c.is_ascii_digit() => self.scan_number(),
            c if is_letter(c) => self.scan_identifier(),
            _ => self.make_token(TokenKind::Illegal),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                b' ' | b'\t' | b'\r' => {
                    self.advance();
                }
                b'\n' => {
                    self.advance();
                    self.line += 1;
                    self.column = 1;
                }
                _ => break,
            }
        }
    }

    /// Read the rest of a `"..."` literal. No escape sequences are
    /// interpreted; an unterminated string simply ends at end-of-input.
    fn scan_string(&mut self) -> Token {
        while let Some(c) = self.peek() {
            self.advance();
            if c == b'"' {
                break;
            }
            if c == b'\n' {
                self.line += 1;
                self.column = 1;
            }
        }

        // The literal is the string contents, without the quotes.
        let end = if self.source.get(self.position - 1) == Some(&b'"') && self.position > self.start_pos + 1
        {
            self.position - 1
        } else {
            self.position
        };
        let contents = &self.source[self.start_pos + 1..end];
        Token::new(
            TokenKind::Str,
            String::from_utf8_lossy(contents).into_owned(),
            self.current_span(),
        )
    }

    fn scan_number(&mut self) -> Token {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
        self.make_token(TokenKind::Int)
    }

    fn scan_identifier(&mut self) -> Token {
        while matches!(self.peek(), Some(c) if is_letter(c)) {
            self.advance();
        }
        let lexeme = &self.source[self.start_pos..self.position];
        let lexeme = String::from_utf8_lossy(lexeme).into_owned();
        let kind = TokenKind::keyword(&lexeme).unwrap_or(TokenKind::Ident);
        Token::new(kind, lexeme, self.current_span())
    }

    fn mark_start(&mut self) {
        self.start_pos = self.position;
        self.start_line = self.line;
        self.start_column = self.column;
    }

    fn advance(&mut self) -> Option<u8> {
        let c = self.source.get(self.position).copied()?;
        self.position += 1;
        self.column += 1;
        Some(c)
    }

    fn peek(&self) -> Option<u8> {
        self.source.get(self.position).copied()
    }

    fn match_byte(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        let lexeme = &self.source[self.start_pos..self.position];
        Token::new(
            kind,
            String::from_utf8_lossy(lexeme).into_owned(),
            self.current_span(),
        )
    }

    fn current_span(&self) -> Span {
        Span::new(
            self.start_pos,
            self.position,
            self.start_line,
            self.start_column,
        )
    }
}

fn is_letter(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_token_covers_full_alphabet() {
        let input = r#"let five = 5;
let ten = 10;

let add = fn(x, y) {
  x + y;
};

let result = add(five, ten);
!-/*5;
5 < 10 > 5;

if (5 < 10) {
  return true;
} else {
  return false;
}

10 == 10;
10 != 9;
"foobar"
"foo bar"
[1, 2];
{"foo": "bar"}
"#;

        let expected: Vec<(TokenKind, &str)> = vec![
            (TokenKind::Let, "let"),
            (TokenKind::Ident, "five"),
            (TokenKind::Assign, "="),
            (TokenKind::Int, "5"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::Let, "let"),
            (TokenKind::Ident, "ten"),
            (TokenKind::Assign, "="),
            (TokenKind::Int, "10"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::Let, "let"),
            (TokenKind::Ident, "add"),
            (TokenKind::Assign, "="),
            (TokenKind::Function, "fn"),
            (TokenKind::LParen, "("),
            (TokenKind::Ident, "x"),
            (TokenKind::Comma, ","),
            (TokenKind::Ident, "y"),
            (TokenKind::RParen, ")"),
            (TokenKind::LBrace, "{"),
            (TokenKind::Ident, "x"),
            (TokenKind::Plus, "+"),
            (TokenKind::Ident, "y"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::RBrace, "}"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::Let, "let"),
            (TokenKind::Ident, "result"),
            (TokenKind::Assign, "="),
            (TokenKind::Ident, "add"),
            (TokenKind::LParen, "("),
            (TokenKind::Ident, "five"),
            (TokenKind::Comma, ","),
            (TokenKind::Ident, "ten"),
            (TokenKind::RParen, ")"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::Bang, "!"),
            (TokenKind::Minus, "-"),
            (TokenKind::Slash, "/"),
            (TokenKind::Asterisk, "*"),
            (TokenKind::Int, "5"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::Int, "5"),
            (TokenKind::Lt, "<"),
            (TokenKind::Int, "10"),
            (TokenKind::Gt, ">"),
            (TokenKind::Int, "5"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::If, "if"),
            (TokenKind::LParen, "("),
            (TokenKind::Int, "5"),
            (TokenKind::Lt, "<"),
            (TokenKind::Int, "10"),
            (TokenKind::RParen, ")"),
            (TokenKind::LBrace, "{"),
            (TokenKind::Return, "return"),
            (TokenKind::True, "true"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::RBrace, "}"),
            (TokenKind::Else, "else"),
            (TokenKind::LBrace, "{"),
            (TokenKind::Return, "return"),
            (TokenKind::False, "false"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::RBrace, "}"),
            (TokenKind::Int, "10"),
            (TokenKind::Eq, "=="),
            (TokenKind::Int, "10"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::Int, "10"),
            (TokenKind::NotEq, "!="),
            (TokenKind::Int, "9"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::Str, "foobar"),
            (TokenKind::Str, "foo bar"),
            (TokenKind::LBracket, "["),
            (TokenKind::Int, "1"),
            (TokenKind::Comma, ","),
            (TokenKind::Int, "2"),
            (TokenKind::RBracket, "]"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::LBrace, "{"),
            (TokenKind::Str, "foo"),
            (TokenKind::Colon, ":"),
            (TokenKind::Str, "bar"),
            (TokenKind::RBrace, "}"),
            (TokenKind::Eof, ""),
        ];

        let mut scanner = Scanner::new(input);
        for (i, (kind, literal)) in expected.into_iter().enumerate() {
            let token = scanner.next_token();
            assert_eq!(token.kind, kind, "token {} kind", i);
            assert_eq!(token.literal, literal, "token {} literal", i);
        }
    }

    #[test]
    fn illegal_bytes_become_illegal_tokens() {
        let mut scanner = Scanner::new("let a = 1 @ 2;");
        let tokens = scanner.scan_tokens();
        let illegal: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Illegal)
            .collect();
        assert_eq!(illegal.len(), 1);
        assert_eq!(illegal[0].literal, "@");
    }

    #[test]
    fn eof_repeats() {
        let mut scanner = Scanner::new("");
        assert_eq!(scanner.next_token().kind, TokenKind::Eof);
        assert_eq!(scanner.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn unterminated_string_ends_at_eof() {
        let mut scanner = Scanner::new("\"abc");
        let token = scanner.next_token();
        assert_eq!(token.kind, TokenKind::Str);
        assert_eq!(token.literal, "abc");
        assert_eq!(scanner.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn spans_track_lines() {
        let mut scanner = Scanner::new("let\nx");
        let first = scanner.next_token();
        let second = scanner.next_token();
        assert_eq!(first.span.line, 1);
        assert_eq!(second.span.line, 2);
        assert_eq!(second.span.column, 1);
    }
}
