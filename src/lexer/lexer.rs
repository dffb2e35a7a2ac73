//! Main lexer implementation for Papyrus.
//!
//! The [`Lexer`] is driven one token at a time by the parser: each
//! [`next_token`](Lexer::next_token) call replaces the current token and
//! remembers where the previous one ended. Papyrus has no statement
//! terminator, so the parser frequently needs to know whether a newline
//! separates two adjacent tokens; the lexer answers that from the recorded
//! offsets, honoring `\` line continuations.

use super::cursor::{is_ident_continue, is_ident_start, Cursor};
use super::token::{lookup_keyword, Token, TokenKind, TokenValue};
use crate::error::{ParseError, ParseErrorKind, Result};
use crate::span::Span;

/// Lexer for Papyrus source code.
pub struct Lexer<'src> {
    /// Low-level byte cursor.
    cursor: Cursor<'src>,
    /// The current token. A placeholder EOF until the first `next_token`.
    token: Token,
    /// Start offset of the previously consumed token.
    prev_start: usize,
    /// End offset of the previously consumed token.
    prev_end: usize,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer over the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            token: Token::eof(0),
            prev_start: 0,
            prev_end: 0,
        }
    }

    /// The full source text.
    #[inline]
    pub fn source(&self) -> &'src str {
        self.cursor.source()
    }

    /// The current token.
    #[inline]
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Start offset of the previously consumed token.
    #[inline]
    pub fn prev_start(&self) -> usize {
        self.prev_start
    }

    /// End offset of the previously consumed token.
    #[inline]
    pub fn prev_end(&self) -> usize {
        self.prev_end
    }

    /// Advance to the next token.
    pub fn next_token(&mut self) -> Result<()> {
        self.prev_start = self.token.span.start;
        self.prev_end = self.token.span.end;

        // Skip space and at most one `\` line continuation.
        let mut saw_continuation = false;
        loop {
            self.cursor.skip_space()?;
            if self.cursor.peek() == Some(b'\\') {
                let pos = self.cursor.pos();
                if saw_continuation {
                    return Err(ParseError::new(
                        ParseErrorKind::UnexpectedToken,
                        Span::new(pos, pos + 1),
                        "more than one line continuation between tokens",
                    ));
                }
                saw_continuation = true;
                self.cursor.bump();
                continue;
            }
            break;
        }

        let start = self.cursor.pos();
        if self.cursor.is_eof() {
            self.token = Token::eof(start);
            return Ok(());
        }

        self.token = self.read_token(start)?;
        Ok(())
    }

    /// True iff a newline separates the previous token from the current one.
    ///
    /// A line continuation backslash in the gap suppresses the newline.
    pub fn has_newline_before_current(&self) -> bool {
        let gap = self
            .cursor
            .slice(self.prev_end, self.token.span.start);
        self.cursor
            .has_newline_between(self.prev_end, self.token.span.start)
            && !gap.contains('\\')
    }

    /// Peek the first non-space code unit after the current token, without
    /// advancing. Drives the parser's declaration-vs-expression lookahead.
    pub fn peek_byte_after_current(&self) -> Result<Option<u8>> {
        let pos = self.cursor.skip_space_from(self.token.span.end)?;
        Ok(self.cursor.byte_at(pos))
    }

    /// True iff the current token is followed by `[` and then (after
    /// whitespace) `]` — the array-type marker.
    pub fn array_brackets_follow(&self) -> Result<bool> {
        let pos = self.cursor.skip_space_from(self.token.span.end)?;
        if self.cursor.byte_at(pos) != Some(b'[') {
            return Ok(false);
        }
        let pos = self.cursor.skip_space_from(pos + 1)?;
        Ok(self.cursor.byte_at(pos) == Some(b']'))
    }

    /// True iff the identifier chunk after the current token matches `word`
    /// case-insensitively. Used to tell `Auto State` from a bare `Auto`.
    pub fn keyword_follows(&self, word: &str) -> Result<bool> {
        let start = self.cursor.skip_space_from(self.token.span.end)?;
        let mut end = start;
        for ch in self.source()[start..].chars() {
            if is_ident_continue(ch) {
                end += ch.len_utf8();
            } else {
                break;
            }
        }
        Ok(self.source()[start..end].eq_ignore_ascii_case(word))
    }

    /// Case-insensitive existence check for `needle` in the source at and
    /// after the current token. The full-property parser uses this to verify
    /// an `EndProperty` terminator exists before committing to a body parse.
    pub fn rest_contains(&self, needle: &str) -> bool {
        let rest = &self.source()[self.token.span.start..];
        rest.to_ascii_lowercase().contains(&needle.to_ascii_lowercase())
    }

    // =========================================
    // Internal: token scanning
    // =========================================

    /// Scan one token beginning at `start` (cursor sits on its first byte).
    fn read_token(&mut self, start: usize) -> Result<Token> {
        let byte = self.cursor.peek().unwrap();

        match byte {
            b'0'..=b'9' => self.read_number(start),

            // A leading dot starts a number only when a digit follows.
            b'.' if self
                .cursor
                .peek_at(1)
                .is_some_and(|b| b.is_ascii_digit()) =>
            {
                self.read_number(start)
            }

            b'"' => self.read_string(start),
            b'\'' => self.read_char(start),

            _ => {
                if self.cursor.peek_char().is_some_and(is_ident_start) {
                    self.read_identifier(start)
                } else {
                    self.read_operator(start)
                }
            }
        }
    }

    /// Scan an identifier or keyword.
    fn read_identifier(&mut self, start: usize) -> Result<Token> {
        while self.cursor.peek_char().is_some_and(is_ident_continue) {
            self.cursor.bump_char();
        }

        let chunk = self.cursor.slice(start, self.cursor.pos());
        let span = Span::new(start, self.cursor.pos());

        // Keywords match case-insensitively; plain names keep their case.
        match lookup_keyword(&chunk.to_ascii_lowercase()) {
            Some(kind) => Ok(Token::new(kind, None, span)),
            None => Ok(Token::new(
                TokenKind::Name,
                Some(TokenValue::Text(chunk.to_string())),
                span,
            )),
        }
    }

    /// Scan a numeric literal: `0x` hex, or decimal with optional fraction
    /// and exponent. A value containing `.` is a float, otherwise an integer.
    fn read_number(&mut self, start: usize) -> Result<Token> {
        if self.cursor.peek() == Some(b'0')
            && matches!(self.cursor.peek_at(1), Some(b'x') | Some(b'X'))
        {
            return self.read_hex_number(start);
        }

        while self.cursor.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.cursor.bump();
        }

        let mut is_float = false;

        // Fractional part: only when a digit follows the dot.
        if self.cursor.peek() == Some(b'.')
            && self
                .cursor
                .peek_at(1)
                .is_some_and(|b| b.is_ascii_digit())
        {
            self.cursor.bump();
            while self.cursor.peek().is_some_and(|b| b.is_ascii_digit()) {
                self.cursor.bump();
            }
            is_float = true;
        }

        // Exponent part: only when digits (with optional sign) follow.
        if matches!(self.cursor.peek(), Some(b'e') | Some(b'E')) {
            let after_sign = match self.cursor.peek_at(1) {
                Some(b'+') | Some(b'-') => 2,
                _ => 1,
            };
            if self
                .cursor
                .peek_at(after_sign)
                .is_some_and(|b| b.is_ascii_digit())
            {
                self.cursor.advance(after_sign);
                while self.cursor.peek().is_some_and(|b| b.is_ascii_digit()) {
                    self.cursor.bump();
                }
            }
        }

        self.reject_ident_after_number()?;

        let text = self.cursor.slice(start, self.cursor.pos());
        let span = Span::new(start, self.cursor.pos());

        let value = if is_float {
            TokenValue::Float(parse_number::<f64>(text, span)?)
        } else {
            // Exponent forms carry no dot but still parse as floats.
            match text.parse::<i64>() {
                Ok(n) => TokenValue::Int(n),
                Err(_) => TokenValue::Int(parse_number::<f64>(text, span)? as i64),
            }
        };

        Ok(Token::new(TokenKind::Num, Some(value), span))
    }

    /// Scan a `0x`-prefixed hexadecimal integer.
    fn read_hex_number(&mut self, start: usize) -> Result<Token> {
        self.cursor.advance(2); // 0x

        let digits_start = self.cursor.pos();
        while self.cursor.peek().is_some_and(|b| b.is_ascii_hexdigit()) {
            self.cursor.bump();
        }

        let span = Span::new(start, self.cursor.pos());
        if self.cursor.pos() == digits_start {
            return Err(ParseError::new(
                ParseErrorKind::UnexpectedToken,
                span,
                "invalid number literal",
            ));
        }

        self.reject_ident_after_number()?;

        let digits = self.cursor.slice(digits_start, self.cursor.pos());
        let value = i64::from_str_radix(digits, 16).map_err(|_| {
            ParseError::new(
                ParseErrorKind::UnexpectedToken,
                Span::new(start, self.cursor.pos()),
                "invalid number literal",
            )
        })?;

        Ok(Token::new(
            TokenKind::Num,
            Some(TokenValue::Int(value)),
            Span::new(start, self.cursor.pos()),
        ))
    }

    /// An identifier-start code unit directly after a number is an error.
    fn reject_ident_after_number(&self) -> Result<()> {
        if let Some(ch) = self.cursor.peek_char() {
            if is_ident_start(ch) {
                let pos = self.cursor.pos();
                return Err(ParseError::new(
                    ParseErrorKind::UnexpectedToken,
                    Span::new(pos, pos + ch.len_utf8()),
                    "identifier directly after number",
                ));
            }
        }
        Ok(())
    }

    /// Scan a double-quoted string literal.
    fn read_string(&mut self, start: usize) -> Result<Token> {
        self.cursor.bump(); // opening quote
        let mut value = String::new();

        loop {
            match self.cursor.peek() {
                None => {
                    return Err(self.string_error(start, "unterminated string literal"));
                }
                Some(b'"') => {
                    self.cursor.bump();
                    break;
                }
                Some(b'\n') | Some(b'\r') => {
                    return Err(self.string_error(start, "newline in string literal"));
                }
                Some(b'\\') => {
                    self.cursor.bump();
                    let Some(esc) = self.cursor.bump_char() else {
                        return Err(self.string_error(start, "unterminated string literal"));
                    };
                    match esc {
                        'n' => value.push('\n'),
                        'r' => value.push('\r'),
                        't' => value.push('\t'),
                        'b' => value.push('\u{0008}'),
                        'v' => value.push('\u{000B}'),
                        'f' => value.push('\u{000C}'),
                        'x' => value.push(self.read_hex_escape(start)?),
                        '\\' => value.push('\\'),
                        '"' => value.push('"'),
                        // Escaped newline contributes nothing.
                        '\r' => {
                            self.cursor.eat(b'\n');
                        }
                        '\n' => {}
                        other => value.push(other),
                    }
                }
                Some(_) => {
                    value.push(self.cursor.bump_char().unwrap());
                }
            }
        }

        Ok(Token::new(
            TokenKind::String,
            Some(TokenValue::Text(value)),
            Span::new(start, self.cursor.pos()),
        ))
    }

    /// Read the two hex digits of a `\x` escape.
    fn read_hex_escape(&mut self, start: usize) -> Result<char> {
        let mut code = 0u32;
        for _ in 0..2 {
            let digit = self
                .cursor
                .peek()
                .and_then(|b| (b as char).to_digit(16))
                .ok_or_else(|| self.string_error(start, "invalid '\\x' escape sequence"))?;
            code = code * 16 + digit;
            self.cursor.bump();
        }
        Ok(char::from_u32(code).unwrap_or('\u{FFFD}'))
    }

    fn string_error(&self, start: usize, message: &str) -> ParseError {
        ParseError::new(
            ParseErrorKind::UnexpectedToken,
            Span::new(start, self.cursor.pos()),
            message,
        )
    }

    /// Scan a single-quoted char literal: exactly one code unit.
    fn read_char(&mut self, start: usize) -> Result<Token> {
        self.cursor.bump(); // opening quote

        let ch = match self.cursor.peek() {
            None | Some(b'\n') | Some(b'\r') => {
                return Err(self.string_error(start, "unterminated char literal"));
            }
            Some(b'\'') => {
                return Err(self.string_error(start, "empty char literal"));
            }
            _ => self.cursor.bump_char().unwrap(),
        };

        if !self.cursor.eat(b'\'') {
            return Err(self.string_error(
                start,
                "char literal must contain exactly one code unit",
            ));
        }

        Ok(Token::new(
            TokenKind::Char,
            Some(TokenValue::Text(ch.to_string())),
            Span::new(start, self.cursor.pos()),
        ))
    }

    /// Scan an operator or punctuation token.
    ///
    /// Tuple-matches on (first byte, peek) so multi-character operators are
    /// matched greedily.
    fn read_operator(&mut self, start: usize) -> Result<Token> {
        use TokenKind::*;

        let byte = self.cursor.peek().unwrap();
        self.cursor.bump();
        let next = self.cursor.peek();

        let (kind, text): (TokenKind, Option<&str>) = match (byte, next) {
            // Punctuation carries no value.
            (b'(', _) => (ParenL, Option::None),
            (b')', _) => (ParenR, Option::None),
            (b'[', _) => (BracketL, Option::None),
            (b']', _) => (BracketR, Option::None),
            (b',', _) => (Comma, Option::None),
            (b'.', _) => (Dot, Option::None),
            (b':', _) => (Colon, Option::None),

            (b'+', Some(b'=')) => {
                self.cursor.bump();
                (Assign, Some("+="))
            }
            (b'+', Some(b'+')) => {
                return Err(ParseError::new(
                    ParseErrorKind::UnexpectedToken,
                    Span::new(start, start + 2),
                    "'++' is not supported",
                ));
            }
            (b'+', _) => (PlusMinus, Some("+")),

            (b'-', Some(b'=')) => {
                self.cursor.bump();
                (Assign, Some("-="))
            }
            (b'-', Some(b'-')) => {
                return Err(ParseError::new(
                    ParseErrorKind::UnexpectedToken,
                    Span::new(start, start + 2),
                    "'--' is not supported",
                ));
            }
            (b'-', _) => (PlusMinus, Some("-")),

            (b'*', Some(b'*')) => {
                self.cursor.bump();
                if self.cursor.eat(b'=') {
                    (Assign, Some("**="))
                } else {
                    (StarStar, Some("**"))
                }
            }
            (b'*', Some(b'=')) => {
                self.cursor.bump();
                (Assign, Some("*="))
            }
            (b'*', _) => (Star, Some("*")),

            (b'/', Some(b'=')) => {
                self.cursor.bump();
                (Assign, Some("/="))
            }
            (b'/', _) => (Slash, Some("/")),

            (b'%', Some(b'=')) => {
                self.cursor.bump();
                (Assign, Some("%="))
            }
            (b'%', _) => (Modulo, Some("%")),

            (b'=', Some(b'=')) => {
                self.cursor.bump();
                (Equality, Some("=="))
            }
            (b'=', _) => (Assign, Some("=")),

            (b'!', Some(b'=')) => {
                self.cursor.bump();
                (Equality, Some("!="))
            }
            (b'!', _) => (Prefix, Some("!")),

            (b'<', Some(b'=')) => {
                self.cursor.bump();
                (Relational, Some("<="))
            }
            (b'<', _) => (Relational, Some("<")),

            (b'>', Some(b'=')) => {
                self.cursor.bump();
                (Relational, Some(">="))
            }
            (b'>', _) => (Relational, Some(">")),

            (b'|', Some(b'|')) => {
                self.cursor.bump();
                (LogicalOr, Some("||"))
            }
            (b'&', Some(b'&')) => {
                self.cursor.bump();
                (LogicalAnd, Some("&&"))
            }

            (b'~', _) => (Prefix, Some("~")),

            // Standalone `&` and `|`, and anything else, are errors.
            _ => {
                let ch = self.cursor.source()[start..].chars().next().unwrap();
                return Err(ParseError::new(
                    ParseErrorKind::UnexpectedToken,
                    Span::new(start, start + ch.len_utf8()),
                    format!("unexpected character '{}'", ch),
                ));
            }
        };

        Ok(Token::new(
            kind,
            text.map(|t| TokenValue::Text(t.to_string())),
            Span::new(start, self.cursor.pos()),
        ))
    }
}

/// Parse a numeric literal, mapping failure to an `UnexpectedToken` error.
fn parse_number<T: std::str::FromStr>(text: &str, span: Span) -> Result<T> {
    text.parse::<T>().map_err(|_| {
        ParseError::new(ParseErrorKind::UnexpectedToken, span, "invalid number literal")
    })
}
