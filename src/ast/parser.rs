//! Parser state and token plumbing.
//!
//! The grammar itself lives in `stmt_parser` and `expr_parser`; this module
//! holds the [`Parser`] value, the context flags that drive Papyrus's
//! container-sensitive validation, and the small helpers the grammar methods
//! share.

use super::expr::Identifier;
use super::Program;
use crate::error::{ParseError, ParseErrorKind, Result};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::options::ParseOptions;
use crate::span::Span;

/// Recursive-descent parser for a single Papyrus script.
pub struct Parser<'src> {
    /// Token source, advanced one token at a time.
    pub(crate) lexer: Lexer<'src>,
    pub(crate) options: ParseOptions,
    /// Filename to validate the `ScriptName` against, when supplied.
    pub(crate) filename: Option<&'src str>,
    /// Inside a function body.
    pub(crate) in_function: bool,
    /// Inside an event body.
    pub(crate) in_event: bool,
    /// Inside a state body.
    pub(crate) in_state: bool,
    /// Not yet past the first statement of the file.
    pub(crate) first_read: bool,
    /// Facts about the parsed `ScriptName`, for cross-checks later in the
    /// file (conditional properties, `Parent` usage).
    pub(crate) script_info: Option<ScriptInfo>,
}

/// What later statements need to know about the script header.
pub(crate) struct ScriptInfo {
    pub(crate) conditional: bool,
    pub(crate) has_extends: bool,
}

impl<'src> Parser<'src> {
    /// Create a parser over `content`.
    pub fn new(content: &'src str, options: &ParseOptions, filename: Option<&'src str>) -> Self {
        Self {
            lexer: Lexer::new(content),
            options: *options,
            filename,
            in_function: false,
            in_event: false,
            in_state: false,
            first_read: true,
            script_info: None,
        }
    }

    /// Parse `content` into a [`Program`], or the first error encountered.
    pub fn parse(
        content: &'src str,
        options: &ParseOptions,
        filename: Option<&'src str>,
    ) -> Result<Program> {
        Self::new(content, options, filename).parse_program()
    }

    /// Run the parse: prime the lexer, then loop statement by statement
    /// until end of file.
    pub fn parse_program(mut self) -> Result<Program> {
        self.lexer.next_token()?;

        let mut body = Vec::new();
        while !self.check(TokenKind::Eof) {
            body.push(self.parse_statement()?);
        }

        Ok(Program {
            body,
            span: Span::new(0, self.lexer.source().len()),
        })
    }

    // =========================================
    // Token plumbing
    // =========================================

    /// The current token.
    #[inline]
    pub(crate) fn token(&self) -> &Token {
        self.lexer.token()
    }

    /// The current token's kind.
    #[inline]
    pub(crate) fn kind(&self) -> TokenKind {
        self.lexer.token().kind
    }

    /// Check the current token's kind without consuming.
    #[inline]
    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    /// Advance to the next token.
    #[inline]
    pub(crate) fn advance(&mut self) -> Result<()> {
        self.lexer.next_token()
    }

    /// Consume a token of the given kind, or fail with `UnexpectedToken`.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if !self.check(kind) {
            return Err(self.error_here(
                ParseErrorKind::UnexpectedToken,
                format!(
                    "expected {}, found {}",
                    kind.description(),
                    self.kind().description()
                ),
            ));
        }
        let token = self.token().clone();
        self.advance()?;
        Ok(token)
    }

    /// Consume an identifier token and build its [`Identifier`] node.
    pub(crate) fn expect_name(&mut self) -> Result<Identifier> {
        if !self.check(TokenKind::Name) {
            return Err(self.error_here(
                ParseErrorKind::UnexpectedToken,
                format!("expected identifier, found {}", self.kind().description()),
            ));
        }
        let ident = self.identifier_from(self.token());
        self.advance()?;
        Ok(ident)
    }

    /// Consume a type name: a plain identifier, or one of the primitive-type
    /// keywords (which yield their canonical spelling).
    pub(crate) fn expect_type_name(&mut self) -> Result<Identifier> {
        if !self.kind().is_type_name() {
            return Err(self.error_here(
                ParseErrorKind::UnexpectedToken,
                format!("expected a type name, found {}", self.kind().description()),
            ));
        }
        let ident = self.identifier_from(self.token());
        self.advance()?;
        Ok(ident)
    }

    /// Build an [`Identifier`] from a name or type-keyword token.
    ///
    /// Primitive-type keywords produce their canonical spelling regardless of
    /// source case; plain names keep the case they were written in.
    pub(crate) fn identifier_from(&self, token: &Token) -> Identifier {
        let name = match token.kind {
            TokenKind::Name => token.text().unwrap_or_default().to_string(),
            TokenKind::Auto => "Auto".to_string(),
            kind => kind.primitive_type_name().unwrap_or_default().to_string(),
        };
        Identifier {
            name,
            span: token.span,
        }
    }

    /// The current token's spelling, for operator nodes.
    pub(crate) fn op_text(&self) -> String {
        match self.token().text() {
            Some(text) => text.to_string(),
            None => self.token().span.slice(self.lexer.source()).to_string(),
        }
    }

    /// True iff the current token is the plain `=` assignment operator
    /// (not a compound assignment).
    pub(crate) fn is_assign_eq(&self) -> bool {
        self.check(TokenKind::Assign) && self.token().text() == Some("=")
    }

    /// A node span running from `start` to the end of the last consumed
    /// token.
    #[inline]
    pub(crate) fn finish_span(&self, start: usize) -> Span {
        Span::new(start, self.lexer.prev_end())
    }

    /// True iff parsing outside any function or event body.
    #[inline]
    pub(crate) fn outside_code(&self) -> bool {
        !self.in_function && !self.in_event
    }

    // =========================================
    // Error construction
    // =========================================

    pub(crate) fn error(
        &self,
        kind: ParseErrorKind,
        span: Span,
        message: impl Into<String>,
    ) -> ParseError {
        ParseError::new(kind, span, message)
    }

    /// An error anchored at the current token.
    pub(crate) fn error_here(
        &self,
        kind: ParseErrorKind,
        message: impl Into<String>,
    ) -> ParseError {
        ParseError::new(kind, self.token().span, message)
    }
}
