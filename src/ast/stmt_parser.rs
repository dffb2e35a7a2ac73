//! Statement parsing.
//!
//! Papyrus has no statement terminator, and the same leading identifier can
//! open a variable declaration, a cast, a call, a typed function, or a
//! property. Statement dispatch therefore peeks at raw source after the
//! current token before committing to a grammar production.

use bitflags::bitflags;

use super::expr::Expr;
use super::parser::{Parser, ScriptInfo};
use super::stmt::*;
use crate::error::{ParseErrorKind, Result};
use crate::lexer::TokenKind;
use crate::span::Span;

bitflags! {
    /// Property flags seen so far, for combination checks.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct PropFlagSet: u8 {
        const AUTO = 1 << 0;
        const AUTO_READ_ONLY = 1 << 1;
        const CONDITIONAL = 1 << 2;
        const HIDDEN = 1 << 3;
    }
}

bitflags! {
    /// Function/event flags seen so far, for duplicate checks.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct FnFlagSet: u8 {
        const GLOBAL = 1 << 0;
        const NATIVE = 1 << 1;
    }
}

impl<'src> Parser<'src> {
    /// Parse one statement, dispatching on the current token.
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt> {
        if self.first_read {
            self.first_read = false;
            if self.options.scriptname_missing && !self.check(TokenKind::ScriptName) {
                return Err(self.error_here(
                    ParseErrorKind::ScriptName,
                    "expected 'ScriptName' as the first statement",
                ));
            }
        }

        match self.kind() {
            TokenKind::ScriptName => self.parse_script_name(),
            TokenKind::Function => {
                let start = self.token().span.start;
                Ok(Stmt::Function(self.parse_function(start, String::new())?))
            }
            // ElseIf lands here only on malformed input; parse_if reports it
            // against the surrounding context.
            TokenKind::If | TokenKind::ElseIf => Ok(Stmt::If(self.parse_if()?)),
            TokenKind::While => self.parse_while(),
            TokenKind::State => {
                let start = self.token().span.start;
                self.parse_state(start, None)
            }
            TokenKind::Auto => {
                if self.lexer.keyword_follows("state")? {
                    let start = self.token().span.start;
                    self.advance()?;
                    self.parse_state(start, Some(StateFlag::Auto))
                } else {
                    // A bare Auto falls through as a reserved-word name.
                    self.parse_name_statement()
                }
            }
            TokenKind::Return => self.parse_return(),
            TokenKind::Event => self.parse_event(),
            TokenKind::Import => self.parse_import(),
            kind if kind.is_type_name() => self.parse_name_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    /// Statement beginning with an identifier or type keyword.
    ///
    /// The defining ambiguity of the grammar: `Foo` can open an expression
    /// (`Foo = 1`, `Foo.Bar()`, `Foo(x)`), an array type (`Foo[] x`), a cast
    /// (`Foo As Int`), a typed function (`Foo Function F()`), a property
    /// (`Foo Property P Auto`), or a variable (`Foo x`). A raw-character peek
    /// past the current token settles the expression cases without consuming
    /// anything; one token of lookahead settles the rest.
    fn parse_name_statement(&mut self) -> Result<Stmt> {
        let head = self.token().clone();
        let start = head.span.start;
        let head_text = self.identifier_from(&head).name;
        let mut kind_str = head_text.clone();
        let mut is_array = false;

        match self.lexer.peek_byte_after_current()? {
            Some(b'=') | Some(b'+') | Some(b'-') | Some(b'*') | Some(b'/') | Some(b'%')
            | Some(b'.') | Some(b'(') => {
                return self.parse_expression_statement();
            }
            Some(b'[') => {
                if self.lexer.array_brackets_follow()? {
                    kind_str.push_str("[]");
                    is_array = true;
                    self.advance()?; // onto `[`
                    self.advance()?; // onto `]`
                } else {
                    // Subscript, e.g. `a[0] = 1`.
                    return self.parse_expression_statement();
                }
            }
            _ => {}
        }

        self.advance()?;
        match self.kind() {
            TokenKind::As | TokenKind::ParenL => {
                // A cast or a call reached past the lookahead (for calls,
                // only after an array marker): continue as an expression
                // rooted at the captured identifier.
                let object = Expr::Identifier(self.identifier_from(&head));
                let expression = self.parse_subscripts(object, start)?;
                Ok(Stmt::Expression(ExpressionStatement {
                    expression,
                    span: self.finish_span(start),
                }))
            }
            TokenKind::Function => Ok(Stmt::Function(self.parse_function(start, kind_str)?)),
            TokenKind::Property => self.parse_property(start, kind_str),
            TokenKind::Name => self.parse_variable_declaration(start, kind_str, is_array),
            _ => Err(self.error_here(
                ParseErrorKind::UnexpectedToken,
                format!("expected a declaration or expression after '{}'", head_text),
            )),
        }
    }

    /// `ScriptName <Name> [Extends <Name>] [Conditional|Hidden]*`
    fn parse_script_name(&mut self) -> Result<Stmt> {
        let start = self.token().span.start;
        if self.script_info.is_some() {
            return Err(self.error_here(
                ParseErrorKind::ScriptName,
                "a script may only declare one ScriptName",
            ));
        }

        self.advance()?;
        let id = self.expect_name()?;

        let extends = if self.check(TokenKind::Extends) {
            let ext_start = self.token().span.start;
            self.advance()?;
            if self.lexer.has_newline_before_current() {
                return Err(self.error_here(
                    ParseErrorKind::UnexpectedToken,
                    "the parent script name must follow 'Extends' on the same line",
                ));
            }
            let extended = self.expect_name()?;
            Some(ExtendsDeclaration {
                extended,
                span: self.finish_span(ext_start),
            })
        } else {
            None
        };

        let mut flags = Vec::new();
        loop {
            match self.kind() {
                TokenKind::Conditional => flags.push(ScriptFlag::Conditional),
                TokenKind::Hidden => flags.push(ScriptFlag::Hidden),
                _ => break,
            }
            self.advance()?;
        }

        if self.options.scriptname_mismatch {
            if let Some(filename) = self.filename {
                let stem = filename.rsplit_once('.').map_or(filename, |(stem, _)| stem);
                if !id.name.eq_ignore_ascii_case(stem) {
                    return Err(self.error(
                        ParseErrorKind::ScriptName,
                        id.span,
                        format!(
                            "script name '{}' does not match filename '{}'",
                            id.name, filename
                        ),
                    ));
                }
            }
        }

        self.script_info = Some(ScriptInfo {
            conditional: flags.contains(&ScriptFlag::Conditional),
            has_extends: extends.is_some(),
        });

        Ok(Stmt::ScriptName(ScriptNameStatement {
            id,
            extends,
            flags,
            span: self.finish_span(start),
        }))
    }

    /// `Import <Name>`
    fn parse_import(&mut self) -> Result<Stmt> {
        let start = self.token().span.start;
        self.advance()?;
        let id = self.expect_name()?;
        Ok(Stmt::Import(ImportStatement {
            id,
            span: self.finish_span(start),
        }))
    }

    /// `[<Type>] Function <Name>(<params>) [Global] [Native] ... EndFunction`
    ///
    /// Entered with the current token on `Function`; `kind` is the return
    /// type already consumed by statement dispatch, or `""`.
    pub(crate) fn parse_function(&mut self, start: usize, kind: String) -> Result<FunctionStatement> {
        self.advance()?;
        let id = self.expect_name()?;
        self.expect(TokenKind::ParenL)?;
        let params = self.parse_binding_list(TokenKind::ParenR)?;
        self.expect(TokenKind::ParenR)?;

        let (flags, native) = self.parse_function_flags(ParseErrorKind::FunctionFlag, true)?;

        let body = if native {
            // Native means no body, but a terminator written anyway is
            // consumed rather than leaking into the next statement.
            if self.check(TokenKind::EndFunction) {
                self.advance()?;
            }
            None
        } else {
            self.in_function = true;
            let block = self.parse_block(&[TokenKind::EndFunction], true);
            self.in_function = false;
            Some(block?)
        };

        Ok(FunctionStatement {
            id,
            kind,
            params,
            flags,
            body,
            span: self.finish_span(start),
        })
    }

    /// `Event <Name>(<params>) [Native] ... EndEvent`
    fn parse_event(&mut self) -> Result<Stmt> {
        let start = self.token().span.start;
        self.advance()?;
        let id = self.expect_name()?;
        self.expect(TokenKind::ParenL)?;
        let params = self.parse_binding_list(TokenKind::ParenR)?;
        self.expect(TokenKind::ParenR)?;

        let (flags, native) = self.parse_function_flags(ParseErrorKind::EventFlag, false)?;

        let body = if native {
            if self.check(TokenKind::EndEvent) {
                self.advance()?;
            }
            None
        } else {
            self.in_event = true;
            let block = self.parse_block(&[TokenKind::EndEvent], true);
            self.in_event = false;
            Some(block?)
        };

        Ok(Stmt::Event(EventStatement {
            id,
            params,
            flags,
            body,
            span: self.finish_span(start),
        }))
    }

    /// Flags after a function or event parameter list. Flags must sit on the
    /// same line as the closing `)`; repeats are rejected. Events do not
    /// admit `Global`.
    fn parse_function_flags(
        &mut self,
        err_kind: ParseErrorKind,
        allow_global: bool,
    ) -> Result<(Vec<FunctionFlag>, bool)> {
        let mut seen = FnFlagSet::empty();
        let mut flags = Vec::new();

        loop {
            let (flag, bit) = match self.kind() {
                TokenKind::Global => (FunctionFlag::Global, FnFlagSet::GLOBAL),
                TokenKind::Native => (FunctionFlag::Native, FnFlagSet::NATIVE),
                _ => break,
            };
            if self.lexer.has_newline_before_current() {
                return Err(self.error_here(
                    err_kind,
                    "flags must appear on the same line as the declaration",
                ));
            }
            if flag == FunctionFlag::Global && !allow_global {
                return Err(self.error_here(err_kind, "'Global' is not a valid event flag"));
            }
            if seen.contains(bit) {
                return Err(self.error_here(err_kind, format!("duplicate '{:?}' flag", flag)));
            }
            seen.insert(bit);
            flags.push(flag);
            self.advance()?;
        }

        Ok((flags, seen.contains(FnFlagSet::NATIVE)))
    }

    /// `[Auto] State <Name> ... EndState`
    ///
    /// `start` points at `Auto` when the state is the auto state.
    fn parse_state(&mut self, start: usize, flag: Option<StateFlag>) -> Result<Stmt> {
        if self.in_state {
            return Err(self.error_here(
                ParseErrorKind::StateStatement,
                "states cannot be nested",
            ));
        }

        self.advance()?;
        let id = self.expect_name()?;

        self.in_state = true;
        let body = self.parse_block(&[TokenKind::EndState], true);
        self.in_state = false;
        let body = body?;

        for child in &body.body {
            if !matches!(child, Stmt::Function(_) | Stmt::Event(_)) {
                return Err(self.error(
                    ParseErrorKind::StateStatement,
                    child.span(),
                    "states may only contain functions and events",
                ));
            }
        }

        Ok(Stmt::State(StateStatement {
            id,
            flag,
            body,
            span: self.finish_span(start),
        }))
    }

    /// `<Type> Property <Name> [= <Literal>] [flags...] [body EndProperty]`
    ///
    /// Entered with the current token on `Property`; `kind` is the type name
    /// consumed by statement dispatch.
    fn parse_property(&mut self, start: usize, kind: String) -> Result<Stmt> {
        if self.in_function || self.in_event {
            return Err(self.error_here(
                ParseErrorKind::Property,
                "properties cannot be declared inside a function or event",
            ));
        }

        self.advance()?;
        let id = self.expect_name()?;

        let init = if self.is_assign_eq() {
            self.advance()?;
            match self.parse_expression()? {
                Expr::Literal(lit) => Some(lit),
                other => {
                    return Err(self.error(
                        ParseErrorKind::Property,
                        other.span(),
                        "property initializer must be a constant literal",
                    ));
                }
            }
        } else {
            None
        };

        let mut seen = PropFlagSet::empty();
        let mut flags = Vec::new();
        loop {
            let (flag, bit) = match self.kind() {
                TokenKind::Hidden => (PropertyFlag::Hidden, PropFlagSet::HIDDEN),
                TokenKind::Auto => (PropertyFlag::Auto, PropFlagSet::AUTO),
                TokenKind::Conditional => (PropertyFlag::Conditional, PropFlagSet::CONDITIONAL),
                TokenKind::AutoReadOnly => {
                    (PropertyFlag::AutoReadOnly, PropFlagSet::AUTO_READ_ONLY)
                }
                _ => break,
            };
            seen.insert(bit);
            flags.push(flag);
            self.advance()?;
        }

        let decl_span = Span::new(start, self.lexer.prev_end());

        if self.script_info.as_ref().is_some_and(|s| s.conditional)
            && !seen.contains(PropFlagSet::CONDITIONAL)
        {
            return Err(self.error(
                ParseErrorKind::Property,
                decl_span,
                "properties of a Conditional script must be flagged Conditional",
            ));
        }
        if seen.contains(PropFlagSet::AUTO_READ_ONLY) && init.is_none() {
            return Err(self.error(
                ParseErrorKind::Property,
                decl_span,
                "an 'AutoReadOnly' property requires an initial value",
            ));
        }
        if seen.contains(PropFlagSet::CONDITIONAL)
            && !seen.intersects(PropFlagSet::AUTO | PropFlagSet::AUTO_READ_ONLY)
        {
            return Err(self.error(
                ParseErrorKind::Property,
                decl_span,
                "a 'Conditional' property must also be 'Auto' or 'AutoReadOnly'",
            ));
        }
        if seen.contains(PropFlagSet::CONDITIONAL) && init.is_none() {
            return Err(self.error(
                ParseErrorKind::Property,
                decl_span,
                "a 'Conditional' property requires an initial value",
            ));
        }
        if flags.is_empty() {
            return Err(self.error(
                ParseErrorKind::Property,
                decl_span,
                "Missing Hidden flag for Full Property",
            ));
        }

        // Hidden with no auto-backing flags means a full property body.
        let full = seen.contains(PropFlagSet::HIDDEN)
            && !seen.intersects(
                PropFlagSet::AUTO | PropFlagSet::AUTO_READ_ONLY | PropFlagSet::CONDITIONAL,
            );

        if !full {
            return Ok(Stmt::Property(PropertyDeclaration {
                id,
                kind,
                init,
                flags,
                span: self.finish_span(start),
            }));
        }

        // Check the terminator exists before committing to a body parse, so
        // a missing EndProperty doesn't swallow the rest of the script.
        if !self.lexer.rest_contains("endproperty") {
            return Err(self.error(
                ParseErrorKind::Property,
                decl_span,
                "missing 'EndProperty' terminator",
            ));
        }

        let block = self.parse_block(&[TokenKind::EndProperty], true)?;
        if block.body.is_empty() {
            return Err(self.error(
                ParseErrorKind::Property,
                block.span,
                "a full property must declare a getter or setter",
            ));
        }

        let mut getter: Option<FunctionStatement> = None;
        let mut setter: Option<FunctionStatement> = None;
        for child in block.body {
            let func = match child {
                Stmt::Function(func) => func,
                other => {
                    return Err(self.error(
                        ParseErrorKind::Property,
                        other.span(),
                        "expected a 'Get' or 'Set' function",
                    ));
                }
            };
            if func.id.name.eq_ignore_ascii_case("get") {
                if !func.params.is_empty() {
                    return Err(self.error(
                        ParseErrorKind::Property,
                        func.span,
                        "a property getter takes no parameters",
                    ));
                }
                if !func.kind.eq_ignore_ascii_case(&kind) {
                    return Err(self.error(
                        ParseErrorKind::Property,
                        func.span,
                        "a property getter must return the property type",
                    ));
                }
                if getter.is_some() {
                    return Err(self.error(
                        ParseErrorKind::Property,
                        func.span,
                        "duplicate property getter",
                    ));
                }
                getter = Some(func);
            } else if func.id.name.eq_ignore_ascii_case("set") {
                if func.params.len() != 1 {
                    return Err(self.error(
                        ParseErrorKind::Property,
                        func.span,
                        "a property setter takes exactly one parameter",
                    ));
                }
                if setter.is_some() {
                    return Err(self.error(
                        ParseErrorKind::Property,
                        func.span,
                        "duplicate property setter",
                    ));
                }
                setter = Some(func);
            } else {
                return Err(self.error(
                    ParseErrorKind::Property,
                    func.span,
                    "expected a 'Get' or 'Set' function",
                ));
            }
        }

        Ok(Stmt::PropertyFull(PropertyFullDeclaration {
            id,
            kind,
            init,
            flags,
            getter,
            setter,
            span: self.finish_span(start),
        }))
    }

    /// `If <expr> ... [ElseIf ...]* [Else ...] EndIf`
    fn parse_if(&mut self) -> Result<IfStatement> {
        if self.outside_code() && self.options.if_outside {
            return Err(self.error_here(
                ParseErrorKind::UnexpectedToken,
                "'If' outside of a function or event",
            ));
        }

        let start = self.token().span.start;
        self.advance()?;
        let test = self.parse_expression()?;

        let consequent =
            self.parse_block(&[TokenKind::EndIf, TokenKind::Else, TokenKind::ElseIf], false)?;

        let alternate = match self.kind() {
            TokenKind::ElseIf => Some(ElseBranch::If(Box::new(self.parse_if()?))),
            TokenKind::Else => {
                self.advance()?;
                Some(ElseBranch::Block(self.parse_block(&[TokenKind::EndIf], true)?))
            }
            _ => {
                // EndIf
                self.advance()?;
                None
            }
        };

        Ok(IfStatement {
            test,
            consequent,
            alternate,
            span: self.finish_span(start),
        })
    }

    /// `While <expr> ... EndWhile`
    fn parse_while(&mut self) -> Result<Stmt> {
        if self.outside_code() && self.options.while_outside {
            return Err(self.error_here(
                ParseErrorKind::UnexpectedToken,
                "'While' outside of a function or event",
            ));
        }

        let start = self.token().span.start;
        self.advance()?;
        let test = self.parse_expression()?;
        let consequent = self.parse_block(&[TokenKind::EndWhile], true)?;

        Ok(Stmt::While(WhileStatement {
            test,
            consequent,
            span: self.finish_span(start),
        }))
    }

    /// `Return [<expr>]` — the argument must start on the same line.
    fn parse_return(&mut self) -> Result<Stmt> {
        if self.outside_code() && self.options.return_outside {
            return Err(self.error_here(
                ParseErrorKind::UnexpectedToken,
                "'Return' outside of a function or event",
            ));
        }

        let start = self.token().span.start;
        self.advance()?;

        let argument = if self.lexer.has_newline_before_current() || self.check(TokenKind::Eof) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        Ok(Stmt::Return(ReturnStatement {
            argument,
            span: self.finish_span(start),
        }))
    }

    /// `<Type> <Name> [= <expr>]` — the type and any `[]` marker were
    /// consumed by statement dispatch.
    fn parse_variable_declaration(
        &mut self,
        start: usize,
        kind: String,
        is_array: bool,
    ) -> Result<Stmt> {
        let id = self.expect_name()?;

        let init = if self.is_assign_eq() {
            self.advance()?;
            Some(self.parse_expression()?)
        } else {
            None
        };

        Ok(Stmt::Variable(VariableDeclaration {
            variable: Variable {
                id,
                kind,
                is_array,
                init,
            },
            span: self.finish_span(start),
        }))
    }

    /// An expression in statement position.
    pub(crate) fn parse_expression_statement(&mut self) -> Result<Stmt> {
        let start = self.token().span.start;
        let expression = self.parse_expression()?;
        Ok(Stmt::Expression(ExpressionStatement {
            expression,
            span: self.finish_span(start),
        }))
    }

    /// Parameter list: `<Type> [[]] <Name> [= <expr>]`, comma-separated,
    /// up to (not consuming) the closing token.
    pub(crate) fn parse_binding_list(
        &mut self,
        close: TokenKind,
    ) -> Result<Vec<VariableDeclaration>> {
        let mut params = Vec::new();

        while !self.check(close) {
            if self.check(TokenKind::Eof) {
                return Err(self.error_here(
                    ParseErrorKind::UnexpectedToken,
                    "unexpected end of file in parameter list",
                ));
            }

            let start = self.token().span.start;
            let type_ident = self.expect_type_name()?;
            let mut kind = type_ident.name;
            let mut is_array = false;

            if self.check(TokenKind::BracketL) {
                self.advance()?;
                self.expect(TokenKind::BracketR)?;
                kind.push_str("[]");
                is_array = true;
            }

            let id = self.expect_name()?;
            let init = if self.is_assign_eq() {
                self.advance()?;
                Some(self.parse_expression()?)
            } else {
                None
            };

            params.push(VariableDeclaration {
                variable: Variable {
                    id,
                    kind,
                    is_array,
                    init,
                },
                span: self.finish_span(start),
            });

            if self.check(TokenKind::Comma) {
                self.advance()?;
            } else {
                break;
            }
        }

        Ok(params)
    }

    /// Statements until one of `closers`; EOF first is a `BlockStatement`
    /// error naming the expected terminators. The block's span excludes the
    /// closing token; `consume_close` then optionally consumes it.
    pub(crate) fn parse_block(
        &mut self,
        closers: &[TokenKind],
        consume_close: bool,
    ) -> Result<BlockStatement> {
        let start = self.lexer.prev_end();
        let mut body = Vec::new();

        while !closers.contains(&self.kind()) {
            if self.check(TokenKind::Eof) {
                let expected = closers
                    .iter()
                    .map(|kind| kind.description())
                    .collect::<Vec<_>>()
                    .join(" or ");
                return Err(self.error_here(
                    ParseErrorKind::BlockStatement,
                    format!("reached end of file, expected {}", expected),
                ));
            }
            body.push(self.parse_statement()?);
        }

        let span = Span::new(start, self.lexer.prev_end());
        if consume_close {
            self.advance()?;
        }

        Ok(BlockStatement { body, span })
    }
}
