//! Expression parsing.
//!
//! Precedence climbing from assignment (lowest, right-associative) through
//! the binary operator groups to unary prefixes and subscripts. Binary nodes
//! are tagged `Logical` for `&&`/`||` and `Binary` otherwise.

use super::expr::*;
use super::parser::Parser;
use crate::error::{ParseErrorKind, Result};
use crate::lexer::{TokenKind, TokenValue};
use crate::span::Span;

/// Precedence for the binary operator groups, low to high. `None` for
/// anything that cannot continue a binary expression.
fn binary_precedence(kind: TokenKind) -> Option<u8> {
    use TokenKind::*;
    Some(match kind {
        LogicalOr => 1,
        LogicalAnd => 2,
        Equality => 3,
        Relational => 4,
        PlusMinus => 5,
        Star | Slash | Modulo | StarStar | Binary => 6,
        _ => return Option::None,
    })
}

impl<'src> Parser<'src> {
    /// Parse a full expression (assignment and below).
    pub(crate) fn parse_expression(&mut self) -> Result<Expr> {
        self.parse_maybe_assign()
    }

    /// Assignment is right-associative: `a = b = c` parses as `a = (b = c)`.
    fn parse_maybe_assign(&mut self) -> Result<Expr> {
        let start = self.token().span.start;
        let left = self.parse_expr_ops(0)?;

        if self.check(TokenKind::Assign) {
            let operator = self.op_text();
            self.advance()?;
            let right = self.parse_maybe_assign()?;
            return Ok(Expr::Assign(AssignExpression {
                left: Box::new(left),
                operator,
                right: Box::new(right),
                span: self.finish_span(start),
            }));
        }

        Ok(left)
    }

    /// Left-associative binary/logical operators by precedence climbing.
    fn parse_expr_ops(&mut self, min_prec: u8) -> Result<Expr> {
        let start = self.token().span.start;
        let mut left = self.parse_maybe_unary()?;

        while let Some(prec) = binary_precedence(self.kind()) {
            if prec < min_prec {
                break;
            }
            if self.outside_code() && self.options.binary_outside {
                return Err(self.error_here(
                    ParseErrorKind::UnexpectedToken,
                    "binary expression outside of a function or event",
                ));
            }

            let logical = matches!(self.kind(), TokenKind::LogicalAnd | TokenKind::LogicalOr);
            let operator = self.op_text();
            self.advance()?;
            let right = self.parse_expr_ops(prec + 1)?;
            let span = self.finish_span(start);

            left = if logical {
                Expr::Logical(LogicalExpression {
                    left: Box::new(left),
                    operator,
                    right: Box::new(right),
                    span,
                })
            } else {
                Expr::Binary(BinaryExpression {
                    left: Box::new(left),
                    operator,
                    right: Box::new(right),
                    span,
                })
            };
        }

        Ok(left)
    }

    /// Right-associative unary prefixes `-`, `!`, `~`.
    fn parse_maybe_unary(&mut self) -> Result<Expr> {
        let is_unary = match self.kind() {
            TokenKind::PlusMinus => self.token().text() == Some("-"),
            TokenKind::Prefix => true,
            _ => false,
        };

        if is_unary {
            let start = self.token().span.start;
            let operator = self.op_text();
            self.advance()?;
            let argument = self.parse_maybe_unary()?;
            return Ok(Expr::Unary(UnaryExpression {
                operator,
                argument: Box::new(argument),
                is_prefix: true,
                span: self.finish_span(start),
            }));
        }

        let start = self.token().span.start;
        let atom = self.parse_atom()?;
        self.parse_subscripts(atom, start)
    }

    /// Postfix chain: indexing, member access, calls, and casts.
    pub(crate) fn parse_subscripts(&mut self, mut base: Expr, start: usize) -> Result<Expr> {
        loop {
            match self.kind() {
                TokenKind::BracketL => {
                    self.advance()?;
                    let property = self.parse_expression()?;
                    self.expect(TokenKind::BracketR)?;
                    base = Expr::Member(MemberExpression {
                        object: Box::new(base),
                        property: Box::new(property),
                        computed: true,
                        span: self.finish_span(start),
                    });
                }
                TokenKind::Dot => {
                    if let Expr::Member(member) = &base {
                        if matches!(*member.object, Expr::Parent(_)) {
                            return Err(self.error_here(
                                ParseErrorKind::ParentMember,
                                "cannot chain a member access through 'Parent'",
                            ));
                        }
                    }
                    self.advance()?;
                    let name = self.expect_name()?;
                    base = Expr::Member(MemberExpression {
                        object: Box::new(base),
                        property: Box::new(Expr::Identifier(name)),
                        computed: false,
                        span: self.finish_span(start),
                    });
                }
                TokenKind::ParenL => {
                    if matches!(base, Expr::Parent(_)) {
                        return Err(self.error(
                            ParseErrorKind::ParentMember,
                            base.span(),
                            "'Parent' cannot be called",
                        ));
                    }
                    if self.outside_code() && self.options.call_outside {
                        return Err(self.error_here(
                            ParseErrorKind::UnexpectedToken,
                            "call expression outside of a function or event",
                        ));
                    }
                    self.advance()?;
                    let mut arguments = Vec::new();
                    if !self.check(TokenKind::ParenR) {
                        loop {
                            arguments.push(self.parse_expression()?);
                            if self.check(TokenKind::Comma) {
                                self.advance()?;
                            } else {
                                break;
                            }
                        }
                    }
                    self.expect(TokenKind::ParenR)?;
                    base = Expr::Call(CallExpression {
                        callee: Box::new(base),
                        arguments,
                        span: self.finish_span(start),
                    });
                }
                TokenKind::As => {
                    if self.outside_code() && self.options.cast_outside {
                        return Err(self.error_here(
                            ParseErrorKind::UnexpectedToken,
                            "cast expression outside of a function or event",
                        ));
                    }
                    self.advance()?;
                    let kind = self.expect_type_name()?;
                    base = Expr::Cast(CastExpression {
                        id: Box::new(base),
                        kind,
                        span: self.finish_span(start),
                    });
                }
                _ => break,
            }
        }

        Ok(base)
    }

    /// Atoms: literals, identifiers, `Self`/`Parent`, parenthesized
    /// expressions, and `New`.
    fn parse_atom(&mut self) -> Result<Expr> {
        let token = self.token().clone();
        let span = token.span;

        match token.kind {
            TokenKind::SelfKw => {
                self.advance()?;
                Ok(Expr::SelfRef(SelfExpression { span }))
            }
            TokenKind::Parent => {
                if !self.script_info.as_ref().is_some_and(|s| s.has_extends) {
                    return Err(self.error(
                        ParseErrorKind::ParentMember,
                        span,
                        "'Parent' requires the script to extend another script",
                    ));
                }
                self.advance()?;
                Ok(Expr::Parent(ParentExpression { span }))
            }
            TokenKind::Name => {
                let ident = self.identifier_from(&token);
                self.advance()?;
                Ok(Expr::Identifier(ident))
            }
            TokenKind::Num => {
                let value = match token.value {
                    Some(TokenValue::Int(n)) => LiteralValue::Int(n),
                    Some(TokenValue::Float(f)) => LiteralValue::Float(f),
                    _ => unreachable!("Num token always carries a numeric value"),
                };
                self.advance()?;
                Ok(Expr::Literal(self.literal(value, span)))
            }
            TokenKind::String | TokenKind::Char => {
                let text = token.text().unwrap_or_default().to_string();
                self.advance()?;
                Ok(Expr::Literal(self.literal(LiteralValue::String(text), span)))
            }
            TokenKind::True => {
                self.advance()?;
                Ok(Expr::Literal(self.literal(LiteralValue::Bool(true), span)))
            }
            TokenKind::False => {
                self.advance()?;
                Ok(Expr::Literal(self.literal(LiteralValue::Bool(false), span)))
            }
            TokenKind::None => {
                self.advance()?;
                Ok(Expr::Literal(self.literal(LiteralValue::None, span)))
            }
            TokenKind::ParenL => {
                self.advance()?;
                let expr = self.parse_expression()?;
                self.expect(TokenKind::ParenR)?;
                Ok(expr)
            }
            TokenKind::New => self.parse_new(span),
            kind => Err(self.error(
                ParseErrorKind::UnexpectedToken,
                span,
                format!("unexpected {}", kind.description()),
            )),
        }
    }

    /// `New <Type>[<size>]` — the argument must come out of the subscript
    /// parser as a member expression whose property is a literal.
    fn parse_new(&mut self, span: Span) -> Result<Expr> {
        if self.outside_code() && self.options.new_outside {
            return Err(self.error(
                ParseErrorKind::UnexpectedToken,
                span,
                "'New' outside of a function or event",
            ));
        }

        let start = span.start;
        self.advance()?;
        let meta = self.expect_type_name()?;

        let element = Expr::Identifier(meta.clone());
        let argument = self.parse_subscripts(element, meta.span.start)?;
        let member = match argument {
            Expr::Member(member) if matches!(*member.property, Expr::Literal(_)) => member,
            other => {
                return Err(self.error(
                    ParseErrorKind::UnexpectedToken,
                    other.span(),
                    "expected a bracketed array size after 'New'",
                ));
            }
        };

        Ok(Expr::New(NewExpression {
            meta,
            argument: Box::new(member),
            span: self.finish_span(start),
        }))
    }

    /// Build a literal node, capturing the raw source slice.
    fn literal(&self, value: LiteralValue, span: Span) -> Literal {
        Literal {
            value,
            raw: span.slice(self.lexer.source()).to_string(),
            span,
        }
    }
}
