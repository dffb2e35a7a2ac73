//! Abstract Syntax Tree (AST) for Papyrus.
//!
//! This module provides:
//! - AST node definitions for all Papyrus constructs
//! - The recursive-descent parser producing them
//!
//! # Example
//!
//! ```
//! use papyrus_parser::{ParseOptions, Parser};
//!
//! let source = "ScriptName Counter\n\
//!               Int count = 0\n\
//!               Function Bump()\n\
//!               count += 1\n\
//!               EndFunction\n";
//!
//! let program = Parser::parse(source, &ParseOptions::default(), None).unwrap();
//! assert_eq!(program.body.len(), 3);
//! ```

pub mod expr;
pub mod stmt;

mod expr_parser;
mod parser;
mod stmt_parser;

use serde::Serialize;

use crate::span::Span;

pub use expr::*;
pub use parser::Parser;
pub use stmt::*;

/// A parsed Papyrus script: the root of the AST, owning every node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    /// Top-level statements in source order.
    pub body: Vec<Stmt>,
    #[serde(flatten)]
    pub span: Span,
}

impl Program {
    /// The script's `ScriptName` statement, when one was declared.
    pub fn script_name(&self) -> Option<&ScriptNameStatement> {
        self.body.iter().find_map(|stmt| match stmt {
            Stmt::ScriptName(script) => Some(script),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;
    use crate::options::ParseOptions;

    fn parse(source: &str) -> crate::error::Result<Program> {
        Parser::parse(source, &ParseOptions::default(), None)
    }

    fn parse_permissive(source: &str) -> crate::error::Result<Program> {
        Parser::parse(source, &ParseOptions::permissive(), None)
    }

    #[test]
    fn parse_script_header() {
        let program = parse("ScriptName Foo").unwrap();
        assert_eq!(program.body.len(), 1);
        let script = program.script_name().expect("script name");
        assert_eq!(script.id.name, "Foo");
        assert!(script.extends.is_none());
        assert!(script.flags.is_empty());
    }

    #[test]
    fn parse_variable_declaration() {
        let program = parse("ScriptName T\nInt x = 1").unwrap();
        match &program.body[1] {
            Stmt::Variable(decl) => {
                assert_eq!(decl.variable.id.name, "x");
                assert_eq!(decl.variable.kind, "Int");
                assert!(!decl.variable.is_array);
                assert!(decl.variable.init.is_some());
            }
            other => panic!("expected variable declaration, got {:?}", other),
        }
    }

    #[test]
    fn parse_array_variable_declaration() {
        let program = parse("ScriptName T\nInt[] xs").unwrap();
        match &program.body[1] {
            Stmt::Variable(decl) => {
                assert_eq!(decl.variable.kind, "Int[]");
                assert!(decl.variable.is_array);
                assert!(decl.variable.init.is_none());
            }
            other => panic!("expected variable declaration, got {:?}", other),
        }
    }

    #[test]
    fn parse_custom_type_declaration() {
        let program = parse("ScriptName T\nActor target").unwrap();
        match &program.body[1] {
            Stmt::Variable(decl) => {
                assert_eq!(decl.variable.kind, "Actor");
                assert_eq!(decl.variable.id.name, "target");
            }
            other => panic!("expected variable declaration, got {:?}", other),
        }
    }

    #[test]
    fn parse_import() {
        let program = parse("ScriptName T\nImport Utility").unwrap();
        match &program.body[1] {
            Stmt::Import(import) => assert_eq!(import.id.name, "Utility"),
            other => panic!("expected import, got {:?}", other),
        }
    }

    #[test]
    fn parse_assignment_statement() {
        let program = parse("ScriptName T\nFunction F()\nx = 1\nEndFunction").unwrap();
        let Stmt::Function(func) = &program.body[1] else {
            panic!("expected function");
        };
        let body = func.body.as_ref().expect("body");
        match &body.body[0] {
            Stmt::Expression(stmt) => match &stmt.expression {
                Expr::Assign(assign) => assert_eq!(assign.operator, "="),
                other => panic!("expected assignment, got {:?}", other),
            },
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn parse_cast_statement() {
        let program = parse("ScriptName T\nFunction F()\nx As Int\nEndFunction").unwrap();
        let Stmt::Function(func) = &program.body[1] else {
            panic!("expected function");
        };
        let body = func.body.as_ref().expect("body");
        match &body.body[0] {
            Stmt::Expression(stmt) => match &stmt.expression {
                Expr::Cast(cast) => {
                    assert_eq!(cast.kind.name, "Int");
                    assert!(matches!(*cast.id, Expr::Identifier(_)));
                }
                other => panic!("expected cast, got {:?}", other),
            },
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn missing_scriptname_is_error_by_default() {
        let err = parse("Int x = 1").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ScriptName);

        // The permissive profile accepts the fragment.
        let program = parse_permissive("Int x = 1").unwrap();
        assert_eq!(program.body.len(), 1);
    }

    #[test]
    fn duplicate_scriptname_is_error() {
        let err = parse("ScriptName A\nScriptName B").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ScriptName);
    }

    #[test]
    fn filename_match_is_case_insensitive() {
        let options = ParseOptions::default();
        assert!(Parser::parse("ScriptName Foo", &options, Some("foo.psc")).is_ok());
        assert!(Parser::parse("ScriptName Foo", &options, Some("FOO")).is_ok());

        let err = Parser::parse("ScriptName Foo", &options, Some("Bar.psc")).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ScriptName);
    }

    #[test]
    fn extends_must_stay_on_one_line() {
        let err = parse("ScriptName Foo Extends\nBar").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
    }

    #[test]
    fn program_span_covers_source() {
        let source = "ScriptName Foo";
        let program = parse(source).unwrap();
        assert_eq!(program.span.start, 0);
        assert_eq!(program.span.end, source.len());
    }
}
