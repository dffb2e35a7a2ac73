//! Parser for the Papyrus scripting language.
//!
//! Papyrus is the scripting language of Bethesda's Creation Engine. This
//! crate turns the source text of a single script into a typed AST:
//! lexical analysis, recursive-descent parsing, and the language's local
//! semantic checks (property flag rules, container-sensitive constructs,
//! `Parent` usage). It performs no file I/O and no cross-script analysis.
//!
//! The grammar is context-sensitive in two ways this crate takes care of:
//! there is no statement terminator, so newline placement between tokens is
//! significant; and a leading type name can open a variable declaration, a
//! property, a typed function, or an expression, decided by lookahead.
//!
//! # Example
//!
//! ```
//! use papyrus_parser::{parse, ParseOptions, Stmt};
//!
//! let source = "ScriptName Door extends ObjectReference\n\
//!               Bool Property Locked = false Auto\n\
//!               Event OnActivate(ObjectReference akActionRef)\n\
//!               If !Locked\n\
//!               Open()\n\
//!               EndIf\n\
//!               EndEvent\n";
//!
//! let program = parse(source, &ParseOptions::default(), Some("Door.psc")).unwrap();
//! assert_eq!(program.body.len(), 3);
//! assert!(matches!(program.body[1], Stmt::Property(_)));
//! ```
//!
//! On malformed input the parser returns the first [`ParseError`], carrying
//! an error kind, byte offsets, and a message:
//!
//! ```
//! use papyrus_parser::{parse, ParseErrorKind, ParseOptions};
//!
//! let err = parse("Int Property P = 1", &ParseOptions::permissive(), None).unwrap_err();
//! assert_eq!(err.kind, ParseErrorKind::Property);
//! ```

pub mod ast;
pub mod lexer;

mod error;
mod options;
mod span;

pub use ast::{Expr, Parser, Program, Stmt};
pub use error::{ParseError, ParseErrorKind, Result};
pub use options::ParseOptions;
pub use span::Span;

/// Parse the source text of one Papyrus script.
///
/// `filename`, when supplied, is checked against the `ScriptName` statement
/// (unless disabled in `options`).
pub fn parse(content: &str, options: &ParseOptions, filename: Option<&str>) -> Result<Program> {
    Parser::parse(content, options, filename)
}
