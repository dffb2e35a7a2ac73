//! Statement and declaration AST nodes.

use serde::Serialize;

use super::expr::{Expr, Identifier, Literal};
use crate::span::Span;

/// A statement or declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Stmt {
    /// `ScriptName Foo [Extends Bar] [flags...]`
    #[serde(rename = "ScriptNameStatement")]
    ScriptName(ScriptNameStatement),
    /// `Import Foo`
    #[serde(rename = "ImportStatement")]
    Import(ImportStatement),
    /// An auto/auto-read-only property declaration.
    #[serde(rename = "PropertyDeclaration")]
    Property(PropertyDeclaration),
    /// A full property with an explicit getter/setter body.
    #[serde(rename = "PropertyFullDeclaration")]
    PropertyFull(PropertyFullDeclaration),
    /// A function declaration.
    #[serde(rename = "FunctionStatement")]
    Function(FunctionStatement),
    /// An event declaration.
    #[serde(rename = "EventStatement")]
    Event(EventStatement),
    /// A state declaration.
    #[serde(rename = "StateStatement")]
    State(StateStatement),
    /// `If ... [ElseIf ...] [Else ...] EndIf`
    #[serde(rename = "IfStatement")]
    If(IfStatement),
    /// `While ... EndWhile`
    #[serde(rename = "WhileStatement")]
    While(WhileStatement),
    /// `Return [expr]`
    #[serde(rename = "ReturnStatement")]
    Return(ReturnStatement),
    /// `Type name [= init]`
    #[serde(rename = "VariableDeclaration")]
    Variable(VariableDeclaration),
    /// An expression in statement position.
    #[serde(rename = "ExpressionStatement")]
    Expression(ExpressionStatement),
}

impl Stmt {
    /// The source span of this statement.
    pub fn span(&self) -> Span {
        match self {
            Self::ScriptName(s) => s.span,
            Self::Import(s) => s.span,
            Self::Property(s) => s.span,
            Self::PropertyFull(s) => s.span,
            Self::Function(s) => s.span,
            Self::Event(s) => s.span,
            Self::State(s) => s.span,
            Self::If(s) => s.span,
            Self::While(s) => s.span,
            Self::Return(s) => s.span,
            Self::Variable(s) => s.span,
            Self::Expression(s) => s.span,
        }
    }
}

/// The `ScriptName` header naming the script.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptNameStatement {
    pub id: Identifier,
    pub extends: Option<ExtendsDeclaration>,
    pub flags: Vec<ScriptFlag>,
    #[serde(flatten)]
    pub span: Span,
}

impl ScriptNameStatement {
    /// Whether the script carries the `Conditional` flag.
    pub fn is_conditional(&self) -> bool {
        self.flags.contains(&ScriptFlag::Conditional)
    }
}

/// The `Extends Parent` clause of a `ScriptName` statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtendsDeclaration {
    pub extended: Identifier,
    #[serde(flatten)]
    pub span: Span,
}

/// `Import Foo`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportStatement {
    pub id: Identifier,
    #[serde(flatten)]
    pub span: Span,
}

/// Flags allowed on a `ScriptName` statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScriptFlag {
    Conditional,
    Hidden,
}

/// Flags allowed on a property declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PropertyFlag {
    Auto,
    AutoReadOnly,
    Conditional,
    Hidden,
}

/// Flags allowed on functions and events. Events admit only `Native`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FunctionFlag {
    Global,
    Native,
}

/// The `Auto` marker on a state declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StateFlag {
    Auto,
}

/// An auto or auto-read-only property: `Int Property P = 1 Auto`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyDeclaration {
    pub id: Identifier,
    /// The property's type name, possibly suffixed `[]`.
    pub kind: String,
    /// The constant initializer, when present.
    pub init: Option<Literal>,
    pub flags: Vec<PropertyFlag>,
    #[serde(flatten)]
    pub span: Span,
}

/// A full property with an explicit `EndProperty` body holding the
/// getter and/or setter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyFullDeclaration {
    pub id: Identifier,
    /// The property's type name, possibly suffixed `[]`.
    pub kind: String,
    pub init: Option<Literal>,
    pub flags: Vec<PropertyFlag>,
    /// The `Get` function: no parameters, returns the property type.
    pub getter: Option<FunctionStatement>,
    /// The `Set` function: exactly one parameter.
    pub setter: Option<FunctionStatement>,
    #[serde(flatten)]
    pub span: Span,
}

/// A function declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionStatement {
    pub id: Identifier,
    /// The return type name, or `""` for none.
    pub kind: String,
    pub params: Vec<VariableDeclaration>,
    pub flags: Vec<FunctionFlag>,
    /// Absent for `Native` functions.
    pub body: Option<BlockStatement>,
    #[serde(flatten)]
    pub span: Span,
}

/// An event declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventStatement {
    pub id: Identifier,
    pub params: Vec<VariableDeclaration>,
    /// At most `[Native]`.
    pub flags: Vec<FunctionFlag>,
    /// Absent for `Native` events.
    pub body: Option<BlockStatement>,
    #[serde(flatten)]
    pub span: Span,
}

/// A state declaration. The body holds only functions and events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateStatement {
    pub id: Identifier,
    /// `Some(Auto)` for the script's starting state.
    pub flag: Option<StateFlag>,
    pub body: BlockStatement,
    #[serde(flatten)]
    pub span: Span,
}

/// An ordered sequence of statements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockStatement {
    pub body: Vec<Stmt>,
    #[serde(flatten)]
    pub span: Span,
}

/// `If test ... [alternate] EndIf`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IfStatement {
    pub test: Expr,
    pub consequent: BlockStatement,
    /// An `Else` block, or a chained `ElseIf` statement.
    pub alternate: Option<ElseBranch>,
    #[serde(flatten)]
    pub span: Span,
}

/// The alternate of an [`IfStatement`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ElseBranch {
    #[serde(rename = "BlockStatement")]
    Block(BlockStatement),
    #[serde(rename = "IfStatement")]
    If(Box<IfStatement>),
}

/// `While test ... EndWhile`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhileStatement {
    pub test: Expr,
    pub consequent: BlockStatement,
    #[serde(flatten)]
    pub span: Span,
}

/// `Return [argument]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnStatement {
    pub argument: Option<Expr>,
    #[serde(flatten)]
    pub span: Span,
}

/// A variable declaration statement, or one parameter of a binding list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableDeclaration {
    pub variable: Variable,
    #[serde(flatten)]
    pub span: Span,
}

/// The declared variable inside a [`VariableDeclaration`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variable {
    pub id: Identifier,
    /// The declared type name, possibly suffixed `[]`.
    pub kind: String,
    #[serde(rename = "isArray")]
    pub is_array: bool,
    pub init: Option<Expr>,
}

/// An expression in statement position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpressionStatement {
    pub expression: Expr,
    #[serde(flatten)]
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str, start: usize) -> Identifier {
        Identifier {
            name: name.into(),
            span: Span::new(start, start + name.len()),
        }
    }

    #[test]
    fn stmt_span_accessor() {
        let stmt = Stmt::Import(ImportStatement {
            id: ident("Debug", 7),
            span: Span::new(0, 12),
        });
        assert_eq!(stmt.span(), Span::new(0, 12));
    }

    #[test]
    fn script_name_conditional_lookup() {
        let script = ScriptNameStatement {
            id: ident("Foo", 11),
            extends: None,
            flags: vec![ScriptFlag::Hidden, ScriptFlag::Conditional],
            span: Span::new(0, 33),
        };
        assert!(script.is_conditional());

        let script = ScriptNameStatement {
            flags: vec![ScriptFlag::Hidden],
            ..script
        };
        assert!(!script.is_conditional());
    }

    #[test]
    fn stmt_serializes_with_type_tag() {
        let stmt = Stmt::Import(ImportStatement {
            id: ident("Debug", 7),
            span: Span::new(0, 12),
        });
        let value = serde_json::to_value(&stmt).unwrap();
        assert_eq!(value["type"], "ImportStatement");
        assert_eq!(value["start"], 0);
        assert_eq!(value["end"], 12);
        assert_eq!(value["id"]["name"], "Debug");
    }

    #[test]
    fn flags_serialize_as_strings() {
        assert_eq!(
            serde_json::to_value(PropertyFlag::AutoReadOnly).unwrap(),
            serde_json::json!("AutoReadOnly")
        );
        assert_eq!(
            serde_json::to_value(FunctionFlag::Global).unwrap(),
            serde_json::json!("Global")
        );
    }
}
