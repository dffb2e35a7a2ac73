//! Expression AST nodes.
//!
//! Every node carries a [`Span`] with byte offsets into the original source.
//! The serialized representation is internally tagged: each expression
//! serializes as an object with a `type` field naming its kind plus `start`
//! and `end` from the flattened span.

use serde::Serialize;

use crate::span::Span;

/// An expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Expr {
    /// `left op= right`
    #[serde(rename = "AssignExpression")]
    Assign(AssignExpression),
    /// Arithmetic/comparison operation.
    #[serde(rename = "BinaryExpression")]
    Binary(BinaryExpression),
    /// `&&` / `||` operation.
    #[serde(rename = "LogicalExpression")]
    Logical(LogicalExpression),
    /// Prefix `-`, `!`, or `~`.
    #[serde(rename = "UnaryExpression")]
    Unary(UnaryExpression),
    /// `callee(args...)`
    #[serde(rename = "CallExpression")]
    Call(CallExpression),
    /// `object.property` or `object[property]`
    #[serde(rename = "MemberExpression")]
    Member(MemberExpression),
    /// `expr As Type`
    #[serde(rename = "CastExpression")]
    Cast(CastExpression),
    /// `New Type[size]`
    #[serde(rename = "NewExpression")]
    New(NewExpression),
    /// A literal value.
    #[serde(rename = "Literal")]
    Literal(Literal),
    /// An identifier reference.
    #[serde(rename = "Identifier")]
    Identifier(Identifier),
    /// The `Self` keyword.
    #[serde(rename = "Self")]
    SelfRef(SelfExpression),
    /// The `Parent` keyword.
    #[serde(rename = "Parent")]
    Parent(ParentExpression),
}

impl Expr {
    /// The source span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Self::Assign(e) => e.span,
            Self::Binary(e) => e.span,
            Self::Logical(e) => e.span,
            Self::Unary(e) => e.span,
            Self::Call(e) => e.span,
            Self::Member(e) => e.span,
            Self::Cast(e) => e.span,
            Self::New(e) => e.span,
            Self::Literal(e) => e.span,
            Self::Identifier(e) => e.span,
            Self::SelfRef(e) => e.span,
            Self::Parent(e) => e.span,
        }
    }
}

/// An assignment: `left = right`, `left += right`, ...
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignExpression {
    pub left: Box<Expr>,
    /// The operator spelling: one of `=` `+=` `-=` `*=` `/=` `%=`.
    pub operator: String,
    pub right: Box<Expr>,
    #[serde(flatten)]
    pub span: Span,
}

/// An arithmetic or comparison operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryExpression {
    pub left: Box<Expr>,
    /// The operator spelling, e.g. `+` or `==`.
    pub operator: String,
    pub right: Box<Expr>,
    #[serde(flatten)]
    pub span: Span,
}

/// A short-circuiting `&&` or `||` operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogicalExpression {
    pub left: Box<Expr>,
    /// `&&` or `||`.
    pub operator: String,
    pub right: Box<Expr>,
    #[serde(flatten)]
    pub span: Span,
}

/// A unary prefix operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnaryExpression {
    /// `-`, `!`, or `~`.
    pub operator: String,
    pub argument: Box<Expr>,
    #[serde(rename = "isPrefix")]
    pub is_prefix: bool,
    #[serde(flatten)]
    pub span: Span,
}

/// A call: `callee(arguments...)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallExpression {
    pub callee: Box<Expr>,
    pub arguments: Vec<Expr>,
    #[serde(flatten)]
    pub span: Span,
}

/// Member access: `object.property` (computed = false) or
/// `object[property]` (computed = true).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberExpression {
    pub object: Box<Expr>,
    pub property: Box<Expr>,
    pub computed: bool,
    #[serde(flatten)]
    pub span: Span,
}

/// A cast: `id As kind`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CastExpression {
    /// The expression being cast.
    pub id: Box<Expr>,
    /// The target type name.
    pub kind: Identifier,
    #[serde(flatten)]
    pub span: Span,
}

/// An array allocation: `New Int[10]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewExpression {
    /// The element type.
    pub meta: Identifier,
    /// The bracketed size, as the member expression `Type[size]`. Its
    /// `property` is always a [`Literal`].
    pub argument: Box<MemberExpression>,
    #[serde(flatten)]
    pub span: Span,
}

/// A literal value with its original source text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Literal {
    pub value: LiteralValue,
    /// The exact source slice, e.g. `0x1F` or `"hi\n"`.
    pub raw: String,
    #[serde(flatten)]
    pub span: Span,
}

/// The value of a [`Literal`]. Serializes untagged: `true`, `null`, `3`,
/// `1.5`, or `"text"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// The `None` keyword.
    None,
}

/// An identifier, with the case it was written in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identifier {
    pub name: String,
    #[serde(flatten)]
    pub span: Span,
}

/// The `Self` keyword as an expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelfExpression {
    #[serde(flatten)]
    pub span: Span,
}

/// The `Parent` keyword as an expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParentExpression {
    #[serde(flatten)]
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expr_span_accessor() {
        let expr = Expr::Identifier(Identifier {
            name: "a".into(),
            span: Span::new(3, 4),
        });
        assert_eq!(expr.span(), Span::new(3, 4));

        let expr = Expr::Literal(Literal {
            value: LiteralValue::Int(1),
            raw: "1".into(),
            span: Span::new(0, 1),
        });
        assert_eq!(expr.span(), Span::new(0, 1));
    }

    #[test]
    fn literal_value_serializes_untagged() {
        assert_eq!(
            serde_json::to_value(LiteralValue::Bool(true)).unwrap(),
            serde_json::json!(true)
        );
        assert_eq!(
            serde_json::to_value(LiteralValue::Int(7)).unwrap(),
            serde_json::json!(7)
        );
        assert_eq!(
            serde_json::to_value(LiteralValue::None).unwrap(),
            serde_json::Value::Null
        );
    }

    #[test]
    fn expr_serializes_with_type_tag() {
        let expr = Expr::Identifier(Identifier {
            name: "Foo".into(),
            span: Span::new(0, 3),
        });
        let value = serde_json::to_value(&expr).unwrap();
        assert_eq!(value["type"], "Identifier");
        assert_eq!(value["name"], "Foo");
        assert_eq!(value["start"], 0);
        assert_eq!(value["end"], 3);
    }
}
