//! AST types for parsed templates.
//!
//! A template parses into an ordered list of [`Node`]s. Literal text is
//! emitted verbatim; the two block forms carry an expression tree.

use std::fmt;

/// One node of a parsed template, in source order.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Raw text between blocks, emitted as-is.
    Literal(String),
    /// `{% set name = expr %}`: binds a value for subsequent nodes.
    Set { name: String, expr: Expr },
    /// `{{ expr }}`: evaluates and emits the expression.
    Output(Expr),
}

/// An expression inside a template block.
///
/// Grammar: `expr := primary ("." identifier | "(" args ")")*`
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// String literal, single- or double-quoted.
    Str(String),
    /// Numeric literal.
    Num(f64),
    /// Boolean literal (`true` / `false`).
    Bool(bool),
    /// Variable, builtin, or macro name.
    Ident(String),
    /// Attribute access: `base.attr`.
    Attr { base: Box<Expr>, attr: String },
    /// Function call: `callee(args...)`.
    Call { callee: Box<Expr>, args: Vec<Expr> },
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Str(s) => write!(f, "'{}'", s),
            Expr::Num(n) => write!(f, "{}", crate::value::format_number(*n)),
            Expr::Bool(b) => write!(f, "{}", b),
            Expr::Ident(name) => write!(f, "{}", name),
            Expr::Attr { base, attr } => write!(f, "{}.{}", base, attr),
            Expr::Call { callee, args } => {
                write!(f, "{}(", callee)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Literal(text) => write!(f, "literal {:?}", text),
            Node::Set { name, expr } => write!(f, "set {} = {}", name, expr),
            Node::Output(expr) => write!(f, "output {}", expr),
        }
    }
}
