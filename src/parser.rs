//! Template parser using nom.
//!
//! Parses template text into an ordered node list.
//!
//! # Syntax Overview
//!
//! ```text
//! SELECT {{ column("email") }} FROM {% set t = object("demo.users") %}{{ relation(t) }}
//! ───┬── ────────┬───────────       ──────────────┬───────────────── ───────┬───────
//!    │           │                                │                         │
//!    │           │                                │                         └── Output block
//!    │           │                                └── Set statement (binds, emits nothing)
//!    │           └── Output block (evaluates and emits)
//!    └── Literal text (emitted as-is)
//! ```
//!
//! Expression grammar: `expr := primary ("." identifier | "(" args ")")*`

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, digit1, multispace0},
    combinator::{map, opt, recognize},
    multi::separated_list0,
    sequence::{delimited, pair, tuple},
};

use crate::ast::{Expr, Node};
use crate::error::{WeaveError, WeaveResult};

const OUTPUT_OPEN: &str = "{{";
const OUTPUT_CLOSE: &str = "}}";
const STATEMENT_OPEN: &str = "{%";
const STATEMENT_CLOSE: &str = "%}";

/// Parse complete template text into its node list.
pub fn parse(input: &str) -> WeaveResult<Vec<Node>> {
    let mut nodes = Vec::new();
    let mut pos = 0;

    while pos < input.len() {
        let rest = &input[pos..];
        let Some((rel, kind)) = find_block_open(rest) else {
            nodes.push(Node::Literal(rest.to_string()));
            break;
        };
        if rel > 0 {
            nodes.push(Node::Literal(rest[..rel].to_string()));
        }

        let open_at = pos + rel;
        let body = &input[open_at + kind.open().len()..];
        let close_rel = body
            .find(kind.close())
            .ok_or_else(|| WeaveError::parse(open_at, kind.unterminated()))?;
        let inner = &body[..close_rel];

        match kind {
            BlockKind::Output => nodes.push(Node::Output(parse_expr_complete(inner, open_at)?)),
            BlockKind::Statement => nodes.push(parse_statement(inner, open_at)?),
        }
        pos = open_at + kind.open().len() + close_rel + kind.close().len();
    }

    Ok(nodes)
}

#[derive(Clone, Copy)]
enum BlockKind {
    Output,
    Statement,
}

impl BlockKind {
    fn open(&self) -> &'static str {
        match self {
            Self::Output => OUTPUT_OPEN,
            Self::Statement => STATEMENT_OPEN,
        }
    }

    fn close(&self) -> &'static str {
        match self {
            Self::Output => OUTPUT_CLOSE,
            Self::Statement => STATEMENT_CLOSE,
        }
    }

    fn unterminated(&self) -> &'static str {
        match self {
            Self::Output => "unterminated expression block, expected '}}'",
            Self::Statement => "unterminated statement block, expected '%}'",
        }
    }
}

/// Earliest block opener in the remaining text, if any.
fn find_block_open(input: &str) -> Option<(usize, BlockKind)> {
    let output = input.find(OUTPUT_OPEN);
    let statement = input.find(STATEMENT_OPEN);
    match (output, statement) {
        (Some(o), Some(s)) if o <= s => Some((o, BlockKind::Output)),
        (_, Some(s)) => Some((s, BlockKind::Statement)),
        (Some(o), None) => Some((o, BlockKind::Output)),
        (None, None) => None,
    }
}

/// Parse the inside of a `{% ... %}` block. `set` is the only
/// recognized statement keyword.
fn parse_statement(inner: &str, at: usize) -> WeaveResult<Node> {
    let body = inner.trim();
    let keyword = body.split_whitespace().next().unwrap_or("");
    if keyword != "set" {
        return Err(WeaveError::parse(
            at,
            format!("unknown statement keyword: '{}'", keyword),
        ));
    }

    let rest = &body["set".len()..];
    match parse_assignment(rest) {
        Ok(("", (name, expr))) => Ok(Node::Set { name, expr }),
        Ok((remaining, _)) => Err(WeaveError::parse(
            at,
            format!("unexpected trailing content in set statement: '{}'", remaining),
        )),
        Err(e) => Err(WeaveError::parse(at, format!("invalid set statement: {:?}", e))),
    }
}

/// Parse `name = expr` after the `set` keyword.
fn parse_assignment(input: &str) -> IResult<&str, (String, Expr)> {
    let (input, _) = multispace0(input)?;
    let (input, name) = parse_identifier(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char('=')(input)?;
    let (input, _) = multispace0(input)?;
    let (input, expr) = parse_expr(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, (name.to_string(), expr)))
}

/// Parse the inside of a `{{ ... }}` block as one complete expression.
fn parse_expr_complete(inner: &str, at: usize) -> WeaveResult<Expr> {
    let body = inner.trim();
    if body.is_empty() {
        return Err(WeaveError::parse(at, "empty expression block"));
    }
    match parse_expr(body) {
        Ok(("", expr)) => Ok(expr),
        Ok((remaining, _)) => Err(WeaveError::parse(
            at,
            format!("unexpected trailing content in expression: '{}'", remaining),
        )),
        Err(e) => Err(WeaveError::parse(at, format!("invalid expression: {:?}", e))),
    }
}

/// Parse an expression: a primary followed by any number of attribute
/// accesses and call argument lists, left-associative.
fn parse_expr(input: &str) -> IResult<&str, Expr> {
    let (mut input, mut expr) = parse_primary(input)?;
    loop {
        if let Some(rest) = input.strip_prefix('.') {
            let (rest, attr) = parse_identifier(rest)?;
            expr = Expr::Attr {
                base: Box::new(expr),
                attr: attr.to_string(),
            };
            input = rest;
        } else if input.starts_with('(') {
            let (rest, args) = parse_call_args(input)?;
            expr = Expr::Call {
                callee: Box::new(expr),
                args,
            };
            input = rest;
        } else {
            break;
        }
    }
    Ok((input, expr))
}

/// Parse a parenthesized, comma-separated argument list.
fn parse_call_args(input: &str) -> IResult<&str, Vec<Expr>> {
    delimited(
        pair(char('('), multispace0),
        separated_list0(char(','), delimited(multispace0, parse_expr, multispace0)),
        char(')'),
    )(input)
}

/// Parse a primary expression: literal or identifier.
fn parse_primary(input: &str) -> IResult<&str, Expr> {
    alt((parse_string, parse_number, parse_ident_or_bool))(input)
}

/// Parse an identifier (variable, attribute, builtin, or macro name).
fn parse_identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

/// `true`/`false` are keywords; any other identifier is a name lookup.
fn parse_ident_or_bool(input: &str) -> IResult<&str, Expr> {
    map(parse_identifier, |s: &str| match s {
        "true" => Expr::Bool(true),
        "false" => Expr::Bool(false),
        _ => Expr::Ident(s.to_string()),
    })(input)
}

/// Parse a number (integer or float, optional leading minus).
fn parse_number(input: &str) -> IResult<&str, Expr> {
    let (input, num_str) = recognize(tuple((
        opt(char('-')),
        digit1,
        opt(pair(char('.'), digit1)),
    )))(input)?;
    Ok((input, Expr::Num(num_str.parse().unwrap_or(0.0))))
}

/// Parse a quoted string literal, single- or double-quoted.
fn parse_string(input: &str) -> IResult<&str, Expr> {
    map(
        alt((
            delimited(char('\''), take_while(|c| c != '\''), char('\'')),
            delimited(char('"'), take_while(|c| c != '"'), char('"')),
        )),
        |s: &str| Expr::Str(s.to_string()),
    )(input)
}
