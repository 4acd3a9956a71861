//! Default macro packs shipped per dialect.
//!
//! Each shipped dialect implements [`MacroPack`]; trait defaults cover
//! the ANSI-leaning behavior and dialects override where their syntax
//! diverges. Packs are consulted only after the registry misses, so a
//! caller-registered macro shadows the shipped default under its exact
//! dialect name.

mod mssql;
mod mysql;
mod postgres;
mod snowflake;

pub use mssql::MssqlPack;
pub use mysql::MySqlPack;
pub use postgres::PostgresPack;
pub use snowflake::SnowflakePack;

use crate::dialect::QuoteStyle;
use crate::error::{WeaveError, WeaveResult};
use crate::value::Value;

/// Macro names every shipped pack implements.
pub const DEFAULT_MACROS: &[&str] = &[
    "bool_literal",
    "limit_clause",
    "date_add",
    "recent_usage_expr",
    "current_timestamp",
];

/// Dialect-specific SQL fragment generation for the default macros.
pub trait MacroPack: Send + Sync {
    /// Identifier quoting style for fragments this pack emits.
    fn quote_style(&self) -> QuoteStyle;

    /// Boolean literal syntax.
    fn bool_literal(&self, value: bool) -> String {
        value.to_string()
    }

    /// Row-limiting fragment. Placement varies by dialect (leading
    /// `TOP` vs trailing `LIMIT`); callers compose templates knowing
    /// where the fragment goes.
    fn limit_clause(&self, n: i64) -> String {
        format!("LIMIT {}", n)
    }

    /// Date arithmetic over an arbitrary SQL expression.
    fn date_add(&self, unit: &str, amount: i64, expr: &str) -> String;

    /// Expression referencing the last-recently-used timestamp column,
    /// optionally prefixed with a table alias.
    fn recent_usage_expr(&self, prefix: &str) -> String {
        let column = self.quote_style().quote("last_used_at");
        if prefix.is_empty() {
            column
        } else {
            format!("{}.{}", prefix, column)
        }
    }

    /// The dialect's "now" expression.
    fn current_timestamp(&self) -> String {
        "CURRENT_TIMESTAMP".to_string()
    }
}

/// The shipped pack for a dialect name, if any.
pub fn pack_for(dialect_name: &str) -> Option<&'static dyn MacroPack> {
    match dialect_name {
        "postgres" => Some(&PostgresPack),
        "mysql" => Some(&MySqlPack),
        "mssql" => Some(&MssqlPack),
        "snowflake" => Some(&SnowflakePack),
        _ => None,
    }
}

/// Route a macro name to the pack method, checking arity and argument
/// types. Returns `None` for names no pack implements, so the caller
/// can fall through to its not-found error.
pub fn call_pack(
    pack: &dyn MacroPack,
    name: &str,
    args: &[Value],
) -> Option<WeaveResult<String>> {
    match name {
        "bool_literal" => Some(
            expect_arity(name, args, 1).and_then(|_| Ok(pack.bool_literal(bool_arg(name, args, 0)?))),
        ),
        "limit_clause" => Some(
            expect_arity(name, args, 1).and_then(|_| Ok(pack.limit_clause(int_arg(name, args, 0)?))),
        ),
        "date_add" => Some(expect_arity(name, args, 3).and_then(|_| {
            let unit = str_arg(name, args, 0)?;
            let amount = int_arg(name, args, 1)?;
            let expr = str_arg(name, args, 2)?;
            Ok(pack.date_add(unit, amount, expr))
        })),
        "recent_usage_expr" => Some(
            expect_arity(name, args, 1)
                .and_then(|_| Ok(pack.recent_usage_expr(str_arg(name, args, 0)?))),
        ),
        "current_timestamp" => {
            Some(expect_arity(name, args, 0).map(|_| pack.current_timestamp()))
        }
        _ => None,
    }
}

fn expect_arity(name: &str, args: &[Value], expected: usize) -> WeaveResult<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(WeaveError::eval(format!(
            "{}() takes {} argument(s), got {}",
            name,
            expected,
            args.len()
        )))
    }
}

fn str_arg<'a>(name: &str, args: &'a [Value], index: usize) -> WeaveResult<&'a str> {
    match &args[index] {
        Value::Str(s) => Ok(s),
        other => Err(WeaveError::eval(format!(
            "{}() argument {} must be a string, got {}",
            name,
            index + 1,
            other.type_name()
        ))),
    }
}

fn int_arg(name: &str, args: &[Value], index: usize) -> WeaveResult<i64> {
    match &args[index] {
        Value::Num(n) if n.fract() == 0.0 => Ok(*n as i64),
        other => Err(WeaveError::eval(format!(
            "{}() argument {} must be an integer, got {}",
            name,
            index + 1,
            other.type_name()
        ))),
    }
}

fn bool_arg(name: &str, args: &[Value], index: usize) -> WeaveResult<bool> {
    match &args[index] {
        Value::Bool(b) => Ok(*b),
        Value::Str(s) if s == "true" => Ok(true),
        Value::Str(s) if s == "false" => Ok(false),
        other => Err(WeaveError::eval(format!(
            "{}() argument {} must be a boolean, got {}",
            name,
            index + 1,
            other.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_lookup() {
        assert!(pack_for("postgres").is_some());
        assert!(pack_for("snowflake").is_some());
        assert!(pack_for("duckdb").is_none());
    }

    #[test]
    fn test_recent_usage_contains_column_for_all_packs() {
        for dialect in ["postgres", "mysql", "mssql", "snowflake"] {
            let pack = pack_for(dialect).unwrap();
            let expr = pack.recent_usage_expr("k");
            assert!(
                expr.contains("last_used_at"),
                "{} pack output missing column: {}",
                dialect,
                expr
            );
            assert!(expr.starts_with("k."));
        }
    }

    #[test]
    fn test_call_pack_arity_check() {
        let pack = pack_for("postgres").unwrap();
        let err = call_pack(pack, "limit_clause", &[]).unwrap().unwrap_err();
        assert!(err.to_string().contains("takes 1 argument"));
    }

    #[test]
    fn test_call_pack_type_check() {
        let pack = pack_for("postgres").unwrap();
        let args = [Value::Str("five".to_string())];
        let err = call_pack(pack, "limit_clause", &args).unwrap().unwrap_err();
        assert!(err.to_string().contains("must be an integer"));
    }

    #[test]
    fn test_call_pack_unknown_name() {
        let pack = pack_for("postgres").unwrap();
        assert!(call_pack(pack, "no_such_thing", &[]).is_none());
    }

    #[test]
    fn test_bool_arg_accepts_string_form() {
        let pack = pack_for("postgres").unwrap();
        let args = [Value::Str("true".to_string())];
        let out = call_pack(pack, "bool_literal", &args).unwrap().unwrap();
        assert_eq!(out, "true");
    }
}
