//! Dialect descriptors and identifier quoting.
//!
//! Quoting is a pure function of the dialect name and the identifier
//! string. Unrecognized dialect names are not an error: they fall back
//! to double-quote style, so caller-registered dialects render sensibly
//! without any quoting configuration.

use serde::{Deserialize, Serialize};

/// Identifies the target SQL backend for one render call.
///
/// The name is the sole key for both quoting and macro lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialect {
    pub name: String,
}

impl Dialect {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Quote a single identifier segment per this dialect's rule.
    pub fn quote(&self, identifier: &str) -> String {
        QuoteStyle::for_dialect(&self.name).quote(identifier)
    }

    /// Quote a `schema.name` pair, each segment independently, with the
    /// separating dot left unquoted.
    pub fn quote_relation(&self, schema: &str, name: &str) -> String {
        format!("{}.{}", self.quote(schema), self.quote(name))
    }
}

/// Identifier quoting styles across the shipped dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    /// `"x"`: postgres, snowflake, and the fallback for unknown names.
    DoubleQuote,
    /// `` `x` ``: mysql.
    Backtick,
    /// `[x]`: mssql.
    Bracket,
}

impl QuoteStyle {
    /// The fixed quoting table. Matching is case-insensitive; unknown
    /// names fall back to double quotes, never an error.
    pub fn for_dialect(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "mysql" => Self::Backtick,
            "mssql" => Self::Bracket,
            "postgres" | "snowflake" => Self::DoubleQuote,
            _ => Self::DoubleQuote,
        }
    }

    /// Wrap an identifier, doubling any embedded closing character.
    pub fn quote(&self, identifier: &str) -> String {
        match self {
            Self::DoubleQuote => format!("\"{}\"", identifier.replace('"', "\"\"")),
            Self::Backtick => format!("`{}`", identifier.replace('`', "``")),
            Self::Bracket => format!("[{}]", identifier.replace(']', "]]")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoting_table() {
        assert_eq!(Dialect::new("postgres").quote("email"), "\"email\"");
        assert_eq!(Dialect::new("snowflake").quote("email"), "\"email\"");
        assert_eq!(Dialect::new("mysql").quote("email"), "`email`");
        assert_eq!(Dialect::new("mssql").quote("email"), "[email]");
    }

    #[test]
    fn test_unknown_dialect_falls_back() {
        assert_eq!(Dialect::new("duckdb").quote("email"), "\"email\"");
    }

    #[test]
    fn test_embedded_quote_doubling() {
        assert_eq!(Dialect::new("postgres").quote("we\"ird"), "\"we\"\"ird\"");
        assert_eq!(Dialect::new("mysql").quote("we`ird"), "`we``ird`");
        assert_eq!(Dialect::new("mssql").quote("we]ird"), "[we]]ird]");
    }

    #[test]
    fn test_quote_relation_segments() {
        assert_eq!(
            Dialect::new("mysql").quote_relation("demo", "users"),
            "`demo`.`users`"
        );
        assert_eq!(
            Dialect::new("mssql").quote_relation("demo", "users"),
            "[demo].[users]"
        );
    }
}
