use crate::dialect::QuoteStyle;
use crate::packs::MacroPack;

pub struct SnowflakePack;

impl MacroPack for SnowflakePack {
    fn quote_style(&self) -> QuoteStyle {
        QuoteStyle::DoubleQuote
    }

    fn bool_literal(&self, value: bool) -> String {
        if value { "TRUE" } else { "FALSE" }.to_string()
    }

    fn date_add(&self, unit: &str, amount: i64, expr: &str) -> String {
        format!("DATEADD({}, {}, {})", unit, amount, expr)
    }

    fn current_timestamp(&self) -> String {
        "CURRENT_TIMESTAMP()".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_add() {
        let pack = SnowflakePack;
        assert_eq!(
            pack.date_add("day", -7, "CURRENT_TIMESTAMP()"),
            "DATEADD(day, -7, CURRENT_TIMESTAMP())"
        );
    }

    #[test]
    fn test_overrides() {
        let pack = SnowflakePack;
        assert_eq!(pack.bool_literal(true), "TRUE");
        assert_eq!(pack.limit_clause(100), "LIMIT 100");
        assert_eq!(pack.current_timestamp(), "CURRENT_TIMESTAMP()");
        assert_eq!(pack.recent_usage_expr("u"), "u.\"last_used_at\"");
    }
}
