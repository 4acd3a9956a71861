use crate::dialect::QuoteStyle;
use crate::packs::MacroPack;

pub struct MySqlPack;

impl MacroPack for MySqlPack {
    fn quote_style(&self) -> QuoteStyle {
        QuoteStyle::Backtick
    }

    fn bool_literal(&self, value: bool) -> String {
        if value { "TRUE" } else { "FALSE" }.to_string()
    }

    fn date_add(&self, unit: &str, amount: i64, expr: &str) -> String {
        // MySQL interval units are bare keywords: INTERVAL -7 DAY
        format!(
            "DATE_ADD({}, INTERVAL {} {})",
            expr,
            amount,
            unit.to_ascii_uppercase()
        )
    }

    fn current_timestamp(&self) -> String {
        "NOW()".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_add() {
        let pack = MySqlPack;
        assert_eq!(
            pack.date_add("day", -7, "NOW()"),
            "DATE_ADD(NOW(), INTERVAL -7 DAY)"
        );
    }

    #[test]
    fn test_overrides() {
        let pack = MySqlPack;
        assert_eq!(pack.bool_literal(false), "FALSE");
        assert_eq!(pack.limit_clause(5), "LIMIT 5");
        assert_eq!(pack.current_timestamp(), "NOW()");
        assert_eq!(pack.recent_usage_expr("t"), "t.`last_used_at`");
    }
}
