use crate::dialect::QuoteStyle;
use crate::packs::MacroPack;

pub struct MssqlPack;

impl MacroPack for MssqlPack {
    fn quote_style(&self) -> QuoteStyle {
        QuoteStyle::Bracket
    }

    // T-SQL has no boolean literals; BIT columns compare against 1/0.
    fn bool_literal(&self, value: bool) -> String {
        if value { "1" } else { "0" }.to_string()
    }

    // Leading fragment: SELECT TOP n ...
    fn limit_clause(&self, n: i64) -> String {
        format!("TOP {}", n)
    }

    fn date_add(&self, unit: &str, amount: i64, expr: &str) -> String {
        format!("DATEADD({}, {}, {})", unit, amount, expr)
    }

    fn current_timestamp(&self) -> String {
        "GETDATE()".to_string()
    }
}
