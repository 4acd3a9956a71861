use crate::dialect::QuoteStyle;
use crate::packs::MacroPack;

pub struct PostgresPack;

impl MacroPack for PostgresPack {
    fn quote_style(&self) -> QuoteStyle {
        QuoteStyle::DoubleQuote
    }

    fn date_add(&self, unit: &str, amount: i64, expr: &str) -> String {
        format!("({} + INTERVAL '{} {}')", expr, amount, unit)
    }
}
