use askama::Result;
use rust_decimal::Decimal;

// Money display for decimal columns. This allows `|money` in the templates.
#[allow(clippy::unnecessary_wraps)]
pub fn money(value: &Decimal) -> Result<String> {
    Ok(format!("${:.2}", value))
}
