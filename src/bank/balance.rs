//! Exact decimal arithmetic for balances and transfer amounts.
use rust_decimal::{Decimal, RoundingStrategy};

/// Fraction digits of a stored balance.
const BALANCE_SCALE: u32 = 2;

/// Parses unsigned decimal-point text such as `100.00` or `100.`.
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() || text.starts_with(['-', '+']) {
        return None;
    }
    let text = text.strip_suffix('.').unwrap_or(text);
    text.parse::<Decimal>().ok()
}

/// Parses the charges of a transfer. A transfer without charges costs nothing.
pub fn parse_fee(fee: Option<&str>) -> Option<Decimal> {
    match fee {
        Some(fee) => parse_amount(fee),
        None => Some(Decimal::ZERO),
    }
}

/// Returns true if `balance - amount - fee` is not negative.
///
/// Any value that does not parse makes the transfer impossible.
pub fn can_transfer(balance: &str, amount: &str, fee: Option<&str>) -> bool {
    let (Some(balance), Some(amount), Some(fee)) =
        (parse_amount(balance), parse_amount(amount), parse_fee(fee))
    else {
        return false;
    };
    balance
        .checked_sub(amount)
        .and_then(|rest| rest.checked_sub(fee))
        .is_some_and(|rest| rest >= Decimal::ZERO)
}

/// Amount forwarded to the next institution once charges are deducted.
///
/// `None` if either value does not parse or the charges exceed the amount.
pub fn net_amount(amount: &str, fee: Option<&str>) -> Option<Decimal> {
    parse_amount(amount)?
        .checked_sub(parse_fee(fee)?)
        .filter(|net| *net >= Decimal::ZERO)
}

/// Formats a balance with two fraction digits.
pub fn format_balance(balance: Decimal) -> String {
    let rounded = balance.round_dp_with_strategy(BALANCE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}
