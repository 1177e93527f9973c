//! Fixed-offset decoders for the fields of a transfer message.
//!
//! Every decoder takes the raw message and returns `None` when the block or tag is
//! absent, or when the value is too short for the documented sub-structure.
use crate::message::{TEXT_BLOCK, extract_block, extract_tag};

/// Length of a BIC without branch code.
const BIC_LEN: usize = 8;

fn tag_value(message: &str, tag: &str) -> Option<String> {
    extract_block(message, TEXT_BLOCK).and_then(|block| extract_tag(block, tag))
}

/// Turns a SWIFT decimal-comma amount into decimal-point text.
pub fn comma_to_point(amount: &str) -> String {
    amount.replace(',', ".").replace('\n', "")
}

/// Turns decimal-point text back into a SWIFT decimal-comma amount.
pub fn point_to_comma(amount: &str) -> String {
    amount.replace('.', ",")
}

/// First line of an account field, without its leading slash.
fn account_line(value: &str) -> Option<String> {
    let line = value.lines().next()?;
    line.strip_prefix('/').map(str::to_string)
}

/// Sender BIC: offset 3..11 of the basic header.
pub fn sender_bic(message: &str) -> Option<String> {
    let block = extract_block(message, 1)?;
    block.get(3..3 + BIC_LEN).map(str::to_string)
}

/// Receiver BIC from the application header. Input headers (17 or 21 characters)
/// carry it at offset 4, output headers (47 characters) at offset 14.
pub fn receiver_bic(message: &str) -> Option<String> {
    let block = extract_block(message, 2)?;
    let start = match block.len() {
        17 | 21 => 4,
        47 => 14,
        _ => return None,
    };
    block.get(start..start + BIC_LEN).map(str::to_string)
}

/// Intermediary institution from tag 57A.
pub fn intermediary_bic(message: &str) -> Option<String> {
    tag_value(message, "57A").map(|value| value.replace('\n', ""))
}

/// Ordering customer account from tag 50K.
pub fn credit_account(message: &str) -> Option<String> {
    tag_value(message, "50K").and_then(|value| account_line(&value))
}

/// Beneficiary account from tag 59A.
pub fn benefit_account(message: &str) -> Option<String> {
    tag_value(message, "59A").and_then(|value| account_line(&value))
}

/// Transfer amount from tag 32A (value date, currency, amount), decimal-point text.
pub fn transfer_amount(message: &str) -> Option<String> {
    let value = tag_value(message, "32A")?;
    value.get(9..).map(comma_to_point)
}

/// Transfer currency from tag 32A.
pub fn transfer_currency(message: &str) -> Option<String> {
    let value = tag_value(message, "32A")?;
    value.get(6..9).map(str::to_string)
}

/// Charges from tag 71G (currency, amount), decimal-point text.
pub fn transfer_fee(message: &str) -> Option<String> {
    let value = tag_value(message, "71G")?;
    value.get(3..).map(comma_to_point)
}
