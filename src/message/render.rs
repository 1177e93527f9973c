//! Builds the reply message of a transfer.
use rust_decimal::Decimal;

use crate::bank::net_amount;
use crate::message::{TransferRequest, point_to_comma};

/// Free-format rejection notice sent back to the ordering institution.
pub const MT199_TEMPLATE: &str = "{1:F01[[SENDER]]XXXX0000000000}{2:I199[[RECEIVER]]XXXXN}{4:\r\n\
:20:HL-[[TX-ID]]\r\n\
:79:[[COMMENT]]\r\n\
-}";

/// Replaces every occurrence of a non-empty `from`.
fn replace_all(text: &str, from: &str, to: &str) -> String {
    if from.is_empty() {
        text.to_string()
    } else {
        text.replace(from, to)
    }
}

/// Removes every line starting with `prefix`, including its line break.
fn strip_line(text: &str, prefix: &str) -> String {
    if prefix.is_empty() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find(prefix) {
        out.push_str(&rest[..pos]);
        let line = &rest[pos..];
        let end = line
            .find('\n')
            .map(|i| i + 1)
            .or_else(|| line.find("-}"))
            .unwrap_or(line.len());
        rest = &line[end..];
    }
    out.push_str(rest);
    out
}

/// SWIFT amount text: decimal comma, always present.
fn swift_amount(amount: Decimal) -> String {
    let text = point_to_comma(&amount.to_string());
    if text.contains(',') { text } else { format!("{text},") }
}

/// Forwards `message` to the next institution.
///
/// The application header is readdressed to the intermediary, the sender becomes
/// the receiver, the `:57A:` routing line turns into a `:52A:` line naming the
/// original sender, the `:71G:` charges line is dropped and the amount is reduced
/// by the charges. All edits are literal text replacements.
pub fn render_forward(message: &str, request: &TransferRequest) -> String {
    let sender = request.sender_bic();
    let receiver = request.receiver_bic();
    let intermediary = request.intermediary_bic();

    let mut output = replace_all(message, receiver, intermediary);
    output = replace_all(&output, sender, receiver);
    if !intermediary.is_empty() {
        output = replace_all(
            &output,
            &format!(":57A:{intermediary}"),
            &format!(":52A:{sender}"),
        );
    }
    if let Some(fee) = request.fee() {
        let fee_line = format!(":71G:{}{}", request.currency(), point_to_comma(fee));
        output = strip_line(&output, &fee_line);
    }
    if let Some(net) = net_amount(request.amount(), request.fee()) {
        output = replace_all(&output, &point_to_comma(request.amount()), &swift_amount(net));
    }
    output
}

/// Fills the MT199 rejection template for a failed transfer.
pub fn render_rejection(request: &TransferRequest, transaction_id: &str, comment: &str) -> String {
    MT199_TEMPLATE
        .replace("[[SENDER]]", request.receiver_bic())
        .replace("[[RECEIVER]]", request.sender_bic())
        .replace("[[TX-ID]]", transaction_id)
        .replace("[[COMMENT]]", comment)
}
