//! The decoded transfer instruction of one inbound message.
use tracing::debug;

use crate::message::fields;

/// Typed fields of one inbound transfer message.
///
/// Each field is `None` when its block or tag is absent or malformed. The accessors
/// return an empty string in that case, matching how missing values are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    sender_bic: Option<String>,
    receiver_bic: Option<String>,
    intermediary_bic: Option<String>,
    credit_account: Option<String>,
    benefit_account: Option<String>,
    currency: Option<String>,
    amount: Option<String>,
    fee: Option<String>,
}

impl TransferRequest {
    /// Decodes every field of `message`.
    pub fn decode(message: &str) -> Self {
        let request = TransferRequest {
            sender_bic: fields::sender_bic(message),
            receiver_bic: fields::receiver_bic(message),
            intermediary_bic: fields::intermediary_bic(message),
            credit_account: fields::credit_account(message),
            benefit_account: fields::benefit_account(message),
            currency: fields::transfer_currency(message),
            amount: fields::transfer_amount(message),
            fee: fields::transfer_fee(message),
        };
        for (name, absent) in request.absent_fields() {
            if absent {
                debug!(field = name, "field absent or malformed");
            }
        }
        request
    }

    fn absent_fields(&self) -> [(&'static str, bool); 8] {
        [
            ("sender", self.sender_bic.is_none()),
            ("receiver", self.receiver_bic.is_none()),
            ("intermediary", self.intermediary_bic.is_none()),
            ("50K", self.credit_account.is_none()),
            ("59A", self.benefit_account.is_none()),
            ("currency", self.currency.is_none()),
            ("amount", self.amount.is_none()),
            ("71G", self.fee.is_none()),
        ]
    }

    /// BIC of the bank that sent the message, from block 1.
    pub fn sender_bic(&self) -> &str {
        self.sender_bic.as_deref().unwrap_or_default()
    }

    /// BIC the message is addressed to, from block 2.
    pub fn receiver_bic(&self) -> &str {
        self.receiver_bic.as_deref().unwrap_or_default()
    }

    /// BIC of the `:57A:` intermediary.
    pub fn intermediary_bic(&self) -> &str {
        self.intermediary_bic.as_deref().unwrap_or_default()
    }

    /// Ordering customer account from `:50K:`.
    pub fn credit_account(&self) -> &str {
        self.credit_account.as_deref().unwrap_or_default()
    }

    /// Beneficiary account from `:59A:`.
    pub fn benefit_account(&self) -> &str {
        self.benefit_account.as_deref().unwrap_or_default()
    }

    /// ISO currency code of `:32A:`.
    pub fn currency(&self) -> &str {
        self.currency.as_deref().unwrap_or_default()
    }

    /// Transfer amount as decimal-point text.
    pub fn amount(&self) -> &str {
        self.amount.as_deref().unwrap_or_default()
    }

    /// Charges as decimal-point text, `None` when the message carries no `:71G:`.
    pub fn fee(&self) -> Option<&str> {
        self.fee.as_deref()
    }
}
