//! Account records as stored in the ledger.
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::bank::{Transaction, parse_amount};

/// Accepts `null` as an empty history.
fn deserialize_history<'de, D>(deserializer: D) -> Result<Vec<Transaction>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Vec<Transaction>> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

/// A correspondent account. Read and rewritten as a whole by the transfer pipeline.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct AccountRecord {
    /// Balance, decimal-point text with two fraction digits.
    #[serde(default)]
    pub amount: String,

    #[serde(default)]
    pub currency: String,

    /// Account type label as stored, usually `nostro` or `vostro`.
    #[serde(rename = "type", default)]
    pub account_type: String,

    /// Opening date.
    #[serde(default)]
    pub date: String,

    /// Account number.
    #[serde(default)]
    pub number: String,

    /// Transfer attempts touching this account, oldest first.
    #[serde(default, deserialize_with = "deserialize_history")]
    pub transactions: Vec<Transaction>,
}

impl AccountRecord {
    /// Creates a record with an empty history.
    pub fn open(
        amount: impl Into<String>,
        currency: impl Into<String>,
        account_type: impl Into<String>,
        date: impl Into<String>,
        number: impl Into<String>,
    ) -> Self {
        AccountRecord {
            amount: amount.into(),
            currency: currency.into(),
            account_type: account_type.into(),
            date: date.into(),
            number: number.into(),
            transactions: Vec::new(),
        }
    }

    /// Decodes a record from its stored JSON form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Encodes the record as the JSON stored under its account key.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// A record with neither balance nor currency is treated as missing.
    pub fn is_blank(&self) -> bool {
        self.amount.is_empty() && self.currency.is_empty()
    }

    /// Parsed balance, `None` if the stored text is not a decimal amount.
    pub fn balance(&self) -> Option<Decimal> {
        parse_amount(&self.amount)
    }
}
