//! Types used throughout the banking system.
use std::fmt;

use serde::{Deserialize, Serialize};

/// Transaction ID type, issued once per invocation.
pub type TransactionId = String;

/// Correspondent account type.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Our account held at another institution.
    Nostro,
    /// Another institution's account held with us.
    Vostro,
}

impl AccountType {
    /// The lowercase name used in stored records.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Nostro => "nostro",
            AccountType::Vostro => "vostro",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one ledger account. Its compact JSON form is the store key.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountKey {
    #[serde(rename = "holderBic")]
    pub holder_bic: String,

    #[serde(rename = "ownerBic")]
    pub owner_bic: String,

    pub currency: String,

    #[serde(rename = "type")]
    pub account_type: AccountType,
}

impl AccountKey {
    pub fn new(
        holder_bic: impl Into<String>,
        owner_bic: impl Into<String>,
        currency: impl Into<String>,
        account_type: AccountType,
    ) -> Self {
        AccountKey {
            holder_bic: holder_bic.into(),
            owner_bic: owner_bic.into(),
            currency: currency.into(),
            account_type,
        }
    }

    /// Canonical store key.
    pub fn to_store_key(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// An institution together with the customer account it acts for.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Organization {
    #[serde(rename = "BIC")]
    pub bic: String,

    #[serde(rename = "Account")]
    pub account: String,
}

impl Organization {
    pub fn new(bic: impl Into<String>, account: impl Into<String>) -> Self {
        Organization {
            bic: bic.into(),
            account: account.into(),
        }
    }
}
