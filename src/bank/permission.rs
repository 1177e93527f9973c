//! User permissions and the transfer authorization check.
use serde::{Deserialize, Serialize};

use crate::bank::AccountKey;

/// Account selector of a permission entry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct PermissionAccountKey {
    #[serde(rename = "type", default)]
    pub key_type: String,

    #[serde(default)]
    pub holder: String,

    #[serde(default)]
    pub owner: String,

    #[serde(default)]
    pub currency: String,

    #[serde(rename = "accountType", default)]
    pub account_type: String,
}

impl PermissionAccountKey {
    /// Returns true if the selector names exactly `key`.
    pub fn matches(&self, key: &AccountKey) -> bool {
        self.currency == key.currency
            && self.holder == key.holder_bic
            && self.owner == key.owner_bic
            && self.account_type == key.account_type.as_str()
    }
}

/// Grants an access level on one account.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    #[serde(rename = "accountKey")]
    pub key: PermissionAccountKey,

    /// Access level. Not discriminated yet: any entry grants transfers.
    #[serde(default)]
    pub access: String,
}

/// A user stored under the key its caller token decodes to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct UserDetails {
    #[serde(default)]
    pub password: String,

    #[serde(default, deserialize_with = "deserialize_permissions")]
    pub permissions: Vec<Permission>,
}

fn deserialize_permissions<'de, D>(deserializer: D) -> Result<Vec<Permission>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<Vec<Permission>> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

impl UserDetails {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// Returns true if any permission names `key` on currency, holder, owner and type.
pub fn is_transfer_allowed(permissions: &[Permission], key: &AccountKey) -> bool {
    permissions.iter().any(|permission| permission.key.matches(key))
}
