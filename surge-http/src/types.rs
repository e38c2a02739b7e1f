//! Request and response shapes exchanged with the Cloud API

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const WALLET_TYPE: &str = "askar-anoncreds";
pub const GROUP_ID: &str = "GroupA";
pub const IMAGE_URL: &str = "https://upload.wikimedia.org/wikipedia/commons/7/70/Example.png";

/// Attribute names of the identity schema used throughout the load test
pub const SCHEMA_ATTRIBUTES: [&str; 10] = [
    "date_of_birth",
    "id_number",
    "country_of_birth",
    "citizen_status",
    "date_of_issue",
    "gender",
    "surname",
    "nationality",
    "country_of_birth_iso_code",
    "names",
];

/// Body for creating a tenant wallet
#[derive(Debug, Clone, Serialize)]
pub struct NewTenant<'a> {
    pub wallet_label: &'a str,
    pub wallet_name: &'a str,
    pub wallet_type: &'static str,
    pub group_id: &'static str,
    pub image_url: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<[&'static str; 2]>,
}

impl<'a> NewTenant<'a> {
    pub fn holder(wallet_label: &'a str, wallet_name: &'a str) -> Self {
        Self {
            wallet_label,
            wallet_name,
            wallet_type: WALLET_TYPE,
            group_id: GROUP_ID,
            image_url: IMAGE_URL,
            roles: None,
        }
    }

    /// Issuer tenants use their name as label and act as verifiers too
    pub fn issuer(wallet_name: &'a str) -> Self {
        Self {
            roles: Some(["issuer", "verifier"]),
            ..Self::holder(wallet_name, wallet_name)
        }
    }
}

/// A tenant as returned by the tenant-admin API
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Tenant {
    pub wallet_id: String,
    #[serde(default)]
    pub wallet_label: Option<String>,
    #[serde(default)]
    pub wallet_name: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AccessToken {
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Identified {
    pub id: Option<String>,
}

/// A connection record from either side
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Connection {
    pub connection_id: String,
    #[serde(default)]
    pub my_did: Option<String>,
    #[serde(default)]
    pub their_did: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

/// Issuer-side handle for a credential offer
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CredentialExchange {
    pub thread_id: String,
    pub credential_exchange_id: String,
}

/// Verifier-side handle for a proof request
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProofExchange {
    pub thread_id: String,
    #[serde(default)]
    pub proof_id: Option<String>,
}

/// A proof record; `verified` is set once the presentation is checked
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProofRecord {
    #[serde(default)]
    pub proof_id: Option<String>,
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub verified: Option<bool>,
}

/// Out-of-band invitation as produced by the issuer; forwarded verbatim
pub type Invitation = Value;

/// First element of a JSON array response, if any
pub(crate) fn first_item(value: &Value) -> Option<&Value> {
    value.as_array().and_then(|items| items.first())
}

/// String field of a JSON object
pub(crate) fn str_field(value: &Value, field: &str) -> Option<String> {
    value.get(field).and_then(Value::as_str).map(str::to_string)
}
