//! Records handed from one phase to the next

use serde::{Deserialize, Serialize};

/// A provisioned wallet, written by create-holders and create-issuers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantRecord {
    pub wallet_label: String,
    pub wallet_name: String,
    pub wallet_id: String,
    pub access_token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaRecord {
    pub schema_name: String,
    pub schema_version: String,
    pub schema_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialDefinitionRecord {
    pub wallet_name: String,
    pub wallet_id: String,
    pub credential_definition_id: String,
}

/// An established holder-issuer connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvitationRecord {
    pub wallet_label: String,
    pub wallet_name: String,
    pub wallet_id: String,
    pub access_token: String,
    pub connection_id: String,
    pub issuer_connection_id: String,
    pub issuer_wallet_name: String,
    pub issuer_wallet_id: String,
    pub issuer_access_token: String,
    pub issuer_credential_definition_id: String,
}

/// An issued credential, from the issuer's side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub issuer_wallet_name: String,
    pub issuer_wallet_id: String,
    pub credential_exchange_id: String,
    pub issuer_access_token: String,
    pub issuer_credential_definition_id: String,
    pub issuer_connection_id: String,
    pub date_of_issue: String,
}

/// Timestamp stamped into `date_of_issue` for one issuance run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochRecord {
    pub epoch_timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_fields_are_ignored() {
        let line = concat!(
            r#"{"wallet_label":"holder 0","wallet_name":"holder_0","#,
            r#""wallet_id":"w","access_token":"t","extra":1}"#,
        );
        let record: TenantRecord = serde_json::from_str(line).unwrap();
        assert_eq!(record.wallet_name, "holder_0");
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let line = r#"{"issuer_wallet_name":"issuer_0","credential_exchange_id":"cx"}"#;
        assert!(serde_json::from_str::<CredentialRecord>(line).is_err());
    }
}
