//! The phases of the issuance load test, in run order

mod credentials;
mod definitions;
mod holders;
mod invitation;
mod issuers;
mod proof;
mod revocation;
mod schemas;

pub use credentials::CreateCredentials;
pub use definitions::CreateCredentialDefinitions;
pub use holders::{CreateHolders, DeleteHolders};
pub use invitation::CreateInvitation;
pub use issuers::CreateIssuers;
pub use proof::CreateProof;
pub use revocation::{PublishRevoke, RevokeCredentials};
pub use schemas::CreateSchemas;

use crate::driver::Phase;
use crate::error::{ScenarioError, ScenarioResult};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Delay between attempts for the iteration-level retries
pub(crate) const RETRY_DELAY: Duration = Duration::from_secs(2);
pub(crate) const RETRIES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    CreateHolders,
    CreateIssuers,
    CreateSchemas,
    CreateCredDef,
    CreateInvitation,
    CreateCredentials,
    CreateProof,
    RevokeCredentials,
    PublishRevoke,
    DeleteHolders,
}

impl PhaseKind {
    pub const ALL: [PhaseKind; 10] = [
        PhaseKind::CreateHolders,
        PhaseKind::CreateIssuers,
        PhaseKind::CreateSchemas,
        PhaseKind::CreateCredDef,
        PhaseKind::CreateInvitation,
        PhaseKind::CreateCredentials,
        PhaseKind::CreateProof,
        PhaseKind::RevokeCredentials,
        PhaseKind::PublishRevoke,
        PhaseKind::DeleteHolders,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PhaseKind::CreateHolders => "create-holders",
            PhaseKind::CreateIssuers => "create-issuers",
            PhaseKind::CreateSchemas => "create-schemas",
            PhaseKind::CreateCredDef => "create-creddef",
            PhaseKind::CreateInvitation => "create-invitation",
            PhaseKind::CreateCredentials => "create-credentials",
            PhaseKind::CreateProof => "create-proof",
            PhaseKind::RevokeCredentials => "revoke-credentials",
            PhaseKind::PublishRevoke => "publish-revoke",
            PhaseKind::DeleteHolders => "delete-holders",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PhaseKind::CreateHolders => "Provision holder wallets",
            PhaseKind::CreateIssuers => "Provision issuer wallets and check the trust registry",
            PhaseKind::CreateSchemas => "Create uniquely versioned schemas",
            PhaseKind::CreateCredDef => "Create a credential definition per issuer",
            PhaseKind::CreateInvitation => "Connect each holder to an issuer",
            PhaseKind::CreateCredentials => "Issue a credential over each connection",
            PhaseKind::CreateProof => "Request and verify a proof over each connection",
            PhaseKind::RevokeCredentials => "Revoke issued credentials",
            PhaseKind::PublishRevoke => "Publish pending revocations and confirm them",
            PhaseKind::DeleteHolders => "Delete holder wallets",
        }
    }

    pub fn build(&self) -> Box<dyn Phase> {
        match self {
            PhaseKind::CreateHolders => Box::new(CreateHolders::default()),
            PhaseKind::CreateIssuers => Box::new(CreateIssuers::default()),
            PhaseKind::CreateSchemas => Box::new(CreateSchemas::default()),
            PhaseKind::CreateCredDef => Box::new(CreateCredentialDefinitions::default()),
            PhaseKind::CreateInvitation => Box::new(CreateInvitation::default()),
            PhaseKind::CreateCredentials => Box::new(CreateCredentials::default()),
            PhaseKind::CreateProof => Box::new(CreateProof::default()),
            PhaseKind::RevokeCredentials => Box::new(RevokeCredentials::default()),
            PhaseKind::PublishRevoke => Box::new(PublishRevoke::default()),
            PhaseKind::DeleteHolders => Box::new(DeleteHolders),
        }
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PhaseKind {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PhaseKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ScenarioError::UnknownPhase(s.to_string()))
    }
}

/// Seeded wallet label and name for slot `index`: `"<prefix> <i>"`, `"<prefix>_<i>"`
pub(crate) fn seed_names(prefix: &str, index: usize) -> (String, String) {
    (format!("{} {}", prefix, index), format!("{}_{}", prefix, index))
}

/// State populated by `setup`
pub(crate) fn prepared<'a, T>(slot: &'a Option<T>, what: &str) -> ScenarioResult<&'a T> {
    slot.as_ref()
        .ok_or_else(|| ScenarioError::missing(format!("{} (setup has not run)", what)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for kind in PhaseKind::ALL {
            assert_eq!(kind.name().parse::<PhaseKind>().unwrap(), kind);
            assert_eq!(kind.build().name(), kind.name());
        }
        assert!(matches!(
            "create-everything".parse::<PhaseKind>(),
            Err(ScenarioError::UnknownPhase(_))
        ));
    }

    #[test]
    fn test_seed_names() {
        assert_eq!(
            seed_names("holder", 3),
            ("holder 3".to_string(), "holder_3".to_string())
        );
    }
}
