//! The reference validator port and its in-memory adapter
//!
//! Coded fields pass through [`ReferenceValidator::validate`] before any
//! write. The production adapter is backed by the platform's reference data
//! service; the in-memory adapter here is seeded with the standard code sets
//! and serves tests and offline assemblies.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::collections::HashMap;

use core_kernel::DomainPort;

use crate::error::ReferenceError;
use crate::groups::{ReferenceDescription, ReferenceGroup};

/// Port for reference code validation
#[async_trait]
pub trait ReferenceValidator: DomainPort {
    /// Validates a code against a group
    ///
    /// # Returns
    ///
    /// The code's description, or [`ReferenceError::UnsupportedCode`]
    async fn validate(
        &self,
        group: ReferenceGroup,
        code: &str,
    ) -> Result<ReferenceDescription, ReferenceError>;

    /// Lists all codes in a group
    async fn list(&self, group: ReferenceGroup) -> Result<Vec<ReferenceDescription>, ReferenceError>;
}

type SeedEntry = (ReferenceGroup, &'static str, &'static str);

// The standard code sets shipped with the platform. Deployments extend
// these through the reference data service, not through this seed.
static STANDARD_CODES: Lazy<Vec<SeedEntry>> = Lazy::new(|| {
    use ReferenceGroup::*;
    vec![
        (Title, "MR", "Mr"),
        (Title, "MRS", "Mrs"),
        (Title, "MS", "Ms"),
        (Title, "DR", "Dr"),
        (Gender, "M", "Male"),
        (Gender, "F", "Female"),
        (Gender, "NK", "Not known"),
        (Language, "ENG", "English"),
        (Language, "POL", "Polish"),
        (Language, "URD", "Urdu"),
        (Language, "WEL", "Welsh"),
        (DomesticStatus, "S", "Single - not married or in a civil partnership"),
        (DomesticStatus, "M", "Married or in a civil partnership"),
        (DomesticStatus, "D", "Divorced or dissolved"),
        (DomesticStatus, "W", "Widowed"),
        (AddressType, "HOME", "Home address"),
        (AddressType, "WORK", "Work address"),
        (AddressType, "BUS", "Business address"),
        (City, "25343", "Sheffield"),
        (City, "17436", "Maidstone"),
        (City, "7375", "Birmingham"),
        (County, "S.YORKSHIRE", "South Yorkshire"),
        (County, "KENT", "Kent"),
        (County, "W.MIDLANDS", "West Midlands"),
        (Country, "ENG", "England"),
        (Country, "WALES", "Wales"),
        (Country, "SCOT", "Scotland"),
        (Country, "NI", "Northern Ireland"),
        (PhoneType, "MOB", "Mobile"),
        (PhoneType, "HOME", "Home"),
        (PhoneType, "BUS", "Business"),
        (IdentityType, "DL", "Driving licence"),
        (IdentityType, "PASS", "Passport number"),
        (IdentityType, "NINO", "National insurance number"),
        (RelationshipType, "S", "Social"),
        (RelationshipType, "O", "Official"),
        (SocialRelationship, "MOT", "Mother"),
        (SocialRelationship, "FA", "Father"),
        (SocialRelationship, "SIS", "Sister"),
        (SocialRelationship, "BRO", "Brother"),
        (SocialRelationship, "WIFE", "Wife"),
        (SocialRelationship, "HUS", "Husband"),
        (SocialRelationship, "FRI", "Friend"),
        (OfficialRelationship, "SOL", "Solicitor"),
        (OfficialRelationship, "DR", "Doctor"),
        (OfficialRelationship, "POM", "Prison offender manager"),
        (RestrictionType, "BAN", "Banned"),
        (RestrictionType, "CCTV", "CCTV"),
        (RestrictionType, "CLOSED", "Closed visit"),
        (RestrictionType, "NONCON", "Non-contact visit"),
    ]
});

/// In-memory reference data adapter
///
/// Seeded with the standard code sets; additional codes can be layered on
/// for tests via [`InMemoryReferenceData::with_code`].
#[derive(Debug, Clone)]
pub struct InMemoryReferenceData {
    codes: HashMap<(ReferenceGroup, String), String>,
}

impl Default for InMemoryReferenceData {
    fn default() -> Self {
        let codes = STANDARD_CODES
            .iter()
            .map(|(group, code, description)| {
                ((*group, (*code).to_string()), (*description).to_string())
            })
            .collect();
        Self { codes }
    }
}

impl InMemoryReferenceData {
    /// Creates an adapter seeded with the standard code sets
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an adapter with no codes at all
    pub fn empty() -> Self {
        Self {
            codes: HashMap::new(),
        }
    }

    /// Adds a code to the adapter
    pub fn with_code(
        mut self,
        group: ReferenceGroup,
        code: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.codes.insert((group, code.into()), description.into());
        self
    }
}

impl DomainPort for InMemoryReferenceData {}

#[async_trait]
impl ReferenceValidator for InMemoryReferenceData {
    async fn validate(
        &self,
        group: ReferenceGroup,
        code: &str,
    ) -> Result<ReferenceDescription, ReferenceError> {
        self.codes
            .get(&(group, code.to_string()))
            .map(|description| ReferenceDescription {
                group,
                code: code.to_string(),
                description: description.clone(),
            })
            .ok_or_else(|| ReferenceError::unsupported(group, code))
    }

    async fn list(&self, group: ReferenceGroup) -> Result<Vec<ReferenceDescription>, ReferenceError> {
        let mut entries: Vec<_> = self
            .codes
            .iter()
            .filter(|((entry_group, _), _)| *entry_group == group)
            .map(|((_, code), description)| ReferenceDescription {
                group,
                code: code.clone(),
                description: description.clone(),
            })
            .collect();
        entries.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_standard_codes_validate() {
        let reference = InMemoryReferenceData::new();

        let description = reference
            .validate(ReferenceGroup::SocialRelationship, "MOT")
            .await
            .unwrap();
        assert_eq!(description.description, "Mother");
    }

    #[tokio::test]
    async fn test_unknown_code_is_unsupported() {
        let reference = InMemoryReferenceData::new();

        let err = reference
            .validate(ReferenceGroup::Gender, "XX")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ReferenceError::UnsupportedCode { group: ReferenceGroup::Gender, ref code } if code == "XX"
        ));
        assert!(err.to_string().contains("GENDER"));
        assert!(err.to_string().contains("XX"));
    }

    #[tokio::test]
    async fn test_code_is_scoped_to_its_group() {
        let reference = InMemoryReferenceData::new();

        // MOT is a social relationship, not an official one
        assert!(reference
            .validate(ReferenceGroup::OfficialRelationship, "MOT")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_with_code_extends_the_seed() {
        let reference =
            InMemoryReferenceData::empty().with_code(ReferenceGroup::Title, "REV", "Reverend");

        assert!(reference.validate(ReferenceGroup::Title, "REV").await.is_ok());
        assert!(reference.validate(ReferenceGroup::Title, "MR").await.is_err());
    }

    #[tokio::test]
    async fn test_list_is_sorted_by_code() {
        let reference = InMemoryReferenceData::new();
        let entries = reference.list(ReferenceGroup::Gender).await.unwrap();

        let codes: Vec<_> = entries.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["F", "M", "NK"]);
    }
}
