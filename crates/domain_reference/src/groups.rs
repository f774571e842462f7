//! Reference code groups
//!
//! Every coded field in the system names the group its codes belong to.
//! Groups are closed: an unknown group cannot be expressed at the type
//! level, so validation failures are always about the code, never the group.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The group a reference code belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferenceGroup {
    /// Honorifics (MR, MRS, DR, ...)
    Title,
    /// Gender codes
    Gender,
    /// Spoken languages
    Language,
    /// Domestic status (single, married, ...)
    DomesticStatus,
    /// Address classification (HOME, WORK, ...)
    AddressType,
    /// Cities
    City,
    /// Counties
    County,
    /// Countries
    Country,
    /// Phone classification (MOB, HOME, BUS, ...)
    PhoneType,
    /// Identity document types (driving licence, passport, ...)
    IdentityType,
    /// Whether a relationship is social or official
    RelationshipType,
    /// Social relationship to the prisoner (mother, friend, ...)
    SocialRelationship,
    /// Official relationship to the prisoner (solicitor, doctor, ...)
    OfficialRelationship,
    /// Restriction classification (banned, closed visit, ...)
    RestrictionType,
}

impl ReferenceGroup {
    /// Returns the canonical group code used by the reference data service
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceGroup::Title => "TITLE",
            ReferenceGroup::Gender => "GENDER",
            ReferenceGroup::Language => "LANGUAGE",
            ReferenceGroup::DomesticStatus => "DOMESTIC_STS",
            ReferenceGroup::AddressType => "ADDRESS_TYPE",
            ReferenceGroup::City => "CITY",
            ReferenceGroup::County => "COUNTY",
            ReferenceGroup::Country => "COUNTRY",
            ReferenceGroup::PhoneType => "PHONE_TYPE",
            ReferenceGroup::IdentityType => "ID_TYPE",
            ReferenceGroup::RelationshipType => "RELATIONSHIP_TYPE",
            ReferenceGroup::SocialRelationship => "SOCIAL_RELATIONSHIP",
            ReferenceGroup::OfficialRelationship => "OFFICIAL_RELATIONSHIP",
            ReferenceGroup::RestrictionType => "RESTRICTION",
        }
    }
}

impl fmt::Display for ReferenceGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated reference code with its human-readable description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceDescription {
    /// The group the code belongs to
    pub group: ReferenceGroup,
    /// The code itself
    pub code: String,
    /// Display description
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_codes_are_stable() {
        assert_eq!(ReferenceGroup::DomesticStatus.as_str(), "DOMESTIC_STS");
        assert_eq!(ReferenceGroup::SocialRelationship.to_string(), "SOCIAL_RELATIONSHIP");
    }

    #[test]
    fn test_group_serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&ReferenceGroup::AddressType).unwrap();
        assert_eq!(json, "\"ADDRESS_TYPE\"");
    }
}
