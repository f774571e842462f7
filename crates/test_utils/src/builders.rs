//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible
//! defaults. These builders allow tests to specify only the relevant fields
//! while using defaults for everything else.

use core_kernel::{ContactId, PrisonerNumber};
use domain_contact::{Contact, CreateAddressRequest, CreateContactRequest};
use domain_relationship::{CreateRelationshipRequest, PrisonerContactRelationship};

use crate::fixtures;

/// Builder for constructing test contacts
pub struct ContactBuilder {
    request: CreateContactRequest,
    created_by: String,
}

impl Default for ContactBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            request: CreateContactRequest {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                ..Default::default()
            },
            created_by: "OFFICER1".to_string(),
        }
    }

    /// Uses randomly generated name parts
    pub fn with_random_name(mut self) -> Self {
        self.request.first_name = fixtures::random_first_name();
        self.request.last_name = fixtures::random_last_name();
        self
    }

    /// Sets the first name
    pub fn with_first_name(mut self, name: impl Into<String>) -> Self {
        self.request.first_name = name.into();
        self
    }

    /// Sets the last name
    pub fn with_last_name(mut self, name: impl Into<String>) -> Self {
        self.request.last_name = name.into();
        self
    }

    /// Marks the contact as staff
    pub fn staff(mut self) -> Self {
        self.request.is_staff = true;
        self
    }

    /// Sets the creating username
    pub fn created_by(mut self, username: impl Into<String>) -> Self {
        self.created_by = username.into();
        self
    }

    /// Builds the creation request
    pub fn build_request(self) -> CreateContactRequest {
        self.request
    }

    /// Builds the contact entity directly
    pub fn build(self) -> Contact {
        Contact::new(self.request, self.created_by)
    }
}

/// Builder for constructing address creation requests
pub struct AddressBuilder {
    request: CreateAddressRequest,
}

impl Default for AddressBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressBuilder {
    /// Creates a new builder with a plausible English address
    pub fn new() -> Self {
        Self {
            request: CreateAddressRequest {
                property: Some("12".to_string()),
                street: Some("High Street".to_string()),
                postcode: Some("S1 1AA".to_string()),
                city_code: Some("25343".to_string()),
                country_code: Some("ENG".to_string()),
                ..Default::default()
            },
        }
    }

    /// Claims the primary flag
    pub fn primary(mut self) -> Self {
        self.request.primary_address = true;
        self
    }

    /// Claims the mail flag
    pub fn mail(mut self) -> Self {
        self.request.mail_address = true;
        self
    }

    /// Sets the postcode
    pub fn with_postcode(mut self, postcode: impl Into<String>) -> Self {
        self.request.postcode = Some(postcode.into());
        self
    }

    /// Builds the creation request
    pub fn build(self) -> CreateAddressRequest {
        self.request
    }
}

/// Builder for constructing test relationships
pub struct RelationshipBuilder {
    request: CreateRelationshipRequest,
    current_term: bool,
    created_by: String,
}

impl RelationshipBuilder {
    /// Creates a builder linking the given contact to the canonical
    /// prisoner as a social "mother" relationship
    pub fn new(contact_id: ContactId) -> Self {
        Self {
            request: CreateRelationshipRequest {
                contact_id,
                prisoner_number: fixtures::prisoner_number(),
                relationship_type_code: "S".to_string(),
                relationship_to_prisoner_code: "MOT".to_string(),
                next_of_kin: false,
                emergency_contact: false,
                approved_visitor: false,
                comments: None,
            },
            current_term: true,
            created_by: "OFFICER1".to_string(),
        }
    }

    /// Sets the prisoner number
    pub fn with_prisoner(mut self, prisoner_number: PrisonerNumber) -> Self {
        self.request.prisoner_number = prisoner_number;
        self
    }

    /// Sets the relationship type and to-prisoner codes
    pub fn with_codes(
        mut self,
        type_code: impl Into<String>,
        to_prisoner_code: impl Into<String>,
    ) -> Self {
        self.request.relationship_type_code = type_code.into();
        self.request.relationship_to_prisoner_code = to_prisoner_code.into();
        self
    }

    /// Marks the contact as next of kin
    pub fn next_of_kin(mut self) -> Self {
        self.request.next_of_kin = true;
        self
    }

    /// Builds an entity from an earlier custody term
    pub fn historical(mut self) -> Self {
        self.current_term = false;
        self
    }

    /// Builds the creation request
    pub fn build_request(self) -> CreateRelationshipRequest {
        self.request
    }

    /// Builds the relationship entity directly (for seeding storage)
    pub fn build(self) -> PrisonerContactRelationship {
        let mut relationship = PrisonerContactRelationship::new(self.request, self.created_by);
        relationship.current_term = self.current_term;
        if !self.current_term {
            relationship.active = false;
        }
        relationship
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_builder_defaults() {
        let contact = ContactBuilder::new().build();
        assert_eq!(contact.display_name(), "Jane Doe");
        assert!(!contact.is_staff);
    }

    #[test]
    fn test_address_builder_flags() {
        let request = AddressBuilder::new().primary().mail().build();
        assert!(request.primary_address);
        assert!(request.mail_address);
    }

    #[test]
    fn test_relationship_builder_historical() {
        let relationship = RelationshipBuilder::new(ContactId::new()).historical().build();
        assert!(!relationship.current_term);
        assert!(!relationship.active);
    }
}
