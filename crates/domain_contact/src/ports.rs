//! Contact Domain Ports
//!
//! This module defines the port interfaces for the contact domain, enabling
//! swappable storage implementations (internal database, mock, etc.).
//!
//! The `ContactPort` trait defines all read/write operations the contact
//! domain needs from its data source, grouped per entity. Adapters are
//! expected to execute each call inside the ambient storage transaction and
//! to rely on row-level locking for check-then-write serialization; the
//! services never re-implement that.
//!
//! ```rust,ignore
//! use domain_contact::ports::ContactPort;
//! use std::sync::Arc;
//!
//! pub struct ContactService {
//!     port: Arc<dyn ContactPort>,
//! }
//! ```

use async_trait::async_trait;

use core_kernel::{
    ContactAddressId, ContactEmailId, ContactEmploymentId, ContactId, ContactIdentityId,
    ContactPhoneId, ContactRestrictionId, DomainPort, PortError,
};

use crate::address::ContactAddress;
use crate::contact::Contact;
use crate::email::ContactEmail;
use crate::employment::ContactEmployment;
use crate::identity::ContactIdentity;
use crate::phone::ContactPhone;
use crate::restriction::ContactRestriction;

/// The main port trait for contact domain storage
///
/// All methods are async and return `Result<T, PortError>` for consistent
/// error handling across adapter implementations. `save_*` methods upsert:
/// they insert on first sight of an identifier and replace afterwards.
#[async_trait]
pub trait ContactPort: DomainPort {
    // ========================================================================
    // Contacts
    // ========================================================================

    /// Retrieves a contact by ID
    async fn get_contact(&self, id: ContactId) -> Result<Contact, PortError>;

    /// Persists a contact
    async fn save_contact(&self, contact: &Contact) -> Result<(), PortError>;

    /// Checks whether a contact exists
    async fn contact_exists(&self, id: ContactId) -> Result<bool, PortError>;

    // ========================================================================
    // Addresses
    // ========================================================================

    /// Retrieves an address by ID, deleted rows included
    async fn get_address(&self, id: ContactAddressId) -> Result<ContactAddress, PortError>;

    /// Lists a contact's non-deleted addresses
    async fn find_addresses(&self, contact_id: ContactId)
        -> Result<Vec<ContactAddress>, PortError>;

    /// Persists an address
    async fn save_address(&self, address: &ContactAddress) -> Result<(), PortError>;

    // ========================================================================
    // Phones
    // ========================================================================

    /// Retrieves a phone by ID
    async fn get_phone(&self, id: ContactPhoneId) -> Result<ContactPhone, PortError>;

    /// Lists a contact's phones
    async fn find_phones(&self, contact_id: ContactId) -> Result<Vec<ContactPhone>, PortError>;

    /// Persists a phone
    async fn save_phone(&self, phone: &ContactPhone) -> Result<(), PortError>;

    /// Hard-deletes a phone
    async fn delete_phone(&self, id: ContactPhoneId) -> Result<(), PortError>;

    // ========================================================================
    // Emails
    // ========================================================================

    /// Retrieves an email by ID
    async fn get_email(&self, id: ContactEmailId) -> Result<ContactEmail, PortError>;

    /// Lists a contact's emails
    async fn find_emails(&self, contact_id: ContactId) -> Result<Vec<ContactEmail>, PortError>;

    /// Persists an email
    async fn save_email(&self, email: &ContactEmail) -> Result<(), PortError>;

    /// Hard-deletes an email
    async fn delete_email(&self, id: ContactEmailId) -> Result<(), PortError>;

    // ========================================================================
    // Identity documents
    // ========================================================================

    /// Retrieves an identity document by ID
    async fn get_identity(&self, id: ContactIdentityId) -> Result<ContactIdentity, PortError>;

    /// Lists a contact's identity documents
    async fn find_identities(
        &self,
        contact_id: ContactId,
    ) -> Result<Vec<ContactIdentity>, PortError>;

    /// Persists an identity document
    async fn save_identity(&self, identity: &ContactIdentity) -> Result<(), PortError>;

    /// Hard-deletes an identity document
    async fn delete_identity(&self, id: ContactIdentityId) -> Result<(), PortError>;

    // ========================================================================
    // Employments
    // ========================================================================

    /// Retrieves an employment by ID
    async fn get_employment(
        &self,
        id: ContactEmploymentId,
    ) -> Result<ContactEmployment, PortError>;

    /// Lists a contact's employments
    async fn find_employments(
        &self,
        contact_id: ContactId,
    ) -> Result<Vec<ContactEmployment>, PortError>;

    /// Persists an employment
    async fn save_employment(&self, employment: &ContactEmployment) -> Result<(), PortError>;

    /// Hard-deletes an employment
    async fn delete_employment(&self, id: ContactEmploymentId) -> Result<(), PortError>;

    // ========================================================================
    // Contact-global restrictions
    // ========================================================================

    /// Retrieves a restriction by ID
    async fn get_restriction(
        &self,
        id: ContactRestrictionId,
    ) -> Result<ContactRestriction, PortError>;

    /// Lists a contact's global restrictions
    async fn find_restrictions(
        &self,
        contact_id: ContactId,
    ) -> Result<Vec<ContactRestriction>, PortError>;

    /// Persists a restriction
    async fn save_restriction(&self, restriction: &ContactRestriction) -> Result<(), PortError>;
}

/// Mock implementation of ContactPort for testing
///
/// Stores everything in memory behind a single `RwLock`, which also gives
/// the check-then-write serialization the services rely on.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    #[derive(Debug, Default)]
    struct MockState {
        contacts: HashMap<ContactId, Contact>,
        addresses: HashMap<ContactAddressId, ContactAddress>,
        phones: HashMap<ContactPhoneId, ContactPhone>,
        emails: HashMap<ContactEmailId, ContactEmail>,
        identities: HashMap<ContactIdentityId, ContactIdentity>,
        employments: HashMap<ContactEmploymentId, ContactEmployment>,
        restrictions: HashMap<ContactRestrictionId, ContactRestriction>,
    }

    /// In-memory mock implementation of ContactPort
    #[derive(Debug, Default, Clone)]
    pub struct MockContactPort {
        state: Arc<RwLock<MockState>>,
    }

    impl MockContactPort {
        /// Creates a new mock port
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with contacts for testing
        pub async fn with_contacts(contacts: Vec<Contact>) -> Self {
            let port = Self::new();
            {
                let mut state = port.state.write().await;
                for contact in contacts {
                    state.contacts.insert(contact.id, contact);
                }
            }
            port
        }
    }

    impl DomainPort for MockContactPort {}

    #[async_trait]
    impl ContactPort for MockContactPort {
        async fn get_contact(&self, id: ContactId) -> Result<Contact, PortError> {
            self.state
                .read()
                .await
                .contacts
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Contact", id))
        }

        async fn save_contact(&self, contact: &Contact) -> Result<(), PortError> {
            self.state
                .write()
                .await
                .contacts
                .insert(contact.id, contact.clone());
            Ok(())
        }

        async fn contact_exists(&self, id: ContactId) -> Result<bool, PortError> {
            Ok(self.state.read().await.contacts.contains_key(&id))
        }

        async fn get_address(&self, id: ContactAddressId) -> Result<ContactAddress, PortError> {
            self.state
                .read()
                .await
                .addresses
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("ContactAddress", id))
        }

        async fn find_addresses(
            &self,
            contact_id: ContactId,
        ) -> Result<Vec<ContactAddress>, PortError> {
            let state = self.state.read().await;
            let mut addresses: Vec<_> = state
                .addresses
                .values()
                .filter(|a| a.contact_id == contact_id && !a.is_deleted())
                .cloned()
                .collect();
            addresses.sort_by_key(|a| a.created_at);
            Ok(addresses)
        }

        async fn save_address(&self, address: &ContactAddress) -> Result<(), PortError> {
            self.state
                .write()
                .await
                .addresses
                .insert(address.id, address.clone());
            Ok(())
        }

        async fn get_phone(&self, id: ContactPhoneId) -> Result<ContactPhone, PortError> {
            self.state
                .read()
                .await
                .phones
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("ContactPhone", id))
        }

        async fn find_phones(
            &self,
            contact_id: ContactId,
        ) -> Result<Vec<ContactPhone>, PortError> {
            let state = self.state.read().await;
            let mut phones: Vec<_> = state
                .phones
                .values()
                .filter(|p| p.contact_id == contact_id)
                .cloned()
                .collect();
            phones.sort_by_key(|p| p.created_at);
            Ok(phones)
        }

        async fn save_phone(&self, phone: &ContactPhone) -> Result<(), PortError> {
            self.state.write().await.phones.insert(phone.id, phone.clone());
            Ok(())
        }

        async fn delete_phone(&self, id: ContactPhoneId) -> Result<(), PortError> {
            self.state
                .write()
                .await
                .phones
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| PortError::not_found("ContactPhone", id))
        }

        async fn get_email(&self, id: ContactEmailId) -> Result<ContactEmail, PortError> {
            self.state
                .read()
                .await
                .emails
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("ContactEmail", id))
        }

        async fn find_emails(
            &self,
            contact_id: ContactId,
        ) -> Result<Vec<ContactEmail>, PortError> {
            let state = self.state.read().await;
            let mut emails: Vec<_> = state
                .emails
                .values()
                .filter(|e| e.contact_id == contact_id)
                .cloned()
                .collect();
            emails.sort_by_key(|e| e.created_at);
            Ok(emails)
        }

        async fn save_email(&self, email: &ContactEmail) -> Result<(), PortError> {
            self.state.write().await.emails.insert(email.id, email.clone());
            Ok(())
        }

        async fn delete_email(&self, id: ContactEmailId) -> Result<(), PortError> {
            self.state
                .write()
                .await
                .emails
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| PortError::not_found("ContactEmail", id))
        }

        async fn get_identity(&self, id: ContactIdentityId) -> Result<ContactIdentity, PortError> {
            self.state
                .read()
                .await
                .identities
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("ContactIdentity", id))
        }

        async fn find_identities(
            &self,
            contact_id: ContactId,
        ) -> Result<Vec<ContactIdentity>, PortError> {
            let state = self.state.read().await;
            let mut identities: Vec<_> = state
                .identities
                .values()
                .filter(|i| i.contact_id == contact_id)
                .cloned()
                .collect();
            identities.sort_by_key(|i| i.created_at);
            Ok(identities)
        }

        async fn save_identity(&self, identity: &ContactIdentity) -> Result<(), PortError> {
            self.state
                .write()
                .await
                .identities
                .insert(identity.id, identity.clone());
            Ok(())
        }

        async fn delete_identity(&self, id: ContactIdentityId) -> Result<(), PortError> {
            self.state
                .write()
                .await
                .identities
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| PortError::not_found("ContactIdentity", id))
        }

        async fn get_employment(
            &self,
            id: ContactEmploymentId,
        ) -> Result<ContactEmployment, PortError> {
            self.state
                .read()
                .await
                .employments
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("ContactEmployment", id))
        }

        async fn find_employments(
            &self,
            contact_id: ContactId,
        ) -> Result<Vec<ContactEmployment>, PortError> {
            let state = self.state.read().await;
            let mut employments: Vec<_> = state
                .employments
                .values()
                .filter(|e| e.contact_id == contact_id)
                .cloned()
                .collect();
            employments.sort_by_key(|e| e.created_at);
            Ok(employments)
        }

        async fn save_employment(&self, employment: &ContactEmployment) -> Result<(), PortError> {
            self.state
                .write()
                .await
                .employments
                .insert(employment.id, employment.clone());
            Ok(())
        }

        async fn delete_employment(&self, id: ContactEmploymentId) -> Result<(), PortError> {
            self.state
                .write()
                .await
                .employments
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| PortError::not_found("ContactEmployment", id))
        }

        async fn get_restriction(
            &self,
            id: ContactRestrictionId,
        ) -> Result<ContactRestriction, PortError> {
            self.state
                .read()
                .await
                .restrictions
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("ContactRestriction", id))
        }

        async fn find_restrictions(
            &self,
            contact_id: ContactId,
        ) -> Result<Vec<ContactRestriction>, PortError> {
            let state = self.state.read().await;
            let mut restrictions: Vec<_> = state
                .restrictions
                .values()
                .filter(|r| r.contact_id == contact_id)
                .cloned()
                .collect();
            restrictions.sort_by_key(|r| r.created_at);
            Ok(restrictions)
        }

        async fn save_restriction(
            &self,
            restriction: &ContactRestriction,
        ) -> Result<(), PortError> {
            self.state
                .write()
                .await
                .restrictions
                .insert(restriction.id, restriction.clone());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockContactPort;
    use super::*;
    use crate::contact::CreateContactRequest;

    fn sample_contact() -> Contact {
        Contact::new(
            CreateContactRequest {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                ..Default::default()
            },
            "OFFICER1",
        )
    }

    #[tokio::test]
    async fn test_mock_port_save_and_get() {
        let port = MockContactPort::new();
        let contact = sample_contact();

        port.save_contact(&contact).await.unwrap();

        let retrieved = port.get_contact(contact.id).await.unwrap();
        assert_eq!(retrieved.id, contact.id);
        assert_eq!(retrieved.last_name, "Doe");
    }

    #[tokio::test]
    async fn test_mock_port_not_found() {
        let port = MockContactPort::new();
        let result = port.get_contact(ContactId::new()).await;
        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_find_addresses_excludes_deleted() {
        use crate::address::{ContactAddress, CreateAddressRequest};

        let port = MockContactPort::new();
        let contact = sample_contact();
        port.save_contact(&contact).await.unwrap();

        let mut address = ContactAddress::new(
            contact.id,
            CreateAddressRequest::default(),
            "OFFICER1",
        );
        port.save_address(&address).await.unwrap();
        assert_eq!(port.find_addresses(contact.id).await.unwrap().len(), 1);

        address.deleted_at = Some(chrono::Utc::now());
        port.save_address(&address).await.unwrap();
        assert!(port.find_addresses(contact.id).await.unwrap().is_empty());

        // Still reachable directly
        assert!(port.get_address(address.id).await.is_ok());
    }
}
