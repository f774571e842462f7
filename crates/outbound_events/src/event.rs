//! Outbound domain event shapes
//!
//! One event is emitted per successful mutation per affected row. Events are
//! ephemeral in this core: they are handed to the sink and never persisted
//! or retried here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ContactId, PrisonerNumber, RequestContext, Source};

/// The kind of an outbound event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutboundEventKind {
    ContactCreated,
    ContactUpdated,
    ContactAddressCreated,
    ContactAddressUpdated,
    ContactAddressDeleted,
    ContactPhoneCreated,
    ContactPhoneUpdated,
    ContactPhoneDeleted,
    ContactEmailCreated,
    ContactEmailUpdated,
    ContactEmailDeleted,
    ContactIdentityCreated,
    ContactIdentityUpdated,
    ContactIdentityDeleted,
    ContactEmploymentCreated,
    ContactEmploymentUpdated,
    ContactEmploymentDeleted,
    ContactRestrictionCreated,
    ContactRestrictionUpdated,
    PrisonerContactCreated,
    PrisonerContactUpdated,
    PrisonerContactDeleted,
    PrisonerContactRestrictionCreated,
    PrisonerContactRestrictionUpdated,
    DomesticStatusCreated,
    NumberOfChildrenCreated,
}

impl OutboundEventKind {
    /// Returns the dotted event type name used on the wire
    pub fn event_type(&self) -> &'static str {
        match self {
            OutboundEventKind::ContactCreated => "contacts-api.contact.created",
            OutboundEventKind::ContactUpdated => "contacts-api.contact.updated",
            OutboundEventKind::ContactAddressCreated => "contacts-api.contact-address.created",
            OutboundEventKind::ContactAddressUpdated => "contacts-api.contact-address.updated",
            OutboundEventKind::ContactAddressDeleted => "contacts-api.contact-address.deleted",
            OutboundEventKind::ContactPhoneCreated => "contacts-api.contact-phone.created",
            OutboundEventKind::ContactPhoneUpdated => "contacts-api.contact-phone.updated",
            OutboundEventKind::ContactPhoneDeleted => "contacts-api.contact-phone.deleted",
            OutboundEventKind::ContactEmailCreated => "contacts-api.contact-email.created",
            OutboundEventKind::ContactEmailUpdated => "contacts-api.contact-email.updated",
            OutboundEventKind::ContactEmailDeleted => "contacts-api.contact-email.deleted",
            OutboundEventKind::ContactIdentityCreated => "contacts-api.contact-identity.created",
            OutboundEventKind::ContactIdentityUpdated => "contacts-api.contact-identity.updated",
            OutboundEventKind::ContactIdentityDeleted => "contacts-api.contact-identity.deleted",
            OutboundEventKind::ContactEmploymentCreated => {
                "contacts-api.contact-employment.created"
            }
            OutboundEventKind::ContactEmploymentUpdated => {
                "contacts-api.contact-employment.updated"
            }
            OutboundEventKind::ContactEmploymentDeleted => {
                "contacts-api.contact-employment.deleted"
            }
            OutboundEventKind::ContactRestrictionCreated => {
                "contacts-api.contact-restriction.created"
            }
            OutboundEventKind::ContactRestrictionUpdated => {
                "contacts-api.contact-restriction.updated"
            }
            OutboundEventKind::PrisonerContactCreated => "contacts-api.prisoner-contact.created",
            OutboundEventKind::PrisonerContactUpdated => "contacts-api.prisoner-contact.updated",
            OutboundEventKind::PrisonerContactDeleted => "contacts-api.prisoner-contact.deleted",
            OutboundEventKind::PrisonerContactRestrictionCreated => {
                "contacts-api.prisoner-contact-restriction.created"
            }
            OutboundEventKind::PrisonerContactRestrictionUpdated => {
                "contacts-api.prisoner-contact-restriction.updated"
            }
            OutboundEventKind::DomesticStatusCreated => "contacts-api.domestic-status.created",
            OutboundEventKind::NumberOfChildrenCreated => {
                "contacts-api.number-of-children.created"
            }
        }
    }
}

/// Reference to the person (or people) an event is about.
///
/// Always carries the contact id when a contact is involved and the
/// prisoner number when a prisoner relationship is involved; both may be
/// present simultaneously.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonReference {
    /// The contact the event relates to, if any
    pub contact_id: Option<ContactId>,
    /// The prisoner the event relates to, if any
    pub prisoner_number: Option<PrisonerNumber>,
}

impl PersonReference {
    /// References a contact only
    pub fn contact(contact_id: ContactId) -> Self {
        Self {
            contact_id: Some(contact_id),
            prisoner_number: None,
        }
    }

    /// References a prisoner only
    pub fn prisoner(prisoner_number: PrisonerNumber) -> Self {
        Self {
            contact_id: None,
            prisoner_number: Some(prisoner_number),
        }
    }

    /// References both sides of a relationship
    pub fn relationship(contact_id: ContactId, prisoner_number: PrisonerNumber) -> Self {
        Self {
            contact_id: Some(contact_id),
            prisoner_number: Some(prisoner_number),
        }
    }
}

/// A single outbound domain event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundEvent {
    /// What happened
    pub kind: OutboundEventKind,
    /// Origin of the mutation
    pub source: Source,
    /// Username of the acting user
    pub username: String,
    /// Site the user was operating under, when known
    pub active_site: Option<String>,
    /// Identifier of the affected entity, in display form
    pub entity_id: String,
    /// The person(s) the event is about
    pub person_reference: PersonReference,
    /// When the mutation occurred
    pub occurred_at: DateTime<Utc>,
}

impl OutboundEvent {
    /// Builds an event from the request context that drove the mutation
    pub fn new(
        kind: OutboundEventKind,
        context: &RequestContext,
        entity_id: impl ToString,
        person_reference: PersonReference,
    ) -> Self {
        Self {
            kind,
            source: context.source,
            username: context.username.clone(),
            active_site: context.active_site.clone(),
            entity_id: entity_id.to_string(),
            person_reference,
            occurred_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_names() {
        assert_eq!(
            OutboundEventKind::PrisonerContactCreated.event_type(),
            "contacts-api.prisoner-contact.created"
        );
        assert_eq!(
            OutboundEventKind::ContactAddressUpdated.event_type(),
            "contacts-api.contact-address.updated"
        );
    }

    #[test]
    fn test_event_carries_context() {
        let context = RequestContext::new("OFFICER1").with_active_site("LEI");
        let contact_id = ContactId::new();
        let event = OutboundEvent::new(
            OutboundEventKind::ContactCreated,
            &context,
            contact_id,
            PersonReference::contact(contact_id),
        );

        assert_eq!(event.username, "OFFICER1");
        assert_eq!(event.active_site.as_deref(), Some("LEI"));
        assert_eq!(event.source, Source::CaseManagement);
        assert_eq!(event.entity_id, contact_id.to_string());
    }

    #[test]
    fn test_person_reference_for_relationship() {
        let contact_id = ContactId::new();
        let prisoner = PrisonerNumber::new("A1234BC").unwrap();
        let reference = PersonReference::relationship(contact_id, prisoner.clone());

        assert_eq!(reference.contact_id, Some(contact_id));
        assert_eq!(reference.prisoner_number, Some(prisoner));
    }
}
