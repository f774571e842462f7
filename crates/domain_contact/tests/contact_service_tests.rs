//! Comprehensive tests for the contact service use cases

use std::sync::Arc;

use core_kernel::{ContactId, Patch, RequestContext};
use domain_contact::{
    ContactError, ContactService, CreateContactRequest, CreateContactRestrictionRequest,
    CreateEmailRequest, CreatePhoneRequest, MockContactPort, PatchContactRequest,
    PatchEmailRequest, PatchPhoneRequest,
};
use domain_reference::{InMemoryReferenceData, ReferenceError};
use outbound_events::{CapturingPublisher, FailingPublisher, OutboundEventKind, PublishError};

fn context() -> RequestContext {
    RequestContext::new("OFFICER1")
}

fn create_request() -> CreateContactRequest {
    CreateContactRequest {
        title_code: Some("MR".to_string()),
        first_name: "John".to_string(),
        last_name: "Smith".to_string(),
        gender_code: Some("M".to_string()),
        language_code: Some("ENG".to_string()),
        domestic_status_code: Some("S".to_string()),
        ..Default::default()
    }
}

fn build_service() -> (ContactService, Arc<MockContactPort>, CapturingPublisher) {
    let port = Arc::new(MockContactPort::new());
    let publisher = CapturingPublisher::new();
    let service = ContactService::new(
        port.clone(),
        Arc::new(InMemoryReferenceData::new()),
        Arc::new(publisher.clone()),
    );
    (service, port, publisher)
}

mod create_contact {
    use super::*;

    #[tokio::test]
    async fn test_create_emits_exactly_one_event() {
        let (service, _, publisher) = build_service();

        let contact = service
            .create_contact(create_request(), &context())
            .await
            .unwrap();

        assert_eq!(publisher.len().await, 1);
        let events = publisher
            .events_of_kind(OutboundEventKind::ContactCreated)
            .await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].entity_id, contact.id.to_string());
        assert_eq!(events[0].person_reference.contact_id, Some(contact.id));
        assert_eq!(events[0].username, "OFFICER1");
    }

    #[tokio::test]
    async fn test_unsupported_code_prevents_write_and_event() {
        let (service, _, publisher) = build_service();

        let request = CreateContactRequest {
            gender_code: Some("BOGUS".to_string()),
            ..create_request()
        };
        let err = service.create_contact(request, &context()).await.unwrap_err();

        assert!(matches!(
            err,
            ContactError::Reference(ReferenceError::UnsupportedCode { ref code, .. }) if code == "BOGUS"
        ));
        assert!(publisher.is_empty().await);
    }

    #[tokio::test]
    async fn test_length_constraint_is_enforced() {
        let (service, _, publisher) = build_service();

        let request = CreateContactRequest {
            first_name: "x".repeat(36),
            ..create_request()
        };
        let err = service.create_contact(request, &context()).await.unwrap_err();

        assert!(matches!(err, ContactError::Constraint(_)));
        assert!(publisher.is_empty().await);
    }
}

mod patch_contact {
    use super::*;

    #[tokio::test]
    async fn test_absent_fields_are_untouched() {
        let (service, _, publisher) = build_service();
        let contact = service
            .create_contact(create_request(), &context())
            .await
            .unwrap();
        publisher.clear().await;

        let patched = service
            .patch_contact(
                contact.id,
                PatchContactRequest {
                    first_name: Patch::Value("Jonathan".to_string()),
                    ..Default::default()
                },
                &context(),
            )
            .await
            .unwrap();

        assert_eq!(patched.first_name, "Jonathan");
        assert_eq!(patched.last_name, "Smith");
        assert_eq!(patched.title_code.as_deref(), Some("MR"));
        assert_eq!(patched.gender_code.as_deref(), Some("M"));
        assert_eq!(publisher.len().await, 1);
    }

    #[tokio::test]
    async fn test_null_clears_nullable_field() {
        let (service, _, _) = build_service();
        let contact = service
            .create_contact(create_request(), &context())
            .await
            .unwrap();

        let patched = service
            .patch_contact(
                contact.id,
                PatchContactRequest {
                    domestic_status_code: Patch::Null,
                    ..Default::default()
                },
                &context(),
            )
            .await
            .unwrap();

        assert!(patched.domestic_status_code.is_none());
    }

    #[tokio::test]
    async fn test_null_on_non_nullable_field_is_rejected() {
        let (service, _, publisher) = build_service();
        let contact = service
            .create_contact(create_request(), &context())
            .await
            .unwrap();
        publisher.clear().await;

        let err = service
            .patch_contact(
                contact.id,
                PatchContactRequest {
                    is_staff: Patch::Null,
                    ..Default::default()
                },
                &context(),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ContactError::UnsupportedValue { field } if field == "isStaff"
        ));

        // The stored value is unchanged and no event fired
        let stored = service.get_contact(contact.id).await.unwrap();
        assert!(!stored.is_staff);
        assert!(publisher.is_empty().await);
    }

    #[tokio::test]
    async fn test_validate_all_then_commit_all() {
        let (service, _, publisher) = build_service();
        let contact = service
            .create_contact(create_request(), &context())
            .await
            .unwrap();
        publisher.clear().await;

        // A valid name change combined with an invalid code: nothing applies
        let err = service
            .patch_contact(
                contact.id,
                PatchContactRequest {
                    first_name: Patch::Value("Changed".to_string()),
                    language_code: Patch::Value("NOPE".to_string()),
                    ..Default::default()
                },
                &context(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ContactError::Reference(_)));

        let stored = service.get_contact(contact.id).await.unwrap();
        assert_eq!(stored.first_name, "John");
        assert!(publisher.is_empty().await);
    }

    #[tokio::test]
    async fn test_patch_unknown_contact_is_not_found() {
        let (service, _, _) = build_service();
        let missing = ContactId::new();

        let err = service
            .patch_contact(missing, PatchContactRequest::default(), &context())
            .await
            .unwrap_err();

        assert!(matches!(err, ContactError::ContactNotFound(id) if id == missing));
        assert!(err.to_string().contains(&missing.to_string()));
    }
}

mod phones {
    use super::*;

    #[tokio::test]
    async fn test_phone_lifecycle_events() {
        let (service, _, publisher) = build_service();
        let contact = service
            .create_contact(create_request(), &context())
            .await
            .unwrap();
        publisher.clear().await;

        let phone = service
            .create_phone(
                contact.id,
                CreatePhoneRequest {
                    phone_type_code: "MOB".to_string(),
                    phone_number: "07700 900000".to_string(),
                    ext_number: None,
                },
                &context(),
            )
            .await
            .unwrap();

        service
            .patch_phone(
                phone.id,
                PatchPhoneRequest {
                    phone_number: Patch::Value("07700 900001".to_string()),
                    ..Default::default()
                },
                &context(),
            )
            .await
            .unwrap();

        service.delete_phone(phone.id, &context()).await.unwrap();

        assert_eq!(publisher.len().await, 3);
        assert_eq!(
            publisher
                .events_of_kind(OutboundEventKind::ContactPhoneCreated)
                .await
                .len(),
            1
        );
        assert_eq!(
            publisher
                .events_of_kind(OutboundEventKind::ContactPhoneUpdated)
                .await
                .len(),
            1
        );
        assert_eq!(
            publisher
                .events_of_kind(OutboundEventKind::ContactPhoneDeleted)
                .await
                .len(),
            1
        );

        // The phone is gone
        let err = service
            .patch_phone(phone.id, Default::default(), &context())
            .await
            .unwrap_err();
        assert!(matches!(err, ContactError::PhoneNotFound(_)));
    }

    #[tokio::test]
    async fn test_unsupported_phone_type_rejected() {
        let (service, _, publisher) = build_service();
        let contact = service
            .create_contact(create_request(), &context())
            .await
            .unwrap();
        publisher.clear().await;

        let err = service
            .create_phone(
                contact.id,
                CreatePhoneRequest {
                    phone_type_code: "PAGER".to_string(),
                    phone_number: "123".to_string(),
                    ext_number: None,
                },
                &context(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ContactError::Reference(_)));
        assert!(publisher.is_empty().await);
    }
}

mod emails {
    use super::*;

    #[tokio::test]
    async fn test_email_null_rejected_on_patch() {
        let (service, _, _) = build_service();
        let contact = service
            .create_contact(create_request(), &context())
            .await
            .unwrap();

        let email = service
            .create_email(
                contact.id,
                CreateEmailRequest {
                    email_address: "john@example.com".to_string(),
                },
                &context(),
            )
            .await
            .unwrap();

        let err = service
            .patch_email(
                email.id,
                PatchEmailRequest {
                    email_address: Patch::Null,
                },
                &context(),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ContactError::UnsupportedValue { field } if field == "emailAddress"
        ));
    }

    #[tokio::test]
    async fn test_malformed_email_rejected() {
        let (service, _, _) = build_service();
        let contact = service
            .create_contact(create_request(), &context())
            .await
            .unwrap();

        let err = service
            .create_email(
                contact.id,
                CreateEmailRequest {
                    email_address: "not-an-email".to_string(),
                },
                &context(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ContactError::Constraint(_)));
    }
}

mod restrictions {
    use super::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_expiry_before_start_rejected() {
        let (service, _, publisher) = build_service();
        let contact = service
            .create_contact(create_request(), &context())
            .await
            .unwrap();
        publisher.clear().await;

        let err = service
            .create_restriction(
                contact.id,
                CreateContactRestrictionRequest {
                    restriction_type_code: "BAN".to_string(),
                    start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                    expiry_date: Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
                    comments: None,
                },
                &context(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ContactError::Constraint(_)));
        assert!(publisher.is_empty().await);
    }

    #[tokio::test]
    async fn test_restriction_created_with_event() {
        let (service, _, publisher) = build_service();
        let contact = service
            .create_contact(create_request(), &context())
            .await
            .unwrap();
        publisher.clear().await;

        service
            .create_restriction(
                contact.id,
                CreateContactRestrictionRequest {
                    restriction_type_code: "BAN".to_string(),
                    start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                    expiry_date: None,
                    comments: Some("Assault on visit".to_string()),
                },
                &context(),
            )
            .await
            .unwrap();

        assert_eq!(
            publisher
                .events_of_kind(OutboundEventKind::ContactRestrictionCreated)
                .await
                .len(),
            1
        );
    }
}

mod event_sink_failure {
    use super::*;

    #[tokio::test]
    async fn test_publish_failure_surfaces_but_write_stands() {
        let port = Arc::new(MockContactPort::new());
        let working = ContactService::new(
            port.clone(),
            Arc::new(InMemoryReferenceData::new()),
            Arc::new(CapturingPublisher::new()),
        );
        let contact = working
            .create_contact(create_request(), &context())
            .await
            .unwrap();

        // Same storage, broken sink
        let broken = ContactService::new(
            port.clone(),
            Arc::new(InMemoryReferenceData::new()),
            Arc::new(FailingPublisher),
        );
        let err = broken
            .patch_contact(
                contact.id,
                PatchContactRequest {
                    first_name: Patch::Value("Renamed".to_string()),
                    ..Default::default()
                },
                &context(),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ContactError::Publish(PublishError::SinkUnavailable(_))
        ));

        // The write committed before the sink was called and is not undone
        let stored = working.get_contact(contact.id).await.unwrap();
        assert_eq!(stored.first_name, "Renamed");
    }
}
