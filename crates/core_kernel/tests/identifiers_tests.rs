//! Tests for identifier types

use core_kernel::{
    ContactAddressId, ContactId, PrisonerNumber, RelationshipId, RequestContext, Source,
};
use std::collections::HashSet;

#[test]
fn test_identifiers_are_unique() {
    let mut seen = HashSet::new();
    for _ in 0..100 {
        assert!(seen.insert(ContactId::new()));
    }
}

#[test]
fn test_identifier_prefixes() {
    assert_eq!(ContactId::prefix(), "CNT");
    assert_eq!(ContactAddressId::prefix(), "ADDR");
    assert_eq!(RelationshipId::prefix(), "REL");
}

#[test]
fn test_v7_identifiers_are_time_ordered() {
    let first = ContactId::new_v7();
    let second = ContactId::new_v7();
    assert!(first.as_uuid() <= second.as_uuid());
}

#[test]
fn test_parse_round_trip_with_and_without_prefix() {
    let id = ContactAddressId::new();

    let with_prefix: ContactAddressId = id.to_string().parse().unwrap();
    assert_eq!(with_prefix, id);

    let bare: ContactAddressId = id.as_uuid().to_string().parse().unwrap();
    assert_eq!(bare, id);
}

#[test]
fn test_prisoner_number_format() {
    assert!(PrisonerNumber::new("A1234BC").is_ok());
    assert!(PrisonerNumber::new("Z9999ZZ").is_ok());
    assert!(PrisonerNumber::new("A123BC").is_err());
    assert!(PrisonerNumber::new(" A1234BC").is_err());
}

#[test]
fn test_request_context_defaults() {
    let context = RequestContext::new("OFFICER1");
    assert_eq!(context.source, Source::CaseManagement);
    assert!(context.active_site.is_none());
}
