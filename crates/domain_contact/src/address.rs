//! Contact addresses and the exclusivity planner
//!
//! A contact owns any number of addresses, but at most one non-deleted
//! address may be the primary address and at most one may be the mail
//! address (the same address may be both). The invariant is maintained by
//! [`plan_flag_changes`], which computes the full set of rows whose flags
//! must change so that claiming a flag on one address releases it on every
//! sibling. Keeping the plan a pure value means the caller applies it
//! inside its storage transaction and emits one update event per changed
//! row afterwards — no event for rows the plan left alone.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{ContactAddressId, ContactId, Patch};

/// A postal address owned by a contact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactAddress {
    /// Unique address identifier
    pub id: ContactAddressId,
    /// Owning contact
    pub contact_id: ContactId,
    /// Coded address classification (ADDRESS_TYPE group)
    pub address_type_code: Option<String>,
    /// Flat number or name
    pub flat: Option<String>,
    /// House name or number
    pub property: Option<String>,
    /// Street
    pub street: Option<String>,
    /// Locality
    pub area: Option<String>,
    /// Coded city (CITY group)
    pub city_code: Option<String>,
    /// Coded county (COUNTY group)
    pub county_code: Option<String>,
    /// Postcode
    pub postcode: Option<String>,
    /// Coded country (COUNTRY group)
    pub country_code: Option<String>,
    /// The contact has no fixed address; structural fields are advisory
    pub no_fixed_address: bool,
    /// At most one non-deleted address per contact may hold this flag
    pub primary_address: bool,
    /// At most one non-deleted address per contact may hold this flag
    pub mail_address: bool,
    /// Date the contact started using the address
    pub start_date: Option<NaiveDate>,
    /// Free-text comments
    pub comments: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated_at: DateTime<Utc>,
    /// Soft-deletion marker; a deleted address is excluded from listings
    /// and from the exclusivity invariant
    pub deleted_at: Option<DateTime<Utc>>,
}

impl ContactAddress {
    /// Creates a new address from a validated request
    pub fn new(
        contact_id: ContactId,
        request: CreateAddressRequest,
        created_by: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ContactAddressId::new_v7(),
            contact_id,
            address_type_code: request.address_type_code,
            flat: request.flat,
            property: request.property,
            street: request.street,
            area: request.area,
            city_code: request.city_code,
            county_code: request.county_code,
            postcode: request.postcode,
            country_code: request.country_code,
            no_fixed_address: request.no_fixed_address,
            primary_address: request.primary_address,
            mail_address: request.mail_address,
            start_date: request.start_date,
            comments: request.comments,
            created_by: created_by.into(),
            created_at: now,
            updated_by: None,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Returns true if the address has been soft-deleted
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Stamps the audit columns for an update
    pub fn touch(&mut self, updated_by: impl Into<String>) {
        self.updated_by = Some(updated_by.into());
        self.updated_at = Utc::now();
    }
}

/// Request for creating an address
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAddressRequest {
    pub address_type_code: Option<String>,
    #[validate(length(max = 30))]
    pub flat: Option<String>,
    #[validate(length(max = 50))]
    pub property: Option<String>,
    #[validate(length(max = 160))]
    pub street: Option<String>,
    #[validate(length(max = 70))]
    pub area: Option<String>,
    pub city_code: Option<String>,
    pub county_code: Option<String>,
    #[validate(length(max = 12))]
    pub postcode: Option<String>,
    pub country_code: Option<String>,
    #[serde(default)]
    pub no_fixed_address: bool,
    #[serde(default)]
    pub primary_address: bool,
    #[serde(default)]
    pub mail_address: bool,
    pub start_date: Option<NaiveDate>,
    #[validate(length(max = 240))]
    pub comments: Option<String>,
}

/// Request for partially updating an address.
///
/// The `primary_address` and `mail_address` flags are tri-state booleans:
/// absent keeps the current flag, true claims it (releasing any sibling),
/// false releases it on this address only. Explicit null is rejected for
/// both flags and for `no_fixed_address`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchAddressRequest {
    #[serde(default)]
    pub address_type_code: Patch<String>,
    #[serde(default)]
    pub flat: Patch<String>,
    #[serde(default)]
    pub property: Patch<String>,
    #[serde(default)]
    pub street: Patch<String>,
    #[serde(default)]
    pub area: Patch<String>,
    #[serde(default)]
    pub city_code: Patch<String>,
    #[serde(default)]
    pub county_code: Patch<String>,
    #[serde(default)]
    pub postcode: Patch<String>,
    #[serde(default)]
    pub country_code: Patch<String>,
    #[serde(default)]
    pub no_fixed_address: Patch<bool>,
    #[serde(default)]
    pub primary_address: Patch<bool>,
    #[serde(default)]
    pub mail_address: Patch<bool>,
    #[serde(default)]
    pub start_date: Patch<NaiveDate>,
    #[serde(default)]
    pub comments: Patch<String>,
}

/// One row's worth of flag changes produced by [`plan_flag_changes`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagChange {
    /// The address whose flags change
    pub address_id: ContactAddressId,
    /// The flag values the address must end up with
    pub primary_address: bool,
    pub mail_address: bool,
}

/// Plans the flag values needed so that `target` holds exactly the claimed
/// flags and no sibling violates the exclusivity invariant.
///
/// The two flags resolve independently: claiming `primary` releases only
/// `primary` on siblings, so an address that was primary-and-mail keeps
/// `mail` when a different address claims `primary` alone. Not claiming a
/// flag leaves sibling holders untouched.
///
/// `siblings` must be the contact's non-deleted addresses. The target may
/// or may not be among them (it is absent while being created). Only rows
/// whose stored flags actually differ from the planned values appear in
/// the result, so the caller can emit exactly one update event per changed
/// row and none otherwise.
pub fn plan_flag_changes(
    siblings: &[ContactAddress],
    target: ContactAddressId,
    want_primary: bool,
    want_mail: bool,
) -> Vec<FlagChange> {
    let mut changes = Vec::new();

    for address in siblings {
        let (new_primary, new_mail) = if address.id == target {
            (want_primary, want_mail)
        } else {
            (
                if want_primary { false } else { address.primary_address },
                if want_mail { false } else { address.mail_address },
            )
        };

        if new_primary != address.primary_address || new_mail != address.mail_address {
            changes.push(FlagChange {
                address_id: address.id,
                primary_address: new_primary,
                mail_address: new_mail,
            });
        }
    }

    changes
}
