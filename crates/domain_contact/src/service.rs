//! Contact application service
//!
//! Implements every mutating use case over a contact and its owned
//! sub-resources. Each use case follows the same shape: resolve the tri-state
//! fields and validate every coded field first, then perform the
//! invariant-preserving writes through the port, and finally emit exactly one
//! outbound event per affected row. Validation failures therefore never leave
//! a partial write behind, and a publish failure is surfaced after the write
//! has committed rather than masked.

use std::sync::Arc;
use tracing::{debug, instrument};

use core_kernel::{
    ContactAddressId, ContactEmailId, ContactEmploymentId, ContactId, ContactIdentityId,
    ContactPhoneId, ContactRestrictionId, Patch, RequestContext,
};
use domain_reference::{ReferenceGroup, ReferenceValidator};
use outbound_events::{EventPublisher, OutboundEvent, OutboundEventKind, PersonReference};

use crate::address::{plan_flag_changes, ContactAddress, CreateAddressRequest, PatchAddressRequest};
use crate::contact::{Contact, CreateContactRequest, PatchContactRequest};
use crate::email::{ContactEmail, CreateEmailRequest, PatchEmailRequest};
use crate::employment::{ContactEmployment, CreateEmploymentRequest, PatchEmploymentRequest};
use crate::error::ContactError;
use crate::identity::{ContactIdentity, CreateIdentityRequest, PatchIdentityRequest};
use crate::phone::{ContactPhone, CreatePhoneRequest, PatchPhoneRequest};
use crate::ports::ContactPort;
use crate::restriction::{
    ContactRestriction, CreateContactRestrictionRequest, PatchContactRestrictionRequest,
};

/// Application service for contacts and their owned sub-resources
pub struct ContactService {
    port: Arc<dyn ContactPort>,
    reference: Arc<dyn ReferenceValidator>,
    publisher: Arc<dyn EventPublisher>,
}

impl ContactService {
    /// Creates a new contact service
    pub fn new(
        port: Arc<dyn ContactPort>,
        reference: Arc<dyn ReferenceValidator>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            port,
            reference,
            publisher,
        }
    }

    // ========================================================================
    // Contacts
    // ========================================================================

    /// Retrieves a contact by ID
    pub async fn get_contact(&self, id: ContactId) -> Result<Contact, ContactError> {
        self.fetch_contact(id).await
    }

    /// Creates a new contact and emits a creation event
    #[instrument(skip(self, request, context), fields(username = %context.username))]
    pub async fn create_contact(
        &self,
        request: CreateContactRequest,
        context: &RequestContext,
    ) -> Result<Contact, ContactError> {
        use validator::Validate;
        request.validate()?;

        self.validate_optional_code(ReferenceGroup::Title, request.title_code.as_deref())
            .await?;
        self.validate_optional_code(ReferenceGroup::Gender, request.gender_code.as_deref())
            .await?;
        self.validate_optional_code(ReferenceGroup::Language, request.language_code.as_deref())
            .await?;
        self.validate_optional_code(
            ReferenceGroup::DomesticStatus,
            request.domestic_status_code.as_deref(),
        )
        .await?;

        let contact = Contact::new(request, &context.username);
        self.port.save_contact(&contact).await?;
        debug!(contact_id = %contact.id, "Created contact");

        self.emit(
            OutboundEventKind::ContactCreated,
            context,
            contact.id,
            PersonReference::contact(contact.id),
        )
        .await?;

        Ok(contact)
    }

    /// Partially updates a contact and emits one update event
    #[instrument(skip(self, request, context), fields(contact_id = %id))]
    pub async fn patch_contact(
        &self,
        id: ContactId,
        request: PatchContactRequest,
        context: &RequestContext,
    ) -> Result<Contact, ContactError> {
        let mut contact = self.fetch_contact(id).await?;

        // Validate every field before any of them is applied
        let first_name = request.first_name.required("firstName")?;
        let last_name = request.last_name.required("lastName")?;
        let interpreter_required = request.interpreter_required.required("interpreterRequired")?;
        let is_staff = request.is_staff.required("isStaff")?;

        ensure_max_len("firstName", first_name.value(), 35)?;
        ensure_max_len("middleNames", request.middle_names.value(), 35)?;
        ensure_max_len("lastName", last_name.value(), 35)?;

        self.validate_patch_code(ReferenceGroup::Title, &request.title_code)
            .await?;
        self.validate_patch_code(ReferenceGroup::Gender, &request.gender_code)
            .await?;
        self.validate_patch_code(ReferenceGroup::Language, &request.language_code)
            .await?;
        self.validate_patch_code(ReferenceGroup::DomesticStatus, &request.domestic_status_code)
            .await?;

        contact.title_code = request.title_code.apply(contact.title_code);
        if let Patch::Value(v) = first_name {
            contact.first_name = v;
        }
        contact.middle_names = request.middle_names.apply(contact.middle_names);
        if let Patch::Value(v) = last_name {
            contact.last_name = v;
        }
        contact.date_of_birth = request.date_of_birth.apply(contact.date_of_birth);
        contact.gender_code = request.gender_code.apply(contact.gender_code);
        contact.language_code = request.language_code.apply(contact.language_code);
        if let Patch::Value(v) = interpreter_required {
            contact.interpreter_required = v;
        }
        contact.domestic_status_code = request
            .domestic_status_code
            .apply(contact.domestic_status_code);
        if let Patch::Value(v) = is_staff {
            contact.is_staff = v;
        }

        contact.touch(&context.username);
        self.port.save_contact(&contact).await?;
        debug!("Patched contact");

        self.emit(
            OutboundEventKind::ContactUpdated,
            context,
            contact.id,
            PersonReference::contact(contact.id),
        )
        .await?;

        Ok(contact)
    }

    // ========================================================================
    // Addresses
    // ========================================================================

    /// Lists a contact's non-deleted addresses
    pub async fn find_addresses(
        &self,
        contact_id: ContactId,
    ) -> Result<Vec<ContactAddress>, ContactError> {
        self.ensure_contact_exists(contact_id).await?;
        Ok(self.port.find_addresses(contact_id).await?)
    }

    /// Creates an address, releasing any sibling flags the new address
    /// claims, and emits a creation event for the new row plus one update
    /// event per displaced sibling
    #[instrument(skip(self, request, context), fields(contact_id = %contact_id))]
    pub async fn create_address(
        &self,
        contact_id: ContactId,
        request: CreateAddressRequest,
        context: &RequestContext,
    ) -> Result<ContactAddress, ContactError> {
        use validator::Validate;
        self.ensure_contact_exists(contact_id).await?;
        request.validate()?;
        self.validate_address_codes(
            request.address_type_code.as_deref(),
            request.city_code.as_deref(),
            request.county_code.as_deref(),
            request.country_code.as_deref(),
        )
        .await?;

        let address = ContactAddress::new(contact_id, request, &context.username);
        let siblings = self.port.find_addresses(contact_id).await?;
        let changes = plan_flag_changes(
            &siblings,
            address.id,
            address.primary_address,
            address.mail_address,
        );

        // Clear displaced siblings before inserting the new holder
        let mut displaced = Vec::new();
        for change in &changes {
            let mut sibling = siblings
                .iter()
                .find(|a| a.id == change.address_id)
                .cloned()
                .ok_or_else(|| ContactError::AddressNotFound(change.address_id))?;
            sibling.primary_address = change.primary_address;
            sibling.mail_address = change.mail_address;
            sibling.touch(&context.username);
            self.port.save_address(&sibling).await?;
            displaced.push(sibling.id);
        }
        self.port.save_address(&address).await?;
        debug!(address_id = %address.id, displaced = displaced.len(), "Created address");

        for address_id in displaced {
            self.emit(
                OutboundEventKind::ContactAddressUpdated,
                context,
                address_id,
                PersonReference::contact(contact_id),
            )
            .await?;
        }
        self.emit(
            OutboundEventKind::ContactAddressCreated,
            context,
            address.id,
            PersonReference::contact(contact_id),
        )
        .await?;

        Ok(address)
    }

    /// Partially updates an address.
    ///
    /// Emits one update event per row whose stored state actually changed:
    /// the patched address itself and any sibling that lost a flag. A patch
    /// that changes nothing emits nothing.
    #[instrument(skip(self, request, context), fields(address_id = %address_id))]
    pub async fn patch_address(
        &self,
        address_id: ContactAddressId,
        request: PatchAddressRequest,
        context: &RequestContext,
    ) -> Result<ContactAddress, ContactError> {
        let mut address = self.fetch_address(address_id).await?;

        let no_fixed_address = request.no_fixed_address.required("noFixedAddress")?;
        let primary_patch = request.primary_address.required("primaryAddress")?;
        let mail_patch = request.mail_address.required("mailAddress")?;

        ensure_max_len("flat", request.flat.value(), 30)?;
        ensure_max_len("property", request.property.value(), 50)?;
        ensure_max_len("street", request.street.value(), 160)?;
        ensure_max_len("area", request.area.value(), 70)?;
        ensure_max_len("postcode", request.postcode.value(), 12)?;
        ensure_max_len("comments", request.comments.value(), 240)?;

        self.validate_patch_code(ReferenceGroup::AddressType, &request.address_type_code)
            .await?;
        self.validate_patch_code(ReferenceGroup::City, &request.city_code)
            .await?;
        self.validate_patch_code(ReferenceGroup::County, &request.county_code)
            .await?;
        self.validate_patch_code(ReferenceGroup::Country, &request.country_code)
            .await?;

        let structural_changed = request.address_type_code.changes(&address.address_type_code)
            || request.flat.changes(&address.flat)
            || request.property.changes(&address.property)
            || request.street.changes(&address.street)
            || request.area.changes(&address.area)
            || request.city_code.changes(&address.city_code)
            || request.county_code.changes(&address.county_code)
            || request.postcode.changes(&address.postcode)
            || request.country_code.changes(&address.country_code)
            || no_fixed_address.changes(&Some(address.no_fixed_address))
            || request.start_date.changes(&address.start_date)
            || request.comments.changes(&address.comments);

        let want_primary = resolve_flag(primary_patch, address.primary_address);
        let want_mail = resolve_flag(mail_patch, address.mail_address);

        let siblings = self.port.find_addresses(address.contact_id).await?;
        let changes = plan_flag_changes(&siblings, address.id, want_primary, want_mail);
        let target_flags_changed = changes.iter().any(|c| c.address_id == address.id);

        if !structural_changed && changes.is_empty() {
            debug!("Patch is a no-op");
            return Ok(address);
        }

        // Clear displaced siblings first, then write the target
        let mut displaced = Vec::new();
        for change in changes.iter().filter(|c| c.address_id != address.id) {
            let mut sibling = siblings
                .iter()
                .find(|a| a.id == change.address_id)
                .cloned()
                .ok_or_else(|| ContactError::AddressNotFound(change.address_id))?;
            sibling.primary_address = change.primary_address;
            sibling.mail_address = change.mail_address;
            sibling.touch(&context.username);
            self.port.save_address(&sibling).await?;
            displaced.push(sibling.id);
        }

        address.address_type_code = request.address_type_code.apply(address.address_type_code);
        address.flat = request.flat.apply(address.flat);
        address.property = request.property.apply(address.property);
        address.street = request.street.apply(address.street);
        address.area = request.area.apply(address.area);
        address.city_code = request.city_code.apply(address.city_code);
        address.county_code = request.county_code.apply(address.county_code);
        address.postcode = request.postcode.apply(address.postcode);
        address.country_code = request.country_code.apply(address.country_code);
        if let Patch::Value(v) = no_fixed_address {
            address.no_fixed_address = v;
        }
        address.primary_address = want_primary;
        address.mail_address = want_mail;
        address.start_date = request.start_date.apply(address.start_date);
        address.comments = request.comments.apply(address.comments);
        address.touch(&context.username);
        self.port.save_address(&address).await?;
        debug!(displaced = displaced.len(), "Patched address");

        for sibling_id in displaced {
            self.emit(
                OutboundEventKind::ContactAddressUpdated,
                context,
                sibling_id,
                PersonReference::contact(address.contact_id),
            )
            .await?;
        }
        if structural_changed || target_flags_changed {
            self.emit(
                OutboundEventKind::ContactAddressUpdated,
                context,
                address.id,
                PersonReference::contact(address.contact_id),
            )
            .await?;
        }

        Ok(address)
    }

    /// Soft-deletes an address and emits a deletion event
    #[instrument(skip(self, context), fields(address_id = %address_id))]
    pub async fn delete_address(
        &self,
        address_id: ContactAddressId,
        context: &RequestContext,
    ) -> Result<(), ContactError> {
        let mut address = self.fetch_address(address_id).await?;

        address.deleted_at = Some(chrono::Utc::now());
        address.touch(&context.username);
        self.port.save_address(&address).await?;
        debug!("Soft-deleted address");

        self.emit(
            OutboundEventKind::ContactAddressDeleted,
            context,
            address.id,
            PersonReference::contact(address.contact_id),
        )
        .await?;

        Ok(())
    }

    // ========================================================================
    // Phones
    // ========================================================================

    /// Creates a phone and emits a creation event
    #[instrument(skip(self, request, context), fields(contact_id = %contact_id))]
    pub async fn create_phone(
        &self,
        contact_id: ContactId,
        request: CreatePhoneRequest,
        context: &RequestContext,
    ) -> Result<ContactPhone, ContactError> {
        use validator::Validate;
        self.ensure_contact_exists(contact_id).await?;
        request.validate()?;
        self.validate_code(ReferenceGroup::PhoneType, &request.phone_type_code)
            .await?;

        let phone = ContactPhone::new(contact_id, request, &context.username);
        self.port.save_phone(&phone).await?;

        self.emit(
            OutboundEventKind::ContactPhoneCreated,
            context,
            phone.id,
            PersonReference::contact(contact_id),
        )
        .await?;

        Ok(phone)
    }

    /// Partially updates a phone and emits one update event
    #[instrument(skip(self, request, context), fields(phone_id = %phone_id))]
    pub async fn patch_phone(
        &self,
        phone_id: ContactPhoneId,
        request: PatchPhoneRequest,
        context: &RequestContext,
    ) -> Result<ContactPhone, ContactError> {
        let mut phone = self.fetch_phone(phone_id).await?;

        let phone_type = request.phone_type_code.required("phoneTypeCode")?;
        let phone_number = request.phone_number.required("phoneNumber")?;
        ensure_max_len("phoneNumber", phone_number.value(), 40)?;
        ensure_max_len("extNumber", request.ext_number.value(), 7)?;
        self.validate_patch_code(ReferenceGroup::PhoneType, &phone_type)
            .await?;

        if let Patch::Value(v) = phone_type {
            phone.phone_type_code = v;
        }
        if let Patch::Value(v) = phone_number {
            phone.phone_number = v;
        }
        phone.ext_number = request.ext_number.apply(phone.ext_number);
        phone.touch(&context.username);
        self.port.save_phone(&phone).await?;

        self.emit(
            OutboundEventKind::ContactPhoneUpdated,
            context,
            phone.id,
            PersonReference::contact(phone.contact_id),
        )
        .await?;

        Ok(phone)
    }

    /// Hard-deletes a phone and emits a deletion event
    #[instrument(skip(self, context), fields(phone_id = %phone_id))]
    pub async fn delete_phone(
        &self,
        phone_id: ContactPhoneId,
        context: &RequestContext,
    ) -> Result<(), ContactError> {
        let phone = self.fetch_phone(phone_id).await?;
        self.port.delete_phone(phone_id).await?;

        self.emit(
            OutboundEventKind::ContactPhoneDeleted,
            context,
            phone.id,
            PersonReference::contact(phone.contact_id),
        )
        .await?;

        Ok(())
    }

    // ========================================================================
    // Emails
    // ========================================================================

    /// Creates an email and emits a creation event
    #[instrument(skip(self, request, context), fields(contact_id = %contact_id))]
    pub async fn create_email(
        &self,
        contact_id: ContactId,
        request: CreateEmailRequest,
        context: &RequestContext,
    ) -> Result<ContactEmail, ContactError> {
        use validator::Validate;
        self.ensure_contact_exists(contact_id).await?;
        request.validate()?;

        let email = ContactEmail::new(contact_id, request, &context.username);
        self.port.save_email(&email).await?;

        self.emit(
            OutboundEventKind::ContactEmailCreated,
            context,
            email.id,
            PersonReference::contact(contact_id),
        )
        .await?;

        Ok(email)
    }

    /// Partially updates an email and emits one update event
    #[instrument(skip(self, request, context), fields(email_id = %email_id))]
    pub async fn patch_email(
        &self,
        email_id: ContactEmailId,
        request: PatchEmailRequest,
        context: &RequestContext,
    ) -> Result<ContactEmail, ContactError> {
        let mut email = self.fetch_email(email_id).await?;

        let email_address = request.email_address.required("emailAddress")?;
        if let Some(value) = email_address.value() {
            if !value.contains('@') || value.len() > 240 {
                return Err(ContactError::Constraint(format!(
                    "emailAddress is not a valid email address: {value}"
                )));
            }
        }

        if let Patch::Value(v) = email_address {
            email.email_address = v;
        }
        email.touch(&context.username);
        self.port.save_email(&email).await?;

        self.emit(
            OutboundEventKind::ContactEmailUpdated,
            context,
            email.id,
            PersonReference::contact(email.contact_id),
        )
        .await?;

        Ok(email)
    }

    /// Hard-deletes an email and emits a deletion event
    #[instrument(skip(self, context), fields(email_id = %email_id))]
    pub async fn delete_email(
        &self,
        email_id: ContactEmailId,
        context: &RequestContext,
    ) -> Result<(), ContactError> {
        let email = self.fetch_email(email_id).await?;
        self.port.delete_email(email_id).await?;

        self.emit(
            OutboundEventKind::ContactEmailDeleted,
            context,
            email.id,
            PersonReference::contact(email.contact_id),
        )
        .await?;

        Ok(())
    }

    // ========================================================================
    // Identity documents
    // ========================================================================

    /// Records an identity document and emits a creation event
    #[instrument(skip(self, request, context), fields(contact_id = %contact_id))]
    pub async fn create_identity(
        &self,
        contact_id: ContactId,
        request: CreateIdentityRequest,
        context: &RequestContext,
    ) -> Result<ContactIdentity, ContactError> {
        use validator::Validate;
        self.ensure_contact_exists(contact_id).await?;
        request.validate()?;
        self.validate_code(ReferenceGroup::IdentityType, &request.identity_type_code)
            .await?;

        let identity = ContactIdentity::new(contact_id, request, &context.username);
        self.port.save_identity(&identity).await?;

        self.emit(
            OutboundEventKind::ContactIdentityCreated,
            context,
            identity.id,
            PersonReference::contact(contact_id),
        )
        .await?;

        Ok(identity)
    }

    /// Partially updates an identity document and emits one update event
    #[instrument(skip(self, request, context), fields(identity_id = %identity_id))]
    pub async fn patch_identity(
        &self,
        identity_id: ContactIdentityId,
        request: PatchIdentityRequest,
        context: &RequestContext,
    ) -> Result<ContactIdentity, ContactError> {
        let mut identity = self.fetch_identity(identity_id).await?;

        let identity_type = request.identity_type_code.required("identityTypeCode")?;
        let identity_value = request.identity_value.required("identityValue")?;
        ensure_max_len("identityValue", identity_value.value(), 20)?;
        ensure_max_len("issuingAuthority", request.issuing_authority.value(), 40)?;
        self.validate_patch_code(ReferenceGroup::IdentityType, &identity_type)
            .await?;

        if let Patch::Value(v) = identity_type {
            identity.identity_type_code = v;
        }
        if let Patch::Value(v) = identity_value {
            identity.identity_value = v;
        }
        identity.issuing_authority = request.issuing_authority.apply(identity.issuing_authority);
        identity.touch(&context.username);
        self.port.save_identity(&identity).await?;

        self.emit(
            OutboundEventKind::ContactIdentityUpdated,
            context,
            identity.id,
            PersonReference::contact(identity.contact_id),
        )
        .await?;

        Ok(identity)
    }

    /// Hard-deletes an identity document and emits a deletion event
    #[instrument(skip(self, context), fields(identity_id = %identity_id))]
    pub async fn delete_identity(
        &self,
        identity_id: ContactIdentityId,
        context: &RequestContext,
    ) -> Result<(), ContactError> {
        let identity = self.fetch_identity(identity_id).await?;
        self.port.delete_identity(identity_id).await?;

        self.emit(
            OutboundEventKind::ContactIdentityDeleted,
            context,
            identity.id,
            PersonReference::contact(identity.contact_id),
        )
        .await?;

        Ok(())
    }

    // ========================================================================
    // Employments
    // ========================================================================

    /// Records an employment and emits a creation event
    #[instrument(skip(self, request, context), fields(contact_id = %contact_id))]
    pub async fn create_employment(
        &self,
        contact_id: ContactId,
        request: CreateEmploymentRequest,
        context: &RequestContext,
    ) -> Result<ContactEmployment, ContactError> {
        use validator::Validate;
        self.ensure_contact_exists(contact_id).await?;
        request.validate()?;

        let employment = ContactEmployment::new(contact_id, request, &context.username);
        self.port.save_employment(&employment).await?;

        self.emit(
            OutboundEventKind::ContactEmploymentCreated,
            context,
            employment.id,
            PersonReference::contact(contact_id),
        )
        .await?;

        Ok(employment)
    }

    /// Partially updates an employment and emits one update event
    #[instrument(skip(self, request, context), fields(employment_id = %employment_id))]
    pub async fn patch_employment(
        &self,
        employment_id: ContactEmploymentId,
        request: PatchEmploymentRequest,
        context: &RequestContext,
    ) -> Result<ContactEmployment, ContactError> {
        let mut employment = self.fetch_employment(employment_id).await?;

        let employer_name = request.employer_name.required("employerName")?;
        let active = request.active.required("active")?;
        ensure_max_len("employerName", employer_name.value(), 100)?;
        ensure_max_len("occupation", request.occupation.value(), 40)?;

        if let Patch::Value(v) = employer_name {
            employment.employer_name = v;
        }
        employment.occupation = request.occupation.apply(employment.occupation);
        if let Patch::Value(v) = active {
            employment.active = v;
        }
        employment.touch(&context.username);
        self.port.save_employment(&employment).await?;

        self.emit(
            OutboundEventKind::ContactEmploymentUpdated,
            context,
            employment.id,
            PersonReference::contact(employment.contact_id),
        )
        .await?;

        Ok(employment)
    }

    /// Hard-deletes an employment and emits a deletion event
    #[instrument(skip(self, context), fields(employment_id = %employment_id))]
    pub async fn delete_employment(
        &self,
        employment_id: ContactEmploymentId,
        context: &RequestContext,
    ) -> Result<(), ContactError> {
        let employment = self.fetch_employment(employment_id).await?;
        self.port.delete_employment(employment_id).await?;

        self.emit(
            OutboundEventKind::ContactEmploymentDeleted,
            context,
            employment.id,
            PersonReference::contact(employment.contact_id),
        )
        .await?;

        Ok(())
    }

    // ========================================================================
    // Contact-global restrictions
    // ========================================================================

    /// Lists a contact's global restrictions
    pub async fn find_restrictions(
        &self,
        contact_id: ContactId,
    ) -> Result<Vec<ContactRestriction>, ContactError> {
        self.ensure_contact_exists(contact_id).await?;
        Ok(self.port.find_restrictions(contact_id).await?)
    }

    /// Creates a contact-global restriction and emits a creation event
    #[instrument(skip(self, request, context), fields(contact_id = %contact_id))]
    pub async fn create_restriction(
        &self,
        contact_id: ContactId,
        request: CreateContactRestrictionRequest,
        context: &RequestContext,
    ) -> Result<ContactRestriction, ContactError> {
        use validator::Validate;
        self.ensure_contact_exists(contact_id).await?;
        request.validate()?;
        self.validate_code(ReferenceGroup::RestrictionType, &request.restriction_type_code)
            .await?;
        ensure_date_order(request.start_date, request.expiry_date)?;

        let restriction = ContactRestriction::new(contact_id, request, &context.username);
        self.port.save_restriction(&restriction).await?;

        self.emit(
            OutboundEventKind::ContactRestrictionCreated,
            context,
            restriction.id,
            PersonReference::contact(contact_id),
        )
        .await?;

        Ok(restriction)
    }

    /// Partially updates a restriction and emits one update event
    #[instrument(skip(self, request, context), fields(restriction_id = %restriction_id))]
    pub async fn patch_restriction(
        &self,
        restriction_id: ContactRestrictionId,
        request: PatchContactRestrictionRequest,
        context: &RequestContext,
    ) -> Result<ContactRestriction, ContactError> {
        let mut restriction = self.fetch_restriction(restriction_id).await?;

        let restriction_type = request.restriction_type_code.required("restrictionTypeCode")?;
        let start_date = request.start_date.required("startDate")?;
        ensure_max_len("comments", request.comments.value(), 240)?;
        self.validate_patch_code(ReferenceGroup::RestrictionType, &restriction_type)
            .await?;

        let new_start = match start_date {
            Patch::Value(v) => v,
            _ => restriction.start_date,
        };
        let new_expiry = request.expiry_date.apply(restriction.expiry_date);
        ensure_date_order(new_start, new_expiry)?;

        if let Patch::Value(v) = restriction_type {
            restriction.restriction_type_code = v;
        }
        restriction.start_date = new_start;
        restriction.expiry_date = new_expiry;
        restriction.comments = request.comments.apply(restriction.comments);
        restriction.touch(&context.username);
        self.port.save_restriction(&restriction).await?;

        self.emit(
            OutboundEventKind::ContactRestrictionUpdated,
            context,
            restriction.id,
            PersonReference::contact(restriction.contact_id),
        )
        .await?;

        Ok(restriction)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn emit(
        &self,
        kind: OutboundEventKind,
        context: &RequestContext,
        entity_id: impl ToString,
        person_reference: PersonReference,
    ) -> Result<(), ContactError> {
        self.publisher
            .publish(OutboundEvent::new(kind, context, entity_id, person_reference))
            .await?;
        Ok(())
    }

    async fn ensure_contact_exists(&self, id: ContactId) -> Result<(), ContactError> {
        if self.port.contact_exists(id).await? {
            Ok(())
        } else {
            Err(ContactError::ContactNotFound(id))
        }
    }

    async fn fetch_contact(&self, id: ContactId) -> Result<Contact, ContactError> {
        self.port.get_contact(id).await.map_err(|e| {
            if e.is_not_found() {
                ContactError::ContactNotFound(id)
            } else {
                ContactError::Storage(e)
            }
        })
    }

    async fn fetch_address(&self, id: ContactAddressId) -> Result<ContactAddress, ContactError> {
        let address = self.port.get_address(id).await.map_err(|e| {
            if e.is_not_found() {
                ContactError::AddressNotFound(id)
            } else {
                ContactError::Storage(e)
            }
        })?;
        // A soft-deleted address is gone as far as callers are concerned
        if address.is_deleted() {
            return Err(ContactError::AddressNotFound(id));
        }
        Ok(address)
    }

    async fn fetch_phone(&self, id: ContactPhoneId) -> Result<ContactPhone, ContactError> {
        self.port.get_phone(id).await.map_err(|e| {
            if e.is_not_found() {
                ContactError::PhoneNotFound(id)
            } else {
                ContactError::Storage(e)
            }
        })
    }

    async fn fetch_email(&self, id: ContactEmailId) -> Result<ContactEmail, ContactError> {
        self.port.get_email(id).await.map_err(|e| {
            if e.is_not_found() {
                ContactError::EmailNotFound(id)
            } else {
                ContactError::Storage(e)
            }
        })
    }

    async fn fetch_identity(&self, id: ContactIdentityId) -> Result<ContactIdentity, ContactError> {
        self.port.get_identity(id).await.map_err(|e| {
            if e.is_not_found() {
                ContactError::IdentityNotFound(id)
            } else {
                ContactError::Storage(e)
            }
        })
    }

    async fn fetch_employment(
        &self,
        id: ContactEmploymentId,
    ) -> Result<ContactEmployment, ContactError> {
        self.port.get_employment(id).await.map_err(|e| {
            if e.is_not_found() {
                ContactError::EmploymentNotFound(id)
            } else {
                ContactError::Storage(e)
            }
        })
    }

    async fn fetch_restriction(
        &self,
        id: ContactRestrictionId,
    ) -> Result<ContactRestriction, ContactError> {
        self.port.get_restriction(id).await.map_err(|e| {
            if e.is_not_found() {
                ContactError::RestrictionNotFound(id)
            } else {
                ContactError::Storage(e)
            }
        })
    }

    async fn validate_code(&self, group: ReferenceGroup, code: &str) -> Result<(), ContactError> {
        self.reference.validate(group, code).await?;
        Ok(())
    }

    async fn validate_optional_code(
        &self,
        group: ReferenceGroup,
        code: Option<&str>,
    ) -> Result<(), ContactError> {
        if let Some(code) = code {
            self.validate_code(group, code).await?;
        }
        Ok(())
    }

    async fn validate_patch_code(
        &self,
        group: ReferenceGroup,
        patch: &Patch<String>,
    ) -> Result<(), ContactError> {
        if let Patch::Value(code) = patch {
            self.validate_code(group, code).await?;
        }
        Ok(())
    }

    async fn validate_address_codes(
        &self,
        address_type: Option<&str>,
        city: Option<&str>,
        county: Option<&str>,
        country: Option<&str>,
    ) -> Result<(), ContactError> {
        self.validate_optional_code(ReferenceGroup::AddressType, address_type)
            .await?;
        self.validate_optional_code(ReferenceGroup::City, city).await?;
        self.validate_optional_code(ReferenceGroup::County, county).await?;
        self.validate_optional_code(ReferenceGroup::Country, country).await?;
        Ok(())
    }
}

fn resolve_flag(patch: Patch<bool>, current: bool) -> bool {
    match patch {
        Patch::Value(v) => v,
        _ => current,
    }
}

fn ensure_max_len(
    field: &'static str,
    value: Option<&String>,
    max: usize,
) -> Result<(), ContactError> {
    match value {
        Some(v) if v.chars().count() > max => Err(ContactError::Constraint(format!(
            "{field} must be at most {max} characters"
        ))),
        _ => Ok(()),
    }
}

fn ensure_date_order(
    start: chrono::NaiveDate,
    expiry: Option<chrono::NaiveDate>,
) -> Result<(), ContactError> {
    match expiry {
        Some(expiry) if expiry < start => Err(ContactError::Constraint(
            "expiryDate must not be before startDate".to_string(),
        )),
        _ => Ok(()),
    }
}
