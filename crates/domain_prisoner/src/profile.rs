//! Prisoner profile service
//!
//! Manages the prisoner-level singleton attributes: domestic status and
//! number of children. Both are stored append-only; every set operation
//! inserts a fresh row superseding the previous one, and emits a creation
//! event — never an update event, because no row is ever mutated.

use std::sync::Arc;
use tracing::{debug, instrument};

use core_kernel::{PrisonerNumber, RequestContext};
use domain_reference::{ReferenceGroup, ReferenceValidator};
use outbound_events::{EventPublisher, OutboundEvent, OutboundEventKind, PersonReference};

use crate::directory::PrisonerDirectory;
use crate::error::PrisonerError;
use crate::versioned::{VersionedRecord, VersionedStore};

/// Highest supported number of children
const MAX_NUMBER_OF_CHILDREN: u32 = 99;

/// Application service for prisoner-level versioned attributes
pub struct PrisonerProfileService {
    directory: Arc<dyn PrisonerDirectory>,
    domestic_status: Arc<dyn VersionedStore<String>>,
    number_of_children: Arc<dyn VersionedStore<u32>>,
    reference: Arc<dyn ReferenceValidator>,
    publisher: Arc<dyn EventPublisher>,
}

impl PrisonerProfileService {
    /// Creates a new prisoner profile service
    pub fn new(
        directory: Arc<dyn PrisonerDirectory>,
        domestic_status: Arc<dyn VersionedStore<String>>,
        number_of_children: Arc<dyn VersionedStore<u32>>,
        reference: Arc<dyn ReferenceValidator>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            directory,
            domestic_status,
            number_of_children,
            reference,
            publisher,
        }
    }

    /// Sets the prisoner's domestic status by appending a new row.
    ///
    /// A null value records "not known" and is distinct from having no
    /// record at all. A non-null value must be a supported DOMESTIC_STS
    /// code; on failure nothing is inserted and no event is emitted.
    #[instrument(skip(self, context), fields(prisoner_number = %prisoner_number))]
    pub async fn set_domestic_status(
        &self,
        prisoner_number: PrisonerNumber,
        value: Option<String>,
        context: &RequestContext,
    ) -> Result<VersionedRecord<String>, PrisonerError> {
        self.ensure_prisoner_exists(&prisoner_number).await?;
        if let Some(code) = value.as_deref() {
            self.reference
                .validate(ReferenceGroup::DomesticStatus, code)
                .await?;
        }

        let record = self
            .domestic_status
            .append(prisoner_number.clone(), value, &context.username)
            .await?;
        debug!(seq = record.seq, "Appended domestic status");

        self.publisher
            .publish(OutboundEvent::new(
                OutboundEventKind::DomesticStatusCreated,
                context,
                record.seq,
                PersonReference::prisoner(prisoner_number),
            ))
            .await?;

        Ok(record)
    }

    /// Returns the current domestic status row for a prisoner
    pub async fn current_domestic_status(
        &self,
        prisoner_number: &PrisonerNumber,
    ) -> Result<VersionedRecord<String>, PrisonerError> {
        self.domestic_status
            .current(prisoner_number)
            .await?
            .ok_or_else(|| PrisonerError::NoRecord {
                attribute: "domestic status",
                prisoner_number: prisoner_number.clone(),
            })
    }

    /// Returns the full domestic status history for a prisoner, oldest first
    pub async fn domestic_status_history(
        &self,
        prisoner_number: &PrisonerNumber,
    ) -> Result<Vec<VersionedRecord<String>>, PrisonerError> {
        Ok(self.domestic_status.history(prisoner_number).await?)
    }

    /// Sets the prisoner's number of children by appending a new row
    #[instrument(skip(self, context), fields(prisoner_number = %prisoner_number))]
    pub async fn set_number_of_children(
        &self,
        prisoner_number: PrisonerNumber,
        value: Option<u32>,
        context: &RequestContext,
    ) -> Result<VersionedRecord<u32>, PrisonerError> {
        self.ensure_prisoner_exists(&prisoner_number).await?;
        if let Some(count) = value {
            if count > MAX_NUMBER_OF_CHILDREN {
                return Err(PrisonerError::Constraint(format!(
                    "numberOfChildren must be at most {MAX_NUMBER_OF_CHILDREN}"
                )));
            }
        }

        let record = self
            .number_of_children
            .append(prisoner_number.clone(), value, &context.username)
            .await?;
        debug!(seq = record.seq, "Appended number of children");

        self.publisher
            .publish(OutboundEvent::new(
                OutboundEventKind::NumberOfChildrenCreated,
                context,
                record.seq,
                PersonReference::prisoner(prisoner_number),
            ))
            .await?;

        Ok(record)
    }

    /// Returns the current number-of-children row for a prisoner
    pub async fn current_number_of_children(
        &self,
        prisoner_number: &PrisonerNumber,
    ) -> Result<VersionedRecord<u32>, PrisonerError> {
        self.number_of_children
            .current(prisoner_number)
            .await?
            .ok_or_else(|| PrisonerError::NoRecord {
                attribute: "number of children",
                prisoner_number: prisoner_number.clone(),
            })
    }

    /// Returns the full number-of-children history for a prisoner
    pub async fn number_of_children_history(
        &self,
        prisoner_number: &PrisonerNumber,
    ) -> Result<Vec<VersionedRecord<u32>>, PrisonerError> {
        Ok(self.number_of_children.history(prisoner_number).await?)
    }

    async fn ensure_prisoner_exists(
        &self,
        prisoner_number: &PrisonerNumber,
    ) -> Result<(), PrisonerError> {
        if self.directory.exists(prisoner_number).await? {
            Ok(())
        } else {
            Err(PrisonerError::PrisonerNotFound(prisoner_number.clone()))
        }
    }
}
