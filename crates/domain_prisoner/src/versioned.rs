//! Append-only versioned prisoner attributes
//!
//! A versioned singleton is "the current value of attribute X for prisoner
//! P" stored as an immutable, ordered log. Every write appends a brand-new
//! row with a store-assigned, strictly increasing sequence number; nothing
//! is ever updated in place, so concurrent writers cannot lose updates to a
//! mutable pointer. "Current" is defined purely as the row with the highest
//! sequence for the prisoner.
//!
//! A row's value may be null: "no domestic status known" is a legitimate
//! current value, distinct from "no row exists".

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{DomainPort, PortError, PrisonerNumber};

/// One row of a versioned attribute's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedRecord<T> {
    /// Store-assigned, strictly increasing sequence number
    pub seq: i64,
    /// The prisoner the attribute belongs to
    pub prisoner_number: PrisonerNumber,
    /// The attribute value; None records "explicitly not known"
    pub value: Option<T>,
    /// Username that requested the write
    pub created_by: String,
    /// When the row was appended
    pub created_at: DateTime<Utc>,
}

/// Port for one versioned attribute's storage
///
/// Implementations never mutate rows. `append` assigns the sequence number;
/// `current` resolves to the highest sequence for the prisoner.
#[async_trait]
pub trait VersionedStore<T>: DomainPort
where
    T: Clone + Send + Sync + 'static,
{
    /// Appends a new row and returns it with its assigned sequence
    async fn append(
        &self,
        prisoner_number: PrisonerNumber,
        value: Option<T>,
        created_by: &str,
    ) -> Result<VersionedRecord<T>, PortError>;

    /// Returns the row with the highest sequence for the prisoner, if any
    async fn current(
        &self,
        prisoner_number: &PrisonerNumber,
    ) -> Result<Option<VersionedRecord<T>>, PortError>;

    /// Returns every row for the prisoner, oldest first
    async fn history(
        &self,
        prisoner_number: &PrisonerNumber,
    ) -> Result<Vec<VersionedRecord<T>>, PortError>;
}

/// Mock implementation of VersionedStore for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory append-only store with a monotonic sequence
    #[derive(Debug, Default)]
    pub struct InMemoryVersionedStore<T> {
        next_seq: AtomicI64,
        rows: Arc<RwLock<Vec<VersionedRecord<T>>>>,
    }

    impl<T> InMemoryVersionedStore<T> {
        /// Creates an empty store
        pub fn new() -> Self {
            Self {
                next_seq: AtomicI64::new(1),
                rows: Arc::default(),
            }
        }
    }

    impl<T: Clone + Send + Sync + 'static> DomainPort for InMemoryVersionedStore<T> {}

    #[async_trait]
    impl<T> VersionedStore<T> for InMemoryVersionedStore<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        async fn append(
            &self,
            prisoner_number: PrisonerNumber,
            value: Option<T>,
            created_by: &str,
        ) -> Result<VersionedRecord<T>, PortError> {
            let record = VersionedRecord {
                seq: self.next_seq.fetch_add(1, Ordering::SeqCst),
                prisoner_number,
                value,
                created_by: created_by.to_string(),
                created_at: Utc::now(),
            };
            self.rows.write().await.push(record.clone());
            Ok(record)
        }

        async fn current(
            &self,
            prisoner_number: &PrisonerNumber,
        ) -> Result<Option<VersionedRecord<T>>, PortError> {
            Ok(self
                .rows
                .read()
                .await
                .iter()
                .filter(|r| &r.prisoner_number == prisoner_number)
                .max_by_key(|r| r.seq)
                .cloned())
        }

        async fn history(
            &self,
            prisoner_number: &PrisonerNumber,
        ) -> Result<Vec<VersionedRecord<T>>, PortError> {
            let mut rows: Vec<_> = self
                .rows
                .read()
                .await
                .iter()
                .filter(|r| &r.prisoner_number == prisoner_number)
                .cloned()
                .collect();
            rows.sort_by_key(|r| r.seq);
            Ok(rows)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::InMemoryVersionedStore;
    use super::*;

    fn prisoner() -> PrisonerNumber {
        PrisonerNumber::new("A1234BC").unwrap()
    }

    #[tokio::test]
    async fn test_append_assigns_increasing_sequences() {
        let store = InMemoryVersionedStore::<String>::new();

        let first = store
            .append(prisoner(), Some("M".to_string()), "OFFICER1")
            .await
            .unwrap();
        let second = store.append(prisoner(), None, "OFFICER1").await.unwrap();

        assert!(second.seq > first.seq);
    }

    #[tokio::test]
    async fn test_current_is_highest_sequence() {
        let store = InMemoryVersionedStore::<String>::new();
        store
            .append(prisoner(), Some("M".to_string()), "OFFICER1")
            .await
            .unwrap();
        store.append(prisoner(), None, "OFFICER1").await.unwrap();

        let current = store.current(&prisoner()).await.unwrap().unwrap();
        assert!(current.value.is_none());
    }

    #[tokio::test]
    async fn test_history_is_retained_per_prisoner() {
        let store = InMemoryVersionedStore::<String>::new();
        let other = PrisonerNumber::new("B5678CD").unwrap();

        store
            .append(prisoner(), Some("M".to_string()), "OFFICER1")
            .await
            .unwrap();
        store
            .append(other.clone(), Some("S".to_string()), "OFFICER1")
            .await
            .unwrap();
        store.append(prisoner(), None, "OFFICER1").await.unwrap();

        assert_eq!(store.history(&prisoner()).await.unwrap().len(), 2);
        assert_eq!(store.history(&other).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_current_none_when_no_rows() {
        let store = InMemoryVersionedStore::<u32>::new();
        assert!(store.current(&prisoner()).await.unwrap().is_none());
    }
}
