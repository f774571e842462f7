//! The prisoner directory client port
//!
//! The prisoner directory is an external system of record for prisoner
//! numbers. This core only ever asks one question of it: does a prisoner
//! number exist. It is consulted before any write that references a
//! prisoner.

use async_trait::async_trait;

use core_kernel::{DomainPort, PortError, PrisonerNumber};

/// Port for the external prisoner directory
#[async_trait]
pub trait PrisonerDirectory: DomainPort {
    /// Returns true if the prisoner number exists in the directory
    async fn exists(&self, prisoner_number: &PrisonerNumber) -> Result<bool, PortError>;
}

/// Mock implementation of PrisonerDirectory for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory mock implementation of PrisonerDirectory
    #[derive(Debug, Default, Clone)]
    pub struct MockPrisonerDirectory {
        known: Arc<RwLock<HashSet<PrisonerNumber>>>,
    }

    impl MockPrisonerDirectory {
        /// Creates an empty directory
        pub fn new() -> Self {
            Self::default()
        }

        /// Creates a directory pre-populated with prisoner numbers
        pub async fn with_prisoners(numbers: Vec<PrisonerNumber>) -> Self {
            let directory = Self::new();
            directory.known.write().await.extend(numbers);
            directory
        }

        /// Adds a prisoner number to the directory
        pub async fn add(&self, number: PrisonerNumber) {
            self.known.write().await.insert(number);
        }
    }

    impl DomainPort for MockPrisonerDirectory {}

    #[async_trait]
    impl PrisonerDirectory for MockPrisonerDirectory {
        async fn exists(&self, prisoner_number: &PrisonerNumber) -> Result<bool, PortError> {
            Ok(self.known.read().await.contains(prisoner_number))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockPrisonerDirectory;
    use super::*;

    #[tokio::test]
    async fn test_mock_directory() {
        let known = PrisonerNumber::new("A1234BC").unwrap();
        let unknown = PrisonerNumber::new("Z9999ZZ").unwrap();
        let directory = MockPrisonerDirectory::with_prisoners(vec![known.clone()]).await;

        assert!(directory.exists(&known).await.unwrap());
        assert!(!directory.exists(&unknown).await.unwrap());
    }
}
