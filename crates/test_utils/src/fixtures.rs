//! Common Test Fixtures
//!
//! Canonical values used across the test suite. Tests that don't care about
//! a particular value should use these so failures read consistently.

use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use once_cell::sync::OnceCell;

use core_kernel::{PrisonerNumber, RequestContext};

/// Canonical prisoner number used by most tests
pub fn prisoner_number() -> PrisonerNumber {
    PrisonerNumber::new("A1234BC").unwrap()
}

/// A second prisoner, for cross-prisoner isolation tests
pub fn other_prisoner_number() -> PrisonerNumber {
    PrisonerNumber::new("B5678CD").unwrap()
}

/// Context for an interactive case-management user
pub fn officer_context() -> RequestContext {
    RequestContext::new("OFFICER1").with_active_site("LEI")
}

/// Context for a migration/sync write
pub fn migration_context() -> RequestContext {
    RequestContext::new("SYNC_SYSTEM").from_migration()
}

/// Generates a random first name
pub fn random_first_name() -> String {
    FirstName().fake()
}

/// Generates a random last name
pub fn random_last_name() -> String {
    LastName().fake()
}

/// Initializes a tracing subscriber once for the whole test binary.
///
/// Controlled by `RUST_LOG`; silent by default.
pub fn init_tracing() {
    static INIT: OnceCell<()> = OnceCell::new();
    INIT.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
