/*! Integration tests for filedesk.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * - storage: Tests for the Backend trait against every implementation
 * - accounts: Registration, login and admin management through CredentialStore
 * - file_records: Ownership and sequencing through FileStore
 * - sessions: Session lifecycle through SessionStore
 * - scenario: The end-to-end user/admin flow across all components
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let directive = "filedesk=info".parse().unwrap();
    let filter = EnvFilter::from_default_env().add_directive(directive);
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

mod accounts;
mod file_records;
mod helpers;
mod scenario;
mod sessions;
mod storage;
