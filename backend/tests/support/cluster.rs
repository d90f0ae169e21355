//! Process-wide embedded PostgreSQL cluster for integration suites.
//!
//! `pg-embed-setup-unpriv` keeps one cluster per test binary. Bootstrapping
//! occasionally fails while binaries download, so the handle is retried a few
//! times before the suite gives up.

use std::time::Duration;

use pg_embedded_setup_unpriv::{BootstrapResult, ClusterHandle};

const SHARED_CLUSTER_RETRIES: usize = 3;
const SHARED_CLUSTER_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Returns the shared cluster handle, bootstrapping it on first use.
///
/// ```rust,ignore
/// let cluster = shared_cluster_handle()?;
/// let database = provision_template_database(cluster)?;
/// println!("connection URL: {}", database.url());
/// ```
pub fn shared_cluster_handle() -> BootstrapResult<&'static ClusterHandle> {
    ensure_stable_password();
    let mut attempt = 1;
    loop {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(error) => {
                if attempt >= SHARED_CLUSTER_RETRIES {
                    return Err(error);
                }
                eprintln!(
                    "pg-embed: bootstrap attempt {attempt}/{SHARED_CLUSTER_RETRIES} failed: {error}"
                );
                std::thread::sleep(SHARED_CLUSTER_RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

/// Pins `PG_PASSWORD` so a reused data directory keeps accepting logins.
///
/// The embedded settings generate a fresh password on every run, but an
/// existing data directory skips `initdb` and keeps the first one.
fn ensure_stable_password() {
    if std::env::var_os("PG_PASSWORD").is_none() {
        // SAFETY: runs before the cluster spawns threads; the library
        // serialises bootstrap behind its own mutex.
        unsafe {
            std::env::set_var("PG_PASSWORD", "questionnaire_embedded_test");
        }
    }
}
