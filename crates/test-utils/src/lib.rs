//! Shared fixtures for rewatch's integration tests.

pub mod builders;
pub mod fake_compiler;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

/// Upper bound for a whole test scenario.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

static INIT: Once = Once::new();

/// Route rewatch's logs into the test harness output.
///
/// The filter is read from `REWATCH_LOG` (e.g. `REWATCH_LOG=rewatch=trace`)
/// and defaults to `rewatch=debug`. Captured logs are only shown for failing
/// tests unless run with `--nocapture`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("REWATCH_LOG")
            .unwrap_or_else(|_| EnvFilter::new("rewatch=debug"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Run `f`, failing the test if it takes longer than [`TEST_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    within(TEST_TIMEOUT, f).await
}

/// Run `f`, failing the test if it takes longer than `limit`.
///
/// Used to show that a wait (a polling sleep, a blocked native read) was cut
/// short rather than run to completion.
pub async fn within<F, T>(limit: Duration, f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(limit, f).await {
        Ok(value) => value,
        Err(_) => panic!("scenario did not finish within {limit:?}"),
    }
}
