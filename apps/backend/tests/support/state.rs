//! Test AppState builders.

use std::time::Duration;

use backend::config::tunables::Tunables;
use backend::custody::SharedCustody;
use backend::infra::state::build_state;
use backend::state::app_state::AppState;

/// Timing knobs small enough that intro countdowns, stream polls and
/// retry backoffs finish within a test run.
pub fn fast_tunables(questions_per_match: usize) -> Tunables {
    Tunables {
        questions_per_match,
        intro_delay: Duration::from_millis(30),
        stream_poll_interval: Duration::from_millis(10),
        stream_throttle: Duration::from_millis(1),
        search_timeout: Duration::from_millis(400),
        finish_grace: Duration::from_millis(60),
        transfer_retry_delay: Duration::from_millis(5),
        ..Tunables::default()
    }
}

/// Memory-backed state with fast tunables and the default test security
/// config. Tokens minted against `state.security` authenticate against it.
pub async fn build_test_state(questions_per_match: usize) -> AppState {
    build_state()
        .with_tunables(fast_tunables(questions_per_match))
        .build()
        .await
        .expect("test state should build")
}

/// Same as [`build_test_state`], with a custody client wired in.
pub async fn build_test_state_with_custody(
    questions_per_match: usize,
    custody: SharedCustody,
    default_collection: Option<&str>,
) -> AppState {
    let mut builder = build_state()
        .with_tunables(fast_tunables(questions_per_match))
        .with_custody(custody);
    if let Some(collection) = default_collection {
        builder = builder.with_default_collection(collection);
    }
    builder.build().await.expect("test state should build")
}
