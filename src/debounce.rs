//! Debounced breach query controller.
//!
//! Coalesces rapid password edits into a single breach check. Each edit
//! cancels the previous token, which both stops a pending delay and aborts a
//! remote call already in flight. Each edit also starts a new generation, and
//! a check publishes only while its generation is still current, so only the
//! check for the latest password can ever publish.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::checker::BreachChecker;
use crate::config::{BreachConfig, DEFAULT_DEBOUNCE};
use crate::result::BreachResult;

/// Observable `{result, isLoading}` pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreachQueryState {
    pub result: Option<BreachResult>,
    pub is_loading: bool,
}

#[derive(Default)]
struct ActiveQuery {
    generation: u64,
    token: Option<CancellationToken>,
}

impl ActiveQuery {
    fn advance(&mut self, next: Option<CancellationToken>) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        if let Some(previous) = std::mem::replace(&mut self.token, next) {
            #[cfg(feature = "tracing")]
            tracing::debug!("Superseding pending breach check");
            previous.cancel();
        }
        self.generation
    }
}

/// Live generation and published state, shared with the spawned checks.
///
/// Every state change happens under the `active` lock, so a publish can never
/// interleave with the edit that supersedes it.
struct Shared {
    active: Mutex<ActiveQuery>,
    state: watch::Sender<BreachQueryState>,
}

impl Shared {
    fn new() -> Self {
        let (state, _) = watch::channel(BreachQueryState::default());
        Self {
            active: Mutex::new(ActiveQuery::default()),
            state,
        }
    }

    fn active(&self) -> MutexGuard<'_, ActiveQuery> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts a new generation owned by `next`, cancelling the previous one,
    /// and applies `update` to the published state.
    fn supersede(
        &self,
        next: Option<CancellationToken>,
        update: impl FnOnce(&mut BreachQueryState),
    ) -> u64 {
        let mut active = self.active();
        let generation = active.advance(next);
        self.state.send_modify(update);
        generation
    }

    /// Publishes `result` if `generation` is still the live one.
    fn publish(&self, generation: u64, result: BreachResult) -> bool {
        let active = self.active();
        if active.generation != generation {
            #[cfg(feature = "tracing")]
            tracing::debug!("Dropping superseded breach result");
            return false;
        }
        self.state.send_replace(BreachQueryState {
            result: Some(result),
            is_loading: false,
        });
        true
    }
}

pub struct DebouncedBreachQuery {
    checker: Arc<BreachChecker>,
    delay: Duration,
    shared: Arc<Shared>,
}

impl DebouncedBreachQuery {
    pub fn new(checker: Arc<BreachChecker>) -> Self {
        Self::with_delay(checker, DEFAULT_DEBOUNCE)
    }

    pub fn with_delay(checker: Arc<BreachChecker>, delay: Duration) -> Self {
        Self {
            checker,
            delay,
            shared: Arc::new(Shared::new()),
        }
    }

    /// Controller using `config.debounce` as its quiet period.
    pub fn from_config(checker: Arc<BreachChecker>, config: &BreachConfig) -> Self {
        Self::with_delay(checker, config.debounce)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn subscribe(&self) -> watch::Receiver<BreachQueryState> {
        self.shared.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> BreachQueryState {
        self.shared.state.borrow().clone()
    }

    /// Feeds a new password value.
    ///
    /// Must be called from within a tokio runtime when `password` is
    /// non-empty, since the delayed check runs as a spawned task.
    pub fn set_password(&self, password: SecretString) {
        if password.expose_secret().is_empty() {
            self.shared.supersede(None, |state| *state = BreachQueryState::default());
            return;
        }

        let token = CancellationToken::new();
        let generation =
            self.shared.supersede(Some(token.clone()), |state| state.is_loading = true);

        let checker = Arc::clone(&self.checker);
        let shared = Arc::clone(&self.shared);
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }

            if let Some(result) = checker.check_with_token(&password, &token).await {
                shared.publish(generation, result);
            }
        });
    }

    /// Abandons any pending or in-flight check and clears the loading flag.
    pub fn cancel(&self) {
        self.shared.supersede(None, |state| state.is_loading = false);
    }
}

impl Drop for DebouncedBreachQuery {
    fn drop(&mut self) {
        self.shared.active().advance(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::BreachCache;
    use crate::checker::tests::MockRemote;
    use crate::result::BreachSource;

    fn secret(pwd: &str) -> SecretString {
        SecretString::new(pwd.to_string().into())
    }

    fn controller(remote: Arc<MockRemote>) -> DebouncedBreachQuery {
        let checker = BreachChecker::with_bundled_corpus(BreachCache::in_memory(), remote);
        DebouncedBreachQuery::new(Arc::new(checker))
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_change_publishes_after_delay() {
        let remote = MockRemote::answering(false);
        let query = controller(remote.clone());
        let mut rx = query.subscribe();

        query.set_password(secret("abc"));
        assert!(query.state().is_loading);
        assert!(query.state().result.is_none());

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert_eq!(remote.calls(), 0);

        rx.wait_for(|s| s.result.is_some()).await.unwrap();
        let state = query.state();
        assert!(!state.is_loading);
        assert_eq!(state.result.unwrap().source, BreachSource::Remote);
        assert_eq!(remote.seen(), vec!["abc".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_changes_issue_one_check_for_latest() {
        let remote = MockRemote::answering(true);
        let query = controller(remote.clone());
        let mut rx = query.subscribe();

        query.set_password(secret("a"));
        tokio::time::sleep(Duration::from_millis(200)).await;
        query.set_password(secret("ab"));

        rx.wait_for(|s| s.result.is_some()).await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(remote.calls(), 1);
        assert_eq!(remote.seen(), vec!["ab".to_string()]);
        assert!(!query.state().is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_check_is_cancelled_by_new_input() {
        let remote = MockRemote::answering(true).slow(Duration::from_secs(1));
        let query = controller(remote.clone());
        let mut rx = query.subscribe();

        query.set_password(secret("first"));
        // Past the debounce, remote call for "first" now in flight
        tokio::time::sleep(Duration::from_millis(700)).await;
        assert_eq!(remote.calls(), 1);

        query.set_password(secret("second"));
        rx.wait_for(|s| s.result.is_some()).await.unwrap();

        assert_eq!(remote.seen(), vec!["first".to_string(), "second".to_string()]);
        assert_eq!(remote.completed(), 1);
        assert!(!query.state().is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_password_clears_immediately() {
        let remote = MockRemote::answering(true);
        let query = controller(remote.clone());
        let mut rx = query.subscribe();

        query.set_password(secret("abc"));
        rx.wait_for(|s| s.result.is_some()).await.unwrap();

        query.set_password(secret("x"));
        assert!(query.state().is_loading);
        query.set_password(secret(""));
        assert_eq!(query.state(), BreachQueryState::default());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(remote.calls(), 1);
        assert_eq!(query.state(), BreachQueryState::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_pending_check() {
        let remote = MockRemote::answering(true);
        let query = controller(remote.clone());

        query.set_password(secret("abc"));
        query.cancel();
        assert!(!query.state().is_loading);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(remote.calls(), 0);
        assert!(query.state().result.is_none());
    }

    #[test]
    fn test_superseded_generation_never_publishes() {
        let shared = Shared::new();
        let first_token = CancellationToken::new();

        let first = shared.supersede(Some(first_token.clone()), |s| s.is_loading = true);
        // Check for `first` has settled but not yet published
        let second = shared.supersede(Some(CancellationToken::new()), |s| s.is_loading = true);
        assert!(first_token.is_cancelled());

        assert!(!shared.publish(first, BreachResult::remote(true, 1)));
        assert_eq!(
            *shared.state.borrow(),
            BreachQueryState { result: None, is_loading: true }
        );

        assert!(shared.publish(second, BreachResult::remote(false, 1)));
        let state = shared.state.borrow().clone();
        assert!(!state.is_loading);
        assert!(!state.result.unwrap().is_breached);
    }

    #[test]
    fn test_cancel_retires_current_generation() {
        let shared = Shared::new();
        let generation = shared.supersede(Some(CancellationToken::new()), |s| s.is_loading = true);
        shared.supersede(None, |s| s.is_loading = false);

        assert!(!shared.publish(generation, BreachResult::local(true, 1)));
        assert_eq!(*shared.state.borrow(), BreachQueryState::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_from_config_uses_configured_debounce() {
        let remote = MockRemote::answering(false);
        let checker = BreachChecker::with_bundled_corpus(BreachCache::in_memory(), remote.clone());
        let config = BreachConfig {
            debounce: Duration::from_millis(120),
            ..BreachConfig::default()
        };
        let query = DebouncedBreachQuery::from_config(Arc::new(checker), &config);
        assert_eq!(query.delay(), Duration::from_millis(120));

        query.set_password(secret("abc"));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(remote.calls(), 0);
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(remote.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_delay() {
        let remote = MockRemote::answering(false);
        let checker = BreachChecker::with_bundled_corpus(BreachCache::in_memory(), remote.clone());
        let query = DebouncedBreachQuery::with_delay(Arc::new(checker), Duration::from_millis(50));
        assert_eq!(query.delay(), Duration::from_millis(50));

        query.set_password(secret("abc"));
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(remote.calls(), 1);
    }
}
