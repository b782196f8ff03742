//! Breach checker - cache, remote verification and offline fallback.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tokio_util::sync::CancellationToken;

use crate::blacklist::{Blacklist, LocalCorpus};
use crate::cache::BreachCache;
use crate::error::{CacheError, CorpusError};
use crate::remote::RemoteVerifier;
use crate::result::BreachResult;

/// Decides whether a password is known to be breached.
///
/// Breach checking is advisory: every failure degrades to a usable
/// [`BreachResult`] and nothing is ever returned as an error.
pub struct BreachChecker {
    cache: Arc<BreachCache>,
    remote: Arc<dyn RemoteVerifier>,
    corpus: Arc<dyn LocalCorpus>,
}

impl BreachChecker {
    pub fn new(
        cache: BreachCache,
        remote: Arc<dyn RemoteVerifier>,
        corpus: Arc<dyn LocalCorpus>,
    ) -> Self {
        Self {
            cache: Arc::new(cache),
            remote,
            corpus,
        }
    }

    /// Checker falling back to the bundled blacklist.
    pub fn with_bundled_corpus(cache: BreachCache, remote: Arc<dyn RemoteVerifier>) -> Self {
        Self::new(cache, remote, Arc::new(Blacklist::bundled()))
    }

    pub fn cache(&self) -> &BreachCache {
        &self.cache
    }

    /// Runs the full policy to completion.
    pub async fn check(&self, password: &SecretString) -> BreachResult {
        let token = CancellationToken::new();
        match self.check_with_token(password, &token).await {
            Some(result) => result,
            // unreachable: nobody else holds the token
            None => BreachResult::unavailable(),
        }
    }

    /// Like [`check`](Self::check), but abandons the remote call as soon as
    /// `token` is cancelled.
    ///
    /// Returns `None` when cancelled; a cancelled check writes nothing to
    /// the cache.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub async fn check_with_token(
        &self,
        password: &SecretString,
        token: &CancellationToken,
    ) -> Option<BreachResult> {
        if password.expose_secret().is_empty() {
            return Some(BreachResult::empty_input());
        }

        if token.is_cancelled() {
            return None;
        }

        if let Some(cached) = self.cache_get(password).await {
            return Some(cached);
        }

        let verdict = tokio::select! {
            biased;
            _ = token.cancelled() => {
                #[cfg(feature = "tracing")]
                tracing::debug!("Breach check cancelled while awaiting remote verdict");
                return None;
            }
            verdict = self.remote.verify(password) => verdict,
        };

        let result = match verdict {
            Ok(verdict) => {
                #[cfg(feature = "tracing")]
                tracing::info!(breached = verdict.is_breached, "Remote breach verdict received");
                BreachResult::remote(verdict.is_breached, verdict.passwords_checked.unwrap_or(0))
            }
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Remote breach check failed, using offline corpus: {}", e);
                match self.local_verdict(password) {
                    Ok(result) => result,
                    Err(e) => {
                        #[cfg(feature = "tracing")]
                        tracing::error!("Breach check degraded: {}", e);
                        return Some(BreachResult::unavailable());
                    }
                }
            }
        };

        if let Err(e) = self.cache_set(password, result.clone()).await {
            #[cfg(feature = "tracing")]
            tracing::warn!("Failed to cache breach verdict: {}", e);
        }

        Some(result)
    }

    /// File-backed lookups run on the blocking pool.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    async fn cache_get(&self, password: &SecretString) -> Option<BreachResult> {
        if !self.cache.is_blocking() {
            return self.cache.get(password);
        }

        let cache = Arc::clone(&self.cache);
        let password = SecretString::new(password.expose_secret().into());
        match tokio::task::spawn_blocking(move || cache.get(&password)).await {
            Ok(cached) => cached,
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Breach cache lookup task failed, treating as miss: {}", e);
                None
            }
        }
    }

    async fn cache_set(
        &self,
        password: &SecretString,
        result: BreachResult,
    ) -> Result<(), CacheError> {
        if !self.cache.is_blocking() {
            return self.cache.set(password, result);
        }

        let cache = Arc::clone(&self.cache);
        let password = SecretString::new(password.expose_secret().into());
        tokio::task::spawn_blocking(move || cache.set(&password, result))
            .await
            .map_err(|e| CacheError::Task(e.to_string()))?
    }

    fn local_verdict(&self, password: &SecretString) -> Result<BreachResult, CorpusError> {
        let verdict = self.corpus.lookup(password.expose_secret())?;
        Ok(BreachResult::local(verdict.is_breached, verdict.passwords_checked))
    }
}
