use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use base64::Engine as _;
use serde::Serialize;

use crate::fetch::cache::CacheStore;
use crate::fetch::error::{GENERIC_ERROR, ResolveError};
use crate::fetch::transport::Transport;
use crate::schema::model::WidgetDefinition;
use crate::schema::validate::decode;

/// Options for [`FetchPipeline`].
#[derive(Clone, Debug)]
pub struct PipelineOpts {
    /// Keep `extra_large` layouts. Off by default (phone-class targets).
    pub supports_extra_large: bool,
    /// Text reported for every failure without a more specific message.
    pub generic_error: String,
}

impl Default for PipelineOpts {
    fn default() -> Self {
        Self {
            supports_extra_large: false,
            generic_error: GENERIC_ERROR.to_owned(),
        }
    }
}

/// Monotonically increasing sequence number handed out per [`FetchPipeline::resolve`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RequestToken(u64);

impl RequestToken {
    /// Raw sequence value.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Where a resolved definition came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Decoded from the cache store without touching the network.
    Cache,
    /// Decoded from a fresh 200 response.
    Network,
}

/// Result of one resolve call.
#[derive(Clone, Debug)]
pub struct ResolveOutcome {
    /// Sequence token of this call; compare with [`FetchPipeline::is_latest`].
    pub token: RequestToken,
    /// Trimmed id that was requested.
    pub requested_id: String,
    /// The widget, or the classified failure.
    pub result: Result<(WidgetDefinition, Source), ResolveError>,
    /// User-facing error text; empty on success.
    pub error_text: String,
}

impl ResolveOutcome {
    /// The resolved widget, if any.
    pub fn widget(&self) -> Option<&WidgetDefinition> {
        self.result.as_ref().ok().map(|(w, _)| w)
    }

    /// The failure, if any.
    pub fn error(&self) -> Option<&ResolveError> {
        self.result.as_ref().err()
    }

    /// `true` when the caller should prompt for credentials.
    pub fn needs_credentials(&self) -> bool {
        self.error().is_some_and(ResolveError::needs_credentials)
    }

    /// `(widget, error_text)` with an empty text on success.
    pub fn into_parts(self) -> (Option<WidgetDefinition>, String) {
        (self.result.ok().map(|(w, _)| w), self.error_text)
    }
}

/// Resolves ids into validated [`WidgetDefinition`]s through a cache and a transport.
pub struct FetchPipeline {
    transport: Arc<dyn Transport>,
    cache: Arc<dyn CacheStore>,
    opts: PipelineOpts,
    next_token: AtomicU64,
    latest: Mutex<HashMap<String, RequestToken>>,
}

impl std::fmt::Debug for FetchPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchPipeline")
            .field("opts", &self.opts)
            .field("next_token", &self.next_token)
            .finish_non_exhaustive()
    }
}

impl FetchPipeline {
    /// Build a pipeline over a transport and a cache store.
    pub fn new(
        transport: Arc<dyn Transport>,
        cache: Arc<dyn CacheStore>,
        opts: PipelineOpts,
    ) -> Self {
        Self {
            transport,
            cache,
            opts,
            next_token: AtomicU64::new(1),
            latest: Mutex::new(HashMap::new()),
        }
    }

    /// Options in effect.
    pub fn opts(&self) -> &PipelineOpts {
        &self.opts
    }

    /// Shared cache store.
    pub fn cache(&self) -> &Arc<dyn CacheStore> {
        &self.cache
    }

    /// `true` if `token` is the most recent one issued for `id`.
    ///
    /// Callers discard completions for which this is false.
    pub fn is_latest(&self, id: &str, token: RequestToken) -> bool {
        let latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        latest.get(id.trim()) == Some(&token)
    }

    /// Drop the recorded token for `id`; [`FetchPipeline::is_latest`] is false for it afterwards.
    ///
    /// One token is kept per distinct id, so the map grows with the number of ids resolved.
    /// Long-lived callers forget an id once its completion has been handled.
    pub fn forget(&self, id: &str) {
        let mut latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        latest.remove(id.trim());
    }

    /// Number of ids with a recorded token.
    pub fn tracked_ids(&self) -> usize {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn issue_token(&self, id: &str) -> RequestToken {
        let token = RequestToken(self.next_token.fetch_add(1, Ordering::Relaxed));
        let mut latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        latest.insert(id.to_owned(), token);
        token
    }

    /// Resolve `id` into a widget definition.
    ///
    /// With `allow_cached_fallback`, a decodable cache row is returned without any network
    /// access. Otherwise the id is fetched; a successful 200 is stamped with the final
    /// (post-redirect) URL and, with `cache_on_success`, its raw bytes are written to the cache
    /// under that URL. Cache failures never fail the resolve.
    #[tracing::instrument(skip(self, user, password))]
    pub async fn resolve(
        &self,
        id: &str,
        user: Option<&str>,
        password: Option<&str>,
        allow_cached_fallback: bool,
        cache_on_success: bool,
    ) -> ResolveOutcome {
        let id = id.trim();
        let token = self.issue_token(id);

        let result = self
            .resolve_inner(id, user, password, allow_cached_fallback, cache_on_success)
            .await;
        let error_text = match &result {
            Ok(_) => String::new(),
            Err(e) => {
                tracing::info!(error = %e, "resolve failed");
                e.user_message_or(&self.opts.generic_error)
            }
        };

        ResolveOutcome {
            token,
            requested_id: id.to_owned(),
            result,
            error_text,
        }
    }

    async fn resolve_inner(
        &self,
        id: &str,
        user: Option<&str>,
        password: Option<&str>,
        allow_cached_fallback: bool,
        cache_on_success: bool,
    ) -> Result<(WidgetDefinition, Source), ResolveError> {
        if allow_cached_fallback && let Some(widget) = self.read_cache(id) {
            return Ok((widget, Source::Cache));
        }

        if !is_requestable(id) {
            tracing::debug!(id, "id is not a fetchable url");
            return Err(ResolveError::NetworkUnavailable);
        }

        let headers = request_headers(user, password);
        let resp = match self.transport.fetch(id, &headers).await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(id, error = %e, "transport failed");
                return Err(ResolveError::NetworkUnavailable);
            }
        };

        match resp.status {
            200 => {
                let final_id = if resp.final_url.trim().is_empty() {
                    id
                } else {
                    resp.final_url.trim()
                };
                let widget = self.decode_bytes(&resp.body, final_id)?;
                if cache_on_success && let Err(e) = self.cache.put(final_id, &resp.body) {
                    tracing::warn!(id = final_id, error = %e, "cache write failed");
                }
                Ok((widget, Source::Network))
            }
            401 => Err(ResolveError::AuthenticationRequired),
            status => {
                tracing::debug!(id, status, "unexpected http status");
                Err(ResolveError::HttpError { status })
            }
        }
    }

    fn read_cache(&self, id: &str) -> Option<WidgetDefinition> {
        let bytes = match self.cache.get(id) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(id, error = %e, "cache read failed, treating as miss");
                return None;
            }
        };
        match self.decode_bytes(&bytes, id) {
            Ok(widget) => Some(widget),
            Err(e) => {
                tracing::warn!(id, error = %e, "cached definition is corrupt, treating as miss");
                None
            }
        }
    }

    /// Decode, filter unsupported sizes and stamp `id`.
    pub fn decode_bytes(&self, bytes: &[u8], id: &str) -> Result<WidgetDefinition, ResolveError> {
        let mut draft = decode(bytes)?;
        draft.retain_supported_sizes(self.opts.supports_extra_large);
        Ok(draft.finalize(id))
    }
}

/// `true` for ids that look like absolute URLs (`scheme://...`).
pub fn is_requestable(id: &str) -> bool {
    let Some((scheme, rest)) = id.split_once("://") else {
        return false;
    };
    !rest.is_empty()
        && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// `Accept: application/json`, plus Basic auth when both credentials are non-empty.
pub fn request_headers(user: Option<&str>, password: Option<&str>) -> Vec<(String, String)> {
    let mut headers = vec![("Accept".to_owned(), "application/json".to_owned())];
    if let (Some(user), Some(password)) = (user, password)
        && !user.is_empty()
        && !password.is_empty()
    {
        let token = base64::engine::general_purpose::STANDARD.encode(format!("{user}:{password}"));
        headers.push(("Authorization".to_owned(), format!("Basic {token}")));
    }
    headers
}

#[cfg(test)]
#[path = "../../tests/unit/fetch/pipeline.rs"]
mod tests;
