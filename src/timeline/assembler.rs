use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::fetch::cache::CacheStore;
use crate::fetch::pipeline::FetchPipeline;
use crate::foundation::core::Size;
use crate::layout::engine::{Appearance, render};
use crate::layout::placeholder::{render_configure_placeholder, unknown_layout};
use crate::layout::primitive::DrawPrimitive;
use crate::schema::model::{SizeClass, WidgetDefinition};
use crate::schema::validate::decode;

/// Options for [`TimelineAssembler`].
#[derive(Clone, Debug)]
pub struct TimelineOpts {
    /// Time between an entry being built and the next scheduled refresh.
    pub refresh_interval: Duration,
}

impl Default for TimelineOpts {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::minutes(15),
        }
    }
}

/// A user's subscription to one widget at one size.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Widget id (definition URL).
    pub id: String,
    /// Optional user name for Basic auth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Optional password for Basic auth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Layout the user picked.
    pub layout_name: String,
    /// Size slot the subscription fills.
    pub size: SizeClass,
}

/// One scheduled renderable snapshot.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Entry {
    /// When the host should refresh after showing this entry.
    pub date: DateTime<Utc>,
    /// Subscribed widget id; empty for an unconfigured entry.
    pub url: String,
    /// Resolved definition; `None` when the fetch failed or nothing is subscribed.
    pub widget: Option<WidgetDefinition>,
    /// Chosen layout; empty for an unconfigured entry.
    pub layout_name: String,
    /// Credentials carried forward for the next refresh.
    pub user: String,
    /// Credentials carried forward for the next refresh.
    #[serde(skip_serializing)]
    pub password: String,
    /// User-facing error text of the fetch; empty on success.
    pub error_text: String,
}

impl Entry {
    /// An entry with nothing configured.
    pub fn empty(date: DateTime<Utc>) -> Self {
        Self {
            date,
            url: String::new(),
            widget: None,
            layout_name: String::new(),
            user: String::new(),
            password: String::new(),
            error_text: String::new(),
        }
    }

    /// `true` when the host should show the configuration placeholder.
    pub fn needs_configuration(&self) -> bool {
        self.layout_name.is_empty()
    }

    /// Primitives for this entry on a home-screen surface of `size`.
    ///
    /// Unconfigured entries draw the configuration placeholder; entries whose fetch failed draw
    /// the unknown-layout placeholder.
    pub fn primitives(&self, size: SizeClass, target: Size) -> Vec<DrawPrimitive> {
        if self.needs_configuration() {
            return render_configure_placeholder(size, target);
        }
        match &self.widget {
            Some(widget) => render(widget, &self.layout_name, target, false),
            None => unknown_layout(target, Appearance::Light),
        }
    }
}

/// Builds timeline entries from subscriptions through a [`FetchPipeline`].
#[derive(Debug, Clone)]
pub struct TimelineAssembler {
    pipeline: Arc<FetchPipeline>,
    opts: TimelineOpts,
}

impl TimelineAssembler {
    /// Assembler over a shared pipeline.
    pub fn new(pipeline: Arc<FetchPipeline>, opts: TimelineOpts) -> Self {
        Self { pipeline, opts }
    }

    /// Date of the next refresh after `now`.
    pub fn refresh_date(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + self.opts.refresh_interval
    }

    /// Build the entry for `subscription`, dated `at`.
    ///
    /// Always yields an entry: no subscription gives an unconfigured entry and a failed fetch
    /// gives an entry without widget data. Live data is always preferred and refreshes the
    /// cache.
    #[tracing::instrument(skip(self, subscription), fields(id = subscription.map(|s| s.id.as_str())))]
    pub async fn build_entry(&self, subscription: Option<&Subscription>, at: DateTime<Utc>) -> Entry {
        let Some(sub) = subscription else {
            return Entry::empty(at);
        };

        let outcome = self
            .pipeline
            .resolve(
                &sub.id,
                sub.user.as_deref(),
                sub.password.as_deref(),
                false,
                true,
            )
            .await;
        if outcome.needs_credentials() {
            tracing::info!(id = %sub.id, "subscription needs credentials");
        }
        let (widget, error_text) = outcome.into_parts();

        Entry {
            date: at,
            url: sub.id.clone(),
            widget,
            layout_name: sub.layout_name.clone(),
            user: sub.user.clone().unwrap_or_default(),
            password: sub.password.clone().unwrap_or_default(),
            error_text,
        }
    }

    /// [`TimelineAssembler::build_entry`] dated one refresh interval after `now`.
    pub async fn build_next_entry(
        &self,
        subscription: Option<&Subscription>,
        now: DateTime<Utc>,
    ) -> Entry {
        self.build_entry(subscription, self.refresh_date(now)).await
    }
}

/// The subscription matching both `identifier` and `size`; the last match wins.
pub fn select_subscription<'a>(
    subscriptions: &'a [Subscription],
    identifier: &str,
    size: SizeClass,
) -> Option<&'a Subscription> {
    subscriptions
        .iter()
        .rev()
        .find(|s| s.id == identifier && s.size == size)
}

/// A widget the host can offer when configuring a slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WidgetOption {
    /// Subscription id.
    pub identifier: String,
    /// Widget name shown to the user.
    pub display: String,
    /// Size slot.
    pub size: SizeClass,
}

/// Subscriptions of `size` whose cached definition decodes, in subscription order.
pub fn configurable_options(
    subscriptions: &[Subscription],
    cache: &dyn CacheStore,
    size: SizeClass,
) -> Vec<WidgetOption> {
    subscriptions
        .iter()
        .filter(|s| s.size == size)
        .filter_map(|s| {
            let bytes = match cache.get(&s.id) {
                Ok(bytes) => bytes?,
                Err(e) => {
                    tracing::warn!(id = %s.id, error = %e, "cache read failed");
                    return None;
                }
            };
            let draft = decode(&bytes).ok()?;
            Some(WidgetOption {
                identifier: s.id.clone(),
                display: draft.name,
                size: s.size,
            })
        })
        .collect()
}

/// Delete cached rows that no subscription references. Returns the deleted ids.
///
/// Home-screen widgets can keep refreshing after their subscription is gone, so the cache
/// accumulates rows; the host calls this periodically. Delete failures are logged and skipped.
pub fn prune_dangling_cache(
    cache: &dyn CacheStore,
    cached_ids: &[String],
    subscriptions: &[Subscription],
) -> Vec<String> {
    let mut deleted = Vec::new();
    for id in cached_ids {
        if subscriptions.iter().any(|s| &s.id == id) {
            continue;
        }
        match cache.delete(id) {
            Ok(()) => deleted.push(id.clone()),
            Err(e) => tracing::warn!(%id, error = %e, "failed to delete dangling cache row"),
        }
    }
    deleted
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/assembler.rs"]
mod tests;
