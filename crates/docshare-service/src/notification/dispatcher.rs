//! Notification dispatcher: concurrent, bounded, never failing.
//!
//! Request paths hand events to [`NotificationDispatcher::dispatch`], which
//! delivers in a tracked background task so retries and backoff never hold
//! up the response. [`NotificationDispatcher::drain`] waits for those tasks
//! on shutdown.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::Serialize;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use docshare_core::config::NotificationConfig;
use docshare_core::error::{AppError, ErrorKind};
use docshare_database::NotificationStore;
use docshare_entity::notification::{ChannelKind, NotificationEvent};

use super::channel::NotificationChannel;
use super::email::EmailChannel;
use super::in_app::InAppChannel;
use super::webhook::WebhookChannel;

/// Timeout and retry settings applied to every channel attempt.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// Retries after the first failed attempt.
    pub max_retries: u32,
    /// Sleep before the first retry; doubled for each further retry.
    pub initial_backoff: Duration,
}

impl RetryPolicy {
    /// Build from the notification config section.
    pub fn from_config(config: &NotificationConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.timeout_seconds),
            max_retries: config.max_retries,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
        }
    }

    /// Backoff before retry number `retry` (1-based).
    pub fn backoff_for(&self, retry: u32) -> Duration {
        self.initial_backoff
            .saturating_mul(2u32.saturating_pow(retry.saturating_sub(1)))
    }
}

/// What happened on one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOutcome {
    /// An attempt succeeded.
    Delivered,
    /// Every attempt failed.
    Failed,
    /// Channel unknown or disabled; nothing attempted.
    Skipped,
}

/// Per-channel delivery report.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelReport {
    /// Channel.
    pub channel: ChannelKind,
    /// Outcome.
    pub outcome: ChannelOutcome,
    /// Attempts made.
    pub attempts: u32,
    /// Last error, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of a fan-out. `success` is always true: delivery is best effort.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchReport {
    /// Always true.
    pub success: bool,
    /// One entry per requested channel.
    pub channels: Vec<ChannelReport>,
}

impl DispatchReport {
    /// Report for a channel, if it was requested.
    pub fn channel(&self, kind: ChannelKind) -> Option<&ChannelReport> {
        self.channels.iter().find(|r| r.channel == kind)
    }
}

/// Fans an event out to channels concurrently.
#[derive(Clone)]
pub struct NotificationDispatcher {
    channels: HashMap<ChannelKind, Arc<dyn NotificationChannel>>,
    default_channels: Vec<ChannelKind>,
    policy: RetryPolicy,
    tasks: TaskTracker,
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("channels", &self.channels.keys().collect::<Vec<_>>())
            .field("default_channels", &self.default_channels)
            .field("policy", &self.policy)
            .field("in_flight", &self.tasks.len())
            .finish()
    }
}

impl NotificationDispatcher {
    /// Creates a dispatcher with no channels.
    pub fn new(policy: RetryPolicy, default_channels: Vec<ChannelKind>) -> Self {
        Self {
            channels: HashMap::new(),
            default_channels,
            policy,
            tasks: TaskTracker::new(),
        }
    }

    /// Register (or replace) a channel.
    pub fn with_channel(mut self, channel: Arc<dyn NotificationChannel>) -> Self {
        self.channels.insert(channel.kind(), channel);
        self
    }

    /// Build the email, webhook and in-app channels from configuration.
    pub fn from_config(
        config: &NotificationConfig,
        store: Arc<dyn NotificationStore>,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    "Failed to build notification HTTP client",
                    e,
                )
            })?;

        let default_channels = config
            .default_channels
            .iter()
            .filter_map(|name| match name.parse::<ChannelKind>() {
                Ok(kind) => Some(kind),
                Err(_) => {
                    warn!(channel = %name, "Ignoring unknown default notification channel");
                    None
                }
            })
            .collect();

        let dispatcher = Self::new(RetryPolicy::from_config(config), default_channels)
            .with_channel(Arc::new(InAppChannel::new(store)))
            .with_channel(Arc::new(EmailChannel::new(client.clone(), config.email.clone())))
            .with_channel(Arc::new(WebhookChannel::new(client, config.webhook.clone())));

        info!(
            email = config.email.enabled,
            webhook = config.webhook.enabled,
            "Notification dispatcher ready"
        );
        Ok(dispatcher)
    }

    /// Deliver through the default channels in the background.
    ///
    /// Returns immediately; the outcome is only logged.
    pub fn dispatch(self: &Arc<Self>, event: NotificationEvent) {
        let this = Arc::clone(self);
        self.tasks.spawn(async move {
            let event_type = event.event_type.clone();
            let report = this.notify_default(event).await;
            let failed = report
                .channels
                .iter()
                .filter(|c| c.outcome == ChannelOutcome::Failed)
                .count();
            debug!(event_type = %event_type, failed, "Background notification finished");
        });
    }

    /// Wait until every background delivery started so far has finished.
    pub async fn drain(&self) {
        self.tasks.close();
        self.tasks.wait().await;
        self.tasks.reopen();
    }

    /// Notify through the configured default channels.
    pub async fn notify_default(&self, event: NotificationEvent) -> DispatchReport {
        let channels = self.default_channels.clone();
        self.notify(event, &channels).await
    }

    /// Attempt each requested channel independently and concurrently.
    ///
    /// Failures are logged and reported, never returned.
    pub async fn notify(
        &self,
        event: NotificationEvent,
        channels: &[ChannelKind],
    ) -> DispatchReport {
        let mut requested: Vec<ChannelKind> = Vec::with_capacity(channels.len());
        for kind in channels {
            if !requested.contains(kind) {
                requested.push(*kind);
            }
        }

        let event = &event;
        let reports = join_all(requested.into_iter().map(|kind| async move {
            match self.channels.get(&kind) {
                Some(channel) if channel.is_enabled() => {
                    self.deliver_with_retry(channel.as_ref(), event).await
                }
                _ => {
                    debug!(channel = %kind, "Notification channel skipped");
                    ChannelReport {
                        channel: kind,
                        outcome: ChannelOutcome::Skipped,
                        attempts: 0,
                        error: None,
                    }
                }
            }
        }))
        .await;

        DispatchReport {
            success: true,
            channels: reports,
        }
    }

    async fn deliver_with_retry(
        &self,
        channel: &dyn NotificationChannel,
        event: &NotificationEvent,
    ) -> ChannelReport {
        let kind = channel.kind();
        let max_attempts = self.policy.max_retries.saturating_add(1);
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            if attempt > 1 {
                tokio::time::sleep(self.policy.backoff_for(attempt - 1)).await;
            }

            let result = tokio::time::timeout(self.policy.timeout, channel.deliver(event))
                .await
                .unwrap_or_else(|_| {
                    Err(AppError::external(format!(
                        "Timed out after {}ms",
                        self.policy.timeout.as_millis()
                    )))
                });

            match result {
                Ok(()) => {
                    debug!(
                        channel = %kind,
                        event_type = %event.event_type,
                        attempt,
                        "Notification delivered"
                    );
                    return ChannelReport {
                        channel: kind,
                        outcome: ChannelOutcome::Delivered,
                        attempts: attempt,
                        error: None,
                    };
                }
                Err(e) => {
                    warn!(
                        channel = %kind,
                        event_type = %event.event_type,
                        attempt,
                        max_attempts,
                        error = %e,
                        "Notification attempt failed"
                    );
                    last_error = Some(e.message);
                }
            }
        }

        ChannelReport {
            channel: kind,
            outcome: ChannelOutcome::Failed,
            attempts: max_attempts,
            error: last_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use docshare_core::result::AppResult;

    struct FlakyChannel {
        kind: ChannelKind,
        fail_first: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl NotificationChannel for FlakyChannel {
        fn kind(&self) -> ChannelKind {
            self.kind
        }

        async fn deliver(&self, _event: &NotificationEvent) -> AppResult<()> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.fail_first {
                Err(AppError::external("boom"))
            } else {
                Ok(())
            }
        }
    }

    struct HangingChannel;

    #[async_trait]
    impl NotificationChannel for HangingChannel {
        fn kind(&self) -> ChannelKind {
            ChannelKind::Webhook
        }

        async fn deliver(&self, _event: &NotificationEvent) -> AppResult<()> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }
    }

    fn policy() -> RetryPolicy {
        RetryPolicy {
            timeout: Duration::from_millis(50),
            max_retries: 2,
            initial_backoff: Duration::from_millis(1),
        }
    }

    fn event() -> NotificationEvent {
        NotificationEvent::new("r@example.com", "share.created", "s-1", "hello")
    }

    #[test]
    fn test_backoff_doubles() {
        let p = RetryPolicy {
            initial_backoff: Duration::from_millis(100),
            ..policy()
        };
        assert_eq!(p.backoff_for(1), Duration::from_millis(100));
        assert_eq!(p.backoff_for(2), Duration::from_millis(200));
        assert_eq!(p.backoff_for(3), Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let flaky = Arc::new(FlakyChannel {
            kind: ChannelKind::Email,
            fail_first: 2,
            calls: AtomicU32::new(0),
        });
        let dispatcher = NotificationDispatcher::new(policy(), vec![]).with_channel(flaky.clone());

        let report = dispatcher.notify(event(), &[ChannelKind::Email]).await;
        let email = report.channel(ChannelKind::Email).unwrap();
        assert_eq!(email.outcome, ChannelOutcome::Delivered);
        assert_eq!(email.attempts, 3);
    }

    #[tokio::test]
    async fn test_one_failing_channel_does_not_block_others() {
        let always_failing = Arc::new(FlakyChannel {
            kind: ChannelKind::Email,
            fail_first: u32::MAX,
            calls: AtomicU32::new(0),
        });
        let healthy = Arc::new(FlakyChannel {
            kind: ChannelKind::InApp,
            fail_first: 0,
            calls: AtomicU32::new(0),
        });
        let dispatcher = NotificationDispatcher::new(policy(), vec![])
            .with_channel(always_failing.clone())
            .with_channel(healthy);

        let report = dispatcher
            .notify(event(), &[ChannelKind::Email, ChannelKind::InApp, ChannelKind::Webhook])
            .await;

        assert!(report.success);
        assert_eq!(
            report.channel(ChannelKind::Email).unwrap().outcome,
            ChannelOutcome::Failed
        );
        assert_eq!(always_failing.calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            report.channel(ChannelKind::InApp).unwrap().outcome,
            ChannelOutcome::Delivered
        );
        assert_eq!(
            report.channel(ChannelKind::Webhook).unwrap().outcome,
            ChannelOutcome::Skipped
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispatch_does_not_wait_for_delivery() {
        let dispatcher = Arc::new(
            NotificationDispatcher::new(
                RetryPolicy {
                    timeout: Duration::from_secs(5),
                    max_retries: 2,
                    initial_backoff: Duration::from_millis(200),
                },
                vec![ChannelKind::Webhook],
            )
            .with_channel(Arc::new(HangingChannel)),
        );

        let started = tokio::time::Instant::now();
        dispatcher.dispatch(event());
        dispatcher.dispatch(event());
        assert_eq!(started.elapsed(), Duration::ZERO);

        dispatcher.drain().await;
        // Three timed-out attempts plus 200ms and 400ms of backoff.
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(15_600), "{elapsed:?}");
        assert!(elapsed < Duration::from_secs(16), "{elapsed:?}");
    }

    #[tokio::test]
    async fn test_attempts_are_time_bounded() {
        let dispatcher = NotificationDispatcher::new(
            RetryPolicy {
                max_retries: 0,
                ..policy()
            },
            vec![ChannelKind::Webhook],
        )
        .with_channel(Arc::new(HangingChannel));

        let report = dispatcher.notify_default(event()).await;
        let webhook = report.channel(ChannelKind::Webhook).unwrap();
        assert_eq!(webhook.outcome, ChannelOutcome::Failed);
        assert!(webhook.error.as_deref().unwrap().contains("Timed out"));
    }
}
