//! Weekly reminder fan-out to registered push endpoints.
//!
//! Delivery itself belongs to a `PushSender`. Failures per subscription are
//! counted and logged, never retried, and the subscription is kept.

use crate::errors::AppResult;
use crate::remote::{PushSubscription, RemoteStore};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReminderPayload {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
}

impl Default for ReminderPayload {
    fn default() -> Self {
        Self {
            title: "Practice Log".into(),
            body: "Tuesday check-in: review or update your weekly practice goals.".into(),
            icon: "/icons/icon-192.png".into(),
            badge: "/icons/icon-192.png".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub sent: usize,
    pub failed: usize,
}

pub trait PushSender: Sync {
    fn send(&self, subscription: &PushSubscription, payload: &str) -> AppResult<()>;
}

/// Sender that only records the deliveries it would make.
#[derive(Debug, Default)]
pub struct LogSender;

impl PushSender for LogSender {
    fn send(&self, subscription: &PushSubscription, payload: &str) -> AppResult<()> {
        tracing::info!(
            id = subscription.id,
            endpoint = subscription.endpoint.as_str(),
            bytes = payload.len(),
            "reminder queued for delivery"
        );
        Ok(())
    }
}

/// Send `payload` to every subscription, all at once.
///
/// Reading the subscriptions can fail; individual sends cannot fail the run.
pub fn dispatch_reminders(
    remote: &dyn RemoteStore,
    sender: &dyn PushSender,
    payload: &ReminderPayload,
) -> AppResult<DispatchReport> {
    let subs = remote.fetch_push_subscriptions()?;
    let body = serde_json::to_string(payload)?;

    let results: Vec<bool> = std::thread::scope(|scope| {
        let handles: Vec<_> = subs
            .iter()
            .map(|sub| {
                let body = body.as_str();
                scope.spawn(move || match sender.send(sub, body) {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::warn!(id = sub.id, error = %e, "push delivery failed");
                        false
                    }
                })
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap_or(false)).collect()
    });

    let sent = results.iter().filter(|ok| **ok).count();
    Ok(DispatchReport {
        sent,
        failed: results.len() - sent,
    })
}
