//! Provisioning waits
//!
//! Ordering and update calls return before Megaport has finished the work.
//! When asked to, services poll the product until its provisioning status is
//! one of [`READY_STATES`](crate::types::READY_STATES).

use std::future::Future;
use std::time::Duration;

use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::types::is_ready;

/// Default time to wait for a new product to provision
pub const DEFAULT_PROVISION_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// Default time to wait for a modification to settle
pub const DEFAULT_UPDATE_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Whether and how long an ordering or update call waits for the product
#[derive(Debug, Clone, Default)]
pub struct WaitOptions {
    pub enabled: bool,
    /// Falls back to the operation's default when unset
    pub timeout: Option<Duration>,
    pub cancel: Option<CancellationToken>,
}

impl WaitOptions {
    /// Wait with the default provisioning timeout
    pub fn for_provision() -> Self {
        Self {
            enabled: true,
            timeout: Some(DEFAULT_PROVISION_TIMEOUT),
            cancel: None,
        }
    }

    /// Wait with the default update timeout
    pub fn for_update() -> Self {
        Self {
            enabled: true,
            timeout: Some(DEFAULT_UPDATE_TIMEOUT),
            cancel: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.enabled = true;
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub(crate) fn timeout_or(&self, default: Duration) -> Duration {
        self.timeout.unwrap_or(default)
    }
}

/// Anything carrying a provisioning status
pub trait Provisioned {
    fn provisioning_status(&self) -> &str;
}

/// Poll `fetch` every `period` until the resource reports a ready status.
///
/// The first poll happens one period after the call. Errors from `fetch` end
/// the wait immediately.
pub async fn poll_until_ready<T, F, Fut>(
    resource: &'static str,
    uid: &str,
    period: Duration,
    timeout: Duration,
    cancel: Option<&CancellationToken>,
    mut fetch: F,
) -> Result<T>
where
    T: Provisioned,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    if period.is_zero() {
        return Err(Error::Config("poll interval must be non-zero".to_string()));
    }

    let started = Instant::now();
    let deadline = sleep(timeout);
    tokio::pin!(deadline);

    let mut ticker = interval_at(started + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // A token that is never cancelled keeps the select arms uniform
    let never = CancellationToken::new();
    let cancel = cancel.unwrap_or(&never);

    tracing::info!(resource, uid, ?timeout, "Waiting for provisioning");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                return Err(Error::Cancelled { resource, uid: uid.to_string() });
            }
            _ = &mut deadline => {
                return Err(Error::WaitTimeout {
                    resource,
                    uid: uid.to_string(),
                    waited: started.elapsed(),
                });
            }
            _ = ticker.tick() => {
                let current = fetch().await?;
                let status = current.provisioning_status();
                tracing::debug!(resource, uid, status, "Polled provisioning status");
                if is_ready(status) {
                    tracing::info!(resource, uid, status, "Provisioning settled");
                    return Ok(current);
                }
            }
        }
    }
}

/// Wait for several resources in turn under one shared deadline
pub(crate) async fn poll_all_until_ready<T, F, Fut>(
    resource: &'static str,
    uids: &[String],
    period: Duration,
    timeout: Duration,
    cancel: Option<&CancellationToken>,
    mut fetch: F,
) -> Result<Vec<T>>
where
    T: Provisioned,
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let started = Instant::now();
    let mut ready = Vec::with_capacity(uids.len());

    for uid in uids {
        let remaining = timeout.saturating_sub(started.elapsed());
        let current = poll_until_ready(resource, uid, period, remaining, cancel, || {
            fetch(uid.clone())
        })
        .await
        .map_err(|err| match err {
            Error::WaitTimeout { resource, uid, .. } => Error::WaitTimeout {
                resource,
                uid,
                waited: started.elapsed(),
            },
            other => other,
        })?;
        ready.push(current);
    }

    Ok(ready)
}
