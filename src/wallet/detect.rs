//! Extension detection
//!
//! Freighter registers its global some time after the page starts, so callers
//! usually poll for it with [`wait_for_extension`] before giving up.

use async_trait::async_trait;
use std::time::Duration;
use web_time::Instant;

use super::extension::ExtensionHost;

/// How long [`wait_for_extension`] waits by default
pub const DEFAULT_DETECT_TIMEOUT: Duration = Duration::from_millis(3000);
/// Delay between two detection checks
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Upper bound on checks in a single wait, whatever the timeout
///
/// `ConnectorConfig::validate` rejects timeouts the budget can't cover.
pub const MAX_POLL_CHECKS: u64 = 6_000;

/// Async delay, provided by whichever runtime drives the connector
#[async_trait(?Send)]
pub trait Sleeper {
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by the tokio timer
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[cfg(not(target_arch = "wasm32"))]
#[async_trait(?Send)]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Whether the extension has registered itself in `host`
pub fn is_extension_installed(host: &dyn ExtensionHost) -> bool {
    host.freighter().is_some()
}

/// Wait up to `timeout` for the extension, checking every [`POLL_INTERVAL`]
///
/// At most [`MAX_POLL_CHECKS`] checks are made, so a timeout above
/// `MAX_POLL_CHECKS * POLL_INTERVAL` (10 minutes) is cut to that.
pub async fn wait_for_extension(
    host: &dyn ExtensionHost,
    sleeper: &dyn Sleeper,
    timeout: Duration,
) -> bool {
    poll_for_extension(host, sleeper, timeout, POLL_INTERVAL).await
}

/// Polling loop behind [`wait_for_extension`] with an explicit interval
///
/// Resolves `true` as soon as the extension shows up and `false` once
/// `timeout` has elapsed or the check budget (`timeout / interval`, at least
/// one, at most [`MAX_POLL_CHECKS`]) is spent. Only one sleep is pending at a
/// time and none is left behind once this returns.
pub async fn poll_for_extension(
    host: &dyn ExtensionHost,
    sleeper: &dyn Sleeper,
    timeout: Duration,
    interval: Duration,
) -> bool {
    if is_extension_installed(host) {
        return true;
    }

    let interval = interval.max(Duration::from_millis(1));
    let max_checks = check_budget(timeout, interval);
    let started = Instant::now();

    for check in 1..=max_checks {
        sleeper.sleep(interval).await;

        if is_extension_installed(host) {
            tracing::debug!(check, "Freighter extension detected");
            return true;
        }
        if started.elapsed() >= timeout {
            break;
        }
    }

    tracing::debug!(
        timeout_ms = timeout.as_millis() as u64,
        "Freighter extension not detected before timeout"
    );
    false
}

fn check_budget(timeout: Duration, interval: Duration) -> u64 {
    let checks = timeout.as_millis().div_ceil(interval.as_millis());
    u64::try_from(checks)
        .unwrap_or(MAX_POLL_CHECKS)
        .clamp(1, MAX_POLL_CHECKS)
}
