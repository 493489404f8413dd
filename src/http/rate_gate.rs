//! Sliding window rate limiting
//!
//! [`RateGate`] admits at most `limit` requests in any trailing `period`.
//! It keeps the timestamps of admitted requests; a caller that finds the
//! window full waits until the oldest entry expires or until another caller
//! changes the window, then checks again.
//!
//! Waiters are woken together and race for free slots, so admission order is
//! not FIFO.

use super::request::{HttpRequest, HttpResponse};
use super::transport::Transport;
use crate::error::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;
use tracing::debug;

/// Blocking admission control over a sliding time window.
///
/// A `limit` of zero never admits anything and `acquire` waits forever.
pub struct RateGate {
    limit: usize,
    period: Duration,
    window: Mutex<VecDeque<Instant>>,
    changed: Notify,
}

impl RateGate {
    /// Create a gate admitting `limit` requests per `period`
    pub fn new(limit: usize, period: Duration) -> Self {
        Self {
            limit,
            period,
            window: Mutex::new(VecDeque::with_capacity(limit)),
            changed: Notify::new(),
        }
    }

    /// Maximum requests per period
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Length of the sliding window
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Number of requests admitted within the current window
    pub fn in_window(&self) -> usize {
        let mut window = self.window.lock();
        self.purge(&mut window, Instant::now());
        window.len()
    }

    /// Wait until this caller may send a request, then record it.
    ///
    /// Dropping the returned future abandons the wait without recording.
    pub async fn acquire(&self) {
        loop {
            // Registered before the window is inspected so a release between
            // the check and the wait is not missed.
            let notified = self.changed.notified();

            let wait = {
                let mut window = self.window.lock();
                let now = Instant::now();
                self.purge(&mut window, now);

                if window.len() < self.limit {
                    window.push_back(now);
                    drop(window);
                    self.changed.notify_waiters();
                    return;
                }

                window
                    .front()
                    .map(|oldest| (*oldest + self.period).saturating_duration_since(now))
            };

            match wait {
                Some(wait) => {
                    debug!("Rate limit of {} reached, waiting up to {:?}", self.limit, wait);
                    // Timing out just means the oldest entry has expired
                    let _ = tokio::time::timeout(wait, notified).await;
                }
                None => notified.await,
            }
        }
    }

    /// Drop entries that are at least `period` old
    fn purge(&self, window: &mut VecDeque<Instant>, now: Instant) {
        while let Some(oldest) = window.front() {
            if now.saturating_duration_since(*oldest) >= self.period {
                window.pop_front();
            } else {
                break;
            }
        }
    }
}

impl std::fmt::Debug for RateGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateGate")
            .field("limit", &self.limit)
            .field("period", &self.period)
            .finish_non_exhaustive()
    }
}

/// Transport stage passing every request through a [`RateGate`]
#[derive(Debug, Clone)]
pub struct Throttled<T> {
    inner: T,
    gate: Arc<RateGate>,
}

impl<T> Throttled<T> {
    /// Wrap a transport with a shared gate
    pub fn new(inner: T, gate: Arc<RateGate>) -> Self {
        Self { inner, gate }
    }

    /// The gate shared by all requests through this stage
    pub fn gate(&self) -> &Arc<RateGate> {
        &self.gate
    }
}

#[async_trait]
impl<T: Transport> Transport for Throttled<T> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.gate.acquire().await;
        self.inner.send(request).await
    }
}
