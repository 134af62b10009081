//! Resilience primitives for calls to the media provider
//!
//! Retry delays come from the `backon` crate, the optional throttle from
//! `governor`. Both sleep through an injected [`clock::Sleeper`] so policies can
//! be exercised without waiting on the wall clock.

pub mod clock {
    //! Injectable sleep

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::time::Duration;

    #[async_trait]
    pub trait Sleeper: Send + Sync {
        async fn sleep(&self, duration: Duration);
    }

    /// Sleeps on the tokio timer
    #[derive(Debug, Clone, Copy, Default)]
    pub struct TokioSleeper;

    #[async_trait]
    impl Sleeper for TokioSleeper {
        async fn sleep(&self, duration: Duration) {
            tokio::time::sleep(duration).await;
        }
    }

    /// Records every requested delay and returns immediately
    #[derive(Debug, Default)]
    pub struct RecordingSleeper {
        sleeps: Mutex<Vec<Duration>>,
    }

    impl RecordingSleeper {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Delays requested so far, in order
        #[must_use]
        pub fn sleeps(&self) -> Vec<Duration> {
            self.sleeps.lock().clone()
        }
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.sleeps.lock().push(duration);
        }
    }
}

pub mod retry {
    //! Bounded retry of a fallible async operation
    //!
    //! Every failure is retried; there is no error classification. Once the
    //! attempt budget is spent the last error is returned as-is.

    use backon::{BackoffBuilder, ConstantBackoff, ConstantBuilder, ExponentialBackoff, ExponentialBuilder};
    use serde::{Deserialize, Serialize};
    use std::fmt::Display;
    use std::future::Future;
    use std::time::Duration;

    use super::clock::Sleeper;

    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);
    pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum BackoffKind {
        /// Same delay between every attempt
        #[default]
        Fixed,
        /// Delay doubles per attempt, capped at `max_delay`
        Exponential,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RetryPolicy {
        /// Total attempts including the first; 0 behaves like 1
        pub max_attempts: u32,
        pub delay: Duration,
        pub backoff: BackoffKind,
        pub max_delay: Duration,
        pub jitter: bool,
    }

    impl Default for RetryPolicy {
        fn default() -> Self {
            Self {
                max_attempts: DEFAULT_MAX_ATTEMPTS,
                delay: DEFAULT_DELAY,
                backoff: BackoffKind::Fixed,
                max_delay: DEFAULT_MAX_DELAY,
                jitter: false,
            }
        }
    }

    enum Delays {
        Constant(ConstantBackoff),
        Exponential(ExponentialBackoff),
    }

    impl Iterator for Delays {
        type Item = Duration;

        fn next(&mut self) -> Option<Duration> {
            match self {
                Self::Constant(b) => b.next(),
                Self::Exponential(b) => b.next(),
            }
        }
    }

    impl RetryPolicy {
        #[must_use]
        pub const fn fixed(max_attempts: u32, delay: Duration) -> Self {
            Self {
                max_attempts,
                delay,
                backoff: BackoffKind::Fixed,
                max_delay: DEFAULT_MAX_DELAY,
                jitter: false,
            }
        }

        #[must_use]
        pub const fn with_backoff(mut self, backoff: BackoffKind, max_delay: Duration) -> Self {
            self.backoff = backoff;
            self.max_delay = max_delay;
            self
        }

        #[must_use]
        pub const fn with_jitter(mut self, jitter: bool) -> Self {
            self.jitter = jitter;
            self
        }

        /// Number of retries after the first attempt
        #[must_use]
        pub fn retries(&self) -> usize {
            self.max_attempts.max(1) as usize - 1
        }

        fn delays(&self) -> Delays {
            match self.backoff {
                BackoffKind::Fixed => {
                    let mut builder = ConstantBuilder::default()
                        .with_delay(self.delay)
                        .with_max_times(self.retries());
                    if self.jitter {
                        builder = builder.with_jitter();
                    }
                    Delays::Constant(builder.build())
                }
                BackoffKind::Exponential => {
                    let mut builder = ExponentialBuilder::default()
                        .with_min_delay(self.delay)
                        .with_max_delay(self.max_delay)
                        .with_max_times(self.retries());
                    if self.jitter {
                        builder = builder.with_jitter();
                    }
                    Delays::Exponential(builder.build())
                }
            }
        }

        /// Run `f` until it succeeds or the attempt budget is spent
        ///
        /// Sleeps only between attempts, never after the last one.
        pub async fn run<T, E, F, Fut>(
            &self,
            sleeper: &dyn Sleeper,
            operation: &str,
            mut f: F,
        ) -> Result<T, E>
        where
            F: FnMut() -> Fut,
            Fut: Future<Output = Result<T, E>>,
            E: Display,
        {
            let mut delays = self.delays();
            let mut attempt: u32 = 1;

            loop {
                match f().await {
                    Ok(value) => return Ok(value),
                    Err(err) => {
                        let Some(delay) = delays.next() else {
                            tracing::warn!(
                                operation,
                                attempt,
                                error = %err,
                                "Provider call failed, retries exhausted"
                            );
                            return Err(err);
                        };

                        tracing::warn!(
                            operation,
                            attempt,
                            max_attempts = self.max_attempts.max(1),
                            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                            error = %err,
                            "Provider call failed, retrying"
                        );
                        sleeper.sleep(delay).await;
                        attempt += 1;
                    }
                }
            }
        }
    }
}

pub mod pacing {
    //! Spacing between consecutive remote mutations
    //!
    //! `Fixed` waits a settle interval after every mutation. `Throttle` admits
    //! at most one mutation per interval across every caller sharing the pacer.

    use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
    use serde::{Deserialize, Serialize};
    use std::sync::Arc;
    use std::time::Duration;

    use super::clock::Sleeper;

    pub const DEFAULT_SETTLE_INTERVAL: Duration = Duration::from_millis(200);

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PacingMode {
        #[default]
        Fixed,
        Throttle,
    }

    #[derive(Clone)]
    pub enum Pacer {
        Fixed { interval: Duration },
        Throttle { interval: Duration, limiter: Arc<DefaultDirectRateLimiter> },
    }

    impl std::fmt::Debug for Pacer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Self::Fixed { interval } => f.debug_struct("Fixed").field("interval", interval).finish(),
                Self::Throttle { interval, .. } => {
                    f.debug_struct("Throttle").field("interval", interval).finish()
                }
            }
        }
    }

    impl Default for Pacer {
        fn default() -> Self {
            Self::fixed(DEFAULT_SETTLE_INTERVAL)
        }
    }

    impl Pacer {
        #[must_use]
        pub const fn fixed(interval: Duration) -> Self {
            Self::Fixed { interval }
        }

        /// No spacing at all
        #[must_use]
        pub const fn disabled() -> Self {
            Self::Fixed { interval: Duration::ZERO }
        }

        /// Token bucket with a burst of one; a zero interval disables pacing
        #[must_use]
        pub fn throttle(interval: Duration) -> Self {
            match Quota::with_period(interval) {
                Some(quota) => Self::Throttle {
                    interval,
                    limiter: Arc::new(RateLimiter::direct(quota)),
                },
                None => Self::disabled(),
            }
        }

        #[must_use]
        pub fn from_mode(mode: PacingMode, interval: Duration) -> Self {
            match mode {
                PacingMode::Fixed => Self::fixed(interval),
                PacingMode::Throttle => Self::throttle(interval),
            }
        }

        #[must_use]
        pub const fn interval(&self) -> Duration {
            match self {
                Self::Fixed { interval } | Self::Throttle { interval, .. } => *interval,
            }
        }

        /// Wait for permission to issue a mutation
        pub async fn acquire(&self) {
            if let Self::Throttle { limiter, .. } = self {
                limiter.until_ready().await;
            }
        }

        /// Wait after a mutation has completed
        pub async fn settle(&self, sleeper: &dyn Sleeper) {
            if let Self::Fixed { interval } = self {
                if !interval.is_zero() {
                    sleeper.sleep(*interval).await;
                }
            }
        }
    }
}
