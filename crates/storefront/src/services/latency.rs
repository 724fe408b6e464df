//! Simulated network latency.
//!
//! Every emulated remote call goes through [`remote_call`], which waits for
//! a delay drawn from a [`LatencyRange`] and then runs the operation. The
//! operation itself runs synchronously after the wait, so overlapping calls
//! never interleave inside a mutation.

use std::time::Duration;

use rand::Rng;

/// Inclusive range a simulated delay is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LatencyRange {
    pub min: Duration,
    pub max: Duration,
}

impl LatencyRange {
    /// No delay at all.
    pub const ZERO: Self = Self::fixed(Duration::ZERO);

    /// Always exactly `delay`.
    #[must_use]
    pub const fn fixed(delay: Duration) -> Self {
        Self {
            min: delay,
            max: delay,
        }
    }

    /// Always exactly `ms` milliseconds.
    #[must_use]
    pub const fn millis(ms: u64) -> Self {
        Self::fixed(Duration::from_millis(ms))
    }

    /// Uniformly between `min` and `max`. Bounds given in the wrong order are
    /// swapped.
    #[must_use]
    pub fn between(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Draw one delay.
    #[must_use]
    pub fn sample(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        rand::rng().random_range(self.min..=self.max)
    }

    /// Sleep for one sampled delay. Returns immediately for a zero delay.
    pub async fn wait(&self) {
        let delay = self.sample();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Delays used by each emulated operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyProfile {
    /// Sign-up and sign-in.
    pub auth: LatencyRange,
    /// Sign-out.
    pub sign_out: LatencyRange,
    /// Document reads and writes.
    pub database: LatencyRange,
    /// Product appends.
    pub append: LatencyRange,
    /// Delivery of a subscription's snapshot.
    pub subscribe: LatencyRange,
    /// Blob uploads.
    pub upload: LatencyRange,
    /// Download URL resolution.
    pub resolve_url: LatencyRange,
}

impl LatencyProfile {
    /// Timings that mimic a hosted backend.
    #[must_use]
    pub const fn realistic() -> Self {
        Self {
            auth: LatencyRange::millis(500),
            sign_out: LatencyRange::millis(300),
            database: LatencyRange::millis(300),
            append: LatencyRange::ZERO,
            subscribe: LatencyRange::millis(100),
            upload: LatencyRange::millis(800),
            resolve_url: LatencyRange::ZERO,
        }
    }

    /// No delays anywhere.
    #[must_use]
    pub const fn instant() -> Self {
        Self {
            auth: LatencyRange::ZERO,
            sign_out: LatencyRange::ZERO,
            database: LatencyRange::ZERO,
            append: LatencyRange::ZERO,
            subscribe: LatencyRange::ZERO,
            upload: LatencyRange::ZERO,
            resolve_url: LatencyRange::ZERO,
        }
    }
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self::realistic()
    }
}

/// Emulate a remote call: wait out the latency, then run `op`.
///
/// Not cancellable in any useful sense: once the delay has elapsed `op` runs
/// to completion, and a caller that stops polling earlier simply never sees
/// the result of a call that may still have been applied.
pub async fn remote_call<T>(latency: LatencyRange, op: impl FnOnce() -> T) -> T {
    latency.wait().await;
    op()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_range_samples_exactly() {
        let range = LatencyRange::millis(300);
        assert_eq!(range.sample(), Duration::from_millis(300));
    }

    #[test]
    fn test_between_samples_within_bounds() {
        let range = LatencyRange::between(Duration::from_millis(50), Duration::from_millis(10));
        assert_eq!(range.min, Duration::from_millis(10));
        for _ in 0..100 {
            let d = range.sample();
            assert!(d >= range.min && d <= range.max);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_remote_call_waits_before_running() {
        let start = tokio::time::Instant::now();
        let value = remote_call(LatencyRange::millis(500), || 42).await;
        assert_eq!(value, 42);
        assert!(start.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_instant_profile_does_not_sleep() {
        let profile = LatencyProfile::instant();
        let start = std::time::Instant::now();
        remote_call(profile.database, || ()).await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
