use std::sync::atomic::{AtomicU64, Ordering};

/// What a single recommendation call produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Candidates were scored and the top ones returned
    Recommended { count: usize, query_matches: usize },
    /// The user had no usable history and no query was given
    NoSignal,
    /// Nothing could be ranked: empty corpus or a zero limit
    Unavailable,
}

/// Receives one [`Outcome`] per recommendation call.
///
/// Implementations must be cheap and must not fail; the engine never looks at
/// what the sink does with an outcome.
pub trait MetricsSink: Send + Sync {
    fn record(&self, outcome: Outcome);
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {
    #[inline]
    fn record(&self, _outcome: Outcome) {}
}

/// Point-in-time copy of [`CallCounters`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub recommended: u64,
    pub no_signal: u64,
    pub unavailable: u64,
    pub articles_returned: u64,
}

impl CallCounts {
    #[inline]
    pub fn total(&self) -> u64 {
        self.recommended + self.no_signal + self.unavailable
    }
}

/// Thread-safe call counters owned by whoever injects them
#[derive(Debug, Default)]
pub struct CallCounters {
    recommended: AtomicU64,
    no_signal: AtomicU64,
    unavailable: AtomicU64,
    articles_returned: AtomicU64,
}

impl CallCounters {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn snapshot(&self) -> CallCounts {
        CallCounts {
            recommended: self.recommended.load(Ordering::Relaxed),
            no_signal: self.no_signal.load(Ordering::Relaxed),
            unavailable: self.unavailable.load(Ordering::Relaxed),
            articles_returned: self.articles_returned.load(Ordering::Relaxed),
        }
    }
}

impl MetricsSink for CallCounters {
    #[inline]
    fn record(&self, outcome: Outcome) {
        match outcome {
            Outcome::Recommended { count, .. } => {
                self.recommended.fetch_add(1, Ordering::Relaxed);
                self.articles_returned
                    .fetch_add(count as u64, Ordering::Relaxed);
            }
            Outcome::NoSignal => {
                self.no_signal.fetch_add(1, Ordering::Relaxed);
            }
            Outcome::Unavailable => {
                self.unavailable.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let counters = CallCounters::new();
        counters.record(Outcome::Recommended {
            count: 3,
            query_matches: 0,
        });
        counters.record(Outcome::Recommended {
            count: 2,
            query_matches: 1,
        });
        counters.record(Outcome::NoSignal);
        counters.record(Outcome::Unavailable);

        let counts = counters.snapshot();
        assert_eq!(counts.recommended, 2);
        assert_eq!(counts.no_signal, 1);
        assert_eq!(counts.unavailable, 1);
        assert_eq!(counts.articles_returned, 5);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn noop_accepts_anything() {
        NoopMetrics.record(Outcome::NoSignal);
    }
}
