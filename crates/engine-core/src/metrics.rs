use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

#[derive(Debug, Default)]
struct InnerMetrics {
    records_found: AtomicU64,
    records_integrated: AtomicU64,
    duplicates: AtomicU64,
    failure_count: AtomicU64,
    requests_sent: AtomicU64,
    chunks_processed: AtomicU64,
    fallback_chunks: AtomicU64,
}

/// Counters shared by a sync run. Cloning shares the same counters.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<InnerMetrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub records_found: u64,
    pub records_integrated: u64,
    pub duplicates: u64,
    pub failure_count: u64,
    pub requests_sent: u64,
    pub chunks_processed: u64,
    pub fallback_chunks: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Metrics {
            inner: Arc::new(InnerMetrics::default()),
        }
    }

    pub fn increment_found(&self, count: u64) {
        self.inner.records_found.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_integrated(&self, count: u64) {
        self.inner
            .records_integrated
            .fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_duplicates(&self, count: u64) {
        self.inner.duplicates.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_failures(&self, count: u64) {
        self.inner.failure_count.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_requests(&self, count: u64) {
        self.inner.requests_sent.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_chunks(&self, count: u64) {
        self.inner
            .chunks_processed
            .fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_fallbacks(&self, count: u64) {
        self.inner.fallback_chunks.fetch_add(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            records_found: self.inner.records_found.load(Ordering::Relaxed),
            records_integrated: self.inner.records_integrated.load(Ordering::Relaxed),
            duplicates: self.inner.duplicates.load(Ordering::Relaxed),
            failure_count: self.inner.failure_count.load(Ordering::Relaxed),
            requests_sent: self.inner.requests_sent.load(Ordering::Relaxed),
            chunks_processed: self.inner.chunks_processed.load(Ordering::Relaxed),
            fallback_chunks: self.inner.fallback_chunks.load(Ordering::Relaxed),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_counters() {
        let metrics = Metrics::new();
        let clone = metrics.clone();

        metrics.increment_found(3);
        clone.increment_integrated(2);
        clone.increment_failures(1);
        metrics.increment_requests(3);

        let snap = metrics.snapshot();
        assert_eq!(snap.records_found, 3);
        assert_eq!(snap.records_integrated, 2);
        assert_eq!(snap.failure_count, 1);
        assert_eq!(snap.requests_sent, 3);
        assert_eq!(snap.duplicates, 0);
    }

    #[test]
    fn test_fresh_snapshot_is_zeroed() {
        assert_eq!(Metrics::default().snapshot(), MetricsSnapshot::default());
    }
}
