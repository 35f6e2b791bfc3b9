use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Eventually-consistent processing counters shared across request handlers.
/// Relaxed ordering is sufficient: these are observability statistics, not
/// correctness-critical state.
#[derive(Debug, Default)]
pub struct ProcessingStats {
    documents_processed: AtomicU64,
    successful_extractions: AtomicU64,
    failed_extractions: AtomicU64,
    total_processing_millis: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProcessingStatsSnapshot {
    pub documents_processed: u64,
    pub successful_extractions: u64,
    pub failed_extractions: u64,
    pub total_processing_millis: u64,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, elapsed_millis: u64, success: bool) {
        self.documents_processed.fetch_add(1, Ordering::Relaxed);
        self.total_processing_millis
            .fetch_add(elapsed_millis, Ordering::Relaxed);

        if success {
            self.successful_extractions.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_extractions.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> ProcessingStatsSnapshot {
        ProcessingStatsSnapshot {
            documents_processed: self.documents_processed.load(Ordering::Relaxed),
            successful_extractions: self.successful_extractions.load(Ordering::Relaxed),
            failed_extractions: self.failed_extractions.load(Ordering::Relaxed),
            total_processing_millis: self.total_processing_millis.load(Ordering::Relaxed),
        }
    }
}
