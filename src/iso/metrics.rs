//! Opt-in timing for the iso pipeline.
//!
//! Only active with the `iso_metrics` feature on non-WASM targets; everywhere else
//! every call is a no-op and [`IsoMetrics::end`] returns `None`.
//!
//! ```ignore
//! let mut metrics = IsoMetrics::default();
//! metrics.begin();
//! let volume = metrics.time(TimingBucket::Sampling, || sample_volume(&field, &grid));
//! if let Some(report) = metrics.end() {
//!     println!("sampling: {} ns", report.sampling_ns);
//! }
//! ```

/// Pipeline phases that accumulate time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimingBucket {
    /// Evaluating the field over the grid.
    Sampling,
    /// Min/max scan and isovalue resolution.
    RangeAnalysis,
    /// Per-cell classification and edge interpolation.
    Classification,
    /// Serial vertex deduplication and face assembly.
    Assembly,
    /// Gradient vector sampling.
    GradientSampling,
}

/// Cumulative nanoseconds per [`TimingBucket`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IsoTimingReport {
    pub sampling_ns: u64,
    pub range_analysis_ns: u64,
    pub classification_ns: u64,
    pub assembly_ns: u64,
    pub gradient_sampling_ns: u64,
}

impl IsoTimingReport {
    #[must_use]
    pub fn total_ns(&self) -> u64 {
        self.sampling_ns
            .saturating_add(self.range_analysis_ns)
            .saturating_add(self.classification_ns)
            .saturating_add(self.assembly_ns)
            .saturating_add(self.gradient_sampling_ns)
    }

    #[must_use]
    pub fn total_ms(&self) -> f64 {
        self.total_ns() as f64 / 1_000_000.0
    }
}

#[derive(Debug, Default)]
pub struct IsoMetrics {
    #[cfg(all(feature = "iso_metrics", not(target_arch = "wasm32")))]
    report: IsoTimingReport,
}

impl IsoMetrics {
    /// Resets all counters.
    pub fn begin(&mut self) {
        #[cfg(all(feature = "iso_metrics", not(target_arch = "wasm32")))]
        {
            self.report = IsoTimingReport::default();
        }
    }

    /// The accumulated report, `None` when metrics are compiled out.
    #[must_use]
    pub fn end(&self) -> Option<IsoTimingReport> {
        #[cfg(all(feature = "iso_metrics", not(target_arch = "wasm32")))]
        {
            Some(self.report.clone())
        }
        #[cfg(not(all(feature = "iso_metrics", not(target_arch = "wasm32"))))]
        {
            None
        }
    }

    /// Runs `f` and adds its wall time to `bucket`.
    pub fn time<R>(&mut self, bucket: TimingBucket, f: impl FnOnce() -> R) -> R {
        #[cfg(all(feature = "iso_metrics", not(target_arch = "wasm32")))]
        {
            let start = std::time::Instant::now();
            let result = f();
            let nanos = start.elapsed().as_nanos().min(u128::from(u64::MAX)) as u64;
            self.add_to_bucket(bucket, nanos);
            result
        }

        #[cfg(not(all(feature = "iso_metrics", not(target_arch = "wasm32"))))]
        {
            let _ = bucket;
            f()
        }
    }

    #[cfg(all(feature = "iso_metrics", not(target_arch = "wasm32")))]
    fn add_to_bucket(&mut self, bucket: TimingBucket, nanos: u64) {
        let slot = match bucket {
            TimingBucket::Sampling => &mut self.report.sampling_ns,
            TimingBucket::RangeAnalysis => &mut self.report.range_analysis_ns,
            TimingBucket::Classification => &mut self.report.classification_ns,
            TimingBucket::Assembly => &mut self.report.assembly_ns,
            TimingBucket::GradientSampling => &mut self.report.gradient_sampling_ns,
        };
        *slot = slot.saturating_add(nanos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_total_sums_buckets() {
        let report = IsoTimingReport {
            sampling_ns: 1000,
            assembly_ns: 2000,
            gradient_sampling_ns: 3000,
            ..Default::default()
        };
        assert_eq!(report.total_ns(), 6000);
        assert!((report.total_ms() - 0.006).abs() < 1e-9);
    }

    #[test]
    fn time_returns_closure_result() {
        let mut metrics = IsoMetrics::default();
        metrics.begin();
        assert_eq!(metrics.time(TimingBucket::Sampling, || 42), 42);
        let report = metrics.end();
        if cfg!(all(feature = "iso_metrics", not(target_arch = "wasm32"))) {
            assert!(report.is_some());
        } else {
            assert!(report.is_none());
        }
    }
}
