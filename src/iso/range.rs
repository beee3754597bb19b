//! Value-range statistics and the default isovalue policy.

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("no finite samples in the evaluated grid")]
    NoValidSamples,
}

/// Min/max over the finite samples, plus how many samples were finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
    pub valid_count: usize,
    pub total_count: usize,
}

impl ValueRange {
    #[must_use]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Fraction of samples that were finite, in `[0, 1]`.
    #[must_use]
    pub fn valid_ratio(&self) -> f64 {
        if self.total_count == 0 {
            0.0
        } else {
            self.valid_count as f64 / self.total_count as f64
        }
    }

    /// Isovalue used when the caller supplies none: zero when the samples straddle
    /// zero, otherwise the midpoint of the range.
    #[must_use]
    pub fn default_iso(&self) -> f64 {
        if self.min * self.max < 0.0 {
            0.0
        } else {
            (self.min + self.max) / 2.0
        }
    }

    /// The explicit isovalue when given, [`ValueRange::default_iso`] otherwise.
    #[must_use]
    pub fn resolve_iso(&self, requested: Option<f64>) -> f64 {
        requested.unwrap_or_else(|| self.default_iso())
    }

    #[must_use]
    pub fn as_array(&self) -> [f64; 2] {
        [self.min, self.max]
    }
}

/// Min/max/validity over `values`; non-finite entries are ignored.
pub fn analyze(values: &[f64]) -> Result<ValueRange, RangeError> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut valid_count = 0;

    for &value in values.iter().filter(|v| v.is_finite()) {
        min = min.min(value);
        max = max.max(value);
        valid_count += 1;
    }

    if valid_count == 0 {
        return Err(RangeError::NoValidSamples);
    }

    let range = ValueRange {
        min,
        max,
        valid_count,
        total_count: values.len(),
    };
    if range.span() == 0.0 {
        log::warn!("field is constant ({min}) over the sampled grid");
    }
    log::debug!(
        "value range [{min}, {max}], {valid_count}/{} valid",
        range.total_count
    );
    Ok(range)
}
