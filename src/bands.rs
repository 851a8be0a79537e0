//! Ordinal classes for choropleths: cut a continuous value (population
//! density, say) into a fixed, ordered list of labelled bands.
use crate::errors::BandError;

/// One class of a [`Bands`] set. Codes count up from 0 in break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Band<'a> {
    pub code: usize,
    pub label: &'a str,
}

/// # Bands
/// Sorted breaks `b0 < b1 < ... < bn` and one label per interval. Intervals
/// are closed on the right, `(b[i], b[i+1]]`, except the first which also
/// takes `b0` itself, so every value in `[b0, bn]` lands in exactly one band.
#[derive(Debug, Clone, PartialEq)]
pub struct Bands {
    breaks: Vec<f64>,
    labels: Vec<String>,
}

impl Bands {
    pub fn new(breaks: Vec<f64>, labels: Vec<String>) -> Result<Bands, BandError> {
        if breaks.len() < 2 {
            return Err(BandError::TooFewBreaks(breaks.len()));
        }
        if let Some(bad) = breaks.iter().find(|b| !b.is_finite()) {
            return Err(BandError::NonFiniteBreak(*bad));
        }
        if let Some(pair) = breaks.windows(2).find(|w| w[0] >= w[1]) {
            return Err(BandError::UnsortedBreaks {
                previous: pair[0],
                next: pair[1],
            });
        }
        if labels.len() != breaks.len() - 1 {
            return Err(BandError::LabelCount {
                expected: breaks.len() - 1,
                actual: labels.len(),
            });
        }
        Ok(Bands { breaks, labels })
    }

    /// Labels made up from the breaks themselves, e.g. `"50-100"`.
    pub fn with_range_labels(breaks: Vec<f64>) -> Result<Bands, BandError> {
        let labels = breaks
            .windows(2)
            .map(|w| format!("{}-{}", w[0], w[1]))
            .collect();
        Bands::new(breaks, labels)
    }

    /// Breaks at the `n`-quantiles of `values` (NaNs ignored). Duplicate
    /// quantiles collapse, so heavily tied data can give fewer than `n` bands.
    pub fn quantile(values: &[f64], n: usize) -> Result<Bands, BandError> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() || n == 0 {
            return Err(BandError::TooFewBreaks(0));
        }
        sorted.sort_by(|a, b| a.total_cmp(b));
        let last = sorted.len() - 1;
        let mut breaks: Vec<f64> = (0..=n)
            .map(|i| {
                // Linear interpolation between order statistics.
                let pos = last as f64 * i as f64 / n as f64;
                let lo = pos.floor() as usize;
                let hi = pos.ceil() as usize;
                sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
            })
            .collect();
        breaks.dedup();
        Bands::with_range_labels(breaks)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn breaks(&self) -> &[f64] {
        &self.breaks
    }

    pub fn labels(&self) -> impl Iterator<Item = Band<'_>> {
        self.labels
            .iter()
            .enumerate()
            .map(|(code, label)| Band { code, label })
    }

    pub fn band(&self, code: usize) -> Option<Band<'_>> {
        self.labels.get(code).map(|label| Band { code, label })
    }

    /// The band `value` falls in; `None` outside the breaks or for NaN.
    pub fn classify(&self, value: f64) -> Option<Band<'_>> {
        let first = *self.breaks.first()?;
        let last = *self.breaks.last()?;
        if value.is_nan() || value < first || value > last {
            return None;
        }
        // Index of the first break >= value, which is the upper end of its band.
        let upper = self.breaks.partition_point(|b| *b < value);
        self.band(upper.saturating_sub(1))
    }
}
