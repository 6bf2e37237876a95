//! Sample storage and display-resolution summary reduction
//!
//! `SampleStore` owns the decoded mono samples for one track and derives a
//! display-resolution summary from them: a moving-window mean taken every
//! `hop` samples, where the hop follows the current zoom level's target
//! resolution. The summary is cached and only recomputed when the target
//! resolution changes, never on translation-only scrolls.

use crate::error::StoreError;
use crate::types::{Sample, SUMMARY_WINDOW};

/// Cached summary sequence with its extrema
///
/// `target` is the resolution the summary was computed for; it acts as the
/// cache key. A `summarize()` call with the same target is a no-op.
#[derive(Debug, Clone)]
struct Summary {
    values: Vec<Sample>,
    max: Sample,
    min: Sample,
    target: usize,
}

/// Centralized access to one track's audio sample data
///
/// Raw samples are written once at load time and treated as read-only by all
/// consumers. The summary has exactly one writer (the store itself); it is
/// rebuilt in full before readers see it, so `value_at_time` never observes
/// a half-written sequence.
#[derive(Debug, Default)]
pub struct SampleStore {
    samples: Vec<Sample>,
    sample_rate: f64,
    summary: Option<Summary>,
}

impl SampleStore {
    /// Create an empty store (no track loaded)
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the raw sample data
    ///
    /// Clears any cached summary. Fails if the sample rate is not positive;
    /// the store is left unchanged on failure.
    pub fn load(&mut self, samples: Vec<Sample>, sample_rate: f64) -> Result<(), StoreError> {
        if sample_rate <= 0.0 {
            return Err(StoreError::InvalidSampleRate(sample_rate));
        }
        log::info!(
            "SampleStore: loaded {} samples at {} Hz ({:.2}s)",
            samples.len(),
            sample_rate,
            samples.len() as f64 / sample_rate
        );
        self.samples = samples;
        self.sample_rate = sample_rate;
        self.summary = None;
        Ok(())
    }

    /// Raw sample count
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Borrowed view of the raw samples
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Track duration in seconds, 0 when no samples are loaded
    pub fn duration(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate
    }

    /// Number of elements in the current summary, 0 if none is cached
    pub fn summary_len(&self) -> usize {
        self.summary.as_ref().map_or(0, |s| s.values.len())
    }

    /// Borrowed view of the current summary, if one is cached
    pub fn summary(&self) -> Option<&[Sample]> {
        self.summary.as_ref().map(|s| s.values.as_slice())
    }

    /// Maximum of the current summary (0 when none is cached or it is empty)
    pub fn summary_max(&self) -> Sample {
        self.summary.as_ref().map_or(0.0, |s| s.max)
    }

    /// Minimum of the current summary (0 when none is cached or it is empty)
    pub fn summary_min(&self) -> Sample {
        self.summary.as_ref().map_or(0.0, |s| s.min)
    }

    /// Effective sample rate of the summary sequence
    ///
    /// The summary spans the same duration as the raw data with fewer
    /// elements, so its rate is the raw rate divided by the reduction ratio.
    pub fn summary_sample_rate(&self) -> Option<f64> {
        let summary = self.summary.as_ref()?;
        if self.samples.is_empty() || summary.values.is_empty() {
            return None;
        }
        let ratio = self.samples.len() as f64 / summary.values.len() as f64;
        Some(self.sample_rate / ratio)
    }

    /// Drop the cached summary so the next `summarize()` recomputes it
    ///
    /// Called by the owner when the zoom epoch changes. Translation-only
    /// changes must not call this.
    pub fn invalidate_summary(&mut self) {
        self.summary = None;
    }

    /// Reduce the raw samples to roughly `target_count` displayable values
    ///
    /// Each summary element is the mean of a fixed 128-sample window; windows
    /// start every `hop = max(1, samples / target_count)` samples. Returns
    /// `true` if the summary was (re)computed, `false` on a cache hit.
    pub fn summarize(&mut self, target_count: usize) -> bool {
        if let Some(summary) = &self.summary {
            if summary.target == target_count {
                return false;
            }
        }

        let start = std::time::Instant::now();
        let values = reduce(&self.samples, target_count);
        let (max, min) = extrema(&values);

        log::debug!(
            "SampleStore: summarized {} samples -> {} values (target {}) in {:?}",
            self.samples.len(),
            values.len(),
            target_count,
            start.elapsed()
        );

        self.summary = Some(Summary {
            values,
            max,
            min,
            target: target_count,
        });
        true
    }

    /// Summary value at time `t` seconds
    ///
    /// Total over all inputs: `t` outside `[0, duration)` yields 0 (this
    /// absorbs rubber-band overscroll queries), and the derived summary index
    /// is clamped to the valid range before reading, so the final sample is
    /// reachable without an out-of-bounds access.
    pub fn value_at_time(&self, t: f64) -> Sample {
        let duration = self.duration();
        if !(0.0..duration).contains(&t) {
            return 0.0;
        }
        let summary = match &self.summary {
            Some(s) if !s.values.is_empty() => s,
            _ => return 0.0,
        };
        let idx = (t / duration * summary.values.len() as f64) as usize;
        let idx = idx.min(summary.values.len() - 1);
        summary.values[idx]
    }
}

/// Moving-window mean reduction of `samples` toward `target_count` elements
fn reduce(samples: &[Sample], target_count: usize) -> Vec<Sample> {
    if samples.len() <= SUMMARY_WINDOW || target_count == 0 {
        return Vec::new();
    }

    let hop = (samples.len() / target_count).max(1);
    let mut values = Vec::with_capacity(samples.len() / hop + 1);

    let mut idx = 0;
    while idx + SUMMARY_WINDOW < samples.len() {
        values.push(window_mean(&samples[idx..idx + SUMMARY_WINDOW]));
        idx += hop;
    }
    values
}

/// Mean of a contiguous window
///
/// A plain slice sum auto-vectorizes on a contiguous `&[f32]`; no per-window
/// allocation happens here.
#[inline]
fn window_mean(window: &[Sample]) -> Sample {
    window.iter().sum::<Sample>() / window.len() as Sample
}

/// Max and min over a summary; an empty summary reads as silent (0, 0)
fn extrema(values: &[Sample]) -> (Sample, Sample) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let mut max = Sample::NEG_INFINITY;
    let mut min = Sample::INFINITY;
    for &v in values {
        max = max.max(v);
        min = min.min(v);
    }
    (max, min)
}
