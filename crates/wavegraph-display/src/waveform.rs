//! Waveform projection: one vertical segment per visible pixel column
//!
//! Walks the visible pixel columns left to right, maps each column back to a
//! time via the viewport, fetches the summary value at that time and emits a
//! segment mirrored around the vertical midline. Segment slots come from a
//! grow-only pool, so steady-state frames allocate nothing.

use wavegraph_core::store::SampleStore;

use crate::primitives::{Pool, Segment};
use crate::viewport::Viewport;

/// Projects the sample summary into vertical segment primitives
#[derive(Debug, Default)]
pub struct WaveformProjector {
    pool: Pool<Segment>,
    pooled_units: usize,
    emitted: usize,
}

impl WaveformProjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the visible segments for the current frame
    ///
    /// Returns the number of segments emitted. Stops early when the visible
    /// width is covered, the summary is exhausted, or the pool runs out.
    pub fn project(&mut self, store: &SampleStore, viewport: &Viewport, height: f32) -> usize {
        self.prepare(viewport);
        self.pool.hide_all();
        self.emitted = 0;

        let summary_len = store.summary_len();
        let duration = store.duration();
        let total_units = viewport.total_unit_count();
        if summary_len == 0 || duration <= 0.0 || total_units == 0 {
            return 0;
        }

        // Starting summary index bounds how many columns can still be drawn.
        let first_index = viewport.starting_unit().clamp(0, summary_len as i64) as usize;
        let remaining = summary_len - first_index;

        let visible_duration = duration / viewport.zoom() as f64;
        let start_time = viewport.starting_unit() as f64 / total_units as f64 * duration;

        // Scale against the global extrema, not the visible slice, so the
        // vertical scale holds steady while scrolling.
        let max_magnitude = store
            .summary_max()
            .max(-store.summary_min())
            .max(f32::MIN_POSITIVE);
        let y_scale = height / 2.0 / max_magnitude;
        let y_midline = height / 2.0;

        // Rubber-banding past the start: the wave begins mid-screen at the
        // translation offset instead of column zero.
        let mut x = if viewport.translation() > 0.0 {
            viewport.translation()
        } else {
            0.0
        };

        let visible_width = viewport.visible_width();
        let step = 1.0 / viewport.pixel_density();
        let slots = self.pool.slots_mut();

        let mut idx = 0;
        while idx < remaining && x < visible_width && idx < slots.len() {
            let time = start_time + (x / visible_width) as f64 * visible_duration;
            let value = store.value_at_time(time);
            let y = value * y_scale;

            let slot = &mut slots[idx];
            slot.x = x;
            slot.y_top = y_midline - y;
            slot.y_bottom = y_midline + y;
            slot.hidden = false;

            x += step;
            idx += 1;
        }

        self.emitted = idx;
        idx
    }

    /// Segments emitted by the last `project()` call
    pub fn segments(&self) -> &[Segment] {
        self.pool.prefix(self.emitted)
    }

    /// Grow the pool when the visible unit count changes
    ///
    /// Growing happens before projection so a zoom edge that widens the
    /// pixel mapping never starves the walk of slots mid-frame.
    fn prepare(&mut self, viewport: &Viewport) {
        let units = viewport.visible_unit_count();
        if self.pooled_units != units {
            self.pooled_units = units;
            self.pool.ensure(units);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_store(samples: Vec<f32>, rate: f64, target: usize) -> SampleStore {
        let mut store = SampleStore::new();
        store.load(samples, rate).unwrap();
        store.summarize(target);
        store
    }

    fn test_viewport(width: f32, samples: usize) -> Viewport {
        let mut vp = Viewport::new();
        vp.set_layout(width, 200.0, 1.0);
        vp.set_sample_count(samples);
        vp
    }

    #[test]
    fn test_one_segment_per_visible_column() {
        // 10 seconds at 44.1kHz, zoom 1, 1000px wide, density 1
        let n = 441_000;
        let vp = test_viewport(1_000.0, n);
        let store = loaded_store(vec![1.0; n], 44_100.0, vp.total_unit_count());

        let mut projector = WaveformProjector::new();
        let emitted = projector.project(&store, &vp, 200.0);

        assert_eq!(emitted, 1_000);
        let segments = projector.segments();
        assert_eq!(segments.len(), 1_000);

        // Constant amplitude input: every segment has the same non-zero
        // half-height, centered on the midline.
        let first = segments[0];
        let half_height = (first.y_bottom - first.y_top) / 2.0;
        assert!(half_height > 0.0, "constant signal must produce visible bars");
        for seg in segments {
            assert!(!seg.hidden);
            assert!(((seg.y_bottom - seg.y_top) / 2.0 - half_height).abs() < 1e-3);
            assert!(((seg.y_top + seg.y_bottom) / 2.0 - 100.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_empty_store_emits_nothing() {
        let mut store = SampleStore::new();
        store.load(Vec::new(), 44_100.0).unwrap();
        store.summarize(1_000);

        let vp = test_viewport(1_000.0, 0);
        let mut projector = WaveformProjector::new();
        assert_eq!(projector.project(&store, &vp, 200.0), 0);
        assert!(projector.segments().is_empty());
    }

    #[test]
    fn test_rubber_band_offsets_first_column() {
        let n = 441_000;
        let mut vp = test_viewport(1_000.0, n);
        vp.set_translation(40.0); // overscrolled before the start
        let store = loaded_store(vec![0.5; n], 44_100.0, vp.total_unit_count());

        let mut projector = WaveformProjector::new();
        let emitted = projector.project(&store, &vp, 200.0);
        assert!(emitted > 0);
        assert_eq!(projector.segments()[0].x, 40.0);
    }

    #[test]
    fn test_scroll_does_not_change_vertical_scale() {
        // A loud passage at the start must not rescale once scrolled away:
        // the projector scales against global extrema.
        let n = 441_000;
        let mut samples = vec![0.1_f32; n];
        for s in samples.iter_mut().take(44_100) {
            *s = 1.0;
        }

        let mut vp = test_viewport(1_000.0, n);
        vp.set_zoom(4.0);
        let store = loaded_store(samples, 44_100.0, vp.total_unit_count());

        let mut projector = WaveformProjector::new();
        projector.project(&store, &vp, 200.0);
        let quiet_at_origin: Vec<f32> = projector
            .segments()
            .iter()
            .rev()
            .take(10)
            .map(|s| s.y_bottom - s.y_top)
            .collect();

        // Scroll so the loud opening is off screen
        vp.set_translation(-2_000.0);
        projector.project(&store, &vp, 200.0);
        let quiet_scrolled: Vec<f32> = projector
            .segments()
            .iter()
            .rev()
            .take(10)
            .map(|s| s.y_bottom - s.y_top)
            .collect();

        for (a, b) in quiet_at_origin.iter().zip(&quiet_scrolled) {
            assert!((a - b).abs() < 1e-3, "scale jittered while scrolling");
        }
    }

    #[test]
    fn test_pool_grows_with_wider_layout() {
        let n = 441_000;
        let mut vp = test_viewport(500.0, n);
        let store = loaded_store(vec![0.5; n], 44_100.0, vp.total_unit_count());

        let mut projector = WaveformProjector::new();
        assert_eq!(projector.project(&store, &vp, 200.0), 500);

        vp.set_layout(1_500.0, 200.0, 1.0);
        let mut store = store;
        store.invalidate_summary();
        store.summarize(vp.total_unit_count());
        assert_eq!(projector.project(&store, &vp, 200.0), 1_500);
    }
}
