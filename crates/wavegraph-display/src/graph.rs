//! WaveGraph: the top-level frame controller
//!
//! Owns the sample store, viewport and projectors, wires the viewport's
//! change notifications to invalidation flags, and recomputes the drawable
//! primitives once per requested frame. The host feeds it gestures and
//! layout, asks for `update()` every frame, and hands the resulting
//! primitive lists to its renderer.
//!
//! All of this runs on the frame thread. The only background work is audio
//! decoding (see `wavegraph_core::loader`); its result is applied here via
//! `set_decoded` once the host polls it off the loader channel.

use std::cell::Cell;
use std::rc::Rc;

use wavegraph_core::decode::DecodedAudio;
use wavegraph_core::error::StoreError;
use wavegraph_core::store::SampleStore;

use crate::config::DisplayConfig;
use crate::primitives::{Segment, Tick};
use crate::ruler::RulerProjector;
use crate::viewport::Viewport;
use crate::waveform::WaveformProjector;

/// Primitive lists produced for one frame
///
/// Borrowed from the controller's pools; consume (or copy out) before the
/// next `update()` call.
#[derive(Debug, Clone, Copy)]
pub struct FrameOutput<'a> {
    pub segments: &'a [Segment],
    pub major_ticks: &'a [Tick],
    pub minor_ticks: &'a [Tick],
}

/// Top-level controller wiring store, viewport and projectors together
pub struct WaveGraph {
    store: SampleStore,
    viewport: Viewport,
    waveform: WaveformProjector,
    ruler: RulerProjector,
    config: DisplayConfig,
    /// Set by the zoom observer; the next frame rebuilds the summary
    summary_dirty: Rc<Cell<bool>>,
    /// Set by both observers; cleared when a frame is produced
    redraw_needed: Rc<Cell<bool>>,
    summary_recomputes: u64,
}

impl WaveGraph {
    /// Create a graph with the given display configuration
    pub fn new(config: DisplayConfig) -> Self {
        let summary_dirty = Rc::new(Cell::new(false));
        let redraw_needed = Rc::new(Cell::new(false));

        let mut viewport = Viewport::new();

        // Zoom changes both invalidate the summary resolution and require a
        // redraw; translation only scrolls, so the cached summary survives.
        let dirty = Rc::clone(&summary_dirty);
        let redraw = Rc::clone(&redraw_needed);
        viewport.on_zoom(move || {
            dirty.set(true);
            redraw.set(true);
        });
        let redraw = Rc::clone(&redraw_needed);
        viewport.on_translate(move || {
            redraw.set(true);
        });

        viewport.set_zoom(config.initial_zoom);

        Self {
            store: SampleStore::new(),
            viewport,
            waveform: WaveformProjector::new(),
            ruler: RulerProjector::new(),
            config,
            summary_dirty,
            redraw_needed,
            summary_recomputes: 0,
        }
    }

    /// Load raw mono samples into the graph
    pub fn set_samples(&mut self, samples: Vec<f32>, sample_rate: f64) -> Result<(), StoreError> {
        self.store.load(samples, sample_rate)?;
        self.viewport.set_sample_count(self.store.sample_count());
        self.summary_dirty.set(true);
        self.redraw_needed.set(true);
        Ok(())
    }

    /// Apply a completed background decode
    pub fn set_decoded(&mut self, audio: DecodedAudio) -> Result<(), StoreError> {
        self.set_samples(audio.samples, audio.sample_rate)
    }

    /// Current zoom factor
    pub fn zoom(&self) -> f32 {
        self.viewport.zoom()
    }

    /// Set the absolute zoom factor (clamped to >= 1)
    pub fn set_zoom(&mut self, zoom: f32) {
        self.viewport.set_zoom(zoom);
    }

    /// Apply a multiplicative zoom delta from a pinch gesture
    pub fn apply_zoom_delta(&mut self, factor: f32) {
        let zoom = self.viewport.zoom() * factor;
        self.viewport.set_zoom(zoom);
    }

    /// Set the absolute scroll translation in logical pixels
    pub fn set_translation(&mut self, translation: f32) {
        self.viewport.set_translation(translation);
    }

    /// Apply a pan delta from a scroll gesture
    pub fn apply_pan_delta(&mut self, delta: f32) {
        let translation = self.viewport.translation() + delta;
        self.viewport.set_translation(translation);
    }

    /// Update the on-screen geometry (logical size and pixel density)
    pub fn set_layout(&mut self, width: f32, height: f32, pixel_density: f32) {
        self.viewport.set_layout(width, height, pixel_density);
        self.redraw_needed.set(true);
    }

    /// Read-only access to the coordinate model
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Read-only access to the sample store
    pub fn store(&self) -> &SampleStore {
        &self.store
    }

    /// Whether a gesture or load since the last frame requires a redraw
    pub fn needs_redraw(&self) -> bool {
        self.redraw_needed.get()
    }

    /// How many times the summary has been rebuilt (zoom epochs seen)
    pub fn summary_recomputes(&self) -> u64 {
        self.summary_recomputes
    }

    /// Produce the primitives for the current frame
    ///
    /// Rebuilds the summary first when the zoom epoch changed, so projectors
    /// never read a stale or partial summary, then projects the waveform and
    /// ruler. Slow frames are logged and otherwise ignored: a performance
    /// regression is observable, not a correctness failure.
    pub fn update(&mut self) -> FrameOutput<'_> {
        let start = std::time::Instant::now();

        if self.summary_dirty.get() {
            self.store.invalidate_summary();
            self.summary_dirty.set(false);
        }
        if self.store.summarize(self.viewport.total_unit_count()) {
            self.summary_recomputes += 1;
        }

        let waveform_height = (self.viewport.visible_height() - self.config.ruler_height).max(0.0);
        self.waveform.project(&self.store, &self.viewport, waveform_height);
        self.ruler.project(&self.store, &self.viewport, &self.config);

        self.redraw_needed.set(false);

        let fps = 1.0 / start.elapsed().as_secs_f64();
        if fps < 60.0 {
            log::warn!("*** bad frame performance: {:.0} fps", fps);
        }

        let ticks = self.ruler.ticks();
        FrameOutput {
            segments: self.waveform.segments(),
            major_ticks: ticks.major,
            minor_ticks: ticks.minor,
        }
    }
}

impl std::fmt::Debug for WaveGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaveGraph")
            .field("viewport", &self.viewport)
            .field("samples", &self.store.sample_count())
            .field("summary_recomputes", &self.summary_recomputes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ten_second_graph() -> WaveGraph {
        let mut graph = WaveGraph::new(DisplayConfig::default());
        graph.set_layout(1_000.0, 230.0, 1.0); // 30px ruler + 200px waveform
        graph.set_samples(vec![1.0; 441_000], 44_100.0).unwrap();
        graph.set_zoom(1.0);
        graph
    }

    #[test]
    fn test_end_to_end_ten_second_track() {
        let mut graph = ten_second_graph();
        let frame = graph.update();

        assert_eq!(frame.segments.len(), 1_000, "one segment per pixel column");

        let first = frame.segments[0];
        let half_height = (first.y_bottom - first.y_top) / 2.0;
        assert!(half_height > 0.0);
        for seg in frame.segments {
            assert!(((seg.y_bottom - seg.y_top) / 2.0 - half_height).abs() < 1e-3);
        }

        assert!((10..=11).contains(&frame.major_ticks.len()));
        for pair in frame.major_ticks.windows(2) {
            assert!((pair[1].x - pair[0].x - 100.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_end_to_end_empty_track() {
        let mut graph = WaveGraph::new(DisplayConfig::default());
        graph.set_layout(1_000.0, 230.0, 1.0);
        graph.set_samples(Vec::new(), 44_100.0).unwrap();

        assert_eq!(graph.store().duration(), 0.0);
        let frame = graph.update();
        assert!(frame.segments.is_empty());
        assert!(frame.major_ticks.is_empty());
        assert!(frame.minor_ticks.is_empty());
    }

    #[test]
    fn test_zoom_change_invalidates_summary_once() {
        let mut graph = ten_second_graph();
        graph.update();
        assert_eq!(graph.summary_recomputes(), 1);

        // Steady frames hit the cache
        graph.update();
        graph.update();
        assert_eq!(graph.summary_recomputes(), 1);

        let coarse_len = graph.store().summary_len();
        graph.set_zoom(4.0);
        graph.update();
        assert_eq!(graph.summary_recomputes(), 2, "zoom rebuilds exactly once");
        assert!(
            graph.store().summary_len() > coarse_len,
            "zooming in must produce a finer summary"
        );

        graph.update();
        assert_eq!(graph.summary_recomputes(), 2);
    }

    #[test]
    fn test_translation_does_not_invalidate_summary() {
        let mut graph = ten_second_graph();
        graph.update();
        let recomputes = graph.summary_recomputes();

        graph.set_translation(-200.0);
        graph.update();
        graph.apply_pan_delta(-50.0);
        graph.update();

        assert_eq!(graph.summary_recomputes(), recomputes);
    }

    #[test]
    fn test_redraw_flag_lifecycle() {
        let mut graph = ten_second_graph();
        assert!(graph.needs_redraw(), "load requests a redraw");

        graph.update();
        assert!(!graph.needs_redraw(), "update satisfies the request");

        graph.apply_pan_delta(-10.0);
        assert!(graph.needs_redraw(), "pan requests a redraw");
        graph.update();

        graph.apply_zoom_delta(2.0);
        assert!(graph.needs_redraw(), "zoom requests a redraw");
    }

    #[test]
    fn test_zoom_delta_is_multiplicative_and_clamped() {
        let mut graph = ten_second_graph();
        assert_eq!(graph.zoom(), 1.0);

        graph.apply_zoom_delta(2.0);
        graph.apply_zoom_delta(2.0);
        assert_eq!(graph.zoom(), 4.0);

        graph.apply_zoom_delta(0.01);
        assert_eq!(graph.zoom(), 1.0, "zoom never drops below 1");
    }

    #[test]
    fn test_set_decoded_wires_store_and_viewport() {
        let mut graph = WaveGraph::new(DisplayConfig::default());
        graph.set_layout(1_000.0, 230.0, 1.0);
        graph
            .set_decoded(DecodedAudio {
                samples: vec![0.5; 88_200],
                sample_rate: 44_100.0,
            })
            .unwrap();

        assert_eq!(graph.store().duration(), 2.0);
        assert_eq!(graph.viewport().sample_count(), 88_200);
        assert!(!graph.update().segments.is_empty());
    }

    #[test]
    fn test_invalid_sample_rate_leaves_graph_usable() {
        let mut graph = ten_second_graph();
        graph.update();

        let err = graph.set_samples(vec![0.0; 10], -1.0).unwrap_err();
        assert_eq!(err, StoreError::InvalidSampleRate(-1.0));

        // Previous track still projects
        let frame = graph.update();
        assert_eq!(frame.segments.len(), 1_000);
    }
}
