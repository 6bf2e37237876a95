//! Time-ruler projection: major (1s) and minor (0.1s) tick marks
//!
//! Ticks are phase-locked to the audio's absolute time axis: the first
//! visible tick lands on the next whole second (or tenth) after the left
//! edge's time, not on the viewport origin, so marks never swim against the
//! waveform while scrolling. Minor ticks are suppressed wholesale when the
//! current zoom would pack them too densely to read.

use wavegraph_core::store::SampleStore;

use crate::config::DisplayConfig;
use crate::primitives::{Pool, Tick};
use crate::viewport::Viewport;

/// Major and minor tick lists for one frame
#[derive(Debug, Clone, Copy)]
pub struct RulerTicks<'a> {
    pub major: &'a [Tick],
    pub minor: &'a [Tick],
}

/// Projects calibrated ruler ticks from the store/viewport time mapping
#[derive(Debug, Default)]
pub struct RulerProjector {
    major_pool: Pool<Tick>,
    minor_pool: Pool<Tick>,
    major_emitted: usize,
    minor_emitted: usize,
}

impl RulerProjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute tick positions for the current frame
    pub fn project<'a>(
        &'a mut self,
        store: &SampleStore,
        viewport: &Viewport,
        config: &DisplayConfig,
    ) -> RulerTicks<'a> {
        self.major_emitted = 0;
        self.minor_emitted = 0;
        self.major_pool.hide_all();
        self.minor_pool.hide_all();

        let duration = store.duration();
        let visible_width = viewport.visible_width();
        let total_units = viewport.total_unit_count();
        if duration <= 0.0 || visible_width <= 0.0 || total_units == 0 {
            return self.ticks();
        }

        let visible_duration = duration / viewport.zoom() as f64;
        let start_time = viewport.starting_unit() as f64 / total_units as f64 * duration;
        let draw_minor = can_draw_minor(visible_width, visible_duration, config);

        self.grow_pools(visible_width, visible_duration, draw_minor);

        // Whole seconds
        self.major_emitted = walk_ticks(
            self.major_pool.slots_mut(),
            start_time,
            visible_duration,
            visible_width,
            1.0,
            config.major_tick_height,
            true,
        );

        // Tenths, unless suppressed for legibility
        if draw_minor {
            self.minor_emitted = walk_ticks(
                self.minor_pool.slots_mut(),
                start_time,
                visible_duration,
                visible_width,
                10.0,
                config.minor_tick_height,
                false,
            );
        }

        self.ticks()
    }

    /// Ticks emitted by the last `project()` call
    pub fn ticks(&self) -> RulerTicks<'_> {
        RulerTicks {
            major: self.major_pool.prefix(self.major_emitted),
            minor: self.minor_pool.prefix(self.minor_emitted),
        }
    }

    /// Grow (never shrink) the tick pools for the visible span
    fn grow_pools(&mut self, visible_width: f32, visible_duration: f64, draw_minor: bool) {
        let one_sec_width = (1.0 / visible_duration) as f32 * visible_width;
        let num_secs = (visible_width / one_sec_width) as usize + 1;

        self.major_pool.ensure(num_secs);
        if draw_minor {
            self.minor_pool.ensure(num_secs * 10 + 1);
        }
    }
}

/// Fill tick slots at every 1/granularity seconds of source time
///
/// The phase offset anchors the first tick to the next absolute time
/// boundary at or after `start_time`. Returns the number of ticks emitted.
fn walk_ticks(
    slots: &mut [Tick],
    start_time: f64,
    visible_duration: f64,
    visible_width: f32,
    granularity: f64,
    height: f32,
    is_major: bool,
) -> usize {
    let diff = ((start_time * granularity).ceil() - start_time * granularity) / granularity;
    let tick_width = ((1.0 / visible_duration) as f32 * visible_width) / granularity as f32;

    let mut x = (diff / visible_duration) as f32 * visible_width;
    let mut idx = 0;
    while x < visible_width && idx < slots.len() {
        let slot = &mut slots[idx];
        slot.x = x;
        slot.height = height;
        slot.is_major = is_major;
        slot.hidden = false;
        x += tick_width;
        idx += 1;
    }
    idx
}

/// Legibility heuristic for tenth-second ticks
///
/// Mirrors the density test of the reference behavior: minors render only
/// when the would-be tick count per visible second clears the configured
/// threshold, i.e. when neighboring minors are far enough apart on screen.
fn can_draw_minor(visible_width: f32, visible_duration: f64, config: &DisplayConfig) -> bool {
    let minor_count = (visible_width as f64 / visible_duration * 10.0).ceil();
    minor_count / visible_duration > config.minor_tick_legibility
}
