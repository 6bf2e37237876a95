//! Common types for wavegraph
//!
//! Fundamental audio types shared by the storage and display layers.

/// Audio sample type (32-bit float, mono)
pub type Sample = f32;

/// Moving-average window applied when reducing raw samples to a summary.
///
/// The window is fixed regardless of zoom; zoom only changes the hop between
/// windows. 128 samples (~3ms at 44.1kHz) smooths single-sample spikes while
/// keeping transients visible.
pub const SUMMARY_WINDOW: usize = 128;
