//! Wavegraph Display - Viewport mapping and primitive projection
//!
//! This crate turns a `SampleStore` plus a zoom/scroll state into drawable
//! primitives, once per frame:
//!
//! - **`viewport`**: pure coordinate model relating sample index, elapsed
//!   time and pixel position under zoom and translation
//! - **`waveform`**: one vertical segment per visible pixel column
//! - **`ruler`**: whole-second and tenth-second tick marks, phase-locked to
//!   the audio's absolute time axis
//! - **`graph`**: the frame controller that owns and wires everything
//!
//! No pixels are drawn here; the host renderer consumes the `FrameOutput`
//! primitive lists and is solely responsible for rasterization.

pub mod config;
pub mod graph;
pub mod primitives;
pub mod ruler;
pub mod viewport;
pub mod waveform;

pub use config::{load_config, save_config, DisplayConfig};
pub use graph::{FrameOutput, WaveGraph};
pub use primitives::{Segment, Tick};
pub use ruler::{RulerProjector, RulerTicks};
pub use viewport::Viewport;
pub use waveform::WaveformProjector;
