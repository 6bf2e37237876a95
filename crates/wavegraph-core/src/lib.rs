//! Wavegraph Core - Sample storage and data reduction for waveform display

pub mod decode;
pub mod error;
pub mod loader;
pub mod store;
pub mod types;

pub use types::*;
