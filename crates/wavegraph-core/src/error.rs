//! Error types for audio loading and sample storage

use thiserror::Error;

/// Errors that can occur while decoding an audio file
#[derive(Error, Debug)]
pub enum DecodeError {
    /// File not found or couldn't be read
    #[error("Failed to read audio file: {0}")]
    Io(#[from] std::io::Error),

    /// Container or codec not recognized by the probe
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// The container holds no decodable audio track
    #[error("No audio track found in file")]
    NoAudioTrack,

    /// The codec parameters carry no sample rate
    #[error("Audio track reports no sample rate")]
    UnknownSampleRate,

    /// A newer load request superseded this one before it completed
    #[error("Load superseded by a newer request")]
    Superseded,
}

/// Errors that can occur when loading raw samples into a store
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Sample rate must be positive
    #[error("Invalid sample rate: {0} Hz")]
    InvalidSampleRate(f64),
}

/// Result type for decode operations
pub type DecodeResult<T> = Result<T, DecodeError>;
