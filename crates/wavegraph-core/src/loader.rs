//! Background audio loading
//!
//! Decoding a long file can take hundreds of milliseconds, far beyond the
//! interactive frame budget, so it runs on a dedicated thread:
//!
//! 1. The host submits a `LoadRequest` with the file path
//! 2. The loader thread decodes it via `decode::decode_file`
//! 3. The host polls `try_recv()` from the frame thread each tick
//!
//! Latest request wins: each request carries a generation number. The loader
//! thread drains its queue to the newest request before decoding, answering
//! the skipped ones with `DecodeError::Superseded`, and `try_recv()` drops
//! any result older than the most recently submitted generation. A new load
//! therefore always supersedes an in-flight one.

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use crate::decode::{decode_file, DecodedAudio};
use crate::error::{DecodeError, DecodeResult};

/// Request to decode an audio file
#[derive(Debug)]
pub struct LoadRequest {
    /// Monotonic request generation, newest wins
    pub generation: u64,
    /// File to decode
    pub path: PathBuf,
}

/// Completed (or superseded) decode
#[derive(Debug)]
pub struct LoadResult {
    /// Generation of the originating request
    pub generation: u64,
    /// Decoded audio, or why there is none
    pub outcome: DecodeResult<DecodedAudio>,
}

/// Background thread for decoding audio files
pub struct AudioLoader {
    tx: Sender<LoadRequest>,
    rx: Receiver<LoadResult>,
    latest_generation: u64,
    _handle: JoinHandle<()>,
}

impl AudioLoader {
    /// Spawn the background decode thread
    pub fn spawn() -> Self {
        let (request_tx, request_rx) = std::sync::mpsc::channel::<LoadRequest>();
        let (result_tx, result_rx) = std::sync::mpsc::channel::<LoadResult>();

        let handle = thread::Builder::new()
            .name("audio-loader".to_string())
            .spawn(move || {
                loader_thread(request_rx, result_tx);
            })
            .expect("Failed to spawn audio loader thread");

        log::info!("AudioLoader background thread started");

        Self {
            tx: request_tx,
            rx: result_rx,
            latest_generation: 0,
            _handle: handle,
        }
    }

    /// Submit a file for decoding (non-blocking)
    ///
    /// Supersedes any request still in flight. Returns the generation the
    /// eventual result will carry.
    pub fn load(&mut self, path: PathBuf) -> Result<u64, String> {
        self.latest_generation += 1;
        let generation = self.latest_generation;
        self.tx
            .send(LoadRequest { generation, path })
            .map_err(|e| format!("Audio loader thread disconnected: {}", e))?;
        Ok(generation)
    }

    /// Try to receive the newest completed decode (non-blocking)
    ///
    /// Results from superseded requests are silently dropped; only a result
    /// matching the most recently submitted generation is returned. Call this
    /// in the frame tick handler.
    pub fn try_recv(&self) -> Option<LoadResult> {
        loop {
            match self.rx.try_recv() {
                Ok(result) if result.generation == self.latest_generation => {
                    return Some(result);
                }
                Ok(stale) => {
                    log::debug!(
                        "AudioLoader: dropping stale result (generation {} < {})",
                        stale.generation,
                        self.latest_generation
                    );
                }
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => {
                    log::error!("Audio loader thread disconnected unexpectedly");
                    return None;
                }
            }
        }
    }
}

/// The background decode thread
fn loader_thread(rx: Receiver<LoadRequest>, tx: Sender<LoadResult>) {
    log::debug!("Audio loader thread starting");

    while let Ok(mut request) = rx.recv() {
        // Drain to the newest queued request; answer the skipped ones so the
        // host observes the cancellation rather than a silent gap.
        while let Ok(newer) = rx.try_recv() {
            let _ = tx.send(LoadResult {
                generation: request.generation,
                outcome: Err(DecodeError::Superseded),
            });
            request = newer;
        }

        let start = std::time::Instant::now();
        let outcome = decode_file(&request.path);
        log::debug!(
            "Audio load generation {} finished in {:?} (ok = {})",
            request.generation,
            start.elapsed(),
            outcome.is_ok()
        );

        let _ = tx.send(LoadResult {
            generation: request.generation,
            outcome,
        });
    }

    log::debug!("Audio loader thread shutting down");
}
