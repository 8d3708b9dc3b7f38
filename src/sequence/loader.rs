//! Frame loading behind a fire-and-forget contract.
//!
//! A loader accepts every request up front and reports completions whenever the owner polls.
//! There is no cancellation: dropping a loader abandons its in-flight work, which still runs
//! to completion but is no longer observed.

use std::collections::{BTreeMap, VecDeque};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crate::foundation::error::{ScrollFxError, ScrollFxResult};
use crate::sequence::frames::{DecodedFrame, decode_frame};

/// One frame to load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRequest {
    /// 1-based frame index.
    pub index: u32,
    /// Source path.
    pub path: PathBuf,
}

/// Completion of one [`FrameRequest`].
#[derive(Debug)]
pub struct LoadOutcome {
    /// 1-based frame index.
    pub index: u32,
    /// Decoded frame or the reason it could not be loaded.
    pub result: ScrollFxResult<DecodedFrame>,
}

/// Source of decoded frames.
pub trait FrameLoader {
    /// Schedule every request. Must not block on IO.
    fn start(&mut self, requests: Vec<FrameRequest>);

    /// Completions that arrived since the last call. Never blocks.
    fn poll(&mut self) -> Vec<LoadOutcome>;

    /// Like [`FrameLoader::poll`], but may block up to `timeout` for the first completion.
    fn wait(&mut self, timeout: Duration) -> Vec<LoadOutcome> {
        let _ = timeout;
        self.poll()
    }
}

/// Reads and decodes frames from disk on the rayon thread pool.
#[derive(Debug)]
pub struct FsLoader {
    tx: mpsc::Sender<LoadOutcome>,
    rx: mpsc::Receiver<LoadOutcome>,
}

impl Default for FsLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl FsLoader {
    /// Loader with an empty completion queue.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }
}

fn load_from_disk(req: &FrameRequest) -> ScrollFxResult<DecodedFrame> {
    let bytes = std::fs::read(&req.path).map_err(|e| {
        ScrollFxError::asset(format!("failed to read frame '{}': {e}", req.path.display()))
    })?;
    decode_frame(&bytes)
}

impl FrameLoader for FsLoader {
    fn start(&mut self, requests: Vec<FrameRequest>) {
        tracing::debug!(count = requests.len(), "scheduling frame loads");
        for req in requests {
            let tx = self.tx.clone();
            rayon::spawn(move || {
                let result = load_from_disk(&req);
                // the receiver is gone once the owning player is destroyed
                let _ = tx.send(LoadOutcome {
                    index: req.index,
                    result,
                });
            });
        }
    }

    fn poll(&mut self) -> Vec<LoadOutcome> {
        self.rx.try_iter().collect()
    }

    fn wait(&mut self, timeout: Duration) -> Vec<LoadOutcome> {
        match self.rx.recv_timeout(timeout) {
            Ok(first) => {
                let mut out = vec![first];
                out.extend(self.rx.try_iter());
                out
            }
            Err(_) => Vec::new(),
        }
    }
}

/// Serves frames from memory; anything not registered fails.
///
/// Completions are queued in request order and handed out `batch` at a time per poll, which
/// lets callers observe a sequence before it is fully loaded.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    frames: BTreeMap<u32, MemoryFrame>,
    queue: VecDeque<LoadOutcome>,
    batch: Option<usize>,
}

#[derive(Debug)]
enum MemoryFrame {
    Encoded(Vec<u8>),
    Decoded(DecodedFrame),
}

impl MemoryLoader {
    /// Loader that delivers every completion on the first poll.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver at most `batch` completions per poll.
    pub fn with_batch(mut self, batch: usize) -> Self {
        self.batch = Some(batch.max(1));
        self
    }

    /// Serve encoded image bytes for frame `index`.
    pub fn insert_encoded(&mut self, index: u32, bytes: Vec<u8>) {
        self.frames.insert(index, MemoryFrame::Encoded(bytes));
    }

    /// Serve an already decoded frame for `index`.
    pub fn insert_decoded(&mut self, index: u32, frame: DecodedFrame) {
        self.frames.insert(index, MemoryFrame::Decoded(frame));
    }

    /// Completions not yet handed out.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }
}

impl FrameLoader for MemoryLoader {
    fn start(&mut self, requests: Vec<FrameRequest>) {
        for req in requests {
            let result = match self.frames.remove(&req.index) {
                Some(MemoryFrame::Encoded(bytes)) => decode_frame(&bytes),
                Some(MemoryFrame::Decoded(frame)) => Ok(frame),
                None => Err(ScrollFxError::asset(format!(
                    "no in-memory frame for '{}'",
                    req.path.display()
                ))),
            };
            self.queue.push_back(LoadOutcome {
                index: req.index,
                result,
            });
        }
    }

    fn poll(&mut self) -> Vec<LoadOutcome> {
        let n = self.batch.unwrap_or(self.queue.len()).min(self.queue.len());
        self.queue.drain(..n).collect()
    }
}

/// Block on `loader`, feeding completions into `state`, until `done(state)` holds or `timeout`
/// elapses.
pub(crate) fn wait_until<S>(
    loader: &mut dyn FrameLoader,
    timeout: Duration,
    state: &mut S,
    mut on_outcome: impl FnMut(&mut S, LoadOutcome),
    done: impl Fn(&S) -> bool,
) -> bool {
    let deadline = Instant::now() + timeout;
    while !done(state) {
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        let batch = loader.wait(deadline - now);
        // an empty wait means the timeout ran out or nothing else is coming
        if batch.is_empty() {
            return done(state);
        }
        for outcome in batch {
            on_outcome(state, outcome);
        }
    }
    true
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/loader.rs"]
mod tests;
