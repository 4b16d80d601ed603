//! Asynchronous image loading.
//!
//! Loading is awaitable and always ends in either a decoded [`ImageHandle`] or
//! an [`EngineError::Load`]. Callers decide what to do with a failure; nothing
//! is silently dropped.
//!
//! Blocking work (file reads, decoding) runs on a worker thread. The returned
//! future yields until the worker finishes or a watchdog thread gives up after
//! the load timeout, so it never blocks the executor that polls it.

use std::collections::HashMap;
use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::task::{Context, Poll, Waker};
use std::thread;
use std::time::Duration;

use fsce_core::EngineError;

use crate::handle::ImageHandle;

pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(5);

#[allow(async_fn_in_trait)]
pub trait ImageLoader {
    async fn load(&self, locator: &str) -> Result<ImageHandle, EngineError>;
}

enum Slot {
    Waiting(Option<Waker>),
    Ready(Result<ImageHandle, EngineError>),
    Taken,
}

struct Shared {
    slot: Mutex<Slot>,
    settled: Condvar,
}

impl Shared {
    fn new() -> Self {
        Self {
            slot: Mutex::new(Slot::Waiting(None)),
            settled: Condvar::new(),
        }
    }

    /// Store the outcome unless one is already there. Returns false when the
    /// load was settled earlier (finished or timed out).
    fn settle(&self, result: Result<ImageHandle, EngineError>) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        let waker = match &mut *slot {
            Slot::Waiting(waker) => waker.take(),
            Slot::Ready(_) | Slot::Taken => return false,
        };
        *slot = Slot::Ready(result);
        drop(slot);
        self.settled.notify_all();
        if let Some(waker) = waker {
            waker.wake();
        }
        true
    }

    fn is_waiting(&self) -> bool {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        matches!(*slot, Slot::Waiting(_))
    }
}

/// Pending result of [`spawn_load`].
pub struct LoadFuture {
    locator: String,
    shared: Arc<Shared>,
}

impl Future for LoadFuture {
    type Output = Result<ImageHandle, EngineError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut slot = self.shared.slot.lock().unwrap_or_else(PoisonError::into_inner);
        match std::mem::replace(&mut *slot, Slot::Taken) {
            Slot::Ready(result) => Poll::Ready(result),
            Slot::Waiting(_) => {
                *slot = Slot::Waiting(Some(cx.waker().clone()));
                Poll::Pending
            }
            Slot::Taken => Poll::Ready(Err(EngineError::load(
                &self.locator,
                "load result was already taken",
            ))),
        }
    }
}

/// Run `job` on a worker thread and resolve with its result, or with a
/// "timed out" [`EngineError::Load`] once `timeout` has passed.
///
/// A worker that overruns is not interrupted; it finishes in the background
/// and its result is dropped.
pub fn spawn_load<F>(locator: &str, timeout: Duration, job: F) -> LoadFuture
where
    F: FnOnce() -> Result<ImageHandle, String> + Send + 'static,
{
    let shared = Arc::new(Shared::new());
    let future = LoadFuture {
        locator: locator.to_string(),
        shared: Arc::clone(&shared),
    };

    let worker_shared = Arc::clone(&shared);
    let worker_locator = locator.to_string();
    let worker = thread::Builder::new()
        .name("fsce-image-load".to_string())
        .spawn(move || {
            let result = job().map_err(|reason| EngineError::load(&worker_locator, reason));
            if !worker_shared.settle(result) {
                log::debug!("Image '{worker_locator}' finished after its load gave up");
            }
        });
    if let Err(e) = worker {
        shared.settle(Err(EngineError::load(
            locator,
            format!("could not start loader: {e}"),
        )));
        return future;
    }

    let watchdog_shared = Arc::clone(&shared);
    let watchdog_locator = locator.to_string();
    let watchdog = thread::Builder::new()
        .name("fsce-image-watchdog".to_string())
        .spawn(move || {
            let slot = watchdog_shared
                .slot
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let (slot, _) = watchdog_shared
                .settled
                .wait_timeout_while(slot, timeout, |s| matches!(s, Slot::Waiting(_)))
                .unwrap_or_else(PoisonError::into_inner);
            drop(slot);
            if watchdog_shared.is_waiting() {
                watchdog_shared.settle(Err(EngineError::load(
                    &watchdog_locator,
                    format!("timed out after {} ms", timeout.as_millis()),
                )));
            }
        });
    if let Err(e) = watchdog {
        log::warn!("No load timeout for '{locator}': {e}");
    }

    future
}

/// Loads images from disk relative to a base directory.
///
/// Each load reads and decodes on its own worker thread through
/// [`spawn_load`], bounded by `timeout`.
#[derive(Debug, Clone)]
pub struct FsImageLoader {
    base_path: PathBuf,
    timeout: Duration,
}

impl FsImageLoader {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            timeout: DEFAULT_LOAD_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn resolve(&self, locator: &str) -> PathBuf {
        self.base_path.join(locator)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl ImageLoader for FsImageLoader {
    async fn load(&self, locator: &str) -> Result<ImageHandle, EngineError> {
        let path = self.resolve(locator);
        log::debug!("Loading image '{}'", path.display());
        spawn_load(locator, self.timeout, move || decode_file(&path)).await
    }
}

fn decode_file(path: &Path) -> Result<ImageHandle, String> {
    let bytes =
        fs::read(path).map_err(|e| format!("Failed to read image {}: {e}", path.display()))?;
    ImageHandle::from_bytes(&bytes)
        .map_err(|e| format!("Failed to decode image {}: {e}", path.display()))
}

/// Serves pre-decoded images by locator. Unknown locators fail to load.
#[derive(Debug, Default, Clone)]
pub struct MemoryImageLoader {
    images: HashMap<String, ImageHandle>,
}

impl MemoryImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, locator: &str, image: ImageHandle) {
        self.images.insert(locator.to_string(), image);
    }

    pub fn with(mut self, locator: &str, image: ImageHandle) -> Self {
        self.insert(locator, image);
        self
    }
}

impl ImageLoader for MemoryImageLoader {
    async fn load(&self, locator: &str) -> Result<ImageHandle, EngineError> {
        self.images
            .get(locator)
            .cloned()
            .ok_or_else(|| EngineError::load(locator, "no image registered for this locator"))
    }
}
