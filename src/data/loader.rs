//! One-shot async loading bridged into the egui update loop.
//!
//! Loads are async but egui's update() is synchronous. A `LoadChannel`
//! spawns a single background task, and the UI polls for its result
//! each frame.

use super::source::LoadError;
use eframe::egui;
use std::future::Future;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Outcome of a completed load.
#[derive(Debug)]
pub enum LoadResult<T> {
    /// Load finished successfully
    Loaded { value: T, elapsed_ms: f64 },
    /// Fetch or parse failed
    Failed(LoadError),
}

/// Channel-based one-shot loader.
///
/// `start` may only launch one task per channel. Later calls are ignored,
/// so a resource is loaded at most once per application lifetime.
pub struct LoadChannel<T> {
    label: &'static str,
    sender: Sender<LoadResult<T>>,
    receiver: Receiver<LoadResult<T>>,
    started: bool,
}

impl<T: Send + 'static> LoadChannel<T> {
    pub fn new(label: &'static str) -> Self {
        let (sender, receiver) = channel();
        Self {
            label,
            sender,
            receiver,
            started: false,
        }
    }

    /// Spawns the load task.
    ///
    /// On native: spawns a thread that drives the future on a current-thread
    /// tokio runtime. On WASM: uses wasm_bindgen_futures::spawn_local.
    ///
    /// When the task completes, the result is sent through the channel and
    /// ctx.request_repaint() is called to trigger a UI update.
    pub fn start<F, Fut>(&mut self, ctx: egui::Context, task: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, LoadError>> + 'static,
    {
        if self.started {
            log::debug!("{} load already started, ignoring request", self.label);
            return;
        }
        self.started = true;

        let sender = self.sender.clone();
        let label = self.label;

        #[cfg(not(target_arch = "wasm32"))]
        {
            std::thread::spawn(move || {
                let result = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => runtime.block_on(run_timed(label, task())),
                    Err(e) => LoadResult::Failed(LoadError::Runtime(e.to_string())),
                };
                let _ = sender.send(result);
                ctx.request_repaint();
            });
        }

        #[cfg(target_arch = "wasm32")]
        {
            wasm_bindgen_futures::spawn_local(async move {
                let result = run_timed(label, task()).await;
                let _ = sender.send(result);
                ctx.request_repaint();
            });
        }
    }

    /// Non-blocking check for a completed load.
    pub fn try_recv(&self) -> Option<LoadResult<T>> {
        self.receiver.try_recv().ok()
    }
}

async fn run_timed<T>(
    label: &str,
    future: impl Future<Output = Result<T, LoadError>>,
) -> LoadResult<T> {
    let started = web_time::Instant::now();
    match future.await {
        Ok(value) => {
            let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
            log::info!("{} load finished in {:.0} ms", label, elapsed_ms);
            LoadResult::Loaded { value, elapsed_ms }
        }
        Err(e) => {
            log::error!("{} load failed: {}", label, e);
            LoadResult::Failed(e)
        }
    }
}
