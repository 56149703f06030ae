use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;

use crate::{
    assets::source::{ImageSource, SourceResolver},
    blend::compositor::{Composite, Compositor, CompositorOpts},
    foundation::error::BlendError,
};

/// Caller-visible lifecycle of the latest composite request.
#[derive(Debug)]
pub enum BlendState {
    /// No sources selected; nothing in flight.
    Idle,
    /// The latest request is resolving its sources.
    Resolving {
        /// Generation tag of the in-flight request.
        generation: u64,
        /// Number of sources being resolved, for progress display.
        sources: usize,
    },
    /// The latest request produced a composite.
    Succeeded(Composite),
    /// The latest request failed.
    Failed(BlendError),
}

enum WorkerMsg {
    Run {
        generation: u64,
        sources: Vec<ImageSource>,
    },
    Exit,
}

/// Session driving composite requests on a background worker.
///
/// Each request carries a monotonically increasing generation. Only the
/// outcome matching the latest generation is applied to session state; results
/// from superseded requests are discarded without side effects. There is no
/// cancellation signal to in-flight work: stale results are dropped, not
/// stopped.
pub struct BlendSession {
    tx: mpsc::Sender<WorkerMsg>,
    results: mpsc::Receiver<(u64, Result<Composite, BlendError>)>,
    latest: Arc<AtomicU64>,
    state: BlendState,
    worker: Option<thread::JoinHandle<()>>,
}

impl BlendSession {
    /// Spawn a session worker using `resolver` for source bytes.
    pub fn new(resolver: Arc<dyn SourceResolver>, opts: CompositorOpts) -> Self {
        let (tx, rx) = mpsc::channel::<WorkerMsg>();
        let (results_tx, results) = mpsc::channel();
        let latest = Arc::new(AtomicU64::new(0));

        let worker_latest = Arc::clone(&latest);
        let worker = thread::spawn(move || {
            let compositor = Compositor::new(opts);
            worker_loop(&compositor, resolver.as_ref(), &worker_latest, &rx, &results_tx);
        });

        Self {
            tx,
            results,
            latest,
            state: BlendState::Idle,
            worker: Some(worker),
        }
    }

    /// Submit a new source set, superseding any in-flight request.
    ///
    /// An empty set returns the session to [`BlendState::Idle`] without
    /// dispatching any work (the caller-visible "prompt for input" state); the
    /// in-flight request, if any, is still superseded and its result dropped.
    /// Returns the generation assigned to this request.
    pub fn request(&mut self, sources: Vec<ImageSource>) -> u64 {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        if sources.is_empty() {
            self.state = BlendState::Idle;
            return generation;
        }

        self.state = BlendState::Resolving {
            generation,
            sources: sources.len(),
        };
        // A send failure means the worker is gone; the disconnect surfaces on
        // the next poll/wait.
        let _ = self.tx.send(WorkerMsg::Run {
            generation,
            sources,
        });
        generation
    }

    /// Current state without draining pending results.
    pub fn state(&self) -> &BlendState {
        &self.state
    }

    /// Drain settled results and return the updated state.
    ///
    /// Outcomes tagged with a superseded generation are discarded.
    pub fn poll(&mut self) -> &BlendState {
        loop {
            match self.results.try_recv() {
                Ok((generation, outcome)) => self.apply(generation, outcome),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    self.fail_on_disconnect();
                    break;
                }
            }
        }
        &self.state
    }

    /// Block until the latest request settles, then return the state.
    pub fn wait(&mut self) -> &BlendState {
        while matches!(self.state, BlendState::Resolving { .. }) {
            match self.results.recv() {
                Ok((generation, outcome)) => self.apply(generation, outcome),
                Err(_) => {
                    self.fail_on_disconnect();
                    break;
                }
            }
        }
        &self.state
    }

    fn apply(&mut self, generation: u64, outcome: Result<Composite, BlendError>) {
        if generation != self.latest.load(Ordering::SeqCst) {
            tracing::debug!(generation, "discarding stale composite result");
            return;
        }
        self.state = match outcome {
            Ok(composite) => BlendState::Succeeded(composite),
            Err(e) => BlendState::Failed(e),
        };
    }

    fn fail_on_disconnect(&mut self) {
        if matches!(self.state, BlendState::Resolving { .. }) {
            self.state =
                BlendState::Failed(anyhow::anyhow!("composite worker disconnected").into());
        }
    }
}

impl Drop for BlendSession {
    fn drop(&mut self) {
        let _ = self.tx.send(WorkerMsg::Exit);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

fn worker_loop(
    compositor: &Compositor,
    resolver: &dyn SourceResolver,
    latest: &AtomicU64,
    rx: &mpsc::Receiver<WorkerMsg>,
    results_tx: &mpsc::Sender<(u64, Result<Composite, BlendError>)>,
) {
    loop {
        let Ok(mut msg) = rx.recv() else {
            break;
        };

        // Coalesce the queue to the newest request; Exit always wins.
        while let Ok(next) = rx.try_recv() {
            msg = match (msg, next) {
                (WorkerMsg::Exit, _) | (_, WorkerMsg::Exit) => WorkerMsg::Exit,
                (WorkerMsg::Run { generation: a, sources: sa }, WorkerMsg::Run { generation: b, sources: sb }) => {
                    if b >= a {
                        WorkerMsg::Run { generation: b, sources: sb }
                    } else {
                        WorkerMsg::Run { generation: a, sources: sa }
                    }
                }
            };
        }

        match msg {
            WorkerMsg::Exit => break,
            WorkerMsg::Run {
                generation,
                sources,
            } => {
                // Skip work that was superseded before it started.
                if generation != latest.load(Ordering::SeqCst) {
                    tracing::debug!(generation, "skipping superseded composite request");
                    continue;
                }
                let outcome = compositor.composite(resolver, &sources);
                if results_tx.send((generation, outcome)).is_err() {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/blend_session.rs"]
mod tests;
