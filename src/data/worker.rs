use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

use crate::data::dataset::Dataset;
use crate::data::fetcher::{DataQuery, DataSource, FetchError};

/// A fetch request tagged with the token that identifies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub token: u64,
    pub query: DataQuery,
}

/// Network work requested by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    Fetch(FetchTicket),
    Upload(PathBuf),
}

/// Outcome of a `Job`, delivered back on the UI thread.
#[derive(Debug)]
pub enum Completion {
    Fetched {
        token: u64,
        result: Result<Dataset, FetchError>,
    },
    Uploaded {
        path: PathBuf,
        result: Result<(), FetchError>,
    },
}

/// Runs jobs on background threads so the UI stays responsive.
///
/// Each job gets its own short-lived thread; finished jobs are queued on a
/// channel and drained with `try_recv` once per frame.
pub struct FetchWorker {
    source: Arc<dyn DataSource>,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    in_flight: usize,
}

impl FetchWorker {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        let (tx, rx) = channel();
        Self {
            source,
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Start `job`. `wake` is called from the worker thread once the
    /// completion has been queued.
    pub fn submit<W>(&mut self, job: Job, wake: W)
    where
        W: Fn() + Send + 'static,
    {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let fallback = job.clone();

        let spawned = std::thread::Builder::new()
            .name("trendboard-fetch".to_string())
            .spawn(move || {
                let completion = run_job(source.as_ref(), job);
                // The receiver only disappears when the app is shutting down.
                let _ = tx.send(completion);
                wake();
            });

        self.in_flight += 1;
        if let Err(e) = spawned {
            tracing::error!("Failed to spawn request worker: {e}");
            let _ = self.tx.send(failed(fallback, e));
        }
    }

    /// Next finished job, if any.
    pub fn try_recv(&mut self) -> Option<Completion> {
        let completion = self.rx.try_recv().ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(completion)
    }

    /// Block until the next job finishes or `timeout` passes.
    #[cfg(test)]
    pub fn recv_timeout(&mut self, timeout: std::time::Duration) -> Option<Completion> {
        let completion = self.rx.recv_timeout(timeout).ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(completion)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

fn run_job(source: &dyn DataSource, job: Job) -> Completion {
    match job {
        Job::Fetch(ticket) => Completion::Fetched {
            token: ticket.token,
            result: source.fetch(&ticket.query),
        },
        Job::Upload(path) => {
            let result = source.upload_csv(&path);
            Completion::Uploaded { path, result }
        }
    }
}

fn failed(job: Job, error: std::io::Error) -> Completion {
    match job {
        Job::Fetch(ticket) => Completion::Fetched {
            token: ticket.token,
            result: Err(FetchError::Worker(error)),
        },
        Job::Upload(path) => Completion::Uploaded {
            path,
            result: Err(FetchError::Worker(error)),
        },
    }
}
