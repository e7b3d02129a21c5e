//! Background zap runner
//!
//! Hands zap requests to a payment backend on a worker thread. Each job
//! reports back through its own channel; the UI thread drains every channel
//! on tick so backend updates are applied in between key events, never
//! concurrently with them.

use crate::model::{ZapEvent, ZapRequest};
use anyhow::Result;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Message reported when a worker dies without saying how the zap ended
pub const WORKER_STOPPED: &str = "payment worker stopped unexpectedly";

/// External collaborator that actually performs the payment
pub trait PaymentBackend: Send + Sync {
    /// Short name for logs and the status bar
    fn name(&self) -> &str;

    /// Send the zap, blocking until it succeeds or fails.
    ///
    /// Called on a worker thread. Intermediate progress goes through
    /// `progress`; the returned error is shown to the user verbatim.
    fn send_zap(&self, request: &ZapRequest, progress: &ProgressReporter) -> Result<()>;
}

/// Progress handle given to a backend for one zap
pub struct ProgressReporter {
    tx: Sender<ZapEvent>,
}

impl ProgressReporter {
    fn new(tx: Sender<ZapEvent>) -> Self {
        Self { tx }
    }

    /// Report the completed fraction, clamped to `[0, 1]`
    pub fn progress(&self, fraction: f32) {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        // The app may already be gone, nothing to do then
        let _ = self.tx.send(ZapEvent::Progress(fraction));
    }
}

/// Identifier of a dispatched zap
pub type JobId = u64;

struct ZapJob {
    id: JobId,
    receiver: Receiver<ZapEvent>,
    started: Instant,
}

/// Runs zaps in the background and collects their events
pub struct ZapRunner {
    backend: Arc<dyn PaymentBackend>,
    jobs: Vec<ZapJob>,
    next_id: JobId,
}

impl ZapRunner {
    pub fn new(backend: Arc<dyn PaymentBackend>) -> Self {
        Self {
            backend,
            jobs: Vec::new(),
            next_id: 1,
        }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Start sending a zap and return immediately
    pub fn dispatch(&mut self, request: ZapRequest) -> JobId {
        let id = self.next_id;
        self.next_id += 1;

        let (tx, rx) = mpsc::channel();
        let backend = Arc::clone(&self.backend);

        tracing::info!(
            job = id,
            note = %request.note.id,
            amount_msats = request.amount_millisats,
            zap_type = request.zap_type.as_str(),
            backend = backend.name(),
            "dispatching zap"
        );

        thread::spawn(move || Self::run_job(backend, request, tx));

        self.jobs.push(ZapJob {
            id,
            receiver: rx,
            started: Instant::now(),
        });
        id
    }

    /// Drain pending events from every job without blocking.
    ///
    /// Jobs that finished or lost their worker are dropped.
    pub fn poll(&mut self) -> Vec<(JobId, ZapEvent)> {
        let mut events = Vec::new();

        self.jobs.retain(|job| {
            loop {
                match job.receiver.try_recv() {
                    Ok(event) => {
                        let done = event.is_terminal();
                        if done {
                            tracing::info!(
                                job = job.id,
                                elapsed_ms = job.started.elapsed().as_millis() as u64,
                                outcome = ?event,
                                "zap finished"
                            );
                        }
                        events.push((job.id, event));
                        if done {
                            return false;
                        }
                    }
                    Err(TryRecvError::Empty) => return true,
                    Err(TryRecvError::Disconnected) => {
                        tracing::warn!(job = job.id, "zap worker disconnected");
                        events.push((job.id, ZapEvent::Failed(WORKER_STOPPED.to_string())));
                        return false;
                    }
                }
            }
        });

        events
    }

    pub fn active_jobs(&self) -> usize {
        self.jobs.len()
    }

    fn run_job(backend: Arc<dyn PaymentBackend>, request: ZapRequest, tx: Sender<ZapEvent>) {
        let reporter = ProgressReporter::new(tx.clone());
        let outcome = match backend.send_zap(&request, &reporter) {
            Ok(()) => ZapEvent::Completed,
            Err(e) => {
                let message = format!("{:#}", e);
                tracing::warn!(error = %message, "zap failed");
                ZapEvent::Failed(message)
            }
        };
        let _ = tx.send(outcome);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::{NoteRef, ZapType};
    use anyhow::anyhow;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Backend that replays a fixed script and records what it was asked to send
    pub(crate) struct ScriptedBackend {
        pub steps: Vec<f32>,
        pub failure: Option<String>,
        pub sent: Mutex<Vec<ZapRequest>>,
    }

    impl ScriptedBackend {
        pub(crate) fn succeeding(steps: Vec<f32>) -> Self {
            Self {
                steps,
                failure: None,
                sent: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing(steps: Vec<f32>, message: &str) -> Self {
            Self {
                steps,
                failure: Some(message.to_string()),
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    impl PaymentBackend for ScriptedBackend {
        fn name(&self) -> &str {
            "scripted"
        }

        fn send_zap(&self, request: &ZapRequest, progress: &ProgressReporter) -> Result<()> {
            self.sent.lock().unwrap().push(request.clone());
            for step in &self.steps {
                progress.progress(*step);
            }
            match &self.failure {
                Some(message) => Err(anyhow!("{}", message)),
                None => Ok(()),
            }
        }
    }

    struct PanickingBackend;

    impl PaymentBackend for PanickingBackend {
        fn name(&self) -> &str {
            "panicking"
        }

        fn send_zap(&self, _request: &ZapRequest, _progress: &ProgressReporter) -> Result<()> {
            panic!("wallet exploded");
        }
    }

    pub(crate) fn request(amount_millisats: u64) -> ZapRequest {
        ZapRequest {
            note: NoteRef {
                id: "note1".to_string(),
                author: "author1".to_string(),
            },
            amount_millisats,
            invoice: None,
            message: "gm".to_string(),
            zap_type: ZapType::Public,
        }
    }

    /// Poll until every job is done or the deadline passes
    pub(crate) fn drain(runner: &mut ZapRunner) -> Vec<(JobId, ZapEvent)> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut events = Vec::new();
        loop {
            events.extend(runner.poll());
            if runner.active_jobs() == 0 || Instant::now() > deadline {
                return events;
            }
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_progress_then_completed_in_order() {
        let backend = Arc::new(ScriptedBackend::succeeding(vec![0.25, 0.5, 1.0]));
        let mut runner = ZapRunner::new(backend.clone());

        runner.dispatch(request(21_000));
        assert_eq!(runner.active_jobs(), 1);

        let events = drain(&mut runner);
        let kinds: Vec<ZapEvent> = events.into_iter().map(|(_, e)| e).collect();
        assert_eq!(
            kinds,
            vec![
                ZapEvent::Progress(0.25),
                ZapEvent::Progress(0.5),
                ZapEvent::Progress(1.0),
                ZapEvent::Completed,
            ]
        );
        assert_eq!(runner.active_jobs(), 0);
        assert_eq!(backend.sent.lock().unwrap()[0].amount_millisats, 21_000);
    }

    #[test]
    fn test_failure_carries_backend_message() {
        let backend = Arc::new(ScriptedBackend::failing(vec![0.5], "insufficient funds"));
        let mut runner = ZapRunner::new(backend);
        runner.dispatch(request(1_000));

        let events = drain(&mut runner);
        assert_eq!(
            events.last().map(|(_, e)| e.clone()),
            Some(ZapEvent::Failed("insufficient funds".to_string()))
        );
    }

    #[test]
    fn test_progress_is_clamped() {
        let backend = Arc::new(ScriptedBackend::succeeding(vec![-1.0, 7.0, f32::NAN]));
        let mut runner = ZapRunner::new(backend);
        runner.dispatch(request(1_000));

        let progress: Vec<f32> = drain(&mut runner)
            .into_iter()
            .filter_map(|(_, e)| match e {
                ZapEvent::Progress(p) => Some(p),
                _ => None,
            })
            .collect();
        assert_eq!(progress, vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_dead_worker_is_reported_as_failure() {
        let mut runner = ZapRunner::new(Arc::new(PanickingBackend));
        runner.dispatch(request(1_000));

        let events = drain(&mut runner);
        assert_eq!(
            events,
            vec![(1, ZapEvent::Failed(WORKER_STOPPED.to_string()))]
        );
    }

    #[test]
    fn test_jobs_get_distinct_ids() {
        let backend = Arc::new(ScriptedBackend::succeeding(vec![]));
        let mut runner = ZapRunner::new(backend);
        let a = runner.dispatch(request(1_000));
        let b = runner.dispatch(request(2_000));
        assert_ne!(a, b);

        let events = drain(&mut runner);
        let completed: Vec<JobId> = events
            .iter()
            .filter(|(_, e)| *e == ZapEvent::Completed)
            .map(|(id, _)| *id)
            .collect();
        assert_eq!(completed.len(), 2);
        assert!(completed.contains(&a) && completed.contains(&b));
    }
}
