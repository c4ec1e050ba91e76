//! # Bounded Scheduler
//!
//! Sweeps a [`NetworkRange`] with at most `concurrency` probes in flight.
//!
//! A probe is dispatched as soon as a permit frees up, so one slow host only
//! holds its own slot. Every dispatched address gets exactly one outcome in
//! the [`ScanReport`], including probes whose task panicked.

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::{self, JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use lansweep_common::error::ReportError;
use lansweep_common::network::outcome::{ProbeError, ProbeOutcome};
use lansweep_common::network::range::NetworkRange;
use lansweep_common::report::{ScanReport, ScanSnapshot};

use crate::probe::LivenessProbe;

/// Observer invoked once per completed probe, from the worker task.
pub type OutcomeCallback = Arc<dyn Fn(&ProbeOutcome) + Send + Sync>;

pub struct Sweeper {
    probe: Arc<LivenessProbe>,
    concurrency: usize,
    timeout: Duration,
    on_outcome: Option<OutcomeCallback>,
}

impl Sweeper {
    pub fn new(probe: LivenessProbe, concurrency: usize, timeout: Duration) -> Self {
        Self {
            probe: Arc::new(probe),
            concurrency: concurrency.max(1),
            timeout,
            on_outcome: None,
        }
    }

    pub fn on_outcome(mut self, callback: OutcomeCallback) -> Self {
        self.on_outcome = Some(callback);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Probes every host address of `range` and returns the finalized report.
    ///
    /// Cancelling `cancel` stops dispatch at the next permit wait. Probes
    /// already running finish on their own timeout and are still recorded;
    /// the snapshot is then marked cancelled.
    pub async fn sweep(
        &self,
        range: NetworkRange,
        cancel: &CancellationToken,
    ) -> Result<ScanSnapshot, ReportError> {
        let report = Arc::new(ScanReport::new(range));
        let permits = Arc::new(Semaphore::new(self.concurrency));
        let mut in_flight: JoinSet<Result<(), ReportError>> = JoinSet::new();
        let mut pending: HashMap<task::Id, Ipv4Addr> = HashMap::new();
        let mut hosts = range.hosts();

        debug!(%range, concurrency = self.concurrency, timeout = ?self.timeout, "sweep started");

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    debug!(in_flight = in_flight.len(), "sweep cancelled, draining");
                    report.mark_cancelled()?;
                    break;
                }

                Some(joined) = in_flight.join_next_with_id(), if !in_flight.is_empty() => {
                    reap(joined, &mut pending, &report)?;
                }

                permit = Arc::clone(&permits).acquire_owned() => {
                    let Ok(permit) = permit else { break };
                    let Some(addr) = hosts.next() else { break };

                    report.mark_attempted()?;
                    let handle = in_flight.spawn(self.probe_task(addr, permit, Arc::clone(&report)));
                    pending.insert(handle.id(), addr);
                }
            }
        }

        while let Some(joined) = in_flight.join_next_with_id().await {
            reap(joined, &mut pending, &report)?;
        }

        let snapshot = report.finalize()?;
        debug!(
            attempted = snapshot.attempted(),
            recorded = snapshot.len(),
            cancelled = snapshot.is_cancelled(),
            "sweep finished"
        );
        Ok(snapshot)
    }

    fn probe_task(
        &self,
        addr: Ipv4Addr,
        permit: OwnedSemaphorePermit,
        report: Arc<ScanReport>,
    ) -> impl Future<Output = Result<(), ReportError>> + Send + 'static {
        let probe = Arc::clone(&self.probe);
        let timeout = self.timeout;
        let on_outcome = self.on_outcome.clone();

        async move {
            let _permit = permit;
            let outcome = probe.probe(addr, timeout).await;
            if let Some(callback) = &on_outcome {
                callback(&outcome);
            }
            report.record(outcome)
        }
    }
}

/// Settles one finished task. A task that died before recording gets an
/// `Aborted` outcome in its place.
fn reap(
    joined: Result<(task::Id, Result<(), ReportError>), JoinError>,
    pending: &mut HashMap<task::Id, Ipv4Addr>,
    report: &ScanReport,
) -> Result<(), ReportError> {
    match joined {
        Ok((id, recorded)) => {
            pending.remove(&id);
            recorded
        }
        Err(join_err) => {
            let Some(addr) = pending.remove(&join_err.id()) else {
                return Ok(());
            };
            error!("Probe for {addr} aborted: {join_err}");
            report.record(ProbeOutcome::unreachable(
                addr,
                ProbeError::Aborted(join_err.to_string()),
            ))
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
