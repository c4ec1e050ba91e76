//! # Scan Report
//!
//! [`ScanReport`] is the only state shared between probe workers. Appends are
//! serialized behind a mutex. Once [`ScanReport::finalize`] runs the report
//! refuses further mutation and hands out an immutable [`ScanSnapshot`].

use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Local};

use crate::error::ReportError;
use crate::network::outcome::{ProbeErrorKind, ProbeOutcome};
use crate::network::range::NetworkRange;

#[derive(Debug, Default)]
struct ReportState {
    outcomes: Vec<ProbeOutcome>,
    attempted: usize,
    cancelled: bool,
    finalized: bool,
}

#[derive(Debug)]
pub struct ScanReport {
    range: NetworkRange,
    started_at: DateTime<Local>,
    state: Mutex<ReportState>,
}

impl ScanReport {
    pub fn new(range: NetworkRange) -> Self {
        Self {
            range,
            started_at: Local::now(),
            state: Mutex::new(ReportState::default()),
        }
    }

    pub fn range(&self) -> NetworkRange {
        self.range
    }

    /// Counts one dispatched probe.
    pub fn mark_attempted(&self) -> Result<(), ReportError> {
        let mut state = self.open_state()?;
        state.attempted += 1;
        Ok(())
    }

    /// Appends the outcome of a completed probe.
    pub fn record(&self, outcome: ProbeOutcome) -> Result<(), ReportError> {
        let mut state = self.open_state()?;
        state.outcomes.push(outcome);
        Ok(())
    }

    pub fn mark_cancelled(&self) -> Result<(), ReportError> {
        let mut state = self.open_state()?;
        state.cancelled = true;
        Ok(())
    }

    /// Seals the report. Every later `record`, `mark_*` or `finalize` fails.
    pub fn finalize(&self) -> Result<ScanSnapshot, ReportError> {
        let mut state = self.open_state()?;
        state.finalized = true;

        Ok(ScanSnapshot {
            range: self.range,
            started_at: self.started_at,
            finished_at: Local::now(),
            attempted: state.attempted,
            cancelled: state.cancelled,
            outcomes: std::mem::take(&mut state.outcomes),
        })
    }

    fn open_state(&self) -> Result<MutexGuard<'_, ReportState>, ReportError> {
        let state = self.lock();
        if state.finalized {
            return Err(ReportError::Finalized);
        }
        Ok(state)
    }

    // No critical section can leave the state half-written, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, ReportState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Counts per outcome class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub reachable: usize,
    pub unreachable: usize,
    pub by_kind: BTreeMap<ProbeErrorKind, usize>,
}

/// Immutable result of a finished (or cancelled) sweep.
///
/// Outcomes are kept in completion order. Use [`ScanSnapshot::sorted`] or
/// [`ScanSnapshot::reachable`] when address order matters.
#[derive(Debug, Clone)]
pub struct ScanSnapshot {
    range: NetworkRange,
    started_at: DateTime<Local>,
    finished_at: DateTime<Local>,
    attempted: usize,
    cancelled: bool,
    outcomes: Vec<ProbeOutcome>,
}

impl ScanSnapshot {
    pub fn range(&self) -> NetworkRange {
        self.range
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn finished_at(&self) -> DateTime<Local> {
        self.finished_at
    }

    /// Number of probes that were dispatched.
    pub fn attempted(&self) -> usize {
        self.attempted
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn outcomes(&self) -> impl Iterator<Item = &ProbeOutcome> {
        self.outcomes.iter()
    }

    pub fn get(&self, addr: Ipv4Addr) -> Option<&ProbeOutcome> {
        self.outcomes.iter().find(|outcome| outcome.address() == addr)
    }

    /// All outcomes ordered by address.
    pub fn sorted(&self) -> Vec<&ProbeOutcome> {
        let mut sorted: Vec<&ProbeOutcome> = self.outcomes.iter().collect();
        sorted.sort_by_key(|outcome| outcome.address());
        sorted
    }

    /// Reachable hosts ordered by address.
    pub fn reachable(&self) -> Vec<&ProbeOutcome> {
        self.sorted()
            .into_iter()
            .filter(|outcome| outcome.is_reachable())
            .collect()
    }

    pub fn summary(&self) -> Summary {
        self.outcomes
            .iter()
            .fold(Summary::default(), |mut summary, outcome| {
                match outcome.error() {
                    None => summary.reachable += 1,
                    Some(err) => {
                        summary.unreachable += 1;
                        *summary.by_kind.entry(err.kind()).or_default() += 1;
                    }
                }
                summary
            })
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
