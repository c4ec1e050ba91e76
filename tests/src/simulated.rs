use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use lansweep_common::network::outcome::ProbeError;
use lansweep_core::probe::{LivenessCheck, LivenessProbe};

/// How a simulated host reacts to a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behaviour {
    /// Answers after the given delay.
    Respond(Duration),
    /// Actively refuses after the given delay.
    Refuse(Duration),
    /// Never answers.
    Silent,
    /// The check itself panics.
    Panic,
}

#[derive(Default)]
struct Counters {
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

/// A network of scripted hosts. Clones share their counters.
#[derive(Clone)]
pub struct SimulatedNetwork {
    hosts: Arc<HashMap<Ipv4Addr, Behaviour>>,
    fallback: Behaviour,
    counters: Arc<Counters>,
    cancel_after: Option<(usize, CancellationToken)>,
    calls_by_host: Arc<Mutex<HashMap<Ipv4Addr, usize>>>,
}

impl SimulatedNetwork {
    /// Every host not scripted with [`SimulatedNetwork::host`] behaves like `fallback`.
    pub fn new(fallback: Behaviour) -> Self {
        Self {
            hosts: Arc::new(HashMap::new()),
            fallback,
            counters: Arc::new(Counters::default()),
            cancel_after: None,
            calls_by_host: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn host(mut self, addr: Ipv4Addr, behaviour: Behaviour) -> Self {
        Arc::make_mut(&mut self.hosts).insert(addr, behaviour);
        self
    }

    /// Cancels `token` from inside the `n`-th check, as an interrupt would.
    pub fn cancel_after(mut self, n: usize, token: CancellationToken) -> Self {
        self.cancel_after = Some((n, token));
        self
    }

    pub fn probe(&self) -> LivenessProbe {
        LivenessProbe::new(Arc::new(self.clone()))
    }

    pub fn calls(&self) -> usize {
        self.counters.calls.load(Ordering::SeqCst)
    }

    /// Highest number of checks that were running at the same time.
    pub fn peak(&self) -> usize {
        self.counters.peak.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.counters.in_flight.load(Ordering::SeqCst)
    }

    pub fn calls_for(&self, addr: Ipv4Addr) -> usize {
        let calls = self.calls_by_host.lock().unwrap_or_else(|e| e.into_inner());
        calls.get(&addr).copied().unwrap_or(0)
    }

    fn behaviour_of(&self, addr: Ipv4Addr) -> Behaviour {
        self.hosts.get(&addr).copied().unwrap_or(self.fallback)
    }
}

/// Tracks one running check. Dropped on completion, timeout or panic alike.
struct InFlight<'a>(&'a Counters);

impl<'a> InFlight<'a> {
    fn enter(counters: &'a Counters) -> Self {
        let now = counters.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        counters.peak.fetch_max(now, Ordering::SeqCst);
        Self(counters)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl LivenessCheck for SimulatedNetwork {
    async fn check(&self, addr: Ipv4Addr, _timeout: Duration) -> Result<(), ProbeError> {
        let _guard = InFlight::enter(&self.counters);
        let call = self.counters.calls.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut calls = self.calls_by_host.lock().unwrap_or_else(|e| e.into_inner());
            *calls.entry(addr).or_default() += 1;
        }

        if let Some((n, token)) = &self.cancel_after
            && call == *n
        {
            token.cancel();
        }

        match self.behaviour_of(addr) {
            Behaviour::Respond(delay) => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
            Behaviour::Refuse(delay) => {
                tokio::time::sleep(delay).await;
                Err(ProbeError::Refused)
            }
            Behaviour::Silent => std::future::pending().await,
            Behaviour::Panic => panic!("simulated probe failure for {addr}"),
        }
    }
}
