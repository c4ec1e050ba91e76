use std::collections::BTreeSet;
use std::net::Ipv4Addr;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use lansweep_common::network::outcome::{ProbeError, ProbeErrorKind};
use lansweep_common::network::range::NetworkRange;
use lansweep_common::report::ScanSnapshot;
use lansweep_core::scanner::Sweeper;

use crate::simulated::{Behaviour, SimulatedNetwork};

const FAST: Behaviour = Behaviour::Respond(Duration::from_millis(5));

fn range(cidr: &str) -> NetworkRange {
    cidr.parse().unwrap()
}

async fn sweep(
    network: &SimulatedNetwork,
    cidr: &str,
    concurrency: usize,
    timeout: Duration,
) -> ScanSnapshot {
    Sweeper::new(network.probe(), concurrency, timeout)
        .sweep(range(cidr), &CancellationToken::new())
        .await
        .unwrap()
}

fn addresses(snapshot: &ScanSnapshot) -> BTreeSet<Ipv4Addr> {
    snapshot.outcomes().map(|outcome| outcome.address()).collect()
}

#[tokio::test(start_paused = true)]
async fn two_host_subnet_scenario() {
    let network = SimulatedNetwork::new(Behaviour::Silent)
        .host(Ipv4Addr::new(192, 168, 1, 1), FAST);

    let snapshot = sweep(&network, "192.168.1.0/30", 50, Duration::from_millis(100)).await;

    assert_eq!(snapshot.len(), 2);
    let first = snapshot.get(Ipv4Addr::new(192, 168, 1, 1)).unwrap();
    assert!(first.is_reachable());
    assert_eq!(first.error(), None);

    let second = snapshot.get(Ipv4Addr::new(192, 168, 1, 2)).unwrap();
    assert!(!second.is_reachable());
    assert_eq!(second.error(), Some(&ProbeError::Timeout));
}

#[tokio::test(start_paused = true)]
async fn every_address_gets_exactly_one_outcome() {
    let network = SimulatedNetwork::new(FAST)
        .host(Ipv4Addr::new(10, 20, 30, 40), Behaviour::Silent)
        .host(Ipv4Addr::new(10, 20, 30, 41), Behaviour::Refuse(Duration::from_millis(2)));

    let snapshot = sweep(&network, "10.20.30.0/24", 32, Duration::from_millis(50)).await;

    assert_eq!(snapshot.len(), 254);
    assert_eq!(snapshot.attempted(), 254);
    assert_eq!(addresses(&snapshot), range("10.20.30.0/24").hosts().collect());
    for addr in range("10.20.30.0/24").hosts() {
        assert_eq!(network.calls_for(addr), 1, "{addr} probed more than once");
    }

    let summary = snapshot.summary();
    assert_eq!(summary.reachable, 252);
    assert_eq!(summary.by_kind.get(&ProbeErrorKind::Timeout), Some(&1));
    assert_eq!(summary.by_kind.get(&ProbeErrorKind::Refused), Some(&1));
}

#[tokio::test(start_paused = true)]
async fn repeated_sweeps_agree() {
    let network = SimulatedNetwork::new(Behaviour::Silent)
        .host(Ipv4Addr::new(172, 16, 0, 3), FAST)
        .host(Ipv4Addr::new(172, 16, 0, 9), FAST)
        .host(Ipv4Addr::new(172, 16, 0, 14), Behaviour::Refuse(Duration::ZERO));

    let first = sweep(&network, "172.16.0.0/28", 4, Duration::from_millis(80)).await;
    let second = sweep(&network, "172.16.0.0/28", 4, Duration::from_millis(80)).await;

    let classify = |snapshot: &ScanSnapshot| -> BTreeSet<(Ipv4Addr, bool)> {
        snapshot
            .outcomes()
            .map(|outcome| (outcome.address(), outcome.is_reachable()))
            .collect()
    };
    assert_eq!(classify(&first), classify(&second));
    assert_eq!(first.summary(), second.summary());
}

#[tokio::test(start_paused = true)]
async fn concurrency_never_exceeds_limit() {
    for limit in [1, 3, 16, 50] {
        let network = SimulatedNetwork::new(Behaviour::Respond(Duration::from_millis(20)));
        let snapshot = sweep(&network, "10.0.0.0/24", limit, Duration::from_secs(1)).await;

        assert_eq!(snapshot.len(), 254);
        assert!(network.peak() <= limit, "peak {} over limit {limit}", network.peak());
        assert_eq!(network.peak(), limit, "limit {limit} was never saturated");
        assert_eq!(network.in_flight(), 0);
    }
}

#[tokio::test(start_paused = true)]
async fn silent_hosts_time_out_together() {
    let network = SimulatedNetwork::new(Behaviour::Silent);
    let timeout = Duration::from_millis(200);

    let started = Instant::now();
    let snapshot = sweep(&network, "10.1.0.0/24", 254, timeout).await;
    let elapsed = started.elapsed();

    assert_eq!(snapshot.len(), 254);
    assert!(snapshot.outcomes().all(|o| o.error() == Some(&ProbeError::Timeout)));
    assert!(elapsed >= timeout);
    assert!(elapsed < timeout + Duration::from_millis(50), "took {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn limit_of_one_serializes_probes() {
    let network = SimulatedNetwork::new(Behaviour::Silent);
    let timeout = Duration::from_millis(100);

    let started = Instant::now();
    let snapshot = sweep(&network, "10.2.0.0/28", 1, timeout).await;
    let elapsed = started.elapsed();

    assert_eq!(snapshot.len(), 14);
    assert_eq!(network.peak(), 1);
    assert!(elapsed >= timeout * 14, "took {elapsed:?}");
    assert!(elapsed < timeout * 14 + Duration::from_millis(50), "took {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn one_slow_host_does_not_hold_back_the_rest() {
    let network = SimulatedNetwork::new(FAST)
        .host(Ipv4Addr::new(10, 3, 0, 1), Behaviour::Respond(Duration::from_millis(900)));
    let limit = 2;

    let started = Instant::now();
    let snapshot = sweep(&network, "10.3.0.0/27", limit, Duration::from_secs(1)).await;
    let elapsed = started.elapsed();

    assert_eq!(snapshot.summary().reachable, 30);
    // The slow host keeps one slot while the other 29 hosts run through the second.
    // Fixed batches of two would need 900ms plus 14 more rounds.
    assert!(elapsed < Duration::from_millis(950), "took {elapsed:?}");
    assert_eq!(network.peak(), limit);
}

#[tokio::test(start_paused = true)]
async fn cancellation_stops_dispatch() {
    let cancel = CancellationToken::new();
    let network = SimulatedNetwork::new(Behaviour::Respond(Duration::from_millis(50)))
        .cancel_after(10, cancel.clone());

    let sweeper = Sweeper::new(network.probe(), 10, Duration::from_secs(1));
    let snapshot = sweeper.sweep(range("192.168.50.0/24"), &cancel).await.unwrap();

    assert!(snapshot.is_cancelled());
    assert_eq!(snapshot.attempted(), 10);
    assert!(snapshot.len() <= 10);
    assert_eq!(network.calls(), 10, "probes dispatched after cancellation");
    // In-flight probes were allowed to finish rather than being dropped.
    assert_eq!(snapshot.len(), 10);
    assert!(snapshot.outcomes().all(|o| o.is_reachable()));
}

#[tokio::test]
async fn cancelled_before_start_probes_nothing() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let network = SimulatedNetwork::new(FAST);

    let sweeper = Sweeper::new(network.probe(), 10, Duration::from_secs(1));
    let snapshot = sweeper.sweep(range("192.168.50.0/24"), &cancel).await.unwrap();

    assert!(snapshot.is_cancelled());
    assert!(snapshot.is_empty());
    assert_eq!(network.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn panicking_probe_is_recorded_as_aborted() {
    let broken = Ipv4Addr::new(10, 4, 0, 5);
    let network = SimulatedNetwork::new(FAST).host(broken, Behaviour::Panic);

    let snapshot = sweep(&network, "10.4.0.0/29", 3, Duration::from_millis(100)).await;

    assert_eq!(snapshot.len(), 6);
    let outcome = snapshot.get(broken).unwrap();
    assert!(matches!(outcome.error(), Some(ProbeError::Aborted(_))));
    assert_eq!(snapshot.summary().reachable, 5);
    assert_eq!(network.in_flight(), 0);
}

#[tokio::test(start_paused = true)]
async fn point_to_point_and_single_host_ranges() {
    let network = SimulatedNetwork::new(FAST);

    let pair = sweep(&network, "10.5.0.6/31", 8, Duration::from_millis(100)).await;
    assert_eq!(
        addresses(&pair),
        BTreeSet::from([Ipv4Addr::new(10, 5, 0, 6), Ipv4Addr::new(10, 5, 0, 7)])
    );

    let single = sweep(&network, "10.5.0.9/32", 8, Duration::from_millis(100)).await;
    assert_eq!(addresses(&single), BTreeSet::from([Ipv4Addr::new(10, 5, 0, 9)]));
}
