use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use tokio_util::sync::CancellationToken;

use lansweep_common::config::Config;
use lansweep_common::network::outcome::ProbeOutcome;
use lansweep_common::network::target::Target;
use lansweep_common::report::ScanSnapshot;
use lansweep_common::system::SystemRepository;
use lansweep_common::{success, warn};
use lansweep_core::discovery::DiscoveryService;
use lansweep_core::export;
use lansweep_core::system::SystemRepo;

use crate::mprint;
use crate::terminal::{colors, format, print, spinner::SweepSpinner};

/// Exit status of a sweep stopped by Ctrl+C (128 + SIGINT).
const EXIT_CANCELLED: u8 = 130;

pub async fn discover(target: Target, cfg: &Config) -> anyhow::Result<ExitCode> {
    let range = target.resolve().context("could not determine what to sweep")?;

    let cancel = CancellationToken::new();
    let interrupt = tokio::spawn(cancel_on_interrupt(cancel.clone()));

    let spinner = Arc::new(SweepSpinner::start(range.host_count()));
    let progress = Arc::clone(&spinner);
    let service = DiscoveryService::from_config(cfg).with_progress(Arc::new(
        move |outcome: &ProbeOutcome| progress.probe_finished(outcome.is_reachable()),
    ));

    let start_time: Instant = Instant::now();
    let result = service
        .perform_discovery(Target::Network { range }, &cancel)
        .await;

    spinner.finish_and_clear();
    interrupt.abort();
    let snapshot: ScanSnapshot = result?;

    discovery_ends(&snapshot, start_time.elapsed(), cfg);
    save_report(&snapshot, cfg)?;

    if snapshot.is_cancelled() {
        warn!("Sweep interrupted, results are partial");
        return Ok(ExitCode::from(EXIT_CANCELLED));
    }
    Ok(ExitCode::SUCCESS)
}

async fn cancel_on_interrupt(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        mprint!();
        warn!("Interrupt received, waiting for in-flight probes...");
        cancel.cancel();
    }
}

fn discovery_ends(snapshot: &ScanSnapshot, total_time: Duration, cfg: &Config) {
    let reachable: Vec<&ProbeOutcome> = snapshot.reachable();
    if reachable.is_empty() {
        no_hosts_found();
    } else {
        print::header("Network Discovery");
        print_hosts(&reachable);
    }
    if cfg.include_unreachable {
        print_unreachable(snapshot);
    }
    print_summary(snapshot, total_time);
}

fn no_hosts_found() {
    print::header("ZERO HOSTS DETECTED");
    print::no_results();
}

fn print_hosts(hosts: &[&ProbeOutcome]) {
    for (idx, host) in hosts.iter().enumerate() {
        print_host_tree(host, idx);
        if idx + 1 != hosts.len() {
            mprint!();
        }
    }
}

fn print_unreachable(snapshot: &ScanSnapshot) {
    let down: Vec<&ProbeOutcome> = snapshot
        .sorted()
        .into_iter()
        .filter(|outcome| !outcome.is_reachable())
        .collect();
    if down.is_empty() {
        return;
    }

    print::header("Unreachable");
    for outcome in down {
        let cause = outcome
            .error()
            .map(|err| err.kind().to_string())
            .unwrap_or_default();
        print::print_status(format!(
            "{:<15} {}",
            outcome.address(),
            cause.color(colors::UNREACHABLE)
        ));
    }
}

fn print_summary(snapshot: &ScanSnapshot, total_time: Duration) {
    let summary = snapshot.summary();
    let active_hosts: ColoredString = format!("{} active hosts", summary.reachable).bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: ColoredString = format!(
        "Discovery Complete: {active_hosts} identified in {total_time}"
    )
    .color(colors::TEXT_DEFAULT);

    print::fat_separator();
    print::centerln(&output.to_string());
    print::aligned_line("Range", 11, snapshot.range().to_string());
    print::aligned_line("Probed", 11, snapshot.attempted().to_string());
    print::aligned_line("Unreachable", 11, format::breakdown_to_string(&summary));
}

fn print_host_tree(host: &ProbeOutcome, idx: usize) {
    print::tree_head(idx, &format::hostname_to_head(host.hostname()));
    print::as_tree_one_level(format::outcome_to_details(host));
}

/// The results are already on screen when this runs, so a failed write only
/// changes the exit status.
fn save_report(snapshot: &ScanSnapshot, cfg: &Config) -> anyhow::Result<()> {
    let identity = SystemRepo.local_identity();
    let path = export::append_report(&cfg.output, &identity, snapshot, cfg.include_unreachable)
        .context("saving the sweep report")?;
    success!("Report saved to {}", path.display());
    Ok(())
}
