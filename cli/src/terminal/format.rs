use std::time::Duration;

use colored::*;

use lansweep_common::network::outcome::{Hostname, ProbeOutcome, ProbeStatus};
use lansweep_common::report::Summary;

use crate::terminal::colors;

pub type Detail = (String, ColoredString);

pub fn hostname_to_head(hostname: &Hostname) -> ColoredString {
    match hostname {
        Hostname::Resolved(name) => name.color(colors::HOSTNAME),
        Hostname::Unknown => "No hostname".color(colors::UNKNOWN),
    }
}

pub fn outcome_to_details(outcome: &ProbeOutcome) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![(
        String::from("IPv4"),
        outcome.address().to_string().color(colors::IPV4_ADDR),
    )];

    match outcome.status() {
        ProbeStatus::Reachable { rtt, .. } => {
            details.push((String::from("RTT"), rtt_to_string(*rtt).color(colors::LATENCY)));
        }
        ProbeStatus::Unreachable(err) => {
            details.push((String::from("Cause"), err.to_string().color(colors::UNREACHABLE)));
        }
    }

    details
}

pub fn rtt_to_string(rtt: Duration) -> String {
    if rtt < Duration::from_millis(1) {
        format!("{}µs", rtt.as_micros())
    } else {
        format!("{:.1}ms", rtt.as_secs_f64() * 1_000.0)
    }
}

/// `3 timeout, 1 refused`, or `none` when every host answered.
pub fn breakdown_to_string(summary: &Summary) -> String {
    if summary.by_kind.is_empty() {
        return String::from("none");
    }
    summary
        .by_kind
        .iter()
        .map(|(kind, count)| format!("{count} {kind}"))
        .collect::<Vec<String>>()
        .join(", ")
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
