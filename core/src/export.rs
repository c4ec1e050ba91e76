//! Text report sink.
//!
//! Each sweep appends one block to the report file, so a single file can
//! collect the history of several runs.

use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use lansweep_common::error::PersistenceError;
use lansweep_common::network::outcome::{ProbeOutcome, ProbeStatus};
use lansweep_common::report::ScanSnapshot;
use lansweep_common::system::{LocalIdentity, OrNotFound};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const NO_NAME: &str = "Unknown";
const ACTIVE: &str = "Active";

/// Appends the rendered report to `path` and returns the absolute path written.
pub fn append_report(
    path: &Path,
    identity: &LocalIdentity,
    snapshot: &ScanSnapshot,
    include_unreachable: bool,
) -> Result<PathBuf, PersistenceError> {
    let io_err = |source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    };

    let rendered = render_report(identity, snapshot, include_unreachable);
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err)?;
    file.write_all(rendered.as_bytes()).map_err(io_err)?;
    file.flush().map_err(io_err)?;

    fs::canonicalize(path).map_err(io_err)
}

pub fn render_report(
    identity: &LocalIdentity,
    snapshot: &ScanSnapshot,
    include_unreachable: bool,
) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, identity, snapshot, include_unreachable);
    out
}

fn write_report(
    out: &mut String,
    identity: &LocalIdentity,
    snapshot: &ScanSnapshot,
    include_unreachable: bool,
) -> std::fmt::Result {
    let rule = "=".repeat(60);
    writeln!(out)?;
    writeln!(out, "{rule}")?;
    writeln!(
        out,
        "Report generated at: {}",
        snapshot.finished_at().format(TIMESTAMP_FORMAT)
    )?;
    writeln!(out, "System Type: {}", identity.os)?;
    writeln!(out, "Scanned Range: {}", snapshot.range())?;
    let status = if snapshot.is_cancelled() {
        "cancelled (partial results)"
    } else {
        "complete"
    };
    writeln!(out, "Sweep Status: {status}")?;
    writeln!(out, "{rule}")?;
    writeln!(out)?;

    writeln!(out, "=== SYSTEM NETWORK INFORMATION ===")?;
    writeln!(out, "{:<15}: {}", "MAC Address", OrNotFound(&identity.mac))?;
    writeln!(out, "{:<15}: {}", "Computer Name", OrNotFound(&identity.hostname))?;
    writeln!(out, "{:<15}: {}", "IP Address", OrNotFound(&identity.ip))?;
    writeln!(out, "{:<15}: {}", "Default Gateway", OrNotFound(&identity.gateway))?;

    writeln!(out)?;
    writeln!(out, "=== CONNECTED DEVICES ===")?;

    let rows: Vec<&ProbeOutcome> = if include_unreachable {
        snapshot.sorted()
    } else {
        snapshot.reachable()
    };

    if rows.is_empty() {
        writeln!(out, "No devices found or scan failed")?;
    } else {
        writeln!(out, "{:<15} {:<25} {:<10}", "IP", "Hostname", "Status")?;
        writeln!(out, "{}", "-".repeat(50))?;
        for outcome in rows {
            write_row(out, outcome)?;
        }
    }

    let summary = snapshot.summary();
    writeln!(out)?;
    writeln!(
        out,
        "Summary: {} reachable, {} unreachable, {} probed",
        summary.reachable,
        summary.unreachable,
        snapshot.attempted()
    )?;
    writeln!(out)
}

fn write_row(out: &mut String, outcome: &ProbeOutcome) -> std::fmt::Result {
    let address = outcome.address().to_string();
    match outcome.status() {
        ProbeStatus::Reachable { hostname, .. } => {
            let name = if hostname.is_known() {
                hostname.as_str()
            } else {
                NO_NAME
            };
            writeln!(out, "{address:<15} {name:<25} {ACTIVE:<10}")
        }
        ProbeStatus::Unreachable(err) => {
            writeln!(out, "{address:<15} {NO_NAME:<25} {:<10}", err.kind())
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
