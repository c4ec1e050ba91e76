//! ICMP echo through the system `ping` binary.
//!
//! Raw ICMP sockets need elevated privileges; the system binary does not.
//! The child is killed if the probe timeout drops it mid-flight.

use std::net::Ipv4Addr;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use lansweep_common::network::outcome::ProbeError;

use super::LivenessCheck;

#[derive(Debug, Clone, Copy, Default)]
pub struct PingCheck;

#[async_trait]
impl LivenessCheck for PingCheck {
    async fn check(&self, addr: Ipv4Addr, timeout: Duration) -> Result<(), ProbeError> {
        let output = ping_command(addr, timeout)
            .output()
            .await
            .map_err(|e| ProbeError::Failed(format!("could not run ping: {e}")))?;

        classify(output.status.code(), &output.stdout, &output.stderr)
    }
}

fn ping_command(addr: Ipv4Addr, timeout: Duration) -> Command {
    let mut cmd = Command::new("ping");

    #[cfg(target_os = "windows")]
    cmd.args(["-n", "1", "-w", &timeout.as_millis().max(1).to_string()]);

    #[cfg(target_os = "macos")]
    cmd.args(["-c", "1", "-t", &whole_seconds(timeout).to_string()]);

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    cmd.args(["-c", "1", "-W", &whole_seconds(timeout).to_string()]);

    cmd.arg(addr.to_string())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    cmd
}

/// `ping` only takes whole seconds on most platforms. Rounds up, minimum 1.
#[cfg_attr(target_os = "windows", allow(dead_code))]
fn whole_seconds(timeout: Duration) -> u64 {
    timeout.as_millis().div_ceil(1_000).max(1) as u64
}

/// Interprets the exit status and output of one `ping` run.
///
/// Windows exits 0 when a router answers "Destination host unreachable", so the
/// output is checked before the status.
fn classify(code: Option<i32>, stdout: &[u8], stderr: &[u8]) -> Result<(), ProbeError> {
    let stdout = String::from_utf8_lossy(stdout).to_ascii_lowercase();
    let stderr = String::from_utf8_lossy(stderr);

    if stdout.contains("unreachable") || stderr.to_ascii_lowercase().contains("unreachable") {
        return Err(ProbeError::Unreachable);
    }

    match code {
        Some(0) => Ok(()),
        Some(code) if is_no_reply(code) => Err(ProbeError::Timeout),
        Some(code) => {
            let detail = stderr.lines().next().unwrap_or("").trim();
            Err(ProbeError::Failed(format!("ping exited with status {code}: {detail}")))
        }
        None => Err(ProbeError::Failed("ping was terminated by a signal".to_string())),
    }
}

/// Exit status meaning the echo went out but nothing came back.
///
/// Linux and Windows use 1; BSD-derived `ping` uses 2, which Linux reserves
/// for errors.
fn is_no_reply(code: i32) -> bool {
    code == 1 || (cfg!(target_os = "macos") && code == 2)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_is_reachable() {
        let stdout = b"64 bytes from 192.168.1.1: icmp_seq=1 ttl=64 time=0.412 ms";
        assert_eq!(classify(Some(0), stdout, b""), Ok(()));
    }

    #[test]
    fn no_reply_is_timeout() {
        let stdout = b"1 packets transmitted, 0 received, 100% packet loss, time 0ms";
        assert_eq!(classify(Some(1), stdout, b""), Err(ProbeError::Timeout));
    }

    #[test]
    fn destination_unreachable_wins_over_exit_status() {
        let linux = b"From 192.168.1.20 icmp_seq=1 Destination Host Unreachable";
        assert_eq!(classify(Some(1), linux, b""), Err(ProbeError::Unreachable));

        let windows = b"Reply from 192.168.1.20: Destination host unreachable.";
        assert_eq!(classify(Some(0), windows, b""), Err(ProbeError::Unreachable));

        let stderr = b"connect: Network is unreachable";
        assert_eq!(classify(Some(2), b"", stderr), Err(ProbeError::Unreachable));
    }

    #[test]
    fn silent_host_status_follows_platform() {
        let stdout = b"1 packets transmitted, 0 packets received, 100.0% packet loss";
        let result = classify(Some(2), stdout, b"");
        if cfg!(target_os = "macos") {
            assert_eq!(result, Err(ProbeError::Timeout));
        } else {
            assert!(matches!(result, Err(ProbeError::Failed(_))));
        }
    }

    #[test]
    fn other_failures_keep_detail() {
        let result = classify(Some(71), b"", b"ping: socket: Operation not permitted\n");
        assert_eq!(
            result,
            Err(ProbeError::Failed(
                "ping exited with status 71: ping: socket: Operation not permitted".into()
            ))
        );
        assert!(matches!(classify(None, b"", b""), Err(ProbeError::Failed(_))));
    }

    #[test]
    fn timeout_rounds_up_to_whole_seconds() {
        assert_eq!(whole_seconds(Duration::from_millis(100)), 1);
        assert_eq!(whole_seconds(Duration::from_millis(1_000)), 1);
        assert_eq!(whole_seconds(Duration::from_millis(1_001)), 2);
        assert_eq!(whole_seconds(Duration::ZERO), 1);
    }
}
