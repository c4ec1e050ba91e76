use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;

const TICK_RATE: Duration = Duration::from_millis(100);
const TIP: &str = "Press Ctrl+C to stop early and keep partial results";
const TEMPLATE: &str = "{spinner:.blue} [{pos}/{len}] {msg}";
const TICKS: &[&str] = &[
    "▁▁▁▁▁", "▁▂▂▂▁", "▁▄▂▄▁", "▂▄▆▄▂", "▄▆█▆▄", "▂▄▆▄▂", "▁▄▂▄▁", "▁▂▂▂▁",
];

/// The bar currently on screen, if any. Log lines are printed above it.
static ACTIVE: Mutex<Option<ProgressBar>> = Mutex::new(None);

fn active() -> MutexGuard<'static, Option<ProgressBar>> {
    ACTIVE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Live progress of one sweep. Dropping it clears the bar.
pub struct SweepSpinner {
    bar: ProgressBar,
    found: AtomicUsize,
}

impl SweepSpinner {
    pub fn start(total: u64) -> Self {
        let bar = ProgressBar::new(total);
        let style = ProgressStyle::with_template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);
        bar.set_style(style);
        bar.set_message(format!("{}", TIP.italic().white()));
        bar.enable_steady_tick(TICK_RATE);

        *active() = Some(bar.clone());

        Self {
            bar,
            found: AtomicUsize::new(0),
        }
    }

    /// Advances the bar by one finished probe.
    pub fn probe_finished(&self, reachable: bool) {
        self.bar.inc(1);
        if reachable {
            let count = self.found.fetch_add(1, Ordering::Relaxed) + 1;
            self.bar.set_message(format!(
                "Identified {} hosts so far...",
                count.to_string().green().bold()
            ));
        }
    }

    pub fn finish_and_clear(&self) {
        active().take();
        self.bar.finish_and_clear();
    }
}

impl Drop for SweepSpinner {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.finish_and_clear();
        }
    }
}

/// Log sink that prints above the active bar, or to the terminal when none is shown.
///
/// Without a bar, warnings and errors go to stderr and everything else to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpinnerWriter {
    to_stderr: bool,
}

impl SpinnerWriter {
    fn for_level(level: &Level) -> Self {
        Self {
            to_stderr: *level <= Level::WARN,
        }
    }
}

impl<'a> MakeWriter<'a> for SpinnerWriter {
    type Writer = SpinnerWriter;

    fn make_writer(&'a self) -> Self::Writer {
        *self
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        Self::for_level(meta.level())
    }
}

impl Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let bar = active().as_ref().filter(|bar| !bar.is_hidden()).cloned();
        match bar {
            Some(bar) => {
                let msg = String::from_utf8_lossy(buf);
                bar.println(msg.trim_end());
            }
            None if self.to_stderr => io::stderr().lock().write_all(buf)?,
            None => io::stdout().lock().write_all(buf)?,
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.to_stderr {
            io::stderr().flush()
        } else {
            io::stdout().flush()
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
