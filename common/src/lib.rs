//! # Lansweep Common
//!
//! Domain types shared by every crate in the workspace.
//!
//! * **[`network`]**: ranges, targets, per-host probe outcomes and local interface helpers.
//! * **[`report`]**: the append-only sweep report and its finalized snapshot.
//! * **[`system`]**: the local machine identity record and the repository that produces it.
//! * **[`error`]**: the error taxonomy of a sweep.

pub mod config;
pub mod error;
pub mod log;
pub mod network;
pub mod report;
pub mod system;
pub mod utils;

#[doc(hidden)]
pub use tracing as __tracing;
