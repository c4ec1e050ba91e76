//! # Lansweep Core
//!
//! The subnet sweep itself.
//!
//! * **[`probe`]**: one liveness check per address, with a hard timeout and best-effort naming.
//! * **[`resolver`]**: reverse-name resolution over DNS PTR.
//! * **[`scanner`]**: the bounded-concurrency scheduler that drives a whole range.
//! * **[`discovery`]**: wires configuration, target resolution and the scheduler together.
//! * **[`system`]** and **[`export`]**: the local identity record and the text report sink.

pub mod discovery;
pub mod export;
pub mod probe;
pub mod resolver;
pub mod scanner;
pub mod system;
