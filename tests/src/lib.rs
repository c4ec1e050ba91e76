//! Scheduler scenarios run against a simulated network.
//!
//! Nothing here touches a real socket. [`simulated::SimulatedNetwork`] stands
//! in for the liveness check and records how the sweeper drove it.

pub mod simulated;

#[cfg(test)]
mod sweep;
