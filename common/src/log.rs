//! Status macros used across the workspace.
//!
//! Each macro forwards to `tracing` with a dedicated target so the terminal
//! formatter can pick the matching status symbol.

pub const SUCCESS_TARGET: &str = "lansweep::success";
pub const PRINT_TARGET: &str = "lansweep::print";

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::__tracing::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "lansweep::success", $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::__tracing::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::__tracing::error!($($arg)*)
    };
}
