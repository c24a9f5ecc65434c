//! Logging helpers shared by every crate in the workspace.
//!
//! Libraries only emit `tracing` events; the binary decides how to render them.

/// Target used for positive completion messages.
pub const SUCCESS_TARGET: &str = "lanprobe::success";

/// Emits an `info` event on the [`SUCCESS_TARGET`] target.
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "lanprobe::success", $($arg)*)
    };
}
