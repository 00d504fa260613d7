//! Shutdown state tracking.
//!
//! A single cooperative flag: `SHUTDOWN` is set by the Ctrl+C handler (or by
//! the prompt when it sees Ctrl+C in raw mode) and checked between units of
//! work - before each capture, between orphan deletions, and inside the
//! confirmation wait. Nothing here kills work mid-flight; loops drain at the
//! next check and the process exits with a failure status.

use std::sync::atomic::{AtomicBool, Ordering};

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Setup the global Ctrl+C handler. Call once at program start.
///
/// The first signal sets the flag so in-progress work can wind down; a
/// second signal exits immediately with the conventional interrupt status.
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        if SHUTDOWN.swap(true, Ordering::SeqCst) {
            std::process::exit(130);
        }
        crate::log!("warn"; "interrupt received, finishing current step (Ctrl+C again to force quit)");
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Request shutdown from inside the process (raw-mode Ctrl+C in the prompt).
pub fn request_shutdown() {
    SHUTDOWN.store(true, Ordering::SeqCst);
}

/// Check if shutdown has been requested
///
/// Uses Relaxed ordering for performance - worst case is processing
/// one more item before stopping, which is acceptable
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}
