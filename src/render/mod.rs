//! Page rendering.
//!
//! The [`Renderer`] trait is the seam between the reconciliation logic and
//! whatever actually draws pixels. Production uses [`ChromiumRenderer`],
//! which drives a headless Chromium-family browser in screenshot mode; the
//! run-loop tests substitute a mock.

pub mod chromium;
pub mod probe;

pub use chromium::ChromiumRenderer;

use anyhow::Result;
use std::time::Duration;

/// Fixed Open-Graph viewport: the conventional 1200x630 preview resolution.
pub const OG_VIEWPORT: (u32, u32) = (1200, 630);

/// Bound on waiting for a page to reach network idle.
pub const NAV_TIMEOUT: Duration = Duration::from_secs(30);

/// Settle delay after network idle. Network idle alone does not guarantee
/// entrance animations have finished.
pub const SETTLE: Duration = Duration::from_millis(1200);

/// Longer settle for the home route, which commonly animates on load.
pub const SETTLE_HOME: Duration = Duration::from_secs(3);

/// Outcome of a navigation: the HTTP status, when one could be determined.
#[derive(Debug, Clone, Copy)]
pub struct NavStatus {
    pub status: Option<u16>,
}

impl NavStatus {
    /// 2xx/3xx counts as success; anything else (or no response at all)
    /// is reported as a warning but still captured best-effort.
    pub fn is_ok(&self) -> bool {
        matches!(self.status, Some(200..=399))
    }

    /// Human-readable status for log lines.
    pub fn describe(&self) -> String {
        match self.status {
            Some(code) => code.to_string(),
            None => "no response".to_owned(),
        }
    }
}

/// A sequentially reused page renderer.
///
/// One instance is shared across all planned captures; implementations may
/// hold scratch state (profile dir, capture file) released on drop.
pub trait Renderer {
    /// Set the capture viewport in pixels.
    fn set_viewport(&mut self, width: u32, height: u32);

    /// Navigate to `url`, waiting for network idle bounded by
    /// `idle_timeout`. Returns the response status; navigation-level
    /// failures surface when the capture is taken.
    fn goto(&mut self, url: &str, idle_timeout: Duration) -> Result<NavStatus>;

    /// Extra wait after network idle before capturing.
    fn settle(&mut self, delay: Duration);

    /// Capture the current viewport (not the full page) as PNG bytes.
    fn screenshot(&mut self) -> Result<Vec<u8>>;
}
