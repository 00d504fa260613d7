//! Headless Chromium renderer.
//!
//! Drives a Chromium-family binary in `--headless` screenshot mode, one
//! invocation per capture, reusing a single scratch PNG for the raw
//! output. Screenshot mode cannot report the HTTP response status, so
//! `goto` resolves the status out of band with a plain GET and the actual
//! navigation happens when the capture is taken; the idle timeout and the
//! settle delay become the browser's virtual-time budget.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::debug;
use crate::utils::exec::{Cmd, FilterRule};

use super::{NavStatus, Renderer};

/// Binaries probed on PATH, in preference order.
const BROWSER_CANDIDATES: &[&str] = &[
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
    "chrome",
];

/// Headless Chromium is chatty on stderr even when everything works.
static CHROMIUM_NOISE: FilterRule = FilterRule::new(&[
    "DevTools listening",
    "Fontconfig",
    "[WARNING",
    "libva error",
    "Warning:",
]);

/// Navigation recorded by `goto`, consumed by the next `screenshot`.
struct PendingNav {
    url: String,
    idle_timeout: Duration,
    settle: Duration,
}

/// Renderer backed by a headless Chromium-family browser.
pub struct ChromiumRenderer {
    binary: PathBuf,
    client: reqwest::blocking::Client,
    viewport: (u32, u32),
    pending: Option<PendingNav>,
    /// Scratch file for raw captures, reused across the run.
    scratch: PathBuf,
}

impl ChromiumRenderer {
    /// Locate a browser binary and set up the scratch capture file.
    pub fn new(browser_override: Option<&Path>) -> Result<Self> {
        let binary = find_browser(browser_override)?;
        debug!("render"; "using browser {}", binary.display());

        let client = reqwest::blocking::Client::builder()
            .timeout(super::NAV_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;

        let scratch =
            std::env::temp_dir().join(format!("ogshot-capture-{}.png", std::process::id()));

        Ok(Self {
            binary,
            client,
            viewport: super::OG_VIEWPORT,
            pending: None,
            scratch,
        })
    }
}

impl Renderer for ChromiumRenderer {
    fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    fn goto(&mut self, url: &str, idle_timeout: Duration) -> Result<NavStatus> {
        let status = match self.client.get(url).timeout(idle_timeout).send() {
            Ok(response) => Some(response.status().as_u16()),
            Err(e) => {
                debug!("render"; "status probe for {url} failed: {e}");
                None
            }
        };

        self.pending = Some(PendingNav {
            url: url.to_owned(),
            idle_timeout,
            settle: Duration::ZERO,
        });
        Ok(NavStatus { status })
    }

    fn settle(&mut self, delay: Duration) {
        if let Some(pending) = &mut self.pending {
            pending.settle = delay;
        }
    }

    fn screenshot(&mut self) -> Result<Vec<u8>> {
        let pending = self
            .pending
            .take()
            .context("screenshot requested without a prior navigation")?;

        // Virtual time covers page load plus the settle delay; the wall
        // clock bound keeps a hung page from stalling the run.
        let budget_ms = (pending.idle_timeout + pending.settle).as_millis();
        let (width, height) = self.viewport;

        Cmd::new(&self.binary)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--hide-scrollbars")
            .arg(format!("--window-size={width},{height}"))
            .arg(format!("--screenshot={}", self.scratch.display()))
            .arg(format!("--virtual-time-budget={budget_ms}"))
            .arg(format!("--timeout={budget_ms}"))
            .arg(&pending.url)
            .filter(&CHROMIUM_NOISE)
            .run()
            .with_context(|| format!("browser capture of {} failed", pending.url))?;

        let png = fs::read(&self.scratch)
            .with_context(|| format!("browser produced no capture for {}", pending.url))?;
        Ok(png)
    }
}

impl Drop for ChromiumRenderer {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.scratch);
    }
}

/// Resolve the browser binary: explicit override first, then PATH probing.
fn find_browser(browser_override: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = browser_override {
        return which::which(path)
            .with_context(|| format!("browser `{}` not found", path.display()));
    }

    for candidate in BROWSER_CANDIDATES {
        if let Ok(path) = which::which(candidate) {
            return Ok(path);
        }
    }
    anyhow::bail!(
        "no Chromium-family browser found on PATH (tried {}); install one or pass --browser",
        BROWSER_CANDIDATES.join(", ")
    )
}
