//! Generate command: capture OG images for planned routes.
//!
//! The run is a straight line: load config, compute candidates, probe the
//! server, resolve the overwrite decision, filter down to the plan, then
//! drive one reused browser page through it sequentially. An empty plan
//! never launches the browser.

use std::fs;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use url::Url;

use crate::cli::clean::run_cleanup;
use crate::cli::{Cli, GenerateArgs};
use crate::codec::{WEBP_QUALITY, WebpBackend, encode_webp};
use crate::config::RoutesConfig;
use crate::core::is_shutdown;
use crate::reconcile::{self, PlanEntry};
use crate::render::{
    ChromiumRenderer, NAV_TIMEOUT, OG_VIEWPORT, Renderer, SETTLE, SETTLE_HOME, probe::probe_server,
};
use crate::utils::plural_count;
use crate::{debug, log, logger, prompt};

/// Run the generate command.
pub fn run_generate(cli: &Cli, args: &GenerateArgs) -> Result<()> {
    logger::set_verbose(args.verbose);

    let config = RoutesConfig::load(&cli.config)?;
    debug!("config"; "{} loaded from {}", plural_count(config.routes.len(), "route"), config.path.display());

    let candidates = reconcile::candidates(&config, &args.out);
    if candidates.is_empty() {
        log!("plan"; "no routes reference a generated OG image, nothing to capture");
        return finish(&config, args);
    }

    let base = base_url(&args.host, args.port)?;
    probe_server(&base)?;

    let overwrite = resolve_overwrite(args, &candidates);
    if is_shutdown() {
        bail!("interrupted");
    }

    let plan = reconcile::filter_plan(candidates, overwrite);
    if plan.is_empty() {
        log!("plan"; "all OG images are up to date, skipping browser launch");
        return finish(&config, args);
    }
    log!("plan"; "capturing {}", plural_count(plan.len(), "image"));

    let mut renderer = ChromiumRenderer::new(args.browser.as_deref())?;
    let backend = WebpBackend::detect();
    debug!("codec"; "encoding with {} backend", backend.name());

    let (captured, failed) = capture_all(&mut renderer, backend, &base, &plan);
    drop(renderer);

    if is_shutdown() {
        bail!("interrupted");
    }
    log!("capture"; "finished: {} captured, {} failed", captured, failed);

    finish(&config, args)
}

/// Trailing cleanup phase: generation first, orphan removal after.
fn finish(config: &RoutesConfig, args: &GenerateArgs) -> Result<()> {
    if args.cleanup {
        run_cleanup(config, &args.out, args.dry_run);
    }
    if is_shutdown() {
        bail!("interrupted");
    }
    Ok(())
}

/// Resolve the overwrite decision: the explicit flag wins, otherwise ask
/// only when existing targets would be touched.
fn resolve_overwrite(args: &GenerateArgs, candidates: &[PlanEntry]) -> bool {
    if args.overwrite {
        return true;
    }
    let existing = reconcile::count_existing(candidates);
    if existing == 0 {
        return false;
    }
    prompt::confirm_overwrite(existing, prompt::CONFIRM_TIMEOUT)
}

/// Drive the renderer through the plan, one route at a time.
///
/// Returns (captured, failed). A failed route is logged and skipped; no
/// retries within a run.
fn capture_all(
    renderer: &mut dyn Renderer,
    backend: WebpBackend,
    base: &Url,
    plan: &[PlanEntry],
) -> (usize, usize) {
    let mut captured = 0;
    let mut failed = 0;

    for entry in plan {
        if is_shutdown() {
            debug!("capture"; "interrupted, skipping remaining routes");
            break;
        }
        match capture_route(renderer, backend, base, entry) {
            Ok(()) => captured += 1,
            Err(e) => {
                log!("error"; "capturing {}: {:#}", entry.route, e);
                failed += 1;
            }
        }
    }

    (captured, failed)
}

/// Capture one route and encode it to its target file.
fn capture_route(
    renderer: &mut dyn Renderer,
    backend: WebpBackend,
    base: &Url,
    entry: &PlanEntry,
) -> Result<()> {
    let url = base
        .join(&entry.route)
        .with_context(|| format!("invalid route path `{}`", entry.route))?;
    log!("capture"; "navigating to {url}");

    let (width, height) = OG_VIEWPORT;
    renderer.set_viewport(width, height);

    let status = renderer.goto(url.as_str(), NAV_TIMEOUT)?;
    if !status.is_ok() {
        log!("warn"; "received status {} for {url}", status.describe());
    }
    renderer.settle(settle_for(&entry.route));

    let png = renderer.screenshot()?;

    if let Some(parent) = entry.target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    encode_webp(&png, &entry.target, WEBP_QUALITY, backend)?;
    log!("capture"; "saved OG image to {}", entry.target.display());
    Ok(())
}

/// The home route gets a longer settle: entrance animations.
fn settle_for(route: &str) -> Duration {
    if route == "/" { SETTLE_HOME } else { SETTLE }
}

/// Base URL of the target server.
fn base_url(host: &str, port: u16) -> Result<Url> {
    Url::parse(&format!("http://{host}:{port}/"))
        .with_context(|| format!("invalid host/port: {host}:{port}"))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::NavStatus;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    /// Renderer double: serves a fixed PNG, fails for marked routes.
    struct MockRenderer {
        png: Vec<u8>,
        fail_marker: Option<String>,
        current: String,
        navigations: Vec<String>,
    }

    impl MockRenderer {
        fn new(fail_marker: Option<&str>) -> Self {
            let img = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
            let mut buf = Cursor::new(Vec::new());
            img.write_to(&mut buf, ImageFormat::Png).unwrap();
            Self {
                png: buf.into_inner(),
                fail_marker: fail_marker.map(str::to_owned),
                current: String::new(),
                navigations: Vec::new(),
            }
        }
    }

    impl Renderer for MockRenderer {
        fn set_viewport(&mut self, _width: u32, _height: u32) {}

        fn goto(&mut self, url: &str, _idle_timeout: Duration) -> Result<NavStatus> {
            self.current = url.to_owned();
            self.navigations.push(url.to_owned());
            Ok(NavStatus { status: Some(200) })
        }

        fn settle(&mut self, _delay: Duration) {}

        fn screenshot(&mut self) -> Result<Vec<u8>> {
            if let Some(marker) = &self.fail_marker
                && self.current.contains(marker.as_str())
            {
                bail!("render process crashed");
            }
            Ok(self.png.clone())
        }
    }

    #[test]
    fn test_capture_all_writes_planned_targets() {
        let dir = tempfile::tempdir().unwrap();
        let base = Url::parse("http://localhost:4173/").unwrap();
        let plan = vec![
            PlanEntry {
                route: "/".to_owned(),
                target: dir.path().join("images/og/og-home.webp"),
            },
            PlanEntry {
                route: "/about".to_owned(),
                target: dir.path().join("images/og/og-about.webp"),
            },
        ];

        let mut renderer = MockRenderer::new(None);
        let (captured, failed) = capture_all(&mut renderer, WebpBackend::Builtin, &base, &plan);

        assert_eq!((captured, failed), (2, 0));
        assert!(plan[0].target.exists());
        assert!(plan[1].target.exists());
        assert_eq!(
            renderer.navigations,
            ["http://localhost:4173/", "http://localhost:4173/about"]
        );
    }

    #[test]
    fn test_failed_route_does_not_abort_run() {
        let dir = tempfile::tempdir().unwrap();
        let base = Url::parse("http://localhost:4173/").unwrap();
        let plan = vec![
            PlanEntry {
                route: "/broken".to_owned(),
                target: dir.path().join("images/og/og-broken.webp"),
            },
            PlanEntry {
                route: "/fine".to_owned(),
                target: dir.path().join("images/og/og-fine.webp"),
            },
        ];

        let mut renderer = MockRenderer::new(Some("broken"));
        let (captured, failed) = capture_all(&mut renderer, WebpBackend::Builtin, &base, &plan);

        assert_eq!((captured, failed), (1, 1));
        assert!(!plan[0].target.exists());
        assert!(plan[1].target.exists());
    }

    #[test]
    fn test_settle_delays() {
        assert_eq!(settle_for("/"), SETTLE_HOME);
        assert_eq!(settle_for("/about"), SETTLE);
        assert!(SETTLE_HOME > SETTLE);
    }

    #[test]
    fn test_base_url() {
        let base = base_url("localhost", 4173).unwrap();
        assert_eq!(base.as_str(), "http://localhost:4173/");
        assert_eq!(base.join("/about").unwrap().as_str(), "http://localhost:4173/about");
    }

    #[test]
    fn test_resolve_overwrite_without_existing_targets() {
        let dir = tempfile::tempdir().unwrap();
        let args = GenerateArgs {
            host: "localhost".into(),
            port: 4173,
            out: dir.path().to_path_buf(),
            overwrite: false,
            cleanup: false,
            dry_run: false,
            browser: None,
            verbose: false,
        };
        let candidates = vec![PlanEntry {
            route: "/".to_owned(),
            target: dir.path().join("images/og/og-home.webp"),
        }];

        // no existing targets: no prompt, no overwrite
        assert!(!resolve_overwrite(&args, &candidates));

        // explicit flag short-circuits the prompt entirely
        let args = GenerateArgs { overwrite: true, ..args };
        assert!(resolve_overwrite(&args, &candidates));
    }
}
