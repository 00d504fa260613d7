//! Generation plan computation.
//!
//! A plan entry pairs a route with the output file its capture lands in.
//! Entries come out in config insertion order; captures are independent,
//! so no other ordering is needed.

use std::path::{Path, PathBuf};

use crate::config::RoutesConfig;
use crate::debug;

use super::{has_generated_prefix, target_rel};

/// One unit of capture work: screenshot `route`, encode to `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    pub route: String,
    pub target: PathBuf,
}

/// All routes that could produce an image, regardless of whether the
/// target already exists.
///
/// Skips routes without an `ogImage` and references whose filename lacks
/// the generated-image prefix (hand-authored assets stay untouched).
pub fn candidates(config: &RoutesConfig, out_dir: &Path) -> Vec<PlanEntry> {
    let mut out = Vec::new();

    for route in &config.routes {
        let Some(og_image) = &route.og_image else {
            debug!("plan"; "skipping {}: no ogImage configured", route.path);
            continue;
        };

        let target = out_dir.join(target_rel(og_image));
        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !has_generated_prefix(&name) {
            debug!("plan"; "skipping {}: `{}` is not a generated OG image", route.path, og_image);
            continue;
        }

        out.push(PlanEntry {
            route: route.path.clone(),
            target,
        });
    }

    out
}

/// Count candidates whose target file already exists on disk.
///
/// Drives the overwrite confirmation: a non-zero count with no explicit
/// `--overwrite` is the only case where the user gets asked.
pub fn count_existing(candidates: &[PlanEntry]) -> usize {
    candidates.iter().filter(|c| c.target.exists()).count()
}

/// The generation plan: candidates filtered down to actual work.
///
/// A route enters the plan when its target is missing, or unconditionally
/// when `overwrite` is set. An empty plan means the browser is never
/// launched.
pub fn compute_generation_plan(
    config: &RoutesConfig,
    out_dir: &Path,
    overwrite: bool,
) -> Vec<PlanEntry> {
    filter_plan(candidates(config, out_dir), overwrite)
}

/// Existence filter over precomputed candidates.
pub fn filter_plan(candidates: Vec<PlanEntry>, overwrite: bool) -> Vec<PlanEntry> {
    candidates
        .into_iter()
        .filter(|c| overwrite || !c.target.exists())
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GlobalDefaults, Route, RoutesConfig};
    use std::fs;

    fn config(routes: &[(&str, Option<&str>)]) -> RoutesConfig {
        RoutesConfig {
            path: PathBuf::from("seo.json"),
            routes: routes
                .iter()
                .map(|(path, og)| Route {
                    path: (*path).to_owned(),
                    og_image: og.map(str::to_owned),
                })
                .collect(),
            global: GlobalDefaults::default(),
        }
    }

    #[test]
    fn test_single_route_plan() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(&[("/", Some("/images/og/og-home.webp"))]);

        let plan = compute_generation_plan(&cfg, dir.path(), false);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].route, "/");
        assert_eq!(plan[0].target, dir.path().join("images/og/og-home.webp"));
    }

    #[test]
    fn test_route_without_og_image_never_planned() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(&[("/about", None), ("/", Some("/images/og/og-home.webp"))]);

        let plan = compute_generation_plan(&cfg, dir.path(), true);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].route, "/");
    }

    #[test]
    fn test_unprefixed_reference_never_planned() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(&[("/post", Some("/images/hero.webp"))]);

        assert!(compute_generation_plan(&cfg, dir.path(), true).is_empty());
    }

    #[test]
    fn test_existing_target_skipped_without_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("images/og/og-home.webp");
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, b"stale").unwrap();

        let cfg = config(&[("/", Some("/images/og/og-home.webp"))]);

        // second run with overwrite=false does nothing
        assert!(compute_generation_plan(&cfg, dir.path(), false).is_empty());
        // overwrite brings it back
        assert_eq!(compute_generation_plan(&cfg, dir.path(), true).len(), 1);
    }

    #[test]
    fn test_plan_preserves_config_order() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(&[
            ("/zebra", Some("/images/og/og-zebra.webp")),
            ("/", Some("/images/og/og-home.webp")),
            ("/about", Some("/images/og/og-about.webp")),
        ]);

        let plan = compute_generation_plan(&cfg, dir.path(), false);
        let routes: Vec<_> = plan.iter().map(|e| e.route.as_str()).collect();
        assert_eq!(routes, ["/zebra", "/", "/about"]);
    }

    #[test]
    fn test_count_existing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("images/og/og-a.webp");
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, b"x").unwrap();

        let cfg = config(&[
            ("/a", Some("/images/og/og-a.webp")),
            ("/b", Some("/images/og/og-b.webp")),
        ]);

        let cands = candidates(&cfg, dir.path());
        assert_eq!(cands.len(), 2);
        assert_eq!(count_existing(&cands), 1);
    }
}
