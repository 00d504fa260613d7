//! Orphan detection and cleanup.
//!
//! An orphan is a generated OG image on disk that no route (and neither
//! `_global` default) references anymore. Detection is the asymmetric set
//! difference `candidates - referenced`, compared on normalized references,
//! restricted to `og-`-prefixed `.webp` files under `<out>/images`.

use std::fs;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;
use rustc_hash::FxHashSet;

use crate::config::RoutesConfig;
use crate::core::is_shutdown;
use crate::{debug, log};

use super::{GENERATED_EXT, has_generated_prefix, normalize_ref};

/// Subdirectory of the output tree that holds managed images.
const IMAGES_SUBDIR: &str = "images";

/// The set of normalized image references reachable from the config:
/// every route `ogImage` plus `_global.defaultImage` and `_global.logo`.
pub fn referenced_images(config: &RoutesConfig) -> FxHashSet<String> {
    let mut referenced = FxHashSet::default();

    for route in &config.routes {
        if let Some(og_image) = &route.og_image {
            referenced.insert(normalize_ref(og_image));
        }
    }
    for global_image in [&config.global.default_image, &config.global.logo]
        .into_iter()
        .flatten()
    {
        referenced.insert(normalize_ref(global_image));
    }

    referenced
}

/// Scan `<out_dir>/images` for generated OG images no longer referenced.
///
/// Returns orphans in sorted traversal order, so the result is
/// deterministic for a given filesystem state. Files without the `og-`
/// prefix or with a different extension are not candidates and are never
/// returned.
pub fn compute_orphans(config: &RoutesConfig, out_dir: &Path) -> Vec<PathBuf> {
    let referenced = referenced_images(config);
    let images_root = out_dir.join(IMAGES_SUBDIR);
    if !images_root.is_dir() {
        return Vec::new();
    }

    let mut orphans = Vec::new();
    for entry in WalkDir::new(&images_root)
        .sort(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let is_generated = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case(GENERATED_EXT))
            && has_generated_prefix(&name);
        if !is_generated {
            continue;
        }

        let Ok(rel) = path.strip_prefix(out_dir) else {
            continue;
        };
        if !referenced.contains(&normalize_ref(&rel.to_string_lossy())) {
            orphans.push(path);
        }
    }

    orphans
}

/// Delete (or, in dry-run mode, list) orphaned files. Returns the number
/// of files actually deleted.
///
/// Each deletion is attempted independently: a failure is logged and the
/// remaining files are still processed.
pub fn remove_orphans(orphans: &[PathBuf], dry_run: bool) -> usize {
    let mut deleted = 0;

    for path in orphans {
        if is_shutdown() {
            debug!("clean"; "interrupted, leaving remaining orphans in place");
            break;
        }
        if dry_run {
            log!("clean"; "would delete {}", path.display());
            continue;
        }
        match fs::remove_file(path) {
            Ok(()) => {
                log!("clean"; "deleted {}", path.display());
                deleted += 1;
            }
            Err(e) => log!("error"; "failed to delete {}: {}", path.display(), e),
        }
    }

    deleted
}

// ============================================================================
// Tests
// ============================================================================
