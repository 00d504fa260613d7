//! Clean command: remove orphaned OG images.

use std::path::Path;

use anyhow::Result;

use crate::cli::{CleanArgs, Cli};
use crate::config::RoutesConfig;
use crate::reconcile::{compute_orphans, remove_orphans};
use crate::utils::plural_count;
use crate::{debug, log, logger};

/// Run the clean command.
pub fn run_clean(cli: &Cli, args: &CleanArgs) -> Result<()> {
    logger::set_verbose(args.verbose);

    let config = RoutesConfig::load(&cli.config)?;
    run_cleanup(&config, &args.out, args.dry_run);
    Ok(())
}

/// Shared cleanup phase, also invoked by `generate --cleanup` after the
/// capture loop.
pub fn run_cleanup(config: &RoutesConfig, out_dir: &Path, dry_run: bool) {
    let orphans = compute_orphans(config, out_dir);
    if orphans.is_empty() {
        debug!("clean"; "no orphaned OG images found");
        return;
    }

    log!("clean"; "found {}", plural_count(orphans.len(), "orphaned OG image"));
    let deleted = remove_orphans(&orphans, dry_run);

    if dry_run {
        log!("clean"; "dry run, nothing was deleted");
    } else {
        log!("clean"; "deleted {}", plural_count(deleted, "file"));
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GlobalDefaults, RoutesConfig};
    use std::fs;
    use std::path::PathBuf;

    fn empty_config() -> RoutesConfig {
        RoutesConfig {
            path: PathBuf::from("seo.json"),
            routes: Vec::new(),
            global: GlobalDefaults::default(),
        }
    }

    #[test]
    fn test_cleanup_dry_run_then_delete() {
        let dir = tempfile::tempdir().unwrap();
        let stale = dir.path().join("images/og/og-stale.webp");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, b"img").unwrap();

        let config = empty_config();

        run_cleanup(&config, dir.path(), true);
        assert!(stale.exists());

        run_cleanup(&config, dir.path(), false);
        assert!(!stale.exists());
    }

    #[test]
    fn test_cleanup_on_empty_tree_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        run_cleanup(&empty_config(), dir.path(), false);
    }
}
