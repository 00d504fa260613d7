//! Route-image reconciliation.
//!
//! Computes, from the route config and the current output tree:
//! - which images should exist (referenced set),
//! - which need (re)generation ([`plan`]),
//! - which existing files are orphaned and eligible for deletion ([`orphan`]).
//!
//! Nothing here talks to the network; both computations are pure set
//! arithmetic over the config and a filesystem scan, recomputed from
//! scratch on every invocation.
//!
//! Only files whose *filename* starts with [`OG_PREFIX`] are ever managed.
//! Hand-authored assets (hero images, logos without the prefix) living in
//! the same tree are never generated over and never deleted, referenced or
//! not.

pub mod orphan;
pub mod plan;

pub use orphan::{compute_orphans, referenced_images, remove_orphans};
pub use plan::{PlanEntry, candidates, compute_generation_plan, count_existing, filter_plan};

/// Filename prefix marking a file as a generated Open-Graph image.
pub const OG_PREFIX: &str = "og-";

/// Extension of the generated codec's output.
pub const GENERATED_EXT: &str = "webp";

/// Output-relative target path for an image reference: a single leading
/// `/` stripped, original casing kept (this is where the file is written).
#[inline]
pub fn target_rel(raw: &str) -> &str {
    raw.strip_prefix('/').unwrap_or(raw)
}

/// Normalized image reference used for set membership: single leading `/`
/// stripped, separators unified to `/`, lowercased. Comparisons between
/// config references and on-disk paths go through this form so casing and
/// OS separators never produce false orphans.
#[inline]
pub fn normalize_ref(raw: &str) -> String {
    target_rel(raw).replace('\\', "/").to_ascii_lowercase()
}

/// Whether a filename carries the generated-image prefix.
#[inline]
pub fn has_generated_prefix(file_name: &str) -> bool {
    file_name
        .get(..OG_PREFIX.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(OG_PREFIX))
}
