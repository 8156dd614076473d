//! Test target discovery
//!
//! Recursively scans the test directory for files matching the suffix pattern.

use anyhow::{Context, Result};
use std::collections::hash_map::{Entry, HashMap};
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::models::TestTarget;

/// Find every file under `project_dir/test_dir` whose name ends with `pattern`.
///
/// Returned targets are relative to `project_dir` and sorted, so credential
/// sets are handed out in the same order on every run.
pub fn discover_targets(project_dir: &Path, test_dir: &Path, pattern: &str) -> Result<Vec<TestTarget>> {
    let root = project_dir.join(test_dir);
    if !root.is_dir() {
        warn!("Test directory not found: {}", root.display());
        return Ok(Vec::new());
    }

    let mut targets = Vec::new();

    for entry in WalkDir::new(&root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable path: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let matches = entry
            .file_name()
            .to_str()
            .map(|name| name.ends_with(pattern) && name.len() > pattern.len())
            .unwrap_or(false);
        if !matches {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(project_dir)
            .with_context(|| format!("Path outside project: {}", entry.path().display()))?;

        debug!("Discovered {}", relative.display());
        targets.push(TestTarget::new(relative));
    }

    targets.sort();

    for (first, second) in log_dir_collisions(&targets) {
        warn!(
            "{} and {} share log directory {}; the later job overwrites its logs",
            first,
            second,
            second.log_dir_name()
        );
    }

    Ok(targets)
}

/// Pairs of targets whose sanitized log directory names are equal, each
/// paired with the first target that claimed the name
pub fn log_dir_collisions(targets: &[TestTarget]) -> Vec<(&TestTarget, &TestTarget)> {
    let mut seen: HashMap<String, &TestTarget> = HashMap::new();
    let mut collisions = Vec::new();

    for target in targets {
        match seen.entry(target.log_dir_name()) {
            Entry::Occupied(first) => collisions.push((*first.get(), target)),
            Entry::Vacant(slot) => {
                slot.insert(target);
            }
        }
    }

    collisions
}
