use crate::select_core::config::TransferOptions;
use crate::select_core::error::{Result, SelectError};
use crate::select_core::prompt::Prompt;
use crate::select_core::record::FileRecord;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Target paths the selection produces in the output directory.
pub fn expected_targets(records: &[FileRecord], opts: &TransferOptions) -> HashSet<PathBuf> {
    records
        .iter()
        .map(|r| r.target_path(&opts.output, opts.albums))
        .collect()
}

/// Refuse to sync into a directory that holds selected originals. The sync pass
/// would otherwise delete every unselected image of the collection.
pub fn check_sync_target(records: &[FileRecord], opts: &TransferOptions) -> Result<()> {
    let output = fs::canonicalize(&opts.output).unwrap_or_else(|_| opts.output.clone());
    for record in records {
        let root = fs::canonicalize(&record.root).unwrap_or_else(|_| record.root.clone());
        let source = root.join(record.album_dir());
        if root.starts_with(&output) || source.starts_with(&output) {
            return Err(SelectError::Configuration(format!(
                "--sync refused: output directory {} contains the album root {}",
                opts.output.display(),
                record.root.display()
            )));
        }
    }
    Ok(())
}

/// Delete everything below the output directory that the selection wouldn't create.
///
/// Files and symlinks not in the selection are removed, then directories that end up
/// empty. The output directory itself is never removed. Returns the number of files
/// removed (or that would be removed on a dry run).
pub fn reconcile(opts: &TransferOptions, records: &[FileRecord], prompt: &mut dyn Prompt) -> usize {
    let expected = expected_targets(records, opts);
    let mut removed = 0;

    log::info!(
        "{}Sync: removing files not in the selection from {}",
        if opts.dry_run { "[DRY RUN] " } else { "" },
        opts.output.display()
    );

    for entry in WalkDir::new(&opts.output)
        .min_depth(1)
        .follow_links(false)
        .contents_first(true)
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::error!("ERROR: {}", SelectError::from(e));
                continue;
            }
        };
        let path = entry.path();

        if entry.file_type().is_dir() {
            if !opts.dry_run {
                remove_if_empty(path);
            }
            continue;
        }

        if expected.contains(path) {
            continue;
        }

        if opts.dry_run {
            log::info!("  Would remove {}", path.display());
            removed += 1;
            continue;
        }

        if opts.interactive {
            match prompt.confirm(&format!("delete {}?", path.display())) {
                Ok(true) => {}
                Ok(false) => {
                    log::info!("  Keeping {}, declined", path.display());
                    continue;
                }
                Err(e) => {
                    log::error!("ERROR: {}", e);
                    continue;
                }
            }
        }

        match fs::remove_file(path) {
            Ok(()) => {
                log::debug!("  Removed {}", path.display());
                removed += 1;
            }
            Err(e) => log::error!("ERROR: Failed to remove {}: {}", path.display(), e),
        }
    }

    removed
}

fn remove_if_empty(dir: &Path) {
    let is_empty = fs::read_dir(dir)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false);
    if is_empty {
        match fs::remove_dir(dir) {
            Ok(()) => log::debug!("  Removed empty directory {}", dir.display()),
            Err(e) => log::warn!("Failed to remove directory {}: {}", dir.display(), e),
        }
    }
}
