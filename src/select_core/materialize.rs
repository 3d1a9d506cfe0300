use crate::select_core::cli::TransferMode;
use crate::select_core::config::{TransferOptions, Verbosity};
use crate::select_core::convert::{Converter, is_jpeg};
use crate::select_core::error::{Result, SelectError};
use crate::select_core::prompt::Prompt;
use crate::select_core::record::FileRecord;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Counters for one run over the selection.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MaterializeReport {
    /// Files written to the output directory
    pub materialized: usize,
    /// Files that would have been written (dry run)
    pub planned: usize,
    /// Files left alone because the target exists or the operator said no
    pub skipped: usize,
    /// Files that could not be written
    pub failed: usize,
    /// Files deleted by the sync pass
    pub removed: usize,
}

/// What happened to a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Materialized,
    Planned,
    Declined,
}

/// Writes selected images into the output directory, one at a time.
pub struct Materializer<'a> {
    opts: &'a TransferOptions,
    verbosity: Verbosity,
    converter: &'a dyn Converter,
    prompt: &'a mut dyn Prompt,
    bar: ProgressBar,
}

impl<'a> Materializer<'a> {
    pub fn new(
        opts: &'a TransferOptions,
        verbosity: Verbosity,
        converter: &'a dyn Converter,
        prompt: &'a mut dyn Prompt,
    ) -> Self {
        Materializer {
            opts,
            verbosity,
            converter,
            prompt,
            bar: ProgressBar::hidden(),
        }
    }

    /// Process every record. Per-file problems are logged and counted, never returned.
    pub fn run(&mut self, records: &[FileRecord]) -> MaterializeReport {
        let mut report = MaterializeReport::default();

        if !self.opts.albums {
            let collisions = count_collisions(records, &self.opts.output);
            if collisions > 0 {
                log::warn!(
                    "{} selected images share a file name with another one; without album folders only the first is kept{}",
                    collisions,
                    if self.opts.force { " (--force: the last one wins)" } else { "" }
                );
            }
        }

        self.bar = self.progress_bar(records.len());

        for record in records {
            log::trace!("- {:?}", record);
            let result = self.materialize(record);
            let bar = &self.bar;
            match result {
                Ok(Outcome::Materialized) => report.materialized += 1,
                Ok(Outcome::Planned) => report.planned += 1,
                Ok(Outcome::Declined) => {
                    report.skipped += 1;
                    bar.suspend(|| {
                        log::info!("  Skipping {}, declined", record.source_path().display())
                    });
                }
                Err(SelectError::TargetConflict(target)) => {
                    report.skipped += 1;
                    bar.suspend(|| {
                        log::info!(
                            "  Skipping {}, {} exists",
                            record.source_path().display(),
                            target.display()
                        )
                    });
                }
                Err(e) => {
                    report.failed += 1;
                    bar.suspend(|| log::error!("ERROR: {}", e));
                }
            }
            bar.inc(1);
        }

        self.bar.finish_with_message("Transfer complete");
        report
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if self.verbosity != Verbosity::Quiet {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
        {
            bar.set_style(style);
        }
        bar.set_message(format!("{} files", self.opts.mode));
        bar
    }

    /// Produce the target for one record.
    pub fn materialize(&mut self, record: &FileRecord) -> Result<Outcome> {
        let source = record.source_path();
        check_source(&source)?;

        let target = record.target_path(&self.opts.output, self.opts.albums);
        let exists = target.symlink_metadata().is_ok();

        if exists && is_same_location(&source, &target) {
            return Err(SelectError::SameFile(target));
        }

        if exists && self.opts.force {
            log::debug!("  Overwriting {}", target.display());
        }
        log::debug!(
            "  {} {}\t=> {}",
            self.opts.mode,
            source.display(),
            target.display()
        );

        if exists && !self.opts.force {
            return Err(SelectError::TargetConflict(target));
        }
        if self.opts.dry_run {
            return Ok(Outcome::Planned);
        }

        if self.opts.interactive {
            let question = format!(
                "{} {} => {}?",
                self.opts.mode,
                source.display(),
                target.display()
            );
            let prompt = &mut self.prompt;
            if !self.bar.suspend(|| prompt.confirm(&question))? {
                return Ok(Outcome::Declined);
            }
        }

        if exists {
            fs::remove_file(&target)?;
        }

        if self.opts.albums {
            ensure_parent_dir(&target)?;
        }

        self.transfer(record, &source, &target)?;
        Ok(Outcome::Materialized)
    }

    fn transfer(&self, record: &FileRecord, source: &Path, target: &Path) -> Result<()> {
        match self.opts.mode {
            TransferMode::Copy => {
                fs::copy(source, target)?;
            }
            TransferMode::Symlink => symlink(source, target)?,
            TransferMode::Hardlink => {
                fs::hard_link(source, target).map_err(|e| link_error(e, source, target))?;
            }
            TransferMode::Convert => {
                if is_jpeg(&record.name) {
                    self.converter
                        .convert(source, &self.opts.convert_args, target)?;
                } else {
                    log::info!("  Copying, not converting {}", source.display());
                    fs::copy(source, target)?;
                }
            }
        }
        Ok(())
    }
}

fn link_error(e: io::Error, source: &Path, target: &Path) -> SelectError {
    if e.kind() == io::ErrorKind::CrossesDevices {
        SelectError::CrossDeviceLink {
            from: source.to_path_buf(),
            to: target.to_path_buf(),
        }
    } else {
        SelectError::Io(e)
    }
}

/// Whether `a` and `b` name the same directory entry. The last component is not
/// resolved, so a symlink pointing at the other path is a different entry.
fn is_same_location(a: &Path, b: &Path) -> bool {
    match (entry_location(a), entry_location(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn entry_location(path: &Path) -> Option<PathBuf> {
    let parent = fs::canonicalize(path.parent()?).ok()?;
    Some(parent.join(path.file_name()?))
}

/// The source must be a regular file we can open.
fn check_source(source: &Path) -> Result<()> {
    let unavailable = |e: io::Error| SelectError::SourceUnavailable {
        path: source.to_path_buf(),
        source: e,
    };
    let metadata = fs::metadata(source).map_err(unavailable)?;
    if !metadata.is_file() {
        return Err(unavailable(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }
    fs::File::open(source).map_err(unavailable)?;
    Ok(())
}

fn ensure_parent_dir(target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        if !parent.is_dir() {
            fs::create_dir_all(parent).map_err(|e| SelectError::CreateDir {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn symlink(source: &Path, target: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(source, target)
}

#[cfg(windows)]
fn symlink(source: &Path, target: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(source, target)
}

/// Number of records whose flattened target path was already taken by an earlier record.
fn count_collisions(records: &[FileRecord], output: &Path) -> usize {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    records
        .iter()
        .filter(|r| !seen.insert(r.target_path(output, false)))
        .count()
}
