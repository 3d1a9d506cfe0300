use crate::select_core::cli::{Cli, ListFormat, TransferMode};
use crate::select_core::convert::ImageMagick;
use crate::select_core::error::{Result, SelectError};
use crate::select_core::selector::SelectionQuery;
use simplelog::LevelFilter;
use std::fs;
use std::path::{Path, PathBuf};

/// How much the run reports while working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Progress bar and errors only
    Quiet,
    /// One line per skipped or failed file
    Normal,
    /// One line per file
    Verbose,
    /// Everything, including the raw records
    Debug,
}

impl Verbosity {
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, 0) => Verbosity::Normal,
            (false, 1) => Verbosity::Verbose,
            (false, _) => Verbosity::Debug,
        }
    }

    /// Terminal log level matching this verbosity.
    pub fn level_filter(self) -> LevelFilter {
        match self {
            Verbosity::Quiet => LevelFilter::Error,
            Verbosity::Normal => LevelFilter::Info,
            Verbosity::Verbose => LevelFilter::Debug,
            Verbosity::Debug => LevelFilter::Trace,
        }
    }
}

/// Options controlling how selected files are written to the output directory.
#[derive(Debug, Clone)]
pub struct TransferOptions {
    pub output: PathBuf,
    pub mode: TransferMode,
    /// Recreate the album folder structure below `output`
    pub albums: bool,
    pub force: bool,
    pub sync: bool,
    pub dry_run: bool,
    pub interactive: bool,
    /// Arguments passed to the conversion binary between source and target
    pub convert_args: Vec<String>,
    /// Resolved conversion binary, present iff `mode` is `Convert`
    pub convert_bin: Option<PathBuf>,
}

impl TransferOptions {
    /// Options for a plain copy into `output` with album folders, no flags set.
    pub fn new(output: impl Into<PathBuf>, mode: TransferMode) -> Self {
        TransferOptions {
            output: output.into(),
            mode,
            albums: true,
            force: false,
            sync: false,
            dry_run: false,
            interactive: false,
            convert_args: Vec::new(),
            convert_bin: None,
        }
    }
}

/// What to do with the selection.
#[derive(Debug, Clone)]
pub enum Action {
    List(ListFormat),
    Transfer(TransferOptions),
}

/// Fully validated run configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub selection: SelectionQuery,
    pub action: Action,
    pub verbosity: Verbosity,
}

impl Config {
    /// Resolve and validate the command line. Every problem that can be detected
    /// without touching the database is reported here, before any work starts.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let input = validate_input(&cli.input)?;

        let selection = SelectionQuery {
            tags: cli
                .tags
                .iter()
                .filter(|t| !t.is_empty())
                .cloned()
                .collect(),
            min_rating: cli.min_rating,
            album: cli.album.clone().filter(|a| !a.is_empty()),
        };

        let mode = if cli.compress.is_some() {
            TransferMode::Convert
        } else {
            cli.mode
        };

        let convert_bin = if mode == TransferMode::Convert {
            Some(ImageMagick::locate(cli.convert_bin.as_deref())?.binary().to_path_buf())
        } else {
            None
        };

        let action = match (cli.list, &cli.output) {
            (Some(format), _) => Action::List(format),
            (None, Some(output)) => Action::Transfer(TransferOptions {
                output: validate_output(output)?,
                mode,
                albums: !cli.no_albums,
                force: cli.force,
                sync: cli.sync,
                dry_run: cli.dry_run,
                interactive: cli.interactive,
                convert_args: split_convert_args(cli.compress.as_deref()),
                convert_bin,
            }),
            (None, None) => {
                return Err(SelectError::Configuration(
                    "an output directory is required".to_string(),
                ));
            }
        };

        Ok(Config {
            input,
            selection,
            action,
            verbosity: Verbosity::from_flags(cli.quiet, cli.verbose),
        })
    }
}

fn validate_input(path: &Path) -> Result<PathBuf> {
    let path = fs::canonicalize(path).map_err(|_| {
        SelectError::Configuration(format!("input file '{}' is not accessible", path.display()))
    })?;
    if !path.is_file() || fs::File::open(&path).is_err() {
        return Err(SelectError::Configuration(format!(
            "input file '{}' is not accessible",
            path.display()
        )));
    }
    Ok(path)
}

fn validate_output(path: &Path) -> Result<PathBuf> {
    let not_writable = || {
        SelectError::Configuration(format!(
            "output directory '{}' is not writable",
            path.display()
        ))
    };
    let path = fs::canonicalize(path).map_err(|_| not_writable())?;
    if !path.is_dir() {
        return Err(not_writable());
    }
    // Permission bits don't tell whether this user may write; try it.
    tempfile::NamedTempFile::new_in(&path).map_err(|_| not_writable())?;
    Ok(path)
}

/// Split the `--compress` option string into separate arguments.
fn split_convert_args(opts: Option<&str>) -> Vec<String> {
    opts.map(|s| s.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}
