use clap::{ArgAction, Parser, ValueEnum};
use simplelog::LevelFilter;
use std::fmt;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Select digiKam images by tag, rating or album, then copy, link or convert them into another directory"
)]
pub struct Cli {
    /// Input digiKam database (digikam4.db)
    #[arg(short, long, value_name = "DBFILE")]
    pub input: PathBuf,

    /// Output directory (must exist and be writable)
    #[arg(short, long, value_name = "DIR", required_unless_present = "list")]
    pub output: Option<PathBuf>,

    /// Transfer mode
    #[arg(short, long, value_enum, default_value_t = TransferMode::Copy)]
    pub mode: TransferMode,

    /// Process JPEG images with ImageMagick 'convert', e.g. '-quality 80 -geometry 1920x1080'.
    ///
    /// Sets '--mode=convert'; non-JPEG files are copied unchanged. Requires
    /// the 'convert' binary in PATH (or --convert-bin).
    #[arg(short, long, value_name = "OPTS", allow_hyphen_values = true)]
    pub compress: Option<String>,

    /// Path to the ImageMagick 'convert' binary (default: looked up in PATH)
    #[arg(long, value_name = "PATH")]
    pub convert_bin: Option<PathBuf>,

    /// Overwrite existing images in the target folder structure (default: skip)
    #[arg(short, long)]
    pub force: bool,

    /// Sync mode: delete files in the output directory that the selection wouldn't create
    #[arg(short, long)]
    pub sync: bool,

    /// Match images with any of these tags (exact flat names, comma separated)
    #[arg(short, long, value_name = "x,y,z", value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Match images with at least N stars
    #[arg(short = 'r', long = "minrating", value_name = "N", default_value_t = 0)]
    pub min_rating: i64,

    /// Match albums whose path contains this (case-sensitive) string
    #[arg(short, long, value_name = "STR")]
    pub album: Option<String>,

    /// Do not create album folders in the output directory
    #[arg(long)]
    pub no_albums: bool,

    /// Show detailed progress while working (-vv for debug output)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Show only a progress bar and errors while working
    #[arg(short, long)]
    pub quiet: bool,

    /// Pretend mode: do not write or delete any files
    #[arg(short, long)]
    pub dry_run: bool,

    /// Ask before writing or deleting each file
    #[arg(long)]
    pub interactive: bool,

    /// Print the selected images instead of transferring them
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub list: Option<ListFormat>,

    /// Enable file logging to digikam-select.log
    #[arg(long = "log")]
    pub log: bool,

    /// Log level for file logging (debug, info, warn, error)
    #[arg(long, default_value_t = LevelFilter::Debug)]
    pub log_level: LevelFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransferMode {
    /// Byte-for-byte copy
    Copy,
    /// Hard link (source and output must be on the same filesystem)
    #[value(name = "link", alias = "hardlink")]
    Hardlink,
    /// Symbolic link pointing at the source
    Symlink,
    /// Recompress JPEG files with ImageMagick, copy everything else
    Convert,
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransferMode::Copy => "copy",
            TransferMode::Hardlink => "link",
            TransferMode::Symlink => "symlink",
            TransferMode::Convert => "convert",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// One source path per line
    Paths,
    /// JSON output
    Json,
}
