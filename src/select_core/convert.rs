use crate::select_core::error::{Result, SelectError};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Name of the ImageMagick binary looked up in PATH.
pub const CONVERT_BIN: &str = "convert";

/// Something that can write a converted copy of an image.
pub trait Converter {
    fn convert(&self, source: &Path, args: &[String], target: &Path) -> Result<()>;
}

/// ImageMagick `convert`, invoked as `convert <source> <args...> <target>`.
#[derive(Debug, Clone)]
pub struct ImageMagick {
    binary: PathBuf,
}

impl ImageMagick {
    /// Find the conversion binary and make sure it really is ImageMagick.
    ///
    /// With `explicit` set, only that path is considered; otherwise `convert`
    /// is looked up in PATH.
    pub fn locate(explicit: Option<&Path>) -> Result<Self> {
        let wanted = explicit.unwrap_or_else(|| Path::new(CONVERT_BIN));
        let binary = which::which(wanted).map_err(|_| {
            SelectError::Configuration(format!(
                "missing '{}' binary. Install ImageMagick and retry.",
                wanted.display()
            ))
        })?;

        if !is_imagemagick(&binary) {
            return Err(SelectError::Configuration(format!(
                "'{}' is not an ImageMagick convert binary",
                binary.display()
            )));
        }

        log::debug!("Using conversion binary {}", binary.display());
        Ok(ImageMagick { binary })
    }

    /// Use `binary` as is, without probing it.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        ImageMagick {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

/// Check that `binary -version` runs and identifies itself as ImageMagick.
fn is_imagemagick(binary: &Path) -> bool {
    Command::new(binary)
        .arg("-version")
        .output()
        .map(|o| o.status.success() && String::from_utf8_lossy(&o.stdout).contains("ImageMagick"))
        .unwrap_or(false)
}

impl Converter for ImageMagick {
    fn convert(&self, source: &Path, args: &[String], target: &Path) -> Result<()> {
        let output = Command::new(&self.binary)
            .arg(source)
            .args(args)
            .arg(target)
            .output()
            .map_err(|e| SelectError::Conversion {
                path: source.to_path_buf(),
                reason: format!("failed to run {}: {}", self.binary.display(), e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SelectError::Conversion {
                path: source.to_path_buf(),
                reason: format!("{} ({})", output.status, stderr.trim()),
            });
        }

        if !target.is_file() {
            return Err(SelectError::Conversion {
                path: source.to_path_buf(),
                reason: format!("no output written to {}", target.display()),
            });
        }

        Ok(())
    }
}

/// Whether `name` looks like a JPEG file (`.jpg` / `.jpeg`, any case).
pub fn is_jpeg(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"))
        .unwrap_or(false)
}
