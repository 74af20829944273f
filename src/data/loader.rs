use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use glob::MatchOptions;

use super::isd::SpectrumParser;
use super::model::SpectralTable;

pub const ISD_EXTENSION: &str = "ISD";

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// All `.ISD` files directly inside `folder`, sorted by path.
///
/// The extension match ignores case.
pub fn discover(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        bail!("data folder does not exist: {}", folder.display());
    }

    let folder_text = folder
        .to_str()
        .with_context(|| format!("data folder path is not valid UTF-8: {}", folder.display()))?;
    let pattern = format!("{}/*.{ISD_EXTENSION}", glob::Pattern::escape(folder_text));
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };

    let mut files = Vec::new();
    for entry in glob::glob_with(&pattern, options)
        .context("building .ISD search pattern")?
    {
        let path = entry.context("reading data folder entry")?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Whole file as text. Invalid UTF-8 (unit glyphs written by the instrument
/// software in a legacy code page) is replaced rather than rejected.
pub fn read_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Read and parse one file into its two-column spectrum.
pub fn load_file(parser: &SpectrumParser, path: &Path) -> Result<SpectralTable> {
    let text = read_file(path)?;
    let lines: Vec<&str> = text.lines().collect();
    parser
        .parse(&lines)
        .with_context(|| format!("parsing {}", path.display()))
}

// ---------------------------------------------------------------------------
// Per-file error policy
// ---------------------------------------------------------------------------

/// What to do when one file of the batch cannot be used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Abort the whole run on the first bad file.
    #[default]
    Abort,
    /// Log the file, leave it out, and carry on.
    Skip,
}

/// A file left out of the run under [`ErrorPolicy::Skip`].
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Parsed spectra in processing order, plus anything that was skipped.
#[derive(Debug, Default)]
pub struct LoadedSpectra {
    pub spectra: Vec<(PathBuf, SpectralTable)>,
    pub skipped: Vec<SkippedFile>,
}

/// Parse every file in `paths`, in order.
pub fn load_all(paths: &[PathBuf], policy: ErrorPolicy) -> Result<LoadedSpectra> {
    let parser = SpectrumParser::new().context("compiling .ISD field patterns")?;
    let mut loaded = LoadedSpectra::default();

    for path in paths {
        match load_file(&parser, path) {
            Ok(table) => {
                log::debug!("loaded {}", path.display());
                loaded.spectra.push((path.clone(), table));
            }
            Err(e) if policy == ErrorPolicy::Skip => {
                log::warn!("skipping file: {e:#}");
                loaded.skipped.push(SkippedFile {
                    path: path.clone(),
                    reason: format!("{e:#}"),
                });
            }
            Err(e) => return Err(e),
        }
    }
    Ok(loaded)
}
