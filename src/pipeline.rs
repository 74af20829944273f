use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::config::Settings;
use crate::data::align::align_tagged;
use crate::data::loader::{self, ErrorPolicy, SkippedFile};
use crate::data::model::SpectralTable;
use crate::data::select::select;
use crate::export::{self, ALL_SPECTRA_SHEET, CHOSEN_SPECTRA_SHEET};

/// Tables built from one sweep folder.
#[derive(Debug, Clone)]
pub struct Spectra {
    /// Every spectrum joined on wavelength, columns in processing order.
    pub all: SpectralTable,
    /// The important currents, or the default column subset.
    pub chosen: SpectralTable,
    pub files_found: usize,
    pub skipped: Vec<SkippedFile>,
}

/// Result of a full run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub spectra: Spectra,
    pub written: Vec<PathBuf>,
}

/// Discover, parse, align and select; nothing is written.
pub fn process(settings: &Settings) -> Result<Spectra> {
    let paths = loader::discover(&settings.data_folder)?;
    if paths.is_empty() {
        bail!("no .ISD files found in {}", settings.data_folder.display());
    }
    log::info!("found {} .ISD files in {}", paths.len(), settings.data_folder.display());

    let loaded = loader::load_all(&paths, settings.policy)?;
    let mut skipped = loaded.skipped;

    let all = align_tagged(loaded.spectra, |path: PathBuf, err| {
        if settings.policy == ErrorPolicy::Skip {
            log::warn!("skipping {}: {err}", path.display());
            skipped.push(SkippedFile {
                path,
                reason: err.to_string(),
            });
            Ok(())
        } else {
            Err(anyhow::Error::new(err).context(format!("aligning {}", path.display())))
        }
    })?;
    if all.is_empty() {
        bail!("no usable spectra in {}", settings.data_folder.display());
    }
    if all.row_count() == 0 {
        log::warn!("spectra share no wavelengths; the aligned table has no rows");
    }

    let chosen = select(&all, Some(settings.important_currents.as_slice()))
        .context("selecting important currents")?;

    log::info!(
        "aligned {} spectra over {} wavelengths, {} chosen",
        all.data_columns().len(),
        all.row_count(),
        chosen.data_columns().len()
    );

    Ok(Spectra {
        all,
        chosen,
        files_found: paths.len(),
        skipped,
    })
}

/// Write the workbook and any optional exports for already processed spectra.
pub fn write_outputs(settings: &Settings, spectra: &Spectra) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(&settings.save_folder)
        .with_context(|| format!("creating {}", settings.save_folder.display()))?;

    let mut written = Vec::new();

    let workbook = settings.workbook_path();
    export::write_workbook(
        &workbook,
        &[
            (ALL_SPECTRA_SHEET, &spectra.all),
            (CHOSEN_SPECTRA_SHEET, &spectra.chosen),
        ],
    )?;
    written.push(workbook);

    if settings.write_csv {
        for (sheet, table) in [
            (ALL_SPECTRA_SHEET, &spectra.all),
            (CHOSEN_SPECTRA_SHEET, &spectra.chosen),
        ] {
            let path = settings.output_path(&format!(" - {sheet}.csv"));
            export::write_csv(&path, table)?;
            written.push(path);
        }
    }

    if settings.write_parquet {
        let path = settings.output_path(".parquet");
        export::write_parquet(&path, &spectra.all)?;
        written.push(path);
    }

    for path in &written {
        log::info!("wrote {}", path.display());
    }
    Ok(written)
}

/// Process the sweep folder and persist every requested output.
pub fn run(settings: &Settings) -> Result<RunSummary> {
    let spectra = process(settings)?;
    let written = write_outputs(settings, &spectra)?;
    Ok(RunSummary { spectra, written })
}
