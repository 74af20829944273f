mod app;
mod cli;
mod color;
mod state;
mod ui;

use anyhow::{anyhow, Result};
use clap::Parser;
use eframe::egui;

use app::SpectraViewerApp;
use isd_spectra::pipeline::{self, RunSummary};
use state::ViewerState;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());

    let settings = cli.settings()?;
    let summary = pipeline::run(&settings)?;
    report(&summary);

    if settings.plot {
        show_plot(ViewerState::new(settings.save_filename.clone(), &summary.spectra))?;
    }
    Ok(())
}

fn report(summary: &RunSummary) {
    let spectra = &summary.spectra;
    log::info!(
        "{} of {} files aligned, {} wavelengths",
        spectra.all.data_columns().len(),
        spectra.files_found,
        spectra.all.row_count()
    );
    for skipped in &spectra.skipped {
        log::warn!("skipped {}: {}", skipped.path.display(), skipped.reason);
    }
}

fn show_plot(state: ViewerState) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Emission Spectra",
        options,
        Box::new(|_cc| Ok(Box::new(SpectraViewerApp::new(state)))),
    )
    .map_err(|e| anyhow!("plot window failed: {e}"))
}
