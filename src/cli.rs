use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

use isd_spectra::config::{RunConfig, Settings};

/// isd-spectra - align SpecWin Pro .ISD spectra of an LED current sweep
#[derive(Parser, Debug)]
#[command(name = "isd-spectra")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Folder containing one sweep of .ISD files (a folder picker opens if omitted)
    #[arg(value_name = "DATA_FOLDER")]
    data_folder: Option<PathBuf>,

    /// Important drive currents in mA, e.g. -c 0.001,0.01,0.1
    #[arg(short = 'c', long = "current", value_name = "MA", value_delimiter = ',')]
    currents: Vec<f64>,

    /// Output folder (default: the data folder)
    #[arg(short = 'o', long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Output base name (default: "<data folder name> Spectra")
    #[arg(short = 'n', long, value_name = "NAME")]
    name: Option<String>,

    /// JSON run configuration; command-line options take precedence
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Also write both tables as CSV
    #[arg(long)]
    csv: bool,

    /// Also write the aligned spectra as Parquet
    #[arg(long)]
    parquet: bool,

    /// Skip unreadable files instead of aborting
    #[arg(long)]
    skip_invalid: bool,

    /// Do not open the plot window
    #[arg(long)]
    no_plot: bool,

    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }

    /// Command-line values as a config layer; unset flags stay `None`.
    fn overrides(&self) -> RunConfig {
        let flag = |set: bool| set.then_some(true);
        RunConfig {
            data_folder: self.data_folder.clone(),
            important_currents: (!self.currents.is_empty()).then(|| self.currents.clone()),
            save_folder: self.output_dir.clone(),
            save_filename: self.name.clone(),
            skip_invalid: flag(self.skip_invalid),
            write_csv: flag(self.csv),
            write_parquet: flag(self.parquet),
            plot: self.no_plot.then_some(false),
        }
    }

    /// Config file, then command line, then the folder picker for a
    /// still-missing data folder.
    pub fn settings(&self) -> Result<Settings> {
        let base = match &self.config {
            Some(path) => RunConfig::from_file(path)?,
            None => RunConfig::default(),
        };
        let mut config = base.merge(self.overrides());

        if config.data_folder.is_none() {
            config.data_folder = pick_data_folder();
            if config.data_folder.is_none() {
                bail!("no data folder selected");
            }
        }
        config.into_settings()
    }
}

fn pick_data_folder() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Select a folder of .ISD spectra")
        .pick_folder()
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}
