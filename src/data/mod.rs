/// Data layer: `.ISD` parsing, wavelength alignment, and column selection.
///
/// Architecture:
/// ```text
///   folder of .ISD files
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  discover + read → lines
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   isd     │  header fields + Data block → 2-column SpectralTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  align    │  fold: inner join on wavelength → wide SpectralTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  select   │  requested currents or default columns → subset
///   └──────────┘
/// ```

pub mod align;
pub mod error;
pub mod isd;
pub mod loader;
pub mod model;
pub mod select;

pub use error::SpectraError;
pub use model::{DriveCurrent, PlotSeries, SpectralTable, SpectrumSample};
