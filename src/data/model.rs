use std::fmt;

/// Header of the shared key column in every table.
pub const WAVELENGTH_LABEL: &str = "Wavelength (nm)";

// ---------------------------------------------------------------------------
// DriveCurrent – identity of one data column
// ---------------------------------------------------------------------------

/// The LED drive current a spectrum was measured at.
///
/// Keeps the header text verbatim (it becomes the column label) next to the
/// numeric value in milliamps, so lookups never depend on float formatting.
#[derive(Debug, Clone, PartialEq)]
pub struct DriveCurrent {
    text: String,
    milliamps: Option<f64>,
}

impl DriveCurrent {
    /// Build from the raw `Currentsource/SourceCurrent` value.
    pub fn from_header(text: &str) -> Self {
        DriveCurrent {
            text: text.to_string(),
            milliamps: text.trim().parse::<f64>().ok(),
        }
    }

    /// Build from a numeric request such as `--current 0.5`.
    pub fn from_milliamps(milliamps: f64) -> Self {
        DriveCurrent {
            text: format_milliamps(milliamps),
            milliamps: Some(milliamps),
        }
    }

    /// Numeric value in mA, when the header text is a number.
    pub fn milliamps(&self) -> Option<f64> {
        self.milliamps
    }

    /// Column label, e.g. `0.1 mA`.
    pub fn label(&self) -> String {
        current_label(&self.text)
    }

    /// Legend entry in amperes, e.g. `1.00E-04 A`.
    pub fn legend(&self) -> String {
        match self.milliamps {
            Some(ma) => format!("{} A", format_scientific(ma / 1000.0)),
            None => self.label(),
        }
    }

    /// Whether this column answers a request for `milliamps`.
    pub fn matches(&self, milliamps: f64) -> bool {
        match self.milliamps {
            Some(value) => value == milliamps,
            None => self.label() == current_label(&format_milliamps(milliamps)),
        }
    }

    /// Two currents name the same column if their labels or values agree.
    pub fn same_column(&self, other: &DriveCurrent) -> bool {
        if self.label() == other.label() {
            return true;
        }
        matches!((self.milliamps, other.milliamps), (Some(a), Some(b)) if a == b)
    }
}

impl fmt::Display for DriveCurrent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mA", self.text)
    }
}

/// The one place a column label is produced from current text.
pub fn current_label(text: &str) -> String {
    format!("{text} mA")
}

/// Plain decimal rendering of a current in mA (never scientific notation).
pub fn format_milliamps(milliamps: f64) -> String {
    format!("{milliamps}")
}

/// `1.00E-03` style: two decimals, signed exponent of at least two digits.
pub fn format_scientific(value: f64) -> String {
    let raw = format!("{value:.2E}");
    match raw.split_once('E') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exp) => {
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{mantissa}E{sign}{:02}", exp.abs())
            }
            Err(_) => raw,
        },
        None => raw,
    }
}

// ---------------------------------------------------------------------------
// Columns and tables
// ---------------------------------------------------------------------------

/// One (wavelength, radiant power) pair; nm and W/nm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumSample {
    pub wavelength: f64,
    pub power: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnKey {
    Wavelength,
    Current(DriveCurrent),
}

impl ColumnKey {
    pub fn label(&self) -> String {
        match self {
            ColumnKey::Wavelength => WAVELENGTH_LABEL.to_string(),
            ColumnKey::Current(current) => current.label(),
        }
    }

    pub fn current(&self) -> Option<&DriveCurrent> {
        match self {
            ColumnKey::Wavelength => None,
            ColumnKey::Current(current) => Some(current),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub key: ColumnKey,
    pub values: Vec<f64>,
}

impl Column {
    pub fn label(&self) -> String {
        self.key.label()
    }
}

/// A wavelength-keyed table: column 0 is the wavelength, the rest are one
/// radiant-power column per drive current.
///
/// A table with no columns at all is the empty table that seeds alignment.
/// Per-file spectra are tables with exactly two columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpectralTable {
    columns: Vec<Column>,
}

impl SpectralTable {
    /// Two-column table for a single measurement, rows in file order.
    pub fn from_samples(current: DriveCurrent, samples: &[SpectrumSample]) -> Self {
        SpectralTable {
            columns: vec![
                Column {
                    key: ColumnKey::Wavelength,
                    values: samples.iter().map(|s| s.wavelength).collect(),
                },
                Column {
                    key: ColumnKey::Current(current),
                    values: samples.iter().map(|s| s.power).collect(),
                },
            ],
        }
    }

    /// Callers guarantee equal column lengths and the wavelength column first.
    pub(crate) fn from_columns(columns: Vec<Column>) -> Self {
        debug_assert!(columns.windows(2).all(|w| w[0].values.len() == w[1].values.len()));
        SpectralTable { columns }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Number of columns including the wavelength column.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn wavelengths(&self) -> &[f64] {
        self.columns
            .first()
            .map(|c| c.values.as_slice())
            .unwrap_or(&[])
    }

    /// Drive-current columns, i.e. everything after the wavelength.
    pub fn data_columns(&self) -> &[Column] {
        self.columns.get(1..).unwrap_or(&[])
    }

    pub fn labels(&self) -> Vec<String> {
        self.columns.iter().map(Column::label).collect()
    }

    /// Values of row `index` across all columns.
    pub fn row(&self, index: usize) -> Vec<f64> {
        self.columns.iter().map(|c| c.values[index]).collect()
    }

    /// Curves handed to the plot renderer, one per drive-current column.
    pub fn series(&self) -> Vec<PlotSeries> {
        let wavelengths = self.wavelengths();
        self.data_columns()
            .iter()
            .map(|column| PlotSeries {
                label: column.label(),
                legend: match &column.key {
                    ColumnKey::Current(current) => current.legend(),
                    ColumnKey::Wavelength => column.label(),
                },
                wavelengths: wavelengths.to_vec(),
                powers: column.values.clone(),
            })
            .collect()
    }
}

/// One overlay curve: x = wavelength (nm), y = radiant power (W/nm).
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    /// Column label; unique within a table, so it identifies the curve.
    pub label: String,
    /// Display text only, distinct currents may round to the same legend.
    pub legend: String,
    pub wavelengths: Vec<f64>,
    pub powers: Vec<f64>,
}
