/// Data-integrity failures raised while parsing, aligning or selecting spectra.
///
/// None of these are transient: a file that produces one will produce it again.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpectraError {
    /// No header line matched the search pattern.
    #[error("no line matches '{0}'")]
    FieldNotFound(String),

    /// More than one header line matched the search pattern.
    #[error("pattern '{pattern}' matches several lines: {indices:?}")]
    AmbiguousField { pattern: String, indices: Vec<usize> },

    /// A header line does not have exactly one `=` separator, or its value is unusable.
    #[error("malformed field line: '{0}'")]
    MalformedField(String),

    /// Fewer data lines follow the `Data` marker than `NumberOfDataX` declares.
    #[error("spectrum declares {expected} samples but only {available} lines follow the data marker")]
    TruncatedSpectrum { expected: usize, available: usize },

    /// A data line is not `<wavelength>\t<power>`.
    #[error("malformed sample line: '{0}'")]
    MalformedSample(String),

    /// A requested drive-current column is not in the aligned table.
    #[error("column not found: {0}")]
    ColumnNotFound(String),

    /// Two spectra carry the same drive-current label.
    #[error("duplicate column label: {0}")]
    DuplicateColumnLabel(String),
}

pub type Result<T> = std::result::Result<T, SpectraError>;
