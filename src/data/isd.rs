//! Field extraction from SpecWin Pro `.ISD` text files.
//!
//! Layout of a file (abridged):
//!
//! ```text
//! Currentsource/SourceCurrent=0.1
//! NumberOfDataX=2
//! ...
//! Data
//! 400.0<TAB>1.0e-9
//! 410.0<TAB>2.0e-9
//! ```

use regex::Regex;

use super::error::{Result, SpectraError};
use super::model::{DriveCurrent, SpectralTable, SpectrumSample};

pub const SOURCE_CURRENT_PATTERN: &str = r"Currentsource/SourceCurrent";
pub const DATA_MARKER_PATTERN: &str = r"Data$";
pub const SAMPLE_COUNT_PATTERN: &str = r"NumberOfDataX";

// ---------------------------------------------------------------------------
// Field lookup
// ---------------------------------------------------------------------------

/// Index of the single line matching `pattern`.
pub fn locate<S: AsRef<str>>(pattern: &Regex, lines: &[S]) -> Result<usize> {
    let indices: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| pattern.is_match(line.as_ref()))
        .map(|(i, _)| i)
        .collect();

    match indices.as_slice() {
        [index] => Ok(*index),
        [] => Err(SpectraError::FieldNotFound(pattern.as_str().to_string())),
        _ => Err(SpectraError::AmbiguousField {
            pattern: pattern.as_str().to_string(),
            indices,
        }),
    }
}

/// Value of the `Name=Value` line matching `pattern`, right-trimmed.
pub fn extract_value<S: AsRef<str>>(pattern: &Regex, lines: &[S]) -> Result<String> {
    let line = lines[locate(pattern, lines)?].as_ref();
    split_field(line).map(|(_, value)| value.to_string())
}

/// Split a header line on its single `=`.
pub fn split_field(line: &str) -> Result<(&str, &str)> {
    let mut parts = line.split('=');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(name), Some(value), None) => Ok((name, value.trim_end())),
        _ => Err(SpectraError::MalformedField(line.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Spectrum parsing
// ---------------------------------------------------------------------------

/// Compiled header patterns; build once and reuse across files.
#[derive(Debug, Clone)]
pub struct SpectrumParser {
    source_current: Regex,
    data_marker: Regex,
    sample_count: Regex,
}

impl SpectrumParser {
    pub fn new() -> std::result::Result<Self, regex::Error> {
        Ok(SpectrumParser {
            source_current: Regex::new(SOURCE_CURRENT_PATTERN)?,
            data_marker: Regex::new(DATA_MARKER_PATTERN)?,
            sample_count: Regex::new(SAMPLE_COUNT_PATTERN)?,
        })
    }

    /// Parse one file's lines into a two-column table:
    /// wavelength and the power measured at the file's drive current.
    pub fn parse<S: AsRef<str>>(&self, lines: &[S]) -> Result<SpectralTable> {
        let current = DriveCurrent::from_header(&extract_value(&self.source_current, lines)?);
        let data_start = locate(&self.data_marker, lines)? + 1;
        let expected = self.sample_count(lines)?;

        let available = lines.len() - data_start;
        if available < expected {
            return Err(SpectraError::TruncatedSpectrum { expected, available });
        }

        let samples = lines[data_start..data_start + expected]
            .iter()
            .map(|line| parse_sample(line.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        log::debug!("parsed {} samples at {}", samples.len(), current);
        Ok(SpectralTable::from_samples(current, &samples))
    }

    fn sample_count<S: AsRef<str>>(&self, lines: &[S]) -> Result<usize> {
        let index = locate(&self.sample_count, lines)?;
        let line = lines[index].as_ref();
        let (_, value) = split_field(line)?;
        value
            .trim()
            .parse::<usize>()
            .map_err(|_| SpectraError::MalformedField(line.to_string()))
    }
}

/// `<wavelength>\t<power>`; exactly two tab-separated numbers.
pub fn parse_sample(line: &str) -> Result<SpectrumSample> {
    let malformed = || SpectraError::MalformedSample(line.to_string());
    let mut fields = line.split('\t');
    let (Some(x), Some(y), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(malformed());
    };
    Ok(SpectrumSample {
        wavelength: x.trim().parse().map_err(|_| malformed())?,
        power: y.trim().parse().map_err(|_| malformed())?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE_A: &str = "[General]\n\
        Currentsource/SourceCurrent=0.1\n\
        RadiometricUnit=W\n\
        NumberOfDataX=2\n\
        Data\n\
        400.0\t1.0e-9\n\
        410.0\t2.0e-9\n";

    fn lines(text: &str) -> Vec<&str> {
        text.lines().collect()
    }

    fn parser() -> SpectrumParser {
        SpectrumParser::new().unwrap()
    }

    #[test]
    fn test_locate_single_match() {
        let re = Regex::new("NumberOfDataX").unwrap();
        assert_eq!(locate(&re, &lines(FILE_A)).unwrap(), 3);
    }

    #[test]
    fn test_locate_no_match() {
        let re = Regex::new("Width50").unwrap();
        assert_eq!(
            locate(&re, &lines(FILE_A)),
            Err(SpectraError::FieldNotFound("Width50".to_string()))
        );
    }

    #[test]
    fn test_locate_ambiguous() {
        let re = Regex::new("Data").unwrap();
        match locate(&re, &lines(FILE_A)) {
            Err(SpectraError::AmbiguousField { pattern, indices }) => {
                assert_eq!(pattern, "Data");
                assert_eq!(indices, vec![3, 4]);
            }
            other => panic!("expected AmbiguousField, got {other:?}"),
        }
    }

    #[test]
    fn test_extract_value_trims_trailing_whitespace() {
        let text = ["Width50 [nm]=0  ", "RadiometricUnit=W\r"];
        let re = Regex::new("Width50").unwrap();
        assert_eq!(extract_value(&re, &text).unwrap(), "0");
        let re = Regex::new("RadiometricUnit").unwrap();
        assert_eq!(extract_value(&re, &text).unwrap(), "W");
    }

    #[test]
    fn test_extract_value_rejects_bad_separators() {
        let re = Regex::new("Mode").unwrap();
        assert_eq!(
            extract_value(&re, &["Mode"]),
            Err(SpectraError::MalformedField("Mode".to_string()))
        );
        assert_eq!(
            extract_value(&re, &["Mode=a=b"]),
            Err(SpectraError::MalformedField("Mode=a=b".to_string()))
        );
    }

    #[test]
    fn test_parse_file() {
        let table = parser().parse(&lines(FILE_A)).unwrap();
        assert_eq!(table.labels(), vec!["Wavelength (nm)", "0.1 mA"]);
        assert_eq!(table.wavelengths(), &[400.0, 410.0]);
        assert_eq!(table.columns()[1].values, vec![1.0e-9, 2.0e-9]);
    }

    #[test]
    fn test_parse_crlf_file() {
        let text = FILE_A.replace('\n', "\r\n");
        let table = parser().parse(&lines(&text)).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.labels()[1], "0.1 mA");
    }

    #[test]
    fn test_row_count_follows_declared_count() {
        // Trailing lines past the declared block are ignored.
        for n in 0..5usize {
            let mut text = format!("Currentsource/SourceCurrent=5\nNumberOfDataX={n}\nData\n");
            for i in 0..n + 3 {
                text.push_str(&format!("{}\t{}\n", 380.0 + i as f64, i as f64 * 1e-10));
            }
            let table = parser().parse(&lines(&text)).unwrap();
            assert_eq!(table.row_count(), n);
            assert_eq!(table.column_count(), 2);
        }
    }

    #[test]
    fn test_truncated_spectrum() {
        let text = FILE_A.replace("NumberOfDataX=2", "NumberOfDataX=5");
        assert_eq!(
            parser().parse(&lines(&text)),
            Err(SpectraError::TruncatedSpectrum { expected: 5, available: 2 })
        );
    }

    #[test]
    fn test_three_field_sample_is_malformed() {
        let text = FILE_A.replace("410.0\t2.0e-9", "410.0\t2.0e-9\t7");
        assert_eq!(
            parser().parse(&lines(&text)),
            Err(SpectraError::MalformedSample("410.0\t2.0e-9\t7".to_string()))
        );
    }

    #[test]
    fn test_non_numeric_sample_is_malformed() {
        assert_eq!(
            parse_sample("400.0\tn/a"),
            Err(SpectraError::MalformedSample("400.0\tn/a".to_string()))
        );
        assert!(parse_sample("400.0 1.0").is_err());
    }

    #[test]
    fn test_bad_sample_count_is_malformed_field() {
        let text = FILE_A.replace("NumberOfDataX=2", "NumberOfDataX=two");
        assert_eq!(
            parser().parse(&lines(&text)),
            Err(SpectraError::MalformedField("NumberOfDataX=two".to_string()))
        );
    }

    #[test]
    fn test_missing_current_field() {
        let text = FILE_A.replace("Currentsource/SourceCurrent=0.1\n", "");
        assert_eq!(
            parser().parse(&lines(&text)),
            Err(SpectraError::FieldNotFound(SOURCE_CURRENT_PATTERN.to_string()))
        );
    }
}
