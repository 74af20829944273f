use super::error::{Result, SpectraError};
use super::model::{Column, DriveCurrent, SpectralTable};

/// Column indices of the default subset for a table with `column_count`
/// columns: `{0, 2, C/2, C-1}`, ascending, out-of-range indices dropped.
///
/// Index 1, the first drive current, is never part of the subset.
pub fn default_indices(column_count: usize) -> Vec<usize> {
    if column_count == 0 {
        return Vec::new();
    }
    let mut indices = vec![0, 2, column_count / 2, column_count - 1];
    indices.retain(|&i| i < column_count);
    indices.sort_unstable();
    indices.dedup();
    indices
}

/// Narrow the aligned table to the wavelength plus the requested currents
/// (in mA, in request order), or the default positional subset when no
/// currents are requested.
pub fn select(table: &SpectralTable, wanted: Option<&[f64]>) -> Result<SpectralTable> {
    match wanted {
        Some(currents) if !currents.is_empty() => select_currents(table, currents),
        _ => Ok(select_indices(table, &default_indices(table.column_count()))),
    }
}

fn select_indices(table: &SpectralTable, indices: &[usize]) -> SpectralTable {
    let columns = indices
        .iter()
        .map(|&i| table.columns()[i].clone())
        .collect();
    SpectralTable::from_columns(columns)
}

fn select_currents(table: &SpectralTable, currents: &[f64]) -> Result<SpectralTable> {
    let not_found =
        |milliamps: f64| SpectraError::ColumnNotFound(DriveCurrent::from_milliamps(milliamps).label());

    let Some(wavelength) = table.columns().first() else {
        return Err(not_found(currents[0]));
    };

    let mut columns: Vec<Column> = vec![wavelength.clone()];
    for &milliamps in currents {
        let column = table
            .data_columns()
            .iter()
            .find(|c| c.key.current().is_some_and(|current| current.matches(milliamps)))
            .ok_or_else(|| not_found(milliamps))?;
        columns.push(column.clone());
    }
    Ok(SpectralTable::from_columns(columns))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::align::align;
    use crate::data::model::{DriveCurrent, SpectrumSample};

    fn sweep(currents: &[&str]) -> SpectralTable {
        let tables = currents.iter().enumerate().map(|(i, current)| {
            let samples = [
                SpectrumSample { wavelength: 400.0, power: i as f64 },
                SpectrumSample { wavelength: 410.0, power: i as f64 + 0.5 },
            ];
            SpectralTable::from_samples(DriveCurrent::from_header(current), &samples)
        });
        align(tables).unwrap()
    }

    #[test]
    fn test_select_single_current() {
        let table = sweep(&["0.5"]);
        let chosen = select(&table, Some(&[0.5][..])).unwrap();
        assert_eq!(chosen, table);
        assert_eq!(chosen.labels(), vec!["Wavelength (nm)", "0.5 mA"]);
    }

    #[test]
    fn test_select_keeps_request_order() {
        let table = sweep(&["0.001", "0.005", "0.01", "0.1"]);
        let chosen = select(&table, Some(&[0.1, 0.001][..])).unwrap();
        assert_eq!(chosen.labels(), vec!["Wavelength (nm)", "0.1 mA", "0.001 mA"]);
        assert_eq!(chosen.columns()[1].values, vec![3.0, 3.5]);
    }

    #[test]
    fn test_select_matches_value_not_spelling() {
        let table = sweep(&["0.50", "1.0"]);
        let chosen = select(&table, Some(&[1.0, 0.5][..])).unwrap();
        assert_eq!(chosen.labels(), vec!["Wavelength (nm)", "1.0 mA", "0.50 mA"]);
    }

    #[test]
    fn test_select_missing_current() {
        let table = sweep(&["0.1", "0.2"]);
        assert_eq!(
            select(&table, Some(&[0.1, 0.3][..])),
            Err(SpectraError::ColumnNotFound("0.3 mA".to_string()))
        );
    }

    #[test]
    fn test_default_subset_of_six_currents() {
        let table = sweep(&["1", "2", "3", "4", "5", "6"]);
        assert_eq!(table.column_count(), 7);
        assert_eq!(default_indices(7), vec![0, 2, 3, 6]);

        let chosen = select(&table, None).unwrap();
        assert_eq!(chosen.labels(), vec!["Wavelength (nm)", "2 mA", "3 mA", "6 mA"]);
    }

    #[test]
    fn test_empty_request_uses_default() {
        let table = sweep(&["1", "2", "3", "4", "5", "6"]);
        let none: &[f64] = &[];
        assert_eq!(select(&table, Some(none)).unwrap(), select(&table, None).unwrap());
    }

    #[test]
    fn test_default_indices_small_tables() {
        assert_eq!(default_indices(0), Vec::<usize>::new());
        assert_eq!(default_indices(1), vec![0]);
        assert_eq!(default_indices(2), vec![0, 1]);
        assert_eq!(default_indices(3), vec![0, 1, 2]);
        assert_eq!(default_indices(4), vec![0, 2, 3]);
        assert_eq!(default_indices(10), vec![0, 2, 5, 9]);
    }

    #[test]
    fn test_select_on_empty_table() {
        let empty = SpectralTable::default();
        assert!(select(&empty, None).unwrap().is_empty());
        assert!(matches!(
            select(&empty, Some(&[1.0][..])),
            Err(SpectraError::ColumnNotFound(_))
        ));
    }
}
