use std::collections::HashMap;

use super::error::{Result, SpectraError};
use super::model::{Column, SpectralTable};

/// Join key for a wavelength. Wavelengths are compared bit for bit, with
/// `-0.0` folded onto `0.0`.
fn wavelength_key(wavelength: f64) -> u64 {
    if wavelength == 0.0 {
        0.0f64.to_bits()
    } else {
        wavelength.to_bits()
    }
}

/// Fold per-file tables into one wide table, joining each on wavelength.
///
/// The empty table is the fold's seed, so the first spectrum is taken as is
/// and every later one narrows the rows to the wavelengths both share.
pub fn align<I>(tables: I) -> Result<SpectralTable>
where
    I: IntoIterator<Item = SpectralTable>,
{
    align_tagged(tables.into_iter().map(|table| ((), table)), |(), err| Err(err))
}

/// [`align`] over tagged tables. A table that fails to join is handed to
/// `reject` with its tag; returning `Ok` leaves it out and keeps folding.
pub fn align_tagged<T, I, F, E>(tables: I, mut reject: F) -> std::result::Result<SpectralTable, E>
where
    I: IntoIterator<Item = (T, SpectralTable)>,
    F: FnMut(T, SpectraError) -> std::result::Result<(), E>,
{
    tables
        .into_iter()
        .try_fold(SpectralTable::default(), |acc, (tag, table)| {
            match inner_join(&acc, &table) {
                Ok(joined) => Ok(joined),
                Err(err) => {
                    reject(tag, err)?;
                    Ok(acc)
                }
            }
        })
}

/// Inner join of `right` onto `left` keyed on the wavelength column.
///
/// Output rows follow `left`'s order; a wavelength repeated on both sides
/// yields one row per pairing. `right`'s data columns are appended after
/// `left`'s.
pub fn inner_join(left: &SpectralTable, right: &SpectralTable) -> Result<SpectralTable> {
    if left.is_empty() {
        return Ok(right.clone());
    }
    if right.is_empty() {
        return Ok(left.clone());
    }

    for incoming in right.data_columns() {
        let Some(current) = incoming.key.current() else {
            continue;
        };
        let clash = left
            .data_columns()
            .iter()
            .filter_map(|c| c.key.current())
            .any(|existing| existing.same_column(current));
        if clash {
            return Err(SpectraError::DuplicateColumnLabel(incoming.label()));
        }
    }

    let mut right_rows: HashMap<u64, Vec<usize>> = HashMap::with_capacity(right.row_count());
    for (row, &wavelength) in right.wavelengths().iter().enumerate() {
        right_rows.entry(wavelength_key(wavelength)).or_default().push(row);
    }

    let mut pairs: Vec<(usize, usize)> = Vec::with_capacity(left.row_count());
    for (left_row, &wavelength) in left.wavelengths().iter().enumerate() {
        if let Some(matches) = right_rows.get(&wavelength_key(wavelength)) {
            pairs.extend(matches.iter().map(|&right_row| (left_row, right_row)));
        }
    }

    let dropped = left.row_count().saturating_sub(pairs.len());
    if dropped > 0 {
        log::debug!("join dropped {dropped} wavelength rows missing from one side");
    }

    let mut columns: Vec<Column> = left
        .columns()
        .iter()
        .map(|c| reindex(c, pairs.iter().map(|p| p.0)))
        .collect();
    columns.extend(
        right
            .data_columns()
            .iter()
            .map(|c| reindex(c, pairs.iter().map(|p| p.1))),
    );

    Ok(SpectralTable::from_columns(columns))
}

fn reindex(column: &Column, rows: impl Iterator<Item = usize>) -> Column {
    Column {
        key: column.key.clone(),
        values: rows.map(|row| column.values[row]).collect(),
    }
}
