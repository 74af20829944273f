use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Float64Builder, ListBuilder, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use rust_xlsxwriter::{Format, Workbook};

use crate::data::model::SpectralTable;

pub const ALL_SPECTRA_SHEET: &str = "All Spectra";
pub const CHOSEN_SPECTRA_SHEET: &str = "Chosen Spectra";

// ---------------------------------------------------------------------------
// Workbook
// ---------------------------------------------------------------------------

/// Write each `(sheet name, table)` as one sheet of a new workbook at `path`.
///
/// A workbook already at `path` is deleted first. Each sheet has a bold
/// header row of column labels followed by one row per wavelength.
pub fn write_workbook(path: &Path, sheets: &[(&str, &SpectralTable)]) -> Result<()> {
    if path.exists() {
        log::info!("workbook exists, replacing {}", path.display());
        std::fs::remove_file(path)
            .with_context(|| format!("deleting existing workbook {}", path.display()))?;
    } else {
        log::info!("creating workbook {}", path.display());
    }

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    for (name, table) in sheets {
        let sheet = workbook.add_worksheet();
        sheet
            .set_name(*name)
            .with_context(|| format!("naming sheet '{name}'"))?;

        for (col, label) in table.labels().iter().enumerate() {
            sheet.write_string_with_format(0, cell_col(col)?, label.as_str(), &header)?;
        }
        for (col, column) in table.columns().iter().enumerate() {
            let col = cell_col(col)?;
            for (row, &value) in column.values.iter().enumerate() {
                sheet.write_number(cell_row(row + 1)?, col, value)?;
            }
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("saving workbook {}", path.display()))
}

fn cell_row(row: usize) -> Result<u32> {
    u32::try_from(row).context("too many rows for a worksheet")
}

fn cell_col(col: usize) -> Result<u16> {
    u16::try_from(col).context("too many columns for a worksheet")
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Header of column labels, then one record per wavelength.
pub fn write_csv(path: &Path, table: &SpectralTable) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(table.labels())?;
    for row in 0..table.row_count() {
        writer.write_record(table.row(row).iter().map(f64::to_string))?;
    }
    writer.flush().with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

/// Long layout, one row per drive-current column:
/// `x` wavelengths, `y` powers, `current_mA`, `label`.
///
/// This is the list-column layout spectral viewers load directly.
pub fn write_parquet(path: &Path, table: &SpectralTable) -> Result<()> {
    let wavelengths = table.wavelengths();
    let columns = table.data_columns();

    let mut x_builder = ListBuilder::new(Float64Builder::new());
    let mut y_builder = ListBuilder::new(Float64Builder::new());
    for column in columns {
        x_builder.values().append_slice(wavelengths);
        x_builder.append(true);
        y_builder.values().append_slice(&column.values);
        y_builder.append(true);
    }

    let currents = Float64Array::from(
        columns
            .iter()
            .map(|c| c.key.current().and_then(|current| current.milliamps()))
            .collect::<Vec<_>>(),
    );
    let labels = StringArray::from(columns.iter().map(|c| c.label()).collect::<Vec<_>>());

    let item = Arc::new(Field::new("item", DataType::Float64, true));
    let schema = Arc::new(Schema::new(vec![
        Field::new("x", DataType::List(item.clone()), false),
        Field::new("y", DataType::List(item), false),
        Field::new("current_mA", DataType::Float64, true),
        Field::new("label", DataType::Utf8, false),
    ]));

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(x_builder.finish()),
        Arc::new(y_builder.finish()),
        Arc::new(currents),
        Arc::new(labels),
    ];
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}
