//! Workbook output via rust_xlsxwriter.

use std::path::Path;

use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

use crate::error::ProcessingResult;
use crate::types::{Cell, Table};

/// Write one workbook with one worksheet per `(name, table)` entry, in order.
///
/// Each worksheet gets a bold header row followed by the data rows. Datetime
/// cells keep their serial value and get a date/time number format. The
/// workbook is assembled fully in memory and saved in one step, so a failure
/// never leaves a truncated file behind.
pub fn write_workbook(path: impl AsRef<Path>, sheets: &[(String, Table)]) -> ProcessingResult<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let datetime_format = Format::new().set_num_format("dd/mm/yyyy hh:mm");

    for (name, table) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(name)?;

        for (col_idx, column) in table.columns.iter().enumerate() {
            worksheet.write_string_with_format(0, col_idx as u16, column, &header_format)?;
        }

        for (row_idx, row) in table.rows.iter().enumerate() {
            let out_row = (row_idx + 1) as u32;
            for (col_idx, cell) in row.iter().enumerate() {
                let col = col_idx as u16;
                match cell {
                    Cell::Null => {}
                    Cell::Text(s) => {
                        worksheet.write_string(out_row, col, s)?;
                    }
                    Cell::Int(i) => {
                        worksheet.write_number(out_row, col, *i as f64)?;
                    }
                    Cell::Float(f) => {
                        worksheet.write_number(out_row, col, *f)?;
                    }
                    Cell::Bool(b) => {
                        worksheet.write_boolean(out_row, col, *b)?;
                    }
                    Cell::DateTime(serial) => {
                        let dt = ExcelDateTime::from_serial_datetime(*serial)?;
                        worksheet.write_datetime_with_format(out_row, col, dt, &datetime_format)?;
                    }
                }
            }
        }
    }

    workbook.save(path.as_ref())?;
    Ok(())
}
