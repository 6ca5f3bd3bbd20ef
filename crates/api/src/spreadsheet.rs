//! Spreadsheet export and import of a collection.
//!
//! Export writes an Excel workbook with one sheet of `width, length, area,
//! x, y` columns, leaving absent coordinates blank. Import reads either an
//! Excel workbook (first sheet) or CSV text: `width` and `length` columns are
//! required (any order, case-insensitive headers), `x` and `y` are read when
//! present and `area` is always recomputed.

use std::io::Cursor;

use pothole_core::board::Point;
use pothole_core::error::CoreError;
use pothole_core::pothole::{Dimensions, Pothole, StoredPothole};
use umya_spreadsheet::{reader, writer};

/// Content type of exported spreadsheets.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// File extension of exported spreadsheets.
pub const XLSX_EXTENSION: &str = "xlsx";

/// Name of the exported worksheet.
pub const SHEET_NAME: &str = "Potholes";

const HEADERS: [&str; 5] = ["width", "length", "area", "x", "y"];

/// xlsx files are zip archives.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

fn internal(message: impl std::fmt::Display) -> CoreError {
    CoreError::Internal(format!("spreadsheet write failed: {message}"))
}

fn unreadable(message: impl std::fmt::Display) -> CoreError {
    CoreError::Validation(format!("unreadable spreadsheet: {message}"))
}

/// Render `records` as xlsx bytes.
pub fn write_xlsx(records: &[StoredPothole]) -> Result<Vec<u8>, CoreError> {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book
        .get_sheet_mut(&0)
        .ok_or_else(|| internal("new workbook has no sheet"))?;
    sheet.set_name(SHEET_NAME);

    for (col, header) in (1u32..).zip(HEADERS) {
        sheet.get_cell_mut((col, 1)).set_value(header);
    }
    for (row, record) in (2u32..).zip(records) {
        let values = [
            Some(record.width),
            Some(record.length),
            Some(record.area),
            record.x,
            record.y,
        ];
        for (col, value) in (1u32..).zip(values) {
            if let Some(value) = value {
                sheet.get_cell_mut((col, row)).set_value_number(value);
            }
        }
    }

    let mut out = Cursor::new(Vec::new());
    writer::xlsx::write_writer(&book, &mut out).map_err(internal)?;
    Ok(out.into_inner())
}

/// Parse an uploaded spreadsheet, xlsx or CSV, told apart by content.
pub fn read_spreadsheet(bytes: &[u8]) -> Result<Vec<StoredPothole>, CoreError> {
    if bytes.starts_with(ZIP_MAGIC) {
        read_xlsx(bytes)
    } else {
        read_csv(bytes)
    }
}

/// Parse the first sheet of an xlsx workbook.
pub fn read_xlsx(bytes: &[u8]) -> Result<Vec<StoredPothole>, CoreError> {
    let book = reader::xlsx::read_reader(Cursor::new(bytes), true).map_err(unreadable)?;
    let sheet = book
        .get_sheet(&0)
        .ok_or_else(|| unreadable("workbook has no sheets"))?;
    let (last_col, last_row) = sheet.get_highest_column_and_row();

    let row_values = |row: u32| -> Vec<String> {
        (1..=last_col).map(|col| sheet.get_value((col, row))).collect()
    };
    let headers = row_values(1);
    let rows = (2..=last_row).map(|row| (row as usize, row_values(row)));
    records_from_rows(&headers, rows)
}

/// Parse CSV text.
pub fn read_csv(bytes: &[u8]) -> Result<Vec<StoredPothole>, CoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(unreadable)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (i, row) in reader.records().enumerate() {
        // Header is line 1.
        let line = i + 2;
        let row = row.map_err(|e| CoreError::Validation(format!("row {line}: {e}")))?;
        rows.push((line, row.iter().map(str::to_string).collect()));
    }
    records_from_rows(&headers, rows)
}

struct Columns {
    width: usize,
    length: usize,
    x: Option<usize>,
    y: Option<usize>,
}

impl Columns {
    fn locate(headers: &[String]) -> Result<Self, CoreError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let required = |name: &str| {
            find(name).ok_or_else(|| {
                CoreError::Validation(format!("spreadsheet is missing the '{name}' column"))
            })
        };
        Ok(Self {
            width: required("width")?,
            length: required("length")?,
            x: find("x"),
            y: find("y"),
        })
    }
}

fn coordinate(row: &[String], column: Option<usize>, line: usize) -> Result<Option<f64>, CoreError> {
    let Some(raw) = column.and_then(|c| row.get(c)).map(|c| c.trim()) else {
        return Ok(None);
    };
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|_| CoreError::Validation(format!("row {line}: coordinate '{raw}' is not a number")))
}

/// Build records from header cells and numbered data rows. Blank rows are
/// skipped.
fn records_from_rows(
    headers: &[String],
    rows: impl IntoIterator<Item = (usize, Vec<String>)>,
) -> Result<Vec<StoredPothole>, CoreError> {
    let columns = Columns::locate(headers)?;

    let mut records = Vec::new();
    for (line, row) in rows {
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let cell = |c: usize| row.get(c).map(String::as_str).unwrap_or("");
        let dimensions = Dimensions::parse(cell(columns.width), cell(columns.length))
            .map_err(|e| CoreError::Validation(format!("row {line}: {e}")))?;

        let x = coordinate(&row, columns.x, line)?;
        let y = coordinate(&row, columns.y, line)?;
        let position = x.zip(y).map(|(x, y)| Point::new(x, y));
        records.push(StoredPothole::from_parts(Pothole::measured(dimensions), position));
    }
    Ok(records)
}
