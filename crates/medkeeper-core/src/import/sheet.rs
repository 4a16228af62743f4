//! Reading the first worksheet of a spreadsheet into header-keyed rows.

use std::collections::HashMap;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use tracing::debug;

use super::{ImportError, ImportResult};

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    /// Numbers and Excel dates (as serial day numbers)
    Number(f64),
    Empty,
}

impl Cell {
    /// Trimmed text; empty text counts as [`Cell::Empty`].
    pub fn text(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }

    /// Like [`Cell::text`], but a finite number becomes [`Cell::Number`].
    pub fn parse(value: &str) -> Self {
        match value.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Cell::Number(n),
            _ => Cell::text(value),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Text, or a number rendered without a trailing `.0` when integral.
    pub fn to_display(&self) -> Option<String> {
        match self {
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(n) if n.fract() == 0.0 => Some(format!("{}", *n as i64)),
            Cell::Number(n) => Some(n.to_string()),
            Cell::Empty => None,
        }
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::text(s),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::Bool(b) => Cell::Text(b.to_string()),
            Data::Error(_) | Data::Empty => Cell::Empty,
        }
    }
}

/// One data row keyed by header name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetRow {
    /// 1-based row number in the source file, header included
    pub line: usize,
    cells: HashMap<String, Cell>,
}

impl SheetRow {
    pub fn new(line: usize) -> Self {
        Self {
            line,
            cells: HashMap::new(),
        }
    }

    pub fn with(mut self, column: &str, cell: Cell) -> Self {
        self.insert(column, cell);
        self
    }

    pub fn insert(&mut self, column: &str, cell: Cell) {
        if cell != Cell::Empty {
            self.cells.insert(column.to_string(), cell);
        }
    }

    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells.get(column)
    }
}

/// Read the first worksheet of `.xlsx`, `.xlsm`, `.xlsb`, `.xls` or `.ods`
/// files, or a `.csv` file. The first row holds column names.
pub fn read_sheet(path: &Path) -> ImportResult<Vec<SheetRow>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let rows = match extension.as_str() {
        "csv" => read_csv(path)?,
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(path)?,
        _ => return Err(ImportError::UnsupportedFormat(path.display().to_string())),
    };
    debug!(path = %path.display(), rows = rows.len(), "read sheet");
    Ok(rows)
}

fn read_workbook(path: &Path) -> ImportResult<Vec<SheetRow>> {
    let mut workbook = open_workbook_auto(path)?;
    let first = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(ImportError::NoWorksheet)?;
    let range = workbook.worksheet_range(&first)?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header
            .iter()
            .map(|d| Cell::from(d).to_display().unwrap_or_default())
            .collect(),
        None => return Ok(Vec::new()),
    };

    Ok(rows
        .enumerate()
        .map(|(i, cells)| {
            let mut row = SheetRow::new(i + 2);
            for (header, data) in headers.iter().zip(cells) {
                if !header.is_empty() {
                    row.insert(header, Cell::from(data));
                }
            }
            row
        })
        .collect())
}

fn read_csv(path: &Path) -> ImportResult<Vec<SheetRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let mut row = SheetRow::new(i + 2);
        for (header, value) in headers.iter().zip(record.iter()) {
            if !header.is_empty() {
                row.insert(header, Cell::parse(value));
            }
        }
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn csv_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_csv_keys_cells_by_header() {
        let file = csv_file("code,meaning\n bid , twice daily\nPRN,\n");
        let rows = read_sheet(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[0].get("code"), Some(&Cell::Text("bid".into())));
        assert_eq!(rows[1].get("meaning"), None);
    }

    #[test]
    fn test_read_csv_types_numbers() {
        let file = csv_file("batchId,expiryDate,code\n007,46023,1+0+1\nB-2,inf,\n");
        let rows = read_sheet(file.path()).unwrap();
        assert_eq!(rows[0].get("expiryDate"), Some(&Cell::Number(46023.0)));
        assert_eq!(rows[0].get("batchId").and_then(Cell::to_display).as_deref(), Some("7"));
        assert_eq!(rows[0].get("code"), Some(&Cell::Text("1+0+1".into())));
        assert_eq!(rows[1].get("expiryDate"), Some(&Cell::Text("inf".into())));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        assert!(matches!(
            read_sheet(file.path()),
            Err(ImportError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_unreadable_workbook_is_an_error() {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        file.write_all(b"not a zip archive").unwrap();
        assert!(matches!(
            read_sheet(file.path()),
            Err(ImportError::Spreadsheet(_))
        ));
    }

    #[test]
    fn test_number_display() {
        assert_eq!(Cell::Number(12345.0).to_display().as_deref(), Some("12345"));
        assert_eq!(Cell::Number(1.5).to_display().as_deref(), Some("1.5"));
        assert_eq!(Cell::text("   "), Cell::Empty);
    }
}
