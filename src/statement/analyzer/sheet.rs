use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::util::decimal::{parse_large_decimal, parse_opt_large_decimal};

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct SheetParseError {
    row: usize,
    msg: String,
}

impl SheetParseError {
    pub fn new(row: usize, msg: String) -> Self {
        SheetParseError { row, msg }
    }
}

impl std::fmt::Display for SheetParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Row {}: {}", self.row, self.msg)
    }
}

/// One record of a delimited statement, with the line it started on.
#[derive(Clone, Debug)]
pub struct Row {
    // This should be 1-index based
    pub row_num: usize,
    record: csv::StringRecord,
}

impl Row {
    /// Trimmed cell text. Cells past the end of a short row read as empty.
    pub fn cell(&self, i: usize) -> &str {
        self.record.get(i).map(str::trim).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.record.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record.is_empty()
    }

    /// True for spacer lines, including ones like `""` or `,,,`.
    pub fn is_blank(&self) -> bool {
        self.record.iter().all(|c| c.trim().is_empty())
    }

    pub fn cells(&self) -> impl Iterator<Item = &str> {
        self.record.iter().map(str::trim)
    }

    pub fn err(&self, s: String) -> SheetParseError {
        SheetParseError::new(self.row_num, s)
    }
}

/// Splits statement text into rows. Rows may have differing widths, since
/// exports mix key/value preambles with tables.
pub fn read_rows(text: &str, delimiter: u8) -> Result<Vec<Row>, SheetParseError> {
    let mut csv_r = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    let mut record = csv::StringRecord::new();
    loop {
        let more = csv_r.read_record(&mut record).map_err(|e| {
            let line = e.position().map(|p| p.line() as usize).unwrap_or(0);
            SheetParseError::new(line, format!("{e}"))
        })?;
        if !more {
            break;
        }
        let row_num = record.position().map(|p| p.line() as usize).unwrap_or(0);
        rows.push(Row { row_num, record: record.clone() });
    }
    Ok(rows)
}

/// Reads the cells of table rows by column name, after the table's header
/// row has been checked against the expected column names.
pub struct RowReader<'a> {
    col_name_to_index: HashMap<&'static str, usize>,
    row: Option<&'a Row>,
}

impl<'a> RowReader<'a> {
    /// Fails if `header` is not exactly `columns` (names compared
    /// case-insensitively, surrounding whitespace ignored).
    pub fn new(header: &Row, columns: &[&'static str]) -> Result<Self, SheetParseError> {
        let found: Vec<&str> = header.cells().collect();
        let matches = found.len() == columns.len()
            && found
                .iter()
                .zip(columns.iter())
                .all(|(f, c)| f.eq_ignore_ascii_case(c));
        if !matches {
            return Err(header.err(format!(
                "Expected columns [{}], found [{}]",
                columns.join(", "),
                found.join(", ")
            )));
        }

        Ok(Self::with_columns(columns))
    }

    /// For rows whose layout is already known, with no header to check.
    pub fn with_columns(columns: &[&'static str]) -> Self {
        RowReader {
            col_name_to_index: columns.iter().enumerate().map(|(i, c)| (*c, i)).collect(),
            row: None,
        }
    }

    pub fn set_row(&mut self, r: &'a Row) {
        self.row = Some(r);
    }

    fn current(&self) -> Result<&'a Row, SheetParseError> {
        self.row
            .ok_or_else(|| SheetParseError::new(0, "No current row".to_string()))
    }

    pub fn get_str(&self, name: &str) -> Result<String, SheetParseError> {
        let row = self.current()?;
        let col = self
            .col_name_to_index
            .get(name)
            .ok_or_else(|| row.err(format!("Table contained no column '{name}'")))?;
        Ok(row.cell(*col).to_string())
    }

    pub fn get_opt_dec(&self, name: &str) -> Result<Option<Decimal>, SheetParseError> {
        let row = self.current()?;
        let s = self.get_str(name)?;
        parse_opt_large_decimal(&s).map_err(|e| row.err(format!("{name}: {e}")))
    }

    pub fn get_dec(&self, name: &str) -> Result<Decimal, SheetParseError> {
        let s = self.get_str(name)?;
        let row = self.current()?;
        if s.is_empty() {
            return Err(row.err(format!("value in {name} was empty")));
        }
        parse_large_decimal(&s).map_err(|e| row.err(format!("{name}: {e}")))
    }
}
