//! In-memory workbook model.
//!
//! Workbooks are loaded with `calamine` (xls, xlsx and xlsm) into a sparse
//! row/column model, edited in place and written back with
//! `rust_xlsxwriter`. Only xlsx workbooks can be written.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader, Sheets, open_workbook_auto};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet as XlsxWorksheet};
use tracing::debug;

use crate::error::ExcelError;

/// Spreadsheet file formats recognised by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Xls,
    Xlsx,
    Xlsm,
}

impl FileFormat {
    /// Format named by the text after the last `.` of `file_name`.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, ext) = file_name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "xls" => Some(Self::Xls),
            "xlsx" => Some(Self::Xlsx),
            "xlsm" => Some(Self::Xlsm),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Xls => "xls",
            Self::Xlsx => "xlsx",
            Self::Xlsm => "xlsm",
        }
    }

    pub fn is_writable(self) -> bool {
        self == Self::Xlsx
    }
}

/// Value held by a cell, or the cached result of its formula.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    /// Serial date in the 1900 date system, shown with a date format.
    Date(f64),
    Text(String),
    Bool(bool),
    /// Error code such as `#DIV/0!`.
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub value: CellValue,
    /// Formula text without the leading `=`.
    pub formula: Option<String>,
}

impl Cell {
    pub fn new(value: CellValue) -> Self {
        Self {
            value,
            formula: None,
        }
    }
}

/// Inclusive rectangle of merged cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergedRange {
    pub first_row: u32,
    pub first_col: u32,
    pub last_row: u32,
    pub last_col: u32,
}

impl MergedRange {
    pub fn contains(&self, row: u32, col: u32) -> bool {
        (self.first_row..=self.last_row).contains(&row)
            && (self.first_col..=self.last_col).contains(&col)
    }

    pub fn is_anchor(&self, row: u32, col: u32) -> bool {
        row == self.first_row && col == self.first_col
    }
}

type Row = BTreeMap<u32, Cell>;

/// A single sheet: sparse rows of sparse cells plus merged ranges.
///
/// A row may exist without cells, which matters for the row bounds.
#[derive(Debug, Clone, Default)]
pub struct Worksheet {
    name: String,
    rows: BTreeMap<u32, Row>,
    merged: Vec<MergedRange>,
}

impl Worksheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index of the first existing row, `0` for an empty sheet.
    pub fn first_row_num(&self) -> u32 {
        self.rows.keys().next().copied().unwrap_or(0)
    }

    /// Index of the last existing row, `0` for an empty sheet.
    pub fn last_row_num(&self) -> u32 {
        self.rows.keys().next_back().copied().unwrap_or(0)
    }

    /// Highest column index used in rows `first..=last`, `0` if none.
    pub fn last_column_index(&self, first: u32, last: u32) -> u32 {
        if first > last {
            return 0;
        }
        self.rows
            .range(first..=last)
            .filter_map(|(_, cells)| cells.keys().next_back().copied())
            .max()
            .unwrap_or(0)
    }

    pub fn has_row(&self, row: u32) -> bool {
        self.rows.contains_key(&row)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn create_row(&mut self, row: u32) {
        self.rows.entry(row).or_default();
    }

    /// Replace `row` with a new row without cells.
    pub fn clear_row(&mut self, row: u32) {
        self.rows.insert(row, Row::new());
    }

    pub fn cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.rows.get(&row).and_then(|cells| cells.get(&col))
    }

    /// Set a literal value, dropping any formula the cell held.
    pub fn set_value(&mut self, row: u32, col: u32, value: CellValue) {
        self.rows
            .entry(row)
            .or_default()
            .insert(col, Cell::new(value));
    }

    pub fn set_formula(&mut self, row: u32, col: u32, formula: impl Into<String>, cached: CellValue) {
        self.rows.entry(row).or_default().insert(
            col,
            Cell {
                value: cached,
                formula: Some(formula.into()),
            },
        );
    }

    /// Remove a cell, returning whether it existed.
    pub fn remove_cell(&mut self, row: u32, col: u32) -> bool {
        self.rows
            .get_mut(&row)
            .is_some_and(|cells| cells.remove(&col).is_some())
    }

    /// Iterate rows `first..=last` in order.
    pub fn rows_in(&self, first: u32, last: u32) -> impl Iterator<Item = (u32, &BTreeMap<u32, Cell>)> {
        let range = if first <= last {
            self.rows.range(first..=last)
        } else {
            self.rows.range(0..0)
        };
        range.map(|(r, cells)| (*r, cells))
    }

    /// Move every row at or after `start` down by `count` rows.
    ///
    /// Merged ranges starting at or after `start` move with their rows.
    pub fn shift_rows_down(&mut self, start: u32, count: u32) {
        if count == 0 {
            return;
        }
        let moved = self.rows.split_off(&start);
        for (row, cells) in moved {
            self.rows.insert(row + count, cells);
        }
        for range in &mut self.merged {
            if range.first_row >= start {
                range.first_row += count;
                range.last_row += count;
            }
        }
    }

    pub fn merged_ranges(&self) -> &[MergedRange] {
        &self.merged
    }

    pub fn add_merged_range(&mut self, range: MergedRange) {
        self.merged.push(range);
    }

    /// The cell lies inside a merged range but is not its top-left cell.
    pub fn is_merged_non_anchor(&self, row: u32, col: u32) -> bool {
        self.merged
            .iter()
            .any(|m| m.contains(row, col) && !m.is_anchor(row, col))
    }
}

/// A workbook bound to the file it was loaded from or will be saved to.
#[derive(Debug, Clone)]
pub struct Workbook {
    path: PathBuf,
    format: FileFormat,
    sheets: Vec<Worksheet>,
}

impl Workbook {
    /// An empty workbook for `path`.
    pub fn new(path: impl Into<PathBuf>, format: FileFormat) -> Self {
        Self {
            path: path.into(),
            format,
            sheets: Vec::new(),
        }
    }

    /// Load a workbook with its values, cached formula results and merged
    /// ranges.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ExcelError> {
        let path = path.as_ref();
        let format = path
            .to_str()
            .and_then(FileFormat::from_file_name)
            .ok_or(ExcelError::BadFile)?;
        if !path.is_file() {
            return Err(ExcelError::BadFile);
        }

        let open_error = |reason: String| ExcelError::Open {
            path: path.display().to_string(),
            reason,
        };
        let mut reader = open_workbook_auto(path).map_err(|e| open_error(e.to_string()))?;

        let mut merged_by_sheet: BTreeMap<String, Vec<MergedRange>> = BTreeMap::new();
        if let Sheets::Xlsx(ref mut xlsx) = reader {
            xlsx.load_merged_regions()
                .map_err(|e| open_error(e.to_string()))?;
            for name in xlsx.sheet_names() {
                let ranges = xlsx
                    .merged_regions_by_sheet(&name)
                    .into_iter()
                    .map(|(_, _, dims)| MergedRange {
                        first_row: dims.start.0,
                        first_col: dims.start.1,
                        last_row: dims.end.0,
                        last_col: dims.end.1,
                    })
                    .collect();
                merged_by_sheet.insert(name, ranges);
            }
        }

        let mut sheets = Vec::new();
        for name in reader.sheet_names() {
            let mut sheet = Worksheet::new(name.clone());
            let values = reader
                .worksheet_range(&name)
                .map_err(|e| open_error(e.to_string()))?;
            let (row0, col0) = values.start().unwrap_or((0, 0));
            for (r, c, data) in values.used_cells() {
                let (row, col) = (row0 + offset(r), col0 + offset(c));
                sheet.set_value(row, col, cell_value(data));
            }
            if let Ok(formulas) = reader.worksheet_formula(&name) {
                let (row0, col0) = formulas.start().unwrap_or((0, 0));
                for (r, c, formula) in formulas.used_cells() {
                    let (row, col) = (row0 + offset(r), col0 + offset(c));
                    let cached = sheet
                        .cell(row, col)
                        .map_or(CellValue::Empty, |cell| cell.value.clone());
                    sheet.set_formula(row, col, formula.clone(), cached);
                }
            }
            if let Some(ranges) = merged_by_sheet.remove(&name) {
                sheet.merged = ranges;
            }
            sheets.push(sheet);
        }

        debug!(path = %path.display(), sheets = sheets.len(), "loaded workbook");
        Ok(Self {
            path: path.to_path_buf(),
            format,
            sheets,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(Worksheet::name).collect()
    }

    pub fn sheet(&self, name: &str) -> Result<&Worksheet, ExcelError> {
        self.sheets
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| ExcelError::WorksheetNotFound(name.to_owned()))
    }

    pub fn sheet_mut(&mut self, name: &str) -> Result<&mut Worksheet, ExcelError> {
        self.sheets
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| ExcelError::WorksheetNotFound(name.to_owned()))
    }

    /// Append a new empty sheet.
    ///
    /// Fails for names that are not valid sheet names or that duplicate an
    /// existing sheet, compared case-insensitively.
    pub fn add_sheet(&mut self, name: &str) -> Result<&mut Worksheet, ExcelError> {
        validate_sheet_name(name)?;
        if self.sheets.iter().any(|s| s.name.eq_ignore_ascii_case(name)) {
            return Err(ExcelError::Operation(format!(
                "The workbook already contains a sheet named '{name}'."
            )));
        }
        self.sheets.push(Worksheet::new(name));
        let last = self.sheets.len() - 1;
        Ok(&mut self.sheets[last])
    }

    /// Write the workbook back to its path.
    pub fn save(&self) -> Result<(), ExcelError> {
        if !self.format.is_writable() {
            return Err(ExcelError::ReadOnlyFormat(self.format.extension().to_owned()));
        }

        let date_format = Format::new().set_num_format("yyyy/mm/dd");
        let time_format = Format::new().set_num_format("hh:mm:ss");
        let date_time_format = Format::new().set_num_format("yyyy/mm/dd hh:mm:ss");
        let formats = DateFormats {
            date: &date_format,
            time: &time_format,
            date_time: &date_time_format,
        };

        let mut out = XlsxWorkbook::new();
        for sheet in &self.sheets {
            let target = out.add_worksheet();
            target.set_name(&sheet.name)?;
            for range in &sheet.merged {
                if range.first_row == range.last_row && range.first_col == range.last_col {
                    continue;
                }
                target.merge_range(
                    range.first_row,
                    column(range.first_col)?,
                    range.last_row,
                    column(range.last_col)?,
                    "",
                    &Format::new(),
                )?;
                // merge_range fills the anchor with an empty string.
                if sheet.cell(range.first_row, range.first_col).is_none() {
                    target.clear_cell(range.first_row, column(range.first_col)?);
                }
            }
            for (row, cells) in &sheet.rows {
                for (col, cell) in cells {
                    write_cell(target, *row, column(*col)?, cell, &formats)?;
                }
            }
        }
        out.save(&self.path)?;
        debug!(path = %self.path.display(), "saved workbook");
        Ok(())
    }
}

struct DateFormats<'a> {
    date: &'a Format,
    time: &'a Format,
    date_time: &'a Format,
}

fn write_cell(
    target: &mut XlsxWorksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    formats: &DateFormats<'_>,
) -> Result<(), ExcelError> {
    if let Some(formula) = &cell.formula {
        target.write_formula(row, col, format!("={formula}").as_str())?;
        let cached = match &cell.value {
            CellValue::Number(n) | CellValue::Date(n) => n.to_string(),
            CellValue::Text(s) | CellValue::Error(s) => s.clone(),
            CellValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_owned(),
            CellValue::Empty => String::new(),
        };
        target.set_formula_result(row, col, cached);
        return Ok(());
    }
    match &cell.value {
        CellValue::Empty => {}
        CellValue::Number(n) => {
            target.write_number(row, col, *n)?;
        }
        CellValue::Date(serial) => {
            let format = if *serial < 1.0 {
                formats.time
            } else if serial.fract() == 0.0 {
                formats.date
            } else {
                formats.date_time
            };
            target.write_number_with_format(row, col, *serial, format)?;
        }
        CellValue::Text(s) | CellValue::Error(s) => {
            target.write_string(row, col, s)?;
        }
        CellValue::Bool(b) => {
            target.write_boolean(row, col, *b)?;
        }
    }
    Ok(())
}

fn column(col: u32) -> Result<u16, ExcelError> {
    u16::try_from(col)
        .map_err(|_| ExcelError::Operation(format!("Column index {col} is out of range.")))
}

#[allow(clippy::cast_possible_truncation)]
fn offset(index: usize) -> u32 {
    index as u32
}

fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        #[allow(clippy::cast_precision_loss)]
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::DateTime(dt) => CellValue::Date(dt.as_f64()),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Error(e) => CellValue::Error(e.to_string()),
        other => CellValue::Text(other.to_string()),
    }
}

/// Check a sheet name against the rules spreadsheet applications enforce.
pub fn validate_sheet_name(name: &str) -> Result<(), ExcelError> {
    const FORBIDDEN: &[char] = &['/', '\\', '?', '*', '[', ']', ':'];
    if name.is_empty() || name.chars().count() > 31 {
        return Err(ExcelError::Operation(format!(
            "Sheet name '{name}' must be between 1 and 31 characters long."
        )));
    }
    if let Some(c) = name.chars().find(|c| FORBIDDEN.contains(c)) {
        return Err(ExcelError::Operation(format!(
            "Invalid char '{c}' found in sheet name '{name}'."
        )));
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(ExcelError::Operation(format!(
            "Sheet name '{name}' cannot start or end with an apostrophe."
        )));
    }
    Ok(())
}
