//! Workbook operations behind the Excel actions.
//!
//! Each operation takes its resolved inputs, performs blocking file I/O and
//! returns the result map. Inputs are expected to carry their defaults.

use actionpack_core::strings::split_fields;
use actionpack_core::{ResultMap, ReturnCode, RETURN_CODE, RETURN_RESULT};
use tracing::{debug, info, instrument};

use crate::condition::{Operand, Operator, matches};
use crate::error::{BAD_CREATE_EXCEL_FILE_MSG, EXCEPTION_WORKSHEET_NAME_EMPTY, ExcelError, ROW_DATA_REQD_MSG};
use crate::format::{java_double, parse_date_text, parse_number, round_two_decimals, serial_to_day_text, to_serial};
use crate::index::{data_index_list, parse_index_list, validate_index};
use crate::workbook::{Cell, CellValue, FileFormat, Workbook, Worksheet};

pub const HEADER: &str = "header";
pub const ROWS_COUNT: &str = "rowsCount";
pub const COLUMNS_COUNT: &str = "columnsCount";

/// Inputs shared by every operation on an existing workbook.
#[derive(Debug, Clone, Default)]
pub struct WorkbookTarget {
    pub excel_file_name: String,
    pub worksheet_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct GetCellInputs {
    pub target: WorkbookTarget,
    pub has_header: bool,
    pub first_row_index: u32,
    pub row_index: String,
    pub column_index: String,
    pub row_delimiter: String,
    pub column_delimiter: String,
}

#[derive(Debug, Clone, Default)]
pub struct ModifyCellInputs {
    pub target: WorkbookTarget,
    pub row_index: String,
    pub column_index: String,
    pub new_value: String,
    pub column_delimiter: String,
}

#[derive(Debug, Clone, Default)]
pub struct DeleteCellInputs {
    pub target: WorkbookTarget,
    pub row_index: String,
    pub column_index: String,
}

#[derive(Debug, Clone, Default)]
pub struct AddDataInputs {
    pub target: WorkbookTarget,
    pub header_data: String,
    pub row_data: String,
    pub row_index: String,
    pub column_index: String,
    pub row_delimiter: String,
    pub column_delimiter: String,
    pub overwrite_data: bool,
}

#[derive(Debug, Clone, Default)]
pub struct NewDocumentInputs {
    pub excel_file_name: String,
    pub worksheet_names: String,
    pub delimiter: String,
}

#[derive(Debug, Clone, Default)]
pub struct RowQueryInputs {
    pub target: WorkbookTarget,
    pub has_header: bool,
    pub first_row_index: u32,
    pub column_index_to_query: u32,
    pub operator: String,
    pub value: String,
}

fn open(target: &WorkbookTarget) -> Result<Workbook, ExcelError> {
    Workbook::open(target.excel_file_name.trim())
}

/// Text value as a number when it parses, otherwise trimmed text.
fn data_value(text: &str) -> CellValue {
    parse_number(text).map_or_else(|| CellValue::Text(text.trim().to_owned()), CellValue::Number)
}

/// Row and column bounds of a sheet for index validation.
struct Bounds {
    first_row: u32,
    last_row: u32,
    last_col: u32,
}

impl Bounds {
    fn of(sheet: &Worksheet, first_row: u32) -> Self {
        let last_row = sheet.last_row_num();
        Self {
            first_row,
            last_row,
            last_col: sheet.last_column_index(first_row, last_row),
        }
    }

    fn rows(&self, index: &str) -> Result<Vec<u32>, ExcelError> {
        let index = if index.trim().is_empty() {
            format!("{}:{}", self.first_row, self.last_row)
        } else {
            index.to_owned()
        };
        let list = parse_index_list(&index, self.first_row, self.last_row)?;
        validate_index(&list, self.first_row, self.last_row, true)
    }

    fn columns(&self, index: &str) -> Result<Vec<u32>, ExcelError> {
        let index = if index.trim().is_empty() {
            format!("0:{}", self.last_col)
        } else {
            index.to_owned()
        };
        let list = parse_index_list(&index, 0, self.last_col)?;
        validate_index(&list, 0, self.last_col, false)
    }
}

/// Read cell values, joined by the column and row delimiters.
#[instrument(skip(inputs), fields(file = %inputs.target.excel_file_name))]
pub fn get_cell(inputs: &GetCellInputs) -> Result<ResultMap, ExcelError> {
    let workbook = open(&inputs.target)?;
    let sheet = workbook.sheet(&inputs.target.worksheet_name)?;

    // Column bounds include the header row; row bounds start after it.
    let last_col = sheet.last_column_index(inputs.first_row_index, sheet.last_row_num());
    let first_row = if inputs.has_header {
        inputs.first_row_index + 1
    } else {
        inputs.first_row_index
    };
    let bounds = Bounds {
        first_row,
        last_row: sheet.last_row_num(),
        last_col,
    };
    let rows = bounds.rows(&inputs.row_index)?;
    let columns = bounds.columns(&inputs.column_index)?;

    let body = rows
        .iter()
        .map(|&row| {
            columns
                .iter()
                .map(|&col| render_value(sheet.cell(row, col)))
                .collect::<Vec<_>>()
                .join(&inputs.column_delimiter)
        })
        .collect::<Vec<_>>()
        .join(&inputs.row_delimiter);

    let mut result = ResultMap::success(body)
        .with(ROWS_COUNT, rows.len().to_string())
        .with(COLUMNS_COUNT, columns.len().to_string());
    if inputs.has_header {
        let header_row = first_row - 1;
        if !sheet.has_row(header_row) {
            return Err(ExcelError::Operation(format!(
                "The header row {header_row} does not exist in worksheet {}.",
                sheet.name()
            )));
        }
        let header = columns
            .iter()
            .map(|&col| render_header(sheet.cell(header_row, col)))
            .collect::<Vec<_>>()
            .join(&inputs.column_delimiter);
        result.insert(HEADER, header);
    }
    debug!(rows = rows.len(), columns = columns.len(), "read cells");
    Ok(result)
}

/// Cell text for data output: numbers rounded to two decimals, formulas as
/// their cached result.
fn render_value(cell: Option<&Cell>) -> String {
    let Some(cell) = cell else {
        return String::new();
    };
    if cell.formula.is_some() {
        return match &cell.value {
            CellValue::Bool(b) => b.to_string(),
            CellValue::Number(n) | CellValue::Date(n) => java_double(*n),
            CellValue::Text(s) => s.clone(),
            CellValue::Error(_) | CellValue::Empty => String::new(),
        };
    }
    match &cell.value {
        CellValue::Number(n) | CellValue::Date(n) => round_two_decimals(*n),
        CellValue::Text(s) | CellValue::Error(s) => s.clone(),
        CellValue::Bool(b) => bool_text(*b),
        CellValue::Empty => String::new(),
    }
}

/// Cell text for the header output: formulas as written, dates as
/// `dd-MMM-yyyy`.
fn render_header(cell: Option<&Cell>) -> String {
    let Some(cell) = cell else {
        return String::new();
    };
    if let Some(formula) = &cell.formula {
        return formula.clone();
    }
    match &cell.value {
        CellValue::Number(n) => java_double(*n),
        CellValue::Date(serial) => serial_to_day_text(*serial),
        CellValue::Text(s) | CellValue::Error(s) => s.clone(),
        CellValue::Bool(b) => bool_text(*b),
        CellValue::Empty => String::new(),
    }
}

fn bool_text(value: bool) -> String {
    if value { "TRUE" } else { "FALSE" }.to_owned()
}

/// Write one value into every selected cell.
///
/// Cells that are covered by a merged range, other than its top-left cell,
/// are skipped and make the result a failure. The return result is the
/// number of modified rows.
#[instrument(skip(inputs), fields(file = %inputs.target.excel_file_name))]
pub fn modify_cell(inputs: &ModifyCellInputs) -> Result<ResultMap, ExcelError> {
    let mut workbook = open(&inputs.target)?;
    let sheet = workbook.sheet_mut(&inputs.target.worksheet_name)?;

    let bounds = Bounds::of(sheet, sheet.first_row_num());
    let rows = bounds.rows(&inputs.row_index)?;
    let columns = bounds.columns(&inputs.column_index)?;

    let values = split_fields(&inputs.new_value, &inputs.column_delimiter);
    if values.len() != columns.len() {
        return Err(ExcelError::Operation(format!(
            "The data input is not valid. The size of data input should be the same as size of columnIndex input, which is {}.",
            columns.len()
        )));
    }

    let mut modified = 0usize;
    let mut incomplete = false;
    for &row in &rows {
        sheet.create_row(row);
        let mut touched = false;
        for (&col, value) in columns.iter().zip(&values) {
            if sheet.is_merged_non_anchor(row, col) {
                incomplete = true;
                continue;
            }
            sheet.set_value(row, col, modify_value(value));
            touched = true;
        }
        if touched {
            modified += 1;
        }
    }

    if modified != 0 {
        workbook.save()?;
    }
    info!(modified, rows = rows.len(), "modified cells");
    Ok(if modified == rows.len() && !incomplete {
        ResultMap::success(modified.to_string())
    } else {
        ResultMap::failure(modified.to_string())
    })
}

fn modify_value(text: &str) -> CellValue {
    if let Some(n) = parse_number(text) {
        CellValue::Number(n)
    } else if let Some(date) = parse_date_text(text) {
        CellValue::Date(to_serial(date))
    } else {
        CellValue::Text(text.trim().to_owned())
    }
}

/// Remove the selected cells. The return result is the number of rows the
/// selection touched.
#[instrument(skip(inputs), fields(file = %inputs.target.excel_file_name))]
pub fn delete_cell(inputs: &DeleteCellInputs) -> Result<ResultMap, ExcelError> {
    let mut workbook = open(&inputs.target)?;
    let sheet = workbook.sheet_mut(&inputs.target.worksheet_name)?;

    let bounds = Bounds::of(sheet, sheet.first_row_num());
    let rows = bounds.rows(&inputs.row_index)?;
    let columns = bounds.columns(&inputs.column_index)?;
    if rows.is_empty() || columns.is_empty() {
        return Ok(ResultMap::success("0"));
    }

    let mut deleted = 0usize;
    for &row in &rows {
        if !sheet.has_row(row) {
            continue;
        }
        for &col in &columns {
            sheet.remove_cell(row, col);
        }
        deleted += 1;
    }
    workbook.save()?;
    info!(deleted, "deleted cells");
    Ok(ResultMap::success(deleted.to_string()))
}

/// Write delimited row data, optionally with a header row.
///
/// Without `overwrite_data` existing rows at the target positions move down
/// to make room. The return result is the number of rows written.
#[instrument(skip(inputs), fields(file = %inputs.target.excel_file_name))]
pub fn add_excel_data(inputs: &AddDataInputs) -> Result<ResultMap, ExcelError> {
    let mut workbook = open(&inputs.target)?;
    let sheet = workbook.sheet_mut(&inputs.target.worksheet_name)?;

    let has_header = !inputs.header_data.trim().is_empty();
    if has_header {
        sheet.clear_row(0);
        for (col, value) in split_fields(&inputs.header_data, &inputs.column_delimiter)
            .iter()
            .enumerate()
        {
            sheet.set_value(0, column_index(col)?, data_value(value));
        }
    }

    let rows = split_fields(&inputs.row_data, &inputs.row_delimiter);
    let data_columns = rows
        .first()
        .map_or(0, |row| split_fields(row, &inputs.column_delimiter).len());
    let row_indexes = data_index_list(
        &inputs.row_index,
        sheet.last_row_num(),
        rows.len(),
        data_columns,
        true,
        has_header,
    )?;
    let column_indexes = data_index_list(
        &inputs.column_index,
        sheet.last_row_num(),
        rows.len(),
        data_columns,
        false,
        has_header,
    )?;

    if !inputs.overwrite_data {
        shift_rows(sheet, &row_indexes);
    }
    if inputs.row_data.trim().is_empty() {
        return Err(ExcelError::Operation(ROW_DATA_REQD_MSG.to_owned()));
    }

    if rows.len() != row_indexes.len() {
        return Err(ExcelError::Operation(
            "Row index list size doesn't match rowData row count.".to_owned(),
        ));
    }
    for (&row, line) in row_indexes.iter().zip(&rows) {
        let values = split_fields(line, &inputs.column_delimiter);
        if values.len() != column_indexes.len() {
            return Err(ExcelError::Operation(
                "Column index list size doesn't match rowData column count.".to_owned(),
            ));
        }
        sheet.create_row(row);
        for (&col, value) in column_indexes.iter().zip(&values) {
            sheet.set_value(row, col, data_value(value));
        }
    }

    workbook.save()?;
    info!(rows = row_indexes.len(), "added rows");
    Ok(ResultMap::success(row_indexes.len().to_string()))
}

/// Open a gap at each run of consecutive target rows.
fn shift_rows(sheet: &mut Worksheet, indexes: &[u32]) {
    let mut i = 0;
    while i < indexes.len() {
        let start = indexes[i];
        let mut run = 1u32;
        while i + 1 < indexes.len() && indexes[i + 1] == indexes[i] + 1 {
            run += 1;
            i += 1;
        }
        if start > sheet.last_row_num() || sheet.row_count() == 0 {
            for row in start..start + run {
                sheet.create_row(row);
            }
        } else {
            sheet.shift_rows_down(start, run);
        }
        i += 1;
    }
}

fn column_index(col: usize) -> Result<u32, ExcelError> {
    u32::try_from(col).map_err(|_| ExcelError::Operation(format!("Column index {col} is out of range.")))
}

/// Create a new workbook with the named sheets.
#[instrument(skip(inputs), fields(file = %inputs.excel_file_name))]
pub fn new_excel_document(inputs: &NewDocumentInputs) -> Result<ResultMap, ExcelError> {
    let file_name = inputs.excel_file_name.trim();
    let format = match file_name.rsplit_once('.') {
        Some((_, ext)) if !ext.trim().is_empty() => FileFormat::from_file_name(file_name),
        _ => None,
    };
    let Some(format) = format.filter(|f| f.is_writable()) else {
        return Err(ExcelError::Operation(BAD_CREATE_EXCEL_FILE_MSG.to_owned()));
    };

    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let stem = base.rsplit_once('.').map_or(base, |(stem, _)| stem);
    if stem.trim().is_empty() {
        return Err(ExcelError::Operation("Excel file name cannot be empty.".to_owned()));
    }

    let names = if inputs.worksheet_names.trim().is_empty() {
        let delimiter = &inputs.delimiter;
        format!("Sheet1{delimiter}Sheet2{delimiter}Sheet3")
    } else {
        inputs.worksheet_names.clone()
    };
    let delimiters: Vec<char> = inputs.delimiter.chars().collect();
    let tokens: Vec<&str> = names
        .split(|c: char| delimiters.contains(&c))
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.is_empty() {
        return Err(ExcelError::Operation(EXCEPTION_WORKSHEET_NAME_EMPTY.to_owned()));
    }

    let mut workbook = Workbook::new(file_name, format);
    for name in tokens {
        workbook.add_sheet(name.trim())?;
    }
    workbook.save()?;
    info!(sheets = workbook.sheet_names().len(), "created workbook");
    Ok(ResultMap::success(format!("{file_name} created successfully")))
}

/// Indexes of rows whose queried column satisfies the condition.
#[instrument(skip(inputs), fields(file = %inputs.target.excel_file_name))]
pub fn get_row_index_by_condition(inputs: &RowQueryInputs) -> Result<ResultMap, ExcelError> {
    let Some(op) = Operator::parse(&inputs.operator) else {
        return Err(ExcelError::Operation(format!(
            "The operator input is not valid. Valid values: {}.",
            Operator::VALUES.join(", ")
        )));
    };
    let workbook = open(&inputs.target)?;
    let sheet = workbook.sheet(&inputs.target.worksheet_name)?;

    let first = if inputs.has_header {
        inputs.first_row_index + 1
    } else {
        inputs.first_row_index
    };
    let last = sheet.last_row_num();
    let col = inputs.column_index_to_query;
    let query = Operand::from_query(&inputs.value);

    let mut found = Vec::new();
    if sheet.row_count() > 0 {
        for row in first..=last {
            if sheet.is_merged_non_anchor(row, col) {
                continue;
            }
            let Some(operand) = Operand::from_cell(sheet.cell(row, col)) else {
                continue;
            };
            if matches(&operand, op, &query) {
                found.push(row.to_string());
            }
        }
    }

    debug!(matched = found.len(), "evaluated row condition");
    let mut result = ResultMap::new()
        .with(RETURN_RESULT, found.join(","))
        .with(RETURN_CODE, ReturnCode::Success.as_str());
    result.insert(ROWS_COUNT, found.len().to_string());
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::MergedRange;
    use std::path::Path;

    fn target(path: &Path) -> WorkbookTarget {
        WorkbookTarget {
            excel_file_name: path.display().to_string(),
            worksheet_name: "Sheet1".into(),
        }
    }

    /// Sheet1:
    /// ```text
    /// name   | qty | price
    /// apple  | 3   | 1.255
    /// pear   | 10  | 2
    /// plum   | 7   | =B3*C3 (20)
    /// ```
    fn fixture(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("stock.xlsx");
        let mut wb = Workbook::new(&path, FileFormat::Xlsx);
        let sheet = wb.add_sheet("Sheet1").unwrap();
        for (col, name) in ["name", "qty", "price"].iter().enumerate() {
            sheet.set_value(0, u32::try_from(col).unwrap(), CellValue::Text((*name).into()));
        }
        let rows = [("apple", 3.0, 1.255), ("pear", 10.0, 2.0), ("plum", 7.0, 0.0)];
        for (i, (name, qty, price)) in rows.iter().enumerate() {
            let row = u32::try_from(i).unwrap() + 1;
            sheet.set_value(row, 0, CellValue::Text((*name).into()));
            sheet.set_value(row, 1, CellValue::Number(*qty));
            sheet.set_value(row, 2, CellValue::Number(*price));
        }
        sheet.set_formula(3, 2, "B3*C3", CellValue::Number(20.0));
        wb.add_sheet("Other").unwrap();
        wb.save().unwrap();
        path
    }

    fn get_cell_inputs(path: &Path) -> GetCellInputs {
        GetCellInputs {
            target: target(path),
            has_header: true,
            first_row_index: 0,
            row_delimiter: "|".into(),
            column_delimiter: ",".into(),
            ..GetCellInputs::default()
        }
    }

    #[test]
    fn get_cell_reads_all_data_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(dir.path());
        let result = get_cell(&get_cell_inputs(&path)).unwrap();
        assert_eq!(
            result.return_result(),
            "apple,3,1.26|pear,10,2|plum,7,20.0"
        );
        assert_eq!(result.get(HEADER), Some("name,qty,price"));
        assert_eq!(result.get(ROWS_COUNT), Some("3"));
        assert_eq!(result.get(COLUMNS_COUNT), Some("3"));
        assert!(result.is_success());
    }

    #[test]
    fn get_cell_selected_cells_without_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(dir.path());
        let inputs = GetCellInputs {
            has_header: false,
            row_index: "0,2".into(),
            column_index: "0:1,9".into(),
            ..get_cell_inputs(&path)
        };
        let result = get_cell(&inputs).unwrap();
        assert_eq!(result.return_result(), "name,qty|pear,10");
        assert_eq!(result.get(HEADER), None);
        assert_eq!(result.get(COLUMNS_COUNT), Some("2"));
    }

    #[test]
    fn get_cell_header_follows_selected_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(dir.path());
        let inputs = GetCellInputs {
            column_index: "1".into(),
            ..get_cell_inputs(&path)
        };
        let result = get_cell(&inputs).unwrap();
        assert_eq!(result.return_result(), "3|10|7");
        assert_eq!(result.get(HEADER), Some("qty"));
        assert_eq!(result.get(COLUMNS_COUNT), Some("1"));

        let inputs = GetCellInputs {
            row_index: "1".into(),
            column_index: "2,0".into(),
            ..get_cell_inputs(&path)
        };
        let result = get_cell(&inputs).unwrap();
        assert_eq!(result.return_result(), "1.26,apple");
        assert_eq!(result.get(HEADER), Some("price,name"));
    }

    #[test]
    fn get_cell_whole_sheet_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(dir.path());
        let inputs = GetCellInputs {
            row_index: "0:1048575".into(),
            column_index: "0:16383".into(),
            ..get_cell_inputs(&path)
        };
        let result = get_cell(&inputs).unwrap();
        assert_eq!(result.get(ROWS_COUNT), Some("3"));
        assert_eq!(result.get(COLUMNS_COUNT), Some("3"));
    }

    #[test]
    fn get_cell_missing_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(dir.path());
        let mut inputs = get_cell_inputs(&path);
        inputs.target.worksheet_name = "Nope".into();
        let err = get_cell(&inputs).unwrap_err();
        assert_eq!(err.to_string(), "Worksheet Nope does not exist.");
    }

    #[test]
    fn get_cell_negative_row_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(dir.path());
        let inputs = GetCellInputs {
            row_index: "-1".into(),
            ..get_cell_inputs(&path)
        };
        let err = get_cell(&inputs).unwrap_err();
        assert!(err.to_string().starts_with("The rowIndex input is not valid."));
    }

    #[test]
    fn modify_cell_updates_rows_and_drops_formula() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(dir.path());
        let inputs = ModifyCellInputs {
            target: target(&path),
            row_index: "2:3".into(),
            column_index: "2".into(),
            new_value: "5".into(),
            column_delimiter: ",".into(),
        };
        let result = modify_cell(&inputs).unwrap();
        assert!(result.is_success());
        assert_eq!(result.return_result(), "2");

        let wb = Workbook::open(&path).unwrap();
        let cell = wb.sheet("Sheet1").unwrap().cell(3, 2).unwrap();
        assert_eq!(cell.value, CellValue::Number(5.0));
        assert!(cell.formula.is_none());
    }

    #[test]
    fn modify_cell_stores_date_text_as_serial() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(dir.path());
        let inputs = ModifyCellInputs {
            target: target(&path),
            row_index: "1".into(),
            column_index: "0,1".into(),
            new_value: "2021/03/05,03/06/2021".into(),
            column_delimiter: ",".into(),
        };
        assert!(modify_cell(&inputs).unwrap().is_success());

        let wb = Workbook::open(&path).unwrap();
        let sheet = wb.sheet("Sheet1").unwrap();
        assert_eq!(
            sheet.cell(1, 0).map(|c| &c.value),
            Some(&CellValue::Date(44_260.0))
        );
        assert_eq!(
            sheet.cell(1, 1).map(|c| &c.value),
            Some(&CellValue::Date(44_261.0))
        );
    }

    #[test]
    fn modify_cell_value_count_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(dir.path());
        let inputs = ModifyCellInputs {
            target: target(&path),
            row_index: "1".into(),
            column_index: "0,1".into(),
            new_value: "only-one".into(),
            column_delimiter: ",".into(),
        };
        let err = modify_cell(&inputs).unwrap_err();
        assert!(err.to_string().ends_with("which is 2."));
    }

    #[test]
    fn modify_cell_merged_cell_is_incomplete() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("merged.xlsx");
        let mut wb = Workbook::new(&path, FileFormat::Xlsx);
        let sheet = wb.add_sheet("Sheet1").unwrap();
        sheet.set_value(0, 0, CellValue::Text("a".into()));
        sheet.set_value(1, 0, CellValue::Text("b".into()));
        sheet.set_value(1, 1, CellValue::Text("c".into()));
        sheet.add_merged_range(MergedRange {
            first_row: 0,
            first_col: 0,
            last_row: 0,
            last_col: 1,
        });
        wb.save().unwrap();

        let inputs = ModifyCellInputs {
            target: target(&path),
            row_index: "0".into(),
            column_index: "1".into(),
            new_value: "x".into(),
            column_delimiter: ",".into(),
        };
        let result = modify_cell(&inputs).unwrap();
        assert!(!result.is_success());
        assert_eq!(result.return_result(), "0");
    }

    #[test]
    fn delete_cell_counts_existing_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(dir.path());
        let inputs = DeleteCellInputs {
            target: target(&path),
            row_index: "1:2".into(),
            column_index: "1".into(),
        };
        let result = delete_cell(&inputs).unwrap();
        assert_eq!(result.return_result(), "2");

        let wb = Workbook::open(&path).unwrap();
        let sheet = wb.sheet("Sheet1").unwrap();
        assert!(sheet.cell(1, 1).is_none());
        assert!(sheet.cell(2, 1).is_none());
        assert!(sheet.cell(3, 1).is_some());
    }

    #[test]
    fn delete_cell_out_of_range_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(dir.path());
        let inputs = DeleteCellInputs {
            target: target(&path),
            row_index: "40".into(),
            column_index: "1".into(),
        };
        assert_eq!(delete_cell(&inputs).unwrap().return_result(), "0");
    }

    fn add_inputs(path: &Path) -> AddDataInputs {
        AddDataInputs {
            target: target(path),
            row_delimiter: "|".into(),
            column_delimiter: ",".into(),
            ..AddDataInputs::default()
        }
    }

    #[test]
    fn add_data_appends_after_last_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(dir.path());
        let inputs = AddDataInputs {
            row_data: "kiwi,4,0.5|fig,1,3".into(),
            ..add_inputs(&path)
        };
        let result = add_excel_data(&inputs).unwrap();
        assert_eq!(result.return_result(), "2");

        let wb = Workbook::open(&path).unwrap();
        let sheet = wb.sheet("Sheet1").unwrap();
        assert_eq!(
            sheet.cell(4, 0).map(|c| &c.value),
            Some(&CellValue::Text("kiwi".into()))
        );
        assert_eq!(
            sheet.cell(5, 2).map(|c| &c.value),
            Some(&CellValue::Number(3.0))
        );
    }

    #[test]
    fn add_data_with_header_into_empty_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(dir.path());
        let inputs = AddDataInputs {
            target: WorkbookTarget {
                worksheet_name: "Other".into(),
                ..target(&path)
            },
            header_data: "id, label".into(),
            row_data: "1,one|2,two".into(),
            ..add_inputs(&path)
        };
        add_excel_data(&inputs).unwrap();

        let wb = Workbook::open(&path).unwrap();
        let sheet = wb.sheet("Other").unwrap();
        assert_eq!(
            sheet.cell(0, 1).map(|c| &c.value),
            Some(&CellValue::Text("label".into()))
        );
        assert_eq!(
            sheet.cell(2, 1).map(|c| &c.value),
            Some(&CellValue::Text("two".into()))
        );
    }

    #[test]
    fn add_data_inserts_and_shifts() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(dir.path());
        let inputs = AddDataInputs {
            row_data: "fig,1,3".into(),
            row_index: "1".into(),
            ..add_inputs(&path)
        };
        add_excel_data(&inputs).unwrap();

        let wb = Workbook::open(&path).unwrap();
        let sheet = wb.sheet("Sheet1").unwrap();
        assert_eq!(
            sheet.cell(1, 0).map(|c| &c.value),
            Some(&CellValue::Text("fig".into()))
        );
        assert_eq!(
            sheet.cell(2, 0).map(|c| &c.value),
            Some(&CellValue::Text("apple".into()))
        );
        assert_eq!(sheet.last_row_num(), 4);
    }

    #[test]
    fn add_data_requires_row_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(dir.path());
        let err = add_excel_data(&add_inputs(&path)).unwrap_err();
        assert_eq!(err.to_string(), ROW_DATA_REQD_MSG);
    }

    #[test]
    fn add_data_column_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(dir.path());
        let inputs = AddDataInputs {
            row_data: "a,b|c".into(),
            ..add_inputs(&path)
        };
        let err = add_excel_data(&inputs).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Column index list size doesn't match rowData column count."
        );
    }

    #[test]
    fn new_document_default_sheets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.xlsx");
        let inputs = NewDocumentInputs {
            excel_file_name: path.display().to_string(),
            worksheet_names: String::new(),
            delimiter: ",".into(),
        };
        let result = new_excel_document(&inputs).unwrap();
        assert!(result.return_result().ends_with("fresh.xlsx created successfully"));
        let wb = Workbook::open(&path).unwrap();
        assert_eq!(wb.sheet_names(), vec!["Sheet1", "Sheet2", "Sheet3"]);
    }

    #[test]
    fn new_document_rejects_bad_names() {
        let dir = tempfile::tempdir().unwrap();
        let bad_ext = NewDocumentInputs {
            excel_file_name: dir.path().join("x.csv").display().to_string(),
            worksheet_names: String::new(),
            delimiter: ",".into(),
        };
        assert_eq!(
            new_excel_document(&bad_ext).unwrap_err().to_string(),
            BAD_CREATE_EXCEL_FILE_MSG
        );

        let no_stem = NewDocumentInputs {
            excel_file_name: dir.path().join(".xlsx").display().to_string(),
            ..bad_ext.clone()
        };
        assert_eq!(
            new_excel_document(&no_stem).unwrap_err().to_string(),
            "Excel file name cannot be empty."
        );

        let only_delims = NewDocumentInputs {
            excel_file_name: dir.path().join("a.xlsx").display().to_string(),
            worksheet_names: ",,".into(),
            ..bad_ext.clone()
        };
        assert_eq!(
            new_excel_document(&only_delims).unwrap_err().to_string(),
            EXCEPTION_WORKSHEET_NAME_EMPTY
        );

        let duplicate = NewDocumentInputs {
            excel_file_name: dir.path().join("b.xlsx").display().to_string(),
            worksheet_names: "A,a".into(),
            ..bad_ext
        };
        assert!(new_excel_document(&duplicate).is_err());
    }

    fn query(path: &Path, column: u32, operator: &str, value: &str) -> RowQueryInputs {
        RowQueryInputs {
            target: target(path),
            has_header: true,
            first_row_index: 0,
            column_index_to_query: column,
            operator: operator.into(),
            value: value.into(),
        }
    }

    #[test]
    fn row_query_numeric() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(dir.path());
        let result = get_row_index_by_condition(&query(&path, 1, ">", "5")).unwrap();
        assert_eq!(result.return_result(), "2,3");
        assert_eq!(result.get(ROWS_COUNT), Some("2"));
    }

    #[test]
    fn row_query_uses_cached_formula_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(dir.path());
        let result = get_row_index_by_condition(&query(&path, 2, ">=", "20")).unwrap();
        assert_eq!(result.return_result(), "3");
    }

    #[test]
    fn row_query_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(dir.path());
        let result = get_row_index_by_condition(&query(&path, 0, "==", "pear")).unwrap();
        assert_eq!(result.return_result(), "2");
        let result = get_row_index_by_condition(&query(&path, 0, "!=", "pear")).unwrap();
        assert_eq!(result.return_result(), "1,3");
    }

    /// Sheet1 with a header row and one column per value kind:
    /// ```text
    /// label | day        | at    | share
    /// a     | 2021/03/05 | 06:00 | 50%
    /// (a)   | 2021/03/06 | 18:00 | 25%
    /// z     | 7          | text  | 0.5
    /// ```
    /// `label` rows 1 and 2 are merged.
    fn typed_fixture(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("typed.xlsx");
        let mut wb = Workbook::new(&path, FileFormat::Xlsx);
        let sheet = wb.add_sheet("Sheet1").unwrap();
        for (col, name) in ["label", "day", "at", "share"].iter().enumerate() {
            sheet.set_value(0, u32::try_from(col).unwrap(), CellValue::Text((*name).into()));
        }
        sheet.set_value(1, 0, CellValue::Text("a".into()));
        sheet.set_value(3, 0, CellValue::Text("z".into()));
        sheet.add_merged_range(MergedRange {
            first_row: 1,
            first_col: 0,
            last_row: 2,
            last_col: 0,
        });
        sheet.set_value(1, 1, CellValue::Date(44_260.0));
        sheet.set_value(2, 1, CellValue::Date(44_261.0));
        sheet.set_value(3, 1, CellValue::Number(7.0));
        sheet.set_value(1, 2, CellValue::Date(0.25));
        sheet.set_value(2, 2, CellValue::Date(0.75));
        sheet.set_value(3, 2, CellValue::Text("text".into()));
        sheet.set_value(1, 3, CellValue::Number(0.5));
        sheet.set_value(2, 3, CellValue::Number(0.25));
        sheet.set_value(3, 3, CellValue::Number(0.5));
        wb.save().unwrap();
        path
    }

    #[test]
    fn row_query_skips_merged_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = typed_fixture(dir.path());
        let result = get_row_index_by_condition(&query(&path, 0, "!=", "x")).unwrap();
        assert_eq!(result.return_result(), "1,3");
        assert_eq!(result.get(ROWS_COUNT), Some("2"));
    }

    #[test]
    fn row_query_dates() {
        let dir = tempfile::tempdir().unwrap();
        let path = typed_fixture(dir.path());
        let result = get_row_index_by_condition(&query(&path, 1, "==", "2021/03/05")).unwrap();
        assert_eq!(result.return_result(), "1");
        let result = get_row_index_by_condition(&query(&path, 1, ">", "2021/03/05")).unwrap();
        assert_eq!(result.return_result(), "2");
        // The number in row 3 is a different kind, so it only matches `!=`.
        let result = get_row_index_by_condition(&query(&path, 1, "!=", "2021/03/05")).unwrap();
        assert_eq!(result.return_result(), "2,3");
        let result =
            get_row_index_by_condition(&query(&path, 1, "<", "2021/03/06 12:00")).unwrap();
        assert_eq!(result.return_result(), "1,2");
    }

    #[test]
    fn row_query_times() {
        let dir = tempfile::tempdir().unwrap();
        let path = typed_fixture(dir.path());
        let result = get_row_index_by_condition(&query(&path, 2, "<", "12:00")).unwrap();
        assert_eq!(result.return_result(), "1");
        let result = get_row_index_by_condition(&query(&path, 2, ">=", "06:00:00")).unwrap();
        assert_eq!(result.return_result(), "1,2");
    }

    #[test]
    fn row_query_percentages() {
        let dir = tempfile::tempdir().unwrap();
        let path = typed_fixture(dir.path());
        let result = get_row_index_by_condition(&query(&path, 3, "==", "50%")).unwrap();
        assert_eq!(result.return_result(), "1,3");
        let result = get_row_index_by_condition(&query(&path, 3, "<", "30%")).unwrap();
        assert_eq!(result.return_result(), "2");
    }

    #[test]
    fn row_query_no_match() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(dir.path());
        let result = get_row_index_by_condition(&query(&path, 0, "==", "grape")).unwrap();
        assert_eq!(result.return_result(), "");
        assert_eq!(result.get(ROWS_COUNT), Some("0"));
    }

    #[test]
    fn row_query_rejects_unknown_operator() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(dir.path());
        assert!(get_row_index_by_condition(&query(&path, 0, "~", "x")).is_err());
    }
}
