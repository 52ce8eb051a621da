use actionpack_action::{Action, ActionError, run_blocking};
use actionpack_core::strings::to_boolean_lenient;
use actionpack_core::{ActionSpec, InputSpec, Inputs, ResultMap, Validation};

use crate::condition::Operator;
use crate::operations::{
    self, AddDataInputs, COLUMNS_COUNT, DeleteCellInputs, GetCellInputs, HEADER, ModifyCellInputs,
    NewDocumentInputs, ROWS_COUNT, RowQueryInputs, WorkbookTarget,
};

pub const EXCEL_FILE_NAME: &str = "excelFileName";
pub const WORKSHEET_NAME: &str = "worksheetName";
pub const WORKSHEET_NAMES: &str = "worksheetNames";
pub const DELIMITER: &str = "delimiter";
pub const HAS_HEADER: &str = "hasHeader";
pub const FIRST_ROW_INDEX: &str = "firstRowIndex";
pub const ROW_INDEX: &str = "rowIndex";
pub const COLUMN_INDEX: &str = "columnIndex";
pub const ROW_DELIMITER: &str = "rowDelimiter";
pub const COLUMN_DELIMITER: &str = "columnDelimiter";
pub const NEW_VALUE: &str = "newValue";
pub const HEADER_DATA: &str = "headerData";
pub const ROW_DATA: &str = "rowData";
pub const OVERWRITE_DATA: &str = "overwriteData";
pub const COLUMN_INDEX_TO_QUERY: &str = "columnIndextoQuery";
pub const OPERATOR: &str = "operator";
pub const VALUE: &str = "value";

pub const DEFAULT_WORKSHEET: &str = "Sheet1";
pub const DEFAULT_ROW_DELIMITER: &str = "|";
pub const DEFAULT_COLUMN_DELIMITER: &str = ",";
pub const DEFAULT_HAS_HEADER: &str = "yes";
pub const DEFAULT_FIRST_ROW_INDEX: &str = "0";
pub const DEFAULT_OVERWRITE: &str = "false";

const YES_NO: &[&str] = &["yes", "no"];

fn file_input() -> InputSpec {
    InputSpec::new(EXCEL_FILE_NAME)
        .required()
        .describe("Path of the workbook (xls, xlsx or xlsm).")
}

fn worksheet_input() -> InputSpec {
    InputSpec::new(WORKSHEET_NAME)
        .describe("Name of the worksheet.")
        .default_value(DEFAULT_WORKSHEET)
}

fn index_inputs(spec: ActionSpec) -> ActionSpec {
    spec.input(
        InputSpec::new(ROW_INDEX)
            .describe("Row indexes such as 0,2,4:7. Defaults to every row."),
    )
    .input(
        InputSpec::new(COLUMN_INDEX)
            .describe("Column indexes such as 0,2,4:7. Defaults to every column."),
    )
}

fn target(inputs: &Inputs) -> WorkbookTarget {
    WorkbookTarget {
        excel_file_name: inputs.get(EXCEL_FILE_NAME).trim().to_owned(),
        worksheet_name: inputs.get_or(WORKSHEET_NAME, DEFAULT_WORKSHEET),
    }
}

fn parse_u32(value: &str) -> u32 {
    value.trim().parse().unwrap_or(0)
}

fn header_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("yes")
}

/// Read cell values from a worksheet.
pub struct GetCell {
    spec: ActionSpec,
}

impl GetCell {
    pub fn new() -> Self {
        let spec = ActionSpec::new("Get Cell", "Reads cell values from a worksheet.")
            .input(file_input())
            .input(worksheet_input())
            .input(
                InputSpec::new(HAS_HEADER)
                    .describe("yes if the first row is a header.")
                    .default_value(DEFAULT_HAS_HEADER),
            )
            .input(
                InputSpec::new(FIRST_ROW_INDEX)
                    .describe("Index of the first row, header included.")
                    .default_value(DEFAULT_FIRST_ROW_INDEX),
            );
        let spec = index_inputs(spec)
            .input(InputSpec::new(ROW_DELIMITER).default_value(DEFAULT_ROW_DELIMITER))
            .input(InputSpec::new(COLUMN_DELIMITER).default_value(DEFAULT_COLUMN_DELIMITER))
            .output(HEADER, "The header row, when hasHeader is yes.")
            .output(ROWS_COUNT, "Number of rows read.")
            .output(COLUMNS_COUNT, "Number of columns read.");
        Self { spec }
    }

    fn resolve(inputs: &Inputs) -> Result<GetCellInputs, ActionError> {
        let has_header = inputs.get_or(HAS_HEADER, DEFAULT_HAS_HEADER);
        let first_row = inputs.get_or(FIRST_ROW_INDEX, DEFAULT_FIRST_ROW_INDEX);
        Validation::new()
            .required(EXCEL_FILE_NAME, inputs.get(EXCEL_FILE_NAME))
            .one_of(HAS_HEADER, has_header.trim(), YES_NO)
            .non_negative_integer(FIRST_ROW_INDEX, &first_row)
            .finish()?;
        Ok(GetCellInputs {
            target: target(inputs),
            has_header: header_flag(&has_header),
            first_row_index: parse_u32(&first_row),
            row_index: inputs.get(ROW_INDEX).to_owned(),
            column_index: inputs.get(COLUMN_INDEX).to_owned(),
            row_delimiter: inputs.get_or(ROW_DELIMITER, DEFAULT_ROW_DELIMITER),
            column_delimiter: inputs.get_or(COLUMN_DELIMITER, DEFAULT_COLUMN_DELIMITER),
        })
    }
}

impl Default for GetCell {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for GetCell {
    fn spec(&self) -> &ActionSpec {
        &self.spec
    }

    async fn execute(&self, inputs: &Inputs) -> Result<ResultMap, ActionError> {
        let resolved = Self::resolve(inputs)?;
        run_blocking(move || Ok(operations::get_cell(&resolved)?)).await
    }
}

/// Write a value into selected cells.
pub struct ModifyCell {
    spec: ActionSpec,
}

impl ModifyCell {
    pub fn new() -> Self {
        let spec = ActionSpec::new("Modify Cell", "Writes values into selected cells.")
            .input(file_input())
            .input(worksheet_input());
        let spec = index_inputs(spec)
            .input(
                InputSpec::new(NEW_VALUE)
                    .required()
                    .describe("Values to write, one per selected column."),
            )
            .input(InputSpec::new(COLUMN_DELIMITER).default_value(DEFAULT_COLUMN_DELIMITER));
        Self { spec }
    }

    fn resolve(inputs: &Inputs) -> Result<ModifyCellInputs, ActionError> {
        Validation::new()
            .required(EXCEL_FILE_NAME, inputs.get(EXCEL_FILE_NAME))
            .required(NEW_VALUE, inputs.get(NEW_VALUE))
            .finish()?;
        Ok(ModifyCellInputs {
            target: target(inputs),
            row_index: inputs.get(ROW_INDEX).to_owned(),
            column_index: inputs.get(COLUMN_INDEX).to_owned(),
            new_value: inputs.get(NEW_VALUE).to_owned(),
            column_delimiter: inputs.get_or(COLUMN_DELIMITER, DEFAULT_COLUMN_DELIMITER),
        })
    }
}

impl Default for ModifyCell {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for ModifyCell {
    fn spec(&self) -> &ActionSpec {
        &self.spec
    }

    async fn execute(&self, inputs: &Inputs) -> Result<ResultMap, ActionError> {
        let resolved = Self::resolve(inputs)?;
        run_blocking(move || Ok(operations::modify_cell(&resolved)?)).await
    }
}

/// Remove selected cells.
pub struct DeleteCell {
    spec: ActionSpec,
}

impl DeleteCell {
    pub fn new() -> Self {
        let spec = ActionSpec::new("Delete Cell", "Removes selected cells from a worksheet.")
            .input(file_input())
            .input(worksheet_input());
        Self {
            spec: index_inputs(spec),
        }
    }
}

impl Default for DeleteCell {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for DeleteCell {
    fn spec(&self) -> &ActionSpec {
        &self.spec
    }

    async fn execute(&self, inputs: &Inputs) -> Result<ResultMap, ActionError> {
        Validation::new()
            .required(EXCEL_FILE_NAME, inputs.get(EXCEL_FILE_NAME))
            .finish()?;
        let resolved = DeleteCellInputs {
            target: target(inputs),
            row_index: inputs.get(ROW_INDEX).to_owned(),
            column_index: inputs.get(COLUMN_INDEX).to_owned(),
        };
        run_blocking(move || Ok(operations::delete_cell(&resolved)?)).await
    }
}

/// Append or insert delimited rows.
pub struct AddExcelData {
    spec: ActionSpec,
}

impl AddExcelData {
    pub fn new() -> Self {
        let spec = ActionSpec::new("Add Excel Data", "Adds delimited rows to a worksheet.")
            .input(file_input())
            .input(worksheet_input())
            .input(InputSpec::new(HEADER_DATA).describe("Header fields written to row 0."))
            .input(
                InputSpec::new(ROW_DATA)
                    .required()
                    .describe("Rows separated by rowDelimiter, fields by columnDelimiter."),
            );
        let spec = index_inputs(spec)
            .input(InputSpec::new(ROW_DELIMITER).default_value(DEFAULT_ROW_DELIMITER))
            .input(InputSpec::new(COLUMN_DELIMITER).default_value(DEFAULT_COLUMN_DELIMITER))
            .input(
                InputSpec::new(OVERWRITE_DATA)
                    .describe("true to overwrite rows instead of inserting.")
                    .default_value(DEFAULT_OVERWRITE),
            );
        Self { spec }
    }

    fn resolve(inputs: &Inputs) -> Result<AddDataInputs, ActionError> {
        let overwrite = inputs.get_or(OVERWRITE_DATA, DEFAULT_OVERWRITE);
        Validation::new()
            .required(EXCEL_FILE_NAME, inputs.get(EXCEL_FILE_NAME))
            .required(ROW_DATA, inputs.get(ROW_DATA))
            .boolean(OVERWRITE_DATA, overwrite.trim())
            .finish()?;
        Ok(AddDataInputs {
            target: target(inputs),
            header_data: inputs.get(HEADER_DATA).to_owned(),
            row_data: inputs.get(ROW_DATA).to_owned(),
            row_index: inputs.get(ROW_INDEX).to_owned(),
            column_index: inputs.get(COLUMN_INDEX).to_owned(),
            row_delimiter: inputs.get_or(ROW_DELIMITER, DEFAULT_ROW_DELIMITER),
            column_delimiter: inputs.get_or(COLUMN_DELIMITER, DEFAULT_COLUMN_DELIMITER),
            overwrite_data: to_boolean_lenient(&overwrite),
        })
    }
}

impl Default for AddExcelData {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for AddExcelData {
    fn spec(&self) -> &ActionSpec {
        &self.spec
    }

    async fn execute(&self, inputs: &Inputs) -> Result<ResultMap, ActionError> {
        let resolved = Self::resolve(inputs)?;
        run_blocking(move || Ok(operations::add_excel_data(&resolved)?)).await
    }
}

/// Create a workbook with named sheets.
pub struct NewExcelDocument {
    spec: ActionSpec,
}

impl NewExcelDocument {
    pub fn new() -> Self {
        let spec = ActionSpec::new("New Excel Document", "Creates a new xlsx workbook.")
            .input(
                InputSpec::new(EXCEL_FILE_NAME)
                    .required()
                    .describe("Path of the workbook to create."),
            )
            .input(
                InputSpec::new(WORKSHEET_NAMES)
                    .describe("Sheet names. Defaults to Sheet1, Sheet2 and Sheet3."),
            )
            .input(
                InputSpec::new(DELIMITER)
                    .describe("Characters separating the sheet names.")
                    .default_value(DEFAULT_COLUMN_DELIMITER),
            );
        Self { spec }
    }
}

impl Default for NewExcelDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for NewExcelDocument {
    fn spec(&self) -> &ActionSpec {
        &self.spec
    }

    async fn execute(&self, inputs: &Inputs) -> Result<ResultMap, ActionError> {
        Validation::new()
            .required(EXCEL_FILE_NAME, inputs.get(EXCEL_FILE_NAME))
            .finish()?;
        let resolved = NewDocumentInputs {
            excel_file_name: inputs.get(EXCEL_FILE_NAME).to_owned(),
            worksheet_names: inputs.get(WORKSHEET_NAMES).to_owned(),
            delimiter: inputs.get_or(DELIMITER, DEFAULT_COLUMN_DELIMITER),
        };
        run_blocking(move || Ok(operations::new_excel_document(&resolved)?)).await
    }
}

/// Find rows whose column satisfies a comparison.
pub struct GetRowIndexByCondition {
    spec: ActionSpec,
}

impl GetRowIndexByCondition {
    pub fn new() -> Self {
        let spec = ActionSpec::new(
            "Get Row Index By Condition",
            "Returns the indexes of rows whose column matches a condition.",
        )
        .input(file_input())
        .input(worksheet_input())
        .input(InputSpec::new(HAS_HEADER).default_value(DEFAULT_HAS_HEADER))
        .input(InputSpec::new(FIRST_ROW_INDEX).default_value(DEFAULT_FIRST_ROW_INDEX))
        .input(
            InputSpec::new(COLUMN_INDEX_TO_QUERY)
                .required()
                .describe("Index of the column to compare."),
        )
        .input(
            InputSpec::new(OPERATOR)
                .required()
                .describe("One of ==, !=, <, >, <=, >=."),
        )
        .input(InputSpec::new(VALUE).describe("Value to compare against."))
        .output(ROWS_COUNT, "Number of matching rows.");
        Self { spec }
    }

    fn resolve(inputs: &Inputs) -> Result<RowQueryInputs, ActionError> {
        let has_header = inputs.get_or(HAS_HEADER, DEFAULT_HAS_HEADER);
        let first_row = inputs.get_or(FIRST_ROW_INDEX, DEFAULT_FIRST_ROW_INDEX);
        let column = inputs.get(COLUMN_INDEX_TO_QUERY);
        let operator = inputs.get(OPERATOR).trim();
        Validation::new()
            .required(EXCEL_FILE_NAME, inputs.get(EXCEL_FILE_NAME))
            .one_of(HAS_HEADER, has_header.trim(), YES_NO)
            .non_negative_integer(FIRST_ROW_INDEX, &first_row)
            .non_negative_integer(COLUMN_INDEX_TO_QUERY, column)
            .one_of(OPERATOR, operator, Operator::VALUES)
            .finish()?;
        Ok(RowQueryInputs {
            target: target(inputs),
            has_header: header_flag(&has_header),
            first_row_index: parse_u32(&first_row),
            column_index_to_query: parse_u32(column),
            operator: operator.to_owned(),
            value: inputs.get(VALUE).to_owned(),
        })
    }
}

impl Default for GetRowIndexByCondition {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for GetRowIndexByCondition {
    fn spec(&self) -> &ActionSpec {
        &self.spec
    }

    async fn execute(&self, inputs: &Inputs) -> Result<ResultMap, ActionError> {
        let resolved = Self::resolve(inputs)?;
        run_blocking(move || Ok(operations::get_row_index_by_condition(&resolved)?)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn new_document_then_add_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("report.xlsx").display().to_string();

        let created = NewExcelDocument::new()
            .execute(&Inputs::new().with(EXCEL_FILE_NAME, &file).with(WORKSHEET_NAMES, "Data"))
            .await
            .unwrap();
        assert!(created.is_success());

        let added = AddExcelData::new()
            .execute(
                &Inputs::new()
                    .with(EXCEL_FILE_NAME, &file)
                    .with(WORKSHEET_NAME, "Data")
                    .with(HEADER_DATA, "host,cpu")
                    .with(ROW_DATA, "web-1,0.456|web-2,12"),
            )
            .await
            .unwrap();
        assert_eq!(added.return_result(), "2");

        let read = GetCell::new()
            .execute(
                &Inputs::new()
                    .with(EXCEL_FILE_NAME, &file)
                    .with(WORKSHEET_NAME, "Data"),
            )
            .await
            .unwrap();
        assert_eq!(read.return_result(), "web-1,0.46|web-2,12");
        assert_eq!(read.get(HEADER), Some("host,cpu"));

        let matched = GetRowIndexByCondition::new()
            .execute(
                &Inputs::new()
                    .with(EXCEL_FILE_NAME, &file)
                    .with(WORKSHEET_NAME, "Data")
                    .with(COLUMN_INDEX_TO_QUERY, "1")
                    .with(OPERATOR, "<")
                    .with(VALUE, "50%"),
            )
            .await
            .unwrap();
        assert_eq!(matched.return_result(), "1");
    }

    #[tokio::test]
    async fn invalid_inputs_are_reported_together() {
        let err = GetRowIndexByCondition::new()
            .execute(
                &Inputs::new()
                    .with(HAS_HEADER, "maybe")
                    .with(COLUMN_INDEX_TO_QUERY, "-2")
                    .with(OPERATOR, "=~"),
            )
            .await
            .unwrap_err();
        let ActionError::InvalidInputs(messages) = err else {
            panic!("expected invalid inputs");
        };
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0], "The excelFileName input is required.");
    }

    #[tokio::test]
    async fn overwrite_must_be_boolean() {
        let err = AddExcelData::new()
            .execute(
                &Inputs::new()
                    .with(EXCEL_FILE_NAME, "a.xlsx")
                    .with(ROW_DATA, "1")
                    .with(OVERWRITE_DATA, "sometimes"),
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("overwriteData"));
    }

    #[tokio::test]
    async fn missing_workbook_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("absent.xlsx").display().to_string();
        let err = DeleteCell::new()
            .execute(&Inputs::new().with(EXCEL_FILE_NAME, file))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::ExecutionFailed(_)));
    }

    #[test]
    fn specs_declare_defaults() {
        let spec = GetCell::new();
        let defaults: Vec<_> = spec.spec.defaults().collect();
        assert!(defaults.contains(&(HAS_HEADER, "yes")));
        assert!(defaults.contains(&(ROW_DELIMITER, "|")));
        assert!(ModifyCell::new().spec.find_input(NEW_VALUE).unwrap().required);
    }
}
