use actionpack_action::ActionError;
use thiserror::Error;

pub const BAD_EXCEL_FILE_MSG: &str =
    "File doesn't exist or doesn't have a valid format. Supported formats: xls, xlsx, xlsm.";
pub const BAD_CREATE_EXCEL_FILE_MSG: &str =
    "The excelFileName input is not valid. New documents must use the xlsx format.";
pub const EXCEPTION_WORKSHEET_NAME_EMPTY: &str = "Worksheet names cannot be empty.";
pub const ROW_DATA_REQD_MSG: &str = "The rowData input is required.";

/// Errors specific to the Excel pack.
///
/// These are internal errors that get converted into [`ActionError`] at the
/// public API boundary. Their messages are what the failure map reports.
#[derive(Debug, Error)]
pub enum ExcelError {
    /// The file name has no supported spreadsheet extension.
    #[error("{BAD_EXCEL_FILE_MSG}")]
    BadFile,

    /// The workbook could not be opened or parsed.
    #[error("Could not open {path}: {reason}")]
    Open { path: String, reason: String },

    #[error("Worksheet {0} does not exist.")]
    WorksheetNotFound(String),

    /// An index list entry is not an integer.
    #[error("The index value '{0}' is not a valid integer.")]
    InvalidIndex(String),

    /// The requested operation or its inputs are not valid for this sheet.
    #[error("{0}")]
    Operation(String),

    /// The workbook format can be read but not written.
    #[error("Writing {0} files is not supported. Use the xlsx format to modify workbooks.")]
    ReadOnlyFormat(String),

    /// The workbook could not be written.
    #[error("Could not write workbook: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),
}

impl From<ExcelError> for ActionError {
    fn from(err: ExcelError) -> Self {
        ActionError::ExecutionFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worksheet_not_found_message() {
        let err = ExcelError::WorksheetNotFound("Data".into());
        assert_eq!(err.to_string(), "Worksheet Data does not exist.");
    }

    #[test]
    fn converts_to_execution_failed() {
        let err: ActionError = ExcelError::BadFile.into();
        assert!(matches!(err, ActionError::ExecutionFailed(_)));
        assert_eq!(err.to_string(), BAD_EXCEL_FILE_MSG);
    }
}
