use bon::Builder;
use serde::{Deserialize, Serialize};

pub const XLSX_MIME_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const XLS_MIME_TYPE: &str = "application/vnd.ms-excel";
pub const ACCEPTED_MIME_TYPES: [&str; 2] = [XLSX_MIME_TYPE, XLS_MIME_TYPE];
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

pub const UNASSIGNED: &str = "Unassigned";
pub const PARSE_FAILURE_MESSAGE: &str =
    "Failed to process file. Please check the file format and try again.";

pub const COLUMN_TITLE: &str = "Test Case Title";
pub const COLUMN_DESCRIPTION: &str = "Description";
pub const COLUMN_PRIORITY: &str = "Priority";
pub const COLUMN_STATUS: &str = "Status";
pub const COLUMN_ASSIGNED_TESTER: &str = "Assigned Tester";
pub const COLUMN_TEST_CASE_TYPE: &str = "Test Case Type";
pub const COLUMN_TOOL_TYPE: &str = "Tool Type";
pub const COLUMN_MANUAL_TESTER: &str = "Manual Tester";

pub const TEMPLATE_COLUMNS: [&str; 8] = [
    COLUMN_TITLE,
    COLUMN_DESCRIPTION,
    COLUMN_PRIORITY,
    COLUMN_STATUS,
    COLUMN_ASSIGNED_TESTER,
    COLUMN_TEST_CASE_TYPE,
    COLUMN_TOOL_TYPE,
    COLUMN_MANUAL_TESTER,
];

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Please select a valid Excel file (.xlsx or .xls), got {0}")]
    InvalidFileType(String),
    #[error("File size should be less than 5MB, got {0} bytes")]
    FileTooLarge(usize),
    #[error("Failed to process file: {0}")]
    ParseFailure(String),
}

/// A file as received from the upload form.
#[derive(Clone, Debug)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Where imported rows land and who owns them when the sheet does not say.
#[derive(Clone, Debug, Builder)]
pub struct ImportTarget {
    pub project_id: i64,
    pub default_tester_id: i64,
    pub domain_id: Option<i64>,
}

/// One spreadsheet line below the header. Blank or missing cells are `None`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UploadRow {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub assigned_tester: Option<String>,
    pub test_case_type: Option<String>,
    pub tool_type: Option<String>,
    pub manual_tester: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub success: bool,
    pub total_rows: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub errors: Vec<String>,
    pub duplicates: Vec<String>,
}

impl ImportOutcome {
    pub fn new(total_rows: usize) -> Self {
        Self {
            success: true,
            total_rows,
            success_count: 0,
            error_count: 0,
            errors: vec![],
            duplicates: vec![],
        }
    }

    pub fn parse_failure() -> Self {
        Self {
            success: false,
            total_rows: 0,
            success_count: 0,
            error_count: 1,
            errors: vec![PARSE_FAILURE_MESSAGE.to_string()],
            duplicates: vec![],
        }
    }

    pub fn record_success(&mut self) {
        self.success_count += 1;
    }

    pub fn record_error(&mut self, message: String) {
        self.errors.push(message);
        self.error_count += 1;
    }

    /// Duplicates are listed apart from errors but still count as failures.
    pub fn record_duplicate(&mut self, message: String) {
        self.duplicates.push(message);
        self.error_count += 1;
    }

    pub fn finish(mut self) -> Self {
        self.success = self.error_count == 0;
        self
    }
}

/// Row number as shown in the spreadsheet, counting the header line.
pub fn display_row_number(index: usize) -> usize {
    index + 2
}
