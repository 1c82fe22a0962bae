use crate::upload::model::{TEMPLATE_COLUMNS, UNASSIGNED};
use chrono::NaiveDate;
use regex::Regex;
use rust_xlsxwriter::{Workbook, XlsxError};
use std::sync::LazyLock;

pub const TEMPLATE_SHEET_NAME: &str = "Test Cases";

const COLUMN_WIDTHS: [f64; 8] = [30.0, 50.0, 12.0, 18.0, 20.0, 15.0, 15.0, 20.0];

const SAMPLE_ROWS: [[&str; 8]; 2] = [
    [
        "Login with valid credentials",
        "Verify user can login with valid username and password",
        "High",
        "Ready to Automate",
        UNASSIGNED,
        "UI",
        "Selenium",
        UNASSIGNED,
    ],
    [
        "Login with invalid credentials",
        "Verify system shows error message for invalid credentials",
        "Medium",
        "Ready to Automate",
        UNASSIGNED,
        "UI",
        "Selenium",
        UNASSIGNED,
    ],
];

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]").expect("valid pattern"));

/// Builds the import template: header row plus two sample rows.
pub fn build_template() -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(TEMPLATE_SHEET_NAME)?;

    for (col, (name, width)) in TEMPLATE_COLUMNS.iter().zip(COLUMN_WIDTHS).enumerate() {
        worksheet.write_string(0, col as u16, *name)?;
        worksheet.set_column_width(col as u16, width)?;
    }
    for (row, values) in SAMPLE_ROWS.iter().enumerate() {
        for (col, value) in values.iter().enumerate() {
            worksheet.write_string(row as u32 + 1, col as u16, *value)?;
        }
    }

    workbook.save_to_buffer()
}

fn sanitize(name: &str) -> String {
    NON_ALPHANUMERIC.replace_all(name, "_").into_owned()
}

pub fn template_file_name(domain: Option<&str>, project: Option<&str>, date: NaiveDate) -> String {
    let domain = domain.map(sanitize).unwrap_or_else(|| "Unknown_Domain".to_string());
    let project = project.map(sanitize).unwrap_or_else(|| "Project".to_string());
    format!(
        "TestCases_Template_{}_{}_{}.xlsx",
        domain,
        project,
        date.format("%Y-%m-%d")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::parse::parse_workbook;
    use calamine::{open_workbook_auto_from_rs, Reader};
    use std::io::Cursor;

    #[test]
    fn file_name_replaces_special_characters() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            template_file_name(Some("Retail & Banking"), Some("Mobile-App v2"), date),
            "TestCases_Template_Retail___Banking_Mobile_App_v2_2024-03-09.xlsx"
        );
    }

    #[test]
    fn file_name_falls_back_for_unknown_selection() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(
            template_file_name(None, None, date),
            "TestCases_Template_Unknown_Domain_Project_2025-12-31.xlsx"
        );
    }

    #[test]
    fn template_has_fixed_columns_and_samples() {
        let data = build_template().unwrap();

        let workbook = open_workbook_auto_from_rs(Cursor::new(data.as_slice())).unwrap();
        assert_eq!(workbook.sheet_names(), vec![TEMPLATE_SHEET_NAME.to_string()]);

        let rows = parse_workbook(&data).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].title.as_deref(), Some("Login with invalid credentials"));
        assert_eq!(rows[0].priority.as_deref(), Some("High"));
        assert_eq!(rows[0].assigned_tester.as_deref(), Some("Unassigned"));
        assert_eq!(rows[0].manual_tester.as_deref(), Some("Unassigned"));
        assert_eq!(rows[1].test_case_type.as_deref(), Some("UI"));
    }
}
