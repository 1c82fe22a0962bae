use crate::upload::model::{
    UploadError, UploadRow, COLUMN_ASSIGNED_TESTER, COLUMN_DESCRIPTION, COLUMN_MANUAL_TESTER,
    COLUMN_PRIORITY, COLUMN_STATUS, COLUMN_TEST_CASE_TYPE, COLUMN_TITLE, COLUMN_TOOL_TYPE,
};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::collections::HashMap;
use std::io::Cursor;

/// Column positions resolved from the header row.
struct HeaderIndex {
    positions: HashMap<String, usize>,
}

impl HeaderIndex {
    fn from_cells(cells: &[Data]) -> Self {
        let mut positions = HashMap::new();
        for (position, cell) in cells.iter().enumerate() {
            if let Some(name) = cell_text(cell) {
                positions.entry(name.trim().to_string()).or_insert(position);
            }
        }
        Self { positions }
    }

    fn value(&self, cells: &[Data], column: &str) -> Option<String> {
        self.positions
            .get(column)
            .and_then(|position| cells.get(*position))
            .and_then(cell_text)
    }

    fn row(&self, cells: &[Data]) -> UploadRow {
        UploadRow {
            title: self.value(cells, COLUMN_TITLE),
            description: self.value(cells, COLUMN_DESCRIPTION),
            priority: self.value(cells, COLUMN_PRIORITY),
            status: self.value(cells, COLUMN_STATUS),
            assigned_tester: self.value(cells, COLUMN_ASSIGNED_TESTER),
            test_case_type: self.value(cells, COLUMN_TEST_CASE_TYPE),
            tool_type: self.value(cells, COLUMN_TOOL_TYPE),
            manual_tester: self.value(cells, COLUMN_MANUAL_TESTER),
        }
    }
}

/// Reads the first worksheet, using its first row as the header.
/// Lines with no content at all are skipped.
pub fn parse_workbook(data: &[u8]) -> Result<Vec<UploadRow>, UploadError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(data))
        .map_err(|e| UploadError::ParseFailure(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| UploadError::ParseFailure("workbook has no worksheet".to_string()))?
        .map_err(|e| UploadError::ParseFailure(e.to_string()))?;

    let mut lines = range.rows();
    let header = match lines.next() {
        Some(cells) => HeaderIndex::from_cells(cells),
        None => return Ok(vec![]),
    };

    Ok(lines
        .filter(|cells| cells.iter().any(|cell| cell_text(cell).is_some()))
        .map(|cells| header.row(cells))
        .collect())
}

fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty => return None,
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
