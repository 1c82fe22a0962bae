use crate::tracker::model::TestCaseRecord;
use crate::tracker::service::TrackerService;
use crate::upload::mapping::map_row;
use crate::upload::model::{
    display_row_number, ImportOutcome, ImportTarget, UploadError, UploadFile, ACCEPTED_MIME_TYPES,
    MAX_FILE_SIZE,
};
use crate::upload::parse::parse_workbook;
use std::sync::Arc;
use tracing::{info, warn};

const MIN_TITLE_LENGTH: usize = 5;
const MIN_DESCRIPTION_LENGTH: usize = 3;

pub struct BulkUploadCommand {
    pub file: UploadFile,
    pub target: ImportTarget,
}

/// Checks the declared type and the size of an upload without reading it.
pub fn accept_file(file: &UploadFile) -> Result<(), UploadError> {
    if !ACCEPTED_MIME_TYPES.contains(&file.content_type.as_str()) {
        return Err(UploadError::InvalidFileType(file.content_type.clone()));
    }
    if file.data.len() > MAX_FILE_SIZE {
        return Err(UploadError::FileTooLarge(file.data.len()));
    }
    Ok(())
}

/// Runs a whole import. Only file acceptance errors are returned as `Err`;
/// an unreadable workbook yields the single-error outcome.
pub async fn run_bulk_upload(
    tracker: Arc<dyn TrackerService>,
    command: BulkUploadCommand,
) -> Result<ImportOutcome, UploadError> {
    accept_file(&command.file)?;
    info!(
        "importing {} ({} bytes) into project {} of domain {:?}",
        command.file.file_name,
        command.file.data.len(),
        command.target.project_id,
        command.target.domain_id
    );

    let rows = match parse_workbook(&command.file.data) {
        Ok(rows) => rows,
        Err(error) => {
            warn!("could not parse {}: {}", command.file.file_name, error);
            return Ok(ImportOutcome::parse_failure());
        }
    };

    let testers = match tracker.list_testers().await {
        Ok(testers) => testers,
        Err(error) => {
            warn!("tester lookup failed, assigning the default tester: {}", error);
            vec![]
        }
    };

    let records = rows
        .into_iter()
        .map(|row| map_row(row, &testers, &command.target))
        .collect();
    let outcome = import_records(tracker.as_ref(), records).await;
    info!(
        "import into project {} finished: {} of {} created, {} failed",
        command.target.project_id, outcome.success_count, outcome.total_rows, outcome.error_count
    );
    Ok(outcome)
}

/// Validates, deduplicates and creates records one after another, in row order.
pub async fn import_records(tracker: &dyn TrackerService, records: Vec<TestCaseRecord>) -> ImportOutcome {
    let mut outcome = ImportOutcome::new(records.len());

    for (index, record) in records.iter().enumerate() {
        let row_number = display_row_number(index);

        if let Some(problem) = validate(record) {
            outcome.record_error(format!("Row {}: {}", row_number, problem));
            continue;
        }

        if is_duplicate(tracker, record).await {
            outcome.record_duplicate(format!(
                "Row {}: Test case \"{}\" already exists",
                row_number, record.title
            ));
            continue;
        }

        match tracker.create_test_case(record).await {
            Ok(_) => outcome.record_success(),
            Err(error) => {
                warn!("row {} was not created: {}", row_number, error);
                outcome.record_error(format!(
                    "Row {}: Failed to create test case - {}",
                    row_number, error
                ));
            }
        }
    }

    outcome.finish()
}

fn validate(record: &TestCaseRecord) -> Option<&'static str> {
    if record.title.trim().chars().count() < MIN_TITLE_LENGTH {
        return Some("Title is required and must be at least 5 characters long");
    }
    if record.description.trim().chars().count() < MIN_DESCRIPTION_LENGTH {
        return Some("Description is required and must be at least 3 characters long");
    }
    None
}

// Asks the tracker on every row; titles created earlier in the same batch are not remembered.
async fn is_duplicate(tracker: &dyn TrackerService, record: &TestCaseRecord) -> bool {
    match tracker.list_test_cases_in_project(record.project_id).await {
        Ok(existing) => {
            let wanted = record.title.to_lowercase();
            existing
                .iter()
                .any(|test_case| test_case.title.to_lowercase() == wanted)
        }
        Err(error) => {
            warn!("duplicate lookup for project {} failed: {}", record.project_id, error);
            false
        }
    }
}
