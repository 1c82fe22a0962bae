use crate::tracker::model::{Priority, TestCaseRecord, TestCaseStatus, Tester};
use crate::upload::model::{ImportTarget, UploadRow, UNASSIGNED};
use chrono::Utc;

fn find_tester(testers: &[Tester], name: Option<&str>) -> Option<i64> {
    let name = name.filter(|n| *n != UNASSIGNED)?;
    let wanted = name.to_lowercase();
    testers
        .iter()
        .find(|tester| tester.name.to_lowercase() == wanted)
        .map(|tester| tester.id)
}

/// Turns a parsed row into a record for the target project.
/// Unknown or invalid values fall back to defaults; this never fails.
pub fn map_row(row: UploadRow, testers: &[Tester], target: &ImportTarget) -> TestCaseRecord {
    let tester_id = find_tester(testers, row.assigned_tester.as_deref())
        .unwrap_or(target.default_tester_id);
    let manual_tester_id = find_tester(testers, row.manual_tester.as_deref());
    let priority = row
        .priority
        .as_deref()
        .and_then(Priority::from_label)
        .unwrap_or_default();
    let status = row
        .status
        .as_deref()
        .and_then(TestCaseStatus::from_label)
        .unwrap_or_default();
    let now = Utc::now();

    TestCaseRecord {
        id: None,
        title: row.title.unwrap_or_default(),
        description: row.description.unwrap_or_default(),
        project_id: target.project_id,
        tester_id,
        priority,
        status,
        test_case_type: row.test_case_type,
        tool_type: row.tool_type,
        manual_tester_id,
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn testers() -> Vec<Tester> {
        vec![
            Tester { id: 11, name: "Ada Lovelace".to_string() },
            Tester { id: 12, name: "Grace Hopper".to_string() },
        ]
    }

    fn target() -> ImportTarget {
        ImportTarget::builder().project_id(5).default_tester_id(99).build()
    }

    fn row() -> UploadRow {
        UploadRow {
            title: Some("Login with valid credentials".to_string()),
            description: Some("Verify login".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn tester_names_match_case_insensitively() {
        let record = map_row(
            UploadRow {
                assigned_tester: Some("grace HOPPER".to_string()),
                manual_tester: Some("ADA lovelace".to_string()),
                ..row()
            },
            &testers(),
            &target(),
        );
        assert_eq!(record.tester_id, 12);
        assert_eq!(record.manual_tester_id, Some(11));
        assert_eq!(record.project_id, 5);
    }

    #[test]
    fn unassigned_falls_back_to_default_tester() {
        let record = map_row(
            UploadRow {
                assigned_tester: Some("Unassigned".to_string()),
                manual_tester: Some("Unassigned".to_string()),
                ..row()
            },
            &testers(),
            &target(),
        );
        assert_eq!(record.tester_id, 99);
        assert_eq!(record.manual_tester_id, None);
    }

    #[test]
    fn unknown_tester_falls_back_to_default() {
        let record = map_row(
            UploadRow {
                assigned_tester: Some("Alan Turing".to_string()),
                manual_tester: Some("Alan Turing".to_string()),
                ..row()
            },
            &testers(),
            &target(),
        );
        assert_eq!(record.tester_id, 99);
        assert_eq!(record.manual_tester_id, None);
    }

    #[test]
    fn invalid_priority_and_status_get_defaults() {
        let record = map_row(
            UploadRow {
                priority: Some("Urgent".to_string()),
                status: Some("Blocked".to_string()),
                ..row()
            },
            &testers(),
            &target(),
        );
        assert_eq!(record.priority, Priority::Medium);
        assert_eq!(record.status, TestCaseStatus::ReadyToAutomate);
    }

    #[test]
    fn allowed_values_and_free_text_pass_through() {
        let record = map_row(
            UploadRow {
                priority: Some("Low".to_string()),
                status: Some("Automated".to_string()),
                test_case_type: Some("API".to_string()),
                tool_type: Some("Postman".to_string()),
                ..row()
            },
            &testers(),
            &target(),
        );
        assert_eq!(record.priority, Priority::Low);
        assert_eq!(record.status, TestCaseStatus::Automated);
        assert_eq!(record.test_case_type.as_deref(), Some("API"));
        assert_eq!(record.tool_type.as_deref(), Some("Postman"));
        assert_eq!(record.id, None);
    }

    #[test]
    fn missing_cells_map_to_empty_values() {
        let record = map_row(UploadRow::default(), &[], &target());
        assert_eq!(record.title, "");
        assert_eq!(record.description, "");
        assert_eq!(record.tester_id, 99);
        assert_eq!(record.test_case_type, None);
    }
}
