use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Tester {
    pub id: i64,
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Domain {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Project {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub status: String,
}

impl Project {
    pub fn is_active(&self) -> bool {
        self.status == "Active"
    }
}

/// The slice of a stored test case needed for duplicate detection.
#[derive(Deserialize, Clone, Debug)]
pub struct ExistingTestCase {
    pub title: String,
}

/// What the tracker reports back after a create. Only the id is read and it may be absent.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct CreatedTestCase {
    #[serde(default)]
    pub id: Option<i64>,
}

impl CreatedTestCase {
    /// Any 2xx body counts as created; unreadable or empty bodies carry no id.
    pub fn from_body(body: &str) -> Self {
        if body.trim().is_empty() {
            return Self::default();
        }
        serde_json::from_str(body).unwrap_or_default()
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALLOWED: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// Exact match against the allowed labels.
    pub fn from_label(label: &str) -> Option<Priority> {
        Self::ALLOWED.into_iter().find(|p| p.as_str() == label)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TestCaseStatus {
    #[default]
    #[serde(rename = "Ready to Automate")]
    ReadyToAutomate,
    Automated,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl TestCaseStatus {
    pub const ALLOWED: [TestCaseStatus; 4] = [
        TestCaseStatus::ReadyToAutomate,
        TestCaseStatus::Automated,
        TestCaseStatus::InProgress,
        TestCaseStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TestCaseStatus::ReadyToAutomate => "Ready to Automate",
            TestCaseStatus::Automated => "Automated",
            TestCaseStatus::InProgress => "In Progress",
            TestCaseStatus::Completed => "Completed",
        }
    }

    pub fn from_label(label: &str) -> Option<TestCaseStatus> {
        Self::ALLOWED.into_iter().find(|s| s.as_str() == label)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Builder)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseRecord {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<i64>,
    pub title: String,
    pub description: String,
    pub project_id: i64,
    pub tester_id: i64,
    #[builder(default)]
    pub priority: Priority,
    #[builder(default)]
    pub status: TestCaseStatus,
    pub test_case_type: Option<String>,
    pub tool_type: Option<String>,
    pub manual_tester_id: Option<i64>,
    #[builder(default = Utc::now())]
    pub created_at: DateTime<Utc>,
    #[builder(default = Utc::now())]
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_match_exactly() {
        assert_eq!(Priority::from_label("High"), Some(Priority::High));
        assert_eq!(Priority::from_label("high"), None);
        assert_eq!(Priority::from_label("Urgent"), None);
        assert_eq!(TestCaseStatus::from_label("In Progress"), Some(TestCaseStatus::InProgress));
        assert_eq!(TestCaseStatus::from_label("Blocked"), None);
    }

    #[test]
    fn record_serializes_camel_case_without_id() {
        let record = TestCaseRecord::builder()
            .title("Login with valid credentials".to_string())
            .description("Verify login".to_string())
            .project_id(3)
            .tester_id(9)
            .status(TestCaseStatus::InProgress)
            .build();
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["projectId"], 3);
        assert_eq!(json["testerId"], 9);
        assert_eq!(json["priority"], "Medium");
        assert_eq!(json["status"], "In Progress");
        assert!(json["manualTesterId"].is_null());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn created_body_is_read_leniently() {
        assert_eq!(CreatedTestCase::from_body("").id, None);
        assert_eq!(
            CreatedTestCase::from_body(r#"{"id": 31, "createdAt": "2024-03-09T10:15:30"}"#).id,
            Some(31)
        );
        assert_eq!(CreatedTestCase::from_body("created").id, None);
    }

    #[test]
    fn project_decodes_with_extra_fields() {
        let project: Project = serde_json::from_str(
            r#"{"id": 4, "name": "Checkout", "status": "Active", "description": "x", "testCaseCount": 12}"#,
        )
        .unwrap();
        assert!(project.is_active());
    }
}
