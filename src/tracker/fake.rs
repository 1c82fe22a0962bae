use crate::http::{HttpError, StatusError};
use crate::tracker::model::{CreatedTestCase, Domain, ExistingTestCase, Project, TestCaseRecord, Tester};
use crate::tracker::service::TrackerService;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

/// In-memory tracker that records every call it receives.
#[derive(Default)]
pub struct FakeTracker {
    pub testers: Vec<Tester>,
    pub existing_titles: Vec<String>,
    pub domains: Vec<Domain>,
    pub projects: Vec<Project>,
    pub rejected_titles: HashSet<String>,
    pub fail_duplicate_lookup: bool,
    pub calls: Mutex<Vec<String>>,
    pub created: Mutex<Vec<TestCaseRecord>>,
}

impl FakeTracker {
    pub fn call_log(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn created_records(&self) -> Vec<TestCaseRecord> {
        self.created.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl TrackerService for FakeTracker {
    async fn list_testers(&self) -> Result<Vec<Tester>, HttpError> {
        self.record("list_testers".to_string());
        Ok(self.testers.clone())
    }

    async fn list_test_cases_in_project(&self, project_id: i64) -> Result<Vec<ExistingTestCase>, HttpError> {
        self.record(format!("list_test_cases_in_project:{}", project_id));
        if self.fail_duplicate_lookup {
            return Err(HttpError::Io("connection reset".to_string()));
        }
        Ok(self
            .existing_titles
            .iter()
            .map(|title| ExistingTestCase { title: title.clone() })
            .collect())
    }

    async fn create_test_case(&self, record: &TestCaseRecord) -> Result<CreatedTestCase, HttpError> {
        self.record(format!("create_test_case:{}", record.title));
        if self.rejected_titles.contains(&record.title) {
            return Err(HttpError::Status(500, StatusError::ServerError("insert failed".to_string())));
        }
        let mut created = self.created.lock().unwrap();
        let mut stored = record.clone();
        stored.id = Some(created.len() as i64 + 1);
        let id = stored.id;
        created.push(stored);
        Ok(CreatedTestCase { id })
    }

    async fn list_active_domains(&self) -> Result<Vec<Domain>, HttpError> {
        self.record("list_active_domains".to_string());
        Ok(self.domains.clone())
    }

    async fn list_projects_by_domain(&self, domain_id: i64) -> Result<Vec<Project>, HttpError> {
        self.record(format!("list_projects_by_domain:{}", domain_id));
        Ok(self.projects.clone())
    }
}
