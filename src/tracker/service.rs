use crate::http::{ApiClient, Endpoint, HttpError, HttpMethod, HttpRequest, ReqParam};
use crate::tracker::model::{CreatedTestCase, Domain, ExistingTestCase, Project, TestCaseRecord, Tester};
use async_trait::async_trait;

/// Operations the tracker backend offers to this service.
#[async_trait]
pub trait TrackerService: Send + Sync {
    async fn list_testers(&self) -> Result<Vec<Tester>, HttpError>;

    async fn list_test_cases_in_project(&self, project_id: i64) -> Result<Vec<ExistingTestCase>, HttpError>;

    /// Succeeds on any 2xx answer, whatever the body holds.
    async fn create_test_case(&self, record: &TestCaseRecord) -> Result<CreatedTestCase, HttpError>;

    async fn list_active_domains(&self) -> Result<Vec<Domain>, HttpError>;

    async fn list_projects_by_domain(&self, domain_id: i64) -> Result<Vec<Project>, HttpError>;
}

pub struct RestTracker {
    api_client: ApiClient,
}

impl RestTracker {
    pub fn new(api_client: ApiClient) -> Self {
        Self { api_client }
    }
}

#[async_trait]
impl TrackerService for RestTracker {
    async fn list_testers(&self) -> Result<Vec<Tester>, HttpError> {
        self.api_client
            .execute(HttpRequest::new(Endpoint::get("testers")))
            .await
    }

    async fn list_test_cases_in_project(&self, project_id: i64) -> Result<Vec<ExistingTestCase>, HttpError> {
        let endpoint = Endpoint::new(
            HttpMethod::GET,
            "testcases/project/:projectId",
            vec![ReqParam::new(":projectId", project_id.to_string())],
        );
        self.api_client.execute(HttpRequest::new(endpoint)).await
    }

    async fn create_test_case(&self, record: &TestCaseRecord) -> Result<CreatedTestCase, HttpError> {
        let request = HttpRequest::with_json(Endpoint::post("testcases"), record)?;
        let body = self.api_client.send(request).await?;
        Ok(CreatedTestCase::from_body(&body))
    }

    async fn list_active_domains(&self) -> Result<Vec<Domain>, HttpError> {
        self.api_client
            .execute(HttpRequest::new(Endpoint::get("domains/active")))
            .await
    }

    async fn list_projects_by_domain(&self, domain_id: i64) -> Result<Vec<Project>, HttpError> {
        let endpoint = Endpoint::new(
            HttpMethod::GET,
            "domains/:domainId/projects",
            vec![ReqParam::new(":domainId", domain_id.to_string())],
        );
        self.api_client.execute(HttpRequest::new(endpoint)).await
    }
}
