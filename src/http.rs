use crate::config::Config;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

#[derive(Clone, Debug, PartialEq)]
pub struct ReqParam {
    pub key: String,
    pub value: String,
}

impl ReqParam {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        ReqParam {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug)]
pub enum HttpMethod {
    GET,
    POST,
}

impl From<&HttpMethod> for Method {
    fn from(method: &HttpMethod) -> Self {
        match method {
            HttpMethod::GET => Method::GET,
            HttpMethod::POST => Method::POST,
        }
    }
}

pub struct Endpoint {
    pub method: HttpMethod,
    pub path: String,
}

impl Endpoint {
    /// Builds an endpoint, substituting every `path_params` key found in `path`.
    pub fn new(method: HttpMethod, path: &str, path_params: Vec<ReqParam>) -> Endpoint {
        let mut raw_path = path.to_string();
        path_params.into_iter().for_each(|param| {
            raw_path = raw_path.replace(&param.key, &param.value);
        });
        Endpoint {
            method,
            path: raw_path,
        }
    }

    pub fn get(path: &str) -> Endpoint {
        Endpoint::new(HttpMethod::GET, path, vec![])
    }

    pub fn post(path: &str) -> Endpoint {
        Endpoint::new(HttpMethod::POST, path, vec![])
    }

    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.path.trim_start_matches('/'))
    }
}

pub struct HttpRequest {
    pub endpoint: Endpoint,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn new(endpoint: Endpoint) -> HttpRequest {
        HttpRequest { endpoint, body: None }
    }

    pub fn with_json<B: Serialize>(endpoint: Endpoint, body: &B) -> Result<HttpRequest, HttpError> {
        let value = serde_json::to_value(body).map_err(|e| HttpError::Encode(e.to_string()))?;
        Ok(HttpRequest {
            endpoint,
            body: Some(value),
        })
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum StatusError {
    ClientError(String),
    ServerError(String),
}

#[derive(Clone, Debug, thiserror::Error)]
pub enum HttpError {
    #[error("HTTP {0}: {msg}", msg = .1.message())]
    Status(u16, StatusError),
    #[error("{0}")]
    Io(String),
    #[error("invalid request body: {0}")]
    Encode(String),
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl StatusError {
    pub fn message(&self) -> &str {
        match self {
            StatusError::ClientError(msg) => msg,
            StatusError::ServerError(msg) => msg,
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    headers: HeaderMap,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| HttpError::Io(e.to_string()))?;
        let mut credentials = vec![];
        if let Some(client_id) = &config.client_id {
            credentials.push(ReqParam::new("client_id", client_id.clone()));
        }
        if let Some(client_secret) = &config.client_secret {
            credentials.push(ReqParam::new("client_secret", client_secret.clone()));
        }
        Ok(Self {
            client,
            base_url: config.tracker_api_url.clone(),
            headers: build_headers(&credentials)?,
        })
    }

    pub async fn execute<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T, HttpError> {
        let text = self.send(request).await?;
        serde_json::from_str(&text).map_err(|e| HttpError::Decode(e.to_string()))
    }

    /// Sends the request and returns the raw body of a 2xx response.
    pub async fn send(&self, request: HttpRequest) -> Result<String, HttpError> {
        let req = self.build_reqwest(request)?;
        let response = req.send().await.map_err(|error| {
            debug!("http request failed: {}", error);
            HttpError::Io(error.to_string())
        })?;

        let status_code = response.status();
        debug!("http request executed, status_code: {}", status_code);
        let text = response
            .text()
            .await
            .map_err(|e| HttpError::Io(e.to_string()))?;
        if status_code.is_success() {
            Ok(text)
        } else if status_code.is_client_error() {
            debug!("http request failed: {}", text);
            Err(HttpError::Status(
                status_code.as_u16(),
                StatusError::ClientError(text),
            ))
        } else {
            Err(HttpError::Status(
                status_code.as_u16(),
                StatusError::ServerError(text),
            ))
        }
    }

    fn build_reqwest(&self, request: HttpRequest) -> Result<RequestBuilder, HttpError> {
        let endpoint = request.endpoint;
        let url_string = endpoint.to_url(&self.base_url);
        debug!("{:?} {}", endpoint.method, url_string);
        let url = Url::parse(&url_string).map_err(|e| HttpError::Io(format!("{}: {}", url_string, e)))?;

        let mut req = self
            .client
            .request(Method::from(&endpoint.method), url)
            .headers(self.headers.clone());

        if let Some(body) = &request.body {
            req = req.json(body);
        }
        Ok(req)
    }
}

fn build_headers(params: &[ReqParam]) -> Result<HeaderMap, HttpError> {
    let mut headers = HeaderMap::new();
    for header in params {
        let name = HeaderName::from_bytes(header.key.as_bytes())
            .map_err(|e| HttpError::Io(format!("invalid header name {}: {}", header.key, e)))?;
        let value = HeaderValue::from_str(&header.value)
            .map_err(|e| HttpError::Io(format!("invalid header value for {}: {}", header.key, e)))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_params_are_substituted() {
        let endpoint = Endpoint::new(
            HttpMethod::GET,
            "/domains/:id/projects",
            vec![ReqParam::new(":id", "7")],
        );
        assert_eq!(endpoint.to_url("http://tracker/api/"), "http://tracker/api/domains/7/projects");
    }

    #[test]
    fn leading_slash_is_not_doubled() {
        let endpoint = Endpoint::get("/testers");
        assert_eq!(endpoint.to_url("http://tracker/api"), "http://tracker/api/testers");
    }

    #[test]
    fn unserializable_body_is_an_encode_error() {
        let mut body = std::collections::HashMap::new();
        body.insert((1, 2), "tuple keys are not valid JSON object keys");
        let result = HttpRequest::with_json(Endpoint::post("testcases"), &body);
        assert!(matches!(result, Err(HttpError::Encode(_))));
    }

    #[test]
    fn status_error_display_carries_body() {
        let error = HttpError::Status(409, StatusError::ClientError("title taken".to_string()));
        assert_eq!(error.to_string(), "HTTP 409: title taken");
    }
}
