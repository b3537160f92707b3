mod error;

pub use error::{ApiError, Result};

use async_trait::async_trait;
use reqwest::{RequestBuilder, Url};
use tracing::debug;

use crate::config::Config;
use crate::models::{Project, ProjectId, ProjectInput};

/// The four calls the admin screen makes against the collection resource.
///
/// Response bodies of the write calls are ignored: the screen always
/// re-reads the whole collection afterwards.
#[async_trait]
pub trait ProjectsApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Project>>;
    async fn create(&self, input: &ProjectInput) -> Result<()>;
    async fn update(&self, id: &ProjectId, input: &ProjectInput) -> Result<()>;
    async fn delete(&self, id: &ProjectId) -> Result<()>;
}

/// HTTP client for a conventional REST collection
pub struct ProjectsClient {
    http: reqwest::Client,
    base_url: Url,
    api_token: Option<String>,
}

impl ProjectsClient {
    pub fn new(base_url: Url, api_token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_token,
        }
    }

    /// Create a client from the application config
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(config.base_url()?, config.api_token.clone()))
    }

    /// `{base}/{id}`, with the id percent-encoded as a single segment
    fn record_url(&self, id: &ProjectId) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(id.to_string()))?
            .pop_if_empty()
            .push(id.as_str());
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response> {
        let response = self.authorized(request).send().await?.error_for_status()?;
        Ok(response)
    }
}

#[async_trait]
impl ProjectsApi for ProjectsClient {
    async fn list(&self) -> Result<Vec<Project>> {
        let response = self.send(self.http.get(self.base_url.clone())).await?;
        let projects: Vec<Project> = response.json().await?;
        debug!(count = projects.len(), "fetched projects");
        Ok(projects)
    }

    async fn create(&self, input: &ProjectInput) -> Result<()> {
        self.send(self.http.post(self.base_url.clone()).json(input))
            .await?;
        Ok(())
    }

    async fn update(&self, id: &ProjectId, input: &ProjectInput) -> Result<()> {
        let url = self.record_url(id)?;
        self.send(self.http.put(url).json(input)).await?;
        Ok(())
    }

    async fn delete(&self, id: &ProjectId) -> Result<()> {
        let url = self.record_url(id)?;
        self.send(self.http.delete(url)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, token: Option<&str>) -> ProjectsClient {
        let base = Url::parse(&format!("{}/projects", server.uri())).unwrap();
        ProjectsClient::new(base, token.map(str::to_string))
    }

    fn site_input() -> ProjectInput {
        ProjectInput {
            project_name: "Site".into(),
            client_name: "Acme".into(),
            deadline: "30".into(),
        }
    }

    #[tokio::test]
    async fn list_decodes_the_collection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"_id": "a1", "project_name": "Site", "client_name": "Acme", "deadline": "30"},
                {"_id": "b2", "project_name": "App", "client_name": "Globex", "deadline": 7}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let projects = client_for(&server, None).list().await.unwrap();

        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].id, ProjectId::new("a1"));
        assert_eq!(projects[1].deadline, "7");
    }

    #[tokio::test]
    async fn create_posts_exactly_the_three_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/projects"))
            .and(body_json(json!({
                "project_name": "Site",
                "client_name": "Acme",
                "deadline": "30"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"_id": "new"})))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server, None).create(&site_input()).await.unwrap();
    }

    #[tokio::test]
    async fn update_puts_to_the_record_url() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/projects/a1"))
            .and(body_json(json!({
                "project_name": "Site",
                "client_name": "Acme",
                "deadline": "30"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server, None)
            .update(&ProjectId::new("a1"), &site_input())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn delete_addresses_the_record() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/projects/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deleted": true})))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server, None)
            .delete(&ProjectId::new("1"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn trailing_slash_on_base_url_is_tolerated() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/projects/9"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let base = Url::parse(&format!("{}/projects/", server.uri())).unwrap();
        ProjectsClient::new(base, None)
            .delete(&ProjectId::new("9"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn token_is_sent_on_every_call() {
        let server = MockServer::start().await;
        for verb in ["GET", "POST", "PUT", "DELETE"] {
            Mock::given(method(verb))
                .and(header("authorization", "Bearer s3cret"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
                .expect(1)
                .mount(&server)
                .await;
        }

        let client = client_for(&server, Some("s3cret"));
        let id = ProjectId::new("a1");
        client.list().await.unwrap();
        client.create(&site_input()).await.unwrap();
        client.update(&id, &site_input()).await.unwrap();
        client.delete(&id).await.unwrap();
    }

    #[tokio::test]
    async fn no_authorization_header_without_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        client_for(&server, None).list().await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].headers.contains_key("authorization"));
    }

    #[tokio::test]
    async fn error_status_is_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        assert!(matches!(client.list().await, Err(ApiError::Http(_))));
        assert!(matches!(
            client.delete(&ProjectId::new("gone")).await,
            Err(ApiError::Http(_))
        ));
    }

    #[tokio::test]
    async fn malformed_payload_is_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        assert!(client_for(&server, None).list().await.is_err());
    }

    #[test]
    fn ids_are_encoded_as_one_segment() {
        let client = ProjectsClient::new(Url::parse("http://host/api/projects").unwrap(), None);
        let url = client.record_url(&ProjectId::new("a/b c")).unwrap();

        assert_eq!(url.as_str(), "http://host/api/projects/a%2Fb%20c");
    }

    #[test]
    fn opaque_base_url_cannot_address_records() {
        let client = ProjectsClient::new(Url::parse("mailto:ops@example.com").unwrap(), None);

        assert!(matches!(
            client.record_url(&ProjectId::new("1")),
            Err(ApiError::InvalidBaseUrl(_))
        ));
    }
}
