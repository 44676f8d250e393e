//! Brigade v2 REST implementation of [`ApiClient`].

use std::time::Duration;

use brigterm_core::prelude::*;
use brigterm_core::{Event, EventList, EventsSelector, ListOptions, LogsSelector, Project, ProjectList};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::client::ApiClient;
use crate::stream::{spawn_log_reader, LogStream};

/// Connection settings for [`HttpApiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base address of the API server, e.g. `https://brigade.example.com`
    pub address: String,
    /// Bearer token; requests are sent unauthenticated when `None`
    pub token: Option<String>,
    /// Accept self-signed or otherwise invalid TLS certificates
    pub insecure_skip_tls_verify: bool,
    /// Timeout for request/response calls. Log streams are not bounded.
    pub timeout: Duration,
}

/// Brigade v2 API client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    http: Client,
    stream_http: Client,
    base: Url,
    token: Option<String>,
}

impl HttpApiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base = Url::parse(&config.address).map_err(|e| {
            Error::config_invalid(format!("invalid API address {:?}: {}", config.address, e))
        })?;
        if base.cannot_be_a_base() {
            return Err(Error::config_invalid(format!(
                "API address {:?} cannot be used as a base URL",
                config.address
            )));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.insecure_skip_tls_verify)
            .build()
            .map_err(|e| Error::config(format!("building HTTP client: {}", e)))?;
        let stream_http = Client::builder()
            .connect_timeout(config.timeout)
            .danger_accept_invalid_certs(config.insecure_skip_tls_verify)
            .build()
            .map_err(|e| Error::config(format!("building HTTP client: {}", e)))?;

        Ok(Self {
            http,
            stream_http,
            base,
            token: config.token.filter(|t| !t.is_empty()),
        })
    }

    /// Build `<base>/v2/<segments...>`.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::config_invalid("API address cannot be used as a base URL"))?
            .pop_if_empty()
            .push("v2")
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, client: &Client, url: Url, kind: &'static str, id: &str) -> Result<Response> {
        trace!("GET {}", url);
        let response = self
            .authorize(client.get(url.clone()))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| Error::api(format!("GET {}: {}", url, e)))?;
        check_status(response, kind, id).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, kind: &'static str, id: &str) -> Result<T> {
        let response = self.send(&self.http, url.clone(), kind, id).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| Error::api(format!("decoding {} from {}: {}", kind, url, e)))
    }
}

/// Map non-success statuses onto the error taxonomy.
async fn check_status(response: Response, kind: &'static str, id: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(Error::not_found(kind, id));
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::http(status.as_u16(), summarize_body(&body)))
}

/// First line of an error body, bounded for display in a status line.
fn summarize_body(body: &str) -> String {
    const MAX: usize = 200;
    let line = body.lines().next().unwrap_or("").trim();
    if line.chars().count() > MAX {
        let cut: String = line.chars().take(MAX).collect();
        format!("{}…", cut)
    } else {
        line.to_string()
    }
}

impl ApiClient for HttpApiClient {
    async fn list_projects(&self) -> Result<ProjectList> {
        let url = self.endpoint(&["projects"])?;
        self.get_json(url, "projects", "").await
    }

    async fn get_project(&self, id: &str) -> Result<Project> {
        let url = self.endpoint(&["projects", id])?;
        self.get_json(url, "project", id).await
    }

    async fn list_events(
        &self,
        selector: &EventsSelector,
        options: &ListOptions,
    ) -> Result<EventList> {
        let mut url = self.endpoint(&["events"])?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(project_id) = &selector.project_id {
                query.append_pair("projectID", project_id);
            }
            if !options.continue_token.is_empty() {
                query.append_pair("continue", &options.continue_token);
            }
            if let Some(limit) = options.limit {
                query.append_pair("limit", &limit.to_string());
            }
        }
        self.get_json(url, "events", "").await
    }

    async fn get_event(&self, id: &str) -> Result<Event> {
        let url = self.endpoint(&["events", id])?;
        self.get_json(url, "event", id).await
    }

    async fn stream_logs(&self, event_id: &str, selector: &LogsSelector) -> Result<LogStream> {
        let mut url = self.endpoint(&["events", event_id, "logs"])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("follow", "true");
            if let Some(job) = &selector.job {
                query.append_pair("job", job);
            }
            if let Some(container) = &selector.container {
                query.append_pair("container", container);
            }
        }
        let response = self.send(&self.stream_http, url, "event", event_id).await?;
        debug!("Opened log stream for event {} ({:?})", event_id, selector);
        Ok(spawn_log_reader(response.bytes_stream()))
    }
}
