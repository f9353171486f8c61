use serde::{Deserialize, Serialize};
use tracing::debug;

use rostra_data::Projector;
use rostra_data::ProjectorElement;

use crate::error::{ProjectionError, Result};

/// Body of `POST /rest/core/projector/{id}/project/`.
///
/// Every field is a full replacement of the corresponding server-side
/// list; absent fields are left untouched by the server.
/// `append_to_history` is only ever set non-empty, and it is mutually
/// exclusive with `delete_last_history_element`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<ProjectorElement>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<Vec<ProjectorElement>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub append_to_history: Option<Vec<ProjectorElement>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_last_history_element: Option<bool>,
}

impl ProjectRequest {
    /// Reject request shapes the server cannot honor.
    pub fn validate(&self) -> Result<()> {
        let appends = self
            .append_to_history
            .as_ref()
            .is_some_and(|frame| !frame.is_empty());
        if appends && self.delete_last_history_element == Some(true) {
            return Err(ProjectionError::HistoryConflict);
        }
        Ok(())
    }
}

/// REST client for the projector endpoints of the assembly server.
pub struct ProjectorApi {
    http: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl ProjectorApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            access_token: None,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Fetch all projector records from the server.
    pub async fn list_projectors(&self) -> Result<Vec<Projector>> {
        let url = format!("{}/rest/core/projector/", self.base_url);
        let response = self.authorized(self.http.get(&url)).send().await?;
        let response = Self::checked(response).await?;
        Ok(response.json().await?)
    }

    /// Persist one projection intent.
    ///
    /// Invalid request shapes fail here, before anything is sent. A non-2xx
    /// reply maps to `ServerRejected`; neither is retried.
    pub async fn project(&self, projector_id: u64, request: &ProjectRequest) -> Result<()> {
        request.validate()?;
        let url = format!(
            "{}/rest/core/projector/{}/project/",
            self.base_url, projector_id
        );
        debug!(projector = projector_id, "sending project request");
        let response = self
            .authorized(self.http.post(&url).json(request))
            .send()
            .await?;
        Self::checked(response).await?;
        Ok(())
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn checked(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ProjectionError::ServerRejected {
            status: status.as_u16(),
            body,
        })
    }
}
