use crate::core::{ConfigProvider, ContactApi, ContactRecord, ExportedContact, ImportResult};
use crate::utils::error::{ImportError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Every successful backend response wraps its payload in `data`.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct ImportRequest<'a> {
    contacts: &'a [ContactRecord],
}

/// reqwest client for the contacts endpoints of the dashboard backend.
#[derive(Debug, Clone)]
pub struct HttpContactApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpContactApi {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(
            config.api_base_url(),
            config.auth_token().map(str::to_string),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn read_data<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if status == StatusCode::UNAUTHORIZED {
            return Err(ImportError::Unauthorized);
        }

        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error.or(b.message))
                .unwrap_or_else(|| format!("API request failed with status: {}", status));
            return Err(ImportError::BackendError {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope<T> = serde_json::from_str(&body)?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl ContactApi for HttpContactApi {
    async fn import_contacts(&self, contacts: &[ContactRecord]) -> Result<ImportResult> {
        let url = self.url("/contacts/import");
        tracing::debug!("POST {} with {} contacts", url, contacts.len());

        let request = self
            .authorize(self.client.post(&url))
            .json(&ImportRequest { contacts });
        let response = request.send().await?;
        Self::read_data(response).await
    }

    async fn export_contacts(&self) -> Result<Vec<ExportedContact>> {
        let url = self.url("/contacts/export");
        tracing::debug!("GET {}", url);

        let request = self
            .authorize(self.client.get(&url))
            .query(&[("format", "json")]);
        let response = request.send().await?;
        Self::read_data(response).await
    }
}
