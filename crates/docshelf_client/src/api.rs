use std::time::Duration;

use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use url::Url;

use crate::types::{RegistryRecord, ReindexRecord};
use crate::{ApiError, DocumentRecord, FailureKind, UploadFile};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    /// Left unset by default: a hung request stays in flight until the server
    /// or the OS gives up.
    pub connect_timeout: Option<Duration>,
    pub request_timeout: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            connect_timeout: None,
            request_timeout: None,
        }
    }
}

/// The document-store boundary. One method per backend operation, so tests
/// and the worker loop can run against a fake store.
#[async_trait::async_trait]
pub trait DocStore: Send + Sync {
    async fn list_docs(&self, filter: &str) -> Result<Vec<DocumentRecord>, ApiError>;
    async fn registry(&self) -> Result<Vec<String>, ApiError>;
    async fn add_tag(&self, name: &str) -> Result<(), ApiError>;
    async fn delete_tag(&self, name: &str) -> Result<(), ApiError>;
    async fn assign_tag(&self, doc_id: &str, tag: &str) -> Result<(), ApiError>;
    async fn delete_doc(&self, doc_id: &str) -> Result<(), ApiError>;
    async fn upload(&self, files: Vec<UploadFile>) -> Result<(), ApiError>;
    async fn reindex(&self) -> Result<u64, ApiError>;
    async fn backup(&self) -> Result<bytes::Bytes, ApiError>;
    async fn restore(&self, file: UploadFile) -> Result<(), ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestDocStore {
    base: Url,
    client: reqwest::Client,
}

impl ReqwestDocStore {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { base, client })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn post_form(&self, path: &str, field: &str, value: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.endpoint(path)?)
            .form(&[(field, value)])
            .send()
            .await
            .map_err(map_reqwest_error)?;
        success_text(response).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl DocStore for ReqwestDocStore {
    async fn list_docs(&self, filter: &str) -> Result<Vec<DocumentRecord>, ApiError> {
        let mut url = self.endpoint("api/docs")?;
        url.query_pairs_mut().append_pair("tag", filter);
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let body = success_text(response).await?;
        decode(&body)
    }

    async fn registry(&self) -> Result<Vec<String>, ApiError> {
        let response = self
            .client
            .get(self.endpoint("api/registry")?)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body = success_text(response).await?;
        let record: RegistryRecord = decode(&body)?;
        Ok(record.tags)
    }

    async fn add_tag(&self, name: &str) -> Result<(), ApiError> {
        self.post_form("api/registry/add", "name", name).await
    }

    async fn delete_tag(&self, name: &str) -> Result<(), ApiError> {
        self.post_form("api/registry/delete", "name", name).await
    }

    async fn assign_tag(&self, doc_id: &str, tag: &str) -> Result<(), ApiError> {
        self.post_form(&format!("api/doc/{doc_id}/tag"), "tag", tag)
            .await
    }

    async fn delete_doc(&self, doc_id: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.endpoint(&format!("api/delete/{doc_id}"))?)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        success_text(response).await?;
        Ok(())
    }

    async fn upload(&self, files: Vec<UploadFile>) -> Result<(), ApiError> {
        // All files travel in one request under a shared field; the batch
        // succeeds or fails as a unit from the client's point of view.
        let mut form = Form::new();
        for file in files {
            form = form.part("files", Part::bytes(file.bytes).file_name(file.name));
        }
        let response = self
            .client
            .post(self.endpoint("api/upload")?)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        success_text(response).await?;
        Ok(())
    }

    async fn reindex(&self) -> Result<u64, ApiError> {
        let response = self
            .client
            .post(self.endpoint("api/reindex")?)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body = success_text(response).await?;
        let record: ReindexRecord = decode(&body)?;
        Ok(record.count)
    }

    async fn backup(&self) -> Result<bytes::Bytes, ApiError> {
        let response = self
            .client
            .get(self.endpoint("api/backup")?)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.map_err(map_reqwest_error)?;
            let message = if body.is_empty() {
                status.to_string()
            } else {
                body
            };
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                message,
            ));
        }

        let mut buf = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            buf.extend_from_slice(&chunk);
        }
        Ok(bytes::Bytes::from(buf))
    }

    async fn restore(&self, file: UploadFile) -> Result<(), ApiError> {
        let form = Form::new().part("file", Part::bytes(file.bytes).file_name(file.name));
        let response = self
            .client
            .post(self.endpoint("api/restore")?)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        success_text(response).await?;
        Ok(())
    }
}

/// Shared tail of every call: a non-success status becomes an error whose
/// message is the response body verbatim (status line when the body is empty).
async fn success_text(response: reqwest::Response) -> Result<String, ApiError> {
    let status = response.status();
    let body = response.text().await.map_err(map_reqwest_error)?;
    if !status.is_success() {
        let message = if body.is_empty() {
            status.to_string()
        } else {
            body
        };
        return Err(ApiError::new(
            FailureKind::HttpStatus(status.as_u16()),
            message,
        ));
    }
    Ok(body)
}

fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
