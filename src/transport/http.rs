use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::wire::{decode_reply, EditReply, EditRequest, ResetReply, ResetRequest, UploadReply};
use super::{
    ImageServer, TransportError, TransportResult, EDIT_ENDPOINT, RESET_ENDPOINT, UPLOAD_ENDPOINT,
};
use crate::session::{EditOperation, EditedImage, ResetImage, UploadedFile};
use crate::upload::CandidateFile;

const UPLOAD_FIELD: &str = "file";

/// Blocking HTTP client for the image server.
#[derive(Debug, Clone)]
pub struct HttpImageServer {
    base_url: String,
    client: Client,
}

impl HttpImageServer {
    pub fn new(base_url: impl Into<String>) -> TransportResult<Self> {
        let base_url = base_url.into();
        let client = Client::builder()
            .build()
            .map_err(|source| TransportError::Request {
                endpoint: base_url.clone(),
                source,
            })?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Server URLs are usually site-relative (`/static/uploads/...`).
    pub fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{url}", self.base_url)
        } else {
            format!("{}/{url}", self.base_url)
        }
    }

    fn post_json<B, T>(&self, endpoint: &str, body: &B) -> TransportResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(endpoint, "sending json request");
        let response = self
            .client
            .post(self.resolve_url(endpoint))
            .json(body)
            .send()
            .map_err(|source| request_error(endpoint, source))?;
        read_reply(endpoint, response)
    }
}

fn request_error(endpoint: &str, source: reqwest::Error) -> TransportError {
    tracing::warn!(endpoint, ?source, "request failed");
    TransportError::Request {
        endpoint: endpoint.to_string(),
        source,
    }
}

fn read_reply<T: DeserializeOwned>(
    endpoint: &str,
    response: reqwest::blocking::Response,
) -> TransportResult<T> {
    let status = response.status().as_u16();
    let body = response
        .text()
        .map_err(|source| request_error(endpoint, source))?;
    decode_reply(endpoint, status, &body)
}

impl ImageServer for HttpImageServer {
    fn upload(&self, file: &CandidateFile) -> TransportResult<UploadedFile> {
        let bytes = std::fs::read(&file.path).map_err(|source| TransportError::ReadFile {
            path: file.path.clone(),
            source,
        })?;
        let part = Part::bytes(bytes)
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .map_err(|source| request_error(UPLOAD_ENDPOINT, source))?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        tracing::debug!(name = %file.name, size = file.size, "uploading file");
        let response = self
            .client
            .post(self.resolve_url(UPLOAD_ENDPOINT))
            .multipart(form)
            .send()
            .map_err(|source| request_error(UPLOAD_ENDPOINT, source))?;
        read_reply::<UploadReply>(UPLOAD_ENDPOINT, response)?.into_uploaded(UPLOAD_ENDPOINT)
    }

    fn edit(&self, filename: &str, operation: EditOperation) -> TransportResult<EditedImage> {
        let request = EditRequest {
            filename,
            operation,
        };
        self.post_json::<_, EditReply>(EDIT_ENDPOINT, &request)?
            .into_edited(EDIT_ENDPOINT)
    }

    fn reset(&self, original_filename: &str) -> TransportResult<ResetImage> {
        let request = ResetRequest { original_filename };
        self.post_json::<_, ResetReply>(RESET_ENDPOINT, &request)?
            .into_reset(RESET_ENDPOINT)
    }

    fn download(&self, url: &str) -> TransportResult<Vec<u8>> {
        let response = self
            .client
            .get(self.resolve_url(url))
            .send()
            .map_err(|source| request_error(url, source))?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                endpoint: url.to_string(),
                status: status.as_u16(),
            });
        }
        let bytes = response
            .bytes()
            .map_err(|source| request_error(url, source))?;
        Ok(bytes.to_vec())
    }
}
