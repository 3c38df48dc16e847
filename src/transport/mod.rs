use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::session::{EditOperation, EditedImage, ResetImage, UploadedFile};
use crate::upload::CandidateFile;

mod http;
mod wire;

pub use http::HttpImageServer;

pub const UPLOAD_ENDPOINT: &str = "/upload";
pub const EDIT_ENDPOINT: &str = "/edit";
pub const RESET_ENDPOINT: &str = "/reset";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to read {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("request to {endpoint} failed")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} answered HTTP {status}")]
    Status { endpoint: String, status: u16 },
    #[error("unexpected reply from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
    #[error("{message}")]
    ServerReported { endpoint: String, message: String },
}

pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// The image-processing server. One request per call, no retries.
pub trait ImageServer {
    fn upload(&self, file: &CandidateFile) -> TransportResult<UploadedFile>;
    fn edit(&self, filename: &str, operation: EditOperation) -> TransportResult<EditedImage>;
    fn reset(&self, original_filename: &str) -> TransportResult<ResetImage>;
    fn download(&self, url: &str) -> TransportResult<Vec<u8>>;
}
