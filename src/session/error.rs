use thiserror::Error;

use crate::state::StateError;
use crate::transport::TransportError;
use crate::upload::UploadRejection;

pub type SessionResult<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("upload rejected: {0}")]
    Rejected(#[from] UploadRejection),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("no image has been uploaded")]
    NoFile,
    #[error("another edit or reset is still in progress")]
    Busy,
    #[error(transparent)]
    State(#[from] StateError),
}
