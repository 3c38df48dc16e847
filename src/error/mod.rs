use crate::session::SessionError;
use crate::state::StateError;
use crate::transport::TransportError;
use crate::upload::UploadRejection;
use crate::weather::WeatherError;
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Upload(#[from] UploadRejection),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Weather(#[from] WeatherError),
}
