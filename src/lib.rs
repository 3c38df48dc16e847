pub mod config;
pub mod error;
pub mod gallery;
pub mod logging;
pub mod session;
pub mod state;
pub mod transport;
pub mod upload;
pub mod view;
pub mod weather;

pub use error::{AppError, AppResult};
