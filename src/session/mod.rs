mod controller;
mod error;
mod history;
mod model;
mod resolver;

pub use controller::{EditSession, EditTicket, ResetTicket, Settled};
pub use error::{SessionError, SessionResult};
pub use history::EditHistory;
pub use model::{
    Dimensions, DownloadTarget, EditOperation, EditRecord, EditedImage, PendingMutation,
    ResetImage, SessionState, UploadedFile,
};
pub use resolver::{resolve_current_file, resolve_download_target};
