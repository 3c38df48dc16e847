mod staging;
mod viewer;

pub use staging::{format_file_size, stage_files, StagedBatch};
pub use viewer::{GalleryItem, ModalViewer, ViewerKey};
