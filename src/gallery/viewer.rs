#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryItem {
    pub src: String,
    pub thumbnail: String,
    pub filename: String,
    pub size: String,
    pub uploaded: String,
}

impl GalleryItem {
    /// `size_kb` is the listing's kilobyte figure, `uploaded` its timestamp.
    pub fn new(filename: impl Into<String>, size_kb: f64, uploaded: impl Into<String>) -> Self {
        let filename = filename.into();
        Self {
            src: format!("/image/{filename}"),
            thumbnail: format!("/thumbnail/{filename}"),
            size: format!("{size_kb} KB"),
            uploaded: uploaded.into(),
            filename,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerKey {
    Escape,
    Other,
}

/// Full-size viewer opened from a thumbnail.
#[derive(Debug, Clone, Default)]
pub struct ModalViewer {
    shown: Option<GalleryItem>,
}

impl ModalViewer {
    pub fn open(&mut self, item: GalleryItem) {
        tracing::debug!(filename = %item.filename, "opening image viewer");
        self.shown = Some(item);
    }

    pub fn close(&mut self) -> Option<GalleryItem> {
        self.shown.take()
    }

    pub fn shown(&self) -> Option<&GalleryItem> {
        self.shown.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.shown.is_some()
    }

    /// Returns `true` when the key closed the viewer.
    pub fn handle_key(&mut self, key: ViewerKey) -> bool {
        match key {
            ViewerKey::Escape => self.close().is_some(),
            ViewerKey::Other => false,
        }
    }
}
