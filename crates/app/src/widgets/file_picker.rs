//! File picker widget using rfd (rust file dialog).
//!
//! Selects the single attachment for the next chat message.

use std::path::PathBuf;

/// File picker widget for choosing one attachment.
pub struct FilePickerWidget {
    /// File type filter (e.g., ["pdf", "docx"])
    filters: Vec<FileFilter>,
    /// Starting directory, follows the last pick
    start_dir: Option<PathBuf>,
    /// Dialog title
    title: String,
}

/// Filter for file types.
#[derive(Clone)]
pub struct FileFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

impl FileFilter {
    pub fn new(name: impl Into<String>, extensions: &[&str]) -> Self {
        Self {
            name: name.into(),
            extensions: extensions.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn all_files() -> Self {
        Self::new("All Files", &["*"])
    }

    pub fn documents() -> Self {
        Self::new("Documents", &["pdf", "doc", "docx", "txt", "md", "xls", "xlsx", "csv"])
    }

    pub fn images() -> Self {
        Self::new("Images", &["png", "jpg", "jpeg", "gif", "webp"])
    }
}

impl Default for FilePickerWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl FilePickerWidget {
    pub fn new() -> Self {
        Self {
            filters: vec![
                FileFilter::documents(),
                FileFilter::images(),
                FileFilter::all_files(),
            ],
            start_dir: None,
            title: "Select File".to_string(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Blocking: opens the native dialog and waits. `None` when cancelled.
    pub fn pick_file(&mut self) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new().set_title(&self.title);

        for filter in &self.filters {
            let ext_refs: Vec<&str> = filter.extensions.iter().map(|s| s.as_str()).collect();
            dialog = dialog.add_filter(&filter.name, &ext_refs);
        }

        if let Some(ref dir) = self.start_dir {
            dialog = dialog.set_directory(dir);
        }

        let picked = dialog.pick_file();
        if let Some(parent) = picked.as_ref().and_then(|p| p.parent()) {
            self.start_dir = Some(parent.to_path_buf());
        }
        tracing::debug!("file picker returned {:?}", picked);
        picked
    }
}
