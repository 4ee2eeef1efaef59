//! Staged product images and their preview handles.

use anyhow::Result;
use std::{collections::HashSet, path::Path};
use uuid::Uuid;

/// A user-selected image held in memory until submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StagedFile {
    /// File name sent with the multipart part.
    pub name: String,
    /// MIME type sent with the multipart part.
    pub mime: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl StagedFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing its MIME type from the extension.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".into());
        let mime = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Ok(Self { name, mime, bytes })
    }
}

/// Revocable reference used to display a staged file before upload.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PreviewRef(Uuid);

impl PreviewRef {
    /// Object-URL style address for the preview.
    pub fn url(&self) -> String {
        format!("blob:product-form/{}", self.0)
    }
}

/// Table of preview references that are currently alive.
#[derive(Debug, Default)]
pub struct PreviewTable {
    live: HashSet<PreviewRef>,
}

impl PreviewTable {
    /// Issue a new preview reference.
    pub fn acquire(&mut self) -> PreviewRef {
        let r = PreviewRef(Uuid::new_v4());
        self.live.insert(r.clone());
        r
    }

    /// Revoke a preview reference. Returns false if it was not alive.
    pub fn release(&mut self, r: &PreviewRef) -> bool {
        self.live.remove(r)
    }

    pub fn is_live(&self, r: &PreviewRef) -> bool {
        self.live.contains(r)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

/// One entry of the staged list.
#[derive(Clone, Debug)]
pub struct StagedImage {
    pub file: StagedFile,
    pub preview: PreviewRef,
}

/// Ordered list of staged images, each paired with exactly one live preview.
#[derive(Debug, Default)]
pub struct StagedImages {
    entries: Vec<StagedImage>,
    previews: PreviewTable,
}

impl StagedImages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append files in the given order, one preview each.
    pub fn stage_files<I>(&mut self, files: I)
    where
        I: IntoIterator<Item = StagedFile>,
    {
        for file in files {
            let preview = self.previews.acquire();
            tracing::debug!("staged image {} as {}", file.name, preview.url());
            self.entries.push(StagedImage { file, preview });
        }
    }

    /// Remove the entry at `index`; out-of-range indices are ignored.
    pub fn unstage(&mut self, index: usize) -> Option<StagedFile> {
        if index >= self.entries.len() {
            return None;
        }
        let removed = self.entries.remove(index);
        self.previews.release(&removed.preview);
        Some(removed.file)
    }

    /// Release every preview and clear the list.
    pub fn reset_all(&mut self) {
        for entry in self.entries.drain(..) {
            self.previews.release(&entry.preview);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[StagedImage] {
        &self.entries
    }

    /// Staged files in display order.
    pub fn files(&self) -> impl Iterator<Item = &StagedFile> {
        self.entries.iter().map(|e| &e.file)
    }

    pub fn live_previews(&self) -> usize {
        self.previews.live_count()
    }

    pub fn is_preview_live(&self, r: &PreviewRef) -> bool {
        self.previews.is_live(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(name: &str) -> StagedFile {
        StagedFile::new(name, "image/png", name.as_bytes().to_vec())
    }

    #[test]
    fn test_unstage_middle_keeps_order_and_previews() {
        let mut images = StagedImages::new();
        images.stage_files([png("a.png"), png("b.png"), png("c.png")]);
        let removed_preview = images.entries()[1].preview.clone();

        let removed = images.unstage(1);

        assert_eq!(removed.map(|f| f.name), Some("b.png".to_string()));
        let names: Vec<&str> = images.files().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "c.png"]);
        assert_eq!(images.live_previews(), 2);
        assert!(!images.is_preview_live(&removed_preview));
        assert!(images.entries().iter().all(|e| images.is_preview_live(&e.preview)));
    }

    #[test]
    fn test_unstage_out_of_bounds_is_noop() {
        let mut images = StagedImages::new();
        images.stage_files([png("a.png")]);
        assert!(images.unstage(1).is_none());
        assert_eq!(images.len(), 1);
        assert_eq!(images.live_previews(), 1);
    }

    #[test]
    fn test_stage_appends_without_replacing() {
        let mut images = StagedImages::new();
        images.stage_files([png("a.png")]);
        images.stage_files([png("b.png"), png("a.png")]);
        let names: Vec<&str> = images.files().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "b.png", "a.png"]);
        assert_eq!(images.live_previews(), 3);
    }

    #[test]
    fn test_reset_all_releases_everything() {
        let mut images = StagedImages::new();
        images.stage_files([png("a.png"), png("b.png")]);
        let previews: Vec<PreviewRef> = images.entries().iter().map(|e| e.preview.clone()).collect();

        images.reset_all();

        assert!(images.is_empty());
        assert_eq!(images.live_previews(), 0);
        assert!(previews.iter().all(|p| !images.is_preview_live(p)));
    }

    #[test]
    fn test_preview_url_shape() {
        let mut table = PreviewTable::default();
        let r = table.acquire();
        assert!(r.url().starts_with("blob:product-form/"));
        assert!(table.release(&r));
        assert!(!table.release(&r));
    }

    #[tokio::test]
    async fn test_from_path_guesses_mime() {
        let path = std::env::temp_dir().join(format!("product-form-{}.png", Uuid::new_v4()));
        tokio::fs::write(&path, b"\x89PNG").await.unwrap();

        let file = StagedFile::from_path(&path).await.unwrap();

        assert_eq!(file.mime, "image/png");
        assert_eq!(file.bytes, b"\x89PNG".to_vec());
        assert!(file.name.ends_with(".png"));
        let _ = tokio::fs::remove_file(&path).await;
    }
}
