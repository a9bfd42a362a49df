use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// What the query preview currently points at: a locally staged copy of the
/// selected file, or the image URL itself.
#[derive(Debug)]
pub enum Preview {
    Local(LocalPreview),
    Remote(String),
}

impl Preview {
    /// Path or URL suitable for handing to a viewer.
    pub fn location(&self) -> String {
        match self {
            Preview::Local(local) => local.path().display().to_string(),
            Preview::Remote(url) => url.clone(),
        }
    }
}

/// A staged preview copy of the selected image in the system temp directory.
///
/// The file is removed when the handle is dropped, so replacing or clearing
/// the selection never accumulates stale preview files.
pub struct LocalPreview {
    path: PathBuf,
}

impl LocalPreview {
    /// Stage `bytes` under a unique name, keeping the original extension so
    /// external viewers can pick the right decoder.
    pub fn write(file_name: &str, bytes: &[u8]) -> io::Result<Self> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("img");
        let path = std::env::temp_dir().join(format!("vpm-preview-{}.{}", Uuid::new_v4(), ext));
        fs::write(&path, bytes)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LocalPreview {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

impl std::fmt::Debug for LocalPreview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalPreview").field("path", &self.path).finish()
    }
}

/// True when the text parses as an absolute http(s) URL, i.e. something the
/// preview can point at directly.
pub fn is_http_image_link(text: &str) -> bool {
    match reqwest::Url::parse(text.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_preview_removed_on_drop() {
        let preview = LocalPreview::write("shoe.jpg", &[0xFF, 0xD8, 0xFF]).unwrap();
        let path = preview.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("jpg"));
        drop(preview);
        assert!(!path.exists());
    }

    #[test]
    fn test_local_preview_without_extension() {
        let preview = LocalPreview::write("upload", b"data").unwrap();
        assert_eq!(preview.path().extension().and_then(|e| e.to_str()), Some("img"));
    }

    #[test]
    fn test_is_http_image_link() {
        assert!(is_http_image_link("https://x.test/shoe.jpg"));
        assert!(is_http_image_link("http://x.test/shoe.jpg"));
        assert!(is_http_image_link("  https://x.test/shoe.jpg  "));
        assert!(!is_http_image_link("ftp://x.test/shoe.jpg"));
        assert!(!is_http_image_link("x.test/shoe.jpg"));
        assert!(!is_http_image_link("not a url"));
        assert!(!is_http_image_link(""));
    }
}
