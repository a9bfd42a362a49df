use crate::models::domain::SelectedFile;
use validator::Validate;

/// One outbound similarity search.
///
/// Either the file or the URL can stand alone; when both are present both
/// are sent and the backend decides precedence (it prefers the file).
#[derive(Debug, Clone, Validate)]
pub struct SearchRequest {
    pub file: Option<SelectedFile>,
    pub image_url: Option<String>,
    #[validate(range(min = 1))]
    pub top_k: u16,
    #[validate(range(min = 0.0, max = 1.0))]
    pub min_similarity: f64,
}

impl SearchRequest {
    /// A request without any query source is rejected before it leaves.
    pub fn has_query(&self) -> bool {
        self.file.is_some()
            || self
                .image_url
                .as_deref()
                .is_some_and(|url| !url.trim().is_empty())
    }
}
