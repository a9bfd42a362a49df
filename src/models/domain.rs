use serde::{Deserialize, Serialize};

/// One candidate product returned by the similarity search.
///
/// The backend owns correctness of these fields; the client only formats
/// them for display. Everything except the identifier and the score may be
/// missing or empty depending on what the product catalog contains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub image_url: String,
    pub score: f64,
}

impl ResultItem {
    /// Display name, falling back to the identifier when the catalog has no
    /// (or an empty) name for the product.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.id,
        }
    }

    /// Similarity score as a percentage in [0, 100].
    pub fn score_percent(&self) -> f64 {
        self.score * 100.0
    }

    /// Resolve the image reference against the API base URL.
    ///
    /// The backend may return absolute URLs (CDN-hosted images) or paths
    /// relative to its own origin.
    pub fn resolve_image_url(&self, base_url: &str) -> String {
        let image = self.image_url.trim();
        if image.starts_with("http://") || image.starts_with("https://") {
            image.to_string()
        } else {
            format!(
                "{}/{}",
                base_url.trim_end_matches('/'),
                image.trim_start_matches('/')
            )
        }
    }
}

/// Product price as emitted by the backend: numeric when the catalog value
/// parses, the raw string otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Price::Number(value) => write!(f, "{:.2}", value),
            Price::Text(value) => write!(f, "{}", value),
        }
    }
}

/// A user-chosen image file, held only for the duration of one search.
#[derive(Clone)]
pub struct SelectedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectedFile")
            .field("file_name", &self.file_name)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}
