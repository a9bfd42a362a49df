use crate::config::SearchSettings;

/// Search parameter bounds presented by the UI. The backend rejects
/// `min_similarity` outside [0, 1]; `top_k` is capped client-side.
pub const MIN_SIMILARITY_MIN: f64 = 0.0;
pub const MIN_SIMILARITY_MAX: f64 = 1.0;
pub const TOP_K_MIN: u16 = 1;

/// The two scalar bounds of a search: result-count limit and similarity
/// threshold. No persistence; reset restores the configured defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchParams {
    pub top_k: u16,
    pub min_similarity: f64,
}

impl SearchParams {
    /// Defaults from configuration, clamped so a bad config file cannot
    /// produce out-of-range values.
    pub fn from_settings(settings: &SearchSettings) -> Self {
        Self {
            top_k: clamp_top_k(settings.default_top_k, settings.max_top_k),
            min_similarity: clamp_min_similarity(settings.default_min_similarity),
        }
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        Self::from_settings(&SearchSettings::default())
    }
}

/// Clamp the result-count limit to [1, max_top_k].
pub fn clamp_top_k(value: u16, max_top_k: u16) -> u16 {
    value.clamp(TOP_K_MIN, max_top_k.max(TOP_K_MIN))
}

/// Clamp the similarity threshold to [0, 1]. Non-finite input falls back
/// to the lower bound.
pub fn clamp_min_similarity(value: f64) -> f64 {
    if !value.is_finite() {
        return MIN_SIMILARITY_MIN;
    }
    value.clamp(MIN_SIMILARITY_MIN, MIN_SIMILARITY_MAX)
}
