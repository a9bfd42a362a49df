use crate::config::SearchSettings;
use crate::core::params::{clamp_min_similarity, clamp_top_k, SearchParams};
use crate::core::preview::{is_http_image_link, LocalPreview, Preview};
use crate::models::{ResultItem, SearchRequest, SearchResponse, SelectedFile};
use thiserror::Error;

/// Errors raised by session operations
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no query: choose an image file or enter an image URL")]
    NoQuery,

    #[error("a search is already in progress")]
    Busy,

    #[error("failed to stage preview file: {0}")]
    Preview(#[from] std::io::Error),
}

/// What the result area should currently show.
#[derive(Debug)]
pub enum ViewState<'a> {
    /// No search issued yet.
    Idle,
    /// A request is in flight; distinct from the empty result state.
    Loading,
    /// The last search failed; results are empty.
    Error(&'a str),
    /// The last search succeeded with an empty item list.
    NoResults,
    /// Ranked results of the last successful search.
    Results(&'a [ResultItem]),
}

/// One search session: query selection, parameters, preview resource and the
/// outcome of the most recent request.
///
/// The session is a plain state machine; issuing the HTTP call is the
/// caller's job. A search is bracketed by [`SearchSession::begin_search`]
/// (which gates on having a query and produces the outbound request) and
/// [`SearchSession::finish_search`] (which records the outcome and always
/// clears the loading flag).
#[derive(Debug)]
pub struct SearchSession {
    url_input: String,
    file: Option<SelectedFile>,
    params: SearchParams,
    preview: Option<Preview>,
    results: Option<Vec<ResultItem>>,
    error: Option<String>,
    loading: bool,
    defaults: SearchParams,
    max_top_k: u16,
}

impl SearchSession {
    pub fn new(settings: &SearchSettings) -> Self {
        let defaults = SearchParams::from_settings(settings);
        Self {
            url_input: String::new(),
            file: None,
            params: defaults,
            preview: None,
            results: None,
            error: None,
            loading: false,
            defaults,
            max_top_k: settings.max_top_k,
        }
    }

    /// Select an image file as the query source.
    ///
    /// Any previously staged preview is released and replaced; the file
    /// supersedes URL-based preview until cleared.
    pub fn set_file(
        &mut self,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<(), SessionError> {
        let file_name = file_name.into();
        let local = LocalPreview::write(&file_name, &bytes)?;
        self.preview = Some(Preview::Local(local));
        self.file = Some(SelectedFile { file_name, bytes });
        Ok(())
    }

    /// Drop the selected file. The preview falls back to the URL only when
    /// the current text is a well-formed absolute http(s) link.
    pub fn clear_file(&mut self) {
        self.file = None;
        self.preview = self.url_preview();
    }

    /// Update the URL text. Free text is accepted; the preview follows the
    /// URL only once it parses as an absolute http(s) URL, and never while a
    /// file is selected.
    pub fn set_url(&mut self, text: impl Into<String>) {
        self.url_input = text.into();
        if self.file.is_none() {
            self.preview = self.url_preview();
        }
    }

    fn url_preview(&self) -> Option<Preview> {
        if is_http_image_link(&self.url_input) {
            Some(Preview::Remote(self.url_input.trim().to_string()))
        } else {
            None
        }
    }

    pub fn set_top_k(&mut self, value: u16) {
        self.params.top_k = clamp_top_k(value, self.max_top_k);
    }

    pub fn set_min_similarity(&mut self, value: f64) {
        self.params.min_similarity = clamp_min_similarity(value);
    }

    /// The search trigger is enabled only when some query source exists and
    /// no request is in flight.
    pub fn can_submit(&self) -> bool {
        !self.loading && (self.file.is_some() || !self.url_input.trim().is_empty())
    }

    /// Start a search: clears the previous error, raises the loading flag
    /// and packages the query. Both the file and the URL are sent when both
    /// are present.
    pub fn begin_search(&mut self) -> Result<SearchRequest, SessionError> {
        if self.loading {
            return Err(SessionError::Busy);
        }
        if !self.can_submit() {
            return Err(SessionError::NoQuery);
        }

        self.error = None;
        self.loading = true;

        let image_url = {
            let trimmed = self.url_input.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        };

        Ok(SearchRequest {
            file: self.file.clone(),
            image_url,
            top_k: self.params.top_k,
            min_similarity: self.params.min_similarity,
        })
    }

    /// Record the outcome of a search. Success replaces the result list;
    /// failure stores the error detail and leaves results empty. The loading
    /// flag is cleared in both cases.
    pub fn finish_search<E: std::fmt::Display>(&mut self, outcome: Result<SearchResponse, E>) {
        match outcome {
            Ok(response) => {
                self.results = Some(response.items);
                self.error = None;
            }
            Err(error) => {
                self.results = None;
                self.error = Some(error.to_string());
            }
        }
        self.loading = false;
    }

    /// Back to the initial state: file, URL, results and error are cleared
    /// unconditionally, the staged preview is released and the parameters
    /// return to their configured defaults.
    pub fn reset(&mut self) {
        self.url_input.clear();
        self.file = None;
        self.preview = None;
        self.results = None;
        self.error = None;
        self.loading = false;
        self.params = self.defaults;
    }

    pub fn view(&self) -> ViewState<'_> {
        if self.loading {
            return ViewState::Loading;
        }
        if let Some(error) = self.error.as_deref() {
            return ViewState::Error(error);
        }
        match self.results.as_deref() {
            Some([]) => ViewState::NoResults,
            Some(items) => ViewState::Results(items),
            None => ViewState::Idle,
        }
    }

    pub fn url(&self) -> &str {
        &self.url_input
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn params(&self) -> SearchParams {
        self.params
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn results(&self) -> Option<&[ResultItem]> {
        self.results.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(&SearchSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_with(items: Vec<ResultItem>) -> SearchResponse {
        SearchResponse {
            query: None,
            count: items.len(),
            items,
        }
    }

    fn item(id: &str, score: f64) -> ResultItem {
        ResultItem {
            id: id.to_string(),
            name: None,
            category: None,
            brand: None,
            description: None,
            price: None,
            image_url: String::new(),
            score,
        }
    }

    #[test]
    fn test_submit_disabled_without_query() {
        let mut session = SearchSession::default();
        assert!(!session.can_submit());
        assert!(matches!(session.begin_search(), Err(SessionError::NoQuery)));

        session.set_url("   ");
        assert!(!session.can_submit());
    }

    #[test]
    fn test_submit_enabled_by_url_or_file() {
        let mut session = SearchSession::default();
        session.set_url("https://x.test/shoe.jpg");
        assert!(session.can_submit());

        let mut session = SearchSession::default();
        session.set_file("shoe.jpg", vec![1, 2, 3]).unwrap();
        assert!(session.can_submit());
    }

    #[test]
    fn test_file_supersedes_url_preview() {
        let mut session = SearchSession::default();
        session.set_url("https://x.test/shoe.jpg");
        assert!(matches!(session.preview(), Some(Preview::Remote(_))));

        session.set_file("other.png", vec![1, 2, 3]).unwrap();
        assert!(matches!(session.preview(), Some(Preview::Local(_))));

        // Editing the URL while a file is selected does not steal the preview
        session.set_url("https://x.test/boot.jpg");
        assert!(matches!(session.preview(), Some(Preview::Local(_))));
    }

    #[test]
    fn test_clear_file_falls_back_to_valid_url_only() {
        let mut session = SearchSession::default();
        session.set_url("https://x.test/shoe.jpg");
        session.set_file("shoe.jpg", vec![1, 2, 3]).unwrap();

        session.clear_file();
        assert!(matches!(session.preview(), Some(Preview::Remote(_))));

        session.set_url("not a url");
        session.set_file("shoe.jpg", vec![1, 2, 3]).unwrap();
        session.clear_file();
        assert!(session.preview().is_none());
    }

    #[test]
    fn test_replacing_file_releases_previous_preview() {
        let mut session = SearchSession::default();
        session.set_file("a.jpg", vec![1]).unwrap();
        let first = match session.preview() {
            Some(Preview::Local(local)) => local.path().to_path_buf(),
            other => panic!("expected local preview, got {:?}", other),
        };
        assert!(first.exists());

        session.set_file("b.jpg", vec![2]).unwrap();
        assert!(!first.exists());
    }

    #[test]
    fn test_begin_search_sends_both_sources() {
        let mut session = SearchSession::default();
        session.set_url("https://x.test/shoe.jpg");
        session.set_file("shoe.jpg", vec![0xFF, 0xD8]).unwrap();
        session.set_top_k(12);
        session.set_min_similarity(0.75);

        let request = session.begin_search().unwrap();
        assert!(session.is_loading());
        assert!(matches!(session.view(), ViewState::Loading));

        // File takes precedence for preview but both fields go out
        assert!(matches!(session.preview(), Some(Preview::Local(_))));
        assert_eq!(request.file.as_ref().unwrap().file_name, "shoe.jpg");
        assert_eq!(request.image_url.as_deref(), Some("https://x.test/shoe.jpg"));
        assert_eq!(request.top_k, 12);
        assert_eq!(request.min_similarity, 0.75);
    }

    #[test]
    fn test_begin_search_rejected_while_loading() {
        let mut session = SearchSession::default();
        session.set_url("https://x.test/shoe.jpg");
        session.begin_search().unwrap();
        assert!(!session.can_submit());
        assert!(matches!(session.begin_search(), Err(SessionError::Busy)));
    }

    #[test]
    fn test_failure_populates_error_and_empties_results() {
        let mut session = SearchSession::default();
        session.set_url("https://x.test/shoe.jpg");
        session.begin_search().unwrap();
        session.finish_search(Err::<SearchResponse, _>("boom: backend said no"));

        assert!(!session.is_loading());
        assert!(session.results().is_none());
        assert_eq!(session.error(), Some("boom: backend said no"));
        assert!(matches!(session.view(), ViewState::Error(_)));
        // Still interactive after the failure
        assert!(session.can_submit());
    }

    #[test]
    fn test_empty_items_render_no_results_state() {
        let mut session = SearchSession::default();
        session.set_url("https://x.test/shoe.jpg");
        session.begin_search().unwrap();
        session.finish_search(Ok::<_, String>(response_with(vec![])));

        assert!(matches!(session.view(), ViewState::NoResults));
        assert!(!session.is_loading());
    }

    #[test]
    fn test_success_replaces_results_and_clears_error() {
        let mut session = SearchSession::default();
        session.set_url("https://x.test/shoe.jpg");
        session.begin_search().unwrap();
        session.finish_search(Err::<SearchResponse, _>("transient"));

        session.begin_search().unwrap();
        session.finish_search(Ok::<_, String>(response_with(vec![
            item("1", 0.9),
            item("2", 0.8),
        ])));

        assert!(session.error().is_none());
        match session.view() {
            ViewState::Results(items) => assert_eq!(items.len(), 2),
            other => panic!("expected results, got {:?}", other),
        }
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = SearchSession::default();
        session.set_url("https://x.test/shoe.jpg");
        session.set_file("shoe.jpg", vec![1, 2, 3]).unwrap();
        session.set_top_k(40);
        session.set_min_similarity(0.9);
        let staged = match session.preview() {
            Some(Preview::Local(local)) => local.path().to_path_buf(),
            other => panic!("expected local preview, got {:?}", other),
        };

        session.begin_search().unwrap();
        session.finish_search(Err::<SearchResponse, _>("boom"));
        session.reset();

        assert!(!staged.exists());
        assert!(session.url().is_empty());
        assert!(session.file().is_none());
        assert!(session.preview().is_none());
        assert!(session.results().is_none());
        assert!(session.error().is_none());
        assert!(!session.is_loading());
        assert_eq!(session.params(), SearchParams::default());
        assert!(matches!(session.view(), ViewState::Idle));
    }

    #[test]
    fn test_param_setters_clamp() {
        let mut session = SearchSession::default();
        session.set_top_k(0);
        assert_eq!(session.params().top_k, 1);
        session.set_top_k(1000);
        assert_eq!(session.params().top_k, 50);
        session.set_min_similarity(7.0);
        assert_eq!(session.params().min_similarity, 1.0);
    }
}
