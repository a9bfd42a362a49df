// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Price, ResultItem, SelectedFile};
pub use requests::SearchRequest;
pub use responses::{HealthStatus, SearchResponse};
