//! Visual Product Matcher - client for the visual similarity search service
//!
//! This library implements the client side of the Visual Product Matcher:
//! session state for assembling a query (image file or URL plus search
//! parameters) and the HTTP calls to the remote search service. The heavy
//! lifting (CLIP embeddings, nearest-neighbor index, ranking) lives in the
//! backend and is treated as an opaque collaborator.

pub mod config;
pub mod core;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use crate::config::Settings;
pub use crate::core::{SearchParams, SearchSession, SessionError, ViewState};
pub use crate::models::{HealthStatus, ResultItem, SearchRequest, SearchResponse, SelectedFile};
pub use crate::services::{BackendError, MatcherClient};
