// Core session/controller exports
pub mod params;
pub mod preview;
pub mod session;

pub use params::{clamp_min_similarity, clamp_top_k, SearchParams};
pub use preview::{is_http_image_link, LocalPreview, Preview};
pub use session::{SearchSession, SessionError, ViewState};
