//! State module for tracking discovery progress
//!
//! # Components
//!
//! - `Phase`: The four ordered discovery strategies
//! - `UrlState`: Lifecycle of a single URL through the frontier

mod phase;
mod url_state;

// Re-export main types
pub use phase::Phase;
pub use url_state::UrlState;
