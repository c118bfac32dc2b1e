//! Shared data model for glyphpick.
//!
//! These are the value types that cross crate boundaries: normalized icon
//! records produced by the catalog layer, search queries with their
//! deterministic cache keys, and paginated result sets served to both the
//! MCP client and the web picker.

mod icon;
mod search;

pub use icon::IconRecord;
pub use search::{ResultsPage, SearchQuery, SearchResult, SortOrder};
