//! Icon catalog access and search orchestration.
//!
//! The catalog itself (iconfont.cn) sits behind the [`CatalogBackend`]
//! trait; [`IconSearcher`] layers the TTL cache on top so repeated
//! queries never hit the network twice within the cache window. The
//! [`saver`] module writes selected icons to disk as `.svg` files.

mod backend;
mod error;
mod iconfont;
pub mod saver;
mod search;

pub use backend::{CatalogBackend, CatalogPage, MockCatalog, RawIcon};
pub use error::{CatalogError, Result};
pub use iconfont::{IconfontBackend, IconfontConfig};
pub use saver::{SaveError, SaveReport};
pub use search::{IconSearcher, LATEST_RESULT_KEY};
