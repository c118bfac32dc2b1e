//! Gateway routes.
//!
//! - `ui` - the embedded picker page and its script
//! - `api` - JSON endpoints the picker polls for data
//! - `health` - liveness probe
//! - `ws` - the realtime selection channel

mod api;
mod health;
mod ui;
pub mod ws;

pub use api::{results_handler, session_handler};
pub use health::{health, health_routes};
pub use ui::{index_handler, picker_js_handler};
pub use ws::ws_handler;
