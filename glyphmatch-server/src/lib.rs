//! HTTP API for captcha recognition and template management.
//!
//! # API Endpoints
//!
//! - `GET /` - status check
//! - `GET /health` - liveness with template counts
//! - `POST /api/ocr` - recognize an uploaded captcha (multipart field `file`)
//! - `POST /api/add-template?label=XXXX` - label an uploaded captcha and store
//!   its glyphs as templates
//! - `POST /api/reload-templates` - rescan the template directory
//!
//! Errors are returned as `{"error": "<message>"}` with a 4xx or 5xx status.

pub mod config;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
