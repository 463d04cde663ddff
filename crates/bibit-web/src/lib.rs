//! Bibit Web - HTTP front end for chili-seedling recommendations
//!
//! Routes:
//!
//! - `GET  /`                  input form
//! - `POST /`                  form submission, renders the result page
//! - `GET  /static/style.css`  stylesheet
//! - `POST /api/predict`       JSON request and response
//! - `GET  /health`            liveness plus whether the model loaded
//!
//! The model is loaded once at startup. When it cannot be loaded the server
//! still starts, and every prediction answers `503 Service Unavailable`.

pub mod error;
pub mod pages;
pub mod server;

pub use error::{Result, WebError};
pub use server::{WebServer, WebState};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
