//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → server.rs (Axum setup, CORS, request ID, tracing)
//!     → extract.rs (credential headers + query → typed structs)
//!     → auth.rs (single passthrough) | returns.rs (GSTR-1A fan-out)
//!     → response.rs (Envelope, or ApiError with mapped status)
//!     → Send to client
//! ```

pub mod auth;
pub mod cors;
pub mod extract;
pub mod request;
pub mod response;
pub mod returns;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::{ApiError, Envelope};
pub use server::{build_router, AppState, HttpServer};
