//! GST API gateway library.
//!
//! Forwards authentication and GSTR-1A requests from a browser client to the
//! GST API, and fans the GSTR-1A sections out in parallel for
//! `/gstr1a/json_returns`.

pub mod config;
pub mod gstr1a;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
