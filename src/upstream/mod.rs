//! Outbound client subsystem.
//!
//! # Data Flow
//! ```text
//! Route handler / aggregator
//!     → types.rs (OutboundRequest: url + headers + query params)
//!     → client.rs (Upstream::fetch, exactly one GET)
//!     → OutboundResult (JSON payload or FetchFailure)
//! ```
//!
//! # Design Decisions
//! - Failures are values: `fetch` never returns early with `?` past this layer
//! - The `Upstream` trait is the seam handlers and the aggregator depend on
//! - No retries and no timeout beyond the transport default

pub mod client;
pub mod types;

pub use client::{ReqwestUpstream, Upstream};
pub use types::{FetchFailure, OutboundRequest, OutboundResult};
