//! GSTR-1A return aggregation.
//!
//! # Data Flow
//! ```text
//! endpoints_str (comma-separated, optional)
//!     → registry.rs (allow-list check, defaults, de-duplication)
//!     → aggregator.rs (one task per section, join all, ordered merge)
//!     → AggregationResult (section → payload | failure)
//! ```

pub mod aggregator;
pub mod registry;

pub use aggregator::{AggregationError, AggregationRequest, AggregationResult, Aggregator};
pub use registry::{validate, InvalidEndpoints, SubResource};
