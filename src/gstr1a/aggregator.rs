//! Parallel fan-out over GSTR-1A sections.
//!
//! # Responsibilities
//! - Build one outbound request per requested section
//! - Run every request as its own task and join on all of them
//! - Turn task panics into per-section failures
//! - Merge outcomes in request order
//!
//! # Design Decisions
//! - A failing section never cancels or hides its siblings
//! - Request order, not completion order, drives the merged map
//! - Optional semaphore cap; unbounded unless configured

use futures_util::future::join_all;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::Instrument;

use crate::gstr1a::registry::SubResource;
use crate::observability::metrics;
use crate::upstream::{FetchFailure, OutboundRequest, OutboundResult, Upstream};

/// Everything needed to fan out one `json_returns` call.
#[derive(Debug, Clone)]
pub struct AggregationRequest {
    pub base_url: String,
    pub sections: Vec<SubResource>,
    pub headers: Vec<(String, String)>,
    pub params: Vec<(String, String)>,
}

impl AggregationRequest {
    fn outbound_for(&self, section: SubResource) -> OutboundRequest {
        OutboundRequest::get(
            section_url(&self.base_url, section),
            self.headers.clone(),
            self.params.clone(),
        )
    }
}

/// URL of one section under a caller-supplied base.
pub fn section_url(base_url: &str, section: SubResource) -> String {
    format!("{}/gstr1a/{}", base_url, section)
}

/// Defects in the join/merge step itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregationError {
    #[error("section '{0}' was merged twice")]
    DuplicateSection(SubResource),
}

/// Per-section outcomes in request order.
#[derive(Debug, Clone, Default)]
pub struct AggregationResult {
    entries: Vec<(SubResource, OutboundResult)>,
}

impl AggregationResult {
    pub fn insert(
        &mut self,
        section: SubResource,
        outcome: OutboundResult,
    ) -> Result<(), AggregationError> {
        if self.get(section).is_some() {
            return Err(AggregationError::DuplicateSection(section));
        }
        self.entries.push((section, outcome));
        Ok(())
    }

    pub fn get(&self, section: SubResource) -> Option<&OutboundResult> {
        self.entries
            .iter()
            .find(|(s, _)| *s == section)
            .map(|(_, outcome)| outcome)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn sections(&self) -> impl Iterator<Item = SubResource> + '_ {
        self.entries.iter().map(|(s, _)| *s)
    }

    pub fn failure_count(&self) -> usize {
        self.entries.iter().filter(|(_, o)| o.is_err()).count()
    }

    /// JSON object of section → payload, or `{"error": message}` for failures.
    pub fn to_json(&self) -> Value {
        let mut data = Map::with_capacity(self.entries.len());
        for (section, outcome) in &self.entries {
            let value = match outcome {
                Ok(payload) => payload.clone(),
                Err(failure) => serde_json::json!({ "error": failure.to_string() }),
            };
            data.insert(section.as_str().to_string(), value);
        }
        Value::Object(data)
    }
}

/// Concurrent dispatcher for GSTR-1A sections.
pub struct Aggregator {
    upstream: Arc<dyn Upstream>,
    max_concurrency: Option<usize>,
}

impl Aggregator {
    pub fn new(upstream: Arc<dyn Upstream>, max_concurrency: Option<usize>) -> Self {
        Self {
            upstream,
            max_concurrency,
        }
    }

    /// Fetch every requested section and merge the outcomes.
    ///
    /// Individual failures are recorded per section; only a defect in the
    /// merge itself produces an `Err`.
    pub async fn aggregate(
        &self,
        request: &AggregationRequest,
    ) -> Result<AggregationResult, AggregationError> {
        let start_time = Instant::now();
        let limiter = self.max_concurrency.map(|n| Arc::new(Semaphore::new(n)));

        tracing::debug!(
            sections = request.sections.len(),
            max_concurrency = ?self.max_concurrency,
            "Dispatching GSTR1A fan-out"
        );

        let handles: Vec<_> = request
            .sections
            .iter()
            .map(|&section| {
                let upstream = Arc::clone(&self.upstream);
                let outbound = request.outbound_for(section);
                let limiter = limiter.clone();
                let span = tracing::debug_span!("gstr1a_section", section = %section);

                tokio::spawn(fetch_section(upstream, outbound, limiter).instrument(span))
            })
            .collect();

        let joined = join_all(handles).await;

        let mut result = AggregationResult::default();
        for (&section, outcome) in request.sections.iter().zip(joined) {
            let outcome = outcome.unwrap_or_else(|join_err| {
                tracing::error!(section = %section, error = %join_err, "Section task aborted");
                Err(FetchFailure::TaskFailed(join_err.to_string()))
            });
            result.insert(section, outcome)?;
        }

        metrics::record_fanout(result.len(), result.failure_count(), start_time);
        tracing::info!(
            sections = result.len(),
            failures = result.failure_count(),
            elapsed = ?start_time.elapsed(),
            "GSTR1A fan-out complete"
        );
        Ok(result)
    }
}

async fn fetch_section(
    upstream: Arc<dyn Upstream>,
    outbound: OutboundRequest,
    limiter: Option<Arc<Semaphore>>,
) -> OutboundResult {
    let _permit = match limiter {
        Some(sem) => match sem.acquire_owned().await {
            Ok(permit) => Some(permit),
            Err(e) => {
                return Err(FetchFailure::TaskFailed(format!(
                    "concurrency limiter closed: {}",
                    e
                )))
            }
        },
        None => None,
    };
    upstream.fetch(outbound).await
}
