//! Metric helpers for `folio`.
//!
//! This module defines metric names and simple helper functions wrapping the
//! [`metrics`](https://docs.rs/metrics) crate. Without the `metrics` feature
//! the helpers compile to nothing.

#[cfg(feature = "metrics")]
use metrics::counter;

/// Name of the counter tracking successfully decoded fragments.
pub const FRAGMENTS_DECODED: &str = "folio_fragments_decoded_total";
/// Name of the counter tracking asset names seen with differing payloads.
pub const ASSET_CONFLICTS: &str = "folio_asset_conflicts_total";
/// Name of the counter tracking record store probes.
pub const STORE_PROBES: &str = "folio_store_probes_total";

/// Result of probing one record store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The store held the requested data.
    Matched,
    /// The store was readable but held nothing relevant.
    Empty,
    /// The store could not be opened or queried.
    Failed,
}

impl ProbeOutcome {
    /// Label value recorded for this outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ProbeOutcome::Matched => "matched",
            ProbeOutcome::Empty => "empty",
            ProbeOutcome::Failed => "failed",
        }
    }
}

/// Record a decoded fragment.
pub fn inc_fragments_decoded() {
    #[cfg(feature = "metrics")]
    counter!(FRAGMENTS_DECODED).increment(1);
}

/// Record an asset payload conflict.
pub fn inc_asset_conflicts() {
    #[cfg(feature = "metrics")]
    counter!(ASSET_CONFLICTS).increment(1);
}

/// Record a store probe with its outcome.
pub fn inc_store_probes(outcome: ProbeOutcome) {
    #[cfg(feature = "metrics")]
    counter!(STORE_PROBES, "outcome" => outcome.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = outcome;
}
