//! Query Orchestration
//!
//! Request lifecycle behind the input box: validation, loading, clearing the
//! previous result and applying the completion. Requests are tagged with a
//! sequence number so a slow response can never overwrite a newer one.

use crate::error::{AnalystError, ANALYSIS_UNAVAILABLE_MESSAGE, EMPTY_SYMBOL_MESSAGE};
use crate::model::AnalysisReport;

/// Symbol analyzed on first load
pub const DEFAULT_SYMBOL: &str = "BTC/USD";

/// Trim and uppercase a user-typed symbol
pub fn normalize_symbol(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Handle for one in-flight request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ticket {
    pub seq: u64,
    pub symbol: String,
}

/// UI state for the analysis view
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryState {
    pub loading: bool,
    pub error: Option<String>,
    pub report: Option<AnalysisReport>,
    seq: u64,
}

impl QueryState {
    /// State before the first query; the view starts in loading because the
    /// default symbol is analyzed immediately
    pub fn initial() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    /// Sequence number of the latest request
    pub const fn latest_seq(&self) -> u64 {
        self.seq
    }

    /// Start a request for `raw`.
    ///
    /// Empty input sets the validation message and returns `None`: no
    /// request must be issued. Otherwise the previous report and error are
    /// cleared and a ticket for the new request is returned.
    pub fn begin(&mut self, raw: &str) -> Option<Ticket> {
        let symbol = normalize_symbol(raw);
        if symbol.is_empty() {
            self.error = Some(EMPTY_SYMBOL_MESSAGE.into());
            return None;
        }

        self.seq += 1;
        self.loading = true;
        self.error = None;
        self.report = None;

        Some(Ticket { seq: self.seq, symbol })
    }

    /// Apply the outcome of a request.
    ///
    /// Returns `false` and leaves the state untouched when a newer request
    /// has started since `ticket` was issued.
    pub fn finish(
        &mut self,
        ticket: &Ticket,
        outcome: Result<AnalysisReport, AnalystError>,
    ) -> bool {
        if ticket.seq != self.seq {
            tracing::debug!(
                symbol = %ticket.symbol,
                seq = ticket.seq,
                latest = self.seq,
                "discarding stale analysis"
            );
            return false;
        }

        self.loading = false;
        match outcome {
            Ok(report) => {
                self.report = Some(report);
                self.error = None;
            }
            Err(e) => {
                tracing::error!(symbol = %ticket.symbol, error = %e, "analysis failed");
                self.report = None;
                self.error = Some(if e.is_validation() {
                    e.user_message()
                } else {
                    ANALYSIS_UNAVAILABLE_MESSAGE.into()
                });
            }
        }
        true
    }
}
