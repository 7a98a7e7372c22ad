//! # analyst-core
//!
//! Trading analysis client with a provider-agnostic generative-model seam.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Analyst                             │
//! │  ┌─────────────┐  ┌─────────────┐  ┌──────────────────────┐  │
//! │  │   Prompt    │  │   Parse     │  │   LlmProvider        │  │
//! │  │  + Schema   │──│ JSON/fence  │──│   (Strategy)         │  │
//! │  └─────────────┘  └─────────────┘  └──────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//!          ▲
//!          │ Ticket / AnalysisReport
//!   ┌──────┴──────┐
//!   │ QueryState  │  validation, loading, stale-response discard
//!   └─────────────┘
//! ```
//!
//! The model is an opaque collaborator: the analyst only relies on the text
//! it returns and the grounding chunks attached to it.

pub mod analyst;
pub mod display;
pub mod error;
pub mod message;
pub mod model;
pub mod parse;
pub mod prompt;
pub mod provider;
pub mod query;

pub use analyst::{Analyst, AnalystConfig, OutputMode};
pub use error::{AnalystError, Result};
pub use message::{Message, Role};
pub use model::{AnalysisReport, AnalysisResult, Recommendation, Source};
pub use provider::LlmProvider;
pub use query::{QueryState, Ticket, DEFAULT_SYMBOL};
