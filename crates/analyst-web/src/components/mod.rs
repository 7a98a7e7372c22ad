//! UI Components

mod analysis;
mod form;
mod layout;

pub use analysis::AnalysisDisplay;
pub use form::InputForm;
pub use layout::{ErrorBanner, Footer, Header, LoadingSpinner};
