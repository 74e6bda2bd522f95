use reqwest::StatusCode;
use thiserror::Error;

/// Failure modes of a single suggestion lookup.
///
/// All three resolve to "clear the suggestion list" in the controller path;
/// none is surfaced as a user-visible error. Callers that want diagnostics
/// subscribe to [`crate::ControllerEvent::LookupFailed`].
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("suggestion request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("suggestion endpoint returned status {0}")]
    BadStatus(StatusCode),
    #[error("lookup superseded by newer input")]
    Canceled,
}
