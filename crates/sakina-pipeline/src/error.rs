//! Pipeline error taxonomy with fatal/recovered classification.
//!
//! Only two kinds abort a request; everything else degrades into an explicit
//! safety annotation on a successful response.
//!
//! | Kind                    | Fatal | Surfaced as                              |
//! |-------------------------|-------|------------------------------------------|
//! | Configuration           | yes   | boundary error before any provider call  |
//! | Generation              | yes   | boundary error                           |
//! | ValidationUnavailable   | no    | annotated pass-through + disclaimer note |
//! | Regeneration            | no    | original reply + could-not-modify note   |

use thiserror::Error;

use crate::client::ProviderError;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Provider credential or endpoint configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The primary generation call failed. There is no safe reply without a
    /// primary draft, so this aborts the request.
    #[error("primary generation failed: {0}")]
    Generation(#[source] ProviderError),

    /// The validator call failed or its output could not be decoded.
    #[error("validation unavailable: {0}")]
    ValidationUnavailable(String),

    /// A modification attempt failed. The original draft is still usable.
    #[error("regeneration failed: {0}")]
    Regeneration(#[source] ProviderError),
}

impl PipelineError {
    /// Returns `true` if this error must abort the request rather than
    /// degrade into an annotated response.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::Generation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_is_fatal() {
        assert!(PipelineError::Configuration("no key".into()).is_fatal());
    }

    #[test]
    fn generation_is_fatal() {
        let e = PipelineError::Generation(ProviderError::Completion("503".into()));
        assert!(e.is_fatal());
    }

    #[test]
    fn validation_unavailable_is_recovered() {
        assert!(!PipelineError::ValidationUnavailable("bad json".into()).is_fatal());
    }

    #[test]
    fn regeneration_is_recovered() {
        let e = PipelineError::Regeneration(ProviderError::Timeout { seconds: 30 });
        assert!(!e.is_fatal());
    }
}
