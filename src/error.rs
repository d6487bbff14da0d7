use thiserror::Error;

/// Failures surfaced to callers of the generation orchestrator.
///
/// Compression problems are absorbed inside the orchestrator and never appear
/// here; everything from prompt submission onward propagates as one of these.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Missing or empty API credential. Checked before any network attempt.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The service answered with an empty or unparseable response body.
    #[error("no content generated by the model")]
    NoContentGenerated,

    /// The service answered, but without an image. Usually a policy refusal.
    #[error("the model did not return an image: {0}")]
    ModelRefused(String),

    /// Non-success HTTP status from the generation service.
    #[error("generation API error: {status} {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure, surfaced verbatim.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl GenerateError {
    /// True when resending the same request may plausibly succeed.
    ///
    /// Refusals are excluded: the retry path for those is the explicit
    /// cache-bypassing resend, chosen by the user.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NoContentGenerated | Self::Network(_) => true,
            Self::Api { status, .. } => *status >= 500,
            Self::Configuration(_) | Self::ModelRefused(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, GenerateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(GenerateError::NoContentGenerated.is_retryable());
        assert!(
            GenerateError::Api {
                status: 503,
                message: "overloaded".into()
            }
            .is_retryable()
        );

        assert!(
            !GenerateError::Api {
                status: 400,
                message: "bad request".into()
            }
            .is_retryable()
        );
        assert!(!GenerateError::Configuration("no key".into()).is_retryable());
        assert!(!GenerateError::ModelRefused("safety".into()).is_retryable());
    }

    #[test]
    fn refusal_display_is_user_actionable() {
        let err = GenerateError::ModelRefused(
            "It might have refused the request due to safety policies.".into(),
        );
        assert!(err.to_string().contains("did not return an image"));
    }
}
