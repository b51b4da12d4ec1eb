use thiserror::Error;

/// Everything that can go wrong while loading or querying benchmark data
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    /// Malformed input at load time. Fatal, never coerced.
    #[error("invalid {context}: {reason}")]
    Validation { context: String, reason: String },

    #[error("metric `{0}` is not present")]
    MetricNotFound(String),

    #[error("concurrency level {level} was not measured for `{metric}`")]
    LevelNotFound { metric: String, level: u32 },

    #[error("relative change is undefined for {context}: reference value is zero")]
    DivisionUndefined { context: String },

    #[error("no thresholds configured for metric `{0}`")]
    ThresholdsMissing(String),
}

impl AnalyticsError {
    pub fn validation(context: impl Into<String>, reason: impl Into<String>) -> Self {
        AnalyticsError::Validation {
            context: context.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
