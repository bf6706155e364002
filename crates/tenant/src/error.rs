use thiserror::Error;

pub type Result<T> = std::result::Result<T, TenantError>;

#[derive(Debug, Error)]
pub enum TenantError {
    #[error("Public suffix classifier unavailable: {0}")]
    ClassifierUnavailable(String),

    #[error("Invalid dbfilter pattern '{pattern}': {source}")]
    PatternCompile {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl TenantError {
    pub fn classifier_unavailable(reason: impl std::fmt::Display) -> Self {
        Self::ClassifierUnavailable(reason.to_string())
    }
}
