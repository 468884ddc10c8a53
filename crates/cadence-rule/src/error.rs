use thiserror::Error;

/// Errors raised while building or expanding a recurrence rule.
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    #[error("Unsupported rule: {0}")]
    UnsupportedRule(&'static str),

    #[error(transparent)]
    CoreError(#[from] cadence_core::error::CoreError),
}

pub type RuleResult<T> = std::result::Result<T, RuleError>;
