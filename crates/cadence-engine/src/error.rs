use thiserror::Error;

/// Engine errors - combines rule, store, and core failures
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    RuleError(#[from] cadence_rule::error::RuleError),

    #[error(transparent)]
    StoreError(#[from] crate::store::StoreError),

    #[error(transparent)]
    CoreError(#[from] cadence_core::error::CoreError),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
