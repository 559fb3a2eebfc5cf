use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Usage errors raised synchronously at the call site.
///
/// None of these leave partial state behind: a failed registration creates no
/// entry and a rejected action touches no entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("reducer name '{0}' is already bound to a different reducer")]
    DuplicateName(String),

    #[error("invalid action: {0}")]
    InvalidAction(String),

    #[error("action type '{0}' already exists")]
    DuplicateActionType(String),
}

impl StoreError {
    pub fn invalid_action(msg: impl Into<String>) -> Self {
        StoreError::InvalidAction(msg.into())
    }
}
