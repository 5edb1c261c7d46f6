use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManagerError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("monitoring engine manager has not been started")]
    NotStarted,
}

impl ManagerError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        ManagerError::InvalidArgument(message.into())
    }
}
