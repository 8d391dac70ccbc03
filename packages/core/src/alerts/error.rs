use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    /// Required credentials or sender are not configured. Raised before
    /// any network activity.
    #[error("email transport not configured: {0}")]
    MissingConfig(String),

    #[error("{0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("{0}")]
    Delivery(String),
}
