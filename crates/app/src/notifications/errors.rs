//! Notification errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Message(String),

    #[error("failed to deliver message: {0}")]
    Transport(String),

    #[error("delivery task failed")]
    Task(#[from] tokio::task::JoinError),
}
