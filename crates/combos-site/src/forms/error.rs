use resource_store::StoreError;

/// Why a form could not be saved.
///
/// `Display` is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// A required field is missing; nothing was sent.
    #[error("{0}")]
    Validation(String),
    #[error("You don't have permission to perform these changes.")]
    PermissionDenied,
    #[error(
        "One or more {resource}s couldn't be found. Maybe someone else modified this {resource} while you were?"
    )]
    NotFound { resource: &'static str },
    #[error("An error occurred while saving data. No changes have been made.")]
    Rejected(u16),
    #[error("An error occurred while saving data. No changes have been made.")]
    Network(String),
    #[error("An error occurred while saving data. No changes have been made.")]
    Internal(String),
}

impl FormError {
    pub fn validation(message: impl Into<String>) -> Self {
        FormError::Validation(message.into())
    }

    /// Maps a failed write to the message class the user sees.
    pub fn from_store(error: StoreError, resource: &'static str) -> Self {
        match error {
            StoreError::Status(401 | 403) => FormError::PermissionDenied,
            StoreError::Status(404) => FormError::NotFound { resource },
            StoreError::Status(status) => FormError::Rejected(status),
            StoreError::Transport(e) => FormError::Network(e.to_string()),
            other => FormError::Internal(other.to_string()),
        }
    }

    pub fn user_message(&self) -> String {
        self.to_string()
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, FormError::Validation(_))
    }
}
