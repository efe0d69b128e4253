use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Login failed: {0}")]
    Auth(String),

    #[error("Session expired: {0}")]
    SessionExpired(String),

    #[error("Flashcard store error: {0}")]
    Store(String),

    #[error("Invalid input: {0}")]
    Validation(&'static str),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(Box<reqwest::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("Background worker panicked")]
    Worker,
}

/// Coarse grouping used to decide how a failure is surfaced to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    AuthFailure,
    StoreFailure,
    ValidationFailure,
    ConfigFailure,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Auth(_) | AppError::SessionExpired(_) => ErrorKind::AuthFailure,
            AppError::Validation(_) => ErrorKind::ValidationFailure,
            AppError::Config(_) => ErrorKind::ConfigFailure,
            AppError::Store(_)
            | AppError::Http(_)
            | AppError::Json(_)
            | AppError::Io(_)
            | AppError::Worker => ErrorKind::StoreFailure,
        }
    }

    /// The message without its category prefix, for dialogs whose heading already names it.
    pub fn detail(&self) -> String {
        match self {
            AppError::Auth(reason)
            | AppError::SessionExpired(reason)
            | AppError::Store(reason)
            | AppError::Config(reason) => reason.clone(),
            other => other.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        AppError::Io(Box::new(error))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        // Request URLs may carry credentials.
        AppError::Http(Box::new(error.without_url()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_count_as_store_failures() {
        let io = AppError::from(std::io::Error::other("disk gone"));
        assert_eq!(io.kind(), ErrorKind::StoreFailure);
        assert_eq!(AppError::Worker.kind(), ErrorKind::StoreFailure);
        assert_eq!(
            AppError::Validation("front text is empty").kind(),
            ErrorKind::ValidationFailure
        );
        assert_eq!(AppError::Auth("nope".into()).kind(), ErrorKind::AuthFailure);
        assert_eq!(
            AppError::SessionExpired("401".into()).kind(),
            ErrorKind::AuthFailure
        );
    }

    #[test]
    fn detail_drops_the_category_prefix() {
        let err = AppError::Auth("400 Bad Request: INVALID_PASSWORD".into());
        assert_eq!(err.to_string(), "Login failed: 400 Bad Request: INVALID_PASSWORD");
        assert_eq!(err.detail(), "400 Bad Request: INVALID_PASSWORD");
        assert_eq!(AppError::Worker.detail(), "Background worker panicked");
    }

    #[test]
    fn transport_errors_hide_the_request_url() {
        let err = reqwest::blocking::Client::new()
            .get("http://127.0.0.1:1/v1/token?key=secret-key")
            .send()
            .unwrap_err();
        let message = AppError::from(err).to_string();
        assert!(!message.contains("secret-key"), "{message}");
    }
}
