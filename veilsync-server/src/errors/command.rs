use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown directive: {0}")]
    InvalidDirective(String),

    #[error("Invalid command target: {0:?}")]
    InvalidTarget(String),

    #[error("Command channel rejected the directive: {0}")]
    Rejected(String),

    #[error("Command channel did not accept the directive within {0} ms")]
    Timeout(u64),
}

impl CommandError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CommandError::InvalidDirective(_) => StatusCode::BAD_REQUEST,
            CommandError::InvalidTarget(_) => StatusCode::BAD_REQUEST,
            CommandError::Rejected(_) => StatusCode::BAD_GATEWAY,
            CommandError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}
