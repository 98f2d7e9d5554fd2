use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum CurtainError {
    #[error("Device not found")]
    DeviceNotFound,

    #[error("Missing deviceId")]
    MissingDeviceId,

    #[error("Invalid pagination: page and limit must be at least 1")]
    InvalidPagination,
}

impl CurtainError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CurtainError::DeviceNotFound => StatusCode::NOT_FOUND,
            CurtainError::MissingDeviceId => StatusCode::BAD_REQUEST,
            CurtainError::InvalidPagination => StatusCode::BAD_REQUEST,
        }
    }
}
