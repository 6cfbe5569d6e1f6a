use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Api Error: {0}")]
    Api(#[from] ApiError),
    #[error("Capture Error: {0}")]
    Capture(#[from] CaptureError),
    #[error("Configuration Error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Ui Error: {0}")]
    Ui(String),
}

// Errors from the remote inspection service
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("The session has expired")]
    SessionExpired,
    #[error("Request to the inspection service failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Login failed: {0}")]
    Login(String),
    #[error("Signup failed: {0}")]
    Signup(String),
    #[error("Unexpected response from the inspection service: {0}")]
    UnexpectedResponse(String),
}

// Errors from camera capture sources
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Failed to fetch snapshot: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("Failed to read frame file {1}: {0}")]
    Read(std::io::Error, String),
    #[error("Failed to decode frame: {0}")]
    Decode(#[from] image::ImageError),
    #[error("No frame available: {0}")]
    Unavailable(String),
}
