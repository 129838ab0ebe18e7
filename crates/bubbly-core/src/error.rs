pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid asset payload: {message}")]
    Payload { message: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
