pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("chart contains duplicate bubble id: {id}")]
    DuplicateId { id: String },
}
