pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Record not found: {0}")]
    RecordNotFound(i64),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Invalid order by field: {0}")]
    InvalidOrderByField(String),
}
