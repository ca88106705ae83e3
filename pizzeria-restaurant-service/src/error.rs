#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },
    #[error("{entity} {id} does not exist")]
    MissingReference { entity: &'static str, id: i32 },
    #[error(transparent)]
    Validation(#[from] crate::models::ValidationError),
    #[error("database error: {0}")]
    Query(#[from] diesel::result::Error),
    #[error("connection error: {0}")]
    Connection(#[from] diesel::ConnectionError),
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("migration failed: {0}")]
    Migration(String),
}
