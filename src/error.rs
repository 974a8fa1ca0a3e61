use thiserror::Error;

/// Main error type for schema generation
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("{message}")]
    Config { message: String },

    #[error("Adapter error: {message}")]
    Adapter { message: String },

    #[error("No tables found in database {database}")]
    EmptySchema { database: String },

    #[error("Normalization error: {message}")]
    Normalization { message: String },

    #[error("Name collision: {message}")]
    NameCollision { message: String },

    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias used throughout the pipeline
pub type GeneratorResult<T> = Result<T, GeneratorError>;

impl GeneratorError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn adapter(message: impl Into<String>) -> Self {
        Self::Adapter { message: message.into() }
    }

    pub fn empty_schema(database: impl Into<String>) -> Self {
        Self::EmptySchema { database: database.into() }
    }

    pub fn normalization(message: impl Into<String>) -> Self {
        Self::Normalization { message: message.into() }
    }

    pub fn name_collision(message: impl Into<String>) -> Self {
        Self::NameCollision { message: message.into() }
    }

    /// Whether the error was raised before any database round-trip
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}
