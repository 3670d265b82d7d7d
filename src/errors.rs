use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Ring has only {vertices} distinct vertices; a loop needs at least 3")]
    MalformedRing { vertices: usize },

    #[error("Feature property {key:?} is missing or is not a string")]
    MissingAttribute { key: String },

    #[error("Corrupt index data: {0}")]
    CorruptData(String),

    #[error("Record field is {len} bytes, too long for its length prefix")]
    Encoding { len: usize },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid GeoJSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
