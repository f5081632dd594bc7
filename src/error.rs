use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiceFertError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(
        "Insufficient leaf area: {leaf_pixels} leaf-colored pixels found (minimum {minimum})"
    )]
    InsufficientLeafArea { leaf_pixels: usize, minimum: usize },

    #[error("Invalid pixel buffer: {len} bytes is not a multiple of the {stride}-byte stride")]
    InvalidPixelBuffer { len: usize, stride: usize },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, RiceFertError>;
