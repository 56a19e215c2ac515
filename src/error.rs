// One error type for the whole crate.
// Every variant states *where* things went wrong.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A size or scale handed to the coordinate mapper is unusable
    /// (zero, negative, NaN or infinite).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Window init error: {0}")]
    WindowInit(String),

    #[error("Window update error: {0}")]
    WindowUpdate(String),

    #[error("Camera init error: {0}")]
    CameraInit(String),

    #[error("Camera frame error: {0}")]
    CameraFrame(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Config error: {0}")]
    Config(String),

    /// A recorded detector result could not be parsed.
    #[error("Replay error at line {line}: {message}")]
    Replay { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
