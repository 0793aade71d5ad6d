//! Application error type.

use std::path::PathBuf;

use body_gesture::SensorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("no loadable images found in {0}")]
    NoImages(PathBuf),

    #[error("cannot read image list {path}: {source}")]
    ImageList {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode {path}: {source}")]
    Decode {
        path:   PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid config {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("window: {0}")]
    Window(String),

    #[error(transparent)]
    Sensor(#[from] SensorError),

    #[error("cannot start gesture thread: {0}")]
    Thread(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GalleryError>;
