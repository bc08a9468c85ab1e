// Error type for the overlay and its host.
// Every variant states *where* things went wrong.
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String),   // Creating the window failed
    #[error("Window update error: {0}")]
    WindowUpdate(String), // Updating the window buffer failed
    #[error("Camera init error: {0}")]
    CameraInit(String),   // Opening/starting the camera failed
    #[error("Camera frame error: {0}")]
    CameraFrame(String),  // Grabbing/decoding a frame failed
    #[error("Buffer size mismatch: {0}")]
    SizeMismatch(String), // Two buffers that must line up do not
    #[error("Detector error: {0}")]
    Detector(String),     // Starting the decoder thread failed

    /// Asked for framing geometry before the provider has any.
    #[error("framing rectangle is not available yet")]
    FramingRectUnavailable,

    #[error("Config error in {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigSource,
    },

    #[error("Asset error: {0}")]
    Asset(#[from] image::ImageError),
}

/// What went wrong while reading a config file.
#[derive(Debug, Error)]
pub enum ConfigSource {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] serde_json::Error),
}
