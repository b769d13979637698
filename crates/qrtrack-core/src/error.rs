#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("surface is not attached")]
    Detached,

    #[error("failed to encode overlay: {0}")]
    Encode(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
