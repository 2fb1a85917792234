// One error type for the whole app.
// Every variant states *where* things went wrong.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Creating the window failed.
    #[error("Window init error: {0}")]
    WindowInit(String),

    /// Pushing a frame to the window failed.
    #[error("Window update error: {0}")]
    WindowUpdate(String),

    /// A font file was found but could not be read or parsed.
    #[error("Font load error: {0}")]
    FontLoad(String),

    /// The off-screen scratch surface could not be allocated.
    #[error("Surface allocation failed for {width}x{height}")]
    SurfaceAlloc { width: usize, height: usize },

    /// Two surfaces that must match in size did not.
    #[error("Surface size mismatch: {0}")]
    SurfaceSize(String),

    /// A `P,C,A` triple on the command line did not parse.
    #[error("Invalid prescription: {0}")]
    InvalidPrescription(String),

    #[error("Snapshot encode error: {0}")]
    Snapshot(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
