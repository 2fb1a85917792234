//! Blurview: draws three labels and blurs them the way an uncorrected
//! glasses prescription would, one surface per eye plus a combined view.

pub mod app;
pub mod blur;
pub mod config;
pub mod draw;
pub mod error;
pub mod logging;
pub mod prescription;
pub mod raster;
pub mod renderer;
pub mod snapshot;
pub mod text;

pub use app::{App, View};
pub use blur::{BlurRadii, combine, compute};
pub use error::Error;
pub use prescription::{Eye, Field, PrescriptionState};
pub use raster::Surface;
pub use renderer::SurfaceRenderer;
pub use text::Typeface;
