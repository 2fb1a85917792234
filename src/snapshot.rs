// Headless export of the three surfaces as PNG files.
// Visual: right.png, left.png and combined.png look exactly like the
// canvases in the window (blurred label on white).

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use log::debug;

use crate::app::{App, View};
use crate::config::BACKGROUND;
use crate::error::Error;
use crate::raster::flatten_onto;

/// Render pending changes, then write one PNG per view into `dir`
/// (created if missing). Returns the written paths.
pub fn write_pngs(app: &mut App, dir: &Path) -> Result<Vec<PathBuf>, Error> {
    app.redraw_if_dirty()?;
    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(View::ALL.len());
    for view in View::ALL {
        let surface = app.surface(view);
        let flat = flatten_onto(surface, BACKGROUND);
        let width = surface.width;
        let img = RgbImage::from_fn(surface.width as u32, surface.height as u32, |x, y| {
            let px = flat[y as usize * width + x as usize];
            Rgb([(px >> 16) as u8, (px >> 8) as u8, px as u8])
        });

        let path = dir.join(format!("{}.png", view.name()));
        img.save(&path)?;
        debug!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}
