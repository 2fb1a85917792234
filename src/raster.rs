// Software rasterizer: pixel surfaces, source-over blending and a separable
// Gaussian blur filter.
// Visual: everything you see in the window passes through a `Surface`.
// Label surfaces start transparent; the window frame is opaque.

use crate::error::Error;

/// A 2D pixel surface. Each pixel is premultiplied 0xAARRGGBB; 0 is fully
/// transparent. minifb ignores the top byte, so an opaque surface can be
/// presented directly.
#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl Surface {
    /// A transparent surface.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    /// Like [`new`](Self::new) but reports allocation failure instead of aborting.
    pub fn try_new(width: usize, height: usize) -> Result<Self, Error> {
        let len = width
            .checked_mul(height)
            .ok_or(Error::SurfaceAlloc { width, height })?;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| Error::SurfaceAlloc { width, height })?;
        pixels.resize(len, 0);
        Ok(Self { width, height, pixels })
    }

    pub fn same_size(&self, other: &Surface) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Fill with a single colour.
    pub fn fill(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    /// Copy pixels from a surface of the same size, unmodified.
    pub fn copy_from(&mut self, src: &Surface) -> Result<(), Error> {
        if !self.same_size(src) {
            return Err(Error::SurfaceSize(format!(
                "copy {}x{} into {}x{}",
                src.width, src.height, self.width, self.height
            )));
        }
        self.pixels.copy_from_slice(&src.pixels);
        Ok(())
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }

    /// Overwrite a pixel if (x,y) is inside bounds.
    #[inline]
    pub fn put(&mut self, x: i32, y: i32, color: u32) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        self.pixels[y * self.width + x] = color;
    }

    /// Source-over `color` (premultiplied) scaled by `coverage` (0..=255).
    /// Visual: antialiased glyph edges fade into whatever is underneath.
    #[inline]
    pub fn blend(&mut self, x: i32, y: i32, color: u32, coverage: u8) {
        if coverage == 0 || x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = y * self.width + x;
        let src = unpack(color).map(|c| c * coverage as f32 / 255.0);
        let dst = unpack(self.pixels[idx]);
        let keep = 1.0 - src[0] / 255.0;
        self.pixels[idx] = pack([
            src[0] + dst[0] * keep,
            src[1] + dst[1] * keep,
            src[2] + dst[2] * keep,
            src[3] + dst[3] * keep,
        ]);
    }

    /// Count of pixels with any alpha.
    pub fn painted_pixels(&self) -> usize {
        self.pixels.iter().filter(|p| alpha(**p) > 0).count()
    }
}

/// Alpha byte of a packed pixel.
#[inline]
pub fn alpha(px: u32) -> u8 {
    (px >> 24) as u8
}

/// 0xAARRGGBB -> [a, r, g, b] as f32 in 0..=255.
#[inline]
fn unpack(px: u32) -> [f32; 4] {
    [
        ((px >> 24) & 0xFF) as f32,
        ((px >> 16) & 0xFF) as f32,
        ((px >> 8) & 0xFF) as f32,
        (px & 0xFF) as f32,
    ]
}

/// [a, r, g, b] -> 0xAARRGGBB, rounded. Colour is capped at alpha so the
/// result stays a valid premultiplied pixel.
#[inline]
fn pack(c: [f32; 4]) -> u32 {
    let a = c[0].round().clamp(0.0, 255.0) as u32;
    let ch = |v: f32| (v.round().clamp(0.0, 255.0) as u32).min(a);
    (a << 24) | (ch(c[1]) << 16) | (ch(c[2]) << 8) | ch(c[3])
}

/// Normalised 1D Gaussian with standard deviation `sigma`, truncated at 3σ.
/// `sigma <= 0` (or NaN) gives the identity kernel `[1.0]`.
pub fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return vec![1.0];
    }
    let radius = (sigma * 3.0).ceil() as i32;
    let denom = 2.0 * sigma * sigma;
    let mut weights: Vec<f32> = (-radius..=radius)
        .map(|i| (-((i * i) as f32) / denom).exp())
        .collect();

    // Normalise to sum 1 so a flat area keeps its brightness.
    let sum: f32 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

/// One horizontal convolution pass: `dst[x] = Σ k[i] * src[x + i - r]`.
/// Samples past the left/right edges are transparent.
pub fn filter_horizontal(src: &Surface, dst: &mut Surface, kernel: &[f32]) -> Result<(), Error> {
    if !src.same_size(dst) {
        return Err(Error::SurfaceSize("filter_horizontal: src↔dst".into()));
    }
    let w = src.width as i32;
    let r = (kernel.len() / 2) as i32;

    for y in 0..src.height {
        let row = y * src.width;
        for x in 0..w {
            let mut acc = [0.0f32; 4];
            for (i, k) in kernel.iter().enumerate() {
                let sx = x + i as i32 - r;
                if sx < 0 || sx >= w {
                    continue;
                }
                let p = src.pixels[row + sx as usize];
                if p == 0 {
                    continue;
                }
                let c = unpack(p);
                for ch in 0..4 {
                    acc[ch] += k * c[ch];
                }
            }
            dst.pixels[row + x as usize] = pack(acc);
        }
    }
    Ok(())
}

/// One vertical convolution pass; same edge rule as [`filter_horizontal`].
pub fn filter_vertical(src: &Surface, dst: &mut Surface, kernel: &[f32]) -> Result<(), Error> {
    if !src.same_size(dst) {
        return Err(Error::SurfaceSize("filter_vertical: src↔dst".into()));
    }
    let w = src.width;
    let h = src.height as i32;
    let r = (kernel.len() / 2) as i32;

    for x in 0..w {
        for y in 0..h {
            let mut acc = [0.0f32; 4];
            for (i, k) in kernel.iter().enumerate() {
                let sy = y + i as i32 - r;
                if sy < 0 || sy >= h {
                    continue;
                }
                let p = src.pixels[sy as usize * w + x];
                if p == 0 {
                    continue;
                }
                let c = unpack(p);
                for ch in 0..4 {
                    acc[ch] += k * c[ch];
                }
            }
            dst.pixels[y as usize * w + x] = pack(acc);
        }
    }
    Ok(())
}

/// Draw `src` into `dst` through a directional Gaussian blur: σ = `blur_x`
/// along rows, then σ = `blur_y` along columns. `pass` holds the
/// intermediate row-blurred image. `dst` is expected to be cleared, so
/// writing the filtered pixels is the same as compositing them over it.
pub fn composite_blurred(
    dst: &mut Surface,
    src: &Surface,
    pass: &mut Surface,
    blur_x: f32,
    blur_y: f32,
) -> Result<(), Error> {
    if !src.same_size(dst) || !src.same_size(pass) {
        return Err(Error::SurfaceSize("composite_blurred".into()));
    }
    filter_horizontal(src, pass, &gaussian_kernel(blur_x))?;
    filter_vertical(pass, dst, &gaussian_kernel(blur_y))?;
    Ok(())
}

/// Composite `surface` over an opaque `background` (0x00RRGGBB) and return
/// opaque 0x00RRGGBB pixels ready for the window or a PNG.
pub fn flatten_onto(surface: &Surface, background: u32) -> Vec<u32> {
    let bg = unpack(background | 0xFF00_0000);
    surface
        .pixels
        .iter()
        .map(|&p| {
            let c = unpack(p);
            let keep = 1.0 - c[0] / 255.0;
            let ch = |i: usize| (c[i] + bg[i] * keep).round().clamp(0.0, 255.0) as u32;
            (ch(1) << 16) | (ch(2) << 8) | ch(3)
        })
        .collect()
}
