// Draws one label and blurs it in place.
// Visual: after `render` the surface shows only the blurred label; a sharp
// copy never stays on screen.

use log::debug;

use crate::config::{FilterMode, LABEL_FONT_SIZE, TEXT_COLOR};
use crate::error::Error;
use crate::raster::{Surface, composite_blurred};
use crate::text::{Typeface, draw_text_centered};

/// Off-screen buffers reused between renders of the same target.
struct Scratch {
    /// Unmodified snapshot of the sharp label.
    copy: Surface,
    /// Row-blurred intermediate between the two filter passes.
    pass: Surface,
}

/// Renders labels onto one target surface.
///
/// Each target gets its own renderer so scratch buffers are never shared.
/// They are allocated on first use and replaced if the target size changes.
pub struct SurfaceRenderer {
    mode: FilterMode,
    scratch: Option<Scratch>,
    #[cfg(test)]
    fail_alloc: bool,
}

impl SurfaceRenderer {
    pub fn new(mode: FilterMode) -> Self {
        Self {
            mode,
            scratch: None,
            #[cfg(test)]
            fail_alloc: false,
        }
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: FilterMode) {
        self.mode = mode;
    }

    /// Clear `target`, draw `text` centred in black, then replace it with
    /// its blurred version (`blur_x` along rows, `blur_y` along columns).
    ///
    /// The only failure is allocating the scratch buffers; `target` is left
    /// holding the sharp label in that case.
    pub fn render(
        &mut self,
        target: &mut Surface,
        face: &Typeface,
        text: &str,
        blur_x: f32,
        blur_y: f32,
    ) -> Result<(), Error> {
        // 1) + 2) Blank surface, then the sharp label.
        target.clear();
        draw_text_centered(target, face, text, LABEL_FONT_SIZE, TEXT_COLOR);

        let (sx, sy) = match self.mode {
            FilterMode::Directional => (blur_x, blur_y),
            FilterMode::Chained => {
                let s = blur_x.hypot(blur_y);
                (s, s)
            }
        };
        debug!(
            "render {:?}: blur {:.3}x{:.3} -> sigma {:.3}x{:.3}",
            text, blur_x, blur_y, sx, sy
        );

        // 3) + 4) Snapshot into the off-screen copy.
        let scratch = self.scratch_for(target)?;
        scratch.copy.copy_from(target)?;

        // 5) Nothing of the sharp label may survive on the target.
        target.clear();

        // 6) Filter the copy back onto the target.
        composite_blurred(target, &scratch.copy, &mut scratch.pass, sx, sy)?;

        // 7) The filter lives only in this call; nothing to reset.
        Ok(())
    }

    /// Scratch buffers matching `target`, allocating them if needed.
    fn scratch_for(&mut self, target: &Surface) -> Result<&mut Scratch, Error> {
        let fits = self
            .scratch
            .as_ref()
            .is_some_and(|s| s.copy.same_size(target));
        if !fits {
            self.scratch = None;
        }
        match &mut self.scratch {
            Some(s) => Ok(s),
            slot => {
                debug!("allocating scratch {}x{}", target.width, target.height);
                #[cfg(test)]
                if self.fail_alloc {
                    return Err(Error::SurfaceAlloc { width: target.width, height: target.height });
                }
                let scratch = Scratch {
                    copy: Surface::try_new(target.width, target.height)?,
                    pass: Surface::try_new(target.width, target.height)?,
                };
                Ok(slot.insert(scratch))
            }
        }
    }

    /// Make every later scratch allocation fail, as if memory ran out.
    #[cfg(test)]
    pub(crate) fn fail_allocations(&mut self) {
        self.fail_alloc = true;
        self.scratch = None;
    }

    #[cfg(test)]
    fn scratch_ptr(&self) -> Option<*const u32> {
        self.scratch.as_ref().map(|s| s.copy.pixels.as_ptr())
    }

    #[cfg(test)]
    fn scratch_size(&self) -> Option<(usize, usize)> {
        self.scratch.as_ref().map(|s| (s.copy.width, s.copy.height))
    }
}
