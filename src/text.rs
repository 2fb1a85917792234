// Label text: font loading, right-to-left ordering and centred drawing.
// Visual: the Hebrew labels appear in the middle of each surface, reading
// right to left, in solid black before any blur is applied.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::error::Error;
use crate::raster::Surface;

/// System fonts tried in order when no font is given. All of these carry
/// Hebrew glyphs on a stock install. DejaVu Sans is last: at label size the
/// longest label runs slightly wider than a surface.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/usr/share/fonts/gnu-free/FreeSans.ttf",
    "/usr/share/fonts/truetype/noto/NotoSansHebrew-Regular.ttf",
    "/usr/share/fonts/noto/NotoSansHebrew-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
];

/// Something that can turn characters into coverage bitmaps.
pub enum Typeface {
    /// A parsed TrueType/OpenType font.
    Font(Box<fontdue::Font>),
    /// Solid bars, one per glyph. Used when no font is available so the
    /// blur still has something to work on.
    Blocks,
}

/// Horizontal placement of text relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// A rasterized glyph: coverage rows top-down plus placement relative to
/// the pen position on the baseline (y grows upward, as fontdue reports it).
struct Glyph {
    xmin: i32,
    ymin: i32,
    width: usize,
    height: usize,
    advance: f32,
    coverage: Vec<u8>,
}

impl Typeface {
    /// Parse a font file.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let bytes = fs::read(path)
            .map_err(|e| Error::FontLoad(format!("{}: {e}", path.display())))?;
        Self::from_bytes(&bytes).map_err(|e| match e {
            Error::FontLoad(msg) => Error::FontLoad(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| Error::FontLoad(e.to_string()))?;
        Ok(Typeface::Font(Box::new(font)))
    }

    /// Pick a typeface: an explicit path must load; otherwise the first
    /// system candidate with Hebrew coverage wins; otherwise `Blocks`.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, Error> {
        if let Some(path) = explicit {
            let face = Self::load(path)?;
            if !face.covers('א') {
                warn!(
                    "font {} has no Hebrew glyphs; labels will show placeholders",
                    path.display()
                );
            }
            info!("using font {}", path.display());
            return Ok(face);
        }

        for candidate in FONT_CANDIDATES.iter().map(PathBuf::from) {
            if !candidate.is_file() {
                continue;
            }
            match Self::load(&candidate) {
                Ok(face) if face.covers('א') => {
                    info!("using font {}", candidate.display());
                    return Ok(face);
                }
                Ok(_) => debug!("skipping {}: no Hebrew glyphs", candidate.display()),
                Err(e) => debug!("skipping {}: {e}", candidate.display()),
            }
        }

        warn!("no usable system font found; drawing labels as blocks (pass --font to fix)");
        Ok(Typeface::Blocks)
    }

    /// Whether this face has a real glyph for `ch`.
    pub fn covers(&self, ch: char) -> bool {
        match self {
            Typeface::Font(font) => font.lookup_glyph_index(ch) != 0,
            Typeface::Blocks => true,
        }
    }

    /// (ascent, descent) in pixels; descent is negative (below baseline).
    fn line_metrics(&self, size: f32) -> (f32, f32) {
        match self {
            Typeface::Font(font) => font
                .horizontal_line_metrics(size)
                .map(|m| (m.ascent, m.descent))
                .unwrap_or((size * 0.8, -size * 0.2)),
            Typeface::Blocks => (size * 0.8, -size * 0.2),
        }
    }

    fn advance(&self, ch: char, size: f32) -> f32 {
        match self {
            Typeface::Font(font) => font.metrics(ch, size).advance_width,
            Typeface::Blocks => block_advance(ch, size),
        }
    }

    fn kern(&self, left: char, right: char, size: f32) -> f32 {
        match self {
            Typeface::Font(font) => font.horizontal_kern(left, right, size).unwrap_or(0.0),
            Typeface::Blocks => 0.0,
        }
    }

    fn glyph(&self, ch: char, size: f32) -> Glyph {
        match self {
            Typeface::Font(font) => {
                let (m, coverage) = font.rasterize(ch, size);
                Glyph {
                    xmin: m.xmin,
                    ymin: m.ymin,
                    width: m.width,
                    height: m.height,
                    advance: m.advance_width,
                    coverage,
                }
            }
            Typeface::Blocks => {
                let advance = block_advance(ch, size);
                if ch.is_whitespace() {
                    return Glyph {
                        xmin: 0,
                        ymin: 0,
                        width: 0,
                        height: 0,
                        advance,
                        coverage: Vec::new(),
                    };
                }
                let width = (size * 0.45).round().max(1.0) as usize;
                let height = (size * 0.7).round().max(1.0) as usize;
                Glyph {
                    xmin: (size * 0.05).round() as i32,
                    ymin: 0,
                    width,
                    height,
                    advance,
                    coverage: vec![255; width * height],
                }
            }
        }
    }
}

fn block_advance(ch: char, size: f32) -> f32 {
    if ch.is_whitespace() { size * 0.25 } else { size * 0.5 }
}

/// Hebrew, Arabic, Syriac, Thaana, NKo and the RTL presentation forms.
pub fn is_rtl(ch: char) -> bool {
    matches!(ch as u32, 0x0590..=0x08FF | 0xFB1D..=0xFDFF | 0xFE70..=0xFEFF)
}

/// Letters and digits that keep left-to-right order inside RTL text.
fn is_ltr(ch: char) -> bool {
    ch.is_alphanumeric() && !is_rtl(ch)
}

/// Start of an LTR run: a letter/digit, or a sign directly before a digit.
fn starts_ltr(chars: &[char], i: usize) -> bool {
    is_ltr(chars[i])
        || (matches!(chars[i], '-' | '+')
            && chars.get(i + 1).is_some_and(|c| c.is_ascii_digit()))
}

/// Bracket pairs swap when their run is reversed.
fn mirror(ch: char) -> char {
    match ch {
        '(' => ')',
        ')' => '(',
        '[' => ']',
        ']' => '[',
        '{' => '}',
        '}' => '{',
        '<' => '>',
        '>' => '<',
        other => other,
    }
}

/// True when the first strong letter is right-to-left.
pub fn is_rtl_text(text: &str) -> bool {
    text.chars()
        .find(|c| is_rtl(*c) || c.is_alphabetic())
        .is_some_and(is_rtl)
}

/// Reorder `text` for drawing left to right.
///
/// RTL text is reversed while runs of Latin letters and signed numbers
/// (with the spaces and punctuation between them) keep their reading order. LTR text
/// is returned as is. Hebrew has no contextual shaping, so this is enough
/// for the labels this app draws.
pub fn visual_order(text: &str) -> String {
    if !is_rtl_text(text) {
        return text.to_string();
    }
    let chars: Vec<char> = text.chars().collect();
    let mut segments: Vec<&[char]> = Vec::new();
    let mirrored: Vec<char> = chars.iter().map(|c| mirror(*c)).collect();

    let mut i = 0;
    while i < chars.len() {
        if starts_ltr(&chars, i) {
            // Swallow neutrals only while another LTR char follows before any RTL.
            let mut end = i + 1;
            let mut j = i + 1;
            while j < chars.len() && !is_rtl(chars[j]) {
                if is_ltr(chars[j]) {
                    end = j + 1;
                }
                j += 1;
            }
            segments.push(&chars[i..end]);
            i = end;
        } else {
            segments.push(&mirrored[i..i + 1]);
            i += 1;
        }
    }

    segments.into_iter().rev().flatten().collect()
}

/// (width, height) of `text` at `size`: summed advances and the line box.
pub fn measure(face: &Typeface, text: &str, size: f32) -> (f32, f32) {
    let visual = visual_order(text);
    let (ascent, descent) = face.line_metrics(size);
    (advance_width(face, &visual, size), ascent - descent)
}

fn advance_width(face: &Typeface, visual: &str, size: f32) -> f32 {
    let mut width = 0.0;
    let mut prev: Option<char> = None;
    for ch in visual.chars() {
        if let Some(p) = prev {
            width += face.kern(p, ch, size);
        }
        width += face.advance(ch, size);
        prev = Some(ch);
    }
    width
}

/// Draw `text` with its line box vertically centred on `y` and aligned
/// horizontally on `x`.
#[allow(clippy::too_many_arguments)]
pub fn draw_text(
    surface: &mut Surface,
    face: &Typeface,
    text: &str,
    size: f32,
    x: f32,
    y: f32,
    align: Align,
    color: u32,
) {
    let visual = visual_order(text);
    let width = advance_width(face, &visual, size);
    let (ascent, descent) = face.line_metrics(size);

    let mut pen = match align {
        Align::Left => x,
        Align::Center => x - width / 2.0,
        Align::Right => x - width,
    };
    // Middle of the line box sits on `y`.
    let baseline = y + (ascent + descent) / 2.0;

    let mut prev: Option<char> = None;
    for ch in visual.chars() {
        if let Some(p) = prev {
            pen += face.kern(p, ch, size);
        }
        let g = face.glyph(ch, size);
        let left = (pen + g.xmin as f32).round() as i32;
        let top = (baseline - g.ymin as f32 - g.height as f32).round() as i32;
        for row in 0..g.height {
            for col in 0..g.width {
                let cov = g.coverage[row * g.width + col];
                surface.blend(left + col as i32, top + row as i32, color, cov);
            }
        }
        pen += g.advance;
        prev = Some(ch);
    }
}

/// Draw `text` centred on the surface, both axes.
pub fn draw_text_centered(
    surface: &mut Surface,
    face: &Typeface,
    text: &str,
    size: f32,
    color: u32,
) {
    let cx = surface.width as f32 / 2.0;
    let cy = surface.height as f32 / 2.0;
    draw_text(surface, face, text, size, cx, cy, Align::Center, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        CANVAS_HEIGHT, CANVAS_WIDTH, COMBINED_LABEL, LABEL_FONT_SIZE, LEFT_LABEL, RIGHT_LABEL,
        TEXT_COLOR,
    };
    use crate::raster::alpha;

    #[test]
    fn hebrew_is_reversed() {
        assert_eq!(visual_order("עין ימין"), "ןימי ןיע");
        assert_eq!(visual_order("abc def"), "abc def");
    }

    #[test]
    fn digits_keep_their_order_in_rtl() {
        assert_eq!(visual_order("ציר: 45"), "45 :ריצ");
        assert_eq!(visual_order("מספר: -2.25"), "-2.25 :רפסמ");
        assert_eq!(visual_order("בדיקה - עין"), "ןיע - הקידב");
    }

    #[test]
    fn latin_runs_stay_together() {
        assert_eq!(visual_order("עין OD 2"), "OD 2 ןיע");
    }

    #[test]
    fn brackets_mirror() {
        assert_eq!(visual_order("(שלום)"), "(םולש)");
    }

    #[test]
    fn base_direction_from_first_strong_letter() {
        assert!(is_rtl_text("12 בדיקה"));
        assert!(!is_rtl_text("12 test בדיקה"));
        assert!(!is_rtl_text("123"));
    }

    #[test]
    fn block_text_is_centred() {
        let mut s = Surface::new(200, 60);
        draw_text_centered(&mut s, &Typeface::Blocks, "ab", 20.0, 0xFF00_0000);

        let painted: Vec<(usize, usize)> = (0..60)
            .flat_map(|y| (0..200).map(move |x| (x, y)))
            .filter(|(x, y)| alpha(s.get(*x, *y)) > 0)
            .collect();
        assert!(!painted.is_empty());

        let min_x = painted.iter().map(|p| p.0).min().unwrap_or(0) as i32;
        let max_x = painted.iter().map(|p| p.0).max().unwrap_or(0) as i32;
        let min_y = painted.iter().map(|p| p.1).min().unwrap_or(0) as i32;
        let max_y = painted.iter().map(|p| p.1).max().unwrap_or(0) as i32;
        assert!(min_x < 100 && max_x > 100);
        assert!((min_x - (199 - max_x)).abs() <= 4, "x {min_x}..{max_x}");
        assert!(min_y < 30 && max_y > 20, "y {min_y}..{max_y}");
    }

    #[test]
    fn measure_blocks() {
        let (w, h) = measure(&Typeface::Blocks, "a b", 10.0);
        assert!((w - (5.0 + 2.5 + 5.0)).abs() < 1e-4);
        assert!((h - 10.0).abs() < 1e-4);
    }

    #[test]
    fn fixed_labels_fit_in_blocks() {
        for label in [RIGHT_LABEL, LEFT_LABEL, COMBINED_LABEL] {
            let (w, _) = measure(&Typeface::Blocks, label, LABEL_FONT_SIZE);
            assert!(w <= CANVAS_WIDTH as f32, "{label}: {w}");

            let mut s = Surface::new(CANVAS_WIDTH, CANVAS_HEIGHT);
            draw_text_centered(&mut s, &Typeface::Blocks, label, LABEL_FONT_SIZE, TEXT_COLOR);
            let edge_ink = (0..CANVAS_HEIGHT)
                .any(|y| alpha(s.get(0, y)) > 0 || alpha(s.get(CANVAS_WIDTH - 1, y)) > 0);
            assert!(!edge_ink, "{label}");
        }
    }

    #[test]
    fn bad_font_bytes_fail() {
        assert!(matches!(Typeface::from_bytes(b"not a font"), Err(Error::FontLoad(_))));
        assert!(Typeface::load(Path::new("/nonexistent/font.ttf")).is_err());
    }
}
