// Fixed sizes, labels and the command line.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::prescription::PrescriptionState;

/// Power at which defocus blur saturates.
pub const MAX_POWER: f32 = 6.0;
/// Largest blur (pixels) that power alone can produce.
pub const MAX_BLUR: f32 = 8.0;

/// Size of each of the three label surfaces.
pub const CANVAS_WIDTH: usize = 400;
pub const CANVAS_HEIGHT: usize = 100;

pub const LABEL_FONT_SIZE: f32 = 40.0;
pub const UI_FONT_SIZE: f32 = 16.0;

/// Premultiplied opaque black (label fill).
pub const TEXT_COLOR: u32 = 0xFF_00_00_00;
/// Page behind the (transparent) surfaces.
pub const BACKGROUND: u32 = 0x00_FF_FF_FF;

pub const RIGHT_LABEL: &str = "בדיקת ראיה - עין ימין";
pub const LEFT_LABEL: &str = "בדיקת ראיה - עין שמאל";
pub const COMBINED_LABEL: &str = "בדיקת ראיה משולבת";

pub const RIGHT_CAPTION: &str = "עין ימין";
pub const LEFT_CAPTION: &str = "עין שמאל";
pub const COMBINED_CAPTION: &str = "שילוב בין שתי העיניים";

pub const POWER_CAPTION: &str = "מספר";
pub const CYLINDER_CAPTION: &str = "צילינדר";
pub const AXIS_CAPTION: &str = "ציר";

/// Environment variable consulted when `--font` is not given.
pub const FONT_ENV: &str = "BLURVIEW_FONT";

pub const WINDOW_TITLE: &str = "Blurview: directional blur";
pub const TARGET_FPS: usize = 60;

/// How the two blur radii are applied to a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FilterMode {
    /// Horizontal pass with `blur_x`, vertical pass with `blur_y`.
    #[default]
    Directional,
    /// Two chained isotropic blurs, as a browser evaluates
    /// `blur(x) blur(y)`; both axes get sqrt(x² + y²).
    Chained,
}

#[derive(Debug, Parser)]
#[command(
    name = "blurview",
    about = "Simulate blurred vision from a glasses prescription",
    version
)]
pub struct Args {
    /// TrueType/OpenType font with Hebrew glyphs
    #[arg(long, env = FONT_ENV)]
    pub font: Option<PathBuf>,

    /// Directory for right.png, left.png and combined.png (S key)
    #[arg(long, value_name = "DIR")]
    pub snapshot: Option<PathBuf>,

    /// Write the snapshots once without opening a window, then exit
    #[arg(long, requires = "snapshot")]
    pub headless: bool,

    /// Initial right eye as POWER,CYLINDER[,AXIS]
    #[arg(long, value_name = "P,C,A", allow_hyphen_values = true)]
    pub right: Option<PrescriptionState>,

    /// Initial left eye as POWER,CYLINDER[,AXIS]
    #[arg(long, value_name = "P,C,A", allow_hyphen_values = true)]
    pub left: Option<PrescriptionState>,

    /// How blur radii are applied
    #[arg(long, value_enum, default_value_t = FilterMode::Directional)]
    pub filter: FilterMode,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Runtime settings the app needs once arguments are parsed.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub right: PrescriptionState,
    pub left: PrescriptionState,
    pub filter: FilterMode,
    /// Where the `S` key writes snapshots; none disables the key.
    pub snapshot_dir: Option<PathBuf>,
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Self {
            right: args.right.unwrap_or_default(),
            left: args.left.unwrap_or_default(),
            filter: args.filter,
            snapshot_dir: args.snapshot.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_initial_prescriptions() {
        let args = Args::try_parse_from([
            "blurview",
            "--right",
            "-3,2,45",
            "--left",
            "1.5,0",
            "--filter",
            "chained",
        ])
        .unwrap();
        let cfg = Config::from(&args);
        assert_eq!(cfg.right, PrescriptionState::new(-3.0, 2.0, 45.0));
        assert_eq!(cfg.left, PrescriptionState::new(1.5, 0.0, 0.0));
        assert_eq!(cfg.filter, FilterMode::Chained);
        assert!(cfg.snapshot_dir.is_none());
    }

    #[test]
    fn headless_needs_a_snapshot_dir() {
        assert!(Args::try_parse_from(["blurview", "--headless"]).is_err());
        let args =
            Args::try_parse_from(["blurview", "--headless", "--snapshot", "out"]).unwrap();
        assert!(args.headless);
        assert_eq!(Config::from(&args).snapshot_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn rejects_bad_prescription() {
        assert!(Args::try_parse_from(["blurview", "--right", "x,y"]).is_err());
    }

    #[test]
    fn defaults_are_sharp_and_directional() {
        let args = Args::try_parse_from(["blurview"]).unwrap();
        let cfg = Config::from(&args);
        assert_eq!(cfg.right, PrescriptionState::default());
        assert_eq!(cfg.filter, FilterMode::Directional);
    }
}
