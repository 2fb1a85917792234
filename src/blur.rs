// Maps a prescription to a directional blur.
// Visual: power blurs the label evenly; cylinder stretches the blur along
// the axis direction (0° = horizontal smear, 90° = vertical smear).

use crate::config::{MAX_BLUR, MAX_POWER};
use crate::prescription::PrescriptionState;

/// Horizontal and vertical blur radii in pixels. Both are always >= 0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BlurRadii {
    pub blur_x: f32,
    pub blur_y: f32,
}

impl BlurRadii {
    /// Radii for one eye using the app's fixed `MAX_POWER` / `MAX_BLUR`.
    pub fn from_state(state: &PrescriptionState) -> Self {
        compute(state.power, state.cylinder, state.axis, MAX_POWER, MAX_BLUR)
    }

    /// True when neither axis blurs (the label stays sharp).
    pub fn is_sharp(&self) -> bool {
        self.blur_x == 0.0 && self.blur_y == 0.0
    }
}

/// Blur radii for a single eye.
///
/// Defocus (`power`) scales linearly up to `max_blur`; astigmatism
/// (`cylinder`) adds `2 * |cylinder|` split between the axes by `axis`
/// (degrees). No input validation: any finite input gives finite,
/// non-negative radii as long as `max_power != 0`.
pub fn compute(power: f32, cylinder: f32, axis: f32, max_power: f32, max_blur: f32) -> BlurRadii {
    let base = (power.abs() / max_power.abs() * max_blur).min(max_blur);
    let cylinder_blur = cylinder.abs() * 2.0;
    let rad = axis.to_radians();

    let blur_x = base + rad.cos() * cylinder_blur;
    let blur_y = base + rad.sin() * cylinder_blur;

    BlurRadii {
        blur_x: blur_x.abs(),
        blur_y: blur_y.abs(),
    }
}

/// Component-wise mean of two eyes' radii (the combined view).
pub fn combine(a: BlurRadii, b: BlurRadii) -> BlurRadii {
    BlurRadii {
        blur_x: (a.blur_x + b.blur_x) / 2.0,
        blur_y: (a.blur_y + b.blur_y) / 2.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < EPS
    }

    fn base(p: f32) -> f32 {
        (p.abs() / 6.0 * 8.0).min(8.0)
    }

    #[test]
    fn no_cylinder_blurs_evenly_for_any_axis() {
        for p in [-6.0, -3.5, -0.25, 0.0, 1.0, 4.75, 6.0] {
            for axis in [0.0, 33.0, 90.0, 180.0, 271.0] {
                let r = compute(p, 0.0, axis, 6.0, 8.0);
                assert!(close(r.blur_x, base(p)), "p={p} axis={axis} {r:?}");
                assert!(close(r.blur_y, base(p)), "p={p} axis={axis} {r:?}");
            }
        }
    }

    #[test]
    fn axis_zero_goes_horizontal() {
        for c in [0.25, 1.0, 3.0, 6.0] {
            let r = compute(-2.0, c, 0.0, 6.0, 8.0);
            assert!(close(r.blur_x, base(-2.0) + 2.0 * c));
            assert!(close(r.blur_y, base(-2.0)));
        }
    }

    #[test]
    fn axis_ninety_goes_vertical() {
        for c in [0.25, 1.0, 3.0, 6.0] {
            let r = compute(1.5, c, 90.0, 6.0, 8.0);
            assert!(close(r.blur_x, base(1.5)));
            assert!(close(r.blur_y, base(1.5) + 2.0 * c));
        }
    }

    #[test]
    fn radii_never_negative() {
        let mut p = -6.0;
        while p <= 6.0 {
            let mut c = -6.0;
            while c <= 6.0 {
                let mut axis = 0.0;
                while axis <= 180.0 {
                    let r = compute(p, c, axis, 6.0, 8.0);
                    assert!(r.blur_x >= 0.0 && r.blur_y >= 0.0, "{p} {c} {axis} {r:?}");
                    axis += 15.0;
                }
                c += 0.75;
            }
            p += 0.75;
        }
    }

    #[test]
    fn axis_past_one_eighty_is_still_finite() {
        // 180° flips cos, so the sum goes negative and abs() folds it back.
        let r = compute(0.0, 3.0, 180.0, 6.0, 8.0);
        assert!(close(r.blur_x, 6.0));
        assert!(close(r.blur_y, 0.0));

        let r = compute(2.0, 1.0, 720.5, 6.0, 8.0);
        assert!(r.blur_x.is_finite() && r.blur_y.is_finite());
    }

    #[test]
    fn full_power_caps_at_max_blur() {
        let r = compute(6.0, 0.0, 0.0, 6.0, 8.0);
        assert_eq!(r, BlurRadii { blur_x: 8.0, blur_y: 8.0 });

        let r = compute(12.0, 0.0, 0.0, 6.0, 8.0);
        assert_eq!(r, BlurRadii { blur_x: 8.0, blur_y: 8.0 });
    }

    #[test]
    fn emmetropic_eye_is_sharp() {
        let r = BlurRadii::from_state(&PrescriptionState::default());
        assert!(r.is_sharp());
    }

    #[test]
    fn oblique_axis_splits_cylinder() {
        let r = compute(-3.0, 2.0, 45.0, 6.0, 8.0);
        assert!(close(r.blur_x, 6.828_427));
        assert!(close(r.blur_y, 6.828_427));
    }

    #[test]
    fn combined_is_the_mean() {
        let left = BlurRadii::from_state(&PrescriptionState::new(-3.0, 2.0, 45.0));
        let right = BlurRadii::from_state(&PrescriptionState::new(1.0, 0.5, 120.0));
        let both = combine(left, right);
        assert!(close(both.blur_x, (left.blur_x + right.blur_x) / 2.0));
        assert!(close(both.blur_y, (left.blur_y + right.blur_y) / 2.0));
        assert_eq!(combine(left, right), combine(right, left));
    }
}
