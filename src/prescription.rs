// Per-eye prescription state and the slider ranges that keep it valid.
// Visual: each value here is what one slider in the control panel shows.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Which eye a prescription belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Eye {
    Right,
    Left,
}

impl Eye {
    pub const ALL: [Eye; 2] = [Eye::Right, Eye::Left];
}

/// One adjustable field of a prescription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Power,
    Cylinder,
    Axis,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Power, Field::Cylinder, Field::Axis];

    /// Slider range and step for this field.
    pub fn range(self) -> FieldRange {
        match self {
            Field::Power => FieldRange { min: -6.0, max: 6.0, step: 0.25 },
            Field::Cylinder => FieldRange { min: 0.0, max: 6.0, step: 0.25 },
            Field::Axis => FieldRange { min: 0.0, max: 180.0, step: 1.0 },
        }
    }
}

/// Inclusive slider range with a fixed step, anchored at `min`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl FieldRange {
    /// Clamp into range and snap to the nearest step.
    /// Non-finite input falls back to `min` so the state never holds NaN.
    pub fn normalize(&self, value: f32) -> f32 {
        if !value.is_finite() {
            return self.min;
        }
        let clamped = value.clamp(self.min, self.max);
        let steps = ((clamped - self.min) / self.step).round();
        (self.min + steps * self.step).clamp(self.min, self.max)
    }

    /// Position of `value` along the range in [0, 1].
    pub fn fraction(&self, value: f32) -> f32 {
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    /// Inverse of [`fraction`](Self::fraction), snapped.
    pub fn value_at(&self, t: f32) -> f32 {
        self.normalize(self.min + t.clamp(0.0, 1.0) * (self.max - self.min))
    }
}

/// Power, cylinder and axis for one eye.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PrescriptionState {
    pub power: f32,
    pub cylinder: f32,
    pub axis: f32,
}

impl PrescriptionState {
    pub fn new(power: f32, cylinder: f32, axis: f32) -> Self {
        Self { power, cylinder, axis }
    }

    pub fn get(&self, field: Field) -> f32 {
        match field {
            Field::Power => self.power,
            Field::Cylinder => self.cylinder,
            Field::Axis => self.axis,
        }
    }

    /// Store `value` after clamping and snapping it to the field's slider.
    /// Returns true when the stored value actually changed.
    pub fn set(&mut self, field: Field, value: f32) -> bool {
        let value = field.range().normalize(value);
        let slot = match field {
            Field::Power => &mut self.power,
            Field::Cylinder => &mut self.cylinder,
            Field::Axis => &mut self.axis,
        };
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }

    /// The axis slider only appears while there is some cylinder.
    /// Its value is kept when hidden.
    pub fn axis_visible(&self) -> bool {
        self.cylinder > 0.0
    }

    /// Fields the control panel shows for this state, top to bottom.
    pub fn visible_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| *f != Field::Axis || self.axis_visible())
            .collect()
    }
}

impl fmt::Display for PrescriptionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+.2} / {:.2} x {:.0}", self.power, self.cylinder, self.axis)
    }
}

/// Parses `power,cylinder,axis` as given on the command line.
/// Axis may be omitted; values are normalised to the slider ranges.
impl FromStr for PrescriptionState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(Error::InvalidPrescription(format!(
                "expected POWER,CYLINDER[,AXIS], got {s:?}"
            )));
        }
        let num = |p: &str| {
            p.parse::<f32>()
                .map_err(|e| Error::InvalidPrescription(format!("{p:?}: {e}")))
        };

        let mut state = PrescriptionState::default();
        state.set(Field::Power, num(parts[0])?);
        state.set(Field::Cylinder, num(parts[1])?);
        if let Some(axis) = parts.get(2) {
            state.set(Field::Axis, num(axis)?);
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_clamps_and_snaps() {
        let power = Field::Power.range();
        assert_eq!(power.normalize(7.3), 6.0);
        assert_eq!(power.normalize(-9.0), -6.0);
        assert_eq!(power.normalize(1.1), 1.0);
        assert_eq!(power.normalize(1.2), 1.25);
        assert_eq!(power.normalize(f32::NAN), -6.0);

        let axis = Field::Axis.range();
        assert_eq!(axis.normalize(44.6), 45.0);
        assert_eq!(axis.normalize(200.0), 180.0);
    }

    #[test]
    fn set_reports_changes_only() {
        let mut s = PrescriptionState::default();
        assert!(s.set(Field::Cylinder, 1.5));
        assert!(!s.set(Field::Cylinder, 1.5));
        assert!(!s.set(Field::Cylinder, 1.49));
        assert_eq!(s.cylinder, 1.5);
    }

    #[test]
    fn axis_hidden_without_cylinder_but_kept() {
        let mut s = PrescriptionState::new(0.0, 1.0, 30.0);
        assert_eq!(s.visible_fields(), vec![Field::Power, Field::Cylinder, Field::Axis]);

        s.set(Field::Cylinder, 0.0);
        assert!(!s.axis_visible());
        assert_eq!(s.visible_fields(), vec![Field::Power, Field::Cylinder]);
        assert_eq!(s.axis, 30.0);
    }

    #[test]
    fn value_at_round_trips_slider_ends() {
        let cyl = Field::Cylinder.range();
        assert_eq!(cyl.value_at(0.0), 0.0);
        assert_eq!(cyl.value_at(1.0), 6.0);
        assert_eq!(cyl.value_at(0.5), 3.0);
        assert_eq!(cyl.fraction(3.0), 0.5);
    }

    #[test]
    fn parse_from_cli() {
        let s: PrescriptionState = "-3, 2, 45".parse().unwrap();
        assert_eq!(s, PrescriptionState::new(-3.0, 2.0, 45.0));

        let s: PrescriptionState = "1.3,0".parse().unwrap();
        assert_eq!(s, PrescriptionState::new(1.25, 0.0, 0.0));

        assert!("1".parse::<PrescriptionState>().is_err());
        assert!("a,b,c".parse::<PrescriptionState>().is_err());
    }
}
