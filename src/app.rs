// Application state: both prescriptions, the three label surfaces and the
// control panel.
// Visual: three stacked rows. Each row has a 400×100 label surface on the
// left and its sliders (or, for the combined row, a caption) on the right.
// Any change to a slider re-renders every surface on the next frame.

use log::{debug, error, info};

use crate::blur::{BlurRadii, combine};
use crate::config::{
    self, BACKGROUND, CANVAS_HEIGHT, CANVAS_WIDTH, Config, FilterMode, UI_FONT_SIZE,
};
use crate::draw::{self, Command, Rect};
use crate::error::Error;
use crate::prescription::{Eye, Field, PrescriptionState};
use crate::raster::{Surface, flatten_onto};
use crate::renderer::SurfaceRenderer;
use crate::snapshot;
use crate::text::{Align, Typeface, draw_text};

const MARGIN: f32 = 20.0;
const ROW_HEIGHT: f32 = 150.0;
const PANEL_GAP: f32 = 30.0;
const PANEL_WIDTH: f32 = 240.0;
const SLIDER_PITCH: f32 = 36.0;
const TRACK_HEIGHT: f32 = 4.0;
const THUMB_RADIUS: f32 = 7.0;

const INK: u32 = 0xFF_20_20_20;
const MUTED: u32 = 0xFF_70_70_70;
const BORDER: u32 = 0xFF_C8_C8_C8;
const TRACK: u32 = 0xFF_D6_D6_D6;
const ACCENT: u32 = 0xFF_3B_82_F6;
const FOCUS: u32 = 0xFF_1D_4E_D8;

pub const WINDOW_WIDTH: usize =
    (MARGIN + CANVAS_WIDTH as f32 + PANEL_GAP + PANEL_WIDTH + MARGIN) as usize;
pub const WINDOW_HEIGHT: usize = (MARGIN + 3.0 * ROW_HEIGHT) as usize;

/// One of the three label surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Right,
    Left,
    Combined,
}

impl View {
    pub const ALL: [View; 3] = [View::Right, View::Left, View::Combined];

    fn index(self) -> usize {
        match self {
            View::Right => 0,
            View::Left => 1,
            View::Combined => 2,
        }
    }

    /// The fixed label drawn (and blurred) on this surface.
    pub fn label(self) -> &'static str {
        match self {
            View::Right => config::RIGHT_LABEL,
            View::Left => config::LEFT_LABEL,
            View::Combined => config::COMBINED_LABEL,
        }
    }

    /// Caption shown above the controls for this row.
    pub fn caption(self) -> &'static str {
        match self {
            View::Right => config::RIGHT_CAPTION,
            View::Left => config::LEFT_CAPTION,
            View::Combined => config::COMBINED_CAPTION,
        }
    }

    /// File stem used for snapshots.
    pub fn name(self) -> &'static str {
        match self {
            View::Right => "right",
            View::Left => "left",
            View::Combined => "combined",
        }
    }

    fn eye(self) -> Option<Eye> {
        match self {
            View::Right => Some(Eye::Right),
            View::Left => Some(Eye::Left),
            View::Combined => None,
        }
    }
}

/// Identifies one slider in the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SliderId {
    pub eye: Eye,
    pub field: Field,
}

/// Where everything sits in the window for the current state.
#[derive(Debug, Clone)]
pub struct Layout {
    pub canvases: [Rect; 3],
    /// Visible sliders, top to bottom, with their track rectangles.
    pub sliders: Vec<(SliderId, Rect)>,
}

impl Layout {
    pub fn slider_at(&self, x: f32, y: f32) -> Option<(SliderId, Rect)> {
        self.sliders
            .iter()
            .copied()
            .find(|(_, track)| track.inflate(THUMB_RADIUS + 2.0).contains(x, y))
    }

    pub fn track(&self, id: SliderId) -> Option<Rect> {
        self.sliders.iter().find(|(s, _)| *s == id).map(|(_, r)| *r)
    }
}

fn field_caption(field: Field) -> &'static str {
    match field {
        Field::Power => config::POWER_CAPTION,
        Field::Cylinder => config::CYLINDER_CAPTION,
        Field::Axis => config::AXIS_CAPTION,
    }
}

fn format_value(field: Field, value: f32) -> String {
    match field {
        Field::Axis => format!("{value:.0}"),
        _ => format!("{value:.2}"),
    }
}

pub struct App {
    config: Config,
    face: Typeface,
    right: PrescriptionState,
    left: PrescriptionState,
    surfaces: [Surface; 3],
    renderers: [SurfaceRenderer; 3],
    dirty: bool,
    focus: Option<SliderId>,
    drag: Option<SliderId>,
}

impl App {
    pub fn new(config: Config, face: Typeface) -> Result<Self, Error> {
        let surface = || Surface::try_new(CANVAS_WIDTH, CANVAS_HEIGHT);
        let renderers = [
            SurfaceRenderer::new(config.filter),
            SurfaceRenderer::new(config.filter),
            SurfaceRenderer::new(config.filter),
        ];
        Ok(Self {
            right: config.right,
            left: config.left,
            surfaces: [surface()?, surface()?, surface()?],
            renderers,
            config,
            face,
            dirty: true,
            focus: None,
            drag: None,
        })
    }

    pub fn state(&self, eye: Eye) -> &PrescriptionState {
        match eye {
            Eye::Right => &self.right,
            Eye::Left => &self.left,
        }
    }

    fn state_mut(&mut self, eye: Eye) -> &mut PrescriptionState {
        match eye {
            Eye::Right => &mut self.right,
            Eye::Left => &mut self.left,
        }
    }

    /// Update one field; marks the surfaces for re-render if it changed.
    pub fn set_field(&mut self, eye: Eye, field: Field, value: f32) -> bool {
        let changed = self.state_mut(eye).set(field, value);
        if changed {
            debug!("{eye:?} {field:?} -> {}", self.state(eye).get(field));
            self.dirty = true;
            // A focused axis slider that just disappeared hands focus to its cylinder.
            if let Some(f) = self.focus {
                if f.field == Field::Axis && !self.state(f.eye).axis_visible() {
                    self.focus = Some(SliderId { eye: f.eye, field: Field::Cylinder });
                }
            }
        }
        changed
    }

    /// Both eyes back to zero.
    pub fn reset(&mut self) {
        for eye in Eye::ALL {
            for field in Field::ALL {
                self.set_field(eye, field, 0.0);
            }
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.renderers[0].mode()
    }

    pub fn set_filter_mode(&mut self, mode: FilterMode) {
        if self.filter_mode() == mode {
            return;
        }
        info!("filter mode: {mode:?}");
        for r in &mut self.renderers {
            r.set_mode(mode);
        }
        self.dirty = true;
    }

    /// Blur radii for a view; the combined view averages both eyes.
    pub fn radii(&self, view: View) -> BlurRadii {
        match view.eye() {
            Some(eye) => BlurRadii::from_state(self.state(eye)),
            None => combine(
                BlurRadii::from_state(&self.left),
                BlurRadii::from_state(&self.right),
            ),
        }
    }

    pub fn surface(&self, view: View) -> &Surface {
        &self.surfaces[view.index()]
    }

    /// Re-render all three surfaces. One failing surface does not stop the
    /// others; the first error is returned after all were attempted.
    pub fn redraw(&mut self) -> Result<(), Error> {
        let mut first_err = None;
        for view in View::ALL {
            let radii = self.radii(view);
            let i = view.index();
            let result = self.renderers[i].render(
                &mut self.surfaces[i],
                &self.face,
                view.label(),
                radii.blur_x,
                radii.blur_y,
            );
            if let Err(e) = result {
                error!("rendering {} surface failed: {e}", view.name());
                first_err.get_or_insert(e);
            }
        }
        self.dirty = false;
        first_err.map_or(Ok(()), Err)
    }

    /// Render if anything changed since the last redraw.
    pub fn redraw_if_dirty(&mut self) -> Result<bool, Error> {
        if !self.dirty {
            return Ok(false);
        }
        self.redraw()?;
        Ok(true)
    }

    pub fn layout(&self) -> Layout {
        let panel_x = MARGIN + CANVAS_WIDTH as f32 + PANEL_GAP;
        let mut canvases = [Rect::new(0.0, 0.0, 0.0, 0.0); 3];
        let mut sliders = Vec::new();

        for view in View::ALL {
            let row_y = MARGIN + view.index() as f32 * ROW_HEIGHT;
            canvases[view.index()] =
                Rect::new(MARGIN, row_y, CANVAS_WIDTH as f32, CANVAS_HEIGHT as f32);

            if let Some(eye) = view.eye() {
                for (k, field) in self.state(eye).visible_fields().into_iter().enumerate() {
                    let track_y = row_y + 48.0 + k as f32 * SLIDER_PITCH;
                    sliders.push((
                        SliderId { eye, field },
                        Rect::new(panel_x, track_y, PANEL_WIDTH, TRACK_HEIGHT),
                    ));
                }
            }
        }
        Layout { canvases, sliders }
    }

    /// Mouse input. Pressing on a slider grabs it; moving while held drags
    /// its value; releasing lets go.
    pub fn handle_pointer(&mut self, x: f32, y: f32, down: bool) {
        if !down {
            self.drag = None;
            return;
        }
        let layout = self.layout();
        let grabbed = match self.drag {
            Some(id) => layout.track(id).map(|t| (id, t)),
            None => layout.slider_at(x, y),
        };
        let Some((id, track)) = grabbed else {
            self.drag = None;
            return;
        };
        self.drag = Some(id);
        self.focus = Some(id);
        let t = (x - track.x) / track.w;
        let value = id.field.range().value_at(t);
        self.set_field(id.eye, id.field, value);
    }

    pub fn focused(&self) -> Option<SliderId> {
        self.focus
    }

    pub fn handle_command(&mut self, cmd: Command) -> Result<(), Error> {
        match cmd {
            Command::NextSlider | Command::PrevSlider => {
                let ids: Vec<SliderId> = self.layout().sliders.iter().map(|(id, _)| *id).collect();
                if ids.is_empty() {
                    return Ok(());
                }
                let pos = self.focus.and_then(|f| ids.iter().position(|id| *id == f));
                let next = match (pos, cmd) {
                    (None, Command::PrevSlider) => ids.len() - 1,
                    (None, _) => 0,
                    (Some(p), Command::PrevSlider) => (p + ids.len() - 1) % ids.len(),
                    (Some(p), _) => (p + 1) % ids.len(),
                };
                self.focus = Some(ids[next]);
            }
            Command::Increase | Command::Decrease => {
                if let Some(id) = self.focus {
                    let step = id.field.range().step;
                    let delta = if cmd == Command::Increase { step } else { -step };
                    let value = self.state(id.eye).get(id.field) + delta;
                    self.set_field(id.eye, id.field, value);
                }
            }
            Command::Reset => {
                info!("reset both eyes");
                self.reset();
            }
            Command::Snapshot => match self.config.snapshot_dir.clone() {
                Some(dir) => {
                    let written = snapshot::write_pngs(self, &dir)?;
                    info!("wrote {} snapshots to {}", written.len(), dir.display());
                }
                None => info!("no snapshot directory configured (use --snapshot DIR)"),
            },
            Command::ToggleFilter => {
                let next = match self.filter_mode() {
                    FilterMode::Directional => FilterMode::Chained,
                    FilterMode::Chained => FilterMode::Directional,
                };
                self.set_filter_mode(next);
            }
        }
        Ok(())
    }

    /// Paint the whole window: surfaces over the white page, then controls.
    pub fn compose(&self, frame: &mut Surface) {
        frame.fill(0xFF00_0000 | BACKGROUND);
        let layout = self.layout();
        let panel_right = MARGIN + CANVAS_WIDTH as f32 + PANEL_GAP + PANEL_WIDTH;

        for view in View::ALL {
            let rect = layout.canvases[view.index()];
            let flat = flatten_onto(self.surface(view), BACKGROUND);
            draw::blit(frame, rect.x as i32, rect.y as i32, CANVAS_WIDTH, &flat);
            draw::stroke_rect(frame, rect, BORDER);

            let r = self.radii(view);
            let readout = format!("blur x {:.2}  y {:.2}", r.blur_x, r.blur_y);
            draw_text(
                frame,
                &self.face,
                &readout,
                UI_FONT_SIZE * 0.8,
                rect.x,
                rect.y + rect.h + 14.0,
                Align::Left,
                MUTED,
            );

            draw_text(
                frame,
                &self.face,
                view.caption(),
                UI_FONT_SIZE,
                panel_right,
                rect.y + 10.0,
                Align::Right,
                INK,
            );
            if view == View::Combined {
                draw_text(
                    frame,
                    &self.face,
                    &self.filter_caption(),
                    UI_FONT_SIZE * 0.8,
                    panel_right,
                    rect.y + 40.0,
                    Align::Right,
                    MUTED,
                );
            }
        }

        for (id, track) in &layout.sliders {
            let value = self.state(id.eye).get(id.field);
            let label = format!("{}: {}", field_caption(id.field), format_value(id.field, value));
            draw_text(
                frame,
                &self.face,
                &label,
                UI_FONT_SIZE * 0.9,
                track.x + track.w,
                track.y - 12.0,
                Align::Right,
                INK,
            );

            let t = id.field.range().fraction(value);
            draw::fill_rect(frame, *track, TRACK);
            draw::fill_rect(frame, Rect::new(track.x, track.y, track.w * t, track.h), ACCENT);

            let focused = self.focus == Some(*id);
            let thumb = if focused { FOCUS } else { ACCENT };
            let r = if focused { THUMB_RADIUS + 1.5 } else { THUMB_RADIUS };
            draw::fill_circle(frame, track.x + track.w * t, track.center_y(), r, thumb);
        }
    }

    fn filter_caption(&self) -> String {
        match self.filter_mode() {
            FilterMode::Directional => "filter: directional (F)".to_string(),
            FilterMode::Chained => "filter: chained (F)".to_string(),
        }
    }
}
