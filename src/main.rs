// What you SEE:
// • Three labels, one per row: right eye, left eye, both eyes combined.
// • Drag a slider (or Tab to one and use ←/→) to change power, cylinder
//   and, once there is cylinder, axis. The labels re-blur immediately.
// • F switches between directional and chained blur. R resets both eyes.
// • S writes PNG snapshots into the --snapshot DIR. ESC quits.
//
// With --headless --snapshot DIR no window opens: the three PNGs are
// written once and the program exits.

use std::process;

use clap::Parser;
use log::{error, info};

use blurview::app::{WINDOW_HEIGHT, WINDOW_WIDTH};
use blurview::config::{Args, Config, TARGET_FPS, WINDOW_TITLE};
use blurview::draw::Drawer;
use blurview::logging::init_logging;
use blurview::snapshot::write_pngs;
use blurview::{App, Error, Surface, Typeface};

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(err) = run(&args) {
        error!("blurview failed: {err}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let face = Typeface::discover(args.font.as_deref())?;
    let config = Config::from(args);
    info!("right eye {}, left eye {}", config.right, config.left);

    let mut app = App::new(config, face)?;

    /* --- Headless: snapshot and exit --- */
    if let (true, Some(dir)) = (args.headless, &args.snapshot) {
        let written = write_pngs(&mut app, dir)?;
        for path in written {
            info!("wrote {}", path.display());
        }
        return Ok(());
    }

    /* --- Window + reusable frame --- */
    let mut drawer = Drawer::new(WINDOW_TITLE, WINDOW_WIDTH, WINDOW_HEIGHT, TARGET_FPS)?;
    let mut frame = Surface::try_new(WINDOW_WIDTH, WINDOW_HEIGHT)?;

    // The frame is rebuilt only when something on it can have changed.
    let mut stale = true;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        // 1) Inputs mutate state; each real change marks the app dirty.
        let focus_before = app.focused();
        if let Some((mx, my)) = drawer.mouse_pos() {
            app.handle_pointer(mx, my, drawer.left_mouse_down());
        }
        for cmd in drawer.commands() {
            if let Err(e) = app.handle_command(cmd) {
                error!("{cmd:?} failed: {e}");
            }
        }
        stale |= app.focused() != focus_before;

        // 2) Recompute + re-render after a change. A surface that cannot be
        //    allocated is fatal.
        stale |= app.redraw_if_dirty()?;

        // 3) Compose when needed; always present so the window keeps polling input.
        if stale {
            app.compose(&mut frame);
            stale = false;
        }
        drawer.present(&frame)?;
    }

    Ok(())
}
