//! Headless Terrain3D demo driver.
//!
//! Loads settings (from `settings.toml` next to the binary if present,
//! otherwise defaults), builds the world, and runs a short simulated frame
//! loop: WASD-style movement, mouse-look deltas, a wireframe toggle, and a
//! reseed-restart, logging what a renderer would consume.

use anyhow::Result;
use terrain3d::settings::{Key, Settings, Value};
use terrain3d::App;

const MOVE_SPEED: f32 = 1.75;
const MOUSE_SENSITIVITY: f32 = 0.1;

fn main() -> Result<()> {
    env_logger::init();

    let settings_path = std::path::Path::new("settings.toml");
    let settings = if settings_path.exists() {
        Settings::load(settings_path)?
    } else {
        log::info!("No settings.toml found, using defaults");
        Settings::new()
    };

    let mut app = App::new(settings)?;
    log_world(&app);

    // A few simulated frames of input.
    for frame in 0..5 {
        let forward = app.camera().forward();
        app.camera_mut().inc_position(forward * MOVE_SPEED);

        // Pretend the cursor drifted a little since the last frame.
        let (dx, dy) = (12.0, -4.0);
        app.camera_mut()
            .inc_orientation(dx * MOUSE_SENSITIVITY, dy * MOUSE_SENSITIVITY);

        app.tick();

        let p = app.camera().position();
        log::info!(
            "frame {}: camera ({:.2}, {:.2}, {:.2}), terrain below {:.2}",
            frame,
            p.x,
            p.y,
            p.z,
            app.world().height_at(p.x, p.z)
        );
    }

    app.toggle_wireframe();

    // Reseed and rebuild between frames, exactly like an F5 restart.
    let reseeded = app
        .settings()
        .value(Key::WorldGeneratorSeed)
        .as_i64()
        .unwrap_or(0)
        + 1;
    app.apply(Key::WorldGeneratorSeed, Value::Integer(reseeded))?;
    app.tick();
    log::info!("Restarted with seed {}", reseeded);
    log_world(&app);

    Ok(())
}

fn log_world(app: &App) {
    if let Some(terrain) = app.world().terrain() {
        let (min, max) = terrain.height_field().min_max();
        log::info!(
            "World: {} blocks, {} spans, heights [{:.3}, {:.3}], mode {:?}",
            terrain.blocks().len(),
            terrain.spans().len(),
            min,
            max,
            terrain.mode()
        );
    }
}
