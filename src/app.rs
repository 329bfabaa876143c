//! Application-facing wiring around the core.
//!
//! The surrounding toolkit (whatever drives the frame loop) talks to the
//! core through two entry points: [`App::apply`] for one (key, value)
//! settings change and [`App::tick`] for the per-frame update. Scheduling
//! those calls is the caller's job; the core assumes a single logical
//! timeline and does no locking of its own.

use cgmath::Point3;

use crate::camera::{self, Camera};
use crate::error::Result;
use crate::settings::{Key, Router, Settings, Value};
use crate::world::{self, Mode, World};

/// Core simulation state the settings router mutates.
pub struct CoreState {
    pub world: World,
    pub camera: Camera,
    /// Pending world-side configuration, consumed at the next restart.
    world_config: world::Configuration,
    terrain_config: world::TerrainConfiguration,
    needs_restart: bool,
}

pub struct App {
    settings: Settings,
    router: Router<CoreState>,
    state: CoreState,
}

impl App {
    /// Build the dispatch table, replay every settings key through it, and
    /// construct the initial world.
    pub fn new(settings: Settings) -> Result<Self> {
        let mut app = Self {
            settings,
            router: build_router()?,
            state: CoreState {
                world: World::new(),
                camera: Camera::new(),
                world_config: world::Configuration::default(),
                terrain_config: world::TerrainConfiguration::default(),
                needs_restart: false,
            },
        };

        // Load every known key by replaying it as a change, the same way a
        // live settings edit arrives.
        for key in Key::ALL {
            let value = app.settings.value(key);
            app.router.apply(&mut app.state, key, value)?;
        }

        app.state
            .world
            .init(&app.state.world_config, &app.state.terrain_config)?;
        app.state.needs_restart = false;

        let camera_config = camera::Configuration {
            field_of_view: app
                .settings
                .value(Key::GraphicsCameraFov)
                .as_f64()
                .unwrap_or(crate::constants::camera::DEFAULT_FOV_DEGREES),
            wireframe: app
                .settings
                .value(Key::GraphicsCameraWireframe)
                .as_bool()
                .unwrap_or(false),
            position: app.camera_position_from_settings(),
        };
        app.state.camera.init(&camera_config);

        // The wireframe key may have arrived before the world existed.
        let mode = app.state.camera.mode();
        if let Some(terrain) = app.state.world.terrain_mut() {
            terrain.set_mode(mode);
        }

        Ok(app)
    }

    fn camera_position_from_settings(&self) -> [f32; 3] {
        let read = |key| self.settings.value(key).as_f64().unwrap_or(0.0) as f32;
        [
            read(Key::GraphicsCameraPositionX),
            read(Key::GraphicsCameraPositionY),
            read(Key::GraphicsCameraPositionZ),
        ]
    }

    /// Deliver one settings change: record it in the store, then route it.
    pub fn apply(&mut self, key: Key, value: Value) -> Result<()> {
        self.settings.set_value(key, value);
        self.router.apply(&mut self.state, key, value)
    }

    /// Ask for a world rebuild at the next tick. Repeated requests coalesce;
    /// the newest configuration wins.
    pub fn request_restart(&mut self) {
        self.state.needs_restart = true;
    }

    /// Per-frame update. Applies a pending restart between frames, never
    /// concurrently with queries. A failed restart keeps the last good
    /// world and clears the request.
    pub fn tick(&mut self) {
        if !self.state.needs_restart {
            return;
        }
        self.state.needs_restart = false;
        if let Err(e) = self
            .state
            .world
            .init(&self.state.world_config, &self.state.terrain_config)
        {
            log::warn!("[App] Restart aborted, keeping previous world: {}", e);
        }
    }

    /// Flip Normal/WireFrame on the camera and terrain and record the new
    /// value in the settings store.
    pub fn toggle_wireframe(&mut self) {
        let mode = match self.state.camera.mode() {
            Mode::Normal => Mode::WireFrame,
            Mode::WireFrame => Mode::Normal,
        };
        self.state.camera.set_mode(mode);
        if let Some(terrain) = self.state.world.terrain_mut() {
            terrain.set_mode(mode);
        }
        self.settings
            .set_value(Key::GraphicsCameraWireframe, Value::Bool(mode == Mode::WireFrame));
        log::info!("[App] Render mode now {:?}", mode);
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn world(&self) -> &World {
        &self.state.world
    }

    pub fn camera(&self) -> &Camera {
        &self.state.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.state.camera
    }

    pub fn restart_pending(&self) -> bool {
        self.state.needs_restart
    }
}

/// Register one handler per settings key. Camera keys apply immediately;
/// generator/terrain keys update the pending configuration and schedule a
/// restart, since the height field cannot be mutated in place.
fn build_router() -> Result<Router<CoreState>> {
    let mut router: Router<CoreState> = Router::new();

    macro_rules! world_int {
        ($key:expr, $field:ident) => {
            router.register($key, |state: &mut CoreState, value: &Value| {
                if let Some(v) = value.as_i64() {
                    state.world_config.$field = v;
                    state.needs_restart = true;
                }
                Ok(())
            })?;
        };
    }
    macro_rules! world_float {
        ($key:expr, $field:ident) => {
            router.register($key, |state: &mut CoreState, value: &Value| {
                if let Some(v) = value.as_f64() {
                    state.world_config.$field = v;
                    state.needs_restart = true;
                }
                Ok(())
            })?;
        };
    }
    macro_rules! terrain_int {
        ($key:expr, $field:ident) => {
            router.register($key, |state: &mut CoreState, value: &Value| {
                if let Some(v) = value.as_i64() {
                    state.terrain_config.$field = v;
                    state.needs_restart = true;
                }
                Ok(())
            })?;
        };
    }
    macro_rules! terrain_float {
        ($key:expr, $field:ident) => {
            router.register($key, |state: &mut CoreState, value: &Value| {
                if let Some(v) = value.as_f64() {
                    state.terrain_config.$field = v;
                    state.needs_restart = true;
                }
                Ok(())
            })?;
        };
    }

    world_int!(Key::WorldGeneratorSize, generator_size);
    world_int!(
        Key::WorldGeneratorTextureMapResolution,
        generator_texture_map_resolution
    );
    world_float!(Key::WorldGeneratorSmoothing, generator_smoothing);
    world_int!(Key::WorldGeneratorFaultCount, generator_fault_count);
    world_int!(Key::WorldGeneratorSeed, generator_seed);
    world_float!(Key::WorldTerrainLightIntensity, generator_light_intensity);

    terrain_float!(Key::WorldTerrainSpacing, terrain_spacing);
    terrain_float!(Key::WorldTerrainHeightScale, terrain_height_scale);
    terrain_int!(Key::WorldTerrainBlockSize, terrain_block_size);
    terrain_int!(Key::WorldTerrainSpanSize, terrain_span_size);

    router.register(Key::GraphicsCameraFov, |state, value| {
        if let Some(v) = value.as_f64() {
            state.camera.set_field_of_view(v as f32);
        }
        Ok(())
    })?;
    router.register(Key::GraphicsCameraWireframe, |state, value| {
        if let Some(v) = value.as_bool() {
            let mode = if v { Mode::WireFrame } else { Mode::Normal };
            state.camera.set_mode(mode);
            if let Some(terrain) = state.world.terrain_mut() {
                terrain.set_mode(mode);
            }
        }
        Ok(())
    })?;
    router.register(Key::GraphicsCameraPositionX, |state, value| {
        if let Some(v) = value.as_f64() {
            let c = state.camera.position();
            state.camera.set_position(Point3::new(v as f32, c.y, c.z));
        }
        Ok(())
    })?;
    router.register(Key::GraphicsCameraPositionY, |state, value| {
        if let Some(v) = value.as_f64() {
            let c = state.camera.position();
            state.camera.set_position(Point3::new(c.x, v as f32, c.z));
        }
        Ok(())
    })?;
    router.register(Key::GraphicsCameraPositionZ, |state, value| {
        if let Some(v) = value.as_f64() {
            let c = state.camera.position();
            state.camera.set_position(Point3::new(c.x, c.y, v as f32));
        }
        Ok(())
    })?;

    Ok(router)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_settings() -> Settings {
        let mut settings = Settings::new();
        settings.set_value(Key::WorldGeneratorSize, Value::Integer(64));
        settings.set_value(Key::WorldGeneratorFaultCount, Value::Integer(50));
        settings.set_value(Key::WorldGeneratorSeed, Value::Integer(42));
        settings.set_value(Key::WorldGeneratorTextureMapResolution, Value::Integer(16));
        settings.set_value(Key::WorldTerrainBlockSize, Value::Integer(8));
        settings.set_value(Key::WorldTerrainSpanSize, Value::Integer(4));
        settings
    }

    #[test]
    fn startup_replays_settings_into_a_built_world() {
        let app = App::new(small_settings()).unwrap();
        assert!(app.world().is_initialized());
        assert_eq!(app.world().terrain().unwrap().block_size(), 8);
        assert!(!app.restart_pending());
    }

    #[test]
    fn world_key_change_requires_a_restart_to_take_effect() {
        let mut app = App::new(small_settings()).unwrap();
        let before = app.world().terrain().unwrap().height_field().clone();

        app.apply(Key::WorldGeneratorSeed, Value::Integer(7)).unwrap();
        assert!(app.restart_pending());
        // Not rebuilt yet.
        assert_eq!(app.world().terrain().unwrap().height_field(), &before);

        app.tick();
        assert!(!app.restart_pending());
        assert_ne!(app.world().terrain().unwrap().height_field(), &before);
    }

    #[test]
    fn camera_key_changes_apply_immediately() {
        let mut app = App::new(small_settings()).unwrap();
        app.apply(Key::GraphicsCameraFov, Value::Float(72.0)).unwrap();
        assert_eq!(app.camera().field_of_view(), 72.0);

        app.apply(Key::GraphicsCameraPositionY, Value::Float(25.0)).unwrap();
        assert_eq!(app.camera().position().y, 25.0);
    }

    #[test]
    fn failed_restart_keeps_the_running_world() {
        let mut app = App::new(small_settings()).unwrap();
        let before = app.world().terrain().unwrap().height_field().clone();

        // 63 does not divide into blocks of 8.
        app.apply(Key::WorldGeneratorSize, Value::Integer(63)).unwrap();
        app.tick();

        assert!(app.world().is_initialized());
        assert_eq!(app.world().terrain().unwrap().height_field(), &before);
    }

    #[test]
    fn wireframe_toggle_updates_camera_terrain_and_settings() {
        let mut app = App::new(small_settings()).unwrap();
        assert_eq!(app.camera().mode(), Mode::Normal);

        app.toggle_wireframe();
        assert_eq!(app.camera().mode(), Mode::WireFrame);
        assert_eq!(app.world().terrain().unwrap().mode(), Mode::WireFrame);
        assert_eq!(
            app.settings().value(Key::GraphicsCameraWireframe),
            Value::Bool(true)
        );

        app.toggle_wireframe();
        assert_eq!(app.camera().mode(), Mode::Normal);
    }
}
