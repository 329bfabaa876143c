//! World orchestration: generator output plus terrain partitioning.

pub mod generator;
pub mod height_field;
pub mod terrain;

pub use generator::{Generator, GeneratorOutput, LightMap, TextureMap};
pub use height_field::HeightField;
pub use terrain::{Block, Mode, Span, Terrain};

use crate::error::{Error, Result};

/// World-side configuration, immutable once passed to [`World::init`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Configuration {
    pub generator_size: i64,
    pub generator_texture_map_resolution: i64,
    pub generator_smoothing: f64,
    pub generator_fault_count: i64,
    pub generator_seed: i64,
    pub generator_light_intensity: f64,
}

impl Default for Configuration {
    fn default() -> Self {
        use crate::constants::generator::*;
        Self {
            generator_size: DEFAULT_SIZE,
            generator_texture_map_resolution: DEFAULT_TEXTURE_MAP_RESOLUTION,
            generator_smoothing: DEFAULT_SMOOTHING,
            generator_fault_count: DEFAULT_FAULT_COUNT,
            generator_seed: DEFAULT_SEED,
            generator_light_intensity: DEFAULT_LIGHT_INTENSITY,
        }
    }
}

/// Terrain-side configuration, immutable once passed to [`World::init`].
///
/// Spacing is the world-space distance between adjacent height samples;
/// the height scale maps normalized elevations into world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainConfiguration {
    pub terrain_block_size: i64,
    pub terrain_span_size: i64,
    pub terrain_spacing: f64,
    pub terrain_height_scale: f64,
}

impl Default for TerrainConfiguration {
    fn default() -> Self {
        use crate::constants::terrain::*;
        Self {
            terrain_block_size: DEFAULT_BLOCK_SIZE,
            terrain_span_size: DEFAULT_SPAN_SIZE,
            terrain_spacing: DEFAULT_SPACING,
            terrain_height_scale: DEFAULT_HEIGHT_SCALE,
        }
    }
}

impl TerrainConfiguration {
    fn validate(&self) -> Result<()> {
        if !self.terrain_spacing.is_finite() || self.terrain_spacing <= 0.0 {
            return Err(Error::configuration(format!(
                "terrain spacing must be finite and positive, got {}",
                self.terrain_spacing
            )));
        }
        if !self.terrain_height_scale.is_finite() {
            return Err(Error::configuration(format!(
                "terrain height scale must be finite, got {}",
                self.terrain_height_scale
            )));
        }
        Ok(())
    }
}

/// Fully built world state, swapped in atomically by [`World::init`].
#[derive(Debug)]
struct WorldState {
    terrain: Terrain,
    light_map: LightMap,
    texture_map: TextureMap,
    spacing: f32,
    height_scale: f32,
}

/// Owns the generator output and the terrain partitioning.
///
/// `init` is re-entrant: calling it again fully discards prior state and
/// rebuilds from the new configuration (restart/reseed). A failed `init`
/// leaves the previous valid world untouched. All mutation happens on the
/// single thread driving the frame loop; there is no internal locking.
#[derive(Debug, Default)]
pub struct World {
    state: Option<WorldState>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the world: generate the height field and partition it.
    /// All-or-nothing; on error the previous state (if any) survives.
    pub fn init(&mut self, config: &Configuration, terrain_config: &TerrainConfiguration) -> Result<()> {
        terrain_config.validate()?;

        let generator = Generator::new(
            config.generator_seed,
            config.generator_size,
            config.generator_fault_count,
            config.generator_smoothing,
            config.generator_light_intensity,
            config.generator_texture_map_resolution,
        )?;

        let output = generator.generate();
        let terrain = Terrain::partition(
            output.height_field,
            terrain_config.terrain_block_size,
            terrain_config.terrain_span_size,
        )?;

        let restarted = self.state.is_some();
        self.state = Some(WorldState {
            terrain,
            light_map: output.light_map,
            texture_map: output.texture_map,
            spacing: terrain_config.terrain_spacing as f32,
            height_scale: terrain_config.terrain_height_scale as f32,
        });

        if restarted {
            log::info!("[World] Rebuilt with seed {}", config.generator_seed);
        } else {
            log::info!("[World] Initialized with seed {}", config.generator_seed);
        }
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// World-space terrain height under `(x, z)`: spacing maps world units
    /// to grid coordinates, the height scale maps normalized elevation back
    /// to world units. Returns 0 for an uninitialized world.
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        match &self.state {
            Some(state) => {
                state.terrain.height_at(x / state.spacing, z / state.spacing) * state.height_scale
            }
            None => 0.0,
        }
    }

    pub fn terrain(&self) -> Option<&Terrain> {
        self.state.as_ref().map(|s| &s.terrain)
    }

    pub fn terrain_mut(&mut self) -> Option<&mut Terrain> {
        self.state.as_mut().map(|s| &mut s.terrain)
    }

    pub fn light_map(&self) -> Option<&LightMap> {
        self.state.as_ref().map(|s| &s.light_map)
    }

    pub fn texture_map(&self) -> Option<&TextureMap> {
        self.state.as_ref().map(|s| &s.texture_map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configs() -> (Configuration, TerrainConfiguration) {
        (
            Configuration {
                generator_size: 64,
                generator_texture_map_resolution: 32,
                generator_smoothing: 2.0,
                generator_fault_count: 50,
                generator_seed: 42,
                generator_light_intensity: 1.0,
            },
            TerrainConfiguration {
                terrain_block_size: 8,
                terrain_span_size: 4,
                terrain_spacing: 1.0,
                terrain_height_scale: 30.0,
            },
        )
    }

    #[test]
    fn init_builds_terrain_and_maps() {
        let (wc, tc) = configs();
        let mut world = World::new();
        world.init(&wc, &tc).unwrap();
        assert!(world.is_initialized());
        assert_eq!(world.terrain().unwrap().blocks_per_side(), 8);
        assert_eq!(world.light_map().unwrap().size(), 64);
        assert_eq!(world.texture_map().unwrap().resolution(), 32);
    }

    #[test]
    fn reinit_with_same_configuration_is_idempotent() {
        let (wc, tc) = configs();
        let mut world = World::new();
        world.init(&wc, &tc).unwrap();
        let first = world.terrain().unwrap().height_field().clone();
        world.init(&wc, &tc).unwrap();
        assert_eq!(world.terrain().unwrap().height_field(), &first);
    }

    #[test]
    fn failed_reinit_keeps_the_previous_world() {
        let (wc, tc) = configs();
        let mut world = World::new();
        world.init(&wc, &tc).unwrap();
        let before = world.terrain().unwrap().height_field().clone();

        // size 63 is not divisible into blocks of 8
        let mut broken = wc;
        broken.generator_size = 63;
        assert!(world.init(&broken, &tc).is_err());

        assert!(world.is_initialized());
        assert_eq!(world.terrain().unwrap().height_field(), &before);
    }

    #[test]
    fn init_on_fresh_world_fails_cleanly_for_bad_config() {
        let (mut wc, tc) = configs();
        wc.generator_size = 63;
        let mut world = World::new();
        assert!(world.init(&wc, &tc).is_err());
        assert!(!world.is_initialized());
        assert!(world.terrain().is_none());
    }

    #[test]
    fn height_at_applies_spacing_and_scale() {
        let (wc, mut tc) = configs();
        tc.terrain_spacing = 2.0;
        tc.terrain_height_scale = 10.0;
        let mut world = World::new();
        world.init(&wc, &tc).unwrap();

        let grid = world.terrain().unwrap().height_at(5.0, 5.0);
        let ws = world.height_at(10.0, 10.0);
        assert!((ws - grid * 10.0).abs() < 1e-5);
    }

    #[test]
    fn invalid_spacing_is_rejected() {
        let (wc, mut tc) = configs();
        tc.terrain_spacing = 0.0;
        let mut world = World::new();
        assert!(world.init(&wc, &tc).is_err());
    }
}
