//! Named-option settings store.
//!
//! Every tunable the application exposes is a [`Key`] with a typed
//! [`Value`]. The store carries defaults for every key, can overlay values
//! from a TOML file, and replays each key as a (key, value) change through a
//! registered handler table (see [`router`]). Persistence back to disk is
//! out of scope.

pub mod router;

pub use router::Router;

use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};

/// Every named option the core reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    WorldGeneratorSize,
    WorldGeneratorTextureMapResolution,
    WorldGeneratorSmoothing,
    WorldGeneratorFaultCount,
    WorldGeneratorSeed,
    WorldTerrainLightIntensity,
    WorldTerrainSpacing,
    WorldTerrainHeightScale,
    WorldTerrainBlockSize,
    WorldTerrainSpanSize,
    GraphicsCameraFov,
    GraphicsCameraWireframe,
    GraphicsCameraPositionX,
    GraphicsCameraPositionY,
    GraphicsCameraPositionZ,
}

impl Key {
    /// All keys, in the order the startup replay visits them.
    pub const ALL: [Key; 15] = [
        Key::WorldGeneratorSize,
        Key::WorldGeneratorTextureMapResolution,
        Key::WorldGeneratorSmoothing,
        Key::WorldGeneratorFaultCount,
        Key::WorldGeneratorSeed,
        Key::WorldTerrainLightIntensity,
        Key::WorldTerrainSpacing,
        Key::WorldTerrainHeightScale,
        Key::WorldTerrainBlockSize,
        Key::WorldTerrainSpanSize,
        Key::GraphicsCameraFov,
        Key::GraphicsCameraWireframe,
        Key::GraphicsCameraPositionX,
        Key::GraphicsCameraPositionY,
        Key::GraphicsCameraPositionZ,
    ];

    /// Settings-file name for this key.
    pub fn name(&self) -> &'static str {
        match self {
            Key::WorldGeneratorSize => "world_generator_size",
            Key::WorldGeneratorTextureMapResolution => "world_generator_texture_map_resolution",
            Key::WorldGeneratorSmoothing => "world_generator_smoothing",
            Key::WorldGeneratorFaultCount => "world_generator_fault_count",
            Key::WorldGeneratorSeed => "world_generator_seed",
            Key::WorldTerrainLightIntensity => "world_terrain_light_intensity",
            Key::WorldTerrainSpacing => "world_terrain_spacing",
            Key::WorldTerrainHeightScale => "world_terrain_height_scale",
            Key::WorldTerrainBlockSize => "world_terrain_block_size",
            Key::WorldTerrainSpanSize => "world_terrain_span_size",
            Key::GraphicsCameraFov => "graphics_camera_fov",
            Key::GraphicsCameraWireframe => "graphics_camera_wireframe",
            Key::GraphicsCameraPositionX => "graphics_camera_position_x",
            Key::GraphicsCameraPositionY => "graphics_camera_position_y",
            Key::GraphicsCameraPositionZ => "graphics_camera_position_z",
        }
    }

    pub fn from_name(name: &str) -> Option<Key> {
        Key::ALL.iter().copied().find(|k| k.name() == name)
    }
}

/// Typed settings value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Float(f64),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }
}

/// In-memory settings store with a default value for every key.
#[derive(Debug, Clone)]
pub struct Settings {
    values: HashMap<Key, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        use crate::constants::{camera, generator, terrain};
        let mut values = HashMap::new();
        values.insert(Key::WorldGeneratorSize, Value::Integer(generator::DEFAULT_SIZE));
        values.insert(
            Key::WorldGeneratorTextureMapResolution,
            Value::Integer(generator::DEFAULT_TEXTURE_MAP_RESOLUTION),
        );
        values.insert(Key::WorldGeneratorSmoothing, Value::Float(generator::DEFAULT_SMOOTHING));
        values.insert(
            Key::WorldGeneratorFaultCount,
            Value::Integer(generator::DEFAULT_FAULT_COUNT),
        );
        values.insert(Key::WorldGeneratorSeed, Value::Integer(generator::DEFAULT_SEED));
        values.insert(
            Key::WorldTerrainLightIntensity,
            Value::Float(generator::DEFAULT_LIGHT_INTENSITY),
        );
        values.insert(Key::WorldTerrainSpacing, Value::Float(terrain::DEFAULT_SPACING));
        values.insert(
            Key::WorldTerrainHeightScale,
            Value::Float(terrain::DEFAULT_HEIGHT_SCALE),
        );
        values.insert(Key::WorldTerrainBlockSize, Value::Integer(terrain::DEFAULT_BLOCK_SIZE));
        values.insert(Key::WorldTerrainSpanSize, Value::Integer(terrain::DEFAULT_SPAN_SIZE));
        values.insert(Key::GraphicsCameraFov, Value::Float(camera::DEFAULT_FOV_DEGREES));
        values.insert(Key::GraphicsCameraWireframe, Value::Bool(false));
        values.insert(Key::GraphicsCameraPositionX, Value::Float(0.0));
        values.insert(Key::GraphicsCameraPositionY, Value::Float(0.0));
        values.insert(Key::GraphicsCameraPositionZ, Value::Float(0.0));
        Self { values }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with whatever the TOML file provides. Unknown keys
    /// in the file are skipped; a type mismatch is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::settings(format!("cannot read {}: {}", path.display(), e)))?;
        let file: FileSettings = toml::from_str(&text)
            .map_err(|e| Error::settings(format!("cannot parse {}: {}", path.display(), e)))?;

        let mut settings = Self::default();
        file.overlay(&mut settings);
        Ok(settings)
    }

    pub fn value(&self, key: Key) -> Value {
        // Default covers every key, so the lookup cannot miss.
        self.values[&key]
    }

    pub fn set_value(&mut self, key: Key, value: Value) {
        self.values.insert(key, value);
    }
}

/// On-disk settings shape. Every field is optional; field names match
/// [`Key::name`] exactly. Deserializing through this struct is what pins
/// each key to its expected type.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct FileSettings {
    world_generator_size: Option<i64>,
    world_generator_texture_map_resolution: Option<i64>,
    world_generator_smoothing: Option<f64>,
    world_generator_fault_count: Option<i64>,
    world_generator_seed: Option<i64>,
    world_terrain_light_intensity: Option<f64>,
    world_terrain_spacing: Option<f64>,
    world_terrain_height_scale: Option<f64>,
    world_terrain_block_size: Option<i64>,
    world_terrain_span_size: Option<i64>,
    graphics_camera_fov: Option<f64>,
    graphics_camera_wireframe: Option<bool>,
    graphics_camera_position_x: Option<f64>,
    graphics_camera_position_y: Option<f64>,
    graphics_camera_position_z: Option<f64>,
}

impl FileSettings {
    /// Write every present field over the matching store entry.
    fn overlay(self, settings: &mut Settings) {
        let mut set_int = |key, v: Option<i64>| {
            if let Some(v) = v {
                settings.set_value(key, Value::Integer(v));
            }
        };
        set_int(Key::WorldGeneratorSize, self.world_generator_size);
        set_int(
            Key::WorldGeneratorTextureMapResolution,
            self.world_generator_texture_map_resolution,
        );
        set_int(Key::WorldGeneratorFaultCount, self.world_generator_fault_count);
        set_int(Key::WorldGeneratorSeed, self.world_generator_seed);
        set_int(Key::WorldTerrainBlockSize, self.world_terrain_block_size);
        set_int(Key::WorldTerrainSpanSize, self.world_terrain_span_size);

        let mut set_float = |key, v: Option<f64>| {
            if let Some(v) = v {
                settings.set_value(key, Value::Float(v));
            }
        };
        set_float(Key::WorldGeneratorSmoothing, self.world_generator_smoothing);
        set_float(
            Key::WorldTerrainLightIntensity,
            self.world_terrain_light_intensity,
        );
        set_float(Key::WorldTerrainSpacing, self.world_terrain_spacing);
        set_float(Key::WorldTerrainHeightScale, self.world_terrain_height_scale);
        set_float(Key::GraphicsCameraFov, self.graphics_camera_fov);
        set_float(Key::GraphicsCameraPositionX, self.graphics_camera_position_x);
        set_float(Key::GraphicsCameraPositionY, self.graphics_camera_position_y);
        set_float(Key::GraphicsCameraPositionZ, self.graphics_camera_position_z);

        if let Some(v) = self.graphics_camera_wireframe {
            settings.set_value(Key::GraphicsCameraWireframe, Value::Bool(v));
        }
    }
}
