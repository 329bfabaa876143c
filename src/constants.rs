// Terrain3D constants - single source of truth.
//
// Default settings values and the fixed limits the core clamps against.
// Do NOT define these anywhere else in the codebase.

/// Generator defaults, matching the shipped settings file.
pub mod generator {
    pub const DEFAULT_SIZE: i64 = 128;
    pub const DEFAULT_TEXTURE_MAP_RESOLUTION: i64 = 256;
    pub const DEFAULT_SMOOTHING: f64 = 2.0;
    pub const DEFAULT_FAULT_COUNT: i64 = 200;
    pub const DEFAULT_SEED: i64 = 0;
    pub const DEFAULT_LIGHT_INTENSITY: f64 = 1.0;

    /// Fault displacement decays linearly from START to END over the
    /// configured iteration count.
    pub const FAULT_DISPLACEMENT_START: f32 = 1.0;
    pub const FAULT_DISPLACEMENT_END: f32 = 0.05;
}

/// Terrain partitioning defaults.
pub mod terrain {
    pub const DEFAULT_BLOCK_SIZE: i64 = 16;
    pub const DEFAULT_SPAN_SIZE: i64 = 4;
    pub const DEFAULT_SPACING: f64 = 1.0;
    pub const DEFAULT_HEIGHT_SCALE: f64 = 30.0;
}

/// Camera defaults and limits.
pub mod camera {
    /// Pitch clamp in degrees. Anything past this flips the view basis.
    pub const MAX_PITCH_DEGREES: f32 = 89.0;

    pub const DEFAULT_FOV_DEGREES: f64 = 50.0;
    pub const DEFAULT_ASPECT: f32 = 16.0 / 9.0;
    pub const ZNEAR: f32 = 0.1;
    pub const ZFAR: f32 = 1000.0;
}

/// Directional light used by the generator's slope shading.
pub mod lighting {
    pub const LIGHT_DIRECTION: [f32; 3] = [-1.0, 1.0, -0.5];
    pub const AMBIENT: f32 = 0.25;
}
