//! Fault-formation terrain synthesis.
//!
//! The generator is pure computation: given a seed and size parameters it
//! produces a height field, a slope-shaded light map, and an altitude-banded
//! texture map, all in memory. Identical inputs always produce bit-identical
//! output, so worlds are reproducible across runs and in regression tests.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::height_field::HeightField;
use crate::constants::{generator::*, lighting};
use crate::error::{Error, Result};

/// Parameters for one generation run. Validated up front; generation itself
/// cannot fail for a configuration that passed [`Generator::new`].
#[derive(Debug, Clone, Copy)]
pub struct Generator {
    seed: u64,
    size: usize,
    fault_count: u32,
    smoothing_passes: u32,
    light_intensity: f32,
    texture_map_resolution: usize,
}

/// Everything one generation run produces. Handed to the `World`, which owns
/// it for the rest of its lifetime.
#[derive(Debug, Clone)]
pub struct GeneratorOutput {
    pub height_field: HeightField,
    pub light_map: LightMap,
    pub texture_map: TextureMap,
}

/// Per-cell brightness in `[0, 1]`, same dimensions as the height field.
#[derive(Debug, Clone, PartialEq)]
pub struct LightMap {
    size: usize,
    brightness: Vec<f32>,
}

impl LightMap {
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, x: usize, z: usize) -> f32 {
        let x = x.min(self.size - 1);
        let z = z.min(self.size - 1);
        self.brightness[z * self.size + x]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.brightness
    }
}

/// RGBA altitude-band texture resampled from the height field at the
/// configured resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureMap {
    resolution: usize,
    texels: Vec<[u8; 4]>,
}

impl TextureMap {
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn texel(&self, u: usize, v: usize) -> [u8; 4] {
        let u = u.min(self.resolution - 1);
        let v = v.min(self.resolution - 1);
        self.texels[v * self.resolution + u]
    }

    pub fn as_slice(&self) -> &[[u8; 4]] {
        &self.texels
    }
}

impl Generator {
    /// Validate the generation parameters. Errors here are configuration
    /// errors surfaced before any synthesis work begins.
    pub fn new(
        seed: i64,
        size: i64,
        fault_count: i64,
        smoothing: f64,
        light_intensity: f64,
        texture_map_resolution: i64,
    ) -> Result<Self> {
        if size <= 0 {
            return Err(Error::configuration(format!(
                "generator size must be positive, got {}",
                size
            )));
        }
        if fault_count < 0 {
            return Err(Error::configuration(format!(
                "generator fault count must be non-negative, got {}",
                fault_count
            )));
        }
        if !smoothing.is_finite() || smoothing < 0.0 {
            return Err(Error::configuration(format!(
                "generator smoothing must be finite and non-negative, got {}",
                smoothing
            )));
        }
        if !light_intensity.is_finite() {
            return Err(Error::configuration(format!(
                "generator light intensity must be finite, got {}",
                light_intensity
            )));
        }
        if texture_map_resolution <= 0 {
            return Err(Error::configuration(format!(
                "texture map resolution must be positive, got {}",
                texture_map_resolution
            )));
        }

        Ok(Self {
            seed: seed as u64,
            size: size as usize,
            fault_count: fault_count as u32,
            // Smoothing arrives as a float from the settings surface but is
            // applied as a whole number of averaging passes. The passes run
            // after all fault iterations complete, never interleaved.
            smoothing_passes: smoothing.floor() as u32,
            light_intensity: light_intensity as f32,
            texture_map_resolution: texture_map_resolution as usize,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Run the full synthesis pipeline: faults, smoothing, lighting, texture.
    pub fn generate(&self) -> GeneratorOutput {
        log::info!(
            "[Generator] Generating {}x{} height field (seed {}, {} faults, {} smoothing passes)",
            self.size,
            self.size,
            self.seed,
            self.fault_count,
            self.smoothing_passes
        );

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut field = HeightField::new(self.size);

        for i in 0..self.fault_count {
            let displacement = fault_displacement(i, self.fault_count);
            apply_fault(&mut field, &mut rng, displacement);
        }

        for _ in 0..self.smoothing_passes {
            smooth(&mut field);
        }

        normalize(&mut field);

        let light_map = self.build_light_map(&field);
        let texture_map = self.build_texture_map(&field);

        let (min, max) = field.min_max();
        log::debug!(
            "[Generator] Height field complete, range [{:.3}, {:.3}]",
            min,
            max
        );

        GeneratorOutput {
            height_field: field,
            light_map,
            texture_map,
        }
    }

    /// Slope shading: per-cell normal from central differences, shaded
    /// against a fixed directional light and scaled by the configured
    /// intensity. Edges clamp like every other height-field access.
    fn build_light_map(&self, field: &HeightField) -> LightMap {
        let size = field.size();
        let mut brightness = Vec::with_capacity(size * size);

        let [lx, ly, lz] = lighting::LIGHT_DIRECTION;
        let len = (lx * lx + ly * ly + lz * lz).sqrt();
        let (lx, ly, lz) = (lx / len, ly / len, lz / len);

        for z in 0..size {
            for x in 0..size {
                let left = field.get(x.saturating_sub(1), z);
                let right = field.get(x + 1, z);
                let down = field.get(x, z.saturating_sub(1));
                let up = field.get(x, z + 1);

                // Un-normalized surface normal (dh/dx, 2, dh/dz).
                let nx = left - right;
                let nz = down - up;
                let ny = 2.0;
                let nlen = (nx * nx + ny * ny + nz * nz).sqrt();

                let lambert = (nx * lx + ny * ly + nz * lz) / nlen;
                let lit = lighting::AMBIENT + lambert.max(0.0) * self.light_intensity;
                brightness.push(lit.clamp(0.0, 1.0));
            }
        }

        LightMap { size, brightness }
    }

    /// Resample the (normalized) height field into an RGBA altitude-band
    /// texture at the configured resolution.
    fn build_texture_map(&self, field: &HeightField) -> TextureMap {
        let resolution = self.texture_map_resolution;
        let mut texels = Vec::with_capacity(resolution * resolution);
        let grid_max = (field.size() - 1) as f32;

        for v in 0..resolution {
            for u in 0..resolution {
                let x = u as f32 / (resolution - 1).max(1) as f32 * grid_max;
                let z = v as f32 / (resolution - 1).max(1) as f32 * grid_max;
                texels.push(altitude_band(field.sample(x, z)));
            }
        }

        TextureMap { resolution, texels }
    }
}

/// Linearly decaying displacement for fault iteration `i` of `count`.
fn fault_displacement(i: u32, count: u32) -> f32 {
    if count <= 1 {
        return FAULT_DISPLACEMENT_START;
    }
    let t = i as f32 / (count - 1) as f32;
    FAULT_DISPLACEMENT_START + (FAULT_DISPLACEMENT_END - FAULT_DISPLACEMENT_START) * t
}

/// One fault iteration: pick a random line through two grid points, raise
/// every cell on one side by half the displacement and lower the other half.
fn apply_fault(field: &mut HeightField, rng: &mut ChaCha8Rng, displacement: f32) {
    let size = field.size();
    let x1 = rng.gen_range(0..size) as f32;
    let z1 = rng.gen_range(0..size) as f32;
    let mut x2 = rng.gen_range(0..size) as f32;
    let mut z2 = rng.gen_range(0..size) as f32;

    // A degenerate line leaves the sign test meaningless; nudge the second
    // point off the first.
    if x1 == x2 && z1 == z2 {
        x2 = (x1 + 1.0) % size as f32;
        z2 = (z1 + 1.0) % size as f32;
    }

    let dx = x2 - x1;
    let dz = z2 - z1;
    let half = displacement * 0.5;

    for z in 0..size {
        for x in 0..size {
            let cross = dx * (z as f32 - z1) - dz * (x as f32 - x1);
            if cross > 0.0 {
                field.add(x, z, half);
            } else {
                field.add(x, z, -half);
            }
        }
    }
}

/// One 3x3 box-averaging pass over the whole field. Boundary neighbors clamp
/// to the edge, no wraparound.
fn smooth(field: &mut HeightField) {
    let size = field.size();
    let source = field.clone();

    for z in 0..size {
        for x in 0..size {
            let mut sum = 0.0;
            for dz in -1i32..=1 {
                for dx in -1i32..=1 {
                    let sx = (x as i32 + dx).clamp(0, size as i32 - 1) as usize;
                    let sz = (z as i32 + dz).clamp(0, size as i32 - 1) as usize;
                    sum += source.get(sx, sz);
                }
            }
            field.set(x, z, sum / 9.0);
        }
    }
}

/// Rescale heights into [0, 1] so the height scale applied by the terrain is
/// the only amplitude knob. A perfectly flat field stays at zero.
fn normalize(field: &mut HeightField) {
    let (min, max) = field.min_max();
    let range = max - min;
    if range <= f32::EPSILON {
        return;
    }
    let size = field.size();
    for z in 0..size {
        for x in 0..size {
            let h = (field.get(x, z) - min) / range;
            field.set(x, z, h);
        }
    }
}

/// Color ramp over normalized altitude: water, sand, grass, rock, snow.
fn altitude_band(height: f32) -> [u8; 4] {
    match height {
        h if h < 0.25 => [40, 76, 148, 255],
        h if h < 0.35 => [196, 180, 124, 255],
        h if h < 0.65 => [72, 120, 56, 255],
        h if h < 0.85 => [124, 112, 100, 255],
        _ => [240, 240, 244, 255],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(seed: i64) -> Generator {
        Generator::new(seed, 64, 50, 2.0, 1.0, 32).unwrap()
    }

    #[test]
    fn identical_inputs_produce_bit_identical_fields() {
        let a = generator(42).generate();
        let b = generator(42).generate();
        assert_eq!(a.height_field, b.height_field);
        assert_eq!(a.light_map, b.light_map);
        assert_eq!(a.texture_map, b.texture_map);
    }

    #[test]
    fn different_seeds_diverge() {
        let a = generator(1).generate();
        let b = generator(2).generate();
        assert_ne!(a.height_field, b.height_field);
    }

    #[test]
    fn generated_field_is_finite_and_bounded() {
        let output = generator(42).generate();
        assert_eq!(output.height_field.size(), 64);
        for &h in output.height_field.as_slice() {
            assert!(h.is_finite(), "height field contains non-finite value");
        }
        let (min, max) = output.height_field.min_max();
        assert!(min >= 0.0 && max <= 1.0, "range [{}, {}]", min, max);
        assert!(max > min, "field should not be flat after 50 faults");
    }

    #[test]
    fn light_map_is_clamped_to_unit_interval() {
        let output = Generator::new(7, 32, 40, 1.0, 5.0, 16).unwrap().generate();
        for &b in output.light_map.as_slice() {
            assert!((0.0..=1.0).contains(&b), "brightness {} out of range", b);
        }
    }

    #[test]
    fn texture_map_honors_configured_resolution() {
        let output = Generator::new(3, 32, 10, 0.0, 1.0, 48).unwrap().generate();
        assert_eq!(output.texture_map.resolution(), 48);
        assert_eq!(output.texture_map.as_slice().len(), 48 * 48);
    }

    #[test]
    fn invalid_parameters_are_rejected_before_generation() {
        assert!(Generator::new(0, 0, 10, 1.0, 1.0, 16).is_err());
        assert!(Generator::new(0, -4, 10, 1.0, 1.0, 16).is_err());
        assert!(Generator::new(0, 64, -1, 1.0, 1.0, 16).is_err());
        assert!(Generator::new(0, 64, 10, f64::NAN, 1.0, 16).is_err());
        assert!(Generator::new(0, 64, 10, 1.0, f64::INFINITY, 16).is_err());
        assert!(Generator::new(0, 64, 10, 1.0, 1.0, 0).is_err());
    }

    #[test]
    fn zero_faults_yields_flat_field() {
        let output = Generator::new(0, 16, 0, 0.0, 1.0, 8).unwrap().generate();
        let (min, max) = output.height_field.min_max();
        assert_eq!((min, max), (0.0, 0.0));
    }
}
