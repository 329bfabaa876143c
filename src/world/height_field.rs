//! Flat-array height-field storage with clamped sampling.

/// 2D grid of elevation samples, `size` x `size`, row-major.
///
/// Owned by the [`World`](crate::world::World) after generation and treated
/// as read-only from then on. Out-of-range reads clamp to the nearest edge
/// sample; the terrain is logically infinite-bounded-by-clamp from the
/// camera's point of view.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    size: usize,
    heights: Vec<f32>,
}

impl HeightField {
    /// Create a flat field of zeros. A zero-size field has no edge sample
    /// to clamp to, so `size` must be positive; the generator additionally
    /// rejects non-positive configured sizes before construction.
    pub fn new(size: usize) -> Self {
        debug_assert!(size > 0, "height field size must be positive");
        Self {
            size,
            heights: vec![0.0; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, x: usize, z: usize) -> f32 {
        let x = x.min(self.size - 1);
        let z = z.min(self.size - 1);
        self.heights[z * self.size + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, z: usize, height: f32) {
        debug_assert!(x < self.size && z < self.size);
        self.heights[z * self.size + x] = height;
    }

    #[inline]
    pub fn add(&mut self, x: usize, z: usize, delta: f32) {
        debug_assert!(x < self.size && z < self.size);
        self.heights[z * self.size + x] += delta;
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.heights
    }

    pub fn min_max(&self) -> (f32, f32) {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &h in &self.heights {
            min = min.min(h);
            max = max.max(h);
        }
        (min, max)
    }

    /// Bilinearly interpolated sample at fractional grid coordinates.
    /// Coordinates outside `[0, size-1]` clamp to the nearest edge; this is
    /// never an error.
    pub fn sample(&self, x: f32, z: f32) -> f32 {
        let max = (self.size - 1) as f32;
        let x = if x.is_nan() { 0.0 } else { x.clamp(0.0, max) };
        let z = if z.is_nan() { 0.0 } else { z.clamp(0.0, max) };

        let x0 = x.floor() as usize;
        let z0 = z.floor() as usize;
        let x1 = (x0 + 1).min(self.size - 1);
        let z1 = (z0 + 1).min(self.size - 1);
        let fx = x - x0 as f32;
        let fz = z - z0 as f32;

        let h00 = self.get(x0, z0);
        let h10 = self.get(x1, z0);
        let h01 = self.get(x0, z1);
        let h11 = self.get(x1, z1);

        let top = h00 + (h10 - h00) * fx;
        let bottom = h01 + (h11 - h01) * fx;
        top + (bottom - top) * fz
    }
}
