//! Block/span partitioning of a generated height field.
//!
//! Blocks are fixed-size tiles of the height field; spans group blocks into
//! a coarser fixed 2D grid. Both carry min/max elevation bounds so a
//! renderer can frustum-cull at span granularity before descending to
//! blocks. Rendering itself is out of scope here; this module only owns the
//! data structures that make it possible.

use super::height_field::HeightField;
use crate::error::{Error, Result};

/// Rendering-intent flag shared by camera and terrain. Mutated only through
/// explicit toggles, never as a side effect of queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    WireFrame,
}

/// One `block_size` x `block_size` tile of the height field. `grid_x` /
/// `grid_z` index the block grid, not the cell grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block {
    pub grid_x: usize,
    pub grid_z: usize,
    pub min_height: f32,
    pub max_height: f32,
}

/// A `span_size` x `span_size` group of contiguous blocks with their
/// aggregate elevation bounds. Spans form a fixed 2D grouping; the grouping
/// is chosen at partition time and never rebalanced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub grid_x: usize,
    pub grid_z: usize,
    pub min_height: f32,
    pub max_height: f32,
}

#[derive(Debug, Clone)]
pub struct Terrain {
    height_field: HeightField,
    block_size: usize,
    span_size: usize,
    blocks_per_side: usize,
    spans_per_side: usize,
    blocks: Vec<Block>,
    spans: Vec<Span>,
    mode: Mode,
}

impl Terrain {
    /// Partition `height_field` into blocks and spans.
    ///
    /// The block grid must exactly tile the field and the span grid must
    /// exactly tile the block grid; any remainder is a configuration error,
    /// never a silent truncation.
    pub fn partition(height_field: HeightField, block_size: i64, span_size: i64) -> Result<Self> {
        if block_size <= 0 {
            return Err(Error::configuration(format!(
                "terrain block size must be positive, got {}",
                block_size
            )));
        }
        if span_size <= 0 {
            return Err(Error::configuration(format!(
                "terrain span size must be positive, got {}",
                span_size
            )));
        }

        let size = height_field.size();
        let block_size = block_size as usize;
        let span_size = span_size as usize;

        if size % block_size != 0 {
            return Err(Error::configuration(format!(
                "generator size {} is not divisible into blocks of {}",
                size, block_size
            )));
        }
        let blocks_per_side = size / block_size;
        if blocks_per_side % span_size != 0 {
            return Err(Error::configuration(format!(
                "{} blocks per side is not divisible into spans of {}",
                blocks_per_side, span_size
            )));
        }
        let spans_per_side = blocks_per_side / span_size;

        let blocks = build_blocks(&height_field, block_size, blocks_per_side);
        let spans = build_spans(&blocks, blocks_per_side, span_size, spans_per_side);

        log::info!(
            "[Terrain] Partitioned {}x{} field into {}x{} blocks ({} cells) and {}x{} spans",
            size,
            size,
            blocks_per_side,
            blocks_per_side,
            block_size,
            spans_per_side,
            spans_per_side
        );

        Ok(Self {
            height_field,
            block_size,
            span_size,
            blocks_per_side,
            spans_per_side,
            blocks,
            spans,
            mode: Mode::Normal,
        })
    }

    /// Bilinearly interpolated height at fractional grid coordinates,
    /// clamped to the field bounds. Never errors, never reads out of range.
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        self.height_field.sample(x, z)
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn height_field(&self) -> &HeightField {
        &self.height_field
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn span_size(&self) -> usize {
        self.span_size
    }

    pub fn blocks_per_side(&self) -> usize {
        self.blocks_per_side
    }

    pub fn spans_per_side(&self) -> usize {
        self.spans_per_side
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn block(&self, grid_x: usize, grid_z: usize) -> Option<&Block> {
        if grid_x >= self.blocks_per_side || grid_z >= self.blocks_per_side {
            return None;
        }
        Some(&self.blocks[grid_z * self.blocks_per_side + grid_x])
    }

    pub fn span(&self, grid_x: usize, grid_z: usize) -> Option<&Span> {
        if grid_x >= self.spans_per_side || grid_z >= self.spans_per_side {
            return None;
        }
        Some(&self.spans[grid_z * self.spans_per_side + grid_x])
    }
}

/// Elevation bounds over one block. A block of `block_size` cells spans
/// `block_size + 1` vertices shared with its neighbors, so the closing
/// vertex row/column is included (clamped at the field edge).
fn block_bounds(field: &HeightField, grid_x: usize, grid_z: usize, block_size: usize) -> (f32, f32) {
    let x0 = grid_x * block_size;
    let z0 = grid_z * block_size;
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for z in z0..=z0 + block_size {
        for x in x0..=x0 + block_size {
            let h = field.get(x, z);
            min = min.min(h);
            max = max.max(h);
        }
    }
    (min, max)
}

fn build_blocks(field: &HeightField, block_size: usize, blocks_per_side: usize) -> Vec<Block> {
    let mut blocks = Vec::with_capacity(blocks_per_side * blocks_per_side);
    for grid_z in 0..blocks_per_side {
        for grid_x in 0..blocks_per_side {
            let (min_height, max_height) = block_bounds(field, grid_x, grid_z, block_size);
            blocks.push(Block {
                grid_x,
                grid_z,
                min_height,
                max_height,
            });
        }
    }
    blocks
}

fn build_spans(
    blocks: &[Block],
    blocks_per_side: usize,
    span_size: usize,
    spans_per_side: usize,
) -> Vec<Span> {
    let mut spans = Vec::with_capacity(spans_per_side * spans_per_side);
    for span_z in 0..spans_per_side {
        for span_x in 0..spans_per_side {
            let mut min = f32::INFINITY;
            let mut max = f32::NEG_INFINITY;
            for bz in 0..span_size {
                for bx in 0..span_size {
                    let block = &blocks[(span_z * span_size + bz) * blocks_per_side
                        + span_x * span_size
                        + bx];
                    min = min.min(block.min_height);
                    max = max.max(block.max_height);
                }
            }
            spans.push(Span {
                grid_x: span_x,
                grid_z: span_z,
                min_height: min,
                max_height: max,
            });
        }
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(size: usize) -> HeightField {
        let mut f = HeightField::new(size);
        for z in 0..size {
            for x in 0..size {
                f.set(x, z, (x + z) as f32);
            }
        }
        f
    }

    #[test]
    fn partition_tiles_exactly_with_no_overlap_or_gap() {
        let terrain = Terrain::partition(field(64), 8, 4).unwrap();
        assert_eq!(terrain.blocks_per_side(), 8);
        assert_eq!(terrain.spans_per_side(), 2);
        assert_eq!(terrain.blocks().len(), 64);
        assert_eq!(terrain.spans().len(), 4);

        // Every cell belongs to exactly one block region.
        let mut covered = vec![0u8; 64 * 64];
        for block in terrain.blocks() {
            for z in 0..8 {
                for x in 0..8 {
                    covered[(block.grid_z * 8 + z) * 64 + block.grid_x * 8 + x] += 1;
                }
            }
        }
        assert!(covered.iter().all(|&c| c == 1));
    }

    #[test]
    fn indivisible_block_size_is_a_configuration_error() {
        let err = Terrain::partition(field(63), 8, 4).unwrap_err();
        assert!(matches!(err, crate::error::Error::Configuration { .. }));
    }

    #[test]
    fn indivisible_span_size_is_a_configuration_error() {
        // 64 / 8 = 8 blocks per side, not divisible into spans of 3.
        let err = Terrain::partition(field(64), 8, 3).unwrap_err();
        assert!(matches!(err, crate::error::Error::Configuration { .. }));
    }

    #[test]
    fn non_positive_sizes_are_rejected() {
        assert!(Terrain::partition(field(64), 0, 4).is_err());
        assert!(Terrain::partition(field(64), -8, 4).is_err());
        assert!(Terrain::partition(field(64), 8, 0).is_err());
    }

    #[test]
    fn block_bounds_cover_shared_edge_vertices() {
        let terrain = Terrain::partition(field(16), 8, 2).unwrap();
        let block = terrain.block(0, 0).unwrap();
        // Ramp field: block (0,0) covers vertices up to (8,8) inclusive.
        assert_eq!(block.min_height, 0.0);
        assert_eq!(block.max_height, 16.0);
    }

    #[test]
    fn span_bounds_aggregate_their_blocks() {
        let terrain = Terrain::partition(field(16), 4, 2).unwrap();
        for span in terrain.spans() {
            let mut min = f32::INFINITY;
            let mut max = f32::NEG_INFINITY;
            for bz in 0..2 {
                for bx in 0..2 {
                    let block = terrain
                        .block(span.grid_x * 2 + bx, span.grid_z * 2 + bz)
                        .unwrap();
                    min = min.min(block.min_height);
                    max = max.max(block.max_height);
                }
            }
            assert_eq!((span.min_height, span.max_height), (min, max));
        }
    }

    #[test]
    fn mode_toggle_is_idempotent() {
        let mut terrain = Terrain::partition(field(16), 4, 2).unwrap();
        assert_eq!(terrain.mode(), Mode::Normal);
        terrain.set_mode(Mode::WireFrame);
        terrain.set_mode(Mode::WireFrame);
        assert_eq!(terrain.mode(), Mode::WireFrame);
        terrain.set_mode(Mode::Normal);
        assert_eq!(terrain.mode(), Mode::Normal);
    }

    #[test]
    fn height_at_clamps_like_the_field() {
        let terrain = Terrain::partition(field(16), 4, 2).unwrap();
        assert_eq!(terrain.height_at(-10.0, 3.0), terrain.height_at(0.0, 3.0));
        assert_eq!(terrain.height_at(50.0, 3.0), terrain.height_at(15.0, 3.0));
    }
}
