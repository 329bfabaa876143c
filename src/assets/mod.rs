//! Owned 2D sprite resources.
//!
//! Images, sprites, and sprite sheets are plain owned values whose lifetime
//! is scoped to whatever owns the render path; there is no process-wide
//! asset state. Decoding happens here; uploading and drawing belong to the
//! renderer.

use std::path::Path;

use crate::error::{Error, Result};

/// Decoded RGBA8 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Image {
    /// Decode a PNG (or any format the `image` crate recognizes) into RGBA8.
    pub fn load(path: &Path) -> Result<Self> {
        let decoded = image::open(path).map_err(|e| Error::Asset {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        log::debug!("[Assets] Loaded {} ({}x{})", path.display(), width, height);
        Ok(Self {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }

    /// Build an image from raw RGBA8 bytes. Length must match the
    /// dimensions exactly.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        if pixels.len() != (width as usize) * (height as usize) * 4 {
            return Err(Error::Asset {
                path: String::from("<memory>"),
                message: format!(
                    "{} bytes does not match {}x{} RGBA8",
                    pixels.len(),
                    width,
                    height
                ),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// Normalized sub-rectangle of an image, in [0, 1] texture coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

impl Region {
    pub const FULL: Region = Region {
        u0: 0.0,
        v0: 0.0,
        u1: 1.0,
        v1: 1.0,
    };
}

/// One drawable image region.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    image: Image,
    region: Region,
}

impl Sprite {
    pub fn new(image: Image) -> Self {
        Self {
            image,
            region: Region::FULL,
        }
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn region(&self) -> Region {
        self.region
    }
}

/// Regular grid of equally sized cells over one image.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSheet {
    image: Image,
    columns: u32,
    rows: u32,
}

impl SpriteSheet {
    pub fn new(image: Image, columns: u32, rows: u32) -> Result<Self> {
        if columns == 0 || rows == 0 {
            return Err(Error::Asset {
                path: String::from("<sheet>"),
                message: format!("sheet grid {}x{} must be non-empty", columns, rows),
            });
        }
        if image.width() % columns != 0 || image.height() % rows != 0 {
            return Err(Error::Asset {
                path: String::from("<sheet>"),
                message: format!(
                    "{}x{} image does not divide into a {}x{} grid",
                    image.width(),
                    image.height(),
                    columns,
                    rows
                ),
            });
        }
        Ok(Self {
            image,
            columns,
            rows,
        })
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn cell_count(&self) -> u32 {
        self.columns * self.rows
    }

    /// Texture region of cell `index`, row-major. Out-of-range indices are
    /// None, not a panic.
    pub fn cell(&self, index: u32) -> Option<Region> {
        if index >= self.cell_count() {
            return None;
        }
        let col = index % self.columns;
        let row = index / self.columns;
        let w = 1.0 / self.columns as f32;
        let h = 1.0 / self.rows as f32;
        Some(Region {
            u0: col as f32 * w,
            v0: row as f32 * h,
            u1: (col + 1) as f32 * w,
            v1: (row + 1) as f32 * h,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: u32, height: u32) -> Image {
        Image::from_rgba8(width, height, vec![255; (width * height * 4) as usize]).unwrap()
    }

    #[test]
    fn raw_image_length_is_validated() {
        assert!(Image::from_rgba8(2, 2, vec![0; 16]).is_ok());
        assert!(Image::from_rgba8(2, 2, vec![0; 15]).is_err());
    }

    #[test]
    fn sheet_cells_tile_the_unit_square() {
        let sheet = SpriteSheet::new(checker(4, 4), 2, 2).unwrap();
        assert_eq!(sheet.cell_count(), 4);

        let c0 = sheet.cell(0).unwrap();
        assert_eq!((c0.u0, c0.v0, c0.u1, c0.v1), (0.0, 0.0, 0.5, 0.5));
        let c3 = sheet.cell(3).unwrap();
        assert_eq!((c3.u0, c3.v0, c3.u1, c3.v1), (0.5, 0.5, 1.0, 1.0));
        assert!(sheet.cell(4).is_none());
    }

    #[test]
    fn sheet_rejects_grids_that_do_not_divide_the_image() {
        assert!(SpriteSheet::new(checker(5, 4), 2, 2).is_err());
        assert!(SpriteSheet::new(checker(4, 4), 0, 2).is_err());
    }

    #[test]
    fn sprite_defaults_to_the_full_region() {
        let sprite = Sprite::new(checker(2, 2));
        assert_eq!(sprite.region(), Region::FULL);
    }
}
