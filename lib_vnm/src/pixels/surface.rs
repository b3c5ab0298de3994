use crate::image::palette::{Palette, PaletteIndex};

/// A `width` x `height` grid of palette indices, rows top to bottom.
/// Pixels start out unset ([`PaletteIndex::Transparent`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelSurface {
    width: usize,
    height: usize,
    pixels: Vec<PaletteIndex>,
}

impl PixelSurface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![PaletteIndex::Transparent; width * height],
        }
    }

    /// Paints decoded index bytes onto a fresh surface, leaving pixels that
    /// hold the transparency index unset.
    pub fn materialize(width: usize, height: usize, indices: &[u8]) -> Self {
        let mut surface = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let i = width * y + x;
                if let Some(&value) = indices.get(i) {
                    let index = PaletteIndex::from_raw(value);
                    if !index.is_transparent() {
                        surface.pixels[i] = index;
                    }
                }
            }
        }
        surface
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<PaletteIndex> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.width * y + x).copied()
    }

    pub fn pixels(&self) -> &[PaletteIndex] {
        &self.pixels
    }

    /// Flat RGBA, four bytes per pixel. Unset pixels and indices outside the
    /// palette come out fully transparent.
    pub fn to_rgba(&self, palette: &Palette) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.pixels.len() * 4);
        for &index in &self.pixels {
            rgba.extend_from_slice(&palette.get(index).unwrap_or([0, 0, 0, 0]));
        }
        rgba
    }

    /// Flat 8-bit indices with unset pixels replaced by `background`.
    pub fn to_indexed(&self, background: u8) -> Vec<u8> {
        self.pixels
            .iter()
            .map(|index| match index {
                PaletteIndex::Transparent => background,
                PaletteIndex::Color(value) => *value,
            })
            .collect()
    }
}
