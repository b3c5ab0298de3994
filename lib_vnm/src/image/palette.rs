use std::io::{self, Read, Seek, SeekFrom};

use log::{debug, error, warn};

use super::format::FileHeader;
use crate::constants::{MAX_PALETTE_LEN, TRANSPARENT_INDEX};
use crate::error::{DecodeError, IoContext, Section};

/// Color of the slots below `palette_start`.
pub const PLACEHOLDER: [u8; 4] = [0, 0, 0, 255];

/// A decoded pixel: either a palette slot to paint or the reserved
/// transparency marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaletteIndex {
    #[default]
    Transparent,
    Color(u8),
}

impl PaletteIndex {
    pub fn from_raw(value: u8) -> Self {
        if value == TRANSPARENT_INDEX {
            PaletteIndex::Transparent
        } else {
            PaletteIndex::Color(value)
        }
    }

    pub fn is_transparent(self) -> bool {
        self == PaletteIndex::Transparent
    }
}

/// The file's global color table, RGBA per slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<[u8; 4]>,
    start: usize,
}

impl Palette {
    /// Builds a palette from the colors stored in the file, padding the first
    /// `start` slots with [`PLACEHOLDER`].
    pub fn new(start: usize, file_colors: &[[u8; 4]]) -> Self {
        let mut colors = vec![PLACEHOLDER; start];
        colors.extend_from_slice(file_colors);
        Self { colors, start }
    }

    /// Resolves the palette described by `header`, seeking to its offset first.
    pub fn read<R: Read + Seek>(reader: &mut R, header: &FileHeader) -> Result<Self, DecodeError> {
        let start = header.palette_start as u64;
        let size = header.palette_size as u64;
        let end = start + size;
        let max = MAX_PALETTE_LEN as u64;
        if end > max {
            warn!(
                "Palette of {} entries is longer than {}, slots past {} are dropped",
                end,
                max,
                max - 1
            );
        }

        reader
            .seek(SeekFrom::Start(header.palette_offset as u64))
            .within(Section::Palette)?;

        // Entries past the last slot are still read so a short palette is caught.
        let mut file_colors = Vec::with_capacity(end.min(max).saturating_sub(start) as usize);
        for i in start..end {
            let mut rgb = [0u8; 3];
            reader.read_exact(&mut rgb).map_err(|err| {
                if err.kind() == io::ErrorKind::UnexpectedEof {
                    error!("Unexpected end of data while reading palette color #{}", i);
                    DecodeError::TruncatedPalette(i as usize)
                } else {
                    DecodeError::Io {
                        section: Section::Palette,
                        source: err,
                    }
                }
            })?;
            if i < max {
                file_colors.push(expand(rgb));
            }
        }
        debug!(
            "Palette resolved: {} placeholders, {} colors from offset {}",
            start.min(max),
            file_colors.len(),
            header.palette_offset
        );

        Ok(Self::new(start.min(max) as usize, &file_colors))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// First slot read from the file.
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn colors(&self) -> &[[u8; 4]] {
        &self.colors
    }

    /// RGBA for a slot, `None` for the transparency marker or a slot past the end.
    pub fn get(&self, index: PaletteIndex) -> Option<[u8; 4]> {
        match index {
            PaletteIndex::Transparent => None,
            PaletteIndex::Color(i) => self.colors.get(i as usize).copied(),
        }
    }

    /// Packed RGB triples for all slots, padded to 256 entries, as indexed
    /// image encoders expect.
    pub fn to_rgb_table(&self) -> Vec<u8> {
        let mut table = Vec::with_capacity(MAX_PALETTE_LEN * 3);
        for color in &self.colors {
            table.extend_from_slice(&color[..3]);
        }
        table.resize(MAX_PALETTE_LEN * 3, 0);
        table
    }
}

/// 6-bit VGA channels to 8-bit, fully opaque.
fn expand(rgb: [u8; 3]) -> [u8; 4] {
    [rgb[0] << 2, rgb[1] << 2, rgb[2] << 2, 0xff]
}
