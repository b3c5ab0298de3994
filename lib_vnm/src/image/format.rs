use std::fmt;
use std::io::{self, Read};

use byteorder::{LittleEndian, ReadBytesExt};
use log::{debug, error};
use serde::Serialize;

use crate::constants::{MAX_DIMENSION, MAX_PIXELS, SIGNATURE};
use crate::error::{DecodeError, IoContext, Section};

/// Fixed 40-byte header at the start of every VNM file. All fields are
/// little-endian u32, stored in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub signature: u32,
    /// Always zero in known files.
    pub flags: u32,
    pub size: u32,
    pub palette_offset: u32,
    pub unknown1_offset: u32,
    pub unknown2_offset: u32,
    pub images_index_offset: u32,
    /// First palette slot stored in the file; slots below it are placeholders.
    pub palette_start: u32,
    pub palette_size: u32,
    pub images_count: u32,
}

impl FileHeader {
    pub const SIZE: usize = 10 * std::mem::size_of::<u32>();

    /// Reads the header from the current position and checks the signature.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self, DecodeError> {
        let mut raw = [0u8; Self::SIZE];
        reader.read_exact(&mut raw).map_err(|err| {
            if err.kind() == io::ErrorKind::UnexpectedEof {
                error!("File is shorter than the {}-byte header", Self::SIZE);
                DecodeError::TruncatedHeader
            } else {
                DecodeError::Io {
                    section: Section::Header,
                    source: err,
                }
            }
        })?;

        let mut fields = &raw[..];
        let mut next = || fields.read_u32::<LittleEndian>().within(Section::Header);
        let header = FileHeader {
            signature: next()?,
            flags: next()?,
            size: next()?,
            palette_offset: next()?,
            unknown1_offset: next()?,
            unknown2_offset: next()?,
            images_index_offset: next()?,
            palette_start: next()?,
            palette_size: next()?,
            images_count: next()?,
        };

        if header.signature != SIGNATURE {
            error!("Invalid signature {:#010x}", header.signature);
            return Err(DecodeError::InvalidSignature {
                found: header.signature,
            });
        }
        debug!("File header: {:?}", header);

        Ok(header)
    }

    pub fn summary(&self) -> FileSummary {
        FileSummary {
            size: self.size,
            palette_colors: self.palette_size,
            images: self.images_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Bitmap,
    Sprite,
}

impl ImageKind {
    pub fn from_raw(kind: u32) -> Option<Self> {
        match kind {
            0 => Some(ImageKind::Bitmap),
            1 => Some(ImageKind::Sprite),
            _ => None,
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageKind::Bitmap => write!(f, "bitmap"),
            ImageKind::Sprite => write!(f, "sprite"),
        }
    }
}

/// The 24-byte sub-header each image index entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    /// Absolute offset of the pixel data (or of the row table for sprites).
    pub offset: u32,
    pub kind: ImageKind,
    pub width: i32,
    pub height: i32,
    pub x_pos: i32,
    pub y_pos: i32,
}

impl ImageHeader {
    pub const SIZE: usize = 6 * std::mem::size_of::<u32>();

    /// Reads the sub-header of image `number` (1-based) from the current position.
    pub fn read<R: Read>(reader: &mut R, number: usize) -> Result<Self, DecodeError> {
        let section = Section::ImageHeader { image: number };
        let mut raw = [0u8; Self::SIZE];
        reader.read_exact(&mut raw).within(section)?;

        let mut fields = &raw[..];
        let offset = fields.read_u32::<LittleEndian>().within(section)?;
        let kind = fields.read_u32::<LittleEndian>().within(section)?;
        let width = fields.read_i32::<LittleEndian>().within(section)?;
        let height = fields.read_i32::<LittleEndian>().within(section)?;
        let x_pos = fields.read_i32::<LittleEndian>().within(section)?;
        let y_pos = fields.read_i32::<LittleEndian>().within(section)?;

        let kind = ImageKind::from_raw(kind).ok_or_else(|| {
            error!("Image #{} has unknown type {}", number, kind);
            DecodeError::UnknownImageType {
                image: number,
                kind,
            }
        })?;

        if !(0..=MAX_DIMENSION).contains(&width)
            || !(0..=MAX_DIMENSION).contains(&height)
            || width as u64 * height as u64 > MAX_PIXELS
        {
            error!("Image #{} has invalid dimensions {}x{}", number, width, height);
            return Err(DecodeError::InvalidDimensions {
                image: number,
                width,
                height,
            });
        }

        let header = ImageHeader {
            offset,
            kind,
            width,
            height,
            x_pos,
            y_pos,
        };
        debug!("Image #{} header: {:?}", number, header);
        Ok(header)
    }

    /// Width in pixels; never negative once the header has been read.
    pub fn width(&self) -> usize {
        self.width as usize
    }

    pub fn height(&self) -> usize {
        self.height as usize
    }

    pub fn summary(&self) -> ImageSummary {
        ImageSummary {
            kind: self.kind,
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub size: u32,
    pub palette_colors: u32,
    pub images: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageSummary {
    pub kind: ImageKind,
    pub width: i32,
    pub height: i32,
}
