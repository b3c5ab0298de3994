use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::constants::SIGNATURE;

/// The part of the file a failed read was working on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Header,
    Palette,
    ImageIndex,
    ImageHeader { image: usize },
    RowOffsets { image: usize },
    SpriteRow { image: usize, row: usize },
    Bitmap { image: usize },
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Header => write!(f, "file header"),
            Section::Palette => write!(f, "palette"),
            Section::ImageIndex => write!(f, "image index"),
            Section::ImageHeader { image } => write!(f, "header of image #{}", image),
            Section::RowOffsets { image } => write!(f, "row offsets of image #{}", image),
            Section::SpriteRow { image, row } => {
                write!(f, "sprite row {} of image #{}", row, image)
            }
            Section::Bitmap { image } => write!(f, "bitmap data of image #{}", image),
        }
    }
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Invalid signature: expected {:#010x}, found {found:#010x}", SIGNATURE)]
    InvalidSignature { found: u32 },
    #[error("Unexpected end of data while reading the file header")]
    TruncatedHeader,
    #[error("Unexpected end of data while reading palette color #{0}")]
    TruncatedPalette(usize),
    #[error("Image #{image}: bitmap row {row} holds {actual} of {expected} bytes")]
    TruncatedBitmap {
        image: usize,
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Image #{image}: unknown image type {kind}")]
    UnknownImageType { image: usize, kind: u32 },
    #[error("Image #{image}: invalid dimensions {width}x{height}")]
    InvalidDimensions { image: usize, width: i32, height: i32 },
    #[error("Invalid image index {requested}: expected a number between 1 and {count}")]
    IndexOutOfRange { requested: usize, count: usize },
    #[error("I/O error while reading {section}")]
    Io {
        section: Section,
        #[source]
        source: io::Error,
    },
    #[error("Could not open {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DecodeError {
    /// Errors that only spoil one image; the rest of the file is still usable.
    pub fn is_image_local(&self) -> bool {
        match self {
            DecodeError::TruncatedBitmap { .. }
            | DecodeError::UnknownImageType { .. }
            | DecodeError::InvalidDimensions { .. } => true,
            DecodeError::Io { section, .. } => matches!(
                section,
                Section::ImageHeader { .. }
                    | Section::RowOffsets { .. }
                    | Section::SpriteRow { .. }
                    | Section::Bitmap { .. }
            ),
            _ => false,
        }
    }
}

/// Attaches the section being read to a low-level I/O failure.
pub(crate) trait IoContext<T> {
    fn within(self, section: Section) -> Result<T, DecodeError>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn within(self, section: Section) -> Result<T, DecodeError> {
        self.map_err(|source| DecodeError::Io { section, source })
    }
}
