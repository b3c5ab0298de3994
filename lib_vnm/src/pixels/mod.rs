pub mod bitmap;
pub mod sprite;
pub mod surface;

use std::io::{Read, Seek};

use log::debug;

use crate::error::DecodeError;
use crate::image::format::{ImageHeader, ImageKind};
pub use surface::PixelSurface;

/// Decodes the pixel data of image `number` with the scheme its header names
/// and materializes it onto a surface.
pub fn decode_pixels<R: Read + Seek>(
    reader: &mut R,
    header: &ImageHeader,
    number: usize,
) -> Result<PixelSurface, DecodeError> {
    let indices = match header.kind {
        ImageKind::Bitmap => bitmap::decode_bitmap(reader, header, number)?,
        ImageKind::Sprite => sprite::decode_sprite(reader, header, number)?,
    };
    debug!(
        "Image #{}: decoded {} {} bytes",
        number,
        indices.len(),
        header.kind
    );

    Ok(PixelSurface::materialize(
        header.width(),
        header.height(),
        &indices,
    ))
}
