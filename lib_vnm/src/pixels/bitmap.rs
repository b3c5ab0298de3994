use std::io::{Read, Seek, SeekFrom};

use log::error;

use crate::error::{DecodeError, IoContext, Section};
use crate::image::format::ImageHeader;

/// Reads an uncompressed bitmap: `height` rows of exactly `width` bytes,
/// back to back from the image's data offset.
///
/// # Errors
/// - Returns `DecodeError::TruncatedBitmap` if any row comes up short
pub fn decode_bitmap<R: Read + Seek>(
    reader: &mut R,
    header: &ImageHeader,
    number: usize,
) -> Result<Vec<u8>, DecodeError> {
    let section = Section::Bitmap { image: number };
    let (width, height) = (header.width(), header.height());

    reader
        .seek(SeekFrom::Start(header.offset as u64))
        .within(section)?;

    let mut data = Vec::new();
    for row in 0..height {
        let actual = reader
            .by_ref()
            .take(width as u64)
            .read_to_end(&mut data)
            .within(section)?;
        if actual < width {
            error!(
                "Image #{}: bitmap row {} has {} of {} bytes",
                number, row, actual, width
            );
            return Err(DecodeError::TruncatedBitmap {
                image: number,
                row,
                expected: width,
                actual,
            });
        }
    }

    Ok(data)
}
