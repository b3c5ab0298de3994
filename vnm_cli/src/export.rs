use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use image::ImageError;
use lib_vnm::constants::MAX_PALETTE_LEN;
use lib_vnm::VnmImage;
use log::debug;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),

    #[error("PNG encoding error: {0}")]
    PngError(#[from] png::EncodingError),

    #[error("Image #{0} has no pixels to export")]
    EmptyImage(usize),
}

/// `img-001.png` style name for a 1-based image number.
pub fn output_path(dir: &Path, number: usize) -> PathBuf {
    dir.join(format!("img-{:03}.png", number))
}

pub fn save_image(image: &VnmImage, dir: &Path, indexed: bool) -> Result<PathBuf, ExportError> {
    let (width, height) = image.surface.dimensions();
    if width == 0 || height == 0 {
        return Err(ExportError::EmptyImage(image.number));
    }

    if !dir.as_os_str().is_empty() && !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let path = output_path(dir, image.number);
    if indexed {
        save_indexed(image, &path)?;
    } else {
        save_rgba(image, &path)?;
    }
    debug!("Image #{} written to {}", image.number, path.display());

    Ok(path)
}

/// RGBA PNG; unset pixels become fully transparent.
fn save_rgba(image: &VnmImage, path: &Path) -> Result<(), ExportError> {
    let (width, height) = image.surface.dimensions();
    image::save_buffer(
        path,
        &image.to_rgba(),
        width as u32,
        height as u32,
        image::ColorType::Rgba8,
    )?;
    Ok(())
}

/// 8-bit indexed PNG carrying the file palette. Unset pixels use index 0, and
/// the placeholder slots below the palette start are marked transparent.
fn save_indexed(image: &VnmImage, path: &Path) -> Result<(), ExportError> {
    let (width, height) = image.surface.dimensions();
    let writer = BufWriter::new(File::create(path)?);

    let mut encoder = png::Encoder::new(writer, width as u32, height as u32);
    encoder.set_color(png::ColorType::Indexed);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_palette(image.palette.to_rgb_table());
    let placeholders = image.palette.start().min(MAX_PALETTE_LEN);
    if placeholders > 0 {
        encoder.set_trns(vec![0u8; placeholders]);
    }

    let mut writer = encoder.write_header()?;
    writer.write_image_data(&image.surface.to_indexed(0))?;
    writer.finish()?;
    Ok(())
}
