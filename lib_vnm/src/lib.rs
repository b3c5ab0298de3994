pub mod constants;
pub mod error;
pub mod image;
pub mod pixels;

use log::*;
use std::io::Write;

pub use crate::error::{DecodeError, Section};
pub use crate::image::decoder::{VnmFile, VnmImage, VnmReader};
pub use crate::image::format::{FileHeader, FileSummary, ImageHeader, ImageKind, ImageSummary};
pub use crate::image::palette::{Palette, PaletteIndex};
pub use crate::image::{decode_all, decode_file, decode_one, inspect, inspect_image, open};
pub use crate::pixels::PixelSurface;

pub fn init_logging(level: LevelFilter) {
    env_logger::Builder::new()
        .target(env_logger::Target::Stderr)
        .filter(Some("lib_vnm"), level)
        .filter(Some("vnm"), level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}:{}] {}",
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}
