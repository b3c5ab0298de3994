pub mod decoder;
pub mod format;
pub mod palette;

pub use decoder::{decode_all, decode_file, decode_one, inspect, inspect_image, open};
