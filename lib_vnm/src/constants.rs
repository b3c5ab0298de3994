pub const FORMAT_NAME: &str = "Viacom New Media Graphics";
pub const FILE_EXT: &str = "vnm";

/// `VNM\x1A` read as a little-endian u32.
pub const SIGNATURE: u32 = 0x1A4D_4E56;
pub const SIGNATURE_BYTES: [u8; 4] = *b"VNM\x1a";

/// Palette slot the format reserves as "leave this pixel alone".
pub const TRANSPARENT_INDEX: u8 = 189;

/// A u8 pixel value cannot address more entries than this.
pub const MAX_PALETTE_LEN: usize = 256;

/// Upper bound on either side of an image.
pub const MAX_DIMENSION: i32 = u16::MAX as i32;

/// Upper bound on `width * height`. Sprites never fail on short rows, so
/// the pixel buffer is sized from the header alone.
pub const MAX_PIXELS: u64 = 1 << 24;
