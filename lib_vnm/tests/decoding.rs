mod common;

use std::io::{Cursor, Write};

use common::{grey_palette, VnmBuilder};
use lib_vnm::constants::TRANSPARENT_INDEX;
use lib_vnm::{
    decode_all, decode_file, decode_one, inspect, inspect_image, ImageKind, PaletteIndex,
    VnmReader,
};

const T: u8 = TRANSPARENT_INDEX;

fn sample_file() -> VnmBuilder {
    VnmBuilder::new()
        .palette(10, &[[1, 2, 3], [4, 5, 6], [63, 63, 63]])
        .bitmap(3, 2, &[10, 11, 12, 12, T, 10])
        .sprite(4, &[&[252, 0], &[0, 10, 11, 12, 10]])
        .bitmap(1, 1, &[11])
}

#[test]
fn test_decode_all_yields_every_image() {
    let data = sample_file().build();
    let file = decode_all(Cursor::new(data)).unwrap();

    assert_eq!(file.images.len(), file.header.images_count as usize);
    assert_eq!(file.images.len(), 3);

    let dims: Vec<_> = file
        .decoded()
        .map(|image| (image.number, image.surface.dimensions()))
        .collect();
    assert_eq!(dims, vec![(1, (3, 2)), (2, (4, 2)), (3, (1, 1))]);
}

#[test]
fn test_palette_from_file() {
    let data = VnmBuilder::new()
        .palette(2, &[[1, 2, 3]])
        .bitmap(1, 1, &[2])
        .build();
    let file = decode_all(Cursor::new(data)).unwrap();

    let colors = file.palette.colors();
    assert_eq!(colors.len(), 3);
    assert_eq!(colors[0], [0, 0, 0, 255]);
    assert_eq!(colors[1], [0, 0, 0, 255]);
    assert_eq!(colors[2], [4, 8, 12, 255]);
}

#[test]
fn test_bitmap_decode_is_repeatable() {
    let data = VnmBuilder::new()
        .palette(0, &grey_palette())
        .bitmap(4, 3, &[0, 1, 2, 3, 4, T, 6, 7, 8, 9, T, 255])
        .build();

    let first = decode_one(Cursor::new(data.clone()), 1).unwrap();
    let second = decode_one(Cursor::new(data), 1).unwrap();
    assert_eq!(first.surface, second.surface);
    assert_eq!(first.surface.get(1, 1), Some(PaletteIndex::Transparent));
    assert_eq!(first.surface.get(3, 2), Some(PaletteIndex::Color(255)));
}

#[test]
fn test_sprite_escape_row_stays_unset() {
    let width = 6;
    let data = VnmBuilder::new()
        .palette(0, &grey_palette())
        .sprite(width, &[&[(256 - width) as u8, 0], &[0, 1, 2, 3, 4, 5]])
        .build();
    let image = decode_one(Cursor::new(data), 1).unwrap();

    for x in 0..width as usize {
        assert_eq!(image.surface.get(x, 0), Some(PaletteIndex::Transparent));
    }
    // Leading literal dropped, the sixth pixel falls back to transparency.
    assert_eq!(image.surface.get(0, 1), Some(PaletteIndex::Color(1)));
    assert_eq!(image.surface.get(4, 1), Some(PaletteIndex::Color(5)));
    assert_eq!(image.surface.get(5, 1), Some(PaletteIndex::Transparent));
}

#[test]
fn test_sprite_literal_and_escape_boundary() {
    // width 10: 245 is a literal, 246 a run of ten.
    let data = VnmBuilder::new()
        .palette(0, &grey_palette())
        .sprite(10, &[&[0, 245, 246, 0], &[0, 246, 0]])
        .build();
    let image = decode_one(Cursor::new(data), 1).unwrap();

    assert_eq!(image.surface.get(0, 0), Some(PaletteIndex::Color(245)));
    for x in 1..10 {
        assert_eq!(image.surface.get(x, 0), Some(PaletteIndex::Transparent));
    }
    for x in 0..10 {
        assert_eq!(image.surface.get(x, 1), Some(PaletteIndex::Transparent));
    }
}

#[test]
fn test_decode_one_matches_decode_all() {
    let data = sample_file().build();
    let file = decode_all(Cursor::new(data.clone())).unwrap();
    let second = decode_one(Cursor::new(data), 2).unwrap();

    let from_all = file.images[1].as_ref().unwrap();
    assert_eq!(from_all.surface, second.surface);
    assert_eq!(from_all.header, second.header);
    assert_eq!(second.number, 2);
}

#[test]
fn test_inspect() {
    let data = sample_file().build();
    let summary = inspect(Cursor::new(data.clone())).unwrap();

    assert_eq!(summary.size as usize, data.len());
    assert_eq!(summary.palette_colors, 3);
    assert_eq!(summary.images, 3);

    let image = inspect_image(Cursor::new(data), 2).unwrap();
    assert_eq!(image.kind, ImageKind::Sprite);
    assert_eq!((image.width, image.height), (4, 2));
}

#[test]
fn test_reader_caches_palette() {
    let data = sample_file().build();
    let mut reader = VnmReader::new(Cursor::new(data)).unwrap();

    let first = reader.palette().unwrap();
    let image = reader.decode_one(3).unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &image.palette));
    assert_eq!(reader.image_offsets().unwrap().len(), 3);
}

#[test]
fn test_rgba_uses_palette() {
    let data = sample_file().build();
    let image = decode_one(Cursor::new(data), 3).unwrap();
    assert_eq!(image.to_rgba(), vec![16, 20, 24, 255]);
}

#[test]
fn test_decode_file_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&sample_file().build()).unwrap();
    file.flush().unwrap();

    let decoded = decode_file(file.path()).unwrap();
    assert_eq!(decoded.decoded().count(), 3);

    let mut reader = lib_vnm::open(file.path()).unwrap();
    assert_eq!(reader.image_summary(1).unwrap().kind, ImageKind::Bitmap);
}

#[test]
fn test_long_palette_keeps_images() {
    let data = VnmBuilder::new()
        .palette(10, &grey_palette())
        .bitmap(2, 1, &[10, 255])
        .build();
    let file = decode_all(Cursor::new(data)).unwrap();

    assert_eq!(file.palette.len(), 256);
    let image = file.images[0].as_ref().unwrap();
    assert_eq!(image.to_rgba(), vec![0, 0, 0, 255, 244, 244, 244, 255]);
}
