#![allow(dead_code)]

use std::cell::Cell;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::rc::Rc;

use lib_vnm::constants::SIGNATURE;

pub const HEADER_SIZE: usize = 40;
pub const IMAGE_HEADER_SIZE: usize = 24;

pub enum TestImage {
    Bitmap {
        width: i32,
        height: i32,
        pixels: Vec<u8>,
    },
    Sprite {
        width: i32,
        height: i32,
        rows: Vec<Vec<u8>>,
    },
    /// A sub-header with an arbitrary type and no pixel data.
    Raw { kind: u32, width: i32, height: i32 },
}

/// Lays out a complete VNM file: header, palette, image index, sub-headers,
/// then each image's pixel data.
pub struct VnmBuilder {
    palette_start: u32,
    palette: Vec<[u8; 3]>,
    images: Vec<TestImage>,
}

impl VnmBuilder {
    pub fn new() -> Self {
        Self {
            palette_start: 0,
            palette: Vec::new(),
            images: Vec::new(),
        }
    }

    pub fn palette(mut self, start: u32, colors: &[[u8; 3]]) -> Self {
        self.palette_start = start;
        self.palette = colors.to_vec();
        self
    }

    pub fn bitmap(mut self, width: i32, height: i32, pixels: &[u8]) -> Self {
        self.images.push(TestImage::Bitmap {
            width,
            height,
            pixels: pixels.to_vec(),
        });
        self
    }

    pub fn sprite(mut self, width: i32, rows: &[&[u8]]) -> Self {
        self.images.push(TestImage::Sprite {
            width,
            height: rows.len() as i32,
            rows: rows.iter().map(|row| row.to_vec()).collect(),
        });
        self
    }

    pub fn raw(mut self, kind: u32, width: i32, height: i32) -> Self {
        self.images.push(TestImage::Raw {
            kind,
            width,
            height,
        });
        self
    }

    pub fn palette_offset(&self) -> usize {
        HEADER_SIZE
    }

    pub fn index_offset(&self) -> usize {
        self.palette_offset() + 3 * self.palette.len()
    }

    pub fn build(&self) -> Vec<u8> {
        let count = self.images.len();
        let index_offset = self.index_offset();
        let headers_offset = index_offset + 4 * count;
        let mut data_offset = headers_offset + IMAGE_HEADER_SIZE * count;

        let mut index = Vec::new();
        let mut headers = Vec::new();
        let mut pixel_data = Vec::new();
        for (i, image) in self.images.iter().enumerate() {
            push_u32(&mut index, (headers_offset + IMAGE_HEADER_SIZE * i) as u32);

            let (kind, width, height) = match image {
                TestImage::Bitmap { width, height, .. } => (0, *width, *height),
                TestImage::Sprite { width, height, .. } => (1, *width, *height),
                TestImage::Raw {
                    kind,
                    width,
                    height,
                } => (*kind, *width, *height),
            };
            push_u32(&mut headers, data_offset as u32);
            push_u32(&mut headers, kind);
            push_i32(&mut headers, width);
            push_i32(&mut headers, height);
            push_i32(&mut headers, 0);
            push_i32(&mut headers, 0);

            let start = pixel_data.len();
            match image {
                TestImage::Bitmap { pixels, .. } => pixel_data.extend_from_slice(pixels),
                TestImage::Sprite { rows, .. } => {
                    let mut row_offset = data_offset + 4 * rows.len();
                    for row in rows {
                        push_u32(&mut pixel_data, row_offset as u32);
                        row_offset += row.len();
                    }
                    for row in rows {
                        pixel_data.extend_from_slice(row);
                    }
                }
                TestImage::Raw { .. } => {}
            }
            data_offset += pixel_data.len() - start;
        }

        let total = data_offset;
        let mut file = Vec::with_capacity(total);
        push_u32(&mut file, SIGNATURE);
        push_u32(&mut file, 0);
        push_u32(&mut file, total as u32);
        push_u32(&mut file, self.palette_offset() as u32);
        push_u32(&mut file, 0);
        push_u32(&mut file, 0);
        push_u32(&mut file, index_offset as u32);
        push_u32(&mut file, self.palette_start);
        push_u32(&mut file, self.palette.len() as u32);
        push_u32(&mut file, count as u32);
        for color in &self.palette {
            file.extend_from_slice(color);
        }
        file.extend_from_slice(&index);
        file.extend_from_slice(&headers);
        file.extend_from_slice(&pixel_data);
        assert_eq!(file.len(), total);
        file
    }
}

fn push_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn push_i32(buf: &mut Vec<u8>, value: i32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

/// A 256-entry grey ramp in 6-bit channels.
pub fn grey_palette() -> Vec<[u8; 3]> {
    (0..=255u16).map(|i| [(i >> 2) as u8; 3]).collect()
}

/// In-memory source that counts every read and seek.
pub struct Tracked {
    inner: Cursor<Vec<u8>>,
    touches: Rc<Cell<usize>>,
}

impl Tracked {
    pub fn new(data: Vec<u8>) -> (Self, Rc<Cell<usize>>) {
        let touches = Rc::new(Cell::new(0));
        let tracked = Self {
            inner: Cursor::new(data),
            touches: Rc::clone(&touches),
        };
        (tracked, touches)
    }
}

impl Read for Tracked {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.touches.set(self.touches.get() + 1);
        self.inner.read(buf)
    }
}

impl Seek for Tracked {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.touches.set(self.touches.get() + 1);
        self.inner.seek(pos)
    }
}
