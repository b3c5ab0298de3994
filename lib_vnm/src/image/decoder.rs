use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;

use byteorder::{LittleEndian, ReadBytesExt};
use log::{debug, error, info, warn};

use super::format::{FileHeader, FileSummary, ImageHeader, ImageSummary};
use super::palette::Palette;
use crate::error::{DecodeError, IoContext, Section};
use crate::pixels::{decode_pixels, PixelSurface};

/// One decoded image. `number` is its 1-based position in the file.
#[derive(Debug, Clone)]
pub struct VnmImage {
    pub number: usize,
    pub header: ImageHeader,
    pub palette: Arc<Palette>,
    pub surface: PixelSurface,
}

impl VnmImage {
    pub fn summary(&self) -> ImageSummary {
        self.header.summary()
    }

    pub fn to_rgba(&self) -> Vec<u8> {
        self.surface.to_rgba(&self.palette)
    }
}

/// A whole decoded file. Images that failed on their own keep their slot.
#[derive(Debug)]
pub struct VnmFile {
    pub header: FileHeader,
    pub palette: Arc<Palette>,
    pub images: Vec<Result<VnmImage, DecodeError>>,
}

impl VnmFile {
    pub fn summary(&self) -> FileSummary {
        self.header.summary()
    }

    /// The images that decoded, in file order.
    pub fn decoded(&self) -> impl Iterator<Item = &VnmImage> {
        self.images.iter().filter_map(|image| image.as_ref().ok())
    }
}

/// Positional reader over a VNM source. The header is parsed once up front,
/// the palette on first use.
pub struct VnmReader<R> {
    source: R,
    header: FileHeader,
    palette: Option<Arc<Palette>>,
}

impl<R: Read + Seek> VnmReader<R> {
    pub fn new(mut source: R) -> Result<Self, DecodeError> {
        source.seek(SeekFrom::Start(0)).within(Section::Header)?;
        let header = FileHeader::read(&mut source)?;
        Ok(Self {
            source,
            header,
            palette: None,
        })
    }

    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    pub fn summary(&self) -> FileSummary {
        self.header.summary()
    }

    pub fn image_count(&self) -> usize {
        self.header.images_count as usize
    }

    pub fn palette(&mut self) -> Result<Arc<Palette>, DecodeError> {
        if let Some(palette) = &self.palette {
            return Ok(Arc::clone(palette));
        }
        let palette = Arc::new(Palette::read(&mut self.source, &self.header)?);
        self.palette = Some(Arc::clone(&palette));
        Ok(palette)
    }

    /// The absolute offsets of every image sub-header, in file order.
    pub fn image_offsets(&mut self) -> Result<Vec<u32>, DecodeError> {
        self.source
            .seek(SeekFrom::Start(self.header.images_index_offset as u64))
            .within(Section::ImageIndex)?;

        let mut offsets = Vec::new();
        for _ in 0..self.header.images_count {
            let offset = self
                .source
                .read_u32::<LittleEndian>()
                .within(Section::ImageIndex)?;
            offsets.push(offset);
        }
        debug!("Image index: {:?}", offsets);
        Ok(offsets)
    }

    pub fn image_summary(&mut self, number: usize) -> Result<ImageSummary, DecodeError> {
        self.check_number(number)?;
        let offset = self.image_offset(number)?;
        Ok(self.image_header(offset, number)?.summary())
    }

    pub fn decode_one(&mut self, number: usize) -> Result<VnmImage, DecodeError> {
        self.check_number(number)?;
        let palette = self.palette()?;
        let offset = self.image_offset(number)?;
        self.decode_at(offset, number, palette)
    }

    pub fn decode_all(mut self) -> Result<VnmFile, DecodeError> {
        info!("Decoding {} images", self.header.images_count);
        let palette = self.palette()?;
        let offsets = self.image_offsets()?;

        let mut images = Vec::with_capacity(offsets.len());
        for (i, &offset) in offsets.iter().enumerate() {
            let image = self.decode_at(offset, i + 1, Arc::clone(&palette));
            if let Err(err) = &image {
                warn!("Skipping image #{}: {}", i + 1, err);
            }
            images.push(image);
        }

        let decoded = images.iter().filter(|image| image.is_ok()).count();
        info!("Decoded {} of {} images", decoded, images.len());

        Ok(VnmFile {
            header: self.header,
            palette,
            images,
        })
    }

    pub fn into_inner(self) -> R {
        self.source
    }

    fn check_number(&self, number: usize) -> Result<(), DecodeError> {
        let count = self.image_count();
        if number == 0 || number > count {
            error!("Image #{} requested, file holds {}", number, count);
            return Err(DecodeError::IndexOutOfRange {
                requested: number,
                count,
            });
        }
        Ok(())
    }

    fn image_offset(&mut self, number: usize) -> Result<u32, DecodeError> {
        let entry = self.header.images_index_offset as u64 + 4 * (number as u64 - 1);
        self.source
            .seek(SeekFrom::Start(entry))
            .within(Section::ImageIndex)?;
        self.source
            .read_u32::<LittleEndian>()
            .within(Section::ImageIndex)
    }

    fn image_header(&mut self, offset: u32, number: usize) -> Result<ImageHeader, DecodeError> {
        self.source
            .seek(SeekFrom::Start(offset as u64))
            .within(Section::ImageHeader { image: number })?;
        ImageHeader::read(&mut self.source, number)
    }

    fn decode_at(
        &mut self,
        offset: u32,
        number: usize,
        palette: Arc<Palette>,
    ) -> Result<VnmImage, DecodeError> {
        let header = self.image_header(offset, number)?;
        let surface = decode_pixels(&mut self.source, &header, number)?;
        Ok(VnmImage {
            number,
            header,
            palette,
            surface,
        })
    }
}

impl VnmReader<BufReader<File>> {
    /// Opens a file for decoding. The handle lives as long as the reader.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DecodeError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| {
            error!("Could not open {}: {}", path.display(), source);
            DecodeError::Open {
                path: path.to_path_buf(),
                source,
            }
        })?;
        info!("Opened {}", path.display());
        Self::new(BufReader::new(file))
    }
}

pub fn inspect<R: Read + Seek>(source: R) -> Result<FileSummary, DecodeError> {
    Ok(VnmReader::new(source)?.summary())
}

pub fn inspect_image<R: Read + Seek>(source: R, number: usize) -> Result<ImageSummary, DecodeError> {
    VnmReader::new(source)?.image_summary(number)
}

pub fn decode_all<R: Read + Seek>(source: R) -> Result<VnmFile, DecodeError> {
    VnmReader::new(source)?.decode_all()
}

pub fn decode_one<R: Read + Seek>(source: R, number: usize) -> Result<VnmImage, DecodeError> {
    VnmReader::new(source)?.decode_one(number)
}

pub fn open<P: AsRef<Path>>(path: P) -> Result<VnmReader<BufReader<File>>, DecodeError> {
    VnmReader::open(path)
}

/// Decodes every image of the file at `path`, closing it before returning.
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<VnmFile, DecodeError> {
    open(path)?.decode_all()
}
