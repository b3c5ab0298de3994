use std::io::{Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};
use log::{debug, warn};

use crate::constants::TRANSPARENT_INDEX;
use crate::error::{DecodeError, IoContext, Section};
use crate::image::format::ImageHeader;

/// Bytes at or above this value start a transparency run. It depends on the
/// image width, so for images 256 or more pixels wide every byte is a run.
pub fn escape_threshold(width: usize) -> i32 {
    0x100 - width as i32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowState {
    /// Nothing consumed yet. A leading literal here is dropped.
    AwaitingFirstSymbol,
    ConsumingRow,
    RowComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Symbol {
    TransparentRun(usize),
    Literal(u8),
}

/// Walks one encoded sprite row and emits exactly `width` pixel bytes.
pub struct RowDecoder<'a> {
    encoded: &'a [u8],
    cursor: usize,
    remaining: usize,
    escape: i32,
    state: RowState,
    overran: bool,
}

impl<'a> RowDecoder<'a> {
    pub fn new(encoded: &'a [u8], width: usize) -> Self {
        Self {
            encoded,
            cursor: 0,
            remaining: width,
            escape: escape_threshold(width),
            state: if width == 0 {
                RowState::RowComplete
            } else {
                RowState::AwaitingFirstSymbol
            },
            overran: false,
        }
    }

    /// Decodes the row into `out`. Returns `true` if the encoded bytes ran out
    /// before the row was full and the rest was filled with transparency.
    pub fn decode_into(mut self, out: &mut Vec<u8>) -> bool {
        while self.state != RowState::RowComplete {
            let symbol = self.next_symbol();
            self.state = self.step(symbol, out);
        }
        self.overran
    }

    fn next_symbol(&mut self) -> Symbol {
        // Some real files declare rows longer than their encoded bytes.
        let byte = match self.encoded.get(self.cursor) {
            Some(&byte) => byte,
            None => {
                self.overran = true;
                TRANSPARENT_INDEX
            }
        };
        self.cursor += 1;

        if byte as i32 >= self.escape {
            // The byte after an escape is reserved.
            self.cursor += 1;
            Symbol::TransparentRun(0x100 - byte as usize)
        } else {
            Symbol::Literal(byte)
        }
    }

    fn step(&mut self, symbol: Symbol, out: &mut Vec<u8>) -> RowState {
        match (self.state, symbol) {
            (RowState::RowComplete, _) => RowState::RowComplete,
            (RowState::AwaitingFirstSymbol, Symbol::Literal(_)) => RowState::ConsumingRow,
            (_, Symbol::TransparentRun(length)) => {
                let emitted = length.min(self.remaining);
                out.extend(std::iter::repeat(TRANSPARENT_INDEX).take(emitted));
                self.remaining -= emitted;
                self.after_emit()
            }
            (RowState::ConsumingRow, Symbol::Literal(value)) => {
                out.push(value);
                self.remaining -= 1;
                self.after_emit()
            }
        }
    }

    fn after_emit(&self) -> RowState {
        if self.remaining == 0 {
            RowState::RowComplete
        } else {
            RowState::ConsumingRow
        }
    }
}

/// Decodes one row, see [`RowDecoder::decode_into`].
pub fn decode_row(encoded: &[u8], width: usize, out: &mut Vec<u8>) -> bool {
    RowDecoder::new(encoded, width).decode_into(out)
}

/// Reads a run-length encoded sprite. The data offset holds `height` absolute
/// row offsets; each row is read from its own offset, at most `width` bytes.
///
/// Rows never fail on short data, they are padded with transparency instead.
pub fn decode_sprite<R: Read + Seek>(
    reader: &mut R,
    header: &ImageHeader,
    number: usize,
) -> Result<Vec<u8>, DecodeError> {
    let (width, height) = (header.width(), header.height());
    let table = Section::RowOffsets { image: number };

    reader
        .seek(SeekFrom::Start(header.offset as u64))
        .within(table)?;
    let mut row_offsets = vec![0u32; height];
    reader
        .read_u32_into::<LittleEndian>(&mut row_offsets)
        .within(table)?;

    let mut data = Vec::new();
    let mut encoded = Vec::with_capacity(width);
    let mut overran_rows = 0;
    for (y, &offset) in row_offsets.iter().enumerate() {
        let section = Section::SpriteRow {
            image: number,
            row: y,
        };
        reader.seek(SeekFrom::Start(offset as u64)).within(section)?;
        encoded.clear();
        reader
            .by_ref()
            .take(width as u64)
            .read_to_end(&mut encoded)
            .within(section)?;

        if decode_row(&encoded, width, &mut data) {
            debug!(
                "Image #{}: row {} ran past its {} encoded bytes",
                number,
                y,
                encoded.len()
            );
            overran_rows += 1;
        }
    }

    if overran_rows > 0 {
        warn!(
            "Image #{}: {} of {} rows ran short and were padded with transparency",
            number, overran_rows, height
        );
    }

    Ok(data)
}
