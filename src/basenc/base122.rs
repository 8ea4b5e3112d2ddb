use std::io::{self, Write};

use super::alphabet::BASE122;
use super::core::{Flow, StreamDecoder, StreamEncoder};
use super::error::CodecError;
use super::wrap::LineWrapper;

const RADIX: u16 = 122;

/// Every byte becomes two symbols: `byte / 122`, `byte % 122`.
#[derive(Default)]
pub struct Encoder {
    symbols: Vec<u8>,
}

impl StreamEncoder for Encoder {
    fn encode_chunk<W: Write>(&mut self, chunk: &[u8], out: &mut LineWrapper<W>) -> io::Result<()> {
        self.symbols.clear();
        self.symbols.reserve(chunk.len() * 2);
        for &b in chunk {
            let b = b as u16;
            self.symbols.push(BASE122.symbol((b / RADIX) as usize));
            self.symbols.push(BASE122.symbol((b % RADIX) as usize));
        }
        out.write_symbols(&self.symbols)
    }

    fn finish<W: Write>(&mut self, _out: &mut LineWrapper<W>) -> io::Result<()> {
        Ok(())
    }
}

/// Symbols are taken in pairs. Whitespace, including line breaks, belongs to
/// the alphabet and is decoded as digits.
pub struct Decoder {
    ignore_garbage: bool,
    high: Option<u8>,
}

impl Decoder {
    pub fn new(ignore_garbage: bool) -> Self {
        Self {
            ignore_garbage,
            high: None,
        }
    }
}

impl StreamDecoder for Decoder {
    fn decode_chunk(&mut self, chunk: &[u8], out: &mut Vec<u8>) -> Result<Flow, CodecError> {
        for &b in chunk {
            let digit = match BASE122.digit(b) {
                Some(d) => d as u16,
                None if self.ignore_garbage => continue,
                None => return Err(CodecError::InvalidCharacter { byte: b }),
            };
            match self.high.take() {
                None => self.high = Some(digit as u8),
                Some(hi) => out.push(((hi as u16 * RADIX + digit) & 0xFF) as u8),
            }
        }
        Ok(Flow::Continue)
    }

    /// A trailing symbol without a partner is discarded: it carries no
    /// complete byte. This loses data on truncated input.
    fn finish(&mut self, _out: &mut Vec<u8>) {
        if let Some(dangling) = self.high.take() {
            log::debug!("base122: dropping unpaired trailing digit {}", dangling);
        }
    }
}
