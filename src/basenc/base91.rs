//! Fixed-width base91 variant: every 13 bits become a pair of symbols
//! `value / 91, value % 91`.
//!
//! The final pair is zero-padded, so a stream of `T = 13 * pairs` bits fits
//! two byte lengths whenever `T % 8 < 5`. The decoder resolves that by
//! dropping a trailing zero byte; when the input really did end in a zero
//! byte at such a length the encoder appends [`KEEP_MARKER`], a pair whose
//! value lies above the 13-bit range.

use std::io::{self, Write};

use super::alphabet::{BASE91, is_line_break};
use super::core::{Flow, StreamDecoder, StreamEncoder};
use super::error::CodecError;
use super::wrap::LineWrapper;

const GROUP_BITS: u32 = 13;
const GROUP_MASK: u32 = (1 << GROUP_BITS) - 1;

/// Pair value 90 * 91 + 90: keeps a trailing zero byte that would otherwise
/// be taken for padding.
pub const KEEP_MARKER: u32 = 8280;

/// True when `total_bits` of group data could stem from two input lengths.
#[inline]
fn ambiguous_tail(total_bits: u64) -> bool {
    total_bits % 8 < 5
}

#[derive(Default)]
pub struct Encoder {
    acc: u32,
    bits: u32,
    /// Data pairs written, for the trailing-zero check.
    groups: u64,
    bytes: u64,
    last_byte: u8,
}

impl Encoder {
    fn write_pair<W: Write>(&mut self, value: u32, out: &mut LineWrapper<W>) -> io::Result<()> {
        let hi = BASE91.symbol((value / 91) as usize);
        let lo = BASE91.symbol((value % 91) as usize);
        out.write_group(&[hi, lo])
    }
}

impl StreamEncoder for Encoder {
    fn encode_chunk<W: Write>(&mut self, chunk: &[u8], out: &mut LineWrapper<W>) -> io::Result<()> {
        let Some(&last) = chunk.last() else {
            return Ok(());
        };
        for &b in chunk {
            self.acc = (self.acc << 8) | b as u32;
            self.bits += 8;
            while self.bits >= GROUP_BITS {
                self.bits -= GROUP_BITS;
                let value = (self.acc >> self.bits) & GROUP_MASK;
                self.write_pair(value, out)?;
                self.groups += 1;
            }
            self.acc &= (1 << self.bits) - 1;
        }
        self.bytes += chunk.len() as u64;
        self.last_byte = last;
        Ok(())
    }

    /// Leftover bits are left-aligned in a final 13-bit group, then the keep
    /// marker follows if the decoder would otherwise drop a real zero byte.
    fn finish<W: Write>(&mut self, out: &mut LineWrapper<W>) -> io::Result<()> {
        if self.bits > 0 {
            let value = (self.acc << (GROUP_BITS - self.bits)) & GROUP_MASK;
            self.write_pair(value, out)?;
            self.groups += 1;
        }

        let total_bits = self.groups * GROUP_BITS as u64;
        if self.bytes > 0
            && self.last_byte == 0
            && ambiguous_tail(total_bits)
            && total_bits / 8 == self.bytes
        {
            log::trace!("base91: trailing zero byte needs keep marker");
            self.write_pair(KEEP_MARKER, out)?;
        }

        self.acc = 0;
        self.bits = 0;
        Ok(())
    }
}

/// Pairs symbols back into 13-bit groups and emits bytes as soon as 8 bits
/// are buffered. The most recent byte is held back until more data arrives
/// or the stream ends, where it may turn out to be padding.
pub struct Decoder {
    ignore_garbage: bool,
    high: Option<u8>,
    acc: u32,
    bits: u32,
    total_bits: u64,
    held: Option<u8>,
}

impl Decoder {
    pub fn new(ignore_garbage: bool) -> Self {
        Self {
            ignore_garbage,
            high: None,
            acc: 0,
            bits: 0,
            total_bits: 0,
            held: None,
        }
    }

    fn push_byte(&mut self, byte: u8, out: &mut Vec<u8>) {
        if let Some(prev) = self.held.replace(byte) {
            out.push(prev);
        }
    }

    fn push_pair(&mut self, value: u32, out: &mut Vec<u8>) {
        if value > GROUP_MASK {
            // Marker pairs carry no bits.
            if let Some(prev) = self.held.take() {
                out.push(prev);
            }
            return;
        }
        self.acc = (self.acc << GROUP_BITS) | value;
        self.bits += GROUP_BITS;
        self.total_bits += GROUP_BITS as u64;
        while self.bits >= 8 {
            self.bits -= 8;
            let byte = (self.acc >> self.bits) as u8;
            self.push_byte(byte, out);
        }
        self.acc &= (1 << self.bits) - 1;
    }
}

impl StreamDecoder for Decoder {
    fn decode_chunk(&mut self, chunk: &[u8], out: &mut Vec<u8>) -> Result<Flow, CodecError> {
        for &b in chunk {
            let digit = match BASE91.digit(b) {
                Some(d) => d as u32,
                None if self.ignore_garbage || is_line_break(b) => continue,
                None => return Err(CodecError::InvalidCharacter { byte: b }),
            };
            match self.high.take() {
                None => self.high = Some(digit as u8),
                Some(hi) => self.push_pair(hi as u32 * 91 + digit, out),
            }
        }
        Ok(Flow::Continue)
    }

    /// Drops an unpaired trailing symbol and a held zero byte that can only
    /// be padding.
    fn finish(&mut self, out: &mut Vec<u8>) {
        if let Some(dangling) = self.high.take() {
            log::debug!("base91: dropping unpaired trailing digit {}", dangling);
        }
        if let Some(last) = self.held.take() {
            if !(last == 0 && ambiguous_tail(self.total_bits)) {
                out.push(last);
            }
        }
        self.acc = 0;
        self.bits = 0;
        self.total_bits = 0;
    }
}
