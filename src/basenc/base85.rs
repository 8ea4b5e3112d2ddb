use std::io::{self, Write};

use super::alphabet::{BASE85, BASE85_LEADING_Z, BASE85_ZERO_RUN, is_line_break};
use super::core::{Flow, StreamDecoder, StreamEncoder};
use super::error::CodecError;
use super::wrap::LineWrapper;

/// Digit whose symbol doubles as the zero-run shorthand.
const ZERO_RUN_DIGIT: u8 = 61;

/// Highest digit; completes a truncated group on decode.
const MAX_DIGIT: u32 = 84;

/// 4 input bytes -> 5 symbols, most significant digit first.
#[derive(Default)]
pub struct Encoder {
    pending: [u8; 4],
    pending_len: usize,
}

/// Symbols for a group of 1..=4 bytes. A short group is zero-filled and
/// truncated to `len + 1` symbols; only a full all-zero group becomes `z`.
fn encode_group<W: Write>(group: &[u8], out: &mut LineWrapper<W>) -> io::Result<()> {
    let mut word = [0u8; 4];
    word[..group.len()].copy_from_slice(group);
    let mut value = u32::from_be_bytes(word);

    if group.len() == 4 && value == 0 {
        return out.write_symbols(&[BASE85_ZERO_RUN]);
    }

    let mut symbols = [0u8; 5];
    for slot in symbols.iter_mut().rev() {
        *slot = BASE85.symbol((value % 85) as usize);
        value /= 85;
    }
    if symbols[0] == BASE85_ZERO_RUN {
        symbols[0] = BASE85_LEADING_Z;
    }
    out.write_symbols(&symbols[..group.len() + 1])
}

impl StreamEncoder for Encoder {
    fn encode_chunk<W: Write>(&mut self, chunk: &[u8], out: &mut LineWrapper<W>) -> io::Result<()> {
        for &b in chunk {
            self.pending[self.pending_len] = b;
            self.pending_len += 1;
            if self.pending_len == 4 {
                self.pending_len = 0;
                encode_group(&self.pending, out)?;
            }
        }
        Ok(())
    }

    fn finish<W: Write>(&mut self, out: &mut LineWrapper<W>) -> io::Result<()> {
        if self.pending_len == 0 {
            return Ok(());
        }
        let len = self.pending_len;
        self.pending_len = 0;
        encode_group(&self.pending[..len], out)
    }
}

/// Accumulates `value * 85 + digit`; every 5 digits yield 4 bytes. Line
/// breaks are skipped. `z` at a group boundary expands to four zero bytes,
/// inside a group it is an ordinary digit.
pub struct Decoder {
    ignore_garbage: bool,
    value: u32,
    count: usize,
}

impl Decoder {
    pub fn new(ignore_garbage: bool) -> Self {
        Self {
            ignore_garbage,
            value: 0,
            count: 0,
        }
    }
}

impl StreamDecoder for Decoder {
    fn decode_chunk(&mut self, chunk: &[u8], out: &mut Vec<u8>) -> Result<Flow, CodecError> {
        for &b in chunk {
            let digit = if self.count == 0 && b == BASE85_ZERO_RUN {
                out.extend_from_slice(&[0; 4]);
                continue;
            } else if self.count == 0 && b == BASE85_LEADING_Z {
                ZERO_RUN_DIGIT
            } else {
                match BASE85.digit(b) {
                    Some(d) => d,
                    None if self.ignore_garbage || is_line_break(b) => continue,
                    None => return Err(CodecError::InvalidCharacter { byte: b }),
                }
            };

            self.value = self.value.wrapping_mul(85).wrapping_add(digit as u32);
            self.count += 1;
            if self.count == 5 {
                out.extend_from_slice(&self.value.to_be_bytes());
                self.value = 0;
                self.count = 0;
            }
        }
        Ok(Flow::Continue)
    }

    /// A trailing group of `count` digits yields `count - 1` bytes.
    fn finish(&mut self, out: &mut Vec<u8>) {
        if self.count > 0 {
            let mut value = self.value;
            for _ in self.count..5 {
                value = value.wrapping_mul(85).wrapping_add(MAX_DIGIT);
            }
            out.extend_from_slice(&value.to_be_bytes()[..self.count - 1]);
        }
        self.value = 0;
        self.count = 0;
    }
}
