use std::io::{self, Write};

use base64_simd::AsOut;

use super::alphabet::{BASE64, BASE64_PAD, is_space};
use super::core::{Flow, StreamDecoder, StreamEncoder};
use super::error::CodecError;
use super::wrap::LineWrapper;

/// SIMD-accelerated base64 engine (standard alphabet with padding).
const BASE64_ENGINE: &base64_simd::Base64 = &base64_simd::STANDARD;

/// 3 input bytes -> 4 symbols. Whole groups go through the SIMD engine in
/// bulk; up to 2 trailing bytes wait in `pending` for the next chunk.
#[derive(Default)]
pub struct Encoder {
    pending: [u8; 3],
    pending_len: usize,
    encode_buf: Vec<u8>,
}

impl Encoder {
    fn encode_to<W: Write>(&mut self, group: &[u8], out: &mut LineWrapper<W>) -> io::Result<()> {
        let enc_len = BASE64_ENGINE.encoded_length(group.len());
        if self.encode_buf.len() < enc_len {
            self.encode_buf.resize(enc_len, 0);
        }
        let encoded = BASE64_ENGINE.encode(group, self.encode_buf[..enc_len].as_out());
        out.write_symbols(encoded)
    }
}

impl StreamEncoder for Encoder {
    fn encode_chunk<W: Write>(
        &mut self,
        mut chunk: &[u8],
        out: &mut LineWrapper<W>,
    ) -> io::Result<()> {
        if self.pending_len > 0 {
            let take = (3 - self.pending_len).min(chunk.len());
            self.pending[self.pending_len..self.pending_len + take].copy_from_slice(&chunk[..take]);
            self.pending_len += take;
            chunk = &chunk[take..];
            if self.pending_len < 3 {
                return Ok(());
            }
            let group = self.pending;
            self.pending_len = 0;
            self.encode_to(&group, out)?;
        }

        let whole = chunk.len() - chunk.len() % 3;
        if whole > 0 {
            self.encode_to(&chunk[..whole], out)?;
        }

        let rest = &chunk[whole..];
        self.pending[..rest.len()].copy_from_slice(rest);
        self.pending_len = rest.len();
        Ok(())
    }

    /// A final group of 1 or 2 bytes gets `==` or `=`.
    fn finish<W: Write>(&mut self, out: &mut LineWrapper<W>) -> io::Result<()> {
        if self.pending_len == 0 {
            return Ok(());
        }
        let group = self.pending;
        let len = self.pending_len;
        self.pending_len = 0;
        self.encode_to(&group[..len], out)
    }
}

/// 6 bits per symbol, a byte out whenever 8 are buffered. Whitespace is
/// always skipped. Without ignore-garbage, `=` ends the data; with it, `=`
/// is skipped like any other non-alphabet byte.
pub struct Decoder {
    ignore_garbage: bool,
    acc: u32,
    bits: u32,
}

impl Decoder {
    pub fn new(ignore_garbage: bool) -> Self {
        Self {
            ignore_garbage,
            acc: 0,
            bits: 0,
        }
    }
}

impl StreamDecoder for Decoder {
    fn decode_chunk(&mut self, chunk: &[u8], out: &mut Vec<u8>) -> Result<Flow, CodecError> {
        let (data, flow) = if self.ignore_garbage {
            (chunk, Flow::Continue)
        } else {
            match memchr::memchr(BASE64_PAD, chunk) {
                Some(pos) => (&chunk[..pos], Flow::Stop),
                None => (chunk, Flow::Continue),
            }
        };

        for &b in data {
            let Some(digit) = BASE64.digit(b) else {
                if self.ignore_garbage || is_space(b) {
                    continue;
                }
                return Err(CodecError::InvalidCharacter { byte: b });
            };
            self.acc = (self.acc << 6) | digit as u32;
            self.bits += 6;
            if self.bits >= 8 {
                self.bits -= 8;
                out.push((self.acc >> self.bits) as u8);
                self.acc &= (1 << self.bits) - 1;
            }
        }
        Ok(flow)
    }

    /// Fewer than 8 leftover bits carry no byte.
    fn finish(&mut self, _out: &mut Vec<u8>) {
        self.acc = 0;
        self.bits = 0;
    }
}
